//! Core traits for the ipsync agent
//!
//! This module defines the abstract interfaces the engine coordinates:
//!
//! - [`AddressSource`]: Resolve the host's current public address
//! - [`AddressStore`]: Persist the last-known address between runs
//! - [`UpdateClient`]: Push one authenticated update to one target

pub mod address_source;
pub mod address_store;
pub mod update_client;

pub use address_source::AddressSource;
pub use address_store::AddressStore;
pub use update_client::UpdateClient;
