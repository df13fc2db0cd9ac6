// # Address Store Implementations
//
// This module provides implementations of the AddressStore trait for
// different persistence strategies.
//
// - `FileAddressStore`: plain-text single-value record with atomic replace
// - `MemoryAddressStore`: in-memory store for tests and embedders

pub mod file;
pub mod memory;

pub use file::FileAddressStore;
pub use memory::MemoryAddressStore;
