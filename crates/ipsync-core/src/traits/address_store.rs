// # Address Store Trait
//
// Defines the interface for persisting the last-known address between runs.
//
// ## Purpose
//
// The store is what makes the agent idempotent across scheduled
// invocations: a run that resolves the same address as the stored one
// dispatches nothing and leaves the record untouched.
//
// ## Implementations
//
// - File-based: single plain-text record, atomic replace
// - In-memory: tests and embedders
//
// ## Write discipline
//
// The engine calls `store` exactly once per changed run, after every
// target's outcome has been collected. Implementations must replace the
// record atomically so a concurrent reader never observes a missing or
// truncated record.

use async_trait::async_trait;
use std::net::IpAddr;

/// Trait for address record persistence
///
/// # Thread Safety
///
/// All methods must be safe to call concurrently from multiple tasks,
/// although the engine itself is single-writer within one run.
#[async_trait]
pub trait AddressStore: Send + Sync {
    /// Load the last-known address
    ///
    /// Absence is an expected state, not an error: a missing record (first
    /// run) or an empty/unparseable one yields `Ok(None)`, which the
    /// orchestrator treats as "no prior address" and proceeds to update.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(IpAddr))`: The stored address
    /// - `Ok(None)`: No usable prior record
    /// - `Err(Error::Store)`: I/O failure
    async fn load(&self) -> Result<Option<IpAddr>, crate::Error>;

    /// Atomically replace the record with the new address
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The record now holds the textual form of `address`
    /// - `Err(Error::Store)`: I/O failure; the run is fatal and the stored
    ///   address stays stale for the next invocation
    async fn store(&self, address: IpAddr) -> Result<(), crate::Error>;
}
