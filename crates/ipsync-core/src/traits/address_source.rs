// # Address Source Trait
//
// Defines the interface for resolving the host's current public address.
//
// ## Implementations
//
// - HTTP lookup service: `ipsync-lookup-http` crate
// - Scripted sources in tests
//
// ## Usage
//
// ```rust,ignore
// use ipsync_core::AddressSource;
//
// let source = /* AddressSource implementation */;
// let current = source.resolve().await?;
// ```

use async_trait::async_trait;
use std::net::IpAddr;

/// Trait for resolving the current public address
///
/// Implementations perform exactly one lookup per call and never retry;
/// the orchestrator decides how to treat failure (in this design: abort
/// the run).
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait AddressSource: Send + Sync {
    /// Resolve the current public address
    ///
    /// # Returns
    ///
    /// - `Ok(IpAddr)`: The resolved address
    /// - `Err(Error::Lookup)`: The lookup request could not be completed
    /// - `Err(Error::Parse)`: The response body did not parse as an address
    async fn resolve(&self) -> Result<IpAddr, crate::Error>;
}
