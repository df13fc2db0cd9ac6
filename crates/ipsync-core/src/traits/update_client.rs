// # Update Client Trait
//
// Defines the interface for pushing one address update to one target.
//
// ## Implementations
//
// - dyndns2-style `nic/update` protocol: `ipsync-update-dyndns2` crate
//
// ## Single-shot contract
//
// A client performs exactly one update request per call:
//
// - ✅ Build and issue the authenticated request for one target
// - ✅ Report the numeric response status (the body is not interpreted)
// - ❌ NO retry or backoff (a failed target is reported, not retried)
// - ❌ NO access to the address store (owned by the engine)
// - ❌ NO spawning of tasks (fan-out is owned by the engine)
//
// Keeping clients single-shot is what lets the engine guarantee exactly
// one outcome per dispatched target.

use async_trait::async_trait;
use std::net::IpAddr;

use crate::registry::UpdateTarget;

/// Trait for per-target update clients
///
/// # Thread Safety
///
/// The engine dispatches one task per target against a shared client, so
/// implementations must be thread-safe. State shared across calls is
/// discouraged; the reference implementation opens a fresh HTTP client per
/// target.
#[async_trait]
pub trait UpdateClient: Send + Sync {
    /// Push `address` to one target's update endpoint
    ///
    /// # Returns
    ///
    /// - `Ok(u16)`: The HTTP status code returned by the endpoint
    /// - `Err(Error::Dispatch)`: Transport or request-construction failure;
    ///   the engine records it in the target's outcome and never aborts
    ///   sibling dispatches
    async fn push_update(&self, target: &UpdateTarget, address: IpAddr)
    -> Result<u16, crate::Error>;

    /// Client name for logging/debugging
    fn client_name(&self) -> &'static str;
}
