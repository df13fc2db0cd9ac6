// # ipsync-core
//
// Core library for the ipsync dynamic-DNS update agent.
//
// ## Architecture Overview
//
// ipsync runs once per invocation (scheduled externally, e.g. by a cron
// timer) and performs the change-detection-and-fan-out sequence:
//
// - **AddressSource**: Trait for resolving the host's current public address
// - **AddressStore**: Trait for persisting the last-known address
// - **UpdateClient**: Trait for pushing one authenticated update to a target
// - **TargetDecoder**: Streaming decoder for the configured update targets
// - **SyncEngine**: Orchestrates load → resolve → compare → fan-out → persist
//
// ## Design Principles
//
// 1. **Run-once**: One invocation, one comparison, at most one fan-out
// 2. **Full fan-in**: Every dispatched target yields exactly one outcome
//    before anything is persisted
// 3. **Partial failure is local**: A bad target record truncates the rest of
//    the sequence; a failed update surfaces only in that target's outcome
// 4. **Library-first**: The engine takes trait objects, so every seam can be
//    exercised in isolation

pub mod config;
pub mod engine;
pub mod error;
pub mod registry;
pub mod sanitize;
pub mod store;
pub mod traits;

// Re-export core types for convenience
pub use config::SyncConfig;
pub use engine::{RunReport, SyncEngine, UpdateOutcome};
pub use error::{Error, Result};
pub use registry::{FileTargetSource, TargetDecoder, TargetSource, UpdateTarget};
pub use store::{FileAddressStore, MemoryAddressStore};
pub use traits::{AddressSource, AddressStore, UpdateClient};
