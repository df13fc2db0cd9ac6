//! Error types for the ipsync agent
//!
//! One enum covers the whole run. Which variant is produced decides whether
//! the run aborts (lookup, store, target source) or degrades locally
//! (a truncated target sequence, a single failed update).

use thiserror::Error;

/// Result type alias for ipsync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the ipsync agent
#[derive(Error, Debug)]
pub enum Error {
    /// Transport failure reaching the address-lookup service (fatal)
    #[error("address lookup error: {0}")]
    Lookup(String),

    /// A byte sequence that does not parse as a network address
    #[error("address parse error: {0}")]
    Parse(String),

    /// I/O failure reading or writing the persisted address record (fatal)
    #[error("address store error: {0}")]
    Store(String),

    /// The target source could not be opened at all (fatal)
    #[error("target source error: {0}")]
    TargetSource(String),

    /// One malformed target record; earlier targets are still dispatched
    #[error("target decode error: {0}")]
    TargetDecode(String),

    /// Per-target transport/auth failure; surfaces only in that target's outcome
    #[error("dispatch error: {0}")]
    Dispatch(String),

    /// Lower-level I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create an address lookup error
    pub fn lookup(msg: impl Into<String>) -> Self {
        Self::Lookup(msg.into())
    }

    /// Create an address parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an address store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create a target source error
    pub fn target_source(msg: impl Into<String>) -> Self {
        Self::TargetSource(msg.into())
    }

    /// Create a target decode error
    pub fn target_decode(msg: impl Into<String>) -> Self {
        Self::TargetDecode(msg.into())
    }

    /// Create a dispatch error
    pub fn dispatch(msg: impl Into<String>) -> Self {
        Self::Dispatch(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error aborts the run when it reaches the orchestrator
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::TargetDecode(_) | Self::Dispatch(_))
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Dispatch(err.to_string())
    }
}
