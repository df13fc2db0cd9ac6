//! Target registry
//!
//! Update targets are decoded one at a time from a sequence of JSON records
//! (concatenated values, not an array), in the order they appear. Decoding
//! is lazy and fused: the first malformed record ends the sequence, but the
//! targets decoded before it are kept and dispatched. A mistake in a later
//! entry must not prevent earlier, valid entries from being updated.
//!
//! The sequence is restartable only by reopening its source, which is what
//! [`TargetSource`] abstracts.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// One dynamic-DNS record destination to notify of an address change
///
/// Decoded from the wire field names of the target source
/// (`updateHost`, `host`, `user`, `password`, `isToken`).
/// Immutable after decoding.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTarget {
    /// Physical endpoint the update request is sent to
    #[serde(rename = "updateHost")]
    pub update_endpoint: String,

    /// DNS record name carried in the update request
    #[serde(rename = "host")]
    pub record_name: String,

    /// Basic-auth user
    #[serde(rename = "user", default)]
    pub username: String,

    /// Basic-auth secret; a password or a token depending on `token_auth`
    #[serde(rename = "password", default)]
    pub secret: String,

    /// Whether `secret` is a token. Decoded but does not currently alter
    /// the auth scheme: the dispatch protocol treats both as Basic Auth.
    #[serde(rename = "isToken", default)]
    pub token_auth: bool,
}

impl UpdateTarget {
    /// Check the non-empty invariants of a decoded record
    ///
    /// An empty endpoint or record name makes the record malformed, which
    /// truncates the remaining sequence like any other decode failure.
    pub fn validate(&self) -> Result<()> {
        if self.update_endpoint.is_empty() {
            return Err(Error::target_decode("target has an empty updateHost"));
        }
        if self.record_name.is_empty() {
            return Err(Error::target_decode("target has an empty host"));
        }
        Ok(())
    }
}

// The secret never appears in Debug output.
impl std::fmt::Debug for UpdateTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateTarget")
            .field("update_endpoint", &self.update_endpoint)
            .field("record_name", &self.record_name)
            .field("username", &self.username)
            .field("secret", &"<REDACTED>")
            .field("token_auth", &self.token_auth)
            .finish()
    }
}

/// Lazy, fused decoder over a sequence of JSON target records
///
/// Yields `Ok(UpdateTarget)` per valid record. The first malformed record
/// (bad JSON or a violated invariant) yields one `Err(Error::TargetDecode)`
/// and the iterator terminates; remaining input is never consumed.
pub struct TargetDecoder<R: io::Read> {
    inner: serde_json::StreamDeserializer<'static, serde_json::de::IoRead<R>, UpdateTarget>,
    done: bool,
}

impl<R: io::Read> TargetDecoder<R> {
    /// Create a decoder over any byte reader
    pub fn new(reader: R) -> Self {
        Self {
            inner: serde_json::Deserializer::from_reader(reader).into_iter(),
            done: false,
        }
    }
}

impl<R: io::Read> Iterator for TargetDecoder<R> {
    type Item = Result<UpdateTarget>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.inner.next() {
            None => {
                self.done = true;
                None
            }
            Some(Ok(target)) => match target.validate() {
                Ok(()) => Some(Ok(target)),
                Err(e) => {
                    self.done = true;
                    Some(Err(e))
                }
            },
            Some(Err(e)) => {
                self.done = true;
                Some(Err(Error::target_decode(e.to_string())))
            }
        }
    }
}

/// Source of the target record sequence
///
/// Opening can fail (fatal to a changed run); reopening restarts the
/// sequence from the beginning.
pub trait TargetSource: Send + Sync {
    /// Open the source, returning a fresh reader over the full sequence
    fn open(&self) -> Result<Box<dyn io::Read + Send>>;
}

/// File-backed target source
#[derive(Debug, Clone)]
pub struct FileTargetSource {
    path: PathBuf,
}

impl FileTargetSource {
    /// Create a target source reading from `path`
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl TargetSource for FileTargetSource {
    fn open(&self) -> Result<Box<dyn io::Read + Send>> {
        let file = File::open(&self.path).map_err(|e| {
            Error::target_source(format!(
                "failed to open target source {}: {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(Box::new(file))
    }
}
