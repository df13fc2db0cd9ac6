//! Configuration types for the ipsync agent
//!
//! This module defines the engine configuration. Resolving where the values
//! come from (environment, defaults) is the binary's job; the engine only
//! sees a validated [`SyncConfig`].

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default lookup service returning the caller's public address as plain text
pub const DEFAULT_LOOKUP_URL: &str = "http://checkip.spdyn.de";

/// Default virtual host presented to update endpoints
pub const DEFAULT_UPDATE_VHOST: &str = "update.spdyn.de";

/// Main ipsync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// URL of the address-lookup service
    pub lookup_url: String,

    /// Value for the Host header on update requests.
    ///
    /// Update endpoints are commonly fronted by shared hosting or a CDN, so
    /// the virtual host is configured separately from the per-target
    /// physical endpoint.
    pub update_vhost: String,

    /// Path to the target source (a sequence of JSON target records)
    pub targets_path: PathBuf,

    /// Path to the persisted last-known-address record
    pub address_path: PathBuf,

    /// Optional bound on each HTTP request.
    ///
    /// `None` preserves the unbounded-wait behavior: a hung target stalls
    /// the whole run until its request completes.
    #[serde(default)]
    pub http_timeout: Option<Duration>,
}

impl SyncConfig {
    /// Create a configuration with the well-known lookup/vhost defaults
    pub fn new(targets_path: impl Into<PathBuf>, address_path: impl Into<PathBuf>) -> Self {
        Self {
            lookup_url: DEFAULT_LOOKUP_URL.to_string(),
            update_vhost: DEFAULT_UPDATE_VHOST.to_string(),
            targets_path: targets_path.into(),
            address_path: address_path.into(),
            http_timeout: None,
        }
    }

    /// Override the lookup service URL
    pub fn with_lookup_url(mut self, url: impl Into<String>) -> Self {
        self.lookup_url = url.into();
        self
    }

    /// Override the update virtual host
    pub fn with_update_vhost(mut self, vhost: impl Into<String>) -> Self {
        self.update_vhost = vhost.into();
        self
    }

    /// Bound every HTTP request to the given duration
    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = Some(timeout);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.lookup_url.is_empty() {
            return Err(crate::Error::config("lookup URL cannot be empty"));
        }
        if !self.lookup_url.starts_with("http://") && !self.lookup_url.starts_with("https://") {
            return Err(crate::Error::config(format!(
                "lookup URL must use an HTTP scheme: {}",
                self.lookup_url
            )));
        }
        if self.update_vhost.is_empty() {
            return Err(crate::Error::config("update virtual host cannot be empty"));
        }
        if self.targets_path.as_os_str().is_empty() {
            return Err(crate::Error::config("targets path cannot be empty"));
        }
        if self.address_path.as_os_str().is_empty() {
            return Err(crate::Error::config("address record path cannot be empty"));
        }
        if let Some(timeout) = self.http_timeout {
            if timeout.is_zero() {
                return Err(crate::Error::config("HTTP timeout must be > 0 when set"));
            }
        }
        Ok(())
    }
}
