// # HTTP Address Source
//
// This crate provides the HTTP lookup-service implementation of
// `AddressSource` for the ipsync agent.
//
// ## Protocol
//
// One plain GET against a lookup service that returns the caller's public
// address as a bare text body. The service is known to append a trailing
// newline/control byte, so the body is sanitized before parsing.
//
// ## Failure modes
//
// - Transport failure → `Error::Lookup` (the run aborts)
// - Unparseable body → `Error::Parse` (the run aborts)
//
// There are no retries here; the agent runs again on its next schedule.

use std::net::IpAddr;
use std::time::Duration;

use ipsync_core::config::DEFAULT_LOOKUP_URL;
use ipsync_core::sanitize;
use ipsync_core::traits::AddressSource;
use ipsync_core::{Error, Result};

/// HTTP-based address source
///
/// # Example
///
/// ```rust,no_run
/// use ipsync_lookup_http::HttpAddressSource;
/// use ipsync_core::AddressSource;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let source = HttpAddressSource::new("http://checkip.spdyn.de", None)?;
///     let current = source.resolve().await?;
///     println!("public address: {}", current);
///     Ok(())
/// }
/// ```
pub struct HttpAddressSource {
    /// Lookup service URL
    url: String,

    /// HTTP client; `timeout` of `None` preserves the unbounded wait
    client: reqwest::Client,
}

impl HttpAddressSource {
    /// Create a new HTTP address source
    ///
    /// # Parameters
    ///
    /// - `url`: lookup service URL (e.g. `http://checkip.spdyn.de`)
    /// - `timeout`: optional bound on the whole request
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::lookup(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Create a source for the well-known default lookup service
    pub fn default_service() -> Result<Self> {
        Self::new(DEFAULT_LOOKUP_URL, None)
    }

    /// Lookup service URL this source queries
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl AddressSource for HttpAddressSource {
    async fn resolve(&self) -> Result<IpAddr> {
        tracing::debug!(url = %self.url, "resolving public address");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::lookup(format!("lookup request to {} failed: {}", self.url, e)))?;

        if !response.status().is_success() {
            return Err(Error::lookup(format!(
                "lookup service {} answered {}",
                self.url,
                response.status()
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::lookup(format!("failed to read lookup response: {}", e)))?;

        let address = sanitize::parse_address(&body)?;
        tracing::debug!(address = %address, "public address resolved");
        Ok(address)
    }
}
