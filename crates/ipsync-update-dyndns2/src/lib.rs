// # dyndns2 Update Client
//
// This crate provides the `nic/update` (dyndns2-style) implementation of
// `UpdateClient` for the ipsync agent.
//
// ## Protocol
//
// One GET per target:
//
// ```text
// GET http://{updateHost}/nic/update?hostname={host}&myip={address}
// Host: {virtual host}
// Authorization: Basic {user}:{secret}
// ```
//
// - The `Host` header is overridden with a configured virtual host,
//   distinct from the physical endpoint; update services behind shared
//   hosting or CDN fronting route on it.
// - Authentication is always HTTP Basic with the target's user and secret.
//   The target's `token_auth` flag is decoded but does not alter the
//   scheme; `auth_disregards_token_flag` below pins that behavior.
// - The numeric response status is the success signal; the body is not
//   interpreted.
//
// ## Single-shot contract
//
// One request per call, a fresh HTTP client per target, no retries, no
// shared connection state across targets. Coordination (fan-out, fan-in,
// persistence) is owned by the engine.

use std::net::IpAddr;
use std::time::Duration;

use ipsync_core::registry::UpdateTarget;
use ipsync_core::traits::UpdateClient;
use ipsync_core::{Error, Result};

/// Build the update request URL for one target
pub fn build_update_url(endpoint: &str, record_name: &str, address: IpAddr) -> String {
    format!(
        "http://{}/nic/update?hostname={}&myip={}",
        endpoint, record_name, address
    )
}

/// dyndns2-style update client
///
/// Shared by all fan-out tasks; holds only the virtual host and the
/// optional per-request timeout, never credentials.
#[derive(Debug, Clone)]
pub struct Dyndns2Client {
    /// Value for the Host header on every update request
    virtual_host: String,

    /// Optional bound per request; `None` preserves the unbounded wait
    timeout: Option<Duration>,
}

impl Dyndns2Client {
    /// Create a new client
    ///
    /// # Parameters
    ///
    /// - `virtual_host`: Host header value presented to update endpoints
    /// - `timeout`: optional bound on each update request
    pub fn new(virtual_host: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            virtual_host: virtual_host.into(),
            timeout,
        }
    }

    /// Virtual host presented to update endpoints
    pub fn virtual_host(&self) -> &str {
        &self.virtual_host
    }

    /// Build the request for one target against a given HTTP client
    fn build_request(
        &self,
        client: &reqwest::Client,
        target: &UpdateTarget,
        address: IpAddr,
    ) -> Result<reqwest::Request> {
        let url = build_update_url(&target.update_endpoint, &target.record_name, address);
        client
            .get(&url)
            .header(reqwest::header::HOST, self.virtual_host.as_str())
            .basic_auth(&target.username, Some(&target.secret))
            .build()
            .map_err(|e| {
                Error::dispatch(format!(
                    "failed to build update request for {}: {}",
                    target.record_name, e
                ))
            })
    }
}

#[async_trait::async_trait]
impl UpdateClient for Dyndns2Client {
    async fn push_update(&self, target: &UpdateTarget, address: IpAddr) -> Result<u16> {
        // Fresh client per target: no pooled connection state is shared
        // across concurrent dispatches.
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::dispatch(format!("failed to build HTTP client: {}", e)))?;

        let request = self.build_request(&client, target, address)?;

        tracing::debug!(
            target = %target.record_name,
            endpoint = %target.update_endpoint,
            "pushing update"
        );

        let response = client.execute(request).await.map_err(|e| {
            Error::dispatch(format!("update request for {} failed: {}", target.record_name, e))
        })?;

        Ok(response.status().as_u16())
    }

    fn client_name(&self) -> &'static str {
        "dyndns2"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(token_auth: bool) -> UpdateTarget {
        UpdateTarget {
            update_endpoint: "dyn.example.net".to_string(),
            record_name: "home.example.org".to_string(),
            username: "alice".to_string(),
            secret: "hunter2".to_string(),
            token_auth,
        }
    }

    #[test]
    fn update_url_carries_hostname_and_address() {
        let url = build_update_url("dyn.example.net", "home.example.org", "203.0.113.9".parse().unwrap());
        assert_eq!(
            url,
            "http://dyn.example.net/nic/update?hostname=home.example.org&myip=203.0.113.9"
        );
    }

    #[test]
    fn update_url_formats_v6_bare() {
        let url = build_update_url("dyn.example.net", "home.example.org", "2001:db8::1".parse().unwrap());
        assert!(url.ends_with("&myip=2001:db8::1"));
    }

    #[test]
    fn request_overrides_host_header() {
        let dispatcher = Dyndns2Client::new("update.spdyn.de", None);
        let http = reqwest::Client::new();
        let request = dispatcher
            .build_request(&http, &target(false), "203.0.113.9".parse().unwrap())
            .unwrap();

        assert_eq!(
            request.headers().get(reqwest::header::HOST).unwrap(),
            "update.spdyn.de"
        );
        assert_eq!(request.url().host_str(), Some("dyn.example.net"));
    }

    #[test]
    fn auth_disregards_token_flag() {
        // The token_auth flag is decoded but must not change the scheme:
        // both variants produce the identical Basic Auth header.
        let dispatcher = Dyndns2Client::new("update.spdyn.de", None);
        let http = reqwest::Client::new();
        let address: IpAddr = "203.0.113.9".parse().unwrap();

        let with_password = dispatcher
            .build_request(&http, &target(false), address)
            .unwrap();
        let with_token = dispatcher
            .build_request(&http, &target(true), address)
            .unwrap();

        let auth = |r: &reqwest::Request| {
            r.headers()
                .get(reqwest::header::AUTHORIZATION)
                .unwrap()
                .to_owned()
        };

        assert!(auth(&with_password).to_str().unwrap().starts_with("Basic "));
        assert_eq!(auth(&with_password), auth(&with_token));
    }
}
