//! Test doubles and common utilities for the engine contract tests
//!
//! These doubles script each seam of the engine (lookup, store, targets,
//! update client) so the contracts can be verified without any network.

// Not every double is used by every test binary.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::io;
use std::net::IpAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use ipsync_core::error::Result;
use ipsync_core::registry::{TargetSource, UpdateTarget};
use ipsync_core::traits::{AddressSource, AddressStore, UpdateClient};
use ipsync_core::{Error, sanitize};

/// An address source that yields a fixed, already-parsed address
pub struct FixedAddressSource {
    address: IpAddr,
}

impl FixedAddressSource {
    pub fn new(address: IpAddr) -> Self {
        Self { address }
    }
}

#[async_trait::async_trait]
impl AddressSource for FixedAddressSource {
    async fn resolve(&self) -> Result<IpAddr> {
        Ok(self.address)
    }
}

/// An address source that behaves like the HTTP lookup path: it holds a
/// raw response body (possibly with trailing control bytes) and runs it
/// through the sanitizing parser on every resolve.
pub struct RawBodySource {
    body: Vec<u8>,
}

impl RawBodySource {
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self { body: body.into() }
    }
}

#[async_trait::async_trait]
impl AddressSource for RawBodySource {
    async fn resolve(&self) -> Result<IpAddr> {
        sanitize::parse_address(&self.body)
    }
}

/// An address source whose lookup transport always fails
pub struct FailingLookupSource;

#[async_trait::async_trait]
impl AddressSource for FailingLookupSource {
    async fn resolve(&self) -> Result<IpAddr> {
        Err(Error::lookup("simulated transport failure"))
    }
}

/// An address store that loads fine but cannot persist
pub struct WriteFailingStore {
    stored: Option<IpAddr>,
}

impl WriteFailingStore {
    pub fn new(stored: Option<IpAddr>) -> Self {
        Self { stored }
    }
}

#[async_trait::async_trait]
impl AddressStore for WriteFailingStore {
    async fn load(&self) -> Result<Option<IpAddr>> {
        Ok(self.stored)
    }

    async fn store(&self, _address: IpAddr) -> Result<()> {
        Err(Error::store("simulated write failure"))
    }
}

/// A target source over an in-memory record sequence
pub struct StaticTargetSource {
    data: String,
}

impl StaticTargetSource {
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }
}

impl TargetSource for StaticTargetSource {
    fn open(&self) -> Result<Box<dyn io::Read + Send>> {
        Ok(Box::new(io::Cursor::new(self.data.clone().into_bytes())))
    }
}

/// A target source that can never be opened
pub struct UnopenableTargetSource;

impl TargetSource for UnopenableTargetSource {
    fn open(&self) -> Result<Box<dyn io::Read + Send>> {
        Err(Error::target_source("simulated missing target source"))
    }
}

/// An update client that counts and records dispatches
///
/// Individual targets can be scripted to fail or to stall for a while
/// before answering.
pub struct CountingUpdateClient {
    call_count: Arc<AtomicUsize>,
    dispatched: Arc<std::sync::Mutex<Vec<(String, IpAddr)>>>,
    failing: HashSet<String>,
    delays: HashMap<String, Duration>,
}

impl CountingUpdateClient {
    pub fn new() -> Self {
        Self {
            call_count: Arc::new(AtomicUsize::new(0)),
            dispatched: Arc::new(std::sync::Mutex::new(Vec::new())),
            failing: HashSet::new(),
            delays: HashMap::new(),
        }
    }

    /// Make `push_update` fail for the given record name
    pub fn failing_for(mut self, record_name: &str) -> Self {
        self.failing.insert(record_name.to_string());
        self
    }

    /// Make `push_update` sleep before answering for the given record name
    pub fn delaying(mut self, record_name: &str, delay: Duration) -> Self {
        self.delays.insert(record_name.to_string(), delay);
        self
    }

    /// Number of times push_update() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Record names and addresses that were dispatched
    pub fn dispatched(&self) -> Vec<(String, IpAddr)> {
        self.dispatched.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl UpdateClient for CountingUpdateClient {
    async fn push_update(&self, target: &UpdateTarget, address: IpAddr) -> Result<u16> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.dispatched
            .lock()
            .unwrap()
            .push((target.record_name.clone(), address));

        if let Some(delay) = self.delays.get(&target.record_name) {
            tokio::time::sleep(*delay).await;
        }

        if self.failing.contains(&target.record_name) {
            return Err(Error::dispatch("simulated transport failure"));
        }

        Ok(200)
    }

    fn client_name(&self) -> &'static str {
        "counting-mock"
    }
}

/// Two-target record sequence used by several contracts
pub const TWO_TARGETS: &str = r#"
    {"updateHost": "dyn.example.net", "host": "home.example.org",
     "user": "alice", "password": "hunter2", "isToken": false}
    {"updateHost": "dyn.example.net", "host": "lab.example.org",
     "user": "bob", "password": "tok-123", "isToken": true}
"#;

/// Build an UpdateTarget without going through a decoder
pub fn target(record_name: &str) -> UpdateTarget {
    UpdateTarget {
        update_endpoint: "dyn.example.net".to_string(),
        record_name: record_name.to_string(),
        username: "alice".to_string(),
        secret: "hunter2".to_string(),
        token_auth: false,
    }
}
