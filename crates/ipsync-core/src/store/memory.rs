// # Memory Address Store
//
// In-memory implementation of AddressStore.
//
// ## When to Use
//
// - Tests that exercise the engine without touching the filesystem
// - Embedders that manage persistence themselves
//
// State is lost at process exit, so a scheduled agent using this store
// updates every target on every changed run.

use async_trait::async_trait;
use std::net::IpAddr;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Error;
use crate::traits::AddressStore;

/// In-memory address store implementation
#[derive(Debug, Clone, Default)]
pub struct MemoryAddressStore {
    inner: Arc<RwLock<Option<IpAddr>>>,
}

impl MemoryAddressStore {
    /// Create an empty store (no prior address)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with a prior address
    pub fn with_address(address: IpAddr) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(address))),
        }
    }

    /// Current value without going through the trait (test convenience)
    pub async fn current(&self) -> Option<IpAddr> {
        *self.inner.read().await
    }
}

#[async_trait]
impl AddressStore for MemoryAddressStore {
    async fn load(&self) -> Result<Option<IpAddr>, Error> {
        Ok(*self.inner.read().await)
    }

    async fn store(&self, address: IpAddr) -> Result<(), Error> {
        *self.inner.write().await = Some(address);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn starts_absent_and_holds_last_store() {
        let store = MemoryAddressStore::new();
        assert_eq!(store.load().await.unwrap(), None);

        let addr: IpAddr = "198.51.100.7".parse().unwrap();
        store.store(addr).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(addr));
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = MemoryAddressStore::new();
        let alias = store.clone();

        store.store("203.0.113.1".parse().unwrap()).await.unwrap();
        assert_eq!(alias.current().await, Some("203.0.113.1".parse().unwrap()));
    }
}
