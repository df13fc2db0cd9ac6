// # File Address Store
//
// File-based implementation of AddressStore: a single plain-text record
// holding the last-known address.
//
// ## First run
//
// A missing record is expected, not an error. `load` creates an empty
// record and reports no prior address, which forces an update.
//
// ## Atomic replace
//
// `store` writes the new address to a temporary file and renames it over
// the record. Remove-then-create would leave a window where the record is
// missing under a concurrent reader; rename does not.
//
// ## Unparseable records
//
// An empty or corrupt record also reports no prior address. The run then
// proceeds to update every target, which is harmless: the protocol is
// idempotent on the provider side.

use async_trait::async_trait;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::Error;
use crate::sanitize::{self, MAX_ADDRESS_TEXT_LEN};
use crate::traits::AddressStore;

/// File-based address store
///
/// # Example
///
/// ```rust,no_run
/// use ipsync_core::FileAddressStore;
/// use ipsync_core::AddressStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FileAddressStore::new("/var/lib/ipsync/last_address");
///
///     let prior = store.load().await?;          // None on first run
///     store.store("203.0.113.9".parse()?).await?;
///     assert_eq!(store.load().await?, Some("203.0.113.9".parse()?));
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileAddressStore {
    path: PathBuf,
}

impl FileAddressStore {
    /// Create a store backed by the record at `path`
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the record file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get path to the temporary file used for atomic writes
    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        temp.set_extension("tmp");
        temp
    }
}

#[async_trait]
impl AddressStore for FileAddressStore {
    async fn load(&self) -> Result<Option<IpAddr>, Error> {
        let file = match fs::File::open(&self.path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // First run: create an empty record so later failures are
                // real I/O errors, and report no prior address.
                fs::File::create(&self.path).await.map_err(|e| {
                    Error::store(format!(
                        "failed to create address record {}: {}",
                        self.path.display(),
                        e
                    ))
                })?;
                tracing::debug!("no address record at {}, created empty", self.path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(Error::store(format!(
                    "failed to open address record {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        // The record holds one textual address; never read more than that.
        let mut buf = Vec::with_capacity(MAX_ADDRESS_TEXT_LEN);
        file.take(MAX_ADDRESS_TEXT_LEN as u64)
            .read_to_end(&mut buf)
            .await
            .map_err(|e| {
                Error::store(format!(
                    "failed to read address record {}: {}",
                    self.path.display(),
                    e
                ))
            })?;

        match sanitize::parse_address(&buf) {
            Ok(address) => Ok(Some(address)),
            Err(_) => {
                // Empty or corrupt record: treated as no prior address so
                // the run proceeds to update.
                tracing::warn!(
                    "address record {} is empty or unparseable, treating as absent",
                    self.path.display()
                );
                Ok(None)
            }
        }
    }

    async fn store(&self, address: IpAddr) -> Result<(), Error> {
        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path).await.map_err(|e| {
                Error::store(format!(
                    "failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.write_all(address.to_string().as_bytes())
                .await
                .map_err(|e| {
                    Error::store(format!(
                        "failed to write to temp file {}: {}",
                        temp_path.display(),
                        e
                    ))
                })?;

            file.flush().await.map_err(|e| {
                Error::store(format!(
                    "failed to flush temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        // Atomic rename (temp -> record)
        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::store(format!(
                "failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        tracing::trace!("address record written: {}", self.path.display());
        Ok(())
    }
}
