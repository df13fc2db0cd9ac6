//! Run-once sync engine
//!
//! The SyncEngine is responsible for one scheduled invocation:
//! - Load the last-known address from the AddressStore
//! - Resolve the current address via the AddressSource
//! - Compare; an unchanged address ends the run with no further action
//! - On change, decode the configured targets and fan out one update
//!   request per target, concurrently
//! - Collect every outcome (full barrier), then persist the new address
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   load    ┌──────────────┐
//! │ AddressStore │◄──────────┤  SyncEngine  │
//! └──────▲───────┘           └──────┬───────┘
//!        │ store (after fan-in)     │ resolve
//!        │                  ┌───────▼────────┐
//!        │                  │ AddressSource  │
//!        │                  └───────┬────────┘
//!        │                          │ changed?
//!        │                  ┌───────▼────────┐
//!        └──────────────────┤  UpdateClient  │ × one task per target
//!                           └────────────────┘
//! ```
//!
//! ## Persistence discipline
//!
//! The new address is written at most once per run, strictly after every
//! target's outcome has been collected. Individual target failures do not
//! prevent persistence; a store failure is fatal and leaves the record
//! stale, so the next run repeats the fan-out.

use std::net::IpAddr;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::registry::{TargetDecoder, TargetSource, UpdateTarget};
use crate::traits::{AddressSource, AddressStore, UpdateClient};

/// Per-target result of one dispatched update request
///
/// Produced by the dispatcher, consumed for logging; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The endpoint answered; the numeric status is the success signal
    /// (the body is not interpreted)
    Accepted {
        /// Record name of the target
        target: String,
        /// HTTP status code returned by the endpoint
        status: u16,
    },

    /// The request could not be completed
    Failed {
        /// Record name of the target
        target: String,
        /// Transport/auth error description
        error: String,
    },
}

impl UpdateOutcome {
    /// Record name this outcome belongs to
    pub fn target(&self) -> &str {
        match self {
            Self::Accepted { target, .. } | Self::Failed { target, .. } => target,
        }
    }

    /// Whether the endpoint was reached at all
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Result of one engine run
#[derive(Debug, Clone)]
pub enum RunReport {
    /// Resolved address equals the stored one; nothing was dispatched and
    /// the record was left untouched
    Unchanged {
        /// The (unchanged) address
        address: IpAddr,
    },

    /// Address changed; every target was dispatched and the record was
    /// replaced after fan-in
    Updated {
        /// Address stored before this run (None on first run)
        previous: Option<IpAddr>,
        /// Newly resolved and now-persisted address
        address: IpAddr,
        /// One outcome per dispatched target, in arrival order
        outcomes: Vec<UpdateOutcome>,
        /// When the change was detected
        started_at: chrono::DateTime<chrono::Utc>,
    },
}

/// Run-once orchestrator
///
/// All collaborators are injected as trait objects, so every state
/// transition can be exercised in isolation.
pub struct SyncEngine {
    /// Resolver for the current public address
    source: Box<dyn AddressSource>,

    /// Persistence for the last-known address
    store: Box<dyn AddressStore>,

    /// Per-target update client, shared by the fan-out tasks
    client: Arc<dyn UpdateClient>,

    /// Source of the configured target sequence
    targets: Box<dyn TargetSource>,
}

impl SyncEngine {
    /// Create a new engine
    pub fn new(
        source: Box<dyn AddressSource>,
        store: Box<dyn AddressStore>,
        client: Arc<dyn UpdateClient>,
        targets: Box<dyn TargetSource>,
    ) -> Self {
        Self {
            source,
            store,
            client,
            targets,
        }
    }

    /// Perform one detection-and-fan-out run
    ///
    /// # Errors
    ///
    /// Fatal to the run: a store failure on load or persist, a lookup
    /// transport/parse failure, or a target source that cannot be opened.
    /// A truncated target sequence and individual dispatch failures are
    /// recovered locally and reported in the outcomes.
    pub async fn run(&self) -> Result<RunReport> {
        let stored = self.store.load().await?;
        let current = self.source.resolve().await?;

        if stored == Some(current) {
            // No-op runs stay quiet above debug level.
            debug!(address = %current, "address unchanged, nothing to do");
            return Ok(RunReport::Unchanged { address: current });
        }

        let started_at = chrono::Utc::now();
        info!(
            run = %started_at.to_rfc3339(),
            previous = ?stored.map(|a| a.to_string()),
            current = %current,
            "address change detected"
        );

        // A target source that cannot be opened at all fails the run;
        // the record still holds the old address, so the next run retries.
        let reader = self.targets.open()?;
        let targets = decode_available(TargetDecoder::new(reader));

        debug!(
            client = self.client.client_name(),
            targets = targets.len(),
            "dispatching updates"
        );
        let outcomes = dispatch_all(Arc::clone(&self.client), targets, current).await;
        for outcome in &outcomes {
            match outcome {
                UpdateOutcome::Accepted { target, status } => {
                    info!(target = %target, status = %status, "update accepted");
                }
                UpdateOutcome::Failed { target, error } => {
                    warn!(target = %target, error = %error, "update failed");
                }
            }
        }

        // Write-after-fan-in only: the record is replaced exactly once,
        // never before or per-target.
        self.store.store(current).await?;

        Ok(RunReport::Updated {
            previous: stored,
            address: current,
            outcomes,
            started_at,
        })
    }
}

/// Collect the decodable prefix of the target sequence
///
/// A malformed record truncates the remaining sequence but keeps the
/// targets decoded before it.
fn decode_available<I>(decoder: I) -> Vec<UpdateTarget>
where
    I: Iterator<Item = Result<UpdateTarget>>,
{
    let mut targets = Vec::new();
    for item in decoder {
        match item {
            Ok(target) => targets.push(target),
            Err(e) => {
                warn!("check your targets file: {}", e);
                break;
            }
        }
    }
    targets
}

/// Dispatch one update per target concurrently and collect every outcome
///
/// One task is spawned per target; each produces exactly one outcome into
/// the channel. The collector blocks on `recv` until all senders are done,
/// so the call returns only once the slowest target has completed. There
/// is no early exit, no cancellation, and no ordering guarantee beyond
/// arrival order.
pub async fn dispatch_all(
    client: Arc<dyn UpdateClient>,
    targets: Vec<UpdateTarget>,
    address: IpAddr,
) -> Vec<UpdateOutcome> {
    let expected = targets.len();
    let (tx, mut rx) = mpsc::channel::<UpdateOutcome>(expected.max(1));

    for target in targets {
        let tx = tx.clone();
        let client = Arc::clone(&client);
        tokio::spawn(async move {
            let name = target.record_name.clone();
            let outcome = match client.push_update(&target, address).await {
                Ok(status) => UpdateOutcome::Accepted {
                    target: name,
                    status,
                },
                Err(e) => UpdateOutcome::Failed {
                    target: name,
                    error: e.to_string(),
                },
            };
            // The collector only disappears if the whole run was dropped.
            let _ = tx.send(outcome).await;
        });
    }
    drop(tx);

    // Blocking fan-in: the channel closes once every task has sent its
    // outcome, which yields exactly one outcome per dispatched target.
    let mut outcomes = Vec::with_capacity(expected);
    while let Some(outcome) = rx.recv().await {
        outcomes.push(outcome);
    }
    outcomes
}
