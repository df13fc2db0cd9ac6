// # ipsyncd - scheduled dynamic-DNS update agent
//
// One invocation performs one detection-and-fan-out run and exits; the
// schedule lives outside the process (cron, a systemd timer) with enough
// spacing that invocations never overlap. All sequencing logic is in
// ipsync-core; this binary only:
//
// 1. Resolves configuration from environment variables
// 2. Initializes tracing and the tokio runtime
// 3. Wires the HTTP lookup source, the dyndns2 client, and the file stores
//    into the engine
// 4. Maps the run result to an exit code
//
// ## Configuration
//
// - `IPSYNC_LOOKUP_URL`: address-lookup service (default: http://checkip.spdyn.de)
// - `IPSYNC_UPDATE_VHOST`: Host header for update requests (default: update.spdyn.de)
// - `IPSYNC_TARGETS_PATH`: target record sequence (default: targets.json)
// - `IPSYNC_ADDRESS_PATH`: last-known-address record (default: last_address)
// - `IPSYNC_HTTP_TIMEOUT_SECS`: optional bound per HTTP request; unset
//   preserves the unbounded wait
// - `IPSYNC_LOG_LEVEL`: trace|debug|info|warn|error (default: info)
//
// ## Exit codes
//
// - 0: run completed (updated) or no-op (address unchanged)
// - 1: configuration error
// - 2: fatal run failure (lookup, target source, or persistence)
//
// Per-target update failures are reported in the log but do not change
// the exit code; the new address is persisted regardless.

use anyhow::Result;
use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use ipsync_core::{
    FileAddressStore, FileTargetSource, RunReport, SyncConfig, SyncEngine,
    config::{DEFAULT_LOOKUP_URL, DEFAULT_UPDATE_VHOST},
};
use ipsync_lookup_http::HttpAddressSource;
use ipsync_update_dyndns2::Dyndns2Client;

/// Exit codes for the different termination scenarios
#[derive(Debug, Clone, Copy)]
enum AgentExitCode {
    /// Run completed or was a no-op
    Clean = 0,
    /// Configuration error
    ConfigError = 1,
    /// Fatal run failure
    RunError = 2,
}

impl From<AgentExitCode> for ExitCode {
    fn from(code: AgentExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration resolved from the environment
struct Config {
    lookup_url: String,
    update_vhost: String,
    targets_path: String,
    address_path: String,
    http_timeout_secs: Option<u64>,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let http_timeout_secs = match env::var("IPSYNC_HTTP_TIMEOUT_SECS").ok() {
            Some(raw) => Some(raw.parse::<u64>().map_err(|_| {
                anyhow::anyhow!("IPSYNC_HTTP_TIMEOUT_SECS must be a number of seconds, got '{raw}'")
            })?),
            None => None,
        };

        Ok(Self {
            lookup_url: env::var("IPSYNC_LOOKUP_URL")
                .unwrap_or_else(|_| DEFAULT_LOOKUP_URL.to_string()),
            update_vhost: env::var("IPSYNC_UPDATE_VHOST")
                .unwrap_or_else(|_| DEFAULT_UPDATE_VHOST.to_string()),
            targets_path: env::var("IPSYNC_TARGETS_PATH")
                .unwrap_or_else(|_| "targets.json".to_string()),
            address_path: env::var("IPSYNC_ADDRESS_PATH")
                .unwrap_or_else(|_| "last_address".to_string()),
            http_timeout_secs,
            log_level: env::var("IPSYNC_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "IPSYNC_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        if let Some(0) = self.http_timeout_secs {
            anyhow::bail!("IPSYNC_HTTP_TIMEOUT_SECS must be > 0 when set (unset = no timeout)");
        }

        // Engine-side checks (URL scheme, empty paths) run on the same
        // values again via SyncConfig::validate.
        self.to_sync_config().validate()?;

        Ok(())
    }

    /// Build the engine configuration
    fn to_sync_config(&self) -> SyncConfig {
        let mut config = SyncConfig::new(&self.targets_path, &self.address_path)
            .with_lookup_url(&self.lookup_url)
            .with_update_vhost(&self.update_vhost);
        if let Some(secs) = self.http_timeout_secs {
            config = config.with_http_timeout(Duration::from_secs(secs));
        }
        config
    }
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return AgentExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return AgentExitCode::ConfigError.into();
    }

    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return AgentExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return AgentExitCode::RunError.into();
        }
    };

    rt.block_on(async {
        match run_agent(&config).await {
            Ok(report) => {
                summarize(&report);
                AgentExitCode::Clean
            }
            Err(e) => {
                error!("run failed: {}", e);
                AgentExitCode::RunError
            }
        }
    })
    .into()
}

/// Wire the components and perform one run
async fn run_agent(config: &Config) -> Result<RunReport, ipsync_core::Error> {
    let sync_config = config.to_sync_config();

    let source = HttpAddressSource::new(&sync_config.lookup_url, sync_config.http_timeout)?;
    let store = FileAddressStore::new(&sync_config.address_path);
    let client = Dyndns2Client::new(&sync_config.update_vhost, sync_config.http_timeout);
    let targets = FileTargetSource::new(&sync_config.targets_path);

    let engine = SyncEngine::new(
        Box::new(source),
        Box::new(store),
        Arc::new(client),
        Box::new(targets),
    );

    engine.run().await
}

/// Log the run result; per-target lines were already emitted in arrival order
fn summarize(report: &RunReport) {
    if let RunReport::Updated {
        address, outcomes, ..
    } = report
    {
        let failed = outcomes.iter().filter(|o| !o.is_accepted()).count();
        info!(
            address = %address,
            targets = outcomes.len(),
            failed,
            "new address persisted"
        );
    }
}
