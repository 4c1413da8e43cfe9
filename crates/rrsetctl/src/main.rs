// # rrsetctl - Record Set Control
//
// Runs one lifecycle operation on one record set described by a JSON state
// file, then exits.
//
// This binary is a THIN integration layer: it reads configuration, sets up
// logging and the runtime, and hands the state file to `RecordSetManager`.
// Translation, convergence and state handling all live in rrset-core.
//
// ## Configuration
//
// Flags take precedence over environment variables:
//
// - `--api-url` / `RRSET_API_URL`: VinylDNS API base URL (required)
// - `--api-token` / `RRSET_API_TOKEN`: Bearer token (optional)
// - `--log-level` / `RRSET_LOG_LEVEL`: trace, debug, info, warn, error
// - `--http-timeout-secs` / `RRSET_HTTP_TIMEOUT_SECS`
// - `--timeout-secs` / `RRSET_CONVERGENCE_TIMEOUT_SECS`
// - `--min-interval-secs` / `RRSET_CONVERGENCE_MIN_INTERVAL_SECS`
//
// ## Example
//
// ```bash
// export RRSET_API_URL=https://vinyldns.example.com
// rrsetctl create --state www.rrset.json
// rrsetctl delete --state www.rrset.json
// ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rrset_core::{
    ClientConfig, ConvergenceConfig, FileResourceState, RecordSetManager, ResourceState,
    RrsetConfig, SystemClock,
};
use rrset_vinyldns::VinylDnsClient;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RrsetExitCode {
    /// Operation completed
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// The operation failed or was interrupted
    OperationFailed = 2,
}

impl From<RrsetExitCode> for ExitCode {
    fn from(code: RrsetExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Debug, Parser)]
#[command(name = "rrsetctl")]
#[command(about = "Create, read, update and delete DNS record sets", long_about = None)]
#[command(version)]
struct Cli {
    /// VinylDNS API base URL
    #[arg(long, env = "RRSET_API_URL", global = true)]
    api_url: Option<String>,

    /// Bearer token for the API
    #[arg(long, env = "RRSET_API_TOKEN", global = true, hide_env_values = true)]
    api_token: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RRSET_LOG_LEVEL", default_value = "info", global = true)]
    log_level: String,

    /// Per-request HTTP timeout in seconds
    #[arg(long, env = "RRSET_HTTP_TIMEOUT_SECS", global = true)]
    http_timeout_secs: Option<u64>,

    /// Give up waiting for a change after this many seconds
    #[arg(long, env = "RRSET_CONVERGENCE_TIMEOUT_SECS", global = true)]
    timeout_secs: Option<u64>,

    /// Minimum seconds between change lookups
    #[arg(long, env = "RRSET_CONVERGENCE_MIN_INTERVAL_SECS", global = true)]
    min_interval_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create the record set and record its id in the state file
    Create {
        /// Record set state file
        #[arg(long)]
        state: PathBuf,
    },

    /// Refresh the state file from the server
    Read {
        /// Record set state file
        #[arg(long)]
        state: PathBuf,
    },

    /// Apply the state file to the existing record set
    Update {
        /// Record set state file
        #[arg(long)]
        state: PathBuf,
    },

    /// Delete the record set and remove its id from the state file
    Delete {
        /// Record set state file
        #[arg(long)]
        state: PathBuf,
    },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Create { .. } => "create",
            Command::Read { .. } => "read",
            Command::Update { .. } => "update",
            Command::Delete { .. } => "delete",
        }
    }

    fn state_path(&self) -> &PathBuf {
        match self {
            Command::Create { state }
            | Command::Read { state }
            | Command::Update { state }
            | Command::Delete { state } => state,
        }
    }
}

impl Cli {
    /// Build and validate the library configuration
    fn config(&self) -> Result<RrsetConfig> {
        let api_url = self
            .api_url
            .clone()
            .filter(|url| !url.is_empty())
            .context("API URL is required. Set it via --api-url or RRSET_API_URL")?;

        let mut client = ClientConfig::new(api_url);
        client.api_token = self.api_token.clone();
        if let Some(secs) = self.http_timeout_secs {
            client.http_timeout_secs = secs;
        }

        let mut convergence = ConvergenceConfig::default();
        if let Some(secs) = self.timeout_secs {
            convergence.timeout_secs = secs;
        }
        if let Some(secs) = self.min_interval_secs {
            convergence.min_interval_secs = secs;
        }

        let config = RrsetConfig {
            client,
            convergence,
        };
        config.validate()?;
        Ok(config)
    }
}

fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "Log level '{}' is not valid. Valid levels: trace, debug, info, warn, error",
            level
        ),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match parse_log_level(&cli.log_level) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return RrsetExitCode::ConfigError.into();
        }
    };

    let config = match cli.config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return RrsetExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return RrsetExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return RrsetExitCode::ConfigError.into();
        }
    };

    rt.block_on(async {
        tokio::select! {
            result = run(&cli.command, config) => match result {
                Ok(()) => RrsetExitCode::Success,
                Err(e) => {
                    error!("{} failed: {:#}", cli.command.name(), e);
                    RrsetExitCode::OperationFailed
                }
            },
            _ = tokio::signal::ctrl_c() => {
                // Dropping the operation abandons the wait; nothing on the
                // server is rolled back.
                error!("Interrupted; {} abandoned", cli.command.name());
                RrsetExitCode::OperationFailed
            }
        }
    })
    .into()
}

/// Run one operation against the state file
async fn run(command: &Command, config: RrsetConfig) -> Result<()> {
    let path = command.state_path();
    let state = FileResourceState::open(path)
        .await
        .with_context(|| format!("Failed to open state file {}", path.display()))?;

    let api = Arc::new(VinylDnsClient::from_config(&config.client)?);
    info!("Using VinylDNS API at {}", api.base_url());

    let manager = RecordSetManager::new(api, Arc::new(SystemClock), config.convergence)?;

    match command {
        Command::Create { .. } => manager.create(&state).await?,
        Command::Read { .. } => manager.read(&state).await?,
        Command::Update { .. } => manager.update(&state).await?,
        Command::Delete { .. } => manager.delete(&state).await?,
    }

    match state.id().await? {
        Some(id) => info!("{} complete, record set id {}", command.name(), id),
        None => info!("{} complete, record set has no id", command.name()),
    }
    Ok(())
}
