//! Turning flags + config into a session the view can read from

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use ballotctl_core::{BallotctlConfig, FileBallotProvider, SessionContext};
use clap::Args;
use tracing::debug;

/// Flags shared by every command that mounts the ballots view
#[derive(Args, Debug, Clone, Default)]
pub struct SessionArgs {
    /// Wallet address whose ballots are shown
    #[arg(long, env = "BALLOTCTL_ADDRESS")]
    pub address: Option<String>,

    /// Contract handle; without one nothing is fetched
    #[arg(long, env = "BALLOTCTL_CONTRACT")]
    pub contract: Option<String>,

    /// JSON file mapping addresses to ballots
    #[arg(long = "ballots", value_name = "PATH", env = "BALLOTCTL_BALLOTS")]
    pub ballots_file: Option<PathBuf>,

    /// Delay every provider answer by this many milliseconds
    #[arg(long, value_name = "MS")]
    pub latency_ms: Option<u64>,

    /// Give up on the provider after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<f64>,
}

/// Everything a command needs to build a view
pub struct ResolvedSession {
    pub config: BallotctlConfig,
    pub provider: Arc<FileBallotProvider>,
    pub session: Arc<SessionContext>,
}

/// Load config (explicit path or default location)
pub fn load_config(path: Option<&PathBuf>) -> Result<BallotctlConfig> {
    match path {
        Some(path) => BallotctlConfig::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => BallotctlConfig::load().context("Failed to load config"),
    }
}

/// Apply command-line overrides on top of the config file
pub fn apply_overrides(config: &mut BallotctlConfig, args: &SessionArgs) {
    if let Some(ref address) = args.address {
        config.session.address = Some(address.clone());
    }
    if let Some(ref contract) = args.contract {
        config.session.contract = Some(contract.clone());
    }
    if let Some(ref file) = args.ballots_file {
        config.session.ballots_file = Some(file.clone());
    }
    if args.latency_ms.is_some() {
        config.session.latency_ms = args.latency_ms;
    }
    if args.timeout.is_some() {
        config.view.fetch_timeout_secs = args.timeout;
    }
}

impl ResolvedSession {
    pub fn resolve(config_path: Option<&PathBuf>, args: &SessionArgs) -> Result<Self> {
        let mut config = load_config(config_path)?;
        apply_overrides(&mut config, args);

        let ballots_file = config.session.ballots_file.clone().context(
            "No ballots file configured\n\nPass --ballots <PATH> or set session.ballots_file in the config",
        )?;

        let mut provider = FileBallotProvider::new(ballots_file);
        if let Some(latency) = config.session.latency() {
            provider = provider.with_latency(latency);
        }
        let provider = Arc::new(provider);

        let snapshot = config.session.snapshot();
        debug!(
            address = %snapshot.address,
            contract = ?snapshot.contract,
            ballots = %provider.path().display(),
            "session resolved"
        );
        let session = Arc::new(SessionContext::with_snapshot(provider.clone(), snapshot));

        Ok(Self {
            config,
            provider,
            session,
        })
    }
}
