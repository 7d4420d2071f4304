mod config;
mod render;
mod session;
mod tracing_setup;
mod tui;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use ballotctl_core::{
    drive_display, DisplayCampaigns, FetchOutcome, MountedView, UserBallotsView,
};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};

use crate::config::ConfigArgs;
use crate::render::{JsonDisplay, TextDisplay};
use crate::session::{ResolvedSession, SessionArgs};
use crate::tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "ballotctl",
    author,
    version,
    about = "Show the ballots belonging to a wallet address",
    long_about = "Fetch the ballots a contract reports for the session's address and render them \
                  as text, JSON, a live stream, or a terminal UI."
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file (defaults to ~/.ballotctl/config.toml)
    #[arg(long, global = true, value_name = "PATH", env = "BALLOTCTL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch once and print the ballots
    List(ListArgs),
    /// Keep the view mounted and print every update
    Watch(WatchArgs),
    /// Interactive terminal UI
    Tui(TuiArgs),
    /// Inspect or create the config file
    Config(ConfigArgs),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
struct ListArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Parser, Debug)]
struct WatchArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// Output format (json prints one object per line)
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Re-fetch every SECS seconds
    #[arg(long, value_name = "SECS")]
    interval: Option<f64>,
}

#[derive(Parser, Debug)]
struct TuiArgs {
    #[command(flatten)]
    session: SessionArgs,
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_setup::init(&TracingConfig {
        debug: cli.debug,
        quiet: matches!(cli.command, Commands::Tui(_)),
    })
    .ok();

    let config_path = cli.config.as_ref();

    match cli.command {
        Commands::List(args) => run_list(args, config_path).await?,
        Commands::Watch(args) => run_watch(args, config_path).await?,
        Commands::Tui(args) => {
            let resolved = ResolvedSession::resolve(config_path, &args.session)?;
            tui::run(resolved).await?
        }
        Commands::Config(args) => config::run_config(args, config_path)?,
        Commands::Completions(args) => run_completions(args)?,
    }

    Ok(())
}

async fn run_list(args: ListArgs, config_path: Option<&PathBuf>) -> Result<()> {
    let resolved = ResolvedSession::resolve(config_path, &args.session)?;
    let view = UserBallotsView::new(resolved.session.clone(), &resolved.config.view);

    let outcome = view.fetch().await;
    if outcome == FetchOutcome::Skipped {
        warn!("no contract connected; nothing was fetched");
    }

    let stdout = io::stdout();
    let mut display: Box<dyn DisplayCampaigns> = match args.format {
        OutputFormat::Text => Box::new(TextDisplay::new(stdout.lock())),
        OutputFormat::Json => Box::new(JsonDisplay::pretty(stdout.lock())),
    };
    view.render_to(display.as_mut())
        .context("Failed to write ballots")?;

    match outcome {
        FetchOutcome::Failed(failure) => Err(anyhow!("ballot fetch failed: {}", failure)),
        _ => Ok(()),
    }
}

async fn run_watch(args: WatchArgs, config_path: Option<&PathBuf>) -> Result<()> {
    let resolved = ResolvedSession::resolve(config_path, &args.session)?;
    let interval = match args.interval {
        Some(secs) if secs > 0.0 => Some(
            Duration::try_from_secs_f64(secs)
                .map_err(|err| anyhow!("invalid --interval {}: {}", secs, err))?,
        ),
        _ => None,
    };

    let view = Arc::new(UserBallotsView::new(
        resolved.session.clone(),
        &resolved.config.view,
    ));
    let mounted = view.mount();

    let stdout = io::stdout();
    let mut display: Box<dyn DisplayCampaigns> = match args.format {
        OutputFormat::Text => Box::new(TextDisplay::new(stdout.lock())),
        OutputFormat::Json => Box::new(JsonDisplay::lines(stdout.lock())),
    };

    info!(provider = resolved.session.provider_name(), "watching ballots (Ctrl-C to stop)");

    let result = tokio::select! {
        rendered = drive_display(mounted.subscribe(), display.as_mut()) => {
            rendered.context("Failed to write ballots")
        }
        _ = refresh_every(&mounted, interval) => Ok(()),
        signal = tokio::signal::ctrl_c() => signal.context("Failed to listen for Ctrl-C"),
    };

    mounted.unmount();
    result
}

/// Ask the mounted view to re-fetch on a fixed period; never resolves
/// without one.
async fn refresh_every(mounted: &MountedView, interval: Option<Duration>) {
    let Some(period) = interval else {
        return std::future::pending().await;
    };

    let mut ticker = tokio::time::interval(period);
    // The mount already fetched; skip the immediate first tick
    ticker.tick().await;
    loop {
        ticker.tick().await;
        if !mounted.refresh() {
            return std::future::pending().await;
        }
    }
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}
