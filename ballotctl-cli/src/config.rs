use std::path::PathBuf;

use anyhow::{Context, Result};
use ballotctl_core::BallotctlConfig;
use clap::{Parser, Subcommand};

use crate::session::load_config;

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show config file path
    Path,
    /// Print the effective config as TOML
    Show,
    /// Write a default config file
    Init(InitArgs),
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Force overwrite existing config
    #[arg(long, short)]
    pub force: bool,
}

pub fn run_config(args: ConfigArgs, config_path: Option<&PathBuf>) -> Result<()> {
    match args.command {
        ConfigCommands::Path => run_path(config_path),
        ConfigCommands::Show => run_show(config_path),
        ConfigCommands::Init(args) => run_init(args, config_path),
    }
}

fn target_path(config_path: Option<&PathBuf>) -> PathBuf {
    config_path.cloned().unwrap_or_else(BallotctlConfig::config_path)
}

fn run_path(config_path: Option<&PathBuf>) -> Result<()> {
    println!("{}", target_path(config_path).display());
    Ok(())
}

fn run_show(config_path: Option<&PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    print!("{}", config.to_toml_string()?);
    Ok(())
}

fn run_init(args: InitArgs, config_path: Option<&PathBuf>) -> Result<()> {
    let path = target_path(config_path);

    if path.exists() && !args.force {
        return Err(anyhow::anyhow!(
            "Config already exists at {:?}\n\nUse --force to overwrite",
            path
        ));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let content = BallotctlConfig::default().to_toml_string()?;
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Wrote default config to {}", path.display());
    Ok(())
}
