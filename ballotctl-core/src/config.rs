use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::ballot::{Address, ContractHandle};
use crate::error::{BallotError, Result};
use crate::session::SessionSnapshot;
use crate::view::DEFAULT_TITLE;

/// Configuration for ballotctl, read from ~/.ballotctl/config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BallotctlConfig {
    pub view: ViewConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub title: String,
    /// Give up on the provider after this many seconds (unset: wait forever)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_timeout_secs: Option<f64>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            fetch_timeout_secs: None,
        }
    }
}

impl ViewConfig {
    /// Timeout as a duration; zero, negative and non-finite values mean none
    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_secs
            .filter(|secs| *secs > 0.0)
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract: Option<String>,
    /// JSON fixture mapping addresses to ballots
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ballots_file: Option<PathBuf>,
    /// Artificial provider delay in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

impl SessionConfig {
    /// Initial session state described by this config
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::new(
            self.address.as_deref().map(Address::new).unwrap_or_default(),
            self.contract
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(ContractHandle::new),
        )
    }

    pub fn latency(&self) -> Option<Duration> {
        self.latency_ms.map(Duration::from_millis)
    }
}

impl BallotctlConfig {
    /// Load config from the default location.
    ///
    /// A missing file is not an error; defaults apply.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load config from an explicit path, which must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(BallotError::config(format!(
                "config not found at {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content)
            .map_err(|err| BallotError::config(format!("invalid TOML: {}", err)))?;
        config.expand_variables();
        Ok(config)
    }

    /// Config file path: $BALLOTCTL_CONFIG or ~/.ballotctl/config.toml
    pub fn config_path() -> PathBuf {
        if let Ok(path) = env::var("BALLOTCTL_CONFIG") {
            if !path.is_empty() {
                return PathBuf::from(path);
            }
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".ballotctl/config.toml")
    }

    /// Serialize back to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|err| BallotError::config(format!("cannot serialize config: {}", err)))
    }

    /// Expand ~ and ${HOME} in paths
    fn expand_variables(&mut self) {
        if let Some(ref file) = self.session.ballots_file {
            self.session.ballots_file = Some(expand_home(file));
        }
    }
}

fn expand_home(path: &Path) -> PathBuf {
    let home = match dirs::home_dir() {
        Some(home) => home,
        None => return path.to_path_buf(),
    };

    let raw = path.to_string_lossy();
    if raw == "~" {
        return home;
    }
    if let Some(rest) = raw.strip_prefix("~/") {
        return home.join(rest);
    }
    PathBuf::from(raw.replace("${HOME}", &home.to_string_lossy()))
}
