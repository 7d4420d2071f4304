/// Structured error types for ballotctl-core library.
///
/// Uses `thiserror` for better API surface and error composition.
/// The binary crate (ballotctl-cli) uses `anyhow` for convenience,
/// but library consumers get structured, composable errors.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// Main error type for ballotctl-core operations
#[derive(Error, Debug)]
pub enum BallotError {
    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// JSON parsing or serialization failed
    #[error("JSON error at {context}: {source}")]
    Json {
        context: String,
        source: serde_json::Error,
    },

    /// The ballot provider could not answer
    #[error("Ballot provider failed: {reason}")]
    Provider { reason: String },

    /// Ballot fixture file does not exist
    #[error("Ballot file not found: {path:?}")]
    BallotFileNotFound { path: PathBuf },

    /// Configuration error
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    /// A display collaborator failed to render
    #[error("Display error: {reason}")]
    Display { reason: String },
}

/// Result type alias for ballotctl-core operations
pub type Result<T> = std::result::Result<T, BallotError>;

impl BallotError {
    /// Create a JSON error with context
    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }

    /// Create a provider error
    pub fn provider(reason: impl Into<String>) -> Self {
        Self::Provider {
            reason: reason.into(),
        }
    }

    /// Create a ballot file not found error
    pub fn ballot_file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::BallotFileNotFound { path: path.into() }
    }

    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Create a display error
    pub fn display(reason: impl Into<String>) -> Self {
        Self::Display {
            reason: reason.into(),
        }
    }
}

/// Why a fetch cycle ended without new ballots.
///
/// This is what the display collaborator sees; it is cloneable and
/// serializable, unlike [`BallotError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FetchFailure {
    /// The provider returned an error
    Provider(String),
    /// The provider did not settle within the configured timeout
    TimedOut(#[serde(with = "duration_secs")] Duration),
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchFailure::Provider(reason) => write!(f, "{}", reason),
            FetchFailure::TimedOut(after) => {
                write!(f, "no answer from provider after {:.1}s", after.as_secs_f64())
            }
        }
    }
}

impl From<&BallotError> for FetchFailure {
    fn from(err: &BallotError) -> Self {
        FetchFailure::Provider(err.to_string())
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }
}
