//! Ballot providers that do not talk to a chain
//!
//! `FileBallotProvider` reads a JSON fixture of the form
//! `{ "<address>": [ <ballot>, ... ] }` and is what the CLI uses.
//! `StaticBallotProvider` keeps the same mapping in memory.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, trace};

use crate::ballot::{Address, BallotRecord};
use crate::error::{BallotError, Result};
use crate::session::BallotProvider;

type BallotIndex = BTreeMap<String, Vec<BallotRecord>>;

fn lookup(index: &BallotIndex, address: &Address) -> Vec<BallotRecord> {
    index
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(address.as_str()))
        .map(|(_, ballots)| ballots.clone())
        .unwrap_or_default()
}

/// Provider backed by a JSON file, re-read on every request
#[derive(Debug, Clone)]
pub struct FileBallotProvider {
    path: PathBuf,
    latency: Option<Duration>,
}

impl FileBallotProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            latency: None,
        }
    }

    /// Delay every answer, to make loading states visible
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency).filter(|d| !d.is_zero());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_index(&self) -> Result<BallotIndex> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(BallotError::ballot_file_not_found(&self.path));
            }
            Err(err) => return Err(err.into()),
        };

        serde_json::from_str(&content)
            .map_err(|err| BallotError::json(self.path.display().to_string(), err))
    }

    /// Addresses present in the file, in sorted order
    pub async fn known_addresses(&self) -> Result<Vec<Address>> {
        Ok(self.read_index().await?.into_keys().map(Address::new).collect())
    }
}

#[async_trait]
impl BallotProvider for FileBallotProvider {
    fn name(&self) -> &str {
        "file"
    }

    async fn user_ballots(&self, address: &Address) -> Result<Vec<BallotRecord>> {
        if let Some(latency) = self.latency {
            trace!(?latency, "simulating provider latency");
            tokio::time::sleep(latency).await;
        }

        let index = self.read_index().await?;
        let ballots = lookup(&index, address);
        debug!(
            path = %self.path.display(),
            address = %address,
            count = ballots.len(),
            "read ballots from file"
        );
        Ok(ballots)
    }
}

/// In-memory provider
#[derive(Debug, Clone, Default)]
pub struct StaticBallotProvider {
    index: BallotIndex,
}

impl StaticBallotProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: register the ballots for an address
    pub fn with_ballots(mut self, address: impl Into<Address>, ballots: Vec<BallotRecord>) -> Self {
        self.index.insert(address.into().normalized(), ballots);
        self
    }
}

#[async_trait]
impl BallotProvider for StaticBallotProvider {
    fn name(&self) -> &str {
        "static"
    }

    async fn user_ballots(&self, address: &Address) -> Result<Vec<BallotRecord>> {
        Ok(lookup(&self.index, address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn fixture(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn reads_ballots_for_address_in_file_order() {
        let file = fixture(r#"{"0xAbC": [{"id": 2}, {"id": 1}], "0xdef": []}"#);
        let provider = FileBallotProvider::new(file.path());

        let ballots = provider.user_ballots(&Address::new("0xabc")).await.unwrap();
        let ids: Vec<_> = ballots.iter().filter_map(|b| b.id()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[tokio::test]
    async fn unknown_address_is_empty() {
        let file = fixture(r#"{"0xabc": [{"id": 1}]}"#);
        let provider = FileBallotProvider::new(file.path());

        let ballots = provider.user_ballots(&Address::new("0x999")).await.unwrap();
        assert!(ballots.is_empty());
    }

    #[tokio::test]
    async fn malformed_file_is_an_error() {
        let file = fixture("{ not json");
        let provider = FileBallotProvider::new(file.path());

        let err = provider.user_ballots(&Address::new("0xabc")).await.unwrap_err();
        assert!(matches!(err, BallotError::Json { .. }));
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FileBallotProvider::new(dir.path().join("absent.json"));

        let err = provider.user_ballots(&Address::new("0xabc")).await.unwrap_err();
        assert!(matches!(err, BallotError::BallotFileNotFound { .. }));
    }

    #[tokio::test]
    async fn picks_up_edits_between_calls() {
        let file = fixture(r#"{"0xabc": []}"#);
        let provider = FileBallotProvider::new(file.path());
        let address = Address::new("0xabc");
        assert!(provider.user_ballots(&address).await.unwrap().is_empty());

        std::fs::write(file.path(), r#"{"0xabc": [{"id": 9}]}"#).unwrap();
        assert_eq!(provider.user_ballots(&address).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn known_addresses_are_sorted() {
        let file = fixture(r#"{"0xb": [], "0xa": []}"#);
        let provider = FileBallotProvider::new(file.path());

        let addresses = provider.known_addresses().await.unwrap();
        assert_eq!(addresses, vec![Address::new("0xa"), Address::new("0xb")]);
    }

    #[tokio::test]
    async fn static_provider_lookup() {
        let provider = StaticBallotProvider::new()
            .with_ballots("0xABC", vec![json!({"id": 1}).into()]);

        assert_eq!(provider.user_ballots(&Address::new("0xabc")).await.unwrap().len(), 1);
        assert!(provider.user_ballots(&Address::new("")).await.unwrap().is_empty());
    }
}
