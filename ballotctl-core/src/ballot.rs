//! Ballot records and the identifiers a session carries

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Wallet address of the current user.
///
/// The view never validates addresses; an empty address means the wallet
/// is not connected. Comparison is case-insensitive so that checksummed and
/// lowercase renderings of the same account are treated as one identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lowercased form used for lookups
    pub fn normalized(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for Address {}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Address {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Address::new(s))
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Address::new(s)
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Address::new(s)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

/// Opaque handle to an established contract connection.
///
/// Only its presence matters to the view; the string is whatever the
/// connecting wallet reported (usually the contract address).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractHandle(String);

impl ContractHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContractHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single ballot as returned by the provider.
///
/// The structure is defined by the contract, so the record is kept as raw
/// JSON and passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BallotRecord(serde_json::Value);

impl BallotRecord {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }

    /// Best-effort identifier for display (`id`, `pId` or `ballotId`)
    pub fn id(&self) -> Option<String> {
        ["id", "pId", "ballotId"]
            .iter()
            .find_map(|key| self.0.get(*key))
            .map(|v| match v {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
    }

    /// Best-effort human label for display (`title` or `name`)
    pub fn label(&self) -> Option<&str> {
        ["title", "name"]
            .iter()
            .find_map(|key| self.0.get(*key).and_then(|v| v.as_str()))
    }

    /// Best-effort secondary line for display
    pub fn description(&self) -> Option<&str> {
        self.0.get("description").and_then(|v| v.as_str())
    }
}

impl From<serde_json::Value> for BallotRecord {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn address_compares_case_insensitively() {
        assert_eq!(Address::new("0xABC"), Address::new("0xabc"));
        assert_ne!(Address::new("0xABC"), Address::new("0xABD"));
        assert_eq!(Address::new("  0xabc \n").as_str(), "0xabc");
    }

    #[test]
    fn deserialized_address_is_trimmed() {
        let address: Address = serde_json::from_value(json!(" 0xABC\n")).unwrap();
        assert_eq!(address, Address::new("0xabc"));
        assert_eq!(address.as_str(), "0xABC");
        assert_eq!(serde_json::to_value(&address).unwrap(), json!("0xABC"));
    }

    #[test]
    fn default_address_is_disconnected() {
        assert!(Address::default().is_empty());
    }

    #[test]
    fn record_display_helpers() {
        let record = BallotRecord::new(json!({
            "pId": 7,
            "title": "Treasury allocation",
            "description": "Q3 budget"
        }));
        assert_eq!(record.id().as_deref(), Some("7"));
        assert_eq!(record.label(), Some("Treasury allocation"));
        assert_eq!(record.description(), Some("Q3 budget"));

        let bare = BallotRecord::new(json!([1, 2]));
        assert!(bare.id().is_none());
        assert!(bare.label().is_none());
    }

    #[test]
    fn record_serializes_transparently() {
        let raw = json!({"id": 1, "owner": "0xabc"});
        let record: BallotRecord = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&record).unwrap(), raw);
    }
}
