//! Session context: who is connected, to which contract, and how to ask
//! for their ballots.
//!
//! The context is an ordinary value handed to each view (usually behind an
//! `Arc`). Views subscribe to it instead of reading ambient state, so a
//! change of address or contract reaches them as an explicit notification.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::debug;

use crate::ballot::{Address, BallotRecord, ContractHandle};
use crate::error::Result;

/// Answers "which ballots belong to this address"
#[async_trait]
pub trait BallotProvider: Send + Sync {
    /// Short name for logs and status lines
    fn name(&self) -> &str;

    /// Fetch the ballots associated with `address`, in provider order
    async fn user_ballots(&self, address: &Address) -> Result<Vec<BallotRecord>>;
}

/// Point-in-time view of the session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Current wallet address (empty when no wallet is connected)
    pub address: Address,
    /// Contract connection, if one is established
    pub contract: Option<ContractHandle>,
}

impl SessionSnapshot {
    pub fn new(address: Address, contract: Option<ContractHandle>) -> Self {
        Self { address, contract }
    }

    /// Whether a contract connection is present (this gates fetching)
    pub fn has_contract(&self) -> bool {
        self.contract.is_some()
    }
}

/// Shared session state plus the provider used to query it
pub struct SessionContext {
    state: watch::Sender<SessionSnapshot>,
    provider: Arc<dyn BallotProvider>,
}

impl SessionContext {
    /// Create a disconnected session backed by `provider`
    pub fn new(provider: Arc<dyn BallotProvider>) -> Self {
        Self::with_snapshot(provider, SessionSnapshot::default())
    }

    /// Create a session with an initial address/contract
    pub fn with_snapshot(provider: Arc<dyn BallotProvider>, snapshot: SessionSnapshot) -> Self {
        let (state, _) = watch::channel(snapshot);
        Self { state, provider }
    }

    /// Current address and contract
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    /// Receive a notification whenever the address or contract changes
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    /// Name of the backing provider
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Switch the current address. Returns false if it was already current.
    pub fn set_address(&self, address: Address) -> bool {
        let changed = self.state.send_if_modified(|snapshot| {
            if snapshot.address == address {
                return false;
            }
            snapshot.address = address.clone();
            true
        });
        if changed {
            debug!(address = %address, "session address changed");
        }
        changed
    }

    /// Record an established contract connection. Returns false if the same
    /// handle was already connected.
    pub fn connect_contract(&self, handle: ContractHandle) -> bool {
        let changed = self.state.send_if_modified(|snapshot| {
            if snapshot.contract.as_ref() == Some(&handle) {
                return false;
            }
            snapshot.contract = Some(handle.clone());
            true
        });
        if changed {
            debug!(contract = %handle, "contract connected");
        }
        changed
    }

    /// Drop the contract connection. Returns false if none was connected.
    pub fn disconnect_contract(&self) -> bool {
        let changed = self.state.send_if_modified(|snapshot| snapshot.contract.take().is_some());
        if changed {
            debug!("contract disconnected");
        }
        changed
    }

    /// Ask the provider for the ballots of `address`
    pub async fn user_ballots(&self, address: &Address) -> Result<Vec<BallotRecord>> {
        self.provider.user_ballots(address).await
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("snapshot", &*self.state.borrow())
            .field("provider", &self.provider.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::StaticBallotProvider;

    fn session() -> SessionContext {
        SessionContext::new(Arc::new(StaticBallotProvider::new()))
    }

    #[test]
    fn starts_disconnected() {
        let session = session();
        let snapshot = session.snapshot();
        assert!(snapshot.address.is_empty());
        assert!(!snapshot.has_contract());
    }

    #[test]
    fn setters_report_only_real_changes() {
        let session = session();
        let mut rx = session.subscribe();

        assert!(session.set_address(Address::new("0xABC")));
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();

        // Same account, different casing
        assert!(!session.set_address(Address::new("0xabc")));
        assert!(!rx.has_changed().unwrap());

        assert!(session.connect_contract(ContractHandle::new("0xC0FFEE")));
        assert!(!session.connect_contract(ContractHandle::new("0xC0FFEE")));
        assert!(session.disconnect_contract());
        assert!(!session.disconnect_contract());
    }

    #[tokio::test]
    async fn delegates_to_provider() {
        let provider = StaticBallotProvider::new()
            .with_ballots("0xabc", vec![serde_json::json!({"id": 1}).into()]);
        let session = SessionContext::new(Arc::new(provider));

        let ballots = session.user_ballots(&Address::new("0xABC")).await.unwrap();
        assert_eq!(ballots.len(), 1);
        assert_eq!(session.provider_name(), "static");
    }
}
