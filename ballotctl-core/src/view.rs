//! The user ballots view
//!
//! Bridges the session (address + contract) to a ballot fetch and publishes
//! the props a display collaborator renders: a static title, a loading flag,
//! the fetched ballots and the last fetch failure.
//!
//! Every fetch is tagged with a token from a monotonically increasing
//! counter. A result is only applied if its token is still the latest one
//! issued, so when fetches overlap the most recently *issued* one wins no
//! matter which settles first. The mounted driver additionally aborts
//! superseded fetch tasks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, info, trace, warn};

use crate::ballot::{Address, BallotRecord};
use crate::config::ViewConfig;
use crate::display::DisplayCampaigns;
use crate::error::{FetchFailure, Result};
use crate::session::{SessionContext, SessionSnapshot};

/// Title shown above the user's ballots
pub const DEFAULT_TITLE: &str = "Your Ballots";

/// Everything the display collaborator receives
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayProps {
    pub title: String,
    pub is_loading: bool,
    pub campaigns: Vec<BallotRecord>,
    /// Failure of the most recent fetch; cleared when the next one starts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<FetchFailure>,
}

impl DisplayProps {
    fn initial(title: &str) -> Self {
        Self {
            title: title.to_string(),
            is_loading: false,
            campaigns: Vec::new(),
            error: None,
        }
    }
}

/// How a call to [`UserBallotsView::fetch`] ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// No contract connected; nothing was requested and state is unchanged
    Skipped,
    /// Ballots were stored (count)
    Loaded(usize),
    /// The provider failed; previous ballots were kept
    Failed(FetchFailure),
    /// A newer fetch was issued while this one was in flight; result dropped
    Superseded,
}

/// A fetch that has been started but not yet resolved
#[derive(Debug)]
struct PendingFetch {
    token: u64,
    address: Address,
}

#[derive(Debug)]
struct ViewState {
    latest: u64,
    is_loading: bool,
    campaigns: Vec<BallotRecord>,
    error: Option<FetchFailure>,
}

/// View-model for the signed-in user's ballots
pub struct UserBallotsView {
    session: Arc<SessionContext>,
    title: String,
    fetch_timeout: Option<Duration>,
    state: Mutex<ViewState>,
    props: watch::Sender<DisplayProps>,
    in_flight: Mutex<Option<AbortHandle>>,
    /// Cleared on unmount; a driver still winding down must not start fetches
    mounted: AtomicBool,
}

impl UserBallotsView {
    pub fn new(session: Arc<SessionContext>, config: &ViewConfig) -> Self {
        let (props, _) = watch::channel(DisplayProps::initial(&config.title));
        Self {
            session,
            title: config.title.clone(),
            fetch_timeout: config.fetch_timeout(),
            state: Mutex::new(ViewState {
                latest: 0,
                is_loading: false,
                campaigns: Vec::new(),
                error: None,
            }),
            props,
            in_flight: Mutex::new(None),
            mounted: AtomicBool::new(false),
        }
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    /// Props as of now
    pub fn props(&self) -> DisplayProps {
        self.props.borrow().clone()
    }

    /// Receive every published props update
    pub fn subscribe(&self) -> watch::Receiver<DisplayProps> {
        self.props.subscribe()
    }

    /// Render the current props once
    pub fn render_to<D: DisplayCampaigns + ?Sized>(&self, display: &mut D) -> Result<()> {
        display.render(&self.props())
    }

    /// Fetch the ballots for the session's current address.
    ///
    /// Loading is raised before the provider is called and lowered only
    /// after the ballots (or the failure) have been stored.
    pub async fn fetch(&self) -> FetchOutcome {
        match self.begin(&self.session.snapshot()) {
            Some(pending) => self.complete(pending).await,
            None => FetchOutcome::Skipped,
        }
    }

    /// Mount the view: fetch now, then again on every change of address or
    /// contract, and whenever [`MountedView::refresh`] is called.
    pub fn mount(self: &Arc<Self>) -> MountedView {
        let (refresh_tx, refresh_rx) = mpsc::unbounded_channel();
        self.mounted.store(true, Ordering::SeqCst);
        let driver = tokio::spawn(Arc::clone(self).drive(refresh_rx));
        MountedView {
            view: Arc::clone(self),
            refresh: refresh_tx,
            driver,
        }
    }

    fn state(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &ViewState) {
        self.props.send_replace(DisplayProps {
            title: self.title.clone(),
            is_loading: state.is_loading,
            campaigns: state.campaigns.clone(),
            error: state.error.clone(),
        });
    }

    fn begin(&self, snapshot: &SessionSnapshot) -> Option<PendingFetch> {
        if !snapshot.has_contract() {
            trace!("no contract connected, skipping ballot fetch");
            return None;
        }

        let mut state = self.state();
        state.latest += 1;
        state.is_loading = true;
        state.error = None;
        self.publish(&state);

        debug!(token = state.latest, address = %snapshot.address, "fetching user ballots");
        Some(PendingFetch {
            token: state.latest,
            address: snapshot.address.clone(),
        })
    }

    async fn complete(&self, pending: PendingFetch) -> FetchOutcome {
        let request = self.session.user_ballots(&pending.address);
        let result = match self.fetch_timeout {
            Some(limit) => match tokio::time::timeout(limit, request).await {
                Ok(result) => result.map_err(|err| FetchFailure::from(&err)),
                Err(_) => Err(FetchFailure::TimedOut(limit)),
            },
            None => request.await.map_err(|err| FetchFailure::from(&err)),
        };

        let mut state = self.state();
        if state.latest != pending.token {
            debug!(
                token = pending.token,
                latest = state.latest,
                "discarding superseded ballot fetch"
            );
            return FetchOutcome::Superseded;
        }

        let outcome = match result {
            Ok(ballots) => {
                debug!(
                    address = %pending.address,
                    count = ballots.len(),
                    "fetched user ballots"
                );
                let count = ballots.len();
                state.campaigns = ballots;
                FetchOutcome::Loaded(count)
            }
            Err(failure) => {
                warn!(address = %pending.address, error = %failure, "ballot fetch failed");
                state.error = Some(failure.clone());
                FetchOutcome::Failed(failure)
            }
        };
        state.is_loading = false;
        self.publish(&state);
        outcome
    }

    /// Start a fetch on a background task, aborting the one it supersedes
    fn spawn_fetch(self: &Arc<Self>) {
        if !self.mounted.load(Ordering::SeqCst) {
            return;
        }
        let Some(pending) = self.begin(&self.session.snapshot()) else {
            return;
        };

        let view = Arc::clone(self);
        let handle = tokio::spawn(async move {
            view.complete(pending).await;
        });

        let previous = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle.abort_handle());
        if let Some(previous) = previous {
            previous.abort();
        }

        // Unmounted while this fetch was being started
        if !self.mounted.load(Ordering::SeqCst) {
            self.cancel_in_flight();
        }
    }

    /// Stop starting fetches, then cancel the one in flight
    fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
        self.cancel_in_flight();
    }

    /// Abort any in-flight fetch and settle the view as not loading
    fn cancel_in_flight(&self) {
        let previous = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(previous) = previous {
            previous.abort();
        }

        let mut state = self.state();
        if state.is_loading {
            // Invalidate whatever is still running
            state.latest += 1;
            state.is_loading = false;
            self.publish(&state);
        }
    }

    async fn drive(self: Arc<Self>, mut refresh: mpsc::UnboundedReceiver<()>) {
        let mut session = self.session.subscribe();
        session.borrow_and_update();
        info!(provider = self.session.provider_name(), "ballots view mounted");
        self.spawn_fetch();

        loop {
            tokio::select! {
                changed = session.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    session.borrow_and_update();
                    self.spawn_fetch();
                }
                Some(()) = refresh.recv() => {
                    self.spawn_fetch();
                }
            }
        }
    }
}

impl std::fmt::Debug for UserBallotsView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserBallotsView")
            .field("title", &self.title)
            .field("fetch_timeout", &self.fetch_timeout)
            .field("state", &*self.state())
            .finish()
    }
}

/// Handle to a mounted view. Dropping it unmounts the view.
pub struct MountedView {
    view: Arc<UserBallotsView>,
    refresh: mpsc::UnboundedSender<()>,
    driver: JoinHandle<()>,
}

impl MountedView {
    pub fn view(&self) -> &Arc<UserBallotsView> {
        &self.view
    }

    pub fn props(&self) -> DisplayProps {
        self.view.props()
    }

    pub fn subscribe(&self) -> watch::Receiver<DisplayProps> {
        self.view.subscribe()
    }

    /// Re-fetch for the current session. Returns false once unmounted.
    pub fn refresh(&self) -> bool {
        self.refresh.send(()).is_ok()
    }

    /// Stop reacting to the session and abort any in-flight fetch
    pub fn unmount(self) {
        drop(self);
    }
}

impl Drop for MountedView {
    fn drop(&mut self) {
        self.driver.abort();
        self.view.unmount();
        debug!("ballots view unmounted");
    }
}
