//! TUI application state

use ballotctl_core::{Address, BallotRecord, DisplayProps, SessionSnapshot};

/// Main application state
#[derive(Debug)]
pub struct App {
    /// Latest props published by the view
    pub props: DisplayProps,
    /// Session as last observed (for the header)
    pub session: SessionSnapshot,
    /// Addresses known to the provider, cycled with `n`
    pub addresses: Vec<Address>,
    /// Currently selected ballot index
    pub selected_index: usize,
    /// Scroll offset for list view
    pub scroll_offset: usize,
    /// Show detail pane
    pub show_detail: bool,
    /// Status message (shown in status bar)
    pub status_message: Option<String>,
}

impl App {
    pub fn new(props: DisplayProps, session: SessionSnapshot, addresses: Vec<Address>) -> Self {
        Self {
            props,
            session,
            addresses,
            selected_index: 0,
            scroll_offset: 0,
            show_detail: true,
            status_message: None,
        }
    }

    /// Set status message
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
    }

    /// Replace the props, keeping the selection in range
    pub fn apply_props(&mut self, props: DisplayProps) {
        self.props = props;
        let len = self.props.campaigns.len();
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
        if self.scroll_offset > self.selected_index {
            self.scroll_offset = self.selected_index;
        }
    }

    /// Select next ballot
    pub fn select_next(&mut self) {
        let len = self.props.campaigns.len();
        if len > 0 {
            self.selected_index = (self.selected_index + 1) % len;
            self.ensure_visible();
        }
    }

    /// Select previous ballot
    pub fn select_prev(&mut self) {
        let len = self.props.campaigns.len();
        if len > 0 {
            self.selected_index = self
                .selected_index
                .checked_sub(1)
                .unwrap_or(len - 1);
            self.ensure_visible();
        }
    }

    pub fn select_first(&mut self) {
        self.selected_index = 0;
        self.scroll_offset = 0;
    }

    pub fn select_last(&mut self) {
        self.selected_index = self.props.campaigns.len().saturating_sub(1);
    }

    /// Keep the selection on screen given the list height
    pub fn scroll_into_view(&mut self, visible: usize) {
        if visible == 0 {
            return;
        }
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + visible {
            self.scroll_offset = self.selected_index + 1 - visible;
        }
    }

    fn ensure_visible(&mut self) {
        // Keep 2 items of context when scrolling up
        const CONTEXT: usize = 2;

        if self.selected_index < self.scroll_offset + CONTEXT {
            self.scroll_offset = self.selected_index.saturating_sub(CONTEXT);
        }
    }

    /// Get currently selected ballot
    pub fn selected_ballot(&self) -> Option<&BallotRecord> {
        self.props.campaigns.get(self.selected_index)
    }

    /// The address after the current one, wrapping around
    pub fn next_address(&self) -> Option<Address> {
        if self.addresses.is_empty() {
            return None;
        }
        let next = self
            .addresses
            .iter()
            .position(|a| *a == self.session.address)
            .map(|idx| (idx + 1) % self.addresses.len())
            .unwrap_or(0);
        Some(self.addresses[next].clone())
    }
}
