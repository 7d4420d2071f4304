//! Ballots TUI
//!
//! Mounts the ballots view against the configured session and lets the user
//! switch address, connect or disconnect the contract, and refresh, while the
//! list re-renders from the view's published props.

pub mod app;
pub mod event;
pub mod terminal;
pub mod ui;

pub use terminal::run;
