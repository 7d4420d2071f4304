//! Event handling for the TUI

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::app::App;

/// Poll for events with timeout
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Result of handling a key event
#[derive(Debug, PartialEq, Eq)]
pub enum HandleResult {
    /// Continue running
    Continue,
    /// Quit the application
    Quit,
    /// Fetch the ballots again
    Refresh,
    /// Switch the session to the next known address
    NextAddress,
    /// Connect or disconnect the contract
    ToggleContract,
}

/// Handle a key event
pub fn handle_key(app: &mut App, key: KeyEvent) -> HandleResult {
    if key.kind == KeyEventKind::Release {
        return HandleResult::Continue;
    }

    // Global quit shortcut (Ctrl+C)
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return HandleResult::Quit;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => HandleResult::Quit,

        // Navigation
        KeyCode::Char('j') | KeyCode::Down => {
            app.select_next();
            HandleResult::Continue
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.select_prev();
            HandleResult::Continue
        }
        KeyCode::Home | KeyCode::Char('g') => {
            app.select_first();
            HandleResult::Continue
        }
        KeyCode::End | KeyCode::Char('G') => {
            app.select_last();
            HandleResult::Continue
        }

        // Toggle detail pane
        KeyCode::Char('p') => {
            app.show_detail = !app.show_detail;
            HandleResult::Continue
        }

        KeyCode::Char('r') => HandleResult::Refresh,
        KeyCode::Char('n') => HandleResult::NextAddress,
        KeyCode::Char('c') => HandleResult::ToggleContract,

        _ => HandleResult::Continue,
    }
}
