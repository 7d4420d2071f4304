//! Terminal management and main run loop

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use ballotctl_core::{ContractHandle, MountedView, SessionContext, UserBallotsView};
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::warn;

use super::app::App;
use super::event::{handle_key, poll_event, HandleResult};
use super::ui;
use crate::session::ResolvedSession;

/// Contract handle used by `c` when the config names none
const FIXTURE_CONTRACT: &str = "fixture";

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Run the TUI application
///
/// The event loop blocks the calling thread; fetches run on the runtime's
/// worker threads, so this must be called from a multi-threaded runtime.
pub async fn run(resolved: ResolvedSession) -> Result<()> {
    let addresses = match resolved.provider.known_addresses().await {
        Ok(addresses) => addresses,
        Err(err) => {
            warn!(error = %err, "could not list known addresses");
            Vec::new()
        }
    };

    let view = Arc::new(UserBallotsView::new(
        resolved.session.clone(),
        &resolved.config.view,
    ));
    let mounted = view.mount();

    let configured_contract = resolved
        .config
        .session
        .snapshot()
        .contract
        .unwrap_or_else(|| ContractHandle::new(FIXTURE_CONTRACT));

    let mut app = App::new(mounted.props(), resolved.session.snapshot(), addresses);

    let mut terminal = init_terminal()?;
    let result = run_loop(
        &mut terminal,
        &mut app,
        &mounted,
        &resolved.session,
        &configured_contract,
    );

    // Restore terminal (even if loop failed)
    restore_terminal(&mut terminal)?;
    mounted.unmount();

    result
}

/// Main event loop
fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    mounted: &MountedView,
    session: &SessionContext,
    contract: &ContractHandle,
) -> Result<()> {
    let mut props = mounted.subscribe();

    loop {
        if props.has_changed().unwrap_or(false) {
            app.apply_props(props.borrow_and_update().clone());
        }
        app.session = session.snapshot();

        terminal.draw(|frame| ui::render(frame, app))?;

        // Poll for events (with 100ms timeout for responsive UI)
        if let Some(Event::Key(key)) = poll_event(Duration::from_millis(100))? {
            match handle_key(app, key) {
                HandleResult::Quit => break,
                HandleResult::Continue => {}
                HandleResult::Refresh => {
                    if mounted.refresh() {
                        app.set_status("Refreshing");
                    }
                }
                HandleResult::NextAddress => match app.next_address() {
                    Some(address) => {
                        app.set_status(format!("Switched to {}", address));
                        session.set_address(address);
                    }
                    None => app.set_status("No other addresses in the ballots file"),
                },
                HandleResult::ToggleContract => {
                    if app.session.has_contract() {
                        session.disconnect_contract();
                        app.set_status("Contract disconnected");
                    } else {
                        session.connect_contract(contract.clone());
                        app.set_status(format!("Connected to {}", contract.id()));
                    }
                }
            }
        }
    }

    Ok(())
}
