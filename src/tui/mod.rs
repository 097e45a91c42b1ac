//! Terminal user interface for the registration form
//!
//! The view layer: renders the registry state and turns key presses into
//! form events.

mod app;
mod events;
mod renderer;

pub use app::{Focus, FormApp, Status, StatusKind};
pub use events::{Event, EventHandler};
pub use renderer::draw;

use std::io::{self, Stdout};
use std::panic;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::config::Config;
use crate::core::Registry;
use crate::storage::JsonSlotStore;

/// Run the interactive form until the user quits
pub async fn run_tui(config: &Config) -> Result<()> {
    if !crossterm::tty::IsTty::is_tty(&io::stdout()) {
        anyhow::bail!("The registration form requires a real terminal (TTY).");
    }

    let store = JsonSlotStore::from_config(config);
    tracing::info!("Starting registration form, slot: {}", store.path().display());
    let mut app = FormApp::new(Registry::open(store), config.preview.max_bytes);
    let events = EventHandler::new(Duration::from_millis(config.tui.tick_ms.max(10)));

    install_panic_hook();
    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &mut app, &events);
    restore_terminal(&mut terminal)?;
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut FormApp<JsonSlotStore>,
    events: &EventHandler,
) -> Result<()> {
    loop {
        app.poll_previews();
        terminal.draw(|frame| draw(frame, app))?;

        match events.next()? {
            Event::Key(key) => app.handle_key(key),
            Event::Resize(_, _) | Event::Tick => {}
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}

/// Install a panic hook that restores the terminal before panicking
fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("Failed to enable terminal raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let terminal =
        Terminal::new(CrosstermBackend::new(stdout)).context("Failed to create terminal backend")?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
