//! Interactive compliance dashboard.
//!
//! [`DashboardExplorer`] owns the terminal and runs the event loop; all
//! state lives in [`app::App`], which can be driven headless in tests.
//!
//! # Examples
//!
//! ```rust,ignore
//! use scrutineye::tui::{app::{App, Clock, Collaborators}, DashboardExplorer};
//!
//! let app = App::new(collaborators, config, Clock::System);
//! let mut explorer = DashboardExplorer::new(app)?;
//! explorer.run()?;
//! ```

pub mod app;
pub mod clipboard;
pub mod layout;
pub mod list_state;
pub mod loadable;
pub mod screens;
pub mod shell;
pub mod style_map;
pub mod theme;
pub mod view_state;
pub mod widgets;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

use app::App;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Terminal owner for the dashboard.
pub struct DashboardExplorer {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    app: App,
}

impl DashboardExplorer {
    pub fn new(app: App) -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self { terminal, app })
    }

    /// Run the interactive event loop until the user quits.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.app.tick();
            self.terminal.draw(|f| self.app.render(f))?;

            if event::poll(POLL_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if self.app.handle_key(key)? {
                            break;
                        }
                    }
                    Event::Mouse(mouse) => self.app.handle_mouse(mouse)?,
                    // Next iteration redraws at the new size.
                    Event::Resize(..) => {}
                    _ => {}
                }
            }
        }

        tracing::info!("Dashboard closed");
        self.cleanup()?;
        Ok(())
    }

    /// Clean up and restore terminal
    fn cleanup(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for DashboardExplorer {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
