//! Logging and crash reporting.
//!
//! The terminal belongs to the dashboard while it runs, so log output goes
//! to a file or nowhere. The panic hook hands the terminal back before
//! printing its report.
//!
//! ```ignore
//! use scrutineye::observability::{init_logging, install_panic_hook};
//!
//! fn main() -> anyhow::Result<()> {
//!     install_panic_hook();
//!     init_logging(Some(Path::new("scrutineye.log")), 1)?;
//!     // ... run the dashboard
//! }
//! ```

pub mod panic_hook;

pub use panic_hook::install_panic_hook;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static LOG_FILE: OnceCell<PathBuf> = OnceCell::new();

/// Default filter directive for a `-v` count. `RUST_LOG` overrides it.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "scrutineye=warn",
        1 => "scrutineye=info",
        2 => "scrutineye=debug",
        _ => "scrutineye=trace",
    }
}

/// Log file chosen at startup, if any.
pub fn log_file() -> Option<&'static Path> {
    LOG_FILE.get().map(PathBuf::as_path)
}

/// Installs the global subscriber. Without a log file nothing is recorded.
pub fn init_logging(log_file: Option<&Path>, verbosity: u8) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let _ = LOG_FILE.set(path.to_path_buf());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .try_init()
        .context("failed to install log subscriber")?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Logging started");
    Ok(())
}
