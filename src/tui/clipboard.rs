//! System clipboard access.
//!
//! Never fails: headless and SSH sessions have no clipboard, and the
//! outcome is reported as a status line instead.

use arboard::Clipboard;

/// Copies `text` and returns the status line to show.
pub fn copy_to_clipboard(text: &str, description: &str) -> String {
    let outcome = Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text));
    match outcome {
        Ok(()) => {
            tracing::debug!(description, "Copied to clipboard");
            format!("Copied {} {} to clipboard", description, text)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Clipboard unavailable");
            format!("Clipboard not available: {}", e)
        }
    }
}
