//! Panic hook that restores the terminal before reporting.
//!
//! A panic inside the event loop would otherwise leave the shell in raw
//! mode on the alternate screen with mouse capture on, and the report
//! would be invisible.

use std::panic::PanicHookInfo;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const WIDTH: usize = 78;

/// Install the custom panic hook. Call before the terminal is taken over.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal();
        tracing::error!(message = %extract_panic_message(info), "Panic");
        eprintln!();
        eprintln!("{}", crash_report(info));
    }));
}

fn restore_terminal() {
    // Ignore errors - we're already panicking
    let _ = crossterm::terminal::disable_raw_mode();
    let _ = crossterm::execute!(
        std::io::stderr(),
        crossterm::terminal::LeaveAlternateScreen,
        crossterm::event::DisableMouseCapture,
        crossterm::cursor::Show
    );
}

fn crash_report(info: &PanicHookInfo<'_>) -> String {
    let location = info
        .location()
        .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()));
    let backtrace = std::env::var("RUST_BACKTRACE").is_ok();
    report_lines(
        &extract_panic_message(info),
        location.as_deref(),
        super::log_file().map(|p| p.display().to_string()).as_deref(),
        backtrace,
    )
    .join("\n")
}

fn report_lines(
    message: &str,
    location: Option<&str>,
    log_file: Option<&str>,
    backtrace: bool,
) -> Vec<String> {
    let rule = "═".repeat(WIDTH);
    let row = |label: &str, value: &str| {
        let room = WIDTH.saturating_sub(label.chars().count() + 2);
        format!("║  {}{:<room$}║", label, truncate(value, room), room = room)
    };

    let mut lines = vec![
        format!("╔{}╗", rule),
        row("", "SCRUTINEYE CRASH REPORT"),
        format!("╠{}╣", rule),
        row("Version: ", VERSION),
        row("Platform: ", std::env::consts::OS),
        row("Time: ", &chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string()),
        format!("╠{}╣", rule),
        row("PANIC: ", message),
    ];
    if let Some(location) = location {
        lines.push(row("Location: ", location));
    }
    if let Some(log_file) = log_file {
        lines.push(row("Log file: ", log_file));
    }
    if !backtrace {
        lines.push(row("", "Run with RUST_BACKTRACE=1 for stack trace"));
    }
    lines.push(format!("╚{}╝", rule));
    if backtrace {
        lines.push(std::backtrace::Backtrace::capture().to_string());
    }
    lines
}

fn extract_panic_message(info: &PanicHookInfo<'_>) -> String {
    if let Some(s) = info.payload().downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = info.payload().downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string() {
        assert_eq!(truncate("short", 10), "short");
    }

    #[test]
    fn test_truncate_long_string() {
        let result = truncate("this is a long string that needs truncation", 20);
        assert_eq!(result.chars().count(), 20);
        assert!(result.ends_with("..."));
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        assert_eq!(truncate("€€€€€", 5), "€€€€€");
        assert_eq!(truncate("€€€€€€", 5), "€€...");
    }

    #[test]
    fn test_report_rows_have_equal_width() {
        let lines = report_lines(
            "index out of bounds",
            Some("src/tui/app.rs:10:5"),
            Some("/tmp/scrutineye.log"),
            false,
        );
        let widths: Vec<usize> = lines.iter().map(|l| l.chars().count()).collect();
        assert!(widths.iter().all(|&w| w == WIDTH + 2), "{:?}", widths);
        assert!(lines.iter().any(|l| l.contains("index out of bounds")));
        assert!(lines.iter().any(|l| l.contains("/tmp/scrutineye.log")));
    }
}
