// Test utility module for scrutineye integration tests
#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{backend::TestBackend, Terminal};
use scrutineye::config::ScrutineyeConfig;
use scrutineye::provider::reports::InlineReportGenerator;
use scrutineye::provider::search::SearchBackend;
use scrutineye::provider::seed::seed_fixture;
use scrutineye::provider::{DataProvider, Fixture, FixtureProvider};
use scrutineye::tui::app::{App, Clock, Collaborators};
use std::sync::Arc;

/// A weekday morning, so the greeting is stable.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 12, 9, 30, 0).unwrap()
}

pub fn app_with(fixture: Fixture, config: ScrutineyeConfig) -> App {
    let provider = Arc::new(FixtureProvider::new(fixture).unwrap());
    let templates = provider.report_templates().unwrap();
    let collaborators = Collaborators {
        provider: provider.clone(),
        search: SearchBackend::Inline(provider),
        reports: Box::new(InlineReportGenerator::new(templates)),
    };
    App::new(collaborators, config, Clock::Fixed(fixed_now()))
}

/// Headless app over the built-in sample data.
pub fn seed_app() -> App {
    app_with(seed_fixture(fixed_now()), ScrutineyeConfig::default())
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

pub fn press(app: &mut App, code: KeyCode) -> bool {
    app.handle_key(key(code)).unwrap()
}

pub fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

pub fn click(app: &mut App, column: u16, row: u16) {
    app.handle_mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
    .unwrap();
}

/// Draws one frame and returns the screen as text, one line per row.
pub fn render(app: &mut App, width: u16, height: u16) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|frame| app.render(frame)).unwrap();
    let buffer = terminal.backend().buffer();
    (0..height)
        .map(|y| {
            (0..width)
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Row and column of the first occurrence of `needle` in rendered text.
pub fn locate(screen: &str, needle: &str) -> Option<(u16, u16)> {
    screen.lines().enumerate().find_map(|(row, line)| {
        line.find(needle).map(|byte| {
            let column = line[..byte].chars().count();
            (column as u16, row as u16)
        })
    })
}
