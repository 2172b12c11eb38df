//! Footer: key hints, the transient status message and the static legal line.

use crate::tui::theme::Theme;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub const FOOTER_LINKS: [&str; 3] = ["Privacy Policy", "Terms of Service", "Contact"];

pub fn copyright_line(year: i32) -> String {
    format!("© {} Scrutineye. All rights reserved.", year)
}

pub fn hint_spans(hints: &[(&str, &str)], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, action) in hints {
        spans.push(Span::styled(format!("{} ", key), theme.key_hint_style()));
        spans.push(Span::styled(format!("{}  ", action), theme.metric_style()));
    }
    spans
}

pub fn render_footer(
    frame: &mut Frame,
    area: Rect,
    hints: &[(&str, &str)],
    status: Option<&str>,
    year: i32,
    theme: &Theme,
) {
    let first = match status {
        Some(message) => Line::from(Span::styled(message.to_string(), theme.key_hint_style())),
        None => Line::from(hint_spans(hints, theme)),
    };
    let legal = Line::from(vec![
        Span::styled(copyright_line(year), theme.metric_style()),
        Span::styled(format!("   {}", FOOTER_LINKS.join(" · ")), theme.metric_style()),
    ]);
    frame.render_widget(
        Paragraph::new(vec![first, legal])
            .style(theme.base_style())
            .alignment(Alignment::Left),
        area,
    );
}
