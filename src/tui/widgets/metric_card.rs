//! Headline metric card.

use crate::model::ComplianceMetric;
use crate::tui::style_map::{tone_tier, Tier};
use crate::tui::theme::Theme;
use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn metric_card_lines(metric: &ComplianceMetric, theme: &Theme) -> Vec<Line<'static>> {
    let change_tier = if metric.trend_is_favourable() {
        Tier::Good
    } else {
        Tier::Critical
    };

    vec![
        Line::from(Span::styled(metric.title.clone(), theme.metric_style())),
        Line::from(vec![
            Span::styled(
                metric.value.clone(),
                theme
                    .tier_style(tone_tier(metric.tone))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                format!("{} {}", metric.trend.arrow(), metric.change),
                theme.tier_style(change_tier),
            ),
        ]),
        Line::from(Span::styled(metric.description.clone(), theme.metric_style())),
    ]
}

pub fn render_metric_card(frame: &mut Frame, area: Rect, metric: &ComplianceMetric, theme: &Theme) {
    let card = Paragraph::new(metric_card_lines(metric, theme))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.tier_style(tone_tier(metric.tone))),
        );
    frame.render_widget(card, area);
}
