//! Seller summary card for the Seller Intel grid.

use super::{badge, bar};
use crate::model::{relative_time, Seller, Trend};
use crate::tui::style_map::{risk_tier, score_tier, Tier};
use crate::tui::theme::Theme;
use chrono::{DateTime, Utc};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub const CARD_HEIGHT: u16 = 8;
const SCORE_BAR_WIDTH: usize = 16;

pub fn seller_card_lines(seller: &Seller, theme: &Theme, now: DateTime<Utc>) -> Vec<Line<'static>> {
    let score_style = theme.tier_style(score_tier(seller.compliance_score));
    let (filled, empty) = bar(seller.compliance_score, SCORE_BAR_WIDTH);

    let mut risk_line = vec![
        badge(
            &format!("{} Risk", seller.risk_level.label()),
            risk_tier(seller.risk_level),
            theme,
        ),
        Span::raw(" "),
        Span::styled(
            seller.trend.arrow().to_string(),
            theme.tier_style(match seller.trend {
                Trend::Up => Tier::Good,
                Trend::Down => Tier::Critical,
            }),
        ),
    ];
    if seller.risk_overridden() {
        risk_line.push(Span::styled(
            "  ≠ score tier",
            theme.tier_style(Tier::Medium),
        ));
    }

    vec![
        Line::from(vec![
            Span::styled(seller.name.clone(), theme.title_style()),
            Span::styled(format!("  {}", seller.id), theme.metric_style()),
        ]),
        Line::from(Span::styled(seller.business_name.clone(), theme.metric_style())),
        Line::from(vec![
            Span::styled(filled, score_style),
            Span::styled(empty, theme.progress_bar_bg_style()),
            Span::styled(format!(" {:.1}", seller.compliance_score), score_style),
        ]),
        Line::from(risk_line),
        Line::from(vec![
            Span::styled(
                format!("{} active", seller.active_violations),
                theme.tier_style(Tier::Critical),
            ),
            Span::styled(" · ", theme.metric_style()),
            Span::styled(
                format!("{} resolved", seller.resolved_violations),
                theme.tier_style(Tier::Good),
            ),
            Span::styled(
                format!(" · {} total", seller.total_violations),
                theme.metric_style(),
            ),
        ]),
        Line::from(Span::styled(
            format!(
                "{} | {} | {}",
                seller.platforms.join(", "),
                seller.categories.join(", "),
                relative_time(now, seller.last_activity)
            ),
            theme.metric_style(),
        )),
    ]
}

pub fn render_seller_card(
    frame: &mut Frame,
    area: Rect,
    seller: &Seller,
    selected: bool,
    theme: &Theme,
    now: DateTime<Utc>,
) {
    let card = Paragraph::new(seller_card_lines(seller, theme, now)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style(selected)),
    );
    frame.render_widget(card, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::seed::seed_fixture;

    fn text(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_card_marks_overridden_risk() {
        let now = Utc::now();
        let fixture = seed_fixture(now);
        let organic = fixture
            .sellers
            .iter()
            .find(|s| s.name.starts_with("Organic"))
            .unwrap();
        let rendered = text(&seller_card_lines(organic, &Theme::light(), now));
        assert!(rendered.contains("High Risk"));
        assert!(rendered.contains("≠ score tier"));
        assert!(rendered.contains("65.8"));
    }

    #[test]
    fn test_card_lists_violation_split() {
        let now = Utc::now();
        let fixture = seed_fixture(now);
        let rendered = text(&seller_card_lines(&fixture.sellers[0], &Theme::dark(), now));
        assert!(rendered.contains("8 active"));
        assert!(rendered.contains("15 resolved"));
        assert!(!rendered.contains("≠ score tier"));
    }
}
