//! Two-line case row used by the Priority Inbox and the Workspace list.

use super::{badge, bar, HitRegion};
use crate::model::{relative_time, Case, CaseId, SellerId};
use crate::tui::list_state::{calculate_visible_range, ListState};
use crate::tui::style_map::{impact_tier, priority_tier, severity_tier, status_tier, Tier};
use crate::tui::theme::Theme;
use chrono::{DateTime, Utc};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Lines each case occupies.
pub const ROW_HEIGHT: u16 = 2;
const BAR_WIDTH: usize = 10;
const META_INDENT: u16 = 2;

/// What a click on a case row landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseRowTarget {
    Case(CaseId),
    Seller(SellerId),
}

/// Priority bar whose filled share equals the priority score.
pub fn priority_bar(priority: u8) -> (String, String) {
    bar(priority as f64, BAR_WIDTH)
}

pub fn case_row_lines(case: &Case, theme: &Theme, now: DateTime<Utc>) -> [Line<'static>; 2] {
    let (filled, empty) = priority_bar(case.priority);
    let mut headline = vec![
        Span::styled(filled, theme.tier_style(priority_tier(case.priority))),
        Span::styled(empty, theme.progress_bar_bg_style()),
        Span::styled(
            format!(" {:>3} ", case.priority),
            theme.tier_style(priority_tier(case.priority)),
        ),
        badge(case.severity.label(), severity_tier(case.severity), theme),
        Span::raw(" "),
    ];
    if case.repeat_offender {
        headline.push(Span::styled("↻ Repeat ", theme.tier_style(Tier::High)));
    }
    headline.push(Span::styled(case.title.clone(), theme.title_style()));

    let meta = Line::from(vec![
        Span::raw(" ".repeat(META_INDENT as usize)),
        Span::styled(case.seller_name.clone(), theme.active_style()),
        Span::styled(
            format!(
                "  ·  {}  ·  {}  ·  {}  ·  ",
                case.id,
                case.platform,
                relative_time(now, case.detected_at)
            ),
            theme.metric_style(),
        ),
        Span::styled(case.status.label(), theme.tier_style(status_tier(case.status))),
        Span::styled("  ·  Impact ", theme.metric_style()),
        Span::styled(
            case.estimated_impact.label(),
            theme.tier_style(impact_tier(case.estimated_impact)),
        ),
    ]);

    [Line::from(headline), meta]
}

/// Renders the visible slice of `cases` and returns row and seller regions.
pub fn render_case_rows(
    frame: &mut Frame,
    area: Rect,
    cases: &[Case],
    list: &ListState,
    focused: bool,
    theme: &Theme,
    now: DateTime<Utc>,
) -> Vec<HitRegion<CaseRowTarget>> {
    let capacity = (area.height / ROW_HEIGHT) as usize;
    let mut regions = Vec::new();

    for (slot, index) in calculate_visible_range(list.scroll_offset(), capacity, cases.len()).enumerate() {
        let case = &cases[index];
        let row_area = Rect {
            x: area.x,
            y: area.y + slot as u16 * ROW_HEIGHT,
            width: area.width,
            height: ROW_HEIGHT,
        };

        let mut paragraph = Paragraph::new(case_row_lines(case, theme, now).to_vec());
        if focused && index == list.selected_index() {
            paragraph = paragraph.style(theme.selected_style());
        }
        frame.render_widget(paragraph, row_area);

        regions.push(HitRegion::new(row_area, CaseRowTarget::Case(case.id.clone())));
        let seller_width = (case.seller_name.width() as u16).min(row_area.width.saturating_sub(META_INDENT));
        regions.push(HitRegion::new(
            Rect {
                x: row_area.x + META_INDENT,
                y: row_area.y + 1,
                width: seller_width,
                height: 1,
            },
            CaseRowTarget::Seller(case.seller_ref.clone()),
        ));
    }

    regions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::seed::seed_fixture;
    use crate::tui::widgets::hit;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_priority_bar_proportional() {
        let (filled, empty) = priority_bar(75);
        assert_eq!(filled.chars().count(), 8);
        assert_eq!(empty.chars().count(), 2);
    }

    #[test]
    fn test_row_mentions_seller_and_id() {
        let now = Utc::now();
        let fixture = seed_fixture(now);
        let case = &fixture.cases[0];
        let [_, meta] = case_row_lines(case, &Theme::light(), now);
        let text: String = meta.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.contains(&case.seller_name));
        assert!(text.contains(case.id.as_str()));
    }

    #[test]
    fn test_seller_region_sits_on_seller_name() {
        let now = Utc::now();
        let fixture = seed_fixture(now);
        let backend = TestBackend::new(120, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut regions = Vec::new();
        terminal
            .draw(|frame| {
                regions = render_case_rows(
                    frame,
                    frame.area(),
                    &fixture.cases,
                    &ListState::new(),
                    true,
                    &Theme::light(),
                    now,
                );
            })
            .unwrap();

        let first = &fixture.cases[0];
        assert_eq!(hit(&regions, 3, 1), Some(CaseRowTarget::Seller(first.seller_ref.clone())));
        assert_eq!(hit(&regions, 60, 0), Some(CaseRowTarget::Case(first.id.clone())));
        // 12 rows hold six cases, only five exist
        assert_eq!(regions.len(), fixture.cases.len() * 2);
    }
}
