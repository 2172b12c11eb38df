//! Compliance rule row for the Rules Engine.

use super::badge;
use crate::model::ComplianceRule;
use crate::tui::style_map::{rule_confidence_tier, rule_status_tier};
use crate::tui::theme::Theme;
use ratatui::text::{Line, Span};

pub const ROW_HEIGHT: u16 = 3;

pub fn rule_row_lines(rule: &ComplianceRule, theme: &Theme) -> Vec<Line<'static>> {
    vec![
        Line::from(vec![
            Span::styled(format!("{:<8}", rule.id), theme.metric_style()),
            Span::styled(rule.name.clone(), theme.title_style()),
            Span::raw("  "),
            badge(rule.status.label(), rule_status_tier(rule.status), theme),
        ]),
        Line::from(vec![
            Span::raw("        "),
            Span::styled(rule.description.clone(), theme.metric_style()),
        ]),
        Line::from(vec![
            Span::raw("        "),
            Span::styled(format!("{} · ", rule.category), theme.metric_style()),
            Span::styled(
                format!("{}% confidence", rule.confidence),
                theme.tier_style(rule_confidence_tier(rule.confidence)),
            ),
            Span::styled(
                format!(
                    " · {} detected · updated {}",
                    rule.violations_detected,
                    rule.last_updated.format("%Y-%m-%d")
                ),
                theme.metric_style(),
            ),
        ]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RuleStatus;
    use chrono::NaiveDate;

    #[test]
    fn test_rule_row_content() {
        let rule = ComplianceRule {
            id: "MRP-001".into(),
            name: "MRP Declaration Required".into(),
            description: "Product must display Maximum Retail Price".into(),
            category: "Pricing".into(),
            status: RuleStatus::Active,
            confidence: 94,
            last_updated: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            violations_detected: 234,
        };
        let lines = rule_row_lines(&rule, &Theme::light());
        assert_eq!(lines.len(), ROW_HEIGHT as usize);
        let last: String = lines[2].spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(last.contains("94% confidence"));
        assert!(last.contains("234 detected"));
        assert!(last.contains("2025-01-10"));
    }
}
