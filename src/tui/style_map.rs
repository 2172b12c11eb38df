//! Mapping from domain values to display tiers.
//!
//! Every categorical value shown in the dashboard maps to a [`Tier`]; the
//! [`Theme`](super::theme::Theme) turns tiers into colours. All lookups are
//! exhaustive matches so a new variant fails to compile until it is mapped.

use crate::model::{
    ActivityBadge, CaseStatus, CellSeverity, Impact, RiskLevel, RuleStatus, Severity, Tone,
};

/// Display weight of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Red.
    Critical,
    /// Orange.
    High,
    /// Amber.
    Medium,
    /// Green.
    Good,
    /// Blue.
    Info,
    /// Grey.
    Neutral,
}

/// Three-step grade of an extraction confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    pub fn tier(self) -> Tier {
        match self {
            ConfidenceTier::High => Tier::Good,
            ConfidenceTier::Medium => Tier::Medium,
            ConfidenceTier::Low => Tier::Critical,
        }
    }
}

pub fn severity_tier(severity: Severity) -> Tier {
    match severity {
        Severity::Critical => Tier::Critical,
        Severity::High => Tier::High,
        Severity::Medium => Tier::Medium,
        Severity::Low => Tier::Info,
    }
}

pub fn risk_tier(risk: RiskLevel) -> Tier {
    match risk {
        RiskLevel::High => Tier::Critical,
        RiskLevel::Medium => Tier::Medium,
        RiskLevel::Low => Tier::Good,
    }
}

pub fn status_tier(status: CaseStatus) -> Tier {
    match status {
        CaseStatus::UnderInvestigation => Tier::Info,
        CaseStatus::EvidenceReview => Tier::Medium,
        CaseStatus::PendingAction => Tier::High,
        CaseStatus::Resolved => Tier::Good,
    }
}

pub fn impact_tier(impact: Impact) -> Tier {
    match impact {
        Impact::High => Tier::Critical,
        Impact::Medium => Tier::Medium,
        Impact::Low => Tier::Neutral,
    }
}

pub fn rule_status_tier(status: RuleStatus) -> Tier {
    match status {
        RuleStatus::Active => Tier::Good,
        RuleStatus::Testing => Tier::Medium,
        RuleStatus::Inactive => Tier::Neutral,
    }
}

pub fn cell_severity_tier(severity: CellSeverity) -> Tier {
    match severity {
        CellSeverity::High => Tier::Critical,
        CellSeverity::Medium => Tier::Medium,
        CellSeverity::Low => Tier::Info,
    }
}

pub fn tone_tier(tone: Tone) -> Tier {
    match tone {
        Tone::Red => Tier::Critical,
        Tone::Amber => Tier::Medium,
        Tone::Green => Tier::Good,
        Tone::Blue => Tier::Info,
    }
}

pub fn activity_badge_tier(badge: ActivityBadge) -> Tier {
    match badge {
        ActivityBadge::Critical => Tier::Critical,
        ActivityBadge::High => Tier::High,
        ActivityBadge::Medium => Tier::Medium,
        ActivityBadge::Low => Tier::Info,
        ActivityBadge::Resolved => Tier::Good,
    }
}

/// Extraction confidence in `0.0..=1.0`: above 0.9 high, above 0.8 medium.
pub fn confidence_tier(confidence: f64) -> ConfidenceTier {
    if confidence > 0.9 {
        ConfidenceTier::High
    } else if confidence > 0.8 {
        ConfidenceTier::Medium
    } else {
        ConfidenceTier::Low
    }
}

/// Compliance score: 80 and up good, 60 and up medium.
pub fn score_tier(score: f64) -> Tier {
    if score >= 80.0 {
        Tier::Good
    } else if score >= 60.0 {
        Tier::Medium
    } else {
        Tier::Critical
    }
}

/// Case priority score bands.
pub fn priority_tier(priority: u8) -> Tier {
    match priority {
        90..=u8::MAX => Tier::Critical,
        80..=89 => Tier::High,
        70..=79 => Tier::Medium,
        _ => Tier::Info,
    }
}

/// Rule detection confidence in percent: 90 and up good, 80 and up medium.
pub fn rule_confidence_tier(confidence: u8) -> Tier {
    match confidence {
        90..=u8::MAX => Tier::Good,
        80..=89 => Tier::Medium,
        _ => Tier::Critical,
    }
}

/// Heatmap base colour for a cell severity.
pub fn cell_rgb(severity: CellSeverity) -> (u8, u8, u8) {
    match severity {
        CellSeverity::High => (239, 68, 68),
        CellSeverity::Medium => (245, 158, 11),
        CellSeverity::Low => (59, 130, 246),
    }
}

/// Alpha-composites `fg` over `bg`.
pub fn blend(fg: (u8, u8, u8), bg: (u8, u8, u8), alpha: f64) -> (u8, u8, u8) {
    let alpha = alpha.clamp(0.0, 1.0);
    let mix = |f: u8, b: u8| (f as f64 * alpha + b as f64 * (1.0 - alpha)).round() as u8;
    (mix(fg.0, bg.0), mix(fg.1, bg.1), mix(fg.2, bg.2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_thresholds_are_strict() {
        assert_eq!(confidence_tier(0.95), ConfidenceTier::High);
        assert_eq!(confidence_tier(0.9), ConfidenceTier::Medium);
        assert_eq!(confidence_tier(0.88), ConfidenceTier::Medium);
        assert_eq!(confidence_tier(0.8), ConfidenceTier::Low);
    }

    #[test]
    fn test_score_tiers() {
        assert_eq!(score_tier(89.2), Tier::Good);
        assert_eq!(score_tier(80.0), Tier::Good);
        assert_eq!(score_tier(72.4), Tier::Medium);
        assert_eq!(score_tier(59.9), Tier::Critical);
    }

    #[test]
    fn test_priority_tiers() {
        assert_eq!(priority_tier(95), Tier::Critical);
        assert_eq!(priority_tier(90), Tier::Critical);
        assert_eq!(priority_tier(88), Tier::High);
        assert_eq!(priority_tier(75), Tier::Medium);
        assert_eq!(priority_tier(10), Tier::Info);
    }

    #[test]
    fn test_rule_confidence_tiers() {
        assert_eq!(rule_confidence_tier(95), Tier::Good);
        assert_eq!(rule_confidence_tier(88), Tier::Medium);
        assert_eq!(rule_confidence_tier(76), Tier::Critical);
    }

    #[test]
    fn test_blend_extremes() {
        let red = cell_rgb(CellSeverity::High);
        let white = (255, 255, 255);
        assert_eq!(blend(red, white, 1.0), red);
        assert_eq!(blend(red, white, 0.0), white);
        assert_eq!(blend(red, white, 2.0), red);
    }

    #[test]
    fn test_blend_midpoint() {
        assert_eq!(blend((200, 100, 0), (0, 0, 0), 0.5), (100, 50, 0));
    }
}
