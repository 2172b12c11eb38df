//! Headline metrics and quick-stat panels.

use crate::model::Trend;
use serde::{Deserialize, Serialize};

/// Accent family of a metric card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Red,
    Amber,
    Green,
    Blue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceMetric {
    pub title: String,
    pub value: String,
    pub change: String,
    pub trend: Trend,
    pub tone: Tone,
    pub description: String,
}

impl ComplianceMetric {
    /// Whether the movement is good news. Rising counts on red and amber
    /// cards (violations, backlog) are bad; on the others they are good.
    pub fn trend_is_favourable(&self) -> bool {
        match self.tone {
            Tone::Red | Tone::Amber => self.trend == Trend::Down,
            Tone::Green | Tone::Blue => self.trend == Trend::Up,
        }
    }
}

/// Dashboard briefing window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFilter {
    Today,
    Week,
    Month,
}

impl TimeFilter {
    pub fn label(self) -> &'static str {
        match self {
            TimeFilter::Today => "Today",
            TimeFilter::Week => "This Week",
            TimeFilter::Month => "This Month",
        }
    }

    pub fn next(self) -> Self {
        match self {
            TimeFilter::Today => TimeFilter::Week,
            TimeFilter::Week => TimeFilter::Month,
            TimeFilter::Month => TimeFilter::Today,
        }
    }
}

/// Which screen a quick-stat strip belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatPanel {
    TodaysProgress,
    Reports,
    Sellers,
    Rules,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickStat {
    pub label: String,
    pub value: String,
    #[serde(default)]
    pub note: Option<String>,
}
