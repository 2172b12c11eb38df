//! Immutable domain values supplied by the data provider.
//!
//! Every type here is created at load time and never mutated during a
//! session. Validation lives next to the type it protects so that any
//! provider implementation can reuse it.

pub mod case;
pub mod evidence;
pub mod matrix;
pub mod metric;
pub mod report;
pub mod rule;
pub mod seller;

pub use case::{Case, CaseId, CaseStatus, Impact, Severity};
pub use evidence::{BoundingBox, EvidenceField, SOURCE_IMAGE_SIZE};
pub use matrix::{CellKey, CellSeverity, ThreatMatrix, ThreatMatrixCell, TimeRange};
pub use metric::{ComplianceMetric, QuickStat, StatPanel, TimeFilter, Tone};
pub use report::{
    ReportArtifact, ReportFormat, ReportFrequency, ReportPeriod, ReportRequest, ReportTemplate,
};
pub use rule::{CategorySummary, ComplianceRule, DetectionThresholds, RuleStatus, Threshold};
pub use seller::{
    ActivityBadge, ActivityKind, Contact, MonthlyScore, RiskLevel, Seller, SellerActivity,
    SellerId, SellerProfile,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Direction of a moving figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    pub fn arrow(self) -> &'static str {
        match self {
            Trend::Up => "↑",
            Trend::Down => "↓",
        }
    }
}

/// Human readable age of a timestamp ("2 hours ago").
pub fn relative_time(now: DateTime<Utc>, then: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    if elapsed.num_seconds() < 60 {
        return "just now".to_string();
    }

    let (value, unit) = if elapsed.num_minutes() < 60 {
        (elapsed.num_minutes(), "minute")
    } else if elapsed.num_hours() < 24 {
        (elapsed.num_hours(), "hour")
    } else if elapsed.num_days() < 7 {
        (elapsed.num_days(), "day")
    } else {
        (elapsed.num_weeks(), "week")
    };

    if value == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", value, unit)
    }
}
