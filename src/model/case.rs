//! Violation cases tracked through an investigation.

use crate::errors::{ProviderError, ProviderResult};
use crate::model::SellerId;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static CASE_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^VIO-\d{4}-\d{6}$").expect("valid case id pattern"));

/// Case identifier of the form `VIO-YYYY-NNNNNN`.
///
/// Identifiers are issued in detection order and share one width, so the
/// derived string ordering is also the numeric ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CaseId(String);

impl CaseId {
    pub fn parse(raw: &str) -> ProviderResult<Self> {
        if CASE_ID_PATTERN.is_match(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(ProviderError::invalid(format!(
                "case id '{}' does not match VIO-YYYY-NNNNNN",
                raw
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CaseId {
    type Error = ProviderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CaseId> for String {
    fn from(id: CaseId) -> Self {
        id.0
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordinal urgency of a case (Critical > High > Medium > Low).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn rank(self) -> u8 {
        match self {
            Severity::Critical => 3,
            Severity::High => 2,
            Severity::Medium => 1,
            Severity::Low => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }

    pub fn all() -> &'static [Severity] {
        &[
            Severity::Critical,
            Severity::High,
            Severity::Medium,
            Severity::Low,
        ]
    }
}

/// Where a case is in its investigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaseStatus {
    UnderInvestigation,
    EvidenceReview,
    PendingAction,
    Resolved,
}

impl CaseStatus {
    pub fn label(self) -> &'static str {
        match self {
            CaseStatus::UnderInvestigation => "Under Investigation",
            CaseStatus::EvidenceReview => "Evidence Review",
            CaseStatus::PendingAction => "Pending Action",
            CaseStatus::Resolved => "Resolved",
        }
    }

    /// Ordinal used when sorting by status: cases waiting on the inspector first.
    pub fn urgency(self) -> u8 {
        match self {
            CaseStatus::PendingAction => 3,
            CaseStatus::EvidenceReview => 2,
            CaseStatus::UnderInvestigation => 1,
            CaseStatus::Resolved => 0,
        }
    }
}

/// Estimated consumer impact of a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl Impact {
    pub fn rank(self) -> u8 {
        match self {
            Impact::High => 2,
            Impact::Medium => 1,
            Impact::Low => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Impact::High => "High",
            Impact::Medium => "Medium",
            Impact::Low => "Low",
        }
    }
}

/// A single detected regulatory violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    pub id: CaseId,
    pub title: String,
    pub description: String,
    pub seller_ref: SellerId,
    pub seller_name: String,
    pub platform: String,
    pub category: String,
    pub violation_type: String,
    pub severity: Severity,
    /// Ranking score in `0..=100`, independent of severity.
    pub priority: u8,
    pub detected_at: DateTime<Utc>,
    pub status: CaseStatus,
    pub assignee: String,
    pub evidence_count: u32,
    #[serde(default)]
    pub repeat_offender: bool,
    pub estimated_impact: Impact,
    #[serde(default)]
    pub risk_factors: Vec<String>,
}

impl Case {
    pub fn check_invariants(&self) -> ProviderResult<()> {
        if self.priority > 100 {
            return Err(ProviderError::invalid(format!(
                "case {} has priority {} outside 0..=100",
                self.id, self.priority
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_id_pattern() {
        assert!(CaseId::parse("VIO-2025-001247").is_ok());
        assert!(CaseId::parse("VIO-2025-1247").is_err());
        assert!(CaseId::parse("SELL-2025-7834").is_err());
        assert!(CaseId::parse("vio-2025-001247").is_err());
    }

    #[test]
    fn test_case_id_ordering_is_numeric() {
        let a = CaseId::parse("VIO-2025-001247").unwrap();
        let b = CaseId::parse("VIO-2025-001250").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_case_id_rejected_by_serde() {
        let parsed: Result<CaseId, _> = serde_json::from_str("\"VIO-25-1\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_severity_ranks_descend() {
        let ranks: Vec<u8> = Severity::all().iter().map(|s| s.rank()).collect();
        assert_eq!(ranks, vec![3, 2, 1, 0]);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(CaseStatus::PendingAction.label(), "Pending Action");
        assert!(CaseStatus::PendingAction.urgency() > CaseStatus::Resolved.urgency());
    }
}
