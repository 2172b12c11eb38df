//! Marketplace sellers and their compliance history.

use crate::errors::{ProviderError, ProviderResult};
use crate::model::Trend;
use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

static SELLER_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^SELL-\d{4}-\d{4}$").expect("valid seller id pattern"));

/// Seller identifier of the form `SELL-YYYY-NNNN`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SellerId(String);

impl SellerId {
    pub fn parse(raw: &str) -> ProviderResult<Self> {
        if SELLER_ID_PATTERN.is_match(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(ProviderError::invalid(format!(
                "seller id '{}' does not match SELL-YYYY-NNNN",
                raw
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SellerId {
    type Error = ProviderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SellerId> for String {
    fn from(id: SellerId) -> Self {
        id.0
    }
}

impl fmt::Display for SellerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Inspector-facing risk classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }

    /// Risk level the compliance score thresholds would suggest
    /// (>= 80 low, 60-79 medium, < 60 high).
    pub fn implied_by_score(score: f64) -> Self {
        if score >= 80.0 {
            RiskLevel::Low
        } else if score >= 60.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}

/// Aggregate compliance record of a merchant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seller {
    pub id: SellerId,
    pub name: String,
    pub business_name: String,
    pub compliance_score: f64,
    pub risk_level: RiskLevel,
    pub total_violations: u32,
    pub active_violations: u32,
    pub resolved_violations: u32,
    pub platforms: Vec<String>,
    pub categories: Vec<String>,
    pub last_activity: DateTime<Utc>,
    pub trend: Trend,
}

impl Seller {
    /// Checks the counters and ranges a provider must honour.
    pub fn check_invariants(&self) -> ProviderResult<()> {
        if self.active_violations + self.resolved_violations != self.total_violations {
            return Err(ProviderError::InconsistentSeller {
                id: self.id.to_string(),
                total: self.total_violations,
                active: self.active_violations,
                resolved: self.resolved_violations,
            });
        }

        if !(0.0..=100.0).contains(&self.compliance_score) {
            return Err(ProviderError::invalid(format!(
                "seller {} has compliance score {} outside 0..=100",
                self.id, self.compliance_score
            )));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = self.platforms.iter().find(|p| !seen.insert(p.as_str())) {
            return Err(ProviderError::invalid(format!(
                "seller {} lists platform '{}' twice",
                self.id, dup
            )));
        }

        Ok(())
    }

    /// True when the stored risk level differs from what the score implies.
    pub fn risk_overridden(&self) -> bool {
        RiskLevel::implied_by_score(self.compliance_score) != self.risk_level
    }

    /// Resolved share of all violations, rounded to a whole percent.
    pub fn resolution_rate(&self) -> Option<u32> {
        if self.total_violations == 0 {
            return None;
        }
        let rate = self.resolved_violations as f64 / self.total_violations as f64 * 100.0;
        Some(rate.round() as u32)
    }
}

/// Splits a provider listing into renderable sellers and flagged violations.
pub fn partition_consistent(sellers: Vec<Seller>) -> (Vec<Seller>, Vec<ProviderError>) {
    let mut valid = Vec::with_capacity(sellers.len());
    let mut flagged = Vec::new();

    for seller in sellers {
        match seller.check_invariants() {
            Ok(()) => valid.push(seller),
            Err(err) => {
                tracing::warn!(seller = %seller.id, error = %err, "Flagging inconsistent seller");
                flagged.push(err);
            }
        }
    }

    (valid, flagged)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub email: String,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Violation,
    Resolution,
    Notice,
}

impl ActivityKind {
    pub fn icon(self) -> &'static str {
        match self {
            ActivityKind::Violation => "⚠",
            ActivityKind::Resolution => "✓",
            ActivityKind::Notice => "✉",
        }
    }
}

/// Badge shown next to a dossier activity entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityBadge {
    Critical,
    High,
    Medium,
    Low,
    Resolved,
}

impl ActivityBadge {
    pub fn label(self) -> &'static str {
        match self {
            ActivityBadge::Critical => "Critical",
            ActivityBadge::High => "High",
            ActivityBadge::Medium => "Medium",
            ActivityBadge::Low => "Low",
            ActivityBadge::Resolved => "Resolved",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerActivity {
    pub date: NaiveDate,
    pub kind: ActivityKind,
    pub description: String,
    pub badge: ActivityBadge,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyScore {
    pub month: String,
    pub score: f64,
    pub violations: u32,
}

/// Registration details and history shown in the seller dossier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerProfile {
    pub registration_number: String,
    pub gst_number: String,
    pub established: NaiveDate,
    pub contact: Contact,
    pub recent_activity: Vec<SellerActivity>,
    /// Newest month first.
    pub compliance_history: Vec<MonthlyScore>,
}

impl SellerProfile {
    /// Score change of the latest month against the one before it.
    pub fn score_delta(&self) -> Option<f64> {
        match self.compliance_history.as_slice() {
            [latest, previous, ..] => Some(latest.score - previous.score),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn seller(total: u32, active: u32, resolved: u32, score: f64, risk: RiskLevel) -> Seller {
        Seller {
            id: SellerId::parse("SELL-2025-7834").unwrap(),
            name: "TechMart Electronics".into(),
            business_name: "TechMart Electronics Pvt Ltd".into(),
            compliance_score: score,
            risk_level: risk,
            total_violations: total,
            active_violations: active,
            resolved_violations: resolved,
            platforms: vec!["Amazon".into(), "Flipkart".into()],
            categories: vec!["Electronics".into()],
            last_activity: Utc.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap(),
            trend: Trend::Down,
        }
    }

    #[test]
    fn test_seller_id_pattern() {
        assert!(SellerId::parse("SELL-2025-7834").is_ok());
        assert!(SellerId::parse("SELL-2025-78345").is_err());
        assert!(SellerId::parse("seller-1").is_err());
    }

    #[test]
    fn test_violation_counters_must_add_up() {
        assert!(seller(23, 8, 15, 72.4, RiskLevel::Medium)
            .check_invariants()
            .is_ok());
        let err = seller(23, 8, 14, 72.4, RiskLevel::Medium)
            .check_invariants()
            .unwrap_err();
        assert!(matches!(err, ProviderError::InconsistentSeller { total: 23, .. }));
    }

    #[test]
    fn test_score_out_of_range_rejected() {
        assert!(seller(1, 1, 0, 101.0, RiskLevel::Low)
            .check_invariants()
            .is_err());
    }

    #[test]
    fn test_duplicate_platform_rejected() {
        let mut s = seller(1, 1, 0, 50.0, RiskLevel::High);
        s.platforms.push("Amazon".into());
        assert!(s.check_invariants().is_err());
    }

    #[test]
    fn test_implied_risk_thresholds() {
        assert_eq!(RiskLevel::implied_by_score(80.0), RiskLevel::Low);
        assert_eq!(RiskLevel::implied_by_score(79.9), RiskLevel::Medium);
        assert_eq!(RiskLevel::implied_by_score(60.0), RiskLevel::Medium);
        assert_eq!(RiskLevel::implied_by_score(59.9), RiskLevel::High);
    }

    #[test]
    fn test_risk_override_detection() {
        assert!(!seller(1, 1, 0, 72.4, RiskLevel::Medium).risk_overridden());
        assert!(seller(1, 1, 0, 65.8, RiskLevel::High).risk_overridden());
    }

    #[test]
    fn test_resolution_rate() {
        assert_eq!(seller(23, 8, 15, 72.4, RiskLevel::Medium).resolution_rate(), Some(65));
        assert_eq!(seller(0, 0, 0, 90.0, RiskLevel::Low).resolution_rate(), None);
    }

    #[test]
    fn test_partition_flags_inconsistent_sellers() {
        let (valid, flagged) = partition_consistent(vec![
            seller(23, 8, 15, 72.4, RiskLevel::Medium),
            seller(10, 1, 1, 72.4, RiskLevel::Medium),
        ]);
        assert_eq!(valid.len(), 1);
        assert_eq!(flagged.len(), 1);
    }

    #[test]
    fn test_score_delta_needs_two_months() {
        let mut profile = SellerProfile {
            registration_number: "CIN".into(),
            gst_number: "GST".into(),
            established: NaiveDate::from_ymd_opt(2018, 3, 15).unwrap(),
            contact: Contact {
                email: "a@b.c".into(),
                phone: "1".into(),
                address: "x".into(),
            },
            recent_activity: vec![],
            compliance_history: vec![MonthlyScore {
                month: "Jan".into(),
                score: 72.4,
                violations: 8,
            }],
        };
        assert_eq!(profile.score_delta(), None);
        profile.compliance_history.push(MonthlyScore {
            month: "Dec".into(),
            score: 68.2,
            violations: 12,
        });
        let delta = profile.score_delta().unwrap();
        assert!((delta - 4.2).abs() < 1e-9);
    }
}
