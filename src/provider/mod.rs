//! Collaborator contracts consumed by the dashboard.
//!
//! The dashboard never owns data. It asks a [`DataProvider`] for read-only
//! entities, a [`search::SearchProvider`] for suggestions and hits, and a
//! [`reports::ReportGenerator`] for report artifacts. The crate ships an
//! in-memory [`fixture::FixtureProvider`] implementing all three.

pub mod fixture;
pub mod reports;
pub mod search;
pub mod seed;

use crate::errors::ProviderResult;
use crate::model::{
    Case, CaseId, CaseStatus, CategorySummary, ComplianceMetric, ComplianceRule, EvidenceField,
    QuickStat, ReportArtifact, ReportTemplate, RiskLevel, Seller, SellerId, SellerProfile,
    Severity, StatPanel, ThreatMatrix, TimeFilter, TimeRange,
};
use std::cmp::Ordering;

pub use fixture::{Fixture, FixtureProvider};
pub use reports::{BackgroundReportGenerator, InlineReportGenerator, ReportGenerator};
pub use search::{SearchHit, SearchProvider};

/// Read-only query interface over cases, sellers, rules and reports.
pub trait DataProvider: Send + Sync {
    fn list_cases(&self, query: &CaseQuery) -> ProviderResult<Vec<Case>>;
    fn get_case(&self, id: &CaseId) -> ProviderResult<Case>;
    fn list_sellers(&self, query: &SellerQuery) -> ProviderResult<Vec<Seller>>;
    fn get_seller(&self, id: &SellerId) -> ProviderResult<Seller>;
    fn seller_profile(&self, id: &SellerId) -> ProviderResult<Option<SellerProfile>>;
    fn list_rules(&self) -> ProviderResult<Vec<ComplianceRule>>;
    fn list_rule_categories(&self) -> ProviderResult<Vec<CategorySummary>>;
    fn get_threat_matrix(&self, range: TimeRange) -> ProviderResult<ThreatMatrix>;
    fn evidence_for(&self, case: &CaseId) -> ProviderResult<Vec<EvidenceField>>;
    fn metrics(&self, window: TimeFilter) -> ProviderResult<Vec<ComplianceMetric>>;
    fn quick_stats(&self, panel: StatPanel) -> ProviderResult<Vec<QuickStat>>;
    fn report_templates(&self) -> ProviderResult<Vec<ReportTemplate>>;
    fn recent_reports(&self) -> ProviderResult<Vec<ReportArtifact>>;
}

// ============================================================================
// Case queries
// ============================================================================

/// Which cases a list shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CaseFilter {
    #[default]
    All,
    Critical,
    AssignedTo(String),
    PendingAction,
    Seller(SellerId),
}

impl CaseFilter {
    pub fn matches(&self, case: &Case) -> bool {
        match self {
            CaseFilter::All => true,
            CaseFilter::Critical => case.severity == Severity::Critical,
            CaseFilter::AssignedTo(name) => case.assignee.eq_ignore_ascii_case(name),
            CaseFilter::PendingAction => case.status == CaseStatus::PendingAction,
            CaseFilter::Seller(id) => &case.seller_ref == id,
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            CaseFilter::All => "All Cases".to_string(),
            CaseFilter::Critical => "Critical Only".to_string(),
            CaseFilter::AssignedTo(_) => "Assigned to Me".to_string(),
            CaseFilter::PendingAction => "Pending Action".to_string(),
            CaseFilter::Seller(id) => format!("Seller {}", id),
        }
    }
}

/// Ordering key requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CaseSort {
    #[default]
    Priority,
    DetectedAt,
    Severity,
    Impact,
    Status,
}

impl CaseSort {
    pub fn display_name(&self) -> &'static str {
        match self {
            CaseSort::Priority => "Priority Score",
            CaseSort::DetectedAt => "Time Detected",
            CaseSort::Severity => "Severity Level",
            CaseSort::Impact => "Estimated Impact",
            CaseSort::Status => "Status",
        }
    }

    /// Sort keys offered by the priority inbox.
    pub fn inbox_options() -> &'static [CaseSort] {
        &[
            CaseSort::Priority,
            CaseSort::DetectedAt,
            CaseSort::Severity,
            CaseSort::Impact,
        ]
    }

    /// Sort keys offered by the workspace.
    pub fn workspace_options() -> &'static [CaseSort] {
        &[
            CaseSort::Priority,
            CaseSort::DetectedAt,
            CaseSort::Severity,
            CaseSort::Status,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CaseQuery {
    pub filter: CaseFilter,
    pub sort: CaseSort,
}

impl CaseQuery {
    pub fn new(filter: CaseFilter, sort: CaseSort) -> Self {
        Self { filter, sort }
    }
}

/// Descending order by the chosen key, ties broken by ascending case id.
pub fn compare_cases(a: &Case, b: &Case, sort: CaseSort) -> Ordering {
    let primary = match sort {
        CaseSort::Priority => b.priority.cmp(&a.priority),
        CaseSort::DetectedAt => b.detected_at.cmp(&a.detected_at),
        CaseSort::Severity => b.severity.rank().cmp(&a.severity.rank()),
        CaseSort::Impact => b.estimated_impact.rank().cmp(&a.estimated_impact.rank()),
        CaseSort::Status => b.status.urgency().cmp(&a.status.urgency()),
    };
    primary.then_with(|| a.id.cmp(&b.id))
}

/// Stable sort of cases under [`compare_cases`].
pub fn sort_cases(cases: &mut [Case], sort: CaseSort) {
    cases.sort_by(|a, b| compare_cases(a, b, sort));
}

// ============================================================================
// Seller queries
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RiskFilter {
    #[default]
    All,
    High,
    Medium,
    Low,
}

impl RiskFilter {
    pub fn matches(&self, seller: &Seller) -> bool {
        match self {
            RiskFilter::All => true,
            RiskFilter::High => seller.risk_level == RiskLevel::High,
            RiskFilter::Medium => seller.risk_level == RiskLevel::Medium,
            RiskFilter::Low => seller.risk_level == RiskLevel::Low,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            RiskFilter::All => "All Risk Levels",
            RiskFilter::High => "High Risk",
            RiskFilter::Medium => "Medium Risk",
            RiskFilter::Low => "Low Risk",
        }
    }

    pub fn next(self) -> Self {
        match self {
            RiskFilter::All => RiskFilter::High,
            RiskFilter::High => RiskFilter::Medium,
            RiskFilter::Medium => RiskFilter::Low,
            RiskFilter::Low => RiskFilter::All,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SellerSort {
    #[default]
    Score,
    Violations,
    Activity,
}

impl SellerSort {
    pub fn display_name(&self) -> &'static str {
        match self {
            SellerSort::Score => "Compliance Score",
            SellerSort::Violations => "Total Violations",
            SellerSort::Activity => "Last Activity",
        }
    }

    pub fn next(self) -> Self {
        match self {
            SellerSort::Score => SellerSort::Violations,
            SellerSort::Violations => SellerSort::Activity,
            SellerSort::Activity => SellerSort::Score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SellerQuery {
    /// Case-insensitive substring over name, id and business name.
    pub text: String,
    pub risk: RiskFilter,
    pub sort: SellerSort,
}

impl SellerQuery {
    pub fn matches(&self, seller: &Seller) -> bool {
        if !self.risk.matches(seller) {
            return false;
        }
        let needle = self.text.trim().to_lowercase();
        needle.is_empty()
            || seller.name.to_lowercase().contains(&needle)
            || seller.id.as_str().to_lowercase().contains(&needle)
            || seller.business_name.to_lowercase().contains(&needle)
    }
}

/// Descending by the chosen key, ties broken by ascending seller id.
pub fn sort_sellers(sellers: &mut [Seller], sort: SellerSort) {
    sellers.sort_by(|a, b| {
        let primary = match sort {
            SellerSort::Score => b
                .compliance_score
                .partial_cmp(&a.compliance_score)
                .unwrap_or(Ordering::Equal),
            SellerSort::Violations => b.total_violations.cmp(&a.total_violations),
            SellerSort::Activity => b.last_activity.cmp(&a.last_activity),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    });
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::model::Impact;
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;

    fn arb_case() -> impl Strategy<Value = Case> {
        (0u32..1_000_000, 0u8..=100, 0usize..4, 0i64..500).prop_map(
            |(seq, priority, sev, hours)| {
                let anchor = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
                Case {
                    id: CaseId::parse(&format!("VIO-2025-{:06}", seq)).unwrap(),
                    title: String::new(),
                    description: String::new(),
                    seller_ref: SellerId::parse("SELL-2025-0001").unwrap(),
                    seller_name: String::new(),
                    platform: String::new(),
                    category: String::new(),
                    violation_type: String::new(),
                    severity: Severity::all()[sev],
                    priority,
                    detected_at: anchor - Duration::hours(hours),
                    status: CaseStatus::EvidenceReview,
                    assignee: String::new(),
                    evidence_count: 0,
                    repeat_offender: false,
                    estimated_impact: Impact::Low,
                    risk_factors: vec![],
                }
            },
        )
    }

    fn arb_sort() -> impl Strategy<Value = CaseSort> {
        prop_oneof![
            Just(CaseSort::Priority),
            Just(CaseSort::DetectedAt),
            Just(CaseSort::Severity),
            Just(CaseSort::Impact),
            Just(CaseSort::Status),
        ]
    }

    proptest! {
        /// Property: sorted output is ordered under the comparator.
        #[test]
        fn sorted_output_is_ordered(mut cases in prop::collection::vec(arb_case(), 0..40), sort in arb_sort()) {
            sort_cases(&mut cases, sort);
            for pair in cases.windows(2) {
                prop_assert_ne!(compare_cases(&pair[0], &pair[1], sort), Ordering::Greater);
            }
        }

        /// Property: the order does not depend on the input order.
        #[test]
        fn order_is_input_independent(mut cases in prop::collection::vec(arb_case(), 0..40), sort in arb_sort()) {
            // Ids are the final tie-break, so they must be unique for a total order.
            for (seq, case) in cases.iter_mut().enumerate() {
                case.id = CaseId::parse(&format!("VIO-2025-{:06}", seq)).unwrap();
            }
            let mut forward = cases.clone();
            let mut reversed: Vec<Case> = cases.into_iter().rev().collect();
            sort_cases(&mut forward, sort);
            sort_cases(&mut reversed, sort);
            let a: Vec<&CaseId> = forward.iter().map(|c| &c.id).collect();
            let b: Vec<&CaseId> = reversed.iter().map(|c| &c.id).collect();
            prop_assert_eq!(a, b);
        }
    }
}
