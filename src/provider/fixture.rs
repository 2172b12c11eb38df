//! In-memory provider backed by a validated fixture.
//!
//! A [`Fixture`] is the serialisable bundle of everything the dashboard can
//! show. It comes from the built-in seed or from a JSON file passed with
//! `--data`. [`FixtureProvider`] checks structural integrity on load and then
//! answers every [`DataProvider`] query from memory.

use super::{sort_cases, sort_sellers, CaseQuery, DataProvider, SellerQuery};
use crate::errors::{EntityKind, ProviderError, ProviderResult};
use crate::model::{
    Case, CaseId, CategorySummary, ComplianceMetric, ComplianceRule, EvidenceField, QuickStat,
    ReportArtifact, ReportTemplate, Seller, SellerId, SellerProfile, StatPanel, ThreatMatrix,
    ThreatMatrixCell, TimeFilter, TimeRange,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;

/// Threat matrix cells for one time range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixSnapshot {
    pub range: TimeRange,
    pub categories: Vec<String>,
    pub violation_types: Vec<String>,
    pub cells: Vec<ThreatMatrixCell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowMetrics {
    pub window: TimeFilter,
    pub metrics: Vec<ComplianceMetric>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelStats {
    pub panel: StatPanel,
    pub stats: Vec<QuickStat>,
}

/// Everything the dashboard can display, as loaded from disk or the seed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Fixture {
    pub cases: Vec<Case>,
    pub sellers: Vec<Seller>,
    pub profiles: BTreeMap<SellerId, SellerProfile>,
    pub rules: Vec<ComplianceRule>,
    pub rule_categories: Vec<CategorySummary>,
    pub threat_matrices: Vec<MatrixSnapshot>,
    pub evidence: BTreeMap<CaseId, Vec<EvidenceField>>,
    pub metrics: Vec<WindowMetrics>,
    pub quick_stats: Vec<PanelStats>,
    pub report_templates: Vec<ReportTemplate>,
    pub recent_reports: Vec<ReportArtifact>,
}

impl Fixture {
    /// Reads a fixture from a JSON file.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read fixture {}: {}", path.display(), e))?;
        let fixture: Fixture = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("failed to parse fixture {}: {}", path.display(), e))?;
        tracing::debug!(
            path = %path.display(),
            cases = fixture.cases.len(),
            sellers = fixture.sellers.len(),
            "Loaded fixture"
        );
        Ok(fixture)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Every problem in the fixture, including sellers whose violation
    /// counters disagree. An empty result means the fixture is clean.
    pub fn problems(&self) -> Vec<ProviderError> {
        let mut problems = self.structural_problems();
        problems.extend(
            self.sellers
                .iter()
                .filter_map(|seller| seller.check_invariants().err()),
        );
        problems
    }

    /// Problems that make the fixture unusable. Inconsistent sellers are
    /// not among them; screens exclude and count those at display time.
    fn structural_problems(&self) -> Vec<ProviderError> {
        let mut problems = Vec::new();

        let mut case_ids = HashSet::new();
        for case in &self.cases {
            if let Err(err) = case.check_invariants() {
                problems.push(err);
            }
            if !case_ids.insert(&case.id) {
                problems.push(ProviderError::invalid(format!(
                    "case {} appears twice",
                    case.id
                )));
            }
        }

        let mut seller_ids = HashSet::new();
        for seller in &self.sellers {
            if !seller_ids.insert(&seller.id) {
                problems.push(ProviderError::invalid(format!(
                    "seller {} appears twice",
                    seller.id
                )));
            }
        }

        for id in self.profiles.keys() {
            if !seller_ids.contains(id) {
                problems.push(ProviderError::invalid(format!(
                    "profile for unknown seller {}",
                    id
                )));
            }
        }

        for id in self.evidence.keys() {
            if !case_ids.contains(id) {
                problems.push(ProviderError::invalid(format!(
                    "evidence for unknown case {}",
                    id
                )));
            }
        }

        for rule in &self.rules {
            if rule.confidence > 100 {
                problems.push(ProviderError::invalid(format!(
                    "rule {} has confidence {} above 100",
                    rule.id, rule.confidence
                )));
            }
        }

        for (case_id, fields) in &self.evidence {
            for field in fields {
                if !(0.0..=1.0).contains(&field.confidence) {
                    problems.push(ProviderError::invalid(format!(
                        "evidence field {} of case {} has confidence {} outside 0..=1",
                        field.key, case_id, field.confidence
                    )));
                }
            }
        }

        let mut ranges = HashSet::new();
        for snapshot in &self.threat_matrices {
            if !ranges.insert(snapshot.range) {
                problems.push(ProviderError::invalid(format!(
                    "threat matrix for {} appears twice",
                    snapshot.range.label()
                )));
            }
            if let Err(err) = ThreatMatrix::new(
                snapshot.categories.clone(),
                snapshot.violation_types.clone(),
                snapshot.cells.clone(),
            ) {
                problems.push(err);
            }
        }

        problems
    }
}

/// [`DataProvider`] answering from a validated [`Fixture`].
#[derive(Debug, Clone)]
pub struct FixtureProvider {
    fixture: Fixture,
    matrices: HashMap<TimeRange, ThreatMatrix>,
}

impl FixtureProvider {
    /// Validates the fixture and indexes it.
    ///
    /// Structural problems are fatal and the first one is returned.
    /// Inconsistent sellers are kept and surface through [`Fixture::problems`].
    pub fn new(fixture: Fixture) -> ProviderResult<Self> {
        if let Some(err) = fixture.structural_problems().into_iter().next() {
            return Err(err);
        }

        let mut matrices = HashMap::new();
        for snapshot in &fixture.threat_matrices {
            let matrix = ThreatMatrix::new(
                snapshot.categories.clone(),
                snapshot.violation_types.clone(),
                snapshot.cells.clone(),
            )?;
            matrices.insert(snapshot.range, matrix);
        }

        tracing::info!(
            cases = fixture.cases.len(),
            sellers = fixture.sellers.len(),
            rules = fixture.rules.len(),
            "Fixture provider ready"
        );

        Ok(Self { fixture, matrices })
    }

    pub fn fixture(&self) -> &Fixture {
        &self.fixture
    }

    pub(crate) fn cases(&self) -> &[Case] {
        &self.fixture.cases
    }

    pub(crate) fn sellers(&self) -> &[Seller] {
        &self.fixture.sellers
    }
}

impl DataProvider for FixtureProvider {
    fn list_cases(&self, query: &CaseQuery) -> ProviderResult<Vec<Case>> {
        let mut cases: Vec<Case> = self
            .fixture
            .cases
            .iter()
            .filter(|case| query.filter.matches(case))
            .cloned()
            .collect();
        sort_cases(&mut cases, query.sort);
        Ok(cases)
    }

    fn get_case(&self, id: &CaseId) -> ProviderResult<Case> {
        self.fixture
            .cases
            .iter()
            .find(|case| &case.id == id)
            .cloned()
            .ok_or_else(|| ProviderError::not_found(EntityKind::Case, id.as_str()))
    }

    fn list_sellers(&self, query: &SellerQuery) -> ProviderResult<Vec<Seller>> {
        let mut sellers: Vec<Seller> = self
            .fixture
            .sellers
            .iter()
            .filter(|seller| query.matches(seller))
            .cloned()
            .collect();
        sort_sellers(&mut sellers, query.sort);
        Ok(sellers)
    }

    fn get_seller(&self, id: &SellerId) -> ProviderResult<Seller> {
        self.fixture
            .sellers
            .iter()
            .find(|seller| &seller.id == id)
            .cloned()
            .ok_or_else(|| ProviderError::not_found(EntityKind::Seller, id.as_str()))
    }

    fn seller_profile(&self, id: &SellerId) -> ProviderResult<Option<SellerProfile>> {
        self.get_seller(id)?;
        Ok(self.fixture.profiles.get(id).cloned())
    }

    fn list_rules(&self) -> ProviderResult<Vec<ComplianceRule>> {
        Ok(self.fixture.rules.clone())
    }

    fn list_rule_categories(&self) -> ProviderResult<Vec<CategorySummary>> {
        Ok(self.fixture.rule_categories.clone())
    }

    fn get_threat_matrix(&self, range: TimeRange) -> ProviderResult<ThreatMatrix> {
        self.matrices.get(&range).cloned().ok_or_else(|| {
            ProviderError::Unavailable(format!("no threat matrix for {}", range.label()))
        })
    }

    fn evidence_for(&self, case: &CaseId) -> ProviderResult<Vec<EvidenceField>> {
        self.get_case(case)?;
        Ok(self.fixture.evidence.get(case).cloned().unwrap_or_default())
    }

    fn metrics(&self, window: TimeFilter) -> ProviderResult<Vec<ComplianceMetric>> {
        Ok(self
            .fixture
            .metrics
            .iter()
            .find(|set| set.window == window)
            .map(|set| set.metrics.clone())
            .unwrap_or_default())
    }

    fn quick_stats(&self, panel: StatPanel) -> ProviderResult<Vec<QuickStat>> {
        Ok(self
            .fixture
            .quick_stats
            .iter()
            .find(|set| set.panel == panel)
            .map(|set| set.stats.clone())
            .unwrap_or_default())
    }

    fn report_templates(&self) -> ProviderResult<Vec<ReportTemplate>> {
        Ok(self.fixture.report_templates.clone())
    }

    fn recent_reports(&self) -> ProviderResult<Vec<ReportArtifact>> {
        let mut reports = self.fixture.recent_reports.clone();
        reports.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellSeverity;
    use crate::provider::seed::seed_fixture;
    use crate::provider::{CaseFilter, CaseSort, RiskFilter};
    use chrono::{TimeZone, Utc};

    fn provider() -> FixtureProvider {
        let anchor = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
        FixtureProvider::new(seed_fixture(anchor)).unwrap()
    }

    #[test]
    fn test_seed_is_clean() {
        let anchor = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
        assert!(seed_fixture(anchor).problems().is_empty());
    }

    #[test]
    fn test_list_cases_sorted_by_priority() {
        let cases = provider().list_cases(&CaseQuery::default()).unwrap();
        let priorities: Vec<u8> = cases.iter().map(|c| c.priority).collect();
        assert_eq!(priorities, vec![95, 93, 88, 85, 75]);
    }

    #[test]
    fn test_list_cases_filtered() {
        let query = CaseQuery::new(CaseFilter::Critical, CaseSort::Priority);
        let cases = provider().list_cases(&query).unwrap();
        assert_eq!(cases.len(), 2);
    }

    #[test]
    fn test_get_case_not_found() {
        let id = CaseId::parse("VIO-2025-999999").unwrap();
        let err = provider().get_case(&id).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_evidence_for_unknown_case_is_not_found() {
        let id = CaseId::parse("VIO-2025-999999").unwrap();
        assert!(provider().evidence_for(&id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_seller_query_text_and_risk() {
        let p = provider();
        let query = SellerQuery {
            text: "organic".into(),
            ..SellerQuery::default()
        };
        let sellers = p.list_sellers(&query).unwrap();
        assert_eq!(sellers.len(), 1);
        assert_eq!(sellers[0].id.as_str(), "SELL-2025-7836");

        let query = SellerQuery {
            risk: RiskFilter::Low,
            ..SellerQuery::default()
        };
        assert!(p
            .list_sellers(&query)
            .unwrap()
            .iter()
            .all(|s| s.risk_level == crate::model::RiskLevel::Low));
    }

    #[test]
    fn test_profile_absent_for_seller_without_dossier() {
        let p = provider();
        let fashion = SellerId::parse("SELL-2025-7838").unwrap();
        assert_eq!(p.seller_profile(&fashion).unwrap(), None);
        let techmart = SellerId::parse("SELL-2025-7834").unwrap();
        assert!(p.seller_profile(&techmart).unwrap().is_some());
    }

    #[test]
    fn test_every_range_has_a_complete_matrix() {
        let p = provider();
        for range in [
            TimeRange::Last7Days,
            TimeRange::Last30Days,
            TimeRange::Last90Days,
        ] {
            let matrix = p.get_threat_matrix(range).unwrap();
            assert_eq!(matrix.cells().len(), matrix.rows() * matrix.columns());
        }
    }

    #[test]
    fn test_incomplete_matrix_rejected_on_load() {
        let mut fixture = Fixture::default();
        fixture.threat_matrices.push(MatrixSnapshot {
            range: TimeRange::Last7Days,
            categories: vec!["Electronics".into()],
            violation_types: vec!["Missing MRP".into(), "Net Quantity".into()],
            cells: vec![ThreatMatrixCell {
                category: "Electronics".into(),
                violation_type: "Missing MRP".into(),
                count: 3,
                severity: CellSeverity::Low,
            }],
        });
        assert!(FixtureProvider::new(fixture).is_err());
    }

    #[test]
    fn test_inconsistent_seller_is_kept_but_reported() {
        let anchor = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
        let mut fixture = seed_fixture(anchor);
        fixture.sellers[0].resolved_violations += 1;
        let problems = fixture.problems();
        assert_eq!(problems.len(), 1);
        assert!(matches!(
            problems[0],
            ProviderError::InconsistentSeller { .. }
        ));
        assert!(FixtureProvider::new(fixture).is_ok());
    }

    #[test]
    fn test_json_round_trip_preserves_fixture() {
        let anchor = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
        let fixture = seed_fixture(anchor);
        let json = fixture.to_json_pretty().unwrap();
        let parsed: Fixture = serde_json::from_str(&json).unwrap();
        pretty_assertions::assert_eq!(parsed, fixture);
    }

    #[test]
    fn test_recent_reports_newest_first() {
        let reports = provider().recent_reports().unwrap();
        assert_eq!(reports[0].id, "RPT-2025-001");
        assert!(reports
            .windows(2)
            .all(|w| w[0].generated_at >= w[1].generated_at));
    }
}
