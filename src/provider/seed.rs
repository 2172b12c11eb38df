//! Built-in sample data.
//!
//! Relative timestamps ("2 hours ago") are anchored at the moment the seed
//! is built so the dashboard reads the same on every start.

use super::fixture::{Fixture, MatrixSnapshot, PanelStats, WindowMetrics};
use crate::model::{
    ActivityBadge, ActivityKind, BoundingBox, Case, CaseId, CaseStatus, CategorySummary,
    CellSeverity, ComplianceMetric, ComplianceRule, Contact, EvidenceField, Impact, MonthlyScore,
    QuickStat, ReportArtifact, ReportFormat, ReportFrequency, ReportTemplate, RiskLevel,
    RuleStatus, Seller, SellerActivity, SellerId, SellerProfile, Severity, StatPanel,
    ThreatMatrixCell, TimeFilter, TimeRange, Tone, Trend,
};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use std::collections::BTreeMap;

pub const MATRIX_CATEGORIES: &[&str] = &[
    "Electronics",
    "Packaged Foods",
    "Apparel",
    "Health Supplements",
    "Baby Products",
    "Home & Garden",
];

pub const MATRIX_VIOLATION_TYPES: &[&str] = &[
    "Missing MRP",
    "Country of Origin",
    "Net Quantity",
    "Expiry Date",
    "Manufacturer Info",
    "False Claims",
];

/// Builds the sample fixture with relative times measured back from `anchor`.
pub fn seed_fixture(anchor: DateTime<Utc>) -> Fixture {
    let mut profiles = BTreeMap::new();
    profiles.insert(seller_id("SELL-2025-7834"), techmart_profile());
    profiles.insert(seller_id("SELL-2025-7836"), organic_profile());

    let cases = seed_cases(anchor);
    let evidence = cases
        .iter()
        .map(|case| (case.id.clone(), evidence_for_case(case)))
        .collect();

    Fixture {
        cases,
        sellers: seed_sellers(anchor),
        profiles,
        rules: seed_rules(),
        rule_categories: seed_rule_categories(),
        threat_matrices: [
            TimeRange::Last7Days,
            TimeRange::Last30Days,
            TimeRange::Last90Days,
        ]
        .into_iter()
        .map(seed_matrix)
        .collect(),
        evidence,
        metrics: seed_metrics(),
        quick_stats: seed_quick_stats(),
        report_templates: seed_report_templates(),
        recent_reports: seed_recent_reports(),
    }
}

fn case_id(raw: &str) -> CaseId {
    CaseId::parse(raw).unwrap_or_else(|err| panic!("seed case id {}: {}", raw, err))
}

fn seller_id(raw: &str) -> SellerId {
    SellerId::parse(raw).unwrap_or_else(|err| panic!("seed seller id {}: {}", raw, err))
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn timestamp(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    date(year, month, day)
        .and_hms_opt(hour, minute, 0)
        .unwrap_or_default()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

struct CaseSeed {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    seller: &'static str,
    seller_name: &'static str,
    platform: &'static str,
    category: &'static str,
    violation_type: &'static str,
    severity: Severity,
    priority: u8,
    hours_ago: i64,
    status: CaseStatus,
    assignee: &'static str,
    evidence_count: u32,
    repeat_offender: bool,
    impact: Impact,
    risk_factors: &'static [&'static str],
}

const CASES: &[CaseSeed] = &[
    CaseSeed {
        id: "VIO-2025-001247",
        title: "Missing MRP on Electronics Bundle",
        description: "High-value electronics bundle (₹45,000) missing mandatory MRP disclosure",
        seller: "SELL-2025-7834",
        seller_name: "TechMart Electronics",
        platform: "Amazon",
        category: "Electronics",
        violation_type: "Missing MRP",
        severity: Severity::Critical,
        priority: 95,
        hours_ago: 2,
        status: CaseStatus::UnderInvestigation,
        assignee: "Inspector Kumar",
        evidence_count: 3,
        repeat_offender: true,
        impact: Impact::High,
        risk_factors: &["Repeat Offender", "High Value Product", "Consumer Electronics"],
    },
    CaseSeed {
        id: "VIO-2025-001248",
        title: "Incorrect Country of Origin - Baby Products",
        description: "Baby food products showing incorrect country of origin information",
        seller: "SELL-2025-7835",
        seller_name: "BabyCare Essentials",
        platform: "Flipkart",
        category: "Baby Products",
        violation_type: "Country of Origin",
        severity: Severity::Critical,
        priority: 93,
        hours_ago: 3,
        status: CaseStatus::EvidenceReview,
        assignee: "Inspector Sharma",
        evidence_count: 5,
        repeat_offender: false,
        impact: Impact::High,
        risk_factors: &["Sensitive Category", "Health & Safety", "Import Compliance"],
    },
    CaseSeed {
        id: "VIO-2025-001249",
        title: "Misleading Net Quantity Claims",
        description: "Organic food products with inconsistent net quantity declarations",
        seller: "SELL-2025-7836",
        seller_name: "Organic Foods Co.",
        platform: "Myntra",
        category: "Packaged Foods",
        violation_type: "Net Quantity",
        severity: Severity::High,
        priority: 88,
        hours_ago: 5,
        status: CaseStatus::PendingAction,
        assignee: "Inspector Patel",
        evidence_count: 2,
        repeat_offender: true,
        impact: Impact::Medium,
        risk_factors: &["Repeat Offender", "Consumer Deception", "Food Category"],
    },
    CaseSeed {
        id: "VIO-2025-001250",
        title: "Missing Expiry Date Information",
        description: "Health supplements lacking proper expiry date disclosure",
        seller: "SELL-2025-7837",
        seller_name: "HealthPlus Supplements",
        platform: "Amazon",
        category: "Health Supplements",
        violation_type: "Expiry Date",
        severity: Severity::High,
        priority: 85,
        hours_ago: 6,
        status: CaseStatus::UnderInvestigation,
        assignee: "Inspector Kumar",
        evidence_count: 4,
        repeat_offender: false,
        impact: Impact::High,
        risk_factors: &["Health Category", "Safety Critical", "Regulatory Risk"],
    },
    CaseSeed {
        id: "VIO-2025-001251",
        title: "Incomplete Manufacturer Details",
        description: "Clothing items missing complete manufacturer information",
        seller: "SELL-2025-7838",
        seller_name: "Fashion Forward",
        platform: "Flipkart",
        category: "Apparel",
        violation_type: "Manufacturer Info",
        severity: Severity::Medium,
        priority: 75,
        hours_ago: 8,
        status: CaseStatus::EvidenceReview,
        assignee: "Inspector Sharma",
        evidence_count: 2,
        repeat_offender: false,
        impact: Impact::Medium,
        risk_factors: &["Import Product", "Traceability Issue", "Consumer Rights"],
    },
];

fn seed_cases(anchor: DateTime<Utc>) -> Vec<Case> {
    CASES
        .iter()
        .map(|seed| Case {
            id: case_id(seed.id),
            title: seed.title.to_string(),
            description: seed.description.to_string(),
            seller_ref: seller_id(seed.seller),
            seller_name: seed.seller_name.to_string(),
            platform: seed.platform.to_string(),
            category: seed.category.to_string(),
            violation_type: seed.violation_type.to_string(),
            severity: seed.severity,
            priority: seed.priority,
            detected_at: anchor - Duration::hours(seed.hours_ago),
            status: seed.status,
            assignee: seed.assignee.to_string(),
            evidence_count: seed.evidence_count,
            repeat_offender: seed.repeat_offender,
            estimated_impact: seed.impact,
            risk_factors: strings(seed.risk_factors),
        })
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn seller(
    id: &str,
    name: &str,
    business_name: &str,
    score: f64,
    risk: RiskLevel,
    (total, active, resolved): (u32, u32, u32),
    platforms: &[&str],
    categories: &[&str],
    last_activity: DateTime<Utc>,
    trend: Trend,
) -> Seller {
    Seller {
        id: seller_id(id),
        name: name.to_string(),
        business_name: business_name.to_string(),
        compliance_score: score,
        risk_level: risk,
        total_violations: total,
        active_violations: active,
        resolved_violations: resolved,
        platforms: strings(platforms),
        categories: strings(categories),
        last_activity,
        trend,
    }
}

fn seed_sellers(anchor: DateTime<Utc>) -> Vec<Seller> {
    vec![
        seller(
            "SELL-2025-7834",
            "TechMart Electronics",
            "TechMart Electronics Pvt Ltd",
            72.4,
            RiskLevel::Medium,
            (23, 8, 15),
            &["Amazon", "Flipkart", "Myntra"],
            &["Electronics", "Gadgets", "Accessories"],
            anchor - Duration::hours(2),
            Trend::Down,
        ),
        seller(
            "SELL-2025-7835",
            "BabyCare Essentials",
            "BabyCare Essentials India Ltd",
            89.2,
            RiskLevel::Low,
            (12, 2, 10),
            &["Amazon", "Flipkart"],
            &["Baby Products", "Health & Safety"],
            anchor - Duration::days(1),
            Trend::Up,
        ),
        // Stored risk deliberately stricter than the score tier.
        seller(
            "SELL-2025-7836",
            "Organic Foods Co.",
            "Organic Foods Company",
            65.8,
            RiskLevel::High,
            (34, 12, 22),
            &["Amazon", "BigBasket", "Grofers"],
            &["Packaged Foods", "Organic Products"],
            anchor - Duration::hours(3),
            Trend::Down,
        ),
        seller(
            "SELL-2025-7837",
            "HealthPlus Supplements",
            "HealthPlus Nutrition Pvt Ltd",
            58.3,
            RiskLevel::High,
            (19, 9, 10),
            &["Amazon", "Netmeds"],
            &["Health Supplements", "Wellness"],
            anchor - Duration::hours(6),
            Trend::Down,
        ),
        seller(
            "SELL-2025-7838",
            "Fashion Forward",
            "Fashion Forward Retail LLP",
            81.6,
            RiskLevel::Low,
            (9, 3, 6),
            &["Flipkart", "Myntra"],
            &["Apparel", "Footwear"],
            anchor - Duration::hours(8),
            Trend::Up,
        ),
    ]
}

fn activity(
    (year, month, day): (i32, u32, u32),
    kind: ActivityKind,
    description: &str,
    badge: ActivityBadge,
) -> SellerActivity {
    SellerActivity {
        date: date(year, month, day),
        kind,
        description: description.to_string(),
        badge,
    }
}

fn history(entries: &[(&str, f64, u32)]) -> Vec<MonthlyScore> {
    entries
        .iter()
        .map(|&(month, score, violations)| MonthlyScore {
            month: month.to_string(),
            score,
            violations,
        })
        .collect()
}

fn techmart_profile() -> SellerProfile {
    SellerProfile {
        registration_number: "U74999DL2018PTC334567".into(),
        gst_number: "07AABCT1234M1Z5".into(),
        established: date(2018, 3, 15),
        contact: Contact {
            email: "compliance@techmart.com".into(),
            phone: "+91-11-2345-6789".into(),
            address: "123 Tech Park, Gurgaon, Haryana 122001".into(),
        },
        recent_activity: vec![
            activity(
                (2025, 1, 15),
                ActivityKind::Violation,
                "Missing MRP on Electronics Bundle",
                ActivityBadge::Critical,
            ),
            activity(
                (2025, 1, 10),
                ActivityKind::Resolution,
                "Corrected Net Quantity on Product #ABC123",
                ActivityBadge::Resolved,
            ),
            activity(
                (2025, 1, 8),
                ActivityKind::Notice,
                "Compliance Notice Issued - Country of Origin",
                ActivityBadge::High,
            ),
            activity(
                (2025, 1, 5),
                ActivityKind::Violation,
                "Incorrect Manufacturer Details",
                ActivityBadge::Medium,
            ),
            activity(
                (2025, 1, 3),
                ActivityKind::Resolution,
                "Updated MRP on 15 products",
                ActivityBadge::Resolved,
            ),
        ],
        compliance_history: history(&[
            ("Jan", 72.4, 8),
            ("Dec", 68.2, 12),
            ("Nov", 75.1, 6),
            ("Oct", 71.8, 9),
            ("Sep", 69.5, 11),
            ("Aug", 73.2, 7),
        ]),
    }
}

fn organic_profile() -> SellerProfile {
    SellerProfile {
        registration_number: "U15400MH2016PTC287431".into(),
        gst_number: "27AACCO5678K1Z2".into(),
        established: date(2016, 7, 2),
        contact: Contact {
            email: "legal@organicfoods.co.in".into(),
            phone: "+91-22-4567-8901".into(),
            address: "Plot 42, MIDC Andheri East, Mumbai, Maharashtra 400093".into(),
        },
        recent_activity: vec![
            activity(
                (2025, 1, 15),
                ActivityKind::Violation,
                "Misleading Net Quantity Claims",
                ActivityBadge::High,
            ),
            activity(
                (2025, 1, 9),
                ActivityKind::Notice,
                "Compliance Notice Issued - Net Quantity",
                ActivityBadge::High,
            ),
            activity(
                (2025, 1, 4),
                ActivityKind::Resolution,
                "Relabelled 40 SKUs with correct net weight",
                ActivityBadge::Resolved,
            ),
        ],
        compliance_history: history(&[
            ("Jan", 65.8, 12),
            ("Dec", 67.1, 10),
            ("Nov", 70.4, 7),
            ("Oct", 68.9, 9),
        ]),
    }
}

fn seed_rules() -> Vec<ComplianceRule> {
    let rule = |id: &str,
                name: &str,
                description: &str,
                category: &str,
                status: RuleStatus,
                confidence: u8,
                updated: NaiveDate,
                violations: u32| ComplianceRule {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        status,
        confidence,
        last_updated: updated,
        violations_detected: violations,
    };

    vec![
        rule(
            "MRP-001",
            "MRP Disclosure Requirement",
            "All products must display Maximum Retail Price clearly",
            "Pricing",
            RuleStatus::Active,
            95,
            date(2025, 1, 10),
            234,
        ),
        rule(
            "COO-001",
            "Country of Origin Declaration",
            "Products must clearly state country of manufacture",
            "Origin",
            RuleStatus::Active,
            92,
            date(2025, 1, 8),
            156,
        ),
        rule(
            "NQ-001",
            "Net Quantity Specification",
            "Packaged goods must display accurate net quantity",
            "Quantity",
            RuleStatus::Active,
            88,
            date(2025, 1, 5),
            89,
        ),
        rule(
            "EXP-001",
            "Expiry Date Requirement",
            "Perishable products must show clear expiry dates",
            "Safety",
            RuleStatus::Testing,
            76,
            date(2025, 1, 12),
            45,
        ),
    ]
}

fn seed_rule_categories() -> Vec<CategorySummary> {
    [
        ("Electronics", 12, 456),
        ("Packaged Foods", 18, 234),
        ("Apparel", 8, 123),
        ("Health Supplements", 15, 89),
        ("Baby Products", 22, 67),
    ]
    .into_iter()
    .map(|(name, rules, violations)| CategorySummary {
        name: name.to_string(),
        rules,
        violations,
    })
    .collect()
}

/// FNV-1a, used to give every matrix cell a stable pseudo-random count.
fn cell_hash(category: &str, violation_type: &str, range: TimeRange) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    let bytes = category
        .bytes()
        .chain([0u8])
        .chain(violation_type.bytes())
        .chain([0u8])
        .chain(range.days().to_le_bytes());
    for byte in bytes {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    hash
}

fn seed_matrix(range: TimeRange) -> MatrixSnapshot {
    let mut cells = Vec::with_capacity(MATRIX_CATEGORIES.len() * MATRIX_VIOLATION_TYPES.len());
    for category in MATRIX_CATEGORIES {
        for violation_type in MATRIX_VIOLATION_TYPES {
            let hash = cell_hash(category, violation_type, range);
            let count = (hash % 50) as u32 + 1;
            let severity = match (hash >> 16) % 10 {
                7..=9 => CellSeverity::High,
                4..=6 => CellSeverity::Medium,
                _ => CellSeverity::Low,
            };
            cells.push(ThreatMatrixCell {
                category: category.to_string(),
                violation_type: violation_type.to_string(),
                count,
                severity,
            });
        }
    }

    MatrixSnapshot {
        range,
        categories: strings(MATRIX_CATEGORIES),
        violation_types: strings(MATRIX_VIOLATION_TYPES),
        cells,
    }
}

fn field(key: &str, value: &str, confidence: f64, (x, y, w, h): (u16, u16, u16, u16)) -> EvidenceField {
    EvidenceField {
        key: key.to_string(),
        value: value.to_string(),
        confidence,
        location: BoundingBox { x, y, w, h },
        violation: false,
    }
}

/// The four label fields extracted from a listing image, with the field
/// behind the case's violation type flagged.
fn evidence_for_case(case: &Case) -> Vec<EvidenceField> {
    let (mrp, quantity, origin, manufacturer) = match case.id.as_str() {
        "VIO-2025-001247" => ("₹2,499", "500g", "Made in China", "TechCorp Industries"),
        "VIO-2025-001248" => ("₹649", "400g", "Made in India", "NutriBaby Foods"),
        "VIO-2025-001249" => ("₹385", "1kg", "Made in India", "Organic Foods Company"),
        "VIO-2025-001250" => ("₹1,199", "60 capsules", "Made in USA", "HealthPlus Labs"),
        _ => ("₹899", "1 piece", "Made in Bangladesh", "Not stated"),
    };

    let flagged = match case.violation_type.as_str() {
        "Missing MRP" => "mrp",
        "Net Quantity" => "netQuantity",
        "Country of Origin" => "countryOfOrigin",
        "Manufacturer Info" => "manufacturer",
        _ => "",
    };

    let mut fields = vec![
        field("mrp", mrp, 0.95, (340, 120, 80, 25)),
        field("netQuantity", quantity, 0.88, (280, 180, 60, 20)),
        field("countryOfOrigin", origin, 0.92, (200, 380, 120, 18)),
        field("manufacturer", manufacturer, 0.89, (150, 420, 200, 22)),
    ];
    for f in &mut fields {
        f.violation = f.key == flagged;
    }
    fields
}

fn metric(
    title: &str,
    value: &str,
    change: &str,
    trend: Trend,
    tone: Tone,
    description: &str,
) -> ComplianceMetric {
    ComplianceMetric {
        title: title.to_string(),
        value: value.to_string(),
        change: change.to_string(),
        trend,
        tone,
        description: description.to_string(),
    }
}

fn seed_metrics() -> Vec<WindowMetrics> {
    let set = |window, values: [(&str, &str, Trend); 4]| WindowMetrics {
        window,
        metrics: vec![
            metric(
                "Critical Violations",
                values[0].0,
                values[0].1,
                values[0].2,
                Tone::Red,
                "Requiring immediate action",
            ),
            metric(
                "Pending Reviews",
                values[1].0,
                values[1].1,
                values[1].2,
                Tone::Amber,
                "In review queue",
            ),
            metric(
                "Compliance Rate",
                values[2].0,
                values[2].1,
                values[2].2,
                Tone::Green,
                "Overall platform compliance",
            ),
            metric(
                "Active Monitoring",
                values[3].0,
                values[3].1,
                values[3].2,
                Tone::Blue,
                "Products under surveillance",
            ),
        ],
    };

    vec![
        set(
            TimeFilter::Today,
            [
                ("23", "+12%", Trend::Up),
                ("156", "-8%", Trend::Down),
                ("87.3%", "+2.1%", Trend::Up),
                ("12.4K", "+156", Trend::Up),
            ],
        ),
        set(
            TimeFilter::Week,
            [
                ("118", "+5%", Trend::Up),
                ("642", "-3%", Trend::Down),
                ("86.9%", "+0.8%", Trend::Up),
                ("12.1K", "+410", Trend::Up),
            ],
        ),
        set(
            TimeFilter::Month,
            [
                ("467", "-4%", Trend::Down),
                ("2,318", "+6%", Trend::Up),
                ("85.7%", "+1.4%", Trend::Up),
                ("11.8K", "+1.2K", Trend::Up),
            ],
        ),
    ]
}

fn stat(label: &str, value: &str, note: Option<&str>) -> QuickStat {
    QuickStat {
        label: label.to_string(),
        value: value.to_string(),
        note: note.map(str::to_string),
    }
}

fn seed_quick_stats() -> Vec<PanelStats> {
    vec![
        PanelStats {
            panel: StatPanel::TodaysProgress,
            stats: vec![
                stat("Cases Reviewed", "12", Some("+3")),
                stat("Violations Found", "8", Some("+2")),
                stat("Actions Issued", "5", Some("+1")),
                stat("Efficiency Score", "94.2%", None),
            ],
        },
        PanelStats {
            panel: StatPanel::Reports,
            stats: vec![
                stat("Reports Generated", "47", Some("+12% this month")),
                stat("Data Points Analyzed", "156", None),
                stat("Automated Reports", "23", Some("Scheduled weekly")),
                stat("Report Accuracy", "94%", None),
            ],
        },
        PanelStats {
            panel: StatPanel::Sellers,
            stats: vec![
                stat("Total Sellers", "1,247", None),
                stat("High Risk", "89", None),
                stat("Medium Risk", "234", None),
                stat("Low Risk", "924", None),
            ],
        },
        PanelStats {
            panel: StatPanel::Rules,
            stats: vec![
                stat("Active Rules", "47", None),
                stat("Testing", "3", None),
                stat("Detection Accuracy", "92.4%", None),
                stat("Total Violations", "1,247", None),
            ],
        },
    ]
}

fn seed_report_templates() -> Vec<ReportTemplate> {
    let template = |id: &str,
                    title: &str,
                    description: &str,
                    tone: Tone,
                    last_generated: &str,
                    frequency: ReportFrequency,
                    kind: &str| ReportTemplate {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        tone,
        last_generated: last_generated.to_string(),
        frequency,
        kind: kind.to_string(),
    };

    vec![
        template(
            "compliance-summary",
            "Compliance Summary Report",
            "Overall platform compliance metrics and trends",
            Tone::Blue,
            "2 hours ago",
            ReportFrequency::Daily,
            "Compliance Summary",
        ),
        template(
            "violation-analysis",
            "Violation Pattern Analysis",
            "Deep dive into violation types and categories",
            Tone::Amber,
            "1 day ago",
            ReportFrequency::Weekly,
            "Violation Analysis",
        ),
        template(
            "seller-performance",
            "Seller Performance Dashboard",
            "Individual seller compliance scorecards",
            Tone::Green,
            "3 hours ago",
            ReportFrequency::Weekly,
            "Seller Performance",
        ),
        template(
            "regulatory-impact",
            "Regulatory Impact Assessment",
            "Effectiveness of enforcement actions",
            Tone::Blue,
            "1 week ago",
            ReportFrequency::Monthly,
            "Regulatory Impact",
        ),
    ]
}

fn seed_recent_reports() -> Vec<ReportArtifact> {
    vec![
        ReportArtifact {
            id: "RPT-2025-001".into(),
            title: "January 2025 Compliance Summary".into(),
            kind: "Compliance Summary".into(),
            generated_by: "Inspector Kumar".into(),
            generated_at: timestamp(2025, 1, 15, 9, 30),
            size_kb: 2458,
            format: ReportFormat::Pdf,
        },
        ReportArtifact {
            id: "RPT-2025-002".into(),
            title: "Electronics Category Violation Analysis".into(),
            kind: "Violation Analysis".into(),
            generated_by: "Inspector Sharma".into(),
            generated_at: timestamp(2025, 1, 14, 16, 45),
            size_kb: 1843,
            format: ReportFormat::Excel,
        },
        ReportArtifact {
            id: "RPT-2025-003".into(),
            title: "Top 50 Sellers Performance Review".into(),
            kind: "Seller Performance".into(),
            generated_by: "Inspector Patel".into(),
            generated_at: timestamp(2025, 1, 13, 11, 20),
            size_kb: 3174,
            format: ReportFormat::Pdf,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::relative_time;
    use chrono::TimeZone;

    fn anchor() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_case_ages_read_relative_to_anchor() {
        let fixture = seed_fixture(anchor());
        let ages: Vec<String> = fixture
            .cases
            .iter()
            .map(|c| relative_time(anchor(), c.detected_at))
            .collect();
        assert_eq!(
            ages,
            vec![
                "2 hours ago",
                "3 hours ago",
                "5 hours ago",
                "6 hours ago",
                "8 hours ago"
            ]
        );
    }

    #[test]
    fn test_matrix_is_deterministic_and_in_range() {
        let a = seed_matrix(TimeRange::Last30Days);
        let b = seed_matrix(TimeRange::Last30Days);
        assert_eq!(a, b);
        assert_eq!(a.cells.len(), 36);
        assert!(a.cells.iter().all(|c| (1..=50).contains(&c.count)));
    }

    #[test]
    fn test_ranges_differ() {
        assert_ne!(
            seed_matrix(TimeRange::Last7Days).cells,
            seed_matrix(TimeRange::Last90Days).cells
        );
    }

    #[test]
    fn test_evidence_flags_violating_field() {
        let fixture = seed_fixture(anchor());
        let first = case_id("VIO-2025-001247");
        let fields = &fixture.evidence[&first];
        let flagged: Vec<&str> = fields
            .iter()
            .filter(|f| f.violation)
            .map(|f| f.key.as_str())
            .collect();
        assert_eq!(flagged, vec!["mrp"]);
    }

    #[test]
    fn test_every_case_seller_exists() {
        let fixture = seed_fixture(anchor());
        for case in &fixture.cases {
            assert!(fixture.sellers.iter().any(|s| s.id == case.seller_ref));
        }
    }
}
