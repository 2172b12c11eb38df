//! Compliance rules, rule categories and detection thresholds.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleStatus {
    Active,
    Testing,
    Inactive,
}

impl RuleStatus {
    pub fn label(self) -> &'static str {
        match self {
            RuleStatus::Active => "Active",
            RuleStatus::Testing => "Testing",
            RuleStatus::Inactive => "Inactive",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceRule {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub status: RuleStatus,
    /// Detection confidence in percent.
    pub confidence: u8,
    pub last_updated: NaiveDate,
    pub violations_detected: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub name: String,
    pub rules: u32,
    pub violations: u32,
}

/// One adjustable detection threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Threshold {
    OcrConfidence,
    Severity,
    DailyViolationLimit,
    SellerRiskScore,
}

impl Threshold {
    pub fn all() -> &'static [Threshold] {
        &[
            Threshold::OcrConfidence,
            Threshold::Severity,
            Threshold::DailyViolationLimit,
            Threshold::SellerRiskScore,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            Threshold::OcrConfidence => "OCR Confidence Threshold",
            Threshold::Severity => "Violation Severity Threshold",
            Threshold::DailyViolationLimit => "Daily Violation Limit",
            Threshold::SellerRiskScore => "Seller Risk Score Threshold",
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            Threshold::OcrConfidence => "Minimum confidence required for text extraction",
            Threshold::Severity => "Minimum severity score to flag as violation",
            Threshold::DailyViolationLimit => "Alert when daily violations exceed this number",
            Threshold::SellerRiskScore => "Flag sellers with risk scores above this value",
        }
    }

    /// Inclusive range and step used by the editor.
    pub fn bounds(self) -> (u32, u32, u32) {
        match self {
            Threshold::OcrConfidence => (70, 99, 1),
            Threshold::Severity => (1, 10, 1),
            Threshold::DailyViolationLimit => (0, 1000, 5),
            Threshold::SellerRiskScore => (0, 100, 1),
        }
    }
}

/// Detection sensitivity and alert thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionThresholds {
    pub ocr_confidence: u32,
    pub severity: u32,
    pub daily_violation_limit: u32,
    pub seller_risk_score: u32,
}

impl Default for DetectionThresholds {
    fn default() -> Self {
        Self {
            ocr_confidence: 85,
            severity: 7,
            daily_violation_limit: 50,
            seller_risk_score: 75,
        }
    }
}

impl DetectionThresholds {
    pub fn get(&self, threshold: Threshold) -> u32 {
        match threshold {
            Threshold::OcrConfidence => self.ocr_confidence,
            Threshold::Severity => self.severity,
            Threshold::DailyViolationLimit => self.daily_violation_limit,
            Threshold::SellerRiskScore => self.seller_risk_score,
        }
    }

    fn slot(&mut self, threshold: Threshold) -> &mut u32 {
        match threshold {
            Threshold::OcrConfidence => &mut self.ocr_confidence,
            Threshold::Severity => &mut self.severity,
            Threshold::DailyViolationLimit => &mut self.daily_violation_limit,
            Threshold::SellerRiskScore => &mut self.seller_risk_score,
        }
    }

    /// Moves a threshold by `steps` increments, staying inside its bounds.
    pub fn adjust(&mut self, threshold: Threshold, steps: i32) {
        let (min, max, step) = threshold.bounds();
        let slot = self.slot(threshold);
        let next = *slot as i64 + steps as i64 * step as i64;
        *slot = next.clamp(min as i64, max as i64) as u32;
    }

    /// Brings every value inside its bounds.
    pub fn clamped(mut self) -> Self {
        for &threshold in Threshold::all() {
            let (min, max, _) = threshold.bounds();
            let slot = self.slot(threshold);
            *slot = (*slot).clamp(min, max);
        }
        self
    }
}
