//! Report templates and generated report artifacts.

use crate::model::Tone;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    Week,
    Month,
    Quarter,
    Year,
}

impl ReportPeriod {
    pub fn label(self) -> &'static str {
        match self {
            ReportPeriod::Week => "This Week",
            ReportPeriod::Month => "This Month",
            ReportPeriod::Quarter => "This Quarter",
            ReportPeriod::Year => "This Year",
        }
    }

    pub fn next(self) -> Self {
        match self {
            ReportPeriod::Week => ReportPeriod::Month,
            ReportPeriod::Month => ReportPeriod::Quarter,
            ReportPeriod::Quarter => ReportPeriod::Year,
            ReportPeriod::Year => ReportPeriod::Week,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportFrequency {
    Daily,
    Weekly,
    Monthly,
}

impl ReportFrequency {
    pub fn label(self) -> &'static str {
        match self {
            ReportFrequency::Daily => "Daily",
            ReportFrequency::Weekly => "Weekly",
            ReportFrequency::Monthly => "Monthly",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportTemplate {
    pub id: String,
    pub title: String,
    pub description: String,
    pub tone: Tone,
    pub last_generated: String,
    pub frequency: ReportFrequency,
    /// Short kind used in artifact listings ("Compliance Summary").
    pub kind: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportFormat {
    #[serde(rename = "PDF")]
    Pdf,
    Excel,
}

impl ReportFormat {
    pub fn label(self) -> &'static str {
        match self {
            ReportFormat::Pdf => "PDF",
            ReportFormat::Excel => "Excel",
        }
    }
}

/// Descriptor of a generated report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportArtifact {
    pub id: String,
    pub title: String,
    pub kind: String,
    pub generated_by: String,
    pub generated_at: NaiveDateTime,
    pub size_kb: u32,
    pub format: ReportFormat,
}

impl ReportArtifact {
    pub fn size_label(&self) -> String {
        if self.size_kb >= 1024 {
            format!("{:.1} MB", self.size_kb as f64 / 1024.0)
        } else {
            format!("{} KB", self.size_kb)
        }
    }
}

/// A request handed to the report generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub template_id: String,
    pub period: ReportPeriod,
    pub requested_by: String,
}
