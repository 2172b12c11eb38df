//! Category × violation-type threat matrix.

use crate::errors::{ProviderError, ProviderResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Count at which a cell reaches full intensity.
pub const MAX_CELL_COUNT: u32 = 50;
/// Fill alpha of an empty cell.
pub const MIN_ALPHA: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "7days")]
    Last7Days,
    #[serde(rename = "30days")]
    Last30Days,
    #[serde(rename = "90days")]
    Last90Days,
}

impl TimeRange {
    pub fn label(self) -> &'static str {
        match self {
            TimeRange::Last7Days => "Last 7 Days",
            TimeRange::Last30Days => "Last 30 Days",
            TimeRange::Last90Days => "Last 90 Days",
        }
    }

    pub fn days(self) -> u32 {
        match self {
            TimeRange::Last7Days => 7,
            TimeRange::Last30Days => 30,
            TimeRange::Last90Days => 90,
        }
    }

    pub fn next(self) -> Self {
        match self {
            TimeRange::Last7Days => TimeRange::Last30Days,
            TimeRange::Last30Days => TimeRange::Last90Days,
            TimeRange::Last90Days => TimeRange::Last7Days,
        }
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        TimeRange::Last30Days
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellSeverity {
    High,
    Medium,
    Low,
}

impl CellSeverity {
    pub fn label(self) -> &'static str {
        match self {
            CellSeverity::High => "high",
            CellSeverity::Medium => "medium",
            CellSeverity::Low => "low",
        }
    }
}

/// Identity of a cell, independent of its position in the grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellKey {
    pub category: String,
    pub violation_type: String,
}

impl CellKey {
    pub fn new(category: impl Into<String>, violation_type: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            violation_type: violation_type.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatMatrixCell {
    pub category: String,
    pub violation_type: String,
    pub count: u32,
    pub severity: CellSeverity,
}

impl ThreatMatrixCell {
    pub fn key(&self) -> CellKey {
        CellKey::new(self.category.clone(), self.violation_type.clone())
    }

    pub fn matches(&self, key: &CellKey) -> bool {
        self.category == key.category && self.violation_type == key.violation_type
    }

    /// Fill alpha: linear in `count`, clamped to `[0, 1]`.
    pub fn intensity(&self) -> f64 {
        intensity(self.count)
    }
}

pub fn intensity(count: u32) -> f64 {
    let ratio = count as f64 / MAX_CELL_COUNT as f64;
    (MIN_ALPHA + ratio * (1.0 - MIN_ALPHA)).clamp(0.0, 1.0)
}

/// Full cross product of categories and violation types, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreatMatrix {
    categories: Vec<String>,
    violation_types: Vec<String>,
    cells: Vec<ThreatMatrixCell>,
}

impl ThreatMatrix {
    /// Builds the grid, rejecting missing, duplicate or unknown cells.
    pub fn new(
        categories: Vec<String>,
        violation_types: Vec<String>,
        cells: Vec<ThreatMatrixCell>,
    ) -> ProviderResult<Self> {
        let expected = categories.len() * violation_types.len();
        if cells.len() != expected {
            return Err(ProviderError::invalid(format!(
                "threat matrix has {} cells, expected {} ({} categories x {} violation types)",
                cells.len(),
                expected,
                categories.len(),
                violation_types.len()
            )));
        }

        let mut seen = HashSet::with_capacity(cells.len());
        for cell in &cells {
            if !categories.contains(&cell.category)
                || !violation_types.contains(&cell.violation_type)
            {
                return Err(ProviderError::invalid(format!(
                    "threat matrix cell '{} x {}' is outside the grid",
                    cell.category, cell.violation_type
                )));
            }
            if !seen.insert(cell.key()) {
                return Err(ProviderError::invalid(format!(
                    "threat matrix cell '{} x {}' appears twice",
                    cell.category, cell.violation_type
                )));
            }
        }

        // Normalise to row-major order so positional access is well defined.
        let mut ordered = Vec::with_capacity(expected);
        for category in &categories {
            for violation_type in &violation_types {
                if let Some(cell) = cells
                    .iter()
                    .find(|c| &c.category == category && &c.violation_type == violation_type)
                {
                    ordered.push(cell.clone());
                }
            }
        }

        Ok(Self {
            categories,
            violation_types,
            cells: ordered,
        })
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn violation_types(&self) -> &[String] {
        &self.violation_types
    }

    pub fn cells(&self) -> &[ThreatMatrixCell] {
        &self.cells
    }

    pub fn rows(&self) -> usize {
        self.categories.len()
    }

    pub fn columns(&self) -> usize {
        self.violation_types.len()
    }

    pub fn cell_at(&self, row: usize, column: usize) -> Option<&ThreatMatrixCell> {
        if row >= self.rows() || column >= self.columns() {
            return None;
        }
        self.cells.get(row * self.columns() + column)
    }

    pub fn find(&self, key: &CellKey) -> Option<&ThreatMatrixCell> {
        self.cells.iter().find(|c| c.matches(key))
    }

    pub fn total_count(&self) -> u32 {
        self.cells.iter().map(|c| c.count).sum()
    }
}
