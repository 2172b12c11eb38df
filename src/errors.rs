//! Error types shared by the data collaborators and the configuration layer.
//!
//! Nothing in here is fatal to the dashboard: screens translate provider
//! failures into placeholder or retry states and keep running.
//!
//! # Example
//!
//! ```rust
//! use scrutineye::errors::{EntityKind, ProviderError};
//!
//! let err = ProviderError::not_found(EntityKind::Case, "VIO-2025-009999");
//! assert!(err.is_not_found());
//! assert!(!err.is_retryable());
//! ```

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Kind of entity a lookup was made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Case,
    Seller,
    Rule,
    ReportTemplate,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Case => "case",
            EntityKind::Seller => "seller",
            EntityKind::Rule => "rule",
            EntityKind::ReportTemplate => "report template",
        };
        f.write_str(name)
    }
}

/// Failures reported by a data, search or report collaborator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// The requested entity does not exist (any more).
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: String },

    /// The collaborator could not answer; the caller may retry.
    #[error("data provider unavailable: {0}")]
    Unavailable(String),

    /// Supplied data is malformed (bad identifier, out-of-range value, gaps).
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// A seller whose violation counters do not add up.
    #[error(
        "seller {id} is inconsistent: total violations {total} != active {active} + resolved {resolved}"
    )]
    InconsistentSeller {
        id: String,
        total: u32,
        active: u32,
        resolved: u32,
    },
}

impl ProviderError {
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidData(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Only an unavailable collaborator is worth asking again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Result alias for collaborator calls.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse .scrutineye.toml: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// A view identifier outside the five known screens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown view '{0}'")]
pub struct UnknownView(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = ProviderError::not_found(EntityKind::Seller, "SELL-2025-0001");
        assert_eq!(err.to_string(), "seller SELL-2025-0001 not found");
    }

    #[test]
    fn test_inconsistent_seller_message() {
        let err = ProviderError::InconsistentSeller {
            id: "SELL-2025-7834".into(),
            total: 23,
            active: 8,
            resolved: 14,
        };
        assert!(err.to_string().contains("23 != active 8 + resolved 14"));
    }

    #[test]
    fn test_classification() {
        assert!(ProviderError::Unavailable("timeout".into()).is_retryable());
        assert!(!ProviderError::invalid("bad id").is_retryable());
        assert!(!ProviderError::invalid("bad id").is_not_found());
    }
}
