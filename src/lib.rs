// Export modules for library usage
pub mod cli;
pub mod config;
pub mod errors;
pub mod model;
pub mod observability;
pub mod provider;
pub mod tui;

// Re-export commonly used types
pub use crate::config::ScrutineyeConfig;
pub use crate::errors::{ConfigError, ProviderError, ProviderResult};
pub use crate::model::{Case, CaseId, Seller, SellerId};
pub use crate::provider::{DataProvider, Fixture, FixtureProvider};
pub use crate::tui::view_state::{NavRequest, View, ViewState};
