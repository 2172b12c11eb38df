//! Top-level view selection and shell flags.
//!
//! [`ViewState`] is the single store the root controller owns. The shell
//! and the screens receive it by reference; nothing else holds a copy.
//!
//! # Navigation Graph
//!
//! ```text
//!     Dashboard ◄──► Workspace ◄──► SellerIntel ◄──► Reports ◄──► RulesEngine
//!         │              ▲               ▲
//!         │   (case)     │   (seller)    │
//!         └──────────────┴───────────────┘
//!
//!   Any view can reach any other view; a request may carry a focus
//!   (case id for Workspace, seller id for SellerIntel).
//! ```

use crate::errors::UnknownView;
use crate::model::{CaseId, SellerId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The five top-level screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    #[default]
    Dashboard,
    Workspace,
    SellerIntel,
    Reports,
    RulesEngine,
}

impl View {
    pub fn all() -> &'static [View] {
        &[
            View::Dashboard,
            View::Workspace,
            View::SellerIntel,
            View::Reports,
            View::RulesEngine,
        ]
    }

    /// Stable identifier used on the command line and in config files.
    pub fn id(self) -> &'static str {
        match self {
            View::Dashboard => "dashboard",
            View::Workspace => "workspace",
            View::SellerIntel => "seller-intel",
            View::Reports => "reports",
            View::RulesEngine => "rules-engine",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Workspace => "Workspace",
            View::SellerIntel => "Seller Intel",
            View::Reports => "Reports",
            View::RulesEngine => "Rules Engine",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            View::Dashboard => "Morning briefing & overview",
            View::Workspace => "Active case investigations",
            View::SellerIntel => "Seller compliance profiles",
            View::Reports => "Analytics & documentation",
            View::RulesEngine => "Compliance logic & settings",
        }
    }

    /// Sidebar hotkey, `1` through `5`.
    pub fn hotkey(self) -> char {
        match self {
            View::Dashboard => '1',
            View::Workspace => '2',
            View::SellerIntel => '3',
            View::Reports => '4',
            View::RulesEngine => '5',
        }
    }

    pub fn from_hotkey(c: char) -> Option<View> {
        View::all().iter().copied().find(|v| v.hotkey() == c)
    }

    /// Parses an identifier, falling back to the dashboard with a warning.
    pub fn parse_or_default(raw: &str) -> View {
        raw.parse().unwrap_or_else(|err: UnknownView| {
            tracing::warn!(view = %err.0, "Unknown view identifier, showing dashboard");
            View::Dashboard
        })
    }
}

impl FromStr for View {
    type Err = UnknownView;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        View::all()
            .iter()
            .copied()
            .find(|v| v.id() == wanted)
            .ok_or_else(|| UnknownView(s.to_string()))
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Entity a navigation request asks its destination to open.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FocusId {
    Case(CaseId),
    Seller(SellerId),
}

/// Where to go, and optionally what to open once there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavRequest {
    pub view: View,
    pub focus: Option<FocusId>,
}

impl NavRequest {
    pub fn to(view: View) -> Self {
        Self { view, focus: None }
    }

    pub fn case(id: CaseId) -> Self {
        Self {
            view: View::Workspace,
            focus: Some(FocusId::Case(id)),
        }
    }

    pub fn seller(id: SellerId) -> Self {
        Self {
            view: View::SellerIntel,
            focus: Some(FocusId::Seller(id)),
        }
    }
}

/// Active view plus the two shell flags.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    active_view: View,
    sidebar_open: bool,
    dark_mode: bool,
}

impl ViewState {
    pub fn new(active_view: View, dark_mode: bool) -> Self {
        Self {
            active_view,
            sidebar_open: false,
            dark_mode,
        }
    }

    pub fn active_view(&self) -> View {
        self.active_view
    }

    pub fn set_active_view(&mut self, view: View) {
        if view != self.active_view {
            tracing::debug!(from = %self.active_view, to = %view, "Switching view");
        }
        self.active_view = view;
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn open_sidebar(&mut self) {
        self.sidebar_open = true;
    }

    pub fn close_sidebar(&mut self) {
        self.sidebar_open = false;
    }

    /// Sidebar activation: switch view, then always close the sidebar.
    pub fn select_from_sidebar(&mut self, view: View) {
        self.set_active_view(view);
        self.close_sidebar();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_view_is_dashboard() {
        let state = ViewState::default();
        assert_eq!(state.active_view(), View::Dashboard);
        assert!(!state.sidebar_open());
        assert!(!state.dark_mode());
    }

    #[test]
    fn test_view_ids_round_trip() {
        for &view in View::all() {
            assert_eq!(view.id().parse::<View>().unwrap(), view);
        }
    }

    #[test]
    fn test_unknown_view_falls_back_to_dashboard() {
        assert!("settings".parse::<View>().is_err());
        assert_eq!(View::parse_or_default("settings"), View::Dashboard);
        assert_eq!(View::parse_or_default(" Reports "), View::Reports);
    }

    #[test]
    fn test_hotkeys_cover_all_views() {
        for (i, &view) in View::all().iter().enumerate() {
            let key = char::from_digit(i as u32 + 1, 10).unwrap();
            assert_eq!(View::from_hotkey(key), Some(view));
        }
        assert_eq!(View::from_hotkey('6'), None);
    }

    #[test]
    fn test_open_then_close_sidebar() {
        let mut state = ViewState::default();
        state.open_sidebar();
        assert!(state.sidebar_open());
        state.close_sidebar();
        assert!(!state.sidebar_open());
    }

    #[test]
    fn test_select_from_sidebar_closes_it() {
        let mut state = ViewState::default();
        state.open_sidebar();
        state.select_from_sidebar(View::Reports);
        assert_eq!(state.active_view(), View::Reports);
        assert!(!state.sidebar_open());
    }

    #[test]
    fn test_nav_request_constructors() {
        let id = CaseId::parse("VIO-2025-001247").unwrap();
        let request = NavRequest::case(id.clone());
        assert_eq!(request.view, View::Workspace);
        assert_eq!(request.focus, Some(FocusId::Case(id)));
        assert_eq!(NavRequest::to(View::Reports).focus, None);
    }
}
