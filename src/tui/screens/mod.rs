//! Top-level screens mounted by the root controller.
//!
//! A screen is constructed fresh on every navigation from its defaults plus
//! an optional focus. It owns its local state (tabs, filters, sort, view
//! mode) and reports intent back as a [`ScreenAction`]; it never switches
//! views itself.

pub mod case_file;
pub mod dashboard;
pub mod reports;
pub mod rules_engine;
pub mod seller_dossier;
pub mod seller_intel;
pub mod workspace;

use crate::config::InspectorConfig;
use crate::model::{DetectionThresholds, ReportArtifact, ReportRequest};
use crate::provider::DataProvider;
use crate::tui::theme::Theme;
use crate::tui::view_state::{FocusId, NavRequest, View};
use chrono::{DateTime, Utc};
use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{layout::Rect, Frame};

pub use case_file::CaseFileScreen;
pub use dashboard::DashboardScreen;
pub use reports::ReportsScreen;
pub use rules_engine::RulesEngineScreen;
pub use seller_dossier::SellerDossierScreen;
pub use seller_intel::SellerIntelScreen;
pub use workspace::WorkspaceScreen;

/// Intent a screen hands back to the root controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenAction {
    None,
    Navigate(NavRequest),
    Status(String),
    RequestReport(ReportRequest),
    CopyToClipboard { text: String, description: String },
}

/// Collaborators available while handling input.
pub struct ScreenContext<'a> {
    pub provider: &'a dyn DataProvider,
    pub inspector: &'a InspectorConfig,
    pub thresholds: DetectionThresholds,
}

/// Everything a screen needs to draw itself.
pub struct RenderContext<'a> {
    pub theme: &'a Theme,
    pub now: DateTime<Utc>,
    pub inspector: &'a InspectorConfig,
    /// Reports completed during this session, newest first.
    pub session_reports: &'a [ReportArtifact],
}

/// Pointer input relevant to screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pointer {
    Click { column: u16, row: u16 },
    Hover { column: u16, row: u16 },
}

impl Pointer {
    pub fn from_event(event: &MouseEvent) -> Option<Self> {
        let (column, row) = (event.column, event.row);
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => Some(Pointer::Click { column, row }),
            MouseEventKind::Moved => Some(Pointer::Hover { column, row }),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum Screen {
    Dashboard(DashboardScreen),
    Workspace(WorkspaceScreen),
    SellerIntel(SellerIntelScreen),
    Reports(ReportsScreen),
    RulesEngine(RulesEngineScreen),
}

impl Screen {
    /// Builds the screen for `view` from scratch.
    pub fn mount(view: View, focus: Option<FocusId>, ctx: &ScreenContext) -> Self {
        tracing::debug!(view = %view, focus = ?focus, "Mounting screen");
        match view {
            View::Dashboard => Screen::Dashboard(DashboardScreen::new(ctx)),
            View::Workspace => {
                let case = match focus {
                    Some(FocusId::Case(id)) => Some(id),
                    Some(other) => {
                        tracing::debug!(focus = ?other, "Workspace ignores non-case focus");
                        None
                    }
                    None => None,
                };
                Screen::Workspace(WorkspaceScreen::new(ctx, case))
            }
            View::SellerIntel => {
                let seller = match focus {
                    Some(FocusId::Seller(id)) => Some(id),
                    Some(other) => {
                        tracing::debug!(focus = ?other, "Seller Intel ignores non-seller focus");
                        None
                    }
                    None => None,
                };
                Screen::SellerIntel(SellerIntelScreen::new(ctx, seller))
            }
            View::Reports => Screen::Reports(ReportsScreen::new(ctx)),
            View::RulesEngine => Screen::RulesEngine(RulesEngineScreen::new(ctx)),
        }
    }

    pub fn view(&self) -> View {
        match self {
            Screen::Dashboard(_) => View::Dashboard,
            Screen::Workspace(_) => View::Workspace,
            Screen::SellerIntel(_) => View::SellerIntel,
            Screen::Reports(_) => View::Reports,
            Screen::RulesEngine(_) => View::RulesEngine,
        }
    }

    /// True while a text field inside the screen is being edited; the shell
    /// then forwards every key to the screen.
    pub fn captures_text(&self) -> bool {
        match self {
            Screen::SellerIntel(screen) => screen.captures_text(),
            _ => false,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, ctx: &ScreenContext) -> ScreenAction {
        match self {
            Screen::Dashboard(screen) => screen.handle_key(key, ctx),
            Screen::Workspace(screen) => screen.handle_key(key, ctx),
            Screen::SellerIntel(screen) => screen.handle_key(key, ctx),
            Screen::Reports(screen) => screen.handle_key(key, ctx),
            Screen::RulesEngine(screen) => screen.handle_key(key, ctx),
        }
    }

    pub fn handle_pointer(&mut self, pointer: Pointer, ctx: &ScreenContext) -> ScreenAction {
        match self {
            Screen::Dashboard(screen) => screen.handle_pointer(pointer, ctx),
            Screen::Workspace(screen) => screen.handle_pointer(pointer, ctx),
            Screen::SellerIntel(screen) => screen.handle_pointer(pointer, ctx),
            Screen::Reports(screen) => screen.handle_pointer(pointer, ctx),
            Screen::RulesEngine(screen) => screen.handle_pointer(pointer),
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &RenderContext) {
        match self {
            Screen::Dashboard(screen) => screen.render(frame, area, ctx),
            Screen::Workspace(screen) => screen.render(frame, area, ctx),
            Screen::SellerIntel(screen) => screen.render(frame, area, ctx),
            Screen::Reports(screen) => screen.render(frame, area, ctx),
            Screen::RulesEngine(screen) => screen.render(frame, area, ctx),
        }
    }

    /// Footer hints for the screen's current mode.
    pub fn key_hints(&self) -> Vec<(&'static str, &'static str)> {
        match self {
            Screen::Dashboard(screen) => screen.key_hints(),
            Screen::Workspace(screen) => screen.key_hints(),
            Screen::SellerIntel(screen) => screen.key_hints(),
            Screen::Reports(_) => ReportsScreen::key_hints(),
            Screen::RulesEngine(_) => RulesEngineScreen::key_hints(),
        }
    }
}
