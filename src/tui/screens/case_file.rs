//! Case File: one case with its workflow and evidence.

use super::{Pointer, RenderContext, ScreenAction, ScreenContext};
use crate::model::{relative_time, Case, CaseId, SellerId};
use crate::tui::loadable::{render_placeholder, Loadable};
use crate::tui::style_map::{severity_tier, status_tier, Tier};
use crate::tui::theme::Theme;
use crate::tui::view_state::NavRequest;
use crate::tui::widgets::evidence_viewer::EvidenceViewer;
use crate::tui::widgets::workflow::WorkflowStepper;
use crate::tui::widgets::{badge, hit, HitRegion};
use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseTab {
    #[default]
    Evidence,
    History,
    Analysis,
}

impl CaseTab {
    pub fn all() -> &'static [CaseTab] {
        &[CaseTab::Evidence, CaseTab::History, CaseTab::Analysis]
    }

    pub fn label(self) -> &'static str {
        match self {
            CaseTab::Evidence => "Evidence Viewer",
            CaseTab::History => "Case History",
            CaseTab::Analysis => "AI Analysis",
        }
    }

    fn next(self) -> Self {
        match self {
            CaseTab::Evidence => CaseTab::History,
            CaseTab::History => CaseTab::Analysis,
            CaseTab::Analysis => CaseTab::Evidence,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum CaseFileTarget {
    Seller(SellerId),
    Tab(CaseTab),
}

#[derive(Debug)]
pub struct CaseFileScreen {
    id: CaseId,
    case: Loadable<Case>,
    tab: CaseTab,
    stepper: WorkflowStepper,
    evidence: EvidenceViewer,
    regions: Vec<HitRegion<CaseFileTarget>>,
}

impl CaseFileScreen {
    pub fn new(ctx: &ScreenContext, id: CaseId) -> Self {
        let case = Loadable::from_result(ctx.provider.get_case(&id));
        let evidence = EvidenceViewer::load(ctx.provider, &id);
        Self {
            id,
            case,
            tab: CaseTab::default(),
            stepper: WorkflowStepper::new(),
            evidence,
            regions: Vec::new(),
        }
    }

    pub fn case_id(&self) -> &CaseId {
        &self.id
    }

    pub fn case(&self) -> Option<&Case> {
        self.case.value()
    }

    pub fn tab(&self) -> CaseTab {
        self.tab
    }

    pub fn stepper(&self) -> &WorkflowStepper {
        &self.stepper
    }

    pub fn evidence(&self) -> &EvidenceViewer {
        &self.evidence
    }

    fn seller_action(&self) -> ScreenAction {
        match self.case() {
            Some(case) => ScreenAction::Navigate(NavRequest::seller(case.seller_ref.clone())),
            None => ScreenAction::None,
        }
    }

    /// Returns `None` when the key is not handled here, letting the host
    /// treat Esc as "back".
    pub fn handle_key(&mut self, key: KeyEvent, ctx: &ScreenContext) -> Option<ScreenAction> {
        if self.tab == CaseTab::Evidence && self.evidence.handle_key(key) {
            return Some(ScreenAction::None);
        }

        let action = match key.code {
            KeyCode::Tab => {
                self.tab = self.tab.next();
                ScreenAction::None
            }
            KeyCode::Left | KeyCode::Char('[') => {
                self.stepper.step(-1);
                ScreenAction::None
            }
            KeyCode::Right | KeyCode::Char(']') => {
                self.stepper.step(1);
                ScreenAction::None
            }
            KeyCode::Char('s') => self.seller_action(),
            KeyCode::Char('c') => ScreenAction::CopyToClipboard {
                text: self.id.to_string(),
                description: "case id".to_string(),
            },
            KeyCode::Char('r') => {
                self.case.refresh(ctx.provider.get_case(&self.id));
                self.evidence.reload(ctx.provider);
                ScreenAction::None
            }
            _ => return None,
        };
        Some(action)
    }

    pub fn handle_pointer(&mut self, pointer: Pointer) -> ScreenAction {
        match pointer {
            Pointer::Hover { column, row } => {
                if self.tab == CaseTab::Evidence {
                    self.evidence.handle_hover(column, row);
                }
                ScreenAction::None
            }
            Pointer::Click { column, row } => {
                match hit(&self.regions, column, row) {
                    Some(CaseFileTarget::Seller(id)) => {
                        return ScreenAction::Navigate(NavRequest::seller(id));
                    }
                    Some(CaseFileTarget::Tab(tab)) => self.tab = tab,
                    None => {
                        self.stepper.handle_click(column, row);
                    }
                }
                ScreenAction::None
            }
        }
    }

    pub fn key_hints() -> Vec<(&'static str, &'static str)> {
        vec![
            ("Esc", "Back"),
            ("Tab", "Tab"),
            ("←→", "Stage"),
            ("↑↓", "Field"),
            ("s", "Seller"),
            ("c", "Copy id"),
        ]
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &RenderContext) {
        let theme = ctx.theme;
        let Some(case) = self.case.value().cloned() else {
            self.regions.clear();
            let message = match &self.case {
                Loadable::Missing(_) => format!("Case {} was not found. Press Esc to return.", self.id),
                other => other.failure_hint().unwrap_or_default(),
            };
            render_placeholder(frame, area, "Case File", &message, theme);
            return;
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(7), // Summary
                Constraint::Length(3), // Workflow
                Constraint::Length(1), // Tabs
                Constraint::Min(6),    // Tab body
            ])
            .split(area);

        let mut regions = Vec::new();
        self.render_summary(frame, rows[0], &case, ctx.now, theme, &mut regions);

        let workflow_block = Block::default()
            .borders(Borders::ALL)
            .title(" Investigation Workflow [←→] ")
            .border_style(theme.border_style(false));
        let workflow_area = workflow_block.inner(rows[1]);
        frame.render_widget(workflow_block, rows[1]);
        self.stepper.render(frame, workflow_area, theme);

        render_tabs(frame, rows[2], self.tab, theme, &mut regions);
        self.regions = regions;

        match self.tab {
            CaseTab::Evidence => self.evidence.render(frame, rows[3], theme),
            other => {
                let body = Paragraph::new(Span::styled(
                    format!("{} content would be displayed here", other.label()),
                    theme.metric_style(),
                ))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).border_style(theme.border_style(false)));
                frame.render_widget(body, rows[3]);
            }
        }
    }

    fn render_summary(
        &self,
        frame: &mut Frame,
        area: Rect,
        case: &Case,
        now: DateTime<Utc>,
        theme: &Theme,
        regions: &mut Vec<HitRegion<CaseFileTarget>>,
    ) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Case File · {} ", case.id))
            .border_style(theme.border_style(true));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut headline = vec![
            Span::styled(case.title.clone(), theme.title_style()),
            Span::raw("  "),
            badge(case.severity.label(), severity_tier(case.severity), theme),
            Span::raw(" "),
            badge(case.status.label(), status_tier(case.status), theme),
        ];
        if case.repeat_offender {
            headline.push(Span::styled("  ↻ Repeat offender", theme.tier_style(Tier::High)));
        }

        let seller_button = format!("[s] {} ›", case.seller_name);
        let lines = vec![
            Line::from(headline),
            Line::from(Span::styled(case.description.clone(), theme.metric_style())),
            Line::from(vec![
                Span::styled(seller_button.clone(), theme.key_hint_style()),
                Span::styled(
                    format!(
                        "  {} · {} · {}",
                        case.seller_ref, case.platform, case.category
                    ),
                    theme.metric_style(),
                ),
            ]),
            Line::from(Span::styled(
                format!(
                    "Priority {} · Detected {} · Assigned to {} · {} evidence items · Impact {}",
                    case.priority,
                    relative_time(now, case.detected_at),
                    case.assignee,
                    case.evidence_count,
                    case.estimated_impact.label()
                ),
                theme.metric_style(),
            )),
            Line::from(Span::styled(
                format!("Risk factors: {}", case.risk_factors.join(", ")),
                theme.tier_style(Tier::Medium),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);

        if inner.height > 2 {
            regions.push(HitRegion::new(
                Rect::new(
                    inner.x,
                    inner.y + 2,
                    (seller_button.width() as u16).min(inner.width),
                    1,
                ),
                CaseFileTarget::Seller(case.seller_ref.clone()),
            ));
        }
    }
}

fn render_tabs(
    frame: &mut Frame,
    area: Rect,
    active: CaseTab,
    theme: &Theme,
    regions: &mut Vec<HitRegion<CaseFileTarget>>,
) {
    let mut spans = Vec::new();
    let mut x = area.x;
    for &tab in CaseTab::all() {
        let text = format!(" {} ", tab.label());
        let width = text.width() as u16;
        let style = if tab == active {
            theme.active_style().patch(theme.selected_style())
        } else {
            theme.metric_style()
        };
        spans.push(Span::styled(text, style));
        spans.push(Span::raw(" "));
        regions.push(HitRegion::new(Rect::new(x, area.y, width, 1), CaseFileTarget::Tab(tab)));
        x += width + 1;
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InspectorConfig;
    use crate::model::DetectionThresholds;
    use crate::provider::{seed::seed_fixture, FixtureProvider};
    use crate::tui::widgets::workflow::WorkflowStage;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn run<R>(id: &str, f: impl FnOnce(&mut CaseFileScreen, &ScreenContext) -> R) -> R {
        let provider = FixtureProvider::new(seed_fixture(Utc::now())).unwrap();
        let inspector = InspectorConfig::default();
        let ctx = ScreenContext {
            provider: &provider,
            inspector: &inspector,
            thresholds: DetectionThresholds::default(),
        };
        let mut screen = CaseFileScreen::new(&ctx, CaseId::parse(id).unwrap());
        f(&mut screen, &ctx)
    }

    #[test]
    fn test_copy_key_copies_case_id() {
        run("VIO-2025-001248", |screen, ctx| {
            assert_eq!(
                screen.handle_key(key(KeyCode::Char('c')), ctx),
                Some(ScreenAction::CopyToClipboard {
                    text: "VIO-2025-001248".into(),
                    description: "case id".into(),
                })
            );
        });
    }

    #[test]
    fn test_seller_key_navigates_with_focus() {
        run("VIO-2025-001247", |screen, ctx| {
            let seller = screen.case().unwrap().seller_ref.clone();
            assert_eq!(
                screen.handle_key(key(KeyCode::Char('s')), ctx),
                Some(ScreenAction::Navigate(NavRequest::seller(seller)))
            );
        });
    }

    #[test]
    fn test_stepper_keys() {
        run("VIO-2025-001247", |screen, ctx| {
            screen.handle_key(key(KeyCode::Right), ctx);
            screen.handle_key(key(KeyCode::Right), ctx);
            assert_eq!(screen.stepper().current(), WorkflowStage::Escalate);
        });
    }

    #[test]
    fn test_tab_cycles() {
        run("VIO-2025-001247", |screen, ctx| {
            screen.handle_key(key(KeyCode::Tab), ctx);
            assert_eq!(screen.tab(), CaseTab::History);
            screen.handle_key(key(KeyCode::Tab), ctx);
            screen.handle_key(key(KeyCode::Tab), ctx);
            assert_eq!(screen.tab(), CaseTab::Evidence);
        });
    }

    #[test]
    fn test_esc_with_highlight_clears_then_falls_through() {
        run("VIO-2025-001247", |screen, ctx| {
            screen.handle_key(key(KeyCode::Down), ctx);
            assert!(screen.evidence().highlighted().is_some());
            assert_eq!(screen.handle_key(key(KeyCode::Esc), ctx), Some(ScreenAction::None));
            assert!(screen.evidence().highlighted().is_none());
            assert_eq!(screen.handle_key(key(KeyCode::Esc), ctx), None);
        });
    }

    #[test]
    fn test_unknown_case_has_no_value() {
        run("VIO-2025-999999", |screen, _| {
            assert!(screen.case().is_none());
            assert!(screen.evidence().fields().is_empty());
        });
    }
}
