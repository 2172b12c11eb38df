//! Morning briefing: metrics, Priority Inbox, progress and Threat Matrix.

use super::{Pointer, RenderContext, ScreenAction, ScreenContext};
use crate::model::{
    ComplianceMetric, QuickStat, ReportPeriod, ReportRequest, StatPanel, TimeFilter, TimeRange,
};
use crate::tui::loadable::{render_placeholder, Loadable};
use crate::tui::theme::Theme;
use crate::tui::view_state::{NavRequest, View};
use crate::tui::widgets::metric_card::render_metric_card;
use crate::tui::widgets::priority_inbox::{InboxOutcome, PriorityInbox};
use crate::tui::widgets::threat_matrix::ThreatMatrixState;
use crate::tui::widgets::{hit, HitRegion};
use chrono::{DateTime, Local, Timelike};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Template the "Generate Weekly Report" action requests.
pub const WEEKLY_REPORT_TEMPLATE: &str = "compliance-summary";

/// Which dashboard panel receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashboardPane {
    #[default]
    Inbox,
    Matrix,
}

impl DashboardPane {
    fn toggle(self) -> Self {
        match self {
            DashboardPane::Inbox => DashboardPane::Matrix,
            DashboardPane::Matrix => DashboardPane::Inbox,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuickAction {
    WeeklyReport,
    BulkReview,
}

impl QuickAction {
    fn all() -> &'static [QuickAction] {
        &[QuickAction::WeeklyReport, QuickAction::BulkReview]
    }

    fn label(self) -> &'static str {
        match self {
            QuickAction::WeeklyReport => "[R] Generate Weekly Report",
            QuickAction::BulkReview => "[b] Bulk Review Queue",
        }
    }
}

/// Time-of-day salutation for a local hour.
pub fn greeting(hour: u32) -> &'static str {
    match hour {
        5..=11 => "Good morning",
        12..=16 => "Good afternoon",
        _ => "Good evening",
    }
}

#[derive(Debug)]
pub struct DashboardScreen {
    time_filter: TimeFilter,
    metrics: Loadable<Vec<ComplianceMetric>>,
    progress: Loadable<Vec<QuickStat>>,
    inbox: PriorityInbox,
    matrix: ThreatMatrixState,
    pane: DashboardPane,
    action_regions: Vec<HitRegion<QuickAction>>,
}

impl DashboardScreen {
    pub fn new(ctx: &ScreenContext) -> Self {
        let time_filter = TimeFilter::Today;
        Self {
            time_filter,
            metrics: Loadable::from_result(ctx.provider.metrics(time_filter)),
            progress: Loadable::from_result(ctx.provider.quick_stats(StatPanel::TodaysProgress)),
            inbox: PriorityInbox::load(ctx.provider),
            matrix: ThreatMatrixState::load(ctx.provider, TimeRange::default()),
            pane: DashboardPane::default(),
            action_regions: Vec::new(),
        }
    }

    pub fn time_filter(&self) -> TimeFilter {
        self.time_filter
    }

    pub fn pane(&self) -> DashboardPane {
        self.pane
    }

    pub fn inbox(&self) -> &PriorityInbox {
        &self.inbox
    }

    pub fn matrix(&self) -> &ThreatMatrixState {
        &self.matrix
    }

    fn cycle_time_filter(&mut self, ctx: &ScreenContext) {
        self.time_filter = self.time_filter.next();
        self.metrics.refresh(ctx.provider.metrics(self.time_filter));
    }

    fn retry(&mut self, ctx: &ScreenContext) {
        self.metrics.refresh(ctx.provider.metrics(self.time_filter));
        self.progress
            .refresh(ctx.provider.quick_stats(StatPanel::TodaysProgress));
        self.inbox.reload(ctx.provider);
        self.matrix.reload(ctx.provider);
    }

    fn run_quick_action(action: QuickAction, ctx: &ScreenContext) -> ScreenAction {
        match action {
            QuickAction::WeeklyReport => ScreenAction::RequestReport(ReportRequest {
                template_id: WEEKLY_REPORT_TEMPLATE.to_string(),
                period: ReportPeriod::Week,
                requested_by: ctx.inspector.name.clone(),
            }),
            QuickAction::BulkReview => ScreenAction::Navigate(NavRequest::to(View::Workspace)),
        }
    }

    fn inbox_action(outcome: InboxOutcome) -> ScreenAction {
        match outcome {
            InboxOutcome::OpenCase(id) => ScreenAction::Navigate(NavRequest::case(id)),
            InboxOutcome::OpenSeller(id) => ScreenAction::Navigate(NavRequest::seller(id)),
            InboxOutcome::Resorted => ScreenAction::None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, ctx: &ScreenContext) -> ScreenAction {
        match key.code {
            KeyCode::Tab | KeyCode::BackTab => {
                self.pane = self.pane.toggle();
                return ScreenAction::None;
            }
            KeyCode::Char('t') => {
                self.cycle_time_filter(ctx);
                return ScreenAction::None;
            }
            KeyCode::Char('r') => {
                self.retry(ctx);
                return ScreenAction::Status("Dashboard refreshed".to_string());
            }
            KeyCode::Char('R') => return Self::run_quick_action(QuickAction::WeeklyReport, ctx),
            KeyCode::Char('b') => return Self::run_quick_action(QuickAction::BulkReview, ctx),
            _ => {}
        }

        match self.pane {
            DashboardPane::Inbox => self
                .inbox
                .handle_key(key, ctx.provider)
                .map_or(ScreenAction::None, Self::inbox_action),
            DashboardPane::Matrix => {
                self.matrix.handle_key(key, ctx.provider);
                ScreenAction::None
            }
        }
    }

    pub fn handle_pointer(&mut self, pointer: Pointer, ctx: &ScreenContext) -> ScreenAction {
        let Pointer::Click { column, row } = pointer else {
            return ScreenAction::None;
        };

        if let Some(action) = hit(&self.action_regions, column, row) {
            return Self::run_quick_action(action, ctx);
        }
        if let Some(outcome) = self.inbox.handle_click(column, row) {
            self.pane = DashboardPane::Inbox;
            return Self::inbox_action(outcome);
        }
        if self.matrix.handle_click(column, row) {
            self.pane = DashboardPane::Matrix;
        }
        ScreenAction::None
    }

    pub fn key_hints(&self) -> Vec<(&'static str, &'static str)> {
        let mut hints = vec![("Tab", "Pane"), ("t", "Period")];
        match self.pane {
            DashboardPane::Inbox => {
                hints.extend([("Enter", "Open case"), ("s", "Seller"), ("o", "Sort")]);
            }
            DashboardPane::Matrix => {
                hints.extend([("←↑↓→", "Move"), ("Enter", "Select"), ("w", "Range")]);
            }
        }
        hints.extend([("R", "Weekly report"), ("b", "Bulk review")]);
        hints
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &RenderContext) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),  // Greeting
                Constraint::Length(5),  // Metric cards
                Constraint::Min(8),     // Inbox and side panel
                Constraint::Length(11), // Threat matrix
            ])
            .split(area);

        render_greeting(frame, rows[0], self.time_filter, ctx);
        self.render_metrics(frame, rows[1], ctx.theme);

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(rows[2]);
        self.inbox.render(
            frame,
            middle[0],
            self.pane == DashboardPane::Inbox,
            ctx.theme,
            ctx.now,
        );

        let side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(4), Constraint::Length(4)])
            .split(middle[1]);
        self.render_progress(frame, side[0], ctx.theme);
        self.render_quick_actions(frame, side[1], ctx.theme);

        self.matrix
            .render(frame, rows[3], self.pane == DashboardPane::Matrix, ctx.theme);
    }

    fn render_metrics(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let metrics = self.metrics.items();
        if metrics.is_empty() {
            let message = self
                .metrics
                .failure_hint()
                .unwrap_or_else(|| format!("No metrics for {}", self.time_filter.label()));
            render_placeholder(frame, area, "Metrics", &message, theme);
            return;
        }

        let constraints = vec![Constraint::Ratio(1, metrics.len() as u32); metrics.len()];
        let cards = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);
        for (metric, card) in metrics.iter().zip(cards.iter()) {
            render_metric_card(frame, *card, metric, theme);
        }
    }

    fn render_progress(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let lines: Vec<Line> = self
            .progress
            .items()
            .iter()
            .map(|stat| {
                let mut spans = vec![
                    Span::styled(format!("{:<20}", stat.label), theme.metric_style()),
                    Span::styled(stat.value.clone(), theme.title_style()),
                ];
                if let Some(note) = &stat.note {
                    spans.push(Span::styled(format!("  {}", note), theme.completed_style()));
                }
                Line::from(spans)
            })
            .collect();

        let mut block = Block::default()
            .borders(Borders::ALL)
            .title(" Today's Progress ")
            .border_style(theme.border_style(false));
        if let Some(hint) = self.progress.failure_hint() {
            block = block.title_bottom(hint);
        }
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_quick_actions(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Quick Actions ")
            .border_style(theme.border_style(false));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        self.action_regions.clear();
        for (i, &action) in QuickAction::all().iter().enumerate() {
            if i as u16 >= inner.height {
                break;
            }
            let row = Rect::new(inner.x, inner.y + i as u16, inner.width, 1);
            frame.render_widget(
                Paragraph::new(Span::styled(action.label(), theme.key_hint_style())),
                row,
            );
            self.action_regions.push(HitRegion::new(row, action));
        }
    }
}

fn render_greeting(frame: &mut Frame, area: Rect, filter: TimeFilter, ctx: &RenderContext) {
    let local: DateTime<Local> = ctx.now.with_timezone(&Local);
    let theme = ctx.theme;
    let lines = vec![
        Line::from(vec![
            Span::styled(
                format!("{}, {}", greeting(local.hour()), ctx.inspector.name),
                theme.title_style(),
            ),
            Span::styled(format!("   ◷ {} [t]", filter.label()), theme.key_hint_style()),
        ]),
        Line::from(Span::styled(
            format!("Your morning briefing for {}", local.format("%A, %-d %B %Y")),
            theme.metric_style(),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}
