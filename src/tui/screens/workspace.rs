//! Workspace: the inspector's case list, and the Case File for one case.

use super::case_file::CaseFileScreen;
use super::{Pointer, RenderContext, ScreenAction, ScreenContext};
use crate::model::{relative_time, Case, CaseId};
use crate::provider::{CaseFilter, CaseQuery, CaseSort};
use crate::tui::list_state::{calculate_visible_range, ListState};
use crate::tui::loadable::{render_placeholder, Loadable};
use crate::tui::style_map::{priority_tier, severity_tier, status_tier};
use crate::tui::theme::Theme;
use crate::tui::view_state::NavRequest;
use crate::tui::widgets::case_row::{render_case_rows, CaseRowTarget, ROW_HEIGHT};
use crate::tui::widgets::{badge, hit, HitRegion};
use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const GRID_COLUMNS: usize = 2;
const CARD_HEIGHT: u16 = 6;

/// List or card-grid presentation of the case list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseLayout {
    #[default]
    List,
    Grid,
}

impl CaseLayout {
    fn toggle(self) -> Self {
        match self {
            CaseLayout::List => CaseLayout::Grid,
            CaseLayout::Grid => CaseLayout::List,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            CaseLayout::List => "List",
            CaseLayout::Grid => "Grid",
        }
    }
}

/// Filters offered by the workspace, "assigned to me" resolved against the
/// configured inspector.
pub fn workspace_filters(inspector_name: &str) -> Vec<CaseFilter> {
    vec![
        CaseFilter::All,
        CaseFilter::Critical,
        CaseFilter::AssignedTo(inspector_name.to_string()),
        CaseFilter::PendingAction,
    ]
}

#[derive(Debug)]
pub struct WorkspaceScreen {
    layout: CaseLayout,
    filters: Vec<CaseFilter>,
    filter_index: usize,
    sort: CaseSort,
    cases: Loadable<Vec<Case>>,
    list: ListState,
    viewport_items: usize,
    regions: Vec<HitRegion<CaseRowTarget>>,
    case_file: Option<Box<CaseFileScreen>>,
}

impl WorkspaceScreen {
    pub fn new(ctx: &ScreenContext, focus: Option<CaseId>) -> Self {
        let filters = workspace_filters(&ctx.inspector.name);
        let sort = CaseSort::default();
        let cases = Loadable::from_result(
            ctx.provider
                .list_cases(&CaseQuery::new(filters[0].clone(), sort)),
        );
        Self {
            layout: CaseLayout::default(),
            filters,
            filter_index: 0,
            sort,
            cases,
            list: ListState::new(),
            viewport_items: 1,
            regions: Vec::new(),
            case_file: focus.map(|id| Box::new(CaseFileScreen::new(ctx, id))),
        }
    }

    /// Id of the case whose Case File is mounted.
    pub fn open_case(&self) -> Option<&CaseId> {
        self.case_file.as_ref().map(|cf| cf.case_id())
    }

    pub fn case_file(&self) -> Option<&CaseFileScreen> {
        self.case_file.as_deref()
    }

    pub fn cases(&self) -> &[Case] {
        self.cases.items()
    }

    pub fn layout(&self) -> CaseLayout {
        self.layout
    }

    pub fn filter(&self) -> &CaseFilter {
        &self.filters[self.filter_index]
    }

    pub fn sort(&self) -> CaseSort {
        self.sort
    }

    fn reload(&mut self, ctx: &ScreenContext) {
        let query = CaseQuery::new(self.filter().clone(), self.sort);
        self.cases.refresh(ctx.provider.list_cases(&query));
        self.list
            .set_selected_index(self.list.selected_index(), self.cases.len());
    }

    fn cycle_filter(&mut self, ctx: &ScreenContext) {
        self.filter_index = (self.filter_index + 1) % self.filters.len();
        self.list.reset();
        self.reload(ctx);
    }

    fn cycle_sort(&mut self, ctx: &ScreenContext) {
        let options = CaseSort::workspace_options();
        let position = options.iter().position(|s| *s == self.sort).unwrap_or(0);
        self.sort = options[(position + 1) % options.len()];
        self.list.reset();
        self.reload(ctx);
    }

    fn open(&mut self, id: CaseId, ctx: &ScreenContext) {
        tracing::debug!(case = %id, "Opening case file");
        self.case_file = Some(Box::new(CaseFileScreen::new(ctx, id)));
    }

    fn selected(&self) -> Option<&Case> {
        self.cases().get(self.list.selected_index())
    }

    pub fn handle_key(&mut self, key: KeyEvent, ctx: &ScreenContext) -> ScreenAction {
        if let Some(case_file) = self.case_file.as_mut() {
            return match case_file.handle_key(key, ctx) {
                Some(action) => action,
                None if key.code == KeyCode::Esc => {
                    self.case_file = None;
                    ScreenAction::None
                }
                None => ScreenAction::None,
            };
        }

        let count = self.cases.len();
        let row_step = match self.layout {
            CaseLayout::List => 1,
            CaseLayout::Grid => GRID_COLUMNS,
        };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                let target = self.list.selected_index().saturating_sub(row_step);
                self.list.set_selected_index(target, count);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let target = (self.list.selected_index() + row_step).min(count.saturating_sub(1));
                self.list.set_selected_index(target, count);
            }
            KeyCode::Left | KeyCode::Char('h') if self.layout == CaseLayout::Grid => {
                self.list.select_previous(count)
            }
            KeyCode::Right | KeyCode::Char('l') if self.layout == CaseLayout::Grid => {
                self.list.select_next(count)
            }
            KeyCode::Enter => {
                if let Some(id) = self.selected().map(|c| c.id.clone()) {
                    self.open(id, ctx);
                }
            }
            KeyCode::Char('s') => {
                if let Some(case) = self.selected() {
                    return ScreenAction::Navigate(NavRequest::seller(case.seller_ref.clone()));
                }
            }
            KeyCode::Char('v') => self.layout = self.layout.toggle(),
            KeyCode::Char('f') => self.cycle_filter(ctx),
            KeyCode::Char('o') => self.cycle_sort(ctx),
            KeyCode::Char('r') => self.reload(ctx),
            _ => return ScreenAction::None,
        }
        self.list.ensure_visible(self.viewport_items);
        ScreenAction::None
    }

    pub fn handle_pointer(&mut self, pointer: Pointer, ctx: &ScreenContext) -> ScreenAction {
        if let Some(case_file) = self.case_file.as_mut() {
            return case_file.handle_pointer(pointer);
        }
        let Pointer::Click { column, row } = pointer else {
            return ScreenAction::None;
        };
        match hit(&self.regions, column, row) {
            Some(CaseRowTarget::Case(id)) => {
                self.open(id, ctx);
                ScreenAction::None
            }
            Some(CaseRowTarget::Seller(id)) => ScreenAction::Navigate(NavRequest::seller(id)),
            None => ScreenAction::None,
        }
    }

    pub fn key_hints(&self) -> Vec<(&'static str, &'static str)> {
        if self.case_file.is_some() {
            return CaseFileScreen::key_hints();
        }
        vec![
            ("Enter", "Open"),
            ("s", "Seller"),
            ("f", "Filter"),
            ("o", "Sort"),
            ("v", "List/Grid"),
        ]
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &RenderContext) {
        if let Some(case_file) = self.case_file.as_mut() {
            case_file.render(frame, area, ctx);
            return;
        }

        let theme = ctx.theme;
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(3)])
            .split(area);

        let header = vec![
            Line::from(Span::styled("Investigation Workspace", theme.title_style())),
            Line::from(vec![
                Span::styled("Filter [f]: ", theme.metric_style()),
                Span::styled(self.filter().display_name(), theme.key_hint_style()),
                Span::styled("   Sort [o]: ", theme.metric_style()),
                Span::styled(self.sort.display_name(), theme.key_hint_style()),
                Span::styled("   View [v]: ", theme.metric_style()),
                Span::styled(self.layout.display_name(), theme.key_hint_style()),
            ]),
        ];
        frame.render_widget(Paragraph::new(header), rows[0]);

        if self.cases.value().is_none() {
            self.regions.clear();
            let message = match &self.cases {
                Loadable::Missing(message) => message.clone(),
                other => other.failure_hint().unwrap_or_default(),
            };
            render_placeholder(frame, rows[1], "Cases", &message, theme);
            return;
        }

        let mut block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Active Cases ({}) ", self.cases.len()))
            .border_style(theme.border_style(true));
        if let Some(hint) = self.cases.failure_hint() {
            block = block.title_bottom(hint);
        }
        let inner = block.inner(rows[1]);
        frame.render_widget(block, rows[1]);

        if self.cases.is_empty() {
            self.regions.clear();
            frame.render_widget(
                Paragraph::new(Span::styled("No cases match this filter", theme.metric_style())),
                inner,
            );
            return;
        }

        match self.layout {
            CaseLayout::List => {
                self.viewport_items = (inner.height / ROW_HEIGHT).max(1) as usize;
                self.list.ensure_visible(self.viewport_items);
                self.regions = render_case_rows(
                    frame,
                    inner,
                    self.cases.items(),
                    &self.list,
                    true,
                    theme,
                    ctx.now,
                );
            }
            CaseLayout::Grid => {
                self.viewport_items = ((inner.height / CARD_HEIGHT).max(1) as usize) * GRID_COLUMNS;
                self.regions = self.render_grid(frame, inner, theme, ctx.now);
            }
        }
    }

    fn render_grid(
        &self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        now: DateTime<Utc>,
    ) -> Vec<HitRegion<CaseRowTarget>> {
        // Scroll by whole grid rows.
        let selected_row = self.list.selected_index() / GRID_COLUMNS;
        let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;
        let first_row = selected_row.saturating_sub(visible_rows - 1);
        let start = first_row * GRID_COLUMNS;

        let card_width = area.width / GRID_COLUMNS as u16;
        let mut regions = Vec::new();
        let cases = self.cases.items();
        for index in calculate_visible_range(start, visible_rows * GRID_COLUMNS, cases.len()) {
            let slot = index - start;
            let card_area = Rect::new(
                area.x + (slot % GRID_COLUMNS) as u16 * card_width,
                area.y + (slot / GRID_COLUMNS) as u16 * CARD_HEIGHT,
                card_width,
                CARD_HEIGHT,
            );
            if card_area.bottom() > area.bottom() {
                break;
            }
            let case = &cases[index];
            let selected = index == self.list.selected_index();
            frame.render_widget(case_card(case, selected, theme, now), card_area);
            regions.push(HitRegion::new(card_area, CaseRowTarget::Case(case.id.clone())));
        }
        regions
    }
}

fn case_card(case: &Case, selected: bool, theme: &Theme, now: DateTime<Utc>) -> Paragraph<'static> {
    let lines = vec![
        Line::from(vec![
            badge(case.severity.label(), severity_tier(case.severity), theme),
            Span::styled(
                format!(" P{}", case.priority),
                theme.tier_style(priority_tier(case.priority)),
            ),
            Span::styled(format!("  {}", case.id), theme.metric_style()),
        ]),
        Line::from(Span::styled(case.title.clone(), theme.title_style())),
        Line::from(Span::styled(
            format!("{} · {}", case.seller_name, relative_time(now, case.detected_at)),
            theme.metric_style(),
        )),
        Line::from(vec![
            Span::styled(case.status.label(), theme.tier_style(status_tier(case.status))),
            Span::styled(format!(" · {}", case.assignee), theme.metric_style()),
        ]),
    ];
    Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style(selected)),
    )
}
