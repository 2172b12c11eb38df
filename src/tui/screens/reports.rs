//! Reports: template catalogue, period selector and generated reports.

use super::{Pointer, RenderContext, ScreenAction, ScreenContext};
use crate::model::{QuickStat, ReportArtifact, ReportPeriod, ReportRequest, ReportTemplate, StatPanel};
use crate::tui::list_state::ListState;
use crate::tui::loadable::{render_placeholder, Loadable};
use crate::tui::style_map::{tone_tier, Tier};
use crate::tui::theme::Theme;
use crate::tui::widgets::{badge, hit, HitRegion};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const TEMPLATE_HEIGHT: u16 = 4;
const RECENT_LIMIT: usize = 8;

/// Session reports followed by provider history, newest first.
///
/// A session artifact shadows a history entry with the same id.
pub fn merge_recent(session: &[ReportArtifact], history: &[ReportArtifact]) -> Vec<ReportArtifact> {
    let mut merged: Vec<ReportArtifact> = session.to_vec();
    merged.extend(
        history
            .iter()
            .filter(|h| !session.iter().any(|s| s.id == h.id))
            .cloned(),
    );
    merged.sort_by(|a, b| b.generated_at.cmp(&a.generated_at).then_with(|| b.id.cmp(&a.id)));
    merged
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ReportsTarget {
    Template(usize),
    Period,
}

#[derive(Debug)]
pub struct ReportsScreen {
    templates: Loadable<Vec<ReportTemplate>>,
    history: Loadable<Vec<ReportArtifact>>,
    stats: Loadable<Vec<QuickStat>>,
    period: ReportPeriod,
    list: ListState,
    regions: Vec<HitRegion<ReportsTarget>>,
}

impl ReportsScreen {
    pub fn new(ctx: &ScreenContext) -> Self {
        Self {
            templates: Loadable::from_result(ctx.provider.report_templates()),
            history: Loadable::from_result(ctx.provider.recent_reports()),
            stats: Loadable::from_result(ctx.provider.quick_stats(StatPanel::Reports)),
            period: ReportPeriod::Month,
            list: ListState::new(),
            regions: Vec::new(),
        }
    }

    pub fn period(&self) -> ReportPeriod {
        self.period
    }

    pub fn templates(&self) -> &[ReportTemplate] {
        self.templates.items()
    }

    pub fn selected_template(&self) -> Option<&ReportTemplate> {
        self.templates().get(self.list.selected_index())
    }

    fn generate(&self, ctx: &ScreenContext) -> ScreenAction {
        match self.selected_template() {
            Some(template) => ScreenAction::RequestReport(ReportRequest {
                template_id: template.id.clone(),
                period: self.period,
                requested_by: ctx.inspector.name.clone(),
            }),
            None => ScreenAction::Status("No report template selected".to_string()),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, ctx: &ScreenContext) -> ScreenAction {
        let count = self.templates.len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_previous(count),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_next(count),
            KeyCode::Char('p') => self.period = self.period.next(),
            KeyCode::Enter | KeyCode::Char('g') => return self.generate(ctx),
            KeyCode::Char('r') => {
                self.templates.refresh(ctx.provider.report_templates());
                self.history.refresh(ctx.provider.recent_reports());
                self.stats.refresh(ctx.provider.quick_stats(StatPanel::Reports));
                self.list.set_selected_index(self.list.selected_index(), self.templates.len());
            }
            _ => {}
        }
        ScreenAction::None
    }

    pub fn handle_pointer(&mut self, pointer: Pointer, ctx: &ScreenContext) -> ScreenAction {
        let Pointer::Click { column, row } = pointer else {
            return ScreenAction::None;
        };
        match hit(&self.regions, column, row) {
            Some(ReportsTarget::Template(index)) => {
                // A second click on the selected template generates it.
                if index == self.list.selected_index() {
                    return self.generate(ctx);
                }
                self.list.set_selected_index(index, self.templates.len());
            }
            Some(ReportsTarget::Period) => self.period = self.period.next(),
            None => {}
        }
        ScreenAction::None
    }

    pub fn key_hints() -> Vec<(&'static str, &'static str)> {
        vec![("↑↓", "Template"), ("p", "Period"), ("Enter", "Generate"), ("r", "Retry")]
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &RenderContext) {
        let theme = ctx.theme;
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Title and period
                Constraint::Length(4), // Quick stats
                Constraint::Min(6),
            ])
            .split(area);

        let mut regions = Vec::new();
        let period_label = format!("[p] {} ▾", self.period.label());
        let title = Line::from(vec![
            Span::styled("Reports & Analytics", theme.title_style()),
            Span::raw("   Period: "),
            Span::styled(period_label.clone(), theme.key_hint_style()),
        ]);
        let period_x = rows[0].x + "Reports & Analytics   Period: ".chars().count() as u16;
        regions.push(HitRegion::new(
            Rect::new(period_x, rows[0].y, period_label.chars().count() as u16, 1),
            ReportsTarget::Period,
        ));
        frame.render_widget(
            Paragraph::new(vec![
                title,
                Line::from(Span::styled(
                    "Generate regulatory reports and review compliance analytics",
                    theme.metric_style(),
                )),
            ]),
            rows[0],
        );

        render_stats(frame, rows[1], &self.stats, theme);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(rows[2]);

        self.render_templates(frame, body[0], theme, &mut regions);

        let recent = merge_recent(ctx.session_reports, self.history.items());
        render_recent(frame, body[1], &recent, self.history.failure_hint(), theme);

        self.regions = regions;
    }

    fn render_templates(
        &self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        regions: &mut Vec<HitRegion<ReportsTarget>>,
    ) {
        if self.templates.value().is_none() {
            let message = match &self.templates {
                Loadable::Missing(message) => message.clone(),
                other => other.failure_hint().unwrap_or_default(),
            };
            render_placeholder(frame, area, "Report Templates", &message, theme);
            return;
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Report Templates ")
            .border_style(theme.border_style(true));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        for (index, template) in self.templates().iter().enumerate() {
            let y = inner.y + index as u16 * TEMPLATE_HEIGHT;
            if y + TEMPLATE_HEIGHT > inner.bottom() {
                break;
            }
            let card = Rect::new(inner.x, y, inner.width, TEMPLATE_HEIGHT);
            let selected = index == self.list.selected_index();
            let marker = if selected { "▸ " } else { "  " };
            let lines = vec![
                Line::from(vec![
                    Span::styled(marker, Style::new().fg(theme.accent())),
                    Span::styled(template.title.clone(), theme.title_style()),
                    Span::raw(" "),
                    badge(template.frequency.label(), tone_tier(template.tone), theme),
                ]),
                Line::from(Span::styled(
                    format!("  {}", template.description),
                    theme.metric_style(),
                )),
                Line::from(vec![
                    Span::styled(
                        format!("  Last generated: {}", template.last_generated),
                        theme.metric_style(),
                    ),
                    Span::styled(
                        if selected { "   [Enter] Generate" } else { "" },
                        theme.key_hint_style(),
                    ),
                ]),
            ];
            let style = if selected {
                theme.selected_style()
            } else {
                theme.base_style()
            };
            frame.render_widget(Paragraph::new(lines).style(style), card);
            regions.push(HitRegion::new(card, ReportsTarget::Template(index)));
        }
    }
}

fn render_stats(frame: &mut Frame, area: Rect, stats: &Loadable<Vec<QuickStat>>, theme: &Theme) {
    let items = stats.items();
    if items.is_empty() {
        let message = stats
            .failure_hint()
            .unwrap_or_else(|| "No report statistics".to_string());
        frame.render_widget(
            Paragraph::new(Span::styled(message, theme.metric_style())),
            area,
        );
        return;
    }
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, items.len() as u32); items.len()])
        .split(area);
    for (stat, cell) in items.iter().zip(cells.iter()) {
        let mut lines = vec![
            Line::from(Span::styled(stat.label.clone(), theme.metric_style())),
            Line::from(Span::styled(stat.value.clone(), theme.title_style())),
        ];
        if let Some(note) = &stat.note {
            lines.push(Line::from(Span::styled(note.clone(), theme.tier_style(Tier::Good))));
        }
        frame.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::LEFT)
                    .border_style(theme.border_style(false)),
            ),
            *cell,
        );
    }
}

fn render_recent(
    frame: &mut Frame,
    area: Rect,
    recent: &[ReportArtifact],
    hint: Option<String>,
    theme: &Theme,
) {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .title(" Recent Reports ")
        .border_style(theme.border_style(false));
    if let Some(hint) = hint {
        block = block.title_bottom(hint);
    }

    let mut lines = Vec::new();
    for artifact in recent.iter().take(RECENT_LIMIT) {
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", artifact.format.label()), Style::new().fg(theme.accent())),
            Span::styled(artifact.title.clone(), theme.title_style()),
        ]));
        lines.push(Line::from(Span::styled(
            format!(
                "    {} · {} · {} · {}",
                artifact.id,
                artifact.generated_by,
                artifact.generated_at.format("%Y-%m-%d %H:%M"),
                artifact.size_label()
            ),
            theme.metric_style(),
        )));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "No reports generated yet",
            theme.metric_style(),
        )));
    }
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
