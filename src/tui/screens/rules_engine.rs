//! Rules Engine: detection rules, rule categories and tunable thresholds.
//!
//! Threshold edits are local to the mounted screen and start from the
//! configured values on every mount.

use super::{Pointer, RenderContext, ScreenAction, ScreenContext};
use crate::model::{CategorySummary, ComplianceRule, DetectionThresholds, Threshold};
use crate::tui::list_state::{calculate_visible_range, ListState};
use crate::tui::loadable::{render_placeholder, Loadable};
use crate::tui::theme::Theme;
use crate::tui::widgets::rule_row::{rule_row_lines, ROW_HEIGHT};
use crate::tui::widgets::{bar, hit, HitRegion};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RulesTab {
    #[default]
    Rules,
    Categories,
    Thresholds,
}

impl RulesTab {
    pub fn all() -> &'static [RulesTab] {
        &[RulesTab::Rules, RulesTab::Categories, RulesTab::Thresholds]
    }

    pub fn label(self) -> &'static str {
        match self {
            RulesTab::Rules => "Detection Rules",
            RulesTab::Categories => "Categories",
            RulesTab::Thresholds => "Thresholds",
        }
    }

    fn next(self) -> Self {
        match self {
            RulesTab::Rules => RulesTab::Categories,
            RulesTab::Categories => RulesTab::Thresholds,
            RulesTab::Thresholds => RulesTab::Rules,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RulesTarget {
    Tab(RulesTab),
    Row(usize),
}

#[derive(Debug)]
pub struct RulesEngineScreen {
    tab: RulesTab,
    rules: Loadable<Vec<ComplianceRule>>,
    categories: Loadable<Vec<CategorySummary>>,
    thresholds: DetectionThresholds,
    list: ListState,
    viewport_rows: usize,
    regions: Vec<HitRegion<RulesTarget>>,
}

impl RulesEngineScreen {
    pub fn new(ctx: &ScreenContext) -> Self {
        Self {
            tab: RulesTab::default(),
            rules: Loadable::from_result(ctx.provider.list_rules()),
            categories: Loadable::from_result(ctx.provider.list_rule_categories()),
            thresholds: ctx.thresholds.clamped(),
            list: ListState::new(),
            viewport_rows: 1,
            regions: Vec::new(),
        }
    }

    pub fn tab(&self) -> RulesTab {
        self.tab
    }

    pub fn thresholds(&self) -> &DetectionThresholds {
        &self.thresholds
    }

    pub fn rules(&self) -> &[ComplianceRule] {
        self.rules.items()
    }

    pub fn selected_index(&self) -> usize {
        self.list.selected_index()
    }

    fn row_count(&self) -> usize {
        match self.tab {
            RulesTab::Rules => self.rules.len(),
            RulesTab::Categories => self.categories.len(),
            RulesTab::Thresholds => Threshold::all().len(),
        }
    }

    fn selected_threshold(&self) -> Option<Threshold> {
        Threshold::all().get(self.list.selected_index()).copied()
    }

    fn set_tab(&mut self, tab: RulesTab) {
        if tab != self.tab {
            self.tab = tab;
            self.list.reset();
        }
    }

    fn adjust_selected(&mut self, steps: i32) {
        if let Some(threshold) = self.selected_threshold() {
            self.thresholds.adjust(threshold, steps);
            tracing::debug!(
                threshold = threshold.label(),
                value = self.thresholds.get(threshold),
                "Threshold adjusted"
            );
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, ctx: &ScreenContext) -> ScreenAction {
        let count = self.row_count();
        match key.code {
            KeyCode::Tab => self.set_tab(self.tab.next()),
            KeyCode::Up | KeyCode::Char('k') => self.list.select_previous(count),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_next(count),
            KeyCode::Left | KeyCode::Char('h') if self.tab == RulesTab::Thresholds => {
                self.adjust_selected(-1)
            }
            KeyCode::Right | KeyCode::Char('l') if self.tab == RulesTab::Thresholds => {
                self.adjust_selected(1)
            }
            KeyCode::Char('r') => {
                self.rules.refresh(ctx.provider.list_rules());
                self.categories.refresh(ctx.provider.list_rule_categories());
                self.list
                    .set_selected_index(self.list.selected_index(), self.row_count());
            }
            _ => return ScreenAction::None,
        }
        self.list.ensure_visible(self.viewport_rows);
        ScreenAction::None
    }

    pub fn handle_pointer(&mut self, pointer: Pointer) -> ScreenAction {
        let Pointer::Click { column, row } = pointer else {
            return ScreenAction::None;
        };
        match hit(&self.regions, column, row) {
            Some(RulesTarget::Tab(tab)) => self.set_tab(tab),
            Some(RulesTarget::Row(index)) => {
                let count = self.row_count();
                self.list.set_selected_index(index, count);
            }
            None => {}
        }
        ScreenAction::None
    }

    pub fn key_hints() -> Vec<(&'static str, &'static str)> {
        vec![("Tab", "Tab"), ("↑↓", "Select"), ("←→", "Adjust"), ("r", "Retry")]
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &RenderContext) {
        let theme = ctx.theme;
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Min(4),
            ])
            .split(area);

        frame.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled("Rules Engine", theme.title_style())),
                Line::from(Span::styled(
                    "Configure compliance logic and detection parameters",
                    theme.metric_style(),
                )),
            ]),
            rows[0],
        );

        let mut regions = Vec::new();
        let mut spans = Vec::new();
        let mut x = rows[1].x;
        for &tab in RulesTab::all() {
            let text = format!(" {} ", tab.label());
            let width = text.width() as u16;
            let style = if tab == self.tab {
                theme.active_style().patch(theme.selected_style())
            } else {
                theme.metric_style()
            };
            spans.push(Span::styled(text, style));
            spans.push(Span::raw(" "));
            regions.push(HitRegion::new(
                Rect::new(x, rows[1].y, width, 1),
                RulesTarget::Tab(tab),
            ));
            x += width + 1;
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), rows[1]);

        match self.tab {
            RulesTab::Rules => self.render_rules(frame, rows[2], theme, &mut regions),
            RulesTab::Categories => self.render_categories(frame, rows[2], theme, &mut regions),
            RulesTab::Thresholds => self.render_thresholds(frame, rows[2], theme, &mut regions),
        }
        self.regions = regions;
    }

    fn render_rules(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        regions: &mut Vec<HitRegion<RulesTarget>>,
    ) {
        if self.rules.value().is_none() {
            let message = match &self.rules {
                Loadable::Missing(message) => message.clone(),
                other => other.failure_hint().unwrap_or_default(),
            };
            render_placeholder(frame, area, "Detection Rules", &message, theme);
            return;
        }
        let mut block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Detection Rules ({}) ", self.rules.len()))
            .border_style(theme.border_style(true));
        if let Some(hint) = self.rules.failure_hint() {
            block = block.title_bottom(hint);
        }
        let inner = block.inner(area);
        frame.render_widget(block, area);

        self.viewport_rows = (inner.height / ROW_HEIGHT).max(1) as usize;
        self.list.ensure_visible(self.viewport_rows);
        let rules = self.rules.items();
        let range =
            calculate_visible_range(self.list.scroll_offset(), self.viewport_rows, rules.len());
        for (slot, index) in range.enumerate() {
            let row = Rect::new(
                inner.x,
                inner.y + slot as u16 * ROW_HEIGHT,
                inner.width,
                ROW_HEIGHT,
            );
            let style = if index == self.list.selected_index() {
                theme.selected_style()
            } else {
                theme.base_style()
            };
            frame.render_widget(
                Paragraph::new(rule_row_lines(&rules[index], theme)).style(style),
                row,
            );
            regions.push(HitRegion::new(row, RulesTarget::Row(index)));
        }
    }

    fn render_categories(
        &self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        regions: &mut Vec<HitRegion<RulesTarget>>,
    ) {
        if self.categories.value().is_none() {
            let message = match &self.categories {
                Loadable::Missing(message) => message.clone(),
                other => other.failure_hint().unwrap_or_default(),
            };
            render_placeholder(frame, area, "Rule Categories", &message, theme);
            return;
        }
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Rule Categories ")
            .border_style(theme.border_style(true));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        for (index, category) in self.categories.items().iter().enumerate() {
            let y = inner.y + index as u16;
            if y >= inner.bottom() {
                break;
            }
            let selected = index == self.list.selected_index();
            let line = Line::from(vec![
                Span::styled(
                    format!("{:<28}", category.name),
                    if selected {
                        theme.selected_style()
                    } else {
                        theme.title_style()
                    },
                ),
                Span::styled(format!("{:>3} rules   ", category.rules), theme.metric_style()),
                Span::styled(
                    format!("{} violations detected", category.violations),
                    theme.metric_style(),
                ),
            ]);
            let row = Rect::new(inner.x, y, inner.width, 1);
            frame.render_widget(Paragraph::new(line), row);
            regions.push(HitRegion::new(row, RulesTarget::Row(index)));
        }
    }

    fn render_thresholds(
        &self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        regions: &mut Vec<HitRegion<RulesTarget>>,
    ) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Detection Thresholds ")
            .border_style(theme.border_style(true));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        const SLIDER_HEIGHT: u16 = 3;
        for (index, &threshold) in Threshold::all().iter().enumerate() {
            let y = inner.y + index as u16 * SLIDER_HEIGHT;
            if y + 2 > inner.bottom() {
                break;
            }
            let selected = index == self.list.selected_index();
            let (min, max, _) = threshold.bounds();
            let value = self.thresholds.get(threshold);
            let percent = if max > min {
                (value - min) as f64 / (max - min) as f64 * 100.0
            } else {
                100.0
            };
            let (filled, empty) = bar(percent, 30);
            let marker = if selected { "▸ " } else { "  " };
            let lines = vec![
                Line::from(vec![
                    Span::styled(marker, theme.key_hint_style()),
                    Span::styled(threshold.label(), theme.title_style()),
                    Span::styled(format!("  {}", value), theme.key_hint_style()),
                ]),
                Line::from(vec![
                    Span::raw("  "),
                    Span::styled(format!("{} ", min), theme.metric_style()),
                    Span::styled(filled, theme.active_style()),
                    Span::styled(empty, theme.progress_bar_bg_style()),
                    Span::styled(format!(" {}   ", max), theme.metric_style()),
                    Span::styled(threshold.hint(), theme.metric_style()),
                ]),
            ];
            let row = Rect::new(inner.x, y, inner.width, SLIDER_HEIGHT.min(inner.bottom() - y));
            let style = if selected {
                theme.selected_style()
            } else {
                theme.base_style()
            };
            frame.render_widget(Paragraph::new(lines).style(style), row);
            regions.push(HitRegion::new(row, RulesTarget::Row(index)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InspectorConfig;
    use crate::provider::{seed::seed_fixture, FixtureProvider};
    use chrono::Utc;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn run<R>(
        thresholds: DetectionThresholds,
        f: impl FnOnce(&mut RulesEngineScreen, &ScreenContext) -> R,
    ) -> R {
        let provider = FixtureProvider::new(seed_fixture(Utc::now())).unwrap();
        let inspector = InspectorConfig::default();
        let ctx = ScreenContext {
            provider: &provider,
            inspector: &inspector,
            thresholds,
        };
        let mut screen = RulesEngineScreen::new(&ctx);
        f(&mut screen, &ctx)
    }

    #[test]
    fn test_thresholds_start_from_config() {
        let configured = DetectionThresholds {
            ocr_confidence: 92,
            ..DetectionThresholds::default()
        };
        run(configured, |screen, _| {
            assert_eq!(screen.thresholds(), &configured);
        });
    }

    #[test]
    fn test_arrows_adjust_selected_threshold_within_bounds() {
        run(DetectionThresholds::default(), |screen, ctx| {
            screen.handle_key(key(KeyCode::Tab), ctx);
            screen.handle_key(key(KeyCode::Tab), ctx);
            assert_eq!(screen.tab(), RulesTab::Thresholds);

            screen.handle_key(key(KeyCode::Right), ctx);
            assert_eq!(screen.thresholds().ocr_confidence, 86);

            for _ in 0..50 {
                screen.handle_key(key(KeyCode::Right), ctx);
            }
            assert_eq!(screen.thresholds().ocr_confidence, 99);
        });
    }

    #[test]
    fn test_arrows_do_nothing_outside_thresholds_tab() {
        run(DetectionThresholds::default(), |screen, ctx| {
            screen.handle_key(key(KeyCode::Right), ctx);
            assert_eq!(screen.thresholds(), &DetectionThresholds::default());
        });
    }

    #[test]
    fn test_tab_switch_resets_selection() {
        run(DetectionThresholds::default(), |screen, ctx| {
            screen.handle_key(key(KeyCode::Down), ctx);
            assert_eq!(screen.selected_index(), 1);
            screen.handle_key(key(KeyCode::Tab), ctx);
            assert_eq!(screen.selected_index(), 0);
        });
    }
}
