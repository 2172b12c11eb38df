//! Seller Intel: searchable seller directory and per-seller dossiers.

use super::seller_dossier::SellerDossierScreen;
use super::{Pointer, RenderContext, ScreenAction, ScreenContext};
use crate::model::seller::partition_consistent;
use crate::model::{QuickStat, Seller, SellerId, StatPanel};
use crate::provider::SellerQuery;
use crate::tui::list_state::{calculate_visible_range, ListState};
use crate::tui::loadable::{render_placeholder, Loadable};
use crate::tui::style_map::Tier;
use crate::tui::widgets::seller_card::{render_seller_card, CARD_HEIGHT};
use crate::tui::widgets::{hit, HitRegion};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const GRID_COLUMNS: usize = 2;

#[derive(Debug)]
pub struct SellerIntelScreen {
    query: SellerQuery,
    editing: bool,
    sellers: Loadable<Vec<Seller>>,
    /// Sellers left out of the listing because their counters disagree.
    flagged: usize,
    stats: Loadable<Vec<QuickStat>>,
    list: ListState,
    viewport_items: usize,
    regions: Vec<HitRegion<SellerId>>,
    dossier: Option<Box<SellerDossierScreen>>,
}

impl SellerIntelScreen {
    pub fn new(ctx: &ScreenContext, focus: Option<SellerId>) -> Self {
        let mut screen = Self {
            query: SellerQuery::default(),
            editing: false,
            sellers: Loadable::Ready(Vec::new()),
            flagged: 0,
            stats: Loadable::from_result(ctx.provider.quick_stats(StatPanel::Sellers)),
            list: ListState::new(),
            viewport_items: GRID_COLUMNS,
            regions: Vec::new(),
            dossier: None,
        };
        screen.reload(ctx);
        if let Some(id) = focus {
            screen.open(id, ctx);
        }
        screen
    }

    pub fn query(&self) -> &SellerQuery {
        &self.query
    }

    pub fn sellers(&self) -> &[Seller] {
        self.sellers.items()
    }

    pub fn flagged(&self) -> usize {
        self.flagged
    }

    pub fn dossier(&self) -> Option<&SellerDossierScreen> {
        self.dossier.as_deref()
    }

    pub fn captures_text(&self) -> bool {
        self.dossier.is_none() && self.editing
    }

    fn reload(&mut self, ctx: &ScreenContext) {
        let result = ctx.provider.list_sellers(&self.query).map(|sellers| {
            let (valid, flagged) = partition_consistent(sellers);
            self.flagged = flagged.len();
            valid
        });
        self.sellers.refresh(result);
        self.list.reset();
    }

    fn open(&mut self, id: SellerId, ctx: &ScreenContext) {
        tracing::debug!(seller = %id, "Opening seller dossier");
        self.dossier = Some(Box::new(SellerDossierScreen::new(ctx, id)));
    }

    fn handle_edit_key(&mut self, key: KeyEvent, ctx: &ScreenContext) {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => self.editing = false,
            KeyCode::Backspace => {
                self.query.text.pop();
                self.reload(ctx);
            }
            KeyCode::Char(c) => {
                self.query.text.push(c);
                self.reload(ctx);
            }
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, ctx: &ScreenContext) -> ScreenAction {
        if let Some(dossier) = self.dossier.as_mut() {
            return match dossier.handle_key(key, ctx) {
                Some(action) => action,
                None if key.code == KeyCode::Esc => {
                    self.dossier = None;
                    ScreenAction::None
                }
                None => ScreenAction::None,
            };
        }
        if self.editing {
            self.handle_edit_key(key, ctx);
            return ScreenAction::None;
        }

        let count = self.sellers.len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                let target = self.list.selected_index().saturating_sub(GRID_COLUMNS);
                self.list.set_selected_index(target, count);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let target =
                    (self.list.selected_index() + GRID_COLUMNS).min(count.saturating_sub(1));
                self.list.set_selected_index(target, count);
            }
            KeyCode::Left | KeyCode::Char('h') => self.list.select_previous(count),
            KeyCode::Right => self.list.select_next(count),
            KeyCode::Enter => {
                let selected = self.sellers().get(self.list.selected_index());
                if let Some(id) = selected.map(|s| s.id.clone()) {
                    self.open(id, ctx);
                }
            }
            KeyCode::Char('f') => self.editing = true,
            KeyCode::Char('l') => {
                self.query.risk = self.query.risk.next();
                self.reload(ctx);
            }
            KeyCode::Char('o') => {
                self.query.sort = self.query.sort.next();
                self.reload(ctx);
            }
            KeyCode::Char('r') => {
                self.stats
                    .refresh(ctx.provider.quick_stats(StatPanel::Sellers));
                self.reload(ctx);
            }
            _ => return ScreenAction::None,
        }
        self.list.ensure_visible(self.viewport_items);
        ScreenAction::None
    }

    pub fn handle_pointer(&mut self, pointer: Pointer, ctx: &ScreenContext) -> ScreenAction {
        if let Some(dossier) = self.dossier.as_mut() {
            return dossier.handle_pointer(pointer);
        }
        let Pointer::Click { column, row } = pointer else {
            return ScreenAction::None;
        };
        if let Some(id) = hit(&self.regions, column, row) {
            self.open(id, ctx);
        }
        ScreenAction::None
    }

    pub fn key_hints(&self) -> Vec<(&'static str, &'static str)> {
        if self.dossier.is_some() {
            return SellerDossierScreen::key_hints();
        }
        if self.editing {
            return vec![("type", "Filter"), ("Enter/Esc", "Done")];
        }
        vec![
            ("Enter", "Dossier"),
            ("f", "Search"),
            ("l", "Risk level"),
            ("o", "Sort"),
            ("r", "Retry"),
        ]
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &RenderContext) {
        if let Some(dossier) = self.dossier.as_mut() {
            dossier.render(frame, area, ctx);
            return;
        }

        let theme = ctx.theme;
        let banner = if self.flagged > 0 { 1 } else { 0 };
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),      // Title
                Constraint::Length(3),      // Filter bar
                Constraint::Length(banner), // Consistency warning
                Constraint::Length(1),      // Quick stats
                Constraint::Min(CARD_HEIGHT),
            ])
            .split(area);

        frame.render_widget(
            Paragraph::new(Span::styled("Seller Intelligence", theme.title_style())),
            rows[0],
        );

        let cursor = if self.editing { "▏" } else { "" };
        let filter_line = Line::from(vec![
            Span::styled("Search [f]: ", theme.metric_style()),
            Span::styled(format!("{}{}", self.query.text, cursor), theme.title_style()),
            Span::styled("   Risk [l]: ", theme.metric_style()),
            Span::styled(self.query.risk.display_name(), theme.key_hint_style()),
            Span::styled("   Sort [o]: ", theme.metric_style()),
            Span::styled(self.query.sort.display_name(), theme.key_hint_style()),
        ]);
        frame.render_widget(
            Paragraph::new(filter_line).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.border_style(self.editing)),
            ),
            rows[1],
        );

        if self.flagged > 0 {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!(
                        "⚠ {} seller record(s) hidden: violation counts do not add up",
                        self.flagged
                    ),
                    theme.tier_style(Tier::Critical),
                )),
                rows[2],
            );
        }

        let mut stat_spans = Vec::new();
        for stat in self.stats.items() {
            stat_spans.push(Span::styled(format!("{}: ", stat.label), theme.metric_style()));
            stat_spans.push(Span::styled(stat.value.clone(), theme.title_style()));
            stat_spans.push(Span::raw("   "));
        }
        frame.render_widget(Paragraph::new(Line::from(stat_spans)), rows[3]);

        if self.sellers.value().is_none() {
            self.regions.clear();
            let message = match &self.sellers {
                Loadable::Missing(message) => message.clone(),
                other => other.failure_hint().unwrap_or_default(),
            };
            render_placeholder(frame, rows[4], "Sellers", &message, theme);
            return;
        }

        let mut block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Sellers ({}) ", self.sellers.len()))
            .border_style(theme.border_style(!self.editing));
        if let Some(hint) = self.sellers.failure_hint() {
            block = block.title_bottom(hint);
        }
        let inner = block.inner(rows[4]);
        frame.render_widget(block, rows[4]);

        if self.sellers.is_empty() {
            self.regions.clear();
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "No sellers match this search",
                    theme.metric_style(),
                )),
                inner,
            );
            return;
        }

        let visible_rows = (inner.height / CARD_HEIGHT).max(1) as usize;
        self.viewport_items = visible_rows * GRID_COLUMNS;
        let selected_row = self.list.selected_index() / GRID_COLUMNS;
        let start = selected_row.saturating_sub(visible_rows - 1) * GRID_COLUMNS;
        let card_width = inner.width / GRID_COLUMNS as u16;

        let mut regions = Vec::new();
        let sellers = self.sellers.items();
        for index in calculate_visible_range(start, self.viewport_items, sellers.len()) {
            let slot = index - start;
            let card_area = Rect::new(
                inner.x + (slot % GRID_COLUMNS) as u16 * card_width,
                inner.y + (slot / GRID_COLUMNS) as u16 * CARD_HEIGHT,
                card_width,
                CARD_HEIGHT,
            );
            if card_area.bottom() > inner.bottom() {
                break;
            }
            let seller = &sellers[index];
            let selected = index == self.list.selected_index();
            render_seller_card(frame, card_area, seller, selected, theme, ctx.now);
            regions.push(HitRegion::new(card_area, seller.id.clone()));
        }
        self.regions = regions;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InspectorConfig;
    use crate::model::DetectionThresholds;
    use crate::provider::seed::seed_fixture;
    use crate::provider::{FixtureProvider, RiskFilter, SellerSort};
    use chrono::Utc;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn run_with<R>(
        provider: FixtureProvider,
        focus: Option<SellerId>,
        f: impl FnOnce(&mut SellerIntelScreen, &ScreenContext) -> R,
    ) -> R {
        let inspector = InspectorConfig::default();
        let ctx = ScreenContext {
            provider: &provider,
            inspector: &inspector,
            thresholds: DetectionThresholds::default(),
        };
        let mut screen = SellerIntelScreen::new(&ctx, focus);
        f(&mut screen, &ctx)
    }

    fn run<R>(f: impl FnOnce(&mut SellerIntelScreen, &ScreenContext) -> R) -> R {
        let provider = FixtureProvider::new(seed_fixture(Utc::now())).unwrap();
        run_with(provider, None, f)
    }

    fn names(screen: &SellerIntelScreen) -> Vec<&str> {
        screen.sellers().iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_default_sort_is_score_descending() {
        run(|screen, _| {
            assert_eq!(screen.query().sort, SellerSort::Score);
            let scores: Vec<f64> = screen.sellers().iter().map(|s| s.compliance_score).collect();
            assert!(scores.windows(2).all(|w| w[0] >= w[1]));
            assert_eq!(screen.sellers().len(), 5);
        });
    }

    #[test]
    fn test_typing_filters_and_captures_keys() {
        run(|screen, ctx| {
            screen.handle_key(key(KeyCode::Char('f')), ctx);
            assert!(screen.captures_text());
            for c in "organic".chars() {
                screen.handle_key(key(KeyCode::Char(c)), ctx);
            }
            assert_eq!(names(screen), vec!["Organic Foods Co."]);
            screen.handle_key(key(KeyCode::Backspace), ctx);
            assert_eq!(screen.query().text, "organi");
            screen.handle_key(key(KeyCode::Enter), ctx);
            assert!(!screen.captures_text());
        });
    }

    #[test]
    fn test_risk_filter_cycles() {
        run(|screen, ctx| {
            screen.handle_key(key(KeyCode::Char('l')), ctx);
            assert_eq!(screen.query().risk, RiskFilter::High);
            assert!(screen
                .sellers()
                .iter()
                .all(|s| s.risk_level == crate::model::RiskLevel::High));
            assert_eq!(screen.sellers().len(), 2);
        });
    }

    #[test]
    fn test_inconsistent_seller_is_flagged_not_listed() {
        let mut fixture = seed_fixture(Utc::now());
        fixture.sellers[0].active_violations += 1;
        let bad = fixture.sellers[0].id.clone();
        let provider = FixtureProvider::new(fixture).unwrap();
        run_with(provider, None, |screen, _| {
            assert_eq!(screen.flagged(), 1);
            assert!(screen.sellers().iter().all(|s| s.id != bad));
        });
    }

    #[test]
    fn test_focus_opens_dossier_and_esc_returns() {
        let provider = FixtureProvider::new(seed_fixture(Utc::now())).unwrap();
        let id = SellerId::parse("SELL-2025-7836").unwrap();
        run_with(provider, Some(id.clone()), |screen, ctx| {
            assert_eq!(screen.dossier().map(|d| d.seller_id()), Some(&id));
            screen.handle_key(key(KeyCode::Esc), ctx);
            assert!(screen.dossier().is_none());
        });
    }

    #[test]
    fn test_enter_opens_selected_seller() {
        run(|screen, ctx| {
            let first = screen.sellers()[0].id.clone();
            screen.handle_key(key(KeyCode::Enter), ctx);
            assert_eq!(screen.dossier().map(|d| d.seller_id()), Some(&first));
        });
    }
}
