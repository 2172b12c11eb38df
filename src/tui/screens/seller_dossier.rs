//! Seller Dossier: full compliance profile of one seller.

use super::{Pointer, RenderContext, ScreenAction, ScreenContext};
use crate::model::{Case, Seller, SellerId, SellerProfile};
use crate::provider::{CaseFilter, CaseQuery, CaseSort};
use crate::tui::list_state::ListState;
use crate::tui::loadable::{render_placeholder, Loadable};
use crate::tui::style_map::{activity_badge_tier, risk_tier, score_tier, Tier};
use crate::tui::theme::Theme;
use crate::tui::view_state::NavRequest;
use crate::tui::widgets::case_row::{render_case_rows, CaseRowTarget, ROW_HEIGHT};
use crate::tui::widgets::{badge, bar, hit, HitRegion};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DossierTab {
    #[default]
    Overview,
    Violations,
    Compliance,
}

impl DossierTab {
    pub fn all() -> &'static [DossierTab] {
        &[DossierTab::Overview, DossierTab::Violations, DossierTab::Compliance]
    }

    pub fn label(self) -> &'static str {
        match self {
            DossierTab::Overview => "Overview",
            DossierTab::Violations => "Violations History",
            DossierTab::Compliance => "Compliance Trends",
        }
    }

    fn next(self) -> Self {
        match self {
            DossierTab::Overview => DossierTab::Violations,
            DossierTab::Violations => DossierTab::Compliance,
            DossierTab::Compliance => DossierTab::Overview,
        }
    }
}

/// Headline figures shown under the dossier header.
#[derive(Debug, Clone, PartialEq)]
pub struct DossierStats {
    pub score: f64,
    pub score_delta: Option<f64>,
    pub active: u32,
    pub total: u32,
    pub resolution_rate: Option<u32>,
    pub platforms: usize,
    pub categories: usize,
}

impl DossierStats {
    pub fn new(seller: &Seller, profile: Option<&SellerProfile>) -> Self {
        Self {
            score: seller.compliance_score,
            score_delta: profile.and_then(SellerProfile::score_delta),
            active: seller.active_violations,
            total: seller.total_violations,
            resolution_rate: seller.resolution_rate(),
            platforms: seller.platforms.len(),
            categories: seller.categories.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DossierTarget {
    Tab(DossierTab),
    Row(CaseRowTarget),
}

#[derive(Debug)]
pub struct SellerDossierScreen {
    id: SellerId,
    seller: Loadable<Seller>,
    profile: Loadable<Option<SellerProfile>>,
    cases: Loadable<Vec<Case>>,
    tab: DossierTab,
    list: ListState,
    viewport_rows: usize,
    regions: Vec<HitRegion<DossierTarget>>,
}

impl SellerDossierScreen {
    pub fn new(ctx: &ScreenContext, id: SellerId) -> Self {
        let mut screen = Self {
            seller: Loadable::Missing(String::new()),
            profile: Loadable::Ready(None),
            cases: Loadable::Ready(Vec::new()),
            id,
            tab: DossierTab::default(),
            list: ListState::new(),
            viewport_rows: 1,
            regions: Vec::new(),
        };
        screen.seller = Loadable::from_result(ctx.provider.get_seller(&screen.id));
        screen.profile = Loadable::from_result(ctx.provider.seller_profile(&screen.id));
        screen.cases = Loadable::from_result(ctx.provider.list_cases(&screen.case_query()));
        screen
    }

    fn case_query(&self) -> CaseQuery {
        CaseQuery::new(CaseFilter::Seller(self.id.clone()), CaseSort::Priority)
    }

    pub fn seller_id(&self) -> &SellerId {
        &self.id
    }

    pub fn seller(&self) -> Option<&Seller> {
        self.seller.value()
    }

    pub fn tab(&self) -> DossierTab {
        self.tab
    }

    pub fn cases(&self) -> &[Case] {
        self.cases.items()
    }

    pub fn stats(&self) -> Option<DossierStats> {
        let profile = self.profile.value().and_then(Option::as_ref);
        self.seller().map(|s| DossierStats::new(s, profile))
    }

    fn retry(&mut self, ctx: &ScreenContext) {
        self.seller.refresh(ctx.provider.get_seller(&self.id));
        self.profile.refresh(ctx.provider.seller_profile(&self.id));
        self.cases.refresh(ctx.provider.list_cases(&self.case_query()));
    }

    /// `None` leaves the key to the host (Esc goes back to the list).
    pub fn handle_key(&mut self, key: KeyEvent, ctx: &ScreenContext) -> Option<ScreenAction> {
        let count = self.cases.len();
        match key.code {
            KeyCode::Tab => self.tab = self.tab.next(),
            KeyCode::Char('r') => self.retry(ctx),
            KeyCode::Up | KeyCode::Char('k') if self.tab == DossierTab::Violations => {
                self.list.select_previous(count);
                self.list.ensure_visible(self.viewport_rows);
            }
            KeyCode::Down | KeyCode::Char('j') if self.tab == DossierTab::Violations => {
                self.list.select_next(count);
                self.list.ensure_visible(self.viewport_rows);
            }
            KeyCode::Enter if self.tab == DossierTab::Violations => {
                let case = self.cases().get(self.list.selected_index())?;
                return Some(ScreenAction::Navigate(NavRequest::case(case.id.clone())));
            }
            _ => return None,
        }
        Some(ScreenAction::None)
    }

    pub fn handle_pointer(&mut self, pointer: Pointer) -> ScreenAction {
        let Pointer::Click { column, row } = pointer else {
            return ScreenAction::None;
        };
        match hit(&self.regions, column, row) {
            Some(DossierTarget::Tab(tab)) => self.tab = tab,
            Some(DossierTarget::Row(CaseRowTarget::Case(id))) => {
                return ScreenAction::Navigate(NavRequest::case(id));
            }
            // Already on this seller's dossier.
            Some(DossierTarget::Row(CaseRowTarget::Seller(_))) | None => {}
        }
        ScreenAction::None
    }

    pub fn key_hints() -> Vec<(&'static str, &'static str)> {
        vec![("Esc", "Back"), ("Tab", "Tab"), ("Enter", "Open case"), ("r", "Retry")]
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &RenderContext) {
        let theme = ctx.theme;
        let Some(seller) = self.seller.value().cloned() else {
            self.regions.clear();
            let message = match &self.seller {
                Loadable::Missing(_) => format!("Seller {} was not found. Press Esc to return.", self.id),
                other => other.failure_hint().unwrap_or_default(),
            };
            render_placeholder(frame, area, "Seller Dossier", &message, theme);
            return;
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Header
                Constraint::Length(4), // Quick stats
                Constraint::Length(1), // Tabs
                Constraint::Min(4),    // Body
            ])
            .split(area);

        render_header(frame, rows[0], &seller, theme);
        let profile = self.profile.value().and_then(Option::as_ref).cloned();
        render_stats(frame, rows[1], &DossierStats::new(&seller, profile.as_ref()), theme);

        let mut regions = Vec::new();
        render_tabs(frame, rows[2], self.tab, theme, &mut regions);

        match self.tab {
            DossierTab::Overview => {
                render_overview(frame, rows[3], &seller, profile.as_ref(), theme)
            }
            DossierTab::Compliance => render_compliance(frame, rows[3], profile.as_ref(), theme),
            DossierTab::Violations => {
                let block = Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" Cases ({}) ", self.cases.len()))
                    .border_style(theme.border_style(true));
                let inner = block.inner(rows[3]);
                frame.render_widget(block, rows[3]);
                self.viewport_rows = (inner.height / ROW_HEIGHT).max(1) as usize;
                self.list.ensure_visible(self.viewport_rows);
                regions.extend(
                    render_case_rows(
                        frame,
                        inner,
                        self.cases.items(),
                        &self.list,
                        true,
                        theme,
                        ctx.now,
                    )
                    .into_iter()
                    .map(|r| HitRegion::new(r.area, DossierTarget::Row(r.target))),
                );
            }
        }
        self.regions = regions;
    }
}

fn render_header(frame: &mut Frame, area: Rect, seller: &Seller, theme: &Theme) {
    let mut lines = vec![
        Line::from(vec![
            Span::styled(seller.name.clone(), theme.title_style()),
            Span::raw("  "),
            badge(
                &format!("{} Risk", seller.risk_level.label()),
                risk_tier(seller.risk_level),
                theme,
            ),
        ]),
        Line::from(Span::styled(
            format!("{} · {}", seller.business_name, seller.id),
            theme.metric_style(),
        )),
    ];
    if let Err(err) = seller.check_invariants() {
        lines.push(Line::from(Span::styled(
            format!("⚠ {}", err),
            theme.tier_style(Tier::Critical),
        )));
    } else if seller.risk_overridden() {
        lines.push(Line::from(Span::styled(
            "Risk level set independently of compliance score",
            theme.tier_style(Tier::Medium),
        )));
    }
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_stats(frame: &mut Frame, area: Rect, stats: &DossierStats, theme: &Theme) {
    let delta = match stats.score_delta {
        Some(d) => Span::styled(
            format!("{:+.1} vs last month", d),
            theme.tier_style(if d >= 0.0 { Tier::Good } else { Tier::Critical }),
        ),
        None => Span::styled("no history", theme.metric_style()),
    };
    let figures = [
        (
            "Compliance Score",
            vec![
                Span::styled(
                    format!("{:.1} ", stats.score),
                    theme.tier_style(score_tier(stats.score)),
                ),
                delta,
            ],
        ),
        (
            "Active Violations",
            vec![Span::styled(
                format!("{} of {}", stats.active, stats.total),
                theme.tier_style(Tier::Critical),
            )],
        ),
        (
            "Resolution Rate",
            vec![Span::styled(
                stats
                    .resolution_rate
                    .map_or("n/a".to_string(), |r| format!("{}%", r)),
                theme.tier_style(Tier::Good),
            )],
        ),
        (
            "Platforms",
            vec![Span::styled(stats.platforms.to_string(), theme.title_style())],
        ),
        (
            "Categories",
            vec![Span::styled(stats.categories.to_string(), theme.title_style())],
        ),
    ];

    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, figures.len() as u32); figures.len()])
        .split(area);
    for ((label, value), cell) in figures.into_iter().zip(cells.iter()) {
        let card = Paragraph::new(vec![
            Line::from(Span::styled(label, theme.metric_style())),
            Line::from(value),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style(false)),
        );
        frame.render_widget(card, *cell);
    }
}

fn render_tabs(
    frame: &mut Frame,
    area: Rect,
    active: DossierTab,
    theme: &Theme,
    regions: &mut Vec<HitRegion<DossierTarget>>,
) {
    let mut spans = Vec::new();
    let mut x = area.x;
    for &tab in DossierTab::all() {
        let text = format!(" {} ", tab.label());
        let width = text.width() as u16;
        let style = if tab == active {
            theme.active_style().patch(theme.selected_style())
        } else {
            theme.metric_style()
        };
        spans.push(Span::styled(text, style));
        spans.push(Span::raw(" "));
        regions.push(HitRegion::new(Rect::new(x, area.y, width, 1), DossierTarget::Tab(tab)));
        x += width + 1;
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_overview(
    frame: &mut Frame,
    area: Rect,
    seller: &Seller,
    profile: Option<&SellerProfile>,
    theme: &Theme,
) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let field = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{:<16}", label), theme.metric_style()),
            Span::styled(value, theme.title_style()),
        ])
    };

    let mut info = vec![
        field("Platforms", seller.platforms.join(", ")),
        field("Categories", seller.categories.join(", ")),
    ];
    let activity: Vec<Line> = match profile {
        Some(profile) => {
            info.extend([
                field("Registration", profile.registration_number.clone()),
                field("GST", profile.gst_number.clone()),
                field("Established", profile.established.format("%Y-%m-%d").to_string()),
                field("Email", profile.contact.email.clone()),
                field("Phone", profile.contact.phone.clone()),
                field("Address", profile.contact.address.clone()),
            ]);
            profile
                .recent_activity
                .iter()
                .map(|entry| {
                    Line::from(vec![
                        Span::styled(format!("{} ", entry.kind.icon()), theme.metric_style()),
                        Span::styled(
                            format!("{}  ", entry.date.format("%Y-%m-%d")),
                            theme.metric_style(),
                        ),
                        Span::styled(entry.description.clone(), theme.title_style()),
                        Span::raw(" "),
                        badge(entry.badge.label(), activity_badge_tier(entry.badge), theme),
                    ])
                })
                .collect()
        }
        None => {
            info.push(Line::from(Span::styled(
                "No detailed profile on file for this seller.",
                theme.metric_style(),
            )));
            Vec::new()
        }
    };

    frame.render_widget(
        Paragraph::new(info).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Business Information ")
                .border_style(theme.border_style(false)),
        ),
        columns[0],
    );
    frame.render_widget(
        Paragraph::new(activity).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Recent Activity ")
                .border_style(theme.border_style(false)),
        ),
        columns[1],
    );
}

fn render_compliance(frame: &mut Frame, area: Rect, profile: Option<&SellerProfile>, theme: &Theme) {
    let lines: Vec<Line> = match profile {
        Some(profile) if !profile.compliance_history.is_empty() => profile
            .compliance_history
            .iter()
            .map(|month| {
                let (filled, empty) = bar(month.score, 20);
                let style = theme.tier_style(score_tier(month.score));
                Line::from(vec![
                    Span::styled(format!("{:<10}", month.month), theme.metric_style()),
                    Span::styled(filled, style),
                    Span::styled(empty, theme.progress_bar_bg_style()),
                    Span::styled(format!(" {:>5.1}", month.score), style),
                    Span::styled(
                        format!("   {} violations", month.violations),
                        theme.metric_style(),
                    ),
                ])
            })
            .collect(),
        _ => vec![Line::from(Span::styled(
            "No compliance history recorded.",
            theme.metric_style(),
        ))],
    };
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Monthly Compliance Score ")
                .border_style(theme.border_style(false)),
        ),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InspectorConfig;
    use crate::model::DetectionThresholds;
    use crate::provider::{seed::seed_fixture, FixtureProvider};
    use chrono::Utc;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn run<R>(id: &str, f: impl FnOnce(&mut SellerDossierScreen, &ScreenContext) -> R) -> R {
        let provider = FixtureProvider::new(seed_fixture(Utc::now())).unwrap();
        let inspector = InspectorConfig::default();
        let ctx = ScreenContext {
            provider: &provider,
            inspector: &inspector,
            thresholds: DetectionThresholds::default(),
        };
        let mut screen = SellerDossierScreen::new(&ctx, SellerId::parse(id).unwrap());
        f(&mut screen, &ctx)
    }

    #[test]
    fn test_stats_for_techmart() {
        run("SELL-2025-7834", |screen, _| {
            let stats = screen.stats().unwrap();
            assert_eq!(stats.active, 8);
            assert_eq!(stats.total, 23);
            // 15 / 23 = 65.2%
            assert_eq!(stats.resolution_rate, Some(65));
            assert!(stats.score_delta.is_some());
        });
    }

    #[test]
    fn test_seller_without_profile_has_no_delta() {
        run("SELL-2025-7838", |screen, _| {
            let stats = screen.stats().unwrap();
            assert_eq!(stats.score_delta, None);
        });
    }

    #[test]
    fn test_violations_tab_lists_seller_cases() {
        run("SELL-2025-7834", |screen, ctx| {
            let id = screen.seller_id().clone();
            assert!(screen.cases().iter().all(|c| c.seller_ref == id));
            screen.handle_key(key(KeyCode::Tab), ctx);
            assert_eq!(screen.tab(), DossierTab::Violations);
            if let Some(first) = screen.cases().first().map(|c| c.id.clone()) {
                assert_eq!(
                    screen.handle_key(key(KeyCode::Enter), ctx),
                    Some(ScreenAction::Navigate(NavRequest::case(first)))
                );
            }
        });
    }

    #[test]
    fn test_esc_is_left_to_host() {
        run("SELL-2025-7834", |screen, ctx| {
            assert_eq!(screen.handle_key(key(KeyCode::Esc), ctx), None);
        });
    }

    #[test]
    fn test_unknown_seller() {
        run("SELL-2025-0001", |screen, _| {
            assert!(screen.seller().is_none());
            assert!(screen.stats().is_none());
        });
    }
}
