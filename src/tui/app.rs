//! Root controller: owns the view state, the mounted screen and the
//! collaborators, and routes input between the shell and the screen.

use super::clipboard::copy_to_clipboard;
use super::layout::{centered_rect, shell_layout, LayoutMode, ShellAreas};
use super::screens::{Pointer, RenderContext, Screen, ScreenAction, ScreenContext};
use super::shell::footer::render_footer;
use super::shell::sidebar::{render_overlay, render_sidebar};
use super::shell::top_bar::{render_top_bar, search_area};
use super::shell::{
    available_actions, determine_shell_action, SearchEvent, SearchInput, ShellAction,
    ShellContext, SidebarTarget, TopBarTarget,
};
use super::theme::Theme;
use super::view_state::{NavRequest, View, ViewState};
use super::widgets::{hit, HitRegion};
use crate::config::ScrutineyeConfig;
use crate::model::ReportArtifact;
use crate::provider::reports::ReportGenerator;
use crate::provider::search::SearchBackend;
use crate::provider::{DataProvider, SearchHit};
use anyhow::Result;
use chrono::{DateTime, Datelike, Local, Utc};
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::sync::Arc;

/// Source of "now" for greetings and relative times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(at) => *at,
        }
    }
}

fn screen_context<'a>(
    provider: &'a dyn DataProvider,
    config: &'a ScrutineyeConfig,
) -> ScreenContext<'a> {
    ScreenContext {
        provider,
        inspector: &config.inspector,
        thresholds: config.thresholds,
    }
}

/// Collaborators the app is built from.
pub struct Collaborators {
    pub provider: Arc<dyn DataProvider>,
    pub search: SearchBackend,
    pub reports: Box<dyn ReportGenerator>,
}

pub struct App {
    view: ViewState,
    screen: Screen,
    provider: Arc<dyn DataProvider>,
    search: SearchInput,
    search_backend: SearchBackend,
    reports: Box<dyn ReportGenerator>,
    /// Reports completed this session, newest first. Outlives screen remounts.
    session_reports: Vec<ReportArtifact>,
    config: ScrutineyeConfig,
    status: Option<String>,
    help_open: bool,
    clock: Clock,
    layout_mode: LayoutMode,
    content_area: Rect,
    top_regions: Vec<HitRegion<TopBarTarget>>,
    sidebar_regions: Vec<HitRegion<SidebarTarget>>,
}

impl App {
    pub fn new(collaborators: Collaborators, config: ScrutineyeConfig, clock: Clock) -> Self {
        let Collaborators {
            provider,
            search,
            reports,
        } = collaborators;
        let start = config.display.start_view();
        let view = ViewState::new(start, config.display.dark_mode);
        let screen = Screen::mount(start, None, &screen_context(provider.as_ref(), &config));
        tracing::info!(view = %start, dark_mode = view.dark_mode(), "Dashboard started");

        Self {
            view,
            screen,
            provider,
            search: SearchInput::new(),
            search_backend: search,
            reports,
            session_reports: Vec::new(),
            config,
            status: None,
            help_open: false,
            clock,
            layout_mode: LayoutMode::Wide,
            content_area: Rect::default(),
            top_regions: Vec::new(),
            sidebar_regions: Vec::new(),
        }
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn search(&self) -> &SearchInput {
        &self.search
    }

    pub fn session_reports(&self) -> &[ReportArtifact] {
        &self.session_reports
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn help_open(&self) -> bool {
        self.help_open
    }

    pub fn layout_mode(&self) -> LayoutMode {
        self.layout_mode
    }

    /// Switches view and remounts the destination from scratch.
    pub fn navigate(&mut self, request: NavRequest) {
        tracing::debug!(view = %request.view, focus = ?request.focus, "Navigate");
        self.view.set_active_view(request.view);
        self.view.close_sidebar();
        let ctx = screen_context(self.provider.as_ref(), &self.config);
        self.screen = Screen::mount(request.view, request.focus, &ctx);
    }

    fn select_view(&mut self, view: View) {
        self.navigate(NavRequest::to(view));
    }

    fn shell_context(&self) -> ShellContext {
        ShellContext {
            narrow: self.layout_mode == LayoutMode::Narrow,
            sidebar_open: self.view.sidebar_open(),
            search_active: self.search.is_active(),
            help_open: self.help_open,
            screen_captures_text: self.screen.captures_text(),
        }
    }

    /// Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        self.status = None;

        if let Some(action) = determine_shell_action(key, self.shell_context()) {
            return Ok(self.execute_shell_action(action));
        }
        if self.help_open {
            return Ok(false);
        }
        if self.search.is_active() {
            let event = self.search.handle_key(key);
            self.handle_search_event(event);
            return Ok(false);
        }
        if self.view.sidebar_open() && self.layout_mode == LayoutMode::Narrow {
            return Ok(false);
        }

        let ctx = screen_context(self.provider.as_ref(), &self.config);
        let action = self.screen.handle_key(key, &ctx);
        self.apply(action);
        Ok(false)
    }

    fn execute_shell_action(&mut self, action: ShellAction) -> bool {
        match action {
            ShellAction::Quit => return true,
            ShellAction::SelectView(view) => self.select_view(view),
            ShellAction::OpenSidebar => self.view.open_sidebar(),
            ShellAction::CloseSidebar => self.view.close_sidebar(),
            ShellAction::FocusSearch => self.search.activate(),
            ShellAction::ToggleDarkMode => self.view.toggle_dark_mode(),
            ShellAction::ToggleHelp => self.help_open = !self.help_open,
        }
        false
    }

    fn handle_search_event(&mut self, event: SearchEvent) {
        match event {
            SearchEvent::Request(request) => {
                if let Some(response) =
                    self.search_backend
                        .submit(request.generation, request.kind, &request.query)
                {
                    self.search.receive([response]);
                }
            }
            SearchEvent::Open(hit) => self.open_hit(hit),
            SearchEvent::Closed | SearchEvent::None => {}
        }
    }

    fn open_hit(&mut self, hit: SearchHit) {
        let request = match hit {
            SearchHit::Case { id, .. } => NavRequest::case(id),
            SearchHit::Seller { id, .. } => NavRequest::seller(id),
        };
        self.navigate(request);
    }

    fn apply(&mut self, action: ScreenAction) {
        match action {
            ScreenAction::None => {}
            ScreenAction::Navigate(request) => self.navigate(request),
            ScreenAction::Status(message) => self.status = Some(message),
            ScreenAction::RequestReport(request) => {
                let template = request.template_id.clone();
                self.status = Some(match self.reports.submit(request) {
                    Ok(ticket) => format!("Generating report {}...", ticket.artifact_id),
                    Err(e) => {
                        tracing::warn!(template = %template, error = %e, "Report request failed");
                        format!("Report request failed: {}", e)
                    }
                });
            }
            ScreenAction::CopyToClipboard { text, description } => {
                self.status = Some(copy_to_clipboard(&text, &description));
            }
        }
    }

    pub fn handle_mouse(&mut self, event: MouseEvent) -> Result<()> {
        let Some(pointer) = Pointer::from_event(&event) else {
            return Ok(());
        };
        let (column, row) = match pointer {
            Pointer::Click { column, row } | Pointer::Hover { column, row } => (column, row),
        };

        if matches!(pointer, Pointer::Click { .. }) {
            if self.help_open {
                self.help_open = false;
                return Ok(());
            }
            if let Some(target) = hit(&self.top_regions, column, row) {
                self.click_top_bar(target);
                return Ok(());
            }
            if self.search.is_active() {
                self.search.close();
            }
            if let Some(target) = hit(&self.sidebar_regions, column, row) {
                match target {
                    SidebarTarget::Entry(view) => self.select_view(view),
                    SidebarTarget::Scrim => self.view.close_sidebar(),
                }
                return Ok(());
            }
        } else if self.help_open || self.view.sidebar_open() {
            return Ok(());
        }

        if self.content_area.contains((column, row).into()) {
            let ctx = screen_context(self.provider.as_ref(), &self.config);
            let action = self.screen.handle_pointer(pointer, &ctx);
            self.apply(action);
        }
        Ok(())
    }

    fn click_top_bar(&mut self, target: TopBarTarget) {
        match target {
            TopBarTarget::Menu => {
                if self.layout_mode == LayoutMode::Narrow {
                    self.view.open_sidebar();
                }
            }
            TopBarTarget::Search => self.search.activate(),
            TopBarTarget::DarkMode => self.view.toggle_dark_mode(),
            TopBarTarget::Bell => {}
            TopBarTarget::Hit(index) => {
                if let Some(hit) = self.search.open_hit(index) {
                    self.open_hit(hit);
                }
            }
        }
    }

    /// Collects answers from the background collaborators.
    pub fn tick(&mut self) {
        let responses = self.search_backend.poll();
        if !responses.is_empty() {
            self.search.receive(responses);
        }

        for artifact in self.reports.drain_completed() {
            tracing::info!(report = %artifact.id, "Report ready");
            self.status = Some(format!("Report ready: {} ({})", artifact.title, artifact.id));
            self.session_reports.insert(0, artifact);
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let theme = Theme::for_mode(self.view.dark_mode());
        let now = self.clock.now();
        let area = frame.area();
        self.layout_mode = LayoutMode::from_terminal_width(area.width);

        frame.render_widget(Block::default().style(theme.base_style()), area);
        let areas: ShellAreas = shell_layout(area, self.layout_mode);
        self.content_area = areas.content;

        let mut top_regions =
            render_top_bar(frame, areas.top_bar, &self.search, self.view.dark_mode(), &theme);
        let mut sidebar_regions = match areas.sidebar {
            Some(sidebar) => render_sidebar(
                frame,
                sidebar,
                self.view.active_view(),
                &self.config.inspector,
                &theme,
            ),
            None => Vec::new(),
        };

        let render_ctx = RenderContext {
            theme: &theme,
            now,
            inspector: &self.config.inspector,
            session_reports: &self.session_reports,
        };
        self.screen.render(frame, areas.content, &render_ctx);

        let mut hints = self.screen.key_hints();
        hints.extend([("/", "Search"), ("?", "Help"), ("q", "Quit")]);
        let year = now.with_timezone(&Local).year();
        render_footer(frame, areas.footer, &hints, self.status.as_deref(), year, &theme);

        if self.layout_mode == LayoutMode::Narrow && self.view.sidebar_open() {
            let below_top = Rect {
                y: areas.content.y,
                height: area.bottom().saturating_sub(areas.content.y),
                ..area
            };
            sidebar_regions = render_overlay(
                frame,
                below_top,
                self.view.active_view(),
                &self.config.inspector,
                &theme,
            );
        }

        top_regions.extend(self.search.render_dropdown(
            frame,
            search_area(areas.top_bar),
            area,
            &theme,
        ));

        if self.help_open {
            render_help(frame, area, &self.screen.key_hints(), &theme);
        }

        self.top_regions = top_regions;
        self.sidebar_regions = sidebar_regions;
    }
}

fn render_help(frame: &mut Frame, area: Rect, screen_hints: &[(&str, &str)], theme: &Theme) {
    let popup = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup);

    let mut lines = vec![Line::from(Span::styled("Global", theme.title_style()))];
    for (key, action) in available_actions() {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<8}", key), theme.key_hint_style()),
            Span::styled(action, theme.base_style()),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("This screen", theme.title_style())));
    for (key, action) in screen_hints {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<8}", key), theme.key_hint_style()),
            Span::styled(action.to_string(), theme.base_style()),
        ]));
    }

    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help [? / Esc to close] ")
                .border_style(theme.border_style(true))
                .style(theme.base_style()),
        ),
        popup,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CaseId, SellerId};
    use crate::provider::reports::InlineReportGenerator;
    use crate::provider::{seed::seed_fixture, FixtureProvider};
    use crate::tui::view_state::FocusId;
    use crossterm::event::{KeyCode, KeyModifiers};
    use pretty_assertions::assert_eq;
    use ratatui::{backend::TestBackend, Terminal};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        let now = Utc::now();
        let provider = Arc::new(FixtureProvider::new(seed_fixture(now)).unwrap());
        let templates = provider.report_templates().unwrap();
        let collaborators = Collaborators {
            provider: provider.clone(),
            search: SearchBackend::Inline(provider),
            reports: Box::new(InlineReportGenerator::new(templates)),
        };
        App::new(collaborators, ScrutineyeConfig::default(), Clock::Fixed(now))
    }

    fn draw(app: &mut App, width: u16, height: u16) {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
    }

    #[test]
    fn test_number_keys_mount_each_view() {
        let mut app = app();
        for &view in View::all() {
            app.handle_key(key(KeyCode::Char(view.hotkey()))).unwrap();
            assert_eq!(app.view_state().active_view(), view);
            assert_eq!(app.screen().view(), view);
        }
    }

    #[test]
    fn test_dark_mode_toggle_is_involution() {
        let mut app = app();
        let before = app.view_state().dark_mode();
        app.handle_key(key(KeyCode::Char('d'))).unwrap();
        app.handle_key(key(KeyCode::Char('d'))).unwrap();
        assert_eq!(app.view_state().dark_mode(), before);
    }

    #[test]
    fn test_narrow_sidebar_closes_after_navigation() {
        let mut app = app();
        draw(&mut app, 80, 30);
        assert_eq!(app.layout_mode(), LayoutMode::Narrow);
        app.handle_key(key(KeyCode::Char('m'))).unwrap();
        assert!(app.view_state().sidebar_open());
        app.handle_key(key(KeyCode::Char('3'))).unwrap();
        assert!(!app.view_state().sidebar_open());
        assert_eq!(app.view_state().active_view(), View::SellerIntel);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        assert!(app.handle_key(key(KeyCode::Char('q'))).unwrap());
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(app.handle_key(ctrl_c).unwrap());
    }

    #[test]
    fn test_search_opens_case_hit() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('/'))).unwrap();
        for c in "VIO-2025-001247".chars() {
            app.handle_key(key(KeyCode::Char(c))).unwrap();
        }
        // Typing into search never leaks to the shell.
        assert_eq!(app.view_state().active_view(), View::Dashboard);
        assert!(!app.search().suggestions().is_empty());

        app.handle_key(key(KeyCode::Enter)).unwrap();
        assert!(!app.search().hits().is_empty());
        app.handle_key(key(KeyCode::Enter)).unwrap();

        assert_eq!(app.view_state().active_view(), View::Workspace);
        match app.screen() {
            Screen::Workspace(ws) => assert_eq!(
                ws.open_case(),
                Some(&CaseId::parse("VIO-2025-001247").unwrap())
            ),
            other => panic!("unexpected screen {:?}", other.view()),
        }
    }

    #[test]
    fn test_navigate_with_seller_focus_opens_dossier() {
        let mut app = app();
        let id = SellerId::parse("SELL-2025-7834").unwrap();
        app.navigate(NavRequest {
            view: View::SellerIntel,
            focus: Some(FocusId::Seller(id.clone())),
        });
        match app.screen() {
            Screen::SellerIntel(intel) => {
                assert_eq!(intel.dossier().map(|d| d.seller_id()), Some(&id))
            }
            other => panic!("unexpected screen {:?}", other.view()),
        }
    }

    #[test]
    fn test_generated_report_survives_remount() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('4'))).unwrap();
        app.handle_key(key(KeyCode::Enter)).unwrap();
        assert!(app.status().unwrap_or_default().starts_with("Generating report"));
        app.tick();
        assert_eq!(app.session_reports().len(), 1);

        app.handle_key(key(KeyCode::Char('1'))).unwrap();
        app.handle_key(key(KeyCode::Char('4'))).unwrap();
        assert_eq!(app.session_reports().len(), 1);
    }

    #[test]
    fn test_help_overlay_swallows_keys() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('?'))).unwrap();
        assert!(app.help_open());
        app.handle_key(key(KeyCode::Char('2'))).unwrap();
        assert_eq!(app.view_state().active_view(), View::Dashboard);
        app.handle_key(key(KeyCode::Esc)).unwrap();
        assert!(!app.help_open());
    }

    #[test]
    fn test_render_wide_and_narrow_without_panicking() {
        let mut app = app();
        for &view in View::all() {
            app.navigate(NavRequest::to(view));
            draw(&mut app, 160, 48);
            draw(&mut app, 80, 30);
        }
    }
}
