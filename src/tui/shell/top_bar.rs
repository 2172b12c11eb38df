//! Top bar: menu button, global search, dark-mode toggle and alerts bell.

use crate::provider::search::{latest_response, SearchGeneration, SearchKind, SearchResponse};
use crate::provider::SearchHit;
use crate::tui::theme::Theme;
use crate::tui::widgets::HitRegion;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

const SEARCH_WIDTH: u16 = 48;
const BRAND_WIDTH: u16 = 18;

/// What a click on the top bar (or its dropdown) hits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopBarTarget {
    Menu,
    Search,
    DarkMode,
    Bell,
    Hit(usize),
}

/// Request the input wants sent to the search backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub generation: u64,
    pub kind: SearchKind,
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    None,
    Request(SearchRequest),
    Open(SearchHit),
    Closed,
}

/// Search box state. Typing asks for suggestions, Enter runs the search,
/// and once hits are listed Enter opens the selected one.
#[derive(Debug, Default)]
pub struct SearchInput {
    active: bool,
    query: String,
    generation: SearchGeneration,
    awaiting: Option<SearchKind>,
    suggestions: Vec<String>,
    hits: Vec<SearchHit>,
    /// A search has been answered for the current query.
    searched: bool,
    selected: usize,
}

impl SearchInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn hits(&self) -> &[SearchHit] {
        &self.hits
    }

    pub fn selected_hit(&self) -> Option<&SearchHit> {
        self.hits.get(self.selected)
    }

    pub fn generation(&self) -> u64 {
        self.generation.latest()
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Closes the box and forgets the query. In-flight answers become stale.
    pub fn close(&mut self) {
        self.active = false;
        self.query.clear();
        self.suggestions.clear();
        self.hits.clear();
        self.searched = false;
        self.selected = 0;
        self.awaiting = None;
        self.generation.next();
    }

    fn request(&mut self, kind: SearchKind) -> SearchEvent {
        let generation = self.generation.next();
        self.awaiting = Some(kind.clone());
        SearchEvent::Request(SearchRequest {
            generation,
            kind,
            query: self.query.clone(),
        })
    }

    fn edited(&mut self) -> SearchEvent {
        self.hits.clear();
        self.searched = false;
        self.selected = 0;
        if self.query.trim().is_empty() {
            self.suggestions.clear();
            self.awaiting = None;
            self.generation.next();
            return SearchEvent::None;
        }
        self.request(SearchKind::Suggest)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> SearchEvent {
        match key.code {
            KeyCode::Esc => {
                self.close();
                SearchEvent::Closed
            }
            KeyCode::Char(c) => {
                self.query.push(c);
                self.edited()
            }
            KeyCode::Backspace => {
                self.query.pop();
                self.edited()
            }
            KeyCode::Down if !self.hits.is_empty() => {
                self.selected = (self.selected + 1).min(self.hits.len() - 1);
                SearchEvent::None
            }
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                SearchEvent::None
            }
            KeyCode::Enter => {
                if let Some(hit) = self.selected_hit().cloned() {
                    self.close();
                    return SearchEvent::Open(hit);
                }
                if self.query.trim().is_empty() {
                    return SearchEvent::None;
                }
                self.request(SearchKind::Search)
            }
            _ => SearchEvent::None,
        }
    }

    /// Click on a listed hit.
    pub fn open_hit(&mut self, index: usize) -> Option<SearchHit> {
        let hit = self.hits.get(index).cloned()?;
        self.close();
        Some(hit)
    }

    /// Applies the newest response; stale generations are dropped.
    pub fn receive(&mut self, responses: impl IntoIterator<Item = SearchResponse>) {
        let Some(response) = latest_response(&self.generation, responses) else {
            return;
        };
        match self.awaiting.take() {
            Some(SearchKind::Suggest) => self.suggestions = response.suggestions,
            Some(SearchKind::Search) => {
                self.hits = response.hits;
                self.searched = true;
                self.selected = 0;
            }
            None => {}
        }
    }

    fn dropdown_lines(&self, theme: &Theme) -> Vec<Line<'static>> {
        if self.searched {
            if self.hits.is_empty() {
                return vec![Line::from(Span::styled(
                    format!("No matches for \"{}\"", self.query),
                    theme.metric_style(),
                ))];
            }
            return self
                .hits
                .iter()
                .enumerate()
                .map(|(index, hit)| {
                    let style = if index == self.selected {
                        theme.selected_style()
                    } else {
                        theme.base_style()
                    };
                    Line::from(vec![
                        Span::styled(format!("{:<7}", hit.kind()), theme.key_hint_style()),
                        Span::styled(hit.label(), style),
                    ])
                })
                .collect();
        }
        self.suggestions
            .iter()
            .map(|s| {
                Line::from(vec![
                    Span::styled("⌕ ", theme.metric_style()),
                    Span::styled(s.clone(), theme.base_style()),
                ])
            })
            .collect()
    }

    /// Dropdown under the search box, drawn over the content.
    pub fn render_dropdown(
        &self,
        frame: &mut Frame,
        anchor: Rect,
        bounds: Rect,
        theme: &Theme,
    ) -> Vec<HitRegion<TopBarTarget>> {
        if !self.active {
            return Vec::new();
        }
        let lines = self.dropdown_lines(theme);
        if lines.is_empty() {
            return Vec::new();
        }
        let height = (lines.len() as u16 + 2).min(bounds.bottom().saturating_sub(anchor.bottom()));
        if height < 3 {
            return Vec::new();
        }
        let area = Rect::new(anchor.x, anchor.bottom(), anchor.width, height);
        frame.render_widget(Clear, area);
        let title = if self.searched { " Results [Enter] " } else { " Suggestions [Enter to search] " };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(theme.border_style(true))
            .style(theme.base_style());
        let inner = block.inner(area);
        frame.render_widget(Paragraph::new(lines).block(block), area);

        if !self.searched {
            return Vec::new();
        }
        (0..self.hits.len())
            .filter(|&i| (i as u16) < inner.height)
            .map(|i| {
                HitRegion::new(
                    Rect::new(inner.x, inner.y + i as u16, inner.width, 1),
                    TopBarTarget::Hit(i),
                )
            })
            .collect()
    }
}

/// Where the search box sits inside the top bar.
pub fn search_area(bar: Rect) -> Rect {
    let width = SEARCH_WIDTH.min(bar.width.saturating_sub(BRAND_WIDTH + 18));
    let x = bar.x + BRAND_WIDTH;
    Rect::new(x, bar.y, width, bar.height.min(3))
}

pub fn render_top_bar(
    frame: &mut Frame,
    area: Rect,
    search: &SearchInput,
    dark_mode: bool,
    theme: &Theme,
) -> Vec<HitRegion<TopBarTarget>> {
    frame.render_widget(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(theme.border_style(false))
            .style(theme.base_style()),
        area,
    );
    let mut regions = Vec::new();

    let brand_y = area.y + 1;
    let menu = Span::styled("[m] ≡ ", theme.key_hint_style());
    let brand = Span::styled("Scrutineye", theme.title_style().fg(theme.accent()));
    let menu_width = menu.content.width() as u16;
    frame.render_widget(
        Paragraph::new(Line::from(vec![menu, brand])),
        Rect::new(area.x, brand_y, BRAND_WIDTH.min(area.width), 1),
    );
    regions.push(HitRegion::new(
        Rect::new(area.x, brand_y, menu_width, 1),
        TopBarTarget::Menu,
    ));

    let search_rect = search_area(area);
    let placeholder = "[/] Search cases, sellers, violations...";
    let content = if search.is_active() {
        Span::styled(format!("{}▏", search.query()), theme.base_style())
    } else if search.query().is_empty() {
        Span::styled(placeholder, theme.metric_style())
    } else {
        Span::styled(search.query().to_string(), theme.base_style())
    };
    frame.render_widget(
        Paragraph::new(Line::from(content)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style(search.is_active())),
        ),
        search_rect,
    );
    regions.push(HitRegion::new(search_rect, TopBarTarget::Search));

    let toggle = if dark_mode { "[d] ☀ Light" } else { "[d] ☾ Dark" };
    let bell = "🔔•";
    let toggle_width = toggle.width() as u16;
    let bell_width = bell.width() as u16;
    let right_edge = area.right();
    if right_edge >= area.x + BRAND_WIDTH + toggle_width + bell_width + 3 {
        let bell_x = right_edge - bell_width - 1;
        let toggle_x = bell_x - toggle_width - 2;
        let toggle_rect = Rect::new(toggle_x, brand_y, toggle_width, 1);
        let bell_rect = Rect::new(bell_x, brand_y, bell_width, 1);
        frame.render_widget(
            Paragraph::new(Span::styled(toggle, theme.key_hint_style())),
            toggle_rect,
        );
        frame.render_widget(
            Paragraph::new(Span::styled(bell, Style::new().fg(theme.critical))),
            bell_rect,
        );
        regions.push(HitRegion::new(toggle_rect, TopBarTarget::DarkMode));
        regions.push(HitRegion::new(bell_rect, TopBarTarget::Bell));
    }

    regions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CaseId;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(input: &mut SearchInput, text: &str) -> Vec<SearchEvent> {
        text.chars()
            .map(|c| input.handle_key(key(KeyCode::Char(c))))
            .collect()
    }

    fn response(generation: u64, query: &str, suggestions: &[&str], hits: Vec<SearchHit>) -> SearchResponse {
        SearchResponse {
            generation,
            query: query.into(),
            suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
            hits,
        }
    }

    fn case_hit() -> SearchHit {
        SearchHit::Case {
            id: CaseId::parse("VIO-2025-001247").unwrap(),
            title: "Missing MRP".into(),
        }
    }

    #[test]
    fn test_typing_requests_suggestions_with_rising_generations() {
        let mut input = SearchInput::new();
        input.activate();
        let events = type_str(&mut input, "te");
        let generations: Vec<u64> = events
            .iter()
            .map(|e| match e {
                SearchEvent::Request(r) => {
                    assert_eq!(r.kind, SearchKind::Suggest);
                    r.generation
                }
                other => panic!("unexpected {:?}", other),
            })
            .collect();
        assert!(generations[0] < generations[1]);
    }

    #[test]
    fn test_stale_suggestions_are_ignored() {
        let mut input = SearchInput::new();
        input.activate();
        let events = type_str(&mut input, "ab");
        let (old, new) = match (&events[0], &events[1]) {
            (SearchEvent::Request(a), SearchEvent::Request(b)) => (a.generation, b.generation),
            _ => panic!("expected requests"),
        };
        input.receive(vec![
            response(new, "ab", &["new"], vec![]),
            response(old, "a", &["old"], vec![]),
        ]);
        assert_eq!(input.suggestions(), &["new".to_string()]);

        // A late answer for the old generation changes nothing.
        input.receive(vec![response(old, "a", &["old"], vec![])]);
        assert_eq!(input.suggestions(), &["new".to_string()]);
    }

    #[test]
    fn test_enter_searches_then_opens_hit() {
        let mut input = SearchInput::new();
        input.activate();
        type_str(&mut input, "mrp");
        let generation = match input.handle_key(key(KeyCode::Enter)) {
            SearchEvent::Request(r) => {
                assert_eq!(r.kind, SearchKind::Search);
                r.generation
            }
            other => panic!("unexpected {:?}", other),
        };
        input.receive(vec![response(generation, "mrp", &[], vec![case_hit()])]);
        assert_eq!(input.hits().len(), 1);
        assert_eq!(input.handle_key(key(KeyCode::Enter)), SearchEvent::Open(case_hit()));
        assert!(!input.is_active());
        assert_eq!(input.query(), "");
    }

    #[test]
    fn test_close_discards_in_flight_answers() {
        let mut input = SearchInput::new();
        input.activate();
        let events = type_str(&mut input, "x");
        let SearchEvent::Request(request) = &events[0] else {
            panic!("expected request");
        };
        assert_eq!(input.handle_key(key(KeyCode::Esc)), SearchEvent::Closed);
        input.receive(vec![response(request.generation, "x", &["late"], vec![])]);
        assert!(input.suggestions().is_empty());
    }

    #[test]
    fn test_empty_query_enter_does_nothing() {
        let mut input = SearchInput::new();
        input.activate();
        assert_eq!(input.handle_key(key(KeyCode::Enter)), SearchEvent::None);
    }
}
