//! Priority Inbox: every open case, ranked.

use super::case_row::{render_case_rows, CaseRowTarget, ROW_HEIGHT};
use super::{hit, HitRegion};
use crate::model::{Case, CaseId, SellerId};
use crate::provider::{CaseFilter, CaseQuery, CaseSort, DataProvider};
use crate::tui::list_state::ListState;
use crate::tui::loadable::{render_placeholder, Loadable};
use crate::tui::theme::Theme;
use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    widgets::{Block, Borders},
    Frame,
};

/// What the inbox asks its host to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboxOutcome {
    OpenCase(CaseId),
    OpenSeller(SellerId),
    Resorted,
}

#[derive(Debug)]
pub struct PriorityInbox {
    cases: Loadable<Vec<Case>>,
    sort: CaseSort,
    list: ListState,
    viewport_rows: usize,
    regions: Vec<HitRegion<CaseRowTarget>>,
}

impl PriorityInbox {
    pub fn load(provider: &dyn DataProvider) -> Self {
        let sort = CaseSort::default();
        Self {
            cases: Loadable::from_result(provider.list_cases(&CaseQuery::new(CaseFilter::All, sort))),
            sort,
            list: ListState::new(),
            viewport_rows: 1,
            regions: Vec::new(),
        }
    }

    pub fn reload(&mut self, provider: &dyn DataProvider) {
        self.cases
            .refresh(provider.list_cases(&CaseQuery::new(CaseFilter::All, self.sort)));
        self.list.set_selected_index(self.list.selected_index(), self.cases.len());
    }

    pub fn cases(&self) -> &[Case] {
        self.cases.items()
    }

    pub fn sort(&self) -> CaseSort {
        self.sort
    }

    pub fn set_sort(&mut self, sort: CaseSort, provider: &dyn DataProvider) {
        self.sort = sort;
        self.list.reset();
        self.reload(provider);
    }

    /// Moves to the next inbox sort key.
    pub fn cycle_sort(&mut self, provider: &dyn DataProvider) {
        let options = CaseSort::inbox_options();
        let position = options.iter().position(|s| *s == self.sort).unwrap_or(0);
        self.set_sort(options[(position + 1) % options.len()], provider);
    }

    pub fn selected_case(&self) -> Option<&Case> {
        self.cases().get(self.list.selected_index())
    }

    pub fn handle_key(&mut self, key: KeyEvent, provider: &dyn DataProvider) -> Option<InboxOutcome> {
        let count = self.cases.len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_previous(count),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_next(count),
            KeyCode::Home | KeyCode::Char('g') => self.list.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.list.select_last(count),
            KeyCode::Enter => {
                return self.selected_case().map(|c| InboxOutcome::OpenCase(c.id.clone()));
            }
            KeyCode::Char('s') => {
                return self
                    .selected_case()
                    .map(|c| InboxOutcome::OpenSeller(c.seller_ref.clone()));
            }
            KeyCode::Char('o') => {
                self.cycle_sort(provider);
                return Some(InboxOutcome::Resorted);
            }
            _ => return None,
        }
        self.list.ensure_visible(self.viewport_rows);
        None
    }

    pub fn handle_click(&self, column: u16, row: u16) -> Option<InboxOutcome> {
        match hit(&self.regions, column, row)? {
            CaseRowTarget::Case(id) => Some(InboxOutcome::OpenCase(id)),
            CaseRowTarget::Seller(id) => Some(InboxOutcome::OpenSeller(id)),
        }
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        focused: bool,
        theme: &Theme,
        now: DateTime<Utc>,
    ) {
        let title = format!(
            " Priority Inbox ({}) · sort: {} [o] ",
            self.cases.len(),
            self.sort.display_name()
        );

        if self.cases.value().is_none() {
            self.regions.clear();
            let message = match &self.cases {
                Loadable::Missing(message) => message.clone(),
                other => other.failure_hint().unwrap_or_default(),
            };
            render_placeholder(frame, area, title.trim(), &message, theme);
            return;
        }

        let mut block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(theme.border_style(focused));
        if let Some(hint) = self.cases.failure_hint() {
            block = block.title_bottom(hint);
        }
        let inner = block.inner(area);
        frame.render_widget(block, area);

        self.viewport_rows = (inner.height / ROW_HEIGHT).max(1) as usize;
        self.list.ensure_visible(self.viewport_rows);
        self.regions = render_case_rows(
            frame,
            inner,
            self.cases.items(),
            &self.list,
            focused,
            theme,
            now,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{seed::seed_fixture, FixtureProvider};
    use crossterm::event::KeyModifiers;

    fn provider() -> FixtureProvider {
        FixtureProvider::new(seed_fixture(Utc::now())).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_inbox_starts_in_priority_order() {
        let provider = provider();
        let inbox = PriorityInbox::load(&provider);
        let priorities: Vec<u8> = inbox.cases().iter().map(|c| c.priority).collect();
        assert_eq!(priorities, vec![95, 93, 88, 85, 75]);
    }

    #[test]
    fn test_enter_opens_selected_case() {
        let provider = provider();
        let mut inbox = PriorityInbox::load(&provider);
        inbox.handle_key(key(KeyCode::Down), &provider);
        let expected = inbox.cases()[1].id.clone();
        assert_eq!(
            inbox.handle_key(key(KeyCode::Enter), &provider),
            Some(InboxOutcome::OpenCase(expected))
        );
    }

    #[test]
    fn test_seller_key_opens_seller() {
        let provider = provider();
        let mut inbox = PriorityInbox::load(&provider);
        let expected = inbox.cases()[0].seller_ref.clone();
        assert_eq!(
            inbox.handle_key(key(KeyCode::Char('s')), &provider),
            Some(InboxOutcome::OpenSeller(expected))
        );
    }

    #[test]
    fn test_sort_cycles_through_inbox_options() {
        let provider = provider();
        let mut inbox = PriorityInbox::load(&provider);
        for expected in [CaseSort::DetectedAt, CaseSort::Severity, CaseSort::Impact, CaseSort::Priority] {
            assert_eq!(
                inbox.handle_key(key(KeyCode::Char('o')), &provider),
                Some(InboxOutcome::Resorted)
            );
            assert_eq!(inbox.sort(), expected);
        }
    }

    #[test]
    fn test_detected_at_sort_is_most_recent_first() {
        let provider = provider();
        let mut inbox = PriorityInbox::load(&provider);
        inbox.set_sort(CaseSort::DetectedAt, &provider);
        let times: Vec<_> = inbox.cases().iter().map(|c| c.detected_at).collect();
        assert!(times.windows(2).all(|w| w[0] >= w[1]));
    }
}
