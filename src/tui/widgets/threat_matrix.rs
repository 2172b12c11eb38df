//! Category × violation-type heatmap with a selectable cell.

use super::{hit, HitRegion};
use crate::model::{CellKey, ThreatMatrix, ThreatMatrixCell, TimeRange};
use crate::provider::DataProvider;
use crate::tui::loadable::{render_placeholder, Loadable};
use crate::tui::style_map::{blend, cell_rgb, cell_severity_tier};
use crate::tui::theme::{rgb, Theme};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

const LABEL_WIDTH: u16 = 18;

/// Fill colour of a cell blended over the theme background.
pub fn cell_fill(cell: &ThreatMatrixCell, background: (u8, u8, u8)) -> (u8, u8, u8) {
    blend(cell_rgb(cell.severity), background, cell.intensity())
}

/// Black or white, whichever reads better on `fill`.
fn contrast_text((r, g, b): (u8, u8, u8)) -> Color {
    let luminance = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
    if luminance > 150.0 {
        Color::Black
    } else {
        Color::White
    }
}

fn truncate(label: &str, width: usize) -> String {
    if label.width() <= width {
        return label.to_string();
    }
    let mut out = String::new();
    for ch in label.chars() {
        if out.width() + 1 >= width {
            break;
        }
        out.push(ch);
    }
    out.push('…');
    out
}

#[derive(Debug)]
pub struct ThreatMatrixState {
    range: TimeRange,
    matrix: Loadable<ThreatMatrix>,
    cursor: (usize, usize),
    selected: Option<CellKey>,
    regions: Vec<HitRegion<CellKey>>,
}

impl ThreatMatrixState {
    pub fn load(provider: &dyn DataProvider, range: TimeRange) -> Self {
        Self {
            range,
            matrix: Loadable::from_result(provider.get_threat_matrix(range)),
            cursor: (0, 0),
            selected: None,
            regions: Vec::new(),
        }
    }

    pub fn range(&self) -> TimeRange {
        self.range
    }

    pub fn matrix(&self) -> Option<&ThreatMatrix> {
        self.matrix.value()
    }

    /// Switches time range. The selection is kept by identity.
    pub fn set_range(&mut self, range: TimeRange, provider: &dyn DataProvider) {
        self.range = range;
        self.matrix.refresh(provider.get_threat_matrix(range));
    }

    pub fn reload(&mut self, provider: &dyn DataProvider) {
        self.matrix.refresh(provider.get_threat_matrix(self.range));
    }

    /// Selects a cell. Re-selecting the same cell is a no-op; any other
    /// selection replaces it.
    pub fn select(&mut self, key: CellKey) {
        if self.selected.as_ref() != Some(&key) {
            tracing::debug!(category = %key.category, violation_type = %key.violation_type, "Threat matrix cell selected");
            self.selected = Some(key);
        }
    }

    pub fn selected(&self) -> Option<&CellKey> {
        self.selected.as_ref()
    }

    pub fn selected_cell(&self) -> Option<&ThreatMatrixCell> {
        let key = self.selected.as_ref()?;
        self.matrix()?.find(key)
    }

    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    pub fn move_cursor(&mut self, d_row: isize, d_col: isize) {
        let Some(matrix) = self.matrix() else {
            return;
        };
        let (rows, cols) = (matrix.rows(), matrix.columns());
        if rows == 0 || cols == 0 {
            return;
        }
        let row = (self.cursor.0 as isize + d_row).clamp(0, rows as isize - 1) as usize;
        let col = (self.cursor.1 as isize + d_col).clamp(0, cols as isize - 1) as usize;
        self.cursor = (row, col);
    }

    fn select_cursor(&mut self) {
        let key = self
            .matrix()
            .and_then(|m| m.cell_at(self.cursor.0, self.cursor.1))
            .map(ThreatMatrixCell::key);
        if let Some(key) = key {
            self.select(key);
        }
    }

    /// Returns true when the key was consumed.
    pub fn handle_key(&mut self, key: KeyEvent, provider: &dyn DataProvider) -> bool {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1, 0),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1, 0),
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(0, -1),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(0, 1),
            KeyCode::Enter | KeyCode::Char(' ') => self.select_cursor(),
            KeyCode::Char('w') => self.set_range(self.range.next(), provider),
            _ => return false,
        }
        true
    }

    /// Selects the clicked cell, if any. Returns true on a hit.
    pub fn handle_click(&mut self, column: u16, row: u16) -> bool {
        let Some(key) = hit(&self.regions, column, row) else {
            return false;
        };
        if let Some(matrix) = self.matrix.value() {
            for r in 0..matrix.rows() {
                for c in 0..matrix.columns() {
                    if matrix.cell_at(r, c).is_some_and(|cell| cell.matches(&key)) {
                        self.cursor = (r, c);
                    }
                }
            }
        }
        self.select(key);
        true
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool, theme: &Theme) {
        let title = format!(" Threat Matrix · {} [w] ", self.range.label());
        let Some(matrix) = self.matrix.value() else {
            self.regions.clear();
            let message = match &self.matrix {
                Loadable::Missing(message) => message.clone(),
                other => other.failure_hint().unwrap_or_default(),
            };
            render_placeholder(frame, area, title.trim(), &message, theme);
            return;
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(theme.border_style(focused));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let sections = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(2)])
            .split(inner);
        let grid = sections[0];

        let columns = matrix.columns().max(1) as u16;
        let cell_width = (grid.width.saturating_sub(LABEL_WIDTH) / columns).max(3);

        let mut header = vec![Span::raw(" ".repeat(LABEL_WIDTH as usize))];
        for violation_type in matrix.violation_types() {
            let label = truncate(violation_type, cell_width as usize - 1);
            header.push(Span::styled(
                format!("{:<width$}", label, width = cell_width as usize),
                theme.metric_style(),
            ));
        }
        frame.render_widget(
            Paragraph::new(Line::from(header)),
            Rect { height: 1, ..grid },
        );

        let mut regions = Vec::with_capacity(matrix.cells().len());
        for (r, category) in matrix.categories().iter().enumerate() {
            let y = grid.y + 1 + r as u16;
            if y >= grid.bottom() {
                break;
            }
            frame.render_widget(
                Paragraph::new(Span::styled(
                    truncate(category, LABEL_WIDTH as usize - 1),
                    theme.title_style(),
                )),
                Rect::new(grid.x, y, LABEL_WIDTH, 1),
            );

            for c in 0..matrix.columns() {
                let Some(cell) = matrix.cell_at(r, c) else {
                    continue;
                };
                let x = grid.x + LABEL_WIDTH + c as u16 * cell_width;
                if x + cell_width > grid.right() {
                    break;
                }
                let cell_area = Rect::new(x, y, cell_width.saturating_sub(1), 1);
                let fill = cell_fill(cell, theme.background_rgb);
                let mut style = Style::default().bg(rgb(fill)).fg(contrast_text(fill));
                if focused && self.cursor == (r, c) {
                    style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
                }
                let is_selected = self.selected.as_ref().is_some_and(|k| cell.matches(k));
                let text = if is_selected {
                    format!("[{}]", cell.count)
                } else {
                    cell.count.to_string()
                };
                frame.render_widget(
                    Paragraph::new(Span::styled(
                        format!("{:^width$}", text, width = cell_area.width as usize),
                        style,
                    )),
                    cell_area,
                );
                regions.push(HitRegion::new(cell_area, cell.key()));
            }
        }

        let detail = match self.selected_cell() {
            Some(cell) => Line::from(vec![
                Span::styled(
                    format!("{} × {}: ", cell.category, cell.violation_type),
                    theme.title_style(),
                ),
                Span::styled(
                    format!("{} violations", cell.count),
                    theme.tier_style(cell_severity_tier(cell.severity)),
                ),
                Span::styled(
                    format!(" ({} severity)", cell.severity.label()),
                    theme.metric_style(),
                ),
            ]),
            None => Line::from(Span::styled(
                format!(
                    "{} violations in range · select a cell for details",
                    matrix.total_count()
                ),
                theme.metric_style(),
            )),
        };
        frame.render_widget(Paragraph::new(detail), sections[1]);
        self.regions = regions;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellSeverity;
    use crate::provider::{seed::seed_fixture, FixtureProvider};
    use chrono::Utc;
    use ratatui::{backend::TestBackend, Terminal};

    fn state() -> (FixtureProvider, ThreatMatrixState) {
        let provider = FixtureProvider::new(seed_fixture(Utc::now())).unwrap();
        let state = ThreatMatrixState::load(&provider, TimeRange::default());
        (provider, state)
    }

    fn key_at(state: &ThreatMatrixState, row: usize, col: usize) -> CellKey {
        state.matrix().unwrap().cell_at(row, col).unwrap().key()
    }

    #[test]
    fn test_new_selection_replaces_old() {
        let (_, mut state) = state();
        let a = key_at(&state, 0, 0);
        let b = key_at(&state, 1, 2);
        state.select(a);
        state.select(b.clone());
        assert_eq!(state.selected(), Some(&b));
    }

    #[test]
    fn test_reselect_is_idempotent() {
        let (_, mut state) = state();
        let a = key_at(&state, 2, 3);
        state.select(a.clone());
        state.select(a.clone());
        assert_eq!(state.selected(), Some(&a));
    }

    #[test]
    fn test_cursor_clamped_to_grid() {
        let (_, mut state) = state();
        state.move_cursor(-5, -5);
        assert_eq!(state.cursor(), (0, 0));
        state.move_cursor(100, 100);
        assert_eq!(state.cursor(), (5, 5));
    }

    #[test]
    fn test_range_change_keeps_selection_identity() {
        let (provider, mut state) = state();
        let a = key_at(&state, 0, 1);
        state.select(a.clone());
        state.set_range(TimeRange::Last7Days, &provider);
        assert_eq!(state.selected(), Some(&a));
        assert!(state.selected_cell().is_some());
    }

    #[test]
    fn test_cell_fill_saturates_at_fifty() {
        let cell = ThreatMatrixCell {
            category: "Food".into(),
            violation_type: "Missing MRP".into(),
            count: 50,
            severity: CellSeverity::High,
        };
        assert_eq!(cell_fill(&cell, (255, 255, 255)), (239, 68, 68));
    }

    #[test]
    fn test_click_selects_cell() {
        let (_, mut state) = state();
        let backend = TestBackend::new(120, 14);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| state.render(frame, frame.area(), true, &Theme::light()))
            .unwrap();

        // border (1) + header row (1) puts the first category on row 2
        assert!(state.handle_click(1 + LABEL_WIDTH + 1, 2));
        assert_eq!(state.selected(), Some(&key_at(&state, 0, 0)));
        assert!(!state.handle_click(0, 0));
    }

    #[test]
    fn test_truncate_labels() {
        assert_eq!(truncate("Electronics", 20), "Electronics");
        assert_eq!(truncate("Country of Origin", 8), "Country…");
    }
}
