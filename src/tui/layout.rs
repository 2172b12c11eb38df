//! Responsive shell layout.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Terminals narrower than this hide the sidebar behind the menu button.
pub const NARROW_WIDTH: u16 = 100;
pub const SIDEBAR_WIDTH: u16 = 32;

/// Layout mode based on terminal width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// Persistent sidebar
    Wide,
    /// Sidebar only as an overlay
    Narrow,
}

impl LayoutMode {
    pub fn from_terminal_width(width: u16) -> Self {
        if width < NARROW_WIDTH {
            Self::Narrow
        } else {
            Self::Wide
        }
    }

    pub fn shows_persistent_sidebar(&self) -> bool {
        matches!(self, Self::Wide)
    }
}

/// Regions of the application shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellAreas {
    pub top_bar: Rect,
    /// Present only in wide mode.
    pub sidebar: Option<Rect>,
    pub content: Rect,
    pub footer: Rect,
}

pub fn shell_layout(area: Rect, mode: LayoutMode) -> ShellAreas {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Top bar
            Constraint::Min(5),    // Body
            Constraint::Length(2), // Footer
        ])
        .split(area);

    let (sidebar, content) = if mode.shows_persistent_sidebar() {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
            .split(rows[1]);
        (Some(columns[0]), columns[1])
    } else {
        (None, rows[1])
    };

    ShellAreas {
        top_bar: rows[0],
        sidebar,
        content,
        footer: rows[2],
    }
}

/// Sidebar drawer shown over the scrim in narrow mode.
pub fn overlay_sidebar_area(area: Rect) -> Rect {
    Rect {
        x: area.x,
        y: area.y,
        width: SIDEBAR_WIDTH.min(area.width),
        height: area.height,
    }
}

/// A rectangle of the given percentage size centred in `area`.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_mode_selection() {
        assert_eq!(LayoutMode::from_terminal_width(80), LayoutMode::Narrow);
        assert_eq!(LayoutMode::from_terminal_width(99), LayoutMode::Narrow);
        assert_eq!(LayoutMode::from_terminal_width(100), LayoutMode::Wide);
        assert_eq!(LayoutMode::from_terminal_width(180), LayoutMode::Wide);
    }

    #[test]
    fn test_wide_layout_has_sidebar() {
        let areas = shell_layout(Rect::new(0, 0, 140, 40), LayoutMode::Wide);
        let sidebar = areas.sidebar.unwrap();
        assert_eq!(sidebar.width, SIDEBAR_WIDTH);
        assert_eq!(areas.top_bar.height, 3);
        assert_eq!(areas.footer.height, 2);
        assert_eq!(areas.content.x, SIDEBAR_WIDTH);
    }

    #[test]
    fn test_narrow_layout_uses_full_width() {
        let areas = shell_layout(Rect::new(0, 0, 80, 30), LayoutMode::Narrow);
        assert!(areas.sidebar.is_none());
        assert_eq!(areas.content.width, 80);
    }

    #[test]
    fn test_centered_rect_is_inside() {
        let area = Rect::new(0, 0, 100, 40);
        let inner = centered_rect(60, 50, area);
        assert!(inner.x >= area.x && inner.right() <= area.right());
        assert!(inner.y >= area.y && inner.bottom() <= area.bottom());
    }
}
