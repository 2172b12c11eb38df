//! Sidebar navigation: the five views plus the inspector identity block.

use crate::config::InspectorConfig;
use crate::tui::layout::overlay_sidebar_area;
use crate::tui::theme::Theme;
use crate::tui::view_state::View;
use crate::tui::widgets::HitRegion;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const ENTRY_HEIGHT: u16 = 3;

/// What a click on the sidebar hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarTarget {
    Entry(View),
    /// The dimmed backdrop behind the narrow-mode drawer.
    Scrim,
}

pub fn entry_lines(view: View, active: bool, theme: &Theme) -> Vec<Line<'static>> {
    let marker = if active { "▌" } else { " " };
    let label_style = if active {
        theme.title_style().fg(theme.accent())
    } else {
        theme.title_style()
    };
    vec![
        Line::from(vec![
            Span::styled(marker, Style::new().fg(theme.accent())),
            Span::styled(format!("{} ", view.hotkey()), theme.key_hint_style()),
            Span::styled(view.label(), label_style),
        ]),
        Line::from(vec![
            Span::raw("   "),
            Span::styled(view.description(), theme.metric_style()),
        ]),
    ]
}

/// Draws the sidebar into `area` and returns one region per entry.
pub fn render_sidebar(
    frame: &mut Frame,
    area: Rect,
    active: View,
    inspector: &InspectorConfig,
    theme: &Theme,
) -> Vec<HitRegion<SidebarTarget>> {
    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(theme.border_style(false))
        .style(theme.base_style());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .split(inner);

    let mut regions = Vec::new();
    for (index, &view) in View::all().iter().enumerate() {
        let y = rows[0].y + index as u16 * ENTRY_HEIGHT;
        if y + 2 > rows[0].bottom() {
            break;
        }
        let entry = Rect::new(rows[0].x, y, rows[0].width, 2);
        let style = if view == active {
            theme.selected_style()
        } else {
            theme.base_style()
        };
        frame.render_widget(
            Paragraph::new(entry_lines(view, view == active, theme)).style(style),
            entry,
        );
        regions.push(HitRegion::new(entry, SidebarTarget::Entry(view)));
    }

    let identity = Paragraph::new(vec![
        Line::from(Span::styled(
            inspector.name.clone(),
            theme.title_style().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(inspector.role.clone(), theme.metric_style())),
    ])
    .block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(theme.border_style(false)),
    );
    frame.render_widget(identity, rows[1]);

    regions
}

/// Narrow mode: scrim over the whole shell with the drawer on top.
///
/// The scrim region comes first so that drawer entries win on overlap.
pub fn render_overlay(
    frame: &mut Frame,
    area: Rect,
    active: View,
    inspector: &InspectorConfig,
    theme: &Theme,
) -> Vec<HitRegion<SidebarTarget>> {
    frame.render_widget(Clear, area);
    frame.render_widget(
        Block::default().style(Style::new().bg(theme.muted).fg(theme.background)),
        area,
    );

    let drawer = overlay_sidebar_area(area);
    frame.render_widget(Clear, drawer);

    let mut regions = vec![HitRegion::new(area, SidebarTarget::Scrim)];
    regions.extend(render_sidebar(frame, drawer, active, inspector, theme));
    regions
}
