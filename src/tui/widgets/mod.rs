//! Entity widgets shared by the screens.
//!
//! Render functions are pure in their inputs: an entity, a [`Theme`] and an
//! area. Clickable widgets return [`HitRegion`]s naming the entity under
//! each region; deciding what a click means is left to the caller.

pub mod case_row;
pub mod evidence_viewer;
pub mod metric_card;
pub mod priority_inbox;
pub mod rule_row;
pub mod seller_card;
pub mod threat_matrix;
pub mod workflow;

use crate::tui::theme::Theme;
use crate::tui::style_map::Tier;
use ratatui::layout::{Position, Rect};
use ratatui::text::Span;

/// Screen rectangle that maps a click to a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitRegion<T> {
    pub area: Rect,
    pub target: T,
}

impl<T> HitRegion<T> {
    pub fn new(area: Rect, target: T) -> Self {
        Self { area, target }
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        self.area.contains(Position::new(column, row))
    }
}

/// Target of the last region containing the point. Later regions are drawn
/// on top, so they win.
pub fn hit<T: Clone>(regions: &[HitRegion<T>], column: u16, row: u16) -> Option<T> {
    regions
        .iter()
        .rev()
        .find(|region| region.contains(column, row))
        .map(|region| region.target.clone())
}

/// `[Label]` badge in the tier colour.
pub fn badge(label: &str, tier: Tier, theme: &Theme) -> Span<'static> {
    Span::styled(format!(" {} ", label), theme.badge_style(tier))
}

/// Horizontal bar of `width` cells, `percent` of them filled.
pub fn bar(percent: f64, width: usize) -> (String, String) {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    ("█".repeat(filled), "░".repeat(width - filled))
}
