//! Colour palettes and styling for TUI components.

use super::style_map::{ConfidenceTier, Tier};
use ratatui::style::{Color, Modifier, Style};

/// Palette shared by every widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Accent for active elements and focus
    pub primary: Color,
    /// Completed and healthy elements
    pub success: Color,
    /// Pending and secondary text
    pub muted: Color,
    /// Body text
    pub text: Color,
    /// Screen background
    pub background: Color,
    /// Panel borders
    pub border: Color,
    /// Background of the selected row
    pub highlight: Color,
    pub critical: Color,
    pub high: Color,
    pub medium: Color,
    pub info: Color,
    /// RGB of `background`, used to blend heatmap cells
    pub background_rgb: (u8, u8, u8),
}

impl Theme {
    pub fn light() -> Self {
        Self {
            primary: Color::Rgb(37, 99, 235),
            success: Color::Rgb(22, 163, 74),
            muted: Color::Rgb(107, 114, 128),
            text: Color::Rgb(17, 24, 39),
            background: Color::Rgb(255, 255, 255),
            border: Color::Rgb(209, 213, 219),
            highlight: Color::Rgb(239, 246, 255),
            critical: Color::Rgb(220, 38, 38),
            high: Color::Rgb(234, 88, 12),
            medium: Color::Rgb(217, 119, 6),
            info: Color::Rgb(37, 99, 235),
            background_rgb: (255, 255, 255),
        }
    }

    pub fn dark() -> Self {
        Self {
            primary: Color::Rgb(96, 165, 250),
            success: Color::Rgb(74, 222, 128),
            muted: Color::Rgb(156, 163, 175),
            text: Color::Rgb(243, 244, 246),
            background: Color::Rgb(17, 24, 39),
            border: Color::Rgb(55, 65, 81),
            highlight: Color::Rgb(31, 41, 55),
            critical: Color::Rgb(248, 113, 113),
            high: Color::Rgb(251, 146, 60),
            medium: Color::Rgb(251, 191, 36),
            info: Color::Rgb(96, 165, 250),
            background_rgb: (17, 24, 39),
        }
    }

    pub fn for_mode(dark_mode: bool) -> Self {
        if dark_mode {
            Self::dark()
        } else {
            Self::light()
        }
    }

    pub fn accent(&self) -> Color {
        self.primary
    }

    pub fn tier_color(&self, tier: Tier) -> Color {
        match tier {
            Tier::Critical => self.critical,
            Tier::High => self.high,
            Tier::Medium => self.medium,
            Tier::Good => self.success,
            Tier::Info => self.info,
            Tier::Neutral => self.muted,
        }
    }

    pub fn tier_style(&self, tier: Tier) -> Style {
        Style::default().fg(self.tier_color(tier))
    }

    /// Inverted badge ("[Critical]") in the tier colour.
    pub fn badge_style(&self, tier: Tier) -> Style {
        Style::default()
            .fg(self.background)
            .bg(self.tier_color(tier))
            .add_modifier(Modifier::BOLD)
    }

    pub fn confidence_style(&self, tier: ConfidenceTier) -> Style {
        self.tier_style(tier.tier())
    }

    pub fn base_style(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    pub fn title_style(&self) -> Style {
        Style::default().fg(self.text).add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.primary)
        } else {
            Style::default().fg(self.border)
        }
    }

    pub fn selected_style(&self) -> Style {
        Style::default()
            .bg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for completed stage markers (✓)
    pub fn completed_style(&self) -> Style {
        Style::default().fg(self.success)
    }

    /// Style for active stage markers (▸)
    pub fn active_style(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for pending stage markers (·)
    pub fn pending_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn stage_name_style(&self, is_active: bool) -> Style {
        if is_active {
            Style::default()
                .fg(self.primary)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.text)
        }
    }

    pub fn metric_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn progress_bar_bg_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn key_hint_style(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

/// Converts an `(r, g, b)` triple to a terminal colour.
pub fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palettes_differ() {
        assert_ne!(Theme::light().background, Theme::dark().background);
        assert_eq!(Theme::for_mode(true), Theme::dark());
        assert_eq!(Theme::for_mode(false), Theme::light());
    }

    #[test]
    fn test_background_rgb_matches_background() {
        for theme in [Theme::light(), Theme::dark()] {
            assert_eq!(rgb(theme.background_rgb), theme.background);
        }
    }

    #[test]
    fn test_tier_colours_distinct() {
        let theme = Theme::light();
        let tiers = [Tier::Critical, Tier::High, Tier::Medium, Tier::Good, Tier::Neutral];
        for (i, a) in tiers.iter().enumerate() {
            for b in &tiers[i + 1..] {
                assert_ne!(theme.tier_color(*a), theme.tier_color(*b));
            }
        }
    }

    #[test]
    fn test_stage_styles_distinct() {
        let theme = Theme::dark();
        assert_ne!(theme.completed_style().fg, theme.active_style().fg);
        assert_ne!(theme.active_style().fg, theme.pending_style().fg);
    }
}
