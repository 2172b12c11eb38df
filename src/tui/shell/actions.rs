//! Pure action determination for shell-level keys.
//!
//! The shell sees every key first. Keys it does not claim fall through to
//! the mounted screen, so this table must stay disjoint from the screens'
//! own bindings.

use crate::tui::view_state::View;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellAction {
    Quit,
    SelectView(View),
    OpenSidebar,
    CloseSidebar,
    FocusSearch,
    ToggleDarkMode,
    ToggleHelp,
}

/// State the key table depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShellContext {
    /// Terminal is below the wide breakpoint.
    pub narrow: bool,
    pub sidebar_open: bool,
    pub search_active: bool,
    pub help_open: bool,
    /// The screen is editing a text field.
    pub screen_captures_text: bool,
}

/// `None` means the key belongs to the search box or the screen.
pub fn determine_shell_action(key: KeyEvent, ctx: ShellContext) -> Option<ShellAction> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(ShellAction::Quit);
    }
    if ctx.search_active || ctx.screen_captures_text {
        return None;
    }
    if ctx.help_open {
        return match key.code {
            KeyCode::Esc | KeyCode::Char('?') => Some(ShellAction::ToggleHelp),
            KeyCode::Char('q') => Some(ShellAction::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char(c @ '1'..='5') => View::from_hotkey(c).map(ShellAction::SelectView),
        KeyCode::Esc if ctx.sidebar_open => Some(ShellAction::CloseSidebar),
        KeyCode::Char('m') if ctx.narrow => Some(if ctx.sidebar_open {
            ShellAction::CloseSidebar
        } else {
            ShellAction::OpenSidebar
        }),
        KeyCode::Char('q') => Some(ShellAction::Quit),
        KeyCode::Char('/') => Some(ShellAction::FocusSearch),
        KeyCode::Char('d') => Some(ShellAction::ToggleDarkMode),
        KeyCode::Char('?') => Some(ShellAction::ToggleHelp),
        _ => None,
    }
}

/// Key reference shown in the help overlay.
pub fn available_actions() -> Vec<(&'static str, &'static str)> {
    vec![
        ("1-5", "Switch view"),
        ("m", "Menu (narrow terminals)"),
        ("/", "Search cases and sellers"),
        ("d", "Toggle dark mode"),
        ("Esc", "Close / back"),
        ("?", "Toggle this help"),
        ("q", "Quit"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_number_keys_select_views() {
        let ctx = ShellContext::default();
        for &view in View::all() {
            assert_eq!(
                determine_shell_action(key(KeyCode::Char(view.hotkey())), ctx),
                Some(ShellAction::SelectView(view))
            );
        }
    }

    #[test]
    fn test_menu_only_in_narrow_mode() {
        let wide = ShellContext::default();
        assert_eq!(determine_shell_action(key(KeyCode::Char('m')), wide), None);

        let narrow = ShellContext {
            narrow: true,
            ..ShellContext::default()
        };
        assert_eq!(
            determine_shell_action(key(KeyCode::Char('m')), narrow),
            Some(ShellAction::OpenSidebar)
        );
        let open = ShellContext {
            sidebar_open: true,
            ..narrow
        };
        assert_eq!(
            determine_shell_action(key(KeyCode::Char('m')), open),
            Some(ShellAction::CloseSidebar)
        );
    }

    #[test]
    fn test_esc_falls_through_without_sidebar() {
        assert_eq!(
            determine_shell_action(key(KeyCode::Esc), ShellContext::default()),
            None
        );
    }

    #[test]
    fn test_help_swallows_view_keys() {
        let ctx = ShellContext {
            help_open: true,
            ..ShellContext::default()
        };
        assert_eq!(determine_shell_action(key(KeyCode::Char('2')), ctx), None);
        assert_eq!(
            determine_shell_action(key(KeyCode::Esc), ctx),
            Some(ShellAction::ToggleHelp)
        );
    }

    #[test]
    fn test_ctrl_c_always_quits() {
        let ctx = ShellContext {
            search_active: true,
            screen_captures_text: true,
            help_open: true,
            ..ShellContext::default()
        };
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(determine_shell_action(ctrl_c, ctx), Some(ShellAction::Quit));
    }

    proptest! {
        #[test]
        fn text_entry_claims_every_plain_char(c in any::<char>()) {
            let ctx = ShellContext { search_active: true, ..ShellContext::default() };
            prop_assert_eq!(determine_shell_action(key(KeyCode::Char(c)), ctx), None);
            let ctx = ShellContext { screen_captures_text: true, ..ShellContext::default() };
            prop_assert_eq!(determine_shell_action(key(KeyCode::Char(c)), ctx), None);
        }
    }
}
