//! Navigation shell around the mounted screen.
//!
//! The shell draws the top bar, the sidebar (persistent on wide terminals,
//! an overlay on narrow ones) and the footer, and claims the global keys
//! listed in [`actions`].

pub mod actions;
pub mod footer;
pub mod sidebar;
pub mod top_bar;

pub use actions::{available_actions, determine_shell_action, ShellAction, ShellContext};
pub use sidebar::SidebarTarget;
pub use top_bar::{SearchEvent, SearchInput, TopBarTarget};
