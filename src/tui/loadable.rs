//! Load state of a value fetched from a collaborator.
//!
//! Screens never propagate provider errors upward. A failed fetch becomes a
//! [`Loadable`] that renders as a placeholder (not found) or as a retry hint
//! (unavailable) while any previously loaded value keeps rendering.

use crate::errors::{ProviderError, ProviderResult};
use crate::tui::theme::Theme;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Loadable<T> {
    Ready(T),
    /// The entity does not exist.
    Missing(String),
    /// The collaborator failed; `stale` holds the last good value, if any.
    Failed { message: String, stale: Option<T> },
}

impl<T> Loadable<T> {
    pub fn from_result(result: ProviderResult<T>) -> Self {
        match result {
            Ok(value) => Loadable::Ready(value),
            Err(err) => Self::from_error(err, None),
        }
    }

    fn from_error(err: ProviderError, stale: Option<T>) -> Self {
        if err.is_not_found() {
            tracing::debug!(error = %err, "Entity not found");
            Loadable::Missing(err.to_string())
        } else {
            tracing::warn!(error = %err, "Provider request failed");
            Loadable::Failed {
                message: err.to_string(),
                stale,
            }
        }
    }

    /// Applies a refetch, keeping the current value around if it fails.
    pub fn refresh(&mut self, result: ProviderResult<T>) {
        let previous = std::mem::replace(self, Loadable::Missing(String::new()));
        *self = match result {
            Ok(value) => Loadable::Ready(value),
            Err(err) => Self::from_error(err, previous.into_value()),
        };
    }

    /// Current or stale value.
    pub fn value(&self) -> Option<&T> {
        match self {
            Loadable::Ready(value) => Some(value),
            Loadable::Failed { stale, .. } => stale.as_ref(),
            Loadable::Missing(_) => None,
        }
    }

    pub fn value_mut(&mut self) -> Option<&mut T> {
        match self {
            Loadable::Ready(value) => Some(value),
            Loadable::Failed { stale, .. } => stale.as_mut(),
            Loadable::Missing(_) => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Loadable::Ready(value) => Some(value),
            Loadable::Failed { stale, .. } => stale,
            Loadable::Missing(_) => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Loadable::Ready(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Loadable::Failed { .. })
    }

    /// Banner text for a failed fetch.
    pub fn failure_hint(&self) -> Option<String> {
        match self {
            Loadable::Failed { message, .. } => Some(format!("{} (press r to retry)", message)),
            _ => None,
        }
    }
}

impl<T> Loadable<Vec<T>> {
    pub fn len(&self) -> usize {
        self.value().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn items(&self) -> &[T] {
        self.value().map_or(&[], Vec::as_slice)
    }
}

/// Draws the placeholder for a missing or failed value with nothing stale
/// to show.
pub fn render_placeholder(frame: &mut Frame, area: Rect, title: &str, message: &str, theme: &Theme) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), theme.metric_style())),
    ];
    let placeholder = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", title))
                .border_style(theme.border_style(false)),
        );
    frame.render_widget(placeholder, area);
}
