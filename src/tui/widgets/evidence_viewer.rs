//! Extracted listing fields beside the listing image.
//!
//! At most one field is highlighted at a time. The image pane draws exactly
//! one overlay, at the highlighted field's bounding box scaled into the pane.

use super::{hit, HitRegion};
use crate::model::{BoundingBox, CaseId, EvidenceField, SOURCE_IMAGE_SIZE};
use crate::provider::DataProvider;
use crate::tui::loadable::{render_placeholder, Loadable};
use crate::tui::style_map::{confidence_tier, Tier};
use crate::tui::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Maps a bounding box in source image pixels onto `pane`.
pub fn scale_box(bbox: BoundingBox, pane: Rect) -> Rect {
    let (src_w, src_h) = SOURCE_IMAGE_SIZE;
    let scale = |value: u16, pane_len: u16, src_len: u16| -> u16 {
        ((value as u32 * pane_len as u32) / src_len.max(1) as u32) as u16
    };

    let x = scale(bbox.x, pane.width, src_w).min(pane.width.saturating_sub(1));
    let y = scale(bbox.y, pane.height, src_h).min(pane.height.saturating_sub(1));
    let w = scale(bbox.w, pane.width, src_w).max(1).min(pane.width - x);
    let h = scale(bbox.h, pane.height, src_h).max(1).min(pane.height - y);

    Rect::new(pane.x + x, pane.y + y, w, h)
}

#[derive(Debug)]
pub struct EvidenceViewer {
    case: CaseId,
    fields: Loadable<Vec<EvidenceField>>,
    highlighted: Option<String>,
    regions: Vec<HitRegion<String>>,
}

impl EvidenceViewer {
    pub fn load(provider: &dyn DataProvider, case: &CaseId) -> Self {
        Self {
            case: case.clone(),
            fields: Loadable::from_result(provider.evidence_for(case)),
            highlighted: None,
            regions: Vec::new(),
        }
    }

    pub fn reload(&mut self, provider: &dyn DataProvider) {
        self.fields.refresh(provider.evidence_for(&self.case));
        if let Some(key) = self.highlighted.clone() {
            self.hover(&key);
        }
    }

    pub fn fields(&self) -> &[EvidenceField] {
        self.fields.items()
    }

    /// Highlights a field. Unknown keys clear the highlight.
    pub fn hover(&mut self, key: &str) {
        self.highlighted = self
            .fields()
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.key.clone());
    }

    pub fn leave(&mut self) {
        self.highlighted = None;
    }

    pub fn highlighted(&self) -> Option<&str> {
        self.highlighted.as_deref()
    }

    /// Bounding box of the highlighted field, the only one drawn.
    pub fn overlay(&self) -> Option<BoundingBox> {
        let key = self.highlighted.as_deref()?;
        self.fields()
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.location)
    }

    fn step(&mut self, delta: isize) {
        let fields = self.fields();
        if fields.is_empty() {
            return;
        }
        let next = match self
            .highlighted
            .as_deref()
            .and_then(|key| fields.iter().position(|f| f.key == key))
        {
            Some(current) => (current as isize + delta).clamp(0, fields.len() as isize - 1) as usize,
            None => 0,
        };
        let key = fields[next].key.clone();
        self.hover(&key);
    }

    /// Up/Down walk the highlight; Esc clears it.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.step(-1),
            KeyCode::Down | KeyCode::Char('j') => self.step(1),
            KeyCode::Esc if self.highlighted.is_some() => self.leave(),
            _ => return false,
        }
        true
    }

    /// Pointer movement: entering a field row highlights it, anything else
    /// clears the highlight.
    pub fn handle_hover(&mut self, column: u16, row: u16) {
        match hit(&self.regions, column, row) {
            Some(key) => self.hover(&key),
            None => self.leave(),
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        if self.fields.value().is_none() {
            self.regions.clear();
            let message = match &self.fields {
                Loadable::Missing(message) => message.clone(),
                other => other.failure_hint().unwrap_or_default(),
            };
            render_placeholder(frame, area, "Evidence", &message, theme);
            return;
        }

        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);

        let list_block = Block::default()
            .borders(Borders::ALL)
            .title(" Extracted Fields ")
            .border_style(theme.border_style(false));
        let list_area = list_block.inner(panes[0]);
        frame.render_widget(list_block, panes[0]);

        let mut regions = Vec::new();
        for (i, field) in self.fields.items().iter().enumerate() {
            let y = list_area.y + i as u16 * 2;
            if y + 1 >= list_area.bottom() {
                break;
            }
            let row_area = Rect::new(list_area.x, y, list_area.width, 2);
            let tier = confidence_tier(field.confidence);
            let mut label = vec![
                Span::styled("● ", theme.confidence_style(tier)),
                Span::styled(field.label(), theme.metric_style()),
                Span::styled(
                    format!("  {:.0}%", field.confidence * 100.0),
                    theme.confidence_style(tier),
                ),
            ];
            if field.violation {
                label.push(Span::styled("  ⚠ violation", theme.tier_style(Tier::Critical)));
            }
            let mut paragraph = Paragraph::new(vec![
                Line::from(label),
                Line::from(Span::styled(format!("  {}", field.value), theme.title_style())),
            ]);
            if self.highlighted.as_deref() == Some(field.key.as_str()) {
                paragraph = paragraph.style(theme.selected_style());
            }
            frame.render_widget(paragraph, row_area);
            regions.push(HitRegion::new(row_area, field.key.clone()));
        }
        self.regions = regions;

        let image_block = Block::default()
            .borders(Borders::ALL)
            .title(" Listing Image ")
            .border_style(theme.border_style(false));
        let pane = image_block.inner(panes[1]);
        frame.render_widget(image_block, panes[1]);
        frame.render_widget(
            Paragraph::new(Span::styled("product listing", theme.metric_style()))
                .alignment(ratatui::layout::Alignment::Center),
            Rect::new(pane.x, pane.y + pane.height / 2, pane.width, 1),
        );

        if let (Some(bbox), Some(key)) = (self.overlay(), self.highlighted.as_deref()) {
            if pane.width > 0 && pane.height > 0 {
                let rect = scale_box(bbox, pane);
                frame.render_widget(Clear, rect);
                frame.render_widget(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(theme.active_style().add_modifier(Modifier::BOLD))
                        .title(key.to_string()),
                    rect,
                );
            }
        }
    }
}
