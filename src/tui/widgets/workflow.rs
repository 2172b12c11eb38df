//! Investigation workflow stepper.
//!
//! Only the current stage is stored; every stage's status is derived from
//! it on each render.

use super::{hit, HitRegion};
use crate::tui::theme::Theme;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum WorkflowStage {
    #[default]
    Review,
    Flag,
    Escalate,
    Notice,
}

impl WorkflowStage {
    pub fn all() -> &'static [WorkflowStage] {
        &[
            WorkflowStage::Review,
            WorkflowStage::Flag,
            WorkflowStage::Escalate,
            WorkflowStage::Notice,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            WorkflowStage::Review => "Log Evidence",
            WorkflowStage::Flag => "Flag for Review",
            WorkflowStage::Escalate => "Escalate to Legal",
            WorkflowStage::Notice => "Issue Notice",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Stage status for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageStatus {
    Completed,
    Active,
    Pending,
}

impl StageStatus {
    pub fn icon(self) -> &'static str {
        match self {
            StageStatus::Completed => "✓",
            StageStatus::Active => "▸",
            StageStatus::Pending => "·",
        }
    }

    fn style(self, theme: &Theme) -> Style {
        match self {
            StageStatus::Completed => theme.completed_style(),
            StageStatus::Active => theme.active_style(),
            StageStatus::Pending => theme.pending_style(),
        }
    }
}

/// Status of `stage` when the workflow sits at `current`.
pub fn stage_status(stage: WorkflowStage, current: WorkflowStage) -> StageStatus {
    use std::cmp::Ordering;
    match stage.cmp(&current) {
        Ordering::Less => StageStatus::Completed,
        Ordering::Equal => StageStatus::Active,
        Ordering::Greater => StageStatus::Pending,
    }
}

#[derive(Debug, Clone, Default)]
pub struct WorkflowStepper {
    current: WorkflowStage,
    regions: Vec<HitRegion<WorkflowStage>>,
}

impl WorkflowStepper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> WorkflowStage {
        self.current
    }

    /// Any stage may be reached from any other.
    pub fn jump_to(&mut self, stage: WorkflowStage) {
        tracing::debug!(from = ?self.current, to = ?stage, "Workflow stage changed");
        self.current = stage;
    }

    pub fn statuses(&self) -> Vec<(WorkflowStage, StageStatus)> {
        WorkflowStage::all()
            .iter()
            .map(|&stage| (stage, stage_status(stage, self.current)))
            .collect()
    }

    pub fn step(&mut self, delta: isize) {
        let stages = WorkflowStage::all();
        let next = (self.current.index() as isize + delta).clamp(0, stages.len() as isize - 1);
        self.jump_to(stages[next as usize]);
    }

    pub fn handle_click(&mut self, column: u16, row: u16) -> bool {
        match hit(&self.regions, column, row) {
            Some(stage) => {
                self.jump_to(stage);
                true
            }
            None => false,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let mut spans = Vec::new();
        let mut regions = Vec::new();
        let mut x = area.x;

        for (i, (stage, status)) in self.statuses().into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" ─── ", theme.pending_style()));
                x += 5;
            }
            let text = format!("{} {}", status.icon(), stage.label());
            let width = text.width() as u16;
            spans.push(Span::styled(
                text,
                status
                    .style(theme)
                    .patch(theme.stage_name_style(status == StageStatus::Active)),
            ));
            regions.push(HitRegion::new(
                Rect::new(x, area.y, width.min(area.right().saturating_sub(x)), 1),
                stage,
            ));
            x += width;
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
        self.regions = regions;
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_stage() -> impl Strategy<Value = WorkflowStage> {
        prop::sample::select(WorkflowStage::all().to_vec())
    }

    proptest! {
        /// Property: exactly one stage is active, and it is the current one.
        #[test]
        fn exactly_one_active(current in arb_stage()) {
            let active: Vec<_> = WorkflowStage::all()
                .iter()
                .filter(|&&s| stage_status(s, current) == StageStatus::Active)
                .collect();
            prop_assert_eq!(active, vec![&current]);
        }

        /// Property: completed stages all precede pending ones.
        #[test]
        fn completed_before_pending(current in arb_stage()) {
            let statuses: Vec<_> = WorkflowStage::all()
                .iter()
                .map(|&s| stage_status(s, current))
                .collect();
            let last_completed = statuses.iter().rposition(|s| *s == StageStatus::Completed);
            let first_pending = statuses.iter().position(|s| *s == StageStatus::Pending);
            if let (Some(c), Some(p)) = (last_completed, first_pending) {
                prop_assert!(c < p);
            }
        }
    }
}
