//! src/view/components/status_bar.rs
//!
//! One line: shown/total count and active filters on the left, focus and
//! load status on the right.

use ratatui::{
    prelude::*,
    widgets::{Paragraph, Widget},
};

use crate::model::ui_state::UIState;
use crate::model::view_state::{LoadStatus, ViewState};
use crate::view::theme;

pub struct StatusBar;

impl StatusBar {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame<'_>, view: &ViewState, ui: &UIState, area: Rect) {
        let left_text = format!(
            " {}/{} spells | {}",
            view.displayed_len(),
            view.total_len(),
            view.criteria().summary()
        );

        let right_text = format!(
            "{} | {} | ? help ",
            ui.focus.label(),
            Self::load_status_text(view.status())
        );

        let status_style = match view.status() {
            LoadStatus::Failed { .. } => Style::default().fg(theme::RED).bg(theme::BACKGROUND),
            LoadStatus::Loading { .. } => Style::default().fg(theme::YELLOW).bg(theme::BACKGROUND),
            _ => theme::base_style(),
        };

        let [left, right] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(area);

        Paragraph::new(left_text)
            .style(theme::base_style())
            .alignment(Alignment::Left)
            .render(left, frame.buffer_mut());

        Paragraph::new(right_text)
            .style(status_style)
            .alignment(Alignment::Right)
            .render(right, frame.buffer_mut());
    }

    #[must_use]
    pub fn load_status_text(status: &LoadStatus) -> String {
        match status {
            LoadStatus::Idle => "idle".to_string(),
            LoadStatus::Loading { started, .. } => {
                format!("loading {:.0?}", started.elapsed())
            }
            LoadStatus::Ready {
                loaded_at,
                dropped_rows,
                ..
            } => {
                let at = loaded_at.format("%H:%M:%S");
                if *dropped_rows > 0 {
                    format!("loaded {at} ({dropped_rows} rows dropped)")
                } else {
                    format!("loaded {at}")
                }
            }
            LoadStatus::Failed { retryable, .. } => {
                if *retryable {
                    "load failed, Ctrl+R to retry".to_string()
                } else {
                    "load failed".to_string()
                }
            }
        }
    }
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}
