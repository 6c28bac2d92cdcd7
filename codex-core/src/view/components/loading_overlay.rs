//! src/view/components/loading_overlay.rs
//! ============================================================
//! Indeterminate loading box: the source being read and the time
//! spent so far. The fetch reports no progress, so there is no gauge.

use std::time::Duration;

use crate::view::theme;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

pub struct LoadingOverlay;

impl LoadingOverlay {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame<'_>, source: &str, elapsed: Duration, rect: Rect) {
        frame.render_widget(Clear, rect);

        let chrome = Block::default()
            .title(" Loading ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::PURPLE))
            .style(theme::base_style());

        let text = Text::from(vec![
            Line::from(Span::styled(
                format!("{} Fetching spell table", Self::spinner_frame(elapsed)),
                Style::default()
                    .fg(theme::YELLOW)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(source, theme::hint_style())),
            Line::from(format!("Elapsed: {elapsed:.0?}")),
        ]);

        frame.render_widget(
            Paragraph::new(text)
                .block(chrome)
                .alignment(Alignment::Center),
            rect,
        );
    }

    fn spinner_frame(elapsed: Duration) -> char {
        let step = usize::try_from(elapsed.as_millis() / 250).unwrap_or(0);
        SPINNER[step % SPINNER.len()]
    }
}

impl Default for LoadingOverlay {
    fn default() -> Self {
        Self::new()
    }
}
