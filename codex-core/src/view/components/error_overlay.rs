//! src/view/components/error_overlay.rs
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::view::theme;

pub struct ErrorOverlay<'a> {
    message: &'a str,
    retryable: bool,
}

impl<'a> ErrorOverlay<'a> {
    pub fn new(message: &'a str, retryable: bool) -> Self {
        Self { message, retryable }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let block = Block::default()
            .title(" Could not load spells ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::RED))
            .style(theme::base_style());

        let hint = if self.retryable {
            "Ctrl+R retry · Esc close"
        } else {
            "Check the configured source · Esc close"
        };

        let text = Text::from(vec![
            Line::from(self.message),
            Line::from(""),
            Line::from(Span::styled(hint, theme::hint_style())),
        ]);

        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        frame.render_widget(Clear, area);
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::test_support::{contains, render};

    #[test]
    fn shows_message_and_retry_hint() {
        let buf = render(60, 8, |f| {
            let area = f.area();
            ErrorOverlay::new("HTTP 503", true).render(f, area);
        });
        assert!(contains(&buf, "Could not load spells"));
        assert!(contains(&buf, "HTTP 503"));
        assert!(contains(&buf, "Ctrl+R retry"));
    }
}
