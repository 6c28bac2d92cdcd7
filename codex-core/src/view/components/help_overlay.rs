//! Help overlay: key bindings grouped by control.
use crate::view::theme;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub struct HelpOverlay;

impl HelpOverlay {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let overlay_area = centered_rect(70, 85, area);
        frame.render_widget(Clear, overlay_area);

        let help = Paragraph::new(Text::from(Self::lines()))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Hex Codex Help ")
                    .title_alignment(Alignment::Center)
                    .border_style(Style::default().fg(theme::CYAN))
                    .style(Style::default().bg(theme::BACKGROUND)),
            )
            .style(Style::default().fg(theme::FOREGROUND))
            .wrap(Wrap { trim: false });

        frame.render_widget(help, overlay_area);
        Self::render_footer(frame, overlay_area);
    }

    fn section(title: &'static str) -> Line<'static> {
        Line::from(Span::styled(title, Style::default().fg(theme::CYAN)))
    }

    fn lines() -> Vec<Line<'static>> {
        vec![
            Line::from(Span::styled(
                "Spell reference: filter, sort and browse",
                Style::default().fg(theme::YELLOW).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Self::section("Anywhere:"),
            Line::from("  Tab / Shift+Tab  Move focus: Sort → Levels → Search → Cards"),
            Line::from("  Ctrl+R           Reload the spell table"),
            Line::from("  Ctrl+C           Quit"),
            Line::from("  q                Quit (outside the search box)"),
            Line::from("  ?                Toggle this help"),
            Line::from("  /                Jump to the search box"),
            Line::from("  x                Clear search, levels and sort"),
            Line::from(""),
            Self::section("Sort:"),
            Line::from("  ←/→ ↑/↓          Previous / next column"),
            Line::from("  Backspace        No sorting"),
            Line::from(""),
            Self::section("Levels:"),
            Line::from("  ←/→              Move between checkboxes"),
            Line::from("  Space / Enter    Toggle highlighted level"),
            Line::from("  0-9              Toggle that level"),
            Line::from("  c                Clear all levels"),
            Line::from(""),
            Self::section("Search:"),
            Line::from("  type             Filter by name (case-insensitive)"),
            Line::from("  Backspace        Delete character"),
            Line::from("  Esc              Clear the search"),
            Line::from("  Enter / ↓        Go to the cards"),
            Line::from(""),
            Self::section("Cards:"),
            Line::from("  ↑/↓              Previous / next card"),
            Line::from("  PgUp/PgDn        Previous / next page"),
            Line::from("  Home/End         First / last card"),
            Line::from(""),
            Line::from(Span::styled(
                "With no level checked, every level is shown.",
                Style::default().fg(theme::COMMENT),
            )),
        ]
    }

    fn render_footer(frame: &mut Frame<'_>, area: Rect) {
        if area.height < 3 {
            return;
        }
        let footer_area = Rect {
            x: area.x + 2,
            y: area.y + area.height - 2,
            width: area.width.saturating_sub(4),
            height: 1,
        };

        let footer = Paragraph::new("Esc/?/q Close help")
            .style(Style::default().fg(theme::COMMENT))
            .alignment(Alignment::Center);

        frame.render_widget(footer, footer_area);
    }
}

impl Default for HelpOverlay {
    fn default() -> Self {
        Self::new()
    }
}

/// Rectangle of the given percentage size centred in `area`.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
