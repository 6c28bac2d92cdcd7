//! src/view/components/control_panel.rs
//! ============================================================================
//! Sort selector, level checkboxes and name search, stacked in the side
//! panel. The focused control gets a highlighted border.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::model::criteria::{LEVEL_RANGE, SortColumn};
use crate::model::ui_state::{Focus, UIOverlay, UIState};
use crate::model::view_state::ViewState;
use crate::view::theme;

/// Checkboxes per row in the level grid.
const LEVELS_PER_ROW: usize = 5;

pub struct ControlPanel;

impl ControlPanel {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame<'_>, view: &ViewState, ui: &UIState, area: Rect) {
        let [sort, levels, search, hints] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Fill(1),
        ])
        .areas(area);

        self.render_sort(frame, view.criteria().sort, ui.focus == Focus::Sort, sort);
        self.render_levels(frame, view, ui, levels);
        self.render_search(frame, ui, search);
        self.render_hints(frame, ui.focus, hints);
    }

    fn panel(title: &str, focused: bool) -> Block<'static> {
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {title} "))
            .border_style(theme::panel_border_style(focused))
            .style(theme::base_style())
    }

    fn render_sort(&self, frame: &mut Frame<'_>, sort: Option<SortColumn>, focused: bool, area: Rect) {
        let label = sort.map_or("(none)", SortColumn::label);
        let style = if sort.is_some() {
            theme::card_emphasis_style()
        } else {
            theme::hint_style()
        };

        let line = Line::from(vec![
            Span::styled("◀ ", theme::hint_style()),
            Span::styled(label, style),
            Span::styled(" ▶", theme::hint_style()),
        ]);

        frame.render_widget(
            Paragraph::new(line)
                .alignment(Alignment::Center)
                .block(Self::panel("Sort by", focused)),
            area,
        );
    }

    fn render_levels(&self, frame: &mut Frame<'_>, view: &ViewState, ui: &UIState, area: Rect) {
        let focused = ui.focus == Focus::Levels;
        let selected = &view.criteria().levels;

        let cells: Vec<Span<'static>> = LEVEL_RANGE
            .map(|level| {
                let checked = selected.contains(&level);
                let mark = if checked { 'x' } else { ' ' };
                let mut style = theme::checkbox_style(checked);
                if focused && ui.level_cursor == level {
                    style = style.patch(theme::cursor_style());
                }
                Span::styled(format!("[{mark}]{level} "), style)
            })
            .collect();

        let lines: Vec<Line<'static>> = cells
            .chunks(LEVELS_PER_ROW)
            .map(|row| Line::from(row.to_vec()))
            .collect();

        frame.render_widget(
            Paragraph::new(lines).block(Self::panel("Levels", focused)),
            area,
        );
    }

    fn render_search(&self, frame: &mut Frame<'_>, ui: &UIState, area: Rect) {
        let focused = ui.focus == Focus::Search;
        let block = Self::panel("Search name", focused);
        let inner = block.inner(area);

        let text = if ui.input.is_empty() && !focused {
            Span::styled("type to filter…", theme::hint_style())
        } else {
            Span::styled(ui.input.as_str(), theme::card_value_style())
        };
        frame.render_widget(Paragraph::new(Line::from(text)).block(block), area);

        if focused && ui.overlay == UIOverlay::None && inner.width > 0 {
            let typed = ui.input.as_str()[..ui.input_cursor].chars().count();
            let x = inner.x + u16::try_from(typed).unwrap_or(u16::MAX).min(inner.width - 1);
            frame.set_cursor_position(Position::new(x, inner.y));
        }
    }

    fn render_hints(&self, frame: &mut Frame<'_>, focus: Focus, area: Rect) {
        let hint = match focus {
            Focus::Sort => "←/→ change column · Backspace none",
            Focus::Levels => "←/→ move · Space toggle · 0-9 · c clear",
            Focus::Search => "type to search · Esc clear · Enter cards",
            Focus::Cards => "↑/↓ scroll · PgUp/PgDn · Home/End",
        };
        let lines = vec![
            Line::from(Span::styled(hint, theme::hint_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Tab focus · x clear all · ? help",
                theme::hint_style(),
            )),
        ];
        frame.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .block(Block::default().style(theme::base_style())),
            area,
        );
    }
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::view_state::ViewEvent;
    use crate::view::test_support::{contains, render};

    #[test]
    fn shows_sort_levels_and_search() {
        let mut view = ViewState::new();
        view.apply(ViewEvent::SetSortKey(Some(SortColumn::CastingTime)));
        view.apply(ViewEvent::ToggleLevel {
            level: 3,
            included: true,
        });
        let mut ui = UIState::new();
        for ch in "fire".chars() {
            ui.insert_char(ch);
        }

        let buf = render(32, 20, |f| {
            let area = f.area();
            ControlPanel::new().render(f, &view, &ui, area);
        });
        assert!(contains(&buf, "Casting Time"));
        assert!(contains(&buf, "[x]3"));
        assert!(contains(&buf, "[ ]4"));
        assert!(contains(&buf, "fire"));
    }

    #[test]
    fn unsorted_shows_none() {
        let view = ViewState::new();
        let mut ui = UIState::new();
        ui.focus = Focus::Cards;
        let buf = render(32, 20, |f| {
            let area = f.area();
            ControlPanel::new().render(f, &view, &ui, area);
        });
        assert!(contains(&buf, "(none)"));
        assert!(contains(&buf, "type to filter"));
    }
}
