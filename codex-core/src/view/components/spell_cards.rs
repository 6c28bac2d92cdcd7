//! src/view/components/spell_cards.rs
//! ============================================================================
//! Grid of spell cards, one per displayed record. Only the visible page is
//! sent through the presenter.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::model::criteria::SortColumn;
use crate::model::ui_state::{Focus, UIState};
use crate::model::view_state::{LoadStatus, ViewState};
use crate::view::cards::{self, CardRow, SpellCard};
use crate::view::theme;

/// Fourteen rows plus the border.
pub const CARD_HEIGHT: u16 = SortColumn::ALL.len() as u16 + 2;

/// Widest row label ("Concentration", "Damage/Effect") plus a space.
const LABEL_WIDTH: usize = 14;

pub struct SpellCards {
    columns: u16,
}

impl SpellCards {
    pub fn new(columns: u16) -> Self {
        Self {
            columns: columns.max(1),
        }
    }

    /// Cards that fit in `area`: whole rows times columns.
    #[must_use]
    pub fn capacity(&self, area: Rect) -> usize {
        let rows = (area.height / CARD_HEIGHT).max(1);
        usize::from(rows) * usize::from(self.columns)
    }

    pub fn render(&self, frame: &mut Frame<'_>, view: &ViewState, ui: &UIState, area: Rect) {
        let focused = ui.focus == Focus::Cards;
        let total = view.displayed_len();

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Spells ({total}) "))
            .border_style(theme::panel_border_style(focused))
            .style(theme::base_style());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if total == 0 {
            self.render_empty(frame, view, inner);
            return;
        }

        let per_page = self.capacity(inner);
        ui.set_page_size(per_page);

        // Page-aligned window containing the selection.
        let selected = ui.selected_card.min(total - 1);
        let first = (selected / per_page) * per_page;
        let sort = view.criteria().sort;

        let visible = view.displayed().skip(first).take(per_page);
        let page: Vec<SpellCard> = cards::present_all(visible, sort);

        let rows = u16::try_from(per_page / usize::from(self.columns)).unwrap_or(u16::MAX);
        let row_areas = Layout::vertical(vec![Constraint::Length(CARD_HEIGHT); usize::from(rows)])
            .split(inner);
        let col_constraints =
            vec![Constraint::Ratio(1, u32::from(self.columns)); usize::from(self.columns)];

        for (row_idx, row_area) in row_areas.iter().enumerate() {
            let cells = Layout::horizontal(col_constraints.clone()).split(*row_area);
            for (col_idx, cell) in cells.iter().enumerate() {
                let offset = row_idx * usize::from(self.columns) + col_idx;
                if let Some(card) = page.get(offset) {
                    let is_selected = first + offset == selected;
                    Self::render_card(frame, card, is_selected && focused, *cell);
                }
            }
        }
    }

    fn render_card(frame: &mut Frame<'_>, card: &SpellCard, selected: bool, area: Rect) {
        let border = if selected {
            theme::selected_card_border_style()
        } else {
            theme::panel_border_style(false)
        };

        let lines: Vec<Line<'_>> = card.rows.iter().map(Self::row_line).collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(format!(" {} ", card.title), theme::card_title_style()))
            .border_style(border)
            .style(theme::base_style());

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn row_line(row: &CardRow) -> Line<'_> {
        let (label_style, value_style) = if row.emphasized {
            (theme::card_emphasis_style(), theme::card_emphasis_style())
        } else {
            (theme::card_label_style(), theme::card_value_style())
        };
        Line::from(vec![
            Span::styled(format!("{:<LABEL_WIDTH$}", row.label), label_style),
            Span::styled(row.value.as_str(), value_style),
        ])
    }

    fn render_empty(&self, frame: &mut Frame<'_>, view: &ViewState, area: Rect) {
        let message = match view.status() {
            LoadStatus::Idle | LoadStatus::Loading { .. } => "Loading spells…",
            LoadStatus::Failed { .. } if view.total_len() == 0 => {
                "No spells loaded. Press Ctrl+R to retry."
            }
            _ if view.total_len() == 0 => "The source contains no spells.",
            _ => "No spells match the current filters.",
        };

        frame.render_widget(
            Paragraph::new(Span::styled(message, theme::hint_style())).alignment(Alignment::Center),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::parser::ParsedTable;
    use crate::data::record::{Field, SpellRecord};
    use crate::model::view_state::ViewEvent;
    use crate::view::test_support::{contains, render};

    fn loaded(names: &[&str]) -> ViewState {
        let mut view = ViewState::new();
        view.apply(ViewEvent::DataLoaded {
            source: "test".into(),
            table: ParsedTable {
                records: names
                    .iter()
                    .map(|n| {
                        SpellRecord::from_pairs([
                            (Field::Name, *n),
                            (Field::Level, "1"),
                            (Field::Verbal, "Y"),
                        ])
                    })
                    .collect(),
                ..ParsedTable::default()
            },
        });
        view
    }

    fn draw(view: &ViewState, ui: &UIState, columns: u16) -> ratatui::buffer::Buffer {
        render(100, 40, |f| {
            let area = f.area();
            SpellCards::new(columns).render(f, view, ui, area);
        })
    }

    #[test]
    fn renders_card_rows() {
        let view = loaded(&["Fireball", "Shield"]);
        let ui = UIState::new();
        let buf = draw(&view, &ui, 2);

        assert!(contains(&buf, "Spells (2)"));
        assert!(contains(&buf, "Fireball"));
        assert!(contains(&buf, "Shield"));
        assert!(contains(&buf, "Damage/Effect"));
        assert!(contains(&buf, "Components    Verbal"));
    }

    #[test]
    fn page_size_reflects_grid() {
        let view = loaded(&["a", "b", "c", "d", "e"]);
        let ui = UIState::new();
        draw(&view, &ui, 2);
        // 38 inner rows fit two 16-row card rows.
        assert_eq!(ui.page_size(), 4);
    }

    #[test]
    fn selection_scrolls_by_page() {
        let view = loaded(&["a1", "b2", "c3", "d4", "e5"]);
        let mut ui = UIState::new();
        ui.selected_card = 4;
        let buf = draw(&view, &ui, 2);
        assert!(contains(&buf, "e5"));
        assert!(!contains(&buf, " a1 "));
    }

    #[test]
    fn empty_states_explain_themselves() {
        let ui = UIState::new();
        assert!(contains(&draw(&ViewState::new(), &ui, 2), "Loading spells"));

        let mut view = loaded(&["Fireball"]);
        view.set_search_name("zzz");
        assert!(contains(&draw(&view, &ui, 2), "No spells match"));
    }
}
