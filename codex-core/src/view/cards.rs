//! src/view/cards.rs
//! ============================================================================
//! # Card Presenter
//!
//! Pure mapping from a record and the active sort column to what a card
//! shows. Widgets draw [`SpellCard`]s and never look at records directly.

use crate::data::record::SpellRecord;
use crate::model::criteria::SortColumn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRow {
    pub label: &'static str,
    pub value: String,
    /// Row matches the active sort column.
    pub emphasized: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellCard {
    pub title: String,
    pub rows: Vec<CardRow>,
}

impl SpellCard {
    #[must_use]
    pub fn emphasized_row(&self) -> Option<&CardRow> {
        self.rows.iter().find(|r| r.emphasized)
    }
}

/// Rows appear in selector order, so `Components` sits between
/// `Concentration` and `Material`.
#[must_use]
pub fn present(record: &SpellRecord, sort: Option<SortColumn>) -> SpellCard {
    let rows = SortColumn::ALL
        .into_iter()
        .map(|column| CardRow {
            label: column.label(),
            value: column.value(record).into_owned(),
            emphasized: sort == Some(column),
        })
        .collect();

    SpellCard {
        title: record.name().to_string(),
        rows,
    }
}

pub fn present_all<'a, I>(records: I, sort: Option<SortColumn>) -> Vec<SpellCard>
where
    I: IntoIterator<Item = &'a SpellRecord>,
{
    records.into_iter().map(|r| present(r, sort)).collect()
}
