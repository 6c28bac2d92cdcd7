//! src/model/criteria.rs
//! ============================================================================
//! # Criteria: search substring, selected levels, sort column
//!
//! The three user-controlled inputs to the pipeline, kept together so the
//! pipeline is a function of `(records, &Criteria)`.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;
use std::ops::RangeInclusive;

use crate::data::record::{Field, SpellRecord};

/// Levels offered as checkboxes.
pub const LEVEL_RANGE: RangeInclusive<i64> = 0..=9;

/// Columns the user can sort by.
///
/// `Components` is not a source column; it sorts by the derived
/// "Verbal, Somatic, Material" display string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortColumn {
    Name,
    Level,
    School,
    CastingTime,
    Duration,
    Range,
    Area,
    Attack,
    Save,
    DamageEffect,
    Ritual,
    Concentration,
    Components,
    Material,
}

impl SortColumn {
    /// Selector order.
    pub const ALL: [Self; 14] = [
        Self::Name,
        Self::Level,
        Self::School,
        Self::CastingTime,
        Self::Duration,
        Self::Range,
        Self::Area,
        Self::Attack,
        Self::Save,
        Self::DamageEffect,
        Self::Ritual,
        Self::Concentration,
        Self::Components,
        Self::Material,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Components => "Components",
            other => match other.field() {
                Some(field) => field.header(),
                None => "",
            },
        }
    }

    /// Backing source column, if any.
    #[must_use]
    pub const fn field(self) -> Option<Field> {
        Some(match self {
            Self::Name => Field::Name,
            Self::Level => Field::Level,
            Self::School => Field::School,
            Self::CastingTime => Field::CastingTime,
            Self::Duration => Field::Duration,
            Self::Range => Field::Range,
            Self::Area => Field::Area,
            Self::Attack => Field::Attack,
            Self::Save => Field::Save,
            Self::DamageEffect => Field::DamageEffect,
            Self::Ritual => Field::Ritual,
            Self::Concentration => Field::Concentration,
            Self::Material => Field::Material,
            Self::Components => return None,
        })
    }

    /// The string this column sorts on.
    #[must_use]
    pub fn value(self, record: &SpellRecord) -> Cow<'_, str> {
        match self.field() {
            Some(field) => Cow::Borrowed(record.get(field)),
            // Components has no sheet column; sort on the derived card text.
            None => Cow::Owned(record.components()),
        }
    }

    /// Step through `None → Name → … → Material → None`.
    #[must_use]
    pub fn cycle(current: Option<Self>, forward: bool) -> Option<Self> {
        // Position 0 is "none", 1..=14 are the columns.
        let slots = Self::ALL.len() + 1;
        let pos = current.map_or(0, |c| {
            Self::ALL.iter().position(|x| *x == c).map_or(0, |i| i + 1)
        });
        let next = if forward {
            (pos + 1) % slots
        } else {
            (pos + slots - 1) % slots
        };
        next.checked_sub(1).map(|i| Self::ALL[i])
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything that decides which records are shown and in what order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    pub name_substring: String,

    /// Empty means "no level filter", not "match nothing".
    pub levels: BTreeSet<i64>,

    pub sort: Option<SortColumn>,
}

impl Criteria {
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.name_substring.is_empty() && self.levels.is_empty() && self.sort.is_none()
    }

    /// Short summary for the status bar, e.g. `name~"fr" lvl{1,3} sort:Level`.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if !self.name_substring.is_empty() {
            parts.push(format!("name~{:?}", self.name_substring));
        }
        if !self.levels.is_empty() {
            let levels: Vec<String> = self.levels.iter().map(i64::to_string).collect();
            parts.push(format!("lvl{{{}}}", levels.join(",")));
        }
        if let Some(sort) = self.sort {
            parts.push(format!("sort:{sort}"));
        }
        if parts.is_empty() {
            "no filters".to_string()
        } else {
            parts.join(" ")
        }
    }
}
