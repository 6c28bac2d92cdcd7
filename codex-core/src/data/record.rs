//! src/data/record.rs
//! ============================================================================
//! # Spell records
//!
//! A [`SpellRecord`] maps every expected column ([`Field`]) to its raw string
//! value. Columns absent from the source header read as the empty string;
//! unknown columns are never stored.

use std::fmt;

use enum_map::{Enum, EnumMap};

/// The fixed column set the parser and pipeline understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum)]
pub enum Field {
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
    Verbal,
    Somatic,
    Material,
}

impl Field {
    /// All fields in source-header order.
    pub const ALL: [Self; 15] = [
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
        Self::Verbal,
        Self::Somatic,
        Self::Material,
    ];

    /// Column header as it appears in the CSV.
    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Level => "Level",
            Self::School => "School",
            Self::CastingTime => "Casting Time",
            Self::Duration => "Duration",
            Self::Range => "Range",
            Self::Area => "Area",
            Self::Attack => "Attack",
            Self::Save => "Save",
            Self::DamageEffect => "Damage/Effect",
            Self::Ritual => "Ritual",
            Self::Concentration => "Concentration",
            Self::Verbal => "Verbal",
            Self::Somatic => "Somatic",
            Self::Material => "Material",
        }
    }

    /// Exact, case-sensitive header lookup.
    #[must_use]
    pub fn from_header(header: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.header() == header)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// One spell: every expected field mapped to its raw string value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpellRecord {
    values: EnumMap<Field, String>,
}

impl SpellRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from `(field, value)` pairs; unspecified fields stay empty.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Field, S)>,
        S: Into<String>,
    {
        let mut record = Self::new();
        for (field, value) in pairs {
            record.set(field, value);
        }
        record
    }

    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        &self.values[field]
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.values[field] = value.into();
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.get(Field::Name)
    }

    #[must_use]
    pub fn level(&self) -> &str {
        self.get(Field::Level)
    }

    /// Level as an integer, using integer-prefix parsing.
    ///
    /// Leading whitespace and one optional sign are accepted, followed by at
    /// least one ASCII digit; anything after the digits is ignored. `"3"`,
    /// `" 3"` and `"3rd"` all give `Some(3)`; `"cantrip"` and `""` give `None`.
    #[must_use]
    pub fn level_number(&self) -> Option<i64> {
        parse_int_prefix(self.level())
    }

    /// Derived "Components" display: which of Verbal/Somatic/Material are `"Y"`.
    ///
    /// Fixed order, joined by `", "`, empty when none apply. The comparison is
    /// exact: `"y"` or `"Yes"` do not count.
    #[must_use]
    pub fn components(&self) -> String {
        [Field::Verbal, Field::Somatic, Field::Material]
            .into_iter()
            .filter(|f| self.get(*f) == "Y")
            .map(Field::header)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Integer-prefix parse of a string.
#[must_use]
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude: i64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
