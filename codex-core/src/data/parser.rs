//! src/data/parser.rs
//! ============================================================================
//! # Table Parser
//!
//! Turns raw CSV text into an ordered list of [`SpellRecord`]s, using the first
//! row as the header. Row policy:
//! - blank lines are skipped
//! - short rows are padded with empty strings
//! - cells past the last header are ignored
//! - rows the reader cannot decode are dropped and counted
//!
//! Header names are trimmed and a leading byte-order mark is removed. When a
//! header name repeats, the first column wins.

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, warn};

use crate::data::record::{Field, SpellRecord};
use crate::error::AppError;

/// Parser output: the records plus what had to be tolerated to get them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTable {
    pub records: Vec<SpellRecord>,

    /// Data rows dropped because they could not be decoded.
    pub dropped_rows: usize,

    /// Expected columns absent from the header (empty on every record).
    pub missing_columns: Vec<Field>,
}

impl ParsedTable {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.dropped_rows == 0 && self.missing_columns.is_empty()
    }
}

/// Parse raw CSV text. Only an unreadable header row is an error.
pub fn parse(raw: &str) -> Result<ParsedTable, AppError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(raw.as_bytes());

    let columns = column_map(reader.headers()?);
    let missing_columns: Vec<Field> = Field::ALL
        .into_iter()
        .filter(|f| !columns.contains(&Some(*f)))
        .collect();

    let mut records = Vec::new();
    let mut dropped_rows = 0usize;

    for (row_idx, row) in reader.records().enumerate() {
        match row {
            Ok(row) => records.push(to_record(&columns, &row)),
            Err(e) => {
                dropped_rows += 1;
                warn!(row = row_idx + 1, "Dropping undecodable CSV row: {}", e);
            }
        }
    }

    debug!(
        records = records.len(),
        dropped_rows,
        missing = missing_columns.len(),
        "Parsed spell table"
    );

    Ok(ParsedTable {
        records,
        dropped_rows,
        missing_columns,
    })
}

/// Position → field, with `None` for unknown or repeated headers.
fn column_map(headers: &StringRecord) -> Vec<Option<Field>> {
    let mut seen = Vec::with_capacity(Field::ALL.len());
    headers
        .iter()
        .map(|h| {
            let field = Field::from_header(h.trim_start_matches('\u{feff}').trim())?;
            if seen.contains(&field) {
                return None;
            }
            seen.push(field);
            Some(field)
        })
        .collect()
}

fn to_record(columns: &[Option<Field>], row: &StringRecord) -> SpellRecord {
    let mut record = SpellRecord::new();
    for (value, field) in row.iter().zip(columns) {
        if let Some(field) = field {
            record.set(*field, value);
        }
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const HEADER: &str = "Name,Level,School,Casting Time,Duration,Range,Area,Attack,Save,Damage/Effect,Ritual,Concentration,Verbal,Somatic,Material";

    #[test]
    fn header_row_maps_positionally() {
        let raw = format!(
            "{HEADER}\nFireball,3,Evocation,1 action,Instantaneous,150 ft,20 ft sphere,,DEX,8d6 fire,N,N,Y,Y,Y\n"
        );
        let table = parse(&raw).unwrap();
        assert!(table.is_clean());
        assert_eq!(table.records.len(), 1);

        let r = &table.records[0];
        assert_eq!(r.name(), "Fireball");
        assert_eq!(r.level(), "3");
        assert_eq!(r.get(Field::CastingTime), "1 action");
        assert_eq!(r.get(Field::Attack), "");
        assert_eq!(r.get(Field::DamageEffect), "8d6 fire");
        assert_eq!(r.get(Field::Material), "Y");
    }

    #[test]
    fn blank_lines_are_skipped() {
        let raw = "Name,Level\n\nFireball,3\n\n\nFrost Ray,1\n\n";
        let table = parse(raw).unwrap();
        let names: Vec<_> = table.records.iter().map(SpellRecord::name).collect();
        assert_eq!(names, ["Fireball", "Frost Ray"]);
    }

    #[test]
    fn short_rows_are_padded_and_long_rows_truncated() {
        let raw = "Name,Level,School\nShield\nBless,1,Enchantment,extra,cells\n";
        let table = parse(raw).unwrap();
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[0].name(), "Shield");
        assert_eq!(table.records[0].level(), "");
        assert_eq!(table.records[1].get(Field::School), "Enchantment");
    }

    #[test]
    fn unknown_columns_ignored_and_missing_reported() {
        let raw = "Source,Name,Level\nPHB,Fireball,3\n";
        let table = parse(raw).unwrap();
        assert_eq!(table.records[0].name(), "Fireball");
        assert_eq!(table.records[0].level(), "3");
        assert!(table.missing_columns.contains(&Field::School));
        assert!(!table.missing_columns.contains(&Field::Name));
        assert_eq!(table.missing_columns.len(), 13);
    }

    #[test]
    fn quoted_cells_keep_commas_and_newlines() {
        let raw = "Name,Damage/Effect\n\"Cone of Cold\",\"8d8 cold, half on save\"\n\"Wall\nof Fire\",5d8\n";
        let table = parse(raw).unwrap();
        assert_eq!(
            table.records[0].get(Field::DamageEffect),
            "8d8 cold, half on save"
        );
        assert_eq!(table.records[1].name(), "Wall\nof Fire");
    }

    #[test]
    fn bom_and_padding_stripped_from_headers() {
        let raw = "\u{feff}Name , Level\nFireball,3\n";
        let table = parse(raw).unwrap();
        assert_eq!(table.records[0].name(), "Fireball");
        assert_eq!(table.records[0].level(), "3");
    }

    #[test]
    fn repeated_header_keeps_first_column() {
        let raw = "Name,Name\nFirst,Second\n";
        let table = parse(raw).unwrap();
        assert_eq!(table.records[0].name(), "First");
    }

    #[test]
    fn empty_input_yields_empty_table() {
        let table = parse("").unwrap();
        assert!(table.records.is_empty());
        assert_eq!(table.missing_columns.len(), Field::ALL.len());
    }

    #[test]
    fn values_are_not_coerced() {
        let raw = "Name,Level\n  Spaced  ,03\n";
        let table = parse(raw).unwrap();
        assert_eq!(table.records[0].name(), "  Spaced  ");
        assert_eq!(table.records[0].level(), "03");
    }

    fn cell() -> impl Strategy<Value = String> {
        // Non-empty so a row never collapses into a blank line.
        "[A-Za-z0-9 /]{1,12}"
    }

    proptest! {
        #[test]
        fn round_trip_row_count(rows in prop::collection::vec(prop::collection::vec(cell(), 15), 0..40)) {
            let mut raw = String::from(HEADER);
            raw.push('\n');
            for row in &rows {
                raw.push_str(&row.join(","));
                raw.push('\n');
            }

            let table = parse(&raw).unwrap();
            prop_assert_eq!(table.records.len(), rows.len());
            prop_assert!(table.is_clean());
            for (record, row) in table.records.iter().zip(&rows) {
                for (field, expected) in Field::ALL.into_iter().zip(row) {
                    prop_assert!(!record.get(field).is_empty());
                    prop_assert_eq!(record.get(field), expected.as_str());
                }
            }
        }
    }
}
