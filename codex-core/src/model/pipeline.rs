//! src/model/pipeline.rs
//! ============================================================================
//! # Filter-Sort Pipeline
//!
//! Pure function of `(records, criteria)`:
//! 1. keep records whose Name contains the search text, case-insensitively
//! 2. if any levels are selected, keep records whose integer Level is one
//!    of them (unparseable levels never match)
//! 3. if a sort column is set, stable-sort ascending by that column's string
//!
//! The input slice is never touched; each call builds a fresh sequence.

use std::borrow::Cow;
use std::collections::BTreeSet;

use crate::data::record::SpellRecord;
use crate::model::criteria::{Criteria, SortColumn};

/// Run the pipeline and return positions into `records`.
#[must_use]
pub fn apply_indices(records: &[SpellRecord], criteria: &Criteria) -> Vec<usize> {
    let needle = criteria.name_substring.to_lowercase();

    let filtered = records
        .iter()
        .enumerate()
        .filter(|(_, r)| matches_name(r, &needle))
        .filter(|(_, r)| matches_levels(r, &criteria.levels));

    match criteria.sort {
        None => filtered.map(|(i, _)| i).collect(),
        Some(column) => sort_stable(filtered, column),
    }
}

/// Run the pipeline and return the displayed records themselves.
#[must_use]
pub fn apply<'a>(records: &'a [SpellRecord], criteria: &Criteria) -> Vec<&'a SpellRecord> {
    apply_indices(records, criteria)
        .into_iter()
        .map(|i| &records[i])
        .collect()
}

/// `needle` must already be lower-cased.
#[must_use]
pub fn matches_name(record: &SpellRecord, needle: &str) -> bool {
    needle.is_empty() || record.name().to_lowercase().contains(needle)
}

#[must_use]
pub fn matches_levels(record: &SpellRecord, levels: &BTreeSet<i64>) -> bool {
    levels.is_empty()
        || record
            .level_number()
            .is_some_and(|level| levels.contains(&level))
}

fn sort_stable<'a, I>(filtered: I, column: SortColumn) -> Vec<usize>
where
    I: Iterator<Item = (usize, &'a SpellRecord)>,
{
    let mut keyed: Vec<(Cow<'a, str>, usize)> =
        filtered.map(|(i, r)| (column.value(r), i)).collect();

    // `sort_by` is stable: equal keys keep their filtered order.
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    keyed.into_iter().map(|(_, i)| i).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::Field;
    use proptest::prelude::*;

    fn spell(name: &str, level: &str) -> SpellRecord {
        SpellRecord::from_pairs([(Field::Name, name), (Field::Level, level)])
    }

    fn names<'a>(rs: &[&'a SpellRecord]) -> Vec<&'a str> {
        rs.iter().map(|r| r.name()).collect()
    }

    fn fireball_and_frost_ray() -> Vec<SpellRecord> {
        vec![spell("Fireball", "3"), spell("Frost Ray", "1")]
    }

    #[test]
    fn search_fr_matches_substring_only() {
        let records = fireball_and_frost_ray();
        let criteria = Criteria {
            name_substring: "fr".into(),
            ..Criteria::default()
        };
        // "fireball" has no "fr" run.
        assert_eq!(names(&apply(&records, &criteria)), ["Frost Ray"]);
    }

    #[test]
    fn search_shared_letter_keeps_both_in_order() {
        let records = fireball_and_frost_ray();
        let criteria = Criteria {
            name_substring: "R".into(),
            ..Criteria::default()
        };
        assert_eq!(
            names(&apply(&records, &criteria)),
            ["Fireball", "Frost Ray"]
        );
    }

    #[test]
    fn level_one_keeps_frost_ray() {
        let records = fireball_and_frost_ray();
        let criteria = Criteria {
            levels: BTreeSet::from([1]),
            ..Criteria::default()
        };
        assert_eq!(names(&apply(&records, &criteria)), ["Frost Ray"]);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let records = vec![
            spell("Magic Missile", "1"),
            spell("Mage Hand", "0"),
            spell("Dispel Magic", "3"),
        ];
        let criteria = Criteria {
            name_substring: "MAGIC".into(),
            ..Criteria::default()
        };
        assert_eq!(
            names(&apply(&records, &criteria)),
            ["Magic Missile", "Dispel Magic"]
        );
    }

    #[test]
    fn non_numeric_levels_excluded_only_when_filtering() {
        let records = vec![spell("Odd", "cantrip"), spell("Bless", "1")];

        let none = Criteria::default();
        assert_eq!(apply(&records, &none).len(), 2);

        let some = Criteria {
            levels: BTreeSet::from([0, 1]),
            ..Criteria::default()
        };
        assert_eq!(names(&apply(&records, &some)), ["Bless"]);
    }

    #[test]
    fn sort_is_lexicographic_and_stable() {
        let records = vec![
            spell("b", "2"),
            spell("a", "10"),
            spell("c", "2"),
            spell("d", "1"),
        ];
        let criteria = Criteria {
            sort: Some(SortColumn::Level),
            ..Criteria::default()
        };
        // "1" < "10" < "2" lexicographically; b stays before c.
        assert_eq!(names(&apply(&records, &criteria)), ["d", "a", "b", "c"]);
    }

    #[test]
    fn sort_by_components_uses_derived_value() {
        let records = vec![
            SpellRecord::from_pairs([(Field::Name, "vs"), (Field::Verbal, "Y"), (Field::Somatic, "Y")]),
            SpellRecord::from_pairs([(Field::Name, "none")]),
            SpellRecord::from_pairs([(Field::Name, "m"), (Field::Material, "Y")]),
        ];
        let criteria = Criteria {
            sort: Some(SortColumn::Components),
            ..Criteria::default()
        };
        assert_eq!(names(&apply(&records, &criteria)), ["none", "m", "vs"]);
    }

    #[test]
    fn filters_compose_before_sort() {
        let records = vec![
            spell("Fire Bolt", "0"),
            spell("Fireball", "3"),
            spell("Fire Shield", "4"),
            spell("Delayed Blast Fireball", "7"),
        ];
        let criteria = Criteria {
            name_substring: "fire".into(),
            levels: BTreeSet::from([3, 7]),
            sort: Some(SortColumn::Name),
        };
        assert_eq!(
            names(&apply(&records, &criteria)),
            ["Delayed Blast Fireball", "Fireball"]
        );
    }

    #[test]
    fn input_is_left_untouched() {
        let records = vec![spell("b", "1"), spell("a", "1")];
        let before = records.clone();
        let criteria = Criteria {
            sort: Some(SortColumn::Name),
            ..Criteria::default()
        };
        let _ = apply_indices(&records, &criteria);
        assert_eq!(records, before);
    }

    fn arb_record() -> impl Strategy<Value = SpellRecord> {
        (
            "[A-Za-z ]{0,10}",
            prop_oneof![
                (0i64..12).prop_map(|n| n.to_string()),
                Just(String::new()),
                Just("cantrip".to_string()),
            ],
            "[A-C]{0,2}",
        )
            .prop_map(|(name, level, school)| {
                SpellRecord::from_pairs([
                    (Field::Name, name),
                    (Field::Level, level),
                    (Field::School, school),
                ])
            })
    }

    fn arb_records() -> impl Strategy<Value = Vec<SpellRecord>> {
        prop::collection::vec(arb_record(), 0..30)
    }

    proptest! {
        #[test]
        fn empty_criteria_is_identity(records in arb_records()) {
            let out = apply_indices(&records, &Criteria::default());
            prop_assert_eq!(out, (0..records.len()).collect::<Vec<_>>());
        }

        #[test]
        fn name_filter_is_sound_complete_and_ordered(records in arb_records(), s in "[A-Za-z]{0,3}") {
            let criteria = Criteria { name_substring: s.clone(), ..Criteria::default() };
            let out = apply_indices(&records, &criteria);
            let expected: Vec<usize> = records
                .iter()
                .enumerate()
                .filter(|(_, r)| r.name().to_lowercase().contains(&s.to_lowercase()))
                .map(|(i, _)| i)
                .collect();
            prop_assert_eq!(out, expected);
        }

        #[test]
        fn level_filter_only_admits_selected_levels(
            records in arb_records(),
            levels in prop::collection::btree_set(0i64..10, 1..4),
        ) {
            let criteria = Criteria { levels: levels.clone(), ..Criteria::default() };
            for r in apply(&records, &criteria) {
                let level = r.level_number();
                prop_assert!(level.is_some());
                prop_assert!(levels.contains(&level.unwrap()));
            }
        }

        #[test]
        fn sort_is_stable_and_a_permutation(records in arb_records()) {
            let criteria = Criteria { sort: Some(SortColumn::School), ..Criteria::default() };
            let out = apply_indices(&records, &criteria);
            prop_assert_eq!(out.len(), records.len());
            for pair in out.windows(2) {
                let (a, b) = (&records[pair[0]], &records[pair[1]]);
                let (ka, kb) = (a.get(Field::School), b.get(Field::School));
                prop_assert!(ka <= kb);
                if ka == kb {
                    prop_assert!(pair[0] < pair[1]);
                }
            }
        }

        #[test]
        fn output_is_always_a_subset(records in arb_records(), s in "[a-z]{0,2}", lvl in 0i64..10) {
            let criteria = Criteria {
                name_substring: s,
                levels: BTreeSet::from([lvl]),
                sort: Some(SortColumn::Name),
            };
            let mut out = apply_indices(&records, &criteria);
            out.sort_unstable();
            out.dedup();
            prop_assert!(out.iter().all(|i| *i < records.len()));
            prop_assert_eq!(out.len(), apply_indices(&records, &criteria).len());
        }
    }
}
