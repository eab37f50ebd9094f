//! Grouping records into categories.
//!
//! The page lists products under category headings. Headings are sorted by
//! their text (plain byte order, no locale collation); products inside a
//! heading keep the order they had in the spreadsheet.
//!
//! ```text
//! input                        index
//! Red   A                      Red   → [A, C]
//! White B          ──▶         White → [B]
//! Red   C
//! ```

use crate::types::{CATEGORY_FIELD, Record};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    /// `position` is the 0-based index of the record in the input sequence.
    #[error("record {position} has no '{field}' field")]
    MissingField { position: usize, field: String },
}

/// Records grouped by category.
///
/// Built once by [`group`] or [`group_by`], read-only afterwards. The key set
/// of the groups is exactly the sorted category list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryIndex {
    categories: Vec<String>,
    groups: BTreeMap<String, Vec<Record>>,
}

impl CategoryIndex {
    /// Distinct category keys, ascending.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Records in a category, in input order. Empty for unknown keys.
    pub fn records(&self, category: &str) -> &[Record] {
        self.groups.get(category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `(category, records)` pairs in sorted category order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Record])> {
        self.categories
            .iter()
            .map(|c| (c.as_str(), self.records(c)))
    }

    /// Total number of records across all categories.
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Group records by the default category field.
pub fn group(records: Vec<Record>) -> Result<CategoryIndex, CatalogError> {
    group_by(records, CATEGORY_FIELD)
}

/// Group records by `field`.
///
/// Fails on the first record lacking the field; nothing is returned in that
/// case. Blank values are a valid (empty) key.
pub fn group_by(records: Vec<Record>, field: &str) -> Result<CategoryIndex, CatalogError> {
    let mut groups: BTreeMap<String, Vec<Record>> = BTreeMap::new();
    for (position, record) in records.into_iter().enumerate() {
        let key = match record.get(field) {
            Some(value) => value.to_string(),
            None => {
                return Err(CatalogError::MissingField {
                    position,
                    field: field.to_string(),
                });
            }
        };
        groups.entry(key).or_default().push(record);
    }
    // BTreeMap<String, _> iterates in byte order, which is the ordering we want.
    let categories = groups.keys().cloned().collect();
    Ok(CategoryIndex { categories, groups })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{record, titles};
    use crate::types::FieldValue;

    fn wine(category: &str, name: &str) -> Record {
        record(&[(CATEGORY_FIELD, category), ("Название", name)])
    }

    #[test]
    fn groups_and_sorts_categories() {
        let index = group(vec![
            wine("Red", "A"),
            wine("White", "B"),
            wine("Red", "C"),
        ])
        .unwrap();

        assert_eq!(index.categories(), ["Red", "White"]);
        assert_eq!(titles(index.records("Red")), ["A", "C"]);
        assert_eq!(titles(index.records("White")), ["B"]);
    }

    #[test]
    fn empty_input_gives_empty_index() {
        let index = group(vec![]).unwrap();
        assert!(index.categories().is_empty());
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert_eq!(index, CategoryIndex::default());
    }

    #[test]
    fn keeps_input_order_within_category() {
        let index = group(vec![
            wine("Б", "3"),
            wine("А", "1"),
            wine("Б", "1"),
            wine("А", "2"),
            wine("Б", "2"),
        ])
        .unwrap();
        assert_eq!(titles(index.records("Б")), ["3", "1", "2"]);
        assert_eq!(titles(index.records("А")), ["1", "2"]);
    }

    #[test]
    fn no_record_lost_or_duplicated() {
        let input: Vec<Record> = (0..50)
            .map(|i| wine(["x", "y", "z"][i % 3], &i.to_string()))
            .collect();
        let index = group(input.clone()).unwrap();

        assert_eq!(index.len(), input.len());
        let mut seen: Vec<String> = index
            .iter()
            .flat_map(|(_, records)| titles(records))
            .collect();
        seen.sort();
        let mut expected: Vec<String> = (0..50).map(|i| i.to_string()).collect();
        expected.sort();
        assert_eq!(seen, expected);
    }

    #[test]
    fn category_list_matches_group_keys() {
        let index = group(vec![wine("b", "1"), wine("a", "2"), wine("b", "3")]).unwrap();
        let keys: Vec<&str> = index.iter().map(|(c, _)| c).collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(index.categories(), ["a", "b"]);
    }

    #[test]
    fn sorts_by_byte_order_not_locale() {
        // Uppercase Latin < lowercase Latin < Cyrillic in code point order.
        let index = group(vec![
            wine("Белые вина", "1"),
            wine("red", "2"),
            wine("Red", "3"),
            wine("Белое", "4"),
        ])
        .unwrap();
        assert_eq!(index.categories(), ["Red", "red", "Белое", "Белые вина"]);
    }

    #[test]
    fn keys_match_exactly() {
        let index = group(vec![wine("Red", "1"), wine("Red ", "2"), wine("red", "3")]).unwrap();
        assert_eq!(index.categories().len(), 3);
    }

    #[test]
    fn blank_category_is_a_key() {
        let index = group(vec![wine("", "1"), wine("Red", "2")]).unwrap();
        assert_eq!(index.categories(), ["", "Red"]);
        assert_eq!(titles(index.records("")), ["1"]);
    }

    #[test]
    fn numeric_category_uses_text_form() {
        let mut r = Record::new();
        r.insert(CATEGORY_FIELD, FieldValue::Number(2019.0));
        let index = group(vec![r]).unwrap();
        assert_eq!(index.categories(), ["2019"]);
    }

    #[test]
    fn missing_category_is_an_error() {
        let result = group(vec![
            wine("Red", "A"),
            record(&[("Название", "B")]),
            wine("Red", "C"),
        ]);
        assert_eq!(
            result,
            Err(CatalogError::MissingField {
                position: 1,
                field: CATEGORY_FIELD.to_string(),
            })
        );
    }

    #[test]
    fn missing_field_message_names_position_and_field() {
        let err = group(vec![record(&[("Название", "B")])]).unwrap_err();
        assert_eq!(err.to_string(), "record 0 has no 'Категория' field");
    }

    #[test]
    fn group_by_custom_field() {
        let index = group_by(
            vec![
                record(&[("Сорт", "Мерло"), ("Название", "A")]),
                record(&[("Сорт", "Каберне"), ("Название", "B")]),
            ],
            "Сорт",
        )
        .unwrap();
        assert_eq!(index.categories(), ["Каберне", "Мерло"]);
    }

    #[test]
    fn unknown_category_has_no_records() {
        let index = group(vec![wine("Red", "A")]).unwrap();
        assert!(index.records("Rosé").is_empty());
    }
}
