//! Shared types passed between pipeline stages.
//!
//! A [`Record`] is one spreadsheet row: an ordered list of `(field, value)`
//! pairs in header order. Blank cells are kept as empty text so that
//! "explicitly blank" stays distinguishable from "no such column".

use serde::Serialize;
use serde::ser::Serializer;
use std::fmt;

/// Default grouping column.
pub const CATEGORY_FIELD: &str = "Категория";
/// Product name shown as the card title.
pub const TITLE_FIELD: &str = "Название";
/// Grape variety.
pub const GRAPE_FIELD: &str = "Сорт";
pub const PRICE_FIELD: &str = "Цена";
/// Image file name, relative to the site's images directory.
pub const IMAGE_FIELD: &str = "Картинка";
/// Any non-blank value marks the product as a special offer.
pub const PROMO_FIELD: &str = "Акция";

/// A single cell value.
///
/// Spreadsheet cells arrive as text or numbers. Everything else (booleans,
/// dates, error cells) is carried as its text rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

impl FieldValue {
    pub fn text(s: impl Into<String>) -> Self {
        FieldValue::Text(s.into())
    }

    /// The empty-text value used for blank cells.
    pub fn blank() -> Self {
        FieldValue::Text(String::new())
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, FieldValue::Text(s) if s.is_empty())
    }
}

impl fmt::Display for FieldValue {
    /// Integral numbers print without a fractional part (`450.0` → `450`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            FieldValue::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

/// One spreadsheet row, fields in header order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing an existing value in place or appending a new one.
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        let name = name.into();
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    /// Text of a field, or `None` when the field is absent or blank.
    pub fn non_blank(&self, name: &str) -> Option<String> {
        self.get(name)
            .filter(|v| !v.is_blank())
            .map(|v| v.to_string())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, FieldValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, FieldValue)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.fields.iter().map(|(k, v)| (k, v)))
    }
}
