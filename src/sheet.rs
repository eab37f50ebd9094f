//! Spreadsheet loading.
//!
//! Reads one named sheet of an xlsx/xls/xlsb/ods workbook into [`Record`]s.
//! The first row of the sheet's used range is the header; each following row
//! becomes one record with fields in header order.
//!
//! ## Cell conversion
//!
//! | Cell            | Field value                     |
//! |-----------------|---------------------------------|
//! | text            | `Text`                          |
//! | int / float     | `Number`                        |
//! | blank           | `Text("")` (never dropped)      |
//! | bool, date, err | `Text` of the cell's rendering  |
//!
//! Rows where every cell is blank are skipped. Blank header cells are named
//! `Unnamed: <column>` and repeated names get a `.1`, `.2`, ... suffix, so
//! that no column silently disappears.

use crate::types::{FieldValue, Record};
use calamine::{Data, Reader, open_workbook_auto};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Spreadsheet not found: {0}")]
    SourceNotFound(PathBuf),
    #[error("Sheet '{sheet}' not found in {path} (available: {})", .available.join(", "))]
    SheetNotFound {
        sheet: String,
        path: PathBuf,
        available: Vec<String>,
    },
    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),
}

/// Read every record of `sheet` in the workbook at `path`.
pub fn read_records(path: &Path, sheet: &str) -> Result<Vec<Record>, SheetError> {
    if !path.is_file() {
        return Err(SheetError::SourceNotFound(path.to_path_buf()));
    }
    let mut workbook = open_workbook_auto(path)?;

    let available = workbook.sheet_names();
    if !available.iter().any(|name| name == sheet) {
        return Err(SheetError::SheetNotFound {
            sheet: sheet.to_string(),
            path: path.to_path_buf(),
            available,
        });
    }

    let range = workbook.worksheet_range(sheet)?;
    let mut rows = range.rows();
    let header = match rows.next() {
        Some(cells) => header_names(cells),
        None => return Ok(Vec::new()),
    };

    Ok(rows
        .filter(|cells| !cells.iter().all(is_blank))
        .map(|cells| row_to_record(&header, cells))
        .collect())
}

fn header_names(cells: &[Data]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(cells.len());
    for (col, cell) in cells.iter().enumerate() {
        let base = match cell_value(cell) {
            v if v.is_blank() => format!("Unnamed: {col}"),
            v => v.to_string(),
        };
        let mut name = base.clone();
        let mut k = 0;
        while names.contains(&name) {
            k += 1;
            name = format!("{base}.{k}");
        }
        names.push(name);
    }
    names
}

fn row_to_record(header: &[String], cells: &[Data]) -> Record {
    header
        .iter()
        .enumerate()
        .map(|(col, name)| {
            let value = cells.get(col).map(cell_value).unwrap_or_else(FieldValue::blank);
            (name.clone(), value)
        })
        .collect()
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.is_empty(),
        _ => false,
    }
}

fn cell_value(cell: &Data) -> FieldValue {
    match cell {
        Data::Empty => FieldValue::blank(),
        Data::String(s) => FieldValue::Text(s.clone()),
        Data::Float(f) => FieldValue::Number(*f),
        Data::Int(i) => FieldValue::Number(*i as f64),
        other => FieldValue::Text(other.to_string()),
    }
}
