//! Shared test utilities.
//!
//! Record builders, lookups, and workbook fixtures written on the fly with
//! `rust_xlsxwriter` (calamine can only read).
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let path = write_workbook(tmp.path(), "Лист1", &[
//!     vec![Cell::T("Категория"), Cell::T("Название")],
//!     vec![Cell::T("Красные вина"), Cell::T("Хванчкара")],
//! ]);
//! ```

use std::path::{Path, PathBuf};

use crate::types::{FieldValue, Record, TITLE_FIELD};

// =========================================================================
// Records
// =========================================================================

/// Build a record of text fields.
pub fn record(fields: &[(&str, &str)]) -> Record {
    fields
        .iter()
        .map(|(k, v)| (*k, FieldValue::from(*v)))
        .collect()
}

/// Titles of a record slice, in order. Panics on a record without a title.
pub fn titles(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .map(|r| {
            r.get(TITLE_FIELD)
                .unwrap_or_else(|| panic!("record without '{TITLE_FIELD}': {r:?}"))
                .to_string()
        })
        .collect()
}

// =========================================================================
// Workbook fixtures
// =========================================================================

/// One fixture cell.
pub enum Cell {
    T(&'static str),
    N(f64),
    Blank,
}

/// Write a single-sheet workbook to `dir/wine.xlsx` and return its path.
pub fn write_workbook(dir: &Path, sheet: &str, rows: &[Vec<Cell>]) -> PathBuf {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet).unwrap();
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let (r, c) = (r as u32, c as u16);
            match cell {
                Cell::T(s) => {
                    worksheet.write_string(r, c, *s).unwrap();
                }
                Cell::N(n) => {
                    worksheet.write_number(r, c, *n).unwrap();
                }
                Cell::Blank => {}
            }
        }
    }
    let path = dir.join("wine.xlsx");
    workbook.save(&path).unwrap();
    path
}

/// A small catalogue in the shop's real column layout.
pub fn write_shop_workbook(dir: &Path, sheet: &str) -> PathBuf {
    use Cell::*;
    write_workbook(
        dir,
        sheet,
        &[
            vec![
                T("Категория"),
                T("Название"),
                T("Сорт"),
                T("Цена"),
                T("Картинка"),
                T("Акция"),
            ],
            vec![
                T("Белые вина"),
                T("Белая леди"),
                T("Дамский пальчик"),
                N(399.0),
                T("belaya_ledi.png"),
                T("Выгодное предложение"),
            ],
            vec![
                T("Напитки"),
                T("Коньяк классический"),
                Blank,
                N(350.0),
                T("konyak_klassicheskyi.png"),
                Blank,
            ],
            vec![
                T("Белые вина"),
                T("Ркацители"),
                T("Ркацители"),
                N(499.0),
                T("rkaciteli.png"),
                Blank,
            ],
            vec![
                T("Красные вина"),
                T("Черный лекарь"),
                T("Качич"),
                N(399.0),
                T("chernyi_lekar.png"),
                Blank,
            ],
        ],
    )
}
