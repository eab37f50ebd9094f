//! # wine-site
//!
//! A static storefront generator for a wine shop. The product list lives in a
//! spreadsheet; the site is a single HTML page grouped by category and served
//! straight from the working directory.
//!
//! # Pipeline
//!
//! ```text
//! 1. Read      wine.xlsx [Лист1]  →  Vec<Record>      (one record per row)
//! 2. Group     records            →  CategoryIndex    (sorted categories)
//! 3. Render    index + headline   →  index.html       (maud, written once)
//! 4. Serve     .                  →  http://0.0.0.0:8000/  (until killed)
//! ```
//!
//! Steps 1–3 are the build ([`pipeline::build`]); step 4 is a separate entry
//! point ([`serve::Server`]). The build is a pure function of the config, the
//! spreadsheet and the current year, so it is tested without a listener.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`sheet`] | Reads one sheet of an xlsx/xls/ods workbook into records |
//! | [`catalog`] | Groups records by category, sorted categories, stable order within |
//! | [`declension`] | Russian numeral agreement for "N years" (год / года / лет) |
//! | [`generate`] | Renders and writes the HTML page with Maud |
//! | [`pipeline`] | The one-shot build: read → group → render → write |
//! | [`serve`] | Blocking HTTP/1.1 static file server |
//! | [`config`] | `config.toml` loading and validation |
//! | [`types`] | `Record` and `FieldValue`, plus the shop's column names |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Blank Cells Stay Blank
//!
//! A blank cell becomes empty text, not a missing field. A record lacking the
//! category *column* is an error; a record with an empty category cell is
//! simply grouped under the empty key.
//!
//! ## Maud Over Template Files
//!
//! The page is a compile-time [Maud](https://maud.lambda.xyz/) template, so
//! there is no template directory to ship and every spreadsheet value is
//! escaped by construction.

pub mod catalog;
pub mod config;
pub mod declension;
pub mod generate;
pub mod output;
pub mod pipeline;
pub mod serve;
pub mod sheet;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
