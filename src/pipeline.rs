//! The one-shot build: spreadsheet in, page out.
//!
//! ```text
//! years  = current_year - foundation_year
//! form   = declension::resolve(years)
//! rows   = sheet::read_records(source.path, source.sheet)
//! index  = catalog::group_by(rows, source.category_field)
//! page   = generate::render_page(...)
//! write  → site.output
//! ```
//!
//! Every step either succeeds or aborts the build; nothing is retried and no
//! file is written unless all earlier steps succeeded. Serving is a separate
//! entry point ([`crate::serve`]) so the build stays testable without a
//! listener.

use crate::catalog::{self, CategoryIndex};
use crate::config::SiteConfig;
use crate::declension::{self, FoundationInFuture, YearForm};
use crate::generate::{self, PageContext};
use crate::sheet;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Sheet(#[from] sheet::SheetError),
    #[error("Catalog error: {0}")]
    Catalog(#[from] catalog::CatalogError),
    #[error("Generate error: {0}")]
    Generate(#[from] generate::GenerateError),
    #[error(transparent)]
    FoundationInFuture(#[from] FoundationInFuture),
}

/// What a successful build produced.
#[derive(Debug)]
pub struct BuildReport {
    pub years: u64,
    pub year_form: YearForm,
    pub catalog: CategoryIndex,
    pub output: PathBuf,
}

/// Read and group the configured sheet without rendering anything.
pub fn load_catalog(config: &SiteConfig) -> Result<CategoryIndex, BuildError> {
    let records = sheet::read_records(&config.source.path, &config.source.sheet)?;
    Ok(catalog::group_by(records, &config.source.category_field)?)
}

/// Run the full build and write the page to `config.site.output`.
pub fn build(config: &SiteConfig, current_year: i32) -> Result<BuildReport, BuildError> {
    let years = declension::years_since(config.site.foundation_year, current_year)?;
    let year_form = declension::resolve(years);
    let catalog = load_catalog(config)?;

    let page = generate::render_page(
        &PageContext {
            title: &config.site.title,
            years,
            year_word: year_form.year_word(),
            catalog: &catalog,
            images_dir: &config.site.images_dir,
        },
        generate::CSS,
    );
    generate::write_page(&config.site.output, &page)?;

    Ok(BuildReport {
        years,
        year_form,
        catalog,
        output: config.site.output.clone(),
    })
}
