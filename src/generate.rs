//! HTML page generation.
//!
//! Renders the storefront page from a [`PageContext`] and writes it to disk.
//!
//! ## Page Layout
//!
//! ```text
//! header   site title + "Уже 106 лет с вами"
//! main
//!   section per category (sorted)
//!     card per record (spreadsheet order)
//!       image, title, grape, price, promo badge
//! ```
//!
//! Cards use the shop's well-known columns (`Название`, `Сорт`, `Цена`,
//! `Картинка`, `Акция`). A column that is missing or blank is left out of the
//! card rather than rendered empty.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! All interpolated spreadsheet text is escaped. The stylesheet is embedded
//! at compile time from `static/style.css`.

use crate::catalog::CategoryIndex;
use crate::types::{GRAPE_FIELD, IMAGE_FIELD, PRICE_FIELD, PROMO_FIELD, Record, TITLE_FIELD};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub const CSS: &str = include_str!("../static/style.css");

/// Everything the page template binds.
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    pub title: &'a str,
    pub years: u64,
    /// Display form agreeing with `years` (год / года / лет).
    pub year_word: &'a str,
    pub catalog: &'a CategoryIndex,
    pub images_dir: &'a str,
}

impl PageContext<'_> {
    pub fn headline(&self) -> String {
        format!("Уже {} {} с вами", self.years, self.year_word)
    }
}

/// Write the rendered page to `path`, replacing any previous file.
pub fn write_page(path: &Path, page: &Markup) -> Result<(), GenerateError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, &page.0)?;
    Ok(())
}

// ============================================================================
// HTML Components
// ============================================================================

fn base_document(title: &str, css: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="ru" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body {
                (content)
            }
        }
    }
}

fn image_url(images_dir: &str, file: &str) -> String {
    let dir = images_dir.trim_end_matches('/');
    if dir.is_empty() {
        file.to_string()
    } else {
        format!("{dir}/{file}")
    }
}

fn render_card(record: &Record, images_dir: &str) -> Markup {
    let title = record.non_blank(TITLE_FIELD);
    html! {
        article.wine-card {
            @if record.non_blank(PROMO_FIELD).is_some() {
                span.promo { "Выгодное предложение" }
            }
            @if let Some(image) = record.non_blank(IMAGE_FIELD) {
                img src=(image_url(images_dir, &image)) alt=[title.as_deref()] loading="lazy";
            }
            @if let Some(title) = &title {
                h3 { (title) }
            }
            @if let Some(grape) = record.non_blank(GRAPE_FIELD) {
                p.grape { "Сорт: " (grape) }
            }
            @if let Some(price) = record.non_blank(PRICE_FIELD) {
                p.price { (price) " р." }
            }
        }
    }
}

fn render_category(category: &str, records: &[Record], images_dir: &str) -> Markup {
    html! {
        section.category {
            h2 { (category) }
            div.wine-grid {
                @for record in records {
                    (render_card(record, images_dir))
                }
            }
        }
    }
}

// ============================================================================
// Page Renderer
// ============================================================================

pub fn render_page(ctx: &PageContext<'_>, css: &str) -> Markup {
    let content = html! {
        header.site-header {
            h1 { (ctx.title) }
            p.years { (ctx.headline()) }
        }
        main {
            @if ctx.catalog.is_empty() {
                p.empty { "Каталог пуст" }
            }
            @for (category, records) in ctx.catalog.iter() {
                (render_category(category, records, ctx.images_dir))
            }
        }
    };

    base_document(ctx.title, css, content)
}

// ============================================================================
// Tests
// ============================================================================
