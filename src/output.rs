//! CLI output formatting.
//!
//! Output is **information-centric**: the catalogue is listed the way it
//! appears on the page (category headings in page order, products under
//! them), with file paths as trailing context.
//!
//! # Output Format
//!
//! ## Build / Check
//!
//! ```text
//! Уже 106 лет с вами
//! 001 Белые вина (2 wines)
//!     001 Белая леди
//!     002 Ркацители
//! 002 Напитки (1 wine)
//!     001 Коньяк классический
//!
//! Generated index.html (3 wines in 2 categories)
//! ```
//!
//! ## Serve
//!
//! ```text
//! Serving . at http://0.0.0.0:8000/
//! 127.0.0.1:51234 "GET / HTTP/1.1" 200
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>` or `String`)
//! for testability and a `print_*` wrapper that writes to stdout/stderr.

use crate::catalog::CategoryIndex;
use crate::pipeline::BuildReport;
use crate::types::TITLE_FIELD;
use std::net::SocketAddr;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn wines(n: usize) -> String {
    if n == 1 {
        "1 wine".to_string()
    } else {
        format!("{n} wines")
    }
}

/// Category header: positional index, name, product count.
///
/// A blank category is shown as `(no category)` so the line is not empty.
fn category_header(index: usize, category: &str, count: usize) -> String {
    let name = if category.is_empty() {
        "(no category)"
    } else {
        category
    };
    format!("{} {} ({})", format_index(index), name, wines(count))
}

/// Product line: titled products show the title, untitled show `(untitled)`.
fn product_line(index: usize, title: Option<&str>) -> String {
    match title {
        Some(t) if !t.is_empty() => format!("{}{} {}", indent(1), format_index(index), t),
        _ => format!("{}{} (untitled)", indent(1), format_index(index)),
    }
}

// ============================================================================
// Catalogue
// ============================================================================

/// Categories and their products, in page order.
pub fn format_catalog(catalog: &CategoryIndex) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, (category, records)) in catalog.iter().enumerate() {
        lines.push(category_header(i + 1, category, records.len()));
        for (j, record) in records.iter().enumerate() {
            let title = record.non_blank(TITLE_FIELD);
            lines.push(product_line(j + 1, title.as_deref()));
        }
    }
    lines
}

fn summary(catalog: &CategoryIndex) -> String {
    let categories = catalog.categories().len();
    format!(
        "{} in {} {}",
        wines(catalog.len()),
        categories,
        if categories == 1 { "category" } else { "categories" }
    )
}

/// Output of the `check` command.
pub fn format_check_output(catalog: &CategoryIndex, source: &Path, sheet: &str) -> Vec<String> {
    let mut lines = vec![format!("Source: {} [{}]", source.display(), sheet)];
    lines.extend(format_catalog(catalog));
    lines.push(String::new());
    lines.push(format!("Catalog is valid: {}", summary(catalog)));
    lines
}

pub fn print_check_output(catalog: &CategoryIndex, source: &Path, sheet: &str) {
    for line in format_check_output(catalog, source, sheet) {
        println!("{}", line);
    }
}

/// Output of a successful build.
pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = vec![format!(
        "Уже {} {} с вами",
        report.years,
        report.year_form.year_word()
    )];
    lines.extend(format_catalog(&report.catalog));
    lines.push(String::new());
    lines.push(format!(
        "Generated {} ({})",
        report.output.display(),
        summary(&report.catalog)
    ));
    lines
}

pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Server
// ============================================================================

pub fn format_serve_banner(addr: SocketAddr, root: &Path) -> String {
    format!("Serving {} at http://{}/", root.display(), addr)
}

pub fn print_serve_banner(addr: SocketAddr, root: &Path) {
    println!("{}", format_serve_banner(addr, root));
}

/// One access-log line per request.
pub fn format_request(peer: SocketAddr, request_line: &str, status: u16) -> String {
    format!("{} \"{}\" {}", peer, request_line.escape_debug(), status)
}

pub fn print_request(peer: SocketAddr, request_line: &str, status: u16) {
    println!("{}", format_request(peer, request_line, status));
}

pub fn print_connection_error(err: &std::io::Error) {
    eprintln!("Connection error: {}", err);
}

// ============================================================================
// Tests
// ============================================================================
