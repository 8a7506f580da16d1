//! Spreadsheet report of the scraped articles.
//!
//! The workbook has one sheet, `Articles`, with a fixed header row followed by
//! one row per article in result order:
//!
//! | Title | Date | Description | ProfilePicture | Search Phrase Count | Contains Money |
//! |-------|------|-------------|----------------|---------------------|----------------|
//!
//! `Search Phrase Count` is a number cell, every other cell is text.
//! `Contains Money` holds `Yes` or `No`, and a missing picture is an empty
//! string.
//!
//! The workbook is built entirely in memory and then swapped in over the
//! previous report, so a failed run never leaves a partial file behind.

use crate::errors::Result;
use crate::models::Article;
use crate::utils::write_file_atomically;
use rust_xlsxwriter::Workbook;
use std::path::Path;
use tracing::{info, instrument};

pub const SHEET_NAME: &str = "Articles";

pub const HEADER_TITLE: &str = "Title";
pub const HEADER_DATE: &str = "Date";
pub const HEADER_DESCRIPTION: &str = "Description";
pub const HEADER_PROFILE_PICTURE: &str = "ProfilePicture";
pub const HEADER_SEARCH_PHRASE_COUNT: &str = "Search Phrase Count";
pub const HEADER_CONTAINS_MONEY: &str = "Contains Money";

pub const ARTICLE_HEADERS: [&str; 6] = [
    HEADER_TITLE,
    HEADER_DATE,
    HEADER_DESCRIPTION,
    HEADER_PROFILE_PICTURE,
    HEADER_SEARCH_PHRASE_COUNT,
    HEADER_CONTAINS_MONEY,
];

/// One report cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }
}

/// The report as rows of cells, header first.
pub fn report_rows(articles: &[Article]) -> Vec<Vec<Cell>> {
    let mut rows = Vec::with_capacity(articles.len() + 1);
    rows.push(ARTICLE_HEADERS.iter().copied().map(Cell::text).collect());
    rows.extend(articles.iter().map(article_row));
    rows
}

fn article_row(article: &Article) -> Vec<Cell> {
    vec![
        Cell::text(article.title.as_str()),
        Cell::text(article.date.as_str()),
        Cell::text(article.description.as_str()),
        Cell::text(article.profile_picture_text()),
        Cell::Number(article.search_phrase_count as f64),
        Cell::text(article.contains_money.as_str()),
    ]
}

/// Serialize the report to `.xlsx` bytes.
pub fn build_workbook(articles: &[Article]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (row_index, row) in report_rows(articles).iter().enumerate() {
        let row_index = row_index as u32;
        for (col_index, cell) in row.iter().enumerate() {
            let col_index = col_index as u16;
            match cell {
                Cell::Text(value) => {
                    worksheet.write_string(row_index, col_index, value)?;
                }
                Cell::Number(value) => {
                    worksheet.write_number(row_index, col_index, *value)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Write the report to `path`, replacing any earlier report.
#[instrument(level = "info", skip_all, fields(path = %path.display(), articles = articles.len()))]
pub async fn write_report(articles: &[Article], path: &Path) -> Result<()> {
    let bytes = build_workbook(articles)?;
    write_file_atomically(path, &bytes).await?;
    info!(bytes = bytes.len(), "Wrote spreadsheet report");
    Ok(())
}
