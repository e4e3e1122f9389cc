// src/export.rs
//! Spreadsheet export surface. Column names and order are fixed for compatibility
//! with existing exports.

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook};
use serde::Serialize;

use crate::store::CollectedItem;

pub const SHEET_NAME: &str = "FDI Projects";
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const MAX_COLUMN_WIDTH: usize = 100;

pub const EXPORT_COLUMNS: [&str; 10] = [
    "Title",
    "Summary",
    "Source URL",
    "Source",
    "Published Date",
    "Collected At",
    "Country",
    "Sector",
    "Investment Amount",
    "Company",
];

/// One spreadsheet row; field order matches `EXPORT_COLUMNS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Summary")]
    pub summary: String,
    #[serde(rename = "Source URL")]
    pub source_url: String,
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Published Date")]
    pub published_date: String,
    #[serde(rename = "Collected At")]
    pub collected_at: String,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Sector")]
    pub sector: String,
    #[serde(rename = "Investment Amount")]
    pub investment_amount: String,
    #[serde(rename = "Company")]
    pub company: String,
}

impl From<&CollectedItem> for ExportRow {
    fn from(item: &CollectedItem) -> Self {
        let r = &item.record;
        Self {
            title: r.title.clone(),
            summary: r.summary.clone(),
            source_url: r.url.clone(),
            source: r.source.clone(),
            published_date: r.published.clone(),
            collected_at: item.collected_at.clone(),
            country: r.country.clone(),
            sector: r.sector.clone(),
            investment_amount: r.amount.clone(),
            company: r.company.clone(),
        }
    }
}

impl ExportRow {
    /// Cell values in column order.
    pub fn cells(&self) -> [&str; 10] {
        [
            &self.title,
            &self.summary,
            &self.source_url,
            &self.source,
            &self.published_date,
            &self.collected_at,
            &self.country,
            &self.sector,
            &self.investment_amount,
            &self.company,
        ]
    }
}

pub fn export_rows(items: &[CollectedItem]) -> Vec<ExportRow> {
    items.iter().map(ExportRow::from).collect()
}

/// Widest cell (header included) plus two, capped at `MAX_COLUMN_WIDTH`, per column.
pub fn column_widths(rows: &[ExportRow]) -> [f64; 10] {
    let mut widest = EXPORT_COLUMNS.map(|h| h.chars().count());
    for row in rows {
        for (w, cell) in widest.iter_mut().zip(row.cells()) {
            *w = (*w).max(cell.chars().count());
        }
    }
    widest.map(|w| (w + 2).min(MAX_COLUMN_WIDTH) as f64)
}

/// The "FDI Projects" workbook: a bold header row, one row per item, sized columns.
pub fn export_workbook(items: &[CollectedItem]) -> Result<Vec<u8>> {
    let rows = export_rows(items);
    let widths = column_widths(&rows);
    let header = Format::new().set_bold();

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;
        for (col, name) in (0u16..).zip(EXPORT_COLUMNS) {
            sheet.write_string_with_format(0, col, name, &header)?;
            sheet.set_column_width(col, widths[usize::from(col)])?;
        }
        for (row, r) in (1u32..).zip(&rows) {
            for (col, cell) in (0u16..).zip(r.cells()) {
                sheet.write_string(row, col, cell)?;
            }
        }
    }
    workbook
        .save_to_buffer()
        .context("serializing export workbook")
}

/// Timestamped download name, e.g. `fdi_projects_20241014_101500.xlsx`.
pub fn export_file_name(now: chrono::DateTime<chrono::Local>) -> String {
    format!("fdi_projects_{}.xlsx", now.format("%Y%m%d_%H%M%S"))
}
