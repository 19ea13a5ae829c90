//! Companies-by-sector table and spreadsheet download
//!
//! The on-screen table colors the `Situação` cells; the download carries the
//! same rows and columns without any styling.

use rust_xlsxwriter::{Format, Workbook};
use serde::Serialize;
use tracing::debug;

use crate::dataset::{excel_serial_from_datetime, CellValue, Dataset, Status};
use crate::error::Result;
use crate::palette::status_background;

pub const EXPORT_FILENAME: &str = "empresas_filtradas.xlsx";
pub const EXPORT_MIME: &str = "application/vnd.ms-excel";
pub const EXPORT_SHEET: &str = "Sheet1";

const DATE_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyledCell {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<&'static str>,
}

/// A dataset rendered to display strings, with status cells colored
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyledTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<StyledCell>>,
}

impl StyledTable {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let status_idx = dataset.columns().status;
        let rows = dataset
            .rows()
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(idx, cell)| {
                        let background = match cell {
                            CellValue::Text(label) if idx == status_idx => {
                                status_background(&Status::from_label(label))
                            }
                            _ => None,
                        };
                        StyledCell {
                            text: cell.display(),
                            background,
                        }
                    })
                    .collect()
            })
            .collect();

        Self {
            headers: dataset.headers().to_vec(),
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Write the dataset to an xlsx workbook in memory: a header row, then one
/// row per record. Empty cells are left blank.
pub fn to_xlsx(dataset: &Dataset) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format(DATE_FORMAT);

    let sheet = workbook.add_worksheet();
    sheet.set_name(EXPORT_SHEET)?;

    for (col, header) in dataset.headers().iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, header, &header_format)?;
    }

    for (r, row) in dataset.rows().iter().enumerate() {
        let excel_row = r as u32 + 1;
        for (col, cell) in row.iter().enumerate() {
            let col = col as u16;
            match cell {
                CellValue::Empty => {}
                CellValue::Text(text) => {
                    sheet.write_string(excel_row, col, text)?;
                }
                CellValue::Number(n) => {
                    sheet.write_number(excel_row, col, *n)?;
                }
                CellValue::Bool(b) => {
                    sheet.write_boolean(excel_row, col, *b)?;
                }
                CellValue::DateTime(dt) => {
                    sheet.write_number_with_format(
                        excel_row,
                        col,
                        excel_serial_from_datetime(dt),
                        &date_format,
                    )?;
                }
            }
        }
    }

    let bytes = workbook.save_to_buffer()?;
    debug!(rows = dataset.len(), bytes = bytes.len(), "built spreadsheet export");
    Ok(bytes)
}
