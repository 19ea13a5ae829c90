//! Spreadsheet loading with calamine
//!
//! The first row of the worksheet is the header row. Every text cell is
//! trimmed on the way in; numbers, booleans and dates are kept as they are.
//! Loading fails as a whole if the file cannot be parsed or if any of the
//! required columns is missing, so the dashboard never renders from a
//! partially understood sheet.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use tracing::{debug, info};

use super::{datetime_from_excel_serial, CellValue, Dataset};
use crate::error::{DashboardError, Result};

/// Default location of the reconciliation export, relative to the working directory
pub const DEFAULT_PATH: &str = "Planejamento Pagamentos DDA via arquivo.xlsx";

/// Load a dataset from a spreadsheet file. Reads `sheet` if given, otherwise
/// the first worksheet.
pub fn load<P: AsRef<Path>>(path: P, sheet: Option<&str>) -> Result<Dataset> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path).map_err(|source| DashboardError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let dataset = read_workbook(&mut workbook, sheet, &path.display().to_string())?;
    info!(
        path = %path.display(),
        rows = dataset.len(),
        columns = dataset.headers().len(),
        "loaded spreadsheet"
    );
    Ok(dataset)
}

/// Load a dataset from an in-memory spreadsheet (xlsx, xls or ods)
pub fn load_from_bytes(bytes: Vec<u8>, sheet: Option<&str>) -> Result<Dataset> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|source| {
        DashboardError::Open {
            path: "<memory>".into(),
            source,
        }
    })?;
    read_workbook(&mut workbook, sheet, "<memory>")
}

fn read_workbook<RS: Read + Seek>(
    workbook: &mut Sheets<RS>,
    sheet: Option<&str>,
    origin: &str,
) -> Result<Dataset> {
    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| DashboardError::NoWorksheet(origin.to_string()))?,
    };

    debug!(sheet = %sheet_name, "reading worksheet");
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|source| DashboardError::Worksheet {
            sheet: sheet_name.clone(),
            source,
        })?;

    from_range(&range, &sheet_name)
}

/// Build a dataset from a worksheet range
pub fn from_range(range: &Range<Data>, sheet_name: &str) -> Result<Dataset> {
    let mut rows = range.rows();

    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| DashboardError::EmptySheet(sheet_name.to_string()))?
        .iter()
        .enumerate()
        .map(|(idx, cell)| match cell_value(cell) {
            CellValue::Empty => format!("Unnamed: {}", idx),
            value => value.display(),
        })
        .collect();

    let data: Vec<Vec<CellValue>> = rows
        .map(|row| row.iter().map(cell_value).collect::<Vec<_>>())
        .filter(|row| row.iter().any(|cell| !cell.is_empty()))
        .collect();

    Dataset::new(headers, data)
}

/// Convert a calamine cell, trimming text
pub fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::String(v) => CellValue::text(v),
        Data::Float(v) => CellValue::Number(*v),
        Data::Int(v) => CellValue::Number(*v as f64),
        Data::Bool(v) => CellValue::Bool(*v),
        // Date-formatted numbers past the calendar range stay numbers
        Data::DateTime(v) => datetime_from_excel_serial(v.as_f64())
            .map(CellValue::DateTime)
            .unwrap_or(CellValue::Number(v.as_f64())),
        Data::DateTimeIso(v) => CellValue::text(v),
        Data::DurationIso(v) => CellValue::text(v),
        Data::Error(v) => CellValue::text(&format!("{:?}", v)),
        Data::Empty => CellValue::Empty,
    }
}
