//! In-memory table of DDA linkage records
//!
//! A [`Dataset`] is the spreadsheet as loaded: the header row plus one row of
//! typed cells per record. Only four columns carry meaning for the dashboard
//! (see [`Columns`]); every other column is carried along untouched so the
//! export view can show and download the full record.

pub mod loader;
pub mod status;

pub use status::Status;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta, Timelike};

use crate::error::{DashboardError, Result};

pub const COL_STATUS: &str = "Situação";
pub const COL_PAYER: &str = "Nome Cedente";
pub const COL_SECTOR: &str = "Setor";
pub const COL_LINK_NOTE: &str = "Observação do Vínculo";

pub const REQUIRED_COLUMNS: [&str; 4] = [COL_STATUS, COL_PAYER, COL_SECTOR, COL_LINK_NOTE];

/// A single spreadsheet cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Build a text cell, trimming surrounding whitespace. Blank text becomes
    /// [`CellValue::Empty`].
    pub fn text(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(trimmed.to_string())
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Human-readable rendering used by tables and search
    pub fn display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            CellValue::Bool(b) => b.to_string(),
            CellValue::DateTime(dt) => {
                if dt.num_seconds_from_midnight() == 0 {
                    dt.format("%Y-%m-%d").to_string()
                } else {
                    dt.format("%Y-%m-%d %H:%M:%S").to_string()
                }
            }
        }
    }
}

fn excel_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Convert an Excel serial date (days since 1899-12-30) to a timestamp,
/// rounded to the nearest second. `None` when the serial is outside the
/// representable date range.
pub fn datetime_from_excel_serial(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() {
        return None;
    }
    let seconds = (serial * 86_400.0).round() as i64;
    excel_epoch().checked_add_signed(TimeDelta::try_seconds(seconds)?)
}

pub fn excel_serial_from_datetime(dt: &NaiveDateTime) -> f64 {
    (*dt - excel_epoch()).num_seconds() as f64 / 86_400.0
}

/// Positions of the four meaningful columns in the header row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Columns {
    pub status: usize,
    pub payer: usize,
    pub sector: usize,
    pub link_note: usize,
}

impl Columns {
    /// Find the required columns, failing on the first one that is absent.
    pub fn locate(headers: &[String]) -> Result<Self> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or(DashboardError::MissingColumn(name))
        };

        Ok(Self {
            status: find(COL_STATUS)?,
            payer: find(COL_PAYER)?,
            sector: find(COL_SECTOR)?,
            link_note: find(COL_LINK_NOTE)?,
        })
    }
}

/// Typed view of one row
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    cells: &'a [CellValue],
    columns: Columns,
}

impl<'a> Record<'a> {
    fn text_at(&self, idx: usize) -> Option<&'a str> {
        self.cells.get(idx).and_then(CellValue::as_text)
    }

    /// `None` when the status cell is empty
    pub fn status(&self) -> Option<Status> {
        self.text_at(self.columns.status).map(Status::from_label)
    }

    pub fn payer_name(&self) -> Option<&'a str> {
        self.text_at(self.columns.payer)
    }

    /// Raw sector text, possibly several sectors joined by `/`
    pub fn sector(&self) -> Option<&'a str> {
        self.text_at(self.columns.sector)
    }

    pub fn link_note(&self) -> Option<&'a str> {
        self.text_at(self.columns.link_note)
    }

    pub fn cells(&self) -> &'a [CellValue] {
        self.cells
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    headers: Vec<String>,
    columns: Columns,
    rows: Vec<Vec<CellValue>>,
}

impl Dataset {
    /// Build a dataset from a header row and data rows. Rows are padded with
    /// empty cells (or truncated) to the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Result<Self> {
        let columns = Columns::locate(&headers)?;
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();

        Ok(Self {
            headers,
            columns,
            rows,
        })
    }

    /// Same schema, different rows
    pub(crate) fn with_rows(&self, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            headers: self.headers.clone(),
            columns: self.columns,
            rows,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn columns(&self) -> Columns {
        self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = Record<'_>> + '_ {
        let columns = self.columns;
        self.rows.iter().map(move |cells| Record { cells, columns })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_cells_are_trimmed() {
        assert_eq!(CellValue::text("  Acme  "), CellValue::Text("Acme".to_string()));
        assert_eq!(CellValue::text("   "), CellValue::Empty);
    }

    #[test]
    fn test_number_display_drops_integral_fraction() {
        assert_eq!(CellValue::Number(42.0).display(), "42");
        assert_eq!(CellValue::Number(12.75).display(), "12.75");
    }

    #[test]
    fn test_datetime_display() {
        let midnight = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let afternoon = midnight + TimeDelta::hours(15);
        assert_eq!(CellValue::DateTime(midnight).display(), "2024-01-02");
        assert_eq!(CellValue::DateTime(afternoon).display(), "2024-01-02 15:00:00");
    }

    #[test]
    fn test_excel_serial_conversion() {
        // 45292 is 2024-01-01 in the 1900 date system
        let dt = datetime_from_excel_serial(45292.5).unwrap();
        assert_eq!(dt.format("%Y-%m-%d %H:%M").to_string(), "2024-01-01 12:00");
        assert_eq!(excel_serial_from_datetime(&dt), 45292.5);
    }

    #[test]
    fn test_out_of_range_serial_has_no_datetime() {
        assert_eq!(datetime_from_excel_serial(123_456_789.0), None);
        assert_eq!(datetime_from_excel_serial(1.0e12), None);
        assert_eq!(datetime_from_excel_serial(f64::NAN), None);
    }

    #[test]
    fn test_columns_locate_tolerates_padded_headers() {
        let headers: Vec<String> = vec![
            " Setor ".to_string(),
            "Situação".to_string(),
            "Observação do Vínculo".to_string(),
            "Nome Cedente".to_string(),
        ];
        let columns = Columns::locate(&headers).unwrap();
        assert_eq!(columns.sector, 0);
        assert_eq!(columns.status, 1);
        assert_eq!(columns.link_note, 2);
        assert_eq!(columns.payer, 3);
    }

    #[test]
    fn test_missing_column_is_reported() {
        let headers = vec![COL_STATUS.to_string(), COL_PAYER.to_string()];
        match Columns::locate(&headers) {
            Err(DashboardError::MissingColumn(name)) => assert_eq!(name, COL_SECTOR),
            other => panic!("expected missing column error, got {:?}", other),
        }
    }

    #[test]
    fn test_rows_are_padded_to_header_width() {
        let dataset = Dataset::new(
            fixtures::headers(),
            vec![vec![CellValue::Empty, CellValue::text("Manual")]],
        )
        .unwrap();
        assert_eq!(dataset.rows()[0].len(), fixtures::headers().len());
    }

    #[test]
    fn test_record_accessors() {
        let dataset = fixtures::dataset(&[("Pendente", "Acme", "Ops/Fin", "")]);
        let record = dataset.records().next().unwrap();
        assert_eq!(record.status(), Some(Status::Pending));
        assert_eq!(record.payer_name(), Some("Acme"));
        assert_eq!(record.sector(), Some("Ops/Fin"));
        assert_eq!(record.link_note(), None);
    }
}
