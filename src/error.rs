//! Error type shared by loading, transforming and exporting

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong between reading the spreadsheet and serving it.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("failed to open spreadsheet {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },
    #[error("spreadsheet {0} has no worksheets")]
    NoWorksheet(String),
    #[error("failed to read worksheet '{sheet}': {source}")]
    Worksheet {
        sheet: String,
        #[source]
        source: calamine::Error,
    },
    #[error("worksheet '{0}' has no header row")]
    EmptySheet(String),
    #[error("required column '{0}' is missing from the header row")]
    MissingColumn(&'static str),
    #[error("unknown sector '{0}'; run without --sector to list them")]
    UnknownSector(String),
    #[error("failed to build spreadsheet export: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
