//! DDA Dashboard - Payment-linkage reconciliation report
//!
//! Reads the DDA planning spreadsheet exported by the payments team and
//! serves it as a small interactive dashboard: how records were linked
//! (automatically, manually, pending, or linked with a difference), which
//! payers ("Nome Cedente") concentrate the discrepancies, and how each sector
//! is doing.
//!
//! # Overview
//!
//! The spreadsheet is loaded once into an immutable [`Dataset`]. Every view is
//! a pure function of that table: a grouped count, then a declarative chart.
//! Derived tables are built on first use and kept by the [`Dashboard`].
//!
//! # Views
//!
//! | View | Content |
//! |------|---------|
//! | Situação Vinculo | Status pie plus fixed commentary |
//! | Situação - Nome Cedente | Status per payer, searchable |
//! | Diferença pelo nome das empresas | Discrepancy reasons per payer, searchable |
//! | Vínculos Agrupados por Setor | Status per sector |
//! | Empresas por Setores | Companies table per sector, downloadable |
//!
//! # Quick Start
//!
//! ```no_run
//! use dda_dashboard::{Dashboard, View, ViewRequest};
//!
//! let dashboard = Dashboard::open("Planejamento Pagamentos DDA via arquivo.xlsx", None)?;
//! for (status, count) in dashboard.status_counts().iter() {
//!     println!("{}: {}", status, count);
//! }
//!
//! let content = dashboard.render(&ViewRequest::new(View::LinksBySector));
//! println!("{}", serde_json::to_string(&content).unwrap());
//! # Ok::<(), dda_dashboard::DashboardError>(())
//! ```
//!
//! # Modules
//!
//! - [`dataset`]: Spreadsheet loading and the typed base table
//! - [`transform`]: Sector expansion and the companies-by-sector dedup
//! - [`aggregate`]: Grouped count tables
//! - [`chart`]: Plotly figure builders
//! - [`view`] / [`dashboard`]: View selection and rendering
//! - [`export`]: Styled table and spreadsheet download
//! - [`page`] / [`serve`]: HTML page and HTTP server

pub mod aggregate;
pub mod chart;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod export;
pub mod page;
pub mod palette;
pub mod search;
pub mod serve;
pub mod transform;
pub mod view;

pub use aggregate::CountTable;
pub use dashboard::{Dashboard, Download};
pub use dataset::{CellValue, Dataset, Status};
pub use error::{DashboardError, Result};
pub use search::SearchQuery;
pub use view::{View, ViewContent, ViewRequest};
