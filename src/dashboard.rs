//! Loaded dataset plus lazily derived tables
//!
//! The base table is read once and never changes. Each derived table
//! (sector expansion, companies-by-sector, the four count tables) is built the
//! first time a view needs it and reused afterwards, so switching views or
//! toggling labels only touches the path that view depends on.

use std::path::Path;
use std::sync::OnceLock;

use tracing::debug;

use crate::aggregate::{self, CountTable, PayerNote, PayerStatus, SectorStatus};
use crate::chart;
use crate::dataset::{loader, Dataset, Status};
use crate::error::{DashboardError, Result};
use crate::export::{self, StyledTable};
use crate::transform;
use crate::view::{CompaniesView, View, ViewContent, ViewRequest, OVERVIEW_COMMENTARY};

/// A generated spreadsheet ready to be sent
#[derive(Debug, Clone)]
pub struct Download {
    pub filename: &'static str,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

pub struct Dashboard {
    dataset: Dataset,
    expanded: OnceLock<Dataset>,
    companies: OnceLock<Dataset>,
    sectors: OnceLock<Vec<String>>,
    by_status: OnceLock<CountTable<Status>>,
    by_payer: OnceLock<CountTable<PayerStatus>>,
    discrepancies: OnceLock<CountTable<PayerNote>>,
    by_sector: OnceLock<CountTable<SectorStatus>>,
}

impl Dashboard {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            expanded: OnceLock::new(),
            companies: OnceLock::new(),
            sectors: OnceLock::new(),
            by_status: OnceLock::new(),
            by_payer: OnceLock::new(),
            discrepancies: OnceLock::new(),
            by_sector: OnceLock::new(),
        }
    }

    /// Load the spreadsheet at `path`; fails if it cannot be used at all
    pub fn open<P: AsRef<Path>>(path: P, sheet: Option<&str>) -> Result<Self> {
        Ok(Self::new(loader::load(path, sheet)?))
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn expanded(&self) -> &Dataset {
        self.expanded.get_or_init(|| {
            let expanded = transform::expand_sectors(&self.dataset);
            debug!(rows = expanded.len(), "expanded sectors");
            expanded
        })
    }

    /// One row per (payer, sector) with merged notes
    pub fn companies(&self) -> &Dataset {
        self.companies.get_or_init(|| {
            let companies = transform::companies_by_sector(&self.dataset);
            debug!(rows = companies.len(), "built companies by sector");
            companies
        })
    }

    pub fn sectors(&self) -> &[String] {
        self.sectors
            .get_or_init(|| transform::distinct_sectors(self.companies()))
    }

    pub fn status_counts(&self) -> &CountTable<Status> {
        self.by_status.get_or_init(|| aggregate::by_status(&self.dataset))
    }

    pub fn payer_status_counts(&self) -> &CountTable<PayerStatus> {
        self.by_payer
            .get_or_init(|| aggregate::by_payer_and_status(&self.dataset))
    }

    pub fn discrepancy_counts(&self) -> &CountTable<PayerNote> {
        self.discrepancies
            .get_or_init(|| aggregate::discrepancies_by_payer(&self.dataset))
    }

    pub fn sector_status_counts(&self) -> &CountTable<SectorStatus> {
        self.by_sector
            .get_or_init(|| aggregate::by_sector_and_status(self.expanded()))
    }

    /// Resolve the requested sector against the known ones, defaulting to the
    /// first sector like a fresh dropdown would
    pub fn resolve_sector(&self, requested: Option<&str>) -> Option<&str> {
        let sectors = self.sectors();
        requested
            .and_then(|wanted| sectors.iter().find(|s| s.as_str() == wanted))
            .or_else(|| sectors.first())
            .map(String::as_str)
    }

    /// Companies of one sector
    pub fn companies_in(&self, sector: &str) -> Dataset {
        transform::filter_sector(self.companies(), sector)
    }

    pub fn render(&self, request: &ViewRequest) -> ViewContent {
        debug!(view = request.view.slug(), "rendering view");

        match request.view {
            View::StatusOverview => {
                let table = self.status_counts();
                if table.is_empty() {
                    return ViewContent::no_results(request);
                }
                ViewContent::Chart {
                    figure: chart::status_pie(table),
                    commentary: &OVERVIEW_COMMENTARY,
                }
            }
            View::StatusByPayer => {
                let table = self.payer_status_counts().filter_payers(&request.search);
                if table.is_empty() {
                    return ViewContent::no_results(request);
                }
                ViewContent::Chart {
                    figure: chart::payer_status_bar(&table, request.show_labels),
                    commentary: &[],
                }
            }
            View::DiscrepancyByPayer => {
                let table = self.discrepancy_counts().filter_payers(&request.search);
                if table.is_empty() {
                    return ViewContent::no_results(request);
                }
                ViewContent::Chart {
                    figure: chart::discrepancy_bar(&table, request.show_labels),
                    commentary: &[],
                }
            }
            View::LinksBySector => {
                let table = self.sector_status_counts();
                if table.is_empty() {
                    return ViewContent::no_results(request);
                }
                ViewContent::Chart {
                    figure: chart::sector_status_bar(table),
                    commentary: &[],
                }
            }
            View::CompaniesBySector => match self.resolve_sector(request.sector.as_deref()) {
                None => ViewContent::no_results(request),
                Some(sector) => ViewContent::Companies(CompaniesView {
                    sectors: self.sectors().to_vec(),
                    selected: Some(sector.to_string()),
                    table: StyledTable::from_dataset(&self.companies_in(sector)),
                }),
            },
        }
    }

    /// Build the spreadsheet download for a sector, fresh on every call
    pub fn download(&self, sector: Option<&str>) -> Result<Download> {
        let rows = match self.resolve_sector(sector) {
            Some(sector) => self.companies_in(sector),
            None => self.companies().clone(),
        };

        Ok(Download {
            filename: export::EXPORT_FILENAME,
            mime: export::EXPORT_MIME,
            bytes: export::to_xlsx(&rows)?,
        })
    }

    /// Like [`Dashboard::download`], but the sector must be one of [`Dashboard::sectors`]
    pub fn export_sector(&self, sector: &str) -> Result<Download> {
        if !self.sectors().iter().any(|s| s == sector) {
            return Err(DashboardError::UnknownSector(sector.to_string()));
        }
        self.download(Some(sector))
    }
}
