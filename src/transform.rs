//! Row-level reshaping of the base table
//!
//! - [`expand_sectors`]: one row per `/`-separated sector token
//! - [`companies_by_sector`]: one row per (payer, sector) with merged notes
//! - [`distinct_sectors`] / [`filter_sector`]: sector dropdown support

use std::collections::{HashMap, HashSet};

use crate::dataset::{CellValue, Dataset};

/// Separator between sector names in a multi-sector cell
pub const SECTOR_SEPARATOR: char = '/';

/// Separator used when merging several link notes into one cell
pub const NOTE_SEPARATOR: &str = ", ";

/// Split a raw sector cell into trimmed, non-empty sector names
pub fn split_sectors(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(SECTOR_SEPARATOR)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Emit one copy of each row per sector token, with the sector cell replaced
/// by the token. Rows without any sector token are kept once with an empty
/// sector.
pub fn expand_sectors(dataset: &Dataset) -> Dataset {
    let sector_idx = dataset.columns().sector;
    let mut rows = Vec::with_capacity(dataset.len());

    for record in dataset.records() {
        let tokens: Vec<&str> = record
            .sector()
            .map(|s| split_sectors(s).collect())
            .unwrap_or_default();

        if tokens.is_empty() {
            let mut row = record.cells().to_vec();
            row[sector_idx] = CellValue::Empty;
            rows.push(row);
            continue;
        }

        for token in tokens {
            let mut row = record.cells().to_vec();
            row[sector_idx] = CellValue::Text(token.to_string());
            rows.push(row);
        }
    }

    dataset.with_rows(rows)
}

/// Collapse the sector-expanded table to one row per (payer, sector).
///
/// The link note of the surviving row is replaced by every distinct non-empty
/// note seen for that pair, joined with `", "` in first-seen order. The
/// surviving row is the first occurrence of the pair; everything else on it is
/// kept as is.
pub fn companies_by_sector(dataset: &Dataset) -> Dataset {
    let expanded = expand_sectors(dataset);
    let columns = expanded.columns();

    // Empty cells group together
    let key_of = |cells: &[CellValue]| {
        (
            cells[columns.payer].display(),
            cells[columns.sector].display(),
        )
    };

    let mut notes: HashMap<(String, String), Vec<String>> = HashMap::new();
    for record in expanded.records() {
        let entry = notes.entry(key_of(record.cells())).or_default();
        if let Some(note) = record.link_note() {
            if !entry.iter().any(|seen| seen == note) {
                entry.push(note.to_string());
            }
        }
    }

    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut rows = Vec::new();
    for record in expanded.records() {
        let key = key_of(record.cells());
        if !seen.insert(key.clone()) {
            continue;
        }

        let mut row = record.cells().to_vec();
        row[columns.link_note] = match notes.get(&key) {
            Some(merged) if !merged.is_empty() => CellValue::Text(merged.join(NOTE_SEPARATOR)),
            _ => CellValue::Empty,
        };
        rows.push(row);
    }

    expanded.with_rows(rows)
}

/// Distinct non-empty sectors in first-seen order
pub fn distinct_sectors(dataset: &Dataset) -> Vec<String> {
    let mut seen = HashSet::new();
    dataset
        .records()
        .filter_map(|record| record.sector())
        .filter(|sector| seen.insert(*sector))
        .map(str::to_string)
        .collect()
}

/// Rows whose sector cell equals `sector` exactly
pub fn filter_sector(dataset: &Dataset, sector: &str) -> Dataset {
    let rows = dataset
        .records()
        .filter(|record| record.sector() == Some(sector))
        .map(|record| record.cells().to_vec())
        .collect();
    dataset.with_rows(rows)
}
