//! Grouped count tables
//!
//! Each table is a plain group-by-and-count over the records. Keys are kept
//! in a `BTreeMap`, so iteration follows sorted key order and is identical for
//! identical input. Records with an empty grouping component are not counted.

use std::collections::BTreeMap;

use crate::dataset::{Dataset, Status};
use crate::search::SearchQuery;

/// Count of records per key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountTable<K: Ord> {
    counts: BTreeMap<K, usize>,
}

impl<K: Ord> Default for CountTable<K> {
    fn default() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }
}

impl<K: Ord> FromIterator<K> for CountTable<K> {
    fn from_iter<I: IntoIterator<Item = K>>(keys: I) -> Self {
        let mut table = Self::default();
        for key in keys {
            *table.counts.entry(key).or_insert(0) += 1;
        }
        table
    }
}

impl<K: Ord> CountTable<K> {
    pub fn get(&self, key: &K) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Sum of all counts
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, usize)> {
        self.counts.iter().map(|(key, count)| (key, *count))
    }
}

/// Keys that carry a payer name, so tables can be narrowed by a search
pub trait PayerKey {
    fn payer(&self) -> &str;
}

impl<K: Ord + Clone + PayerKey> CountTable<K> {
    /// Keep only the rows whose payer matches the query
    pub fn filter_payers(&self, query: &SearchQuery) -> Self {
        let counts = self
            .counts
            .iter()
            .filter(|(key, _)| query.matches(key.payer()))
            .map(|(key, count)| (key.clone(), *count))
            .collect();
        Self { counts }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PayerStatus {
    pub payer: String,
    pub status: Status,
}

impl PayerKey for PayerStatus {
    fn payer(&self) -> &str {
        &self.payer
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PayerNote {
    pub payer: String,
    pub note: String,
}

impl PayerKey for PayerNote {
    fn payer(&self) -> &str {
        &self.payer
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SectorStatus {
    pub sector: String,
    pub status: Status,
}

/// Records per status
pub fn by_status(dataset: &Dataset) -> CountTable<Status> {
    dataset.records().filter_map(|r| r.status()).collect()
}

/// Records per (payer, status)
pub fn by_payer_and_status(dataset: &Dataset) -> CountTable<PayerStatus> {
    dataset
        .records()
        .filter_map(|r| {
            Some(PayerStatus {
                payer: r.payer_name()?.to_string(),
                status: r.status()?,
            })
        })
        .collect()
}

/// Records per (payer, link note), restricted to links made with a difference
pub fn discrepancies_by_payer(dataset: &Dataset) -> CountTable<PayerNote> {
    dataset
        .records()
        .filter(|r| r.status() == Some(Status::LinkedWithDifference))
        .filter_map(|r| {
            Some(PayerNote {
                payer: r.payer_name()?.to_string(),
                note: r.link_note()?.to_string(),
            })
        })
        .collect()
}

/// Records per (sector, status). Expects a sector-expanded dataset.
pub fn by_sector_and_status(expanded: &Dataset) -> CountTable<SectorStatus> {
    expanded
        .records()
        .filter_map(|r| {
            Some(SectorStatus {
                sector: r.sector()?.to_string(),
                status: r.status()?,
            })
        })
        .collect()
}

/// Discrepancy counts collapsed over payers
pub fn note_totals(table: &CountTable<PayerNote>) -> CountTable<String> {
    let mut totals = CountTable::default();
    for (key, count) in table.iter() {
        *totals.counts.entry(key.note.clone()).or_insert(0) += count;
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures;
    use crate::transform::expand_sectors;

    const LWD: &str = "Vinculado - Com diferença";

    fn sample() -> Dataset {
        fixtures::dataset(&[
            ("Automático", "Acme", "Ops", ""),
            ("Manual", "Acme", "Ops/Fin", ""),
            ("Pendente", "Beta", "Fin", ""),
            (LWD, "Beta", "RH/Ops", "Número do documento diferente"),
            (LWD, "Beta", "RH", "Número do documento diferente"),
            (LWD, "Gama", "Fin", "Cnpj/Cpf do cedente diferente"),
            (LWD, "Gama", "Fin", ""),
        ])
    }

    // ==========================================================================
    // TOTALS
    // ==========================================================================
    //
    // Every record with a status is counted exactly once in the status table,
    // and every expanded row exactly once in the sector table.
    // ==========================================================================

    #[test]
    fn test_status_total_equals_row_count() {
        let dataset = sample();
        let table = by_status(&dataset);

        assert_eq!(table.total(), dataset.len());
        assert_eq!(table.get(&Status::LinkedWithDifference), 4);
        assert_eq!(table.get(&Status::Automatic), 1);
    }

    #[test]
    fn test_sector_total_equals_expanded_row_count() {
        let dataset = sample();
        let expanded = expand_sectors(&dataset);
        let table = by_sector_and_status(&expanded);

        assert_eq!(expanded.len(), 9);
        assert_eq!(table.total(), expanded.len());
        assert!(table.total() > dataset.len());
    }

    #[test]
    fn test_payer_status_cross_tab() {
        let table = by_payer_and_status(&sample());

        let key = |payer: &str, status: Status| PayerStatus {
            payer: payer.to_string(),
            status,
        };
        assert_eq!(table.get(&key("Acme", Status::Manual)), 1);
        assert_eq!(table.get(&key("Beta", Status::LinkedWithDifference)), 2);
        assert_eq!(table.get(&key("Gama", Status::Pending)), 0);
        assert_eq!(table.total(), 7);
    }

    #[test]
    fn test_discrepancies_only_count_linked_with_difference() {
        let table = discrepancies_by_payer(&sample());

        // The Gama row with no note is dropped like a missing group key
        assert_eq!(table.total(), 3);
        assert_eq!(
            table.get(&PayerNote {
                payer: "Beta".to_string(),
                note: "Número do documento diferente".to_string(),
            }),
            2
        );
    }

    #[test]
    fn test_records_without_status_are_not_counted() {
        let dataset = fixtures::dataset(&[("", "Acme", "Ops", ""), ("Manual", "Acme", "Ops", "")]);
        assert_eq!(by_status(&dataset).total(), 1);
        assert_eq!(by_payer_and_status(&dataset).total(), 1);
    }

    #[test]
    fn test_iteration_is_sorted_by_key() {
        let dataset = fixtures::dataset(&[
            ("Manual", "Zeta", "Ops", ""),
            ("Manual", "Acme", "Ops", ""),
            ("Automático", "Zeta", "Ops", ""),
        ]);
        let table = by_payer_and_status(&dataset);
        let payers: Vec<&str> = table
            .iter()
            .map(|(key, _)| key.payer.as_str())
            .collect();
        assert_eq!(payers, vec!["Acme", "Zeta", "Zeta"]);
    }

    // ==========================================================================
    // SCENARIO: one multi-sector discrepancy
    // ==========================================================================

    #[test]
    fn test_single_record_two_sectors() {
        let dataset = fixtures::dataset(&[(
            LWD,
            "Acme",
            "Ops/Fin",
            "Número do documento diferente",
        )]);
        let table = by_sector_and_status(&expand_sectors(&dataset));

        let rows: Vec<(String, Status, usize)> = table
            .iter()
            .map(|(key, count)| (key.sector.clone(), key.status.clone(), count))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("Fin".to_string(), Status::LinkedWithDifference, 1),
                ("Ops".to_string(), Status::LinkedWithDifference, 1),
            ]
        );
    }

    // ==========================================================================
    // SEARCH FILTERING
    // ==========================================================================

    #[test]
    fn test_filter_payers_keeps_matching_rows() {
        let table = by_payer_and_status(&sample()).filter_payers(&SearchQuery::parse("acm, GAM"));
        assert!(table.iter().all(|(key, _)| key.payer == "Acme" || key.payer == "Gama"));
        assert_eq!(table.total(), 4);
    }

    #[test]
    fn test_zero_match_search_yields_empty_table() {
        let table =
            discrepancies_by_payer(&sample()).filter_payers(&SearchQuery::parse("inexistente"));
        assert!(table.is_empty());
        assert_eq!(table.total(), 0);
    }

    #[test]
    fn test_note_totals_collapse_payers() {
        let totals = note_totals(&discrepancies_by_payer(&sample()));
        assert_eq!(totals.len(), 2);
        assert_eq!(totals.get(&"Número do documento diferente".to_string()), 2);
        assert_eq!(totals.get(&"Cnpj/Cpf do cedente diferente".to_string()), 1);
    }
}
