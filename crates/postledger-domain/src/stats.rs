//! Aggregate figures over one user's ledger

use crate::{Record, Status};
use std::collections::BTreeMap;

/// Totals reported by the `stats` command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerStats {
    /// Number of records
    pub total_count: usize,

    /// Records per status, counting classified records only
    pub status_histogram: BTreeMap<Status, usize>,

    /// Sum of citation counts over all records
    pub total_citation_count: usize,
}

impl LedgerStats {
    /// Compute the aggregate for a set of records
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut stats = Self::default();
        for record in records {
            stats.total_count += 1;
            stats.total_citation_count += record.citation_count();
            if record.status.is_set() {
                *stats.status_histogram.entry(record.status).or_insert(0) += 1;
            }
        }
        stats
    }

    /// Count for one status (zero when absent)
    pub fn count_for(&self, status: Status) -> usize {
        self.status_histogram.get(&status).copied().unwrap_or(0)
    }
}
