//! Dataset accumulator.
//!
//! Holds the normalized records of every ingested source. Each source is
//! keyed by its identifier (normally the file name) so that ingesting the
//! same source again replaces its rows instead of duplicating them.

use std::collections::HashSet;

use super::record::MetricRecord;

/// Records contributed by a single source.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRecords {
    pub source_id: String,
    pub records: Vec<MetricRecord>,
}

/// The accumulated collection of metric records.
///
/// The merged view is the concatenation of all sources in the order they
/// were first ingested, each in its original row order. A re-ingested
/// source keeps its slot.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    sources: Vec<SourceRecords>,
}

impl Dataset {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge records for `source_id`, replacing anything that source
    /// contributed before.
    ///
    /// Returns `true` if an earlier contribution was replaced.
    pub fn ingest(&mut self, source_id: impl Into<String>, records: Vec<MetricRecord>) -> bool {
        let source_id = source_id.into();
        if let Some(existing) = self.sources.iter_mut().find(|s| s.source_id == source_id) {
            existing.records = records;
            true
        } else {
            self.sources.push(SourceRecords { source_id, records });
            false
        }
    }

    /// Drop one source's contribution. Returns `true` if it was present.
    pub fn remove_source(&mut self, source_id: &str) -> bool {
        let before = self.sources.len();
        self.sources.retain(|s| s.source_id != source_id);
        self.sources.len() != before
    }

    /// Remove every source.
    pub fn clear(&mut self) {
        self.sources.clear();
    }

    /// Iterate over the merged view.
    pub fn records(&self) -> impl Iterator<Item = &MetricRecord> {
        self.sources.iter().flat_map(|s| s.records.iter())
    }

    /// Identifiers of all known sources, in ingestion order.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|s| s.source_id.as_str())
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Number of records in the merged view.
    pub fn len(&self) -> usize {
        self.sources.iter().map(|s| s.records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Distinct host names in first-seen order.
    pub fn hosts(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.records()
            .filter(|r| seen.insert(r.host_name.as_str()))
            .map(|r| r.host_name.clone())
            .collect()
    }

    /// Records whose host is in `selected`, in merged-view order.
    pub fn filter<S: AsRef<str>>(&self, selected: &[S]) -> Vec<MetricRecord> {
        if selected.is_empty() {
            return Vec::new();
        }
        let selected: HashSet<&str> = selected.iter().map(AsRef::as_ref).collect();
        self.records()
            .filter(|r| selected.contains(r.host_name.as_str()))
            .cloned()
            .collect()
    }
}
