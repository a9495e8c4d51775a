//! Shared, lock-guarded dataset handle.
//!
//! All ingestion, clear and read operations go through [`SharedDataset`].
//! Parsing and normalization run before the lock is taken; the merge is a
//! single write-locked replace, so readers see either the state before an
//! ingestion or the state after it, never a partial merge.

use std::sync::Arc;

use parking_lot::RwLock;

use super::dataset::Dataset;
use super::record::MetricRecord;
use crate::error::IngestError;
use crate::ingest::{self, ColumnMapping, Upload};

/// Cloneable handle to the process-wide dataset.
#[derive(Debug, Clone, Default)]
pub struct SharedDataset {
    inner: Arc<RwLock<Dataset>>,
    mapping: Arc<ColumnMapping>,
}

/// Outcome of ingesting a single file within a batch.
#[derive(Debug)]
pub struct IngestOutcome {
    pub file_name: String,
    /// Number of records merged, or why the file was rejected.
    pub result: Result<usize, IngestError>,
}

/// Per-file results of a batch ingestion.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub outcomes: Vec<IngestOutcome>,
    /// Host list of the merged view after the batch.
    pub hosts: Vec<String>,
}

impl IngestReport {
    /// Files that were merged.
    pub fn succeeded(&self) -> impl Iterator<Item = &IngestOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_ok())
    }

    /// Files that were rejected.
    pub fn failed(&self) -> impl Iterator<Item = &IngestOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    pub fn is_all_ok(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    /// Total records merged by the batch.
    pub fn records_merged(&self) -> usize {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok()).sum()
    }
}

impl SharedDataset {
    /// Create an empty dataset using the default export layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty dataset using a custom column mapping.
    pub fn with_mapping(mapping: ColumnMapping) -> Self {
        Self {
            inner: Arc::default(),
            mapping: Arc::new(mapping),
        }
    }

    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    /// Ingest one file, replacing any earlier contribution under the same
    /// file name. Returns the merged host list.
    pub fn ingest(&self, file_name: &str, bytes: &[u8]) -> Result<Vec<String>, IngestError> {
        self.ingest_with(file_name, bytes, None).map(|(_, hosts)| hosts)
    }

    /// Ingest one upload. Returns the merged host list.
    pub fn ingest_upload(&self, upload: &Upload) -> Result<Vec<String>, IngestError> {
        self.ingest_with(&upload.file_name, &upload.bytes, upload.encoding).map(|(_, hosts)| hosts)
    }

    /// Ingest several uploads independently; one bad file does not block
    /// the others.
    pub fn ingest_batch<I>(&self, uploads: I) -> IngestReport
    where
        I: IntoIterator<Item = Upload>,
    {
        let outcomes: Vec<IngestOutcome> = uploads
            .into_iter()
            .map(|upload| {
                let result = self
                    .ingest_with(&upload.file_name, &upload.bytes, upload.encoding)
                    .map(|(count, _)| count);
                IngestOutcome {
                    file_name: upload.file_name,
                    result,
                }
            })
            .collect();

        IngestReport {
            outcomes,
            hosts: self.list_hosts(),
        }
    }

    fn ingest_with(
        &self,
        file_name: &str,
        bytes: &[u8],
        encoding: Option<ingest::Encoding>,
    ) -> Result<(usize, Vec<String>), IngestError> {
        let records = ingest::prepare(bytes, encoding, &self.mapping).inspect_err(|e| {
            tracing::warn!(file = file_name, error = %e, "rejected export");
        })?;
        let count = records.len();

        let mut dataset = self.inner.write();
        let replaced = dataset.ingest(file_name, records);
        let hosts = dataset.hosts();
        drop(dataset);

        tracing::info!(file = file_name, records = count, replaced, "ingested export");
        Ok((count, hosts))
    }

    /// Remove every source.
    pub fn clear(&self) {
        self.inner.write().clear();
        tracing::info!("dataset cleared");
    }

    /// Remove one source's contribution.
    pub fn remove_source(&self, source_id: &str) -> bool {
        self.inner.write().remove_source(source_id)
    }

    /// Distinct host names, first-seen order.
    pub fn list_hosts(&self) -> Vec<String> {
        self.inner.read().hosts()
    }

    /// Records for the selected hosts.
    pub fn filter<S: AsRef<str>>(&self, selected: &[S]) -> Vec<MetricRecord> {
        self.inner.read().filter(selected)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Source identifiers in ingestion order.
    pub fn sources(&self) -> Vec<String> {
        self.inner.read().sources().map(str::to_string).collect()
    }

    /// Run a closure against a consistent view of the dataset.
    pub fn read<R>(&self, f: impl FnOnce(&Dataset) -> R) -> R {
        f(&self.inner.read())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    const PREAMBLE: &str = "Title\nSubtitle\nLegend\n,,,,,,\nHost,IP,,,Avail,Lat,Loss\n";

    fn export(body: &str) -> Vec<u8> {
        format!("{}{}", PREAMBLE, body).into_bytes()
    }

    #[test]
    fn test_ingest_returns_hosts() {
        let dataset = SharedDataset::new();
        let hosts = dataset
            .ingest("a.csv", &export("h1,ip1,_,_,99.5,12,0.1\nh2,ip2,_,_,80.0,200,5.0\n"))
            .unwrap();
        assert_eq!(hosts, vec!["h1", "h2"]);
    }

    #[test]
    fn test_failed_reingest_keeps_previous_rows() {
        let dataset = SharedDataset::new();
        dataset.ingest("a.csv", &export("h1,ip1,,,99,1,0\n")).unwrap();

        let err = dataset.ingest("a.csv", &export("h1,ip1,99,1,0\n")).unwrap_err();
        assert!(matches!(err, IngestError::SchemaMismatch { .. }));
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.list_hosts(), vec!["h1"]);
    }

    #[test]
    fn test_batch_isolates_failures() {
        let dataset = SharedDataset::new();
        let report = dataset.ingest_batch(vec![
            Upload::new("good.csv", export("h1,ip1,,,99,1,0\n")),
            Upload::new("binary.csv", vec![0u8, 159, 146, 150]),
            Upload::new("narrow.csv", export("h9,ip9,1,2\n")),
            Upload::new("other.csv", export("h2,ip2,,,98,2,0\nh3,ip3,,,bad,2,0\n")),
        ]);

        assert!(!report.is_all_ok());
        assert_eq!(report.succeeded().count(), 2);
        assert_eq!(report.failed().count(), 2);
        assert_eq!(report.records_merged(), 2);
        assert_eq!(report.hosts, vec!["h1", "h2"]);
        assert_eq!(dataset.sources(), vec!["good.csv", "other.csv"]);
    }

    #[test]
    fn test_concurrent_ingest_never_duplicates() {
        let dataset = SharedDataset::new();
        let body = export("h1,ip1,,,99,1,0\nh2,ip2,,,98,2,0\n");

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let dataset = dataset.clone();
                let body = body.clone();
                thread::spawn(move || {
                    let name = if i % 2 == 0 { "a.csv" } else { "b.csv" };
                    for _ in 0..20 {
                        dataset.ingest(name, &body).unwrap();
                        let len = dataset.len();
                        assert!(len == 2 || len == 4, "partial merge observed: {}", len);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(dataset.len(), 4);
        assert_eq!(dataset.list_hosts(), vec!["h1", "h2"]);
    }

    #[test]
    fn test_clear_then_reads_are_empty() {
        let dataset = SharedDataset::new();
        dataset.ingest("a.csv", &export("h1,ip1,,,99,1,0\n")).unwrap();
        dataset.clear();

        assert!(dataset.list_hosts().is_empty());
        assert!(dataset.filter(&["h1"]).is_empty());
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_ingest_upload_honours_declared_encoding() {
        let dataset = SharedDataset::new();
        let mut bytes = export("caf");
        bytes.extend_from_slice(&[0xE9]);
        bytes.extend_from_slice(b"-edge,ip1,,,99,1,0\n");

        let upload = Upload::new("latin.csv", bytes.clone()).with_encoding(ingest::Encoding::Latin1);
        let hosts = dataset.ingest_upload(&upload).unwrap();
        assert_eq!(hosts, vec!["café-edge"]);

        let err = dataset.ingest_upload(&Upload::new("utf8.csv", bytes)).unwrap_err();
        assert!(matches!(err, IngestError::Parse(_)));
        assert_eq!(dataset.sources(), vec!["latin.csv"]);
    }

    #[test]
    fn test_remove_source_drops_only_that_file() {
        let dataset = SharedDataset::new();
        dataset.ingest("mon.csv", &export("h1,ip1,,,99,1,0\nh2,ip2,,,98,2,0\n")).unwrap();
        dataset.ingest("tue.csv", &export("h2,ip2,,,97,3,0\nh3,ip3,,,96,4,0\n")).unwrap();

        assert!(dataset.remove_source("mon.csv"));
        assert!(!dataset.remove_source("mon.csv"));

        assert_eq!(dataset.sources(), vec!["tue.csv"]);
        assert_eq!(dataset.list_hosts(), vec!["h2", "h3"]);
        assert!(dataset.filter(&["h1"]).is_empty());
        assert_eq!(dataset.filter(&["h2"])[0].latency_ms, 3.0);
    }

    #[test]
    fn test_custom_mapping_is_used() {
        let mapping = ColumnMapping {
            preamble_rows: 0,
            column_count: 5,
            host_name: 0,
            ip_address: 1,
            availability: 2,
            latency: 3,
            packet_loss: 4,
        };
        let dataset = SharedDataset::with_mapping(mapping);
        let hosts = dataset.ingest("x.csv", b"h1,ip1,99,1,0\n").unwrap();
        assert_eq!(hosts, vec!["h1"]);
    }
}
