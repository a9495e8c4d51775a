//! JSON report of the classified dataset.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::data::{HostSelection, MetricKind, MetricRecord, SharedDataset};
use crate::error::UnknownProfileError;
use crate::sla::{ProfileRegistry, SeverityTier};

/// Number of records per severity tier for one metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierCounts {
    pub normal: usize,
    pub caution: usize,
    pub warning: usize,
    pub critical: usize,
}

impl TierCounts {
    fn add(&mut self, tier: SeverityTier) {
        match tier {
            SeverityTier::Normal => self.normal += 1,
            SeverityTier::Caution => self.caution += 1,
            SeverityTier::Warning => self.warning += 1,
            SeverityTier::Critical => self.critical += 1,
        }
    }
}

/// A record with its severity tier per metric.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedRecord {
    #[serde(flatten)]
    pub record: MetricRecord,
    pub severity: BTreeMap<MetricKind, SeverityTier>,
}

/// A file that failed to ingest.
#[derive(Debug, Clone, Serialize)]
pub struct FileError {
    pub file: String,
    pub error: String,
}

/// Exportable snapshot of the dataset, classified under one profile.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub profile: String,
    pub sources: Vec<String>,
    pub hosts: Vec<String>,
    pub summary: BTreeMap<MetricKind, TierCounts>,
    pub records: Vec<ClassifiedRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FileError>,
}

impl Report {
    /// Classify the records of `selection` (every host when `None`).
    pub fn build(
        dataset: &SharedDataset,
        profiles: &ProfileRegistry,
        profile: Option<&str>,
        selection: Option<&HostSelection>,
    ) -> Result<Self, UnknownProfileError> {
        let service = profiles.resolve(profile)?;
        let profile = profile.unwrap_or(profiles.default_profile()).to_string();

        // One read lock, so sources, hosts and records describe the same state
        let (sources, hosts, records) = dataset.read(|d| {
            let hosts = match selection {
                Some(selection) => selection.hosts().to_vec(),
                None => d.hosts(),
            };
            let records = d.filter(&hosts);
            let sources: Vec<String> = d.sources().map(str::to_string).collect();
            (sources, hosts, records)
        });

        let mut summary: BTreeMap<MetricKind, TierCounts> =
            MetricKind::ALL.iter().map(|k| (*k, TierCounts::default())).collect();

        let records = records
            .into_iter()
            .map(|record| {
                let severity: BTreeMap<MetricKind, SeverityTier> = MetricKind::ALL
                    .iter()
                    .map(|&kind| (kind, service.thresholds(kind).classify(record.value(kind))))
                    .collect();
                for (kind, tier) in &severity {
                    summary.entry(*kind).or_default().add(*tier);
                }
                ClassifiedRecord { record, severity }
            })
            .collect();

        Ok(Self {
            profile,
            sources,
            hosts,
            summary,
            records,
            errors: Vec::new(),
        })
    }

    /// Attach ingest failures to the report.
    pub fn with_errors(mut self, errors: impl IntoIterator<Item = (String, String)>) -> Self {
        self.errors = errors
            .into_iter()
            .map(|(file, error)| FileError { file, error })
            .collect();
        self
    }

    /// Write the report as pretty-printed JSON.
    pub fn write_to(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
