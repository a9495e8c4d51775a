//! Metric records and the accumulated dataset.
//!
//! ## Submodules
//!
//! - [`record`]: the canonical [`MetricRecord`] row and [`MetricKind`]
//! - [`dataset`]: the [`Dataset`] accumulator, keyed by source identifier
//! - [`shared`]: [`SharedDataset`], the lock-guarded handle every caller uses
//! - [`query`]: [`HostSelection`] and the read-only `for_hosts` facade
//!
//! ## Data Flow
//!
//! ```text
//! Vec<MetricRecord> (one file)
//!        │
//!        ▼
//! SharedDataset::ingest()  ── replaces that source's rows
//!        │
//!        ├──▶ list_hosts()  (first-seen, deduplicated)
//!        │
//!        └──▶ for_hosts(&HostSelection) ──▶ presentation
//! ```

pub mod dataset;
pub mod query;
pub mod record;
pub mod shared;

pub use dataset::{Dataset, SourceRecords};
pub use query::{HostSelection, DEFAULT_SELECTION};
pub use record::{MetricKind, MetricRecord};
pub use shared::{IngestOutcome, IngestReport, SharedDataset};
