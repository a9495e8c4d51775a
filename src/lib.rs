//! # slawatch
//!
//! A terminal dashboard and library for checking network monitoring
//! exports against service-level agreements.
//!
//! Monitoring tools export per-host availability, latency and packet loss
//! as CSV files with a fixed preamble and a positional column layout. This
//! crate parses those exports, normalizes them into typed records, keeps
//! them in a shared dataset keyed by source file, and classifies every
//! reading into a severity tier under a configurable service profile.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐  │
//! │  │ source  │───▶│  ingest  │───▶│  data   │───▶│   app   │  │
//! │  │ (bytes) │    │(parse +  │    │(Shared  │    │  + ui   │  │
//! │  │         │    │normalize)│    │Dataset) │    │         │  │
//! │  └─────────┘    └──────────┘    └────┬────┘    └────┬────┘  │
//! │  FileSource | ChannelSource          │              │       │
//! │                                      ▼              ▼       │
//! │                                 ┌─────────┐    ┌─────────┐  │
//! │                                 │ report  │◀───│   sla   │  │
//! │                                 │ (JSON)  │    │(classify)  │
//! │                                 └─────────┘    └─────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: Upload sources ([`DataSource`] trait) for files,
//!   folders and in-process channels
//! - **[`ingest`]**: CSV parsing and positional normalization into
//!   [`MetricRecord`]s
//! - **[`data`]**: The lock-guarded [`SharedDataset`], replace-by-source
//!   merging and host filtering
//! - **[`sla`]**: Service profiles and the [`SeverityTier`] classifier
//! - **[`settings`]**: Profiles and column layout from a config file and
//!   `SLAWATCH_*` environment variables
//! - **[`report`]**: JSON export of the classified dataset
//! - **[`app`]** and **[`ui`]**: Interactive terminal dashboard
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch a folder of exports using the profiles in dash.json
//! slawatch --file exports/ --config dash.json --profile taj
//!
//! # Classify and write a report without the TUI
//! slawatch --file exports/ --export report.json
//! ```
//!
//! ### As a library
//!
//! ```
//! use slawatch::{MetricKind, ProfileRegistry, SeverityTier, SharedDataset};
//!
//! let dataset = SharedDataset::new();
//! let export = b"r\nr\nr\nr\nr\nh1,10.0.0.1,,,99.5,12,0.1\nh2,10.0.0.2,,,80.0,200,5.0\n";
//! let hosts = dataset.ingest("monday.csv", export).unwrap();
//! assert_eq!(hosts, vec!["h1", "h2"]);
//!
//! let profiles = ProfileRegistry::builtin();
//! let h2 = &dataset.filter(&["h2"])[0];
//! let tier = profiles.classify(h2.latency_ms, MetricKind::Latency, None).unwrap();
//! assert_eq!(tier, SeverityTier::Warning);
//! ```
//!
//! ### Feeding uploads through a channel
//!
//! ```
//! use slawatch::{App, ChannelSource, ProfileRegistry, SharedDataset, Upload};
//!
//! let (tx, source) = ChannelSource::create("upload handler");
//! tx.try_send(vec![Upload::new("a.csv", b"r\nr\nr\nr\nr\nh1,ip,,,99,1,0\n".to_vec())])
//!     .unwrap();
//!
//! let mut app = App::new(Box::new(source), SharedDataset::new(), ProfileRegistry::builtin());
//! app.reload_data().unwrap();
//! assert_eq!(app.hosts.len(), 1);
//! ```

pub mod app;
pub mod data;
pub mod error;
pub mod events;
pub mod ingest;
pub mod report;
pub mod settings;
pub mod sla;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, View};
pub use data::{
    Dataset, HostSelection, IngestOutcome, IngestReport, MetricKind, MetricRecord, SharedDataset,
};
pub use error::{ConfigError, IngestError, UnknownProfileError};
pub use ingest::{ColumnMapping, Encoding, Upload};
pub use report::Report;
pub use settings::Settings;
pub use sla::{ProfileRegistry, ServiceProfile, SeverityTier, ThresholdSet};
pub use source::{ChannelSource, DataSource, FileSource};
