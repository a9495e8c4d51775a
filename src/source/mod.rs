//! Upload sources feeding the dataset.
//!
//! This module provides a trait-based abstraction for receiving export
//! uploads from various places (files on disk, in-process channels).
//! Sources only deliver bytes; parsing and merging are done by
//! [`SharedDataset`](crate::data::SharedDataset).

mod channel;
mod file;

pub use channel::ChannelSource;
pub use file::FileSource;

use std::fmt::Debug;

use crate::ingest::Upload;

/// Trait for receiving export uploads from various sources.
///
/// # Example
///
/// ```
/// use slawatch::{DataSource, FileSource, SharedDataset};
///
/// let dataset = SharedDataset::new();
/// let mut source = FileSource::new(["exports"]);
/// let report = dataset.ingest_batch(source.poll());
/// println!("{} hosts", report.hosts.len());
/// ```
pub trait DataSource: Send + Debug {
    /// Poll for uploads that are new or changed since the last poll.
    ///
    /// Returns an empty batch when nothing changed. This method should be
    /// non-blocking.
    fn poll(&mut self) -> Vec<Upload>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// Returns the error message if the last poll hit a problem.
    fn error(&self) -> Option<&str>;

    /// Forget what has been delivered so the next poll reports everything
    /// again.
    fn reset(&mut self) {}
}
