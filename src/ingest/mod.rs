//! Ingestion pipeline: raw bytes to normalized metric records.
//!
//! ```text
//! Upload (file name + bytes)
//!        │
//!        ▼
//! parser::parse()        ──▶ RawExport (untyped cell grid)
//!        │
//!        ▼
//! normalize::normalize() ──▶ Vec<MetricRecord>
//! ```
//!
//! Merging into the long-lived Dataset happens in
//! [`SharedDataset`](crate::data::SharedDataset); nothing here touches
//! shared state.

pub mod normalize;
pub mod parser;

pub use normalize::{normalize, ColumnMapping};
pub use parser::{parse, Encoding, RawExport};

use crate::data::MetricRecord;
use crate::error::IngestError;

/// One uploaded export: the payload plus the name it arrived under.
///
/// The file name doubles as the source identifier for
/// replace-not-duplicate merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub encoding: Option<Encoding>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
            encoding: None,
        }
    }

    /// Declare the text encoding of the payload.
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = Some(encoding);
        self
    }
}

/// Run parse and normalize for one payload.
pub fn prepare(
    content: &[u8],
    encoding: Option<Encoding>,
    mapping: &ColumnMapping,
) -> Result<Vec<MetricRecord>, IngestError> {
    let raw = parse(content, encoding)?;
    normalize(&raw, mapping)
}
