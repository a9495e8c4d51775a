//! Raw record parser.
//!
//! Decodes export bytes and splits them into an untyped grid of cells.
//! Row shape is not validated here: ragged rows pass through untouched and
//! structural checks happen in the normalizer.

use std::fmt;
use std::str::FromStr;

use crate::error::IngestError;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Text encoding declared for an uploaded export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Utf8,
    /// ISO-8859-1: every byte is one code point.
    Latin1,
}

impl FromStr for Encoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Encoding::Utf8),
            "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" => Ok(Encoding::Latin1),
            other => Err(format!("unsupported encoding: {}", other)),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Utf8 => f.write_str("utf-8"),
            Encoding::Latin1 => f.write_str("latin-1"),
        }
    }
}

/// The raw cell grid of one export, before normalization.
///
/// Header and data rows are not distinguished.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawExport {
    rows: Vec<Vec<String>>,
}

impl RawExport {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.rows
    }
}

/// Parse raw export bytes into a cell grid.
///
/// `encoding` defaults to UTF-8 when `None`. Fails with
/// [`IngestError::Parse`] when the bytes are not valid in the declared
/// encoding, contain NUL bytes, or are not readable as delimited text.
pub fn parse(content: &[u8], encoding: Option<Encoding>) -> Result<RawExport, IngestError> {
    let text = decode(content, encoding.unwrap_or_default())?;

    if text.contains('\0') {
        return Err(IngestError::Parse("binary content is not delimited text".to_string()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawExport::new(rows))
}

fn decode(content: &[u8], encoding: Encoding) -> Result<String, IngestError> {
    match encoding {
        Encoding::Utf8 => {
            let bytes = content.strip_prefix(UTF8_BOM).unwrap_or(content);
            std::str::from_utf8(bytes).map(str::to_string).map_err(|e| {
                IngestError::Parse(format!(
                    "invalid utf-8 at byte {}",
                    e.valid_up_to() + (content.len() - bytes.len())
                ))
            })
        }
        Encoding::Latin1 => Ok(content.iter().map(|&b| b as char).collect()),
    }
}
