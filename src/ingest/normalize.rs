//! Schema normalizer.
//!
//! Converts the raw grid of a monitoring export into [`MetricRecord`]s.
//! The export tool writes a fixed preamble (title and legend lines) and
//! labels its columns by position only, so every structural assumption is
//! kept in one [`ColumnMapping`] table.

use serde::{Deserialize, Serialize};

use super::parser::RawExport;
use crate::data::MetricRecord;
use crate::error::{ConfigError, IngestError};

/// Positional layout of a monitoring export.
///
/// Placeholder columns (positions 2 and 3 in the default layout) are simply
/// not referenced and therefore discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    /// Leading rows discarded unconditionally.
    pub preamble_rows: usize,
    /// Exact number of columns expected after the preamble.
    pub column_count: usize,
    pub host_name: usize,
    pub ip_address: usize,
    pub availability: usize,
    pub latency: usize,
    pub packet_loss: usize,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            preamble_rows: 5,
            column_count: 7,
            host_name: 0,
            ip_address: 1,
            availability: 4,
            latency: 5,
            packet_loss: 6,
        }
    }
}

impl ColumnMapping {
    /// Check that every mapped position fits the column count and that no
    /// two fields share a position.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positions = [
            ("host_name", self.host_name),
            ("ip_address", self.ip_address),
            ("availability", self.availability),
            ("latency", self.latency),
            ("packet_loss", self.packet_loss),
        ];

        for (name, index) in positions {
            if index >= self.column_count {
                return Err(ConfigError::InvalidColumns(format!(
                    "{} at position {} exceeds column count {}",
                    name, index, self.column_count
                )));
            }
        }

        for (i, (a, ia)) in positions.iter().enumerate() {
            if let Some((b, _)) = positions[i + 1..].iter().find(|(_, ib)| ib == ia) {
                return Err(ConfigError::InvalidColumns(format!(
                    "{} and {} both map to position {}",
                    a, b, ia
                )));
            }
        }

        Ok(())
    }

    /// Build a record from one data row, or `None` if the row is unusable.
    ///
    /// A row is unusable when its host name is blank or any of the three
    /// metric cells is absent or not a finite number.
    fn record_from(&self, row: &[String]) -> Option<MetricRecord> {
        let cell = |index: usize| row.get(index).map(|s| s.trim());

        let host_name = cell(self.host_name).filter(|h| !h.is_empty())?;
        let availability_pct = cell(self.availability).and_then(coerce);
        let latency_ms = cell(self.latency).and_then(coerce);
        let packet_loss_pct = cell(self.packet_loss).and_then(coerce);

        // All three or nothing
        match (availability_pct, latency_ms, packet_loss_pct) {
            (Some(availability_pct), Some(latency_ms), Some(packet_loss_pct)) => {
                Some(MetricRecord {
                    host_name: host_name.to_string(),
                    ip_address: cell(self.ip_address).unwrap_or_default().to_string(),
                    availability_pct,
                    latency_ms,
                    packet_loss_pct,
                })
            }
            _ => None,
        }
    }
}

/// Numeric coercion; anything unparseable or non-finite is missing.
fn coerce(cell: &str) -> Option<f64> {
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Normalize a raw export into metric records, preserving row order.
///
/// Inputs shorter than the preamble yield an empty result. The widest row
/// after the preamble must match `mapping.column_count` exactly.
pub fn normalize(raw: &RawExport, mapping: &ColumnMapping) -> Result<Vec<MetricRecord>, IngestError> {
    let rows = raw.rows();
    if rows.len() < mapping.preamble_rows {
        return Ok(Vec::new());
    }

    let data = &rows[mapping.preamble_rows..];
    let Some(width) = data.iter().map(Vec::len).max() else {
        return Ok(Vec::new());
    };

    if width != mapping.column_count {
        return Err(IngestError::SchemaMismatch {
            expected: mapping.column_count,
            found: width,
        });
    }

    let records: Vec<MetricRecord> =
        data.iter().filter_map(|row| mapping.record_from(row)).collect();

    let dropped = data.len() - records.len();
    if dropped > 0 {
        tracing::debug!(dropped, kept = records.len(), "dropped rows with missing metrics");
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::parser::parse;

    const PREAMBLE: &str =
        "Availability report\nGenerated by monitor\n,,,,,,\nLegend,,,,,,\nHost,IP,,,Avail,Lat,Loss\n";

    fn export(body: &str) -> RawExport {
        parse(format!("{}{}", PREAMBLE, body).as_bytes(), None).unwrap()
    }

    #[test]
    fn test_normalize_scenario() {
        let raw = export("h1,ip1,_,_,99.5,12,0.1\nh2,ip2,_,_,80.0,200,5.0\n");
        let records = normalize(&raw, &ColumnMapping::default()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].host_name, "h1");
        assert_eq!(records[0].ip_address, "ip1");
        assert_eq!(records[0].availability_pct, 99.5);
        assert_eq!(records[0].latency_ms, 12.0);
        assert_eq!(records[0].packet_loss_pct, 0.1);
        assert_eq!(records[1].host_name, "h2");
        assert_eq!(records[1].latency_ms, 200.0);
    }

    #[test]
    fn test_short_input_is_empty_not_error() {
        for lines in 0..5 {
            let content: String = (0..lines).map(|i| format!("line {}\n", i)).collect();
            let raw = parse(content.as_bytes(), None).unwrap();
            let records = normalize(&raw, &ColumnMapping::default()).unwrap();
            assert!(records.is_empty(), "{} rows", lines);
        }
    }

    #[test]
    fn test_only_preamble_is_empty() {
        let raw = export("");
        assert!(normalize(&raw, &ColumnMapping::default()).unwrap().is_empty());
    }

    #[test]
    fn test_non_numeric_row_dropped_whole() {
        let raw = export("h1,ip1,,,99.5,12,0.1\nh2,ip2,,,98,n/a,0.2\nh3,ip3,,,97,15,0.3\n");
        let records = normalize(&raw, &ColumnMapping::default()).unwrap();

        let hosts: Vec<&str> = records.iter().map(|r| r.host_name.as_str()).collect();
        assert_eq!(hosts, vec!["h1", "h3"]);
    }

    #[test]
    fn test_each_metric_column_is_required() {
        let raw = export(
            "a,ip,,,x,1,1\nb,ip,,,1,x,1\nc,ip,,,1,1,x\nd,ip,,,NaN,1,1\ne,ip,,,1,inf,1\nf,ip,,,1,1,1\n",
        );
        let records = normalize(&raw, &ColumnMapping::default()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].host_name, "f");
    }

    #[test]
    fn test_short_row_is_dropped() {
        let raw = export("h1,ip1,,,99,10,0\nh2,ip2,,,99\n");
        let records = normalize(&raw, &ColumnMapping::default()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].host_name, "h1");
    }

    #[test]
    fn test_blank_host_dropped() {
        let raw = export("  ,ip1,,,99,10,0\nh2,ip2,,,99,10,0\n");
        let records = normalize(&raw, &ColumnMapping::default()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].host_name, "h2");
    }

    #[test]
    fn test_cells_are_trimmed() {
        let raw = export(" h1 , 10.0.0.1 ,,, 99.9 , 4 , 0 \n");
        let records = normalize(&raw, &ColumnMapping::default()).unwrap();
        assert_eq!(records[0].host_name, "h1");
        assert_eq!(records[0].ip_address, "10.0.0.1");
        assert_eq!(records[0].availability_pct, 99.9);
    }

    #[test]
    fn test_column_count_mismatch() {
        let raw = export("h1,ip1,99.5,12,0.1\n");
        let err = normalize(&raw, &ColumnMapping::default()).unwrap_err();
        assert!(matches!(err, IngestError::SchemaMismatch { expected: 7, found: 5 }));

        let raw = export("h1,ip1,,,99.5,12,0.1,extra\n");
        let err = normalize(&raw, &ColumnMapping::default()).unwrap_err();
        assert!(matches!(err, IngestError::SchemaMismatch { expected: 7, found: 8 }));
    }

    #[test]
    fn test_custom_mapping() {
        let mapping = ColumnMapping {
            preamble_rows: 1,
            column_count: 5,
            host_name: 0,
            ip_address: 1,
            availability: 2,
            latency: 3,
            packet_loss: 4,
        };
        mapping.validate().unwrap();

        let raw = parse(b"Host,IP,Avail,Lat,Loss\nh1,ip1,99,10,0.5\n", None).unwrap();
        let records = normalize(&raw, &mapping).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].packet_loss_pct, 0.5);
    }

    #[test]
    fn test_mapping_validation() {
        assert!(ColumnMapping::default().validate().is_ok());

        let out_of_range = ColumnMapping { packet_loss: 7, ..ColumnMapping::default() };
        assert!(out_of_range.validate().is_err());

        let duplicate = ColumnMapping { latency: 4, ..ColumnMapping::default() };
        let err = duplicate.validate().unwrap_err();
        assert!(err.to_string().contains("availability and latency"));
    }
}
