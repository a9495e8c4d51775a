//! Canonical metric row and metric kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One normalized row of a monitoring export.
///
/// A record only exists when all three metric fields parsed to finite
/// numbers; the normalizer never emits partial rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    #[serde(rename = "Host_name")]
    pub host_name: String,
    #[serde(rename = "IP_address")]
    pub ip_address: String,
    #[serde(rename = "Availability-%")]
    pub availability_pct: f64,
    #[serde(rename = "Latency(msec)")]
    pub latency_ms: f64,
    #[serde(rename = "Packetloss(%)")]
    pub packet_loss_pct: f64,
}

impl MetricRecord {
    /// Returns the value of the given metric.
    pub fn value(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::Availability => self.availability_pct,
            MetricKind::Latency => self.latency_ms,
            MetricKind::PacketLoss => self.packet_loss_pct,
        }
    }
}

/// The metrics carried by an export row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Availability,
    Latency,
    PacketLoss,
}

impl MetricKind {
    /// All kinds, in dashboard order.
    pub const ALL: [MetricKind; 3] =
        [MetricKind::PacketLoss, MetricKind::Latency, MetricKind::Availability];

    /// Canonical column name used by the export tool.
    pub fn column_name(&self) -> &'static str {
        match self {
            MetricKind::Availability => "Availability-%",
            MetricKind::Latency => "Latency(msec)",
            MetricKind::PacketLoss => "Packetloss(%)",
        }
    }

    /// Human-readable chart label.
    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::Availability => "Availability (%)",
            MetricKind::Latency => "Latency (ms)",
            MetricKind::PacketLoss => "Packet Loss (%)",
        }
    }

    /// Whether a larger value is the desirable direction.
    ///
    /// Only presentation consults this; classification compares raw values
    /// the same way for every kind.
    pub fn higher_is_better(&self) -> bool {
        matches!(self, MetricKind::Availability)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Availability => "availability",
            MetricKind::Latency => "latency",
            MetricKind::PacketLoss => "packet_loss",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "availability" => Ok(MetricKind::Availability),
            "latency" => Ok(MetricKind::Latency),
            "packet_loss" | "packetloss" | "packet-loss" => Ok(MetricKind::PacketLoss),
            other => Err(format!("unknown metric kind: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_by_kind() {
        let record = MetricRecord {
            host_name: "h1".to_string(),
            ip_address: "10.0.0.1".to_string(),
            availability_pct: 99.5,
            latency_ms: 12.0,
            packet_loss_pct: 0.1,
        };
        assert_eq!(record.value(MetricKind::Availability), 99.5);
        assert_eq!(record.value(MetricKind::Latency), 12.0);
        assert_eq!(record.value(MetricKind::PacketLoss), 0.1);
    }

    #[test]
    fn test_serializes_with_export_column_names() {
        let record = MetricRecord {
            host_name: "h1".to_string(),
            ip_address: "10.0.0.1".to_string(),
            availability_pct: 100.0,
            latency_ms: 3.0,
            packet_loss_pct: 0.0,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["Host_name"], "h1");
        assert_eq!(json["Latency(msec)"], 3.0);
        assert_eq!(json["Packetloss(%)"], 0.0);
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("latency".parse::<MetricKind>().unwrap(), MetricKind::Latency);
        assert_eq!("Packet-Loss".parse::<MetricKind>().unwrap(), MetricKind::PacketLoss);
        assert!("jitter".parse::<MetricKind>().is_err());
        assert!(MetricKind::Availability.higher_is_better());
        assert!(!MetricKind::Latency.higher_is_better());
    }
}
