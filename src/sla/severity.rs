//! Severity tiers and threshold comparison.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Discrete severity of a metric value, ordered by increasing urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityTier {
    Normal,
    Caution,
    Warning,
    Critical,
}

impl SeverityTier {
    pub const ALL: [SeverityTier; 4] = [
        SeverityTier::Normal,
        SeverityTier::Caution,
        SeverityTier::Warning,
        SeverityTier::Critical,
    ];

    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            SeverityTier::Normal => "OK",
            SeverityTier::Caution => "CAUT",
            SeverityTier::Warning => "WARN",
            SeverityTier::Critical => "CRIT",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityTier::Normal => "normal",
            SeverityTier::Caution => "caution",
            SeverityTier::Warning => "warning",
            SeverityTier::Critical => "critical",
        }
    }
}

impl fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Increasing cut points for one metric kind of one profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSet {
    pub caution: f64,
    pub warning: f64,
    pub critical: f64,
}

impl ThresholdSet {
    pub const fn new(caution: f64, warning: f64, critical: f64) -> Self {
        Self {
            caution,
            warning,
            critical,
        }
    }

    /// Classify a value against the cut points.
    ///
    /// Comparison is strictly greater-than, cascading from critical down, so
    /// a value equal to a cut point lands in the tier below it. The same
    /// direction is used for every metric kind.
    pub fn classify(&self, value: f64) -> SeverityTier {
        if value > self.critical {
            SeverityTier::Critical
        } else if value > self.warning {
            SeverityTier::Warning
        } else if value > self.caution {
            SeverityTier::Caution
        } else {
            SeverityTier::Normal
        }
    }

    pub fn is_finite(&self) -> bool {
        self.caution.is_finite() && self.warning.is_finite() && self.critical.is_finite()
    }

    /// `caution <= warning <= critical`
    pub fn is_ordered(&self) -> bool {
        self.caution <= self.warning && self.warning <= self.critical
    }
}
