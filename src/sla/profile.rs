//! Service-agreement profiles and the profile registry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::severity::{SeverityTier, ThresholdSet};
use crate::data::MetricKind;
use crate::error::{ConfigError, UnknownProfileError};

/// Profile used when no configuration names one.
pub const DEFAULT_PROFILE: &str = "default";

/// Per-metric thresholds of one service agreement.
///
/// Field names follow the `service_agreements` layout of the dashboard
/// configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceProfile {
    #[serde(rename = "availability_threshold")]
    pub availability: ThresholdSet,
    #[serde(rename = "latency_threshold")]
    pub latency: ThresholdSet,
    #[serde(rename = "packet_loss_threshold")]
    pub packet_loss: ThresholdSet,
}

impl Default for ServiceProfile {
    fn default() -> Self {
        Self {
            availability: ThresholdSet::new(95.0, 99.0, 99.9),
            latency: ThresholdSet::new(50.0, 100.0, 200.0),
            packet_loss: ThresholdSet::new(1.0, 2.0, 5.0),
        }
    }
}

impl ServiceProfile {
    pub fn thresholds(&self, kind: MetricKind) -> &ThresholdSet {
        match kind {
            MetricKind::Availability => &self.availability,
            MetricKind::Latency => &self.latency,
            MetricKind::PacketLoss => &self.packet_loss,
        }
    }

    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        for kind in MetricKind::ALL {
            let thresholds = self.thresholds(kind);
            if !thresholds.is_finite() {
                return Err(ConfigError::NonFiniteThreshold {
                    profile: name.to_string(),
                    kind: kind.to_string(),
                });
            }
            if !thresholds.is_ordered() {
                return Err(ConfigError::UnorderedThresholds {
                    profile: name.to_string(),
                    kind: kind.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Immutable set of named profiles with a default.
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    profiles: BTreeMap<String, ServiceProfile>,
    default_profile: String,
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ProfileRegistry {
    /// Build a registry, validating every profile.
    ///
    /// Without an explicit `default_profile`, [`DEFAULT_PROFILE`] is used if
    /// configured, otherwise the first profile by name.
    pub fn new(
        profiles: BTreeMap<String, ServiceProfile>,
        default_profile: Option<String>,
    ) -> Result<Self, ConfigError> {
        for (name, profile) in &profiles {
            profile.validate(name)?;
        }

        let default_profile = match default_profile {
            Some(name) if profiles.contains_key(&name) => name,
            Some(name) => return Err(ConfigError::MissingDefault(name)),
            None if profiles.contains_key(DEFAULT_PROFILE) => DEFAULT_PROFILE.to_string(),
            None => profiles.keys().next().cloned().ok_or(ConfigError::NoProfiles)?,
        };

        Ok(Self {
            profiles,
            default_profile,
        })
    }

    /// A registry holding a single built-in [`DEFAULT_PROFILE`].
    pub fn builtin() -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert(DEFAULT_PROFILE.to_string(), ServiceProfile::default());
        Self {
            profiles,
            default_profile: DEFAULT_PROFILE.to_string(),
        }
    }

    pub fn default_profile(&self) -> &str {
        &self.default_profile
    }

    /// Profile names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&ServiceProfile> {
        self.profiles.get(name)
    }

    /// Resolve a profile name; `None` selects the default profile.
    ///
    /// An explicitly named unknown profile is an error; the default is
    /// never substituted for it.
    pub fn resolve(&self, name: Option<&str>) -> Result<&ServiceProfile, UnknownProfileError> {
        let name = name.unwrap_or(&self.default_profile);
        self.profiles
            .get(name)
            .ok_or_else(|| UnknownProfileError(name.to_string()))
    }

    pub fn thresholds(
        &self,
        kind: MetricKind,
        profile: Option<&str>,
    ) -> Result<&ThresholdSet, UnknownProfileError> {
        Ok(self.resolve(profile)?.thresholds(kind))
    }

    /// Classify `value` of metric `kind` under the named profile.
    pub fn classify(
        &self,
        value: f64,
        kind: MetricKind,
        profile: Option<&str>,
    ) -> Result<SeverityTier, UnknownProfileError> {
        Ok(self.thresholds(kind, profile)?.classify(value))
    }

    /// The profile after `current` in name order, wrapping around.
    pub fn next_name(&self, current: &str) -> &str {
        let mut names = self.names().skip_while(|n| *n != current);
        names.next();
        names
            .next()
            .or_else(|| self.names().next())
            .unwrap_or(&self.default_profile)
    }
}
