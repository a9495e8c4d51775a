//! Startup configuration.
//!
//! Profiles and the export column layout are read once, from an optional
//! file (JSON, TOML or YAML, picked by extension) plus `SLAWATCH_*`
//! environment overrides, and are immutable afterwards.
//!
//! ```json
//! {
//!   "default_profile": "taj",
//!   "service_agreements": {
//!     "taj": {
//!       "packet_loss_threshold":  { "caution": 1,  "warning": 2,   "critical": 5 },
//!       "latency_threshold":      { "caution": 50, "warning": 100, "critical": 200 },
//!       "availability_threshold": { "caution": 95, "warning": 99,  "critical": 99.9 }
//!     }
//!   },
//!   "columns": { "preamble_rows": 5 }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::ingest::ColumnMapping;
use crate::sla::{ProfileRegistry, ServiceProfile};

/// Environment prefix, e.g. `SLAWATCH_DEFAULT_PROFILE=gold` or
/// `SLAWATCH_COLUMNS__PREAMBLE_ROWS=6`.
pub const ENV_PREFIX: &str = "SLAWATCH";

#[derive(Debug, Deserialize)]
struct RawSettings {
    #[serde(default)]
    default_profile: Option<String>,
    #[serde(default)]
    service_agreements: BTreeMap<String, ServiceProfile>,
    #[serde(default)]
    columns: ColumnMapping,
}

/// Validated startup configuration.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub profiles: ProfileRegistry,
    pub columns: ColumnMapping,
}

impl Settings {
    /// Load settings from `path` (if given) and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Self::from_config(config)
    }

    /// Build settings from an already assembled [`Config`].
    ///
    /// With no `service_agreements` the built-in default profile is used.
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        let raw: RawSettings = config.try_deserialize()?;

        raw.columns.validate()?;

        let profiles = if raw.service_agreements.is_empty() {
            let builtin = ProfileRegistry::builtin();
            match raw.default_profile {
                Some(name) if name != builtin.default_profile() => {
                    return Err(ConfigError::MissingDefault(name));
                }
                _ => builtin,
            }
        } else {
            ProfileRegistry::new(raw.service_agreements, raw.default_profile)?
        };

        tracing::debug!(
            profiles = profiles.names().count(),
            default = profiles.default_profile(),
            "loaded service profiles"
        );

        Ok(Self {
            profiles,
            columns: raw.columns,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MetricKind;
    use crate::sla::SeverityTier;
    use std::io::Write;

    fn from_json(json: &str) -> Result<Settings, ConfigError> {
        let config = Config::builder()
            .add_source(File::from_str(json, config::FileFormat::Json))
            .build()?;
        Settings::from_config(config)
    }

    #[test]
    fn test_dashboard_config_shape() {
        let settings = from_json(
            r#"{
                "service_agreements": {
                    "taj": {
                        "packet_loss_threshold": { "caution": 1, "warning": 2, "critical": 5 },
                        "latency_threshold": { "caution": 50, "warning": 100, "critical": 200 },
                        "availability_threshold": { "caution": 95, "warning": 99, "critical": 99.9 }
                    }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(settings.profiles.default_profile(), "taj");
        assert_eq!(settings.columns, ColumnMapping::default());
        assert_eq!(
            settings.profiles.classify(3.0, MetricKind::PacketLoss, Some("taj")).unwrap(),
            SeverityTier::Warning
        );
    }

    #[test]
    fn test_empty_config_uses_builtin() {
        let settings = from_json("{}").unwrap();
        assert_eq!(settings.profiles.default_profile(), "default");
        assert!(settings.profiles.get("default").is_some());
    }

    #[test]
    fn test_column_override() {
        let settings = from_json(r#"{ "columns": { "preamble_rows": 6 } }"#).unwrap();
        assert_eq!(settings.columns.preamble_rows, 6);
        assert_eq!(settings.columns.column_count, 7);
    }

    #[test]
    fn test_rejects_bad_columns() {
        let err = from_json(r#"{ "columns": { "column_count": 3 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidColumns(_)));
    }

    #[test]
    fn test_rejects_unordered_thresholds() {
        let err = from_json(
            r#"{
                "service_agreements": {
                    "taj": {
                        "packet_loss_threshold": { "caution": 5, "warning": 2, "critical": 1 },
                        "latency_threshold": { "caution": 50, "warning": 100, "critical": 200 },
                        "availability_threshold": { "caution": 95, "warning": 99, "critical": 99.9 }
                    }
                }
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnorderedThresholds { .. }));
    }

    #[test]
    fn test_unknown_default_without_profiles() {
        let err = from_json(r#"{ "default_profile": "gold" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::MissingDefault(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{
                "default_profile": "gold",
                "service_agreements": {{
                    "gold": {{
                        "packet_loss_threshold": {{ "caution": 0.5, "warning": 1, "critical": 2 }},
                        "latency_threshold": {{ "caution": 10, "warning": 20, "critical": 40 }},
                        "availability_threshold": {{ "caution": 99, "warning": 99.5, "critical": 99.99 }}
                    }}
                }}
            }}"#
        )
        .unwrap();
        file.flush().unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.profiles.default_profile(), "gold");
        assert_eq!(
            settings.profiles.classify(20.0, MetricKind::Latency, None).unwrap(),
            SeverityTier::Caution
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = Settings::load(Some(Path::new("/nonexistent/slawatch.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }
}
