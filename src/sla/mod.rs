//! Service-level thresholds and severity classification.
//!
//! Classification is a pure function of `(value, metric kind, profile)`.
//! Every kind uses the same "exceeds cut point ⇒ more severe" comparison;
//! the higher-is-better reading of availability is a presentation concern
//! handled by [`Theme`](crate::ui::Theme).

pub mod profile;
pub mod severity;

pub use profile::{ProfileRegistry, ServiceProfile, DEFAULT_PROFILE};
pub use severity::{SeverityTier, ThresholdSet};
