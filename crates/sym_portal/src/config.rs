//! Configuration for the portal adapter.
//!
//! [`PortalConfig`] controls unit conversion, defaults applied to absent
//! fields, and the namespace for deterministic synthetic ids. It is cheap
//! to clone and serde-friendly so deployments can load it from JSON or
//! YAML alongside the engine configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Runtime configuration for submission normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Semantic version of the adapter configuration.
    #[serde(default = "PortalConfig::default_version")]
    pub version: u32,
    /// Week-equivalence divisor for monthly quantities.
    #[serde(default = "PortalConfig::default_weeks_per_month")]
    pub weeks_per_month: f64,
    /// Applied when a receiver omits its logistics radius.
    #[serde(default = "PortalConfig::default_max_distance_km")]
    pub default_max_distance_km: f64,
    /// Cadence label stamped on normalized quantities.
    #[serde(default = "PortalConfig::default_frequency")]
    pub default_frequency: String,
    /// UUIDv5 namespace for synthetic facility ids when the name yields no
    /// usable slug.
    #[serde(default = "PortalConfig::default_id_namespace")]
    pub id_namespace: Uuid,
}

impl PortalConfig {
    pub(crate) fn default_version() -> u32 {
        1
    }

    pub(crate) fn default_weeks_per_month() -> f64 {
        4.345
    }

    pub(crate) fn default_max_distance_km() -> f64 {
        150.0
    }

    pub(crate) fn default_frequency() -> String {
        "weekly".to_string()
    }

    pub(crate) fn default_id_namespace() -> Uuid {
        Uuid::new_v5(&Uuid::NAMESPACE_DNS, b"symbio.portal")
    }

    /// Validate the configuration before a batch run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.weeks_per_month.is_finite() && self.weeks_per_month > 0.0) {
            return Err(ConfigError::NonPositiveWeeksPerMonth(self.weeks_per_month));
        }
        if !(self.default_max_distance_km.is_finite() && self.default_max_distance_km >= 0.0) {
            return Err(ConfigError::InvalidDefaultDistance(
                self.default_max_distance_km,
            ));
        }
        Ok(())
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            version: Self::default_version(),
            weeks_per_month: Self::default_weeks_per_month(),
            default_max_distance_km: Self::default_max_distance_km(),
            default_frequency: Self::default_frequency(),
            id_namespace: Self::default_id_namespace(),
        }
    }
}

/// Errors raised when validating a [`PortalConfig`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("weeks_per_month must be a positive finite number, got {0}")]
    NonPositiveWeeksPerMonth(f64),
    #[error("default_max_distance_km must be a non-negative finite number, got {0}")]
    InvalidDefaultDistance(f64),
}
