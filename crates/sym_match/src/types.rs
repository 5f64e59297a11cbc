//! Engine configuration and derived output types.
//!
//! [`MatchRecord`] and [`CycleRecord`] are transient outputs of a single
//! engine invocation: derived, immutable, and carrying no identity across
//! calls. [`EngineConfig`] holds every economic and structural tunable so
//! tests and deployments can vary assumptions per invocation; there are
//! no hidden module-level constants.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-pair sub-scores and the blended compatibility score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchScores {
    /// Mean per-key requirement satisfaction, in [0, 1].
    pub material_score: f64,
    /// Closeness relative to the receiver's radius, in [0, 1].
    pub distance_score: f64,
    /// Demand coverage, in [0, 1].
    pub quantity_score: f64,
    /// Weighted blend on a 0–100 scale.
    pub compatibility_score: f64,
}

/// Estimated cost and environmental impact of realizing a match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchEconomics {
    /// `min(supplier_qty, receiver_qty)` in tons per week.
    pub matched_quantity_tons: f64,
    pub transport_cost: f64,
    pub total_cost: f64,
    pub co2_saved_kg: f64,
    /// CO₂ saved per unit cost; `+∞` when the match costs nothing.
    pub eco_efficiency_score: f64,
}

/// One feasible supplier→receiver pairing that survived the hard filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub supplier_id: String,
    pub supplier_name: String,
    pub receiver_id: String,
    pub receiver_name: String,
    pub material_type: String,
    pub distance_km: f64,
    pub max_distance_km: f64,
    pub scores: MatchScores,
    pub economics: MatchEconomics,
}

/// One edge of an evaluated exchange loop, with its score snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleEdge {
    pub from: String,
    pub to: String,
    pub compatibility_score: f64,
    pub eco_efficiency_score: f64,
}

/// A closed exchange loop over high-confidence matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleRecord {
    /// Canonical node order: minimum id first, length ≥ 2, no repeats.
    pub cycle_nodes: Vec<String>,
    pub edges: Vec<CycleEdge>,
    pub aggregate_total_cost: f64,
    pub aggregate_co2_saved_kg: f64,
    /// Σco2 / Σcost across the loop; `+∞` when the loop costs nothing.
    pub aggregate_eco_efficiency_score: f64,
}

/// The result of one engine invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub ranked_matches: Vec<MatchRecord>,
    pub detected_cycles: Vec<CycleRecord>,
}

/// Economic and structural tunables for one engine invocation.
///
/// `EngineConfig` is cheap to clone and serde-friendly so deployments can
/// load it next to the portal configuration. Validate before use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Transport cost per ton-kilometre.
    #[serde(default = "EngineConfig::default_cost_per_ton_km")]
    pub cost_per_ton_km: f64,
    /// Truck emission factor, kg CO₂ per ton-kilometre.
    #[serde(default = "EngineConfig::default_truck_emission")]
    pub truck_emission_kg_per_ton_km: f64,
    /// CO₂ avoided per ton of virgin material substituted.
    #[serde(default = "EngineConfig::default_substitution_savings")]
    pub substitution_savings_kg_per_ton: f64,
    /// Matches scoring strictly above this (0–100) become graph edges.
    #[serde(default = "EngineConfig::default_cycle_threshold")]
    pub cycle_threshold: f64,
    /// Depth bound for cycle enumeration; guarantees termination on
    /// densely cyclic graphs.
    #[serde(default = "EngineConfig::default_max_cycle_len")]
    pub max_cycle_len: usize,
    /// Whether a facility playing both roles may be matched with itself.
    #[serde(default)]
    pub allow_self_matches: bool,
}

impl EngineConfig {
    pub(crate) fn default_cost_per_ton_km() -> f64 {
        7.0
    }

    pub(crate) fn default_truck_emission() -> f64 {
        0.10
    }

    pub(crate) fn default_substitution_savings() -> f64 {
        200.0
    }

    pub(crate) fn default_cycle_threshold() -> f64 {
        80.0
    }

    pub(crate) fn default_max_cycle_len() -> usize {
        10
    }

    /// Validate the configuration for a single invocation.
    pub fn validate(&self) -> Result<(), MatchError> {
        if self.max_cycle_len < 2 {
            return Err(MatchError::InvalidConfig(
                "max_cycle_len must be at least 2 (the shortest cycle)".into(),
            ));
        }
        if !self.cycle_threshold.is_finite() || !(0.0..=100.0).contains(&self.cycle_threshold) {
            return Err(MatchError::InvalidConfig(
                "cycle_threshold must lie within the 0-100 compatibility scale".into(),
            ));
        }
        for (name, value) in [
            ("cost_per_ton_km", self.cost_per_ton_km),
            ("truck_emission_kg_per_ton_km", self.truck_emission_kg_per_ton_km),
            (
                "substitution_savings_kg_per_ton",
                self.substitution_savings_kg_per_ton,
            ),
        ] {
            if !value.is_finite() {
                return Err(MatchError::InvalidConfig(format!(
                    "{name} must be a finite number"
                )));
            }
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cost_per_ton_km: Self::default_cost_per_ton_km(),
            truck_emission_kg_per_ton_km: Self::default_truck_emission(),
            substitution_savings_kg_per_ton: Self::default_substitution_savings(),
            cycle_threshold: Self::default_cycle_threshold(),
            max_cycle_len: Self::default_max_cycle_len(),
            allow_self_matches: false,
        }
    }
}

/// Errors produced by the matching layer.
///
/// Malformed *records* never error; they degrade to neutral values or
/// fail a hard filter. Only a structurally invalid configuration is
/// reportable.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum MatchError {
    /// Invalid engine configuration.
    #[error("invalid engine config: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = EngineConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.cost_per_ton_km, 7.0);
        assert_eq!(cfg.cycle_threshold, 80.0);
        assert_eq!(cfg.max_cycle_len, 10);
        assert!(!cfg.allow_self_matches);
    }

    #[test]
    fn too_small_cycle_bound_rejected() {
        let cfg = EngineConfig {
            max_cycle_len: 1,
            ..EngineConfig::default()
        };
        let err = cfg.validate().expect_err("config should be invalid");
        match err {
            MatchError::InvalidConfig(msg) => assert!(msg.contains("max_cycle_len")),
        }
    }

    #[test]
    fn out_of_scale_threshold_rejected() {
        let cfg = EngineConfig {
            cycle_threshold: 120.0,
            ..EngineConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(MatchError::InvalidConfig(_))));
        let cfg = EngineConfig {
            cycle_threshold: f64::NAN,
            ..EngineConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(MatchError::InvalidConfig(_))));
    }

    #[test]
    fn non_finite_tunables_rejected() {
        let cfg = EngineConfig {
            cost_per_ton_km: f64::INFINITY,
            ..EngineConfig::default()
        };
        let err = cfg.validate().expect_err("config should be invalid");
        match err {
            MatchError::InvalidConfig(msg) => assert!(msg.contains("cost_per_ton_km")),
        }
    }

    #[test]
    fn config_round_trips_through_serde() {
        let cfg = EngineConfig {
            cycle_threshold: 70.0,
            allow_self_matches: true,
            ..EngineConfig::default()
        };
        let json = serde_json::to_string(&cfg).expect("serialize");
        let back: EngineConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, cfg);
    }

    #[test]
    fn partial_config_json_fills_defaults() {
        let cfg: EngineConfig = serde_json::from_str(r#"{"cycle_threshold": 60.0}"#)
            .expect("partial config should deserialize");
        assert_eq!(cfg.cycle_threshold, 60.0);
        assert_eq!(cfg.max_cycle_len, 10);
        assert_eq!(cfg.cost_per_ton_km, 7.0);
    }
}
