//! Workspace umbrella crate for Symbio industrial-symbiosis matching.
//!
//! This crate stitches together portal normalization (`sym_portal`) and
//! the matching engine (`sym_match`) so callers can go from raw facility
//! submissions to ranked matches and detected exchange loops with a single
//! API entry point.

pub use sym_cycles::{canonical_rotation, find_cycles};
pub use sym_match::{
    build_match_graph, compute_ranked_matches, evaluate_cycles, material_score, process_requests,
    set_engine_metrics, CycleEdge, CycleRecord, EngineConfig, EngineMetrics, MatchEconomics,
    MatchError, MatchOutcome, MatchRecord, MatchScores,
};
pub use sym_portal::{
    adapt_submission, adapt_submissions, parse_certifications, parse_composition_text,
    parse_requirement_text, AdaptedFacility, CommonSection, ConfigError, Coordinates,
    FacilityRole, GeneratorSection, Geocoder, Logistics, LocationInput, MaterialRequirement,
    NullGeocoder, PortalConfig, RawFacilitySubmission, ReceiverRecord, ReceiverSection,
    SupplierRecord, WasteOutput,
};
pub use sym_requirement::{parse_actual_value, parse_numeric, PropertyRequirement, Requirement};

use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt;

/// Errors that can occur while processing submissions through the full
/// pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    Portal(ConfigError),
    Match(MatchError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Portal(err) => write!(f, "portal config failure: {err}"),
            PipelineError::Match(err) => write!(f, "match failure: {err}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipelineError::Portal(err) => Some(err),
            PipelineError::Match(err) => Some(err),
        }
    }
}

impl From<ConfigError> for PipelineError {
    fn from(value: ConfigError) -> Self {
        PipelineError::Portal(value)
    }
}

impl From<MatchError> for PipelineError {
    fn from(value: MatchError) -> Self {
        PipelineError::Match(value)
    }
}

/// Runs the full pipeline: adapt raw portal submissions into canonical
/// records, then rank matches and detect exchange loops.
///
/// Adaptation is best-effort per record; only an invalid configuration is
/// an error. The injected `geocoder` resolves free-text addresses; pass
/// [`NullGeocoder`] when submissions always carry explicit coordinates.
pub fn process_portal_submissions(
    records: &[RawFacilitySubmission],
    portal_cfg: &PortalConfig,
    engine_cfg: &EngineConfig,
    geocoder: &dyn Geocoder,
) -> Result<MatchOutcome, PipelineError> {
    portal_cfg.validate()?;
    let (suppliers, receivers) = adapt_submissions(records, portal_cfg, geocoder);
    let outcome = process_requests(&suppliers, &receivers, engine_cfg)?;
    Ok(outcome)
}

/// A small built-in fixture: a thermal power plant's fly ash offered to a
/// nearby cement works. Used by the demo binary and benches.
pub fn fly_ash_demo() -> (Vec<SupplierRecord>, Vec<ReceiverRecord>) {
    let supplier = SupplierRecord {
        id: "THERM_A_451".to_string(),
        name: "Alpha Thermal Power".to_string(),
        industry: "Power Generation".to_string(),
        location: Some(Coordinates::new(13.0827, 80.2707)),
        waste_output: WasteOutput {
            material_type: "Fly Ash".to_string(),
            quantity_tons: 150.0,
            frequency: "weekly".to_string(),
            chemical_composition: BTreeMap::from([
                ("SiO2".to_string(), "55%".to_string()),
                ("Fe2O3".to_string(), "5%".to_string()),
            ]),
            physical_properties: BTreeMap::from([
                ("moisture".to_string(), "2%".to_string()),
                ("pH".to_string(), "7.5".to_string()),
            ]),
            current_disposal_landfill_km: 80.0,
        },
        certifications: BTreeSet::from(["ISO14001".to_string(), "BIS".to_string()]),
    };

    let receiver = ReceiverRecord {
        id: "FACB_102".to_string(),
        name: "Beta Cement Works".to_string(),
        industry: "Cement".to_string(),
        location: Some(Coordinates::new(12.9850, 80.2310)),
        material_requirement: MaterialRequirement {
            material_type: "Fly Ash".to_string(),
            quantity_tons: 125.0,
            frequency: "weekly".to_string(),
            required_composition: BTreeMap::from([
                ("SiO2".to_string(), Requirement::Gt(40.0)),
                ("Fe2O3".to_string(), Requirement::Lt(10.0)),
            ]),
            required_properties: BTreeMap::from([
                (
                    "moisture".to_string(),
                    PropertyRequirement::Numeric(Requirement::Lt(10.0)),
                ),
                (
                    "pH".to_string(),
                    PropertyRequirement::Numeric(Requirement::Range(6.5, 8.0)),
                ),
            ]),
            processing_cost_per_ton: 200.0,
            budget_per_ton: None,
        },
        logistics: Logistics {
            max_distance_km: 150.0,
        },
        certifications_required: BTreeSet::from(["BIS".to_string(), "ISO14001".to_string()]),
    };

    (vec![supplier], vec![receiver])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_pair_produces_one_strong_match() {
        let (suppliers, receivers) = fly_ash_demo();
        let outcome = process_requests(&suppliers, &receivers, &EngineConfig::default())
            .expect("default config is valid");
        assert_eq!(outcome.ranked_matches.len(), 1);
        let m = &outcome.ranked_matches[0];
        assert_eq!(m.scores.material_score, 1.0);
        assert!(m.scores.compatibility_score > 90.0);
        assert_eq!(m.economics.matched_quantity_tons, 125.0);
    }

    #[test]
    fn pipeline_error_wraps_both_stages() {
        let bad_portal = PortalConfig {
            weeks_per_month: -1.0,
            ..PortalConfig::default()
        };
        let err = process_portal_submissions(
            &[],
            &bad_portal,
            &EngineConfig::default(),
            &NullGeocoder,
        )
        .expect_err("portal config must be rejected");
        assert!(matches!(err, PipelineError::Portal(_)));

        let bad_engine = EngineConfig {
            max_cycle_len: 0,
            ..EngineConfig::default()
        };
        let err = process_portal_submissions(
            &[],
            &PortalConfig::default(),
            &bad_engine,
            &NullGeocoder,
        )
        .expect_err("engine config must be rejected");
        assert!(matches!(err, PipelineError::Match(_)));
        assert!(err.to_string().contains("max_cycle_len"));
    }
}
