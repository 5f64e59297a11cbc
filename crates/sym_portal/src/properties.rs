//! Checkbox and keyword property mapping.
//!
//! The portal captures physical properties as fixed checkbox selections
//! and a few keyword fields. Generators get concrete value strings
//! (what the material *is*); receivers get typed requirements (what the
//! material *must be*). The two vocabularies intentionally meet on shared
//! canonical keys (`moisture`, `density`, `hazard`, ...) so the scorer can
//! line them up.

use std::collections::{BTreeMap, BTreeSet};

use once_cell::sync::Lazy;
use regex::Regex;
use sym_requirement::{PropertyRequirement, Requirement};

static MICRON_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(<=|>=|<|>)?\s*(\d+(\.\d+)?)\s*(microns|micron|µm)")
        .expect("micron pattern is valid")
});

fn selection_set(selections: &[String]) -> BTreeSet<String> {
    selections
        .iter()
        .map(|s| s.trim().to_ascii_lowercase())
        .collect()
}

/// Maps generator checkbox selections to concrete property values.
pub(crate) fn generator_properties(selections: &[String]) -> BTreeMap<String, String> {
    let set = selection_set(selections);
    let mut out = BTreeMap::new();
    if set.contains("ph neutral") {
        out.insert("pH".to_string(), "6.8-7.2".to_string());
    }
    if set.contains("moisture <10%") {
        out.insert("moisture".to_string(), "<10%".to_string());
    }
    if set.contains("non-hazardous") {
        out.insert("hazard".to_string(), "non-hazardous".to_string());
    }
    if set.contains("flammable") {
        out.insert("flammable".to_string(), "yes".to_string());
    }
    if set.contains("high density") {
        out.insert("density".to_string(), "high".to_string());
    }
    if set.contains("fine particles") {
        out.insert("particle_size".to_string(), "<100".to_string());
    }
    out
}

/// Maps receiver checkbox selections to typed property requirements.
pub(crate) fn receiver_properties(selections: &[String]) -> BTreeMap<String, PropertyRequirement> {
    let set = selection_set(selections);
    let mut out = BTreeMap::new();
    if set.contains("high density") {
        out.insert(
            "density".to_string(),
            PropertyRequirement::Label("high".to_string()),
        );
    }
    if set.contains("low moisture") {
        out.insert(
            "moisture".to_string(),
            PropertyRequirement::Numeric(Requirement::Lt(10.0)),
        );
    }
    if set.contains("neutral ph") {
        out.insert(
            "pH".to_string(),
            PropertyRequirement::Numeric(Requirement::Range(6.8, 7.2)),
        );
    }
    if set.contains("fine powder") {
        out.insert(
            "particle_size".to_string(),
            PropertyRequirement::Numeric(Requirement::Lt(100.0)),
        );
    }
    if set.contains("non-toxic") {
        out.insert(
            "hazard".to_string(),
            PropertyRequirement::Label("non-hazardous".to_string()),
        );
    }
    out
}

/// Maps a temperature keyword field to a numeric requirement (°C).
pub(crate) fn temperature_requirement(text: &str) -> Option<Requirement> {
    let lower = text.trim().to_ascii_lowercase();
    if lower.is_empty() {
        return None;
    }
    if lower.contains("ambient") {
        Some(Requirement::Range(20.0, 30.0))
    } else if lower.contains("25–35") || lower.contains("25-35") {
        Some(Requirement::Range(25.0, 35.0))
    } else if lower.contains("cold") {
        Some(Requirement::Range(0.0, 10.0))
    } else if lower.contains("hot") {
        Some(Requirement::Gt(50.0))
    } else {
        None
    }
}

/// Parses a combined particle-size / viscosity field.
pub(crate) fn particle_or_viscosity(text: &str) -> BTreeMap<String, PropertyRequirement> {
    let mut out = BTreeMap::new();
    if let Some(caps) = MICRON_RE.captures(text) {
        if let Ok(value) = caps[2].parse::<f64>() {
            let requirement = match caps.get(1).map(|m| m.as_str()) {
                Some(">") | Some(">=") => Requirement::Gt(value),
                // An undecorated size reads as an upper bound.
                _ => Requirement::Lt(value),
            };
            out.insert(
                "particle_size".to_string(),
                PropertyRequirement::Numeric(requirement),
            );
        }
    }
    let lower = text.to_ascii_lowercase();
    if lower.contains("low viscosity") {
        out.insert(
            "viscosity".to_string(),
            PropertyRequirement::Label("low".to_string()),
        );
    }
    if lower.contains("high viscosity") {
        out.insert(
            "viscosity".to_string(),
            PropertyRequirement::Label("high".to_string()),
        );
    }
    out
}

/// Maps an odor/color tolerance selection to a label requirement.
pub(crate) fn odor_tolerance(text: &str) -> Option<PropertyRequirement> {
    let lower = text.trim().to_ascii_lowercase();
    if lower.contains("no odor") {
        Some(PropertyRequirement::Label("no odor".to_string()))
    } else if lower.contains("slight") {
        Some(PropertyRequirement::Label("slight".to_string()))
    } else {
        None
    }
}
