//! Core data model types for the portal crate.
//!
//! Two families live here: the canonical records the matching engine
//! consumes ([`SupplierRecord`], [`ReceiverRecord`]) and the raw portal
//! submission shape ([`RawFacilitySubmission`]) the adapter normalizes.
//! Canonical records use ordered containers throughout so that every
//! iteration, and therefore every derived ranking, is deterministic.
//!
//! ```text
//! RawFacilitySubmission
//! ├── facility_id: Option<String>
//! ├── common: CommonSection (name, industry, role, location, certs)
//! ├── generator: Option<GeneratorSection>
//! ├── receiver: Option<ReceiverSection>
//! ├── submitted_at: Option<DateTime<Utc>>
//! └── attributes: Option<Value>
//!
//!         ↓ adapt_submission()
//!
//! SupplierRecord / ReceiverRecord (zero, one, or both)
//! ```

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sym_requirement::{PropertyRequirement, Requirement};

/// Mean Earth radius in kilometres for the haversine formula.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A resolved geographic position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance to `other` in kilometres (haversine).
    pub fn haversine_km(&self, other: &Coordinates) -> f64 {
        let phi1 = self.lat.to_radians();
        let phi2 = other.lat.to_radians();
        let dphi = (other.lat - self.lat).to_radians();
        let dlambda = (other.lon - self.lon).to_radians();
        let a = (dphi / 2.0).sin().powi(2)
            + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_KM * c
    }
}

/// A facility offering a waste/byproduct stream for reuse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierRecord {
    pub id: String,
    pub name: String,
    pub industry: String,
    /// `None` means the location could not be resolved; such a facility
    /// fails every distance gate rather than erroring.
    pub location: Option<Coordinates>,
    pub waste_output: WasteOutput,
    pub certifications: BTreeSet<String>,
}

/// The material a supplier has on offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasteOutput {
    pub material_type: String,
    /// Canonical unit: tons per week.
    pub quantity_tons: f64,
    /// Human-facing cadence label (`"weekly"` after normalization).
    pub frequency: String,
    /// Measured composition, key → value string (`"SiO2" → "55%"`).
    pub chemical_composition: BTreeMap<String, String>,
    /// Measured/declared physical properties, key → value string.
    pub physical_properties: BTreeMap<String, String>,
    /// Distance to the facility's current landfill disposal site.
    pub current_disposal_landfill_km: f64,
}

/// A facility seeking a raw-material input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiverRecord {
    pub id: String,
    pub name: String,
    pub industry: String,
    pub location: Option<Coordinates>,
    pub material_requirement: MaterialRequirement,
    pub logistics: Logistics,
    pub certifications_required: BTreeSet<String>,
}

/// What a receiver needs, with typed requirements parsed at the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRequirement {
    pub material_type: String,
    /// Canonical unit: tons per week.
    pub quantity_tons: f64,
    pub frequency: String,
    pub required_composition: BTreeMap<String, Requirement>,
    pub required_properties: BTreeMap<String, PropertyRequirement>,
    pub processing_cost_per_ton: f64,
    /// Parsed from portal text; informational, not used in scoring.
    pub budget_per_ton: Option<f64>,
}

/// Receiver-side logistics constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Logistics {
    pub max_distance_km: f64,
}

/// Location as submitted: explicit coordinates or a free-text address
/// that the injected geocoder resolves (or fails to).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocationInput {
    Coords { lat: f64, lon: f64 },
    Address(String),
}

/// The role a facility declared on the portal form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacilityRole {
    Generator,
    Receiver,
    /// Absent or unrecognized; each present section yields its record.
    Unspecified,
}

impl FacilityRole {
    pub fn parse(label: Option<&str>) -> FacilityRole {
        match label.unwrap_or("").trim().to_ascii_lowercase().as_str() {
            "waste generator" | "generator" => FacilityRole::Generator,
            "receiver" => FacilityRole::Receiver,
            _ => FacilityRole::Unspecified,
        }
    }
}

/// One heterogeneous portal submission, as posted by the facility UI.
///
/// Field renames carry the portal's human-readable labels so the raw JSON
/// deserializes directly. Every field is optional: the adapter is
/// best-effort and defaults whatever is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFacilitySubmission {
    #[serde(default, rename = "Factory ID")]
    pub facility_id: Option<String>,
    #[serde(default, rename = "COMMON")]
    pub common: CommonSection,
    #[serde(default, rename = "GENERATOR")]
    pub generator: Option<GeneratorSection>,
    #[serde(default, rename = "RECEIVER")]
    pub receiver: Option<ReceiverSection>,
    /// When the portal accepted the submission.
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    /// Opaque extension blob, preserved but never interpreted.
    #[serde(default)]
    pub attributes: Option<serde_json::Value>,
}

/// Fields shared by both roles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommonSection {
    #[serde(default, rename = "Factory Name")]
    pub facility_name: Option<String>,
    #[serde(default, rename = "Industry Type")]
    pub industry: Option<String>,
    #[serde(default, rename = "Factory Type")]
    pub facility_type: Option<String>,
    #[serde(default, rename = "Location")]
    pub location: Option<LocationInput>,
    #[serde(default, rename = "Certification")]
    pub certification: Option<String>,
}

/// Waste-generator form section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratorSection {
    #[serde(default, rename = "Waste Type Name")]
    pub waste_type_name: Option<String>,
    #[serde(default, rename = "Waste Category")]
    pub waste_category: Option<String>,
    /// Free text like `"55% SiO2, 5% Fe2O3"`.
    #[serde(default, rename = "Waste Composition")]
    pub waste_composition: Option<String>,
    /// Checkbox selections like `"non-hazardous"`, `"high density"`.
    #[serde(default, rename = "Waste Properties")]
    pub waste_properties: Vec<String>,
    #[serde(default, rename = "Storage Condition")]
    pub storage_condition: Option<String>,
    #[serde(default, rename = "Certification / Hazard Rating")]
    pub hazard_rating: Option<String>,
    /// Free text like `"80 t per week"` or `"500 kg per day"`.
    #[serde(default, rename = "Quantity Generated")]
    pub quantity_generated: Option<String>,
    #[serde(default, rename = "Frequency of Generation")]
    pub generation_frequency: Option<String>,
    #[serde(default, rename = "Current Disposal Distance (km)")]
    pub disposal_landfill_km: Option<f64>,
}

/// Raw-material-receiver form section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceiverSection {
    #[serde(default, rename = "Raw Material Name")]
    pub raw_material_name: Option<String>,
    /// Free text like `"SiO2 > 40%, Fe2O3 < 10%"`.
    #[serde(default, rename = "Required Chemical Composition")]
    pub required_composition: Option<String>,
    /// Checkbox selections like `"low moisture"`, `"non-toxic"`.
    #[serde(default, rename = "Required Physical Properties")]
    pub required_properties: Vec<String>,
    #[serde(default, rename = "Minimum Purity Level")]
    pub minimum_purity: Option<String>,
    #[serde(default, rename = "Contaminant Tolerance")]
    pub contaminant_tolerance: Option<String>,
    #[serde(default, rename = "Form of Material Needed")]
    pub material_form: Option<String>,
    #[serde(default, rename = "Particle Size / Viscosity")]
    pub particle_or_viscosity: Option<String>,
    #[serde(default, rename = "Temperature Requirement")]
    pub temperature_requirement: Option<String>,
    #[serde(default, rename = "Odor or Color Tolerance")]
    pub odor_tolerance: Option<String>,
    #[serde(default, rename = "Quantity Required")]
    pub quantity_required: Option<String>,
    #[serde(default, rename = "Frequency of Requirement")]
    pub requirement_frequency: Option<String>,
    #[serde(default, rename = "Budget per Ton")]
    pub budget_per_ton: Option<String>,
    #[serde(default, rename = "Max Distance (km)")]
    pub max_distance_km: Option<f64>,
    #[serde(default, rename = "Certification Needed")]
    pub certification_needed: Option<String>,
}
