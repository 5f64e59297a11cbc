//! # Symbio Portal Adapter
//!
//! This is where facility data enters the matching pipeline. We take one
//! heterogeneous portal submission (free-text quantities, checkbox
//! property lists, prose certification fields, an address or explicit
//! coordinates) and normalize it into the canonical supplier/receiver
//! records the engine scores.
//!
//! ## What we do here
//!
//! - **Resolve locations** - Explicit lat/lon wins; otherwise an injected
//!   [`Geocoder`] gets a shot at the free-text address. Unresolved stays
//!   unresolved (the pair later fails the distance gate, nothing crashes).
//! - **Normalize quantities** - kg/ton units and day/week/month cadences
//!   all become tons-per-week.
//! - **Parse chemistry** - Composition and requirement free text become
//!   typed key→value / key→requirement maps.
//! - **Map checkboxes** - Fixed property selections become canonical
//!   property keys shared by both roles.
//! - **Derive ids** - Facilities without an id get a stable synthetic one
//!   from their name plus a role prefix.
//!
//! Everything is best-effort: unparseable fragments drop or default with a
//! log line, never an error. A malformed submission yields an empty
//! facility, not a failed batch.
//!
//! ## Example
//!
//! ```
//! use sym_portal::{adapt_submission, Coordinates, PortalConfig, RawFacilitySubmission};
//!
//! let raw: RawFacilitySubmission = serde_json::from_value(serde_json::json!({
//!     "COMMON": {
//!         "Factory Name": "Alpha Thermal Power",
//!         "Factory Type": "Waste Generator",
//!         "Location": {"lat": 13.0827, "lon": 80.2707}
//!     },
//!     "GENERATOR": {
//!         "Waste Type Name": "Fly Ash",
//!         "Quantity Generated": "150 tons per week",
//!         "Waste Composition": "55% SiO2, 5% Fe2O3"
//!     }
//! })).unwrap();
//!
//! let geocode = |_: &str| -> Option<Coordinates> { None };
//! let adapted = adapt_submission(&raw, &PortalConfig::default(), &geocode);
//! let supplier = adapted.supplier.expect("generator role yields a supplier");
//! assert_eq!(supplier.waste_output.material_type, "Fly Ash");
//! assert_eq!(supplier.waste_output.quantity_tons, 150.0);
//! ```

use std::time::Instant;

use tracing::{debug, info, span, Level};

mod certs;
mod composition;
mod config;
mod ident;
mod location;
mod properties;
mod quantity;
mod types;

pub use crate::certs::parse_certifications;
pub use crate::composition::{parse_composition_text, parse_requirement_text};
pub use crate::config::{ConfigError, PortalConfig};
pub use crate::location::{Geocoder, NullGeocoder};
pub use crate::quantity::normalize_quantity;
pub use crate::types::{
    CommonSection, Coordinates, FacilityRole, GeneratorSection, Logistics, LocationInput,
    MaterialRequirement, RawFacilitySubmission, ReceiverRecord, ReceiverSection, SupplierRecord,
    WasteOutput,
};

use crate::ident::derive_facility_id;
use crate::location::resolve_location;
use sym_requirement::{PropertyRequirement, Requirement};

/// The canonical records one submission produced: zero, one, or both.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdaptedFacility {
    pub supplier: Option<SupplierRecord>,
    pub receiver: Option<ReceiverRecord>,
}

/// Adapts one raw submission into canonical records.
///
/// The declared factory type picks the role; with no (or an unrecognized)
/// declaration, each present section yields its record, so a facility can
/// be both a supplier and a receiver.
pub fn adapt_submission(
    raw: &RawFacilitySubmission,
    cfg: &PortalConfig,
    geocoder: &dyn Geocoder,
) -> AdaptedFacility {
    let name = raw.common.facility_name.clone().unwrap_or_default();
    let span = span!(Level::DEBUG, "portal.adapt", facility = %name);
    let _guard = span.enter();

    let role = FacilityRole::parse(raw.common.facility_type.as_deref());
    let mut adapted = AdaptedFacility::default();
    match role {
        FacilityRole::Generator => {
            adapted.supplier = supplier_from_submission(raw, cfg, geocoder);
        }
        FacilityRole::Receiver => {
            adapted.receiver = receiver_from_submission(raw, cfg, geocoder);
        }
        FacilityRole::Unspecified => {
            // Multi-role facilities submit both sections in one record.
            adapted.supplier = supplier_from_submission(raw, cfg, geocoder);
            adapted.receiver = receiver_from_submission(raw, cfg, geocoder);
        }
    }
    debug!(
        supplier = adapted.supplier.is_some(),
        receiver = adapted.receiver.is_some(),
        "submission adapted"
    );
    adapted
}

/// Adapts a batch of submissions into supplier and receiver lists,
/// preserving submission order.
pub fn adapt_submissions(
    records: &[RawFacilitySubmission],
    cfg: &PortalConfig,
    geocoder: &dyn Geocoder,
) -> (Vec<SupplierRecord>, Vec<ReceiverRecord>) {
    let start = Instant::now();
    let mut suppliers = Vec::new();
    let mut receivers = Vec::new();
    for raw in records {
        let adapted = adapt_submission(raw, cfg, geocoder);
        suppliers.extend(adapted.supplier);
        receivers.extend(adapted.receiver);
    }
    info!(
        submissions = records.len(),
        suppliers = suppliers.len(),
        receivers = receivers.len(),
        elapsed_micros = start.elapsed().as_micros() as u64,
        "portal batch adapted"
    );
    (suppliers, receivers)
}

fn supplier_from_submission(
    raw: &RawFacilitySubmission,
    cfg: &PortalConfig,
    geocoder: &dyn Geocoder,
) -> Option<SupplierRecord> {
    let section = raw.generator.as_ref()?;
    let name = raw.common.facility_name.clone().unwrap_or_default();

    let material_type = section
        .waste_type_name
        .clone()
        .or_else(|| section.waste_category.clone())
        .unwrap_or_else(|| "Unknown".to_string());

    let chemical_composition =
        parse_composition_text(section.waste_composition.as_deref().unwrap_or(""));

    let mut physical_properties = properties::generator_properties(&section.waste_properties);
    if let Some(storage) = &section.storage_condition {
        let storage = storage.trim().to_ascii_lowercase();
        if !storage.is_empty() {
            physical_properties.insert("storage".to_string(), storage);
        }
    }
    if section
        .hazard_rating
        .as_deref()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
        .starts_with("non-hazard")
    {
        physical_properties.insert("hazard".to_string(), "non-hazardous".to_string());
    }

    let quantity_tons = normalize_quantity(
        section.quantity_generated.as_deref(),
        section.generation_frequency.as_deref(),
        cfg,
    );

    Some(SupplierRecord {
        id: raw
            .facility_id
            .clone()
            .unwrap_or_else(|| derive_facility_id(&name, "GEN", cfg)),
        name,
        industry: raw.common.industry.clone().unwrap_or_default(),
        location: resolve_location(raw.common.location.as_ref(), geocoder),
        waste_output: WasteOutput {
            material_type,
            quantity_tons,
            frequency: cfg.default_frequency.clone(),
            chemical_composition,
            physical_properties,
            current_disposal_landfill_km: section.disposal_landfill_km.unwrap_or(0.0),
        },
        certifications: parse_certifications(raw.common.certification.as_deref().unwrap_or("")),
    })
}

fn receiver_from_submission(
    raw: &RawFacilitySubmission,
    cfg: &PortalConfig,
    geocoder: &dyn Geocoder,
) -> Option<ReceiverRecord> {
    let section = raw.receiver.as_ref()?;
    let name = raw.common.facility_name.clone().unwrap_or_default();

    let material_type = section
        .raw_material_name
        .clone()
        .unwrap_or_else(|| "Unknown".to_string());

    let required_composition =
        parse_requirement_text(section.required_composition.as_deref().unwrap_or(""));

    let mut required_properties = properties::receiver_properties(&section.required_properties);
    if let Some(purity) = section.minimum_purity.as_deref() {
        let purity = purity.trim();
        if purity.ends_with('%') {
            if let Some(level) = sym_requirement::parse_numeric(purity) {
                required_properties.insert(
                    "purity".to_string(),
                    PropertyRequirement::Numeric(Requirement::Gt(level)),
                );
            }
        }
    }
    if let Some(tolerance) = section.contaminant_tolerance.as_deref() {
        if tolerance.trim_start().starts_with('<') {
            required_properties.insert(
                "contaminants".to_string(),
                PropertyRequirement::Numeric(Requirement::parse(tolerance)),
            );
        }
    }
    if let Some(form) = section.material_form.as_deref() {
        let form = form.trim().to_ascii_lowercase();
        if !form.is_empty() {
            required_properties.insert("form".to_string(), PropertyRequirement::Label(form));
        }
    }
    required_properties.extend(properties::particle_or_viscosity(
        section.particle_or_viscosity.as_deref().unwrap_or(""),
    ));
    if let Some(temperature) =
        properties::temperature_requirement(section.temperature_requirement.as_deref().unwrap_or(""))
    {
        required_properties.insert(
            "temperature".to_string(),
            PropertyRequirement::Numeric(temperature),
        );
    }
    if let Some(odor) = properties::odor_tolerance(section.odor_tolerance.as_deref().unwrap_or("")) {
        required_properties.insert("odor".to_string(), odor);
    }

    let quantity_tons = normalize_quantity(
        section.quantity_required.as_deref(),
        section.requirement_frequency.as_deref(),
        cfg,
    );

    let budget_per_ton = section
        .budget_per_ton
        .as_deref()
        .and_then(extract_first_number);

    Some(ReceiverRecord {
        id: raw
            .facility_id
            .clone()
            .unwrap_or_else(|| derive_facility_id(&name, "REC", cfg)),
        name,
        industry: raw.common.industry.clone().unwrap_or_default(),
        location: resolve_location(raw.common.location.as_ref(), geocoder),
        material_requirement: MaterialRequirement {
            material_type,
            quantity_tons,
            frequency: cfg.default_frequency.clone(),
            required_composition,
            required_properties,
            processing_cost_per_ton: 0.0,
            budget_per_ton,
        },
        logistics: Logistics {
            max_distance_km: section
                .max_distance_km
                .unwrap_or(cfg.default_max_distance_km),
        },
        certifications_required: parse_certifications(
            section.certification_needed.as_deref().unwrap_or(""),
        ),
    })
}

/// Pulls the first number out of prose like `"₹450 per ton"`.
fn extract_first_number(text: &str) -> Option<f64> {
    let mut number = String::new();
    for c in text.chars() {
        if c.is_ascii_digit() || (c == '.' && !number.is_empty()) {
            number.push(c);
        } else if !number.is_empty() {
            break;
        }
    }
    number.parse().ok()
}
