//! The matching engine: hard filters, scoring, economics, ranking, and
//! exchange-loop evaluation.
//!
//! Every function here is a pure computation over canonical records and an
//! explicit [`EngineConfig`]; the engine never mutates its inputs, touches
//! the network, or keeps state between invocations. Determinism is load
//! bearing: ordered containers, fully specified sort keys, and canonical
//! cycles guarantee identical output for identical input.

use std::collections::BTreeMap;
use std::time::Instant;

use sym_cycles::find_cycles;
use sym_portal::{MaterialRequirement, ReceiverRecord, SupplierRecord, WasteOutput};
use sym_requirement::parse_actual_value;
use tracing::{debug, info, span, Level};

use crate::metrics::metrics_recorder;
use crate::types::{
    CycleEdge, CycleRecord, EngineConfig, MatchEconomics, MatchError, MatchOutcome, MatchRecord,
    MatchScores,
};


// Compatibility blend weights; material fit dominates.
const MATERIAL_WEIGHT: f64 = 0.50;
const DISTANCE_WEIGHT: f64 = 0.30;
const QUANTITY_WEIGHT: f64 = 0.20;

/// Runs the full engine: rank all feasible pairs, then surface closed
/// exchange loops among the high-confidence matches.
///
/// This is the primary entry point. The only reportable failure is an
/// invalid configuration; malformed records degrade to hard-filter
/// rejections or neutral scores.
pub fn process_requests(
    suppliers: &[SupplierRecord],
    receivers: &[ReceiverRecord],
    cfg: &EngineConfig,
) -> Result<MatchOutcome, MatchError> {
    cfg.validate()?;
    let start = Instant::now();
    let span = span!(
        Level::INFO,
        "engine.process",
        suppliers = suppliers.len(),
        receivers = receivers.len()
    );
    let _guard = span.enter();

    let ranked_matches = compute_ranked_matches(suppliers, receivers, cfg);
    let graph = build_match_graph(&ranked_matches, cfg.cycle_threshold);
    let cycles = find_cycles(&graph, cfg.max_cycle_len);
    let detected_cycles = evaluate_cycles(&cycles, &ranked_matches);

    let elapsed_micros = start.elapsed().as_micros() as u64;
    info!(
        matches = ranked_matches.len(),
        cycles = detected_cycles.len(),
        elapsed_micros,
        "engine_run"
    );
    if let Some(recorder) = metrics_recorder() {
        recorder.record_run(
            suppliers.len(),
            receivers.len(),
            start.elapsed(),
            ranked_matches.len(),
            detected_cycles.len(),
        );
    }

    Ok(MatchOutcome {
        ranked_matches,
        detected_cycles,
    })
}

/// Scores every supplier×receiver pair that survives the hard filters and
/// returns them ranked: compatibility first, eco-efficiency as tie-break,
/// both descending. The sort is stable, so identical input order always
/// yields identical output order.
pub fn compute_ranked_matches(
    suppliers: &[SupplierRecord],
    receivers: &[ReceiverRecord],
    cfg: &EngineConfig,
) -> Vec<MatchRecord> {
    let mut matches = Vec::new();
    for supplier in suppliers {
        for receiver in receivers {
            if !cfg.allow_self_matches && supplier.id == receiver.id {
                continue;
            }
            if !material_types_match(supplier, receiver) {
                continue;
            }
            // Unresolved coordinates read as infinite distance.
            let Some(distance_km) = pair_distance(supplier, receiver) else {
                continue;
            };
            let max_distance_km = receiver.logistics.max_distance_km;
            if distance_km > max_distance_km {
                continue;
            }
            if !certifications_satisfied(supplier, receiver) {
                continue;
            }

            let scores = compute_scores(supplier, receiver, distance_km, max_distance_km);
            let economics = evaluate_economics(supplier, receiver, distance_km, cfg);
            matches.push(MatchRecord {
                supplier_id: supplier.id.clone(),
                supplier_name: supplier.name.clone(),
                receiver_id: receiver.id.clone(),
                receiver_name: receiver.name.clone(),
                material_type: supplier.waste_output.material_type.clone(),
                distance_km,
                max_distance_km,
                scores,
                economics,
            });
        }
    }
    matches.sort_by(|a, b| {
        b.scores
            .compatibility_score
            .total_cmp(&a.scores.compatibility_score)
            .then_with(|| {
                b.economics
                    .eco_efficiency_score
                    .total_cmp(&a.economics.eco_efficiency_score)
            })
    });
    matches
}

/// Mean per-key satisfaction of the receiver's composition and property
/// requirements, in [0, 1]. An empty requirement set constrains nothing
/// and scores 1.0.
pub fn material_score(output: &WasteOutput, requirement: &MaterialRequirement) -> f64 {
    let key_count =
        requirement.required_composition.len() + requirement.required_properties.len();
    if key_count == 0 {
        return 1.0;
    }
    let mut total = 0.0;
    for (key, req) in &requirement.required_composition {
        let actual = output
            .chemical_composition
            .get(key)
            .map(String::as_str)
            .and_then(parse_actual_value);
        total += req.score(actual);
    }
    for (key, prop_req) in &requirement.required_properties {
        total += prop_req.score(output.physical_properties.get(key).map(String::as_str));
    }
    total / key_count as f64
}

fn material_types_match(supplier: &SupplierRecord, receiver: &ReceiverRecord) -> bool {
    let offered = supplier.waste_output.material_type.trim().to_lowercase();
    let wanted = receiver
        .material_requirement
        .material_type
        .trim()
        .to_lowercase();
    !offered.is_empty() && offered == wanted
}

fn pair_distance(supplier: &SupplierRecord, receiver: &ReceiverRecord) -> Option<f64> {
    match (supplier.location.as_ref(), receiver.location.as_ref()) {
        (Some(from), Some(to)) => Some(from.haversine_km(to)),
        _ => None,
    }
}

fn certifications_satisfied(supplier: &SupplierRecord, receiver: &ReceiverRecord) -> bool {
    receiver
        .certifications_required
        .is_subset(&supplier.certifications)
}

fn distance_score(distance_km: f64, max_distance_km: f64) -> f64 {
    if max_distance_km <= 0.0 {
        return 0.0;
    }
    (1.0 - distance_km / max_distance_km).clamp(0.0, 1.0)
}

fn quantity_score(supplier_qty: f64, receiver_qty: f64) -> f64 {
    if receiver_qty <= 0.0 {
        return 1.0;
    }
    (supplier_qty.min(receiver_qty) / receiver_qty).clamp(0.0, 1.0)
}

fn compute_scores(
    supplier: &SupplierRecord,
    receiver: &ReceiverRecord,
    distance_km: f64,
    max_distance_km: f64,
) -> MatchScores {
    let material = material_score(&supplier.waste_output, &receiver.material_requirement);
    let distance = distance_score(distance_km, max_distance_km);
    let quantity = quantity_score(
        supplier.waste_output.quantity_tons,
        receiver.material_requirement.quantity_tons,
    );
    MatchScores {
        material_score: material,
        distance_score: distance,
        quantity_score: quantity,
        compatibility_score: 100.0
            * (MATERIAL_WEIGHT * material + DISTANCE_WEIGHT * distance + QUANTITY_WEIGHT * quantity),
    }
}

fn evaluate_economics(
    supplier: &SupplierRecord,
    receiver: &ReceiverRecord,
    distance_km: f64,
    cfg: &EngineConfig,
) -> MatchEconomics {
    let supplier_qty = supplier.waste_output.quantity_tons;
    let receiver_qty = receiver.material_requirement.quantity_tons;
    let matched_quantity_tons = supplier_qty.min(receiver_qty);

    let transport_cost = distance_km * matched_quantity_tons * cfg.cost_per_ton_km;
    let total_cost = transport_cost
        + receiver.material_requirement.processing_cost_per_ton * matched_quantity_tons;

    // Avoided landfill haulage minus the new exchange haulage, plus the
    // virgin-material substitution credit.
    let landfill_emissions = supplier.waste_output.current_disposal_landfill_km
        * supplier_qty
        * cfg.truck_emission_kg_per_ton_km;
    let exchange_emissions =
        distance_km * matched_quantity_tons * cfg.truck_emission_kg_per_ton_km;
    let substitution_savings = matched_quantity_tons * cfg.substitution_savings_kg_per_ton;
    let co2_saved_kg = (landfill_emissions - exchange_emissions) + substitution_savings;

    let eco_efficiency_score = if total_cost > 0.0 {
        co2_saved_kg / total_cost
    } else {
        f64::INFINITY
    };

    MatchEconomics {
        matched_quantity_tons,
        transport_cost,
        total_cost,
        co2_saved_kg,
        eco_efficiency_score,
    }
}

/// Thresholds ranked matches into a directed supplier→receiver graph.
///
/// Only matches scoring strictly above `threshold` become edges; edge
/// targets are present as nodes even when they have no outgoing edges.
pub fn build_match_graph(
    matches: &[MatchRecord],
    threshold: f64,
) -> BTreeMap<String, Vec<String>> {
    let mut graph: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for m in matches {
        if m.scores.compatibility_score > threshold {
            if m.supplier_id.is_empty() || m.receiver_id.is_empty() {
                continue;
            }
            graph
                .entry(m.supplier_id.clone())
                .or_default()
                .push(m.receiver_id.clone());
            graph.entry(m.receiver_id.clone()).or_default();
        }
    }
    graph
}

/// Evaluates canonical cycles against the ranked-match edge map.
///
/// A cycle referencing any edge that is not among the ranked matches is
/// dropped whole; surviving cycles aggregate cost and CO₂ across their
/// edges and are ranked by aggregate eco-efficiency, descending.
pub fn evaluate_cycles(cycles: &[Vec<String>], matches: &[MatchRecord]) -> Vec<CycleRecord> {
    let edge_map: BTreeMap<(&str, &str), &MatchRecord> = matches
        .iter()
        .map(|m| ((m.supplier_id.as_str(), m.receiver_id.as_str()), m))
        .collect();

    let mut evaluated = Vec::new();
    'cycles: for cycle in cycles {
        let mut edges = Vec::with_capacity(cycle.len());
        let mut aggregate_total_cost = 0.0;
        let mut aggregate_co2_saved_kg = 0.0;
        for i in 0..cycle.len() {
            let from = cycle[i].as_str();
            let to = cycle[(i + 1) % cycle.len()].as_str();
            let Some(edge) = edge_map.get(&(from, to)) else {
                debug!(from, to, "cycle references an unranked edge; dropped");
                continue 'cycles;
            };
            aggregate_total_cost += edge.economics.total_cost;
            aggregate_co2_saved_kg += edge.economics.co2_saved_kg;
            edges.push(CycleEdge {
                from: from.to_string(),
                to: to.to_string(),
                compatibility_score: edge.scores.compatibility_score,
                eco_efficiency_score: edge.economics.eco_efficiency_score,
            });
        }
        if edges.is_empty() {
            continue;
        }
        let aggregate_eco_efficiency_score = if aggregate_total_cost > 0.0 {
            aggregate_co2_saved_kg / aggregate_total_cost
        } else {
            f64::INFINITY
        };
        evaluated.push(CycleRecord {
            cycle_nodes: cycle.clone(),
            edges,
            aggregate_total_cost,
            aggregate_co2_saved_kg,
            aggregate_eco_efficiency_score,
        });
    }
    evaluated.sort_by(|a, b| {
        b.aggregate_eco_efficiency_score
            .total_cmp(&a.aggregate_eco_efficiency_score)
    });
    evaluated
}
