//! # Symbio Match (`sym_match`)
//!
//! ## Purpose
//!
//! `sym_match` sits on top of the canonical facility records produced by
//! `sym_portal` (or constructed directly) and is responsible for the whole
//! matching pass: hard-filtering infeasible pairs, scoring the survivors
//! on material, distance, and quantity fit, estimating cost and CO₂
//! impact, ranking deterministically, and surfacing closed exchange loops
//! among the high-confidence matches via `sym_cycles`.
//!
//! In a typical deployment you will:
//! - Use `sym_portal` to normalize raw submissions into
//!   `SupplierRecord`/`ReceiverRecord` values.
//! - Call [`process_requests`] with those records and an [`EngineConfig`]
//!   to obtain ranked matches and detected cycles.
//!
//! ## Core Types
//!
//! - [`EngineConfig`]: per-invocation tunables (transport cost, emission
//!   factor, substitution credit, the cycle threshold and depth bound).
//! - [`MatchRecord`]: one feasible pairing with its [`MatchScores`] and
//!   [`MatchEconomics`].
//! - [`CycleRecord`]: a closed loop over ranked matches with aggregate
//!   cost, CO₂, and eco-efficiency.
//! - [`MatchOutcome`]: ranked matches plus detected cycles.
//! - [`EngineMetrics`]: optional observer hook for instrumentation.
//!
//! ## Guarantees
//!
//! The engine is a pure function of its inputs: no I/O, no interior
//! mutation, no global state (the metrics recorder observes only).
//! Identical inputs and configuration always produce the identical ranked
//! order and cycle set. Cycle enumeration is depth-bounded, so even
//! adversarially dense graphs terminate.
//!
//! ## Example Usage
//!
//! ```no_run
//! use sym_match::{process_requests, EngineConfig};
//!
//! let suppliers = vec![/* SupplierRecord values */];
//! let receivers = vec![/* ReceiverRecord values */];
//!
//! let outcome = process_requests(&suppliers, &receivers, &EngineConfig::default())
//!     .expect("default config is valid");
//! for m in &outcome.ranked_matches {
//!     println!("{} -> {}: {:.1}", m.supplier_id, m.receiver_id, m.scores.compatibility_score);
//! }
//! ```

mod engine;
mod metrics;
mod types;

pub use crate::engine::{
    build_match_graph, compute_ranked_matches, evaluate_cycles, material_score, process_requests,
};
pub use crate::metrics::{set_engine_metrics, EngineMetrics};
pub use crate::types::{
    CycleEdge, CycleRecord, EngineConfig, MatchEconomics, MatchError, MatchOutcome, MatchRecord,
    MatchScores,
};
