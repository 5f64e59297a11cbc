// Metrics hooks for the `sym_match` crate.
//
// Callers install a global `EngineMetrics` implementation via
// [`set_engine_metrics`], then `process_requests` reports per-invocation
// latency and result counts. This keeps instrumentation decoupled from any
// specific metrics backend.
use std::sync::{Arc, RwLock};
use std::time::Duration;

use once_cell::sync::OnceCell;

/// Metrics observer for engine invocations.
pub trait EngineMetrics: Send + Sync {
    /// Record the outcome of one `process_requests` call.
    ///
    /// `supplier_count`/`receiver_count` are the input sizes, `latency` is
    /// the wall-clock duration of the invocation, and
    /// `match_count`/`cycle_count` are the result sizes after filtering
    /// and cycle evaluation.
    fn record_run(
        &self,
        supplier_count: usize,
        receiver_count: usize,
        latency: Duration,
        match_count: usize,
        cycle_count: usize,
    );
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn EngineMetrics>>> {
    static METRICS: OnceCell<RwLock<Option<Arc<dyn EngineMetrics>>>> = OnceCell::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

pub(crate) fn metrics_recorder() -> Option<Arc<dyn EngineMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

/// Install or clear the global engine metrics recorder.
///
/// Typically called once during service startup so every invocation shares
/// the same metrics backend. The recorder observes; it never influences
/// results.
pub fn set_engine_metrics(recorder: Option<Arc<dyn EngineMetrics>>) {
    let lock = metrics_lock();
    let mut guard = lock.write().expect("engine metrics lock poisoned");
    *guard = recorder;
}
