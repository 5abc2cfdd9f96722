use engine_core::prelude::*;
use std::sync::Arc;

/// A funded Trader for benchmark scaffolding.
pub fn trader(id: u64, balance: u64) -> Arc<Trader> {
    Arc::new(Trader::new(id, balance))
}

/// An Engine with a sweep interval long enough that the background
/// sweeper never fires mid-benchmark, so timings reflect only the
/// `place`/`cancel` calls under measurement.
pub fn engine() -> Engine {
    Engine::with_sweep_interval(
        Arc::new(MonotonicCounter::new()),
        Arc::new(NullTransactionSink),
        std::time::Duration::from_secs(3600),
    )
}
