use crossbeam::epoch;
use crossbeam::epoch::default_collector;
use crossbeam_skiplist::SkipList;
use engine_core::prelude::*;
use std::sync::Arc;
use std::time::Duration;

/// Routes `tracing` events through the test harness's captured output
/// instead of stdout, so `cargo test -- --nocapture` shows the engine's
/// debug logs alongside assertion failures. Safe to call from every
/// test: `try_init` is a no-op once a global subscriber is set.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// An Engine with a sweep interval long enough that the background
/// sweeper never fires mid-test, so assertions see only the effects of
/// explicit `place`/`cancel` calls.
pub fn engine() -> Engine {
    engine_with_sweep_interval(Duration::from_secs(3600))
}

/// An Engine whose sweeper wakes on the given interval, for tests that
/// exercise the background sweep/re-match pass directly.
pub fn engine_with_sweep_interval(interval: Duration) -> Engine {
    init_tracing();
    Engine::with_sweep_interval(
        Arc::new(MonotonicCounter::new()),
        Arc::new(NullTransactionSink),
        interval,
    )
}

/// A funded trader with the given starting balance.
pub fn trader(id: u64, balance: u64) -> Arc<Trader> {
    Arc::new(Trader::new(id, balance))
}

#[test]
fn test_skiplist_next_when_delete() {
    let list = SkipList::new(default_collector().clone());
    let guard = &epoch::pin();
    let _entry1 = list.get_or_insert(1, 1, guard);
    let entry2 = list.get_or_insert(2, 2, guard);
    let _entry3 = list.get_or_insert(3, 3, guard);

    let front = list.front(guard).unwrap();
    entry2.remove(guard);
    let next = front.next().unwrap();
    let tail = next.next();

    assert_eq!(front.key(), &1);
    assert_eq!(next.key(), &3);
    assert!(tail.is_none());
}
