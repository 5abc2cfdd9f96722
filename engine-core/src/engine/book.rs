use crate::engine::order::Order;
use crate::engine::types::{BookKey, OrderId, Side};
use crossbeam::epoch;
use crossbeam_skiplist::SkipList;
use flurry::HashMap;
use std::sync::Arc;

/// A priority-ordered multiset of live Orders for one side of the
/// instrument, plus a secondary index from exchange-id to the order's
/// key in the primary ordering.
///
/// The two structures are coupled by invariant: every exchange-id in the
/// index refers to a live entry in the skip list, and ids are unique
/// within one Book. `crossbeam_skiplist::SkipList` gives lock-free,
/// epoch-reclaimed priority ordering; `flurry::HashMap` gives the
/// lock-free secondary index from exchange-id to that order's slot.
pub struct Book {
    side: Side,
    orders: SkipList<BookKey, Arc<Order>>,
    index: HashMap<OrderId, BookKey>,
}

/// Why an `insert` was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertError {
    /// An order with this exchange-id is already indexed in this Book
    /// (even if that prior order is terminal but not yet swept).
    DuplicateExchangeId,
}

impl Book {
    /// Creates an empty Book for one side of the instrument.
    pub fn new(side: Side) -> Self {
        Self {
            side,
            orders: SkipList::new(epoch::default_collector().clone()),
            index: HashMap::new(),
        }
    }

    /// The side this Book holds.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Inserts an order. Rejects a duplicate exchange-id without
    /// touching the existing entry.
    pub fn insert(&self, order: Arc<Order>) -> Result<(), InsertError> {
        let guard = &epoch::pin();
        let index = self.index.pin();

        if index.contains_key(&order.exchange_id) {
            return Err(InsertError::DuplicateExchangeId);
        }

        let key = order.book_key();
        self.orders.insert(key, order.clone(), guard);
        index.insert(order.exchange_id, key);
        Ok(())
    }

    /// Locates the order via the secondary index, acquires its
    /// per-order lock and sets `cancelled`.
    ///
    /// Returns whether the order was live (had non-zero remaining
    /// quantity) at the moment of cancellation; an unknown exchange-id
    /// also yields `false` so both map to `cancel_reject` at the Engine
    /// layer.
    pub fn cancel_by_id(&self, exchange_id: OrderId) -> bool {
        let guard = &epoch::pin();
        let index = self.index.pin();

        let Some(key) = index.get(&exchange_id).copied() else {
            return false;
        };
        let Some(entry) = self.orders.get(&key, guard) else {
            return false;
        };

        entry.value().cancel()
    }

    /// Looks up a live-or-unswept order by exchange-id without
    /// mutating it.
    pub fn get(&self, exchange_id: OrderId) -> Option<Arc<Order>> {
        let guard = &epoch::pin();
        let index = self.index.pin();
        let key = index.get(&exchange_id).copied()?;
        self.orders.get(&key, guard).map(|e| e.value().clone())
    }

    /// Removes every terminal order and its secondary-index entry. A
    /// no-op for live orders.
    pub fn sweep(&self) {
        let guard = &epoch::pin();
        let index = self.index.pin();

        let mut entry = self.orders.front(guard);
        while let Some(e) = entry {
            let order = e.value();
            if order.is_terminal() {
                index.remove(&order.exchange_id);
                e.remove();
            }
            entry = e.next();
        }
    }

    /// Returns a snapshot of live-or-unswept orders in current priority
    /// order.
    ///
    /// Taking the snapshot holds shared access to the skip list only for
    /// the duration of the walk; individual orders may still transition
    /// to terminal concurrently afterward and must be examined under
    /// their own lock by the caller.
    pub fn snapshot_priority(&self) -> Vec<Arc<Order>> {
        let guard = &epoch::pin();
        let mut out = Vec::new();
        let mut entry = self.orders.front(guard);
        while let Some(e) = entry {
            out.push(e.value().clone());
            entry = e.next();
        }
        out
    }

    /// The best (highest-priority) live order on this side, if any.
    pub fn best(&self) -> Option<Arc<Order>> {
        let guard = &epoch::pin();
        self.orders.front(guard).map(|e| e.value().clone())
    }

    /// Number of entries currently indexed (live or not-yet-swept).
    pub fn len(&self) -> usize {
        self.index.pin().len()
    }

    /// True when the Book holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
