use crate::engine::error::EngineError;
use crate::engine::trader::Trader;
use crate::engine::types::{BookKey, OrderId, Price, Quantity, Side, Timestamp};
use std::sync::{Arc, Mutex, MutexGuard};

/// Mutable pair guarded by an Order's lock: remaining quantity and the
/// one-shot cancel flag. Quantity only ever decreases; `cancelled` only
/// ever flips from `false` to `true`.
#[derive(Debug)]
pub struct OrderMutState {
    pub quantity_remaining: Quantity,
    pub cancelled: bool,
}

/// An Order's immutable header plus its mutable state behind one
/// embedded mutex.
///
/// The mutex is never replaced or moved once the Order is inserted into
/// a Book: callers hold it via `Arc<Order>`, so the skip list entry and
/// any outstanding reference see the same lock.
#[derive(Debug)]
pub struct Order {
    pub client: Arc<Trader>,
    pub exchange_id: OrderId,
    pub side: Side,
    pub is_market: bool,
    pub limit_price: Price,
    pub timestamp: Timestamp,
    state: Mutex<OrderMutState>,
}

impl Order {
    /// Creates a new limit order.
    pub fn limit(
        client: Arc<Trader>,
        exchange_id: OrderId,
        side: Side,
        limit_price: Price,
        quantity: Quantity,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            client,
            exchange_id,
            side,
            is_market: false,
            limit_price,
            timestamp,
            state: Mutex::new(OrderMutState {
                quantity_remaining: quantity,
                cancelled: false,
            }),
        }
    }

    /// Creates a new market order. The limit price is replaced with a
    /// sentinel that simplifies crossing comparisons: 0 for Sell,
    /// `Price::MAX` for Buy.
    pub fn market(
        client: Arc<Trader>,
        exchange_id: OrderId,
        side: Side,
        quantity: Quantity,
        timestamp: Timestamp,
    ) -> Self {
        let limit_price = match side {
            Side::Buy => Price::MAX,
            Side::Sell => 0,
        };
        Self {
            client,
            exchange_id,
            side,
            is_market: true,
            limit_price,
            timestamp,
            state: Mutex::new(OrderMutState {
                quantity_remaining: quantity,
                cancelled: false,
            }),
        }
    }

    /// Locks the mutable state for inspection or mutation.
    pub fn lock(&self) -> MutexGuard<'_, OrderMutState> {
        self.state.lock().expect("order mutex poisoned")
    }

    /// Snapshot of the remaining quantity.
    pub fn quantity_remaining(&self) -> Quantity {
        self.lock().quantity_remaining
    }

    /// Snapshot of the cancel flag.
    pub fn is_cancelled(&self) -> bool {
        self.lock().cancelled
    }

    /// An Order is terminal when fully filled or cancelled; terminal
    /// orders never participate in matching and are removed on the next
    /// sweep.
    pub fn is_terminal(&self) -> bool {
        let state = self.lock();
        state.quantity_remaining == 0 || state.cancelled
    }

    /// Sets the cancel flag. Returns whether the order was live (had
    /// nonzero remaining quantity) at the moment of cancellation; used
    /// by the Engine to decide `cancel_ack` vs `cancel_reject`.
    pub fn cancel(&self) -> bool {
        let mut state = self.lock();
        let was_live = state.quantity_remaining > 0 && !state.cancelled;
        state.cancelled = true;
        was_live
    }

    /// The price this Order trades at for crossing/pricing purposes: the
    /// live market-price estimate for market orders, its own limit price
    /// otherwise.
    pub fn effective_price(&self, market_price: Price) -> Price {
        if self.is_market {
            market_price
        } else {
            self.limit_price
        }
    }

    /// The priority key this Order occupies in its Book.
    pub fn book_key(&self) -> BookKey {
        BookKey {
            is_market: self.is_market,
            price: self.limit_price,
            timestamp: self.timestamp,
            side: self.side,
        }
    }

    /// Decrements `quantity_remaining` by `by`. Decrementing past zero is
    /// a programming error and is fatal: callers must only ever ask for
    /// at most the currently-held lock's remaining quantity, which the
    /// matcher's `min()` guards against.
    pub(crate) fn decrement_locked(state: &mut OrderMutState, by: Quantity) {
        if by > state.quantity_remaining {
            std::panic::panic_any(EngineError::QuantityUnderflow {
                remaining: state.quantity_remaining,
                requested: by,
            });
        }
        state.quantity_remaining -= by;
    }
}
