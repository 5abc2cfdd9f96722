use thiserror::Error;

/// The closed response enum for `place`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceResponse {
    /// The order was accepted and inserted into its Book.
    NewOrderAck,
    /// The order was refused, e.g. a duplicate exchange-id.
    NewOrderReject(RejectReason),
}

/// Why a `place` call was rejected. Kept distinct from a no-trade
/// outcome: a rejection means the order was never inserted, where a
/// no-trade means it was inserted but didn't cross.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// An order with this exchange-id is already indexed in this Book.
    DuplicateExchangeId,
}

/// The closed response enum for `cancel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelResponse {
    /// The cancel flipped a live order's cancel flag.
    CancelAck,
    /// The order was unknown, or already terminal.
    CancelReject,
}

/// The one fatal, non-recoverable error class: decrementing an order's
/// quantity below zero. This is a programming error in a caller of the
/// matching primitives, not a condition the Engine's public surface can
/// encounter in correct use, which is why it is raised as a panic (via
/// `std::panic::panic_any`, see `Order::decrement_locked`) rather than
/// represented here as a `Result::Err` variant — the panic payload is
/// this type itself, not a string, so embedders that `catch_unwind`
/// around engine internals have a named error to downcast to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    /// An order's remaining quantity was decremented below zero.
    #[error("order quantity underflow: had {remaining}, asked to remove {requested}")]
    QuantityUnderflow {
        /// Quantity remaining at the time of the faulty decrement.
        remaining: u64,
        /// Quantity the caller attempted to remove.
        requested: u64,
    },
}
