use crate::engine::book::Book;
use crate::engine::error::{CancelResponse, PlaceResponse, RejectReason};
use crate::engine::history::{History, Transaction};
use crate::engine::market_price;
use crate::engine::matcher;
use crate::engine::order::Order;
use crate::engine::sink::{NullTransactionSink, TransactionSink};
use crate::engine::sweeper::Sweeper;
use crate::engine::trader::Trader;
use crate::engine::types::{MonotonicCounter, OrderId, Price, Quantity, Side, TimestampSource};
use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// How often the background sweeper retires terminal orders and
/// re-runs cross-book matching, absent an explicit override.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(5);

/// A point-in-time view of one order, returned by `Engine::state_of`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSnapshot {
    pub exchange_id: OrderId,
    pub side: Side,
    pub is_market: bool,
    pub limit_price: Price,
    pub quantity_remaining: Quantity,
    pub cancelled: bool,
}

/// Shared state behind the `Engine` facade. Split out from `Engine`
/// itself so the background sweeper can hold its own `Arc` to it
/// without the self-referential cycle an `Arc<Engine>` inside `Engine`
/// would create.
struct EngineCore {
    buy_book: Book,
    sell_book: Book,
    history: History,
    market_price: AtomicU64,
    sink: Arc<dyn TransactionSink>,
    timestamps: Arc<dyn TimestampSource>,
}

impl EngineCore {
    fn book_for(&self, side: Side) -> &Book {
        match side {
            Side::Buy => &self.buy_book,
            Side::Sell => &self.sell_book,
        }
    }

    fn opposite_book(&self, side: Side) -> &Book {
        match side {
            Side::Buy => &self.sell_book,
            Side::Sell => &self.buy_book,
        }
    }

    fn current_market_price(&self) -> Price {
        self.market_price.load(Ordering::Acquire)
    }

    fn refresh_market_price(&self) {
        if let Some(price) = market_price::estimate(&self.buy_book, &self.sell_book) {
            self.market_price.store(price, Ordering::Release);
        }
    }

    /// Walks `opposite` in priority order, attempting a match against
    /// `taker` at each live candidate. Stops as soon as `taker` is
    /// exhausted or the next candidate no longer crosses: the opposite
    /// book is sorted so that is the first non-crossing candidate.
    fn match_against(&self, taker: &Arc<Order>, opposite: &Book) {
        if taker.quantity_remaining() == 0 {
            return;
        }

        let market_price = self.current_market_price();
        let taker_price = taker.effective_price(market_price);

        for candidate in opposite.snapshot_priority() {
            if taker.quantity_remaining() == 0 {
                break;
            }
            if candidate.quantity_remaining() == 0 || candidate.is_cancelled() {
                continue;
            }

            let candidate_price = candidate.effective_price(market_price);
            let crosses = match taker.side {
                Side::Buy => taker_price >= candidate_price,
                Side::Sell => taker_price <= candidate_price,
            };
            if !crosses {
                break;
            }

            let transaction = matcher::match_pair(taker, &candidate, market_price);
            if !transaction.is_empty() {
                tracing::debug!(
                    buyer = transaction.exchange_id_buyer,
                    seller = transaction.exchange_id_seller,
                    quantity = transaction.sold_quantity,
                    price = transaction.price,
                    "order matched"
                );
                self.history.record(transaction);
                self.sink.on_transaction(&transaction);
            }
        }
    }

    fn place(
        &self,
        client: Arc<Trader>,
        exchange_id: OrderId,
        side: Side,
        is_market: bool,
        limit_price: Price,
        quantity: Quantity,
    ) -> PlaceResponse {
        let timestamp = self.timestamps.now();
        let order = Arc::new(if is_market {
            Order::market(client, exchange_id, side, quantity, timestamp)
        } else {
            Order::limit(client, exchange_id, side, limit_price, quantity, timestamp)
        });

        if self.book_for(side).insert(order.clone()).is_err() {
            tracing::debug!(exchange_id, "order rejected: duplicate exchange-id");
            return PlaceResponse::NewOrderReject(RejectReason::DuplicateExchangeId);
        }

        self.refresh_market_price();
        self.match_against(&order, self.opposite_book(side));

        PlaceResponse::NewOrderAck
    }

    fn cancel(&self, exchange_id: OrderId, side: Side) -> CancelResponse {
        if self.book_for(side).cancel_by_id(exchange_id) {
            CancelResponse::CancelAck
        } else {
            CancelResponse::CancelReject
        }
    }

    fn state_of(&self, exchange_id: OrderId, side: Side) -> Option<OrderSnapshot> {
        let order = self.book_for(side).get(exchange_id)?;
        let state = order.lock();
        Some(OrderSnapshot {
            exchange_id: order.exchange_id,
            side: order.side,
            is_market: order.is_market,
            limit_price: order.limit_price,
            quantity_remaining: state.quantity_remaining,
            cancelled: state.cancelled,
        })
    }

    /// Retires terminal orders from both books, then re-derives the
    /// market price and re-runs cross-book matching: a live order that
    /// never crossed at insertion time may cross later, once the
    /// opposing book or the market-price estimate has moved.
    fn sweep_and_rematch(&self) {
        self.buy_book.sweep();
        self.sell_book.sweep();
        self.refresh_market_price();

        for buy in self.buy_book.snapshot_priority() {
            self.match_against(&buy, &self.sell_book);
        }
    }

    fn print_to(&self, out: &mut String) {
        let _ = writeln!(out, "market price: {}", self.current_market_price());
        for (label, book) in [("BUY", &self.buy_book), ("SELL", &self.sell_book)] {
            let _ = writeln!(out, "-- {label} --");
            for order in book.snapshot_priority() {
                let price = if order.is_market {
                    "MKT".to_string()
                } else {
                    order.limit_price.to_string()
                };
                let _ = writeln!(
                    out,
                    "{:>10}  price={:<8} qty={}",
                    order.exchange_id,
                    price,
                    order.quantity_remaining()
                );
            }
        }
    }
}

/// The single-instrument matching engine.
///
/// Owns both sides' order books, the transaction history, a live
/// market-price estimate, and a background sweeper. Cloning the
/// `Arc<dyn TransactionSink>`/`Arc<dyn TimestampSource>` handed to
/// `Engine::new` is the caller's only integration point; everything
/// else is internal.
///
/// Dropping an `Engine` joins its sweeper thread: the thread is signaled
/// to stop and the drop blocks until it has actually exited, so no
/// sweeper outlives its Engine.
pub struct Engine {
    core: Arc<EngineCore>,
    sweeper: Sweeper,
}

impl Engine {
    /// Creates an Engine with the default sweep interval, a
    /// `MonotonicCounter` timestamp source, and a `NullTransactionSink`.
    pub fn new() -> Self {
        Self::with_sweep_interval(
            Arc::new(MonotonicCounter::new()),
            Arc::new(NullTransactionSink),
            DEFAULT_SWEEP_INTERVAL,
        )
    }

    /// Creates an Engine with explicit timestamp source, sink, and
    /// sweep interval.
    pub fn with_sweep_interval(
        timestamps: Arc<dyn TimestampSource>,
        sink: Arc<dyn TransactionSink>,
        sweep_interval: Duration,
    ) -> Self {
        let core = Arc::new(EngineCore {
            buy_book: Book::new(Side::Buy),
            sell_book: Book::new(Side::Sell),
            history: History::new(),
            market_price: AtomicU64::new(0),
            sink,
            timestamps,
        });

        let sweeper_core = core.clone();
        let sweeper = Sweeper::spawn(sweep_interval, move || {
            sweeper_core.sweep_and_rematch();
        });

        Self { core, sweeper }
    }

    /// Places a new order. Assigns it a timestamp from the injected
    /// `TimestampSource`, inserts it into its own-side book, and then
    /// attempts to match it against the opposite book before returning.
    pub fn place(
        &self,
        client: Arc<Trader>,
        exchange_id: OrderId,
        side: Side,
        is_market: bool,
        limit_price: Price,
        quantity: Quantity,
    ) -> PlaceResponse {
        self.core
            .place(client, exchange_id, side, is_market, limit_price, quantity)
    }

    /// Cancels a live order by exchange-id and side.
    pub fn cancel(&self, exchange_id: OrderId, side: Side) -> CancelResponse {
        self.core.cancel(exchange_id, side)
    }

    /// A point-in-time snapshot of one order, or `None` if unknown on
    /// that side.
    pub fn state_of(&self, exchange_id: OrderId, side: Side) -> Option<OrderSnapshot> {
        self.core.state_of(exchange_id, side)
    }

    /// The single most recent Transaction, or the empty sentinel if none
    /// has occurred yet.
    pub fn last_transaction(&self) -> Transaction {
        self.core.history.last_transaction()
    }

    /// Up to the `n` most recent Transactions, oldest-of-the-window
    /// first.
    pub fn last_transactions(&self, n: usize) -> Vec<Transaction> {
        self.core.history.last_transactions(n)
    }

    /// The engine's current market-price estimate.
    pub fn market_price(&self) -> Price {
        self.core.current_market_price()
    }

    /// Renders both books and the current market price as plain text,
    /// in priority order. A debugging aid, not a wire format.
    pub fn print(&self) -> String {
        let mut out = String::new();
        self.core.print_to(&mut out);
        out
    }

    /// Stops the background sweeper early and blocks until it exits.
    /// Normally unnecessary: dropping the Engine does this
    /// automatically.
    pub fn shutdown(&mut self) {
        self.sweeper.shutdown();
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
