use mimalloc::MiMalloc;

/// Global allocator
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// OrderId is the type used for exchange-assigned order ids.
pub type OrderId = u64;

/// Price is the type used for order and trade prices.
pub type Price = u64;

/// Quantity is the type used for order quantities.
pub type Quantity = u64;

/// Timestamp is a monotonic tick assigned at order insertion, used for
/// price-time priority tie-breaking. Not wall-clock time.
pub type Timestamp = u64;

/// Side indicates the direction of an Order.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum Side {
    /// Buy bids for the instrument.
    Buy,
    /// Sell offers the instrument.
    Sell,
}

/// A monotonic timestamp source, injected into the Engine.
///
/// The engine never reads the wall clock itself; callers supply one,
/// typically backed by a counter or `Instant`.
pub trait TimestampSource: Send + Sync {
    /// Returns the next monotonic timestamp. Must never go backwards.
    fn now(&self) -> Timestamp;
}

/// A simple `TimestampSource` that hands out strictly increasing ticks
/// from an atomic counter. Suitable for tests that need deterministic,
/// reproducible ordering, and as a default for callers with no wall-clock
/// opinion of their own.
#[derive(Default)]
pub struct MonotonicCounter {
    next: std::sync::atomic::AtomicU64,
}

impl MonotonicCounter {
    /// Creates a new counter starting at 0.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TimestampSource for MonotonicCounter {
    fn now(&self) -> Timestamp {
        self.next.fetch_add(1, std::sync::atomic::Ordering::Relaxed)
    }
}

/// BookKey is the priority key used to order live Orders within one
/// side's book.
///
/// Ordering:
/// 1. Market orders rank above limit orders.
/// 2. Among limit orders: Buy ranks higher price first, Sell ranks lower
///    price first.
/// 3. Ties break by earlier arrival timestamp.
///
/// `side` is carried on the key (rather than split across two key
/// types) so a single `Ord` impl can serve both of the Engine's
/// per-side skip lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookKey {
    pub is_market: bool,
    pub price: Price,
    pub timestamp: Timestamp,
    pub side: Side,
}

impl Ord for BookKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Market orders sort first regardless of side.
        let market_rank = |k: &BookKey| u8::from(!k.is_market);
        market_rank(self)
            .cmp(&market_rank(other))
            .then_with(|| match self.side {
                Side::Buy => other.price.cmp(&self.price),
                Side::Sell => self.price.cmp(&other.price),
            })
            .then_with(|| self.timestamp.cmp(&other.timestamp))
    }
}

impl PartialOrd for BookKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
