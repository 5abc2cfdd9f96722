use std::sync::atomic::{AtomicU64, Ordering};

/// A trading identity with an atomically mutable, non-negative balance.
///
/// `balance` is never covered by the Book's locks or an Order's mutex;
/// every mutation here is a compare-and-swap loop, so `credit`/`debit`
/// are linearizable under concurrent callers without any external
/// synchronization.
#[derive(Debug)]
pub struct Trader {
    pub id: u64,
    balance: AtomicU64,
}

impl Trader {
    /// Creates a new Trader with the given starting balance.
    pub fn new(id: u64, balance: u64) -> Self {
        Self {
            id,
            balance: AtomicU64::new(balance),
        }
    }

    /// Snapshot read of the current balance.
    pub fn balance(&self) -> u64 {
        self.balance.load(Ordering::Acquire)
    }

    /// Unconditionally increases the balance by `amount`, saturating on
    /// overflow.
    pub fn credit(&self, amount: u64) {
        let mut current = self.balance.load(Ordering::Relaxed);
        loop {
            let next = current.saturating_add(amount);
            match self.balance.compare_exchange_weak(
                current,
                next,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return,
                Err(observed) => current = observed,
            }
        }
    }

    /// Attempts to atomically subtract `amount` from the balance.
    ///
    /// Succeeds only if the current balance is >= `amount`; on success
    /// the deduction is the full amount or nothing, never a partial
    /// debit. On failure the balance is left unchanged.
    pub fn debit(&self, amount: u64) -> bool {
        let mut current = self.balance.load(Ordering::Relaxed);
        loop {
            if current < amount {
                return false;
            }
            let next = current - amount;
            match self.balance.compare_exchange_weak(
                current,
                next,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return true,
                Err(observed) => current = observed,
            }
        }
    }
}
