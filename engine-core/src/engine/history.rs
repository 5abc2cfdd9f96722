use crate::engine::types::{OrderId, Price, Quantity};
use std::sync::RwLock;

/// An immutable record of a completed match.
///
/// Equality is structural; the all-zero Transaction (`Transaction::EMPTY`)
/// denotes no-trade and is never appended to a History.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Transaction {
    pub exchange_id_seller: OrderId,
    pub exchange_id_buyer: OrderId,
    pub sold_quantity: Quantity,
    pub price: Price,
}

impl Transaction {
    /// The no-trade sentinel: all fields zero.
    pub const EMPTY: Transaction = Transaction {
        exchange_id_seller: 0,
        exchange_id_buyer: 0,
        sold_quantity: 0,
        price: 0,
    };

    /// Whether this is the no-trade sentinel.
    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }
}

/// An append-only, totally ordered log of Transactions guarded by a
/// dedicated reader/writer lock.
#[derive(Default)]
pub struct History {
    transactions: RwLock<Vec<Transaction>>,
}

impl History {
    /// Creates an empty History.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a Transaction. Callers must not append the empty
    /// sentinel; no-trade outcomes are silently dropped before reaching
    /// here.
    pub fn record(&self, transaction: Transaction) {
        debug_assert!(!transaction.is_empty(), "no-trade must not be recorded");
        self.transactions
            .write()
            .expect("history lock poisoned")
            .push(transaction);
    }

    /// Up to the `n` most recent Transactions, in chronological order
    /// (oldest-of-the-selected-window first, most-recent last).
    pub fn last_transactions(&self, n: usize) -> Vec<Transaction> {
        let transactions = self.transactions.read().expect("history lock poisoned");
        let start = transactions.len().saturating_sub(n);
        transactions[start..].to_vec()
    }

    /// The single most recent Transaction, or `Transaction::EMPTY` if
    /// history is empty.
    pub fn last_transaction(&self) -> Transaction {
        self.last_transactions(1)
            .into_iter()
            .next()
            .unwrap_or(Transaction::EMPTY)
    }

    /// Total number of recorded Transactions.
    pub fn len(&self) -> usize {
        self.transactions.read().expect("history lock poisoned").len()
    }

    /// True when no Transaction has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
