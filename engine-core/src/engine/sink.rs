use crate::engine::history::Transaction;

/// An opaque destination for completed Transactions.
///
/// This is the injection point an embedder uses to forward fills
/// elsewhere (a message bus, a ledger, a UI) without the Engine itself
/// knowing anything about the destination.
pub trait TransactionSink: Send + Sync {
    /// Called once per committed Transaction, in commit order.
    fn on_transaction(&self, transaction: &Transaction);
}

/// A `TransactionSink` that discards everything. The default when an
/// embedder has no external destination for fills.
#[derive(Debug, Default)]
pub struct NullTransactionSink;

impl TransactionSink for NullTransactionSink {
    fn on_transaction(&self, _transaction: &Transaction) {}
}
