use crate::engine::history::Transaction;
use crate::engine::order::Order;
use crate::engine::types::{Price, Side};
use std::sync::Arc;

/// Attempts to match two orders of opposite sides against each other.
///
/// Pure with respect to everything except the two orders' mutable state
/// and their traders' balances: given the same inputs and the same
/// concurrent interference, it either produces a Transaction and
/// mutates both orders' remaining quantity (and both traders'
/// balances), or produces no-trade (`Transaction::EMPTY`) and mutates
/// nothing.
///
/// Per-order locks are acquired in ascending exchange-id order — never
/// the reverse — so two matchers racing over the same pair of orders
/// from opposite ends cannot deadlock.
pub fn match_pair(a: &Arc<Order>, b: &Arc<Order>, market_price: Price) -> Transaction {
    if a.side == b.side {
        return Transaction::EMPTY;
    }

    let (buy, sell) = match a.side {
        Side::Buy => (a, b),
        Side::Sell => (b, a),
    };

    if sell.client.id == buy.client.id {
        // No self-trade.
        return Transaction::EMPTY;
    }

    if buy.quantity_remaining() == 0 || sell.quantity_remaining() == 0 {
        return Transaction::EMPTY;
    }

    let buy_price = buy.effective_price(market_price);
    let sell_price = sell.effective_price(market_price);

    if buy_price < sell_price {
        // No crossing.
        return Transaction::EMPTY;
    }

    let (mut buy_guard, mut sell_guard) = if buy.exchange_id < sell.exchange_id {
        let b = buy.lock();
        let s = sell.lock();
        (b, s)
    } else {
        let s = sell.lock();
        let b = buy.lock();
        (b, s)
    };

    if buy_guard.cancelled || sell_guard.cancelled {
        return Transaction::EMPTY;
    }

    let price = (buy_price + sell_price) / 2;
    if price == 0 {
        return Transaction::EMPTY;
    }

    loop {
        let max_quantity = sell_guard.quantity_remaining.min(buy_guard.quantity_remaining);
        if max_quantity == 0 {
            return Transaction::EMPTY;
        }

        let affordable_quantity = buy.client.balance() / price;
        let quantity = max_quantity.min(affordable_quantity);
        if quantity == 0 {
            return Transaction::EMPTY;
        }

        if buy.client.debit(quantity * price) {
            sell.client.credit(quantity * price);
            Order::decrement_locked(&mut buy_guard, quantity);
            Order::decrement_locked(&mut sell_guard, quantity);
            return Transaction {
                exchange_id_seller: sell.exchange_id,
                exchange_id_buyer: buy.exchange_id,
                sold_quantity: quantity,
                price,
            };
        }

        // The buyer's balance moved between quoting affordable_quantity
        // and the commit attempt; requote at the new, smaller balance
        // rather than failing the match outright.
    }
}
