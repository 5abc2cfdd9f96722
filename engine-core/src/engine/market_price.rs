use crate::engine::book::Book;
use crate::engine::types::Price;

/// Derives a scalar market-price estimate from both books.
///
/// Computes the y-coordinate of the intersection of two lines:
/// - *Demand line*: through the first and last **limit** Buy orders (in
///   priority order), using `(quantity_remaining, limit_price)` as
///   `(x, y)`.
/// - *Supply line*: through the first and last **limit** Sell orders,
///   using the sell book's own endpoints.
///
/// Returns `None` — meaning "leave the previous estimate unchanged" —
/// when either book has no limit orders, or when the two lines are
/// parallel (zero determinant).
pub fn estimate(buy_book: &Book, sell_book: &Book) -> Option<Price> {
    let (buy_first, buy_last) = limit_endpoints(buy_book)?;
    let (sell_first, sell_last) = limit_endpoints(sell_book)?;

    let (x1, y1) = buy_first;
    let (x2, y2) = buy_last;
    let (x3, y3) = sell_first;
    let (x4, y4) = sell_last;

    let denominator = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);
    if denominator == 0 {
        return None;
    }

    let numerator = (x1 * y2 - y1 * x2) * (y3 - y4) - (y1 - y2) * (x3 * y4 - y3 * x4);
    let y_intercept = numerator / denominator;

    Some(y_intercept.max(0) as Price)
}

/// Returns the `(quantity_remaining, limit_price)` endpoints of the
/// first and last live *limit* orders in priority order, as `i128` so
/// the line-intersection math can go negative without wrapping. A book
/// with a single limit order uses that order as both endpoints.
///
/// Terminal orders (filled or cancelled) are excluded even though
/// `snapshot_priority()` still returns them until the next sweep:
/// otherwise a just-filled order's `quantity_remaining == 0` or a
/// cancelled order's stale price would corrupt the estimate.
fn limit_endpoints(book: &Book) -> Option<((i128, i128), (i128, i128))> {
    let limit_orders: Vec<_> = book
        .snapshot_priority()
        .into_iter()
        .filter(|order| !order.is_market && !order.is_terminal())
        .collect();

    let first = limit_orders.first()?;
    let last = limit_orders.last()?;

    let point = |order: &std::sync::Arc<crate::engine::order::Order>| {
        (order.quantity_remaining() as i128, order.limit_price as i128)
    };

    Some((point(first), point(last)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::order::Order;
    use crate::engine::trader::Trader;
    use crate::engine::types::Side;
    use std::sync::Arc;

    fn limit_order(id: u64, side: Side, price: u64, qty: u64) -> Arc<Order> {
        Arc::new(Order::limit(
            Arc::new(Trader::new(id, 1_000_000)),
            id,
            side,
            price,
            qty,
            id,
        ))
    }

    #[test]
    fn empty_books_leave_estimate_unchanged() {
        let buy = Book::new(Side::Buy);
        let sell = Book::new(Side::Sell);
        assert_eq!(estimate(&buy, &sell), None);
    }

    #[test]
    fn one_sided_book_leaves_estimate_unchanged() {
        let buy = Book::new(Side::Buy);
        let sell = Book::new(Side::Sell);
        buy.insert(limit_order(1, Side::Buy, 100, 10)).unwrap();
        assert_eq!(estimate(&buy, &sell), None);
    }

    #[test]
    fn single_order_per_side_is_tolerated() {
        let buy = Book::new(Side::Buy);
        let sell = Book::new(Side::Sell);
        buy.insert(limit_order(1, Side::Buy, 100, 10)).unwrap();
        sell.insert(limit_order(2, Side::Sell, 120, 10)).unwrap();
        // Degenerate (each line is a single point repeated); determinant
        // is zero, so the estimate is left unchanged.
        assert_eq!(estimate(&buy, &sell), None);
    }

    #[test]
    fn crossing_lines_produce_an_estimate() {
        let buy = Book::new(Side::Buy);
        let sell = Book::new(Side::Sell);
        buy.insert(limit_order(1, Side::Buy, 110, 5)).unwrap();
        buy.insert(limit_order(2, Side::Buy, 90, 15)).unwrap();
        sell.insert(limit_order(3, Side::Sell, 95, 5)).unwrap();
        sell.insert(limit_order(4, Side::Sell, 115, 15)).unwrap();

        assert!(estimate(&buy, &sell).is_some());
    }

    #[test]
    fn cancelled_front_of_book_order_is_excluded_from_the_estimate() {
        let sell = Book::new(Side::Sell);
        sell.insert(limit_order(10, Side::Sell, 95, 5)).unwrap();
        sell.insert(limit_order(11, Side::Sell, 115, 15)).unwrap();

        // Highest-price buy, so it sorts to the front of the book, but
        // it's cancelled before the estimate is computed.
        let buy_with_stale_cancel = Book::new(Side::Buy);
        let stale = limit_order(1, Side::Buy, 500, 1);
        buy_with_stale_cancel.insert(stale.clone()).unwrap();
        buy_with_stale_cancel.insert(limit_order(2, Side::Buy, 110, 5)).unwrap();
        buy_with_stale_cancel.insert(limit_order(3, Side::Buy, 90, 15)).unwrap();
        assert!(stale.cancel());

        let buy_without_stale = Book::new(Side::Buy);
        buy_without_stale.insert(limit_order(2, Side::Buy, 110, 5)).unwrap();
        buy_without_stale.insert(limit_order(3, Side::Buy, 90, 15)).unwrap();

        assert_eq!(
            estimate(&buy_with_stale_cancel, &sell),
            estimate(&buy_without_stale, &sell),
            "a cancelled front-of-book order must not become a line endpoint"
        );
    }

    #[test]
    fn filled_front_of_book_order_is_excluded_from_the_estimate() {
        let sell = Book::new(Side::Sell);
        sell.insert(limit_order(10, Side::Sell, 95, 5)).unwrap();
        sell.insert(limit_order(11, Side::Sell, 115, 15)).unwrap();

        let buy_with_stale_fill = Book::new(Side::Buy);
        let stale = limit_order(1, Side::Buy, 500, 5);
        buy_with_stale_fill.insert(stale.clone()).unwrap();
        buy_with_stale_fill.insert(limit_order(2, Side::Buy, 110, 5)).unwrap();
        buy_with_stale_fill.insert(limit_order(3, Side::Buy, 90, 15)).unwrap();
        Order::decrement_locked(&mut stale.lock(), 5);

        let buy_without_stale = Book::new(Side::Buy);
        buy_without_stale.insert(limit_order(2, Side::Buy, 110, 5)).unwrap();
        buy_without_stale.insert(limit_order(3, Side::Buy, 90, 15)).unwrap();

        assert_eq!(
            estimate(&buy_with_stale_fill, &sell),
            estimate(&buy_without_stale, &sell),
            "a fully filled front-of-book order must not become a line endpoint"
        );
    }
}
