//! Boundary evaluation — does a tick breach an order's stop or target?
//!
//! Runs once per tick in the event loop, against the full OHLC range, so a
//! level pierced intrabar still fires. Deliberately decoupled from figure
//! rendering: drawing an overlay must never close an order.

use crate::domain::{ExitType, Order, OrderId, Tick};

/// A stop or target breached by a tick. The caller closes the order at
/// `level` with `exit_type`.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryHit {
    pub order_id: OrderId,
    pub exit_type: ExitType,
    pub level: f64,
}

/// Scan open market orders for stop/target breaches on this tick.
///
/// At most one hit per order; the stop loss wins when a wide bar crosses
/// both levels. Pending orders are skipped — their levels are not armed
/// until the entry trades.
pub fn check_boundaries(orders: &[Order], tick: &Tick) -> Vec<BoundaryHit> {
    let mut hits = Vec::new();
    for order in orders {
        if !order.is_open() || !order.action.is_market() {
            continue;
        }
        if let Some(hit) = check_order(order, tick) {
            hits.push(hit);
        }
    }
    hits
}

fn check_order(order: &Order, tick: &Tick) -> Option<BoundaryHit> {
    let is_buy = order.side().is_buy();

    if let Some(sl) = order.stop_loss {
        let breached = if is_buy {
            tick.close <= sl || tick.low <= sl
        } else {
            tick.close >= sl || tick.high >= sl
        };
        if breached {
            return Some(BoundaryHit {
                order_id: order.order_id,
                exit_type: ExitType::StopLoss,
                level: sl,
            });
        }
    }

    if let Some(tp) = order.take_profit {
        let breached = if is_buy {
            tick.close >= tp || tick.high >= tp
        } else {
            tick.close <= tp || tick.low <= tp
        };
        if breached {
            return Some(BoundaryHit {
                order_id: order.order_id,
                exit_type: ExitType::TakeProfit,
                level: tp,
            });
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderAction;
    use chrono::Utc;

    fn tick(open: f64, high: f64, low: f64, close: f64) -> Tick {
        Tick {
            timestamp: Utc::now(),
            open,
            high,
            low,
            close,
            volume: 1_000.0,
        }
    }

    fn order(action: OrderAction, sl: Option<f64>, tp: Option<f64>) -> Order {
        Order {
            order_id: OrderId(1),
            session_id: None,
            action,
            entry_point: 100.0,
            stop_loss: sl,
            take_profit: tp,
            lot_size: 1.0,
            pips: None,
            pl: None,
            entry_time: Utc::now(),
            exit_time: None,
            exit_type: None,
            exit_point: None,
            partials: None,
        }
    }

    // ── Buy side ─────────────────────────────────────────────────────

    #[test]
    fn buy_take_profit_fires_on_high() {
        let orders = [order(OrderAction::Buy, None, Some(105.0))];
        let hits = check_boundaries(&orders, &tick(100.0, 106.0, 99.0, 103.0));
        assert_eq!(
            hits,
            vec![BoundaryHit {
                order_id: OrderId(1),
                exit_type: ExitType::TakeProfit,
                level: 105.0,
            }]
        );
    }

    #[test]
    fn buy_take_profit_fires_on_close() {
        let orders = [order(OrderAction::Buy, None, Some(105.0))];
        let hits = check_boundaries(&orders, &tick(100.0, 105.0, 99.0, 105.0));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].exit_type, ExitType::TakeProfit);
    }

    #[test]
    fn buy_stop_loss_fires_on_low() {
        let orders = [order(OrderAction::Buy, Some(95.0), None)];
        let hits = check_boundaries(&orders, &tick(100.0, 101.0, 94.0, 98.0));
        assert_eq!(hits[0].exit_type, ExitType::StopLoss);
        assert_eq!(hits[0].level, 95.0);
    }

    #[test]
    fn buy_no_hit_inside_range() {
        let orders = [order(OrderAction::Buy, Some(95.0), Some(105.0))];
        let hits = check_boundaries(&orders, &tick(100.0, 103.0, 97.0, 101.0));
        assert!(hits.is_empty());
    }

    #[test]
    fn wide_bar_prefers_stop_loss() {
        // Bar crosses both levels: the protective exit wins.
        let orders = [order(OrderAction::Buy, Some(95.0), Some(105.0))];
        let hits = check_boundaries(&orders, &tick(100.0, 106.0, 94.0, 100.0));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].exit_type, ExitType::StopLoss);
    }

    // ── Sell side ────────────────────────────────────────────────────

    #[test]
    fn sell_take_profit_fires_on_low() {
        let orders = [order(OrderAction::Sell, None, Some(95.0))];
        let hits = check_boundaries(&orders, &tick(100.0, 101.0, 94.0, 98.0));
        assert_eq!(hits[0].exit_type, ExitType::TakeProfit);
        assert_eq!(hits[0].level, 95.0);
    }

    #[test]
    fn sell_stop_loss_fires_on_high() {
        let orders = [order(OrderAction::Sell, Some(105.0), None)];
        let hits = check_boundaries(&orders, &tick(100.0, 106.0, 99.0, 103.0));
        assert_eq!(hits[0].exit_type, ExitType::StopLoss);
    }

    // ── Skips ────────────────────────────────────────────────────────

    #[test]
    fn pending_orders_not_evaluated() {
        let orders = [order(OrderAction::BuyLimit, Some(95.0), Some(105.0))];
        let hits = check_boundaries(&orders, &tick(100.0, 110.0, 90.0, 100.0));
        assert!(hits.is_empty());
    }

    #[test]
    fn closed_orders_not_evaluated() {
        let mut o = order(OrderAction::Buy, None, Some(105.0));
        o.exit_type = Some(ExitType::ManualClose);
        let hits = check_boundaries(&[o], &tick(100.0, 110.0, 99.0, 108.0));
        assert!(hits.is_empty());
    }

    #[test]
    fn exact_touch_counts() {
        let orders = [order(OrderAction::Buy, None, Some(105.0))];
        let hits = check_boundaries(&orders, &tick(100.0, 105.0, 99.0, 103.0));
        assert_eq!(hits.len(), 1);
    }
}
