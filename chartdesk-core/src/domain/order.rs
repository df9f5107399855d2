//! Order records, action and exit-type enums, open/modify payloads.

use super::ids::OrderId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which direction an order trades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn is_buy(self) -> bool {
        matches!(self, Side::Buy)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        })
    }
}

/// Order action — determines which overlay template renders the order and
/// which fields are mandatory when opening it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderAction {
    /// Market buy, entered at the current tick.
    Buy,
    /// Market sell, entered at the current tick.
    Sell,
    /// Buy when price falls to the entry point.
    BuyLimit,
    /// Sell when price rises to the entry point.
    SellLimit,
    /// Buy when price rises to the entry point.
    BuyStop,
    /// Sell when price falls to the entry point.
    SellStop,
}

impl OrderAction {
    pub fn side(self) -> Side {
        match self {
            OrderAction::Buy | OrderAction::BuyLimit | OrderAction::BuyStop => Side::Buy,
            OrderAction::Sell | OrderAction::SellLimit | OrderAction::SellStop => Side::Sell,
        }
    }

    /// Market orders take their entry point from the live tick.
    pub fn is_market(self) -> bool {
        matches!(self, OrderAction::Buy | OrderAction::Sell)
    }

    /// Pending orders require an explicit entry point and sit untriggered.
    pub fn is_pending(self) -> bool {
        !self.is_market()
    }

    pub fn label(self) -> &'static str {
        match self {
            OrderAction::Buy => "buy",
            OrderAction::Sell => "sell",
            OrderAction::BuyLimit => "buylimit",
            OrderAction::SellLimit => "selllimit",
            OrderAction::BuyStop => "buystop",
            OrderAction::SellStop => "sellstop",
        }
    }
}

impl fmt::Display for OrderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How an order left the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExitType {
    ManualClose,
    Cancel,
    TakeProfit,
    StopLoss,
}

impl ExitType {
    pub fn label(self) -> &'static str {
        match self {
            ExitType::ManualClose => "manualclose",
            ExitType::Cancel => "cancel",
            ExitType::TakeProfit => "takeprofit",
            ExitType::StopLoss => "stoploss",
        }
    }
}

impl fmt::Display for ExitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single order. Owned exclusively by the `OrderStore` while open; mutation
/// is by whole-record replacement through the store, never by aliasing.
///
/// `pips` and `pl` are derived fields: recomputed whenever the stop/target
/// levels or the live tick change, never authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub session_id: Option<u64>,
    pub action: OrderAction,
    pub entry_point: f64,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
    pub lot_size: f64,
    pub pips: Option<f64>,
    pub pl: Option<f64>,
    pub entry_time: DateTime<Utc>,
    pub exit_time: Option<DateTime<Utc>>,
    pub exit_type: Option<ExitType>,
    pub exit_point: Option<f64>,
    pub partials: Option<String>,
}

impl Order {
    pub fn side(&self) -> Side {
        self.action.side()
    }

    /// Whether the order is still live (no exit transition recorded).
    pub fn is_open(&self) -> bool {
        self.exit_type.is_none()
    }
}

/// Fields a caller supplies when opening an order.
///
/// `entry_point` is mandatory for limit/stop actions and taken from the live
/// tick for market buy/sell. `order_id` may be supplied by an external order
/// backend; otherwise the controller assigns the next monotonic id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSpec {
    pub order_id: Option<u64>,
    pub session_id: Option<u64>,
    pub action: OrderAction,
    pub entry_point: Option<f64>,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
    pub lot_size: f64,
}

impl OrderSpec {
    pub fn market(action: OrderAction, lot_size: f64) -> Self {
        Self {
            order_id: None,
            session_id: None,
            action,
            entry_point: None,
            stop_loss: None,
            take_profit: None,
            lot_size,
        }
    }
}

/// Partial update merged over an existing order. Absent fields are untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPatch {
    pub id: OrderId,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
    pub entry_point: Option<f64>,
    pub lot_size: Option<f64>,
}

impl OrderPatch {
    pub fn new(id: OrderId) -> Self {
        Self {
            id,
            stop_loss: None,
            take_profit: None,
            entry_point: None,
            lot_size: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buy_order(id: u64) -> Order {
        Order {
            order_id: OrderId(id),
            session_id: None,
            action: OrderAction::Buy,
            entry_point: 67_000.0,
            stop_loss: Some(66_000.0),
            take_profit: Some(69_000.0),
            lot_size: 100.0,
            pips: None,
            pl: None,
            entry_time: Utc::now(),
            exit_time: None,
            exit_type: None,
            exit_point: None,
            partials: None,
        }
    }

    #[test]
    fn action_sides() {
        assert_eq!(OrderAction::Buy.side(), Side::Buy);
        assert_eq!(OrderAction::BuyLimit.side(), Side::Buy);
        assert_eq!(OrderAction::BuyStop.side(), Side::Buy);
        assert_eq!(OrderAction::Sell.side(), Side::Sell);
        assert_eq!(OrderAction::SellLimit.side(), Side::Sell);
        assert_eq!(OrderAction::SellStop.side(), Side::Sell);
    }

    #[test]
    fn market_vs_pending() {
        assert!(OrderAction::Buy.is_market());
        assert!(OrderAction::Sell.is_market());
        assert!(OrderAction::BuyLimit.is_pending());
        assert!(OrderAction::SellStop.is_pending());
    }

    #[test]
    fn order_open_until_exit_recorded() {
        let mut order = buy_order(1);
        assert!(order.is_open());

        order.exit_type = Some(ExitType::TakeProfit);
        order.exit_point = Some(69_000.0);
        order.exit_time = Some(Utc::now());
        assert!(!order.is_open());
    }

    #[test]
    fn order_serialization_roundtrip() {
        let order = buy_order(42);
        let json = serde_json::to_string(&order).unwrap();
        let deser: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(order, deser);
    }

    #[test]
    fn action_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&OrderAction::BuyLimit).unwrap(),
            "\"buylimit\""
        );
        assert_eq!(
            serde_json::to_string(&ExitType::ManualClose).unwrap(),
            "\"manualclose\""
        );
    }
}
