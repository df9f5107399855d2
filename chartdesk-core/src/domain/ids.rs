use serde::{Deserialize, Serialize};
use std::fmt;

/// Order ID — unique per store, assigned at creation, immutable thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a guide-line overlay on the host chart.
///
/// The wire format is `orderline_<order id>` — this is the external contract
/// with the host chart engine and changing it is a breaking change. Inside
/// the crate the order ↔ overlay linkage goes through `OverlayIndex`, never
/// through re-parsing this string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OverlayId(String);

const ORDER_LINE_PREFIX: &str = "orderline_";

impl OverlayId {
    /// Derive the overlay id for an order.
    pub fn for_order(id: OrderId) -> Self {
        Self(format!("{ORDER_LINE_PREFIX}{id}"))
    }

    /// Wrap a host-supplied id that may or may not follow the order-line format.
    pub fn from_raw(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Parse the backing order id out of the wire format.
    ///
    /// Returns `None` for ids that do not follow the `orderline_` convention —
    /// those overlays can never correspond to a store order.
    pub fn order_id(&self) -> Option<OrderId> {
        self.0
            .strip_prefix(ORDER_LINE_PREFIX)?
            .parse::<u64>()
            .ok()
            .map(OrderId)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_id_wire_format() {
        let id = OverlayId::for_order(OrderId(42));
        assert_eq!(id.as_str(), "orderline_42");
    }

    #[test]
    fn overlay_id_roundtrip() {
        let id = OverlayId::for_order(OrderId(7));
        assert_eq!(id.order_id(), Some(OrderId(7)));
    }

    #[test]
    fn foreign_overlay_id_has_no_order() {
        assert_eq!(OverlayId::from_raw("trendline_3").order_id(), None);
        assert_eq!(OverlayId::from_raw("orderline_abc").order_id(), None);
        assert_eq!(OverlayId::from_raw("orderline_").order_id(), None);
    }
}
