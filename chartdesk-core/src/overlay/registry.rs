//! Bidirectional order ↔ overlay index.
//!
//! The authoritative linkage between store orders and chart overlays. The
//! `orderline_<id>` string format still exists at the host boundary, but
//! nothing inside the crate re-parses it to find an order; lookups go
//! through this index. Both directions are kept in lockstep.

use crate::domain::{OrderId, OverlayId};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct OverlayIndex {
    by_order: HashMap<OrderId, OverlayId>,
    by_overlay: HashMap<OverlayId, OrderId>,
}

impl OverlayIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Link an order to its overlay. Re-registering an order replaces its
    /// previous linkage in both directions.
    pub fn register(&mut self, order_id: OrderId, overlay_id: OverlayId) {
        if let Some(old) = self.by_order.insert(order_id, overlay_id.clone()) {
            self.by_overlay.remove(&old);
        }
        self.by_overlay.insert(overlay_id, order_id);
    }

    pub fn overlay_for(&self, order_id: OrderId) -> Option<&OverlayId> {
        self.by_order.get(&order_id)
    }

    pub fn order_for(&self, overlay_id: &OverlayId) -> Option<OrderId> {
        self.by_overlay.get(overlay_id).copied()
    }

    /// Unlink by order id, returning the overlay that was attached.
    pub fn deregister(&mut self, order_id: OrderId) -> Option<OverlayId> {
        let overlay_id = self.by_order.remove(&order_id)?;
        self.by_overlay.remove(&overlay_id);
        Some(overlay_id)
    }

    /// Unlink by overlay id, returning the order that was attached.
    pub fn deregister_overlay(&mut self, overlay_id: &OverlayId) -> Option<OrderId> {
        let order_id = self.by_overlay.remove(overlay_id)?;
        self.by_order.remove(&order_id);
        Some(order_id)
    }

    pub fn len(&self) -> usize {
        self.by_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_lookup_both_directions() {
        let mut index = OverlayIndex::new();
        let overlay = OverlayId::for_order(OrderId(1));
        index.register(OrderId(1), overlay.clone());

        assert_eq!(index.overlay_for(OrderId(1)), Some(&overlay));
        assert_eq!(index.order_for(&overlay), Some(OrderId(1)));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn deregister_clears_both_directions() {
        let mut index = OverlayIndex::new();
        let overlay = OverlayId::for_order(OrderId(1));
        index.register(OrderId(1), overlay.clone());

        assert_eq!(index.deregister(OrderId(1)), Some(overlay.clone()));
        assert!(index.is_empty());
        assert_eq!(index.order_for(&overlay), None);
        assert_eq!(index.deregister(OrderId(1)), None);
    }

    #[test]
    fn reregistering_replaces_old_linkage() {
        let mut index = OverlayIndex::new();
        let old = OverlayId::from_raw("orderline_1");
        let new = OverlayId::from_raw("orderline_1_v2");
        index.register(OrderId(1), old.clone());
        index.register(OrderId(1), new.clone());

        assert_eq!(index.len(), 1);
        assert_eq!(index.order_for(&old), None);
        assert_eq!(index.order_for(&new), Some(OrderId(1)));
    }

    #[test]
    fn unknown_lookups_are_none() {
        let index = OverlayIndex::new();
        assert_eq!(index.overlay_for(OrderId(9)), None);
        assert_eq!(index.order_for(&OverlayId::from_raw("orderline_9")), None);
    }
}
