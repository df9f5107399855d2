//! Order store: the single owner of the open + closed order list.
//!
//! Mutation is by whole-list replacement. Callers take a snapshot with
//! [`OrderStore::orders`], rebuild the list, and hand it back through
//! [`OrderStore::set_orders`]; every replacement bumps the revision and
//! notifies subscribers synchronously, in registration order.

use crate::domain::{Order, OrderId};

type Subscriber = Box<dyn FnMut(&[Order])>;

/// Single-owner, main-thread only. Not `Send`: subscribers hold arbitrary
/// closures over UI state.
#[derive(Default)]
pub struct OrderStore {
    orders: Vec<Order>,
    revision: u64,
    subscribers: Vec<Subscriber>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current order list, newest last.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Monotonic counter, bumped on every replacement. Lets views skip
    /// rebuilds when nothing changed.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| o.order_id == id)
    }

    /// Replace the whole list. This is the only write path; partial edits go
    /// through the controller, which rebuilds and calls back in here.
    pub fn set_orders(&mut self, orders: Vec<Order>) {
        self.orders = orders;
        self.revision += 1;
        // Disjoint field borrows: subscribers may not re-enter the store.
        let snapshot = &self.orders;
        for sub in &mut self.subscribers {
            sub(snapshot);
        }
    }

    /// Register a change listener. Fired synchronously from `set_orders`
    /// with the post-replacement list.
    pub fn subscribe(&mut self, sub: impl FnMut(&[Order]) + 'static) {
        self.subscribers.push(Box::new(sub));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OrderAction, OrderId};
    use chrono::Utc;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn order(id: u64) -> Order {
        Order {
            order_id: OrderId(id),
            session_id: None,
            action: OrderAction::Buy,
            entry_point: 100.0,
            stop_loss: None,
            take_profit: None,
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

    #[test]
    fn replacement_bumps_revision() {
        let mut store = OrderStore::new();
        assert_eq!(store.revision(), 0);

        store.set_orders(vec![order(1)]);
        assert_eq!(store.revision(), 1);
        assert_eq!(store.orders().len(), 1);

        store.set_orders(vec![]);
        assert_eq!(store.revision(), 2);
        assert!(store.orders().is_empty());
    }

    #[test]
    fn get_by_id() {
        let mut store = OrderStore::new();
        store.set_orders(vec![order(1), order(2)]);
        assert_eq!(store.get(OrderId(2)).map(|o| o.order_id), Some(OrderId(2)));
        assert!(store.get(OrderId(9)).is_none());
    }

    #[test]
    fn subscribers_see_each_replacement() {
        let seen: Rc<RefCell<Vec<usize>>> = Rc::default();
        let mut store = OrderStore::new();
        let sink = Rc::clone(&seen);
        store.subscribe(move |orders| sink.borrow_mut().push(orders.len()));

        store.set_orders(vec![order(1)]);
        store.set_orders(vec![order(1), order(2)]);
        store.set_orders(vec![]);

        assert_eq!(*seen.borrow(), vec![1, 2, 0]);
    }
}
