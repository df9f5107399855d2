//! Order backend seam.
//!
//! The controller notifies a backend after each local transition. Calls are
//! fire-and-forget: the local store is the source of truth and a backend
//! failure never rolls the transition back.

use crate::domain::{ExitType, Order};
use std::cell::RefCell;
use std::rc::Rc;

pub trait OrderBackend {
    /// A new order entered the store.
    fn on_order_placed(&mut self, order: &Order);

    /// An existing order's levels or size changed.
    fn update_order(&mut self, order: &Order);

    /// An order left the store with the given exit type. Not called for
    /// cancellations of pending orders that never traded.
    fn order_closed(&mut self, order: &Order, exit_type: ExitType);
}

/// Backend that discards everything. Default for standalone use.
#[derive(Debug, Default)]
pub struct NullBackend;

impl OrderBackend for NullBackend {
    fn on_order_placed(&mut self, _order: &Order) {}
    fn update_order(&mut self, _order: &Order) {}
    fn order_closed(&mut self, _order: &Order, _exit_type: ExitType) {}
}

/// Call log for tests. Clone the handle before boxing the backend, then
/// inspect the shared log after driving the controller.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    calls: Rc<RefCell<BackendCalls>>,
}

#[derive(Debug, Default)]
pub struct BackendCalls {
    pub placed: Vec<Order>,
    pub updated: Vec<Order>,
    pub closed: Vec<(Order, ExitType)>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Rc<RefCell<BackendCalls>> {
        Rc::clone(&self.calls)
    }
}

impl OrderBackend for RecordingBackend {
    fn on_order_placed(&mut self, order: &Order) {
        self.calls.borrow_mut().placed.push(order.clone());
    }

    fn update_order(&mut self, order: &Order) {
        self.calls.borrow_mut().updated.push(order.clone());
    }

    fn order_closed(&mut self, order: &Order, exit_type: ExitType) {
        self.calls.borrow_mut().closed.push((order.clone(), exit_type));
    }
}
