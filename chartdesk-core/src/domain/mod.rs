//! Domain model: orders, identifiers, ticks.

pub mod ids;
pub mod order;
pub mod tick;

pub use ids::{OrderId, OverlayId};
pub use order::{ExitType, Order, OrderAction, OrderPatch, OrderSpec, Side};
pub use tick::{Precision, Tick};
