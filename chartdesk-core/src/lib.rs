//! ChartDesk Core — order store, controller, chart overlays, boundary evaluation.
//!
//! This crate contains the order-overlay layer of a trading chart:
//! - Domain types (orders, ids, ticks, precision)
//! - Whole-list-replacement order store with change subscribers
//! - Order controller (open / modify / close, derived P/L fields)
//! - Guide-line overlay templates with guarded two-phase drag re-pricing
//! - Bidirectional order ↔ overlay index
//! - Tick-driven stop/target boundary evaluator
//! - Host-chart and order-backend trait seams
//!
//! No UI dependencies; the terminal front end lives in `chartdesk-tui`.

pub mod backend;
pub mod controller;
pub mod domain;
pub mod error;
pub mod evaluator;
pub mod overlay;
pub mod store;

pub use backend::{NullBackend, OrderBackend};
pub use controller::{pl_distance, OrderController};
pub use domain::{
    ExitType, Order, OrderAction, OrderId, OrderPatch, OrderSpec, OverlayId, Precision, Side, Tick,
};
pub use error::OrderError;
pub use evaluator::{check_boundaries, BoundaryHit};
pub use overlay::{
    ChartHost, Coordinate, Figure, LineRole, MemoryChart, OverlayCreate, OverlayIndex,
    OverlayInstance, OverlayState, PointSet,
};
pub use store::OrderStore;
