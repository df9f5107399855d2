//! Error taxonomy for order and overlay operations.

use crate::domain::{OrderAction, OrderId, OverlayId, Side};
use crate::overlay::LineRole;

/// Failures surfaced by the controller and the overlay layer.
///
/// Guard rejections (`InvalidDragTarget`) are expected in normal operation
/// and are handled by reverting the gesture; the rest indicate a caller bug
/// or missing market state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OrderError {
    #[error("order {0} not found")]
    OrderNotFound(OrderId),

    #[error("order id {0} already exists")]
    DuplicateOrderId(OrderId),

    #[error("pending action {0} requires an explicit entry point")]
    MissingEntryPoint(OrderAction),

    #[error("drag target {candidate} violates the {side} {role} guard")]
    InvalidDragTarget {
        side: Side,
        role: LineRole,
        candidate: f64,
    },

    #[error("no tick or precision available yet")]
    PrecisionUnavailable,

    #[error("overlay {0} has no backing order")]
    OrphanedOverlay(OverlayId),
}
