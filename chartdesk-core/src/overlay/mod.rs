//! Chart overlay layer: host contract, per-order guide-line templates,
//! and the order ↔ overlay index.

pub mod host;
pub mod registry;
pub mod template;

pub use host::{ChartHost, Coordinate, Figure, MemoryChart, OverlayCreate, TextAlign};
pub use registry::OverlayIndex;
pub use template::{
    DragSession, EditRequest, LineRole, LineTemplate, OverlayInstance, OverlayState, PointSet,
};
