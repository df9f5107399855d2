//! Host-chart contract.
//!
//! The chart engine owns projection and rendering; this crate only needs a
//! narrow seam: pixel ↔ price conversion, instrument precision, and overlay
//! create/update/remove. `MemoryChart` is a deterministic in-process host
//! with a linear projection, used by the terminal front end and by tests.

use crate::controller::OrderController;
use crate::domain::{Order, OrderAction, OverlayId, Precision};
use crate::error::OrderError;
use crate::overlay::template::{LineRole, OverlayInstance, PointSet};

/// Pixel position on the chart pane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Right,
}

/// Drawing primitives an overlay produces, in price space. The host maps
/// them to pixels with its own projection.
#[derive(Debug, Clone, PartialEq)]
pub enum Figure {
    Line {
        value: f64,
        role: LineRole,
        dashed: bool,
    },
    RectText {
        value: f64,
        text: String,
        align: TextAlign,
        role: LineRole,
    },
}

impl Figure {
    pub fn value(&self) -> f64 {
        match self {
            Figure::Line { value, .. } | Figure::RectText { value, .. } => *value,
        }
    }

    pub fn role(&self) -> LineRole {
        match self {
            Figure::Line { role, .. } | Figure::RectText { role, .. } => *role,
        }
    }
}

/// Payload for registering an order's overlay on the host.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayCreate {
    pub id: OverlayId,
    pub action: OrderAction,
    pub points: PointSet,
}

/// The seam to the chart engine. Consumed, not redefined: hosts already
/// exist; the controller and templates only call through this trait.
pub trait ChartHost {
    fn precision(&self) -> Precision;

    /// Inverse projection: pixel position to price.
    fn convert_from_pixel(&self, coord: Coordinate) -> f64;

    /// Forward projection: price to pixel position.
    fn convert_to_pixel(&self, value: f64) -> Coordinate;

    fn create_overlay(&mut self, create: OverlayCreate);

    fn update_overlay(&mut self, id: &OverlayId, points: PointSet);

    fn remove_overlay(&mut self, id: &OverlayId);
}

/// In-process host with a linear projection: `value = price_top - y *
/// price_per_pixel`. Overlays are kept in insertion order.
#[derive(Debug)]
pub struct MemoryChart {
    precision: Precision,
    price_top: f64,
    price_per_pixel: f64,
    overlays: Vec<OverlayInstance>,
}

impl MemoryChart {
    pub fn new(precision: Precision, price_top: f64, price_per_pixel: f64) -> Self {
        Self {
            precision,
            price_top,
            price_per_pixel,
            overlays: Vec::new(),
        }
    }

    /// Re-anchor the projection, e.g. after the visible price range moved.
    pub fn set_projection(&mut self, price_top: f64, price_per_pixel: f64) {
        self.price_top = price_top;
        self.price_per_pixel = price_per_pixel;
    }

    pub fn overlays(&self) -> &[OverlayInstance] {
        &self.overlays
    }

    pub fn overlay(&self, id: &OverlayId) -> Option<&OverlayInstance> {
        self.overlays.iter().find(|o| &o.id == id)
    }

    pub fn overlay_mut(&mut self, id: &OverlayId) -> Option<&mut OverlayInstance> {
        self.overlays.iter_mut().find(|o| &o.id == id)
    }

    /// Drag step on one of an overlay's lines, from a pixel position.
    /// Converts and snaps to the price grid, then applies the role guard.
    pub fn pressed_moving(
        &mut self,
        id: &OverlayId,
        role: LineRole,
        coord: Coordinate,
        close: f64,
    ) -> Result<(), OrderError> {
        let candidate = self.precision.round_price(self.convert_from_pixel(coord));
        let overlay = self
            .overlay_mut(id)
            .ok_or_else(|| OrderError::OrphanedOverlay(id.clone()))?;
        overlay.on_pressed_moving(role, candidate, close)
    }

    /// Release a drag gesture, committing any staged price.
    pub fn pressed_move_end(
        &mut self,
        id: &OverlayId,
        controller: &mut OrderController,
    ) -> Result<Option<Order>, OrderError> {
        let overlay = self
            .overlay_mut(id)
            .ok_or_else(|| OrderError::OrphanedOverlay(id.clone()))?;
        overlay.on_pressed_move_end(controller)
    }

    /// Abandon a drag gesture without committing.
    pub fn pressed_cancel(&mut self, id: &OverlayId) {
        if let Some(overlay) = self.overlay_mut(id) {
            overlay.cancel_drag();
        }
    }

    /// Build figures for every overlay, in insertion order.
    pub fn collect_figures(&mut self, controller: &OrderController) -> Vec<(OverlayId, Vec<Figure>)> {
        self.overlays
            .iter_mut()
            .map(|ov| (ov.id.clone(), ov.create_point_figures(controller)))
            .collect()
    }
}

impl ChartHost for MemoryChart {
    fn precision(&self) -> Precision {
        self.precision
    }

    fn convert_from_pixel(&self, coord: Coordinate) -> f64 {
        self.price_top - coord.y * self.price_per_pixel
    }

    fn convert_to_pixel(&self, value: f64) -> Coordinate {
        Coordinate {
            x: 0.0,
            y: (self.price_top - value) / self.price_per_pixel,
        }
    }

    fn create_overlay(&mut self, create: OverlayCreate) {
        // Re-creating an existing id replaces it in place.
        if let Some(existing) = self.overlay_mut(&create.id) {
            *existing = OverlayInstance::new(create.id, create.action, create.points);
            return;
        }
        self.overlays
            .push(OverlayInstance::new(create.id, create.action, create.points));
    }

    fn update_overlay(&mut self, id: &OverlayId, points: PointSet) {
        if let Some(overlay) = self.overlay_mut(id) {
            overlay.points = points;
        }
    }

    fn remove_overlay(&mut self, id: &OverlayId) {
        if let Some(pos) = self.overlays.iter().position(|o| &o.id == id) {
            self.overlays.remove(pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderId;

    fn chart() -> MemoryChart {
        // price 110 at y=0, one price unit per pixel
        MemoryChart::new(Precision::default(), 110.0, 1.0)
    }

    fn create(id: u64, entry: f64, tp: Option<f64>) -> OverlayCreate {
        OverlayCreate {
            id: OverlayId::for_order(OrderId(id)),
            action: OrderAction::Buy,
            points: PointSet {
                entry,
                take_profit: tp,
                stop_loss: None,
            },
        }
    }

    #[test]
    fn projection_roundtrip() {
        let c = chart();
        let price = 104.5;
        let px = c.convert_to_pixel(price);
        assert!((c.convert_from_pixel(px) - price).abs() < 1e-9);
        assert!((c.convert_from_pixel(Coordinate { x: 0.0, y: 10.0 }) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn create_update_remove() {
        let mut c = chart();
        let id = OverlayId::for_order(OrderId(1));
        c.create_overlay(create(1, 100.0, Some(108.0)));
        assert_eq!(c.overlays().len(), 1);

        c.update_overlay(
            &id,
            PointSet {
                entry: 100.0,
                take_profit: Some(109.0),
                stop_loss: Some(96.0),
            },
        );
        assert_eq!(c.overlay(&id).unwrap().points.take_profit, Some(109.0));

        c.remove_overlay(&id);
        assert!(c.overlay(&id).is_none());
    }

    #[test]
    fn recreating_an_id_replaces_in_place() {
        let mut c = chart();
        c.create_overlay(create(1, 100.0, None));
        c.create_overlay(create(1, 101.0, Some(108.0)));
        assert_eq!(c.overlays().len(), 1);
        assert_eq!(c.overlays()[0].points.entry, 101.0);
    }

    #[test]
    fn pressed_moving_on_unknown_overlay_is_orphaned() {
        let mut c = chart();
        let err = c
            .pressed_moving(
                &OverlayId::for_order(OrderId(9)),
                LineRole::TakeProfit,
                Coordinate { x: 0.0, y: 2.0 },
                100.0,
            )
            .unwrap_err();
        assert!(matches!(err, OrderError::OrphanedOverlay(_)));
    }

    #[test]
    fn pressed_moving_snaps_to_price_grid() {
        let mut c = MemoryChart::new(Precision::default(), 110.0, 0.333);
        c.create_overlay(create(1, 100.0, Some(108.0)));
        let id = OverlayId::for_order(OrderId(1));
        c.pressed_moving(&id, LineRole::TakeProfit, Coordinate { x: 0.0, y: 3.0 }, 100.0)
            .unwrap();
        let staged = c.overlay(&id).unwrap().points.take_profit.unwrap();
        // 110 - 3 * 0.333 = 109.001, rounded to two decimals
        assert!((staged - 109.0).abs() < 1e-9);
    }
}
