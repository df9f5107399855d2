//! Guide-line overlay templates — one per order-side × line-role combination,
//! sharing one guarded implementation.
//!
//! Each open order owns one `OverlayInstance` on the chart with up to three
//! horizontal lines: entry, take profit, stop loss. Dragging a line stages a
//! new price in a two-phase `DragSession`; the stage is mirrored into the
//! visible point immediately but only committed to the order on release.
//! A guard rejection reverts the point, so no optimistic value survives a
//! rejected gesture.

use crate::controller::OrderController;
use crate::domain::{Order, OrderAction, OrderId, OrderPatch, OverlayId, Precision, Side};
use crate::error::OrderError;
use crate::overlay::host::{Figure, TextAlign};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which guide line of an order overlay a figure or drag refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineRole {
    Entry,
    TakeProfit,
    StopLoss,
}

impl LineRole {
    pub fn label(self) -> &'static str {
        match self {
            LineRole::Entry => "entry",
            LineRole::TakeProfit => "tp",
            LineRole::StopLoss => "sl",
        }
    }
}

impl fmt::Display for LineRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Price levels an overlay renders. Mirrors the backing order's levels
/// except mid-drag, when the dragged role holds the staged candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointSet {
    pub entry: f64,
    pub take_profit: Option<f64>,
    pub stop_loss: Option<f64>,
}

impl PointSet {
    pub fn from_order(order: &Order) -> Self {
        Self {
            entry: order.entry_point,
            take_profit: order.take_profit,
            stop_loss: order.stop_loss,
        }
    }

    pub fn value(&self, role: LineRole) -> Option<f64> {
        match role {
            LineRole::Entry => Some(self.entry),
            LineRole::TakeProfit => self.take_profit,
            LineRole::StopLoss => self.stop_loss,
        }
    }

    pub fn set(&mut self, role: LineRole, value: f64) {
        match role {
            LineRole::Entry => self.entry = value,
            LineRole::TakeProfit => self.take_profit = Some(value),
            LineRole::StopLoss => self.stop_loss = Some(value),
        }
    }
}

/// Per-instance lifecycle of an order overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    /// Registered on the chart, nothing drawn yet.
    Created,
    /// Figures built at least once.
    Rendered,
    /// A line is being dragged; a `DragSession` is live.
    Dragging,
    /// The last drag committed through the controller.
    Committed,
    /// Taken off the chart; the instance is about to be dropped.
    Removed,
}

/// Two-phase drag transaction. `original` is the committed value at drag
/// start; `staged` is the last guard-accepted candidate, if any.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub role: LineRole,
    pub original: f64,
    pub staged: Option<f64>,
}

/// Edit request surfaced by a right click, routed to the UI's modify form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditRequest {
    pub order_id: OrderId,
}

/// Drag guard for one side × role combination.
///
/// The asymmetry is the point: a buy take profit must stay strictly above
/// both the current tick and the entry, a buy stop loss strictly below
/// both, and the sell side inverts each rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineTemplate {
    pub side: Side,
    pub role: LineRole,
}

impl LineTemplate {
    pub fn new(side: Side, role: LineRole) -> Self {
        Self { side, role }
    }

    pub fn buy_profit_line() -> Self {
        Self::new(Side::Buy, LineRole::TakeProfit)
    }

    pub fn buy_stop_line() -> Self {
        Self::new(Side::Buy, LineRole::StopLoss)
    }

    pub fn sell_profit_line() -> Self {
        Self::new(Side::Sell, LineRole::TakeProfit)
    }

    pub fn sell_stop_line() -> Self {
        Self::new(Side::Sell, LineRole::StopLoss)
    }

    /// Whether a drag candidate is a legal value for this line.
    ///
    /// `entry` is the committed entry level, `close` the current tick close.
    /// Entry lines are only draggable on pending orders; a filled entry is
    /// history and must not move.
    pub fn accepts_drag(&self, candidate: f64, entry: f64, close: f64, pending: bool) -> bool {
        match (self.side, self.role) {
            (_, LineRole::Entry) => pending && candidate > 0.0,
            (Side::Buy, LineRole::TakeProfit) => candidate > close && candidate > entry,
            (Side::Buy, LineRole::StopLoss) => candidate < close && candidate < entry,
            (Side::Sell, LineRole::TakeProfit) => candidate < close && candidate < entry,
            (Side::Sell, LineRole::StopLoss) => candidate > close && candidate > entry,
        }
    }
}

/// One order's overlay on the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayInstance {
    pub id: OverlayId,
    pub action: OrderAction,
    pub points: PointSet,
    pub state: OverlayState,
    pub drag: Option<DragSession>,
}

impl OverlayInstance {
    pub fn new(id: OverlayId, action: OrderAction, points: PointSet) -> Self {
        Self {
            id,
            action,
            points,
            state: OverlayState::Created,
            drag: None,
        }
    }

    pub fn order_id(&self) -> Option<OrderId> {
        self.id.order_id()
    }

    /// Build the horizontal guide lines and their labels. Label text is
    /// derived from the controller on every call, never cached.
    pub fn create_point_figures(&mut self, controller: &OrderController) -> Vec<Figure> {
        if self.state == OverlayState::Created {
            self.state = OverlayState::Rendered;
        }
        let precision = controller.precision().unwrap_or_default();
        let is_buy = self.action.side().is_buy();
        let mut figures = Vec::with_capacity(6);

        figures.push(Figure::Line {
            value: self.points.entry,
            role: LineRole::Entry,
            dashed: self.action.is_pending(),
        });
        figures.push(Figure::RectText {
            value: self.points.entry,
            text: self.entry_label(controller, precision),
            align: TextAlign::Right,
            role: LineRole::Entry,
        });

        for (role, level) in [
            (LineRole::TakeProfit, self.points.take_profit),
            (LineRole::StopLoss, self.points.stop_loss),
        ] {
            let Some(level) = level else { continue };
            figures.push(Figure::Line {
                value: level,
                role,
                dashed: true,
            });
            let dist =
                controller.calc_stop_or_target(self.points.entry, level, precision.price, is_buy);
            figures.push(Figure::RectText {
                value: level,
                text: format!("{} | {dist}", role.label()),
                align: TextAlign::Right,
                role,
            });
        }

        figures
    }

    /// Price labels on the value axis, one per rendered line.
    pub fn create_y_axis_figures(&self, precision: Precision) -> Vec<Figure> {
        let mut figures = Vec::with_capacity(3);
        for role in [LineRole::Entry, LineRole::TakeProfit, LineRole::StopLoss] {
            let Some(level) = self.points.value(role) else {
                continue;
            };
            figures.push(Figure::RectText {
                value: level,
                text: precision.format_price(level),
                align: TextAlign::Right,
                role,
            });
        }
        figures
    }

    /// Handle a drag step at an already-converted candidate price.
    ///
    /// Starts a `DragSession` on the first step. Accepted candidates are
    /// staged and mirrored into the visible point; rejected ones clear the
    /// stage and snap the point back to the value at drag start.
    pub fn on_pressed_moving(
        &mut self,
        role: LineRole,
        candidate: f64,
        close: f64,
    ) -> Result<(), OrderError> {
        let side = self.action.side();
        let original = match self.drag {
            Some(session) if session.role == role => session.original,
            _ => {
                let Some(value) = self.points.value(role) else {
                    return Err(OrderError::InvalidDragTarget { side, role, candidate });
                };
                self.drag = Some(DragSession {
                    role,
                    original: value,
                    staged: None,
                });
                self.state = OverlayState::Dragging;
                value
            }
        };

        // Guard against the committed entry, not the moving point.
        let entry = if role == LineRole::Entry {
            original
        } else {
            self.points.entry
        };
        let template = LineTemplate::new(side, role);
        if template.accepts_drag(candidate, entry, close, self.action.is_pending()) {
            if let Some(session) = &mut self.drag {
                session.staged = Some(candidate);
            }
            self.points.set(role, candidate);
            Ok(())
        } else {
            if let Some(session) = &mut self.drag {
                session.staged = None;
            }
            self.points.set(role, original);
            Err(OrderError::InvalidDragTarget { side, role, candidate })
        }
    }

    /// Finish a drag gesture.
    ///
    /// A staged candidate commits through `modify_order` and the points are
    /// rebuilt from the updated order. No stage (never accepted, or rejected
    /// last) reverts the point to the value at drag start. A missing backing
    /// order is a failure result, never a panic.
    pub fn on_pressed_move_end(
        &mut self,
        controller: &mut OrderController,
    ) -> Result<Option<Order>, OrderError> {
        let Some(session) = self.drag.take() else {
            return Ok(None);
        };
        let Some(staged) = session.staged else {
            self.points.set(session.role, session.original);
            self.state = OverlayState::Rendered;
            return Ok(None);
        };

        let order_id = self
            .order_id()
            .ok_or_else(|| OrderError::OrphanedOverlay(self.id.clone()))?;
        let mut patch = OrderPatch::new(order_id);
        match session.role {
            LineRole::Entry => patch.entry_point = Some(staged),
            LineRole::TakeProfit => patch.take_profit = Some(staged),
            LineRole::StopLoss => patch.stop_loss = Some(staged),
        }

        match controller.modify_order(patch) {
            Ok(updated) => {
                self.points = PointSet::from_order(&updated);
                self.state = OverlayState::Committed;
                Ok(Some(updated))
            }
            Err(err) => {
                self.points.set(session.role, session.original);
                self.state = OverlayState::Rendered;
                Err(err)
            }
        }
    }

    /// Abandon a drag gesture: revert the point to the value at drag start
    /// and drop the session without touching the order.
    pub fn cancel_drag(&mut self) {
        if let Some(session) = self.drag.take() {
            self.points.set(session.role, session.original);
            self.state = OverlayState::Rendered;
        }
    }

    /// Right click on any of the order's lines opens the modify form.
    pub fn on_right_click(&self) -> Result<EditRequest, OrderError> {
        let order_id = self
            .order_id()
            .ok_or_else(|| OrderError::OrphanedOverlay(self.id.clone()))?;
        Ok(EditRequest { order_id })
    }

    fn entry_label(&self, controller: &OrderController, precision: Precision) -> String {
        let action = self.action.label();
        if self.action.is_market() {
            match controller.calc_pl(
                self.points.entry,
                precision.price,
                self.action.side().is_buy(),
            ) {
                Some(pl) => format!("{action} | {pl}"),
                None => action.to_string(),
            }
        } else {
            format!("{action} | {}", precision.format_price(self.points.entry))
        }
    }
}
