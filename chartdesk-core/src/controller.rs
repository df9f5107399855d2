//! Order controller — open, modify, and close orders; keep derived P/L
//! fields, the overlay index, and the host chart in step with the store.
//!
//! All operations are lookup-then-rebuild: find the order in the store
//! snapshot, apply the transition to a copy, and write the whole list back
//! through `set_orders`. A typed `OrderError` comes back for every failure;
//! nothing here panics.

use crate::backend::OrderBackend;
use crate::domain::{
    ExitType, Order, OrderId, OrderPatch, OrderSpec, OverlayId, Precision, Tick,
};
use crate::error::OrderError;
use crate::overlay::host::{ChartHost, OverlayCreate};
use crate::overlay::registry::OverlayIndex;
use crate::overlay::template::PointSet;
use crate::store::OrderStore;
use chrono::Utc;

/// Profit distance from entry to a mark price, from the position's
/// perspective: positive is profit. Buy profits above entry, sell below.
pub fn pl_distance(entry: f64, mark: f64, is_buy: bool) -> f64 {
    if is_buy {
        mark - entry
    } else {
        entry - mark
    }
}

/// Live market context: last tick and instrument precision, as reported by
/// the feed and the host chart. Both start absent; operations that need
/// them degrade until they arrive.
#[derive(Debug, Default)]
struct MarketState {
    tick: Option<Tick>,
    precision: Option<Precision>,
}

impl MarketState {
    /// Refresh an order's derived fields. Only open market orders carry a
    /// live P/L; pending and closed orders read as blank.
    fn recompute(&self, order: &mut Order) {
        let live = order.is_open() && order.action.is_market();
        let Some(tick) = (if live { self.tick.as_ref() } else { None }) else {
            order.pips = None;
            order.pl = None;
            return;
        };
        let precision = self.precision.unwrap_or_default();
        let dist = pl_distance(order.entry_point, tick.close, order.side().is_buy());
        order.pips = Some(dist / precision.pip_size());
        order.pl = Some(dist * order.lot_size);
    }
}

pub struct OrderController {
    store: OrderStore,
    index: OverlayIndex,
    backend: Box<dyn OrderBackend>,
    market: MarketState,
    next_id: u64,
}

impl OrderController {
    pub fn new(backend: Box<dyn OrderBackend>) -> Self {
        Self {
            store: OrderStore::new(),
            index: OverlayIndex::new(),
            backend,
            market: MarketState::default(),
            next_id: 1,
        }
    }

    pub fn store(&self) -> &OrderStore {
        &self.store
    }

    /// For subscribing UI listeners; all writes still go through the
    /// controller's operations.
    pub fn store_mut(&mut self) -> &mut OrderStore {
        &mut self.store
    }

    pub fn orders(&self) -> &[Order] {
        self.store.orders()
    }

    pub fn index(&self) -> &OverlayIndex {
        &self.index
    }

    pub fn tick(&self) -> Option<&Tick> {
        self.market.tick.as_ref()
    }

    pub fn precision(&self) -> Option<Precision> {
        self.market.precision
    }

    pub fn set_precision(&mut self, precision: Precision) {
        self.market.precision = Some(precision);
    }

    /// Advance the live tick and refresh every order's derived fields.
    /// Bumps the store revision so P/L columns repaint.
    pub fn set_tick(&mut self, tick: Tick) {
        self.market.tick = Some(tick);
        let mut orders = self.store.orders().to_vec();
        for order in &mut orders {
            self.market.recompute(order);
        }
        self.store.set_orders(orders);
    }

    /// Open an order: validate, assign an id, insert into the store,
    /// register and create its overlay, notify the backend.
    ///
    /// Market actions take their entry from the current tick close and fail
    /// with `PrecisionUnavailable` before the first tick. Pending actions
    /// require an explicit entry point.
    pub fn open_order(
        &mut self,
        spec: OrderSpec,
        chart: &mut dyn ChartHost,
    ) -> Result<Order, OrderError> {
        let entry_point = match spec.entry_point {
            Some(value) => value,
            None if spec.action.is_market() => {
                self.market
                    .tick
                    .as_ref()
                    .ok_or(OrderError::PrecisionUnavailable)?
                    .close
            }
            None => return Err(OrderError::MissingEntryPoint(spec.action)),
        };

        let order_id = match spec.order_id {
            Some(raw) => {
                let id = OrderId(raw);
                if self.store.get(id).is_some() {
                    return Err(OrderError::DuplicateOrderId(id));
                }
                self.next_id = self.next_id.max(raw + 1);
                id
            }
            None => {
                let id = OrderId(self.next_id);
                self.next_id += 1;
                id
            }
        };

        let mut order = Order {
            order_id,
            session_id: spec.session_id,
            action: spec.action,
            entry_point,
            stop_loss: spec.stop_loss,
            take_profit: spec.take_profit,
            lot_size: spec.lot_size,
            pips: None,
            pl: None,
            entry_time: Utc::now(),
            exit_time: None,
            exit_type: None,
            exit_point: None,
            partials: None,
        };
        self.market.recompute(&mut order);

        let mut orders = self.store.orders().to_vec();
        orders.push(order.clone());
        self.store.set_orders(orders);

        let overlay_id = OverlayId::for_order(order_id);
        self.index.register(order_id, overlay_id.clone());
        chart.create_overlay(OverlayCreate {
            id: overlay_id,
            action: order.action,
            points: PointSet::from_order(&order),
        });

        self.backend.on_order_placed(&order);
        Ok(order)
    }

    /// Merge a patch over an existing order. Only fields present in the
    /// patch change; derived fields are recomputed; the backend is told.
    ///
    /// Does not touch the chart: drag commits already hold the overlay, and
    /// other callers follow up with [`OrderController::sync_overlay`].
    pub fn modify_order(&mut self, patch: OrderPatch) -> Result<Order, OrderError> {
        let mut orders = self.store.orders().to_vec();
        let order = orders
            .iter_mut()
            .find(|o| o.order_id == patch.id)
            .ok_or(OrderError::OrderNotFound(patch.id))?;

        if let Some(sl) = patch.stop_loss {
            order.stop_loss = Some(sl);
        }
        if let Some(tp) = patch.take_profit {
            order.take_profit = Some(tp);
        }
        if let Some(entry) = patch.entry_point {
            order.entry_point = entry;
        }
        if let Some(lot) = patch.lot_size {
            order.lot_size = lot;
        }
        self.market.recompute(order);

        let updated = order.clone();
        self.store.set_orders(orders);
        self.backend.update_order(&updated);
        Ok(updated)
    }

    /// Push an order's committed levels to its chart overlay.
    pub fn sync_overlay(&self, order: &Order, chart: &mut dyn ChartHost) {
        if let Some(overlay_id) = self.index.overlay_for(order.order_id) {
            chart.update_overlay(overlay_id, PointSet::from_order(order));
        }
    }

    /// Close an order: write the exit fields, remove it from the store and
    /// its overlay from the chart, and forward the closed record to the
    /// backend (cancellations are not forwarded).
    ///
    /// `trigger_level` is the breached boundary for takeprofit/stoploss
    /// exits; manual closes exit at the current tick close.
    pub fn close_order(
        &mut self,
        order_id: OrderId,
        exit_type: ExitType,
        trigger_level: Option<f64>,
        chart: &mut dyn ChartHost,
    ) -> Result<Order, OrderError> {
        let mut orders = self.store.orders().to_vec();
        let pos = orders
            .iter()
            .position(|o| o.order_id == order_id)
            .ok_or(OrderError::OrderNotFound(order_id))?;

        let exit_point = match exit_type {
            ExitType::TakeProfit => trigger_level.or(orders[pos].take_profit),
            ExitType::StopLoss => trigger_level.or(orders[pos].stop_loss),
            ExitType::ManualClose => Some(
                self.market
                    .tick
                    .as_ref()
                    .ok_or(OrderError::PrecisionUnavailable)?
                    .close,
            ),
            ExitType::Cancel => None,
        };

        let mut closed = orders.remove(pos);
        closed.exit_type = Some(exit_type);
        closed.exit_time = Some(Utc::now());
        closed.exit_point = exit_point;
        if let Some(exit) = exit_point {
            let dist = pl_distance(closed.entry_point, exit, closed.side().is_buy());
            let precision = self.market.precision.unwrap_or_default();
            closed.pips = Some(dist / precision.pip_size());
            closed.pl = Some(dist * closed.lot_size);
        }

        self.store.set_orders(orders);
        if let Some(overlay_id) = self.index.deregister(order_id) {
            chart.remove_overlay(&overlay_id);
        }
        if exit_type != ExitType::Cancel {
            self.backend.order_closed(&closed, exit_type);
        }
        Ok(closed)
    }

    /// Close by overlay handle. An overlay the index does not know is an
    /// orphan and comes back as a distinct failure.
    pub fn close_overlay(
        &mut self,
        overlay_id: &OverlayId,
        exit_type: ExitType,
        trigger_level: Option<f64>,
        chart: &mut dyn ChartHost,
    ) -> Result<Order, OrderError> {
        let order_id = self
            .index
            .order_for(overlay_id)
            .ok_or_else(|| OrderError::OrphanedOverlay(overlay_id.clone()))?;
        self.close_order(order_id, exit_type, trigger_level, chart)
    }

    /// Signed profit distance from entry to the current tick close,
    /// formatted to `precision` decimals. `None` before the first tick.
    pub fn calc_pl(&self, entry: f64, precision: u8, is_buy: bool) -> Option<String> {
        let tick = self.market.tick.as_ref()?;
        let dist = pl_distance(entry, tick.close, is_buy);
        Some(format!("{:+.*}", precision as usize, dist))
    }

    /// Signed profit distance between two arbitrary levels, same sign
    /// convention as `calc_pl`.
    pub fn calc_stop_or_target(
        &self,
        entry: f64,
        target: f64,
        precision: u8,
        is_buy: bool,
    ) -> String {
        let dist = pl_distance(entry, target, is_buy);
        format!("{:+.*}", precision as usize, dist)
    }
}
