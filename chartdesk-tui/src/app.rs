//! Application state — single-owner, main-thread only.
//!
//! The event loop owns everything: controller, chart, feed, modal forms.
//! There is no worker thread; ticks and key events are interleaved on one
//! thread, so every mutation path runs to completion before the next starts.

use std::path::PathBuf;

use chartdesk_core::{
    check_boundaries, LineRole, MemoryChart, NullBackend, Order, OrderAction, OrderController,
    OrderId, OrderPatch, OrderSpec, OverlayId, Precision, Tick,
};

use crate::feed::PlaybackFeed;
use crate::theme::Theme;

/// Logical pixel height of the chart projection. Terminal rows are mapped
/// onto this fixed grid so drag arithmetic is independent of window size.
pub const CHART_PIXEL_ROWS: f64 = 200.0;

/// Which panel is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Chart,
    Orders,
    Help,
}

impl Panel {
    pub fn index(self) -> usize {
        match self {
            Panel::Chart => 0,
            Panel::Orders => 1,
            Panel::Help => 2,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Panel::Chart),
            1 => Some(Panel::Orders),
            2 => Some(Panel::Help),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Chart => "Chart",
            Panel::Orders => "Orders",
            Panel::Help => "Help",
        }
    }

    pub fn next(self) -> Panel {
        Panel::from_index((self.index() + 1) % 3).unwrap_or(Panel::Chart)
    }

    pub fn prev(self) -> Panel {
        Panel::from_index((self.index() + 2) % 3).unwrap_or(Panel::Chart)
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

fn parse_optional(input: &str) -> Result<Option<f64>, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| format!("not a number: {trimmed}"))
}

/// Order ticket form. Entry stays blank for market actions; limit/stop
/// actions need it filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketForm {
    pub action: OrderAction,
    pub lot_input: String,
    pub entry_input: String,
    pub tp_input: String,
    pub sl_input: String,
    pub field: usize,
}

impl TicketForm {
    pub const FIELDS: [&'static str; 4] = ["lot size", "entry", "take profit", "stop loss"];

    pub fn new(action: OrderAction) -> Self {
        Self {
            action,
            lot_input: String::from("1"),
            entry_input: String::new(),
            tp_input: String::new(),
            sl_input: String::new(),
            field: 0,
        }
    }

    pub fn next_field(&mut self) {
        self.field = (self.field + 1) % Self::FIELDS.len();
    }

    pub fn prev_field(&mut self) {
        self.field = (self.field + Self::FIELDS.len() - 1) % Self::FIELDS.len();
    }

    pub fn active_input_mut(&mut self) -> &mut String {
        match self.field {
            0 => &mut self.lot_input,
            1 => &mut self.entry_input,
            2 => &mut self.tp_input,
            _ => &mut self.sl_input,
        }
    }

    pub fn to_spec(&self) -> Result<OrderSpec, String> {
        let lot = self
            .lot_input
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("lot size is not a number: {}", self.lot_input))?;
        if lot <= 0.0 {
            return Err(String::from("lot size must be positive"));
        }
        Ok(OrderSpec {
            order_id: None,
            session_id: None,
            action: self.action,
            entry_point: parse_optional(&self.entry_input)?,
            stop_loss: parse_optional(&self.sl_input)?,
            take_profit: parse_optional(&self.tp_input)?,
            lot_size: lot,
        })
    }
}

/// Modify form, prefilled from the order's committed values. Blank fields
/// are left untouched by the resulting patch.
#[derive(Debug, Clone, PartialEq)]
pub struct ModifyForm {
    pub order_id: OrderId,
    pub entry_input: String,
    pub tp_input: String,
    pub sl_input: String,
    pub lot_input: String,
    pub field: usize,
}

impl ModifyForm {
    pub const FIELDS: [&'static str; 4] = ["entry", "take profit", "stop loss", "lot size"];

    pub fn from_order(order: &Order) -> Self {
        let fmt = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
        Self {
            order_id: order.order_id,
            entry_input: order.entry_point.to_string(),
            tp_input: fmt(order.take_profit),
            sl_input: fmt(order.stop_loss),
            lot_input: order.lot_size.to_string(),
            field: 0,
        }
    }

    pub fn next_field(&mut self) {
        self.field = (self.field + 1) % Self::FIELDS.len();
    }

    pub fn prev_field(&mut self) {
        self.field = (self.field + Self::FIELDS.len() - 1) % Self::FIELDS.len();
    }

    pub fn active_input_mut(&mut self) -> &mut String {
        match self.field {
            0 => &mut self.entry_input,
            1 => &mut self.tp_input,
            2 => &mut self.sl_input,
            _ => &mut self.lot_input,
        }
    }

    pub fn to_patch(&self) -> Result<OrderPatch, String> {
        let mut patch = OrderPatch::new(self.order_id);
        patch.entry_point = parse_optional(&self.entry_input)?;
        patch.take_profit = parse_optional(&self.tp_input)?;
        patch.stop_loss = parse_optional(&self.sl_input)?;
        patch.lot_size = parse_optional(&self.lot_input)?;
        Ok(patch)
    }
}

/// Which modal form (if any) is shown on top.
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    None,
    Ticket(TicketForm),
    Modify(ModifyForm),
}

/// A keyboard drag in progress on one of an overlay's lines.
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    pub overlay_id: OverlayId,
    pub role: LineRole,
}

/// Top-level application state.
pub struct AppState {
    pub controller: OrderController,
    pub chart: MemoryChart,
    pub feed: PlaybackFeed,
    pub theme: Theme,

    pub active_panel: Panel,
    pub running: bool,
    pub modal: Modal,
    pub drag: Option<DragState>,

    /// Cursor into the orders table.
    pub orders_cursor: usize,
    /// Cursor into the chart's overlay list.
    pub chart_cursor: usize,

    pub status_message: Option<(String, StatusLevel)>,
    /// Where the style settings are persisted on exit.
    pub settings_path: PathBuf,
}

impl AppState {
    pub fn new(candles: Vec<Tick>, theme: Theme, settings_path: PathBuf) -> Self {
        let precision = Precision::default();
        let mut controller = OrderController::new(Box::new(NullBackend));
        controller.set_precision(precision);
        let start = candles.first().map(|c| c.close).unwrap_or(100.0);
        let span = start * 0.04;
        let chart = MemoryChart::new(precision, start + span / 2.0, span / CHART_PIXEL_ROWS);

        Self {
            controller,
            chart,
            feed: PlaybackFeed::new(candles),
            theme,
            active_panel: Panel::Chart,
            running: true,
            modal: Modal::None,
            drag: None,
            orders_cursor: 0,
            chart_cursor: 0,
            status_message: None,
            settings_path,
        }
    }

    /// Advance market state by one candle: refresh derived fields, re-anchor
    /// the projection, and close every order whose stop or target the candle
    /// breached.
    pub fn on_tick(&mut self, tick: Tick) {
        self.controller.set_tick(tick);

        // Keep the projection centered on price, but not mid-drag: moving
        // the grid under an active gesture would re-price the drag.
        if self.drag.is_none() {
            let span = tick.close * 0.04;
            self.chart
                .set_projection(tick.close + span / 2.0, span / CHART_PIXEL_ROWS);
        }

        let hits = check_boundaries(self.controller.orders(), &tick);
        for hit in hits {
            match self.controller.close_order(
                hit.order_id,
                hit.exit_type,
                Some(hit.level),
                &mut self.chart,
            ) {
                Ok(order) => self.set_status(format!(
                    "order {} closed: {} at {}",
                    order.order_id,
                    hit.exit_type,
                    hit.level
                )),
                Err(err) => self.set_warning(err.to_string()),
            }
        }
    }

    pub fn open_ticket(&mut self, action: OrderAction) {
        self.modal = Modal::Ticket(TicketForm::new(action));
        self.feed.synthetic_pause();
    }

    pub fn open_modify(&mut self, order_id: OrderId) {
        match self.controller.store().get(order_id) {
            Some(order) => {
                self.modal = Modal::Modify(ModifyForm::from_order(order));
                self.feed.synthetic_pause();
            }
            None => self.set_warning(format!("order {order_id} not found")),
        }
    }

    /// Close any modal and lift the synthetic pause. A user pause survives.
    pub fn close_modal(&mut self) {
        self.modal = Modal::None;
        self.feed.synthetic_play();
    }

    pub fn selected_order(&self) -> Option<&Order> {
        self.controller.orders().get(self.orders_cursor)
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::sample_candles;
    use chrono::Utc;

    fn app() -> AppState {
        AppState::new(
            sample_candles(10, 67_000.0, 1),
            Theme::default(),
            PathBuf::from("."),
        )
    }

    fn tick(close: f64) -> Tick {
        Tick {
            timestamp: Utc::now(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 100.0,
        }
    }

    #[test]
    fn settings_path_is_retained_for_the_exit_save() {
        let app = AppState::new(
            sample_candles(1, 67_000.0, 1),
            Theme::default(),
            PathBuf::from("/tmp/chartdesk/style.toml"),
        );
        assert_eq!(app.settings_path, PathBuf::from("/tmp/chartdesk/style.toml"));
    }

    #[test]
    fn panel_cycle() {
        assert_eq!(Panel::Chart.next(), Panel::Orders);
        assert_eq!(Panel::Help.next(), Panel::Chart);
        assert_eq!(Panel::Chart.prev(), Panel::Help);
        for i in 0..3 {
            assert_eq!(Panel::from_index(i).unwrap().index(), i);
        }
        assert!(Panel::from_index(3).is_none());
    }

    #[test]
    fn ticket_form_parses_spec() {
        let mut form = TicketForm::new(OrderAction::BuyLimit);
        form.lot_input = String::from("2.5");
        form.entry_input = String::from("66500");
        form.tp_input = String::from("69000");

        let spec = form.to_spec().unwrap();
        assert_eq!(spec.action, OrderAction::BuyLimit);
        assert_eq!(spec.lot_size, 2.5);
        assert_eq!(spec.entry_point, Some(66_500.0));
        assert_eq!(spec.take_profit, Some(69_000.0));
        assert_eq!(spec.stop_loss, None);
    }

    #[test]
    fn ticket_form_rejects_bad_numbers() {
        let mut form = TicketForm::new(OrderAction::Buy);
        form.lot_input = String::from("abc");
        assert!(form.to_spec().is_err());

        form.lot_input = String::from("0");
        assert!(form.to_spec().is_err());

        form.lot_input = String::from("1");
        form.tp_input = String::from("69k");
        assert!(form.to_spec().is_err());
    }

    #[test]
    fn modify_form_prefills_and_patches() {
        let mut app = app();
        app.on_tick(tick(67_000.0));
        let order = app
            .controller
            .open_order(OrderSpec::market(OrderAction::Buy, 3.0), &mut app.chart)
            .unwrap();

        let mut form = ModifyForm::from_order(&order);
        assert_eq!(form.lot_input, "3");
        form.tp_input = String::from("69000");
        let patch = form.to_patch().unwrap();
        assert_eq!(patch.take_profit, Some(69_000.0));
        assert_eq!(patch.stop_loss, None);
    }

    #[test]
    fn tick_closes_breached_orders() {
        let mut app = app();
        app.on_tick(tick(67_000.0));
        let mut spec = OrderSpec::market(OrderAction::Buy, 100.0);
        spec.take_profit = Some(69_000.0);
        app.controller.open_order(spec, &mut app.chart).unwrap();

        app.on_tick(tick(69_100.0));
        assert!(app.controller.orders().is_empty());
        assert!(app.chart.overlays().is_empty());
    }

    #[test]
    fn modal_lifecycle_synchronizes_pause() {
        let mut app = app();
        app.open_ticket(OrderAction::Buy);
        assert!(app.feed.is_synthetic_paused());
        assert!(matches!(app.modal, Modal::Ticket(_)));

        app.close_modal();
        assert!(!app.feed.is_synthetic_paused());
        assert!(!app.feed.is_paused());
    }
}
