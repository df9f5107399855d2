//! Keyboard input dispatch — modal forms → global keys → panel-specific
//! handlers. Drags are keyboard-driven: pick a line, nudge it row by row,
//! commit with Enter or abandon with Esc.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use chartdesk_core::{ChartHost, Coordinate, ExitType, LineRole, OrderAction};

use crate::app::{AppState, DragState, Modal, Panel};

const TICKET_ACTIONS: [OrderAction; 6] = [
    OrderAction::Buy,
    OrderAction::Sell,
    OrderAction::BuyLimit,
    OrderAction::SellLimit,
    OrderAction::BuyStop,
    OrderAction::SellStop,
];

/// Handle a key event.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Modal forms consume input first.
    if !matches!(app.modal, Modal::None) {
        handle_modal_key(app, key);
        return;
    }

    // 2. Global keys (always available).
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('1') => {
            app.active_panel = Panel::Chart;
            return;
        }
        KeyCode::Char('2') => {
            app.active_panel = Panel::Orders;
            return;
        }
        KeyCode::Char('3') => {
            app.active_panel = Panel::Help;
            return;
        }
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.active_panel = app.active_panel.prev();
            } else {
                app.active_panel = app.active_panel.next();
            }
            return;
        }
        KeyCode::BackTab => {
            app.active_panel = app.active_panel.prev();
            return;
        }
        KeyCode::Char(' ') => {
            app.feed.toggle_pause();
            return;
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            app.feed.speed_up();
            return;
        }
        KeyCode::Char('-') => {
            app.feed.slow_down();
            return;
        }
        KeyCode::Char('b') => {
            app.open_ticket(OrderAction::Buy);
            return;
        }
        KeyCode::Char('s') => {
            app.open_ticket(OrderAction::Sell);
            return;
        }
        _ => {}
    }

    // 3. Panel-specific keys.
    match app.active_panel {
        Panel::Chart => handle_chart_key(app, key),
        Panel::Orders => handle_orders_key(app, key),
        Panel::Help => {} // display only
    }
}

fn handle_modal_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.close_modal();
            return;
        }
        KeyCode::Enter => {
            submit_modal(app);
            return;
        }
        _ => {}
    }

    match &mut app.modal {
        Modal::Ticket(form) => match key.code {
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            // Left/Right cycle the order action through all six types.
            KeyCode::Right => {
                let i = TICKET_ACTIONS.iter().position(|a| *a == form.action).unwrap_or(0);
                form.action = TICKET_ACTIONS[(i + 1) % TICKET_ACTIONS.len()];
            }
            KeyCode::Left => {
                let i = TICKET_ACTIONS.iter().position(|a| *a == form.action).unwrap_or(0);
                form.action = TICKET_ACTIONS[(i + TICKET_ACTIONS.len() - 1) % TICKET_ACTIONS.len()];
            }
            KeyCode::Backspace => {
                form.active_input_mut().pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => {
                form.active_input_mut().push(c);
            }
            _ => {}
        },
        Modal::Modify(form) => match key.code {
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::Backspace => {
                form.active_input_mut().pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => {
                form.active_input_mut().push(c);
            }
            _ => {}
        },
        Modal::None => {}
    }
}

/// Submit the open modal. On failure the form is restored with its state
/// intact so the user can correct and retry.
fn submit_modal(app: &mut AppState) {
    let modal = std::mem::replace(&mut app.modal, Modal::None);
    match modal {
        Modal::Ticket(form) => {
            let spec = match form.to_spec() {
                Ok(spec) => spec,
                Err(msg) => {
                    app.set_warning(msg);
                    app.modal = Modal::Ticket(form);
                    return;
                }
            };
            match app.controller.open_order(spec, &mut app.chart) {
                Ok(order) => {
                    app.set_status(format!("order {} placed: {}", order.order_id, order.action));
                    app.close_modal();
                }
                Err(err) => {
                    app.set_warning(err.to_string());
                    app.modal = Modal::Ticket(form);
                }
            }
        }
        Modal::Modify(form) => {
            let patch = match form.to_patch() {
                Ok(patch) => patch,
                Err(msg) => {
                    app.set_warning(msg);
                    app.modal = Modal::Modify(form);
                    return;
                }
            };
            match app.controller.modify_order(patch) {
                Ok(updated) => {
                    app.controller.sync_overlay(&updated, &mut app.chart);
                    app.set_status(format!("order {} updated", updated.order_id));
                    app.close_modal();
                }
                Err(err) => {
                    app.set_warning(err.to_string());
                    app.modal = Modal::Modify(form);
                }
            }
        }
        Modal::None => {}
    }
}

fn handle_chart_key(app: &mut AppState, key: KeyEvent) {
    let overlay_count = app.chart.overlays().len();

    match key.code {
        KeyCode::Char('j') => {
            if overlay_count > 0 && app.chart_cursor + 1 < overlay_count {
                app.chart_cursor += 1;
            }
        }
        KeyCode::Char('k') => {
            app.chart_cursor = app.chart_cursor.saturating_sub(1);
        }
        KeyCode::Char('t') => start_drag(app, LineRole::TakeProfit),
        KeyCode::Char('g') => start_drag(app, LineRole::StopLoss),
        KeyCode::Char('e') => start_drag(app, LineRole::Entry),
        KeyCode::Up => nudge_drag(app, -1.0),
        KeyCode::Down => nudge_drag(app, 1.0),
        KeyCode::Enter => commit_drag(app),
        KeyCode::Esc => cancel_drag(app),
        KeyCode::Char('r') => request_edit(app),
        _ => {}
    }
}

/// Begin a keyboard drag on the selected overlay's line.
fn start_drag(app: &mut AppState, role: LineRole) {
    let selected = app
        .chart
        .overlays()
        .get(app.chart_cursor)
        .map(|o| (o.id.clone(), o.points.value(role).is_some()));
    let Some((overlay_id, has_line)) = selected else {
        app.set_warning("no overlay selected");
        return;
    };
    if !has_line {
        app.set_warning(format!("order has no {role} line"));
        return;
    }
    app.drag = Some(DragState { overlay_id, role });
    app.set_status(format!("dragging {role}: arrows move, Enter commits, Esc reverts"));
}

/// Move the dragged line by one projection row.
fn nudge_drag(app: &mut AppState, delta_rows: f64) {
    let Some(drag) = app.drag.clone() else { return };
    let Some(close) = app.controller.tick().map(|t| t.close) else {
        app.set_warning("no tick yet");
        return;
    };
    let value = app
        .chart
        .overlay(&drag.overlay_id)
        .and_then(|o| o.points.value(drag.role));
    let Some(value) = value else {
        app.drag = None;
        return;
    };

    let y = app.chart.convert_to_pixel(value).y + delta_rows;
    if let Err(err) =
        app.chart
            .pressed_moving(&drag.overlay_id, drag.role, Coordinate { x: 0.0, y }, close)
    {
        app.set_warning(err.to_string());
    }
}

fn commit_drag(app: &mut AppState) {
    let Some(drag) = app.drag.take() else { return };
    match app.chart.pressed_move_end(&drag.overlay_id, &mut app.controller) {
        Ok(Some(order)) => app.set_status(format!("order {} updated", order.order_id)),
        Ok(None) => {}
        Err(err) => app.set_warning(err.to_string()),
    }
}

fn cancel_drag(app: &mut AppState) {
    if let Some(drag) = app.drag.take() {
        app.chart.pressed_cancel(&drag.overlay_id);
    }
}

/// Keyboard stand-in for a right click on the selected overlay.
fn request_edit(app: &mut AppState) {
    let Some(overlay) = app.chart.overlays().get(app.chart_cursor) else {
        return;
    };
    match overlay.on_right_click() {
        Ok(request) => app.open_modify(request.order_id),
        Err(err) => app.set_warning(err.to_string()),
    }
}

fn handle_orders_key(app: &mut AppState, key: KeyEvent) {
    let order_count = app.controller.orders().len();

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if order_count > 0 && app.orders_cursor + 1 < order_count {
                app.orders_cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.orders_cursor = app.orders_cursor.saturating_sub(1);
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(order) = app.selected_order() {
                let id = order.order_id;
                app.open_modify(id);
            }
        }
        KeyCode::Char('c') => {
            // Market orders close at the tick, pending orders cancel.
            let Some(order) = app.selected_order() else { return };
            let (id, exit_type) = if order.action.is_market() {
                (order.order_id, ExitType::ManualClose)
            } else {
                (order.order_id, ExitType::Cancel)
            };
            match app.controller.close_order(id, exit_type, None, &mut app.chart) {
                Ok(closed) => {
                    app.set_status(format!("order {} {}", closed.order_id, exit_type));
                    app.orders_cursor = app.orders_cursor.saturating_sub(1);
                }
                Err(err) => app.set_warning(err.to_string()),
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::StatusLevel;
    use crate::feed::sample_candles;
    use crate::theme::Theme;
    use chartdesk_core::{OrderSpec, Tick};
    use chrono::Utc;
    use std::path::PathBuf;

    fn app() -> AppState {
        let mut app = AppState::new(
            sample_candles(10, 67_000.0, 1),
            Theme::default(),
            PathBuf::from("."),
        );
        app.on_tick(Tick {
            timestamp: Utc::now(),
            open: 67_000.0,
            high: 67_000.0,
            low: 67_000.0,
            close: 67_000.0,
            volume: 100.0,
        });
        app
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn quit_key_stops_the_app() {
        let mut app = app();
        handle_key(&mut app, press(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn ticket_flow_places_a_market_order() {
        let mut app = app();
        handle_key(&mut app, press(KeyCode::Char('b')));
        assert!(matches!(app.modal, Modal::Ticket(_)));
        assert!(app.feed.is_synthetic_paused());

        // Default lot of 1 is fine; submit straight away.
        handle_key(&mut app, press(KeyCode::Enter));

        assert!(matches!(app.modal, Modal::None));
        assert!(!app.feed.is_synthetic_paused());
        assert_eq!(app.controller.orders().len(), 1);
        assert_eq!(app.controller.orders()[0].entry_point, 67_000.0);
        assert_eq!(app.chart.overlays().len(), 1);
    }

    #[test]
    fn invalid_ticket_keeps_the_form_open() {
        let mut app = app();
        handle_key(&mut app, press(KeyCode::Char('b')));
        handle_key(&mut app, press(KeyCode::Backspace)); // lot now empty
        handle_key(&mut app, press(KeyCode::Enter));

        assert!(matches!(app.modal, Modal::Ticket(_)));
        assert!(matches!(app.status_message, Some((_, StatusLevel::Warning))));
        assert!(app.controller.orders().is_empty());
    }

    #[test]
    fn ticket_action_cycles_with_arrows() {
        let mut app = app();
        handle_key(&mut app, press(KeyCode::Char('s')));
        handle_key(&mut app, press(KeyCode::Right));
        match &app.modal {
            Modal::Ticket(form) => assert_eq!(form.action, OrderAction::BuyLimit),
            other => panic!("expected ticket modal, got {other:?}"),
        }
    }

    #[test]
    fn close_key_cancels_pending_and_closes_market() {
        let mut app = app();
        let mut pending = OrderSpec::market(OrderAction::SellLimit, 1.0);
        pending.entry_point = Some(68_000.0);
        app.controller.open_order(pending, &mut app.chart).unwrap();
        app.controller
            .open_order(OrderSpec::market(OrderAction::Buy, 1.0), &mut app.chart)
            .unwrap();

        app.active_panel = Panel::Orders;
        app.orders_cursor = 0;
        handle_key(&mut app, press(KeyCode::Char('c'))); // pending: cancel
        assert_eq!(app.controller.orders().len(), 1);

        handle_key(&mut app, press(KeyCode::Char('c'))); // market: manual close
        assert!(app.controller.orders().is_empty());
        assert!(app.chart.overlays().is_empty());
    }

    #[test]
    fn keyboard_drag_commits_through_the_controller() {
        let mut app = app();
        let mut spec = OrderSpec::market(OrderAction::Buy, 1.0);
        spec.take_profit = Some(67_500.0);
        let order = app.controller.open_order(spec, &mut app.chart).unwrap();

        app.active_panel = Panel::Chart;
        handle_key(&mut app, press(KeyCode::Char('t')));
        assert!(app.drag.is_some());
        handle_key(&mut app, press(KeyCode::Up)); // one row higher
        handle_key(&mut app, press(KeyCode::Enter));

        assert!(app.drag.is_none());
        let tp = app.controller.orders()[0].take_profit.unwrap();
        assert!(tp > 67_500.0);
        assert_eq!(order.take_profit, Some(67_500.0)); // pre-drag snapshot
    }

    #[test]
    fn keyboard_drag_escape_reverts() {
        let mut app = app();
        let mut spec = OrderSpec::market(OrderAction::Buy, 1.0);
        spec.take_profit = Some(67_500.0);
        app.controller.open_order(spec, &mut app.chart).unwrap();

        app.active_panel = Panel::Chart;
        handle_key(&mut app, press(KeyCode::Char('t')));
        handle_key(&mut app, press(KeyCode::Up));
        handle_key(&mut app, press(KeyCode::Esc));

        assert!(app.drag.is_none());
        assert_eq!(app.controller.orders()[0].take_profit, Some(67_500.0));
        let overlay = &app.chart.overlays()[0];
        assert_eq!(overlay.points.take_profit, Some(67_500.0));
    }

    #[test]
    fn edit_request_opens_the_modify_form() {
        let mut app = app();
        app.controller
            .open_order(OrderSpec::market(OrderAction::Buy, 1.0), &mut app.chart)
            .unwrap();

        app.active_panel = Panel::Chart;
        handle_key(&mut app, press(KeyCode::Char('r')));
        assert!(matches!(app.modal, Modal::Modify(_)));
        assert!(app.feed.is_synthetic_paused());
    }
}
