//! Orders table — one row per open/pending order, driven by the store.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table};
use ratatui::Frame;

use crate::app::AppState;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(2), Constraint::Length(1)])
        .split(area);

    render_table(f, chunks[0], app);

    let hint = Line::from(Span::styled(
        " [j/k]move  [e]edit  [c]close/cancel  [b/s]new order ",
        Style::default().fg(app.theme.muted),
    ));
    f.render_widget(Paragraph::new(hint), chunks[1]);
}

fn render_table(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = &app.theme;
    let precision = app.controller.precision().unwrap_or_default();

    let header = Row::new(vec![
        "ID", "Session", "Action", "Lot", "Entry", "TP", "SL", "Pips", "P/L", "Opened",
    ])
    .style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD));

    let price = |v: Option<f64>| match v {
        Some(v) => precision.format_price(v),
        None => String::from("-"),
    };

    let rows: Vec<Row> = app
        .controller
        .orders()
        .iter()
        .enumerate()
        .map(|(i, order)| {
            let base = if i == app.orders_cursor {
                Style::default()
                    .fg(theme.text_primary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text_secondary)
            };
            let pl_cell = match order.pl {
                Some(pl) => Cell::from(precision.format_signed(pl))
                    .style(Style::default().fg(theme.pnl_color(pl))),
                None => Cell::from("-").style(base),
            };
            Row::new(vec![
                Cell::from(order.order_id.to_string()).style(base),
                Cell::from(
                    order
                        .session_id
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| String::from("-")),
                )
                .style(base),
                Cell::from(order.action.label())
                    .style(Style::default().fg(theme.side_color(order.side()))),
                Cell::from(format!("{}", order.lot_size)).style(base),
                Cell::from(precision.format_price(order.entry_point)).style(base),
                Cell::from(price(order.take_profit)).style(base),
                Cell::from(price(order.stop_loss)).style(base),
                Cell::from(
                    order
                        .pips
                        .map(|p| format!("{p:.1}"))
                        .unwrap_or_else(|| String::from("-")),
                )
                .style(base),
                pl_cell,
                Cell::from(order.entry_time.format("%H:%M:%S").to_string()).style(base),
            ])
        })
        .collect();

    if rows.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "No orders. Press b to buy or s to sell.",
            Style::default().fg(theme.muted),
        ));
        f.render_widget(empty, area);
        return;
    }

    let widths = [
        Constraint::Length(5),
        Constraint::Length(8),
        Constraint::Length(10),
        Constraint::Length(7),
        Constraint::Length(11),
        Constraint::Length(11),
        Constraint::Length(11),
        Constraint::Length(9),
        Constraint::Length(11),
        Constraint::Length(9),
    ];
    let table = Table::new(rows, widths).header(header);
    f.render_widget(table, area);
}
