//! Top-level UI layout — active panel, modal forms, status bar.

pub mod chart_panel;
pub mod help_panel;
pub mod modals;
pub mod orders_panel;
pub mod status_bar;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use crate::app::{AppState, Modal, Panel};

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &mut AppState) {
    // Split: main area + 1-line status bar.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    let main_area = chunks[0];
    let status_area = chunks[1];

    draw_panel(f, main_area, app);
    status_bar::render(f, status_area, app);

    // Modal forms on top.
    match app.modal.clone() {
        Modal::Ticket(form) => modals::render_ticket(f, main_area, &form, &app.theme),
        Modal::Modify(form) => modals::render_modify(f, main_area, &form, &app.theme),
        Modal::None => {}
    }
}

/// Draw the active panel with its border.
fn draw_panel(f: &mut Frame, area: Rect, app: &mut AppState) {
    let panel = app.active_panel;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.accent))
        .title(format!(" {} [{}] ", panel.label(), panel.index() + 1))
        .title_style(Style::default().fg(app.theme.accent));

    let inner = block.inner(area);
    f.render_widget(block, area);

    match panel {
        Panel::Chart => chart_panel::render(f, inner, app),
        Panel::Orders => orders_panel::render(f, inner, app),
        Panel::Help => help_panel::render(f, inner, app),
    }
}

/// Compute a centered rect for modal popups.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
