//! Keyboard shortcut reference.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = &app.theme;
    let heading = Style::default().fg(theme.accent).add_modifier(Modifier::BOLD);
    let key = Style::default().fg(theme.positive);
    let desc = Style::default().fg(theme.text_secondary);

    let entry = |k: &'static str, d: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {k:<12}"), key),
            Span::styled(d, desc),
        ])
    };

    let lines = vec![
        Line::from(Span::styled("Global", heading)),
        entry("q", "quit"),
        entry("1/2/3, Tab", "switch panel"),
        entry("Space", "pause / resume playback"),
        entry("+/-", "playback speed"),
        entry("b / s", "open a buy / sell ticket"),
        Line::from(""),
        Line::from(Span::styled("Chart", heading)),
        entry("j/k", "select order overlay"),
        entry("t / g / e", "drag take profit / stop loss / entry"),
        entry("Up/Down", "move the dragged line"),
        entry("Enter", "commit the drag"),
        entry("Esc", "revert the drag"),
        entry("r", "edit the selected order"),
        Line::from(""),
        Line::from(Span::styled("Orders", heading)),
        entry("j/k", "move cursor"),
        entry("e / Enter", "edit order"),
        entry("c", "close market order / cancel pending"),
        Line::from(""),
        Line::from(Span::styled("Ticket", heading)),
        entry("Left/Right", "cycle order action"),
        entry("Tab", "next field"),
        entry("Enter", "place / apply"),
    ];

    f.render_widget(Paragraph::new(lines), area);
}
