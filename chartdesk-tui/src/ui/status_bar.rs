//! One-line status bar: panel tabs, playback state, last message.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, Panel, StatusLevel};

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = &app.theme;
    let mut spans: Vec<Span> = Vec::new();

    for panel in [Panel::Chart, Panel::Orders, Panel::Help] {
        let style = if panel == app.active_panel {
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.muted)
        };
        spans.push(Span::styled(
            format!(" {}:{} ", panel.index() + 1, panel.label()),
            style,
        ));
    }
    spans.push(Span::raw(" │ "));

    let (playback, playback_style) = if app.feed.finished() {
        ("end of data", Style::default().fg(theme.muted))
    } else if app.feed.is_paused() {
        ("paused", Style::default().fg(theme.warning))
    } else if app.feed.is_synthetic_paused() {
        ("held", Style::default().fg(theme.warning))
    } else {
        ("playing", Style::default().fg(theme.positive))
    };
    spans.push(Span::styled(playback, playback_style));
    spans.push(Span::styled(
        format!(" x{}", app.feed.range()),
        Style::default().fg(theme.muted),
    ));

    if let Some(tick) = app.controller.tick() {
        let precision = app.controller.precision().unwrap_or_default();
        spans.push(Span::styled(
            format!(" │ {}", precision.format_price(tick.close)),
            Style::default().fg(theme.text_primary),
        ));
    }

    if let Some((msg, level)) = &app.status_message {
        let style = match level {
            StatusLevel::Info => Style::default().fg(theme.text_secondary),
            StatusLevel::Warning => Style::default().fg(theme.warning),
            StatusLevel::Error => Style::default().fg(theme.negative),
        };
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(msg.as_str(), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
