//! Candle chart with order guide lines.
//!
//! Renders the feed history as a column chart and paints each overlay's
//! figures over it: solid/dashed horizontal lines per role plus the
//! right-aligned `"tp | <dist>"` style labels the templates produce.

use std::collections::HashMap;

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use chartdesk_core::{ChartHost, Coordinate, Figure, LineRole, OverlayId, Side};

use crate::app::{AppState, CHART_PIXEL_ROWS};
use crate::theme::Theme;

/// Width of the left price gutter.
const GUTTER: usize = 10;

pub fn render(f: &mut Frame, area: Rect, app: &mut AppState) {
    if area.width < (GUTTER as u16 + 4) || area.height < 2 {
        return;
    }
    let width = area.width as usize;
    let height = area.height as usize;
    let row_scale = CHART_PIXEL_ROWS / height as f64;

    // Figure building mutates overlay state (first render transition), so
    // collect before taking any immutable looks at the chart.
    let figures = app.chart.collect_figures(&app.controller);
    let sides: HashMap<OverlayId, Side> = app
        .chart
        .overlays()
        .iter()
        .map(|o| (o.id.clone(), o.action.side()))
        .collect();
    let selected_id = app
        .chart
        .overlays()
        .get(app.chart_cursor)
        .map(|o| o.id.clone());

    let mut grid = vec![vec![(' ', app.theme.text_secondary); width]; height];

    draw_price_gutter(app, &mut grid, height, row_scale);
    draw_candles(app, &mut grid, width, height, row_scale);
    draw_overlays(app, &mut grid, &figures, &sides, selected_id.as_ref(), width, height, row_scale);

    let lines: Vec<Line> = grid
        .into_iter()
        .map(|row| {
            Line::from(
                row.into_iter()
                    .map(|(ch, color)| Span::styled(ch.to_string(), Style::default().fg(color)))
                    .collect::<Vec<_>>(),
            )
        })
        .collect();
    f.render_widget(Paragraph::new(lines), area);
}

fn row_of(app: &AppState, value: f64, row_scale: f64) -> f64 {
    app.chart.convert_to_pixel(value).y / row_scale
}

/// Whether a guide line is drawn dashed. The `dashed_levels` style setting
/// can force stop/target lines solid; a dashed entry always stays dashed
/// because there the pattern marks a pending order, not a style choice.
fn line_is_dashed(role: LineRole, figure_dashed: bool, theme: &Theme) -> bool {
    figure_dashed && (role == LineRole::Entry || theme.dashed_levels)
}

fn draw_price_gutter(
    app: &AppState,
    grid: &mut [Vec<(char, Color)>],
    height: usize,
    row_scale: f64,
) {
    let precision = app.controller.precision().unwrap_or_default();
    let step = (height / 6).max(1);
    for r in (0..height).step_by(step) {
        let y = (r as f64 + 0.5) * row_scale;
        let price = app.chart.convert_from_pixel(Coordinate { x: 0.0, y });
        let label = precision.format_price(price);
        for (i, ch) in label.chars().take(GUTTER - 1).enumerate() {
            grid[r][i] = (ch, app.theme.muted);
        }
    }
}

fn draw_candles(
    app: &AppState,
    grid: &mut [Vec<(char, Color)>],
    width: usize,
    height: usize,
    row_scale: f64,
) {
    let columns = width - GUTTER;
    let history = app.feed.history();
    let visible = &history[history.len().saturating_sub(columns)..];

    for (i, candle) in visible.iter().enumerate() {
        let col = GUTTER + i;
        let color = if candle.close >= candle.open {
            app.theme.positive
        } else {
            app.theme.negative
        };
        let body_top = row_of(app, candle.open.max(candle.close), row_scale);
        let body_bot = row_of(app, candle.open.min(candle.close), row_scale);
        let wick_top = row_of(app, candle.high, row_scale);
        let wick_bot = row_of(app, candle.low, row_scale);

        for r in 0..height {
            let rf = r as f64;
            if rf >= body_top - 0.5 && rf <= body_bot + 0.5 {
                grid[r][col] = ('█', color);
            } else if rf >= wick_top - 0.5 && rf <= wick_bot + 0.5 {
                grid[r][col] = ('│', color);
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_overlays(
    app: &AppState,
    grid: &mut [Vec<(char, Color)>],
    figures: &[(OverlayId, Vec<Figure>)],
    sides: &HashMap<OverlayId, Side>,
    selected: Option<&OverlayId>,
    width: usize,
    height: usize,
    row_scale: f64,
) {
    for (id, figs) in figures {
        let Some(side) = sides.get(id).copied() else { continue };
        let is_selected = selected == Some(id);

        for fig in figs {
            match fig {
                Figure::Line { value, role, dashed } => {
                    let r = row_of(app, *value, row_scale).round();
                    if r < 0.0 || r >= height as f64 {
                        continue;
                    }
                    let r = r as usize;
                    let color = app.theme.line_color(side, *role);
                    let dashed = line_is_dashed(*role, *dashed, &app.theme);
                    for x in GUTTER..width {
                        if dashed && x % 2 == 1 {
                            continue;
                        }
                        grid[r][x] = ('─', color);
                    }
                    if is_selected {
                        grid[r][GUTTER - 1] = ('▶', app.theme.accent);
                    }
                }
                Figure::RectText { value, text, role, .. } => {
                    let r = row_of(app, *value, row_scale).round();
                    if r < 0.0 || r >= height as f64 {
                        continue;
                    }
                    let r = r as usize;
                    let color = app.theme.line_color(side, *role);
                    let start = width.saturating_sub(text.len() + 1);
                    for (i, ch) in text.chars().enumerate() {
                        if start + i < width {
                            grid[r][start + i] = (ch, color);
                        }
                    }
                }
            }
        }
    }
}
