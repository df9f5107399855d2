//! ChartDesk TUI — candle chart with draggable order guide lines.
//!
//! Panels:
//! 1. Chart — playback candles, order overlays, keyboard drags
//! 2. Orders — open/pending order table with edit and close/cancel
//! 3. Help — keyboard shortcuts
//!
//! Single-threaded: the event loop owns the controller, chart, and feed.

mod app;
mod feed;
mod input;
mod settings;
mod theme;
mod ui;

use std::io::{self, stdout};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::app::AppState;
use crate::theme::Theme;

fn main() -> Result<()> {
    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    // Load overlay style settings
    let settings_path = settings::default_path();
    let style = settings::load(&settings_path);
    let theme = Theme::from_settings(&style);

    // Build app state over a deterministic sample feed
    let candles = feed::sample_candles(2_000, 67_000.0, 42);
    let mut app = AppState::new(candles, theme, settings_path);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the main event loop
    let result = run_app(&mut terminal, &mut app);

    // Persist overlay styles before exit
    let _ = settings::save(&app.settings_path, &style);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Advance the playback feed and evaluate boundaries
        if let Some(tick) = app.feed.poll(Instant::now()) {
            app.on_tick(tick);
        }

        // 3. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        // 4. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}
