//! Playback tick feed — replays a candle series at a user-controlled speed.
//!
//! Two pause flags: `paused` is the user's explicit toggle; `synthetic_paused`
//! is set while a modal form is open so the market holds still under it.
//! Lifting the synthetic pause never clears a user pause.

use chartdesk_core::Tick;
use chrono::{Duration as ChronoDuration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

/// Speed range bounds. The playback interval is `(MAX_RANGE - range) * 100ms`,
/// so range 1 is the slowest (1s per candle) and 10 the fastest (100ms).
pub const MIN_RANGE: u8 = 1;
pub const MAX_RANGE: u8 = 11;

pub struct PlaybackFeed {
    candles: Vec<Tick>,
    pos: usize,
    paused: bool,
    synthetic_paused: bool,
    range: u8,
    last_advance: Instant,
}

impl PlaybackFeed {
    pub fn new(candles: Vec<Tick>) -> Self {
        Self {
            candles,
            pos: 0,
            paused: false,
            synthetic_paused: false,
            range: 5,
            last_advance: Instant::now(),
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(u64::from(MAX_RANGE - self.range) * 100)
    }

    pub fn range(&self) -> u8 {
        self.range
    }

    pub fn speed_up(&mut self) {
        self.range = (self.range + 1).min(MAX_RANGE - 1);
    }

    pub fn slow_down(&mut self) {
        self.range = (self.range - 1).max(MIN_RANGE);
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_running(&self) -> bool {
        !self.paused && !self.synthetic_paused && !self.finished()
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Hold playback while a modal is open.
    pub fn synthetic_pause(&mut self) {
        self.synthetic_paused = true;
    }

    /// Lift the modal hold. A user pause stays in force.
    pub fn synthetic_play(&mut self) {
        self.synthetic_paused = false;
    }

    pub fn is_synthetic_paused(&self) -> bool {
        self.synthetic_paused
    }

    pub fn finished(&self) -> bool {
        self.pos >= self.candles.len()
    }

    /// Last candle handed out, if any.
    pub fn current(&self) -> Option<&Tick> {
        self.pos.checked_sub(1).and_then(|i| self.candles.get(i))
    }

    /// Candles handed out so far, oldest first.
    pub fn history(&self) -> &[Tick] {
        &self.candles[..self.pos]
    }

    /// Advance if running and the interval has elapsed, returning the new
    /// candle. Call once per event-loop turn.
    pub fn poll(&mut self, now: Instant) -> Option<Tick> {
        if !self.is_running() {
            // Keep the clock fresh so resuming does not burst-advance.
            self.last_advance = now;
            return None;
        }
        if now.duration_since(self.last_advance) < self.interval() {
            return None;
        }
        self.last_advance = now;
        let tick = self.candles[self.pos];
        self.pos += 1;
        Some(tick)
    }
}

/// Deterministic random-walk candle series for standalone playback.
pub fn sample_candles(count: usize, start_price: f64, seed: u64) -> Vec<Tick> {
    let mut rng = StdRng::seed_from_u64(seed);
    let start_time = Utc::now() - ChronoDuration::minutes(count as i64);
    let mut candles = Vec::with_capacity(count);
    let mut close = start_price;

    for i in 0..count {
        let open = close;
        let drift = 0.0001;
        let noise: f64 = rng.gen_range(-1.0..1.0);
        close = (open * (1.0 + drift + 0.004 * noise)).max(start_price * 0.1);
        let wick_up: f64 = rng.gen_range(0.0..0.002);
        let wick_down: f64 = rng.gen_range(0.0..0.002);
        let high = open.max(close) * (1.0 + wick_up);
        let low = open.min(close) * (1.0 - wick_down);

        candles.push(Tick {
            timestamp: start_time + ChronoDuration::minutes(i as i64),
            open,
            high,
            low,
            close,
            volume: rng.gen_range(100.0..10_000.0),
        });
    }
    candles
}
