//! Live tick snapshots and instrument precision.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One candle-resolution snapshot of the traded instrument. The boundary
/// evaluator uses the full OHLC range, not just the close, so a stop level
/// pierced intrabar still fires.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Display precision of the traded instrument, as reported by the host chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Precision {
    /// Decimal places for prices.
    pub price: u8,
    /// Decimal places for volume / lot sizes.
    pub volume: u8,
}

impl Default for Precision {
    fn default() -> Self {
        Self { price: 2, volume: 0 }
    }
}

impl Precision {
    /// One unit in the last decimal place, e.g. 0.01 at two digits.
    pub fn pip_size(&self) -> f64 {
        10f64.powi(-(self.price as i32))
    }

    /// Round a price to the instrument's displayable grid.
    pub fn round_price(&self, value: f64) -> f64 {
        let scale = 10f64.powi(self.price as i32);
        (value * scale).round() / scale
    }

    pub fn format_price(&self, value: f64) -> String {
        format!("{:.*}", self.price as usize, value)
    }

    /// Format with an explicit sign, for P/L readouts.
    pub fn format_signed(&self, value: f64) -> String {
        format!("{:+.*}", self.price as usize, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pip_size_follows_precision() {
        assert!((Precision { price: 2, volume: 0 }.pip_size() - 0.01).abs() < 1e-12);
        assert!((Precision { price: 5, volume: 0 }.pip_size() - 0.00001).abs() < 1e-12);
        assert!((Precision { price: 0, volume: 0 }.pip_size() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn round_price_snaps_to_grid() {
        let p = Precision { price: 2, volume: 0 };
        assert_eq!(p.round_price(67_000.126), 67_000.13);
        assert_eq!(p.round_price(67_000.124), 67_000.12);
    }

    #[test]
    fn signed_format_keeps_sign() {
        let p = Precision::default();
        assert_eq!(p.format_signed(12.5), "+12.50");
        assert_eq!(p.format_signed(-3.0), "-3.00");
        assert_eq!(p.format_price(69_000.0), "69000.00");
    }
}
