//! Color tokens for the ChartDesk TUI.
//!
//! Dark terminal palette with high-contrast accents; the per-role overlay
//! colors come from the persisted style settings so users can retheme the
//! guide lines without touching the chrome.

use chartdesk_core::{LineRole, Side};
use ratatui::style::Color;

use crate::settings::StyleSettings;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Deep charcoal background.
    pub background: Color,
    /// Electric cyan (focus, highlights).
    pub accent: Color,
    /// Gains, long positions.
    pub positive: Color,
    /// Losses, short positions.
    pub negative: Color,
    /// Alerts, pauses.
    pub warning: Color,
    /// Muted text, disabled.
    pub muted: Color,
    pub text_primary: Color,
    pub text_secondary: Color,

    // Overlay line colors, user-configurable.
    pub buy_line: Color,
    pub sell_line: Color,
    pub take_profit_line: Color,
    pub stop_loss_line: Color,
    /// Render stop/target lines dashed. Pending entries stay dashed
    /// regardless: there the pattern encodes order state, not styling.
    pub dashed_levels: bool,
}

fn color(rgb: crate::settings::Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_settings(&StyleSettings::default())
    }
}

impl Theme {
    pub fn from_settings(settings: &StyleSettings) -> Self {
        Self {
            background: Color::Rgb(18, 18, 20),
            accent: Color::Rgb(0, 255, 255),
            positive: Color::Rgb(0, 255, 128),
            negative: Color::Rgb(255, 20, 147),
            warning: Color::Rgb(255, 140, 0),
            muted: Color::Rgb(100, 149, 237),
            text_primary: Color::White,
            text_secondary: Color::Rgb(170, 170, 170),
            buy_line: color(settings.buy),
            sell_line: color(settings.sell),
            take_profit_line: color(settings.take_profit),
            stop_loss_line: color(settings.stop_loss),
            dashed_levels: settings.dashed_levels,
        }
    }

    /// Color for a P/L value.
    pub fn pnl_color(&self, value: f64) -> Color {
        if value >= 0.0 {
            self.positive
        } else {
            self.negative
        }
    }

    /// Color for one of an order's guide lines.
    pub fn line_color(&self, side: Side, role: LineRole) -> Color {
        match role {
            LineRole::TakeProfit => self.take_profit_line,
            LineRole::StopLoss => self.stop_loss_line,
            LineRole::Entry => match side {
                Side::Buy => self.buy_line,
                Side::Sell => self.sell_line,
            },
        }
    }

    pub fn side_color(&self, side: Side) -> Color {
        match side {
            Side::Buy => self.positive,
            Side::Sell => self.negative,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Rgb;

    #[test]
    fn pnl_color_split() {
        let theme = Theme::default();
        assert_eq!(theme.pnl_color(10.0), theme.positive);
        assert_eq!(theme.pnl_color(-1.0), theme.negative);
        assert_eq!(theme.pnl_color(0.0), theme.positive);
    }

    #[test]
    fn line_colors_follow_settings() {
        let mut settings = StyleSettings::default();
        settings.take_profit = Rgb::new(9, 8, 7);
        settings.dashed_levels = false;
        let theme = Theme::from_settings(&settings);
        assert_eq!(
            theme.line_color(Side::Buy, LineRole::TakeProfit),
            Color::Rgb(9, 8, 7)
        );
        assert_eq!(theme.line_color(Side::Sell, LineRole::Entry), theme.sell_line);
        assert!(!theme.dashed_levels);
    }
}
