//! Overlay style settings — TOML save/load across restarts.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Per-role overlay colors plus line styling, persisted under the user
/// config dir.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleSettings {
    pub buy: Rgb,
    pub sell: Rgb,
    pub take_profit: Rgb,
    pub stop_loss: Rgb,
    /// Render stop/target lines dashed.
    pub dashed_levels: bool,
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            buy: Rgb::new(0, 255, 128),
            sell: Rgb::new(255, 20, 147),
            take_profit: Rgb::new(0, 255, 255),
            stop_loss: Rgb::new(255, 140, 0),
            dashed_levels: true,
        }
    }
}

pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chartdesk")
        .join("style.toml")
}

/// Load settings from disk. Returns defaults if the file is missing or corrupt.
pub fn load(path: &Path) -> StyleSettings {
    match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content).unwrap_or_default(),
        Err(_) => StyleSettings::default(),
    }
}

/// Save settings to disk. Creates parent directories if needed.
pub fn save(path: &Path, settings: &StyleSettings) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(settings)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let dir = std::env::temp_dir().join("chartdesk_settings_test");
        let path = dir.join("style.toml");

        let mut settings = StyleSettings::default();
        settings.buy = Rgb::new(1, 2, 3);
        settings.dashed_levels = false;

        save(&path, &settings).unwrap();
        let loaded = load(&path);
        assert_eq!(loaded, settings);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_returns_defaults() {
        let loaded = load(Path::new("/nonexistent/path/style.toml"));
        assert_eq!(loaded, StyleSettings::default());
    }

    #[test]
    fn corrupt_file_returns_defaults() {
        let dir = std::env::temp_dir().join("chartdesk_settings_corrupt");
        let path = dir.join("style.toml");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(&path, "not valid toml [[[").unwrap();

        assert_eq!(load(&path), StyleSettings::default());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
