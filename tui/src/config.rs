//! Runtime configuration read from environment variables.

use std::path::PathBuf;

use settings::overlay::DEFAULT_MOBILE_BREAKPOINT;

const APP_DIR: &str = "chat-settings";
const DEFAULT_CELL_WIDTH_PX: u32 = 8;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// File backing the key-value storage the settings live in
    pub storage_path: PathBuf,
    pub log_path: PathBuf,
    /// Viewports at most this many pixels wide use the mobile layout
    pub mobile_breakpoint_px: u32,
    /// Pixels assumed per terminal column when converting the terminal width
    pub cell_width_px: u32,
}

impl Default for Config {
    fn default() -> Self {
        let base_config = dirs::config_dir().unwrap_or_else(std::env::temp_dir);
        let base_cache = dirs::cache_dir().unwrap_or_else(std::env::temp_dir);

        Config {
            storage_path: base_config.join(APP_DIR).join("storage.json"),
            log_path: base_cache.join(APP_DIR).join("tui.log"),
            mobile_breakpoint_px: DEFAULT_MOBILE_BREAKPOINT,
            cell_width_px: DEFAULT_CELL_WIDTH_PX,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from `lookup`, falling back to defaults for missing or invalid values
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Config::default();
        let g = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Config {
            storage_path: g("CHAT_SETTINGS_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_path),
            log_path: g("CHAT_SETTINGS_LOG")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_path),
            mobile_breakpoint_px: parse_u32(g("CHAT_MOBILE_BREAKPOINT"), defaults.mobile_breakpoint_px),
            cell_width_px: parse_u32(g("CHAT_CELL_WIDTH"), defaults.cell_width_px).max(1),
        }
    }
}

fn parse_u32(value: Option<String>, default: u32) -> u32 {
    match value {
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("ignoring invalid number {value:?}, using {default}");
            default
        }),
        None => default,
    }
}
