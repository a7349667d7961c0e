use log::LevelFilter;
use std::path::PathBuf;

pub const DEFAULT_PROXY_URL: &str = "http://127.0.0.1:3000";

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    /// Base URL of the schedule proxy (`FFSCHED_PROXY_URL`).
    pub proxy_url: String,
    /// Where `schedule.csv` is written (`FFSCHED_EXPORT_DIR`).
    pub export_dir: PathBuf,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: None,
            proxy_url: DEFAULT_PROXY_URL.to_string(),
            export_dir: PathBuf::from("."),
        }
    }
}

impl AppSettings {
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key/value source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        Self {
            full_screen: false,
            log_level: get("FFSCHED_LOG").and_then(|level| level.parse::<LevelFilter>().ok()),
            proxy_url: get("FFSCHED_PROXY_URL").unwrap_or(defaults.proxy_url),
            export_dir: get("FFSCHED_EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.export_dir),
        }
    }
}
