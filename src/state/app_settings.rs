use log::{LevelFilter, warn};
use mlb_api::client::ApiConfig;
use std::str::FromStr;

#[derive(Debug, Default, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub api: ApiConfig,
}

impl AppSettings {
    /// Read once at start-up. `MLBHL_LOG` sets the log level; the `MLBHL_API_BASE`,
    /// `MLBHL_SCHEMA` and `MLBHL_GAME_TYPES` variables are handled by `ApiConfig`.
    pub fn load() -> Self {
        Self {
            full_screen: false,
            log_level: std::env::var("MLBHL_LOG").ok().and_then(|s| parse_level(&s)),
            api: ApiConfig::from_env(),
        }
    }
}

fn parse_level(s: &str) -> Option<LevelFilter> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    match LevelFilter::from_str(s) {
        Ok(level) => Some(level),
        Err(_) => {
            warn!("ignoring MLBHL_LOG={s:?}");
            None
        }
    }
}
