use crate::error::{config_error, env_error, EventResult};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Default Google Calendar API root
pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

/// Default number of days `upcoming_events` looks ahead
pub const DEFAULT_LOOKAHEAD_DAYS: i64 = 28;

/// Optional settings file
pub const SETTINGS_PATH: &str = "config/calendar.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Google Calendar ID to work against
    pub calendar_id: String,
    /// OAuth access token sent as a bearer token
    pub access_token: String,
    /// API root, overridable for testing
    pub api_base_url: String,
    /// How far ahead upcoming events are listed
    pub lookahead_days: i64,
}

/// Non-secret settings read from `config/calendar.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_base_url: String,
    pub lookahead_days: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            lookahead_days: DEFAULT_LOOKAHEAD_DAYS,
        }
    }
}

impl Settings {
    pub fn from_toml_str(content: &str) -> EventResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read the settings file, or defaults if it does not exist
    pub fn load(path: impl AsRef<Path>) -> EventResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

impl Config {
    /// Load configuration from environment and settings file
    pub fn load() -> EventResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        // Required environment variables
        let calendar_id = env::var("GOOGLE_CALENDAR_ID").map_err(|_| env_error("GOOGLE_CALENDAR_ID"))?;
        let access_token = env::var("GOOGLE_ACCESS_TOKEN").map_err(|_| env_error("GOOGLE_ACCESS_TOKEN"))?;

        let mut settings = Settings::load(SETTINGS_PATH)?;

        // Environment overrides the file
        if let Ok(base_url) = env::var("GOOGLE_API_BASE_URL") {
            settings.api_base_url = base_url;
        }
        if let Ok(days) = env::var("LOOKAHEAD_DAYS") {
            settings.lookahead_days = days
                .parse::<i64>()
                .map_err(|_| env_error("Invalid LOOKAHEAD_DAYS format"))?;
        }

        Self::from_parts(calendar_id, access_token, settings)
    }

    /// Assemble a config from credentials and settings
    pub fn from_parts(
        calendar_id: impl Into<String>,
        access_token: impl Into<String>,
        settings: Settings,
    ) -> EventResult<Self> {
        let calendar_id = calendar_id.into();
        if calendar_id.trim().is_empty() {
            return Err(config_error("Calendar ID must not be empty"));
        }
        if settings.lookahead_days <= 0 {
            return Err(config_error("lookahead_days must be positive"));
        }

        Ok(Config {
            calendar_id,
            access_token: access_token.into(),
            api_base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            lookahead_days: settings.lookahead_days,
        })
    }
}
