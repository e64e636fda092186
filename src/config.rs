use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_FEED_URL: &str = "https://topembed.pw/api.php?format=json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_USER_AGENT: &str = concat!("grandstand/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default = "default_feed_url")]
    pub feed_url: String,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// IANA zone used to pick "today" and to format start times
    #[serde(default)]
    pub timezone: Option<String>,
    /// Saved theme; `None` follows the system preference
    #[serde(default)]
    pub dark_mode: Option<bool>,
}

fn default_feed_url() -> String {
    DEFAULT_FEED_URL.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            feed_url: default_feed_url(),
            request_timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
            timezone: None,
            dark_mode: None,
        }
    }
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("tv", "grandstand", "grandstand")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    pub fn load() -> Result<Self, anyhow::Error> {
        match Self::config_path() {
            Some(path) if path.exists() => {
                let content = fs::read_to_string(&path)?;
                let config: AppConfig = serde_json::from_str(&content)?;
                Ok(config)
            }
            _ => Ok(AppConfig::default()),
        }
    }

    pub fn save(&self) -> Result<(), anyhow::Error> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Cannot determine config directory"))?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn get_user_timezone(&self) -> String {
        if let Some(tz) = &self.timezone {
            return tz.clone();
        }

        if let Ok(tz) = iana_time_zone::get_timezone() {
            return tz;
        }

        "UTC".to_string()
    }

    /// Parsed user zone, falling back to UTC for unknown names
    pub fn user_tz(&self) -> chrono_tz::Tz {
        self.get_user_timezone()
            .parse::<chrono_tz::Tz>()
            .unwrap_or(chrono_tz::UTC)
    }

    /// Validate and set the zone; callers persist with [`AppConfig::save`].
    pub fn set_timezone(&mut self, tz: &str) -> Result<(), anyhow::Error> {
        tz.parse::<chrono_tz::Tz>()
            .map_err(|e| anyhow::anyhow!("Unknown time zone {}: {}", tz, e))?;
        self.timezone = Some(tz.to_string());
        Ok(())
    }

    /// Saved theme if there is one, else the system preference
    pub fn dark_mode_or(&self, system_prefers_dark: bool) -> bool {
        self.dark_mode.unwrap_or(system_prefers_dark)
    }

    /// Flip the effective theme and persist it. Returns the new value.
    pub fn toggle_dark_mode(&mut self, system_prefers_dark: bool) -> Result<bool, anyhow::Error> {
        let next = !self.dark_mode_or(system_prefers_dark);
        self.dark_mode = Some(next);
        self.save()?;
        Ok(next)
    }
}
