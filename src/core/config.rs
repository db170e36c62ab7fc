//! Loadable logger configuration
//!
//! Everything [`LoggerBuilder`](super::logger::LoggerBuilder) can be told
//! through plain data. Hooks and sinks are code, so they stay builder-only.

use super::actor::{DEFAULT_CAPACITY, DEFAULT_HIGH_WATER_MARK};
use super::entry::DEFAULT_REPLY_TIMEOUT;
use super::error::{LoggerError, Result};
use super::filter::TagFilter;
use super::timestamp::parse_zone;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// # Example
///
/// ```
/// use filtertag::LoggerConfig;
///
/// let config = LoggerConfig::from_json_str(
///     r#"{"capacity": 64, "high_water_mark": 60, "enabled_tags": ["info", "error"]}"#,
/// ).unwrap();
/// assert_eq!(config.capacity, 64);
/// assert_eq!(config.reply_timeout_ms, 2000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Command channel capacity
    pub capacity: usize,
    /// Backlog at which the overflow hook fires; below `capacity`
    pub high_water_mark: usize,
    /// `get_logger` reply timeout in milliseconds
    pub reply_timeout_ms: u64,
    /// Static enabled-tag set; `None` keeps the default set
    pub enabled_tags: Option<Vec<String>>,
    /// IANA zone for timestamps; `None` reads `TZ`, then falls back to UTC
    pub timezone: Option<String>,
    pub subsystem: Option<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            high_water_mark: DEFAULT_HIGH_WATER_MARK,
            reply_timeout_ms: DEFAULT_REPLY_TIMEOUT.as_millis() as u64,
            enabled_tags: None,
            timezone: None,
            subsystem: None,
        }
    }
}

impl LoggerConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: LoggerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(LoggerError::config("LoggerConfig", "capacity must be positive"));
        }
        if self.high_water_mark == 0 || self.high_water_mark >= self.capacity {
            return Err(LoggerError::config(
                "LoggerConfig",
                format!(
                    "high_water_mark {} must be positive and below capacity {}",
                    self.high_water_mark, self.capacity
                ),
            ));
        }
        if self.reply_timeout_ms == 0 {
            return Err(LoggerError::config(
                "LoggerConfig",
                "reply_timeout_ms must be positive",
            ));
        }
        self.zone()?;
        Ok(())
    }

    pub fn reply_timeout(&self) -> Duration {
        Duration::from_millis(self.reply_timeout_ms)
    }

    pub fn zone(&self) -> Result<Option<Tz>> {
        self.timezone.as_deref().map(parse_zone).transpose()
    }

    pub fn filter(&self) -> Option<TagFilter> {
        self.enabled_tags.as_ref().map(TagFilter::enabled)
    }
}
