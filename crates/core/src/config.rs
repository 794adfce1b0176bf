//! Runtime configuration for entity sync.

use std::str::FromStr;

use crate::errors::{Error, Result};

pub const ENV_NOTIFICATION_CAPACITY: &str = "EVENTDESK_NOTIFICATION_CAPACITY";
pub const ENV_NOTIFY_ON_LISTENER_FAILURE: &str = "EVENTDESK_NOTIFY_ON_LISTENER_FAILURE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Maximum number of pending notifications (default: 50)
    pub notification_capacity: usize,

    /// Push an error notification for every failing listener (default: true)
    pub notify_on_listener_failure: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            notification_capacity: 50,
            notify_on_listener_failure: true,
        }
    }
}

impl SyncConfig {
    /// Loads the configuration from the environment, reading a `.env` file
    /// first when one exists. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        let config = Self {
            notification_capacity: read_var(ENV_NOTIFICATION_CAPACITY, parse_number)?
                .unwrap_or(defaults.notification_capacity),
            notify_on_listener_failure: read_var(ENV_NOTIFY_ON_LISTENER_FAILURE, parse_flag)?
                .unwrap_or(defaults.notify_on_listener_failure),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.notification_capacity == 0 {
            return Err(Error::InvalidConfigValue(format!(
                "{} must be greater than zero",
                ENV_NOTIFICATION_CAPACITY
            )));
        }
        Ok(())
    }
}

fn read_var<T>(key: &str, parse: fn(&str) -> Option<T>) -> Result<Option<T>> {
    match std::env::var(key) {
        Ok(raw) => parse(raw.trim())
            .map(Some)
            .ok_or_else(|| Error::InvalidConfigValue(format!("{}={}", key, raw))),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(Error::InvalidConfigValue(format!("{}: {}", key, e))),
    }
}

fn parse_number(raw: &str) -> Option<usize> {
    usize::from_str(raw).ok()
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
