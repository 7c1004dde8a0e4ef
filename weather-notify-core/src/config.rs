use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::error::ConfigError;

pub const TWILIO_ACCOUNT_SID: &str = "TWILIO_ACCOUNT_SID";
pub const TWILIO_AUTH_TOKEN: &str = "TWILIO_AUTH_TOKEN";
pub const TWILIO_FROM_NUMBER: &str = "TWILIO_FROM_NUMBER";
pub const TWILIO_MESSAGING_SID: &str = "TWILIO_MESSAGING_SID";
pub const TO_WHATSAPP_NUMBER: &str = "TO_WHATSAPP_NUMBER";
pub const OPENWEATHER_API_KEY: &str = "OPENWEATHER_API_KEY";
pub const CITY: &str = "CITY";

/// Every variable the job reads, in the order they are prompted for.
pub const ENV_VARS: &[&str] = &[
    TWILIO_ACCOUNT_SID,
    TWILIO_AUTH_TOKEN,
    TWILIO_FROM_NUMBER,
    TWILIO_MESSAGING_SID,
    TO_WHATSAPP_NUMBER,
    OPENWEATHER_API_KEY,
    CITY,
];

/// Identity the WhatsApp message is sent from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sender {
    /// Twilio messaging service sid; lets the service supply a display name.
    MessagingService(String),
    /// Plain WhatsApp-enabled Twilio number.
    Number(String),
}

/// Settings for one run. Stored on disk, overridden by environment variables.
///
/// Example TOML:
/// ```toml
/// twilio_account_sid = "AC..."
/// twilio_auth_token = "..."
/// to_whatsapp_number = "+15550001111"
/// openweather_api_key = "..."
/// city = "London"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    pub twilio_account_sid: Option<String>,
    pub twilio_auth_token: Option<String>,
    pub twilio_from_number: Option<String>,
    pub twilio_messaging_sid: Option<String>,
    pub to_whatsapp_number: Option<String>,
    pub openweather_api_key: Option<String>,
    pub city: Option<String>,
}

impl Config {
    /// Load the config file (if any), then apply the process environment on top.
    pub fn load() -> Result<Self> {
        let mut cfg = Self::load_file()?;
        cfg.apply_env_vars(std::env::vars());
        Ok(cfg)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load_file() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-notify", "weather-notify")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Build a config purely from `(name, value)` pairs.
    pub fn from_env_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut cfg = Self::default();
        cfg.apply_env_vars(vars);
        cfg
    }

    /// Overlay recognised variables; empty values are ignored.
    pub fn apply_env_vars<I, K, V>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, value) in vars {
            let value = value.into();
            if value.trim().is_empty() {
                continue;
            }

            let slot = match key.as_ref() {
                TWILIO_ACCOUNT_SID => &mut self.twilio_account_sid,
                TWILIO_AUTH_TOKEN => &mut self.twilio_auth_token,
                TWILIO_FROM_NUMBER => &mut self.twilio_from_number,
                TWILIO_MESSAGING_SID => &mut self.twilio_messaging_sid,
                TO_WHATSAPP_NUMBER => &mut self.to_whatsapp_number,
                OPENWEATHER_API_KEY => &mut self.openweather_api_key,
                CITY => &mut self.city,
                _ => continue,
            };
            *slot = Some(value);
        }
    }

    pub fn account_sid(&self) -> Option<&str> {
        non_empty(&self.twilio_account_sid)
    }

    pub fn auth_token(&self) -> Option<&str> {
        non_empty(&self.twilio_auth_token)
    }

    pub fn recipient(&self) -> Option<&str> {
        non_empty(&self.to_whatsapp_number)
    }

    pub fn api_key(&self) -> Option<&str> {
        non_empty(&self.openweather_api_key)
    }

    /// Configured city, untouched unless it is blank.
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref().filter(|c| !c.trim().is_empty())
    }

    /// Messaging service wins over a fixed number when both are set.
    pub fn sender(&self) -> Option<Sender> {
        if let Some(sid) = non_empty(&self.twilio_messaging_sid) {
            return Some(Sender::MessagingService(sid.to_owned()));
        }
        non_empty(&self.twilio_from_number).map(|n| Sender::Number(n.to_owned()))
    }

    /// Names of required settings that are absent.
    pub fn missing_required(&self) -> Vec<String> {
        let required = [
            (TWILIO_ACCOUNT_SID, self.account_sid()),
            (TWILIO_AUTH_TOKEN, self.auth_token()),
            (TO_WHATSAPP_NUMBER, self.recipient()),
            (OPENWEATHER_API_KEY, self.api_key()),
        ];

        let mut missing: Vec<String> = required
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| name.to_string())
            .collect();

        if self.sender().is_none() {
            missing.push(format!("{TWILIO_FROM_NUMBER} or {TWILIO_MESSAGING_SID}"));
        }

        missing
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let missing = self.missing_required();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError { missing })
        }
    }

    /// First six characters of the API key, for log lines.
    pub fn redacted_api_key(&self) -> Option<String> {
        self.api_key()
            .map(|key| format!("{}...", key.chars().take(6).collect::<String>()))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
