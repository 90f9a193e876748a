use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, info};

use crate::core::services::RatePolicy;
use crate::core::utils::{ensure_dir, PathResolver};

const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";
const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serde(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Serde(err.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub locale: String,
    pub currency_symbol: String,
    /// Business name used to sign receipts and statements.
    pub center_label: String,
    /// Dialling prefix for messaging links, digits only.
    pub country_code: String,
    pub rate_policy: RatePolicy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_user: Option<String>,
    pub ui_color_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-IN".into(),
            currency_symbol: "₹".into(),
            center_label: "Milk Center".into(),
            country_code: "91".into(),
            rate_policy: RatePolicy::default(),
            last_user: None,
            ui_color_enabled: true,
        }
    }
}

impl Config {
    /// Sets a field from its textual key, as used by the `config set` command.
    pub fn set_field(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let mut draft = self.clone();
        match key {
            "locale" => draft.locale = value.to_string(),
            "currency_symbol" => draft.currency_symbol = value.to_string(),
            "center_label" => draft.center_label = value.to_string(),
            "country_code" => {
                let digits = value.trim_start_matches('+');
                if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
                    return Err(ConfigError::Serde(format!(
                        "country code `{}` must be numeric",
                        value
                    )));
                }
                draft.country_code = digits.to_string();
            }
            "ui_color_enabled" => draft.ui_color_enabled = parse_flag(value)?,
            "base_fat" => draft.rate_policy.base_fat = parse_number(key, value)?,
            "base_rate" => draft.rate_policy.base_rate = parse_number(key, value)?,
            "rate_increase" => draft.rate_policy.rate_increase = parse_number(key, value)?,
            "fat_step" => draft.rate_policy.fat_step = parse_number(key, value)?,
            other => {
                return Err(ConfigError::Serde(format!(
                    "unknown configuration key `{}`",
                    other
                )))
            }
        }
        draft.validate()?;
        *self = draft;
        Ok(())
    }

    /// Rejects settings the rest of the application cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.rate_policy.is_valid() {
            return Err(ConfigError::Serde("rate policy is not usable".into()));
        }
        if self.country_code.is_empty() || !self.country_code.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::Serde(format!(
                "country code `{}` must be numeric",
                self.country_code
            )));
        }
        Ok(())
    }

    pub const KEYS: [&'static str; 9] = [
        "locale",
        "currency_symbol",
        "center_label",
        "country_code",
        "ui_color_enabled",
        "base_fat",
        "base_rate",
        "rate_increase",
        "fat_step",
    ];
}

fn parse_number(key: &str, value: &str) -> Result<f64, ConfigError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .ok_or_else(|| ConfigError::Serde(format!("`{}` expects a number, got `{}`", key, value)))
}

fn parse_flag(value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        other => Err(ConfigError::Serde(format!("`{}` is not a boolean", other))),
    }
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
    backups_dir: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        ensure_dir(&base)?;
        ensure_dir(&PathResolver::config_dir_in(&base))?;
        let backups_dir = PathResolver::config_backup_dir_in(&base);
        ensure_dir(&backups_dir)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
            backups_dir,
            base,
        })
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            let config: Config = serde_json::from_str(&data)?;
            config.validate()?;
            debug!(path = %self.path.display(), "configuration loaded");
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        info!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    pub fn backup(&self, config: &Config, note: Option<&str>) -> Result<String, ConfigError> {
        ensure_dir(&self.backups_dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let mut name = format!("config_{}", timestamp);
        if let Some(label) = sanitize_note(note) {
            name.push('_');
            name.push_str(&label);
        }
        name.push_str(&format!(".{}", BACKUP_EXTENSION));
        let path = self.backups_dir.join(&name);
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&path, &json)?;
        Ok(name)
    }

    pub fn restore(&self, backup_name: &str) -> Result<Config, ConfigError> {
        let path = self.backups_dir.join(backup_name);
        if !path.exists() {
            return Err(ConfigError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("configuration backup `{}` not found", backup_name),
            )));
        }
        let data = fs::read_to_string(&path)?;
        let config: Config = serde_json::from_str(&data)?;
        config.validate()?;
        self.save(&config)?;
        Ok(config)
    }

    /// Backup file names, newest first.
    pub fn list_backups(&self) -> Result<Vec<String>, ConfigError> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(name.to_string());
            }
        }
        entries.sort_by(|a, b| {
            parse_timestamp(b)
                .cmp(&parse_timestamp(a))
                .then_with(|| b.cmp(a))
        });
        Ok(entries)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Root directory shared by configuration, data and exports.
    pub fn base_dir(&self) -> &Path {
        &self.base
    }
}

fn sanitize_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.')) && !sanitized.is_empty() && !last_dash {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Reads the `YYYYMMDD_HHMM` stamp that follows the `config_` prefix.
fn parse_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let trimmed = name.strip_suffix(&format!(".{}", BACKUP_EXTENSION))?;
    let mut segments = trimmed.split('_').skip(1);
    let date_part = segments.next()?;
    let time_part = segments.next()?;
    if date_part.len() != 8 || time_part.len() != 4 {
        return None;
    }
    let raw = format!("{}{}", date_part, time_part);
    chrono::NaiveDateTime::parse_from_str(&raw, "%Y%m%d%H%M")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.currency_symbol, "₹");
        assert_eq!(config.country_code, "91");
    }

    #[test]
    fn partial_file_fills_missing_fields() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{ "center_label": "Surendra Milk Center" }"#).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.center_label, "Surendra Milk Center");
        assert_eq!(config.rate_policy, RatePolicy::default());
    }

    #[test]
    fn set_field_validates_values() {
        let mut config = Config::default();
        config.set_field("base_rate", "32.5").unwrap();
        assert_eq!(config.rate_policy.base_rate, 32.5);
        config.set_field("country_code", "+44").unwrap();
        assert_eq!(config.country_code, "44");
        assert!(config.set_field("fat_step", "0").is_err());
        assert!(config.set_field("base_fat", "abc").is_err());
        assert!(config.set_field("theme", "dark").is_err());
        assert!(config.set_field("ui_color_enabled", "off").is_ok());
        assert!(!config.ui_color_enabled);
    }

    #[test]
    fn sanitize_note_collapses_separators() {
        assert_eq!(
            sanitize_note(Some("New  rates. June")).as_deref(),
            Some("new-rates-june")
        );
        assert_eq!(sanitize_note(Some("   ")), None);
    }

    #[test]
    fn parse_timestamp_requires_stamp() {
        assert!(parse_timestamp("config_20240601_0630.json").is_some());
        assert!(parse_timestamp("config_20240601_0630_new-rates.json").is_some());
        assert!(parse_timestamp("config.json").is_none());
    }
}
