use crate::alert::AlertMode;
use crate::deadline::DEFAULT_TICKING_THRESHOLD_SECS;
use crate::error::AppError;
use crate::storage::DEFAULT_NAMESPACE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "COUNTDOWN_CONFIG_PATH";
const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;
const MIN_TICK_INTERVAL_MS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Palette {
    pub accent: &'static str,
    pub muted: &'static str,
    pub alert: &'static str,
    pub overdue: &'static str,
    pub reset: &'static str,
}

impl Palette {
    pub fn accentize(&self, text: &str) -> String {
        paint(self.accent, self.reset, text)
    }

    pub fn mutedize(&self, text: &str) -> String {
        paint(self.muted, self.reset, text)
    }

    pub fn alertize(&self, text: &str) -> String {
        paint(self.alert, self.reset, text)
    }

    pub fn overduize(&self, text: &str) -> String {
        paint(self.overdue, self.reset, text)
    }
}

fn paint(color: &str, reset: &str, text: &str) -> String {
    if color.is_empty() {
        text.to_string()
    } else {
        format!("{color}{text}{reset}")
    }
}

pub fn palette_for_theme(theme: Option<&str>) -> Palette {
    match theme.and_then(canonical_theme_name).as_deref() {
        Some("noir") => Palette {
            accent: "\x1b[38;5;208m",
            muted: "\x1b[38;5;250m",
            alert: "\x1b[38;5;220m",
            overdue: "\x1b[38;5;196m",
            reset: "\x1b[0m",
        },
        Some("solarized") => Palette {
            accent: "\x1b[38;5;108m",
            muted: "\x1b[38;5;250m",
            alert: "\x1b[38;5;136m",
            overdue: "\x1b[38;5;160m",
            reset: "\x1b[0m",
        },
        _ => Palette {
            accent: "",
            muted: "",
            alert: "",
            overdue: "",
            reset: "",
        },
    }
}

pub fn canonical_theme_name(raw: &str) -> Option<String> {
    let cleaned = canonicalize_key(raw);
    if cleaned.is_empty() {
        return Some("default".into());
    }

    match cleaned.as_str() {
        "vanilla" | "light" | "plain" => Some("default".to_string()),
        "dark" | "dark_mode" | "darkmode" => Some("noir".to_string()),
        _ => Some(cleaned),
    }
}

/// Lowercases and collapses runs of non-alphanumerics into single `_`.
pub fn canonicalize_key(raw: &str) -> String {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    cleaned.trim_matches('_').to_string()
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub tick_interval_ms: Option<u64>,
    #[serde(default)]
    pub ticking_threshold_secs: Option<i64>,
    #[serde(default)]
    pub alerts: Option<String>,
    #[serde(default)]
    pub log_level: Option<String>,
    #[serde(default)]
    pub log_dir: Option<String>,
}

impl Config {
    pub fn namespace(&self) -> &str {
        self.namespace
            .as_deref()
            .map(str::trim)
            .filter(|namespace| !namespace.is_empty())
            .unwrap_or(DEFAULT_NAMESPACE)
    }

    pub fn tick_interval(&self) -> Duration {
        let millis = self
            .tick_interval_ms
            .unwrap_or(DEFAULT_TICK_INTERVAL_MS)
            .max(MIN_TICK_INTERVAL_MS);
        Duration::from_millis(millis)
    }

    pub fn ticking_threshold_secs(&self) -> i64 {
        self.ticking_threshold_secs
            .filter(|secs| *secs >= 0)
            .unwrap_or(DEFAULT_TICKING_THRESHOLD_SECS)
    }

    pub fn alert_mode(&self) -> AlertMode {
        self.alerts
            .as_deref()
            .and_then(AlertMode::parse)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub theme: Option<String>,
    pub namespace: Option<String>,
    pub tick_interval_ms: Option<u64>,
    pub ticking_threshold_secs: Option<i64>,
    pub alerts: Option<String>,
    pub log_level: Option<String>,
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    Ok(crate::storage::json_store::store_dir()?.join(CONFIG_FILE_NAME))
}

/// Loads the config, falling back to defaults. Problems are reported in
/// `ConfigLoad::error` rather than stopping the app.
pub fn load_config_with_fallback() -> ConfigLoad {
    match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let config: Config = serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })?;
    validate_config(&config)?;
    Ok(normalize_config_theme(config))
}

fn validate_config(config: &Config) -> Result<(), AppError> {
    if let Some(alerts) = config.alerts.as_deref()
        && AlertMode::parse(alerts).is_none()
    {
        return Err(AppError::invalid_data(format!(
            "unknown alerts mode '{alerts}'; expected bell|desktop|none"
        )));
    }
    if let Some(threshold) = config.ticking_threshold_secs
        && threshold < 0
    {
        return Err(AppError::invalid_data(
            "ticking_threshold_secs must not be negative",
        ));
    }
    Ok(())
}

fn normalize_config_theme(mut config: Config) -> Config {
    config.theme = config.theme.and_then(|name| canonical_theme_name(&name));
    config
}

pub fn merge_overrides(base: &Config, overrides: &ConfigOverrides) -> Config {
    let mut merged = base.clone();
    if let Some(theme) = overrides.theme.as_ref()
        && let Some(normalized) = canonical_theme_name(theme)
    {
        merged.theme = Some(normalized);
    }
    if let Some(namespace) = overrides.namespace.as_ref() {
        merged.namespace = Some(namespace.clone());
    }
    if let Some(interval) = overrides.tick_interval_ms {
        merged.tick_interval_ms = Some(interval);
    }
    if let Some(threshold) = overrides.ticking_threshold_secs {
        merged.ticking_threshold_secs = Some(threshold);
    }
    if let Some(alerts) = overrides.alerts.as_ref() {
        merged.alerts = Some(alerts.clone());
    }
    if let Some(level) = overrides.log_level.as_ref() {
        merged.log_level = Some(level.clone());
    }

    merged
}
