//! Application settings loaded from config.toml
//!
//! Every key is optional. A missing file means "use the built-in defaults";
//! a file that exists but cannot be parsed is a hard error, so typos are not
//! silently ignored.

use crate::core::dispatcher::DispatcherConfig;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Prefix for text commands
    pub prefix: String,
    /// Command guard timings
    pub guard: GuardConfig,
    /// Items tracked at zero on first start
    pub seed_items: Vec<String>,
    /// Predefined item categories
    pub categories: Vec<CategoryConfig>,
}

/// Dispatcher timings in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Minimum spacing between two runs of the same command by the same user
    pub cooldown_window_ms: u64,
    /// How long a hung command keeps blocking its key
    pub busy_timeout_ms: u64,
    /// How long a message/interaction id is remembered
    pub event_retention_ms: u64,
    /// How often expired entries are swept
    pub sweep_interval_ms: u64,
}

/// Configuration for a single category
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryConfig {
    /// Category name as users type it
    pub name: String,
    /// Optional marker shown next to the name
    #[serde(default)]
    pub emoji: Option<String>,
    /// Item names belonging to the category
    pub items: Vec<String>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        let defaults = DispatcherConfig::default();
        Self {
            cooldown_window_ms: millis(defaults.cooldown_window),
            busy_timeout_ms: millis(defaults.busy_timeout),
            event_retention_ms: millis(defaults.event_retention),
            sweep_interval_ms: millis(defaults.sweep_interval),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl From<GuardConfig> for DispatcherConfig {
    fn from(value: GuardConfig) -> Self {
        Self {
            cooldown_window: Duration::from_millis(value.cooldown_window_ms),
            busy_timeout: Duration::from_millis(value.busy_timeout_ms),
            event_retention: Duration::from_millis(value.event_retention_ms),
            sweep_interval: Duration::from_millis(value.sweep_interval_ms),
        }
    }
}

fn category(name: &str, emoji: &str, items: &[&str]) -> CategoryConfig {
    CategoryConfig {
        name: name.to_string(),
        emoji: Some(emoji.to_string()),
        items: items.iter().map(|s| (*s).to_string()).collect(),
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            prefix: "!".to_string(),
            guard: GuardConfig::default(),
            seed_items: [
                "glock",
                "beretta",
                "cargador pistolas",
                "cargador subfusil",
                "bongs",
                "pcp",
                "galletas",
                "supermercado",
                "gasolinera",
                "joyeria",
            ]
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
            categories: vec![
                category(
                    "weapons",
                    "🔫",
                    &["vintage", "glock", "beretta", "ak47", "uzi"],
                ),
                category(
                    "magazines",
                    "📦",
                    &["cargador pistolas", "cargador subfusil"],
                ),
                category(
                    "contraband",
                    "💊",
                    &[
                        "bongs",
                        "pcp",
                        "galletas",
                        "fentanilo",
                        "cocaina",
                        "marihuana",
                        "heroina",
                    ],
                ),
                category(
                    "blueprints",
                    "🗺️",
                    &[
                        "supermercado",
                        "gasolinera",
                        "joyeria",
                        "barberia",
                        "licoreria",
                        "tatuajes",
                        "arquitectonicos",
                        "farmacia",
                        "ropa",
                        "banco",
                    ],
                ),
            ],
        }
    }
}

impl AppConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    /// Returns a `Config` error if the TOML is malformed or a value is unusable.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).map_err(|e| Error::Config {
            message: format!("Failed to parse config.toml: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.prefix.trim().is_empty() {
            return Err(Error::Config {
                message: "prefix cannot be empty".to_string(),
            });
        }
        // tokio's interval panics on a zero period
        if self.guard.sweep_interval_ms == 0 {
            return Err(Error::Config {
                message: "guard.sweep_interval_ms must be greater than zero".to_string(),
            });
        }
        if let Some(bad) = self.categories.iter().find(|c| c.name.trim().is_empty()) {
            return Err(Error::Config {
                message: format!("category with items {:?} has an empty name", bad.items),
            });
        }
        Ok(())
    }

    /// Dispatcher timings derived from `[guard]`.
    #[must_use]
    pub fn dispatcher_config(&self) -> DispatcherConfig {
        self.guard.into()
    }
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A value fails validation
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path_ref:?}: {e}"),
    })?;
    AppConfig::from_toml(&contents)
}

/// Loads configuration from `CONFIG_PATH` (default `./config.toml`).
///
/// Falls back to [`AppConfig::default`] when the file does not exist.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_default_config() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    if !Path::new(&path).exists() {
        info!("No configuration file at {}, using built-in defaults", path);
        return Ok(AppConfig::default());
    }
    let config = load_config(&path)?;
    info!(
        "Loaded configuration from {} ({} categories, {} seed items)",
        path,
        config.categories.len(),
        config.seed_items.len()
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.prefix, "!");
        assert_eq!(config.categories.len(), 4);
        assert_eq!(config.dispatcher_config(), DispatcherConfig::default());
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let config = AppConfig::from_toml(include_str!("../../config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_parse_guard_and_categories() {
        let toml_str = r#"
            prefix = "?"
            seed_items = ["glock"]

            [guard]
            cooldown_window_ms = 500
            sweep_interval_ms = 1000

            [[categories]]
            name = "weapons"
            emoji = "🔫"
            items = ["glock", "uzi"]

            [[categories]]
            name = "tools"
            items = ["lockpick"]
        "#;

        let config = AppConfig::from_toml(toml_str).unwrap();
        assert_eq!(config.prefix, "?");
        assert_eq!(config.seed_items, vec!["glock"]);
        assert_eq!(config.categories.len(), 2);
        assert_eq!(config.categories[1].emoji, None);

        let dispatcher = config.dispatcher_config();
        assert_eq!(dispatcher.cooldown_window, Duration::from_millis(500));
        assert_eq!(dispatcher.sweep_interval, Duration::from_secs(1));
        // Unset keys keep their defaults
        assert_eq!(dispatcher.busy_timeout, Duration::from_secs(30));
        assert_eq!(dispatcher.event_retention, Duration::from_secs(60));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let result = AppConfig::from_toml("[guard]\nsweep_interval_ms = 0\n");
        assert!(matches!(result, Err(Error::Config { .. })));

        let result = AppConfig::from_toml("prefix = \"  \"\n");
        assert!(matches!(result, Err(Error::Config { .. })));

        let result = AppConfig::from_toml("[[categories]]\nname = \"\"\nitems = []\n");
        assert!(matches!(result, Err(Error::Config { .. })));

        let result = AppConfig::from_toml("guard = 5");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_load_config_missing_file_is_error() {
        let result = load_config("definitely/not/here.toml");
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
