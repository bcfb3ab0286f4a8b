/// Database configuration and connection management
pub mod database;

/// Application settings (command prefix, guard timings, categories) from config.toml
pub mod settings;

pub use settings::{AppConfig, CategoryConfig, GuardConfig, load_config, load_default_config};
