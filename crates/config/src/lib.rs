// Configuration loading

pub mod settings;

pub use settings::{ConfigError, ModifierStyle, Settings, MAX_SYNC_INTERVAL_MS, MIN_SYNC_INTERVAL_MS};
