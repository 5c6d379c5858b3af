// src/models/mod.rs

//! Domain models for the notifier.

mod config;
mod item;

// Re-export all public types
pub use config::{
    Config, FetcherConfig, HealthConfig, LoggingConfig, ScheduleConfig, StorageConfig,
    TelegramConfig, parse_sources,
};
pub use item::{Item, Snapshot};
