//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveTime;
use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Upper bound for quest title length.
pub const MAX_TITLE_CHARS: usize = 80;

/// Root application configuration.
///
/// Built once at startup and shared read-only for the rest of the run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Tracked source identifiers (community slugs), checked in this order
    #[serde(default)]
    pub sources: Vec<String>,

    /// Telegram delivery settings
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Questboard fetching and parsing settings
    #[serde(default)]
    pub fetcher: FetcherConfig,

    /// Check and summary timing
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Snapshot persistence
    #[serde(default)]
    pub storage: StorageConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Liveness endpoint
    #[serde(default)]
    pub health: HealthConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Unparsable numeric values are ignored with a warning.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("TELEGRAM_BOT_TOKEN") {
            self.telegram.bot_token = token;
        }
        if let Some(chat_id) = lookup("CHAT_ID") {
            self.telegram.chat_id = chat_id;
        }
        if let Some(list) = lookup("COMMUNITIES") {
            self.sources = parse_sources(&list);
        }
        if let Some(value) = lookup("CHECK_INTERVAL_SECS") {
            match value.trim().parse() {
                Ok(secs) => self.schedule.check_interval_secs = secs,
                Err(_) => log::warn!("Ignoring invalid CHECK_INTERVAL_SECS: {}", value),
            }
        }
        if let Some(time) = lookup("SUMMARY_TIME") {
            self.schedule.summary_time = time;
        }
        if let Some(path) = lookup("SNAPSHOT_PATH") {
            self.storage.snapshot_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("LOG_FILE") {
            self.logging.file = Some(PathBuf::from(path));
        }
        if let Some(value) = lookup("PORT") {
            match value.trim().parse() {
                Ok(port) => self.health.port = port,
                Err(_) => log::warn!("Ignoring invalid PORT: {}", value),
            }
        }
        self
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.telegram.bot_token.trim().is_empty() {
            return Err(AppError::validation("telegram.bot_token is empty"));
        }
        if self.telegram.chat_id.trim().is_empty() {
            return Err(AppError::validation("telegram.chat_id is empty"));
        }
        if self.telegram.timeout_secs == 0 {
            return Err(AppError::validation("telegram.timeout_secs must be > 0"));
        }
        if self.sources.is_empty() {
            return Err(AppError::validation("No sources defined"));
        }
        if self.fetcher.user_agent.trim().is_empty() {
            return Err(AppError::validation("fetcher.user_agent is empty"));
        }
        if self.fetcher.timeout_secs == 0 {
            return Err(AppError::validation("fetcher.timeout_secs must be > 0"));
        }
        if self.fetcher.title_max_chars == 0 || self.fetcher.title_max_chars > MAX_TITLE_CHARS {
            return Err(AppError::validation(format!(
                "fetcher.title_max_chars must be between 1 and {MAX_TITLE_CHARS}"
            )));
        }
        if !self.fetcher.url_template.contains("{source}") {
            return Err(AppError::validation(
                "fetcher.url_template must contain {source}",
            ));
        }
        Selector::parse(&self.fetcher.item_selector)
            .map_err(|e| AppError::selector(&self.fetcher.item_selector, format!("{e:?}")))?;
        if let Some(link_selector) = &self.fetcher.link_selector {
            Selector::parse(link_selector)
                .map_err(|e| AppError::selector(link_selector, format!("{e:?}")))?;
        }
        if self.schedule.check_interval_secs == 0 {
            return Err(AppError::validation(
                "schedule.check_interval_secs must be > 0",
            ));
        }
        if self.schedule.poll_interval_secs == 0 {
            return Err(AppError::validation(
                "schedule.poll_interval_secs must be > 0",
            ));
        }
        self.schedule.summary_time()?;
        Ok(())
    }
}

/// Split a comma-separated source list, dropping blank entries.
pub fn parse_sources(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Telegram Bot API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot credential token
    #[serde(default)]
    pub bot_token: String,

    /// Destination chat identity
    #[serde(default)]
    pub chat_id: String,

    /// Bot API base URL
    #[serde(default = "defaults::telegram_api_base")]
    pub api_base: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::telegram_timeout")]
    pub timeout_secs: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            chat_id: String::new(),
            api_base: defaults::telegram_api_base(),
            timeout_secs: defaults::telegram_timeout(),
        }
    }
}

/// Questboard fetching and parsing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// Page URL template; `{source}` is replaced with the source identifier
    #[serde(default = "defaults::url_template")]
    pub url_template: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::fetch_timeout")]
    pub timeout_secs: u64,

    /// CSS selector matching one quest element
    #[serde(default = "defaults::item_selector")]
    pub item_selector: String,

    /// Attribute of the quest element carrying its identifier
    #[serde(default = "defaults::id_attr")]
    pub id_attr: String,

    /// Optional selector for a link inside the quest element
    #[serde(default)]
    pub link_selector: Option<String>,

    /// Maximum title length in characters
    #[serde(default = "defaults::title_max_chars")]
    pub title_max_chars: usize,
}

impl FetcherConfig {
    /// Questboard URL for a source.
    pub fn page_url(&self, source: &str) -> String {
        self.url_template.replace("{source}", source)
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            url_template: defaults::url_template(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::fetch_timeout(),
            item_selector: defaults::item_selector(),
            id_attr: defaults::id_attr(),
            link_selector: None,
            title_max_chars: defaults::title_max_chars(),
        }
    }
}

/// Check and summary timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Seconds between check cycles
    #[serde(default = "defaults::check_interval")]
    pub check_interval_secs: u64,

    /// Seconds between scheduler polls for due jobs
    #[serde(default = "defaults::poll_interval")]
    pub poll_interval_secs: u64,

    /// Local time of day for the daily summary, `HH:MM`
    #[serde(default = "defaults::summary_time")]
    pub summary_time: String,
}

impl ScheduleConfig {
    /// Parsed summary time of day.
    pub fn summary_time(&self) -> Result<NaiveTime> {
        NaiveTime::parse_from_str(self.summary_time.trim(), "%H:%M").map_err(|e| {
            AppError::validation(format!(
                "schedule.summary_time '{}' is not HH:MM: {}",
                self.summary_time, e
            ))
        })
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            check_interval_secs: defaults::check_interval(),
            poll_interval_secs: defaults::poll_interval(),
            summary_time: defaults::summary_time(),
        }
    }
}

/// Snapshot persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the snapshot JSON file
    #[serde(default = "defaults::snapshot_path")]
    pub snapshot_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            snapshot_path: defaults::snapshot_path(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is unset
    #[serde(default = "defaults::log_level")]
    pub level: String,

    /// Append-only log file; `None` logs to stdout only
    #[serde(default = "defaults::log_file")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
            file: defaults::log_file(),
        }
    }
}

/// Liveness endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthConfig {
    #[serde(default = "defaults::health_enabled")]
    pub enabled: bool,

    #[serde(default = "defaults::health_host")]
    pub host: String,

    #[serde(default = "defaults::health_port")]
    pub port: u16,
}

impl HealthConfig {
    /// `host:port` string to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::health_enabled(),
            host: defaults::health_host(),
            port: defaults::health_port(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // Telegram defaults
    pub fn telegram_api_base() -> String {
        "https://api.telegram.org".into()
    }
    pub fn telegram_timeout() -> u64 {
        10
    }

    // Fetcher defaults
    pub fn url_template() -> String {
        "https://zealy.io/cw/{source}/questboard".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0".into()
    }
    pub fn fetch_timeout() -> u64 {
        10
    }
    pub fn item_selector() -> String {
        "div[data-quest-id]".into()
    }
    pub fn id_attr() -> String {
        "data-quest-id".into()
    }
    pub fn title_max_chars() -> usize {
        super::MAX_TITLE_CHARS
    }

    // Schedule defaults
    pub fn check_interval() -> u64 {
        30
    }
    pub fn poll_interval() -> u64 {
        5
    }
    pub fn summary_time() -> String {
        "07:00".into()
    }

    // Storage defaults
    pub fn snapshot_path() -> PathBuf {
        PathBuf::from("data/quests.json")
    }

    // Logging defaults
    pub fn log_level() -> String {
        "info".into()
    }
    pub fn log_file() -> Option<PathBuf> {
        Some(PathBuf::from("quest_notifier.log"))
    }

    // Health defaults
    pub fn health_enabled() -> bool {
        true
    }
    pub fn health_host() -> String {
        "0.0.0.0".into()
    }
    pub fn health_port() -> u16 {
        10000
    }
}
