use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

/// Application configuration, loadable from config.yaml in the user config
/// directory. Missing file or fields fall back to the reference defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub fetcher: FetcherConfig,
    pub action: ActionConfig,
}

/// Remote value fetcher configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// IP-echo endpoint returning the caller's public address as plain text
    pub endpoint: String,

    /// Upper bound on a single request (milliseconds)
    pub request_timeout_ms: u64,
}

/// Gesture action configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionConfig {
    /// Delay before a scheduled refresh fires; repeated presses inside this
    /// window coalesce into one fetch (milliseconds)
    pub debounce_delay_ms: u64,

    /// Subtracted from the measured press duration before the threshold
    /// comparison to absorb processing jitter (milliseconds)
    pub release_buffer_ms: u64,

    /// Opened on the hold outcome
    pub details_url: String,

    /// Shown on the key while a refresh is pending
    pub in_progress_text: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fetcher: FetcherConfig::default(),
            action: ActionConfig::default(),
        }
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.ipify.org".to_string(),
            request_timeout_ms: 5_000,
        }
    }
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            debounce_delay_ms: 500,
            release_buffer_ms: 100,
            details_url: "https://www.whatismyip.com/".to_string(),
            in_progress_text: "Asking...".to_string(),
        }
    }
}

impl FetcherConfig {
    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl ActionConfig {
    /// Get debounce delay as Duration
    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_delay_ms)
    }

    /// Get release buffer as Duration
    pub fn release_buffer(&self) -> Duration {
        Duration::from_millis(self.release_buffer_ms)
    }
}

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Initialize configuration (called once at startup)
pub fn init() {
    APP_CONFIG.get_or_init(load_config);
    tracing::info!("Configuration initialized");
}

/// Get application configuration
pub fn app() -> &'static AppConfig {
    APP_CONFIG.get_or_init(load_config)
}

/// Get platform-specific configuration directory
pub fn config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Library/Application Support/ipkey")
    }

    #[cfg(not(target_os = "macos"))]
    {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ipkey")
    }
}

pub fn log_dir() -> PathBuf {
    config_dir().join("logs")
}

/// Path of the persisted per-key settings record
pub fn settings_file_path() -> PathBuf {
    config_dir().join("settings.yaml")
}

fn load_config() -> AppConfig {
    let path = config_dir().join("config.yaml");
    if path.exists() {
        match std::fs::read_to_string(&path) {
            Ok(content) => match parse_config(&content) {
                Ok(config) => {
                    tracing::info!("Loaded configuration from {:?}", path);
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {:?}: {}, using defaults", path, e);
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read {:?}: {}, using defaults", path, e);
            }
        }
    } else {
        tracing::debug!("No config.yaml found, using defaults");
    }
    AppConfig::default()
}

/// Parse configuration yaml from a string
pub fn parse_config(content: &str) -> anyhow::Result<AppConfig> {
    let config: AppConfig = serde_yaml::from_str(content)?;
    Ok(config)
}
