use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{Result, ScrapingError};

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "BOOKING_SCRAPER_CONFIG";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub scraper: ScraperConfig,
    pub frontend: FrontendConfig,
    pub browser: BrowserConfig,
    pub timing: TimingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScraperConfig {
    pub host: String,
    pub port: u16,
    pub max_concurrent_sessions: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FrontendConfig {
    pub host: String,
    pub port: u16,
    pub backend_url: String,
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BrowserConfig {
    pub headless: bool,
    pub user_agent: String,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub locale: String,
    pub proxy: Option<String>,
    #[serde(default)]
    pub extra_args: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimingConfig {
    #[serde(with = "humantime_serde")]
    pub initial_settle: Duration,
    #[serde(with = "humantime_serde")]
    pub scroll_settle: Duration,
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,
    /// How long the card count must hold still after scrolling.
    #[serde(default = "default_stable_window", with = "humantime_serde")]
    pub stable_window: Duration,
}

fn default_stable_window() -> Duration {
    Duration::from_secs(1)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scraper: ScraperConfig {
                host: "0.0.0.0".to_string(),
                port: 5001,
                max_concurrent_sessions: 4,
            },
            frontend: FrontendConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                backend_url: "http://localhost:5001".to_string(),
                request_timeout: Duration::from_secs(120),
            },
            browser: BrowserConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            viewport_width: 1920,
            viewport_height: 1080,
            locale: "en-US".to_string(),
            proxy: None,
            extra_args: Vec::new(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            initial_settle: Duration::from_secs(2),
            scroll_settle: Duration::from_secs(3),
            poll_interval: Duration::from_millis(250),
            stable_window: default_stable_window(),
        }
    }
}

impl ScraperConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl FrontendConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[async_trait::async_trait]
pub trait ConfigManager {
    async fn load_config(&self) -> Result<Config>;
    async fn save_config(&self, config: &Config) -> Result<()>;
    fn validate_config(&self, config: &Config) -> Result<()>;
}

pub struct FileConfigManager {
    config_path: PathBuf,
}

impl FileConfigManager {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Uses `BOOKING_SCRAPER_CONFIG` when set, `config.toml` otherwise.
    pub fn from_env() -> Self {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));
        Self::new(path)
    }
}

#[async_trait::async_trait]
impl ConfigManager for FileConfigManager {
    async fn load_config(&self) -> Result<Config> {
        info!("Loading configuration from {:?}", self.config_path);

        if !self.config_path.exists() {
            warn!("Configuration file not found, creating default config at {:?}", self.config_path);
            self.create_default_config().await?;
        }

        let config_content = fs::read_to_string(&self.config_path)
            .map_err(|e| ScrapingError::ConfigError(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&config_content)
            .map_err(|e| ScrapingError::ConfigError(format!("Failed to parse TOML config: {}", e)))?;

        self.validate_config(&config)?;

        info!("Configuration loaded successfully");
        Ok(config)
    }

    fn validate_config(&self, config: &Config) -> Result<()> {
        debug!("Validating configuration");

        // checking listen ports, 0 means pick an ephemeral one
        for (name, port) in [("scraper.port", config.scraper.port), ("frontend.port", config.frontend.port)] {
            if port != 0 && port < 1024 {
                return Err(ScrapingError::ConfigError(format!("{} must be 0 or between 1024 and 65535", name)).into());
            }
        }

        if config.scraper.max_concurrent_sessions == 0 {
            return Err(ScrapingError::ConfigError("max_concurrent_sessions must be greater than 0".to_string()).into());
        }
        if config.scraper.max_concurrent_sessions > 32 {
            return Err(ScrapingError::ConfigError("max_concurrent_sessions cannot exceed 32 for resource safety".to_string()).into());
        }

        let backend_url = &config.frontend.backend_url;
        if !backend_url.starts_with("http://") && !backend_url.starts_with("https://") {
            return Err(ScrapingError::ConfigError("backend_url must start with http:// or https://".to_string()).into());
        }

        // checking browser fingerprint
        if config.browser.user_agent.trim().is_empty() {
            return Err(ScrapingError::ConfigError("user_agent cannot be empty".to_string()).into());
        }
        if config.browser.viewport_width == 0 || config.browser.viewport_height == 0 {
            return Err(ScrapingError::ConfigError("viewport dimensions must be greater than 0".to_string()).into());
        }
        if let Some(ref proxy) = config.browser.proxy {
            if !proxy.contains(':') {
                return Err(ScrapingError::ConfigError(format!("Invalid proxy format '{}', expected 'host:port'", proxy)).into());
            }
        }

        // checking wait budget
        let timing = &config.timing;
        if timing.poll_interval.is_zero() {
            return Err(ScrapingError::ConfigError("poll_interval must be greater than 0".to_string()).into());
        }
        if timing.poll_interval > timing.initial_settle || timing.poll_interval > timing.scroll_settle {
            return Err(ScrapingError::ConfigError("poll_interval cannot exceed the settle timeouts".to_string()).into());
        }
        if timing.stable_window > timing.scroll_settle {
            return Err(ScrapingError::ConfigError("stable_window cannot exceed scroll_settle".to_string()).into());
        }

        debug!("Configuration validation passed");
        Ok(())
    }

    async fn save_config(&self, config: &Config) -> Result<()> {
        info!("Saving configuration to {:?}", self.config_path);

        let toml_content = toml::to_string_pretty(config)
            .map_err(|e| ScrapingError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        fs::write(&self.config_path, toml_content)
            .map_err(|e| ScrapingError::ConfigError(format!("Failed to write config file: {}", e)))?;

        info!("Configuration saved successfully");
        Ok(())
    }
}

impl FileConfigManager {
    /// Create a default configuration file
    async fn create_default_config(&self) -> Result<()> {
        let default_config = Config::default();
        let toml_content = toml::to_string_pretty(&default_config)
            .map_err(|e| ScrapingError::ConfigError(format!("Failed to serialize default config: {}", e)))?;

        if let Some(parent) = self.config_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| ScrapingError::ConfigError(format!("Failed to create config directory: {}", e)))?;
            }
        }

        fs::write(&self.config_path, toml_content)
            .map_err(|e| ScrapingError::ConfigError(format!("Failed to write default config: {}", e)))?;

        info!("Default configuration file created at {:?}", self.config_path);
        Ok(())
    }
}
