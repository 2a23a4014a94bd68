//! Process configuration for the RAG Assistant gateway.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Defaults
//! - Config file (`.ragassist/config.yaml` or `--config`)
//! - Environment variables
//! - Command-line flags
//!
//! It only covers how the process runs (bind address, log level, where the
//! settings store lives). The per-request service settings are read from the
//! settings store, see [`crate::settings`].

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Default location of the settings store, relative to the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = "rag_assistant.yaml";

/// Default address for `ragassist serve`.
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the YAML settings store consulted on every request
    pub settings_file: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Socket address the HTTP endpoint listens on
    pub bind: String,

    /// Store code used when a request does not name one
    pub store: Option<String>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    server: Option<ServerConfig>,
    settings: Option<SettingsConfig>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ServerConfig {
    bind: Option<String>,
    store: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SettingsConfig {
    path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            settings_file: PathBuf::from(DEFAULT_SETTINGS_FILE),
            config_file: None,
            bind: DEFAULT_BIND.to_string(),
            store: None,
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file, environment variables and defaults.
    ///
    /// `config_file` is the `--config` / `RAGASSIST_CONFIG` path; an explicit
    /// file must exist. Without one, `.ragassist/config.yaml` is read if present.
    ///
    /// Environment variables:
    /// - `RAGASSIST_SETTINGS`: Path to the settings store
    /// - `RAGASSIST_BIND`: Listen address for `serve`
    /// - `RAGASSIST_STORE`: Default store code
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use ragassist_core::config::AppConfig;
    ///
    /// let config = AppConfig::load_from(None).expect("Failed to load config");
    /// println!("Settings: {:?}", config.settings_file);
    /// ```
    pub fn load_from(config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self {
            config_file,
            ..Self::default()
        };

        let config_path = match config.config_file {
            Some(ref cf) => {
                if !cf.exists() {
                    return Err(AppError::Config(format!(
                        "Config file does not exist: {:?}",
                        cf
                    )));
                }
                cf.clone()
            }
            None => PathBuf::from(".ragassist/config.yaml"),
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(settings) = std::env::var("RAGASSIST_SETTINGS") {
            config.settings_file = PathBuf::from(settings);
        }

        if let Ok(bind) = std::env::var("RAGASSIST_BIND") {
            config.bind = bind;
        }

        if let Ok(store) = std::env::var("RAGASSIST_STORE") {
            config.store = Some(store);
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into a copy of this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        self.merge_yaml_str(&contents)
            .map_err(|e| AppError::Config(format!("Failed to parse config file {:?}: {}", path, e)))
    }

    fn merge_yaml_str(&self, contents: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes to unit, not to a struct.
        let config_file: ConfigFile = if contents.trim().is_empty() {
            ConfigFile::default()
        } else {
            serde_yaml::from_str(contents)?
        };

        let mut result = self.clone();

        if let Some(server) = config_file.server {
            if let Some(bind) = server.bind {
                result.bind = bind;
            }
            if let Some(store) = server.store {
                result.store = Some(store);
            }
        }

        if let Some(settings) = config_file.settings {
            if let Some(path) = settings.path {
                result.settings_file = PathBuf::from(path);
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over environment variables and the config file.
    pub fn with_overrides(
        mut self,
        settings_file: Option<PathBuf>,
        store: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(settings_file) = settings_file {
            self.settings_file = settings_file;
        }

        if let Some(store) = store {
            self.store = Some(store);
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Override the listen address.
    pub fn with_bind(mut self, bind: Option<String>) -> Self {
        if let Some(bind) = bind {
            self.bind = bind;
        }
        self
    }

    /// Parse the listen address.
    pub fn bind_addr(&self) -> AppResult<SocketAddr> {
        self.bind.parse().map_err(|e| {
            AppError::Config(format!("Invalid bind address '{}': {}", self.bind, e))
        })
    }

    /// Validate the configuration before serving.
    pub fn validate(&self) -> AppResult<()> {
        self.bind_addr()?;

        if let Some(ref store) = self.store {
            if store.trim().is_empty() {
                return Err(AppError::Config("Store code must not be empty".to_string()));
            }
        }

        Ok(())
    }
}
