use std::path::Path;

use serde_derive::Deserialize;
use thiserror::Error;

use crate::util::logging::{self, LogLevel};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_DATABASE: &str = "route_planner";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("unable to parse settings: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ClientSettings {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ServerSettings {
    #[serde(default)]
    pub google_maps_api_key: Option<String>,
    #[serde(default)]
    pub mongodb_uri: Option<String>,
    #[serde(default = "default_database")]
    pub database: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    #[serde(default)]
    pub verbose: bool,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

/// Settings of both the client and the server, from `planner.toml` and the environment.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Settings {
    #[serde(default)]
    pub client: ClientSettings,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}

fn default_enabled() -> bool {
    true
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            google_maps_api_key: None,
            mongodb_uri: None,
            database: default_database(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            verbose: false,
            enabled: default_enabled(),
        }
    }
}

impl Settings {
    pub const FILE_NAME: &str = "planner.toml";

    /// `planner.toml` from the working directory when present, then environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::current_dir()?.join(Settings::FILE_NAME);

        let mut settings = if path.exists() {
            Settings::from_file(&path)?
        } else {
            Settings::default()
        };
        settings.apply_overrides(|key| std::env::var(key).ok());

        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Settings::from_toml_str(&std::fs::read_to_string(path)?)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("ROUTE_PLANNER_API_BASE_URL") {
            self.client.api_base_url = url;
        }
        if let Some(key) = lookup("GOOGLE_MAPS_API_KEY") {
            self.server.google_maps_api_key = Some(key);
        }
        if let Some(uri) = lookup("MONGODB_URI") {
            self.server.mongodb_uri = Some(uri);
        }
        if let Some(verbose) = lookup("ROUTE_PLANNER_VERBOSE") {
            self.logging.verbose = matches!(verbose.trim(), "1" | "true" | "yes");
        }
    }

    pub fn apply_logging(&self) {
        logging::set_global_logging(self.logging.enabled);
        logging::set_global_level(if self.logging.verbose {
            LogLevel::VERBOSE
        } else {
            LogLevel::INFO
        });
    }
}
