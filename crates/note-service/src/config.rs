//! Configuration loading and management

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main configuration for the note service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Token signing secret (any non-empty string).
    /// If not set, a random secret is generated at startup (auth cookies
    /// won't survive restarts).
    pub secret: Option<String>,

    /// Salt prepended to passwords before digesting.
    #[serde(default = "default_password_salt")]
    pub password_salt: String,

    /// Auth cookie lifetime in days.
    #[serde(default = "default_token_lifetime_days")]
    pub token_lifetime_days: i64,

    /// Length of the random path the root route redirects to.
    #[serde(default = "default_random_path_len")]
    pub random_path_len: usize,
}

fn default_password_salt() -> String {
    "note-service".to_string()
}

fn default_token_lifetime_days() -> i64 {
    7
}

fn default_random_path_len() -> usize {
    3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            secret: None,
            password_salt: default_password_salt(),
            token_lifetime_days: default_token_lifetime_days(),
            random_path_len: default_random_path_len(),
        }
    }
}

impl Config {
    /// Load configuration from the data directory.
    pub fn load(data_path: &str) -> Result<Self> {
        let config_file = Path::new(data_path).join("config.json");

        if config_file.exists() {
            let content = std::fs::read_to_string(&config_file)
                .with_context(|| format!("Failed to read config file: {:?}", config_file))?;
            let config: Config =
                serde_json::from_str(&content).with_context(|| "Failed to parse config.json")?;
            tracing::info!("Loaded configuration from {:?}", config_file);
            Ok(config)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_file);
            let config = Config::default();

            // Create data directory if it doesn't exist
            std::fs::create_dir_all(data_path)
                .with_context(|| format!("Failed to create data directory: {}", data_path))?;

            // Write default config for reference
            let content = serde_json::to_string_pretty(&config)?;
            std::fs::write(&config_file, content)
                .with_context(|| format!("Failed to write default config: {:?}", config_file))?;
            tracing::info!("Created default config at {:?}", config_file);

            Ok(config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert!(config.secret.is_none());
        assert_eq!(config.token_lifetime_days, 7);
        assert_eq!(config.random_path_len, 3);
        assert!(!config.password_salt.is_empty());
    }

    #[test]
    fn load_writes_default_config_on_first_run() {
        let dir = tempfile::TempDir::new().unwrap();
        let data_path = dir.path().to_str().unwrap();

        let config = Config::load(data_path).unwrap();
        assert!(dir.path().join("config.json").exists());
        assert_eq!(config.token_lifetime_days, 7);

        // Second load reads the file it just wrote.
        let reloaded = Config::load(data_path).unwrap();
        assert_eq!(reloaded.password_salt, config.password_salt);
    }
}
