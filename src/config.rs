use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub images: ImagesConfig,
    #[serde(default)]
    pub flipbook: FlipbookConfig,
}

/// HTTP listener settings
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. "0.0.0.0:8501"
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Where recipes are persisted
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Path of the CSV recipe file
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

/// Settings for downloading recipe pictures
#[derive(Debug, Deserialize, Clone)]
pub struct ImagesConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl ImagesConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Cover page text of generated flipbooks
#[derive(Debug, Deserialize, Clone)]
pub struct FlipbookConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_subtitle")]
    pub subtitle: String,
    /// Shown as "Compiled by: ..." on the cover when non-empty
    #[serde(default)]
    pub compiled_by: String,
}

impl Default for FlipbookConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            subtitle: default_subtitle(),
            compiled_by: String::new(),
        }
    }
}

// Default value functions
fn default_bind() -> String {
    "127.0.0.1:8501".to_string()
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("recipes.csv")
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; NamasteFoodie/0.1)".to_string()
}

fn default_title() -> String {
    "Welcome to My Recipe Book".to_string()
}

fn default_subtitle() -> String {
    "Delicious Recipes for Every Occasion".to_string()
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with FOODIE__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: FOODIE__STORAGE__PATH
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// See [`AppConfig::load`] for the precedence rules.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested: FOODIE__SERVER__BIND
        .add_source(
            Environment::with_prefix("FOODIE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_default_values() {
        let config = AppConfig::default();
        assert_eq!(config.server.bind, "127.0.0.1:8501");
        assert_eq!(config.storage.path, PathBuf::from("recipes.csv"));
        assert_eq!(config.images.timeout(), Duration::from_secs(30));
        assert_eq!(config.flipbook.title, "Welcome to My Recipe Book");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = Config::builder()
            .add_source(File::from_str(
                "[storage]\npath = \"data/recipes.csv\"\n\n[images]\ntimeout = 5\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.storage.path, PathBuf::from("data/recipes.csv"));
        assert_eq!(config.images.timeout, 5);
        assert_eq!(config.images.user_agent, default_user_agent());
        assert_eq!(config.server.bind, default_bind());
    }

    #[test]
    fn test_empty_source_loads_defaults() {
        let config: AppConfig = Config::builder()
            .add_source(File::from_str("", config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.flipbook.subtitle, default_subtitle());
    }

    #[test]
    fn test_environment_overrides_defaults() {
        env::set_var("FOODIE__STORAGE__PATH", "/tmp/foodie/recipes.csv");
        env::set_var("FOODIE__FLIPBOOK__COMPILED_BY", "C-10");
        let result = load_config();
        env::remove_var("FOODIE__STORAGE__PATH");
        env::remove_var("FOODIE__FLIPBOOK__COMPILED_BY");

        let config = result.unwrap();
        assert_eq!(config.storage.path, PathBuf::from("/tmp/foodie/recipes.csv"));
        assert_eq!(config.flipbook.compiled_by, "C-10");
        assert_eq!(config.server.bind, default_bind());
    }
}
