use config::{Config, Environment, File};
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::path::Path;

pub mod app;
pub mod limits;
pub mod validation;

pub use app::AppConfig;
pub use validation::{ConfigLoadResult, ConfigValidationError};

/// Configuration file looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "sitetheme";

/// Prefix for environment overrides, e.g. `SITETHEME__SITE__FETCH_TIMEOUT_MS`
pub const ENV_PREFIX: &str = "SITETHEME";

/// Global configuration, set once at startup
static CONFIG: OnceCell<AppConfig> = OnceCell::new();

/// Load configuration from an optional file plus environment overrides.
///
/// An explicit `path` must exist; the default `sitetheme.toml` is optional.
pub fn load_config(path: Option<&Path>) -> ConfigLoadResult {
    dotenv::dotenv().ok();
    let env_source = Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true);

    let file_source = match path {
        Some(path) => File::from(path).required(true),
        None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let config = match Config::builder()
        .add_source(file_source)
        .add_source(env_source) // environment entries override file values
        .build()
    {
        Ok(config) => config,
        Err(e) => {
            return ConfigLoadResult::LoadError(format!(
                "Configuration loading failed: {e}. Please check your sitetheme.toml file and environment variables."
            ));
        }
    };

    match config.try_deserialize::<AppConfig>() {
        Ok(app_config) => {
            if let Err(validation_errors) = app_config.validate() {
                let error_messages: Vec<String> =
                    validation_errors.iter().map(|e| e.user_message()).collect();
                return ConfigLoadResult::DeserializeError(format!(
                    "Configuration validation failed:\n{}",
                    error_messages.join("\n\n")
                ));
            }
            ConfigLoadResult::Success(Box::new(app_config))
        }
        Err(e) => ConfigLoadResult::DeserializeError(format!("Failed to deserialize config: {e}")),
    }
}

/// Load and install the global configuration. Later calls return the first one.
pub fn init_config(path: Option<&Path>) -> Result<&'static AppConfig, String> {
    CONFIG.get_or_try_init(|| match load_config(path) {
        ConfigLoadResult::Success(config) => Ok(*config),
        ConfigLoadResult::LoadError(msg) | ConfigLoadResult::DeserializeError(msg) => Err(msg),
    })
}

/// Logging configuration
#[derive(Debug, Deserialize, Default, Clone)]
pub struct LoggingConfig {
    level: Option<String>,
    file: Option<String>,
}

impl LoggingConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or("info")
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }
}
