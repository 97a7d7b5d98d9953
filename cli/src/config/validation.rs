use super::app::AppConfig;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid site.fetch_timeout_ms: {configured} (min: {min_limit}, max: {max_limit})")]
    FetchTimeout {
        configured: u64,
        min_limit: u64,
        max_limit: u64,
    },
    #[error("Invalid site.script_base_url '{value}': {reason}")]
    ScriptBaseUrl { value: String, reason: String },
    #[error("Invalid site.manifest_path '{value}': {reason}")]
    ManifestPath { value: String, reason: String },
    #[error("No preferences file configured and no user config directory available")]
    PreferencesFile,
}

impl ConfigValidationError {
    pub fn user_message(&self) -> String {
        match self {
            ConfigValidationError::FetchTimeout {
                configured,
                min_limit,
                max_limit,
            } => {
                format!(
                    "Manifest fetch timeout out of range!\n\n\
                    Your configured value: {configured} ms\n\
                    Valid range: {min_limit} - {max_limit} ms\n\n\
                    Please update site.fetch_timeout_ms in sitetheme.toml."
                )
            }
            ConfigValidationError::ScriptBaseUrl { value, reason } => {
                format!(
                    "Script base URL is not usable!\n\n\
                    Your configured value: {value}\n\
                    Problem: {reason}\n\n\
                    Please set site.script_base_url to an absolute http(s) or file URL."
                )
            }
            ConfigValidationError::ManifestPath { value, reason } => {
                format!(
                    "Manifest path cannot be resolved!\n\n\
                    Your configured value: {value}\n\
                    Problem: {reason}\n\n\
                    Please update site.manifest_path in sitetheme.toml."
                )
            }
            ConfigValidationError::PreferencesFile => "Preferences file location unknown!\n\n\
                No user config directory was found on this system.\n\n\
                Please set storage.preferences_file in sitetheme.toml."
                .to_string(),
        }
    }
}

/// Configuration loading result
#[derive(Debug)]
pub enum ConfigLoadResult {
    Success(Box<AppConfig>),
    LoadError(String),
    DeserializeError(String),
}
