use super::{LoggingConfig, limits::*, validation::ConfigValidationError};
use engine::storage::FileStore;
use engine::theme::controller::{ControllerSettings, DEFAULT_MANIFEST_PATH};
use reqwest::Url;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Deserialize, Default, Clone)]
pub struct AppConfig {
    #[serde(default)]
    site: SiteConfig,
    #[serde(default)]
    storage: StorageConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

/// Where the site lives and how its manifest is fetched
#[derive(Debug, Deserialize, Default, Clone)]
pub struct SiteConfig {
    script_base_url: Option<String>,
    manifest_path: Option<String>,
    fetch_timeout_ms: Option<u64>,
}

/// Persisted preference storage
#[derive(Debug, Deserialize, Default, Clone)]
pub struct StorageConfig {
    preferences_file: Option<PathBuf>,
}

impl AppConfig {
    /// Validate the configuration, collecting every problem
    pub fn validate(&self) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        let timeout = self.site.fetch_timeout_ms();
        if !(MIN_FETCH_TIMEOUT_MS..=MAX_FETCH_TIMEOUT_MS).contains(&timeout) {
            errors.push(ConfigValidationError::FetchTimeout {
                configured: timeout,
                min_limit: MIN_FETCH_TIMEOUT_MS,
                max_limit: MAX_FETCH_TIMEOUT_MS,
            });
        }

        match self.site.script_base() {
            Ok(base) => {
                if let Err(reason) = base.join(self.site.manifest_path()) {
                    errors.push(ConfigValidationError::ManifestPath {
                        value: self.site.manifest_path().to_string(),
                        reason: reason.to_string(),
                    });
                }
            }
            Err(e) => errors.push(e),
        }

        if self.storage.preferences_file().is_none() {
            errors.push(ConfigValidationError::PreferencesFile);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    pub fn storage(&self) -> &StorageConfig {
        &self.storage
    }

    pub fn logging(&self) -> &LoggingConfig {
        &self.logging
    }

    /// Controller settings derived from the site section
    pub fn controller_settings(&self) -> Result<ControllerSettings, ConfigValidationError> {
        let base = self.site.script_base()?;
        ControllerSettings::new(base, self.site.manifest_path()).map_err(|reason| {
            ConfigValidationError::ManifestPath {
                value: self.site.manifest_path().to_string(),
                reason,
            }
        })
    }

    pub fn preference_store(&self) -> Result<FileStore, ConfigValidationError> {
        self.storage
            .preferences_file()
            .map(FileStore::new)
            .ok_or(ConfigValidationError::PreferencesFile)
    }
}

impl SiteConfig {
    /// Base URL manifest and stylesheet paths are resolved against.
    ///
    /// Defaults to the current directory as a `file://` URL.
    pub fn script_base(&self) -> Result<Url, ConfigValidationError> {
        let url = match self.script_base_url.as_deref() {
            Some(raw) => Url::parse(raw).map_err(|e| ConfigValidationError::ScriptBaseUrl {
                value: raw.to_string(),
                reason: e.to_string(),
            })?,
            None => {
                let cwd = std::env::current_dir().map_err(|e| {
                    ConfigValidationError::ScriptBaseUrl {
                        value: "<current directory>".to_string(),
                        reason: e.to_string(),
                    }
                })?;
                Url::from_directory_path(&cwd).map_err(|()| {
                    ConfigValidationError::ScriptBaseUrl {
                        value: cwd.display().to_string(),
                        reason: "not an absolute path".to_string(),
                    }
                })?
            }
        };

        match url.scheme() {
            "http" | "https" | "file" => Ok(url),
            other => Err(ConfigValidationError::ScriptBaseUrl {
                value: url.to_string(),
                reason: format!("unsupported scheme '{other}'"),
            }),
        }
    }

    pub fn manifest_path(&self) -> &str {
        self.manifest_path.as_deref().unwrap_or(DEFAULT_MANIFEST_PATH)
    }

    pub fn fetch_timeout_ms(&self) -> u64 {
        self.fetch_timeout_ms.unwrap_or(DEFAULT_FETCH_TIMEOUT_MS)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms())
    }
}

impl StorageConfig {
    /// Configured preferences file, or the per-user default location
    pub fn preferences_file(&self) -> Option<PathBuf> {
        self.preferences_file
            .clone()
            .or_else(FileStore::default_location)
    }
}
