use crate::config::ConfigValidationError;
use engine::fetch::FetchError;
use engine::storage::StorageError;
use engine::theme::manifest::ManifestError;
use std::fmt::Display;

/// Errors surfaced by `sitetheme` commands.
///
/// The theme engine itself absorbs catalog and storage failures during a page
/// load; these variants cover the places where the CLI has to stop instead,
/// such as an unusable configuration or a manifest that fails `check-manifest`.
#[derive(Debug)]
pub enum AppError {
    /// Configuration could not be loaded or failed validation
    Config(String),
    /// The preference store could not be read or written
    Storage(String),
    /// The manifest could not be fetched or read
    Fetch(String),
    /// The manifest was read but is unusable
    Manifest(String),
    /// Local file system failure outside the preference store
    Io(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "Configuration Error: {msg}"),
            AppError::Storage(msg) => write!(f, "Storage Error: {msg}"),
            AppError::Fetch(msg) => write!(f, "Fetch Error: {msg}"),
            AppError::Manifest(msg) => write!(f, "Manifest Error: {msg}"),
            AppError::Io(msg) => write!(f, "IO Error: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<ConfigValidationError> for AppError {
    fn from(err: ConfigValidationError) -> Self {
        AppError::Config(err.user_message())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        AppError::Fetch(err.to_string())
    }
}

impl From<ManifestError> for AppError {
    fn from(err: ManifestError) -> Self {
        AppError::Manifest(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

/// Result type alias for command operations
pub type AppResult<T> = Result<T, AppError>;
