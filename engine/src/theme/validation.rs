use crate::theme::types::{
    DEFAULT_THEME_ID, MAX_DESCRIPTION_CHARS, MAX_LABEL_CHARS, STYLESHEET_EXTENSION,
    TRUSTED_STYLESHEET_PREFIX,
};
use crate::validation::Validator;

/// Validation errors specific to theme catalog entries
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThemeValidationError {
    #[error("entry is not a JSON object")]
    NotAnObject,
    #[error("invalid theme id '{id}': {reason}")]
    InvalidId { id: String, reason: String },
    #[error("missing or empty label")]
    MissingLabel,
    #[error("invalid stylesheet path '{path}': {reason}")]
    InvalidStylesheetPath { path: String, reason: String },
    #[error("invalid accent color '{value}'")]
    InvalidAccent { value: String },
    #[error("duplicate theme id '{id}' (first entry wins)")]
    DuplicateId { id: String },
}

/// Validator for theme ids: `[a-z0-9-]+`
pub struct ThemeIdValidator;

impl Validator<str> for ThemeIdValidator {
    type Error = ThemeValidationError;

    fn validate(&self, input: &str) -> Result<(), Self::Error> {
        if input.is_empty() {
            return Err(ThemeValidationError::InvalidId {
                id: input.to_string(),
                reason: "Id cannot be empty".to_string(),
            });
        }

        if !input
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(ThemeValidationError::InvalidId {
                id: input.to_string(),
                reason: "Id contains invalid characters (only a-z, 0-9 and hyphens allowed)"
                    .to_string(),
            });
        }

        Ok(())
    }
}

/// Validator for catalog stylesheet paths
pub struct StylesheetPathValidator;

impl Validator<str> for StylesheetPathValidator {
    type Error = ThemeValidationError;

    fn validate(&self, input: &str) -> Result<(), Self::Error> {
        let reject = |reason: &str| ThemeValidationError::InvalidStylesheetPath {
            path: input.to_string(),
            reason: reason.to_string(),
        };

        if !input.starts_with(TRUSTED_STYLESHEET_PREFIX) {
            return Err(reject("Path must start with 'themes/'"));
        }

        if !input.ends_with(STYLESHEET_EXTENSION) {
            return Err(reject("Path must end with '.css'"));
        }

        if input.len() <= TRUSTED_STYLESHEET_PREFIX.len() + STYLESHEET_EXTENSION.len() {
            return Err(reject("Path has no file name"));
        }

        if !input
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '.' | '-'))
        {
            return Err(reject("Path contains invalid characters"));
        }

        if input.split('/').any(|segment| segment == "..") {
            return Err(reject("Path cannot contain parent directory segments"));
        }

        Ok(())
    }
}

/// Validator for accent colors: `#rgb` or `#rrggbb`
pub struct AccentColorValidator;

impl Validator<str> for AccentColorValidator {
    type Error = ThemeValidationError;

    fn validate(&self, input: &str) -> Result<(), Self::Error> {
        let valid = input
            .strip_prefix('#')
            .is_some_and(|hex| {
                matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
            });

        if valid {
            Ok(())
        } else {
            Err(ThemeValidationError::InvalidAccent {
                value: input.to_string(),
            })
        }
    }
}

/// Lowercase a raw id and return it when it matches the id grammar.
pub fn normalize_id(raw: &str) -> Option<String> {
    let candidate = raw.to_lowercase();
    ThemeIdValidator.validate(&candidate).ok()?;
    Some(candidate)
}

/// Lowercase a raw id, substituting the default sentinel when it is unusable.
///
/// The result always matches `[a-z0-9-]+` and the function is idempotent.
pub fn sanitize_id(raw: &str) -> String {
    normalize_id(raw).unwrap_or_else(|| DEFAULT_THEME_ID.to_string())
}

/// Trim and bound a display label; `None` when nothing is left
pub fn sanitize_label(raw: &str) -> Option<String> {
    non_empty_truncated(raw, MAX_LABEL_CHARS)
}

pub fn sanitize_description(raw: &str) -> Option<String> {
    non_empty_truncated(raw, MAX_DESCRIPTION_CHARS)
}

pub fn sanitize_stylesheet_path(raw: &str) -> Result<String, ThemeValidationError> {
    let path = raw.trim();
    StylesheetPathValidator.validate(path)?;
    Ok(path.to_string())
}

/// Accepted accents are normalized to lowercase; anything else is dropped.
pub fn sanitize_accent(raw: &str) -> Option<String> {
    let accent = raw.trim();
    AccentColorValidator.validate(accent).ok()?;
    Some(accent.to_ascii_lowercase())
}

pub(crate) fn non_empty_truncated(raw: &str, max_chars: usize) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(max_chars).collect())
}
