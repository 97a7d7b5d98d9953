//! Theme manifest parsing.
//!
//! The manifest is untrusted input. Every field is read as an optional
//! [`serde_json::Value`] and validated independently; an entry that cannot
//! produce an id, a label and a stylesheet path is dropped whole.

use crate::theme::types::{MAX_TAG_CHARS, MAX_TAGS, ThemeDescriptor};
use crate::theme::validation::{
    ThemeValidationError, normalize_id, sanitize_accent, sanitize_description, sanitize_label,
    sanitize_stylesheet_path,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;

/// Errors that make a whole manifest unusable
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("manifest is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("manifest is not a JSON object")]
    NotAnObject,
    #[error("manifest has no 'themes' array")]
    MissingThemes,
    #[error("unsupported manifest version: {0}")]
    UnsupportedVersion(String),
    #[error("manifest contains no usable themes ({rejected} rejected)")]
    NoUsableThemes { rejected: usize },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawManifest {
    #[serde(default)]
    version: Option<Value>,
    #[serde(default)]
    generated_at: Option<Value>,
    #[serde(default)]
    default_theme: Option<Value>,
    #[serde(default)]
    themes: Option<Value>,
}

/// An entry that was dropped during validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedEntry {
    pub index: usize,
    pub id: Option<String>,
    pub reason: ThemeValidationError,
}

/// Manifest content that survived validation, in manifest order
#[derive(Debug, Clone)]
pub struct ValidatedManifest {
    pub version: Option<u64>,
    pub generated_at: Option<DateTime<Utc>>,
    pub default_theme: Option<String>,
    pub themes: Vec<ThemeDescriptor>,
    pub rejected: Vec<RejectedEntry>,
}

/// Parse and validate a manifest body.
///
/// Fails when the body is not a JSON object, has no `themes` array, carries a
/// version below 1, or leaves no valid entries.
pub fn parse_manifest(body: &str) -> Result<ValidatedManifest, ManifestError> {
    let value: Value = serde_json::from_str(body)?;
    if !value.is_object() {
        return Err(ManifestError::NotAnObject);
    }
    let raw: RawManifest = serde_json::from_value(value)?;

    let version = match raw.version {
        None | Some(Value::Null) => None,
        Some(value) => match value.as_u64() {
            Some(version) if version >= 1 => Some(version),
            _ => return Err(ManifestError::UnsupportedVersion(value.to_string())),
        },
    };

    let entries = match raw.themes {
        Some(Value::Array(entries)) => entries,
        _ => return Err(ManifestError::MissingThemes),
    };

    let generated_at = raw
        .generated_at
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|text| match DateTime::parse_from_rfc3339(text.trim()) {
            Ok(timestamp) => Some(timestamp.with_timezone(&Utc)),
            Err(e) => {
                log::debug!("Ignoring unparsable manifest generatedAt '{text}': {e}");
                None
            }
        });

    let default_theme = raw
        .default_theme
        .as_ref()
        .and_then(Value::as_str)
        .and_then(normalize_id);

    let mut themes = Vec::with_capacity(entries.len());
    let mut rejected = Vec::new();
    let mut seen = HashSet::new();

    for (index, entry) in entries.iter().enumerate() {
        match validate_entry(entry) {
            Ok(theme) if !seen.insert(theme.id.clone()) => rejected.push(RejectedEntry {
                index,
                id: Some(theme.id.clone()),
                reason: ThemeValidationError::DuplicateId { id: theme.id },
            }),
            Ok(theme) => themes.push(theme),
            Err(reason) => rejected.push(RejectedEntry {
                index,
                id: entry.get("id").and_then(Value::as_str).map(str::to_string),
                reason,
            }),
        }
    }

    if themes.is_empty() {
        return Err(ManifestError::NoUsableThemes {
            rejected: rejected.len(),
        });
    }

    Ok(ValidatedManifest {
        version,
        generated_at,
        default_theme,
        themes,
        rejected,
    })
}

/// Validate one manifest entry into a descriptor
pub fn validate_entry(entry: &Value) -> Result<ThemeDescriptor, ThemeValidationError> {
    let fields = entry
        .as_object()
        .ok_or(ThemeValidationError::NotAnObject)?;
    let text = move |key: &str| fields.get(key).and_then(Value::as_str);

    let raw_id = text("id").unwrap_or_default();
    let id = normalize_id(raw_id).ok_or_else(|| ThemeValidationError::InvalidId {
        id: raw_id.to_string(),
        reason: "Id must match [a-z0-9-]+".to_string(),
    })?;

    let label = text("label")
        .and_then(sanitize_label)
        .ok_or(ThemeValidationError::MissingLabel)?;

    let stylesheet_path = sanitize_stylesheet_path(text("css").unwrap_or_default())?;

    let description = text("description").and_then(sanitize_description);

    let accent_color = text("accent").and_then(|raw| {
        let accent = sanitize_accent(raw);
        if accent.is_none() {
            log::debug!("Dropping invalid accent '{raw}' for theme '{id}'");
        }
        accent
    });

    let tags = fields
        .get("tags")
        .and_then(Value::as_array)
        .map(|tags| sanitize_tags(tags.as_slice()))
        .unwrap_or_default();

    Ok(ThemeDescriptor {
        id,
        label,
        stylesheet_path,
        description,
        accent_color,
        tags,
    })
}

/// Keep string tags only: trimmed, non-empty, bounded length, at most three.
fn sanitize_tags(tags: &[Value]) -> Vec<String> {
    tags.iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(|tag| tag.chars().take(MAX_TAG_CHARS).collect())
        .take(MAX_TAGS)
        .collect()
}
