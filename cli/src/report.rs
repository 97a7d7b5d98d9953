//! Printable summaries of command results.

use chrono::{DateTime, Utc};
use engine::motion::REDUCE_MOTION_ATTRIBUTE;
use engine::storage::PreferenceStore;
use engine::surface::{DocumentModel, ThemeSurface};
use engine::theme::bootstrap::BootstrapOutcome;
use engine::theme::controller::CatalogOutcome;
use engine::theme::manifest::{RejectedEntry, ValidatedManifest};
use engine::theme::types::{CatalogSource, STYLESHEET_LINK_ID, THEME_ATTRIBUTE, ThemeDescriptor};
use engine::{ControllerPhase, ThemeController, ThemeRegistry};
use serde::Serialize;
use std::fmt::{self, Display};

/// One dropped manifest entry
#[derive(Debug, Clone, Serialize)]
pub struct DroppedEntry {
    pub index: usize,
    pub id: Option<String>,
    pub reason: String,
}

impl From<&RejectedEntry> for DroppedEntry {
    fn from(entry: &RejectedEntry) -> Self {
        Self {
            index: entry.index,
            id: entry.id.clone(),
            reason: entry.reason.to_string(),
        }
    }
}

impl Display for DroppedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} ({}): {}",
            self.index,
            self.id.as_deref().unwrap_or("no id"),
            self.reason
        )
    }
}

/// Catalog metadata shared by the page and list reports
#[derive(Debug, Clone, Serialize)]
pub struct CatalogSummary {
    pub source: CatalogSource,
    pub themes: usize,
    pub fallback_id: String,
    pub version: Option<u64>,
    pub generated_at: Option<DateTime<Utc>>,
}

impl CatalogSummary {
    pub fn of(registry: &ThemeRegistry) -> Self {
        Self {
            source: registry.source(),
            themes: registry.len(),
            fallback_id: registry.fallback_id().to_string(),
            version: registry.version(),
            generated_at: registry.generated_at(),
        }
    }
}

impl Display for CatalogSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = match self.source {
            CatalogSource::BuiltIn => "built-in",
            CatalogSource::Manifest => "manifest",
        };
        write!(
            f,
            "{} themes from {source}, fallback '{}'",
            self.themes, self.fallback_id
        )?;
        if let Some(version) = self.version {
            write!(f, ", version {version}")?;
        }
        if let Some(generated_at) = self.generated_at {
            write!(
                f,
                "\ncatalog last refreshed at {}",
                generated_at.format("%Y-%m-%d %H:%M UTC")
            )?;
        }
        Ok(())
    }
}

/// Result of the pre-paint step only
#[derive(Debug, Clone, Serialize)]
pub struct BootstrapReport {
    pub theme_id: String,
    pub stylesheet_href: String,
    pub storage_available: bool,
}

impl From<&BootstrapOutcome> for BootstrapReport {
    fn from(outcome: &BootstrapOutcome) -> Self {
        Self {
            theme_id: outcome.theme_id.clone(),
            stylesheet_href: outcome.stylesheet_href.clone(),
            storage_available: outcome.storage_available,
        }
    }
}

impl Display for BootstrapReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "theme:      {}", self.theme_id)?;
        write!(f, "stylesheet: {}", self.stylesheet_href)?;
        if !self.storage_available {
            write!(f, "\n(preferences unavailable, built-in default used)")?;
        }
        Ok(())
    }
}

/// Final document state after a page load
#[derive(Debug, Clone, Serialize)]
pub struct PageReport {
    pub phase: ControllerPhase,
    pub manifest_url: String,
    pub theme_id: String,
    pub theme_attribute: Option<String>,
    pub stylesheet_href: Option<String>,
    pub hint: Option<String>,
    pub reduced_motion: bool,
    pub catalog: CatalogSummary,
    pub catalog_error: Option<String>,
    pub dropped: Vec<DroppedEntry>,
    pub document: DocumentModel,
}

impl PageReport {
    pub fn capture<S: PreferenceStore>(
        controller: &ThemeController<S, DocumentModel>,
        outcome: &CatalogOutcome,
    ) -> Self {
        let document = controller.surface();
        let (catalog_error, dropped) = match outcome {
            CatalogOutcome::Applied { rejected, .. } => {
                (None, rejected.iter().map(DroppedEntry::from).collect())
            }
            CatalogOutcome::Retained(e) => (Some(e.to_string()), Vec::new()),
            CatalogOutcome::Skipped => (None, Vec::new()),
        };

        Self {
            phase: controller.phase(),
            manifest_url: controller.settings().manifest_url.to_string(),
            theme_id: controller.active_id().to_string(),
            theme_attribute: document.root_attribute(THEME_ATTRIBUTE),
            stylesheet_href: document.stylesheet_href(STYLESHEET_LINK_ID),
            hint: document.theme_hint().map(str::to_string),
            reduced_motion: document.root_attribute(REDUCE_MOTION_ATTRIBUTE).as_deref()
                == Some("true"),
            catalog: CatalogSummary::of(controller.registry()),
            catalog_error,
            dropped,
            document: document.clone(),
        }
    }
}

impl Display for PageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "theme:      {}", self.theme_id)?;
        writeln!(
            f,
            "attribute:  {}",
            self.theme_attribute.as_deref().unwrap_or("(unset)")
        )?;
        writeln!(
            f,
            "stylesheet: {}",
            self.stylesheet_href.as_deref().unwrap_or("(none)")
        )?;
        if let Some(hint) = &self.hint {
            writeln!(f, "hint:       {hint}")?;
        }
        writeln!(f, "motion:     {}", if self.reduced_motion { "reduced" } else { "full" })?;

        let options: Vec<String> = self
            .document
            .theme_options()
            .iter()
            .map(|option| {
                if option.selected {
                    format!("[{}]", option.value)
                } else {
                    option.value.clone()
                }
            })
            .collect();
        writeln!(f, "options:    {}", options.join(" "))?;
        writeln!(f, "manifest:   {}", self.manifest_url)?;
        write!(f, "catalog:    {}", self.catalog)?;

        if let Some(error) = &self.catalog_error {
            write!(f, "\nmanifest not applied: {error}")?;
        }
        for entry in &self.dropped {
            write!(f, "\ndropped {entry}")?;
        }
        Ok(())
    }
}

/// One row of the `list` command
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub id: String,
    pub label: String,
    pub stylesheet_path: String,
    pub accent_color: Option<String>,
    pub tags: Vec<String>,
    pub active: bool,
    pub fallback: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogReport {
    pub catalog: CatalogSummary,
    pub entries: Vec<CatalogEntry>,
}

impl CatalogReport {
    pub fn capture(registry: &ThemeRegistry, active_id: &str) -> Self {
        let entries = registry
            .themes()
            .iter()
            .map(|theme| CatalogEntry::from_descriptor(theme, active_id, registry.fallback_id()))
            .collect();

        Self {
            catalog: CatalogSummary::of(registry),
            entries,
        }
    }
}

impl CatalogEntry {
    fn from_descriptor(theme: &ThemeDescriptor, active_id: &str, fallback_id: &str) -> Self {
        Self {
            id: theme.id.clone(),
            label: theme.label.clone(),
            stylesheet_path: theme.stylesheet_path.clone(),
            accent_color: theme.accent_color.clone(),
            tags: theme.tags.clone(),
            active: theme.id == active_id,
            fallback: theme.id == fallback_id,
        }
    }
}

impl Display for CatalogReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.catalog)?;
        for entry in &self.entries {
            let marker = if entry.active { '*' } else { ' ' };
            write!(
                f,
                "\n{marker} {:<16} {:<24} {}",
                entry.id, entry.label, entry.stylesheet_path
            )?;
            if let Some(accent) = &entry.accent_color {
                write!(f, " {accent}")?;
            }
            if !entry.tags.is_empty() {
                write!(f, " [{}]", entry.tags.join(", "))?;
            }
            if entry.fallback {
                write!(f, " (fallback)")?;
            }
        }
        Ok(())
    }
}

/// Outcome of `check-manifest` for a manifest that is usable
#[derive(Debug, Clone, Serialize)]
pub struct ManifestReport {
    pub version: Option<u64>,
    pub generated_at: Option<DateTime<Utc>>,
    pub default_theme: Option<String>,
    pub kept: Vec<String>,
    pub dropped: Vec<DroppedEntry>,
}

impl From<&ValidatedManifest> for ManifestReport {
    fn from(manifest: &ValidatedManifest) -> Self {
        Self {
            version: manifest.version,
            generated_at: manifest.generated_at,
            default_theme: manifest.default_theme.clone(),
            kept: manifest.themes.iter().map(|theme| theme.id.clone()).collect(),
            dropped: manifest.rejected.iter().map(DroppedEntry::from).collect(),
        }
    }
}

impl Display for ManifestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "kept {} themes: {}", self.kept.len(), self.kept.join(", "))?;
        if let Some(default_theme) = &self.default_theme {
            let status = if self.kept.contains(default_theme) {
                "valid"
            } else {
                "not in catalog, ignored"
            };
            write!(f, "\ndefault theme: {default_theme} ({status})")?;
        }
        if let Some(generated_at) = self.generated_at {
            write!(f, "\ngenerated at {}", generated_at.format("%Y-%m-%d %H:%M UTC"))?;
        }
        for entry in &self.dropped {
            write!(f, "\ndropped {entry}")?;
        }
        Ok(())
    }
}

/// State of the reduce-motion preference
#[derive(Debug, Clone, Serialize)]
pub struct MotionReport {
    pub reduced: bool,
    pub changed: bool,
}

impl Display for MotionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.reduced { "reduced" } else { "full" };
        if self.changed {
            write!(f, "motion set to {state}")
        } else {
            write!(f, "motion: {state}")
        }
    }
}
