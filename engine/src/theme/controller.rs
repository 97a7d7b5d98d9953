use crate::fetch::{FetchError, ManifestSource};
use crate::storage::{LEGACY_ARC_KEY, PreferenceStore, THEME_KEY};
use crate::surface::ThemeSurface;
use crate::theme::bootstrap::{BootstrapOutcome, read_requested_theme};
use crate::theme::manifest::{ManifestError, RejectedEntry, parse_manifest};
use crate::theme::registry::ThemeRegistry;
use crate::theme::types::LEGACY_THEME_ID;
use crate::theme::view::ThemeView;
use reqwest::Url;
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Default manifest location relative to the script base
pub const DEFAULT_MANIFEST_PATH: &str = "themes/manifest.json";

/// Per page load state of the theme controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerPhase {
    /// Before the bootstrap step has run
    #[default]
    Uninitialized,
    BuiltInApplied,
    BuiltInConfirmed,
    CatalogFetchPending,
    CatalogApplied,
    CatalogFetchFailed,
}

impl ControllerPhase {
    /// Whether the single fetch of this page load has settled
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::CatalogApplied | Self::CatalogFetchFailed)
    }
}

/// Why a catalog load did not replace the catalog
#[derive(Debug, thiserror::Error)]
pub enum CatalogLoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// Outcome of settling the catalog fetch
#[derive(Debug)]
pub enum CatalogOutcome {
    /// The manifest replaced the catalog
    Applied {
        themes: usize,
        rejected: Vec<RejectedEntry>,
    },
    /// The current catalog was kept
    Retained(CatalogLoadError),
    /// The fetch was already attempted during this page load
    Skipped,
}

/// The owned manifest request of one page load. It borrows nothing from the
/// controller, so user theme changes may happen while it is pending.
pub type CatalogFetch = Pin<Box<dyn Future<Output = Result<String, FetchError>> + Send>>;

/// Where the controller finds its script base and manifest
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub script_base: Url,
    pub manifest_url: Url,
}

impl ControllerSettings {
    pub fn new(script_base: Url, manifest_path: &str) -> Result<Self, String> {
        let manifest_url = script_base
            .join(manifest_path)
            .map_err(|e| format!("Invalid manifest path '{manifest_path}': {e}"))?;

        Ok(Self {
            script_base,
            manifest_url,
        })
    }
}

/// Owns the authoritative catalog and every theme change after bootstrap.
///
/// All mutation happens through `&mut self` on a single thread; the only
/// suspension point is the manifest request returned by
/// [`ThemeController::start_catalog_fetch`].
pub struct ThemeController<S, D> {
    registry: ThemeRegistry,
    store: S,
    surface: D,
    source: Arc<dyn ManifestSource>,
    settings: ControllerSettings,
    phase: ControllerPhase,
    active_id: String,
}

impl<S, D> ThemeController<S, D>
where
    S: PreferenceStore,
    D: ThemeSurface,
{
    /// Take over from the bootstrap step. The controller starts from the
    /// built-in catalog and the bootstrap's resolved id.
    pub fn new(
        settings: ControllerSettings,
        store: S,
        surface: D,
        source: Arc<dyn ManifestSource>,
        bootstrap: &BootstrapOutcome,
    ) -> Self {
        Self {
            registry: ThemeRegistry::built_in(),
            store,
            surface,
            source,
            settings,
            phase: ControllerPhase::BuiltInApplied,
            active_id: bootstrap.theme_id.clone(),
        }
    }

    /// Re-apply the persisted preference against the built-in catalog
    pub fn start(&mut self) {
        self.reconcile();
        self.phase = ControllerPhase::BuiltInConfirmed;
    }

    /// Sanitize an id and map it onto the current catalog
    pub fn resolve_requested(&self, requested: &str) -> &str {
        self.registry.resolve_requested(requested)
    }

    /// Apply a theme: document attribute, stylesheet link, controls, hint, and
    /// persisted preference. Returns the id that actually became active.
    pub fn apply_theme(&mut self, requested: &str) -> &str {
        let theme_id = self.render_theme(requested);
        self.persist(&theme_id);
        self.set_active(theme_id)
    }

    /// Begin the single manifest request of this page load.
    ///
    /// Returns `None` when the request was already started.
    pub fn start_catalog_fetch(&mut self) -> Option<CatalogFetch> {
        if self.phase == ControllerPhase::CatalogFetchPending || self.phase.is_terminal() {
            log::debug!("Catalog fetch already attempted in phase {:?}", self.phase);
            return None;
        }

        self.phase = ControllerPhase::CatalogFetchPending;
        let source = Arc::clone(&self.source);
        let url = self.settings.manifest_url.clone();
        let fetch: CatalogFetch = Box::pin(async move { source.fetch_manifest(&url).await });
        Some(fetch)
    }

    /// Settle the manifest request: replace the catalog on success, keep it on
    /// any failure, then re-apply whatever preference is persisted right now.
    pub fn settle_catalog_fetch(&mut self, result: Result<String, FetchError>) -> CatalogOutcome {
        if self.phase != ControllerPhase::CatalogFetchPending {
            log::warn!("Ignoring catalog result outside of a pending fetch");
            return CatalogOutcome::Skipped;
        }

        let outcome = match self.install_catalog(result) {
            Ok((themes, rejected)) => {
                self.phase = ControllerPhase::CatalogApplied;
                CatalogOutcome::Applied { themes, rejected }
            }
            Err(e) => {
                log::warn!("Theme manifest unusable, keeping current catalog: {e}");
                self.phase = ControllerPhase::CatalogFetchFailed;
                CatalogOutcome::Retained(e)
            }
        };

        // Re-read rather than reuse the bootstrap guess: a user choice made
        // while the fetch was pending is already persisted and must win.
        self.reconcile();
        outcome
    }

    /// Fetch, validate and reconcile the catalog in one step
    pub async fn load_catalog(&mut self) -> CatalogOutcome {
        match self.start_catalog_fetch() {
            Some(fetch) => {
                let result = fetch.await;
                self.settle_catalog_fetch(result)
            }
            None => CatalogOutcome::Skipped,
        }
    }

    /// Full controller sequence of one page load
    pub async fn run_page_load(&mut self) -> CatalogOutcome {
        self.start();
        self.load_catalog().await
    }

    fn install_catalog(
        &mut self,
        result: Result<String, FetchError>,
    ) -> Result<(usize, Vec<RejectedEntry>), CatalogLoadError> {
        let body = result?;
        let mut manifest = parse_manifest(&body)?;
        let rejected = std::mem::take(&mut manifest.rejected);

        for entry in &rejected {
            log::warn!(
                "Dropped manifest entry #{} ({}): {}",
                entry.index,
                entry.id.as_deref().unwrap_or("no id"),
                entry.reason
            );
        }

        let registry =
            ThemeRegistry::from_manifest(manifest).ok_or(ManifestError::NoUsableThemes {
                rejected: rejected.len(),
            })?;

        log::info!(
            "Loaded theme catalog with {} themes (fallback '{}')",
            registry.len(),
            registry.fallback_id()
        );
        let themes = registry.len();
        self.registry = registry;
        Ok((themes, rejected))
    }

    /// Show the persisted choice, or the catalog fallback when there is none.
    ///
    /// The preference is written back only when the current catalog honours
    /// it as stored; a fallback or a coerced id never replaces it.
    fn reconcile(&mut self) {
        let requested = match read_requested_theme(&self.store) {
            Ok(requested) => requested,
            Err(e) => {
                log::warn!("Theme preference unavailable: {e}");
                None
            }
        };

        let target = requested
            .as_deref()
            .unwrap_or_else(|| self.registry.fallback_id())
            .to_string();
        let theme_id = self.render_theme(&target);

        match requested {
            Some(requested) if requested == theme_id => self.persist(&theme_id),
            Some(requested) => log::debug!(
                "Preference '{requested}' not in current catalog, showing '{theme_id}'"
            ),
            None => {}
        }
        self.set_active(theme_id);
    }

    fn render_theme(&mut self, requested: &str) -> String {
        let view = ThemeView::compute(&self.registry, requested, &self.settings.script_base);
        view.render(&mut self.surface);
        view.theme_id
    }

    fn set_active(&mut self, theme_id: String) -> &str {
        if theme_id != self.active_id {
            log::info!("Theme changed: {} -> {}", self.active_id, theme_id);
        }
        self.active_id = theme_id;
        &self.active_id
    }

    fn persist(&mut self, theme_id: &str) {
        let legacy_arc = if theme_id == LEGACY_THEME_ID {
            "true"
        } else {
            "false"
        };

        if let Err(e) = self
            .store
            .set(THEME_KEY, theme_id)
            .and_then(|()| self.store.set(LEGACY_ARC_KEY, legacy_arc))
        {
            log::warn!("Failed to persist theme preference '{theme_id}': {e}");
        }
    }

    pub fn active_id(&self) -> &str {
        &self.active_id
    }

    pub fn phase(&self) -> ControllerPhase {
        self.phase
    }

    pub fn registry(&self) -> &ThemeRegistry {
        &self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn surface(&self) -> &D {
        &self.surface
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }
}
