//! Pre-paint theme resolution.
//!
//! Runs once, synchronously, before the first paint. It depends only on the
//! persisted preference and the built-in catalog, never on the network, and it
//! never fails: storage errors leave the built-in default in place.

use crate::storage::{LEGACY_ARC_KEY, PreferenceStore, StorageError, THEME_KEY};
use crate::surface::ThemeSurface;
use crate::theme::registry::ThemeRegistry;
use crate::theme::types::{
    DEFAULT_THEME_ID, LEGACY_THEME_ID, STYLESHEET_LINK_ID, THEME_ATTRIBUTE,
};
use crate::theme::validation::normalize_id;
use crate::theme::view::{resolve_href, theme_attribute};
use reqwest::Url;

/// Result of the bootstrap step, handed to the theme controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapOutcome {
    pub theme_id: String,
    pub stylesheet_href: String,
    /// False when the persisted preference could not be read
    pub storage_available: bool,
}

/// Read the theme the user explicitly asked for, applying the one-time legacy
/// migration: an absent, unusable or default preference plus a `"true"`
/// legacy flag means `arc`.
///
/// A stored `default` is a real choice and comes back as `Some`. `None` means
/// no usable preference; callers use their catalog's fallback.
pub fn read_requested_theme<S: PreferenceStore + ?Sized>(
    store: &S,
) -> Result<Option<String>, StorageError> {
    let stored = store.get(THEME_KEY)?.as_deref().and_then(normalize_id);
    if let Some(id) = stored.as_deref().filter(|id| *id != DEFAULT_THEME_ID) {
        return Ok(Some(id.to_string()));
    }

    if store.get(LEGACY_ARC_KEY)?.as_deref() == Some("true") {
        return Ok(Some(LEGACY_THEME_ID.to_string()));
    }
    Ok(stored)
}

/// Resolve the initial theme against the built-in catalog and write it to the
/// surface: root attribute plus exactly one managed stylesheet link.
pub fn bootstrap<S, D>(
    store: &S,
    built_in: &ThemeRegistry,
    surface: &mut D,
    script_base: &Url,
) -> BootstrapOutcome
where
    S: PreferenceStore + ?Sized,
    D: ThemeSurface + ?Sized,
{
    let (requested, storage_available) = match read_requested_theme(store) {
        Ok(requested) => (requested, true),
        Err(e) => {
            log::warn!("Theme preference unavailable, keeping default theme: {e}");
            (None, false)
        }
    };

    let theme = requested
        .as_deref()
        .and_then(|id| built_in.get(id))
        .unwrap_or_else(|| built_in.fallback());
    let stylesheet_href = resolve_href(script_base, &theme.stylesheet_path);

    surface.set_root_attribute(THEME_ATTRIBUTE, theme_attribute(&theme.id).as_deref());
    surface.upsert_stylesheet_link(STYLESHEET_LINK_ID, &stylesheet_href);

    log::debug!(
        "Bootstrap resolved theme '{}' (requested {:?})",
        theme.id,
        requested
    );

    BootstrapOutcome {
        theme_id: theme.id.clone(),
        stylesheet_href,
        storage_available,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::surface::DocumentModel;
    use claims::*;

    fn base() -> Url {
        Url::parse("https://cc.example/theme-init.js").unwrap()
    }

    #[test]
    fn test_requested_theme_sources() {
        assert_none!(assert_ok!(read_requested_theme(&MemoryStore::new())));
        assert_eq!(
            assert_ok!(read_requested_theme(
                &MemoryStore::new().with_value(THEME_KEY, "Midnight")
            ))
            .as_deref(),
            Some("midnight")
        );
        assert_eq!(
            assert_ok!(read_requested_theme(
                &MemoryStore::new().with_value(LEGACY_ARC_KEY, "true")
            ))
            .as_deref(),
            Some("arc")
        );
        assert_eq!(
            assert_ok!(read_requested_theme(
                &MemoryStore::new()
                    .with_value(THEME_KEY, "%%corrupt%%")
                    .with_value(LEGACY_ARC_KEY, "true")
            ))
            .as_deref(),
            Some("arc")
        );
        assert_eq!(
            assert_ok!(read_requested_theme(
                &MemoryStore::new()
                    .with_value(THEME_KEY, "midnight")
                    .with_value(LEGACY_ARC_KEY, "true")
            ))
            .as_deref(),
            Some("midnight")
        );
        assert_eq!(
            assert_ok!(read_requested_theme(
                &MemoryStore::new()
                    .with_value(THEME_KEY, "default")
                    .with_value(LEGACY_ARC_KEY, "yes")
            ))
            .as_deref(),
            Some("default")
        );
        assert_none!(assert_ok!(read_requested_theme(
            &MemoryStore::new().with_value(THEME_KEY, "%%corrupt%%")
        )));
    }

    #[test]
    fn test_bootstrap_legacy_flag_selects_arc() {
        let store = MemoryStore::new().with_value(LEGACY_ARC_KEY, "true");
        let mut document = DocumentModel::new();

        let outcome = bootstrap(&store, &ThemeRegistry::built_in(), &mut document, &base());

        assert_eq!(outcome.theme_id, "arc");
        assert_eq!(document.root_attribute(THEME_ATTRIBUTE).as_deref(), Some("arc"));
        assert_eq!(
            document.stylesheet_href(STYLESHEET_LINK_ID).as_deref(),
            Some("https://cc.example/themes/arc.css")
        );
    }

    #[test]
    fn test_bootstrap_unknown_theme_falls_back() {
        let store = MemoryStore::new().with_value(THEME_KEY, "midnight");
        let mut document = DocumentModel::new();
        document.set_root_attribute(THEME_ATTRIBUTE, Some("stale"));

        let outcome = bootstrap(&store, &ThemeRegistry::built_in(), &mut document, &base());

        assert_eq!(outcome.theme_id, "default");
        assert_none!(document.root_attribute(THEME_ATTRIBUTE));
        assert_eq!(outcome.stylesheet_href, "https://cc.example/themes/default.css");
    }

    #[test]
    fn test_bootstrap_survives_unavailable_storage() {
        let store = MemoryStore::unavailable();
        let mut document = DocumentModel::new();

        let outcome = bootstrap(&store, &ThemeRegistry::built_in(), &mut document, &base());

        assert_eq!(outcome.theme_id, "default");
        assert!(!outcome.storage_available);
        assert_none!(document.root_attribute(THEME_ATTRIBUTE));
    }

    #[test]
    fn test_repeated_bootstrap_updates_single_link() {
        let mut store = MemoryStore::new();
        let mut document = DocumentModel::new();
        let registry = ThemeRegistry::built_in();

        bootstrap(&store, &registry, &mut document, &base());
        store.set(THEME_KEY, "arc").unwrap();
        bootstrap(&store, &registry, &mut document, &base());

        assert_eq!(document.stylesheet_links().len(), 1);
        assert_eq!(
            document.stylesheet_href(STYLESHEET_LINK_ID).as_deref(),
            Some("https://cc.example/themes/arc.css")
        );
    }
}
