use crate::theme::manifest::ValidatedManifest;
use crate::theme::types::{CatalogSource, DEFAULT_THEME_ID, ThemeDescriptor, built_in_themes};
use crate::theme::validation::sanitize_id;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Owned catalog of validated themes.
///
/// A registry is never empty and its fallback id always names one of its
/// entries. Ids are unique; when the input repeats an id the first entry wins.
#[derive(Debug, Clone)]
pub struct ThemeRegistry {
    themes: Vec<ThemeDescriptor>,
    index: HashMap<String, usize>,
    fallback_id: String,
    source: CatalogSource,
    generated_at: Option<DateTime<Utc>>,
    version: Option<u64>,
}

impl ThemeRegistry {
    /// The hard-coded two-entry catalog used until a manifest is loaded
    pub fn built_in() -> Self {
        Self::build(built_in_themes(), None, CatalogSource::BuiltIn)
            .expect("built-in catalog is never empty")
    }

    /// Build a registry from arbitrary descriptors. Returns `None` when no
    /// descriptors are given.
    ///
    /// Fallback precedence: `declared_default` when it names an entry, then an
    /// entry literally named `default`, then the first entry.
    pub fn new(themes: Vec<ThemeDescriptor>, declared_default: Option<&str>) -> Option<Self> {
        Self::build(themes, declared_default, CatalogSource::Manifest)
    }

    /// Build a registry from a validated manifest, keeping its metadata
    pub fn from_manifest(manifest: ValidatedManifest) -> Option<Self> {
        let ValidatedManifest {
            themes,
            default_theme,
            generated_at,
            version,
            ..
        } = manifest;

        let mut registry = Self::build(themes, default_theme.as_deref(), CatalogSource::Manifest)?;
        registry.generated_at = generated_at;
        registry.version = version;
        Some(registry)
    }

    fn build(
        themes: Vec<ThemeDescriptor>,
        declared_default: Option<&str>,
        source: CatalogSource,
    ) -> Option<Self> {
        let mut unique = Vec::with_capacity(themes.len());
        let mut index = HashMap::with_capacity(themes.len());

        for theme in themes {
            if index.contains_key(&theme.id) {
                log::debug!("Ignoring duplicate theme id '{}'", theme.id);
                continue;
            }
            index.insert(theme.id.clone(), unique.len());
            unique.push(theme);
        }

        let first = unique.first()?.id.clone();
        let fallback_id = declared_default
            .filter(|id| index.contains_key(*id))
            .map(str::to_string)
            .or_else(|| {
                index
                    .contains_key(DEFAULT_THEME_ID)
                    .then(|| DEFAULT_THEME_ID.to_string())
            })
            .unwrap_or(first);

        Some(Self {
            themes: unique,
            index,
            fallback_id,
            source,
            generated_at: None,
            version: None,
        })
    }

    /// Sanitize a requested id and map it onto a member of this catalog.
    pub fn resolve_requested(&self, requested: &str) -> &str {
        let id = sanitize_id(requested);
        match self.index.get(&id) {
            Some(&position) => &self.themes[position].id,
            None => &self.fallback_id,
        }
    }

    pub fn get(&self, id: &str) -> Option<&ThemeDescriptor> {
        self.index.get(id).map(|&position| &self.themes[position])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn themes(&self) -> &[ThemeDescriptor] {
        &self.themes
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.themes.iter().map(|theme| theme.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }

    pub fn fallback_id(&self) -> &str {
        &self.fallback_id
    }

    pub fn fallback(&self) -> &ThemeDescriptor {
        // fallback_id is always indexed
        &self.themes[self.index[&self.fallback_id]]
    }

    /// Descriptor for a requested id after resolution
    pub fn resolve_descriptor(&self, requested: &str) -> &ThemeDescriptor {
        self.get(self.resolve_requested(requested))
            .unwrap_or_else(|| self.fallback())
    }

    pub fn source(&self) -> CatalogSource {
        self.source
    }

    pub fn generated_at(&self) -> Option<DateTime<Utc>> {
        self.generated_at
    }

    pub fn version(&self) -> Option<u64> {
        self.version
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::built_in()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::*;

    fn theme(id: &str) -> ThemeDescriptor {
        ThemeDescriptor::new(id, &id.to_uppercase(), &format!("themes/{id}.css"))
    }

    #[test]
    fn test_built_in_registry() {
        let registry = ThemeRegistry::built_in();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.fallback_id(), "default");
        assert_eq!(registry.source(), CatalogSource::BuiltIn);
        assert!(registry.contains("arc"));
        assert_none!(registry.generated_at());
    }

    #[test]
    fn test_resolve_requested_coerces_unknown_ids() {
        let registry = ThemeRegistry::built_in();

        assert_eq!(registry.resolve_requested("arc"), "arc");
        assert_eq!(registry.resolve_requested("ARC"), "arc");
        assert_eq!(registry.resolve_requested("midnight"), "default");
        assert_eq!(registry.resolve_requested("not valid!"), "default");
        assert_eq!(registry.resolve_requested(""), "default");
    }

    #[test]
    fn test_empty_input_builds_nothing() {
        assert_none!(ThemeRegistry::new(Vec::new(), Some("default")));
    }

    #[test]
    fn test_duplicate_ids_first_wins() {
        let mut second = theme("arc");
        second.label = "Second Arc".to_string();
        let registry = assert_some!(ThemeRegistry::new(
            vec![theme("arc"), second, theme("default")],
            None
        ));

        assert_eq!(registry.len(), 2);
        assert_eq!(assert_some!(registry.get("arc")).label, "ARC");
    }

    #[test]
    fn test_fallback_precedence() {
        let declared = assert_some!(ThemeRegistry::new(
            vec![theme("midnight"), theme("default")],
            Some("midnight")
        ));
        assert_eq!(declared.fallback_id(), "midnight");

        let unknown_declared = assert_some!(ThemeRegistry::new(
            vec![theme("midnight"), theme("default")],
            Some("solar")
        ));
        assert_eq!(unknown_declared.fallback_id(), "default");

        let first = assert_some!(ThemeRegistry::new(
            vec![theme("midnight"), theme("solar")],
            None
        ));
        assert_eq!(first.fallback_id(), "midnight");
        assert_eq!(first.resolve_requested("default"), "midnight");
    }
}
