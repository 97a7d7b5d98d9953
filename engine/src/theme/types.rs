use serde::Serialize;

/// Sentinel id used when a requested id is unusable; also the id whose styling
/// needs no root attribute.
pub const DEFAULT_THEME_ID: &str = "default";

/// Theme selected for users who only carry the pre-catalog boolean preference.
pub const LEGACY_THEME_ID: &str = "arc";

/// Every catalog stylesheet must live under this prefix.
pub const TRUSTED_STYLESHEET_PREFIX: &str = "themes/";
pub const STYLESHEET_EXTENSION: &str = ".css";

/// Element id of the single stylesheet link the theme system manages.
pub const STYLESHEET_LINK_ID: &str = "theme-stylesheet";

/// Root data attribute read by CSS to select non-default theme rules.
pub const THEME_ATTRIBUTE: &str = "theme";

pub const MAX_TAGS: usize = 3;
pub const MAX_TAG_CHARS: usize = 24;
pub const MAX_LABEL_CHARS: usize = 64;
pub const MAX_DESCRIPTION_CHARS: usize = 240;

/// One validated entry of the theme catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeDescriptor {
    pub id: String,
    pub label: String,
    pub stylesheet_path: String,
    pub description: Option<String>,
    pub accent_color: Option<String>,
    pub tags: Vec<String>,
}

impl ThemeDescriptor {
    pub fn new(id: &str, label: &str, stylesheet_path: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            stylesheet_path: stylesheet_path.to_string(),
            description: None,
            accent_color: None,
            tags: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_accent(mut self, accent: &str) -> Self {
        self.accent_color = Some(accent.to_string());
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Text shown in the hint element while this theme is active
    pub fn hint(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.label)
    }
}

/// Where the registry's entries came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CatalogSource {
    BuiltIn,
    Manifest,
}

/// The hard-coded catalog available before any manifest is fetched.
pub fn built_in_themes() -> Vec<ThemeDescriptor> {
    vec![
        ThemeDescriptor::new(DEFAULT_THEME_ID, "Default", "themes/default.css")
            .with_description("Dark glass panels with warm orange highlights.")
            .with_accent("#ff8c00"),
        ThemeDescriptor::new(LEGACY_THEME_ID, "Arc", "themes/arc.css")
            .with_description("Soft gradients and rounded panels inspired by the Arc browser.")
            .with_accent("#7c5cff"),
    ]
}
