use crate::surface::ThemeSurface;
use crate::theme::registry::ThemeRegistry;
use crate::theme::types::{DEFAULT_THEME_ID, STYLESHEET_LINK_ID, THEME_ATTRIBUTE};
use reqwest::Url;
use serde::Serialize;

/// One option of the theme select control
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// One preset button; `pressed` mirrors whether its theme is active
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresetButton {
    pub theme_id: String,
    pub label: String,
    pub accent_color: Option<String>,
    pub tags: Vec<String>,
    pub pressed: bool,
}

/// Everything the document should show for one resolved theme.
///
/// Computing a view is pure; [`ThemeView::render`] is the only step that
/// touches a surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeView {
    pub theme_id: String,
    pub attribute: Option<String>,
    pub stylesheet_href: String,
    pub options: Vec<SelectOption>,
    pub presets: Vec<PresetButton>,
    pub hint: String,
}

impl ThemeView {
    pub fn compute(registry: &ThemeRegistry, requested: &str, script_base: &Url) -> Self {
        let active = registry.resolve_descriptor(requested);

        let options = registry
            .themes()
            .iter()
            .map(|theme| SelectOption {
                value: theme.id.clone(),
                label: theme.label.clone(),
                selected: theme.id == active.id,
            })
            .collect();

        let presets = registry
            .themes()
            .iter()
            .map(|theme| PresetButton {
                theme_id: theme.id.clone(),
                label: theme.label.clone(),
                accent_color: theme.accent_color.clone(),
                tags: theme.tags.clone(),
                pressed: theme.id == active.id,
            })
            .collect();

        Self {
            theme_id: active.id.clone(),
            attribute: theme_attribute(&active.id),
            stylesheet_href: resolve_href(script_base, &active.stylesheet_path),
            options,
            presets,
            hint: active.hint().to_string(),
        }
    }

    /// Write this view to a surface. The stylesheet href is only written when
    /// it differs from the current one; the controls are always regenerated.
    pub fn render<D: ThemeSurface + ?Sized>(&self, surface: &mut D) {
        surface.set_root_attribute(THEME_ATTRIBUTE, self.attribute.as_deref());

        let current_href = surface.stylesheet_href(STYLESHEET_LINK_ID);
        if current_href.as_deref() != Some(self.stylesheet_href.as_str()) {
            surface.upsert_stylesheet_link(STYLESHEET_LINK_ID, &self.stylesheet_href);
        } else {
            log::debug!("Stylesheet already at {}", self.stylesheet_href);
        }

        surface.render_theme_options(&self.options);
        surface.render_theme_presets(&self.presets);
        surface.set_theme_hint(&self.hint);
    }
}

/// Root attribute value for a theme; the default theme carries none.
pub fn theme_attribute(theme_id: &str) -> Option<String> {
    (theme_id != DEFAULT_THEME_ID).then(|| theme_id.to_string())
}

/// Resolve a catalog stylesheet path against the script's own location
pub fn resolve_href(script_base: &Url, path: &str) -> String {
    match script_base.join(path) {
        Ok(url) => url.to_string(),
        Err(e) => {
            log::warn!("Cannot resolve stylesheet '{path}' against {script_base}: {e}");
            path.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::DocumentModel;

    fn base() -> Url {
        Url::parse("https://cc.example/assets/").unwrap()
    }

    #[test]
    fn test_compute_for_built_in() {
        let registry = ThemeRegistry::built_in();
        let view = ThemeView::compute(&registry, "ARC", &base());

        assert_eq!(view.theme_id, "arc");
        assert_eq!(view.attribute.as_deref(), Some("arc"));
        assert_eq!(view.stylesheet_href, "https://cc.example/assets/themes/arc.css");
        assert_eq!(
            view.options.iter().filter(|o| o.selected).count(),
            1,
            "exactly one option is selected"
        );
        assert!(view.presets.iter().any(|p| p.theme_id == "arc" && p.pressed));
        assert!(view.hint.contains("Arc"));
    }

    #[test]
    fn test_default_theme_has_no_attribute() {
        let registry = ThemeRegistry::built_in();
        let view = ThemeView::compute(&registry, "unknown", &base());

        assert_eq!(view.theme_id, "default");
        assert_eq!(view.attribute, None);
    }

    #[test]
    fn test_href_resolves_relative_to_script_directory() {
        let nested = Url::parse("https://cc.example/projects/demo/").unwrap();
        assert_eq!(
            resolve_href(&nested, "themes/arc.css"),
            "https://cc.example/projects/demo/themes/arc.css"
        );
    }

    #[test]
    fn test_render_skips_unchanged_href() {
        let registry = ThemeRegistry::built_in();
        let view = ThemeView::compute(&registry, "arc", &base());
        let mut document = DocumentModel::new();

        view.render(&mut document);
        view.render(&mut document);

        assert_eq!(document.href_writes(), 1);
        assert_eq!(document.ui_renders(), 2);
    }
}
