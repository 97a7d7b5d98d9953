//! Document surface.
//!
//! [`ThemeSurface`] is the thin effectful side of the theme system: root data
//! attributes, the managed stylesheet link, the theme select control, preset
//! buttons, the hint text and toggle buttons. [`DocumentModel`] is an in-memory
//! implementation used by the CLI and by tests.

use crate::theme::view::{PresetButton, SelectOption};
use serde::Serialize;
use std::collections::BTreeMap;

pub trait ThemeSurface {
    /// Set (`Some`) or remove (`None`) a data attribute on the document root
    fn set_root_attribute(&mut self, name: &str, value: Option<&str>);

    fn root_attribute(&self, name: &str) -> Option<String>;

    /// Current href of the stylesheet link with the given element id
    fn stylesheet_href(&self, element_id: &str) -> Option<String>;

    /// Create the stylesheet link with the given element id, or update its href
    fn upsert_stylesheet_link(&mut self, element_id: &str, href: &str);

    fn render_theme_options(&mut self, options: &[SelectOption]);

    fn render_theme_presets(&mut self, presets: &[PresetButton]);

    fn set_theme_hint(&mut self, hint: &str);

    fn set_toggle_pressed(&mut self, control_id: &str, pressed: bool);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StylesheetLink {
    pub element_id: String,
    pub href: String,
}

/// In-memory document state
#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentModel {
    root_attributes: BTreeMap<String, String>,
    stylesheet_links: Vec<StylesheetLink>,
    theme_options: Vec<SelectOption>,
    theme_presets: Vec<PresetButton>,
    theme_hint: Option<String>,
    toggles: BTreeMap<String, bool>,
    #[serde(skip)]
    href_writes: usize,
    #[serde(skip)]
    ui_renders: usize,
}

impl DocumentModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stylesheet_links(&self) -> &[StylesheetLink] {
        &self.stylesheet_links
    }

    pub fn theme_options(&self) -> &[SelectOption] {
        &self.theme_options
    }

    /// Values offered by the theme select control, in order
    pub fn theme_option_values(&self) -> Vec<&str> {
        self.theme_options
            .iter()
            .map(|option| option.value.as_str())
            .collect()
    }

    pub fn selected_theme_option(&self) -> Option<&str> {
        self.theme_options
            .iter()
            .find(|option| option.selected)
            .map(|option| option.value.as_str())
    }

    pub fn theme_presets(&self) -> &[PresetButton] {
        &self.theme_presets
    }

    pub fn pressed_presets(&self) -> Vec<&str> {
        self.theme_presets
            .iter()
            .filter(|preset| preset.pressed)
            .map(|preset| preset.theme_id.as_str())
            .collect()
    }

    pub fn theme_hint(&self) -> Option<&str> {
        self.theme_hint.as_deref()
    }

    pub fn toggle_pressed(&self, control_id: &str) -> Option<bool> {
        self.toggles.get(control_id).copied()
    }

    /// Number of times any stylesheet href was written
    pub fn href_writes(&self) -> usize {
        self.href_writes
    }

    /// Number of times the theme select control was regenerated
    pub fn ui_renders(&self) -> usize {
        self.ui_renders
    }
}

impl ThemeSurface for DocumentModel {
    fn set_root_attribute(&mut self, name: &str, value: Option<&str>) {
        match value {
            Some(value) => {
                self.root_attributes
                    .insert(name.to_string(), value.to_string());
            }
            None => {
                self.root_attributes.remove(name);
            }
        }
    }

    fn root_attribute(&self, name: &str) -> Option<String> {
        self.root_attributes.get(name).cloned()
    }

    fn stylesheet_href(&self, element_id: &str) -> Option<String> {
        self.stylesheet_links
            .iter()
            .find(|link| link.element_id == element_id)
            .map(|link| link.href.clone())
    }

    fn upsert_stylesheet_link(&mut self, element_id: &str, href: &str) {
        self.href_writes += 1;
        match self
            .stylesheet_links
            .iter_mut()
            .find(|link| link.element_id == element_id)
        {
            Some(link) => link.href = href.to_string(),
            None => self.stylesheet_links.push(StylesheetLink {
                element_id: element_id.to_string(),
                href: href.to_string(),
            }),
        }
    }

    fn render_theme_options(&mut self, options: &[SelectOption]) {
        self.ui_renders += 1;
        self.theme_options = options.to_vec();
    }

    fn render_theme_presets(&mut self, presets: &[PresetButton]) {
        self.theme_presets = presets.to_vec();
    }

    fn set_theme_hint(&mut self, hint: &str) {
        self.theme_hint = Some(hint.to_string());
    }

    fn set_toggle_pressed(&mut self, control_id: &str, pressed: bool) {
        self.toggles.insert(control_id.to_string(), pressed);
    }
}
