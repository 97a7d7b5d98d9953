//! Reduce-motion preference.
//!
//! Persisted as `"true"`/`"false"` under [`REDUCE_MOTION_KEY`]. A stored
//! `"true"` sets the root `reduce-motion` attribute at load; the toggle writes
//! the attribute explicitly either way and mirrors it on the toggle button.

use crate::storage::{PreferenceStore, REDUCE_MOTION_KEY};
use crate::surface::ThemeSurface;

pub const REDUCE_MOTION_ATTRIBUTE: &str = "reduce-motion";
pub const MOTION_TOGGLE_ID: &str = "motionToggle";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MotionPreference {
    reduced: bool,
}

impl MotionPreference {
    /// Read the stored preference and reflect it on the surface
    pub fn load<S, D>(store: &S, surface: &mut D) -> Self
    where
        S: PreferenceStore + ?Sized,
        D: ThemeSurface + ?Sized,
    {
        let reduced = match store.get(REDUCE_MOTION_KEY) {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                log::warn!("Motion preference unavailable: {e}");
                false
            }
        };

        if reduced {
            surface.set_root_attribute(REDUCE_MOTION_ATTRIBUTE, Some("true"));
        }
        surface.set_toggle_pressed(MOTION_TOGGLE_ID, reduced);

        Self { reduced }
    }

    /// Flip the preference, persist it, and update the surface. Returns the new state.
    pub fn toggle<S, D>(&mut self, store: &mut S, surface: &mut D) -> bool
    where
        S: PreferenceStore + ?Sized,
        D: ThemeSurface + ?Sized,
    {
        self.reduced = !self.reduced;
        let value = if self.reduced { "true" } else { "false" };

        surface.set_root_attribute(REDUCE_MOTION_ATTRIBUTE, Some(value));
        if let Err(e) = store.set(REDUCE_MOTION_KEY, value) {
            log::warn!("Failed to persist motion preference: {e}");
        }
        surface.set_toggle_pressed(MOTION_TOGGLE_ID, self.reduced);

        self.reduced
    }

    pub fn is_reduced(&self) -> bool {
        self.reduced
    }
}
