//! # sitetheme engine
//!
//! Theme resolution and application for the portfolio site. The engine reconciles
//! three sources of truth into one rendered state:
//!
//! - the synchronous pre-paint [`bootstrap`] guess,
//! - the persisted preference held by a [`storage::PreferenceStore`],
//! - the remote theme manifest fetched through a [`fetch::ManifestSource`].
//!
//! The document itself is abstracted behind [`surface::ThemeSurface`] so the
//! resolution algorithm can be exercised without a browser.
//!
//! ## Modules
//!
//! - [`theme`] - catalog types, validation, manifest parsing, bootstrap and controller
//! - [`storage`] - persisted preference stores
//! - [`surface`] - document surface trait and in-memory document model
//! - [`fetch`] - manifest sources (HTTP and local file)
//! - [`motion`] - reduce-motion preference
//! - [`validation`] - shared validator trait

pub mod fetch;
pub mod motion;
pub mod storage;
pub mod surface;
pub mod theme;
pub mod validation;

pub use theme::bootstrap::{BootstrapOutcome, bootstrap};
pub use theme::controller::{ControllerPhase, ThemeController};
pub use theme::registry::ThemeRegistry;
pub use validation::Validator;
