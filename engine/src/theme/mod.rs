//! # Theme System Module
//!
//! Theme catalog handling for the site: the built-in catalog, manifest parsing and
//! validation, the pre-paint bootstrap resolver and the theme controller that owns
//! every later theme change.
//!
//! ## Architecture
//!
//! - **[`ThemeRegistry`]** - owned catalog of validated themes plus the fallback id
//! - **[`manifest`]** - parses a remote manifest into validated descriptors
//! - **[`bootstrap`]** - synchronous first-paint resolution from persisted state
//! - **[`ThemeController`]** - fetch, reconcile, apply, persist
//! - **[`ThemeView`]** - pure computation of what the document should show
//!
//! ## Page Load Sequence
//!
//! ```text
//! Uninitialized
//!   -> BuiltInApplied       (bootstrap, before paint)
//!   -> BuiltInConfirmed     (controller re-applies the built-in catalog)
//!   -> CatalogFetchPending  (single manifest request)
//!   -> CatalogApplied | CatalogFetchFailed
//! ```
//!
//! ## Error Handling and Fallbacks
//!
//! - **Storage unavailable** - built-in default theme is kept
//! - **Manifest failures** - the current catalog is retained unchanged
//! - **Invalid entries** - dropped individually, the rest are used
//! - **Unknown ids** - coerced to the catalog's fallback id

pub mod bootstrap;
pub mod controller;
pub mod manifest;
pub mod registry;
pub mod types;
pub mod validation;
pub mod view;

pub use controller::ThemeController;
pub use registry::ThemeRegistry;
pub use types::ThemeDescriptor;
pub use view::ThemeView;
