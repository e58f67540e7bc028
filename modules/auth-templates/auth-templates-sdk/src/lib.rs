//! Auth Templates SDK
//!
//! This crate provides the public API for the `auth_templates` module:
//!
//! - [`AuthTemplatesClient`] - Public API trait for consumers
//! - [`Template`] - Authentication probe template model
//! - [`TemplatePatch`] - Partial update applied by `update_template`
//! - [`AuthTemplatesError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use auth_templates_sdk::AuthTemplatesClient;
//!
//! let created = client.import_spec(&document).await?;
//! let toggled = client.toggle_template_role(created[0].id, "admin").await?;
//! ```

pub mod api;
pub mod error;
pub mod models;

// Re-export main types at crate root
pub use api::AuthTemplatesClient;
pub use error::AuthTemplatesError;
pub use models::{
    HttpMethod, InvalidProjectScope, ProjectScope, Template, TemplateMeta, TemplatePatch,
    TemplateRule,
};
