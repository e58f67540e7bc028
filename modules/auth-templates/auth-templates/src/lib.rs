//! Auth Templates Module
//!
//! Converts `OpenAPI` 3.x / Swagger 2.0 JSON documents into authentication
//! probe templates and keeps the catalog of templates, including which roles
//! and users may execute each one.
//!
//! ## Architecture
//!
//! ### Contract Layer (`auth-templates-sdk`)
//! - `AuthTemplatesClient` trait, `Template` and related models,
//!   `AuthTemplatesError`
//!
//! ### Domain Layer (`auth_templates::domain`)
//! - `spec` - permissive document decoding into operations and server info
//! - `builder` - operation to template mapping, success matcher policy
//! - `ids` - identifier generation
//! - `store` - the in-memory catalog, sole owner of template state
//! - `service` - import pipeline and catalog operations
//! - `ports` - repository, event publisher and project context interfaces
//!
//! ### Infrastructure Layer (`auth_templates::infra`)
//! - `storage` - in-memory and JSON file repositories
//! - `events` - broadcast event publisher
//! - `project` - static project scope
//!
//! ## Public API
//!
//! [`AuthTemplates`] wires everything from [`AuthTemplatesConfig`] and hands
//! out an `Arc<dyn AuthTemplatesClient>`.

pub mod config;
pub mod domain;
pub mod infra;
pub mod module;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth_templates_sdk::{
    AuthTemplatesClient, AuthTemplatesError, HttpMethod, ProjectScope, Template, TemplateMeta,
    TemplatePatch, TemplateRule,
};
pub use config::AuthTemplatesConfig;
pub use domain::events::TemplateEvent;
pub use module::AuthTemplates;
