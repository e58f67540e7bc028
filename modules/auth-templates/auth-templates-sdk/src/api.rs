//! Public API trait for the auth templates module.
//!
//! Consumers (CLI, UI bridges, other modules) drive the template catalog
//! through this trait. The module implements it with a local client that
//! delegates to the domain service.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AuthTemplatesError;
use crate::models::{Template, TemplatePatch};

/// Public API trait for the auth templates catalog.
///
/// Operations addressing a single template return `Ok(None)` when the id is
/// unknown; that outcome is never reported as an error.
#[async_trait]
pub trait AuthTemplatesClient: Send + Sync {
    /// Import every operation of an `OpenAPI` 3.x / Swagger 2.0 JSON document.
    ///
    /// # Errors
    ///
    /// - `Parse` if the document is not valid JSON
    /// - `Spec` if the document has no `paths` object
    /// - `Persistence` if storing one of the templates failed; templates
    ///   created before the failure stay in the catalog
    async fn import_spec(&self, raw: &str) -> Result<Vec<Template>, AuthTemplatesError>;

    /// List all templates, in no particular order.
    ///
    /// # Errors
    ///
    /// Never fails for the in-process implementation.
    async fn list_templates(&self) -> Result<Vec<Template>, AuthTemplatesError>;

    /// Create a blank template.
    ///
    /// # Errors
    ///
    /// - `Persistence` if the template could not be stored
    async fn add_template(&self) -> Result<Template, AuthTemplatesError>;

    /// Merge `patch` into the template with the given id.
    ///
    /// # Errors
    ///
    /// - `Validation` if the patch breaks a template invariant
    /// - `Persistence` if the updated template could not be stored
    async fn update_template(
        &self,
        id: Uuid,
        patch: TemplatePatch,
    ) -> Result<Option<Template>, AuthTemplatesError>;

    /// Delete a template. Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// - `Persistence` if the backend removal failed
    async fn delete_template(&self, id: Uuid) -> Result<(), AuthTemplatesError>;

    /// Remove every template.
    ///
    /// # Errors
    ///
    /// - `Persistence` if the backend could not be cleared
    async fn clear_templates(&self) -> Result<(), AuthTemplatesError>;

    /// Add the role association if absent, remove it otherwise.
    ///
    /// # Errors
    ///
    /// - `Persistence` if the updated template could not be stored
    async fn toggle_template_role(
        &self,
        template_id: Uuid,
        role_id: &str,
    ) -> Result<Option<Template>, AuthTemplatesError>;

    /// Add the user association if absent, remove it otherwise.
    ///
    /// # Errors
    ///
    /// - `Persistence` if the updated template could not be stored
    async fn toggle_template_user(
        &self,
        template_id: Uuid,
        user_id: &str,
    ) -> Result<Option<Template>, AuthTemplatesError>;
}
