//! Interfaces for collaborators outside the template catalog.

use async_trait::async_trait;
use auth_templates_sdk::{ProjectScope, Template};
use uuid::Uuid;

use crate::domain::error::DomainError;

/// Durable storage of templates, partitioned by project.
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// Insert or replace the template with the same id.
    async fn save(&self, scope: &ProjectScope, template: &Template) -> Result<(), DomainError>;

    /// Remove a template. Unknown ids are not an error.
    async fn remove(&self, scope: &ProjectScope, id: Uuid) -> Result<(), DomainError>;

    /// Remove every template of the project.
    async fn clear(&self, scope: &ProjectScope) -> Result<(), DomainError>;

    /// All persisted templates of the project.
    async fn load(&self, scope: &ProjectScope) -> Result<Vec<Template>, DomainError>;
}

/// Fire-and-forget notification of domain events.
pub trait EventPublisher<E>: Send + Sync + 'static {
    fn publish(&self, event: &E);
}

/// Resolves the project templates are persisted under.
pub trait ProjectContext: Send + Sync {
    /// `None` when no project is active.
    fn active_project(&self) -> Option<ProjectScope>;
}
