use std::sync::Arc;

use auth_templates_sdk::{AuthTemplatesClient, ProjectScope};
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::config::AuthTemplatesConfig;
use crate::domain::error::DomainError;
use crate::domain::events::TemplateEvent;
use crate::domain::ids::UuidV7Generator;
use crate::domain::local_client::LocalClient;
use crate::domain::ports::TemplateRepository;
use crate::domain::service::{ServiceConfig, TemplatesService};
use crate::domain::store::TemplateStore;
use crate::infra::events::BroadcastEventPublisher;
use crate::infra::project::StaticProjectContext;
use crate::infra::storage::{InMemoryTemplateRepository, JsonFileTemplateRepository};

/// Composition root of the module: one explicitly constructed store shared by
/// the service and every client handed out.
pub struct AuthTemplates {
    service: Arc<TemplatesService>,
    events: BroadcastEventPublisher,
}

impl AuthTemplates {
    /// Wire the store, repository, publisher and project scope from config.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the configured project name is not a valid
    /// scope or `id_attempts` is zero.
    pub fn from_config(cfg: &AuthTemplatesConfig) -> Result<Self, DomainError> {
        if cfg.id_attempts == 0 {
            return Err(DomainError::validation("id_attempts", "must be at least 1"));
        }
        let project = cfg
            .project
            .clone()
            .map(ProjectScope::new)
            .transpose()
            .map_err(|e| DomainError::validation("project", e.to_string()))?;

        let repo: Arc<dyn TemplateRepository> = if let Some(dir) = &cfg.storage_dir {
            debug!(storage_dir = %dir.display(), "Using JSON file template storage");
            Arc::new(JsonFileTemplateRepository::new(dir.clone()))
        } else {
            debug!("Using in-memory template storage");
            Arc::new(InMemoryTemplateRepository::new())
        };

        let events = BroadcastEventPublisher::new(cfg.event_capacity);
        let service = TemplatesService::new(
            Arc::new(TemplateStore::new()),
            repo,
            Arc::new(events.clone()),
            Arc::new(StaticProjectContext::new(project)),
            Arc::new(UuidV7Generator),
            ServiceConfig::from(cfg),
        );

        info!(project = ?cfg.project, "Auth templates module initialized");
        Ok(Self {
            service: Arc::new(service),
            events,
        })
    }

    #[must_use]
    pub fn service(&self) -> Arc<TemplatesService> {
        Arc::clone(&self.service)
    }

    #[must_use]
    pub fn client(&self) -> Arc<dyn AuthTemplatesClient> {
        Arc::new(LocalClient::new(self.service()))
    }

    /// Receive `templates:created` events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<TemplateEvent> {
        self.events.subscribe()
    }
}
