use std::sync::Arc;

use auth_templates_sdk::{ProjectScope, Template, TemplatePatch};
use regex::Regex;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::config::AuthTemplatesConfig;
use crate::domain::builder;
use crate::domain::error::DomainError;
use crate::domain::events::TemplateEvent;
use crate::domain::ids::{self, IdGenerator, TemplateIds};
use crate::domain::ports::{EventPublisher, ProjectContext, TemplateRepository};
use crate::domain::spec;
use crate::domain::store::TemplateStore;

// ============================================================================
// Service Configuration
// ============================================================================

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub max_document_bytes: usize,
    pub id_attempts: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        let cfg = AuthTemplatesConfig::default();
        Self {
            max_document_bytes: cfg.max_document_bytes,
            id_attempts: cfg.id_attempts,
        }
    }
}

impl From<&AuthTemplatesConfig> for ServiceConfig {
    fn from(cfg: &AuthTemplatesConfig) -> Self {
        Self {
            max_document_bytes: cfg.max_document_bytes,
            id_attempts: cfg.id_attempts,
        }
    }
}

// ============================================================================
// Service Implementation
// ============================================================================

/// Template catalog service.
///
/// Owns the import pipeline (decode, build, store, persist, announce) and
/// is the only mutator of the shared [`TemplateStore`]. Store mutations are
/// synchronous; the only suspension points are repository calls, awaited
/// one at a time so ids are assigned in declaration order.
pub struct TemplatesService {
    store: Arc<TemplateStore>,
    repo: Arc<dyn TemplateRepository>,
    events: Arc<dyn EventPublisher<TemplateEvent>>,
    project: Arc<dyn ProjectContext>,
    ids: Arc<dyn IdGenerator>,
    config: ServiceConfig,
}

impl TemplatesService {
    pub fn new(
        store: Arc<TemplateStore>,
        repo: Arc<dyn TemplateRepository>,
        events: Arc<dyn EventPublisher<TemplateEvent>>,
        project: Arc<dyn ProjectContext>,
        ids: Arc<dyn IdGenerator>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            store,
            repo,
            events,
            project,
            ids,
            config,
        }
    }

    /// Import every operation of an `OpenAPI` / Swagger JSON document.
    ///
    /// Not transactional: if persisting the k-th template fails, the error
    /// is returned and the remaining operations are skipped, while templates
    /// 1..=k stay in the store.
    ///
    /// # Errors
    ///
    /// - `Parse` / `Spec` before any template is created
    /// - `Persistence` from the repository, aborting the remaining operations
    /// - `Internal` if no unused id could be generated
    #[instrument(skip(self, raw), fields(size = raw.len()))]
    pub async fn import_spec(&self, raw: &str) -> Result<Vec<Template>, DomainError> {
        if raw.len() > self.config.max_document_bytes {
            return Err(DomainError::spec(format!(
                "document size {} exceeds maximum of {} bytes",
                raw.len(),
                self.config.max_document_bytes
            )));
        }

        let document = spec::parse(raw)?;
        info!(
            dialect = ?document.dialect,
            operations = document.operations.len(),
            "Importing API document"
        );

        let mut created = Vec::with_capacity(document.operations.len());
        for op in &document.operations {
            let template = builder::build(op, &document.server, self.allocate_ids()?);
            debug!(
                template_id = %template.id,
                method = %template.meta.method,
                path = %template.meta.path,
                "Built template"
            );

            self.store.add(template.clone());
            self.announce_created(&template).await?;
            created.push(template);
        }

        info!(count = created.len(), "Imported templates");
        Ok(created)
    }

    #[must_use]
    pub fn list_templates(&self) -> Vec<Template> {
        self.store.list()
    }

    #[must_use]
    pub fn get_template(&self, id: Uuid) -> Option<Template> {
        self.store.get(id)
    }

    /// Create a blank template.
    ///
    /// # Errors
    ///
    /// - `Persistence` if the template could not be stored; it stays in the store
    /// - `Internal` if no unused id could be generated
    #[instrument(skip(self))]
    pub async fn add_template(&self) -> Result<Template, DomainError> {
        let template = builder::blank(self.allocate_ids()?);
        self.store.add(template.clone());
        self.announce_created(&template).await?;
        info!(template_id = %template.id, "Added template");
        Ok(template)
    }

    /// Merge `patch` into a template. `Ok(None)` when the id is unknown.
    ///
    /// # Errors
    ///
    /// - `Validation` if the patch would break a template invariant
    /// - `Persistence` if the updated template could not be stored
    #[instrument(skip(self, patch), fields(template_id = %id))]
    pub async fn update_template(
        &self,
        id: Uuid,
        patch: TemplatePatch,
    ) -> Result<Option<Template>, DomainError> {
        let Some(current) = self.store.get(id) else {
            debug!("Template not found");
            return Ok(None);
        };
        if patch.is_empty() {
            debug!("Empty patch, nothing to update");
            return Ok(Some(current));
        }
        validate_patch(&patch)?;

        let Some(updated) = self.store.update(id, patch)? else {
            return Ok(None);
        };
        self.persist(&updated).await?;
        Ok(Some(updated))
    }

    /// Delete a template. Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// - `Persistence` if the backend removal failed
    #[instrument(skip(self), fields(template_id = %id))]
    pub async fn delete_template(&self, id: Uuid) -> Result<(), DomainError> {
        if self.store.delete(id).is_none() {
            debug!("Template already absent");
        }
        let Some(project) = self.project.active_project() else {
            return Ok(());
        };
        self.repo.remove(&project, id).await.inspect_err(|e| {
            error!(error = %e, "Failed to remove persisted template");
        })
    }

    /// Remove every template.
    ///
    /// # Errors
    ///
    /// - `Persistence` if the backend could not be cleared
    #[instrument(skip(self))]
    pub async fn clear_templates(&self) -> Result<(), DomainError> {
        let dropped = self.store.clear();
        info!(dropped, "Cleared templates");
        let Some(project) = self.project.active_project() else {
            return Ok(());
        };
        self.repo.clear(&project).await.inspect_err(|e| {
            error!(error = %e, "Failed to clear persisted templates");
        })
    }

    /// Toggle a role association. `Ok(None)` when the template is unknown.
    ///
    /// # Errors
    ///
    /// - `Persistence` if the updated template could not be stored
    #[instrument(skip(self), fields(template_id = %template_id))]
    pub async fn toggle_template_role(
        &self,
        template_id: Uuid,
        role_id: &str,
    ) -> Result<Option<Template>, DomainError> {
        let Some(updated) = self.store.toggle_role(template_id, role_id) else {
            debug!("Template not found");
            return Ok(None);
        };
        self.persist(&updated).await?;
        Ok(Some(updated))
    }

    /// Toggle a user association. `Ok(None)` when the template is unknown.
    ///
    /// # Errors
    ///
    /// - `Persistence` if the updated template could not be stored
    #[instrument(skip(self), fields(template_id = %template_id))]
    pub async fn toggle_template_user(
        &self,
        template_id: Uuid,
        user_id: &str,
    ) -> Result<Option<Template>, DomainError> {
        let Some(updated) = self.store.toggle_user(template_id, user_id) else {
            debug!("Template not found");
            return Ok(None);
        };
        self.persist(&updated).await?;
        Ok(Some(updated))
    }

    /// Load the active project's persisted templates into the store,
    /// returning how many were accepted.
    ///
    /// Records that break a template invariant (bad matcher, port `0`,
    /// `requestId == id`) or whose identifiers collide with an already
    /// loaded template are skipped with a warning.
    ///
    /// # Errors
    ///
    /// - `Persistence` if the backend could not be read
    #[instrument(skip(self))]
    pub async fn hydrate(&self) -> Result<usize, DomainError> {
        let Some(project) = self.project.active_project() else {
            debug!("No active project, nothing to load");
            return Ok(0);
        };
        let templates = self.repo.load(&project).await?;
        let total = templates.len();

        let mut loaded = 0;
        for template in templates {
            let template_id = template.id;
            if let Err(e) = validate_template(&template) {
                warn!(%template_id, error = %e, "Skipping invalid persisted template");
                continue;
            }
            if !self.store.insert_new(template) {
                warn!(
                    %template_id,
                    "Skipping persisted template with identifiers already in use"
                );
                continue;
            }
            loaded += 1;
        }

        info!(
            project = %project,
            loaded,
            skipped = total - loaded,
            "Loaded persisted templates"
        );
        Ok(loaded)
    }

    fn allocate_ids(&self) -> Result<TemplateIds, DomainError> {
        ids::allocate(self.ids.as_ref(), &self.store, self.config.id_attempts)
    }

    /// Persist a new template and, once stored, publish `templates:created`.
    async fn announce_created(&self, template: &Template) -> Result<(), DomainError> {
        let Some(project) = self.project.active_project() else {
            warn!(template_id = %template.id, "No active project, template kept in memory only");
            return Ok(());
        };
        self.save(&project, template).await?;
        self.events.publish(&TemplateEvent::Created(template.clone()));
        Ok(())
    }

    async fn persist(&self, template: &Template) -> Result<(), DomainError> {
        match self.project.active_project() {
            Some(project) => self.save(&project, template).await,
            None => {
                debug!(template_id = %template.id, "No active project, skipping persistence");
                Ok(())
            }
        }
    }

    async fn save(&self, project: &ProjectScope, template: &Template) -> Result<(), DomainError> {
        self.repo.save(project, template).await.inspect_err(|e| {
            error!(
                project = %project,
                template_id = %template.id,
                error = %e,
                "Failed to persist template"
            );
        })
    }
}

/// Checks applied to the fields a patch sets. `requestId` uniqueness is
/// checked by the store under its write lock.
fn validate_patch(patch: &TemplatePatch) -> Result<(), DomainError> {
    if let Some(pattern) = &patch.auth_success_regex {
        check_success_regex(pattern)?;
    }
    if let Some(meta) = &patch.meta {
        check_port(meta.port)?;
    }
    Ok(())
}

/// Invariants every stored template must satisfy on its own.
fn validate_template(template: &Template) -> Result<(), DomainError> {
    check_success_regex(&template.auth_success_regex)?;
    check_port(template.meta.port)?;
    if template.request_id == template.id {
        return Err(DomainError::validation(
            "requestId",
            "must differ from the template id",
        ));
    }
    Ok(())
}

fn check_success_regex(pattern: &str) -> Result<(), DomainError> {
    if pattern.is_empty() {
        return Err(DomainError::validation(
            "authSuccessRegex",
            "must not be empty",
        ));
    }
    Regex::new(pattern)
        .map(|_| ())
        .map_err(|e| DomainError::validation("authSuccessRegex", e.to_string()))
}

fn check_port(port: u16) -> Result<(), DomainError> {
    if port == 0 {
        return Err(DomainError::validation("meta.port", "must be in 1..=65535"));
    }
    Ok(())
}
