use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use auth_templates_sdk::{ProjectScope, Template};
use parking_lot::Mutex;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::ports::TemplateRepository;

/// Process-local repository, one map per project.
#[derive(Debug, Default)]
pub struct InMemoryTemplateRepository {
    projects: Mutex<HashMap<ProjectScope, BTreeMap<Uuid, Template>>>,
}

impl InMemoryTemplateRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TemplateRepository for InMemoryTemplateRepository {
    async fn save(&self, scope: &ProjectScope, template: &Template) -> Result<(), DomainError> {
        self.projects
            .lock()
            .entry(scope.clone())
            .or_default()
            .insert(template.id, template.clone());
        Ok(())
    }

    async fn remove(&self, scope: &ProjectScope, id: Uuid) -> Result<(), DomainError> {
        if let Some(templates) = self.projects.lock().get_mut(scope) {
            templates.remove(&id);
        }
        Ok(())
    }

    async fn clear(&self, scope: &ProjectScope) -> Result<(), DomainError> {
        self.projects.lock().remove(scope);
        Ok(())
    }

    async fn load(&self, scope: &ProjectScope) -> Result<Vec<Template>, DomainError> {
        Ok(self
            .projects
            .lock()
            .get(scope)
            .map(|templates| templates.values().cloned().collect())
            .unwrap_or_default())
    }
}
