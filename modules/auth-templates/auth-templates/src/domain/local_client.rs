//! In-process implementation of the public client trait.

use std::sync::Arc;

use async_trait::async_trait;
use auth_templates_sdk::{AuthTemplatesClient, AuthTemplatesError, Template, TemplatePatch};
use uuid::Uuid;

use crate::domain::service::TemplatesService;

/// Adapter exposing [`TemplatesService`] through [`AuthTemplatesClient`].
#[derive(Clone)]
pub struct LocalClient {
    service: Arc<TemplatesService>,
}

impl LocalClient {
    #[must_use]
    pub fn new(service: Arc<TemplatesService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl AuthTemplatesClient for LocalClient {
    async fn import_spec(&self, raw: &str) -> Result<Vec<Template>, AuthTemplatesError> {
        self.service.import_spec(raw).await.map_err(Into::into)
    }

    async fn list_templates(&self) -> Result<Vec<Template>, AuthTemplatesError> {
        Ok(self.service.list_templates())
    }

    async fn add_template(&self) -> Result<Template, AuthTemplatesError> {
        self.service.add_template().await.map_err(Into::into)
    }

    async fn update_template(
        &self,
        id: Uuid,
        patch: TemplatePatch,
    ) -> Result<Option<Template>, AuthTemplatesError> {
        self.service
            .update_template(id, patch)
            .await
            .map_err(Into::into)
    }

    async fn delete_template(&self, id: Uuid) -> Result<(), AuthTemplatesError> {
        self.service.delete_template(id).await.map_err(Into::into)
    }

    async fn clear_templates(&self) -> Result<(), AuthTemplatesError> {
        self.service.clear_templates().await.map_err(Into::into)
    }

    async fn toggle_template_role(
        &self,
        template_id: Uuid,
        role_id: &str,
    ) -> Result<Option<Template>, AuthTemplatesError> {
        self.service
            .toggle_template_role(template_id, role_id)
            .await
            .map_err(Into::into)
    }

    async fn toggle_template_user(
        &self,
        template_id: Uuid,
        user_id: &str,
    ) -> Result<Option<Template>, AuthTemplatesError> {
        self.service
            .toggle_template_user(template_id, user_id)
            .await
            .map_err(Into::into)
    }
}
