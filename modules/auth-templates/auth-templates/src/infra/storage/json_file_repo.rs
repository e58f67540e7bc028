//! File-backed repository: one `templates.json` array per project directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use auth_templates_sdk::{ProjectScope, Template};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::ports::TemplateRepository;

const TEMPLATES_FILE: &str = "templates.json";

/// Stores `<root>/<project>/templates.json`.
///
/// Writes go through a temporary file and a rename, serialized by a single
/// async mutex so read-modify-write cycles never interleave.
///
/// Every `save` and `remove` rewrites the whole project file, so importing
/// `n` operations costs `O(n^2)` bytes of I/O. Fine for catalogs of a few
/// thousand templates; a larger catalog needs a batched `save_all`.
#[derive(Debug)]
pub struct JsonFileTemplateRepository {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileTemplateRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn file_path(&self, scope: &ProjectScope) -> PathBuf {
        self.root.join(scope.as_str()).join(TEMPLATES_FILE)
    }

    async fn read_all(path: &Path) -> Result<Vec<Template>, DomainError> {
        match tokio::fs::read(path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                DomainError::persistence(format!("corrupt {}: {e}", path.display()))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(DomainError::persistence(format!(
                "cannot read {}: {e}",
                path.display()
            ))),
        }
    }

    async fn write_all(path: &Path, templates: &[Template]) -> Result<(), DomainError> {
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await.map_err(|e| {
                DomainError::persistence(format!("cannot create {}: {e}", dir.display()))
            })?;
        }
        let bytes = serde_json::to_vec_pretty(templates)
            .map_err(|e| DomainError::persistence(format!("cannot encode templates: {e}")))?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await.map_err(|e| {
            DomainError::persistence(format!("cannot write {}: {e}", tmp.display()))
        })?;
        tokio::fs::rename(&tmp, path).await.map_err(|e| {
            DomainError::persistence(format!("cannot replace {}: {e}", path.display()))
        })?;

        debug!(path = %path.display(), count = templates.len(), "Wrote templates file");
        Ok(())
    }
}

#[async_trait]
impl TemplateRepository for JsonFileTemplateRepository {
    async fn save(&self, scope: &ProjectScope, template: &Template) -> Result<(), DomainError> {
        let _guard = self.write_lock.lock().await;
        let path = self.file_path(scope);
        let mut templates = Self::read_all(&path).await?;

        match templates.iter_mut().find(|t| t.id == template.id) {
            Some(existing) => existing.clone_from(template),
            None => templates.push(template.clone()),
        }
        Self::write_all(&path, &templates).await
    }

    async fn remove(&self, scope: &ProjectScope, id: Uuid) -> Result<(), DomainError> {
        let _guard = self.write_lock.lock().await;
        let path = self.file_path(scope);
        let mut templates = Self::read_all(&path).await?;

        let before = templates.len();
        templates.retain(|t| t.id != id);
        if templates.len() == before {
            return Ok(());
        }
        Self::write_all(&path, &templates).await
    }

    async fn clear(&self, scope: &ProjectScope) -> Result<(), DomainError> {
        let _guard = self.write_lock.lock().await;
        let path = self.file_path(scope);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::persistence(format!(
                "cannot remove {}: {e}",
                path.display()
            ))),
        }
    }

    async fn load(&self, scope: &ProjectScope) -> Result<Vec<Template>, DomainError> {
        Self::read_all(&self.file_path(scope)).await
    }
}
