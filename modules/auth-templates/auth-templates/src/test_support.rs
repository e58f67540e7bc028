#![allow(clippy::unwrap_used, clippy::expect_used, clippy::new_without_default)]

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use async_trait::async_trait;
use auth_templates_sdk::{ProjectScope, Template};
use parking_lot::Mutex;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::events::TemplateEvent;
use crate::domain::ids::IdGenerator;
use crate::domain::ports::{EventPublisher, TemplateRepository};
use crate::domain::service::{ServiceConfig, TemplatesService};
use crate::domain::store::TemplateStore;
use crate::infra::project::StaticProjectContext;
use crate::infra::storage::InMemoryTemplateRepository;

/// Deterministic generator yielding `Uuid::from_u128(1)`, `2`, `3`, ...
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    pub fn nth(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> Uuid {
        Uuid::from_u128(u128::from(self.next.fetch_add(1, Ordering::Relaxed)))
    }
}

/// Publisher remembering every event it was handed.
#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<TemplateEvent>>,
}

impl RecordingPublisher {
    pub fn events(&self) -> Vec<TemplateEvent> {
        self.events.lock().clone()
    }
}

impl EventPublisher<TemplateEvent> for RecordingPublisher {
    fn publish(&self, event: &TemplateEvent) {
        self.events.lock().push(event.clone());
    }
}

/// In-memory repository whose `save` fails from the n-th call on (1-based).
pub struct FailingRepository {
    inner: InMemoryTemplateRepository,
    fail_from: u32,
    saves: AtomicU32,
}

impl FailingRepository {
    pub fn failing_from(fail_from: u32) -> Self {
        Self {
            inner: InMemoryTemplateRepository::new(),
            fail_from,
            saves: AtomicU32::new(0),
        }
    }

    pub fn never_failing() -> Self {
        Self::failing_from(u32::MAX)
    }
}

#[async_trait]
impl TemplateRepository for FailingRepository {
    async fn save(&self, scope: &ProjectScope, template: &Template) -> Result<(), DomainError> {
        let n = self.saves.fetch_add(1, Ordering::SeqCst) + 1;
        if n >= self.fail_from {
            return Err(DomainError::persistence(format!("save #{n} rejected")));
        }
        self.inner.save(scope, template).await
    }

    async fn remove(&self, scope: &ProjectScope, id: Uuid) -> Result<(), DomainError> {
        self.inner.remove(scope, id).await
    }

    async fn clear(&self, scope: &ProjectScope) -> Result<(), DomainError> {
        self.inner.clear(scope).await
    }

    async fn load(&self, scope: &ProjectScope) -> Result<Vec<Template>, DomainError> {
        self.inner.load(scope).await
    }
}

pub fn project() -> ProjectScope {
    ProjectScope::new("test-project").unwrap()
}

/// Everything a service test needs to inspect after the fact.
pub struct Harness {
    pub service: TemplatesService,
    pub store: Arc<TemplateStore>,
    pub repo: Arc<FailingRepository>,
    pub events: Arc<RecordingPublisher>,
}

pub fn harness(repo: FailingRepository, project: Option<ProjectScope>) -> Harness {
    harness_with_config(repo, project, ServiceConfig::default())
}

pub fn harness_with_config(
    repo: FailingRepository,
    project: Option<ProjectScope>,
    config: ServiceConfig,
) -> Harness {
    let store = Arc::new(TemplateStore::new());
    let repo = Arc::new(repo);
    let events = Arc::new(RecordingPublisher::default());
    let service = TemplatesService::new(
        Arc::clone(&store),
        repo.clone(),
        events.clone(),
        Arc::new(StaticProjectContext::new(project)),
        Arc::new(SequentialIds::new()),
        config,
    );
    Harness {
        service,
        store,
        repo,
        events,
    }
}
