//! Identifier generation for templates and their request definitions.

use tracing::debug;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::store::TemplateStore;

/// Source of fresh identifiers.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> Uuid;
}

/// Time-ordered UUID v7 generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidV7Generator;

impl IdGenerator for UuidV7Generator {
    fn next_id(&self) -> Uuid {
        Uuid::now_v7()
    }
}

/// The pair of identifiers assigned to a new template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateIds {
    pub id: Uuid,
    pub request_id: Uuid,
}

/// Draw an `id` / `request_id` pair that is unused in `store` and distinct.
///
/// A candidate already used as any template's `id` or `request_id` is
/// redrawn, at most `attempts` times per identifier.
///
/// # Errors
///
/// Returns [`DomainError::Internal`] when no unused identifier was produced
/// within `attempts` draws.
pub fn allocate(
    generator: &dyn IdGenerator,
    store: &TemplateStore,
    attempts: u32,
) -> Result<TemplateIds, DomainError> {
    let id = draw(generator, store, attempts, None)?;
    let request_id = draw(generator, store, attempts, Some(id))?;
    Ok(TemplateIds { id, request_id })
}

fn draw(
    generator: &dyn IdGenerator,
    store: &TemplateStore,
    attempts: u32,
    sibling: Option<Uuid>,
) -> Result<Uuid, DomainError> {
    for _ in 0..attempts {
        let candidate = generator.next_id();
        if sibling != Some(candidate) && !store.is_id_taken(candidate) {
            return Ok(candidate);
        }
        debug!(%candidate, "Generated id already in use, drawing again");
    }
    Err(DomainError::internal(format!(
        "no unused id after {attempts} attempts"
    )))
}
