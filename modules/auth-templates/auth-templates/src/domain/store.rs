//! Authoritative in-memory template catalog.
//!
//! Every mutation takes the write lock exactly once, so readers never see a
//! half-applied update or toggle. The lock is never held across an `.await`.

use std::collections::BTreeMap;

use auth_templates_sdk::{Template, TemplatePatch, TemplateRule};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::domain::error::DomainError;

/// Templates indexed by id.
#[derive(Debug, Default)]
pub struct TemplateStore {
    templates: RwLock<BTreeMap<Uuid, Template>>,
}

impl TemplateStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a template. A template already stored under the same id is
    /// replaced and returned.
    pub fn add(&self, template: Template) -> Option<Template> {
        self.templates.write().insert(template.id, template)
    }

    /// Snapshot of all templates. Ordering is not part of the contract.
    #[must_use]
    pub fn list(&self) -> Vec<Template> {
        self.templates.read().values().cloned().collect()
    }

    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<Template> {
        self.templates.read().get(&id).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.read().is_empty()
    }

    /// Whether `candidate` is used as any template's `id` or `request_id`.
    #[must_use]
    pub fn is_id_taken(&self, candidate: Uuid) -> bool {
        taken(&self.templates.read(), candidate, None)
    }

    /// Insert a template only if neither of its identifiers is in use and
    /// they differ from each other. Returns `false` and leaves the catalog
    /// untouched otherwise.
    pub fn insert_new(&self, template: Template) -> bool {
        let mut templates = self.templates.write();
        if template.id == template.request_id
            || taken(&templates, template.id, None)
            || taken(&templates, template.request_id, None)
        {
            return false;
        }
        templates.insert(template.id, template);
        true
    }

    /// Shallow-merge `patch` into the template, returning the new version,
    /// or `None` if no template has this id.
    ///
    /// A new `request_id` is checked against every other identifier under
    /// the same write lock as the merge.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the patched `request_id` equals the template's
    /// own id or is used by another template.
    pub fn update(
        &self,
        id: Uuid,
        patch: TemplatePatch,
    ) -> Result<Option<Template>, DomainError> {
        let mut templates = self.templates.write();
        if !templates.contains_key(&id) {
            return Ok(None);
        }
        if let Some(request_id) = patch.request_id
            && (request_id == id || taken(&templates, request_id, Some(id)))
        {
            return Err(DomainError::validation(
                "requestId",
                format!("{request_id} is already in use"),
            ));
        }
        let Some(template) = templates.get_mut(&id) else {
            return Ok(None);
        };
        patch.apply_to(template);
        Ok(Some(template.clone()))
    }

    /// Remove a template. Absent ids are not an error.
    pub fn delete(&self, id: Uuid) -> Option<Template> {
        self.templates.write().remove(&id)
    }

    /// Remove everything, returning how many templates were dropped.
    pub fn clear(&self) -> usize {
        let mut templates = self.templates.write();
        let dropped = templates.len();
        templates.clear();
        dropped
    }

    /// Toggle the association of `role_id` with the template.
    pub fn toggle_role(&self, template_id: Uuid, role_id: &str) -> Option<Template> {
        self.toggle(template_id, TemplateRule::role(role_id))
    }

    /// Toggle the association of `user_id` with the template.
    pub fn toggle_user(&self, template_id: Uuid, user_id: &str) -> Option<Template> {
        self.toggle(template_id, TemplateRule::user(user_id))
    }

    fn toggle(&self, template_id: Uuid, rule: TemplateRule) -> Option<Template> {
        let mut templates = self.templates.write();
        let template = templates.get_mut(&template_id)?;
        template.rules = toggled(&template.rules, rule);
        Some(template.clone())
    }
}

/// Whether a template other than `except` uses `candidate` as its `id` or
/// `request_id`.
fn taken(templates: &BTreeMap<Uuid, Template>, candidate: Uuid, except: Option<Uuid>) -> bool {
    templates
        .values()
        .any(|t| Some(t.id) != except && (t.id == candidate || t.request_id == candidate))
}

/// `rules` without `rule` if it was present, otherwise with it appended.
#[must_use]
pub fn toggled(rules: &[TemplateRule], rule: TemplateRule) -> Vec<TemplateRule> {
    if rules.contains(&rule) {
        rules.iter().filter(|r| **r != rule).cloned().collect()
    } else {
        let mut next = rules.to_vec();
        next.push(rule);
        next
    }
}
