use auth_templates_sdk::Template;

/// Events emitted by the template catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateEvent {
    /// A template was created and persisted.
    Created(Template),
}

impl TemplateEvent {
    pub const CREATED: &'static str = "templates:created";

    /// Wire name of the event.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            TemplateEvent::Created(_) => Self::CREATED,
        }
    }

    #[must_use]
    pub fn template(&self) -> &Template {
        match self {
            TemplateEvent::Created(template) => template,
        }
    }
}
