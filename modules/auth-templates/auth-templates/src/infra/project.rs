use auth_templates_sdk::ProjectScope;

use crate::domain::ports::ProjectContext;

/// Project scope fixed at startup.
#[derive(Debug, Clone, Default)]
pub struct StaticProjectContext {
    project: Option<ProjectScope>,
}

impl StaticProjectContext {
    #[must_use]
    pub fn new(project: Option<ProjectScope>) -> Self {
        Self { project }
    }
}

impl ProjectContext for StaticProjectContext {
    fn active_project(&self) -> Option<ProjectScope> {
        self.project.clone()
    }
}
