use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for the `auth_templates` module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct AuthTemplatesConfig {
    /// Largest accepted import document, in bytes.
    pub max_document_bytes: usize,
    /// How many times a colliding generated id is redrawn before giving up.
    /// Must be at least 1.
    pub id_attempts: u32,
    /// Active project scope. Without one, templates are kept in memory only.
    pub project: Option<String>,
    /// Root directory of the JSON file store. In-memory storage when unset.
    pub storage_dir: Option<PathBuf>,
    /// Buffer size of the `templates:created` broadcast channel.
    pub event_capacity: usize,
}

impl Default for AuthTemplatesConfig {
    fn default() -> Self {
        Self {
            max_document_bytes: default_max_document_bytes(),
            id_attempts: 8,
            project: Some("default".to_owned()),
            storage_dir: None,
            event_capacity: 256,
        }
    }
}

fn default_max_document_bytes() -> usize {
    16 * 1024 * 1024
}
