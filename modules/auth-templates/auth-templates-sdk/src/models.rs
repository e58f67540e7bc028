//! Public models for the `auth_templates` module.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// An authentication probe template: one HTTP operation to replay plus the
/// regular expression that recognizes an authenticated-success status line.
///
/// Serialized flat, as persisted and emitted in `templates:created`:
///
/// ```text
/// { id, requestId, authSuccessRegex, rules: [...], meta: { host, port, path, isTls, method } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    /// Unique template identifier, immutable once assigned.
    pub id: Uuid,
    /// Identifier of the request definition to replay. Independent from `id`.
    pub request_id: Uuid,
    /// Regular expression matched against the response status line.
    pub auth_success_regex: String,
    /// Roles and users permitted to execute this template. Order is irrelevant.
    pub rules: Vec<TemplateRule>,
    pub meta: TemplateMeta,
}

impl Template {
    /// Whether an association equal to `rule` is present.
    #[must_use]
    pub fn has_rule(&self, rule: &TemplateRule) -> bool {
        self.rules.contains(rule)
    }
}

/// Connection and request-line data of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMeta {
    /// Target host, empty when the source document declared none.
    pub host: String,
    /// Target port, always in `1..=65535`.
    pub port: u16,
    pub path: String,
    pub is_tls: bool,
    pub method: HttpMethod,
}

/// An association allowing a role or a user to execute a template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TemplateRule {
    #[serde(rename = "RoleRule", rename_all = "camelCase")]
    Role { role_id: String },
    #[serde(rename = "UserRule", rename_all = "camelCase")]
    User { user_id: String },
}

impl TemplateRule {
    pub fn role(role_id: impl Into<String>) -> Self {
        Self::Role {
            role_id: role_id.into(),
        }
    }

    pub fn user(user_id: impl Into<String>) -> Self {
        Self::User {
            user_id: user_id.into(),
        }
    }
}

/// HTTP verbs a template can probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
        HttpMethod::Head,
        HttpMethod::Options,
    ];

    /// Upper-case wire form of the verb.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }

    /// Case-insensitive lookup of a supported verb.
    #[must_use]
    pub fn from_verb(verb: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(verb))
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shallow update of a template. `None` fields are left untouched; `rules`
/// is replaced only when present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TemplatePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_success_regex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<TemplateRule>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<TemplateMeta>,
}

impl TemplatePatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.request_id.is_none()
            && self.auth_success_regex.is_none()
            && self.rules.is_none()
            && self.meta.is_none()
    }

    /// Merge this patch into `template`.
    pub fn apply_to(self, template: &mut Template) {
        if let Some(request_id) = self.request_id {
            template.request_id = request_id;
        }
        if let Some(regex) = self.auth_success_regex {
            template.auth_success_regex = regex;
        }
        if let Some(rules) = self.rules {
            template.rules = rules;
        }
        if let Some(meta) = self.meta {
            template.meta = meta;
        }
    }
}

/// Name of the persistence partition templates are stored under.
///
/// Restricted to ASCII alphanumerics, `-`, `_` and `.` so that it can
/// address a storage location directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectScope(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid project scope '{0}'")]
pub struct InvalidProjectScope(pub String);

impl ProjectScope {
    /// Validate and wrap a project name.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidProjectScope`] when the name is empty, is `.`/`..`,
    /// or contains characters outside `[A-Za-z0-9._-]`.
    pub fn new(name: impl Into<String>) -> Result<Self, InvalidProjectScope> {
        let name = name.into();
        let valid = !name.is_empty()
            && name != "."
            && name != ".."
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if valid {
            Ok(Self(name))
        } else {
            Err(InvalidProjectScope(name))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ProjectScope {
    type Error = InvalidProjectScope;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProjectScope> for String {
    fn from(value: ProjectScope) -> Self {
        value.0
    }
}

impl fmt::Display for ProjectScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
