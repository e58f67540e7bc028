//! Mapping of decoded operations to templates.

use auth_templates_sdk::{HttpMethod, Template, TemplateMeta};

use crate::domain::ids::TemplateIds;
use crate::domain::spec::{OperationDescriptor, ServerInfo, default_port};

/// Status-line matcher for a detected success code, or any `2xx` without one.
///
/// The dot of `HTTP/1.1` is bracketed so it only matches a literal period.
#[must_use]
pub fn success_regex(status: Option<u16>) -> String {
    match status {
        Some(code) => format!("HTTP/1[.]1 {code}"),
        None => r"HTTP/1[.]1 2\d\d".to_owned(),
    }
}

/// Build the template for one operation.
#[must_use]
pub fn build(op: &OperationDescriptor, server: &ServerInfo, ids: TemplateIds) -> Template {
    let is_tls = server.is_tls.unwrap_or(false);
    Template {
        id: ids.id,
        request_id: ids.request_id,
        auth_success_regex: success_regex(op.success_status),
        rules: Vec::new(),
        meta: TemplateMeta {
            host: server.host.clone().unwrap_or_default(),
            port: server.port.unwrap_or_else(|| default_port(is_tls)),
            path: op.path.clone(),
            is_tls,
            method: op.method,
        },
    }
}

/// A template with no operation behind it yet, as created by "add template".
#[must_use]
pub fn blank(ids: TemplateIds) -> Template {
    let op = OperationDescriptor {
        path: "/".to_owned(),
        method: HttpMethod::Get,
        success_status: None,
    };
    build(&op, &ServerInfo::default(), ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use uuid::Uuid;

    fn ids() -> TemplateIds {
        TemplateIds {
            id: Uuid::from_u128(1),
            request_id: Uuid::from_u128(2),
        }
    }

    fn op(status: Option<u16>) -> OperationDescriptor {
        OperationDescriptor {
            path: "/users/{id}".to_owned(),
            method: HttpMethod::Patch,
            success_status: status,
        }
    }

    #[test]
    fn explicit_code_matches_only_that_code() {
        let re = Regex::new(&success_regex(Some(201))).unwrap();
        assert!(re.is_match("HTTP/1.1 201 Created"));
        assert!(!re.is_match("HTTP/1.1 204 No Content"));
        assert!(!re.is_match("HTTP/1x1 201 Created"));
    }

    #[test]
    fn fallback_matches_any_2xx() {
        let re = Regex::new(&success_regex(None)).unwrap();
        for code in 200..=299 {
            assert!(re.is_match(&format!("HTTP/1.1 {code}")), "{code}");
        }
        assert!(!re.is_match("HTTP/1.1 301"));
        assert!(!re.is_match("HTTP/1.1 404"));
    }

    #[test]
    fn build_copies_server_and_operation() {
        let server = ServerInfo {
            url: Some("https://api.example.com:8443".to_owned()),
            host: Some("api.example.com".to_owned()),
            is_tls: Some(true),
            port: Some(8443),
        };
        let t = build(&op(Some(200)), &server, ids());

        assert_eq!(t.id, Uuid::from_u128(1));
        assert_eq!(t.request_id, Uuid::from_u128(2));
        assert_eq!(t.auth_success_regex, "HTTP/1[.]1 200");
        assert!(t.rules.is_empty());
        assert_eq!(t.meta.host, "api.example.com");
        assert_eq!(t.meta.port, 8443);
        assert!(t.meta.is_tls);
        assert_eq!(t.meta.path, "/users/{id}");
        assert_eq!(t.meta.method, HttpMethod::Patch);
    }

    #[test]
    fn missing_server_info_uses_defaults() {
        let t = build(&op(None), &ServerInfo::default(), ids());
        assert_eq!(t.meta.host, "");
        assert_eq!(t.meta.port, 80);
        assert!(!t.meta.is_tls);

        let tls_only = ServerInfo {
            is_tls: Some(true),
            ..ServerInfo::default()
        };
        assert_eq!(build(&op(None), &tls_only, ids()).meta.port, 443);
    }

    #[test]
    fn blank_template_is_a_root_get() {
        let t = blank(ids());
        assert_eq!(t.meta.path, "/");
        assert_eq!(t.meta.method, HttpMethod::Get);
        assert_eq!(t.auth_success_regex, r"HTTP/1[.]1 2\d\d");
    }
}
