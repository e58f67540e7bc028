//! `OpenAPI` 3.x / Swagger 2.0 document decoding.
//!
//! Only the fields the template pipeline consumes are read: `servers`,
//! `host`, `schemes`, `paths` and per-operation `responses`. Anything else,
//! including `$ref`s, is ignored. Malformed substructures decode to
//! "absent" instead of failing the document.

use auth_templates_sdk::HttpMethod;
use serde_json::{Map, Value};
use tracing::{debug, warn};
use url::Url;

use crate::domain::error::DomainError;

/// Which document shape the connection info was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `servers[0].url`
    OpenApi3,
    /// `host` + `schemes`
    Swagger2,
    /// Neither pattern matched; templates get an empty host.
    Unknown,
}

/// Connection parameters derived from the document. All fields may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerInfo {
    pub url: Option<String>,
    pub host: Option<String>,
    pub is_tls: Option<bool>,
    pub port: Option<u16>,
}

/// One declared (path, method) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDescriptor {
    pub path: String,
    pub method: HttpMethod,
    pub success_status: Option<u16>,
}

/// Decoded document, operations in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiDocument {
    pub dialect: Dialect,
    pub server: ServerInfo,
    pub operations: Vec<OperationDescriptor>,
}

/// Decode a raw JSON document.
///
/// # Errors
///
/// - [`DomainError::Parse`] if `raw` is not valid JSON
/// - [`DomainError::Spec`] if the document has no object-valued `paths`
pub fn parse(raw: &str) -> Result<ApiDocument, DomainError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| DomainError::parse(format!("invalid JSON document: {e}")))?;

    let Value::Object(doc) = value else {
        return Err(DomainError::spec("document is not a JSON object"));
    };

    let Some(Value::Object(paths)) = doc.get("paths") else {
        return Err(DomainError::spec("document contains no paths"));
    };

    let (dialect, server) = server_info(&doc);
    let operations = operations(paths);

    debug!(?dialect, operations = operations.len(), "Decoded API document");
    Ok(ApiDocument {
        dialect,
        server,
        operations,
    })
}

fn server_info(doc: &Map<String, Value>) -> (Dialect, ServerInfo) {
    if let Some(server) = openapi_server(doc) {
        return (Dialect::OpenApi3, server);
    }
    if let Some(server) = swagger_server(doc) {
        return (Dialect::Swagger2, server);
    }
    (Dialect::Unknown, ServerInfo::default())
}

fn openapi_server(doc: &Map<String, Value>) -> Option<ServerInfo> {
    let raw_url = doc
        .get("servers")?
        .as_array()?
        .first()?
        .get("url")?
        .as_str()?;

    let url = match Url::parse(raw_url) {
        Ok(url) => url,
        Err(e) => {
            warn!(url = raw_url, error = %e, "Ignoring unparsable server URL");
            return None;
        }
    };

    let is_tls = url.scheme() == "https";
    let port = url
        .port()
        .filter(|p| *p != 0)
        .unwrap_or_else(|| default_port(is_tls));

    Some(ServerInfo {
        url: Some(raw_url.to_owned()),
        host: Some(url.host_str().unwrap_or_default().to_owned()),
        is_tls: Some(is_tls),
        port: Some(port),
    })
}

fn swagger_server(doc: &Map<String, Value>) -> Option<ServerInfo> {
    let host = doc.get("host")?.as_str()?;
    let is_tls = doc
        .get("schemes")
        .and_then(Value::as_array)
        .and_then(|schemes| schemes.first())
        .is_some_and(|scheme| scheme.as_str() == Some("https"));

    Some(ServerInfo {
        url: None,
        host: Some(host.to_owned()),
        is_tls: Some(is_tls),
        port: Some(default_port(is_tls)),
    })
}

/// Port implied by the transport when none is declared.
#[must_use]
pub const fn default_port(is_tls: bool) -> u16 {
    if is_tls { 443 } else { 80 }
}

fn operations(paths: &Map<String, Value>) -> Vec<OperationDescriptor> {
    let mut out = Vec::new();
    for (path, item) in paths {
        let Value::Object(item) = item else {
            debug!(path, "Skipping non-object path item");
            continue;
        };
        for (key, operation) in item {
            let Some(method) = HttpMethod::from_verb(key) else {
                continue;
            };
            if !is_truthy(operation) {
                continue;
            }
            out.push(OperationDescriptor {
                path: path.clone(),
                method,
                success_status: success_status(operation),
            });
        }
    }
    out
}

/// `200` when declared, otherwise the lowest declared `2xx` code.
fn success_status(operation: &Value) -> Option<u16> {
    let responses = operation.get("responses")?.as_object()?;
    if responses.contains_key("200") {
        return Some(200);
    }
    responses
        .keys()
        .filter(|code| is_2xx(code))
        .filter_map(|code| code.parse().ok())
        .min()
}

fn is_2xx(code: &str) -> bool {
    let bytes = code.as_bytes();
    bytes.len() == 3 && bytes[0] == b'2' && bytes[1..].iter().all(u8::is_ascii_digit)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse_value(value: &Value) -> ApiDocument {
        parse(&value.to_string()).unwrap()
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let err = parse("{ not json").unwrap_err();
        assert!(matches!(err, DomainError::Parse { .. }));
    }

    #[test]
    fn missing_paths_is_a_spec_error() {
        let err = parse(r#"{ "openapi": "3.0.0" }"#).unwrap_err();
        assert!(matches!(err, DomainError::Spec { .. }));

        let err = parse(r#"{ "paths": [] }"#).unwrap_err();
        assert!(matches!(err, DomainError::Spec { .. }));

        let err = parse(r#"{ "paths": null }"#).unwrap_err();
        assert!(matches!(err, DomainError::Spec { .. }));
    }

    #[test]
    fn non_object_document_is_a_spec_error() {
        let err = parse("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, DomainError::Spec { .. }));
    }

    #[test]
    fn empty_paths_yield_no_operations() {
        let doc = parse_value(&json!({ "paths": {} }));
        assert!(doc.operations.is_empty());
        assert_eq!(doc.dialect, Dialect::Unknown);
        assert_eq!(doc.server, ServerInfo::default());
    }

    #[test]
    fn openapi_server_url_drives_connection_info() {
        let doc = parse_value(&json!({
            "servers": [{ "url": "https://api.example.com:8443/v1" }],
            "paths": {}
        }));
        assert_eq!(doc.dialect, Dialect::OpenApi3);
        assert_eq!(doc.server.host.as_deref(), Some("api.example.com"));
        assert_eq!(doc.server.is_tls, Some(true));
        assert_eq!(doc.server.port, Some(8443));
        assert_eq!(
            doc.server.url.as_deref(),
            Some("https://api.example.com:8443/v1")
        );
    }

    #[test]
    fn openapi_server_without_port_uses_scheme_default() {
        let doc = parse_value(&json!({
            "servers": [{ "url": "http://petstore.local/api" }],
            "paths": {}
        }));
        assert_eq!(doc.server.is_tls, Some(false));
        assert_eq!(doc.server.port, Some(80));

        let doc = parse_value(&json!({
            "servers": [{ "url": "https://petstore.local" }],
            "paths": {}
        }));
        assert_eq!(doc.server.port, Some(443));
    }

    #[test]
    fn relative_server_url_falls_through_to_swagger_host() {
        let doc = parse_value(&json!({
            "servers": [{ "url": "/api/v3" }],
            "host": "legacy.example.com",
            "schemes": ["https", "http"],
            "paths": {}
        }));
        assert_eq!(doc.dialect, Dialect::Swagger2);
        assert_eq!(doc.server.host.as_deref(), Some("legacy.example.com"));
        assert_eq!(doc.server.is_tls, Some(true));
        assert_eq!(doc.server.port, Some(443));
    }

    #[test]
    fn relative_server_url_without_host_is_unknown() {
        let doc = parse_value(&json!({
            "servers": [{ "url": "/api/v3" }],
            "paths": {}
        }));
        assert_eq!(doc.dialect, Dialect::Unknown);
        assert_eq!(doc.server, ServerInfo::default());
    }

    #[test]
    fn swagger_defaults_to_http_and_ignores_base_path() {
        let doc = parse_value(&json!({
            "swagger": "2.0",
            "host": "petstore.swagger.io",
            "basePath": "/v2",
            "paths": {}
        }));
        assert_eq!(doc.dialect, Dialect::Swagger2);
        assert_eq!(doc.server.is_tls, Some(false));
        assert_eq!(doc.server.port, Some(80));
        assert!(doc.server.url.is_none());
    }

    #[test]
    fn non_string_host_is_ignored() {
        let doc = parse_value(&json!({ "host": 42, "paths": {} }));
        assert_eq!(doc.dialect, Dialect::Unknown);
    }

    #[test]
    fn operations_follow_document_order() {
        let doc = parse_value(&json!({
            "paths": {
                "/pets": { "post": {}, "get": {} },
                "/pets/{id}": { "DELETE": {}, "parameters": [], "summary": "x" }
            }
        }));
        let ops: Vec<_> = doc
            .operations
            .iter()
            .map(|op| (op.path.as_str(), op.method))
            .collect();
        assert_eq!(
            ops,
            vec![
                ("/pets", HttpMethod::Post),
                ("/pets", HttpMethod::Get),
                ("/pets/{id}", HttpMethod::Delete),
            ]
        );
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let doc = parse_value(&json!({
            "paths": {
                "/a": "not-an-object",
                "/b": null,
                "/c": { "get": null, "put": false, "patch": 0, "head": "", "trace": {} },
                "/d": { "options": true }
            }
        }));
        assert_eq!(doc.operations.len(), 1);
        assert_eq!(doc.operations[0].path, "/d");
        assert_eq!(doc.operations[0].method, HttpMethod::Options);
        assert_eq!(doc.operations[0].success_status, None);
    }

    #[test]
    fn success_status_prefers_200() {
        let doc = parse_value(&json!({
            "paths": { "/x": { "get": { "responses": {
                "201": {}, "204": {}, "200": {}, "default": {}
            } } } }
        }));
        assert_eq!(doc.operations[0].success_status, Some(200));
    }

    #[test]
    fn success_status_takes_lowest_2xx_without_200() {
        let doc = parse_value(&json!({
            "paths": { "/x": { "post": { "responses": {
                "400": {}, "204": {}, "201": {}
            } } } }
        }));
        assert_eq!(doc.operations[0].success_status, Some(201));
    }

    #[test]
    fn success_status_ignores_wildcards_and_non_2xx() {
        let doc = parse_value(&json!({
            "paths": { "/x": {
                "get": { "responses": { "2XX": {}, "301": {}, "2000": {}, "default": {} } },
                "put": { "responses": [] },
                "post": {}
            } }
        }));
        assert!(doc.operations.iter().all(|op| op.success_status.is_none()));
    }
}
