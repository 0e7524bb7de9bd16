//! MCP tool annotations derived from the HTTP method of a tool's request template.

use reqwest::Method;
use rmcp::model::ToolAnnotations;

/// Hints follow RFC 9110 method semantics. Forwarded tools always talk to an external system, so
/// `openWorldHint` is set for every method; unknown extension methods get no other hints.
#[must_use]
pub fn annotations_for_method(method: &Method) -> ToolAnnotations {
    // (read_only, destructive, idempotent)
    let (read_only_hint, destructive_hint, idempotent_hint) = match method.as_str() {
        "GET" | "HEAD" | "OPTIONS" => (Some(true), Some(false), Some(true)),
        "POST" => (Some(false), Some(false), Some(false)),
        "PUT" | "DELETE" => (Some(false), Some(true), Some(true)),
        // PATCH may or may not be idempotent.
        "PATCH" => (Some(false), Some(true), None),
        _ => (None, None, None),
    };

    ToolAnnotations {
        title: None,
        read_only_hint,
        destructive_hint,
        idempotent_hint,
        open_world_hint: Some(true),
    }
}
