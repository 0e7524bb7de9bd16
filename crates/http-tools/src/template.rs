//! Placeholder substitution for request URL patterns.
//!
//! Two scopes are supported: `{{.args.<key>}}` (call arguments) and `{{.config.<key>}}`
//! (static server config). Substitution is plain text replacement: values are inserted verbatim,
//! without URL-encoding, and the result is not validated.
//!
//! Each key is replaced once, in ascending key order, arguments before config. Placeholders that
//! name an unknown key are left in the output as-is.

use std::collections::BTreeMap;

const ARGS_SCOPE: &str = "args";
const CONFIG_SCOPE: &str = "config";

/// Render the placeholder literal for `scope` and `key`, e.g. `{{.args.city}}`.
#[must_use]
pub fn placeholder(scope: &str, key: &str) -> String {
    format!("{{{{.{scope}.{key}}}}}")
}

/// Resolve a URL pattern against call arguments and server config.
#[must_use]
pub fn resolve(
    url_pattern: &str,
    args: &BTreeMap<String, String>,
    config: &BTreeMap<String, String>,
) -> String {
    let url = substitute_scope(url_pattern.to_string(), ARGS_SCOPE, args);
    substitute_scope(url, CONFIG_SCOPE, config)
}

fn substitute_scope(mut url: String, scope: &str, values: &BTreeMap<String, String>) -> String {
    for (key, value) in values {
        let marker = placeholder(scope, key);
        if url.contains(&marker) {
            url = url.replace(&marker, value);
        }
    }
    url
}
