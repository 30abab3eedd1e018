//! Copies the request context into outgoing request headers
//!
//! ```rust
//! use lambda_log::context;
//! use lambda_log_plugins::outbound::inject_context_headers;
//!
//! context::clear_all();
//! context::set("x-correlation-id", "abc");
//!
//! let mut headers = vec![("authorization".to_string(), "token".to_string())];
//! inject_context_headers(&mut headers);
//! assert_eq!(headers[1], ("x-correlation-id".to_string(), "abc".to_string()));
//! ```

use std::collections::HashMap;

use lambda_log::context;
use serde_json::Value;

/// Header collection of an outgoing request.
pub trait OutboundHeaders {
    /// Whether a header called `name` is already set. Names compare case-insensitively.
    fn has_header(&self, name: &str) -> bool;
    /// Sets a header.
    fn set_header(&mut self, name: String, value: String);
}

impl OutboundHeaders for Vec<(String, String)> {
    fn has_header(&self, name: &str) -> bool {
        self.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
    }

    fn set_header(&mut self, name: String, value: String) {
        self.push((name, value));
    }
}

impl OutboundHeaders for HashMap<String, String> {
    fn has_header(&self, name: &str) -> bool {
        self.keys().any(|k| k.eq_ignore_ascii_case(name))
    }

    fn set_header(&mut self, name: String, value: String) {
        self.insert(name, value);
    }
}

/// For every request context entry, sets a header of the same name unless the request
/// already has one. Empty-like values (null, `false`, `0`, `""`) are skipped; other
/// non-string values are sent as their JSON text.
///
/// Only the request is modified.
pub fn inject_context_headers<H: OutboundHeaders + ?Sized>(headers: &mut H) {
    for (name, value) in context::get_all() {
        let Some(value) = header_value(value) else {
            continue;
        };
        if !headers.has_header(&name) {
            headers.set_header(name, value);
        }
    }
}

fn header_value(value: Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn sorted(mut headers: Vec<(String, String)>) -> Vec<(String, String)> {
        headers.sort();
        headers
    }

    fn pair(name: &str, value: &str) -> (String, String) {
        (name.to_string(), value.to_string())
    }

    #[test]
    fn copies_every_context_entry() {
        context::clear_all();
        context::set("x-correlation-id", "corr-1");
        context::set("x-rrid", "route-1");
        context::set("User-Agent", "agent");

        let mut headers: Vec<(String, String)> = vec![];
        inject_context_headers(&mut headers);
        assert_eq!(
            sorted(headers),
            vec![
                pair("User-Agent", "agent"),
                pair("x-correlation-id", "corr-1"),
                pair("x-rrid", "route-1"),
            ]
        );
    }

    #[test]
    fn existing_headers_win() {
        context::clear_all();
        context::set("x-correlation-id", "from-context");
        context::set("x-rrid", "route-1");

        let mut headers = vec![pair("X-Correlation-ID", "explicit")];
        inject_context_headers(&mut headers);
        assert_eq!(
            sorted(headers),
            vec![pair("X-Correlation-ID", "explicit"), pair("x-rrid", "route-1")]
        );
    }

    #[test]
    fn skips_empty_values_and_stringifies_others() {
        context::clear_all();
        context::set("x-correlation-empty", "");
        context::set("x-correlation-null", Value::Null);
        context::set("x-correlation-zero", 0);
        context::set("x-correlation-zero-float", 0.0);
        context::set("x-correlation-off", false);
        context::set("x-correlation-count", 3);
        context::set("x-correlation-flag", true);

        let mut headers: HashMap<String, String> = HashMap::new();
        inject_context_headers(&mut headers);
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("x-correlation-count"), Some(&"3".to_string()));
        assert_eq!(headers.get("x-correlation-flag"), Some(&"true".to_string()));
    }

    #[test]
    fn leaves_context_untouched() {
        context::clear_all();
        context::set("x-correlation-id", "corr-1");
        let before = context::get_all();

        let mut headers: Vec<(String, String)> = vec![];
        inject_context_headers(&mut headers);
        assert_eq!(context::get_all(), before);
        assert_eq!(json!(headers), json!([["x-correlation-id", "corr-1"]]));
    }
}
