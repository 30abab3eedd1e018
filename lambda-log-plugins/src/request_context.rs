//! Populates the request context at the start of each invocation

use lambda_log::context;
use serde_json::Value;

/// Request id key.
pub const AWS_REQUEST_ID: &str = "awsRequestId";
/// Correlation id key.
pub const CORRELATION_ID: &str = "x-correlation-id";
/// Request-route id key. Logged as `rrid`.
pub const X_RRID: &str = "x-rrid";
/// User agent header.
pub const USER_AGENT: &str = "User-Agent";
/// Header that turns on debug logging downstream when it is exactly `"true"`.
pub const DEBUG_LOG_ENABLED: &str = "Debug-Log-Enabled";

/// What the request context is built from: the platform's request id and the
/// request headers, if the trigger had any.
///
/// Headers keep their arrival order. When several share a name, ignoring ASCII case,
/// the first one wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    request_id: Option<String>,
    headers: Vec<(String, String)>,
}

impl Invocation {
    /// An invocation with a request id and no headers.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: Some(request_id.into()),
            headers: Vec::new(),
        }
    }

    /// Appends one header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Overrides the headers.
    pub fn with_headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.headers = headers.into_iter().collect();
        self
    }

    /// The platform's request id.
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Request headers, in arrival order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Something that runs before each invocation's handler.
pub trait InvocationHook {
    /// Called once per invocation, before the handler.
    fn before_invocation(&self, invocation: &Invocation);
}

/// Hook that resets and fills the request context.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlobalRequestContext;

impl InvocationHook for GlobalRequestContext {
    fn before_invocation(&self, invocation: &Invocation) {
        populate(invocation);
    }
}

/// Clears the request context, then fills it from `invocation`:
///
/// * the request id as `awsRequestId`,
/// * every `x-correlation-*` header, under its lowercased name,
/// * `x-rrid` and `User-Agent`,
/// * `Debug-Log-Enabled`, only when it is exactly `"true"`.
///
/// A missing correlation id falls back to the request id, and a missing `x-rrid` to the
/// correlation id.
///
/// Keys are written verbatim whatever the context's key policy, so `awsRequestId` and
/// `x-rrid` keep their names and `x-rrid` is still logged as `rrid`.
pub fn populate(invocation: &Invocation) {
    context::clear_all();

    if let Some(request_id) = invocation.request_id() {
        context::set_verbatim(AWS_REQUEST_ID, request_id);
    }

    for (name, value) in invocation.headers() {
        if !context::has_correlation_prefix(name) {
            continue;
        }
        let key = name.to_ascii_lowercase();
        if context::get_verbatim(&key).is_none() {
            context::set_verbatim(&key, value.as_str());
        }
    }
    if let Some(rrid) = invocation.header(X_RRID) {
        context::set_verbatim(X_RRID, rrid);
    }
    if let Some(user_agent) = invocation.header(USER_AGENT) {
        context::set_verbatim(USER_AGENT, user_agent);
    }
    if invocation.header(DEBUG_LOG_ENABLED) == Some("true") {
        context::set_verbatim(DEBUG_LOG_ENABLED, "true");
    }

    if is_unset(CORRELATION_ID) {
        if let Some(request_id) = invocation.request_id() {
            context::set_verbatim(CORRELATION_ID, request_id);
        }
    }
    if is_unset(X_RRID) {
        let fallback = context::get_verbatim(CORRELATION_ID)
            .filter(|v| !is_blank(v))
            .or_else(|| context::get_verbatim(AWS_REQUEST_ID));
        if let Some(rrid) = fallback {
            context::set_verbatim(X_RRID, rrid);
        }
    }
}

/// Runs `handler` for one invocation: populates the request context first and clears it
/// afterwards, so nothing from this invocation is visible to the next.
pub fn with_invocation<R>(invocation: &Invocation, handler: impl FnOnce() -> R) -> R {
    struct Clear;
    impl Drop for Clear {
        fn drop(&mut self) {
            context::clear_all();
        }
    }

    populate(invocation);
    let _clear = Clear;
    handler()
}

fn is_unset(key: &str) -> bool {
    context::get_verbatim(key).is_none_or(|v| is_blank(&v))
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
