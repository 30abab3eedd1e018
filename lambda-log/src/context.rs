//! Per-invocation request context
//!
//! The request context is a small key/value store that every [`crate::Logger`] write
//! reads implicitly, and that outbound request interceptors copy into headers. It is
//! cleared and repopulated at the start of each invocation.
//!
//! The store lives in thread-local storage: one invocation owns one thread of control
//! for its whole lifetime, so invocations running concurrently on other threads never
//! see each other's correlation data. Use [`scope`] to run a unit of work against an
//! explicit context and restore whatever was installed before.
//!
//! The store is per thread, not per async task. On a work-stealing runtime a handler
//! that resumes on another worker after an `.await` reads that worker's context; run
//! such handlers on a current-thread runtime, or keep context access between awaits.
//!
//! ```rust
//! use lambda_log::context;
//!
//! context::clear_all();
//! context::set("x-correlation-id", "abc");
//! assert_eq!(context::get("x-correlation-id"), Some("abc".into()));
//! ```

use std::cell::RefCell;

use serde_json::Value;

use crate::Fields;

/// Prefix carried by every correlation key.
pub const CORRELATION_PREFIX: &str = "x-correlation-";

/// How keys are stored by [`set`] and looked up by [`get`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyPolicy {
    /// Keys are stored exactly as given.
    #[default]
    Verbatim,
    /// Keys that don't already start with [`CORRELATION_PREFIX`] get it prepended.
    CorrelationPrefix,
}

impl KeyPolicy {
    /// Applies the policy to a key.
    pub fn normalize(self, key: &str) -> String {
        match self {
            KeyPolicy::Verbatim => key.to_string(),
            KeyPolicy::CorrelationPrefix if has_correlation_prefix(key) => key.to_string(),
            KeyPolicy::CorrelationPrefix => format!("{CORRELATION_PREFIX}{key}"),
        }
    }
}

/// True when `key` starts with [`CORRELATION_PREFIX`], ignoring ASCII case.
pub fn has_correlation_prefix(key: &str) -> bool {
    key.get(..CORRELATION_PREFIX.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(CORRELATION_PREFIX))
}

/// An owned request context: the entries plus the key policy used to address them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestContext {
    policy: KeyPolicy,
    entries: Fields,
}

impl RequestContext {
    /// An empty context with the default key policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty context using `policy`.
    pub fn with_policy(policy: KeyPolicy) -> Self {
        Self {
            policy,
            entries: Fields::new(),
        }
    }

    /// The key policy of this context.
    pub fn policy(&self) -> KeyPolicy {
        self.policy
    }

    /// Upserts one entry, normalizing the key first.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.entries.insert(self.policy.normalize(key), value.into());
    }

    /// Looks up one entry, normalizing the key first.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(&self.policy.normalize(key))
    }

    /// Upserts one entry under exactly `key`, whatever the policy.
    pub fn set_verbatim(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Looks up exactly `key`, whatever the policy.
    pub fn get_verbatim(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// All entries.
    pub fn entries(&self) -> &Fields {
        &self.entries
    }

    /// Replaces every entry. Keys are taken as given.
    pub fn replace_entries(&mut self, entries: Fields) {
        self.entries = entries;
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

thread_local! {
    // None until the first write on this thread.
    static CURRENT: RefCell<Option<RequestContext>> = const { RefCell::new(None) };
    static POLICY: RefCell<KeyPolicy> = const { RefCell::new(KeyPolicy::Verbatim) };
}

fn with_current<R>(f: impl FnOnce(&mut RequestContext) -> R) -> R {
    CURRENT.with_borrow_mut(|current| {
        let context = current.get_or_insert_with(|| RequestContext::with_policy(key_policy()));
        f(context)
    })
}

/// Sets the key policy for this thread. The current context, if any, adopts it too.
pub fn set_key_policy(policy: KeyPolicy) {
    POLICY.with_borrow_mut(|p| *p = policy);
    CURRENT.with_borrow_mut(|current| {
        if let Some(context) = current {
            context.policy = policy;
        }
    });
}

/// The key policy in effect on this thread.
pub fn key_policy() -> KeyPolicy {
    POLICY.with_borrow(|p| *p)
}

/// Replaces the context with an empty one.
///
/// Call this at the start of every invocation so nothing leaks over from the last one.
pub fn clear_all() {
    CURRENT.with_borrow_mut(|current| {
        *current = Some(RequestContext::with_policy(key_policy()));
    });
}

/// Upserts one entry.
pub fn set(key: &str, value: impl Into<Value>) {
    let value = value.into();
    with_current(|context| context.set(key, value));
}

/// Returns the value for `key`, or `None` if it's unset or nothing was ever stored.
pub fn get(key: &str) -> Option<Value> {
    CURRENT.with_borrow(|current| current.as_ref().and_then(|c| c.get(key)).cloned())
}

/// Upserts one entry under exactly `key`, bypassing the key policy.
///
/// For identity keys such as `awsRequestId` or `x-rrid` that must keep their name under
/// [`KeyPolicy::CorrelationPrefix`].
pub fn set_verbatim(key: &str, value: impl Into<Value>) {
    let value = value.into();
    with_current(|context| context.set_verbatim(key, value));
}

/// Returns the value stored under exactly `key`, bypassing the key policy.
pub fn get_verbatim(key: &str) -> Option<Value> {
    CURRENT.with_borrow(|current| current.as_ref().and_then(|c| c.get_verbatim(key)).cloned())
}

/// A point-in-time copy of every entry. Empty if nothing was ever stored.
pub fn get_all() -> Fields {
    CURRENT.with_borrow(|current| {
        current
            .as_ref()
            .map(|c| c.entries().clone())
            .unwrap_or_default()
    })
}

/// Replaces every entry at once.
pub fn replace_all_with(entries: Fields) {
    with_current(|context| context.replace_entries(entries));
}

/// Runs `f` with `context` installed, then puts back whatever was installed before.
///
/// The previous context is restored even if `f` panics.
pub fn scope<R>(context: RequestContext, f: impl FnOnce() -> R) -> R {
    struct Restore(Option<RequestContext>);
    impl Drop for Restore {
        fn drop(&mut self) {
            let previous = self.0.take();
            CURRENT.with_borrow_mut(|current| *current = previous);
        }
    }

    let previous = CURRENT.with_borrow_mut(|current| current.replace(context));
    let _restore = Restore(previous);
    f()
}
