//! Invocation and outbound-request plugins for `lambda-log`
//!
//! * [`request_context`]: fills the request context from each invocation's request id
//!   and headers, before the handler runs.
//! * [`outbound`]: copies the request context into the headers of outgoing requests so
//!   downstream services log the same correlation ids.
//!
//! ```rust
//! use lambda_log_plugins::{outbound, request_context::{Invocation, with_invocation}};
//!
//! let invocation = Invocation::new("req-1")
//!     .with_header("x-correlation-user", "u-42");
//!
//! let headers = with_invocation(&invocation, || {
//!     let mut headers: Vec<(String, String)> = vec![];
//!     outbound::inject_context_headers(&mut headers);
//!     headers
//! });
//! assert!(headers.contains(&("x-correlation-id".to_string(), "req-1".to_string())));
//! ```

pub mod outbound;
pub mod request_context;
