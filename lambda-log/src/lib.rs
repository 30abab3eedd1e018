//! Structured JSON logging for serverless request handlers
//!
//! Each log call writes one JSON object per line, enriched with the correlation data of
//! the invocation being handled:
//!
//! * [`Logger`]: named, leveled emitter with child loggers that inherit fixed fields.
//! * [`context`]: the per-invocation request context every write reads implicitly.
//! * [`registry`]: the process-wide default logger.
//! * [`facade`]: forwards records from the [`log`](https://docs.rs/log) crate.
//!
//! ```rust
//! use lambda_log::{LoggerOptions, context, registry};
//!
//! let logger = registry::create_logger(LoggerOptions::new("orders"))?;
//!
//! context::clear_all();
//! context::set("x-correlation-id", "c0ffee");
//!
//! let db = logger.child(Default::default())?;
//! db.info_with("order stored", serde_json::json!({ "orderId": 42 }));
//! # Ok::<(), lambda_log::LogError>(())
//! ```
//!
//! You are likely to be interested in the sibling crate:
//! * `lambda-log-plugins`: populates the request context per invocation and copies it
//!   into outbound request headers.

pub mod context;
mod error;
pub mod facade;
mod level;
mod logger;
pub mod record;
pub mod registry;
pub mod sink;

pub use context::RequestContext;
pub use error::{LogError, LogResult};
pub use level::{Level, severity_of};
pub use logger::{Logger, LoggerOptions};
pub use registry::{create_logger, get_child_logger, get_logger};

/// A bag of named JSON values.
pub type Fields = serde_json::Map<String, serde_json::Value>;
