use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;

use crate::{Fields, Level, LogError, LogResult, context, record, sink};

/// Options for building a [`Logger`].
///
/// ```rust
/// use lambda_log::{Logger, LoggerOptions};
///
/// let logger = Logger::new(
///     LoggerOptions::new("checkout")
///         .with_level("debug")
///         .with_field("service", "payments"),
/// )?;
/// logger.debug("ready");
/// # Ok::<(), lambda_log::LogError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct LoggerOptions {
    name: String,
    level: Option<String>,
    fields: Fields,
}

impl LoggerOptions {
    /// Options for a logger called `name`, at the default level (info).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Sets the level by name. Checked when the logger is built.
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    /// Adds one fixed field, written into every record.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Adds several fixed fields.
    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields.extend(fields);
        self
    }
}

/// A named, leveled emitter of JSON log records.
///
/// Every record merges the call-site fields, the current [request context](crate::context),
/// the logger's fixed fields and the record metadata, in that order of increasing
/// precedence. The fixed fields always include `name` and the level name.
///
/// Loggers are cheap to clone and never hold an output handle; records go to the
/// process-wide [sink](crate::sink).
#[derive(Debug, Clone)]
pub struct Logger {
    name: Arc<str>,
    level: Level,
    fields: Arc<Fields>,
}

macro_rules! level_methods {
    ($($level:ident, $with:ident => $variant:expr;)*) => {
        $(
            #[doc = concat!("Logs `msg` at ", stringify!($level), " level.")]
            pub fn $level(&self, msg: &str) {
                self.log($variant, msg);
            }

            #[doc = concat!("Logs `msg` at ", stringify!($level), " level with extra fields for this record only.")]
            pub fn $with<E: Serialize>(&self, msg: &str, extra: E) {
                self.log_with($variant, msg, extra);
            }
        )*
    };
}

impl Logger {
    /// Builds a logger, failing with [`LogError::InvalidArgument`] on an empty name
    /// or an unknown level.
    pub fn new(options: LoggerOptions) -> LogResult<Self> {
        let LoggerOptions {
            name,
            level,
            mut fields,
        } = options;
        if name.is_empty() {
            return Err(LogError::invalid_argument("Logger constructed without name"));
        }
        let level = match level {
            Some(level) => resolve_level(&level)?,
            None => Level::default(),
        };

        fields.insert("name".to_string(), name.as_str().into());
        fields.insert("level".to_string(), level.as_str().into());
        Ok(Self {
            name: name.into(),
            level,
            fields: Arc::new(fields),
        })
    }

    /// Derives a logger that starts from a copy of this one's fixed fields with `fields`
    /// laid on top.
    ///
    /// The child keeps this logger's name; a `name` key is rejected. A `level` key must
    /// be a level name and becomes the child's level.
    pub fn child(&self, fields: Fields) -> LogResult<Self> {
        if fields.contains_key("name") {
            return Err(LogError::invalid_argument(format!(
                "child loggers cannot override name '{}'",
                self.name
            )));
        }
        let level = match fields.get("level") {
            None => self.level,
            Some(Value::String(level)) => resolve_level(level)?,
            Some(other) => {
                return Err(LogError::invalid_argument(format!(
                    "level must be a level name, got {other}"
                )));
            }
        };

        let mut merged = Fields::clone(&self.fields);
        merged.extend(fields);
        Ok(Self {
            name: Arc::clone(&self.name),
            level,
            fields: Arc::new(merged),
        })
    }

    /// Logger name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configured level.
    pub fn level(&self) -> Level {
        self.level
    }

    /// Fixed fields written into every record.
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Whether a record at `level` would be written.
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.level
    }

    /// Logs `msg` at `level`.
    pub fn log(&self, level: Level, msg: &str) {
        self.write(level, msg, Fields::new());
    }

    /// Logs `msg` at `level` with extra fields for this record only. `extra` should
    /// serialize to a JSON object; anything else is ignored.
    pub fn log_with<E: Serialize>(&self, level: Level, msg: &str, extra: E) {
        if self.enabled(level) {
            self.write(level, msg, record::extra_fields(extra));
        }
    }

    level_methods! {
        trace, trace_with => Level::Trace;
        debug, debug_with => Level::Debug;
        info, info_with => Level::Info;
        warn, warn_with => Level::Warn;
        error, error_with => Level::Error;
        fatal, fatal_with => Level::Fatal;
    }

    pub(crate) fn write(&self, level: Level, msg: &str, extra: Fields) {
        if !self.enabled(level) {
            return;
        }
        let record = record::assemble(
            extra,
            context::get_all(),
            &self.fields,
            level,
            msg,
            OffsetDateTime::now_utc(),
        );
        sink::emit(&record::encode(&record));
    }
}

fn resolve_level(name: &str) -> LogResult<Level> {
    Level::from_name(name).map_err(|e| LogError::invalid_argument(e.to_string()))
}
