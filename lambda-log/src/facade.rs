//! Adapter for the [`log`](https://docs.rs/log) facade
//!
//! Lets libraries that log through `log::info!` and friends write records through a
//! [`Logger`], request context included.

use std::sync::OnceLock;

use log::{LevelFilter, Log, Metadata, Record, set_logger, set_max_level};
use serde_json::Value;

use crate::{Fields, Level, LogError, LogResult, Logger};

/// Forwards `log` records to a [`Logger`].
#[derive(Debug)]
pub struct FacadeLog {
    logger: Logger,
    filter: LevelFilter,
}

impl FacadeLog {
    /// An adapter writing through `logger`, passing at most `filter`.
    pub fn new(logger: Logger, filter: LevelFilter) -> Self {
        Self { logger, filter }
    }
}

/// Installs a [`FacadeLog`] as the global `log` logger.
///
/// You **must** only call this function once; a second call fails with
/// [`LogError::InvalidArgument`].
pub fn init(logger: Logger, filter: LevelFilter) -> LogResult<()> {
    static ADAPTER: OnceLock<FacadeLog> = OnceLock::new();

    let mut installed = false;
    let adapter = ADAPTER.get_or_init(|| {
        installed = true;
        FacadeLog::new(logger, filter)
    });
    if !installed {
        return Err(LogError::invalid_argument("log facade is already initialized"));
    }
    set_logger(adapter).map_err(|e| {
        LogError::invalid_argument(format!("Failed to configure logger! {e:?}"))
    })?;
    set_max_level(filter);
    Ok(())
}

impl Log for FacadeLog {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.filter && self.logger.enabled(metadata.level().into())
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut fields = Fields::new();
        fields.insert(
            "module".to_string(),
            record.module_path().unwrap_or("<unknown>").into(),
        );
        fields.insert(
            "file".to_string(),
            record.file().unwrap_or("<unknown>").into(),
        );
        fields.insert("line".to_string(), Value::from(record.line().unwrap_or(0)));

        let level: Level = record.level().into();
        self.logger.write(level, &record.args().to_string(), fields);
    }

    fn flush(&self) {}
}
