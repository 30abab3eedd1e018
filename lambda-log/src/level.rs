//! Log levels and their numeric severities

use std::{fmt, str::FromStr};

use serde::{Serialize, Serializer};

use crate::{LogError, LogResult};

/// A log level. Variants are ordered by severity, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Level {
    /// 10
    Trace,
    /// 20
    Debug,
    /// 30
    #[default]
    Info,
    /// 40
    Warn,
    /// 50
    Error,
    /// 60
    Fatal,
}

impl Level {
    /// Every level, lowest severity first.
    pub const ALL: [Level; 6] = [
        Level::Trace,
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Fatal,
    ];

    /// Numeric severity as written into the `level` field of a record.
    pub const fn severity(self) -> u8 {
        match self {
            Level::Trace => 10,
            Level::Debug => 20,
            Level::Info => 30,
            Level::Warn => 40,
            Level::Error => 50,
            Level::Fatal => 60,
        }
    }

    /// Lowercase level name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
        }
    }

    /// Resolves a level name. Names are matched exactly.
    pub fn from_name(name: &str) -> LogResult<Level> {
        Level::ALL
            .into_iter()
            .find(|level| level.as_str() == name)
            .ok_or_else(|| LogError::InvalidLevel {
                name: name.to_string(),
            })
    }
}

/// Severity of a level name, or [`LogError::InvalidLevel`].
pub fn severity_of(name: &str) -> LogResult<u8> {
    Level::from_name(name).map(Level::severity)
}

impl FromStr for Level {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::from_name(s)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.severity())
    }
}

impl From<log::Level> for Level {
    fn from(value: log::Level) -> Self {
        match value {
            log::Level::Error => Level::Error,
            log::Level::Warn => Level::Warn,
            log::Level::Info => Level::Info,
            log::Level::Debug => Level::Debug,
            log::Level::Trace => Level::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severities_strictly_increase() {
        let severities: Vec<u8> = Level::ALL.iter().map(|l| l.severity()).collect();
        assert_eq!(severities, vec![10, 20, 30, 40, 50, 60]);
        assert!(Level::ALL.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn names_resolve() {
        for level in Level::ALL {
            assert_eq!(Level::from_name(level.as_str()), Ok(level));
            assert_eq!(level.to_string().parse::<Level>(), Ok(level));
        }
        assert_eq!(severity_of("warn"), Ok(40));
    }

    #[test]
    fn unknown_names_are_rejected() {
        for name in ["", "WARN", "silly", "verbose"] {
            assert_eq!(
                severity_of(name),
                Err(LogError::InvalidLevel {
                    name: name.to_string()
                })
            );
        }
    }

    #[test]
    fn serializes_as_severity() {
        assert_eq!(serde_json::to_value(Level::Error).ok(), Some(50.into()));
    }

    #[test]
    fn maps_log_crate_levels() {
        assert_eq!(Level::from(log::Level::Trace), Level::Trace);
        assert_eq!(Level::from(log::Level::Error), Level::Error);
    }
}
