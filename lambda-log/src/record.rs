//! Assembly and encoding of a single log record

use serde_json::Value;
use time::{OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem, macros::format_description};

use crate::{Fields, Level};

/// Record format version.
pub const LOG_VERSION: u8 = 1;
/// Process id reported by every record. Functions don't expose a meaningful one.
pub const PID: u32 = 0;
/// Hostname reported by every record.
pub const HOSTNAME: &str = "aws-lambda";

/// Keys the logger owns. Values under these keys from any other source are overwritten.
pub const RESERVED_KEYS: [&str; 7] = ["name", "level", "version", "pid", "hostname", "time", "msg"];

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
);

const RRID_SOURCE: &str = "x-rrid";
const RRID: &str = "rrid";

/// Merges the record sources, later sources winning on key collisions:
/// call-site fields, then the request context, then the logger's own fields,
/// then the fixed metadata.
pub fn assemble(
    extra: Fields,
    context: Fields,
    fields: &Fields,
    level: Level,
    msg: &str,
    time: OffsetDateTime,
) -> Fields {
    let mut record = extra;
    record.extend(context);
    record.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));

    record.insert("version".to_string(), LOG_VERSION.into());
    record.insert("pid".to_string(), PID.into());
    record.insert("hostname".to_string(), HOSTNAME.into());
    record.insert("time".to_string(), timestamp(time).into());
    record.insert("level".to_string(), level.severity().into());
    record.insert("msg".to_string(), msg.into());

    rename_rrid(&mut record);
    record
}

/// Moves `x-rrid` to `rrid`. A record never carries both afterwards.
pub fn rename_rrid(record: &mut Fields) {
    if let Some(rrid) = record.remove(RRID_SOURCE) {
        record.insert(RRID.to_string(), rrid);
    }
}

/// UTC timestamp with millisecond precision, e.g. `2024-05-01T12:00:00.123Z`.
pub fn timestamp(time: OffsetDateTime) -> String {
    time.to_offset(UtcOffset::UTC)
        .format(TIMESTAMP_FORMAT)
        .unwrap_or("<unknown>".to_string())
}

/// One JSON object followed by a newline.
pub fn encode(record: &Fields) -> Vec<u8> {
    let mut buffer = serde_json::to_vec(record).unwrap_or_else(|e| {
        // Unreachable for a Map<String, Value>.
        format!("{{\"msg\":\"failed to encode log record: {e}\"}}").into_bytes()
    });
    buffer.push(b'\n');
    buffer
}

/// Turns call-site fields into a field map. Anything that isn't a JSON object counts as empty.
pub fn extra_fields<E: serde::Serialize>(extra: E) -> Fields {
    match serde_json::to_value(extra) {
        Ok(Value::Object(fields)) => fields,
        _ => Fields::new(),
    }
}
