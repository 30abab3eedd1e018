//! Where serialized records go
//!
//! Every record is written to the process-wide sink, standard output unless
//! [`set_sink`] says otherwise. A record is handed over as one complete,
//! newline-terminated buffer so a single write never interleaves with another.
//!
//! [`override_thread`] redirects the current thread only, until the returned guard
//! drops. Tests use it to capture output without disturbing each other.

use std::{
    cell::RefCell,
    io::{self, Write},
    sync::{Arc, LazyLock},
};

use parking_lot::{Mutex, RwLock};

/// Destination for serialized log records.
pub trait Sink: Send + Sync {
    /// Writes one newline-terminated record.
    fn write_record(&self, record: &[u8]) -> io::Result<()>;
}

/// Writes records to the process's standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct Stdout;

impl Sink for Stdout {
    fn write_record(&self, record: &[u8]) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(record)?;
        stdout.flush()
    }
}

/// Keeps records in memory. Handy for tests and for buffering a handler's output.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    /// A new, empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every record written so far, without trailing newlines.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Every record written so far, parsed as JSON. Unparseable lines are skipped.
    pub fn records(&self) -> Vec<serde_json::Value> {
        self.lines
            .lock()
            .iter()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }

    /// Removes and returns everything written so far.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.lock())
    }
}

impl Sink for MemorySink {
    fn write_record(&self, record: &[u8]) -> io::Result<()> {
        let line = std::str::from_utf8(record)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.lines
            .lock()
            .push(line.trim_end_matches('\n').to_string());
        Ok(())
    }
}

static ACTIVE: LazyLock<RwLock<Arc<dyn Sink>>> =
    LazyLock::new(|| RwLock::new(Arc::new(Stdout) as Arc<dyn Sink>));

thread_local! {
    static THREAD_OVERRIDE: RefCell<Option<Arc<dyn Sink>>> = const { RefCell::new(None) };
}

/// Installs `sink` for the whole process and returns the one it replaces.
pub fn set_sink(sink: Arc<dyn Sink>) -> Arc<dyn Sink> {
    std::mem::replace(&mut *ACTIVE.write(), sink)
}

/// Restores the previous thread override when dropped.
#[must_use = "the override ends when the guard drops"]
pub struct ThreadSinkGuard {
    previous: Option<Arc<dyn Sink>>,
}

impl Drop for ThreadSinkGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        THREAD_OVERRIDE.with_borrow_mut(|current| *current = previous);
    }
}

/// Sends this thread's records to `sink` instead of the process-wide sink until the
/// guard drops. Other threads are unaffected.
pub fn override_thread(sink: Arc<dyn Sink>) -> ThreadSinkGuard {
    let previous = THREAD_OVERRIDE.with_borrow_mut(|current| current.replace(sink));
    ThreadSinkGuard { previous }
}

fn current() -> Arc<dyn Sink> {
    THREAD_OVERRIDE
        .with_borrow(Clone::clone)
        .unwrap_or_else(|| Arc::clone(&ACTIVE.read()))
}

/// Writes one record to the sink in effect on this thread.
///
/// Failures never reach the caller: logging must not break the handler. They're
/// reported on stderr and the record is dropped.
pub(crate) fn emit(record: &[u8]) {
    if let Err(e) = current().write_record(record) {
        let _ = writeln!(io::stderr(), "lambda-log: failed to write log record: {e}");
    }
}
