//! In-memory sink for tests and embedding hosts that ship entries themselves.

use std::sync::{Mutex, PoisonError};

use crate::sink::{LogEntry, LogSink};

/// Sink that keeps every entry in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the entries written so far.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Remove and return all entries.
    pub fn drain(&self) -> Vec<LogEntry> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<LogEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LogSink for MemorySink {
    fn write(&self, entry: &LogEntry) {
        self.lock().push(entry.clone());
    }
}
