//! Destinations for successfully parsed response objects.

use std::io::Write;
use std::sync::Mutex;

use crate::task::JsonObject;

/// Receives the JSON object produced by a successful task run.
///
/// Called at most once per task, from the task's worker thread.
pub trait DiagnosticSink: Send + Sync {
    fn write(&self, object: &JsonObject);
}

/// Pretty-prints each object to stdout. The default sink.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl DiagnosticSink for StdoutSink {
    fn write(&self, object: &JsonObject) {
        let rendered = serde_json::to_string_pretty(object).unwrap_or_default();
        let mut stdout = std::io::stdout().lock();
        // A closed stdout is just another place the output can silently vanish.
        let _ = writeln!(stdout, "{rendered}");
    }
}

/// Keeps every written object in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    objects: Mutex<Vec<JsonObject>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything written so far, in write order.
    pub fn objects(&self) -> Vec<JsonObject> {
        match self.objects.lock() {
            Ok(objects) => objects.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl DiagnosticSink for MemorySink {
    fn write(&self, object: &JsonObject) {
        match self.objects.lock() {
            Ok(mut objects) => objects.push(object.clone()),
            Err(poisoned) => poisoned.into_inner().push(object.clone()),
        }
    }
}
