//! Builder for one-shot network tasks and their completion handling.
//!
//! # Design
//! `TaskBuilder` pairs a `RequestDescriptor` with a `Transport` and a
//! `DiagnosticSink`. `ExecutableTask::run` consumes the task, performs exactly
//! one transport call on a worker thread and returns immediately with a
//! `TaskHandle`.
//!
//! Failures are swallowed on purpose. A transport error, a status outside
//! `200..300`, a body that is not JSON, or JSON that is not an object all end
//! the task with no output and a `None` result. Drop reasons are visible only
//! as `debug` tracing events.

use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use serde_json::Value;
use tracing::{debug, trace};

use crate::error::{ConfigurationError, TransportError};
use crate::http::HttpResponse;
use crate::request::RequestDescriptor;
use crate::sink::{DiagnosticSink, StdoutSink};
use crate::transport::{Transport, UreqTransport};

/// A parsed JSON object: string keys to arbitrary JSON values.
pub type JsonObject = serde_json::Map<String, Value>;

/// Accumulates what an `ExecutableTask` needs.
///
/// Only the request is mandatory. Transport defaults to `UreqTransport`,
/// sink defaults to `StdoutSink`.
#[derive(Default)]
pub struct TaskBuilder {
    request: Option<RequestDescriptor>,
    transport: Option<Arc<dyn Transport>>,
    sink: Option<Arc<dyn DiagnosticSink>>,
}

impl TaskBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_request(&mut self, descriptor: RequestDescriptor) -> &mut Self {
        self.request = Some(descriptor);
        self
    }

    pub fn set_transport(&mut self, transport: Arc<dyn Transport>) -> &mut Self {
        self.transport = Some(transport);
        self
    }

    pub fn set_sink(&mut self, sink: Arc<dyn DiagnosticSink>) -> &mut Self {
        self.sink = Some(sink);
        self
    }

    /// Produce a task that has not issued any network call yet.
    pub fn build(&self) -> Result<ExecutableTask, ConfigurationError> {
        let descriptor = self
            .request
            .clone()
            .ok_or(ConfigurationError::MissingRequest)?;
        let transport = self
            .transport
            .clone()
            .unwrap_or_else(|| Arc::new(UreqTransport::new()));
        let sink = self.sink.clone().unwrap_or_else(|| Arc::new(StdoutSink));

        debug!(url = %descriptor.url(), "built task");
        Ok(ExecutableTask {
            descriptor,
            transport,
            sink,
        })
    }
}

impl fmt::Debug for TaskBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskBuilder")
            .field("request", &self.request)
            .field("transport", &self.transport.is_some())
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

/// A built, not yet started network task.
pub struct ExecutableTask {
    descriptor: RequestDescriptor,
    transport: Arc<dyn Transport>,
    sink: Arc<dyn DiagnosticSink>,
}

impl ExecutableTask {
    pub fn descriptor(&self) -> &RequestDescriptor {
        &self.descriptor
    }

    /// Start the network call and return without waiting for it.
    ///
    /// The completion handler runs exactly once on a worker thread. On success
    /// the parsed object is written to the sink before the handle resolves.
    pub fn run(self) -> TaskHandle {
        let ExecutableTask {
            descriptor,
            transport,
            sink,
        } = self;
        debug!(method = %descriptor.method(), url = %descriptor.url(), "dispatching task");

        let spawned = thread::Builder::new()
            .name("builder-task".to_string())
            .spawn(move || {
                let result = transport.execute(descriptor.request());
                let object = handle_response(result)?;
                sink.write(&object);
                Some(object)
            });

        match spawned {
            Ok(worker) => TaskHandle {
                worker: Some(worker),
            },
            Err(e) => {
                debug!(error = %e, "dropping task: worker thread could not be spawned");
                TaskHandle { worker: None }
            }
        }
    }
}

impl fmt::Debug for ExecutableTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutableTask")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// Handle to a running task.
///
/// Dropping the handle detaches the worker; the call still completes and the
/// sink still receives its output.
#[derive(Debug)]
pub struct TaskHandle {
    worker: Option<JoinHandle<Option<JsonObject>>>,
}

impl TaskHandle {
    /// True once the completion handler has fired.
    pub fn is_finished(&self) -> bool {
        self.worker.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Block until completion. `None` on every failure path.
    pub fn wait(self) -> Option<JsonObject> {
        self.worker?.join().ok().flatten()
    }
}

/// Completion policy for a task: keep only a 2xx response whose body is a
/// JSON object.
pub fn handle_response(result: Result<HttpResponse, TransportError>) -> Option<JsonObject> {
    let response = match result {
        Ok(response) => response,
        Err(e) => {
            debug!(error = %e, "dropping response: transport failure");
            return None;
        }
    };
    trace!(
        status = response.status,
        content_type = response.header("content-type").unwrap_or(""),
        bytes = response.body.len(),
        "response received"
    );

    if !response.is_success() {
        debug!(status = response.status, "dropping response: non-success status");
        return None;
    }

    match serde_json::from_slice::<Value>(&response.body) {
        Ok(Value::Object(object)) => Some(object),
        Ok(_) => {
            debug!("dropping response: JSON body is not an object");
            None
        }
        Err(e) => {
            debug!(error = %e, "dropping response: body is not JSON");
            None
        }
    }
}
