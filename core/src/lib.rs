//! Builder-pattern construction and execution of HTTP requests.
//!
//! # Overview
//! Two builders compose in sequence:
//! `RequestSpecBuilder` → `RequestDescriptor` → `TaskBuilder` →
//! `ExecutableTask` → `run()`. Running a task performs one HTTP call on a
//! worker thread and, if the response is a 2xx JSON object, writes it to a
//! `DiagnosticSink`. Every other outcome is dropped silently.
//!
//! # Design
//! - Builders mutate private fields; `build()` snapshots them into immutable
//!   values and never touches the network.
//! - The network is an injected `Transport`, not global state, so tasks run
//!   against canned responses in tests.
//! - Misuse of a builder is a `ConfigurationError`. Runtime failures are
//!   never surfaced to the caller.
//!
//! ```no_run
//! use builder_core::{HttpMethod, RequestSpecBuilder, TaskBuilder};
//!
//! # fn main() -> Result<(), builder_core::ConfigurationError> {
//! let mut request = RequestSpecBuilder::new();
//! request
//!     .set_base_address("https://api.github.com")?
//!     .set_path("/search/repositories")
//!     .set_method(HttpMethod::Get)
//!     .add_header("Content-Type", "application/json")
//!     .add_parameter("q", "Builder Design Pattern");
//!
//! let task = TaskBuilder::new().set_request(request.build()?).build()?;
//! let _printed = task.run().wait();
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod http;
pub mod request;
pub mod sink;
pub mod task;
pub mod transport;

pub use error::{ConfigurationError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use request::{RequestDescriptor, RequestSpecBuilder};
pub use sink::{DiagnosticSink, MemorySink, StdoutSink};
pub use task::{handle_response, ExecutableTask, JsonObject, TaskBuilder, TaskHandle};
pub use transport::{Transport, UreqTransport};
