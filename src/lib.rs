//! Request-to-handler routing core.
//!
//! A library that resolves an incoming request to exactly one handler
//! descriptor, binds request parameters onto a form, and manages
//! session-scoped workflow state across a multi-request interaction. The
//! network boundary, route discovery, and multipart parsing live in the
//! dispatch shell that embeds this crate.
//!
//! # Architecture Overview
//!
//! ```text
//!   discovery scan (external)
//!       │  RouteMetadata + HandlerShape
//!       ▼
//!   ┌───────────┐    ┌──────────┐    ┌───────────┐
//!   │descriptor │───▶│ registry │◀───│  pattern  │
//!   │ (resolve) │    │ (ordered)│    │ (compile) │
//!   └───────────┘    └────┬─────┘    └───────────┘
//!                         │ find_match(RouteRequest)
//!                         ▼
//!                   ┌───────────┐    ┌───────────┐
//!                   │ workflow  │───▶│  binding  │
//!                   │ (resolve) │    │ (populate)│
//!                   └───────────┘    └───────────┘
//!                         │
//!                         ▼
//!                dispatch shell invokes the handler
//! ```
//!
//! Registry construction is single-threaded and happens once before serving
//! traffic; afterwards every operation here is a pure in-memory computation
//! on request-local state, except the session store reads and writes the
//! workflow subsystem performs on the shell's behalf.

pub mod binding;
pub mod descriptor;
pub mod error;
pub mod pattern;
pub mod registry;
pub mod request;
pub mod workflow;

pub use binding::{BindTarget, ConverterRegistry, FieldValue, ParameterBinder, TargetType};
pub use descriptor::{HandlerDescriptor, HandlerShape, ParamBinding, RouteMetadata, WorkflowRole};
pub use error::{BindError, DescriptorError, PatternError, RegistryError, WorkflowError};
pub use pattern::UriPattern;
pub use registry::HandlerRegistry;
pub use request::{HttpMethod, RouteRequest};
pub use workflow::{
    Continuation, InstanceFactory, MemorySessionStore, SessionStore, WorkflowContinuation,
};
