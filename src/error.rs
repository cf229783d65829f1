//! Error taxonomy for the routing core.
//!
//! # Responsibilities
//! - Startup-fatal errors: template compilation, descriptor resolution, registry insertion
//! - Per-request errors: parameter binding, workflow state
//!
//! # Design Decisions
//! - Closed enums with structured fields instead of nested cause chains
//! - Startup errors abort registry construction; request errors never touch the registry
//! - Nothing here is transient; no error is retried internally

use thiserror::Error;

use crate::request::HttpMethod;

/// Result alias for template compilation.
pub type PatternResult<T> = Result<T, PatternError>;

/// Result alias for descriptor resolution.
pub type DescriptorResult<T> = Result<T, DescriptorError>;

/// Result alias for registry construction.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Result alias for parameter binding.
pub type BindResult<T> = Result<T, BindError>;

/// Result alias for workflow continuation.
pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Raised while compiling a route template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("malformed template '{template}': {reason}")]
    Malformed { template: String, reason: String },

    #[error("duplicate variable '{name}' in template '{template}'")]
    DuplicateVariable { template: String, name: String },
}

/// Raised while resolving route metadata against a handler shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error("no handler shape registered for type '{type_name}'")]
    UnknownHandlerType { type_name: String },

    #[error("handler type '{handler_type}' has no method named '{method_name}'")]
    NoSuchMethod {
        handler_type: String,
        method_name: String,
    },

    #[error("method '{method_name}' on '{handler_type}' has an ambiguous shape: {reason}")]
    AmbiguousShape {
        handler_type: String,
        method_name: String,
        reason: String,
    },

    #[error("method '{method_name}' on '{handler_type}' does not fit the declared parameters: {reason}")]
    ParameterMismatch {
        handler_type: String,
        method_name: String,
        reason: String,
    },

    #[error("method '{method_name}' on '{handler_type}' declares more than one workflow role")]
    ConflictingRoles {
        handler_type: String,
        method_name: String,
    },
}

/// Raised while inserting descriptors into the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    #[error("route '{template}' is already registered for method {method:?}")]
    DuplicateRoute {
        template: String,
        method: HttpMethod,
    },
}

/// Raised while binding request parameters onto a form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("cannot convert '{raw_value}' for parameter '{name}' into {target_type}")]
    Conversion {
        name: String,
        raw_value: String,
        target_type: String,
    },

    #[error("no converter named '{converter}' registered for parameter '{name}'")]
    UnknownConverter { name: String, converter: String },

    #[error("binding '{name}' has no accessor '{accessor}' on the target")]
    MissingAccessor { name: String, accessor: String },

    #[error("binding '{name}' has no settable property '{property}' on the target")]
    MissingProperty { name: String, property: String },
}

/// Raised while resolving workflow continuation state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("workflow '{workflow}' is not active in this session")]
    NotActive { workflow: String },

    #[error("no factory registered for instance type '{type_name}'")]
    UnknownInstanceType { type_name: String },
}
