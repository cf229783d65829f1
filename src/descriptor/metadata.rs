//! Discovery contract types.
//!
//! # Responsibilities
//! - Define the plain data records an external scanner produces
//! - Stay serde-friendly so a route manifest can travel as JSON
//!
//! # Design Decisions
//! - No runtime type introspection anywhere in the core: the scanner renders
//!   handler classes into [`HandlerShape`] records ahead of time, and the
//!   descriptor resolver works purely on that data

use serde::{Deserialize, Serialize};

use crate::binding::TargetType;
use crate::request::HttpMethod;

/// One scanned route declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteMetadata {
    /// Route template, e.g. `/users/${id}/posts/**`.
    pub template: String,

    /// Declared method; `Any` accepts every concrete method.
    pub method: HttpMethod,

    /// Fully qualified handler type name.
    pub handler_type: String,

    /// Name of the handler method fielding the route.
    pub method_name: String,

    /// Parameters the route declares, in binding order.
    #[serde(default)]
    pub declared_params: Vec<DeclaredParam>,
}

/// One declared route parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredParam {
    /// Binding name; may be a dotted accessor chain such as `address.city`.
    pub name: String,

    pub target_type: TargetType,

    /// Named converter overriding the builtin for `target_type`.
    #[serde(default)]
    pub converter: Option<String>,
}

/// The scanned shape of one handler type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandlerShape {
    pub type_name: String,
    pub methods: Vec<MethodShape>,
}

impl HandlerShape {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            methods: Vec::new(),
        }
    }

    pub fn with_method(mut self, method: MethodShape) -> Self {
        self.methods.push(method);
        self
    }
}

/// The scanned shape of one handler method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodShape {
    pub name: String,

    /// Whether the method takes the shell's context object as its first
    /// argument. The context never participates in binding.
    #[serde(default)]
    pub takes_context: bool,

    /// Non-context parameters, in signature order.
    #[serde(default)]
    pub params: Vec<ParamShape>,

    /// Workflow role declarations found on the method. More than one is
    /// rejected during descriptor resolution.
    #[serde(default)]
    pub workflow: Vec<RoleDecl>,
}

impl MethodShape {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            takes_context: true,
            params: Vec::new(),
            workflow: Vec::new(),
        }
    }

    pub fn with_param(mut self, param: ParamShape) -> Self {
        self.params.push(param);
        self
    }

    pub fn with_role(mut self, role: WorkflowRole, workflow: impl Into<String>) -> Self {
        self.workflow.push(RoleDecl {
            role,
            workflow: workflow.into(),
        });
        self
    }
}

/// One non-context parameter of a handler method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParamShape {
    /// A single unannotated form object populated by the binder.
    Form { type_name: String },
    /// An individually named parameter.
    Named {
        name: String,
        target_type: TargetType,
        #[serde(default)]
        converter: Option<String>,
    },
}

/// A workflow role declared on a handler method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDecl {
    pub role: WorkflowRole,
    pub workflow: String,
}

/// How a handler method participates in a workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowRole {
    /// Creates the session-scoped handler/form pair.
    Initiates,
    /// Loads the stored pair; fails if the workflow is not active.
    Resumes,
    /// Loads like `Resumes`, then tears the pair down after the handler runs.
    Completes,
}
