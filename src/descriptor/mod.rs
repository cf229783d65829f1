//! Handler descriptors.
//!
//! # Data Flow
//! ```text
//! RouteMetadata + HandlerShape (from the external scanner)
//!     → HandlerDescriptor::resolve (shape validation, binding layout)
//!     → HandlerDescriptor (immutable, owned by the registry)
//! ```
//!
//! # Design Decisions
//! - Descriptors are built once at startup and never mutated; every resolve
//!   failure is fatal to registry construction
//! - A method fits a route either as a single form parameter or as a list of
//!   named parameters, never a mixture
//! - Specificity order: pattern, then method (concrete before Any), then
//!   descending binding count so the richer overload is consulted first

pub mod metadata;

use std::cmp::Ordering;

use crate::binding::TargetType;
use crate::error::{DescriptorError, DescriptorResult};
use crate::pattern::UriPattern;
use crate::request::{HttpMethod, RouteRequest};

pub use metadata::{
    DeclaredParam, HandlerShape, MethodShape, ParamShape, RoleDecl, RouteMetadata, WorkflowRole,
};

/// One parameter binding a descriptor carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamBinding {
    /// Binding name; may be a dotted accessor chain.
    pub name: String,

    pub target_type: TargetType,

    /// Named converter overriding the builtin for the target type.
    pub converter: Option<String>,
}

/// The compiled, immutable representation of one routable handler method.
#[derive(Debug, Clone)]
pub struct HandlerDescriptor {
    pattern: UriPattern,
    method: HttpMethod,
    handler_type: String,
    handler_method: String,
    form_type: Option<String>,
    bindings: Vec<ParamBinding>,
    workflow: Option<(WorkflowRole, String)>,
}

/// How the accepted method shape consumes its parameters.
enum BindingStyle {
    Form {
        type_name: String,
    },
    Named {
        bindings: Vec<ParamBinding>,
    },
}

impl HandlerDescriptor {
    /// Resolve a scanned route against the shape of its handler type.
    ///
    /// `shape` must describe `metadata.handler_type`; manifest loading (see
    /// [`crate::registry::HandlerRegistry::from_manifest`]) performs that
    /// lookup.
    pub fn resolve(metadata: &RouteMetadata, shape: &HandlerShape) -> DescriptorResult<Self> {
        let pattern = UriPattern::compile(&metadata.template)?;

        let candidates: Vec<&MethodShape> = shape
            .methods
            .iter()
            .filter(|method| method.name == metadata.method_name)
            .collect();
        if candidates.is_empty() {
            return Err(DescriptorError::NoSuchMethod {
                handler_type: metadata.handler_type.clone(),
                method_name: metadata.method_name.clone(),
            });
        }

        let mut accepted: Option<(&MethodShape, BindingStyle)> = None;
        let mut mismatch_reason = String::new();
        for candidate in candidates {
            match classify_shape(candidate, metadata)? {
                Ok(style) => {
                    if accepted.is_some() {
                        return Err(DescriptorError::AmbiguousShape {
                            handler_type: metadata.handler_type.clone(),
                            method_name: metadata.method_name.clone(),
                            reason: "more than one overload fits the declared parameters"
                                .to_string(),
                        });
                    }
                    accepted = Some((candidate, style));
                }
                Err(reason) => mismatch_reason = reason,
            }
        }

        let Some((method_shape, style)) = accepted else {
            return Err(DescriptorError::ParameterMismatch {
                handler_type: metadata.handler_type.clone(),
                method_name: metadata.method_name.clone(),
                reason: mismatch_reason,
            });
        };

        if method_shape.workflow.len() > 1 {
            return Err(DescriptorError::ConflictingRoles {
                handler_type: metadata.handler_type.clone(),
                method_name: metadata.method_name.clone(),
            });
        }
        let workflow = method_shape
            .workflow
            .first()
            .map(|decl| (decl.role, decl.workflow.clone()));

        let (form_type, bindings) = match style {
            BindingStyle::Form { type_name } => {
                // The form absorbs every declared parameter.
                let bindings = metadata
                    .declared_params
                    .iter()
                    .map(|param| ParamBinding {
                        name: param.name.clone(),
                        target_type: param.target_type,
                        converter: param.converter.clone(),
                    })
                    .collect();
                (Some(type_name), bindings)
            }
            BindingStyle::Named { bindings } => (None, bindings),
        };

        Ok(Self {
            pattern,
            method: metadata.method,
            handler_type: metadata.handler_type.clone(),
            handler_method: metadata.method_name.clone(),
            form_type,
            bindings,
            workflow,
        })
    }

    pub fn pattern(&self) -> &UriPattern {
        &self.pattern
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn handler_type(&self) -> &str {
        &self.handler_type
    }

    pub fn handler_method(&self) -> &str {
        &self.handler_method
    }

    pub fn form_type(&self) -> Option<&str> {
        self.form_type.as_deref()
    }

    pub fn bindings(&self) -> &[ParamBinding] {
        &self.bindings
    }

    /// Workflow role and name, or `None` for a stateless handler.
    pub fn workflow(&self) -> Option<(WorkflowRole, &str)> {
        self.workflow
            .as_ref()
            .map(|(role, name)| (*role, name.as_str()))
    }

    /// Pattern and method compatibility; the registry layers the parameter
    /// presence check on top.
    pub fn matches(&self, request: &RouteRequest) -> bool {
        self.method.accepts(request.method) && self.pattern.matches(&request.path)
    }

    /// Total specificity order used by the registry: pattern, then method
    /// (concrete before `Any`), then descending binding count, with the
    /// handler reference as a deterministic final tie-break.
    pub fn specificity_cmp(&self, other: &Self) -> Ordering {
        self.pattern
            .cmp(&other.pattern)
            .then_with(|| self.method.cmp(&other.method))
            .then_with(|| other.bindings.len().cmp(&self.bindings.len()))
            .then_with(|| self.handler_type.cmp(&other.handler_type))
            .then_with(|| self.handler_method.cmp(&other.handler_method))
    }

    /// Registry identity: two descriptors collide when their normalized
    /// patterns are equal and their methods conflict (`Any` conflicts with
    /// every concrete method).
    pub fn conflicts_with(&self, other: &Self) -> bool {
        self.pattern == other.pattern
            && (self.method == other.method || self.method.is_any() || other.method.is_any())
    }
}

/// Check one overload against the declared parameters. The outer error is
/// fatal (mixed shape); the inner `Err(reason)` just disqualifies the
/// candidate.
fn classify_shape(
    candidate: &MethodShape,
    metadata: &RouteMetadata,
) -> DescriptorResult<Result<BindingStyle, String>> {
    let mut form_type: Option<&str> = None;
    let mut named: Vec<&ParamShape> = Vec::new();
    for param in &candidate.params {
        match param {
            ParamShape::Form { type_name } => {
                if form_type.is_some() || !named.is_empty() {
                    return Err(DescriptorError::AmbiguousShape {
                        handler_type: metadata.handler_type.clone(),
                        method_name: metadata.method_name.clone(),
                        reason: "mixes form and named parameters".to_string(),
                    });
                }
                form_type = Some(type_name);
            }
            ParamShape::Named { .. } => {
                if form_type.is_some() {
                    return Err(DescriptorError::AmbiguousShape {
                        handler_type: metadata.handler_type.clone(),
                        method_name: metadata.method_name.clone(),
                        reason: "mixes form and named parameters".to_string(),
                    });
                }
                named.push(param);
            }
        }
    }

    if let Some(type_name) = form_type {
        return Ok(Ok(BindingStyle::Form {
            type_name: type_name.to_string(),
        }));
    }

    if named.len() != metadata.declared_params.len() {
        return Ok(Err(format!(
            "{} named parameters against {} declared",
            named.len(),
            metadata.declared_params.len()
        )));
    }

    let mut bindings = Vec::with_capacity(named.len());
    for (param, declared) in named.iter().zip(&metadata.declared_params) {
        let ParamShape::Named {
            name,
            target_type,
            converter,
        } = param
        else {
            unreachable!("named list only holds Named shapes");
        };
        if name != &declared.name {
            return Ok(Err(format!(
                "parameter '{name}' does not match declared '{}'",
                declared.name
            )));
        }
        if *target_type != declared.target_type {
            return Ok(Err(format!(
                "parameter '{name}' is {target_type} but declared {}",
                declared.target_type
            )));
        }
        bindings.push(ParamBinding {
            name: name.clone(),
            target_type: *target_type,
            converter: converter.clone().or_else(|| declared.converter.clone()),
        });
    }

    Ok(Ok(BindingStyle::Named { bindings }))
}
