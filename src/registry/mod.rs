//! Handler registry.
//!
//! # Data Flow
//! ```text
//! HandlerDescriptor (resolved at startup)
//!     → add (duplicate check, ordered insert)
//!     → frozen Vec, most specific first
//!
//! RouteRequest
//!     → find_match (method, pattern, parameter presence)
//!     → Some(&HandlerDescriptor) or None
//! ```
//!
//! # Design Decisions
//! - Construction is single-threaded and happens once; afterwards the
//!   registry is read-only and safe to share across request tasks
//! - Descriptors live in one Vec kept totally ordered by specificity, so the
//!   first full match is the answer and the outcome is independent of
//!   insertion order
//! - No match is `None`, never an error; fallback policy belongs to the
//!   dispatch shell

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::descriptor::{HandlerDescriptor, HandlerShape, RouteMetadata};
use crate::error::{DescriptorError, RegistryError, RegistryResult};
use crate::request::RouteRequest;

/// The specificity-ordered set of every routable handler method.
#[derive(Debug, Default)]
pub struct HandlerRegistry {
    descriptors: Vec<HandlerDescriptor>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a scanned manifest: one shape per handler type,
    /// one metadata record per route.
    pub fn from_manifest(
        routes: &[RouteMetadata],
        shapes: &[HandlerShape],
    ) -> RegistryResult<Self> {
        let by_type: HashMap<&str, &HandlerShape> = shapes
            .iter()
            .map(|shape| (shape.type_name.as_str(), shape))
            .collect();

        let mut registry = Self::new();
        for route in routes {
            let shape = by_type.get(route.handler_type.as_str()).ok_or_else(|| {
                DescriptorError::UnknownHandlerType {
                    type_name: route.handler_type.clone(),
                }
            })?;
            registry.add(HandlerDescriptor::resolve(route, shape)?)?;
        }
        Ok(registry)
    }

    /// Insert a descriptor at its specificity rank.
    ///
    /// Fails when an equal (pattern, method) pair is already registered;
    /// `Any` conflicts with every concrete method on an equal pattern.
    pub fn add(&mut self, descriptor: HandlerDescriptor) -> RegistryResult<()> {
        if self
            .descriptors
            .iter()
            .any(|existing| existing.conflicts_with(&descriptor))
        {
            return Err(RegistryError::DuplicateRoute {
                template: descriptor.pattern().template().to_string(),
                method: descriptor.method(),
            });
        }

        debug!(
            template = %descriptor.pattern(),
            method = ?descriptor.method(),
            handler = %descriptor.handler_type(),
            "registered route"
        );

        let at = self
            .descriptors
            .partition_point(|existing| existing.specificity_cmp(&descriptor).is_lt());
        self.descriptors.insert(at, descriptor);
        Ok(())
    }

    /// The most specific descriptor satisfied by `request`, if any.
    ///
    /// A descriptor is satisfied when its pattern matches the path, its
    /// method accepts the request method, and every declared binding name is
    /// present among the request parameters or the extracted URI variables.
    pub fn find_match(&self, request: &RouteRequest) -> Option<&HandlerDescriptor> {
        for descriptor in &self.descriptors {
            if !descriptor.matches(request) {
                continue;
            }

            let uri_params = descriptor.pattern().extract_params(&request.path);
            let satisfied = descriptor.bindings().iter().all(|binding| {
                request.params.contains_key(&binding.name)
                    || uri_params.contains_key(&binding.name)
            });
            if satisfied {
                trace!(
                    path = %request.path,
                    template = %descriptor.pattern(),
                    "matched route"
                );
                return Some(descriptor);
            }
        }
        None
    }

    pub fn iter(&self) -> impl Iterator<Item = &HandlerDescriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::TargetType;
    use crate::descriptor::{DeclaredParam, MethodShape, ParamShape};
    use crate::request::HttpMethod;

    fn shape() -> HandlerShape {
        HandlerShape::new("app.SampleHandler")
            .with_method(MethodShape::new("handle"))
            .with_method(
                MethodShape::new("show").with_param(ParamShape::Named {
                    name: "id".to_string(),
                    target_type: TargetType::Integer,
                    converter: None,
                }),
            )
    }

    fn route(template: &str, method: HttpMethod) -> RouteMetadata {
        RouteMetadata {
            template: template.to_string(),
            method,
            handler_type: "app.SampleHandler".to_string(),
            method_name: "handle".to_string(),
            declared_params: Vec::new(),
        }
    }

    fn descriptor(template: &str, method: HttpMethod) -> HandlerDescriptor {
        HandlerDescriptor::resolve(&route(template, method), &shape()).unwrap()
    }

    #[test]
    fn test_duplicate_pattern_and_method_rejected() {
        let mut registry = HandlerRegistry::new();
        registry.add(descriptor("/pattern", HttpMethod::Get)).unwrap();

        assert!(matches!(
            registry.add(descriptor("/pattern", HttpMethod::Get)),
            Err(RegistryError::DuplicateRoute { .. })
        ));
    }

    #[test]
    fn test_same_pattern_distinct_methods_coexist() {
        let mut registry = HandlerRegistry::new();
        registry.add(descriptor("/pattern", HttpMethod::Get)).unwrap();
        registry.add(descriptor("/pattern", HttpMethod::Post)).unwrap();
        assert_eq!(registry.len(), 2);

        let get = RouteRequest::new(HttpMethod::Get, "/pattern");
        let post = RouteRequest::new(HttpMethod::Post, "/pattern");
        assert_eq!(registry.find_match(&get).unwrap().method(), HttpMethod::Get);
        assert_eq!(
            registry.find_match(&post).unwrap().method(),
            HttpMethod::Post
        );
    }

    #[test]
    fn test_any_conflicts_with_concrete_in_both_orders() {
        let mut registry = HandlerRegistry::new();
        registry.add(descriptor("/pattern", HttpMethod::Any)).unwrap();
        assert!(registry.add(descriptor("/pattern", HttpMethod::Get)).is_err());

        let mut registry = HandlerRegistry::new();
        registry.add(descriptor("/pattern", HttpMethod::Get)).unwrap();
        assert!(registry.add(descriptor("/pattern", HttpMethod::Any)).is_err());
    }

    #[test]
    fn test_equal_patterns_with_renamed_variables_conflict() {
        let mut registry = HandlerRegistry::new();
        registry
            .add(descriptor("/users/${id}", HttpMethod::Get))
            .unwrap();
        assert!(registry
            .add(descriptor("/users/${userId}", HttpMethod::Get))
            .is_err());
    }

    #[test]
    fn test_most_specific_descriptor_wins() {
        let mut registry = HandlerRegistry::new();
        registry.add(descriptor("/users/**", HttpMethod::Get)).unwrap();
        registry
            .add(descriptor("/users/${id}", HttpMethod::Get))
            .unwrap();
        registry
            .add(descriptor("/users/admin", HttpMethod::Get))
            .unwrap();

        let request = RouteRequest::new(HttpMethod::Get, "/users/admin");
        assert_eq!(
            registry.find_match(&request).unwrap().pattern().template(),
            "/users/admin"
        );

        let request = RouteRequest::new(HttpMethod::Get, "/users/42");
        assert_eq!(
            registry.find_match(&request).unwrap().pattern().template(),
            "/users/${id}"
        );

        let request = RouteRequest::new(HttpMethod::Get, "/users/42/posts");
        assert_eq!(
            registry.find_match(&request).unwrap().pattern().template(),
            "/users/**"
        );
    }

    #[test]
    fn test_outcome_is_insertion_order_independent() {
        let templates = ["/users/**", "/users/${id}", "/users/admin"];

        let mut forward = HandlerRegistry::new();
        for template in templates {
            forward.add(descriptor(template, HttpMethod::Get)).unwrap();
        }
        let mut backward = HandlerRegistry::new();
        for template in templates.iter().rev() {
            backward.add(descriptor(template, HttpMethod::Get)).unwrap();
        }

        for path in ["/users/admin", "/users/42", "/users/a/b"] {
            let request = RouteRequest::new(HttpMethod::Get, path);
            assert_eq!(
                forward.find_match(&request).unwrap().pattern().template(),
                backward.find_match(&request).unwrap().pattern().template(),
                "divergent outcome for {path}"
            );
        }
    }

    #[test]
    fn test_binding_names_must_be_present() {
        let mut meta = route("/users/detail", HttpMethod::Get);
        meta.method_name = "show".to_string();
        meta.declared_params = vec![DeclaredParam {
            name: "id".to_string(),
            target_type: TargetType::Integer,
            converter: None,
        }];
        let with_param = HandlerDescriptor::resolve(&meta, &shape()).unwrap();

        let mut registry = HandlerRegistry::new();
        registry.add(with_param).unwrap();

        let bare = RouteRequest::new(HttpMethod::Get, "/users/detail");
        assert!(registry.find_match(&bare).is_none());

        let satisfied = RouteRequest::new(HttpMethod::Get, "/users/detail").with_param("id", "42");
        assert!(registry.find_match(&satisfied).is_some());
    }

    #[test]
    fn test_uri_variables_satisfy_binding_presence() {
        let mut meta = route("/users/${id}", HttpMethod::Get);
        meta.method_name = "show".to_string();
        meta.declared_params = vec![DeclaredParam {
            name: "id".to_string(),
            target_type: TargetType::Integer,
            converter: None,
        }];
        let mut registry = HandlerRegistry::new();
        registry
            .add(HandlerDescriptor::resolve(&meta, &shape()).unwrap())
            .unwrap();

        let request = RouteRequest::new(HttpMethod::Get, "/users/42");
        assert!(registry.find_match(&request).is_some());
    }

    #[test]
    fn test_no_match_is_none() {
        let mut registry = HandlerRegistry::new();
        registry.add(descriptor("/users", HttpMethod::Get)).unwrap();

        assert!(registry
            .find_match(&RouteRequest::new(HttpMethod::Get, "/posts"))
            .is_none());
        assert!(registry
            .find_match(&RouteRequest::new(HttpMethod::Post, "/users"))
            .is_none());
    }

    #[test]
    fn test_any_route_accepts_every_method() {
        let mut registry = HandlerRegistry::new();
        registry.add(descriptor("/health", HttpMethod::Any)).unwrap();

        for method in [HttpMethod::Get, HttpMethod::Post, HttpMethod::Delete] {
            assert!(registry
                .find_match(&RouteRequest::new(method, "/health"))
                .is_some());
        }
    }
}
