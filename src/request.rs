//! Request adapter types.
//!
//! # Responsibilities
//! - Define the method/path/params shape the dispatch shell hands to the registry
//! - Model the `Any` method wildcard used by route declarations
//!
//! # Design Decisions
//! - The core never reads a network request directly; the shell adapts its own
//!   request type into [`RouteRequest`]
//! - Query and body parameters arrive pre-merged as a name -> values multimap;
//!   multipart extraction happens upstream and feeds the same map

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// HTTP method of a route declaration or an incoming request.
///
/// `Any` is only meaningful on declarations: it accepts every concrete method
/// and sorts after all of them, so concrete routes win on specificity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Head,
    Options,
    Trace,
    Patch,
    Any,
}

impl HttpMethod {
    /// Returns true if a route declared with this method accepts a request
    /// carrying `concrete`.
    pub fn accepts(self, concrete: HttpMethod) -> bool {
        self == HttpMethod::Any || self == concrete
    }

    pub fn is_any(self) -> bool {
        self == HttpMethod::Any
    }
}

/// An incoming request, adapted by the dispatch shell.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    /// Concrete request method (never `Any`).
    pub method: HttpMethod,

    /// Request path, un-normalized; patterns normalize before matching.
    pub path: String,

    /// Union of query and body parameters.
    pub params: HashMap<String, Vec<String>>,

    /// Session identifier scoping workflow state.
    pub session_id: String,
}

impl RouteRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: HashMap::new(),
            session_id: String::new(),
        }
    }

    /// Add a single-valued parameter; repeated names accumulate values.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params
            .entry(name.into())
            .or_default()
            .push(value.into());
        self
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }
}
