//! Bind targets and typed field values.
//!
//! # Responsibilities
//! - Define the property surface a form exposes to the binder
//! - Define the closed set of value types the builtin converters produce
//!
//! # Design Decisions
//! - No runtime reflection: forms implement [`BindTarget`] by hand (or via a
//!   macro in the embedding application), exposing accessors and mutators as
//!   plain method calls
//! - Nested properties are reached through `nested_mut`, one hop per call, so
//!   the binder can report exactly which accessor is missing

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Declared type of a settable property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    Text,
    TextList,
    Integer,
    Float,
    Boolean,
    Date,
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TargetType::Text => "text",
            TargetType::TextList => "text_list",
            TargetType::Integer => "integer",
            TargetType::Float => "float",
            TargetType::Boolean => "boolean",
            TargetType::Date => "date",
        };
        write!(f, "{name}")
    }
}

/// A converted value ready to hand to a mutator.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    TextList(Vec<String>),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Date(NaiveDate),
}

impl FieldValue {
    pub fn target_type(&self) -> TargetType {
        match self {
            FieldValue::Text(_) => TargetType::Text,
            FieldValue::TextList(_) => TargetType::TextList,
            FieldValue::Integer(_) => TargetType::Integer,
            FieldValue::Float(_) => TargetType::Float,
            FieldValue::Boolean(_) => TargetType::Boolean,
            FieldValue::Date(_) => TargetType::Date,
        }
    }
}

/// A form the binder can populate.
///
/// Property names are single hops; the binder splits dotted binding names
/// and walks `nested_mut` itself.
pub trait BindTarget {
    /// Declared type of a settable property, or `None` if the property does
    /// not exist on this target.
    fn property_type(&self, name: &str) -> Option<TargetType>;

    /// Invoke the mutator for `name`. Returns false when the property does
    /// not exist or the value type does not fit.
    fn set_property(&mut self, name: &str, value: FieldValue) -> bool;

    /// Descend into a nested property (a no-argument accessor). The default
    /// is a flat form with no nested properties.
    fn nested_mut(&mut self, _name: &str) -> Option<&mut dyn BindTarget> {
        None
    }
}
