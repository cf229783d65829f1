//! Parameter binding subsystem.
//!
//! # Data Flow
//! ```text
//! raw params (query/body, name -> values) + URI captures (name -> value)
//!     → value precedence (URI wins over raw; absent means untouched)
//!     → convert.rs (named converter, or builtin for the property type)
//!     → target.rs (walk dotted accessor chain, invoke the mutator)
//! ```
//!
//! # Design Decisions
//! - The binder never invents a value: a binding absent from both sources
//!   leaves the form property at its default
//! - Scalar properties take the first submitted value; list properties take
//!   all of them
//! - Every failure carries the binding name plus the raw value or the
//!   missing accessor, so the shell can report it without unwrapping causes

pub mod convert;
pub mod target;

use std::collections::HashMap;

use tracing::trace;

use crate::descriptor::ParamBinding;
use crate::error::{BindError, BindResult};

pub use convert::{builtin_for, Converter, ConverterRegistry, RawValue};
pub use target::{BindTarget, FieldValue, TargetType};

/// Populates a form from raw request parameters and URI captures.
pub struct ParameterBinder<'a> {
    converters: &'a ConverterRegistry,
}

impl<'a> ParameterBinder<'a> {
    pub fn new(converters: &'a ConverterRegistry) -> Self {
        Self { converters }
    }

    /// Bind every declared parameter onto `target`.
    ///
    /// A name present in both `uri_params` and `raw_params` resolves to the
    /// URI value. A name present in neither source is skipped without
    /// touching the target.
    pub fn populate(
        &self,
        target: &mut dyn BindTarget,
        bindings: &[ParamBinding],
        raw_params: &HashMap<String, Vec<String>>,
        uri_params: &HashMap<String, String>,
    ) -> BindResult<()> {
        for binding in bindings {
            let raw = if let Some(value) = uri_params.get(&binding.name) {
                RawValue::Single(value)
            } else if let Some(values) = raw_params.get(&binding.name) {
                if values.is_empty() {
                    continue;
                }
                RawValue::Multi(values)
            } else {
                continue;
            };

            self.bind_one(target, binding, raw)?;
        }
        Ok(())
    }

    fn bind_one(
        &self,
        target: &mut dyn BindTarget,
        binding: &ParamBinding,
        raw: RawValue<'_>,
    ) -> BindResult<()> {
        // Walk the accessor chain down to the owner of the terminal property.
        let mut hops: Vec<&str> = binding.name.split('.').collect();
        let property = hops.pop().unwrap_or(binding.name.as_str());
        let mut current: &mut dyn BindTarget = target;
        for hop in hops {
            current = current
                .nested_mut(hop)
                .ok_or_else(|| BindError::MissingAccessor {
                    name: binding.name.clone(),
                    accessor: hop.to_string(),
                })?;
        }

        let property_type =
            current
                .property_type(property)
                .ok_or_else(|| BindError::MissingProperty {
                    name: binding.name.clone(),
                    property: property.to_string(),
                })?;

        let converter = match &binding.converter {
            Some(name) => {
                self.converters
                    .get(name)
                    .ok_or_else(|| BindError::UnknownConverter {
                        name: binding.name.clone(),
                        converter: name.clone(),
                    })?
            }
            None => builtin_for(property_type),
        };

        let value = converter
            .convert(raw)
            .map_err(|_| BindError::Conversion {
                name: binding.name.clone(),
                raw_value: raw.first().to_string(),
                target_type: property_type.to_string(),
            })?;

        trace!(name = %binding.name, ?value, "bound parameter");

        if !current.set_property(property, value) {
            return Err(BindError::MissingProperty {
                name: binding.name.clone(),
                property: property.to_string(),
            });
        }
        Ok(())
    }
}
