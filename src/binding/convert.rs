//! Converters from raw request strings to typed field values.
//!
//! # Responsibilities
//! - Builtin conversions for every [`TargetType`]
//! - Named converter registry pluggable by the embedding application
//!
//! # Design Decisions
//! - Converters are selected by declarative data (a binding's converter name
//!   or the target property's declared type), never by subclassing
//! - A converter reports failure as a plain reason string; the binder wraps
//!   it with the parameter name and raw value

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::binding::target::{FieldValue, TargetType};

/// Raw parameter value(s) as received from the request.
#[derive(Debug, Clone, Copy)]
pub enum RawValue<'a> {
    /// A URI capture or a parameter with a single value.
    Single(&'a str),
    /// All values submitted under one name, in request order. Never empty.
    Multi(&'a [String]),
}

impl<'a> RawValue<'a> {
    /// First value; scalar conversions use this.
    pub fn first(&self) -> &'a str {
        match self {
            RawValue::Single(value) => value,
            RawValue::Multi(values) => values.first().map(String::as_str).unwrap_or(""),
        }
    }

    /// All values; list conversions use this.
    pub fn all(&self) -> Vec<String> {
        match self {
            RawValue::Single(value) => vec![value.to_string()],
            RawValue::Multi(values) => values.to_vec(),
        }
    }
}

/// A conversion from raw request text to one typed value.
pub trait Converter: Send + Sync {
    fn convert(&self, raw: RawValue<'_>) -> Result<FieldValue, String>;
}

struct TextConverter;

impl Converter for TextConverter {
    fn convert(&self, raw: RawValue<'_>) -> Result<FieldValue, String> {
        Ok(FieldValue::Text(raw.first().to_string()))
    }
}

struct TextListConverter;

impl Converter for TextListConverter {
    fn convert(&self, raw: RawValue<'_>) -> Result<FieldValue, String> {
        Ok(FieldValue::TextList(raw.all()))
    }
}

struct IntegerConverter;

impl Converter for IntegerConverter {
    fn convert(&self, raw: RawValue<'_>) -> Result<FieldValue, String> {
        raw.first()
            .trim()
            .parse::<i64>()
            .map(FieldValue::Integer)
            .map_err(|err| err.to_string())
    }
}

struct FloatConverter;

impl Converter for FloatConverter {
    fn convert(&self, raw: RawValue<'_>) -> Result<FieldValue, String> {
        raw.first()
            .trim()
            .parse::<f64>()
            .map(FieldValue::Float)
            .map_err(|err| err.to_string())
    }
}

struct BooleanConverter;

impl Converter for BooleanConverter {
    fn convert(&self, raw: RawValue<'_>) -> Result<FieldValue, String> {
        match raw.first().trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" => Ok(FieldValue::Boolean(true)),
            "false" | "no" | "off" => Ok(FieldValue::Boolean(false)),
            other => Err(format!("'{other}' is not a recognized boolean")),
        }
    }
}

struct DateConverter;

impl Converter for DateConverter {
    fn convert(&self, raw: RawValue<'_>) -> Result<FieldValue, String> {
        NaiveDate::parse_from_str(raw.first().trim(), "%Y-%m-%d")
            .map(FieldValue::Date)
            .map_err(|err| err.to_string())
    }
}

static TEXT: TextConverter = TextConverter;
static TEXT_LIST: TextListConverter = TextListConverter;
static INTEGER: IntegerConverter = IntegerConverter;
static FLOAT: FloatConverter = FloatConverter;
static BOOLEAN: BooleanConverter = BooleanConverter;
static DATE: DateConverter = DateConverter;

/// Builtin converter for a declared target type.
pub fn builtin_for(target: TargetType) -> &'static dyn Converter {
    match target {
        TargetType::Text => &TEXT,
        TargetType::TextList => &TEXT_LIST,
        TargetType::Integer => &INTEGER,
        TargetType::Float => &FLOAT,
        TargetType::Boolean => &BOOLEAN,
        TargetType::Date => &DATE,
    }
}

/// Named converters, extendable by the embedding application.
pub struct ConverterRegistry {
    by_name: HashMap<String, Box<dyn Converter>>,
}

impl ConverterRegistry {
    /// Registry with the builtins registered under their type names.
    pub fn with_builtins() -> Self {
        let mut registry = Self {
            by_name: HashMap::new(),
        };
        registry.register("text", Box::new(TextConverter));
        registry.register("text_list", Box::new(TextListConverter));
        registry.register("integer", Box::new(IntegerConverter));
        registry.register("float", Box::new(FloatConverter));
        registry.register("boolean", Box::new(BooleanConverter));
        registry.register("date", Box::new(DateConverter));
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, converter: Box<dyn Converter>) {
        self.by_name.insert(name.into(), converter);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Converter> {
        self.by_name.get(name).map(Box::as_ref)
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
