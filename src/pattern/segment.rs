//! Template segment classification and path normalization.
//!
//! # Responsibilities
//! - Classify one template segment as literal, wildcard, or variable
//! - Normalize request paths (collapse `.`, `..`, and empty segments)
//!
//! # Design Decisions
//! - `..` popping past the root is ignored rather than rejected, so a hostile
//!   path can never climb above the route space

use std::fmt;

use crate::error::PatternError;

/// One segment of a compiled route template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Exact text match.
    Literal(String),
    /// `*`: consumes exactly one path segment.
    Wildcard,
    /// `**`: consumes one or more path segments.
    DoubleWildcard,
    /// `${name}`: consumes exactly one path segment and captures it.
    Variable(String),
}

impl Segment {
    /// Classify one raw template segment.
    ///
    /// `template` is only used for error context.
    pub fn classify(text: &str, template: &str) -> Result<Segment, PatternError> {
        match text {
            "*" => Ok(Segment::Wildcard),
            "**" => Ok(Segment::DoubleWildcard),
            _ if text.starts_with("${") => {
                let name = text
                    .strip_prefix("${")
                    .and_then(|rest| rest.strip_suffix('}'))
                    .filter(|name| !name.is_empty())
                    .ok_or_else(|| PatternError::Malformed {
                        template: template.to_string(),
                        reason: format!("invalid variable segment '{text}'"),
                    })?;
                Ok(Segment::Variable(name.to_string()))
            }
            _ if text.contains("${") => Err(PatternError::Malformed {
                template: template.to_string(),
                reason: format!("variable must span the whole segment in '{text}'"),
            }),
            _ => Ok(Segment::Literal(text.to_string())),
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Segment::Literal(_))
    }

    /// True for every segment kind that consumes path text without naming it
    /// exactly: `*`, `**`, and variables.
    pub fn is_wild(&self) -> bool {
        !self.is_literal()
    }

    /// Shape equality: literals compare by text, variables ignore their name.
    pub fn same_shape(&self, other: &Segment) -> bool {
        match (self, other) {
            (Segment::Literal(a), Segment::Literal(b)) => a == b,
            (Segment::Wildcard, Segment::Wildcard) => true,
            (Segment::DoubleWildcard, Segment::DoubleWildcard) => true,
            (Segment::Variable(_), Segment::Variable(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal(text) => write!(f, "{text}"),
            Segment::Wildcard => write!(f, "*"),
            Segment::DoubleWildcard => write!(f, "**"),
            Segment::Variable(name) => write!(f, "${{{name}}}"),
        }
    }
}

/// Collapse `.`, `..`, and empty segments out of a request path.
pub fn normalize_path(path: &str) -> Vec<String> {
    let mut segments: Vec<String> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other.to_string()),
        }
    }
    segments
}
