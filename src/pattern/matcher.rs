//! Compiled URI patterns: matching, capture extraction, specificity order.
//!
//! # Responsibilities
//! - Compile a route template into an immutable segment sequence
//! - Match normalized request paths segment-by-segment
//! - Extract named variable captures
//! - Totally order patterns by specificity
//!
//! # Design Decisions
//! - `**` is greedy: it tries the longest consumption first and backs off
//!   until the remaining template is satisfied
//! - Specificity is a total order; the original template string is the final
//!   tie-break so sorting is deterministic
//! - Equality ignores variable names; `/u/${a}` and `/u/${b}` route the same

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{PatternError, PatternResult};
use crate::pattern::segment::{normalize_path, Segment};

/// A compiled route template.
#[derive(Debug, Clone)]
pub struct UriPattern {
    template: String,
    segments: Vec<Segment>,
}

impl UriPattern {
    /// Compile a template such as `/users/${id}/posts/**`.
    ///
    /// Fails on a template without a leading slash, a malformed variable
    /// segment, or a variable name repeated within the template.
    pub fn compile(template: &str) -> PatternResult<Self> {
        if !template.starts_with('/') {
            return Err(PatternError::Malformed {
                template: template.to_string(),
                reason: "template must begin with '/'".to_string(),
            });
        }

        let mut segments = Vec::new();
        let mut seen_variables = HashSet::new();
        for part in template.split('/').filter(|part| !part.is_empty()) {
            let segment = Segment::classify(part, template)?;
            if let Segment::Variable(name) = &segment {
                if !seen_variables.insert(name.clone()) {
                    return Err(PatternError::DuplicateVariable {
                        template: template.to_string(),
                        name: name.clone(),
                    });
                }
            }
            segments.push(segment);
        }

        Ok(Self {
            template: template.to_string(),
            segments,
        })
    }

    /// The original template string, kept for diagnostics.
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Names of the variables this pattern declares, in template order.
    pub fn variable_names(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Variable(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Whether `path` (normalized first) satisfies this pattern.
    pub fn matches(&self, path: &str) -> bool {
        let parts = normalize_path(path);
        let mut captures = Vec::new();
        match_from(&self.segments, &parts, &mut captures)
    }

    /// Captured variable values for `path`.
    ///
    /// Empty when the pattern declares no variables or the path does not
    /// match. When [`matches`](Self::matches) is true the map holds exactly
    /// one entry per declared variable.
    pub fn extract_params(&self, path: &str) -> HashMap<String, String> {
        let parts = normalize_path(path);
        let mut captures = Vec::new();
        if match_from(&self.segments, &parts, &mut captures) {
            captures.into_iter().collect()
        } else {
            HashMap::new()
        }
    }

    fn literal_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_literal()).count()
    }

    fn wild_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_wild()).count()
    }
}

/// Recursive segment matcher. Captures are pushed as variables consume path
/// segments and popped again on backtrack.
fn match_from(segments: &[Segment], parts: &[String], captures: &mut Vec<(String, String)>) -> bool {
    let Some((segment, rest)) = segments.split_first() else {
        return parts.is_empty();
    };

    match segment {
        Segment::Literal(text) => parts
            .split_first()
            .is_some_and(|(head, tail)| head == text && match_from(rest, tail, captures)),
        Segment::Wildcard => parts
            .split_first()
            .is_some_and(|(_, tail)| match_from(rest, tail, captures)),
        Segment::Variable(name) => parts.split_first().is_some_and(|(head, tail)| {
            captures.push((name.clone(), head.clone()));
            if match_from(rest, tail, captures) {
                true
            } else {
                captures.pop();
                false
            }
        }),
        Segment::DoubleWildcard => {
            // One or more segments, longest consumption first.
            (1..=parts.len())
                .rev()
                .any(|consumed| match_from(rest, &parts[consumed..], captures))
        }
    }
}

impl fmt::Display for UriPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.template)
    }
}

/// Equal iff segment kinds and literal texts line up; variable names and the
/// raw template string are ignored.
impl PartialEq for UriPattern {
    fn eq(&self, other: &Self) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|(a, b)| a.same_shape(b))
    }
}

impl Eq for UriPattern {}

impl Hash for UriPattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => {
                    0u8.hash(state);
                    text.hash(state);
                }
                Segment::Wildcard => 1u8.hash(state),
                Segment::DoubleWildcard => 2u8.hash(state),
                Segment::Variable(_) => 3u8.hash(state),
            }
        }
    }
}

/// Specificity order: the most specific pattern sorts first.
impl Ord for UriPattern {
    fn cmp(&self, other: &Self) -> Ordering {
        // Consistency with PartialEq: equal shapes compare equal even when
        // their variable names or templates differ.
        if self == other {
            return Ordering::Equal;
        }

        // More literal segments first.
        let by_literals = other.literal_count().cmp(&self.literal_count());
        if by_literals != Ordering::Equal {
            return by_literals;
        }

        // Fewer wildcard/variable segments first.
        let by_wild = self.wild_count().cmp(&other.wild_count());
        if by_wild != Ordering::Equal {
            return by_wild;
        }

        // At the first differing position a single-segment wildcard sorts
        // before a multi-segment one.
        for (a, b) in self.segments.iter().zip(&other.segments) {
            match (a, b) {
                (Segment::DoubleWildcard, Segment::DoubleWildcard) => {}
                (_, Segment::DoubleWildcard) if a.is_wild() => return Ordering::Less,
                (Segment::DoubleWildcard, _) if b.is_wild() => return Ordering::Greater,
                _ => {}
            }
        }

        // Lexicographic over literal texts, segment by segment.
        let literals_a = self.segments.iter().filter_map(|s| match s {
            Segment::Literal(text) => Some(text),
            _ => None,
        });
        let literals_b = other.segments.iter().filter_map(|s| match s {
            Segment::Literal(text) => Some(text),
            _ => None,
        });
        for (a, b) in literals_a.zip(literals_b) {
            let by_text = a.cmp(b);
            if by_text != Ordering::Equal {
                return by_text;
            }
        }

        // Final deterministic tie-break.
        self.template.cmp(&other.template)
    }
}

impl PartialOrd for UriPattern {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn pattern(template: &str) -> UriPattern {
        UriPattern::compile(template).expect("template should compile")
    }

    #[test]
    fn test_compile_rejects_missing_leading_slash() {
        assert!(matches!(
            UriPattern::compile("users/${id}"),
            Err(PatternError::Malformed { .. })
        ));
    }

    #[test]
    fn test_compile_rejects_duplicate_variable() {
        assert!(matches!(
            UriPattern::compile("/users/${id}/posts/${id}"),
            Err(PatternError::DuplicateVariable { name, .. }) if name == "id"
        ));
    }

    #[test]
    fn test_literal_match() {
        let p = pattern("/some/path");
        assert!(p.matches("/some/path"));
        assert!(!p.matches("/some/other"));
        assert!(!p.matches("/some/path/deeper"));
        assert!(!p.matches("/some"));
    }

    #[test]
    fn test_variable_consumes_exactly_one_segment() {
        let p = pattern("/users/${id}");
        assert!(p.matches("/users/42"));
        assert!(!p.matches("/users"));
        assert!(!p.matches("/users/42/posts"));
    }

    #[test]
    fn test_double_wildcard_requires_at_least_one_segment() {
        let p = pattern("/files/**");
        assert!(p.matches("/files/a"));
        assert!(p.matches("/files/a/b/c"));
        assert!(!p.matches("/files"));
    }

    #[test]
    fn test_double_wildcard_stops_at_anchor() {
        let p = pattern("/files/**/raw");
        assert!(p.matches("/files/a/raw"));
        assert!(p.matches("/files/a/b/raw"));
        assert!(!p.matches("/files/raw"));
        assert!(!p.matches("/files/a/b"));
    }

    #[test]
    fn test_match_normalizes_path_first() {
        let p = pattern("/some/path");
        assert!(p.matches("/some/./path"));
        assert!(p.matches("/some/extra/../path"));
        assert!(p.matches("//some//path/"));
    }

    #[test]
    fn test_spec_example_trailing_double_wildcard() {
        let p = pattern("/users/${id}/posts/**");
        assert!(p.matches("/users/42/posts/2024/01/hello"));
        assert!(!p.matches("/users/42"));

        let params = p.extract_params("/users/42/posts/2024/01/hello");
        assert_eq!(params.len(), 1);
        assert_eq!(params["id"], "42");
    }

    #[test]
    fn test_extract_params_one_entry_per_variable() {
        let p = pattern("/${a}/x/${b}");
        let params = p.extract_params("/1/x/2");
        assert_eq!(params.len(), 2);
        assert_eq!(params["a"], "1");
        assert_eq!(params["b"], "2");
    }

    #[test]
    fn test_extract_params_empty_without_match_or_variables() {
        assert!(pattern("/users/${id}").extract_params("/posts/42").is_empty());
        assert!(pattern("/files/**").extract_params("/files/a/b").is_empty());
    }

    #[test]
    fn test_specificity_prefers_literals() {
        assert!(pattern("/a/b") < pattern("/a/*"));
        assert!(pattern("/a/*") < pattern("/*/*"));
        assert!(pattern("/users/${id}") < pattern("/users/**"));
    }

    #[test]
    fn test_specificity_prefers_fewer_wildcards() {
        assert!(pattern("/a/b") < pattern("/a/b/*"));
        assert!(pattern("/a/b/*") < pattern("/a/b/*/*"));
    }

    #[test]
    fn test_specificity_single_before_double_wildcard() {
        assert!(pattern("/a/*") < pattern("/a/**"));
    }

    #[test]
    fn test_specificity_literal_text_tiebreak() {
        assert!(pattern("/alpha") < pattern("/beta"));
    }

    #[test]
    fn test_equal_shapes_compare_equal() {
        let a = pattern("/users/${id}");
        let b = pattern("/users/${userId}");
        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), Ordering::Equal);

        let mut ha = DefaultHasher::new();
        let mut hb = DefaultHasher::new();
        a.hash(&mut ha);
        b.hash(&mut hb);
        assert_eq!(ha.finish(), hb.finish());
    }

    #[test]
    fn test_variable_and_wildcard_are_distinct_shapes() {
        assert_ne!(pattern("/users/${id}"), pattern("/users/*"));
        assert_ne!(pattern("/users/*"), pattern("/users/**"));
    }

    #[test]
    fn test_specificity_is_antisymmetric() {
        let more = pattern("/users/${id}/posts");
        let less = pattern("/users/**");
        assert_eq!(more.cmp(&less), Ordering::Less);
        assert_eq!(less.cmp(&more), Ordering::Greater);
    }

    // Templates with repeated literal anchors around multiple `**` segments
    // are implementation-defined. This test documents the current greedy
    // behavior without asserting it is the only acceptable one.
    #[test]
    fn test_repeated_anchor_behavior_is_documented() {
        let p = pattern("/**/x/**/x");
        assert!(p.matches("/a/x/b/x"));
        assert!(p.matches("/a/x/b/x/c/x"));
        assert!(!p.matches("/a/x"));
    }
}
