//! Route template compilation.
//!
//! A template such as `/models/:id` compiles to one [`Segment`] per
//! `/`-separated part. The leading slash produces an empty literal that
//! lines up with the empty first segment of every absolute request path.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors raised while compiling a route template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// A segment contained whitespace.
    #[error("invalid route template {template:?}: segment {segment:?} contains whitespace")]
    Whitespace { template: String, segment: String },
}

/// One compiled segment of a route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the request segment exactly.
    Literal(String),
    /// Matches any single non-empty segment and binds it to the name.
    Capture(String),
}

impl Segment {
    fn parse(template: &str, text: &str) -> Result<Self, PatternError> {
        if text.chars().any(char::is_whitespace) {
            return Err(PatternError::Whitespace {
                template: template.to_string(),
                segment: text.to_string(),
            });
        }

        match text.strip_prefix(':') {
            Some(name) if !name.is_empty() => Ok(Segment::Capture(name.to_string())),
            _ => Ok(Segment::Literal(text.to_string())),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal(text) => f.write_str(text),
            Segment::Capture(name) => write!(f, ":{}", name),
        }
    }
}

/// A compiled route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    segments: Vec<Segment>,
}

impl Pattern {
    /// Compile a template string.
    pub fn parse(template: &str) -> Result<Self, PatternError> {
        let segments = split_path(template)
            .into_iter()
            .map(|part| Segment::parse(template, part))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { segments })
    }

    /// Compiled segments in path order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments, including the leading empty one.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for Pattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Conversion into a compiled [`Pattern`].
///
/// Already-compiled patterns pass through unchanged.
pub trait IntoPattern {
    fn into_pattern(self) -> Result<Pattern, PatternError>;
}

impl IntoPattern for Pattern {
    fn into_pattern(self) -> Result<Pattern, PatternError> {
        Ok(self)
    }
}

impl IntoPattern for &str {
    fn into_pattern(self) -> Result<Pattern, PatternError> {
        Pattern::parse(self)
    }
}

impl IntoPattern for String {
    fn into_pattern(self) -> Result<Pattern, PatternError> {
        Pattern::parse(&self)
    }
}

/// Split a path on `/`, dropping a single trailing empty segment.
///
/// `"/models/"` and `"/models"` both yield `["", "models"]`.
pub fn split_path(path: &str) -> Vec<&str> {
    let mut parts: Vec<&str> = path.split('/').collect();
    if parts.last() == Some(&"") {
        parts.pop();
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("/models"), vec!["", "models"]);
        assert_eq!(split_path("/models/"), vec!["", "models"]);
        assert_eq!(split_path("/models/42"), vec!["", "models", "42"]);
        assert_eq!(split_path("/"), vec![""]);
        // Only one trailing empty segment is dropped
        assert_eq!(split_path("/models//"), vec!["", "models", ""]);
    }

    #[test]
    fn test_parse_literal_and_capture() {
        let pattern = Pattern::parse("/models/:id").unwrap();
        assert_eq!(
            pattern.segments(),
            &[
                Segment::Literal(String::new()),
                Segment::Literal("models".into()),
                Segment::Capture("id".into()),
            ]
        );
        assert_eq!(pattern.len(), 3);
    }

    #[test]
    fn test_trailing_slash_ignored() {
        assert_eq!(
            Pattern::parse("/models/").unwrap(),
            Pattern::parse("/models").unwrap()
        );
    }

    #[test]
    fn test_bare_colon_is_literal() {
        let pattern = Pattern::parse("/a/:").unwrap();
        assert_eq!(pattern.segments()[2], Segment::Literal(":".into()));
    }

    #[test]
    fn test_whitespace_rejected() {
        let err = Pattern::parse("/models/:the id").unwrap_err();
        assert!(matches!(err, PatternError::Whitespace { ref segment, .. } if segment == ":the id"));
        assert!(err.to_string().contains("whitespace"));

        assert!(Pattern::parse("/ models").is_err());
        assert!(Pattern::parse("/models\t").is_err());
    }

    #[test]
    fn test_into_pattern_passthrough() {
        let compiled = Pattern::parse("/models/:id").unwrap();
        assert_eq!(compiled.clone().into_pattern().unwrap(), compiled);
        assert_eq!("/models/:id".into_pattern().unwrap(), compiled);
        assert_eq!(String::from("/models/:id").into_pattern().unwrap(), compiled);
    }

    #[test]
    fn test_display_round_trips_template() {
        let pattern: Pattern = "/models/:id".parse().unwrap();
        assert_eq!(pattern.to_string(), "/models/:id");
    }
}
