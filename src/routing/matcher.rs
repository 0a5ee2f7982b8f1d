//! Path matching logic.
//!
//! # Responsibilities
//! - Compare a compiled pattern with a split request path
//! - Bind capture segments into a per-request [`Captures`] map
//!
//! # Design Decisions
//! - Segment counts must be equal; a mismatch short-circuits before any
//!   segment matcher runs, so no partial capture is ever produced
//! - Literal matching is exact and case-sensitive
//! - Captures are collected into a fresh map and only returned on success

use std::collections::HashMap;

use crate::routing::pattern::{Pattern, Segment};

/// Named values captured from a request path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captures {
    values: HashMap<String, String>,
}

impl Captures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a captured value by parameter name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Trait for matching a single path segment.
pub trait SegmentMatcher {
    /// Returns true if `text` is accepted, recording any binding in `captures`.
    fn match_segment(&self, text: &str, captures: &mut Captures) -> bool;
}

impl SegmentMatcher for Segment {
    fn match_segment(&self, text: &str, captures: &mut Captures) -> bool {
        match self {
            Segment::Literal(expected) => expected == text,
            Segment::Capture(name) => {
                if text.is_empty() {
                    return false;
                }
                captures.insert(name.as_str(), text);
                true
            }
        }
    }
}

/// Run `matchers` against `parts` pairwise.
///
/// Returns false without invoking any matcher when the lengths differ.
pub fn match_segments<M: SegmentMatcher>(
    matchers: &[M],
    parts: &[&str],
    captures: &mut Captures,
) -> bool {
    if matchers.len() != parts.len() {
        return false;
    }
    matchers
        .iter()
        .zip(parts)
        .all(|(matcher, part)| matcher.match_segment(part, captures))
}

/// Match a compiled pattern against a split request path.
pub fn match_path(pattern: &Pattern, parts: &[&str]) -> Option<Captures> {
    let mut captures = Captures::new();
    if match_segments(pattern.segments(), parts, &mut captures) {
        Some(captures)
    } else {
        None
    }
}
