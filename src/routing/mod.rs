//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     "/models/:id"
//!     → pattern.rs (split on '/', classify segments)
//!     → Pattern [Literal(""), Literal("models"), Capture("id")]
//!     → router.rs (append to RouteTable under its method)
//!
//! Incoming Request (method, path):
//!     → pattern::split_path (segments)
//!     → router.rs (routes for the method, declaration order)
//!     → matcher.rs (segment count check, then segment-by-segment)
//!     → Return: (handler, captures) or no match
//! ```
//!
//! # Design Decisions
//! - Routes compiled once, immutable at runtime
//! - No regex: literal equality or single-segment capture
//! - Segment counts must be equal; no wildcards or optional segments
//! - First match wins (declaration order)

pub mod matcher;
pub mod pattern;
pub mod router;

pub use matcher::{match_path, Captures, SegmentMatcher};
pub use pattern::{split_path, IntoPattern, Pattern, PatternError, Segment};
pub use router::{Route, RouteTable};
