//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store compiled routes as (method, pattern, handler) tuples
//! - Look up the first route matching a request
//! - Return the matched route with its captures, or an explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (shared via Arc without locks)
//! - O(n) scan in declaration order (route counts are tiny)
//! - Generic over the handler type so matching stays independent of HTTP bodies

use axum::http::Method;

use crate::routing::matcher::{match_path, Captures};
use crate::routing::pattern::{IntoPattern, Pattern, PatternError};

/// A compiled route.
#[derive(Debug)]
pub struct Route<H> {
    method: Method,
    pattern: Pattern,
    handler: H,
}

impl<H> Route<H> {
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }
}

/// Ordered table of routes.
#[derive(Debug)]
pub struct RouteTable<H> {
    routes: Vec<Route<H>>,
}

impl<H> Default for RouteTable<H> {
    fn default() -> Self {
        Self { routes: Vec::new() }
    }
}

impl<H> RouteTable<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route. Declaration order is lookup order.
    pub fn route(
        mut self,
        method: Method,
        template: impl IntoPattern,
        handler: H,
    ) -> Result<Self, PatternError> {
        let pattern = template.into_pattern()?;
        self.routes.push(Route {
            method,
            pattern,
            handler,
        });
        Ok(self)
    }

    /// Find the first route for `method` whose pattern matches `parts`.
    ///
    /// Once a route matches, the request is consumed and no later route is tried.
    pub fn resolve(&self, method: &Method, parts: &[&str]) -> Option<(&Route<H>, Captures)> {
        self.routes
            .iter()
            .filter(|route| route.method == *method)
            .find_map(|route| match_path(&route.pattern, parts).map(|captures| (route, captures)))
    }

    /// Whether any route is declared for `method`.
    pub fn has_method(&self, method: &Method) -> bool {
        self.routes.iter().any(|route| route.method == *method)
    }

    pub fn routes(&self) -> &[Route<H>] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
