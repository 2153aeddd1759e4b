//! Named route matcher.

use tracing::debug;

use crate::error::{MatcherError, Result};
use crate::method::Method;
use crate::path::{Params, PathPattern};

/// A single compiled route.
#[derive(Debug, Clone)]
pub struct CompiledRoute {
    /// Route name, unique within a matcher.
    pub name: String,
    /// HTTP method.
    pub method: Method,
    /// Path pattern.
    pub pattern: PathPattern,
}

/// The result of resolving a URL against a [`Matcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// Name of the matched route.
    pub name: String,
    /// The URL exactly as it was matched, query string included.
    pub url: String,
    /// Path parameters extracted from the URL.
    pub params: Params,
}

/// Resolves URLs to named routes and builds URLs from route names.
///
/// Routes are tried in the order they were added; the first route whose
/// method and path both match wins.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    routes: Vec<CompiledRoute>,
}

impl Matcher {
    /// Creates a new empty matcher.
    #[must_use]
    pub const fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Compiles a matcher from `(name, method, path)` triples.
    ///
    /// # Errors
    ///
    /// Fails on the first path template that does not compile.
    pub fn from_routes<I, N, P>(routes: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, Method, P)>,
        N: Into<String>,
        P: AsRef<str>,
    {
        let mut matcher = Self::new();
        for (name, method, path) in routes {
            matcher.add(name, method, path.as_ref())?;
        }
        debug!(routes = matcher.routes.len(), "compiled route matcher");
        Ok(matcher)
    }

    /// Adds a named route, replacing any route with the same name in place.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a valid template.
    pub fn add(&mut self, name: impl Into<String>, method: Method, path: &str) -> Result<()> {
        let route = CompiledRoute {
            name: name.into(),
            method,
            pattern: PathPattern::new(path)?,
        };
        match self.routes.iter_mut().find(|r| r.name == route.name) {
            Some(existing) => *existing = route,
            None => self.routes.push(route),
        }
        Ok(())
    }

    /// Adds a named route.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a valid template.
    pub fn route(mut self, name: &str, method: Method, path: &str) -> Result<Self> {
        self.add(name, method, path)?;
        Ok(self)
    }

    /// Resolves `url` for `method`.
    ///
    /// The query string and fragment are ignored for matching but kept in
    /// [`RouteMatch::url`].
    #[must_use]
    pub fn match_route(&self, url: &str, method: Method) -> Option<RouteMatch> {
        let path = strip_search(url);

        self.routes
            .iter()
            .filter(|route| route.method == method)
            .find_map(|route| {
                route.pattern.match_path(path).map(|params| RouteMatch {
                    name: route.name.clone(),
                    url: url.to_string(),
                    params,
                })
            })
    }

    /// Generates a URL for a named route.
    ///
    /// # Errors
    ///
    /// Returns [`MatcherError::RouteNotFound`] for an unknown name and
    /// [`MatcherError::MissingParam`] when a required parameter is absent.
    pub fn make_path(&self, name: &str, params: &Params) -> Result<String> {
        let route = self
            .get(name)
            .ok_or_else(|| MatcherError::RouteNotFound(name.to_string()))?;

        route.pattern.reverse(params).ok_or_else(|| MatcherError::MissingParam {
            route: name.to_string(),
            param: route
                .pattern
                .missing_param(params)
                .unwrap_or_default()
                .to_string(),
        })
    }

    /// Returns the route registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CompiledRoute> {
        self.routes.iter().find(|r| r.name == name)
    }

    /// Returns the compiled routes in matching order.
    pub fn routes(&self) -> impl Iterator<Item = &CompiledRoute> {
        self.routes.iter()
    }

    /// Returns the number of routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns whether the matcher has no routes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Returns the path portion of a URL, without query string or fragment.
#[must_use]
pub fn strip_search(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    &url[..end]
}
