//! Route definitions, matched routes and navigation requests.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use oxide_nav_matcher::{Method, Params, Query, QueryValue};

/// Correlates a navigation request with its eventual success or failure.
pub type TransactionId = u64;

/// Route definitions keyed by route name, in declaration order.
///
/// Declaration order is matching order.
pub type RouteTable = IndexMap<String, RouteConfig>;

/// A single entry of the route table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteConfig {
    /// Path template, e.g. `/foo/:a/:b`.
    pub path: String,
    /// HTTP method, case-insensitive on input.
    #[serde(default)]
    pub method: Method,
    /// Name of the action to execute when the route is navigated to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Any other fields of the definition, e.g. a handler reference.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RouteConfig {
    /// Creates a GET route for `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: Method::Get,
            action: None,
            extra: Map::new(),
        }
    }

    /// Sets the method.
    #[must_use]
    pub const fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the action executed on navigation.
    #[must_use]
    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Sets an extra field.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Gets an extra field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

/// A route table entry resolved against a concrete URL.
///
/// Equality compares the route by value and ignores [`MatchedRoute::navigate`],
/// so the same route reached by two different requests is equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedRoute {
    /// Route name.
    pub name: String,
    /// The table entry this route was built from.
    #[serde(flatten)]
    pub config: RouteConfig,
    /// The exact URL that was matched.
    pub url: String,
    /// Path parameters.
    #[serde(default)]
    pub params: Params,
    /// Query parameters parsed from `url`.
    #[serde(default)]
    pub query: Query,
    /// The request that produced this match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigate: Option<NavigationRequest>,
}

impl MatchedRoute {
    /// Returns the path template.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.config.path
    }

    /// Returns the route method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.config.method
    }

    /// Returns the name of the route action, if any.
    #[must_use]
    pub fn action(&self) -> Option<&str> {
        self.config.action.as_deref()
    }

    /// Gets an extra field of the route definition.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.config.get(key)
    }

    /// Gets a path parameter.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Gets the first value of a query parameter.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).and_then(QueryValue::first)
    }
}

impl PartialEq for MatchedRoute {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.url == other.url
            && self.params == other.params
            && self.query == other.query
            && self.config == other.config
    }
}

/// How a navigation was triggered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NavigationType {
    /// A link click that pushes a history entry.
    Click,
    /// A navigation that replaces the current history entry.
    ReplaceState,
    /// Any caller-defined trigger, e.g. `popstate` or `server`.
    Other(String),
}

impl From<String> for NavigationType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "click" => Self::Click,
            "replacestate" => Self::ReplaceState,
            _ => Self::Other(value),
        }
    }
}

impl From<NavigationType> for String {
    fn from(value: NavigationType) -> Self {
        match value {
            NavigationType::Click => "click".to_string(),
            NavigationType::ReplaceState => "replacestate".to_string(),
            NavigationType::Other(other) => other,
        }
    }
}

/// A requested navigation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationRequest {
    /// Target URL. Empty when the request names a route instead.
    #[serde(default)]
    pub url: String,
    /// HTTP method.
    #[serde(default)]
    pub method: Method,
    /// Route to build the URL from when `url` is empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_name: Option<String>,
    /// Correlation id for stale completion suppression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<TransactionId>,
    /// Whether the page should keep its scroll position.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub preserve_scroll_position: bool,
    /// Navigation parameters, also used to build the URL of `route_name`.
    #[serde(default, skip_serializing_if = "Params::is_empty")]
    pub params: Params,
    /// What triggered the navigation.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub nav_type: Option<NavigationType>,
}

impl NavigationRequest {
    /// Creates a GET navigation to `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Creates a navigation to a named route; the URL is built at dispatch.
    pub fn to_route(name: impl Into<String>, params: Params) -> Self {
        Self {
            route_name: Some(name.into()),
            params,
            ..Self::default()
        }
    }

    /// Sets the method.
    #[must_use]
    pub const fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the transaction id.
    #[must_use]
    pub const fn transaction_id(mut self, id: TransactionId) -> Self {
        self.transaction_id = Some(id);
        self
    }

    /// Sets the navigation type.
    #[must_use]
    pub fn nav_type(mut self, nav_type: NavigationType) -> Self {
        self.nav_type = Some(nav_type);
        self
    }

    /// Sets whether scroll position is preserved.
    #[must_use]
    pub const fn preserve_scroll_position(mut self, preserve: bool) -> Self {
        self.preserve_scroll_position = preserve;
        self
    }

    /// Sets a navigation parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}
