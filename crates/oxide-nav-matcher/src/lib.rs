//! # oxide-nav-matcher
//!
//! Path matching for navigation stores.
//!
//! This crate provides:
//! - Path templates with `:param`, `:optional?` and `*wildcard` segments
//! - HTTP method-aware route resolution
//! - Named routes for reverse URL lookup
//! - Query string parsing with repeated keys
//!
//! ## Quick Start
//!
//! ```
//! use oxide_nav_matcher::{Matcher, Method, Params};
//!
//! let matcher = Matcher::from_routes([
//!     ("home", Method::Get, "/"),
//!     ("user", Method::Get, "/users/:id"),
//! ])
//! .unwrap();
//!
//! let matched = matcher.match_route("/users/42?tab=posts", Method::Get).unwrap();
//! assert_eq!(matched.name, "user");
//! assert_eq!(matched.params.get("id").map(String::as_str), Some("42"));
//!
//! let params: Params = [("id".to_string(), "7".to_string())].into_iter().collect();
//! assert_eq!(matcher.make_path("user", &params).unwrap(), "/users/7");
//! ```
//!
//! ## Query Strings
//!
//! ```
//! use oxide_nav_matcher::{parse_query, QueryValue};
//!
//! let query = parse_query("/foo?x=1&x=2");
//! assert_eq!(
//!     query.get("x"),
//!     Some(&QueryValue::Many(vec!["1".to_string(), "2".to_string()]))
//! );
//! ```

mod error;
mod matcher;
mod method;
mod path;
mod query;

pub use error::{MatcherError, Result};
pub use matcher::{strip_search, CompiledRoute, Matcher, RouteMatch};
pub use method::Method;
pub use path::{Params, PathPattern, PathSegment};
pub use query::{parse_query, parse_query_str, query_string, Query, QueryValue, ARRAY_LIMIT};
