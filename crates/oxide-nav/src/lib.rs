//! # oxide-nav
//!
//! Navigation state for single-page applications rendered on the server and
//! the client.
//!
//! This crate provides:
//! - A route store that tracks the current route, URL and navigation status
//! - Out-of-order completion handling through transaction ids
//! - Route rewrites that keep the visible URL
//! - Dehydration and rehydration of store state
//! - The `navigate` action that drives a navigation through the store
//! - Link helpers for resolving targets and handling clicks
//!
//! ## Quick Start
//!
//! ```
//! use oxide_nav::{navigate, FluxContext, RouteStore, RouteTable, SharedRouteStore};
//! use oxide_nav::NavigationRequest;
//!
//! # futures::executor::block_on(async {
//! let routes: RouteTable = serde_json::from_str(
//!     r#"{"home": {"path": "/", "method": "get"},
//!         "user": {"path": "/users/:id", "method": "get"}}"#,
//! )
//! .unwrap();
//!
//! let context = FluxContext::new(SharedRouteStore::new(RouteStore::with_static_routes(routes)));
//! navigate(&context, NavigationRequest::new("/users/42")).await.unwrap();
//!
//! let store = context.store().read();
//! let route = store.current_route().unwrap();
//! assert_eq!(route.name, "user");
//! assert_eq!(route.param("id"), Some("42"));
//! assert!(store.is_navigate_complete());
//! # });
//! ```
//!
//! ## Server to Client
//!
//! ```
//! use oxide_nav::{NavigationRequest, RouteStore, RouteTable};
//!
//! let routes: RouteTable =
//!     serde_json::from_str(r#"{"foo": {"path": "/foo", "method": "get"}}"#).unwrap();
//!
//! let mut server = RouteStore::new();
//! server.set_routes(routes);
//! server.navigate_start(NavigationRequest::new("/foo"));
//! let payload = serde_json::to_string(&server.dehydrate()).unwrap();
//!
//! let mut client = RouteStore::new();
//! client.rehydrate(serde_json::from_str(&payload).unwrap());
//! assert_eq!(client.current_route().unwrap().name, "foo");
//! ```

mod action;
mod context;
mod error;
mod event;
mod link;
mod route;
mod snapshot;
mod store;

pub use action::navigate;
pub use context::{action, Action, ActionContext, ActionRegistry, ActionResolver, FluxContext};
pub use error::{
    ActionError, LinkError, NavigateError, NavigateFailure, Result, DEFAULT_ERROR_STATUS,
    NOT_FOUND_STATUS,
};
pub use event::{
    NavigateSuccess, NavigationEvent, RewriteRoute, NAVIGATE_FAILURE, NAVIGATE_START,
    NAVIGATE_SUCCESS, RECEIVE_ROUTES, REWRITE_ROUTE,
};
pub use link::{ClickModifiers, NavLink};
pub use route::{
    MatchedRoute, NavigationRequest, NavigationType, RouteConfig, RouteTable, TransactionId,
};
pub use snapshot::DehydratedState;
pub use store::{ListenerId, RouteQuery, RouteStore, SharedRouteStore};

pub use oxide_nav_matcher::{Method, Params, Query, QueryValue};
