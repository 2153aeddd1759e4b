//! Dehydration of route store state for transfer between processes.
//!
//! A server renders a page, dehydrates its route store into the page and the
//! client rehydrates a fresh store from it. The snapshot holds plain data only;
//! the current route is resolved again on rehydration.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use oxide_nav_matcher::{parse_query, Params};

use crate::error::NavigateFailure;
use crate::route::{MatchedRoute, NavigationRequest, RouteConfig, RouteTable};
use crate::store::{rewritten, RouteStore};

/// Serializable state of a [`RouteStore`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DehydratedState {
    /// Routes received at runtime; `None` when there are none.
    pub routes: Option<RouteTable>,
    /// URL of the latest navigation.
    pub current_url: Option<String>,
    /// Request of the latest navigation.
    pub current_navigate: Option<NavigationRequest>,
    /// Error of the latest navigation.
    #[serde(alias = "currentNavigateError")]
    pub navigate_error: Option<NavigateFailure>,
    /// Whether the latest navigation completed.
    pub is_navigate_complete: bool,
    /// Whether the current route was rewritten.
    pub is_rewrite: bool,
    /// Name the current route was rewritten to.
    pub rewrite_route_name: Option<String>,
    /// Path parameters of a rewritten route.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewrite_params: Option<Params>,
    /// Definition of a rewritten route.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewrite_route: Option<RouteConfig>,
}

impl RouteStore {
    /// Captures the store state.
    #[must_use]
    pub fn dehydrate(&self) -> DehydratedState {
        DehydratedState {
            routes: if self.routes.is_empty() {
                None
            } else {
                Some(self.routes.clone())
            },
            current_url: self.current_url.clone(),
            current_navigate: self.current_navigate.clone(),
            navigate_error: self.navigate_error.clone(),
            is_navigate_complete: self.is_navigate_complete,
            is_rewrite: self.is_rewrite,
            rewrite_route_name: self.rewrite_route_name.clone(),
            rewrite_params: self.rewritten_route().map(|route| route.params.clone()),
            rewrite_route: self.rewritten_route().map(|route| route.config.clone()),
        }
    }

    /// Restores state captured by [`RouteStore::dehydrate`].
    ///
    /// The current route is matched again from the current URL, with the
    /// recorded method or GET. A rewritten route is rebuilt from its
    /// recorded definition instead, falling back to the route table entry of
    /// its name, since it is not necessarily reachable by matching.
    pub fn rehydrate(&mut self, state: DehydratedState) {
        self.routes = state.routes.unwrap_or_default();
        self.invalidate_tables();
        self.current_url = state.current_url;
        self.current_navigate = state.current_navigate;
        self.navigate_error = state.navigate_error;
        self.is_navigate_complete = state.is_navigate_complete;

        let rewrite = match (state.is_rewrite, state.rewrite_route_name) {
            (true, Some(name)) => Some(name),
            _ => None,
        };

        self.current_route = match &rewrite {
            Some(name) => self.rebuild_rewrite(
                name,
                state.rewrite_route,
                state.rewrite_params.unwrap_or_default(),
            ),
            None => self.current_url.as_deref().and_then(|url| {
                let method = self
                    .current_navigate
                    .as_ref()
                    .map(|navigate| navigate.method)
                    .unwrap_or_default();
                self.match_route(url, method, self.current_navigate.as_ref())
            }),
        }
        .map(Arc::new);

        self.is_rewrite = rewrite.is_some();
        self.rewrite_route_name = rewrite;

        debug!(
            url = ?self.current_url,
            route = ?self.current_route.as_ref().map(|r| &r.name),
            rewrite = self.is_rewrite,
            "rehydrated route store"
        );
    }

    fn rewritten_route(&self) -> Option<&MatchedRoute> {
        self.current_route.as_deref().filter(|_| self.is_rewrite)
    }

    fn rebuild_rewrite(
        &self,
        name: &str,
        config: Option<RouteConfig>,
        params: Params,
    ) -> Option<MatchedRoute> {
        let Some(config) = config.or_else(|| self.routes().get(name).cloned()) else {
            warn!(route = name, "rewritten route is missing from the route table");
            return None;
        };
        let url = self.current_url.clone().unwrap_or_default();
        let query = parse_query(&url);
        Some(rewritten(
            name,
            config,
            url,
            params,
            query,
            self.current_navigate.clone(),
        ))
    }
}
