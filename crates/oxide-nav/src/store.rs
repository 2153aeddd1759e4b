//! The route store: current navigation state and its event handlers.

use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, warn};

use oxide_nav_matcher::{parse_query, Matcher, Method, Params, Query};

use crate::error::NavigateFailure;
use crate::event::{NavigateSuccess, NavigationEvent, RewriteRoute};
use crate::route::{MatchedRoute, NavigationRequest, RouteConfig, RouteTable, TransactionId};

/// The read side of a route store that navigation and links depend on.
pub trait RouteQuery: Send + Sync {
    /// Returns the current matched route.
    fn current_route(&self) -> Option<Arc<MatchedRoute>>;

    /// Builds the URL of a named route.
    fn make_path(&self, name: &str, params: &Params) -> Option<String>;

    /// Returns whether `href` is exactly the current URL.
    fn is_active(&self, href: &str) -> bool;

    /// Returns the route `request` resolved to when it was started.
    ///
    /// This is the current route while `request` is still the current
    /// navigation, and a fresh match of its URL once a later navigation
    /// has replaced it.
    fn route_for(&self, request: &NavigationRequest) -> Option<Arc<MatchedRoute>>;
}

/// Identifies a change listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn Fn(&RouteStore) + Send + Sync>;

/// Holds the route table and the state of the current navigation.
///
/// State only changes through [`RouteStore::handle`] (or the handler methods
/// it forwards to) and [`RouteStore::rehydrate`]. Every handler notifies the
/// change listeners.
pub struct RouteStore {
    /// Fixed table of a static store.
    pub(crate) static_routes: Option<RouteTable>,
    /// Routes received at runtime; win over static routes of the same name.
    pub(crate) routes: RouteTable,
    /// Static routes overlaid with received routes, built on first use.
    pub(crate) merged_routes: OnceLock<RouteTable>,
    /// Lazily compiled from the table; reset whenever the table changes.
    pub(crate) matcher: OnceLock<Option<Matcher>>,
    pub(crate) current_url: Option<String>,
    pub(crate) current_route: Option<Arc<MatchedRoute>>,
    pub(crate) current_navigate: Option<NavigationRequest>,
    pub(crate) navigate_error: Option<NavigateFailure>,
    pub(crate) is_navigate_complete: bool,
    pub(crate) is_rewrite: bool,
    pub(crate) rewrite_route_name: Option<String>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl Default for RouteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RouteStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteStore")
            .field("routes", &self.routes().keys().collect::<Vec<_>>())
            .field("current_url", &self.current_url)
            .field("current_route", &self.current_route.as_ref().map(|r| &r.name))
            .field("is_navigate_complete", &self.is_navigate_complete)
            .field("is_rewrite", &self.is_rewrite)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl RouteStore {
    /// Creates a store whose routes arrive through [`RouteStore::set_routes`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            static_routes: None,
            routes: RouteTable::new(),
            merged_routes: OnceLock::new(),
            matcher: OnceLock::new(),
            current_url: None,
            current_route: None,
            current_navigate: None,
            navigate_error: None,
            is_navigate_complete: false,
            is_rewrite: false,
            rewrite_route_name: None,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    /// Creates a store with a fixed base table.
    ///
    /// Routes received later are merged over the base table and are the only
    /// routes included in [`RouteStore::dehydrate`].
    #[must_use]
    pub fn with_static_routes(routes: RouteTable) -> Self {
        Self {
            static_routes: Some(routes),
            ..Self::new()
        }
    }

    /// Applies an event.
    pub fn handle(&mut self, event: NavigationEvent) {
        match event {
            NavigationEvent::NavigateStart(request) => self.navigate_start(request),
            NavigationEvent::NavigateSuccess(success) => self.navigate_success(&success),
            NavigationEvent::NavigateFailure(failure) => self.navigate_failure(failure),
            NavigationEvent::ReceiveRoutes(routes) => self.set_routes(routes),
            NavigationEvent::RewriteRoute(RewriteRoute { name, route }) => {
                self.rewrite_route(&name, route);
            }
        }
    }

    /// Starts a navigation: resolves the request and resets completion state.
    ///
    /// The current route is only replaced when the match differs by value, so
    /// observers comparing by identity see no change when the same route is
    /// reached again.
    pub fn navigate_start(&mut self, request: NavigationRequest) {
        let matched = self.match_route(&request.url, request.method, Some(&request));

        let changed = match (&matched, &self.current_route) {
            (Some(new), Some(current)) => **current != *new,
            (None, None) => false,
            _ => true,
        };
        if changed {
            self.current_route = matched.map(Arc::new);
        }

        self.current_url = Some(request.url.clone());
        self.current_navigate = Some(request);
        self.navigate_error = None;
        self.is_navigate_complete = false;
        self.is_rewrite = false;
        self.rewrite_route_name = None;
        self.emit_change();
    }

    /// Completes the current navigation.
    ///
    /// Ignored when it belongs to a transaction other than the latest one.
    pub fn navigate_success(&mut self, success: &NavigateSuccess) {
        if self.is_stale(success.transaction_id) {
            return;
        }
        self.is_navigate_complete = true;
        self.emit_change();
    }

    /// Completes the current navigation with an error.
    ///
    /// Ignored when it belongs to a transaction other than the latest one.
    pub fn navigate_failure(&mut self, failure: NavigateFailure) {
        if self.is_stale(failure.transaction_id) {
            return;
        }
        self.navigate_error = Some(failure);
        self.is_navigate_complete = true;
        self.emit_change();
    }

    /// Merges route definitions into the table, replacing same-named routes.
    ///
    /// An empty table is a no-op.
    pub fn set_routes(&mut self, routes: RouteTable) {
        if routes.is_empty() {
            return;
        }
        debug!(count = routes.len(), "merging routes");
        self.routes.extend(routes);
        self.invalidate_tables();
        self.emit_change();
    }

    /// Replaces the current route with `config` reported as `name`, keeping
    /// the current URL, params and query.
    pub fn rewrite_route(&mut self, name: &str, config: RouteConfig) {
        let (url, params, query, navigate) = match &self.current_route {
            Some(current) => (
                current.url.clone(),
                current.params.clone(),
                current.query.clone(),
                current.navigate.clone(),
            ),
            None => {
                let url = self.current_url.clone().unwrap_or_default();
                let query = parse_query(&url);
                (url, Params::new(), query, self.current_navigate.clone())
            }
        };

        debug!(route = name, url = %url, "rewriting current route");
        self.current_route = Some(Arc::new(rewritten(name, config, url, params, query, navigate)));
        self.is_rewrite = true;
        self.rewrite_route_name = Some(name.to_string());
        self.emit_change();
    }

    /// Returns the effective route table: static routes overlaid with
    /// received routes.
    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        match &self.static_routes {
            None => &self.routes,
            Some(base) if self.routes.is_empty() => base,
            Some(base) => self.merged_routes.get_or_init(|| {
                let mut merged = base.clone();
                merged.extend(self.routes.clone());
                merged
            }),
        }
    }

    /// Drops the merged table and the matcher after the table changed.
    pub(crate) fn invalidate_tables(&mut self) {
        self.merged_routes = OnceLock::new();
        self.matcher = OnceLock::new();
    }

    /// Returns whether this store was built with a static table.
    #[must_use]
    pub const fn is_static(&self) -> bool {
        self.static_routes.is_some()
    }

    /// Returns the compiled matcher, building it on first use.
    ///
    /// A table that fails to compile matches nothing.
    pub fn matcher(&self) -> Option<&Matcher> {
        self.matcher
            .get_or_init(|| {
                let specs = self
                    .routes()
                    .iter()
                    .map(|(name, config)| (name.clone(), config.method, config.path.as_str()));
                match Matcher::from_routes(specs) {
                    Ok(matcher) => Some(matcher),
                    Err(e) => {
                        warn!(error = %e, "route table failed to compile");
                        None
                    }
                }
            })
            .as_ref()
    }

    /// Returns whether the matcher is compiled for the current table.
    #[must_use]
    pub fn is_matcher_built(&self) -> bool {
        self.matcher.get().is_some()
    }

    /// Resolves a URL to a route of the table.
    #[must_use]
    pub fn match_route(
        &self,
        url: &str,
        method: Method,
        navigate: Option<&NavigationRequest>,
    ) -> Option<MatchedRoute> {
        let matched = self.matcher()?.match_route(url, method)?;
        let config = self.routes().get(&matched.name)?.clone();

        Some(MatchedRoute {
            query: parse_query(&matched.url),
            name: matched.name,
            config,
            url: matched.url,
            params: matched.params,
            navigate: navigate.cloned(),
        })
    }

    /// Builds the URL of a named route.
    #[must_use]
    pub fn make_path(&self, name: &str, params: &Params) -> Option<String> {
        match self.matcher()?.make_path(name, params) {
            Ok(path) => Some(path),
            Err(e) => {
                debug!(error = %e, "could not build path");
                None
            }
        }
    }

    /// Returns the current matched route.
    #[must_use]
    pub fn current_route(&self) -> Option<Arc<MatchedRoute>> {
        self.current_route.clone()
    }

    /// Returns the request of the latest navigation.
    #[must_use]
    pub const fn current_navigate(&self) -> Option<&NavigationRequest> {
        self.current_navigate.as_ref()
    }

    /// Returns the URL of the latest navigation.
    #[must_use]
    pub fn current_url(&self) -> Option<&str> {
        self.current_url.as_deref()
    }

    /// Returns the error of the latest navigation, if it failed.
    #[must_use]
    pub const fn navigate_error(&self) -> Option<&NavigateFailure> {
        self.navigate_error.as_ref()
    }

    /// Returns whether the latest navigation has completed.
    #[must_use]
    pub const fn is_navigate_complete(&self) -> bool {
        self.is_navigate_complete
    }

    /// Returns whether the current route was rewritten.
    #[must_use]
    pub const fn is_rewrite(&self) -> bool {
        self.is_rewrite
    }

    /// Returns the name the current route was rewritten to.
    #[must_use]
    pub fn rewrite_route_name(&self) -> Option<&str> {
        self.rewrite_route_name.as_deref()
    }

    /// Returns the route `request` resolved to when it was started.
    ///
    /// Empty URLs resolve to nothing.
    #[must_use]
    pub fn route_for(&self, request: &NavigationRequest) -> Option<Arc<MatchedRoute>> {
        if request.url.is_empty() {
            return None;
        }
        if self.current_navigate.as_ref() == Some(request) {
            return self.current_route.clone();
        }
        debug!(url = %request.url, "navigation was superseded, matching its url again");
        self.match_route(&request.url, request.method, Some(request))
            .map(Arc::new)
    }

    /// Returns whether `href` is exactly the current URL.
    ///
    /// This is string equality: `/foo?a=1&b=2` and `/foo?b=2&a=1` differ.
    #[must_use]
    pub fn is_active(&self, href: &str) -> bool {
        self.current_url.as_deref() == Some(href)
    }

    /// Registers a listener called after every state change.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&Self) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    fn emit_change(&self) {
        for (_, listener) in &self.listeners {
            listener(self);
        }
    }

    fn is_stale(&self, transaction_id: Option<TransactionId>) -> bool {
        let current = self.current_navigate.as_ref().and_then(|n| n.transaction_id);
        match (transaction_id, current) {
            (Some(incoming), Some(current)) if incoming != current => {
                debug!(incoming, current, "ignoring completion of superseded navigation");
                true
            }
            _ => false,
        }
    }
}

/// Builds a rewritten route from a definition and preserved URL state.
pub(crate) fn rewritten(
    name: &str,
    config: RouteConfig,
    url: String,
    params: Params,
    query: Query,
    navigate: Option<NavigationRequest>,
) -> MatchedRoute {
    MatchedRoute {
        name: name.to_string(),
        config,
        url,
        params,
        query,
        navigate,
    }
}

impl RouteQuery for RouteStore {
    fn current_route(&self) -> Option<Arc<MatchedRoute>> {
        Self::current_route(self)
    }

    fn make_path(&self, name: &str, params: &Params) -> Option<String> {
        Self::make_path(self, name, params)
    }

    fn is_active(&self, href: &str) -> bool {
        Self::is_active(self, href)
    }

    fn route_for(&self, request: &NavigationRequest) -> Option<Arc<MatchedRoute>> {
        Self::route_for(self, request)
    }
}

/// A route store shared between an action context and its readers.
///
/// Listeners run while the write lock is held and must not lock the store
/// again; they receive the store by reference instead.
#[derive(Debug, Clone, Default)]
pub struct SharedRouteStore(Arc<RwLock<RouteStore>>);

impl SharedRouteStore {
    /// Wraps a store.
    #[must_use]
    pub fn new(store: RouteStore) -> Self {
        Self(Arc::new(RwLock::new(store)))
    }

    /// Locks the store for reading.
    pub fn read(&self) -> RwLockReadGuard<'_, RouteStore> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Locks the store for writing.
    pub fn write(&self) -> RwLockWriteGuard<'_, RouteStore> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies an event.
    pub fn handle(&self, event: NavigationEvent) {
        self.write().handle(event);
    }
}

impl RouteQuery for SharedRouteStore {
    fn current_route(&self) -> Option<Arc<MatchedRoute>> {
        self.read().current_route()
    }

    fn make_path(&self, name: &str, params: &Params) -> Option<String> {
        self.read().make_path(name, params)
    }

    fn is_active(&self, href: &str) -> bool {
        self.read().is_active(href)
    }

    fn route_for(&self, request: &NavigationRequest) -> Option<Arc<MatchedRoute>> {
        self.read().route_for(request)
    }
}
