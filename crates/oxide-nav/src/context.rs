//! The runtime capabilities navigation depends on.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::debug;

use crate::error::ActionError;
use crate::event::NavigationEvent;
use crate::route::{MatchedRoute, TransactionId};
use crate::store::{RouteQuery, SharedRouteStore};

/// A route action: runs when its route is navigated to.
pub type Action =
    Arc<dyn Fn(Arc<MatchedRoute>) -> BoxFuture<'static, Result<(), ActionError>> + Send + Sync>;

/// Wraps an async function as an [`Action`].
pub fn action<F, Fut>(f: F) -> Action
where
    F: Fn(Arc<MatchedRoute>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ActionError>> + Send + 'static,
{
    Arc::new(move |route| Box::pin(f(route)))
}

/// Looks up actions by the name a route definition refers to them by.
pub trait ActionResolver {
    /// Returns the action registered under `name`.
    fn resolve(&self, name: &str) -> Option<Action>;
}

/// The action-execution context a navigation runs in.
pub trait ActionContext: ActionResolver + Send + Sync {
    /// Delivers an event to the stores, synchronously.
    fn dispatch(&self, event: NavigationEvent);

    /// Returns the route store, `None` when the context was wired without one.
    fn route_store(&self) -> Option<Arc<dyn RouteQuery>>;

    /// Runs an action for a matched route.
    fn execute_action(
        &self,
        action: Action,
        route: Arc<MatchedRoute>,
    ) -> BoxFuture<'_, Result<(), ActionError>> {
        action(route)
    }

    /// Returns a fresh transaction id for a request that has none.
    fn next_transaction_id(&self) -> Option<TransactionId> {
        None
    }
}

/// Actions keyed by name.
#[derive(Clone, Default)]
pub struct ActionRegistry {
    actions: HashMap<String, Action>,
}

impl ActionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an action, replacing any action of the same name.
    pub fn register(&mut self, name: impl Into<String>, action: Action) {
        self.actions.insert(name.into(), action);
    }

    /// Returns whether an action is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.actions.keys().collect();
        names.sort();
        f.debug_struct("ActionRegistry").field("actions", &names).finish()
    }
}

impl ActionResolver for ActionRegistry {
    fn resolve(&self, name: &str) -> Option<Action> {
        self.actions.get(name).cloned()
    }
}

/// An [`ActionContext`] that dispatches straight into a shared route store.
///
/// Transaction ids are assigned from a counter starting at 1.
#[derive(Debug, Default)]
pub struct FluxContext {
    store: SharedRouteStore,
    actions: ActionRegistry,
    transactions: AtomicU64,
}

impl FluxContext {
    /// Creates a context around `store`.
    #[must_use]
    pub fn new(store: SharedRouteStore) -> Self {
        Self {
            store,
            actions: ActionRegistry::new(),
            transactions: AtomicU64::new(0),
        }
    }

    /// Registers an action.
    #[must_use]
    pub fn with_action(mut self, name: impl Into<String>, action: Action) -> Self {
        self.actions.register(name, action);
        self
    }

    /// Registers an action.
    pub fn register_action(&mut self, name: impl Into<String>, action: Action) {
        self.actions.register(name, action);
    }

    /// Returns the route store.
    #[must_use]
    pub const fn store(&self) -> &SharedRouteStore {
        &self.store
    }
}

impl ActionResolver for FluxContext {
    fn resolve(&self, name: &str) -> Option<Action> {
        self.actions.resolve(name)
    }
}

impl ActionContext for FluxContext {
    fn dispatch(&self, event: NavigationEvent) {
        debug!(event = event.name(), "dispatching");
        self.store.handle(event);
    }

    fn route_store(&self) -> Option<Arc<dyn RouteQuery>> {
        Some(Arc::new(self.store.clone()))
    }

    fn next_transaction_id(&self) -> Option<TransactionId> {
        Some(self.transactions.fetch_add(1, Ordering::Relaxed) + 1)
    }
}
