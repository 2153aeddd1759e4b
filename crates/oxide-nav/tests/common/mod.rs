#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use oxide_nav::{
    action, Action, ActionContext, ActionError, ActionResolver, FluxContext, NavigationEvent,
    Params, RouteQuery, RouteStore, RouteTable, SharedRouteStore,
};
use serde_json::json;
use tokio::sync::oneshot;

pub fn routes() -> RouteTable {
    serde_json::from_value(json!({
        "home": {"path": "/", "method": "get"},
        "foo": {"path": "/foo", "method": "get", "handler": "FooComponent"},
        "bar": {"path": "/bar", "method": "get", "handler": "BarComponent"},
        "fooAB": {"path": "/foo/:a/:b", "method": "get"},
        "load": {"path": "/load/:id", "method": "get", "action": "loadThing"},
        "broken": {"path": "/broken", "method": "get", "action": "failWith500"},
        "forbidden": {"path": "/forbidden", "method": "get", "action": "failWith403"},
        "orphan": {"path": "/orphan", "method": "get", "action": "notRegistered"}
    }))
    .unwrap()
}

pub fn params(pairs: &[(&str, &str)]) -> Params {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

pub fn store() -> RouteStore {
    let mut store = RouteStore::new();
    store.set_routes(routes());
    store
}

/// A context with the fixture routes and actions. Every route the
/// `loadThing` action runs for is recorded in the returned log.
pub fn context() -> (FluxContext, Arc<Mutex<Vec<String>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);
    let context = FluxContext::new(SharedRouteStore::new(store()))
        .with_action(
            "loadThing",
            action(move |route| {
                log.lock().unwrap().push(format!(
                    "{}:{}",
                    route.name,
                    route.param("id").unwrap_or_default()
                ));
                async { Ok(()) }
            }),
        )
        .with_action(
            "failWith500",
            action(|_route| async { Err(ActionError::new("database unavailable")) }),
        )
        .with_action(
            "failWith403",
            action(|_route| async {
                Err(ActionError::new("forbidden")
                    .status(403)
                    .detail("reason", "no session"))
            }),
        );
    (context, seen)
}

/// Handles to an action that blocks until released.
pub struct Gate {
    /// Resolves once the action has started running.
    pub entered: oneshot::Receiver<()>,
    /// Lets the action finish.
    pub release: oneshot::Sender<()>,
}

/// An action that signals when it starts and then waits to be released
/// before returning `result`.
pub fn gated_action(result: Result<(), ActionError>) -> (Action, Gate) {
    let (entered_tx, entered_rx) = oneshot::channel();
    let (release_tx, release_rx) = oneshot::channel::<()>();
    let entered = Arc::new(Mutex::new(Some(entered_tx)));
    let release = Arc::new(Mutex::new(Some(release_rx)));

    let gated = action(move |_route| {
        let entered = entered.lock().unwrap().take();
        let release = release.lock().unwrap().take();
        let result = result.clone();
        async move {
            if let Some(tx) = entered {
                let _ = tx.send(());
            }
            if let Some(rx) = release {
                let _ = rx.await;
            }
            result
        }
    });

    (
        gated,
        Gate {
            entered: entered_rx,
            release: release_tx,
        },
    )
}

/// A context that records the names of dispatched events and can be wired
/// without a route store.
pub struct RecordingContext {
    pub store: Option<SharedRouteStore>,
    pub events: Mutex<Vec<&'static str>>,
}

impl RecordingContext {
    pub fn new(store: Option<SharedRouteStore>) -> Self {
        Self {
            store,
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().clone()
    }
}

impl ActionResolver for RecordingContext {
    fn resolve(&self, _name: &str) -> Option<Action> {
        None
    }
}

impl ActionContext for RecordingContext {
    fn dispatch(&self, event: NavigationEvent) {
        self.events.lock().unwrap().push(event.name());
        if let Some(store) = &self.store {
            store.handle(event);
        }
    }

    fn route_store(&self) -> Option<Arc<dyn RouteQuery>> {
        self.store
            .clone()
            .map(|store| Arc::new(store) as Arc<dyn RouteQuery>)
    }
}
