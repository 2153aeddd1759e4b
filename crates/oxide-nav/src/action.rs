//! The navigate action.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::context::ActionContext;
use crate::error::{NavigateError, Result};
use crate::event::{NavigateSuccess, NavigationEvent};
use crate::route::NavigationRequest;

/// Drives one navigation attempt through the route store.
///
/// 1. A request naming a route gets its URL built by the store.
/// 2. `NAVIGATE_START` is dispatched.
/// 3. Without a route match, `NAVIGATE_FAILURE` (404) is dispatched. A URL
///    left empty by an unbuildable route name never matches.
/// 4. A route without an action succeeds immediately.
/// 5. Otherwise the action runs; its outcome is dispatched as
///    `NAVIGATE_SUCCESS` or `NAVIGATE_FAILURE` (status from the action, 500
///    by default).
///
/// The returned `Result` is the completion of the attempt. Action errors are
/// not retried. Completions of superseded attempts are still dispatched; the
/// store ignores them.
///
/// # Errors
///
/// - [`NavigateError::Configuration`] when the context has no route store.
/// - [`NavigateError::NotFound`] when no route matches.
/// - [`NavigateError::UnknownAction`] when the route's action is unknown.
/// - [`NavigateError::Handler`] when the route's action fails.
pub async fn navigate<C>(context: &C, mut request: NavigationRequest) -> Result<()>
where
    C: ActionContext + ?Sized,
{
    let store = context.route_store();

    if request.url.is_empty() {
        if let Some(name) = request.route_name.take() {
            match store.as_ref().and_then(|s| s.make_path(&name, &request.params)) {
                Some(url) => request.url = url,
                None => warn!(route = %name, "could not build a url for route"),
            }
        }
    }

    if request.transaction_id.is_none() {
        request.transaction_id = context.next_transaction_id();
    }
    let transaction_id = request.transaction_id;
    let started = request.clone();

    debug!(
        url = %request.url,
        method = %request.method,
        ?transaction_id,
        "dispatching NAVIGATE_START"
    );
    context.dispatch(NavigationEvent::NavigateStart(request));

    let Some(store) = store else {
        return Err(NavigateError::Configuration(
            "no route store is registered with the action context".to_string(),
        ));
    };

    // Another navigation may have started since the dispatch above.
    let Some(route) = store.route_for(&started) else {
        let error = NavigateError::NotFound { url: started.url };
        context.dispatch(NavigationEvent::NavigateFailure(error.failure(transaction_id)));
        return Err(error);
    };

    let success = NavigateSuccess {
        transaction_id,
        route: Some(Arc::clone(&route)),
    };

    let Some(action_name) = route.action() else {
        debug!(route = %route.name, "route has no action, dispatching without calling action");
        context.dispatch(NavigationEvent::NavigateSuccess(success));
        return Ok(());
    };

    let Some(action) = context.resolve(action_name) else {
        let error = NavigateError::UnknownAction(action_name.to_string());
        context.dispatch(NavigationEvent::NavigateFailure(error.failure(transaction_id)));
        return Err(error);
    };

    debug!(route = %route.name, action = action_name, "executing route action");
    match context.execute_action(action, Arc::clone(&route)).await {
        Ok(()) => {
            context.dispatch(NavigationEvent::NavigateSuccess(success));
            Ok(())
        }
        Err(err) => {
            let error = NavigateError::from(err);
            debug!(route = %route.name, status = ?error.status_code(), "route action failed");
            context.dispatch(NavigationEvent::NavigateFailure(error.failure(transaction_id)));
            Err(error)
        }
    }
}
