//! Navigation events handled by the route store.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::NavigateFailure;
use crate::route::{MatchedRoute, NavigationRequest, RouteConfig, RouteTable, TransactionId};

/// Event name of [`NavigationEvent::NavigateStart`].
pub const NAVIGATE_START: &str = "NAVIGATE_START";
/// Event name of [`NavigationEvent::NavigateSuccess`].
pub const NAVIGATE_SUCCESS: &str = "NAVIGATE_SUCCESS";
/// Event name of [`NavigationEvent::NavigateFailure`].
pub const NAVIGATE_FAILURE: &str = "NAVIGATE_FAILURE";
/// Event name of [`NavigationEvent::ReceiveRoutes`].
pub const RECEIVE_ROUTES: &str = "RECEIVE_ROUTES";
/// Event name of [`NavigationEvent::RewriteRoute`].
pub const REWRITE_ROUTE: &str = "REWRITE_ROUTE";

/// Payload of a successful navigation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateSuccess {
    /// Transaction that completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<TransactionId>,
    /// The route that was navigated to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<Arc<MatchedRoute>>,
}

/// Payload of a route rewrite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewriteRoute {
    /// Name the rewritten route is reported under.
    pub name: String,
    /// Definition that replaces the current route's.
    pub route: RouteConfig,
}

/// An event dispatched to the route store.
///
/// Serializes as `{"event": "NAVIGATE_START", "payload": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NavigationEvent {
    /// A navigation attempt began.
    NavigateStart(NavigationRequest),
    /// A navigation attempt completed.
    NavigateSuccess(NavigateSuccess),
    /// A navigation attempt failed.
    NavigateFailure(NavigateFailure),
    /// Route definitions to merge into the table.
    ReceiveRoutes(RouteTable),
    /// Swap the current route's definition while keeping its URL.
    RewriteRoute(RewriteRoute),
}

impl NavigationEvent {
    /// Returns the wire name of the event.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::NavigateStart(_) => NAVIGATE_START,
            Self::NavigateSuccess(_) => NAVIGATE_SUCCESS,
            Self::NavigateFailure(_) => NAVIGATE_FAILURE,
            Self::ReceiveRoutes(_) => RECEIVE_ROUTES,
            Self::RewriteRoute(_) => REWRITE_ROUTE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_names_match_event_names() {
        let events = [
            NavigationEvent::NavigateStart(NavigationRequest::new("/foo")),
            NavigationEvent::NavigateSuccess(NavigateSuccess::default()),
            NavigationEvent::NavigateFailure(NavigateFailure {
                status_code: 404,
                message: "nope".to_string(),
                transaction_id: None,
                details: serde_json::Map::new(),
            }),
            NavigationEvent::ReceiveRoutes(RouteTable::new()),
            NavigationEvent::RewriteRoute(RewriteRoute {
                name: "bar".to_string(),
                route: RouteConfig::new("/bar"),
            }),
        ];

        for event in events {
            let value = serde_json::to_value(&event).unwrap();
            assert_eq!(value["event"], json!(event.name()));
            let back: NavigationEvent = serde_json::from_value(value).unwrap();
            assert_eq!(back, event);
        }
    }

    #[test]
    fn test_start_event_from_wire() {
        let event: NavigationEvent = serde_json::from_value(json!({
            "event": "NAVIGATE_START",
            "payload": {"url": "/foo", "method": "get", "transactionId": 4}
        }))
        .unwrap();
        assert_eq!(
            event,
            NavigationEvent::NavigateStart(NavigationRequest::new("/foo").transaction_id(4))
        );
    }
}
