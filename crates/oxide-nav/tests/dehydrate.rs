//! Moving route store state from a server render to a client.

mod common;

use common::{context, params, routes};
use oxide_nav::{
    navigate, DehydratedState, NavigationEvent, NavigationRequest, RewriteRoute, RouteConfig,
    RouteStore,
};
use serde_json::{json, Value};

fn transfer(server: &RouteStore) -> RouteStore {
    let payload = serde_json::to_string(&server.dehydrate()).unwrap();
    let state: DehydratedState = serde_json::from_str(&payload).unwrap();
    let mut client = RouteStore::new();
    client.rehydrate(state);
    client
}

#[tokio::test]
async fn test_completed_navigation_survives_transfer() {
    let (context, _) = context();
    navigate(&context, NavigationRequest::new("/foo/1/2?sort=asc"))
        .await
        .unwrap();

    let server = context.store().read();
    let client = transfer(&server);

    assert_eq!(client.current_url(), Some("/foo/1/2?sort=asc"));
    assert!(client.is_navigate_complete());
    assert!(client.navigate_error().is_none());
    assert_eq!(client.routes().len(), routes().len());

    let expected = server.current_route().unwrap();
    let actual = client.current_route().unwrap();
    assert_eq!(*actual, *expected);
    assert_eq!(actual.param("b"), Some("2"));
    assert_eq!(actual.query_param("sort"), Some("asc"));
    assert_eq!(
        client.current_navigate().unwrap().transaction_id,
        server.current_navigate().unwrap().transaction_id
    );
}

#[tokio::test]
async fn test_failed_navigation_survives_transfer() {
    let (context, _) = context();
    navigate(&context, NavigationRequest::new("/forbidden"))
        .await
        .unwrap_err();

    let client = transfer(&context.store().read());
    let failure = client.navigate_error().unwrap();
    assert_eq!(failure.status_code, 403);
    assert_eq!(failure.details.get("reason").unwrap(), "no session");
    assert_eq!(client.current_route().unwrap().name, "forbidden");
}

#[test]
fn test_dehydrated_payload_shape() {
    let mut server = common::store();
    server.navigate_start(NavigationRequest::new("/bar").transaction_id(9));

    let payload: Value = serde_json::to_value(server.dehydrate()).unwrap();
    assert_eq!(payload["currentUrl"], "/bar");
    assert_eq!(payload["currentNavigate"]["url"], "/bar");
    assert_eq!(payload["currentNavigate"]["method"], "GET");
    assert_eq!(payload["currentNavigate"]["transactionId"], 9);
    assert_eq!(payload["routes"]["bar"]["handler"], "BarComponent");
    assert_eq!(payload["isNavigateComplete"], false);
    assert_eq!(payload["isRewrite"], false);
    assert!(payload.get("rewriteParams").is_none());
}

#[test]
fn test_payload_from_older_writer_is_accepted() {
    let state: DehydratedState = serde_json::from_value(json!({
        "currentUrl": "/foo",
        "currentNavigate": {"url": "/foo", "method": "get"},
        "currentNavigateError": {"statusCode": 500, "message": "boom"},
        "routes": {"foo": {"path": "/foo", "method": "get"}}
    }))
    .unwrap();

    let mut client = RouteStore::new();
    client.rehydrate(state);
    assert_eq!(client.current_route().unwrap().name, "foo");
    assert!(!client.is_navigate_complete());
    assert!(!client.is_rewrite());
    let failure = client.navigate_error().unwrap();
    assert_eq!(failure.status_code, 500);
    assert_eq!(failure.message, "boom");
}

#[test]
fn test_rewritten_route_survives_transfer() {
    let mut server = common::store();
    server.navigate_start(NavigationRequest::new("/foo/1/2"));
    server.handle(NavigationEvent::RewriteRoute(RewriteRoute {
        name: "notFound".to_string(),
        route: RouteConfig::new("/404").with("handler", "NotFoundComponent"),
    }));

    let client = transfer(&server);

    assert!(client.is_rewrite());
    assert_eq!(client.rewrite_route_name(), Some("notFound"));
    assert_eq!(client.current_url(), Some("/foo/1/2"));
    let route = client.current_route().unwrap();
    assert_eq!(route.name, "notFound");
    assert_eq!(route.get("handler").unwrap(), "NotFoundComponent");
    assert_eq!(route.params, params(&[("a", "1"), ("b", "2")]));
    assert!(!client.is_matcher_built());
}

#[test]
fn test_rewrite_definition_wins_over_route_table() {
    let mut server = common::store();
    server.navigate_start(NavigationRequest::new("/foo"));
    server.rewrite_route("bar", RouteConfig::new("/bar").with("handler", "Override"));

    let client = transfer(&server);
    assert!(client.is_rewrite());
    assert_eq!(client.rewrite_route_name(), Some("bar"));
    assert_eq!(client.current_url(), Some("/foo"));
    let route = client.current_route().unwrap();
    assert_eq!(route.get("handler").unwrap(), "Override");
}

#[test]
fn test_rewrite_without_definition_uses_route_table() {
    let state: DehydratedState = serde_json::from_value(json!({
        "currentUrl": "/foo",
        "isRewrite": true,
        "rewriteRouteName": "bar",
        "routes": routes()
    }))
    .unwrap();

    let mut client = RouteStore::new();
    client.rehydrate(state);
    assert_eq!(client.current_route().unwrap().get("handler").unwrap(), "BarComponent");

    let mut client = RouteStore::new();
    client.rehydrate(DehydratedState {
        current_url: Some("/foo".to_string()),
        is_rewrite: true,
        rewrite_route_name: Some("ghost".to_string()),
        routes: Some(routes()),
        ..DehydratedState::default()
    });
    assert!(client.current_route().is_none());
    assert!(client.is_rewrite());
}
