//! Navigation links.
//!
//! The renderer-independent half of a link component: resolving the target,
//! deciding whether a click is handled in-app, and starting the navigation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use oxide_nav_matcher::Params;

use crate::action::navigate;
use crate::context::ActionContext;
use crate::error::{LinkError, NavigateError};
use crate::route::{NavigationRequest, NavigationType};
use crate::store::RouteQuery;

/// Mouse state of a click on a link.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClickModifiers {
    /// Mouse button, 0 is the primary button.
    pub button: u8,
    /// Meta (command) key held.
    pub meta: bool,
    /// Alt (option) key held.
    pub alt: bool,
    /// Control key held.
    pub ctrl: bool,
    /// Shift key held.
    pub shift: bool,
}

impl ClickModifiers {
    /// A plain primary-button click.
    #[must_use]
    pub const fn left_click() -> Self {
        Self {
            button: 0,
            meta: false,
            alt: false,
            ctrl: false,
            shift: false,
        }
    }

    /// Returns whether the click should be handled in-app: an unmodified
    /// primary-button click. Anything else is left to the browser.
    #[must_use]
    pub const fn should_intercept(&self) -> bool {
        self.button == 0 && !(self.meta || self.alt || self.ctrl || self.shift)
    }
}

/// A link to a URL or to a named route.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavLink {
    /// Explicit target; wins over `route_name`.
    pub href: Option<String>,
    /// Route to build the target from.
    pub route_name: Option<String>,
    /// Parameters for `route_name`, also passed along with the navigation.
    pub nav_params: Params,
    /// Replace the history entry instead of pushing one.
    pub replace_state: bool,
    /// Keep the scroll position after navigating.
    pub preserve_scroll_position: bool,
    /// Let the browser follow the link natively.
    pub follow_link: bool,
}

impl NavLink {
    /// Creates a link to a URL.
    pub fn to(href: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            ..Self::default()
        }
    }

    /// Creates a link to a named route.
    pub fn to_route(route_name: impl Into<String>, nav_params: Params) -> Self {
        Self {
            route_name: Some(route_name.into()),
            nav_params,
            ..Self::default()
        }
    }

    /// Sets whether the link replaces the history entry.
    #[must_use]
    pub const fn replace_state(mut self, replace: bool) -> Self {
        self.replace_state = replace;
        self
    }

    /// Sets whether the scroll position is preserved.
    #[must_use]
    pub const fn preserve_scroll_position(mut self, preserve: bool) -> Self {
        self.preserve_scroll_position = preserve;
        self
    }

    /// Sets whether the browser follows the link natively.
    #[must_use]
    pub const fn follow_link(mut self, follow: bool) -> Self {
        self.follow_link = follow;
        self
    }

    /// Resolves the link target.
    ///
    /// # Errors
    ///
    /// [`LinkError::MissingHref`] when there is no href and the route name is
    /// absent or cannot be built. A link without a target is a programming
    /// error and should not be rendered.
    pub fn resolve_href(&self, routes: &dyn RouteQuery) -> Result<String, LinkError> {
        if let Some(href) = self.href.as_ref().filter(|href| !href.is_empty()) {
            return Ok(href.clone());
        }
        self.route_name
            .as_deref()
            .and_then(|name| routes.make_path(name, &self.nav_params))
            .ok_or_else(|| LinkError::MissingHref {
                route_name: self.route_name.clone().unwrap_or_default(),
            })
    }

    /// Returns whether the link points at the current URL.
    ///
    /// # Errors
    ///
    /// Fails like [`NavLink::resolve_href`].
    pub fn is_active(&self, routes: &dyn RouteQuery) -> Result<bool, LinkError> {
        let href = self.resolve_href(routes)?;
        Ok(routes.is_active(&href))
    }

    /// Builds the navigation a click on this link starts, or `None` when the
    /// browser should handle the click itself: followed links, in-page `#`
    /// links and links to other origins.
    ///
    /// Absolute links to `origin` are made relative.
    ///
    /// # Errors
    ///
    /// Fails like [`NavLink::resolve_href`].
    pub fn navigation_request(
        &self,
        routes: &dyn RouteQuery,
        origin: &str,
    ) -> Result<Option<NavigationRequest>, LinkError> {
        if self.follow_link {
            return Ok(None);
        }

        let href = self.resolve_href(routes)?;
        if href.starts_with('#') {
            return Ok(None);
        }
        let url = if href.starts_with('/') {
            href
        } else {
            match same_origin_path(&href, origin) {
                Some(path) => path,
                None => return Ok(None),
            }
        };

        let nav_type = if self.replace_state {
            NavigationType::ReplaceState
        } else {
            NavigationType::Click
        };

        Ok(Some(NavigationRequest {
            url,
            params: self.nav_params.clone(),
            preserve_scroll_position: self.preserve_scroll_position,
            nav_type: Some(nav_type),
            ..NavigationRequest::default()
        }))
    }

    /// Handles a click: starts the navigation when the click is handled
    /// in-app. Returns whether a navigation ran.
    ///
    /// # Errors
    ///
    /// [`LinkError::MissingHref`] for unresolvable links, or
    /// [`LinkError::Navigate`] when the navigation fails.
    pub async fn click<C>(
        &self,
        context: &C,
        modifiers: ClickModifiers,
        origin: &str,
    ) -> Result<bool, LinkError>
    where
        C: ActionContext + ?Sized,
    {
        if !modifiers.should_intercept() {
            return Ok(false);
        }
        let Some(routes) = context.route_store() else {
            return Err(NavigateError::Configuration(
                "no route store is registered with the action context".to_string(),
            )
            .into());
        };
        let Some(request) = self.navigation_request(routes.as_ref(), origin)? else {
            return Ok(false);
        };
        debug!(url = %request.url, nav_type = ?request.nav_type, "link navigation");
        navigate(context, request).await?;
        Ok(true)
    }
}

/// Returns the path of `href` when it is an absolute URL on `origin`.
fn same_origin_path(href: &str, origin: &str) -> Option<String> {
    if origin.is_empty() {
        return None;
    }
    let rest = href.strip_prefix(origin)?;
    if rest.is_empty() {
        Some("/".to_string())
    } else if rest.starts_with('/') {
        Some(rest.to_string())
    } else if rest.starts_with(['?', '#']) {
        Some(format!("/{rest}"))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::{RouteConfig, RouteTable};
    use crate::store::RouteStore;

    const ORIGIN: &str = "https://shop.example";

    fn store() -> RouteStore {
        let mut table = RouteTable::new();
        table.insert("foo".to_string(), RouteConfig::new("/foo"));
        table.insert("fooAB".to_string(), RouteConfig::new("/foo/:a/:b"));
        let mut store = RouteStore::with_static_routes(table);
        store.navigate_start(NavigationRequest::new("/foo"));
        store
    }

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_click_modifiers() {
        assert!(ClickModifiers::left_click().should_intercept());
        assert!(!ClickModifiers { button: 1, ..ClickModifiers::left_click() }.should_intercept());
        assert!(!ClickModifiers { meta: true, ..ClickModifiers::left_click() }.should_intercept());
        assert!(!ClickModifiers { shift: true, ..ClickModifiers::left_click() }.should_intercept());
        assert!(!ClickModifiers { alt: true, ..ClickModifiers::left_click() }.should_intercept());
        assert!(!ClickModifiers { ctrl: true, ..ClickModifiers::left_click() }.should_intercept());
        assert_eq!(ClickModifiers::default(), ClickModifiers::left_click());
    }

    #[test]
    fn test_href_wins_over_route_name() {
        let link = NavLink {
            href: Some("/explicit".to_string()),
            route_name: Some("foo".to_string()),
            ..NavLink::default()
        };
        assert_eq!(link.resolve_href(&store()), Ok("/explicit".to_string()));
    }

    #[test]
    fn test_route_name_is_built() {
        let link = NavLink::to_route("fooAB", params(&[("a", "1"), ("b", "2")]));
        assert_eq!(link.resolve_href(&store()), Ok("/foo/1/2".to_string()));
    }

    #[test]
    fn test_unresolvable_link_fails() {
        let store = store();
        assert_eq!(
            NavLink::default().resolve_href(&store),
            Err(LinkError::MissingHref {
                route_name: String::new()
            })
        );
        assert_eq!(
            NavLink::to_route("fooAB", Params::new()).resolve_href(&store),
            Err(LinkError::MissingHref {
                route_name: "fooAB".to_string()
            })
        );
    }

    #[test]
    fn test_is_active() {
        let store = store();
        assert_eq!(NavLink::to("/foo").is_active(&store), Ok(true));
        assert_eq!(NavLink::to("/foo/").is_active(&store), Ok(false));
        assert_eq!(NavLink::to_route("foo", Params::new()).is_active(&store), Ok(true));
    }

    #[test]
    fn test_navigation_request_for_relative_link() {
        let link = NavLink::to_route("fooAB", params(&[("a", "1"), ("b", "2")]))
            .preserve_scroll_position(true);
        let request = link.navigation_request(&store(), ORIGIN).unwrap().unwrap();
        assert_eq!(request.url, "/foo/1/2");
        assert_eq!(request.nav_type, Some(NavigationType::Click));
        assert!(request.preserve_scroll_position);
        assert_eq!(request.params, params(&[("a", "1"), ("b", "2")]));
    }

    #[test]
    fn test_replace_state_link() {
        let request = NavLink::to("/foo")
            .replace_state(true)
            .navigation_request(&store(), ORIGIN)
            .unwrap()
            .unwrap();
        assert_eq!(request.nav_type, Some(NavigationType::ReplaceState));
    }

    #[test]
    fn test_links_left_to_the_browser() {
        let store = store();
        assert_eq!(NavLink::to("#section").navigation_request(&store, ORIGIN), Ok(None));
        assert_eq!(
            NavLink::to("https://elsewhere.example/foo").navigation_request(&store, ORIGIN),
            Ok(None)
        );
        assert_eq!(
            NavLink::to("https://shop.example.evil/foo").navigation_request(&store, ORIGIN),
            Ok(None)
        );
        assert_eq!(
            NavLink::to("/foo").follow_link(true).navigation_request(&store, ORIGIN),
            Ok(None)
        );
    }

    #[test]
    fn test_same_origin_links_become_relative() {
        let store = store();
        let request = NavLink::to("https://shop.example/foo?x=1")
            .navigation_request(&store, ORIGIN)
            .unwrap()
            .unwrap();
        assert_eq!(request.url, "/foo?x=1");

        let request = NavLink::to("https://shop.example")
            .navigation_request(&store, ORIGIN)
            .unwrap()
            .unwrap();
        assert_eq!(request.url, "/");
    }
}
