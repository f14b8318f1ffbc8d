//! The application's page map and navigation decisions.
//!
//! Mirrors the page structure of the app: public pages, pages any signed-in
//! user may open, and the admin area. Resolution is a pure function of the
//! path and the current session snapshot; redirects keep the attempted path
//! so a later login can return to it.

use crate::auth::access::{self, AccessDecision};
use crate::auth::models::Role;
use crate::session::store::SessionIdentity;

const USER_OR_ADMIN: &[Role] = &[Role::User, Role::Admin];
const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// One navigable page. A `:segment` in the pattern matches any single
/// non-empty path segment. `allowed: None` marks a public page.
pub struct Route {
    pub pattern: &'static str,
    pub allowed: Option<&'static [Role]>,
}

/// Where a navigation attempt ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Render { path: String },
    Login { attempted: String },
    Unauthorized { attempted: String },
    NotFound { attempted: String },
}

pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// The application's full page map.
    pub fn standard() -> Self {
        let routes = vec![
            Route { pattern: "/", allowed: None },
            Route { pattern: "/login", allowed: None },
            Route { pattern: "/signup", allowed: None },
            Route { pattern: "/unauthorized", allowed: None },
            Route { pattern: "/results/:pollid", allowed: None },
            Route { pattern: "/poll/:pollid", allowed: Some(USER_OR_ADMIN) },
            Route { pattern: "/create-poll", allowed: Some(USER_OR_ADMIN) },
            Route { pattern: "/edit-poll/:pollid", allowed: Some(USER_OR_ADMIN) },
            Route { pattern: "/edit-user/:userid", allowed: Some(USER_OR_ADMIN) },
            Route { pattern: "/my-votes/:userid", allowed: Some(USER_OR_ADMIN) },
            Route { pattern: "/my-polls/:userid", allowed: Some(USER_OR_ADMIN) },
            Route { pattern: "/admin/users", allowed: Some(ADMIN_ONLY) },
            Route { pattern: "/admin/create-user", allowed: Some(ADMIN_ONLY) },
            Route { pattern: "/admin/edit-user/:userid", allowed: Some(ADMIN_ONLY) },
        ];

        RouteTable { routes }
    }

    pub fn resolve(&self, path: &str, identity: &SessionIdentity) -> Navigation {
        let Some(route) = self
            .routes
            .iter()
            .find(|route| segments_match(route.pattern, path))
        else {
            return Navigation::NotFound {
                attempted: path.to_string(),
            };
        };

        match route.allowed {
            None => Navigation::Render {
                path: path.to_string(),
            },
            Some(allowed) => match access::evaluate(identity, allowed, path) {
                AccessDecision::Permit => Navigation::Render {
                    path: path.to_string(),
                },
                AccessDecision::RedirectToLogin { attempted } => Navigation::Login { attempted },
                AccessDecision::RedirectToUnauthorized { attempted } => {
                    Navigation::Unauthorized { attempted }
                }
            },
        }
    }
}

fn segments_match(pattern: &str, path: &str) -> bool {
    let pattern_parts: Vec<&str> = pattern.trim_matches('/').split('/').collect();
    let path_parts: Vec<&str> = path.trim_matches('/').split('/').collect();

    pattern_parts.len() == path_parts.len()
        && pattern_parts
            .iter()
            .zip(path_parts.iter())
            .all(|(pattern_part, path_part)| {
                (pattern_part.starts_with(':') && !path_part.is_empty())
                    || pattern_part == path_part
            })
}
