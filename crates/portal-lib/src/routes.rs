// ============================
// portal-lib/src/routes.rs
// ============================
//! Named routes, access levels and the navigation guard.
use std::fmt;

use metrics::counter;
use tracing::debug;

use crate::auth::SessionOracle;
use crate::metrics::GUARD_REDIRECT;

/// Who may render a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Events,
    Programs,
    Login,
    Register,
    AdminDashboard,
    CreateEvent,
    EditEvent(String),
    CreateProgram,
    AdminUsers,
}

impl Route {
    /// Match a path. A trailing slash and any query string or fragment are
    /// ignored. Unknown paths return `None`.
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Some(Route::Home),
            ["events"] => Some(Route::Events),
            ["programs"] => Some(Route::Programs),
            ["login"] => Some(Route::Login),
            ["register"] => Some(Route::Register),
            ["admin", "dashboard"] => Some(Route::AdminDashboard),
            ["admin", "events", "create"] => Some(Route::CreateEvent),
            ["admin", "events", "edit", id] => Some(Route::EditEvent((*id).to_string())),
            ["admin", "programs", "create"] => Some(Route::CreateProgram),
            ["admin", "users"] => Some(Route::AdminUsers),
            _ => None,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Events => "/events".to_string(),
            Route::Programs => "/programs".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::AdminDashboard => "/admin/dashboard".to_string(),
            Route::CreateEvent => "/admin/events/create".to_string(),
            Route::EditEvent(id) => format!("/admin/events/edit/{id}"),
            Route::CreateProgram => "/admin/programs/create".to_string(),
            Route::AdminUsers => "/admin/users".to_string(),
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Route::Home | Route::Events | Route::Programs | Route::Login | Route::Register => {
                Access::Public
            }
            Route::AdminDashboard
            | Route::CreateEvent
            | Route::EditEvent(_)
            | Route::CreateProgram
            | Route::AdminUsers => Access::Admin,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Outcome of a navigation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    /// Replace the current location; the original target is not kept
    Redirect(Route),
}

/// Evaluates access on every navigation. Decisions are never cached.
#[derive(Clone)]
pub struct RouteGuard {
    oracle: SessionOracle,
}

impl RouteGuard {
    pub fn new(oracle: SessionOracle) -> Self {
        Self { oracle }
    }

    /// Resolve a raw path; unknown paths redirect home.
    pub fn navigate(&self, path: &str) -> Navigation {
        match Route::parse(path) {
            Some(route) => self.check(route),
            None => self.redirect(path, Route::Home),
        }
    }

    /// Gate a known route: signed-out users go to login, non-admins
    /// asking for an admin page go home.
    pub fn check(&self, route: Route) -> Navigation {
        if route.access() == Access::Public {
            return Navigation::Render(route);
        }
        if !self.oracle.is_authenticated() {
            return self.redirect(&route.path(), Route::Login);
        }
        if !self.oracle.is_admin() {
            return self.redirect(&route.path(), Route::Home);
        }
        Navigation::Render(route)
    }

    fn redirect(&self, from: &str, to: Route) -> Navigation {
        counter!(GUARD_REDIRECT).increment(1);
        debug!(%from, to = %to, "navigation redirected");
        Navigation::Redirect(to)
    }
}

/// Performs full navigation resets. A hard reload discards every piece of
/// in-memory view state, unlike an in-app route change.
pub trait Navigator: Send + Sync {
    fn hard_reload(&self, route: Route);
}
