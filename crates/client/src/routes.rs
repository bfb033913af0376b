//! Client route table and navigation.
//!
//! Route resolution is a pure function of the path and the current
//! [`AuthState`]; [`Navigator`] adds the waiting, redirect following and
//! history on top.

use std::sync::Arc;

use crewdash_auth::{Access, AuthState, Role, RoleSet, check_access};

use crate::context::AuthContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Dashboard,
    Admin,
    /// `/`, always forwarded to the dashboard.
    Root,
    Unauthorized,
    /// Catch-all for unknown paths.
    NotFound,
}

impl Route {
    /// Match a path exactly per segment. Trailing slashes, query and
    /// fragment are ignored.
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        match path.trim_end_matches('/') {
            "" => Route::Root,
            "/login" => Route::Login,
            "/dashboard" => Route::Dashboard,
            "/admin" => Route::Admin,
            "/unauthorized" => Route::Unauthorized,
            _ => Route::NotFound,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Dashboard => "/dashboard",
            Route::Admin => "/admin",
            Route::Root => "/",
            Route::Unauthorized => "/unauthorized",
            Route::NotFound => "/404",
        }
    }

    /// Role requirement of a guarded route; `None` for public routes.
    ///
    /// An empty set means any authenticated user.
    pub fn required_roles(self) -> Option<RoleSet> {
        match self {
            Route::Dashboard => Some(RoleSet::empty()),
            Route::Admin => Some(RoleSet::single(Role::ADMIN)),
            Route::Login | Route::Root | Route::Unauthorized | Route::NotFound => None,
        }
    }
}

/// One resolution step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Render(Route),
    Redirect(Route),
    /// Auth state has not resolved yet.
    Pending,
}

pub fn resolve_route(route: Route, state: &AuthState) -> Resolution {
    if route == Route::Root {
        return Resolution::Redirect(Route::Dashboard);
    }

    let Some(required) = route.required_roles() else {
        return Resolution::Render(route);
    };

    match check_access(state, &required) {
        Access::Pending => Resolution::Pending,
        Access::Granted => Resolution::Render(route),
        Access::RedirectToLogin => Resolution::Redirect(Route::Login),
        Access::RedirectToUnauthorized => Resolution::Redirect(Route::Unauthorized),
    }
}

/// Where a navigation landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub requested_path: String,
    pub route: Route,
    /// First route of the request when redirects were followed.
    pub redirected_from: Option<Route>,
}

impl Navigation {
    pub fn status(&self) -> u16 {
        match self.route {
            Route::NotFound => 404,
            _ => 200,
        }
    }

    fn landing_path(&self) -> &str {
        match self.route {
            Route::NotFound => &self.requested_path,
            route => route.path(),
        }
    }
}

pub struct Navigator {
    context: Arc<AuthContext>,
    history: Vec<Navigation>,
}

impl Navigator {
    pub fn new(context: Arc<AuthContext>) -> Self {
        Self {
            context,
            history: Vec::new(),
        }
    }

    /// Navigate to `path` once the auth state has resolved, following
    /// redirects to the final view.
    pub async fn navigate(&mut self, path: &str) -> Navigation {
        let requested = Route::parse(path);
        let mut state = self.context.resolved().await;
        let mut route = requested;

        let route = loop {
            match resolve_route(route, &state) {
                Resolution::Render(landing) => break landing,
                Resolution::Redirect(next) => route = next,
                Resolution::Pending => state = self.context.resolved().await,
            }
        };

        let navigation = Navigation {
            requested_path: path.to_string(),
            route,
            redirected_from: (route != requested).then_some(requested),
        };
        tracing::debug!(
            path,
            route = ?navigation.route,
            redirected_from = ?navigation.redirected_from,
            "navigated"
        );

        self.history.push(navigation.clone());
        navigation
    }

    /// Return to the previous view, re-checking access. Without one, land on
    /// the dashboard.
    pub async fn go_back(&mut self) -> Navigation {
        self.history.pop();
        let target = self
            .history
            .pop()
            .map(|previous| previous.landing_path().to_string())
            .unwrap_or_else(|| Route::Dashboard.path().to_string());

        self.navigate(&target).await
    }

    pub fn current(&self) -> Option<&Navigation> {
        self.history.last()
    }
}
