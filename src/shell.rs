//! Navigation frame: routes, sidebar and logout

use std::fmt;

use crate::auth::{Session, SessionGuard};
use crate::error::Error;

/// Screens of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    /// `/`, which lands on the stats screen
    Index,
    Stats,
    Users,
    Ads,
    Categories,
    Reports,
}

impl Route {
    /// Every route except login requires a token
    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login)
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Index => "/",
            Route::Stats => "/stats",
            Route::Users => "/users",
            Route::Ads => "/ads",
            Route::Categories => "/categories",
            Route::Reports => "/reports",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.trim_end_matches('/');
        [
            Route::Login,
            Route::Stats,
            Route::Users,
            Route::Ads,
            Route::Categories,
            Route::Reports,
        ]
        .into_iter()
        .find(|route| route.path() == path)
        .or_else(|| path.is_empty().then_some(Route::Index))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// A sidebar entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub route: Route,
    pub label: &'static str,
}

/// Sidebar entries, in display order
pub const NAV_ITEMS: [NavItem; 5] = [
    NavItem {
        route: Route::Stats,
        label: "Statistics",
    },
    NavItem {
        route: Route::Users,
        label: "Users",
    },
    NavItem {
        route: Route::Ads,
        label: "Ads",
    },
    NavItem {
        route: Route::Reports,
        label: "Reports",
    },
    NavItem {
        route: Route::Categories,
        label: "Categories",
    },
];

/// Current route and sidebar state
#[derive(Debug, Clone)]
pub struct Shell {
    guard: SessionGuard,
    route: Route,
    sidebar_open: bool,
    narrow: bool,
}

impl Shell {
    /// Start at `/`, resolved through the guard
    pub fn new(session: Session) -> Self {
        let guard = SessionGuard::new(session);
        let route = guard.resolve(Route::Index);
        Self {
            guard,
            route,
            sidebar_open: false,
            narrow: false,
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn is_sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    /// Mark the layout as narrow (below 1024 px)
    pub fn set_narrow(&mut self, narrow: bool) {
        self.narrow = narrow;
    }

    pub fn is_narrow(&self) -> bool {
        self.narrow
    }

    /// Go to `route`; returns where the guard actually sent us
    ///
    /// On a narrow layout the sidebar closes.
    pub fn navigate(&mut self, route: Route) -> Route {
        self.route = self.guard.resolve(route);
        if self.narrow {
            self.sidebar_open = false;
        }
        self.route
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    pub fn close_sidebar(&mut self) {
        self.sidebar_open = false;
    }

    /// Clear the token and return to login
    pub fn logout(&mut self, session: &Session) -> Result<Route, Error> {
        session.clear()?;
        Ok(self.navigate(Route::Login))
    }
}
