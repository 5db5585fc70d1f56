//! Route protection based on token presence

use log::debug;

use super::Session;
use crate::error::Error;
use crate::shell::Route;

/// Decides where a navigation actually lands
///
/// Only the presence of a token is checked; there is no expiry or role
/// check on this side.
#[derive(Debug, Clone)]
pub struct SessionGuard {
    session: Session,
}

impl SessionGuard {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// The route to show when `route` is requested
    pub fn resolve(&self, route: Route) -> Route {
        if !route.is_protected() {
            return route;
        }
        if !self.session.is_authenticated() {
            debug!("No token stored, redirecting {:?} to login", route);
            return Route::Login;
        }
        match route {
            Route::Index => Route::Stats,
            other => other,
        }
    }

    /// Fail with [`Error::NotAuthenticated`] when no token is stored
    pub fn require(&self) -> Result<(), Error> {
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(Error::NotAuthenticated)
        }
    }
}
