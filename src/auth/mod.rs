//! Staff login, logout and the session they manage

mod guard;
mod session;
mod types;

use log::{info, warn};
use reqwest::Client;

use crate::error::Error;
use crate::fetch::Fetch;
use crate::shell::Route;

pub use guard::*;
pub use session::*;
pub use types::*;

/// Fallback shown when a login fails without a server message
pub const LOGIN_FAILED: &str = "Login failed";

/// Client for staff authentication
#[derive(Debug, Clone)]
pub struct Auth {
    /// The API base URL
    url: String,

    /// HTTP client used for requests
    client: Client,

    /// Where the token is kept
    session: Session,

    client_info: String,
}

impl Auth {
    /// Create a new Auth client
    pub(crate) fn new(url: &str, client: Client, session: Session, client_info: &str) -> Self {
        Self {
            url: url.to_string(),
            client,
            session,
            client_info: client_info.to_string(),
        }
    }

    fn get_url(&self, path: &str) -> String {
        format!("{}/admin{}", self.url, path)
    }

    /// The session this client writes to
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Log in with phone and password and store the returned token
    pub async fn login(&self, phone: &str, password: &str) -> Result<LoginResponse, Error> {
        let url = self.get_url("/login");

        let body = LoginRequest {
            phone: phone.to_string(),
            password: password.to_string(),
        };

        // no session attached: a 401 here means bad credentials, not an expired token
        let result = Fetch::post(&self.client, &url)
            .header("X-Client-Info", &self.client_info)
            .json(&body)?
            .execute::<LoginResponse>()
            .await?;

        self.session.store_token(&result.access_token)?;
        info!("Logged in as {}", phone);

        Ok(result)
    }

    /// Forget the stored token
    pub fn logout(&self) -> Result<(), Error> {
        self.session.clear()?;
        info!("Logged out");
        Ok(())
    }
}

/// State of the login screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub phone: String,
    pub password: String,

    /// Message from the last failed attempt
    pub error: Option<String>,

    pub loading: bool,
}

impl LoginForm {
    pub fn new(phone: &str, password: &str) -> Self {
        Self {
            phone: phone.to_string(),
            password: password.to_string(),
            ..Self::default()
        }
    }

    /// Submit the credentials
    ///
    /// Returns the route to navigate to on success. On failure `error` is
    /// set, nothing is stored and `None` is returned.
    pub async fn submit(&mut self, auth: &Auth) -> Option<Route> {
        self.loading = true;
        self.error = None;

        let result = auth.login(&self.phone, &self.password).await;
        self.loading = false;

        match result {
            Ok(_) => Some(Route::Stats),
            Err(err) => {
                warn!("Login failed: {}", err);
                self.error = Some(err.user_message(LOGIN_FAILED).to_string());
                None
            }
        }
    }
}
