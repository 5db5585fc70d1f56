//! Classifieds Admin Client Library
//!
//! A headless client for the administrative API of a classified-ads
//! marketplace: staff login, aggregate statistics, user moderation, ad
//! moderation, the category tree and abuse reports.
//!
//! Resource clients wrap the REST endpoints. Page controllers
//! ([`users::UsersPage`], [`ads::AdsPage`], ...) hold list state, filters
//! and modals on top of them and talk to the person at the keyboard
//! through an [`interaction::Interaction`].

pub mod ads;
pub mod auth;
pub mod categories;
pub mod config;
pub mod debounce;
pub mod error;
pub mod fetch;
pub mod interaction;
pub mod list;
pub mod pagination;
pub mod reports;
pub mod shell;
pub mod stats;
pub mod users;

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::ads::{AdsClient, AdsPage};
use crate::auth::{Auth, MemoryTokenStore, Session, SessionGuard, TokenStore};
use crate::categories::{CategoriesClient, CategoriesPage};
use crate::config::ClientOptions;
use crate::error::Error;
use crate::interaction::Interaction;
use crate::reports::{ReportsClient, ReportsPage};
use crate::shell::Shell;
use crate::stats::{StatsClient, StatsPage};
use crate::users::{UsersClient, UsersPage};

/// The main entry point for the admin client
#[derive(Debug, Clone)]
pub struct AdminClient {
    /// The API base URL, without a trailing slash
    pub url: String,
    /// HTTP client used for requests
    pub http_client: Client,
    /// Where the credential token lives
    pub session: Session,
    /// Client options
    pub options: ClientOptions,
    auth: Auth,
}

impl AdminClient {
    /// Create a client that keeps its token in memory
    ///
    /// # Example
    ///
    /// ```
    /// use classifieds_admin::AdminClient;
    ///
    /// let admin = AdminClient::new("https://api.example.com/api").unwrap();
    /// assert!(!admin.session.is_authenticated());
    /// ```
    pub fn new(api_url: &str) -> Result<Self, Error> {
        Self::new_with_options(
            api_url,
            ClientOptions::default(),
            Arc::new(MemoryTokenStore::new()),
        )
    }

    /// Create a client with custom options and token storage
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use std::time::Duration;
    /// use classifieds_admin::{AdminClient, auth::MemoryTokenStore, config::ClientOptions};
    ///
    /// let options = ClientOptions::default().with_search_debounce(Duration::from_millis(200));
    /// let admin = AdminClient::new_with_options(
    ///     "https://api.example.com/api",
    ///     options,
    ///     Arc::new(MemoryTokenStore::new()),
    /// )
    /// .unwrap();
    /// ```
    pub fn new_with_options(
        api_url: &str,
        options: ClientOptions,
        store: Arc<dyn TokenStore>,
    ) -> Result<Self, Error> {
        Url::parse(api_url)?;
        let url = api_url.trim_end_matches('/').to_string();

        let mut builder = Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        let session = Session::new(store, &options.token_key);
        let auth = Auth::new(&url, http_client.clone(), session.clone(), &options.client_info);

        Ok(Self {
            url,
            http_client,
            session,
            options,
            auth,
        })
    }

    /// Login and logout
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// Route guard over this client's session
    pub fn guard(&self) -> SessionGuard {
        SessionGuard::new(self.session.clone())
    }

    /// Navigation frame over this client's session
    pub fn shell(&self) -> Shell {
        Shell::new(self.session.clone())
    }

    pub fn stats(&self) -> StatsClient {
        StatsClient::new(
            &self.url,
            self.http_client.clone(),
            self.session.clone(),
            &self.options.client_info,
        )
    }

    pub fn users(&self) -> UsersClient {
        UsersClient::new(
            &self.url,
            self.http_client.clone(),
            self.session.clone(),
            &self.options.client_info,
        )
    }

    pub fn ads(&self) -> AdsClient {
        AdsClient::new(
            &self.url,
            self.http_client.clone(),
            self.session.clone(),
            &self.options.client_info,
        )
    }

    pub fn categories(&self) -> CategoriesClient {
        CategoriesClient::new(
            &self.url,
            self.http_client.clone(),
            self.session.clone(),
            &self.options.client_info,
        )
    }

    pub fn reports(&self) -> ReportsClient {
        ReportsClient::new(
            &self.url,
            self.http_client.clone(),
            self.session.clone(),
            &self.options.client_info,
        )
    }

    fn search_debounce(&self) -> Duration {
        self.options.search_debounce
    }

    pub fn stats_page(&self) -> StatsPage {
        StatsPage::new(self.stats())
    }

    pub fn users_page(&self, interaction: Arc<dyn Interaction>) -> UsersPage {
        UsersPage::new(self.users(), interaction, self.search_debounce())
    }

    pub fn ads_page(&self, interaction: Arc<dyn Interaction>) -> AdsPage {
        AdsPage::new(self.ads(), interaction, self.search_debounce())
    }

    pub fn categories_page(&self, interaction: Arc<dyn Interaction>) -> CategoriesPage {
        CategoriesPage::new(self.categories(), interaction)
    }

    pub fn reports_page(&self, interaction: Arc<dyn Interaction>) -> ReportsPage {
        ReportsPage::new(self.reports(), self.ads(), interaction)
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::AdminClient;
    pub use crate::auth::{FileTokenStore, MemoryTokenStore, Session, TokenStore};
    pub use crate::config::ClientOptions;
    pub use crate::error::Error;
    pub use crate::interaction::{AssumeYes, Interaction};
    pub use crate::list::ActionOutcome;
    pub use crate::shell::Route;
}
