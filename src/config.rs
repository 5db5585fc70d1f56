//! Configuration options for the admin client

use std::time::Duration;

/// Storage key the credential token lives under
pub const DEFAULT_TOKEN_KEY: &str = "admin_token";

/// Delay used to coalesce search keystrokes into one request
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Configuration options for the admin client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// Debounce delay for search-as-you-type list views
    pub search_debounce: Duration,

    /// Key under which the token is persisted
    pub token_key: String,

    /// Value of the `X-Client-Info` header
    pub client_info: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(30)),
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            token_key: DEFAULT_TOKEN_KEY.to_string(),
            client_info: format!("classifieds-admin/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientOptions {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the search debounce delay
    pub fn with_search_debounce(mut self, value: Duration) -> Self {
        self.search_debounce = value;
        self
    }

    /// Set the token storage key
    pub fn with_token_key(mut self, value: &str) -> Self {
        self.token_key = value.to_string();
        self
    }

    /// Set the client info header
    pub fn with_client_info(mut self, value: &str) -> Self {
        self.client_info = value.to_string();
        self
    }
}
