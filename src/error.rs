//! Error handling for the admin client

use std::fmt;
use thiserror::Error;

use crate::ads::AdStatus;

/// Unified error type for the admin client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Token storage errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The API answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Message reported by the server, or the raw body
        message: String,
        /// Whether `message` came from the body's `message` field
        from_server: bool,
    },

    /// The API rejected the stored token; the session has been cleared
    #[error("Unauthorized: the session token was rejected")]
    Unauthorized,

    /// No token is stored
    #[error("Not authenticated")]
    NotAuthenticated,

    /// The ad status change is not offered for the current status
    #[error("Cannot move ad from {from} to {to}")]
    InvalidTransition {
        /// Current status
        from: AdStatus,
        /// Requested status
        to: AdStatus,
    },

    /// The catch-all category cannot be edited or deleted
    #[error("Category {0} is protected")]
    ProtectedCategory(u64),

    /// The report is already resolved
    #[error("Report {0} is already resolved")]
    AlreadyResolved(u64),

    /// The entity is not present in the loaded page
    #[error("{0} is not loaded")]
    NotLoaded(String),

    /// General errors
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Create a new API error from a status and a raw response body
    pub fn api(status: u16, body: &str) -> Self {
        let server_message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| value.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .filter(|message| !message.is_empty());

        match server_message {
            Some(message) => Error::Api {
                status,
                message,
                from_server: true,
            },
            None => Error::Api {
                status,
                message: body.to_string(),
                from_server: false,
            },
        }
    }

    /// Create a new "not loaded" error
    pub fn not_loaded<T: fmt::Display>(what: T) -> Self {
        Error::NotLoaded(what.to_string())
    }

    /// Create a new general error
    pub fn general<T: fmt::Display>(msg: T) -> Self {
        Error::General(msg.to_string())
    }

    /// The message the server put in the response body, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Error::Api {
                message,
                from_server: true,
                ..
            } => Some(message),
            _ => None,
        }
    }

    /// The server message, or `fallback` when the server gave none
    pub fn user_message<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.server_message().unwrap_or(fallback)
    }
}
