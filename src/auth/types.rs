//! Types for staff login

use serde::{Deserialize, Serialize};

/// Body of `POST /admin/login`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

/// Response of `POST /admin/login`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent calls
    pub access_token: String,

    #[serde(default)]
    pub token_type: Option<String>,
}
