//! Types for user moderation

use serde::{Deserialize, Serialize};
use std::fmt;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Staff account
    Admin,

    /// Regular account
    #[default]
    User,
}

impl Role {
    /// The other role
    pub fn toggled(self) -> Self {
        match self {
            Role::Admin => Role::User,
            Role::User => Role::Admin,
        }
    }

    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A marketplace account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user ID
    pub id: u64,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Phone number used to log in
    pub phone: Option<String>,

    /// Role
    #[serde(default)]
    pub role: Role,

    /// Whether the account may log in
    #[serde(default)]
    pub is_active: bool,

    /// The creation time
    pub created_at: Option<String>,

    /// The update time
    pub updated_at: Option<String>,
}

impl User {
    /// First letter of the name, used as an avatar placeholder
    pub fn initial(&self) -> Option<char> {
        self.name.chars().next()
    }

    /// Whether the account is staff
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Body of `PATCH /admin/user/{id}/status`
#[derive(Debug, Serialize)]
pub(crate) struct ActiveUpdate {
    pub is_active: bool,
}

/// Body of `PATCH /admin/user/{id}/role`
#[derive(Debug, Serialize)]
pub(crate) struct RoleUpdate {
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn role_toggles_between_the_two_values() {
        assert_eq!(Role::Admin.toggled(), Role::User);
        assert_eq!(Role::User.toggled(), Role::Admin);
    }

    #[test]
    fn decodes_sparse_user() {
        let user: User = serde_json::from_value(json!({
            "id": 3,
            "name": "Salem",
            "phone": "777000111",
            "role": "admin",
            "is_active": true,
            "avatar_url": null
        }))
        .unwrap();
        assert!(user.is_admin());
        assert_eq!(user.initial(), Some('S'));
        assert!(user.created_at.is_none());
    }

    #[test]
    fn role_defaults_to_user() {
        let user: User = serde_json::from_value(json!({"id": 1, "name": ""})).unwrap();
        assert_eq!(user.role, Role::User);
        assert_eq!(user.initial(), None);
    }
}
