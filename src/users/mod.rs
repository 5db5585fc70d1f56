//! User account moderation

mod types;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::auth::Session;
use crate::error::Error;
use crate::fetch::Fetch;
use crate::interaction::Interaction;
use crate::list::{ActionOutcome, ListQuery, ListView, PageSource};
use crate::pagination::Page;

pub use types::*;

/// Client for the user endpoints
#[derive(Debug, Clone)]
pub struct UsersClient {
    url: String,
    client: Client,
    session: Session,
    client_info: String,
}

impl UsersClient {
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

    /// List users matching `search`
    pub async fn list(&self, search: &str, page: u32) -> Result<Page<User>, Error> {
        let url = self.get_url("/users");

        Fetch::get(&self.client, &url)
            .header("X-Client-Info", &self.client_info)
            .session(&self.session)
            .query("search", search)
            .query("page", &page.to_string())
            .execute::<Page<User>>()
            .await
    }

    /// Enable or disable an account
    pub async fn set_active(&self, id: u64, is_active: bool) -> Result<(), Error> {
        let url = self.get_url(&format!("/user/{}/status", id));

        Fetch::patch(&self.client, &url)
            .header("X-Client-Info", &self.client_info)
            .session(&self.session)
            .json(&ActiveUpdate { is_active })?
            .execute_unit()
            .await
    }

    /// Change an account's role
    pub async fn set_role(&self, id: u64, role: Role) -> Result<(), Error> {
        let url = self.get_url(&format!("/user/{}/role", id));

        Fetch::patch(&self.client, &url)
            .header("X-Client-Info", &self.client_info)
            .session(&self.session)
            .json(&RoleUpdate { role })?
            .execute_unit()
            .await
    }

    /// Delete an account; the server removes everything it owns
    pub async fn delete(&self, id: u64) -> Result<(), Error> {
        let url = self.get_url(&format!("/user/{}", id));

        Fetch::delete(&self.client, &url)
            .header("X-Client-Info", &self.client_info)
            .session(&self.session)
            .execute_unit()
            .await
    }
}

#[async_trait]
impl PageSource for UsersClient {
    type Item = User;

    fn name(&self) -> &'static str {
        "users"
    }

    async fn fetch_page(&self, query: &ListQuery) -> Result<Page<User>, Error> {
        self.list(&query.search, query.page).await
    }
}

/// State and actions of the users page
pub struct UsersPage {
    view: ListView<UsersClient>,
    interaction: Arc<dyn Interaction>,
}

impl UsersPage {
    /// Create the page; search is debounced by `debounce`
    pub fn new(client: UsersClient, interaction: Arc<dyn Interaction>, debounce: Duration) -> Self {
        Self {
            view: ListView::new(client, ListQuery::default(), debounce),
            interaction,
        }
    }

    /// The list view (search, paging, snapshot)
    pub fn view(&self) -> &ListView<UsersClient> {
        &self.view
    }

    fn action_key(id: u64) -> String {
        format!("user-{}", id)
    }

    fn loaded_user(&self, id: u64) -> Result<User, Error> {
        self.view
            .find(|user| user.id == id)
            .ok_or_else(|| Error::not_loaded(format!("user {}", id)))
    }

    /// Flip the active flag; this one does not ask for confirmation
    pub async fn toggle_active(&self, id: u64) -> Result<ActionOutcome, Error> {
        let user = self.loaded_user(id)?;
        let client = self.view.source();

        self.view
            .run_action(
                &Self::action_key(id),
                self.interaction.as_ref(),
                "Operation failed",
                || client.set_active(id, !user.is_active),
            )
            .await
    }

    /// Switch between admin and user after confirmation
    pub async fn toggle_role(&self, id: u64) -> Result<ActionOutcome, Error> {
        let user = self.loaded_user(id)?;
        let new_role = user.role.toggled();
        let label = match new_role {
            Role::Admin => "administrator",
            Role::User => "regular user",
        };
        let key = Self::action_key(id);
        if self.view.is_busy(&key) {
            return Ok(ActionOutcome::Busy);
        }
        if !self
            .interaction
            .confirm(&format!("Change {}'s role to {}?", user.name, label))
        {
            return Ok(ActionOutcome::Cancelled);
        }

        let client = self.view.source();
        self.view
            .run_action(
                &key,
                self.interaction.as_ref(),
                "Operation failed",
                || client.set_role(id, new_role),
            )
            .await
    }

    /// Permanently delete a user after confirmation
    pub async fn delete(&self, id: u64) -> Result<ActionOutcome, Error> {
        let key = Self::action_key(id);
        if self.view.is_busy(&key) {
            return Ok(ActionOutcome::Busy);
        }
        if !self.interaction.confirm(
            "Delete this user permanently? All of their data and ads will be removed.",
        ) {
            return Ok(ActionOutcome::Cancelled);
        }

        let client = self.view.source();
        self.view
            .run_action(
                &key,
                self.interaction.as_ref(),
                "Delete failed",
                || client.delete(id),
            )
            .await
    }
}
