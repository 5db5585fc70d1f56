//! Category tree management

mod types;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::error;
use reqwest::Client;

use crate::auth::Session;
use crate::error::Error;
use crate::fetch::Fetch;
use crate::interaction::{Interaction, UNKNOWN_ERROR};
use crate::list::ActionOutcome;

pub use types::*;

/// Client for the category endpoints
#[derive(Debug, Clone)]
pub struct CategoriesClient {
    url: String,
    client: Client,
    session: Session,
    client_info: String,
}

impl CategoriesClient {
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

    /// The whole forest; not paginated
    pub async fn list(&self) -> Result<Vec<Category>, Error> {
        let url = self.get_url("/categories");

        let list = Fetch::get(&self.client, &url)
            .header("X-Client-Info", &self.client_info)
            .session(&self.session)
            .execute::<CategoryList>()
            .await?;

        Ok(list.into())
    }

    pub async fn create(&self, form: &CategoryForm) -> Result<(), Error> {
        let url = self.get_url("/category");

        Fetch::post(&self.client, &url)
            .header("X-Client-Info", &self.client_info)
            .session(&self.session)
            .json(form)?
            .execute_unit()
            .await
    }

    pub async fn update(&self, id: u64, form: &CategoryForm) -> Result<(), Error> {
        let url = self.get_url(&format!("/category/{}/update", id));

        Fetch::post(&self.client, &url)
            .header("X-Client-Info", &self.client_info)
            .session(&self.session)
            .json(form)?
            .execute_unit()
            .await
    }

    /// Delete a category; the server removes its descendants too
    pub async fn delete(&self, id: u64) -> Result<(), Error> {
        let url = self.get_url(&format!("/category/{}", id));

        Fetch::delete(&self.client, &url)
            .header("X-Client-Info", &self.client_info)
            .session(&self.session)
            .execute_unit()
            .await
    }
}

/// The create/edit modal
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryModal {
    /// Category being edited; `None` when creating
    pub editing: Option<u64>,
    pub form: CategoryForm,
}

#[derive(Debug, Default)]
struct PageState {
    tree: CategoryTree,
    modal: Option<CategoryModal>,
    loading: bool,
    submitting: bool,
}

/// State and actions of the categories page
pub struct CategoriesPage {
    client: CategoriesClient,
    state: Mutex<PageState>,
    interaction: Arc<dyn Interaction>,
}

impl CategoriesPage {
    pub fn new(client: CategoriesClient, interaction: Arc<dyn Interaction>) -> Self {
        Self {
            client,
            state: Mutex::new(PageState::default()),
            interaction,
        }
    }

    fn lock(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the tree
    pub fn tree(&self) -> CategoryTree {
        self.lock().tree.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    pub fn is_submitting(&self) -> bool {
        self.lock().submitting
    }

    /// Expand or collapse a node
    pub fn toggle(&self, id: u64) {
        self.lock().tree.toggle(id);
    }

    /// Fetch the forest; failures are logged and the old tree kept
    pub async fn load(&self) {
        self.lock().loading = true;
        let result = self.client.list().await;

        let mut state = self.lock();
        state.loading = false;
        match result {
            Ok(roots) => state.tree.replace(roots),
            Err(err) => error!("Error fetching categories: {}", err),
        }
    }

    /// The open modal, if any
    pub fn modal(&self) -> Option<CategoryModal> {
        self.lock().modal.clone()
    }

    /// Open an empty modal, optionally for a child of `parent_id`
    pub fn open_create(&self, parent_id: Option<u64>) {
        self.lock().modal = Some(CategoryModal {
            editing: None,
            form: CategoryForm::new(parent_id),
        });
    }

    /// Open the modal pre-filled from category `id`
    pub fn open_edit(&self, id: u64) -> Result<(), Error> {
        let mut state = self.lock();
        let category = state
            .tree
            .find(id)
            .ok_or_else(|| Error::not_loaded(format!("category {}", id)))?;
        if category.is_protected() {
            return Err(Error::ProtectedCategory(id));
        }
        let form = CategoryForm::from_category(category);
        state.modal = Some(CategoryModal {
            editing: Some(id),
            form,
        });
        Ok(())
    }

    /// Replace the form of the open modal
    pub fn set_form(&self, form: CategoryForm) {
        if let Some(modal) = self.lock().modal.as_mut() {
            modal.form = form;
        }
    }

    pub fn close_modal(&self) {
        self.lock().modal = None;
    }

    /// Create or update from the open modal, then re-fetch and close it
    ///
    /// On failure the user is alerted and the modal stays open.
    pub async fn submit(&self) -> Result<(), Error> {
        let modal = {
            let mut state = self.lock();
            let modal = state
                .modal
                .clone()
                .ok_or_else(|| Error::general("no category form is open"))?;
            state.submitting = true;
            modal
        };

        let result = match modal.editing {
            Some(id) => self.client.update(id, &modal.form).await,
            None => self.client.create(&modal.form).await,
        };
        self.lock().submitting = false;

        match result {
            Ok(()) => {
                self.load().await;
                self.close_modal();
                Ok(())
            }
            Err(err) => {
                self.interaction.alert(&format!(
                    "Operation failed: {}",
                    err.user_message(UNKNOWN_ERROR)
                ));
                Err(err)
            }
        }
    }

    /// Delete a category and its descendants after confirmation
    pub async fn delete(&self, id: u64) -> Result<ActionOutcome, Error> {
        if self.lock().tree.find(id).is_some_and(Category::is_protected) {
            return Err(Error::ProtectedCategory(id));
        }
        if !self.interaction.confirm(
            "Delete this category? All of its subcategories will be deleted too.",
        ) {
            return Ok(ActionOutcome::Cancelled);
        }

        match self.client.delete(id).await {
            Ok(()) => {
                self.load().await;
                Ok(ActionOutcome::Completed)
            }
            Err(err) => {
                self.interaction.alert(&format!(
                    "Delete failed: {}",
                    err.user_message(UNKNOWN_ERROR)
                ));
                Err(err)
            }
        }
    }
}
