//! Ad moderation: listing, detail overlay, status changes and featuring

mod types;

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use log::error;
use reqwest::Client;

use crate::auth::Session;
use crate::error::Error;
use crate::fetch::Fetch;
use crate::interaction::Interaction;
use crate::list::{ActionOutcome, ListQuery, ListView, PageSource};
use crate::pagination::Page;

pub use types::*;

/// Client for the ad endpoints
#[derive(Debug, Clone)]
pub struct AdsClient {
    url: String,
    client: Client,
    session: Session,
    client_info: String,
}

impl AdsClient {
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

    /// List ads matching `search` and `status`
    pub async fn list(
        &self,
        search: &str,
        status: Option<&str>,
        page: u32,
    ) -> Result<Page<Ad>, Error> {
        let url = self.get_url("/ads");

        Fetch::get(&self.client, &url)
            .header("X-Client-Info", &self.client_info)
            .session(&self.session)
            .query("search", search)
            .query("status", status.unwrap_or_default())
            .query("page", &page.to_string())
            .execute::<Page<Ad>>()
            .await
    }

    /// Fetch the full representation of one ad
    pub async fn get(&self, id: u64) -> Result<AdDetail, Error> {
        let url = self.get_url(&format!("/ad/{}", id));

        let wrapped = Fetch::get(&self.client, &url)
            .header("X-Client-Info", &self.client_info)
            .session(&self.session)
            .execute::<Wrapped<AdDetail>>()
            .await?;

        Ok(wrapped.data)
    }

    /// Move an ad to `status`; `reject_reason` accompanies rejections
    pub async fn update_status(
        &self,
        id: u64,
        status: AdStatus,
        reject_reason: Option<&str>,
    ) -> Result<(), Error> {
        let url = self.get_url(&format!("/ad/{}/update-status", id));
        let body = StatusUpdate {
            status,
            reject_reason: reject_reason.map(str::to_string),
        };

        Fetch::post(&self.client, &url)
            .header("X-Client-Info", &self.client_info)
            .session(&self.session)
            .json(&body)?
            .execute_unit()
            .await
    }

    /// Delete an ad
    pub async fn delete(&self, id: u64) -> Result<(), Error> {
        let url = self.get_url(&format!("/ad/{}", id));

        Fetch::delete(&self.client, &url)
            .header("X-Client-Info", &self.client_info)
            .session(&self.session)
            .execute_unit()
            .await
    }

    /// Feature an ad for [`FEATURE_DURATION_DAYS`]
    pub async fn activate_featured(&self, id: u64) -> Result<(), Error> {
        let url = self.get_url(&format!("/ad/{}/activate-featured", id));

        Fetch::post(&self.client, &url)
            .header("X-Client-Info", &self.client_info)
            .session(&self.session)
            .json(&FeatureRequest {
                duration_days: FEATURE_DURATION_DAYS,
            })?
            .execute_unit()
            .await
    }

    /// End an ad's featured window
    pub async fn deactivate_featured(&self, id: u64) -> Result<(), Error> {
        let url = self.get_url(&format!("/ad/{}/deactivate-featured", id));

        Fetch::post(&self.client, &url)
            .header("X-Client-Info", &self.client_info)
            .session(&self.session)
            .execute_unit()
            .await
    }
}

#[async_trait]
impl PageSource for AdsClient {
    type Item = Ad;

    fn name(&self) -> &'static str {
        "ads"
    }

    async fn fetch_page(&self, query: &ListQuery) -> Result<Page<Ad>, Error> {
        self.list(&query.search, query.status.as_deref(), query.page).await
    }
}

/// State and actions of the ads page, including the detail overlay
pub struct AdsPage {
    view: ListView<AdsClient>,
    detail: Mutex<Option<AdDetail>>,
    interaction: Arc<dyn Interaction>,
}

impl AdsPage {
    /// Create the page; search and filters are debounced by `debounce`
    pub fn new(client: AdsClient, interaction: Arc<dyn Interaction>, debounce: Duration) -> Self {
        Self {
            view: ListView::new(client, ListQuery::default(), debounce),
            detail: Mutex::new(None),
            interaction,
        }
    }

    /// The list view (search, status filter, paging, snapshot)
    pub fn view(&self) -> &ListView<AdsClient> {
        &self.view
    }

    /// Filter by status; `None` shows every status
    pub fn set_status_filter(&self, status: Option<AdStatus>) {
        self.view.set_status(status.as_ref().map(AdStatus::as_str));
    }

    /// The ad shown in the overlay
    pub fn detail(&self) -> Option<AdDetail> {
        self.detail.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn set_detail(&self, detail: Option<AdDetail>) {
        *self.detail.lock().unwrap_or_else(PoisonError::into_inner) = detail;
    }

    fn detail_id(&self) -> Option<u64> {
        self.detail
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|detail| detail.id)
    }

    /// Load an ad into the overlay
    pub async fn open_detail(&self, id: u64) -> Result<(), Error> {
        match self.view.source().get(id).await {
            Ok(detail) => {
                self.set_detail(Some(detail));
                Ok(())
            }
            Err(err) => {
                error!("Error fetching ad details: {}", err);
                self.interaction.alert("Failed to load ad details");
                Err(err)
            }
        }
    }

    /// Close the overlay
    pub fn close_detail(&self) {
        self.set_detail(None);
    }

    async fn reload_detail(&self, id: u64) {
        if self.detail_id() == Some(id) {
            // failures are already alerted by open_detail
            let _ = self.open_detail(id).await;
        }
    }

    fn current_status(&self, id: u64) -> Result<AdStatus, Error> {
        if let Some(detail) = self.detail().filter(|detail| detail.id == id) {
            return Ok(detail.status);
        }
        self.view
            .find(|ad| ad.id == id)
            .map(|ad| ad.status)
            .ok_or_else(|| Error::not_loaded(format!("ad {}", id)))
    }

    fn action_key(id: u64) -> String {
        format!("ad-{}", id)
    }

    /// pending → active
    pub async fn approve(&self, id: u64) -> Result<ActionOutcome, Error> {
        self.update_status(id, AdStatus::Active).await
    }

    /// pending|active → rejected, asking for a reason
    pub async fn reject(&self, id: u64) -> Result<ActionOutcome, Error> {
        self.update_status(id, AdStatus::Rejected).await
    }

    /// Move an ad to `target` if the transition is offered for its current status
    pub async fn update_status(&self, id: u64, target: AdStatus) -> Result<ActionOutcome, Error> {
        let current = self.current_status(id)?;
        if !current.can_transition_to(target) {
            return Err(Error::InvalidTransition {
                from: current,
                to: target,
            });
        }
        let key = Self::action_key(id);
        if self.view.is_busy(&key) {
            return Ok(ActionOutcome::Busy);
        }

        if !self
            .interaction
            .confirm(&format!("Change this ad's status to {}?", target.label()))
        {
            return Ok(ActionOutcome::Cancelled);
        }

        let reason = if target == AdStatus::Rejected {
            match self.interaction.prompt("Enter the rejection reason:") {
                Some(reason) => Some(reason),
                None => return Ok(ActionOutcome::Cancelled),
            }
        } else {
            None
        };

        let client = self.view.source();
        let outcome = self
            .view
            .run_action(
                &key,
                self.interaction.as_ref(),
                "Operation failed",
                || client.update_status(id, target, reason.as_deref()),
            )
            .await?;

        if outcome == ActionOutcome::Completed {
            self.reload_detail(id).await;
        }
        Ok(outcome)
    }

    /// Feature an ad for seven days after confirmation
    pub async fn feature(&self, id: u64) -> Result<ActionOutcome, Error> {
        let key = Self::action_key(id);
        if self.view.is_busy(&key) {
            return Ok(ActionOutcome::Busy);
        }
        if !self.interaction.confirm(&format!(
            "Feature this ad for {} days?",
            FEATURE_DURATION_DAYS
        )) {
            return Ok(ActionOutcome::Cancelled);
        }

        let client = self.view.source();
        let outcome = self
            .view
            .run_action(
                &key,
                self.interaction.as_ref(),
                "Operation failed",
                || client.activate_featured(id),
            )
            .await?;

        if outcome == ActionOutcome::Completed {
            self.reload_detail(id).await;
            self.interaction
                .alert(&format!("Ad featured for {} days", FEATURE_DURATION_DAYS));
        }
        Ok(outcome)
    }

    /// End an ad's featured window after confirmation
    pub async fn unfeature(&self, id: u64) -> Result<ActionOutcome, Error> {
        let key = Self::action_key(id);
        if self.view.is_busy(&key) {
            return Ok(ActionOutcome::Busy);
        }
        if !self.interaction.confirm("Stop featuring this ad?") {
            return Ok(ActionOutcome::Cancelled);
        }

        let client = self.view.source();
        let outcome = self
            .view
            .run_action(
                &key,
                self.interaction.as_ref(),
                "Operation failed",
                || client.deactivate_featured(id),
            )
            .await?;

        if outcome == ActionOutcome::Completed {
            self.reload_detail(id).await;
            self.interaction.alert("Ad is no longer featured");
        }
        Ok(outcome)
    }

    /// Permanently delete an ad after confirmation; closes the overlay if it showed it
    pub async fn delete(&self, id: u64) -> Result<ActionOutcome, Error> {
        let key = Self::action_key(id);
        if self.view.is_busy(&key) {
            return Ok(ActionOutcome::Busy);
        }
        if !self.interaction.confirm("Delete this ad permanently?") {
            return Ok(ActionOutcome::Cancelled);
        }

        let client = self.view.source();
        let outcome = self
            .view
            .run_action(
                &key,
                self.interaction.as_ref(),
                "Delete failed",
                || client.delete(id),
            )
            .await?;

        if outcome == ActionOutcome::Completed && self.detail_id() == Some(id) {
            self.close_detail();
        }
        Ok(outcome)
    }
}
