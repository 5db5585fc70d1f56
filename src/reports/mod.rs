//! Abuse report triage

mod types;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::ads::AdsClient;
use crate::auth::Session;
use crate::error::Error;
use crate::fetch::Fetch;
use crate::interaction::Interaction;
use crate::list::{ActionOutcome, ListQuery, ListView, PageSource};
use crate::pagination::Page;

pub use types::*;

/// Client for the report endpoints
#[derive(Debug, Clone)]
pub struct ReportsClient {
    url: String,
    client: Client,
    session: Session,
    client_info: String,
}

impl ReportsClient {
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

    /// List reports, optionally filtered by status
    pub async fn list(&self, status: Option<&str>, page: u32) -> Result<Page<Report>, Error> {
        let url = self.get_url("/reports");

        Fetch::get(&self.client, &url)
            .header("X-Client-Info", &self.client_info)
            .session(&self.session)
            .query("status", status.unwrap_or_default())
            .query("page", &page.to_string())
            .execute::<Page<Report>>()
            .await
    }

    /// Mark a report resolved
    pub async fn resolve(&self, id: u64, admin_notes: &str) -> Result<(), Error> {
        let url = self.get_url(&format!("/report/{}/resolve", id));

        Fetch::post(&self.client, &url)
            .header("X-Client-Info", &self.client_info)
            .session(&self.session)
            .json(&Resolution { admin_notes })?
            .execute_unit()
            .await
    }

    pub async fn delete(&self, id: u64) -> Result<(), Error> {
        let url = self.get_url(&format!("/report/{}", id));

        Fetch::delete(&self.client, &url)
            .header("X-Client-Info", &self.client_info)
            .session(&self.session)
            .execute_unit()
            .await
    }
}

#[async_trait]
impl PageSource for ReportsClient {
    type Item = Report;

    fn name(&self) -> &'static str {
        "reports"
    }

    async fn fetch_page(&self, query: &ListQuery) -> Result<Page<Report>, Error> {
        self.list(query.status.as_deref(), query.page).await
    }
}

/// The resolution modal
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionModal {
    pub report: Report,
    pub notes: String,
}

/// State and actions of the reports page
pub struct ReportsPage {
    view: ListView<ReportsClient>,
    ads: AdsClient,
    modal: Mutex<Option<ResolutionModal>>,
    interaction: Arc<dyn Interaction>,
}

impl ReportsPage {
    /// Create the page filtered to pending reports
    ///
    /// There is no free-text search here, so filter changes fetch at once.
    pub fn new(client: ReportsClient, ads: AdsClient, interaction: Arc<dyn Interaction>) -> Self {
        Self {
            view: ListView::new(
                client,
                ListQuery::with_status(ReportStatus::Pending.as_str()),
                Duration::ZERO,
            ),
            ads,
            modal: Mutex::new(None),
            interaction,
        }
    }

    pub fn view(&self) -> &ListView<ReportsClient> {
        &self.view
    }

    /// Filter by status; `None` shows all reports
    pub fn set_status_filter(&self, status: Option<ReportStatus>) {
        self.view.set_status(status.as_ref().map(ReportStatus::as_str));
    }

    fn lock_modal(&self) -> MutexGuard<'_, Option<ResolutionModal>> {
        self.modal.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn modal(&self) -> Option<ResolutionModal> {
        self.lock_modal().clone()
    }

    fn loaded_report(&self, id: u64) -> Result<Report, Error> {
        self.view
            .find(|report| report.id == id)
            .or_else(|| {
                self.lock_modal()
                    .as_ref()
                    .map(|modal| modal.report.clone())
                    .filter(|report| report.id == id)
            })
            .ok_or_else(|| Error::not_loaded(format!("report {}", id)))
    }

    /// Open the resolution modal for a pending report
    pub fn open_resolution(&self, id: u64) -> Result<(), Error> {
        let report = self.loaded_report(id)?;
        if !report.can_resolve() {
            return Err(Error::AlreadyResolved(id));
        }
        *self.lock_modal() = Some(ResolutionModal {
            report,
            notes: String::new(),
        });
        Ok(())
    }

    /// Edit the notes of the open modal
    pub fn set_notes(&self, notes: &str) {
        if let Some(modal) = self.lock_modal().as_mut() {
            modal.notes = notes.to_string();
        }
    }

    pub fn close_resolution(&self) {
        *self.lock_modal() = None;
    }

    /// Resolve the report in the modal, then re-fetch and close it
    pub async fn submit_resolution(&self) -> Result<ActionOutcome, Error> {
        let modal = self
            .modal()
            .ok_or_else(|| Error::general("no report is being resolved"))?;
        let id = modal.report.id;

        let client = self.view.source();
        let outcome = self
            .view
            .run_action(
                &format!("report-{}", id),
                self.interaction.as_ref(),
                "Operation failed",
                || client.resolve(id, &modal.notes),
            )
            .await?;

        if outcome == ActionOutcome::Completed {
            self.close_resolution();
        }
        Ok(outcome)
    }

    /// Delete a report after confirmation
    pub async fn delete_report(&self, id: u64) -> Result<ActionOutcome, Error> {
        let key = format!("report-{}", id);
        if self.view.is_busy(&key) {
            return Ok(ActionOutcome::Busy);
        }
        if !self.interaction.confirm("Delete this report?") {
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

    /// Delete the ad a report points at
    ///
    /// A pending report is resolved with [`AD_DELETED_NOTE`] afterwards.
    /// Reports without an ad are left alone.
    pub async fn delete_reported_ad(&self, report_id: u64) -> Result<ActionOutcome, Error> {
        let report = self.loaded_report(report_id)?;
        let Some(ad) = report.ad.clone() else {
            return Ok(ActionOutcome::Cancelled);
        };
        let key = format!("ad-{}", report_id);
        if self.view.is_busy(&key) {
            return Ok(ActionOutcome::Busy);
        }

        if !self.interaction.confirm(&format!(
            "Permanently delete the ad \"{}\" from the marketplace?",
            ad.title
        )) {
            return Ok(ActionOutcome::Cancelled);
        }

        let ads = &self.ads;
        let reports = self.view.source();
        let interaction = self.interaction.as_ref();
        let pending = report.is_pending();
        let outcome = self
            .view
            .run_action(&key, interaction, "Ad delete failed", || async move {
                ads.delete(ad.id).await?;
                interaction.alert("Ad deleted");
                if pending {
                    reports.resolve(report_id, AD_DELETED_NOTE).await?;
                }
                Ok(())
            })
            .await?;

        if outcome == ActionOutcome::Completed
            && self.modal().is_some_and(|modal| modal.report.id == report_id)
        {
            self.close_resolution();
        }
        Ok(outcome)
    }
}
