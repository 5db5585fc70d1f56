//! Aggregate marketplace counters

use std::sync::{Mutex, PoisonError};

use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::auth::Session;
use crate::error::Error;
use crate::fetch::Fetch;

/// Counters returned by `GET /admin/stats`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub total_users: u64,
    pub new_users_today: u64,
    pub active_users: u64,
    pub admin_users: u64,
    pub guest_users: u64,
    pub active_ads: u64,
    pub new_ads_today: u64,
    pub pending_ads: u64,
    pub rejected_ads: u64,
    pub sold_ads: u64,
    pub pending_reports: u64,
    pub active_sessions: u64,
}

impl Stats {
    /// Active users as a percentage of all users; 0 when there are none
    pub fn active_user_ratio(&self) -> f64 {
        if self.total_users == 0 {
            return 0.0;
        }
        self.active_users as f64 / self.total_users as f64 * 100.0
    }
}

/// Client for the stats endpoint
#[derive(Debug, Clone)]
pub struct StatsClient {
    url: String,
    client: Client,
    session: Session,
    client_info: String,
}

impl StatsClient {
    pub(crate) fn new(url: &str, client: Client, session: Session, client_info: &str) -> Self {
        Self {
            url: url.to_string(),
            client,
            session,
            client_info: client_info.to_string(),
        }
    }

    pub async fn fetch(&self) -> Result<Stats, Error> {
        let url = format!("{}/admin/stats", self.url);

        Fetch::get(&self.client, &url)
            .header("X-Client-Info", &self.client_info)
            .session(&self.session)
            .execute::<Stats>()
            .await
    }
}

/// The stats page
pub struct StatsPage {
    client: StatsClient,
    stats: Mutex<Option<Stats>>,
}

impl StatsPage {
    pub fn new(client: StatsClient) -> Self {
        Self {
            client,
            stats: Mutex::new(None),
        }
    }

    /// Last loaded counters
    pub fn stats(&self) -> Option<Stats> {
        *self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch the counters; a failure is logged and leaves the last value
    pub async fn load(&self) {
        match self.client.fetch().await {
            Ok(stats) => *self.stats.lock().unwrap_or_else(PoisonError::into_inner) = Some(stats),
            Err(err) => error!("Error fetching stats: {}", err),
        }
    }
}
