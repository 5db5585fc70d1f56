#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use classifieds_admin::auth::MemoryTokenStore;
use classifieds_admin::config::ClientOptions;
use classifieds_admin::interaction::Interaction;
use classifieds_admin::AdminClient;
use wiremock::MockServer;

pub const TOKEN: &str = "test_token";

/// Interaction with canned answers that records what it was asked
pub struct Scripted {
    confirm: bool,
    answer: Option<String>,
    pub confirms: Mutex<Vec<String>>,
    pub alerts: Mutex<Vec<String>>,
}

impl Scripted {
    pub fn new(confirm: bool, answer: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            confirm,
            answer: answer.map(str::to_string),
            confirms: Mutex::new(Vec::new()),
            alerts: Mutex::new(Vec::new()),
        })
    }

    pub fn yes() -> Arc<Self> {
        Self::new(true, None)
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn confirms(&self) -> Vec<String> {
        self.confirms.lock().unwrap().clone()
    }
}

impl Interaction for Scripted {
    fn confirm(&self, message: &str) -> bool {
        self.confirms.lock().unwrap().push(message.to_string());
        self.confirm
    }

    fn prompt(&self, _message: &str) -> Option<String> {
        self.answer.clone()
    }

    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}

/// Client pointed at the mock server, without debounce or a token
pub fn anonymous(server: &MockServer) -> AdminClient {
    let options = ClientOptions::default()
        .with_search_debounce(Duration::ZERO)
        .with_request_timeout(Some(Duration::from_secs(5)));
    AdminClient::new_with_options(&server.uri(), options, Arc::new(MemoryTokenStore::new()))
        .unwrap()
}

/// Client pointed at the mock server, logged in with [`TOKEN`]
pub fn logged_in(server: &MockServer) -> AdminClient {
    let admin = anonymous(server);
    admin.session.store_token(TOKEN).unwrap();
    admin
}

pub fn bearer() -> String {
    format!("Bearer {}", TOKEN)
}
