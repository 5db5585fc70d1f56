//! Types for ad moderation

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of days an ad stays featured after activation
pub const FEATURE_DURATION_DAYS: u32 = 7;

/// Moderation status of an ad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdStatus {
    /// Waiting for review
    Pending,

    /// Published
    Active,

    /// Refused by a moderator
    Rejected,

    /// Marked sold by the owner
    Sold,

    /// Publication window ended
    Expired,
}

impl AdStatus {
    /// Every status, in filter order
    pub const ALL: [AdStatus; 5] = [
        AdStatus::Pending,
        AdStatus::Active,
        AdStatus::Rejected,
        AdStatus::Sold,
        AdStatus::Expired,
    ];

    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            AdStatus::Pending => "pending",
            AdStatus::Active => "active",
            AdStatus::Rejected => "rejected",
            AdStatus::Sold => "sold",
            AdStatus::Expired => "expired",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            AdStatus::Pending => "Pending review",
            AdStatus::Active => "Active",
            AdStatus::Rejected => "Rejected",
            AdStatus::Sold => "Sold",
            AdStatus::Expired => "Expired",
        }
    }

    /// Parse the wire representation
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == value)
    }

    /// Statuses a moderator may move an ad to from this one
    ///
    /// Sold and expired are reached only by the server.
    pub fn transitions(&self) -> &'static [AdStatus] {
        match self {
            AdStatus::Pending => &[AdStatus::Active, AdStatus::Rejected],
            AdStatus::Active => &[AdStatus::Rejected],
            AdStatus::Rejected | AdStatus::Sold | AdStatus::Expired => &[],
        }
    }

    /// Whether a moderator may move an ad from this status to `target`
    pub fn can_transition_to(&self, target: AdStatus) -> bool {
        self.transitions().contains(&target)
    }
}

impl fmt::Display for AdStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Moderation actions offered on an ad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdAction {
    /// pending → active
    Approve,
    /// pending|active → rejected
    Reject,
    /// Start a featured window
    Feature,
    /// End the featured window
    Unfeature,
    /// Remove the ad
    Delete,
}

/// Actions to offer for an ad in `status`
pub fn available_actions(status: AdStatus, is_featured: bool) -> Vec<AdAction> {
    let mut actions = Vec::new();
    if status.can_transition_to(AdStatus::Active) {
        actions.push(AdAction::Approve);
    }
    if status.can_transition_to(AdStatus::Rejected) {
        actions.push(AdAction::Reject);
    }
    actions.push(if is_featured {
        AdAction::Unfeature
    } else {
        AdAction::Feature
    });
    actions.push(AdAction::Delete);
    actions
}

/// Price as sent by the API, either a number or a decimal string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    /// Numeric price
    Number(f64),
    /// Decimal string price
    Text(String),
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Number(value) => write!(f, "{}", value),
            Price::Text(value) => f.write_str(value),
        }
    }
}

/// An ad image
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AdImage {
    /// Full-size image
    pub image_url: Option<String>,

    /// Thumbnail
    pub thumbnail_url: Option<String>,
}

impl AdImage {
    /// Thumbnail if available, else the full image
    pub fn preview_url(&self) -> Option<&str> {
        self.thumbnail_url.as_deref().or(self.image_url.as_deref())
    }
}

/// The account that posted an ad
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Advertiser {
    /// The user ID
    pub id: Option<u64>,

    /// Display name
    pub name: Option<String>,

    /// Phone number
    pub phone: Option<String>,

    /// Avatar
    pub avatar_url: Option<String>,
}

/// Category an ad is filed under
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AdCategory {
    /// The category ID
    pub id: Option<u64>,

    /// Title
    pub title: Option<String>,
}

/// A category-specific attribute of an ad
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomField {
    /// Field label
    #[serde(default)]
    pub label: String,

    /// Field value
    #[serde(default)]
    pub value: serde_json::Value,
}

impl CustomField {
    /// Value rendered as plain text
    pub fn display_value(&self) -> String {
        match &self.value {
            serde_json::Value::Null => String::new(),
            serde_json::Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

/// An ad as listed on the moderation page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ad {
    /// The ad ID
    pub id: u64,

    /// Title
    #[serde(default)]
    pub title: String,

    /// Asking price
    pub price: Option<Price>,

    /// Moderation status
    pub status: AdStatus,

    /// Whether the ad is featured
    #[serde(default)]
    pub is_featured: bool,

    /// Cover image
    pub main_image: Option<AdImage>,

    /// Owner
    pub user: Option<Advertiser>,

    /// Category
    pub category: Option<AdCategory>,

    /// The creation time
    pub created_at: Option<String>,
}

impl Ad {
    /// Actions to offer for this row
    pub fn available_actions(&self) -> Vec<AdAction> {
        available_actions(self.status, self.is_featured)
    }
}

/// Full representation of one ad
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdDetail {
    /// The ad ID
    pub id: u64,

    /// Title
    #[serde(default)]
    pub title: String,

    /// Body text
    #[serde(default)]
    pub description: String,

    /// Asking price
    pub price: Option<Price>,

    /// Whether the price is negotiable
    #[serde(default)]
    pub is_negotiable: bool,

    /// Free-text location
    pub location: Option<String>,

    /// View counter
    #[serde(default)]
    pub views: u64,

    /// Moderation status
    pub status: AdStatus,

    /// Whether the ad is featured
    #[serde(default)]
    pub is_featured: bool,

    /// End of the featured window
    pub featured_until: Option<String>,

    /// Gallery
    #[serde(default)]
    pub images: Vec<AdImage>,

    /// Category-specific attributes
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,

    /// Owner
    pub user: Option<Advertiser>,

    /// Category
    pub category: Option<AdCategory>,

    /// The creation time
    pub created_at: Option<String>,
}

impl AdDetail {
    /// Actions to offer in the detail view
    pub fn available_actions(&self) -> Vec<AdAction> {
        available_actions(self.status, self.is_featured)
    }

    /// End of the featured window, if set and parseable
    pub fn featured_until_time(&self) -> Option<DateTime<Utc>> {
        let raw = self.featured_until.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .map(|time| time.with_timezone(&Utc))
            .or_else(|_| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|naive| naive.and_utc())
            })
            .ok()
    }

    /// Whole days of featured time left at `now`, 0 once expired
    pub fn featured_days_left(&self, now: DateTime<Utc>) -> Option<i64> {
        if !self.is_featured {
            return None;
        }
        let until = self.featured_until_time()?;
        Some((until - now).num_days().max(0))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Wrapped<T> {
    pub data: T,
}

/// Body of `POST /admin/ad/{id}/update-status`
#[derive(Debug, Serialize)]
pub(crate) struct StatusUpdate {
    pub status: AdStatus,
    pub reject_reason: Option<String>,
}

/// Body of `POST /admin/ad/{id}/activate-featured`
#[derive(Debug, Serialize)]
pub(crate) struct FeatureRequest {
    pub duration_days: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn transition_table() {
        assert_eq!(AdStatus::Pending.transitions(), &[AdStatus::Active, AdStatus::Rejected]);
        assert_eq!(AdStatus::Active.transitions(), &[AdStatus::Rejected]);
        for status in [AdStatus::Rejected, AdStatus::Sold, AdStatus::Expired] {
            assert!(status.transitions().is_empty());
        }
        for from in AdStatus::ALL {
            assert!(!from.can_transition_to(AdStatus::Sold));
            assert!(!from.can_transition_to(AdStatus::Expired));
            assert!(!from.can_transition_to(AdStatus::Pending));
        }
    }

    #[test]
    fn sold_ad_offers_neither_accept_nor_reject() {
        let actions = available_actions(AdStatus::Sold, false);
        assert!(!actions.contains(&AdAction::Approve));
        assert!(!actions.contains(&AdAction::Reject));
        assert_eq!(actions, vec![AdAction::Feature, AdAction::Delete]);
    }

    #[test]
    fn pending_featured_ad_actions() {
        assert_eq!(
            available_actions(AdStatus::Pending, true),
            vec![AdAction::Approve, AdAction::Reject, AdAction::Unfeature, AdAction::Delete]
        );
        assert_eq!(
            available_actions(AdStatus::Active, false),
            vec![AdAction::Reject, AdAction::Feature, AdAction::Delete]
        );
    }

    #[test]
    fn status_parse_round_trips_labels() {
        for status in AdStatus::ALL {
            assert_eq!(AdStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(AdStatus::parse("archived"), None);
    }

    #[test]
    fn decodes_list_row_with_string_price() {
        let ad: Ad = serde_json::from_value(json!({
            "id": 9,
            "title": "Corolla 2015",
            "price": "15000.00",
            "status": "pending",
            "is_featured": false,
            "main_image": {"image_url": "https://cdn/x.jpg", "thumbnail_url": null},
            "user": {"name": "Ali", "phone": "777"},
            "category": {"id": 2, "title": "Cars"}
        }))
        .unwrap();
        assert_eq!(ad.price.unwrap().to_string(), "15000.00");
        assert_eq!(ad.main_image.unwrap().preview_url(), Some("https://cdn/x.jpg"));
    }

    #[test]
    fn featured_days_left_counts_down() {
        let detail: AdDetail = serde_json::from_value(json!({
            "id": 1,
            "status": "active",
            "is_featured": true,
            "featured_until": "2026-03-08T12:00:00Z",
            "custom_fields": [{"label": "Year", "value": 2015}, {"label": "Fuel", "value": "Petrol"}]
        }))
        .unwrap();
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(detail.featured_days_left(now), Some(7));
        let later = Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap();
        assert_eq!(detail.featured_days_left(later), Some(0));
        assert_eq!(detail.custom_fields[0].display_value(), "2015");
        assert_eq!(detail.custom_fields[1].display_value(), "Petrol");
    }

    #[test]
    fn featured_until_accepts_sql_timestamps() {
        let detail: AdDetail = serde_json::from_value(json!({
            "id": 1,
            "status": "active",
            "is_featured": true,
            "featured_until": "2026-03-08 12:00:00"
        }))
        .unwrap();
        assert!(detail.featured_until_time().is_some());
    }
}
