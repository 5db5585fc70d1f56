//! Types for abuse reports

use serde::{Deserialize, Serialize};
use std::fmt;

/// Note attached when a report is closed because its ad was deleted
///
/// Stored server-side next to the moderators' own notes, so it stays in
/// the marketplace's language.
pub const AD_DELETED_NOTE: &str = "تم حذف الإعلان المخالف";

/// Report status; the only transition is pending → resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    /// Waiting for a moderator
    #[default]
    Pending,

    /// Closed with notes
    Resolved,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Resolved => "resolved",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(ReportStatus::Pending),
            "resolved" => Some(ReportStatus::Resolved),
            _ => None,
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who filed the report
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Reporter {
    pub id: Option<u64>,
    pub name: Option<String>,
}

/// The reported ad
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportedAd {
    pub id: u64,

    #[serde(default)]
    pub title: String,
}

/// A user complaint about an ad
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// The report ID
    pub id: u64,

    /// Reason picked by the reporter
    pub reason: Option<String>,

    /// Free text written by the reporter
    pub content: Option<String>,

    /// Report category
    #[serde(rename = "type")]
    pub kind: Option<String>,

    #[serde(default)]
    pub status: ReportStatus,

    pub reporter: Option<Reporter>,

    /// The ad; absent once the ad is gone
    pub ad: Option<ReportedAd>,

    /// Notes left by the moderator who resolved it
    pub admin_notes: Option<String>,

    pub created_at: Option<String>,
}

impl Report {
    /// Text to display: the reason, or the content when no reason was picked
    pub fn text(&self) -> &str {
        self.reason
            .as_deref()
            .filter(|reason| !reason.is_empty())
            .or(self.content.as_deref())
            .unwrap_or_default()
    }

    pub fn is_pending(&self) -> bool {
        self.status == ReportStatus::Pending
    }

    /// Resolution is only offered while the report is pending
    pub fn can_resolve(&self) -> bool {
        self.is_pending()
    }
}

/// Body of `POST /admin/report/{id}/resolve`
#[derive(Debug, Serialize)]
pub(crate) struct Resolution<'a> {
    pub admin_notes: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_report_with_type_field() {
        let report: Report = serde_json::from_value(json!({
            "id": 4,
            "reason": "",
            "content": "Fake phone number",
            "type": "fraud",
            "status": "resolved",
            "reporter": {"id": 2, "name": "Huda"},
            "ad": {"id": 77, "title": "Used Corolla"},
            "admin_notes": "Checked"
        }))
        .unwrap();

        assert_eq!(report.kind.as_deref(), Some("fraud"));
        assert_eq!(report.text(), "Fake phone number");
        assert!(!report.can_resolve());
        assert_eq!(report.ad.unwrap().id, 77);
    }

    #[test]
    fn reason_wins_over_content() {
        let report: Report =
            serde_json::from_value(json!({"id": 1, "reason": "Spam", "content": "x"})).unwrap();
        assert_eq!(report.text(), "Spam");
        assert!(report.is_pending());
        assert!(report.ad.is_none());
    }

    #[test]
    fn ad_deleted_resolution_body() {
        let body = serde_json::to_value(Resolution {
            admin_notes: AD_DELETED_NOTE,
        })
        .unwrap();
        assert_eq!(body, json!({"admin_notes": "تم حذف الإعلان المخالف"}));
    }
}
