mod common;

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_stats_page_loads_counters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/stats"))
        .and(header("Authorization", common::bearer().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_users": 200,
            "new_users_today": 4,
            "active_users": 150,
            "active_ads": 90,
            "pending_reports": 3
        })))
        .mount(&mock_server)
        .await;

    let admin = common::logged_in(&mock_server);
    let page = admin.stats_page();
    page.load().await;

    let stats = page.stats().unwrap();
    assert_eq!(stats.pending_reports, 3);
    assert_eq!(stats.sold_ads, 0);
    assert_eq!(stats.active_user_ratio(), 75.0);
}

#[tokio::test]
async fn test_stats_failure_is_swallowed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/stats"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let admin = common::logged_in(&mock_server);
    let page = admin.stats_page();
    page.load().await;

    assert!(page.stats().is_none());
}
