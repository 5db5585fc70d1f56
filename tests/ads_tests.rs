mod common;

use classifieds_admin::ads::AdStatus;
use classifieds_admin::error::Error;
use classifieds_admin::list::ActionOutcome;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ad_row(id: u64, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": format!("Ad {}", id),
        "price": "1500",
        "status": status,
        "is_featured": false,
        "main_image": {"image_url": "https://cdn.example.com/a.jpg", "thumbnail_url": null},
        "user": {"id": 3, "name": "Salem"},
        "category": {"id": 5, "title": "Cars"}
    })
}

fn ads_page(rows: Vec<serde_json::Value>) -> serde_json::Value {
    let total = rows.len();
    json!({"data": rows, "meta": {"total": total, "per_page": 15}})
}

fn ad_detail(id: u64, status: &str, featured: bool) -> serde_json::Value {
    json!({
        "data": {
            "id": id,
            "title": format!("Ad {}", id),
            "description": "Clean, one owner",
            "price": 1500,
            "is_negotiable": true,
            "location": "Sanaa",
            "views": 42,
            "status": status,
            "is_featured": featured,
            "featured_until": null,
            "images": [],
            "custom_fields": [{"label": "Year", "value": 2015}],
            "user": {"id": 3, "name": "Salem", "phone": "777"},
            "category": {"id": 5, "title": "Cars"}
        }
    })
}

#[tokio::test]
async fn test_approved_ad_leaves_pending_list() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/ads"))
        .and(query_param("status", "pending"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ads_page(vec![ad_row(10, "pending"), ad_row(11, "pending")])),
        )
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/admin/ads"))
        .and(query_param("status", "pending"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ads_page(vec![ad_row(11, "pending")])),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/admin/ad/10/update-status"))
        .and(body_json(json!({"status": "active", "reject_reason": null})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "updated"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let admin = common::logged_in(&mock_server);
    let page = admin.ads_page(common::Scripted::yes());
    page.set_status_filter(Some(AdStatus::Pending));
    page.view().settle().await;
    assert_eq!(page.view().items().len(), 2);

    let outcome = page.approve(10).await.unwrap();

    assert_eq!(outcome, ActionOutcome::Completed);
    let ids: Vec<u64> = page.view().items().iter().map(|ad| ad.id).collect();
    assert_eq!(ids, vec![11]);
}

#[tokio::test]
async fn test_reject_sends_prompted_reason() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/ads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ads_page(vec![ad_row(7, "active")])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/admin/ad/7/update-status"))
        .and(body_json(json!({"status": "rejected", "reject_reason": "Prohibited item"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let admin = common::logged_in(&mock_server);
    let page = admin.ads_page(common::Scripted::new(true, Some("Prohibited item")));
    page.view().load().await;

    assert_eq!(page.reject(7).await.unwrap(), ActionOutcome::Completed);
}

#[tokio::test]
async fn test_cancelled_reason_prompt_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/ads"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ads_page(vec![ad_row(7, "pending")])),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/admin/ad/7/update-status"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let admin = common::logged_in(&mock_server);
    let page = admin.ads_page(common::Scripted::new(true, None));
    page.view().load().await;

    assert_eq!(page.reject(7).await.unwrap(), ActionOutcome::Cancelled);
}

#[tokio::test]
async fn test_sold_ad_offers_no_transition() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/ads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ads_page(vec![ad_row(8, "sold")])))
        .mount(&mock_server)
        .await;

    let admin = common::logged_in(&mock_server);
    let interaction = common::Scripted::yes();
    let page = admin.ads_page(interaction.clone());
    page.view().load().await;

    let result = page.approve(8).await;

    assert!(matches!(
        result,
        Err(Error::InvalidTransition {
            from: AdStatus::Sold,
            to: AdStatus::Active
        })
    ));
    assert!(interaction.confirms().is_empty());
}

#[tokio::test]
async fn test_feature_refreshes_open_detail() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/ad/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ad_detail(4, "active", false)))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/admin/ad/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ad_detail(4, "active", true)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/admin/ads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ads_page(vec![ad_row(4, "active")])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/admin/ad/4/activate-featured"))
        .and(body_json(json!({"duration_days": 7})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let admin = common::logged_in(&mock_server);
    let interaction = common::Scripted::yes();
    let page = admin.ads_page(interaction.clone());
    page.open_detail(4).await.unwrap();
    assert!(!page.detail().unwrap().is_featured);

    assert_eq!(page.feature(4).await.unwrap(), ActionOutcome::Completed);

    let detail = page.detail().unwrap();
    assert!(detail.is_featured);
    assert_eq!(detail.custom_fields[0].display_value(), "2015");
    assert_eq!(interaction.alerts(), vec!["Ad featured for 7 days"]);
}

#[tokio::test]
async fn test_delete_closes_overlay() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/ad/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ad_detail(4, "pending", false)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/admin/ads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ads_page(vec![])))
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/admin/ad/4"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let admin = common::logged_in(&mock_server);
    let page = admin.ads_page(common::Scripted::yes());
    page.open_detail(4).await.unwrap();

    assert_eq!(page.delete(4).await.unwrap(), ActionOutcome::Completed);
    assert!(page.detail().is_none());
}

#[tokio::test]
async fn test_missing_detail_alerts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/ad/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not found"})))
        .mount(&mock_server)
        .await;

    let admin = common::logged_in(&mock_server);
    let interaction = common::Scripted::yes();
    let page = admin.ads_page(interaction.clone());

    assert!(page.open_detail(99).await.is_err());
    assert!(page.detail().is_none());
    assert_eq!(interaction.alerts(), vec!["Failed to load ad details"]);
}
