mod common;

use classifieds_admin::categories::CategoryForm;
use classifieds_admin::error::Error;
use classifieds_admin::list::ActionOutcome;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn forest(with_new_child: bool) -> serde_json::Value {
    let mut cars_children = vec![json!({"id": 9, "title": "Sedans", "parent_id": 5})];
    if with_new_child {
        cars_children.push(json!({"id": 12, "title": "Trucks", "icon": "truck", "parent_id": 5}));
    }
    json!([
        {"id": 1, "title": "Vehicles", "icon": "car", "parent_id": null, "slug": "vehicles", "children": [
            {"id": 5, "title": "Cars", "parent_id": 1, "children": cars_children}
        ]},
        {"id": 2, "title": "Other", "slug": "other", "parent_id": null}
    ])
}

#[tokio::test]
async fn test_created_child_appears_under_its_parent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forest(false)))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/admin/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forest(true)))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/admin/category"))
        .and(body_json(json!({"title": "Trucks", "icon": "truck", "parent_id": 5})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"message": "created"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let admin = common::logged_in(&mock_server);
    let page = admin.categories_page(common::Scripted::yes());
    page.load().await;
    page.toggle(1);
    page.toggle(5);

    page.open_create(Some(5));
    page.set_form(CategoryForm {
        title: "Trucks".to_string(),
        icon: "truck".to_string(),
        parent_id: Some(5),
    });
    page.submit().await.unwrap();

    assert!(page.modal().is_none());
    let tree = page.tree();
    let children: Vec<u64> = tree.find(5).unwrap().children.iter().map(|c| c.id).collect();
    assert_eq!(children, vec![9, 12]);

    let rows: Vec<(u64, usize)> = tree
        .visible_nodes()
        .iter()
        .map(|node| (node.category.id, node.depth))
        .collect();
    assert_eq!(rows, vec![(1, 0), (5, 1), (9, 2), (12, 2), (2, 0)]);
}

#[tokio::test]
async fn test_edit_posts_update_with_prefilled_form() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forest(false)))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/admin/category/5/update"))
        .and(body_json(json!({"title": "Automobiles", "icon": "", "parent_id": 1})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let admin = common::logged_in(&mock_server);
    let page = admin.categories_page(common::Scripted::yes());
    page.load().await;

    page.open_edit(5).unwrap();
    let mut form = page.modal().unwrap().form;
    assert_eq!(form.title, "Cars");
    form.title = "Automobiles".to_string();
    page.set_form(form);

    page.submit().await.unwrap();
    assert!(page.modal().is_none());
}

#[tokio::test]
async fn test_failed_submit_keeps_modal_open() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/admin/category"))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(json!({"message": "The title field is required."})),
        )
        .mount(&mock_server)
        .await;

    let admin = common::logged_in(&mock_server);
    let interaction = common::Scripted::yes();
    let page = admin.categories_page(interaction.clone());

    page.open_create(None);
    assert!(page.submit().await.is_err());

    assert!(page.modal().is_some());
    assert!(!page.is_submitting());
    assert_eq!(
        interaction.alerts(),
        vec!["Operation failed: The title field is required."]
    );
}

#[tokio::test]
async fn test_catch_all_category_is_protected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forest(false)))
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/admin/category/2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let admin = common::logged_in(&mock_server);
    let interaction = common::Scripted::yes();
    let page = admin.categories_page(interaction.clone());
    page.load().await;

    assert!(matches!(page.open_edit(2), Err(Error::ProtectedCategory(2))));
    assert!(matches!(page.delete(2).await, Err(Error::ProtectedCategory(2))));
    assert!(interaction.confirms().is_empty());
}

#[tokio::test]
async fn test_delete_asks_then_refetches() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forest(false)))
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/admin/category/5"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let admin = common::logged_in(&mock_server);
    let interaction = common::Scripted::yes();
    let page = admin.categories_page(interaction.clone());
    page.load().await;

    assert_eq!(page.delete(5).await.unwrap(), ActionOutcome::Completed);
    assert_eq!(interaction.confirms().len(), 1);
}
