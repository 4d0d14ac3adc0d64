use axum::body::Body;
use http::{header::CONTENT_TYPE, Request, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::helpers::{app, body_json};

#[tokio::test]
async fn create_and_get_item() {
    let app = app().await;

    let response = app.create_item(r#"{"name": "laptop", "price": 999.99}"#).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response.headers().get("location").unwrap().to_str().unwrap(),
        "/item/1"
    );

    let item = body_json(response).await;
    assert_eq!(item["id"], 1);
    assert_eq!(item["name"], "laptop");
    assert_eq!(item["price"], 999.99);
    assert_eq!(item["deleted"], false);

    let response = app.get_item(1).await;
    assert_eq!(response.status(), StatusCode::OK);

    let fetched = body_json(response).await;
    assert_eq!(fetched, item);

    // GET an item that was never created.
    let response = app.get_item(7).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_item_rejects_unknown_fields() {
    let app = app().await;

    let response = app
        .create_item(r#"{"name": "laptop", "price": 1.0, "deleted": true}"#)
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn list_items_with_filters() {
    let app = app().await;

    for body in [
        r#"{"name": "cable", "price": 10.0}"#,
        r#"{"name": "mouse", "price": 20.0}"#,
        r#"{"name": "keyboard", "price": 30.0}"#,
    ] {
        let response = app.create_item(body).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let listed = body_json(app.list_items("").await).await;
    assert_eq!(listed.as_array().unwrap().len(), 3);

    let cheap = body_json(app.list_items("max_price=15").await).await;
    assert_eq!(cheap.as_array().unwrap().len(), 1);
    assert_eq!(cheap[0]["name"], "cable");

    let expensive = body_json(app.list_items("min_price=15").await).await;
    assert_eq!(expensive.as_array().unwrap().len(), 2);

    let page = body_json(app.list_items("offset=1&limit=1").await).await;
    assert_eq!(page.as_array().unwrap().len(), 1);
    assert_eq!(page[0]["name"], "mouse");

    // An offset past the end is an empty page, not an error.
    let empty = body_json(app.list_items("offset=10").await).await;
    assert_eq!(empty, Value::Array(vec![]));

    let response = app.list_items("limit=0").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = app.list_items("offset=-1").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = app.list_items("min_price=-3").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn delete_item_is_idempotent() {
    let app = app().await;

    app.create_item(r#"{"name": "laptop", "price": 999.99}"#)
        .await;

    let response = app.delete_item(1).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Item has been successfully deleted");

    // The item is hidden from lookups but not gone.
    let response = app.get_item(1).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let listed = body_json(app.list_items("").await).await;
    assert_eq!(listed.as_array().unwrap().len(), 0);

    let listed = body_json(app.list_items("show_deleted=true").await).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["deleted"], true);

    // Deleting again, or deleting an id that never existed, still answers 200.
    let response = app.delete_item(1).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "The item has already been deleted");

    let response = app.delete_item(99).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn replace_and_update_item() {
    let app = app().await;

    app.create_item(r#"{"name": "laptop", "price": 999.99}"#)
        .await;

    let request = Request::builder()
        .uri("/item/1")
        .method("PUT")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"name": "gaming laptop", "price": 1499.0}"#))
        .unwrap();
    let response = app.send_request(request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let item = body_json(response).await;
    assert_eq!(item["name"], "gaming laptop");
    assert_eq!(item["price"], 1499.0);

    // A patch only touches the fields it carries.
    let request = Request::builder()
        .uri("/item/1")
        .method("PATCH")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"price": 1299.0}"#))
        .unwrap();
    let response = app.send_request(request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let item = body_json(response).await;
    assert_eq!(item["name"], "gaming laptop");
    assert_eq!(item["price"], 1299.0);

    // An empty patch is a valid no-op.
    let request = Request::builder()
        .uri("/item/1")
        .method("PATCH")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let response = app.send_request(request).await;
    assert_eq!(response.status(), StatusCode::OK);

    // The deletion flag is not patchable.
    let request = Request::builder()
        .uri("/item/1")
        .method("PATCH")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"deleted": true}"#))
        .unwrap();
    let response = app.send_request(request).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let request = Request::builder()
        .uri("/item/99")
        .method("PUT")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"name": "ghost", "price": 1.0}"#))
        .unwrap();
    let response = app.send_request(request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleted_item_cannot_change() {
    let app = app().await;

    app.create_item(r#"{"name": "laptop", "price": 999.99}"#)
        .await;
    app.delete_item(1).await;

    let request = Request::builder()
        .uri("/item/1")
        .method("PUT")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"name": "zombie", "price": 1.0}"#))
        .unwrap();
    let response = app.send_request(request).await;
    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);

    let request = Request::builder()
        .uri("/item/1")
        .method("PATCH")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"price": 1.0}"#))
        .unwrap();
    let response = app.send_request(request).await;
    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
}
