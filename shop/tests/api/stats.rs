use axum::body::Body;
use http::{Request, StatusCode};

use crate::helpers::{app, body_json};

#[tokio::test]
async fn service_reports_healthy() {
    let app = app().await;

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app.send_request(request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let status = body_json(response).await;
    assert_eq!(status["status"], "healthy");
}

#[tokio::test]
async fn counters_track_operations() {
    let app = app().await;

    let request = Request::builder().uri("/stats").body(Body::empty()).unwrap();
    let initial = body_json(app.send_request(request).await).await;
    assert_eq!(initial["items_created"], 0);
    assert_eq!(initial["carts_created"], 0);

    app.create_item(r#"{"name": "laptop", "price": 1000.0}"#)
        .await;
    app.create_item(r#"{"name": "mouse", "price": 20.0}"#).await;
    app.create_cart().await;
    app.add_item_to_cart(1, 1).await;

    // Only the first delete of an item counts.
    app.delete_item(1).await;
    app.delete_item(1).await;

    let request = Request::builder().uri("/stats").body(Body::empty()).unwrap();
    let stats = body_json(app.send_request(request).await).await;

    assert_eq!(stats["items_created"], 2);
    assert_eq!(stats["items_deleted"], 1);
    assert_eq!(stats["carts_created"], 1);
    assert_eq!(stats["cart_additions"], 1);
}
