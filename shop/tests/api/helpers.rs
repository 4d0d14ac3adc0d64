use axum::{body::Body, response::Response, Router};
use http::{header::CONTENT_TYPE, Request};
use serde_json::Value;
use shop_api::{ApiBuilder, Sqlite};
use tower::ServiceExt;

pub(crate) struct TestApp {
    pub router: Router,
}

/// Initialize a router with an in-memory sqlite database for each test.
pub(crate) async fn app() -> TestApp {
    let sqlite = Sqlite::new_in_memory()
        .await
        .expect("to build an in-memory store");

    let router = ApiBuilder::new().with_sqlite(sqlite).into_router();

    TestApp { router }
}

impl TestApp {
    pub async fn send_request(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request.")
    }

    pub async fn create_item(&self, body: &str) -> Response {
        let request = Request::builder()
            .uri("/item")
            .method("POST")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        self.send_request(request).await
    }

    pub async fn get_item(&self, item_id: i64) -> Response {
        let request = Request::builder()
            .uri(format!("/item/{item_id}"))
            .body(Body::empty())
            .unwrap();

        self.send_request(request).await
    }

    pub async fn list_items(&self, query: &str) -> Response {
        let uri = if query.is_empty() {
            "/item".to_string()
        } else {
            format!("/item?{query}")
        };
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();

        self.send_request(request).await
    }

    pub async fn delete_item(&self, item_id: i64) -> Response {
        let request = Request::builder()
            .uri(format!("/item/{item_id}"))
            .method("DELETE")
            .body(Body::empty())
            .unwrap();

        self.send_request(request).await
    }

    pub async fn create_cart(&self) -> Response {
        let request = Request::builder()
            .uri("/cart")
            .method("POST")
            .body(Body::empty())
            .unwrap();

        self.send_request(request).await
    }

    pub async fn get_cart(&self, cart_id: i64) -> Response {
        let request = Request::builder()
            .uri(format!("/cart/{cart_id}"))
            .body(Body::empty())
            .unwrap();

        self.send_request(request).await
    }

    pub async fn add_item_to_cart(&self, cart_id: i64, item_id: i64) -> Response {
        let request = Request::builder()
            .uri(format!("/cart/{cart_id}/add/{item_id}"))
            .method("POST")
            .body(Body::empty())
            .unwrap();

        self.send_request(request).await
    }
}

pub(crate) async fn body_json(response: Response) -> Value {
    let body = hyper::body::to_bytes(response.into_body()).await.unwrap();

    serde_json::from_slice(&body).unwrap()
}
