use std::sync::Arc;

use axum::{
    extract::FromRef,
    middleware::from_extractor,
    routing::{get, post},
    Router,
};
use shop_common::{
    backends::metrics::{Metrics, TraceLayer},
    request_span,
};
use tracing::field;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    dal::{Dal, Sqlite},
    stats::StatsTracker,
};

use super::handlers::{
    self, add_item_to_cart, create_cart, create_item, delete_item, get_cart, get_item, get_stats,
    get_status, list_carts, list_items, replace_item, update_item,
};

pub type DalState = Arc<Box<dyn Dal>>;
pub type StatsState = Arc<StatsTracker>;

#[derive(Clone)]
pub struct RouterState {
    pub dal: DalState,
    pub stats: StatsState,
}

// Allow getting the store directly
impl FromRef<RouterState> for DalState {
    fn from_ref(router_state: &RouterState) -> Self {
        router_state.dal.clone()
    }
}

// Allow getting the stats tracker directly
impl FromRef<RouterState> for StatsState {
    fn from_ref(router_state: &RouterState) -> Self {
        router_state.stats.clone()
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::get_status,
        handlers::create_item,
        handlers::get_item,
        handlers::list_items,
        handlers::replace_item,
        handlers::update_item,
        handlers::delete_item,
        handlers::create_cart,
        handlers::get_cart,
        handlers::list_carts,
        handlers::add_item_to_cart,
        handlers::get_stats,
    ),
    components(schemas(
        shop_common::models::MessageResponse,
        shop_common::models::item::Response,
        shop_common::models::item::Request,
        shop_common::models::item::Patch,
        shop_common::models::cart::Response,
        shop_common::models::cart::CartItem,
        shop_common::models::cart::CreatedResponse,
        shop_common::models::stats::StatsResponse,
    ))
)]
pub struct ApiDoc;

pub struct ApiBuilder {
    router: Router<RouterState>,
    sqlite: Option<Sqlite>,
}

impl Default for ApiBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiBuilder {
    pub fn new() -> Self {
        let router = Router::new()
            .route("/", get(get_status))
            .route("/item", post(create_item).get(list_items))
            .route(
                "/item/:item_id",
                get(get_item)
                    .put(replace_item)
                    .patch(update_item)
                    .delete(delete_item),
            )
            .route("/cart", post(create_cart).get(list_carts))
            .route("/cart/:cart_id", get(get_cart))
            .route("/cart/:cart_id/add/:item_id", post(add_item_to_cart))
            .route("/stats", get(get_stats))
            .route_layer(from_extractor::<Metrics>())
            .layer(
                TraceLayer::new(|request| {
                    request_span!(
                        request,
                        request.params.item_id = field::Empty,
                        request.params.cart_id = field::Empty
                    )
                })
                .without_propagation()
                .build(),
            );

        Self {
            router,
            sqlite: None,
        }
    }

    pub fn with_sqlite(mut self, sqlite: Sqlite) -> Self {
        self.sqlite = Some(sqlite);
        self
    }

    pub fn into_router(self) -> Router {
        let sqlite = self.sqlite.expect("an sqlite store is required");

        let state = RouterState {
            dal: Arc::new(Box::new(sqlite)),
            stats: Arc::new(StatsTracker::default()),
        };

        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
            .merge(self.router.with_state(state))
    }
}
