use axum::{
    extract::{Path, Query, State},
    Json,
};
use http::{
    header::{self, HeaderName},
    StatusCode,
};
use serde::{Deserialize, Serialize};
use shop_common::models::{cart, item, stats, MessageResponse};
use tracing::instrument;
use utoipa::IntoParams;

use crate::{
    dal::{CartFilter, ItemFilter},
    error::Error,
};

use super::builder::{DalState, StatsState};

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ServiceStatus {
    Healthy,
}

#[derive(Serialize, Deserialize)]
pub(crate) struct StatusResponse {
    status: ServiceStatus,
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Get the service status.")
    )
)]
pub(crate) async fn get_status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: ServiceStatus::Healthy,
    })
}

#[instrument(skip(dal, stats, request))]
#[utoipa::path(
    post,
    path = "/item",
    request_body = shop_common::models::item::Request,
    responses(
        (status = 201, description = "Successfully created a new item.", body = shop_common::models::item::Response),
        (status = 422, description = "Request body is malformed.")
    )
)]
pub(crate) async fn create_item(
    State(dal): State<DalState>,
    State(stats): State<StatsState>,
    Json(request): Json<item::Request>,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<item::Response>), Error> {
    let item = dal.insert_item(&request.name, request.price).await?;

    stats.item_created();

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/item/{}", item.id))],
        Json(item.into()),
    ))
}

#[instrument(skip(dal))]
#[utoipa::path(
    get,
    path = "/item/{item_id}",
    responses(
        (status = 200, description = "Successfully got a specific item.", body = shop_common::models::item::Response),
        (status = 404, description = "Item is missing or has been deleted.")
    ),
    params(
        ("item_id" = i64, Path, description = "The id of the item."),
    )
)]
pub(crate) async fn get_item(
    State(dal): State<DalState>,
    Path(item_id): Path<i64>,
) -> Result<Json<item::Response>, Error> {
    let item = dal
        .item(item_id)
        .await?
        .filter(|item| !item.deleted)
        .ok_or(Error::ItemNotFound)?;

    Ok(Json(item.into()))
}

/// Pagination and filtering for item listings.
#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct ListItemsParams {
    /// How many matching items to skip.
    pub offset: Option<i64>,
    /// Page size, defaults to 10.
    pub limit: Option<i64>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Include soft-deleted items in the listing.
    pub show_deleted: Option<bool>,
}

impl TryFrom<ListItemsParams> for ItemFilter {
    type Error = Error;

    fn try_from(params: ListItemsParams) -> Result<Self, Self::Error> {
        let offset = params.offset.unwrap_or(0);
        if offset < 0 {
            return Err(Error::InvalidQuery("offset must be non-negative".to_string()));
        }

        let limit = params.limit.unwrap_or(10);
        if limit <= 0 {
            return Err(Error::InvalidQuery("limit must be positive".to_string()));
        }

        validate_price_bounds(params.min_price, params.max_price)?;

        Ok(Self {
            offset,
            limit,
            min_price: params.min_price,
            max_price: params.max_price,
            show_deleted: params.show_deleted.unwrap_or(false),
        })
    }
}

#[instrument(skip(dal))]
#[utoipa::path(
    get,
    path = "/item",
    responses(
        (status = 200, description = "Successfully got the items list.", body = [shop_common::models::item::Response]),
        (status = 422, description = "A query constraint is violated.")
    ),
    params(
        ListItemsParams
    )
)]
pub(crate) async fn list_items(
    State(dal): State<DalState>,
    Query(params): Query<ListItemsParams>,
) -> Result<Json<Vec<item::Response>>, Error> {
    let items = dal.items(params.try_into()?).await?;

    Ok(Json(items.into_iter().map(Into::into).collect()))
}

#[instrument(skip(dal, request))]
#[utoipa::path(
    put,
    path = "/item/{item_id}",
    request_body = shop_common::models::item::Request,
    responses(
        (status = 200, description = "Successfully replaced the item.", body = shop_common::models::item::Response),
        (status = 304, description = "Item has been deleted and cannot change."),
        (status = 404, description = "Item is missing.")
    ),
    params(
        ("item_id" = i64, Path, description = "The id of the item."),
    )
)]
pub(crate) async fn replace_item(
    State(dal): State<DalState>,
    Path(item_id): Path<i64>,
    Json(request): Json<item::Request>,
) -> Result<Json<item::Response>, Error> {
    let existing = dal.item(item_id).await?.ok_or(Error::ItemNotFound)?;

    if existing.deleted {
        return Err(Error::ItemDeleted);
    }

    let item = dal
        .replace_item(item_id, &request.name, request.price)
        .await?;

    Ok(Json(item.into()))
}

#[instrument(skip(dal, patch))]
#[utoipa::path(
    patch,
    path = "/item/{item_id}",
    request_body = shop_common::models::item::Patch,
    responses(
        (status = 200, description = "Successfully updated the item.", body = shop_common::models::item::Response),
        (status = 304, description = "Item has been deleted and cannot change."),
        (status = 404, description = "Item is missing."),
        (status = 422, description = "Request body is malformed.")
    ),
    params(
        ("item_id" = i64, Path, description = "The id of the item."),
    )
)]
pub(crate) async fn update_item(
    State(dal): State<DalState>,
    Path(item_id): Path<i64>,
    Json(patch): Json<item::Patch>,
) -> Result<Json<item::Response>, Error> {
    let existing = dal.item(item_id).await?.ok_or(Error::ItemNotFound)?;

    if existing.deleted {
        return Err(Error::ItemDeleted);
    }

    let item = dal
        .update_item(item_id, patch.name.as_deref(), patch.price)
        .await?;

    Ok(Json(item.into()))
}

#[instrument(skip(dal, stats))]
#[utoipa::path(
    delete,
    path = "/item/{item_id}",
    responses(
        (status = 200, description = "The item is deleted, whether by this request or an earlier one.", body = shop_common::models::MessageResponse)
    ),
    params(
        ("item_id" = i64, Path, description = "The id of the item."),
    )
)]
pub(crate) async fn delete_item(
    State(dal): State<DalState>,
    State(stats): State<StatsState>,
    Path(item_id): Path<i64>,
) -> Result<Json<MessageResponse>, Error> {
    let message = if dal.mark_item_deleted(item_id).await? {
        stats.item_deleted();

        "Item has been successfully deleted"
    } else {
        "The item has already been deleted"
    };

    Ok(Json(MessageResponse {
        message: message.to_string(),
    }))
}

#[instrument(skip(dal, stats))]
#[utoipa::path(
    post,
    path = "/cart",
    responses(
        (status = 201, description = "Successfully created a new cart.", body = shop_common::models::cart::CreatedResponse)
    )
)]
pub(crate) async fn create_cart(
    State(dal): State<DalState>,
    State(stats): State<StatsState>,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<cart::CreatedResponse>), Error> {
    let id = dal.insert_cart().await?;

    stats.cart_created();

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/cart/{id}"))],
        Json(cart::CreatedResponse { id }),
    ))
}

#[instrument(skip(dal))]
#[utoipa::path(
    get,
    path = "/cart/{cart_id}",
    responses(
        (status = 200, description = "Successfully got a specific cart.", body = shop_common::models::cart::Response),
        (status = 404, description = "Cart is missing.")
    ),
    params(
        ("cart_id" = i64, Path, description = "The id of the cart."),
    )
)]
pub(crate) async fn get_cart(
    State(dal): State<DalState>,
    Path(cart_id): Path<i64>,
) -> Result<Json<cart::Response>, Error> {
    let cart = dal.cart(cart_id).await?.ok_or(Error::CartNotFound)?;

    Ok(Json(cart))
}

/// Pagination and filtering for cart listings. The bounds apply to the
/// computed cart totals.
#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct ListCartsParams {
    /// How many matching carts to skip.
    pub offset: Option<i64>,
    /// Page size, defaults to 10.
    pub limit: Option<i64>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_quantity: Option<i64>,
    pub max_quantity: Option<i64>,
}

impl TryFrom<ListCartsParams> for CartFilter {
    type Error = Error;

    fn try_from(params: ListCartsParams) -> Result<Self, Self::Error> {
        let offset = params.offset.unwrap_or(0);
        if offset < 0 {
            return Err(Error::InvalidQuery("offset must be non-negative".to_string()));
        }

        let limit = params.limit.unwrap_or(10);
        if limit <= 0 {
            return Err(Error::InvalidQuery("limit must be positive".to_string()));
        }

        validate_price_bounds(params.min_price, params.max_price)?;

        let min_quantity = validate_quantity_bound(params.min_quantity, "min_quantity")?;
        let max_quantity = validate_quantity_bound(params.max_quantity, "max_quantity")?;

        Ok(Self {
            offset,
            limit,
            min_price: params.min_price,
            max_price: params.max_price,
            min_quantity,
            max_quantity,
        })
    }
}

fn validate_price_bounds(min: Option<f64>, max: Option<f64>) -> Result<(), Error> {
    if min.is_some_and(|min| min < 0.0) {
        return Err(Error::InvalidQuery(
            "min_price must be non-negative".to_string(),
        ));
    }

    if max.is_some_and(|max| max < 0.0) {
        return Err(Error::InvalidQuery(
            "max_price must be non-negative".to_string(),
        ));
    }

    Ok(())
}

fn validate_quantity_bound(bound: Option<i64>, name: &str) -> Result<Option<u32>, Error> {
    bound
        .map(|value| {
            u32::try_from(value)
                .map_err(|_| Error::InvalidQuery(format!("{name} must be non-negative")))
        })
        .transpose()
}

#[instrument(skip(dal))]
#[utoipa::path(
    get,
    path = "/cart",
    responses(
        (status = 200, description = "Successfully got the carts list.", body = [shop_common::models::cart::Response]),
        (status = 422, description = "A query constraint is violated.")
    ),
    params(
        ListCartsParams
    )
)]
pub(crate) async fn list_carts(
    State(dal): State<DalState>,
    Query(params): Query<ListCartsParams>,
) -> Result<Json<Vec<cart::Response>>, Error> {
    let carts = dal.carts(params.try_into()?).await?;

    Ok(Json(carts))
}

#[instrument(skip(dal, stats))]
#[utoipa::path(
    post,
    path = "/cart/{cart_id}/add/{item_id}",
    responses(
        (status = 200, description = "Successfully added the item to the cart.", body = shop_common::models::MessageResponse),
        (status = 404, description = "Cart or item is missing.")
    ),
    params(
        ("cart_id" = i64, Path, description = "The id of the cart."),
        ("item_id" = i64, Path, description = "The id of the item."),
    )
)]
pub(crate) async fn add_item_to_cart(
    State(dal): State<DalState>,
    State(stats): State<StatsState>,
    Path((cart_id, item_id)): Path<(i64, i64)>,
) -> Result<Json<MessageResponse>, Error> {
    if !dal.cart_exists(cart_id).await? {
        return Err(Error::CartNotFound);
    }

    if dal.item(item_id).await?.is_none() {
        return Err(Error::ItemNotFound);
    }

    dal.add_item_to_cart(cart_id, item_id).await?;

    stats.cart_addition();

    Ok(Json(MessageResponse {
        message: "Item successfully added to the cart".to_string(),
    }))
}

#[instrument(skip(stats))]
#[utoipa::path(
    get,
    path = "/stats",
    responses(
        (status = 200, description = "Successfully got the operation counters.", body = shop_common::models::stats::StatsResponse)
    )
)]
pub(crate) async fn get_stats(State(stats): State<StatsState>) -> Json<stats::StatsResponse> {
    Json(stats.snapshot())
}
