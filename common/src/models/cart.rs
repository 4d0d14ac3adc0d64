use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// An entry in a cart. `available` reflects the referenced item's deletion
/// state at read time; unavailable entries stay listed but contribute
/// nothing to the cart totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(as = cart::CartItem)]
pub struct CartItem {
    pub id: i64,
    pub name: String,
    pub quantity: u32,
    pub available: bool,
}

/// A cart with its totals. `price` and `quantity` are computed from the
/// live item catalog on every read, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(as = cart::Response)]
pub struct Response {
    pub id: i64,
    pub items: Vec<CartItem>,
    pub price: f64,
    pub quantity: u32,
}

/// Body returned when a cart is created.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = cart::CreatedResponse)]
pub struct CreatedResponse {
    pub id: i64,
}
