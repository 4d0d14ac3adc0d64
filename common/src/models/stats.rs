use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Counters for the operations a shop process has performed since startup.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct StatsResponse {
    pub items_created: u64,
    pub items_deleted: u64,
    pub carts_created: u64,
    pub cart_additions: u64,
}
