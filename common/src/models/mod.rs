pub mod cart;
pub mod error;
pub mod item;
pub mod stats;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Acknowledgement body for operations that answer with a note rather than a
/// resource, such as deletes.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
