use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A catalog item. Deletion is a soft flag: deleted items stay in the store
/// and remain addressable for idempotent deletes, but are hidden from
/// lookups and contribute nothing to cart totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(as = item::Response)]
pub struct Response {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub deleted: bool,
}

/// Body for creating an item or replacing all of its fields.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = item::Request)]
#[serde(deny_unknown_fields)]
pub struct Request {
    pub name: String,
    pub price: f64,
}

/// Body for a partial item update. Absent fields are left untouched; `{}` is
/// a valid no-op patch. The deletion flag is not patchable, which
/// `deny_unknown_fields` enforces along with any other stray field.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[schema(as = item::Patch)]
#[serde(deny_unknown_fields)]
pub struct Patch {
    pub name: Option<String>,
    pub price: Option<f64>,
}
