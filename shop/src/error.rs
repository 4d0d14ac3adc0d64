use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{ser::SerializeMap, Serialize};
use shop_common::models::error::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Item not found")]
    ItemNotFound,
    #[error("Cart not found")]
    CartNotFound,
    #[error("Item has been deleted")]
    ItemDeleted,
    #[error("{0}")]
    InvalidQuery(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("type", &format!("{:?}", self))?;
        // use the error source if available, if not use display implementation
        map.serialize_entry("msg", &self.source().unwrap_or(self).to_string())?;
        map.end()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let code = match self {
            // A 304 answer carries no body.
            Error::ItemDeleted => return StatusCode::NOT_MODIFIED.into_response(),
            Error::ItemNotFound
            | Error::CartNotFound
            | Error::Database(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            Error::InvalidQuery(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => {
                // We only want to emit error events for internal errors, not e.g. 404s.
                tracing::error!(error = %self, "shop request error");

                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        ApiError {
            message: self.to_string(),
            status_code: code.as_u16(),
        }
        .into_response()
    }
}
