use axum::{http::StatusCode, response::Json, Router};
use quiztocht_core::StoreError;
use tracing::error;

use crate::dto::ErrorResponse;

pub mod contact;
pub mod messages;

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Create the main API router
pub fn create_router() -> Router {
    Router::new()
        .merge(contact::create_router())
        .merge(messages::create_router())
}

/// Map a store failure to a response. Corruption is reported, never shown as an empty list.
pub(crate) fn store_error(e: StoreError) -> ApiError {
    error!("Message store failure: {}", e);
    let message = if e.is_corrupt() {
        "Opgeslagen berichten zijn beschadigd"
    } else {
        "Berichten konden niet worden gelezen of opgeslagen"
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::new(message)))
}
