use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    routing::{delete, get},
    Router,
};
use quiztocht_core::Notification;
use tracing::{info, instrument};

use super::{store_error, ApiError};
use crate::{
    dto::{ActionResult, ErrorResponse, MessageListResponse},
    service::QuiztochtService,
};

/// Create message overview router
pub fn create_router() -> Router {
    Router::new()
        .route("/berichten", get(list_messages))
        .route("/berichten/export", get(export_messages))
        .route("/berichten/:id", delete(delete_message))
}

/// List stored messages, newest first
#[instrument(skip_all)]
async fn list_messages(
    Extension(service): Extension<Arc<QuiztochtService>>,
) -> Result<Json<MessageListResponse>, ApiError> {
    let messages = service.list_messages().await.map_err(store_error)?;
    Ok(Json(messages.into()))
}

/// Delete a message
#[instrument(skip_all, fields(id = %id))]
async fn delete_message(
    Extension(service): Extension<Arc<QuiztochtService>>,
    Path(id): Path<String>,
) -> Result<Json<ActionResult>, ApiError> {
    if service.delete_message(&id).await.map_err(store_error)? {
        info!("Deleted message {}", id);
        Ok(Json(ActionResult {
            success: true,
            notification: Notification::message_deleted(),
        }))
    } else {
        Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!("Bericht {} niet gevonden", id))),
        ))
    }
}

/// Download every stored message as a JSON file
#[instrument(skip_all)]
async fn export_messages(
    Extension(service): Extension<Arc<QuiztochtService>>,
) -> Result<impl IntoResponse, ApiError> {
    let export = service.export().await.map_err(store_error)?;
    info!("Exporting messages as {}", export.file_name);

    Ok((
        [
            (header::CONTENT_TYPE, export.content_type.to_string()),
            (header::CONTENT_DISPOSITION, export.content_disposition()),
        ],
        export.bytes,
    ))
}
