use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::Json, routing::post, Router};
use quiztocht_core::{ContactForm, SubmissionMode, SubmissionStatus};
use tracing::instrument;

use crate::{dto::SubmissionResponse, service::QuiztochtService};

/// Create contact router
pub fn create_router() -> Router {
    Router::new().route("/contact", post(submit_contact))
}

/// Submit the contact form
#[instrument(skip_all)]
async fn submit_contact(
    Extension(service): Extension<Arc<QuiztochtService>>,
    Json(mut form): Json<ContactForm>,
) -> (StatusCode, Json<SubmissionResponse>) {
    let outcome = service.submit(&mut form).await;

    let status = match outcome.status {
        SubmissionStatus::Committed if outcome.message.is_some() => StatusCode::CREATED,
        SubmissionStatus::Committed => StatusCode::OK,
        SubmissionStatus::Rejected => StatusCode::UNPROCESSABLE_ENTITY,
        SubmissionStatus::Failed => match service.mode() {
            SubmissionMode::Remote => StatusCode::BAD_GATEWAY,
            SubmissionMode::Local => StatusCode::INTERNAL_SERVER_ERROR,
        },
    };

    (
        status,
        Json(SubmissionResponse {
            success: outcome.is_committed(),
            status: outcome.status,
            notification: outcome.notification,
            form,
            message: outcome.message,
        }),
    )
}
