use quiztocht_core::{ContactForm, Message, Notification, SubmissionStatus};
use serde::Serialize;

/// Response to a contact form submission
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub success: bool,
    pub status: SubmissionStatus,
    pub notification: Notification,
    /// The form as it should be shown after this submission
    pub form: ContactForm,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
}
