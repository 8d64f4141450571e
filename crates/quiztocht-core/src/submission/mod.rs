/*
Copyright 2024, Zep Software, Inc.

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! Contact form submission flow
//!
//! A submission moves through `Idle -> Validating -> Submitting` and always
//! ends back in `Idle`, either rejected (a field is empty, nothing is
//! committed), committed (form cleared) or failed (form kept for a retry).

pub mod notification;
pub mod sink;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, error, instrument};
use validator::Validate;

use crate::message::{Message, NewMessage};

pub use notification::{message_count_label, Notification, NotificationVariant};
pub use sink::{LocalSink, MessageSink, RelaySink};

/// Which commit target a deployment uses. The two are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionMode {
    Local,
    Remote,
}

impl FromStr for SubmissionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(SubmissionMode::Local),
            "remote" => Ok(SubmissionMode::Remote),
            _ => Err(format!("Invalid submission mode: {}", s)),
        }
    }
}

impl fmt::Display for SubmissionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionMode::Local => write!(f, "local"),
            SubmissionMode::Remote => write!(f, "remote"),
        }
    }
}

/// The contact form as the visitor filled it in
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ContactForm {
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(length(min = 1))]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(length(min = 1))]
    pub message: String,
    /// Set while a submission is in flight
    #[serde(default)]
    pub submitting: bool,
}

/// A field sent as `null` is as empty as one left out
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl ContactForm {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
            submitting: false,
        }
    }

    fn to_new_message(&self) -> NewMessage {
        NewMessage {
            name: self.name.clone(),
            email: self.email.clone(),
            body: self.message.clone(),
        }
    }

    fn reset(&mut self) {
        self.name.clear();
        self.email.clear();
        self.message.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Committed,
    Rejected,
    Failed,
}

/// Result of one pass through the submission flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    pub status: SubmissionStatus,
    pub notification: Notification,
    /// The stored record, when the commit target keeps one locally
    pub message: Option<Message>,
}

impl SubmissionOutcome {
    pub fn is_committed(&self) -> bool {
        self.status == SubmissionStatus::Committed
    }
}

/// Validates contact forms and commits them to the configured sink
#[derive(Clone)]
pub struct SubmissionFlow {
    sink: Arc<dyn MessageSink>,
}

impl SubmissionFlow {
    pub fn new(sink: Arc<dyn MessageSink>) -> Self {
        Self { sink }
    }

    pub fn mode(&self) -> SubmissionMode {
        self.sink.mode()
    }

    /// Run one submission of `form`.
    ///
    /// The form is cleared only when the message was committed. Its
    /// `submitting` flag is always false again once this returns.
    #[instrument(skip_all, fields(mode = %self.sink.mode()))]
    pub async fn submit(&self, form: &mut ContactForm) -> SubmissionOutcome {
        form.submitting = true;

        debug!("Validating contact form");
        if let Err(e) = form.validate() {
            debug!("Contact form rejected: {}", e);
            form.submitting = false;
            return SubmissionOutcome {
                status: SubmissionStatus::Rejected,
                notification: Notification::validation_rejected(),
                message: None,
            };
        }

        debug!("Submitting contact form");
        let result = self.sink.deliver(form.to_new_message()).await;
        form.submitting = false;

        match result {
            Ok(message) => {
                form.reset();
                SubmissionOutcome {
                    status: SubmissionStatus::Committed,
                    notification: Notification::submitted(),
                    message,
                }
            }
            Err(e) => {
                error!("Contact form submission failed: {}", e);
                SubmissionOutcome {
                    status: SubmissionStatus::Failed,
                    notification: Notification::submission_failed(),
                    message: None,
                }
            }
        }
    }
}
