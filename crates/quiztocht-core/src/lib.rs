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

//! # Quiztocht Core
//!
//! Message store and contact form submission flow for the Quiztocht site.
//!
//! Contact messages are either kept in a [`MessageStore`] (one serialized
//! collection in a pluggable [`StorageSlot`]) or relayed to a third-party form
//! submission endpoint, depending on the deployment's [`SubmissionMode`].

pub mod errors;
pub mod export;
pub mod message;
pub mod relay;
pub mod store;
pub mod submission;
pub mod utils;

// Re-export commonly used types
pub use errors::{QuiztochtError, QuiztochtResult, RelayError, StoreError, StoreResult};
pub use export::{export_file_name, ExportFile};
pub use message::{Message, MessageIdGenerator, NewMessage};

// Re-export traits
pub use store::StorageSlot;
pub use submission::MessageSink;

// Re-export concrete types
pub use relay::{RelayClient, RelayConfig};
pub use store::{MemorySlot, MessageStore, SledSlot, MESSAGES_SLOT};
pub use submission::{
    message_count_label, ContactForm, LocalSink, Notification, NotificationVariant, RelaySink,
    SubmissionFlow, SubmissionMode, SubmissionOutcome, SubmissionStatus,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exports() {
        // This test ensures that all the main exports are available
        // and can be used together
        let _config = RelayConfig::default();
        let _mode = SubmissionMode::Local;
        let _form = ContactForm::default();
    }
}
