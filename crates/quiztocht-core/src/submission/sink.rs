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

//! Commit targets for validated contact messages

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::SubmissionMode;
use crate::errors::QuiztochtResult;
use crate::message::{Message, MessageIdGenerator, NewMessage};
use crate::relay::RelayClient;
use crate::store::MessageStore;
use crate::utils::datetime_utils::utc_now;

/// Where a validated submission ends up
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Commit one message. Returns the stored record when the sink keeps one locally.
    async fn deliver(&self, draft: NewMessage) -> QuiztochtResult<Option<Message>>;

    fn mode(&self) -> SubmissionMode;
}

/// Stores submissions in the local message store
pub struct LocalSink {
    store: Arc<MessageStore>,
    ids: MessageIdGenerator,
}

impl LocalSink {
    pub fn new(store: Arc<MessageStore>) -> Self {
        Self {
            store,
            ids: MessageIdGenerator::new(),
        }
    }
}

#[async_trait]
impl MessageSink for LocalSink {
    async fn deliver(&self, draft: NewMessage) -> QuiztochtResult<Option<Message>> {
        let message = Message::create(draft, &self.ids, utc_now());
        self.store.append(message.clone()).await?;
        info!("Stored contact message {}", message.id);
        Ok(Some(message))
    }

    fn mode(&self) -> SubmissionMode {
        SubmissionMode::Local
    }
}

/// Forwards submissions to the remote form submission endpoint
pub struct RelaySink {
    client: RelayClient,
}

impl RelaySink {
    pub fn new(client: RelayClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MessageSink for RelaySink {
    async fn deliver(&self, draft: NewMessage) -> QuiztochtResult<Option<Message>> {
        self.client.submit(&draft).await?;
        info!("Relayed contact message to {}", self.client.endpoint());
        Ok(None)
    }

    fn mode(&self) -> SubmissionMode {
        SubmissionMode::Remote
    }
}
