use std::sync::Arc;

use anyhow::Result;
use quiztocht_core::{
    ContactForm, ExportFile, LocalSink, MemorySlot, Message, MessageSink, MessageStore,
    RelayClient, RelaySink, SledSlot, StorageSlot, StoreResult, SubmissionFlow, SubmissionMode,
    SubmissionOutcome, MESSAGES_SLOT,
};
use tracing::info;

use crate::config::Settings;

/// Service layer that owns the message store and the submission flow
pub struct QuiztochtService {
    store: Arc<MessageStore>,
    flow: SubmissionFlow,
}

impl QuiztochtService {
    /// Create a new QuiztochtService
    pub fn new(settings: &Settings) -> Result<Self> {
        let slot: Arc<dyn StorageSlot> = match &settings.store_path {
            Some(path) => {
                info!("Keeping messages in {}", path);
                Arc::new(
                    SledSlot::open(path, MESSAGES_SLOT)
                        .map_err(|e| anyhow::anyhow!("Failed to open message store: {}", e))?,
                )
            }
            None => {
                info!("Keeping messages in memory");
                Arc::new(MemorySlot::new(MESSAGES_SLOT))
            }
        };
        let store = Arc::new(MessageStore::new(slot));

        let sink: Arc<dyn MessageSink> = match settings.submission_mode {
            SubmissionMode::Local => Arc::new(LocalSink::new(store.clone())),
            SubmissionMode::Remote => {
                let client = RelayClient::new(settings.relay_config())
                    .map_err(|e| anyhow::anyhow!("Failed to create relay client: {}", e))?;
                info!("Relaying submissions to {}", client.endpoint());
                Arc::new(RelaySink::new(client))
            }
        };

        Ok(Self::from_parts(store, SubmissionFlow::new(sink)))
    }

    pub fn from_parts(store: Arc<MessageStore>, flow: SubmissionFlow) -> Self {
        Self { store, flow }
    }

    pub fn mode(&self) -> SubmissionMode {
        self.flow.mode()
    }

    /// Run the contact form through the submission flow
    pub async fn submit(&self, form: &mut ContactForm) -> SubmissionOutcome {
        self.flow.submit(form).await
    }

    /// Stored messages, newest first
    pub async fn list_messages(&self) -> StoreResult<Vec<Message>> {
        self.store.list_sorted_newest_first().await
    }

    /// Delete one message, `false` when it did not exist
    pub async fn delete_message(&self, id: &str) -> StoreResult<bool> {
        self.store.delete(id).await
    }

    /// Export of all stored messages
    pub async fn export(&self) -> StoreResult<ExportFile> {
        ExportFile::from_store(&self.store).await
    }
}
