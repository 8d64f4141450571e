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

//! Message store
//!
//! The whole collection of contact messages lives in one named slot as a
//! single JSON array. Slots are pluggable: an in-memory slot for tests and
//! ephemeral deployments, and a sled-backed slot that survives restarts.

pub mod memory_slot;
pub mod sled_slot;

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use validator::Validate;

use crate::errors::{StoreError, StoreResult};
use crate::message::Message;

pub use memory_slot::MemorySlot;
pub use sled_slot::SledSlot;

/// Name of the slot holding the serialized message collection
pub const MESSAGES_SLOT: &str = "quiztocht-messages";

/// A single named slot holding one serialized blob
#[async_trait]
pub trait StorageSlot: Send + Sync {
    /// Name of the slot, used in diagnostics
    fn name(&self) -> &str;

    /// Read the raw blob, `None` when nothing has been stored
    async fn load(&self) -> StoreResult<Option<String>>;

    /// Replace the raw blob
    async fn save(&self, raw: &str) -> StoreResult<()>;

    /// Remove the blob entirely
    async fn clear(&self) -> StoreResult<()>;
}

/// The durable collection of contact messages.
///
/// Every mutation is a full read-modify-write of the slot. Mutations made
/// through one store are serialized; writers in other processes sharing the
/// same slot are not coordinated and the last one wins.
pub struct MessageStore {
    slot: Arc<dyn StorageSlot>,
    write_lock: Mutex<()>,
}

impl MessageStore {
    pub fn new(slot: Arc<dyn StorageSlot>) -> Self {
        Self {
            slot,
            write_lock: Mutex::new(()),
        }
    }

    /// Store backed by a fresh in-memory slot
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySlot::new(MESSAGES_SLOT)))
    }

    /// Load every stored message in stored order.
    ///
    /// An absent or blank slot is an empty collection. A blob that does not
    /// deserialize is reported as [`StoreError::Corrupt`].
    pub async fn load(&self) -> StoreResult<Vec<Message>> {
        let raw = match self.slot.load().await? {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => return Ok(Vec::new()),
        };

        serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
            slot: self.slot.name().to_string(),
            source,
        })
    }

    /// Load every stored message, treating a corrupt slot as empty
    pub async fn load_or_empty(&self) -> Vec<Message> {
        match self.load().await {
            Ok(messages) => messages,
            Err(e) => {
                warn!("Treating message store as empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Add a message to the collection.
    ///
    /// The message must have every field populated and a parseable creation
    /// timestamp, and its id must not already be stored.
    pub async fn append(&self, message: Message) -> StoreResult<()> {
        message.validate().map_err(|e| StoreError::InvalidMessage {
            message: e.to_string(),
        })?;
        if message.created_at_instant().is_none() {
            return Err(StoreError::InvalidMessage {
                message: format!("unreadable timestamp {:?}", message.created_at),
            });
        }

        let _guard = self.write_lock.lock().await;
        let mut messages = self.load().await?;
        if messages.iter().any(|m| m.id == message.id) {
            return Err(StoreError::DuplicateId { id: message.id });
        }

        debug!("Appending message {} to {}", message.id, self.slot.name());
        messages.push(message);
        self.write(&messages).await
    }

    /// Remove the message with the given id.
    ///
    /// Returns `false`, leaving the slot untouched, when no message has that id.
    pub async fn delete(&self, id: &str) -> StoreResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut messages = self.load().await?;
        let before = messages.len();
        messages.retain(|m| m.id != id);

        if messages.len() == before {
            debug!("No message {} in {}", id, self.slot.name());
            return Ok(false);
        }

        debug!("Deleting message {} from {}", id, self.slot.name());
        self.write(&messages).await?;
        Ok(true)
    }

    /// Every stored message ordered by descending creation time.
    ///
    /// Equal timestamps keep their stored order. Timestamps that cannot be
    /// parsed sort after all parseable ones, by their text.
    pub async fn list_sorted_newest_first(&self) -> StoreResult<Vec<Message>> {
        let mut messages = self.load().await?;
        messages.sort_by(newest_first);
        Ok(messages)
    }

    /// Pretty-printed JSON of the whole collection, newest first
    pub async fn serialize_for_export(&self) -> StoreResult<Vec<u8>> {
        let messages = self.list_sorted_newest_first().await?;
        Ok(serde_json::to_vec_pretty(&messages)?)
    }

    /// Number of stored messages
    pub async fn count(&self) -> StoreResult<usize> {
        Ok(self.load().await?.len())
    }

    /// Drop the whole collection
    pub async fn clear(&self) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        self.slot.clear().await
    }

    async fn write(&self, messages: &[Message]) -> StoreResult<()> {
        let raw = serde_json::to_string(messages)?;
        self.slot.save(&raw).await
    }
}

fn newest_first(a: &Message, b: &Message) -> Ordering {
    match (a.created_at_instant(), b.created_at_instant()) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.created_at.cmp(&a.created_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(id: &str, created_at: &str) -> Message {
        Message {
            id: id.to_string(),
            name: format!("Naam {}", id),
            email: format!("{}@example.com", id),
            body: format!("Bericht {}", id),
            created_at: created_at.to_string(),
        }
    }

    fn store_with(raw: &str) -> MessageStore {
        MessageStore::new(Arc::new(MemorySlot::with_contents(MESSAGES_SLOT, raw)))
    }

    #[tokio::test]
    async fn test_load_empty_slot() {
        let store = MessageStore::in_memory();
        assert!(store.load().await.unwrap().is_empty());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_load_blank_slot() {
        let store = store_with("   ");
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_corrupt_slot_is_reported() {
        let store = store_with("{not json");
        let err = store.load().await.unwrap_err();
        assert!(err.is_corrupt());

        assert!(store.load_or_empty().await.is_empty());
    }

    #[tokio::test]
    async fn test_load_wrong_shape_is_corrupt() {
        let store = store_with(r#"[{"id":"1","name":"Jan"}]"#);
        assert!(store.load().await.unwrap_err().is_corrupt());
    }

    #[tokio::test]
    async fn test_append_then_load_returns_all() {
        let store = MessageStore::in_memory();
        let appended = vec![
            message("1", "2024-01-01T10:00:00.000Z"),
            message("2", "2024-01-02T10:00:00.000Z"),
            message("3", "2024-01-03T10:00:00.000Z"),
        ];
        for m in &appended {
            store.append(m.clone()).await.unwrap();
        }

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.len(), appended.len());
        for m in &appended {
            let found = loaded.iter().find(|l| l.id == m.id).unwrap();
            assert_eq!(found, m);
        }
    }

    #[tokio::test]
    async fn test_append_rejects_duplicate_id() {
        let store = MessageStore::in_memory();
        store.append(message("1", "2024-01-01")).await.unwrap();

        let err = store.append(message("1", "2024-02-01")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId { ref id } if id == "1"));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_append_rejects_incomplete_message() {
        let store = MessageStore::in_memory();
        let mut incomplete = message("1", "2024-01-01");
        incomplete.body.clear();

        let err = store.append(incomplete).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidMessage { .. }));
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_rejects_unreadable_timestamp() {
        let store = MessageStore::in_memory();
        let err = store.append(message("1", "vorige week")).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidMessage { .. }));
    }

    #[tokio::test]
    async fn test_append_does_not_overwrite_corrupt_slot() {
        let slot = Arc::new(MemorySlot::with_contents(MESSAGES_SLOT, "oops"));
        let store = MessageStore::new(slot.clone());

        assert!(store.append(message("1", "2024-01-01")).await.is_err());
        assert_eq!(slot.load().await.unwrap().as_deref(), Some("oops"));
    }

    #[tokio::test]
    async fn test_delete_removes_message() {
        let store = MessageStore::in_memory();
        store.append(message("1", "2024-01-01")).await.unwrap();
        store.append(message("2", "2024-01-02")).await.unwrap();

        assert!(store.delete("1").await.unwrap());

        let loaded = store.load().await.unwrap();
        assert!(loaded.iter().all(|m| m.id != "1"));
        assert_eq!(loaded.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_noop() {
        let store = MessageStore::in_memory();
        store.append(message("1", "2024-01-01")).await.unwrap();
        let before = store.load().await.unwrap();

        assert!(!store.delete("42").await.unwrap());
        assert_eq!(store.load().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_list_sorted_newest_first() {
        let store = MessageStore::in_memory();
        store.append(message("jan", "2024-01-01")).await.unwrap();
        store.append(message("mrt", "2024-03-01")).await.unwrap();

        let sorted = store.list_sorted_newest_first().await.unwrap();
        assert_eq!(sorted[0].id, "mrt");
        assert_eq!(sorted[1].id, "jan");
    }

    #[tokio::test]
    async fn test_list_sorted_is_non_increasing() {
        let store = MessageStore::in_memory();
        let stamps = [
            "2024-05-01T08:00:00.000Z",
            "2023-12-31T23:59:59.999Z",
            "2024-05-01T10:00:00+02:00",
            "2024-07-14T12:00:00.000Z",
            "2024-02-29",
        ];
        for (i, stamp) in stamps.iter().enumerate() {
            store.append(message(&i.to_string(), stamp)).await.unwrap();
        }

        let sorted = store.list_sorted_newest_first().await.unwrap();
        for pair in sorted.windows(2) {
            assert!(pair[0].created_at_instant() >= pair[1].created_at_instant());
        }
    }

    #[tokio::test]
    async fn test_list_sorted_keeps_stored_order_for_ties() {
        let store = MessageStore::in_memory();
        store.append(message("a", "2024-01-01T00:00:00.000Z")).await.unwrap();
        store.append(message("b", "2024-01-01T00:00:00.000Z")).await.unwrap();

        let sorted = store.list_sorted_newest_first().await.unwrap();
        let ids: Vec<&str> = sorted.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_unparseable_stored_timestamps_sort_last() {
        let store = store_with(
            r#"[
                {"id":"x","name":"n","email":"e","message":"m","timestamp":"onbekend"},
                {"id":"y","name":"n","email":"e","message":"m","timestamp":"2020-01-01"}
            ]"#,
        );

        let sorted = store.list_sorted_newest_first().await.unwrap();
        assert_eq!(sorted[0].id, "y");
        assert_eq!(sorted[1].id, "x");
    }

    #[tokio::test]
    async fn test_serialize_for_export_is_pretty() {
        let store = MessageStore::in_memory();
        store.append(message("1", "2024-01-01")).await.unwrap();
        store.append(message("2", "2024-03-01")).await.unwrap();

        let bytes = store.serialize_for_export().await.unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("[\n  {\n    \"id\": \"2\""));

        let parsed: Vec<Message> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.len(), 2);
    }

    #[tokio::test]
    async fn test_stored_form_is_compact() {
        let slot = Arc::new(MemorySlot::new(MESSAGES_SLOT));
        let store = MessageStore::new(slot.clone());
        store.append(message("1", "2024-01-01")).await.unwrap();

        let raw = slot.load().await.unwrap().unwrap();
        assert!(!raw.contains('\n'));
    }

    #[tokio::test]
    async fn test_clear_empties_store() {
        let store = MessageStore::in_memory();
        store.append(message("1", "2024-01-01")).await.unwrap();
        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_not_lost() {
        let store = Arc::new(MessageStore::in_memory());
        let mut handles = Vec::new();
        for i in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .append(message(&i.to_string(), "2024-01-01T00:00:00.000Z"))
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.count().await.unwrap(), 20);
    }
}
