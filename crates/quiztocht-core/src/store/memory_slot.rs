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

//! In-memory storage slot

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::errors::StoreResult;
use crate::store::StorageSlot;

/// A storage slot that lives only as long as the process
pub struct MemorySlot {
    name: String,
    value: RwLock<Option<String>>,
}

impl MemorySlot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: RwLock::new(None),
        }
    }

    /// Slot pre-filled with a raw blob
    pub fn with_contents(name: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: RwLock::new(Some(raw.into())),
        }
    }
}

#[async_trait]
impl StorageSlot for MemorySlot {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load(&self) -> StoreResult<Option<String>> {
        Ok(self.value.read().await.clone())
    }

    async fn save(&self, raw: &str) -> StoreResult<()> {
        *self.value.write().await = Some(raw.to_string());
        Ok(())
    }

    async fn clear(&self) -> StoreResult<()> {
        *self.value.write().await = None;
        Ok(())
    }
}
