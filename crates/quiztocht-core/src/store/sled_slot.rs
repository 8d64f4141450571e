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

//! Persistent storage slot using sled

use std::path::Path;

use async_trait::async_trait;
use sled::Db;
use tracing::debug;

use crate::errors::{StoreError, StoreResult};
use crate::store::StorageSlot;

/// A storage slot kept under one key of an embedded sled database
pub struct SledSlot {
    db: Db,
    name: String,
}

impl SledSlot {
    /// Open (or create) the database at `path` and use `name` as the slot key
    pub fn open(path: impl AsRef<Path>, name: impl Into<String>) -> StoreResult<Self> {
        let path = path.as_ref();
        let db = sled::open(path)?;
        debug!("Opened message database at {}", path.display());

        Ok(Self {
            db,
            name: name.into(),
        })
    }
}

#[async_trait]
impl StorageSlot for SledSlot {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load(&self) -> StoreResult<Option<String>> {
        let Some(value) = self.db.get(self.name.as_bytes())? else {
            return Ok(None);
        };

        String::from_utf8(value.to_vec()).map(Some).map_err(|e| {
            StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("slot {} is not valid UTF-8: {}", self.name, e),
            ))
        })
    }

    async fn save(&self, raw: &str) -> StoreResult<()> {
        self.db.insert(self.name.as_bytes(), raw.as_bytes())?;
        self.db.flush_async().await?;
        Ok(())
    }

    async fn clear(&self) -> StoreResult<()> {
        self.db.remove(self.name.as_bytes())?;
        self.db.flush_async().await?;
        Ok(())
    }
}
