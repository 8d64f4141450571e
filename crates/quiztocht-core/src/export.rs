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

//! JSON download of the stored messages

use chrono::{DateTime, Utc};

use crate::errors::StoreResult;
use crate::store::MessageStore;
use crate::utils::datetime_utils::{format_export_date, utc_now};

pub const EXPORT_CONTENT_TYPE: &str = "application/json";

/// Download file name for an export made at `at`
pub fn export_file_name(at: DateTime<Utc>) -> String {
    format!("quiztocht-berichten-{}.json", format_export_date(at))
}

/// A ready-to-download export of the message store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportFile {
    /// Export the current contents of `store`, named after today's date
    pub async fn from_store(store: &MessageStore) -> StoreResult<Self> {
        Self::from_store_at(store, utc_now()).await
    }

    pub async fn from_store_at(store: &MessageStore, at: DateTime<Utc>) -> StoreResult<Self> {
        Ok(Self {
            file_name: export_file_name(at),
            content_type: EXPORT_CONTENT_TYPE,
            bytes: store.serialize_for_export().await?,
        })
    }

    /// Value for a `Content-Disposition` header
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.file_name)
    }
}
