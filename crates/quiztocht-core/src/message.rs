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

//! The contact message record shared by the submission flow and the message store

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::datetime_utils::{format_timestamp, parse_timestamp};

/// A submitted contact message.
///
/// The persisted field names are fixed: the body is stored as `message` and
/// the creation instant as `timestamp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Message {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub email: String,
    #[serde(rename = "message")]
    #[validate(length(min = 1))]
    pub body: String,
    #[serde(rename = "timestamp")]
    #[validate(length(min = 1))]
    pub created_at: String,
}

impl Message {
    /// Build a message from validated form fields, stamping it with a fresh id and creation time
    pub fn create(draft: NewMessage, ids: &MessageIdGenerator, now: DateTime<Utc>) -> Self {
        Self {
            id: ids.next_id(now),
            name: draft.name,
            email: draft.email,
            body: draft.body,
            created_at: format_timestamp(now),
        }
    }

    /// Creation instant, if the stored timestamp can be parsed
    pub fn created_at_instant(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }
}

/// The user-supplied part of a message, before it is given an id and timestamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    pub name: String,
    pub email: String,
    #[serde(rename = "message")]
    pub body: String,
}

/// Issues message ids derived from the creation instant.
///
/// Ids are the epoch milliseconds of creation, bumped forward when needed so
/// that ids issued by one generator are strictly increasing.
#[derive(Debug, Default)]
pub struct MessageIdGenerator {
    last: AtomicI64,
}

impl MessageIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self, now: DateTime<Utc>) -> String {
        let candidate = now.timestamp_millis();
        let mut previous = self.last.load(Ordering::Relaxed);
        loop {
            let next = candidate.max(previous.saturating_add(1));
            match self
                .last
                .compare_exchange_weak(previous, next, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return next.to_string(),
                Err(actual) => previous = actual,
            }
        }
    }
}
