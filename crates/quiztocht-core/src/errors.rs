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

use thiserror::Error;

/// Base error type for Quiztocht core operations
#[derive(Debug, Error)]
pub enum QuiztochtError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Relay error: {0}")]
    Relay(#[from] RelayError),
}

/// Message store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Stored data in slot {slot} is corrupt: {source}")]
    Corrupt {
        slot: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage backend error: {0}")]
    Backend(#[from] sled::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Message {id} already exists")]
    DuplicateId { id: String },

    #[error("Invalid message: {message}")]
    InvalidMessage { message: String },
}

impl StoreError {
    /// Whether this error means the persisted collection could not be read back
    pub fn is_corrupt(&self) -> bool {
        matches!(self, StoreError::Corrupt { .. })
    }
}

/// Remote submission relay error types
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Submission endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Submission endpoint rejected the message: {message}")]
    Rejected { message: String },

    #[error("Unexpected response from submission endpoint: {message}")]
    InvalidResponse { message: String },

    #[error("Invalid relay configuration: {message}")]
    InvalidConfig { message: String },
}

/// Result type alias for Quiztocht operations
pub type QuiztochtResult<T> = Result<T, QuiztochtError>;

/// Result type alias for message store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type alias for relay operations
pub type RelayResult<T> = Result<T, RelayError>;
