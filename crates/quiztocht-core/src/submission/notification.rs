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

//! User-facing notices and labels, in Dutch like the rest of the site

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationVariant {
    Default,
    Destructive,
}

/// A short notice the client shows as a toast
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
}

impl Notification {
    fn new(title: &str, description: &str, variant: NotificationVariant) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            variant,
        }
    }

    pub fn validation_rejected() -> Self {
        Self::new(
            "Vul alle velden in",
            "Alle velden zijn verplicht.",
            NotificationVariant::Destructive,
        )
    }

    pub fn submitted() -> Self {
        Self::new(
            "Bericht verzonden! ✓",
            "We nemen zo snel mogelijk contact met je op.",
            NotificationVariant::Default,
        )
    }

    pub fn submission_failed() -> Self {
        Self::new(
            "Er ging iets mis",
            "Je bericht kon niet worden verzonden. Probeer het later opnieuw.",
            NotificationVariant::Destructive,
        )
    }

    pub fn message_deleted() -> Self {
        Self::new(
            "Bericht verwijderd",
            "Het bericht is succesvol verwijderd.",
            NotificationVariant::Default,
        )
    }

    pub fn download_started() -> Self {
        Self::new(
            "Download gestart",
            "Berichten worden gedownload als JSON.",
            NotificationVariant::Default,
        )
    }

    pub fn is_destructive(&self) -> bool {
        self.variant == NotificationVariant::Destructive
    }
}

/// Heading text for the message overview
pub fn message_count_label(count: usize) -> String {
    match count {
        0 => "Nog geen berichten ontvangen".to_string(),
        1 => "1 bericht".to_string(),
        n => format!("{} berichten", n),
    }
}
