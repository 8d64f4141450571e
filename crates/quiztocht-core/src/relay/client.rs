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

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::config::RelayConfig;
use crate::errors::{RelayError, RelayResult};
use crate::message::NewMessage;

#[derive(Debug, Serialize)]
struct SubmissionRequest<'a> {
    access_key: &'a str,
    name: &'a str,
    email: &'a str,
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct SubmissionResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

/// Client for a form submission endpoint that accepts an access key plus the
/// three contact fields and answers with a `success` flag.
///
/// Each submission is a single attempt: no retries and no idempotency key.
pub struct RelayClient {
    client: Client,
    endpoint: String,
    access_key: String,
}

impl RelayClient {
    pub fn new(config: RelayConfig) -> RelayResult<Self> {
        let access_key = config
            .access_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| RelayError::InvalidConfig {
                message: "Submission access key is required".to_string(),
            })?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| RelayError::InvalidConfig {
            message: format!("Failed to create HTTP client: {}", e),
        })?;

        Ok(Self {
            client,
            endpoint: config.endpoint,
            access_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Post one message to the endpoint
    pub async fn submit(&self, draft: &NewMessage) -> RelayResult<()> {
        let request = SubmissionRequest {
            access_key: &self.access_key,
            name: &draft.name,
            email: &draft.email,
            message: &draft.body,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("Accept", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        let parsed: SubmissionResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(e) if status.is_success() => {
                return Err(RelayError::InvalidResponse {
                    message: format!("{}: {}", e, body),
                });
            }
            Err(_) => {
                return Err(RelayError::Status {
                    status: status.as_u16(),
                    body,
                });
            }
        };

        if parsed.success {
            debug!("Submission accepted by {} ({})", self.endpoint, status);
            Ok(())
        } else {
            let message = parsed
                .message
                .unwrap_or_else(|| format!("endpoint answered {}", status));
            warn!("Submission rejected by {}: {}", self.endpoint, message);
            Err(RelayError::Rejected { message })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::Value;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Mutex;

    type Received = Arc<Mutex<Vec<Value>>>;

    async fn spawn_endpoint(
        status: StatusCode,
        body: &'static str,
        delay: Duration,
    ) -> (String, Received) {
        let received: Received = Arc::new(Mutex::new(Vec::new()));
        let captured = received.clone();
        let app = Router::new().route(
            "/submit",
            post(move |Json(payload): Json<Value>| {
                let captured = captured.clone();
                async move {
                    captured.lock().await.push(payload);
                    tokio::time::sleep(delay).await;
                    (status, body)
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}/submit", addr), received)
    }

    fn draft() -> NewMessage {
        NewMessage {
            name: "Jan".to_string(),
            email: "jan@example.com".to_string(),
            body: "Hallo".to_string(),
        }
    }

    fn client_for(endpoint: String) -> RelayClient {
        RelayClient::new(
            RelayConfig::new()
                .with_endpoint(endpoint)
                .with_access_key("test-key".to_string()),
        )
        .unwrap()
    }

    #[test]
    fn test_access_key_is_required() {
        let err = RelayClient::new(RelayConfig::default()).err().unwrap();
        assert!(matches!(err, RelayError::InvalidConfig { .. }));

        let err = RelayClient::new(RelayConfig::new().with_access_key(String::new()))
            .err()
            .unwrap();
        assert!(matches!(err, RelayError::InvalidConfig { .. }));
    }

    #[tokio::test]
    async fn test_submit_posts_fields_and_access_key() {
        let (endpoint, received) = spawn_endpoint(
            StatusCode::OK,
            r#"{"success":true,"message":"ok"}"#,
            Duration::ZERO,
        )
        .await;
        let client = client_for(endpoint);

        client.submit(&draft()).await.unwrap();

        let received = received.lock().await;
        assert_eq!(received.len(), 1);
        assert_eq!(received[0]["access_key"], "test-key");
        assert_eq!(received[0]["name"], "Jan");
        assert_eq!(received[0]["email"], "jan@example.com");
        assert_eq!(received[0]["message"], "Hallo");
    }

    #[tokio::test]
    async fn test_submit_unsuccessful_body_is_rejected() {
        let (endpoint, _) = spawn_endpoint(
            StatusCode::OK,
            r#"{"success":false,"message":"Invalid access key"}"#,
            Duration::ZERO,
        )
        .await;
        let client = client_for(endpoint);

        let err = client.submit(&draft()).await.unwrap_err();
        assert!(matches!(
            err,
            RelayError::Rejected { ref message } if message == "Invalid access key"
        ));
    }

    #[tokio::test]
    async fn test_submit_error_status_without_json() {
        let (endpoint, _) =
            spawn_endpoint(StatusCode::INTERNAL_SERVER_ERROR, "stuk", Duration::ZERO).await;
        let client = client_for(endpoint);

        let err = client.submit(&draft()).await.unwrap_err();
        assert!(matches!(err, RelayError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_submit_success_status_with_garbage_body() {
        let (endpoint, _) = spawn_endpoint(StatusCode::OK, "<html></html>", Duration::ZERO).await;
        let client = client_for(endpoint);

        let err = client.submit(&draft()).await.unwrap_err();
        assert!(matches!(err, RelayError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn test_submit_transport_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(format!("http://{}/submit", addr));
        let err = client.submit(&draft()).await.unwrap_err();
        assert!(matches!(err, RelayError::Http(_)));
    }

    #[tokio::test]
    async fn test_submit_times_out() {
        let (endpoint, _) = spawn_endpoint(
            StatusCode::OK,
            r#"{"success":true}"#,
            Duration::from_secs(5),
        )
        .await;
        let client = RelayClient::new(
            RelayConfig::new()
                .with_endpoint(endpoint)
                .with_access_key("test-key".to_string())
                .with_timeout(Some(Duration::from_millis(100))),
        )
        .unwrap();

        let err = client.submit(&draft()).await.unwrap_err();
        match err {
            RelayError::Http(e) => assert!(e.is_timeout()),
            other => panic!("expected timeout, got {:?}", other),
        }
    }
}
