use std::env;
use std::fmt;
use std::time::Duration;

use quiztocht_core::relay::config::{DEFAULT_RELAY_URL, DEFAULT_TIMEOUT_SECS};
use quiztocht_core::{RelayConfig, SubmissionMode};

/// Application configuration
#[derive(Clone)]
pub struct Settings {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Where submitted contact messages go
    pub submission_mode: SubmissionMode,

    /// Directory of the persistent message database; in-memory when unset
    pub store_path: Option<String>,

    /// Remote form submission endpoint
    pub relay_url: String,

    /// Access key sent along with every relayed submission
    pub relay_access_key: Option<String>,

    /// Relay request timeout in seconds; 0 disables the timeout
    pub relay_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Settings {
    /// Load settings from environment variables
    pub fn load() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(p) => p
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a port number, got {:?}", p))?,
            None => default_port(),
        };

        let submission_mode = match lookup("QUIZTOCHT_SUBMISSION_MODE") {
            Some(mode) => mode.parse::<SubmissionMode>().map_err(|e| anyhow::anyhow!(e))?,
            None => SubmissionMode::Local,
        };

        let relay_timeout_secs = match lookup("QUIZTOCHT_RELAY_TIMEOUT_SECS") {
            Some(secs) => secs.parse().map_err(|_| {
                anyhow::anyhow!(
                    "QUIZTOCHT_RELAY_TIMEOUT_SECS must be a whole number, got {:?}",
                    secs
                )
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let settings = Settings {
            host: lookup("HOST").unwrap_or_else(default_host),
            port,
            submission_mode,
            store_path: lookup("QUIZTOCHT_STORE_PATH").filter(|p| !p.is_empty()),
            relay_url: lookup("QUIZTOCHT_RELAY_URL")
                .unwrap_or_else(|| DEFAULT_RELAY_URL.to_string()),
            relay_access_key: lookup("WEB3FORMS_ACCESS_KEY").filter(|k| !k.is_empty()),
            relay_timeout_secs,
        };

        if settings.submission_mode == SubmissionMode::Remote
            && settings.relay_access_key.is_none()
        {
            return Err(anyhow::anyhow!(
                "WEB3FORMS_ACCESS_KEY environment variable is required in remote submission mode"
            ));
        }

        Ok(settings)
    }

    /// Get the server address as a string
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Relay client configuration derived from these settings
    pub fn relay_config(&self) -> RelayConfig {
        let timeout = match self.relay_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        let mut config = RelayConfig::new()
            .with_endpoint(self.relay_url.clone())
            .with_timeout(timeout);
        if let Some(key) = &self.relay_access_key {
            config = config.with_access_key(key.clone());
        }
        config
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("submission_mode", &self.submission_mode)
            .field("store_path", &self.store_path)
            .field("relay_url", &self.relay_url)
            .field("relay_access_key", &self.relay_access_key.as_ref().map(|_| "<redacted>"))
            .field("relay_timeout_secs", &self.relay_timeout_secs)
            .finish()
    }
}
