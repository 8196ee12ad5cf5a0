//! MQTT connection configuration.

use serde::{Deserialize, Serialize};

/// MQTT broker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MqttConfig {
    /// Broker address.
    pub broker: String,

    /// Broker port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Client ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// Username.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Keep-alive interval in seconds.
    #[serde(default = "default_keep_alive")]
    pub keep_alive: u64,

    /// Clean session flag.
    #[serde(default = "default_clean_session")]
    pub clean_session: bool,

    /// Consecutive event-loop errors tolerated before the bridge stops.
    #[serde(default = "default_max_poll_errors")]
    pub max_poll_errors: u32,

    /// Back-off between event-loop errors, in milliseconds.
    #[serde(default = "default_error_backoff")]
    pub error_backoff_ms: u64,
}

fn default_port() -> u16 {
    1883
}

fn default_keep_alive() -> u64 {
    60
}

fn default_clean_session() -> bool {
    true
}

fn default_max_poll_errors() -> u32 {
    5
}

fn default_error_backoff() -> u64 {
    1000
}

impl MqttConfig {
    /// Create a new MQTT configuration.
    pub fn new(broker: impl Into<String>) -> Self {
        Self {
            broker: broker.into(),
            port: default_port(),
            client_id: None,
            username: None,
            password: None,
            keep_alive: default_keep_alive(),
            clean_session: default_clean_session(),
            max_poll_errors: default_max_poll_errors(),
            error_backoff_ms: default_error_backoff(),
        }
    }

    /// Set the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the client ID.
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set authentication.
    pub fn with_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Get the full broker address.
    pub fn broker_addr(&self) -> String {
        format!("{}:{}", self.broker, self.port)
    }
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self::new("localhost")
    }
}
