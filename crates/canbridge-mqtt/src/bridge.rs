//! Broker connection and the dispatch loop.

use std::sync::Arc;
use std::time::Duration;

use canbridge_core::RoutingTable;
use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use tracing::{error, info, warn};

use crate::config::MqttConfig;
use crate::dispatch::Dispatcher;
use crate::sink::MqttSink;

/// Inbound subscriptions: the simulator topic family and the real
/// CAN channel.
const SUBSCRIPTIONS: [&str; 2] = ["sim/#", "can/messages"];

/// Transport-level bridge error.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// Subscribing to an inbound topic failed.
    #[error("Subscribe to {topic} failed: {source}")]
    Subscribe {
        topic: &'static str,
        #[source]
        source: rumqttc::ClientError,
    },

    /// The event loop exceeded the configured error budget.
    #[error("Connection to {addr} gave up after {errors} consecutive errors")]
    ConnectionLost { addr: String, errors: u32 },
}

/// Owns the MQTT connection and runs the dispatch loop.
///
/// Messages are handled strictly one at a time in arrival order; the
/// only cross-message state is the immutable routing table.
pub struct Bridge {
    config: MqttConfig,
    dispatcher: Dispatcher,
}

impl Bridge {
    /// Create a bridge over a routing table.
    pub fn new(config: MqttConfig, table: Arc<RoutingTable>) -> Self {
        Self {
            config,
            dispatcher: Dispatcher::new(table),
        }
    }

    /// Connect, subscribe, and process messages until the connection
    /// exceeds its error budget.
    pub async fn run(self) -> Result<(), BridgeError> {
        let client_id = self
            .config
            .client_id
            .clone()
            .unwrap_or_else(|| format!("canbridge-{}", std::process::id()));

        let mut options = MqttOptions::new(&client_id, &self.config.broker, self.config.port);
        options.set_keep_alive(Duration::from_secs(self.config.keep_alive));
        options.set_clean_session(self.config.clean_session);
        if let (Some(user), Some(pass)) = (&self.config.username, &self.config.password) {
            options.set_credentials(user, pass);
        }

        let (client, mut eventloop) = AsyncClient::new(options, 10);

        for topic in SUBSCRIPTIONS {
            client
                .subscribe(topic, QoS::AtLeastOnce)
                .await
                .map_err(|source| BridgeError::Subscribe { topic, source })?;
            info!(topic, "subscribed");
        }

        let sink = MqttSink::new(client);
        let addr = self.config.broker_addr();
        info!(broker = %addr, client_id = %client_id, "bridge running");

        let mut error_count = 0u32;
        loop {
            match eventloop.poll().await {
                Ok(notification) => {
                    error_count = 0;
                    if let Event::Incoming(Packet::Publish(publish)) = notification {
                        self.dispatcher
                            .handle(&sink, &publish.topic, &publish.payload)
                            .await;
                    }
                }
                Err(e) => {
                    error_count += 1;
                    if error_count >= self.config.max_poll_errors {
                        error!(broker = %addr, error = %e, "error budget exhausted, stopping");
                        return Err(BridgeError::ConnectionLost {
                            addr,
                            errors: error_count,
                        });
                    }
                    warn!(
                        broker = %addr,
                        error = %e,
                        attempt = error_count,
                        max = self.config.max_poll_errors,
                        "event loop error"
                    );
                    tokio::time::sleep(Duration::from_millis(self.config.error_backoff_ms)).await;
                }
            }
        }
    }
}
