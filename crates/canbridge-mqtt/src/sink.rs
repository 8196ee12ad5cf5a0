//! The outbound publish collaborator.

use async_trait::async_trait;
use rumqttc::AsyncClient;

/// MQTT QoS level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum Qos {
    AtMostOnce = 0,
    #[default]
    AtLeastOnce = 1,
    ExactlyOnce = 2,
}

impl From<Qos> for rumqttc::QoS {
    fn from(qos: Qos) -> Self {
        match qos {
            Qos::AtMostOnce => rumqttc::QoS::AtMostOnce,
            Qos::AtLeastOnce => rumqttc::QoS::AtLeastOnce,
            Qos::ExactlyOnce => rumqttc::QoS::ExactlyOnce,
        }
    }
}

/// Publish failure reported by a sink.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// The underlying client rejected the publish.
    #[error("Publish to {topic} failed: {reason}")]
    PublishFailed { topic: String, reason: String },
}

/// Abstract publish operation the dispatcher writes to.
///
/// QoS and retain travel with every call so the dispatcher's
/// at-least-once + retained publish policy is visible at the seam and
/// assertable in tests without a broker.
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Publish one payload to a topic.
    async fn publish(
        &self,
        topic: &str,
        payload: Vec<u8>,
        qos: Qos,
        retain: bool,
    ) -> Result<(), SinkError>;
}

/// rumqttc-backed sink.
pub struct MqttSink {
    client: AsyncClient,
}

impl MqttSink {
    /// Wrap an async client.
    pub fn new(client: AsyncClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MessageSink for MqttSink {
    async fn publish(
        &self,
        topic: &str,
        payload: Vec<u8>,
        qos: Qos,
        retain: bool,
    ) -> Result<(), SinkError> {
        self.client
            .publish(topic, qos.into(), retain, payload)
            .await
            .map_err(|e| SinkError::PublishFailed {
                topic: topic.to_string(),
                reason: e.to_string(),
            })
    }
}
