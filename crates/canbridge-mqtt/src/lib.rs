//! MQTT transport for the canbridge agent, built on rumqttc.
//!
//! The [`Bridge`] owns the broker connection: it subscribes to the
//! inbound topic families, polls the rumqttc event loop, and hands
//! every publish packet to the [`Dispatcher`]. The dispatcher runs the
//! pure pipeline from `canbridge-core` and realizes the resulting
//! [`canbridge_core::RouteDecision`] against a [`MessageSink`].

pub mod bridge;
pub mod config;
pub mod dispatch;
pub mod sink;

pub use bridge::{Bridge, BridgeError};
pub use config::MqttConfig;
pub use dispatch::Dispatcher;
pub use sink::{MessageSink, MqttSink, Qos, SinkError};
