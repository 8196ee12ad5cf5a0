//! CAN Frame Translation Core
//!
//! This crate holds the pure decode-classify-route-compose pipeline for
//! the canbridge agent. It turns raw CAN frames carried inside MQTT
//! payloads into canonical JSON envelopes and decides where each one
//! should be republished.
//!
//! ## Architecture
//!
//! - **CanFrame / AlgorithmMessage**: typed view of one inbound payload
//! - **decode**: raw frame bytes -> `DecodedSignal`
//! - **compose**: `DecodedSignal` + clock -> `OutputEnvelope`
//! - **route**: topic + payload -> `RouteDecision` (forward / relay / drop)
//!
//! Everything here is synchronous and free of I/O; the transport layer
//! (canbridge-mqtt) drives it one message at a time.

pub mod decode;
pub mod envelope;
pub mod error;
pub mod frame;
pub mod routing;
pub mod wire;

pub use decode::{decode, DecodedSignal, Side};
pub use envelope::{compose, EnvelopeData, OutputEnvelope};
pub use error::CoreError;
pub use frame::{AlgorithmMessage, CanFrame};
pub use routing::{route, DropReason, RouteDecision, RoutingTable};
pub use wire::{parse_real, parse_sim, Channel};

/// Algorithm identifier that enables blind-spot side classification.
pub const BLIND_SPOT_ALGORITHM: &str = "BlindSpotDetection";

/// Substitute identifier for payloads that carry no algorithm id.
pub const UNKNOWN_ALGORITHM: &str = "Unknown";
