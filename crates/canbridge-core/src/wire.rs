//! Per-channel wire payload parsing.
//!
//! The real channel (`can/messages`) and the simulator channel
//! (`sim/canmessages`) carry the same semantic shape under different
//! field naming conventions (PascalCase vs snake_case). Each channel
//! gets its own explicit parser selected by topic; no parser ever
//! guesses the convention, which avoids silent misparses.
//!
//! Parsing is best-effort: missing fields default (`""` algorithm id,
//! arbitration id 0, empty data). A payload that fails to parse at all
//! is reported as [`CoreError::MalformedPayload`] and the caller
//! substitutes [`AlgorithmMessage::default`].

use serde::Deserialize;

use crate::error::CoreError;
use crate::frame::{AlgorithmMessage, CanFrame};

/// Which inbound wire convention a payload uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// `can/messages`: PascalCase field names.
    Real,
    /// `sim/canmessages`: snake_case field names.
    Sim,
}

impl Channel {
    /// Parse a payload under this channel's convention.
    pub fn parse(self, payload: &[u8]) -> Result<AlgorithmMessage, CoreError> {
        match self {
            Channel::Real => parse_real(payload),
            Channel::Sim => parse_sim(payload),
        }
    }

    /// Name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Channel::Real => "can/messages",
            Channel::Sim => "sim/canmessages",
        }
    }
}

/// Real-channel frame fields (`CAN_Message` object).
#[derive(Debug, Default, Deserialize)]
struct RealWireFrame {
    #[serde(rename = "ArbitrationId", default)]
    arbitration_id: u32,
    #[serde(rename = "Data", default)]
    data: Vec<u8>,
}

/// Real-channel top-level payload.
#[derive(Debug, Default, Deserialize)]
struct RealWireMessage {
    #[serde(rename = "AlgorithmID", default)]
    algorithm_id: String,
    #[serde(rename = "CAN_Message", default)]
    can_message: RealWireFrame,
}

/// Simulator-channel frame fields (`can_message` object).
#[derive(Debug, Default, Deserialize)]
struct SimWireFrame {
    #[serde(default)]
    arbitration_id: u32,
    #[serde(default)]
    data: Vec<u8>,
}

/// Simulator-channel top-level payload.
#[derive(Debug, Default, Deserialize)]
struct SimWireMessage {
    #[serde(default)]
    algorithm_id: String,
    #[serde(default)]
    can_message: SimWireFrame,
}

/// Parse a `can/messages` payload (PascalCase convention).
pub fn parse_real(payload: &[u8]) -> Result<AlgorithmMessage, CoreError> {
    let wire: RealWireMessage =
        serde_json::from_slice(payload).map_err(|source| CoreError::MalformedPayload {
            channel: Channel::Real.name(),
            source,
        })?;
    Ok(AlgorithmMessage::new(
        wire.algorithm_id,
        CanFrame::new(wire.can_message.arbitration_id, wire.can_message.data),
    ))
}

/// Parse a `sim/canmessages` payload (snake_case convention).
pub fn parse_sim(payload: &[u8]) -> Result<AlgorithmMessage, CoreError> {
    let wire: SimWireMessage =
        serde_json::from_slice(payload).map_err(|source| CoreError::MalformedPayload {
            channel: Channel::Sim.name(),
            source,
        })?;
    Ok(AlgorithmMessage::new(
        wire.algorithm_id,
        CanFrame::new(wire.can_message.arbitration_id, wire.can_message.data),
    ))
}
