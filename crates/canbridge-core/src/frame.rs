//! Typed view of one inbound CAN payload.

use serde::{Deserialize, Serialize};

/// One raw CAN frame: arbitration id plus up to a handful of data bytes.
///
/// Frames are immutable once parsed; a frame shorter than a decoder
/// expects is legal and degrades to default field values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanFrame {
    /// Arbitration identifier. Used as a routing key on the simulator
    /// path and as a diagnostic on the real path.
    pub arbitration_id: u32,
    /// Frame data bytes, possibly empty.
    pub data: Vec<u8>,
}

impl CanFrame {
    /// Create a frame from an arbitration id and data bytes.
    pub fn new(arbitration_id: u32, data: impl Into<Vec<u8>>) -> Self {
        Self {
            arbitration_id,
            data: data.into(),
        }
    }
}

/// The unit of input for both the real and the simulated channel.
///
/// Structurally identical regardless of source; only the wire field
/// naming differs (see [`crate::wire`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlgorithmMessage {
    /// Algorithm identifier, may be empty on the wire.
    pub algorithm_id: String,
    /// The CAN frame carried by this message.
    pub frame: CanFrame,
}

impl AlgorithmMessage {
    /// Create a message from an algorithm id and a frame.
    pub fn new(algorithm_id: impl Into<String>, frame: CanFrame) -> Self {
        Self {
            algorithm_id: algorithm_id.into(),
            frame,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_message_is_empty() {
        let msg = AlgorithmMessage::default();
        assert!(msg.algorithm_id.is_empty());
        assert_eq!(msg.frame.arbitration_id, 0);
        assert!(msg.frame.data.is_empty());
    }

    #[test]
    fn frame_construction() {
        let frame = CanFrame::new(0x101, vec![1, 44, 1]);
        assert_eq!(frame.arbitration_id, 0x101);
        assert_eq!(frame.data, vec![1, 44, 1]);
    }
}
