//! Canonical output envelope composition.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::decode::{DecodedSignal, Side};
use crate::{BLIND_SPOT_ALGORITHM, UNKNOWN_ALGORITHM};

/// Algorithm-specific `Data` section of the envelope.
///
/// Untagged on the wire: the blind-spot variant carries a `Side` field,
/// every other algorithm publishes distance only. Keeping this a sum
/// type guarantees `Side` is structurally absent rather than defaulted
/// for non-blind-spot algorithms.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EnvelopeData {
    /// Blind-spot detections carry a side classification.
    BlindSpot {
        #[serde(rename = "Side")]
        side: Side,
        #[serde(rename = "DistanceToVehicle")]
        distance_to_vehicle: f64,
    },
    /// Every other algorithm reports distance only.
    Distance {
        #[serde(rename = "DistanceToVehicle")]
        distance_to_vehicle: f64,
    },
}

/// Canonical envelope published downstream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputEnvelope {
    #[serde(rename = "AlgorithmID")]
    pub algorithm_id: String,
    /// ISO-8601 UTC processing time.
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "Status")]
    pub status: bool,
    #[serde(rename = "Data")]
    pub data: EnvelopeData,
}

/// Compose the canonical envelope for one decoded signal.
///
/// An empty algorithm id is normalized to `"Unknown"`. The timestamp
/// reflects the supplied processing time, not anything carried by the
/// frame; holding the clock fixed makes composition deterministic.
pub fn compose(algorithm_id: &str, signal: &DecodedSignal, now: DateTime<Utc>) -> OutputEnvelope {
    let algorithm_id = if algorithm_id.is_empty() {
        UNKNOWN_ALGORITHM
    } else {
        algorithm_id
    };

    let data = if algorithm_id == BLIND_SPOT_ALGORITHM {
        EnvelopeData::BlindSpot {
            side: signal.side.unwrap_or_default(),
            distance_to_vehicle: signal.distance_m,
        }
    } else {
        EnvelopeData::Distance {
            distance_to_vehicle: signal.distance_m,
        }
    };

    OutputEnvelope {
        algorithm_id: algorithm_id.to_string(),
        timestamp: now.to_rfc3339_opts(SecondsFormat::Secs, true),
        status: signal.status,
        data,
    }
}
