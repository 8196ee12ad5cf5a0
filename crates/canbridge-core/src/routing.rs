//! Topic classification and routing.
//!
//! One entry point, [`route`], turns an inbound (topic, payload) pair
//! into a [`RouteDecision`]. The decision is a sum type so the dispatch
//! layer handles every case exhaustively.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::decode::decode;
use crate::envelope::{compose, OutputEnvelope};
use crate::frame::AlgorithmMessage;
use crate::wire::Channel;

/// Topic prefix for simulator traffic.
const SIM_PREFIX: &str = "sim/";
/// Topic prefix simulator relay traffic is rewritten to.
const MOTO_PREFIX: &str = "moto/";
/// Simulator CAN payload topic, the sole `sim/` topic that is decoded.
const SIM_CAN_TOPIC: &str = "sim/canmessages";
/// Real CAN payload topic.
const REAL_CAN_TOPIC: &str = "can/messages";
/// Destination for everything arriving on the real channel.
const REAL_DESTINATION: &str = "sensor/sensordetector";

/// Immutable arbitration-id to destination-topic map.
///
/// Built once at startup and shared read-only for the process lifetime;
/// concurrent lookups need no synchronization.
#[derive(Debug, Clone)]
pub struct RoutingTable {
    entries: HashMap<u32, String>,
}

impl RoutingTable {
    /// Build a table from explicit entries.
    pub fn new(entries: impl IntoIterator<Item = (u32, String)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Look up the destination topic for an arbitration id.
    pub fn destination(&self, arbitration_id: u32) -> Option<&str> {
        self.entries.get(&arbitration_id).map(String::as_str)
    }

    /// Number of routed arbitration ids.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for RoutingTable {
    /// The fixed simulator routing table.
    fn default() -> Self {
        Self::new([
            (0x100, "simsensor/blindspot".to_string()),
            (0x101, "simsensor/pedestrian".to_string()),
            (0x102, "simsensor/frontalcollision".to_string()),
            (0x103, "simsensor/rearcollision".to_string()),
        ])
    }
}

/// Why a message was dropped instead of published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Simulator CAN payload whose arbitration id has no table entry.
    UnmappedArbitrationId,
    /// Topic outside the classifier's vocabulary.
    UnrecognizedTopic,
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DropReason::UnmappedArbitrationId => write!(f, "unmapped arbitration id"),
            DropReason::UnrecognizedTopic => write!(f, "unrecognized topic"),
        }
    }
}

/// Outcome of classifying one inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteDecision {
    /// Publish the canonical envelope to `topic`.
    Forward {
        topic: String,
        envelope: OutputEnvelope,
    },
    /// Republish the original payload verbatim to a rewritten topic.
    Relay { topic: String, payload: Vec<u8> },
    /// Publish nothing.
    Drop(DropReason),
}

/// Classify one inbound message and build its outbound form.
///
/// Evaluation order is strict: the `sim/` prefix wins over everything,
/// with `sim/canmessages` as the sole decoded simulator topic; then the
/// exact real channel topic; then drop. The real channel never consults
/// the routing table -- its arbitration id is diagnostic only.
pub fn route(
    topic: &str,
    payload: &[u8],
    table: &RoutingTable,
    now: DateTime<Utc>,
) -> RouteDecision {
    if topic.starts_with(SIM_PREFIX) {
        if topic == SIM_CAN_TOPIC {
            let message = parse_or_default(Channel::Sim, payload);
            let envelope = translate(&message, now);
            match table.destination(message.frame.arbitration_id) {
                Some(destination) => RouteDecision::Forward {
                    topic: destination.to_string(),
                    envelope,
                },
                None => RouteDecision::Drop(DropReason::UnmappedArbitrationId),
            }
        } else {
            // Transparent relay into the parallel moto/ namespace.
            let rewritten = format!("{}{}", MOTO_PREFIX, &topic[SIM_PREFIX.len()..]);
            RouteDecision::Relay {
                topic: rewritten,
                payload: payload.to_vec(),
            }
        }
    } else if topic == REAL_CAN_TOPIC {
        let message = parse_or_default(Channel::Real, payload);
        let envelope = translate(&message, now);
        RouteDecision::Forward {
            topic: REAL_DESTINATION.to_string(),
            envelope,
        }
    } else {
        RouteDecision::Drop(DropReason::UnrecognizedTopic)
    }
}

/// Parse a CAN payload, degrading to the all-default message when the
/// payload is not parseable at all.
fn parse_or_default(channel: Channel, payload: &[u8]) -> AlgorithmMessage {
    match channel.parse(payload) {
        Ok(message) => {
            debug!(
                "decoded CAN payload: arbitration id {:#x}, data {:?}",
                message.frame.arbitration_id, message.frame.data
            );
            message
        }
        Err(err) => {
            warn!(error = %err, "payload not parseable, using defaults");
            AlgorithmMessage::default()
        }
    }
}

/// Run the decoder and composer for one message.
fn translate(message: &AlgorithmMessage, now: DateTime<Utc>) -> OutputEnvelope {
    let signal = decode(&message.algorithm_id, &message.frame);
    compose(&message.algorithm_id, &signal, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap()
    }

    fn sim_payload(arbitration_id: u32) -> Vec<u8> {
        serde_json::to_vec(&serde_json::json!({
            "algorithm_id": "PedestrianDetection",
            "can_message": { "arbitration_id": arbitration_id, "data": [1, 44, 1] }
        }))
        .unwrap()
    }

    #[test]
    fn real_channel_always_forwards_to_sensor_detector() {
        let payload = br#"{"AlgorithmID":"FrontalCollision","CAN_Message":{"ArbitrationId":2457,"Data":[1,0,0]}}"#;
        let decision = route("can/messages", payload, &RoutingTable::default(), now());
        match decision {
            RouteDecision::Forward { topic, envelope } => {
                assert_eq!(topic, "sensor/sensordetector");
                assert_eq!(envelope.algorithm_id, "FrontalCollision");
                assert!(envelope.status);
            }
            other => panic!("expected Forward, got {other:?}"),
        }
    }

    #[test]
    fn sim_can_topic_routes_by_arbitration_id() {
        let decision = route(
            "sim/canmessages",
            &sim_payload(0x101),
            &RoutingTable::default(),
            now(),
        );
        match decision {
            RouteDecision::Forward { topic, envelope } => {
                assert_eq!(topic, "simsensor/pedestrian");
                assert_eq!(envelope.algorithm_id, "PedestrianDetection");
            }
            other => panic!("expected Forward, got {other:?}"),
        }
    }

    #[test]
    fn unmapped_arbitration_id_is_dropped() {
        let decision = route(
            "sim/canmessages",
            &sim_payload(0x999),
            &RoutingTable::default(),
            now(),
        );
        assert_eq!(
            decision,
            RouteDecision::Drop(DropReason::UnmappedArbitrationId)
        );
    }

    #[test]
    fn other_sim_topics_relay_verbatim_to_moto() {
        let payload = b"{\"headlights\":\"on\"}";
        let decision = route("sim/lights", payload, &RoutingTable::default(), now());
        assert_eq!(
            decision,
            RouteDecision::Relay {
                topic: "moto/lights".to_string(),
                payload: payload.to_vec(),
            }
        );
    }

    #[test]
    fn relay_preserves_nested_topic_remainder() {
        let decision = route("sim/dash/speed", b"42", &RoutingTable::default(), now());
        match decision {
            RouteDecision::Relay { topic, payload } => {
                assert_eq!(topic, "moto/dash/speed");
                assert_eq!(payload, b"42");
            }
            other => panic!("expected Relay, got {other:?}"),
        }
    }

    #[test]
    fn unrecognized_topic_is_dropped() {
        let decision = route("other/topic", b"{}", &RoutingTable::default(), now());
        assert_eq!(decision, RouteDecision::Drop(DropReason::UnrecognizedTopic));
    }

    #[test]
    fn malformed_real_payload_still_forwards_with_defaults() {
        let decision = route("can/messages", b"not json", &RoutingTable::default(), now());
        match decision {
            RouteDecision::Forward { topic, envelope } => {
                assert_eq!(topic, "sensor/sensordetector");
                assert_eq!(envelope.algorithm_id, "Unknown");
                assert!(!envelope.status);
                let json = serde_json::to_value(&envelope).unwrap();
                assert_eq!(json["Data"], serde_json::json!({"DistanceToVehicle": 0.0}));
            }
            other => panic!("expected Forward, got {other:?}"),
        }
    }

    #[test]
    fn malformed_sim_payload_drops_on_default_arbitration_id() {
        // Defaulted arbitration id 0 has no table entry.
        let decision = route("sim/canmessages", b"garbage", &RoutingTable::default(), now());
        assert_eq!(
            decision,
            RouteDecision::Drop(DropReason::UnmappedArbitrationId)
        );
    }

    #[test]
    fn default_table_covers_the_four_simulator_ids() {
        let table = RoutingTable::default();
        assert_eq!(table.len(), 4);
        assert_eq!(table.destination(0x100), Some("simsensor/blindspot"));
        assert_eq!(table.destination(0x103), Some("simsensor/rearcollision"));
        assert_eq!(table.destination(0x104), None);
    }
}
