//! End-to-end dispatch tests against a recording sink.
//!
//! Exercises the full parse -> decode -> compose -> route -> publish
//! path without a broker.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use canbridge_core::RoutingTable;
use canbridge_mqtt::{Dispatcher, MessageSink, Qos, SinkError};
use serde_json::json;

#[derive(Debug, Clone, PartialEq)]
struct Published {
    topic: String,
    payload: Vec<u8>,
    qos: Qos,
    retain: bool,
}

#[derive(Default)]
struct RecordingSink {
    published: Mutex<Vec<Published>>,
}

impl RecordingSink {
    fn published(&self) -> Vec<Published> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageSink for RecordingSink {
    async fn publish(
        &self,
        topic: &str,
        payload: Vec<u8>,
        qos: Qos,
        retain: bool,
    ) -> Result<(), SinkError> {
        self.published.lock().unwrap().push(Published {
            topic: topic.to_string(),
            payload,
            qos,
            retain,
        });
        Ok(())
    }
}

fn dispatcher() -> Dispatcher {
    Dispatcher::new(Arc::new(RoutingTable::default()))
}

#[tokio::test]
async fn sim_can_messages_route_through_the_table() {
    let sink = RecordingSink::default();
    let d = dispatcher();

    let payload = serde_json::to_vec(&json!({
        "algorithm_id": "BlindSpotDetection",
        "can_message": { "arbitration_id": 0x100, "data": [1, 144, 1, 1] }
    }))
    .unwrap();
    d.handle(&sink, "sim/canmessages", &payload).await;

    let published = sink.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].topic, "simsensor/blindspot");
    assert_eq!(published[0].qos, Qos::AtLeastOnce);
    assert!(published[0].retain);

    let body: serde_json::Value = serde_json::from_slice(&published[0].payload).unwrap();
    assert_eq!(body["AlgorithmID"], "BlindSpotDetection");
    assert_eq!(body["Status"], true);
    // raw = 144 + 1 * 256 = 400 -> 4.00 m, right side
    assert_eq!(body["Data"]["DistanceToVehicle"], 4.0);
    assert_eq!(body["Data"]["Side"], "Right");
    // Timestamp is RFC 3339 UTC.
    let ts = body["Timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok());
    assert!(ts.ends_with('Z'));
}

#[tokio::test]
async fn unmapped_sim_arbitration_id_publishes_nothing() {
    let sink = RecordingSink::default();

    let payload = serde_json::to_vec(&json!({
        "algorithm_id": "PedestrianDetection",
        "can_message": { "arbitration_id": 0x999, "data": [1, 0, 0] }
    }))
    .unwrap();
    dispatcher().handle(&sink, "sim/canmessages", &payload).await;

    assert!(sink.published().is_empty());
}

#[tokio::test]
async fn mixed_traffic_is_processed_in_arrival_order() {
    let sink = RecordingSink::default();
    let d = dispatcher();

    d.handle(&sink, "sim/engine/rpm", b"3200").await;
    d.handle(
        &sink,
        "can/messages",
        br#"{"AlgorithmID":"RearCollision","CAN_Message":{"ArbitrationId":259,"Data":[0,10,0]}}"#,
    )
    .await;
    d.handle(&sink, "unknown/topic", b"{}").await;
    d.handle(&sink, "sim/doors", b"locked").await;

    let published = sink.published();
    assert_eq!(published.len(), 3);
    assert_eq!(published[0].topic, "moto/engine/rpm");
    assert_eq!(published[0].payload, b"3200");
    assert_eq!(published[1].topic, "sensor/sensordetector");
    assert_eq!(published[2].topic, "moto/doors");
    assert_eq!(published[2].payload, b"locked");
}

#[tokio::test]
async fn real_channel_ignores_the_routing_table() {
    // An arbitration id with a simulator table entry still goes to the
    // fixed real-channel destination.
    let sink = RecordingSink::default();

    let payload = serde_json::to_vec(&json!({
        "AlgorithmID": "PedestrianDetection",
        "CAN_Message": { "ArbitrationId": 0x101, "Data": [1, 44, 1] }
    }))
    .unwrap();
    dispatcher().handle(&sink, "can/messages", &payload).await;

    let published = sink.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].topic, "sensor/sensordetector");
}

#[tokio::test]
async fn every_outbound_publish_is_retained_at_least_once() {
    let sink = RecordingSink::default();
    let d = dispatcher();

    d.handle(&sink, "sim/lights", b"on").await;
    d.handle(
        &sink,
        "can/messages",
        br#"{"AlgorithmID":"X","CAN_Message":{"ArbitrationId":7,"Data":[1]}}"#,
    )
    .await;

    let published = sink.published();
    assert_eq!(published.len(), 2);
    for p in &published {
        assert_eq!(p.qos, Qos::AtLeastOnce);
        assert!(p.retain);
    }
}
