//! Per-message dispatch: classify, translate, publish.

use std::sync::Arc;

use canbridge_core::{route, RouteDecision, RoutingTable};
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::sink::{MessageSink, Qos};

/// Drives the pure pipeline for one inbound message at a time and
/// realizes each [`RouteDecision`] against the publish collaborator.
///
/// Holds no per-message state; the routing table is the only shared
/// resource and is read-only after construction. A failure handling one
/// message is logged and never propagates to the next.
pub struct Dispatcher {
    table: Arc<RoutingTable>,
}

impl Dispatcher {
    /// Create a dispatcher over a routing table.
    pub fn new(table: Arc<RoutingTable>) -> Self {
        Self { table }
    }

    /// Handle one inbound message.
    ///
    /// Every outbound publish is at-least-once with the retain flag
    /// set, so late subscribers immediately see the last value per
    /// topic. Never returns an error: every outcome, including publish
    /// failures, ends in a log entry.
    pub async fn handle(&self, sink: &dyn MessageSink, topic: &str, payload: &[u8]) {
        debug!(
            topic,
            payload = %String::from_utf8_lossy(payload),
            "message arrived"
        );

        match route(topic, payload, &self.table, Utc::now()) {
            RouteDecision::Forward {
                topic: destination,
                envelope,
            } => {
                let body = match serde_json::to_vec(&envelope) {
                    Ok(body) => body,
                    Err(e) => {
                        warn!(topic, error = %e, "envelope serialization failed");
                        return;
                    }
                };
                match sink
                    .publish(&destination, body, Qos::AtLeastOnce, true)
                    .await
                {
                    Ok(()) => info!(from = topic, to = %destination, "forwarded envelope"),
                    Err(e) => warn!(from = topic, to = %destination, error = %e, "forward failed"),
                }
            }
            RouteDecision::Relay {
                topic: destination,
                payload,
            } => {
                match sink
                    .publish(&destination, payload, Qos::AtLeastOnce, true)
                    .await
                {
                    Ok(()) => info!(from = topic, to = %destination, "relayed payload"),
                    Err(e) => warn!(from = topic, to = %destination, error = %e, "relay failed"),
                }
            }
            RouteDecision::Drop(reason) => {
                info!(topic, %reason, "message dropped");
            }
        }
    }
}
