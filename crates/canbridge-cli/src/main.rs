//! Command-line interface for the canbridge CAN translation agent.

use std::sync::Arc;

use anyhow::Result;
use canbridge_core::RoutingTable;
use canbridge_mqtt::{Bridge, MqttConfig};
use clap::Parser;

/// CAN-frame MQTT translation and routing agent.
///
/// Subscribes to `sim/#` and `can/messages`, translates CAN payloads
/// into canonical JSON envelopes, and republishes them on their
/// destination topics.
#[derive(Parser, Debug)]
#[command(name = "canbridge")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// MQTT broker host.
    #[arg(long, default_value = "localhost")]
    broker: String,

    /// MQTT broker port.
    #[arg(short, long, default_value_t = 1883)]
    port: u16,

    /// MQTT client identifier.
    #[arg(long)]
    client_id: Option<String>,

    /// MQTT username.
    #[arg(long)]
    username: Option<String>,

    /// MQTT password.
    #[arg(long)]
    password: Option<String>,

    /// Verbose output.
    #[arg(short, long)]
    verbose: bool,
}

/// Default log directives covering the whole workspace.
///
/// EnvFilter matches whole path segments, so the bin target and each
/// library crate need their own directive for `--verbose` to reach the
/// pipeline's debug logs.
fn default_directives(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    ["canbridge", "canbridge_core", "canbridge_mqtt"]
        .map(|target| format!("{target}={level}"))
        .join(",")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Check if JSON logging is requested (for production/container environments)
    let json_logging = std::env::var("CANBRIDGE_LOG_JSON")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new(default_directives(args.verbose))
                .add_directive(tracing::Level::INFO.into())
        });

    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .compact()
            .init();
    }

    let mut config = MqttConfig::new(args.broker).with_port(args.port);
    if let Some(client_id) = args.client_id {
        config = config.with_client_id(client_id);
    }
    if let (Some(user), Some(pass)) = (args.username, args.password) {
        config = config.with_auth(user, pass);
    }

    let table = Arc::new(RoutingTable::default());
    tracing::info!(routes = table.len(), "routing table loaded");

    Bridge::new(config, table).run().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_directives_cover_every_workspace_crate() {
        let directives = default_directives(true);
        for target in ["canbridge=debug", "canbridge_core=debug", "canbridge_mqtt=debug"] {
            assert!(directives.contains(target), "missing {target}");
        }
    }

    #[test]
    fn quiet_directives_stay_at_info() {
        let directives = default_directives(false);
        assert!(directives.contains("canbridge_core=info"));
        assert!(!directives.contains("debug"));
    }
}
