//! Media server discovery that outputs JSON for scripting
//!
//! Usage: cargo run -p dlna-discovery --example discover_json [seconds]

use dlna_discovery::{search_with_config, DiscoveryConfig};
use serde::Serialize;
use std::time::Duration;

#[derive(Serialize)]
struct ServerInfo {
    usn: String,
    location: Option<String>,
    name: Option<String>,
    control_url: Option<String>,
    service_type: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let window = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(5);

    let config = DiscoveryConfig::default().with_listen_window(Duration::from_secs(window));
    let servers: Vec<ServerInfo> = search_with_config(config)?
        .into_iter()
        .map(|server| {
            let detail = server.detail().cloned();
            ServerInfo {
                usn: server.usn().to_string(),
                location: server.location().map(str::to_string),
                name: detail.as_ref().and_then(|d| d.friendly_name.clone()),
                control_url: detail.as_ref().map(|d| d.control_url.clone()),
                service_type: detail.map(|d| d.service_type),
            }
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&servers)?);
    Ok(())
}
