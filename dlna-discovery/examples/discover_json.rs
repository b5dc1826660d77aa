//! Media server discovery that outputs JSON for scripting
//!
//! Usage: cargo run -p dlna-sdk-discovery --example discover_json [timeout_ms]

use std::time::Duration;

use dlna_discovery::{discover, DiscoveryConfig};

fn main() {
    let timeout = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2500);

    let devices = match discover(&DiscoveryConfig::with_timeout(Duration::from_millis(timeout))) {
        Ok(devices) => devices,
        Err(e) => {
            eprintln!("discovery failed: {}", e);
            std::process::exit(1);
        }
    };

    println!("{}", serde_json::to_string_pretty(&devices).unwrap());
}
