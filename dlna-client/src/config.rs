//! Client configuration

use std::time::Duration;

use dlna_discovery::DiscoveryConfig;
use soap_client::TransportConfig;

/// Settings for a [`MediaServerClient`](crate::MediaServerClient)
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    pub discovery: DiscoveryConfig,
    pub transport: TransportConfig,
}

impl ClientConfig {
    /// Default settings with a different discovery window
    pub fn with_discovery_timeout(timeout: Duration) -> Self {
        Self {
            discovery: DiscoveryConfig::with_timeout(timeout),
            ..Self::default()
        }
    }
}
