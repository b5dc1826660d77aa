//! Time-boxed discovery scans.
//!
//! A scan issues an M-SEARCH, optionally repeats it, and collects every
//! acceptable answer until its window closes. The collected devices are
//! handed back only once the window is over.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::device::DeviceDescriptor;
use crate::error::Result;
use crate::ssdp::{DiscoveryTransport, SsdpResponse, SsdpSession};

/// Search target for media servers browsable over ContentDirectory
pub const CONTENT_DIRECTORY_SERVICE: &str = "urn:schemas-upnp-org:service:ContentDirectory:1";

/// Discovery window used when none (or zero) is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(2500);

/// Discovery settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryConfig {
    /// ST header sent with every search
    pub service_type: String,
    /// Cadence of repeated searches; zero searches once
    pub repeat_interval: Duration,
    /// Length of the whole window; zero means [`DEFAULT_TIMEOUT`]
    pub timeout: Duration,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            service_type: CONTENT_DIRECTORY_SERVICE.to_string(),
            repeat_interval: Duration::ZERO,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl DiscoveryConfig {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }

    pub fn effective_timeout(&self) -> Duration {
        if self.timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            self.timeout
        }
    }
}

/// Runs one scan per call over a [`DiscoveryTransport`]
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    config: DiscoveryConfig,
}

impl Scanner {
    pub fn new(config: DiscoveryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Scan using `transport`, keyed by descriptor location.
    ///
    /// The transport is stopped exactly once before this returns, whether the
    /// scan succeeded or not.
    pub fn run<T: DiscoveryTransport>(
        &self,
        transport: &mut T,
    ) -> Result<BTreeMap<String, DeviceDescriptor>> {
        let result = self.collect(transport);
        transport.stop();
        result
    }

    fn collect<T: DiscoveryTransport>(
        &self,
        transport: &mut T,
    ) -> Result<BTreeMap<String, DeviceDescriptor>> {
        let service_type = self.config.service_type.as_str();
        let repeat = self.config.repeat_interval;
        let started = Instant::now();
        let deadline = started + self.config.effective_timeout();
        let mut next_search = (!repeat.is_zero()).then(|| started + repeat);
        let mut devices = BTreeMap::new();

        transport.search(service_type)?;

        loop {
            let now = Instant::now();
            if now >= deadline {
                break;
            }

            if let Some(at) = next_search {
                if now >= at {
                    transport.search(service_type)?;
                    next_search = Some(at + repeat);
                    continue;
                }
            }

            let until = next_search.map_or(deadline, |at| at.min(deadline));
            if let Some(response) = transport.receive(until - now)? {
                accept(&mut devices, &response);
            }
        }

        tracing::debug!(
            devices = devices.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "discovery window closed"
        );
        Ok(devices)
    }
}

fn accept(devices: &mut BTreeMap<String, DeviceDescriptor>, response: &SsdpResponse) {
    if response.status != 200 || !response.is_dlna_compliant() {
        tracing::trace!(
            source = %response.source,
            status = response.status,
            server = response.server.as_deref().unwrap_or(""),
            "ignoring non-DLNA search response"
        );
        return;
    }

    match DeviceDescriptor::from_response(response) {
        Ok(descriptor) => {
            tracing::debug!(location = %descriptor.desc_url, source = %response.source, "found media server");
            devices.insert(descriptor.desc_url.clone(), descriptor);
        }
        Err(e) => tracing::trace!(error = %e, "ignoring search response"),
    }
}

/// Scan the local network with a fresh SSDP session
pub fn discover(config: &DiscoveryConfig) -> Result<BTreeMap<String, DeviceDescriptor>> {
    let mut session = SsdpSession::open()?;
    Scanner::new(config.clone()).run(&mut session)
}
