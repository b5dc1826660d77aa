//! Devices located by a search.

use std::net::{IpAddr, SocketAddr};

use serde::Serialize;

use crate::error::{DiscoveryError, Result};
use crate::ssdp::SsdpResponse;

/// Where a responding device publishes its description
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceDescriptor {
    /// LOCATION of the device description document
    pub desc_url: String,
    /// `http://<addr>:<port>` of the responder
    pub root_url: String,
    pub addr: IpAddr,
    pub port: u16,
}

impl DeviceDescriptor {
    pub fn new(desc_url: impl Into<String>, source: SocketAddr) -> Self {
        Self {
            desc_url: desc_url.into(),
            root_url: format!("http://{}", source),
            addr: source.ip(),
            port: source.port(),
        }
    }

    /// Build a descriptor from a search response.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::InvalidDevice`] when the response has no
    /// LOCATION header.
    pub fn from_response(response: &SsdpResponse) -> Result<Self> {
        let location = response.location.as_deref().ok_or_else(|| {
            DiscoveryError::InvalidDevice(format!("no LOCATION in response from {}", response.source))
        })?;
        Ok(Self::new(location, response.source))
    }
}
