//! DLNA media server discovery library
//!
//! This crate finds ContentDirectory servers on a local network using SSDP
//! (Simple Service Discovery Protocol). Only responders advertising the
//! `DLNADOC/1.50` token are kept.
//!
//! # Quick Start
//!
//! ```no_run
//! use dlna_discovery::{discover, DiscoveryConfig};
//!
//! let devices = discover(&DiscoveryConfig::default())?;
//! for (location, device) in &devices {
//!     println!("Found {} via {}", location, device.root_url);
//! }
//! # Ok::<(), dlna_discovery::DiscoveryError>(())
//! ```
//!
//! # Custom transports
//!
//! [`Scanner::run`] accepts any [`DiscoveryTransport`], which is how tests
//! replay canned search responses without touching the network.

mod error;
mod ssdp;
pub mod device;
pub mod scanner;

pub use device::DeviceDescriptor;
pub use error::{DiscoveryError, Result};
pub use scanner::{discover, DiscoveryConfig, Scanner, CONTENT_DIRECTORY_SERVICE, DEFAULT_TIMEOUT};
pub use ssdp::{
    DiscoveryTransport, SsdpResponse, SsdpSession, DLNA_COMPLIANCE_TOKEN, SSDP_MULTICAST_ADDR,
};
