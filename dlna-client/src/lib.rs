//! # DLNA SDK - browse home-network media servers
//!
//! Finds UPnP/DLNA ContentDirectory servers on the local network, asks them
//! for listings with the SOAP `Browse` action and flattens the DIDL-Lite
//! answers into plain records:
//!
//! ```rust,no_run
//! use dlna_client::MediaServerClient;
//!
//! fn main() -> Result<(), dlna_client::ApiError> {
//!     dlna_client::logging::init_logging_from_env().ok();
//!
//!     let client = MediaServerClient::new();
//!     let servers = client.fetch_device_info(None)?;
//!
//!     for (name, server) in &servers {
//!         let Some(control_url) = &server.content_directory_url else { continue };
//!         let listing = client.browse_content(control_url, "0", 0, 0)?;
//!         for item in &listing.items {
//!             println!("{name}: {:?}", item.title);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! dlna-client (MediaServerClient)
//!     ↓                ↓                 ↓
//! dlna-discovery   soap-client       dlna-parser
//! (SSDP)           (Browse over HTTP) (envelopes, DIDL-Lite, descriptions)
//! ```

pub use client::{DeviceInfo, DiscoverFn, MediaServerClient, RawResponse};
pub use config::ClientConfig;
pub use error::{ApiError, Result};

// Re-export the types callers need to drive the client
pub use dlna_discovery::{DeviceDescriptor, DiscoveryConfig};
pub use dlna_parser::{BrowseResult, ContentItem, DidlListing, MediaServerInfo, ServiceRecord};
pub use soap_client::{BrowseFlag, HttpMethod, TransportConfig};

mod client;
mod config;
mod error;
pub mod logging;
