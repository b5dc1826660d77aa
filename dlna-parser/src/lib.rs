//! # dlna-parser
//!
//! XML parsing for UPnP/DLNA media servers: device descriptions,
//! ContentDirectory `Browse` envelopes and the DIDL-Lite listings nested
//! inside them.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dlna_parser::{parse_browse_response, BrowseResult};
//!
//! let envelope = parse_browse_response(200, &body)?;
//! if let Some(listing) = &envelope.listing {
//!     let result = BrowseResult::from_listing(listing);
//!     for item in &result.items {
//!         println!("{:?} {:?}", item.id, item.title);
//!     }
//! }
//! ```

pub mod common;
pub mod description;
pub mod error;
pub mod services;

// Re-export error types for convenient top-level access
pub use error::{ParseError, ParseResult};

// Re-export common utilities for convenient top-level access
pub use common::{
    find_path, find_sequence, find_text, flatten_item, flatten_listing, index_by_id,
    parse_document, BrowseResult, ContentItem, ItemField, Node, XmlElement, XmlValue,
};
pub use description::{summarize, summarize_xml, MediaServerInfo, ServiceRecord};
pub use services::content_directory::{
    parse_browse_response, resolve_result, BrowseEnvelope, DidlListing, CONTENT_DIRECTORY_SCHEMA,
};
