//! Common utilities and data structures shared across UPnP documents
//!
//! ## Available Utilities
//!
//! - [`tree`]: normalized XML tree where every element is a sequence
//! - [`path`]: slash-separated lookups over that tree
//! - [`didl`]: DIDL-Lite records flattened into [`ContentItem`]s
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dlna_parser::common::{parse_document, find_text, flatten_item};
//! ```

pub mod didl;
pub mod path;
pub mod tree;

// Re-export commonly used types for convenient access
pub use didl::{flatten_item, flatten_listing, index_by_id, BrowseResult, ContentItem, ItemField};
pub use path::{find_path, find_sequence, find_text, Node};
pub use tree::{parse_document, XmlElement, XmlValue};
