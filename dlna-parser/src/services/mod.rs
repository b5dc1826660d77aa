//! Service-specific parsers organized by UPnP service type
//!
//! ## Available Services
//!
//! - [`content_directory`]: `Browse` response envelopes of the ContentDirectory service
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dlna_parser::services::content_directory::parse_browse_response;
//! ```

pub mod content_directory;
