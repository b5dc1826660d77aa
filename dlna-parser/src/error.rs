//! Error types for XML parsing operations

use thiserror::Error;

/// Errors that can occur during XML parsing operations
#[derive(Error, Debug)]
pub enum ParseError {
    /// The XML reader rejected the input
    #[error("XML deserialization failed: {0}")]
    XmlDeserializationFailed(String),

    /// Invalid XML structure
    #[error("Invalid XML structure: {0}")]
    InvalidXmlStructure(String),

    /// Missing required element
    #[error("Missing required element: {0}")]
    MissingRequiredElement(String),

    /// The transport answered with something other than 200
    #[error("Unexpected HTTP status: {0}")]
    UnexpectedStatus(u16),
}

/// Result type alias for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;
