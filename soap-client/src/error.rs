//! Error types for the SOAP client

use thiserror::Error;

/// Errors that can occur during SOAP communication
#[derive(Debug, Error)]
pub enum SoapError {
    /// Network or HTTP communication error (no status line was received)
    #[error("Network/HTTP error: {0}")]
    Network(String),

    /// The device answered with a non-200 status
    #[error("HTTP status {status}: {detail}")]
    Status {
        status: u16,
        detail: String,
    },
}

impl SoapError {
    /// HTTP status associated with this error, `0` when the request never
    /// produced a response.
    pub fn status(&self) -> u16 {
        match self {
            SoapError::Network(_) => 0,
            SoapError::Status { status, .. } => *status,
        }
    }
}
