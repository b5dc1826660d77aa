use dlna_discovery::DiscoveryError;
use dlna_parser::ParseError;
use soap_client::SoapError;
use thiserror::Error;

/// Errors returned by [`MediaServerClient`](crate::MediaServerClient) operations
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request failed before or while talking to the server.
    ///
    /// `status` is the HTTP status of a non-200 response, or 0 when no
    /// response arrived at all.
    #[error("Transport error (status {status}): {detail}")]
    Transport { status: u16, detail: String },

    /// A 200 response whose body could not be understood
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    /// The server answered but did not return the requested object
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl ApiError {
    /// HTTP status of the exchange that failed, 0 when nothing was received
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Transport { status, .. } => *status,
            ApiError::Parse(ParseError::UnexpectedStatus(status)) => *status,
            ApiError::Parse(_) | ApiError::ObjectNotFound(_) => 200,
            ApiError::Discovery(_) | ApiError::InvalidUrl { .. } => 0,
        }
    }

    pub(crate) fn invalid_url(url: &str, reason: impl ToString) -> Self {
        ApiError::InvalidUrl {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<SoapError> for ApiError {
    fn from(error: SoapError) -> Self {
        match error {
            SoapError::Network(detail) => ApiError::Transport { status: 0, detail },
            SoapError::Status { status, detail } => ApiError::Transport { status, detail },
        }
    }
}

/// Type alias for results that can return an ApiError
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SoapError::Network("connection refused".into()), 0)]
    #[case(SoapError::Status { status: 500, detail: "fault".into() }, 500)]
    #[case(SoapError::Status { status: 404, detail: String::new() }, 404)]
    fn test_soap_errors_keep_status(#[case] error: SoapError, #[case] expected: u16) {
        let api: ApiError = error.into();
        assert_eq!(api.status(), expected);
        assert!(matches!(api, ApiError::Transport { .. }));
    }

    #[test]
    fn test_status_of_other_errors() {
        assert_eq!(ApiError::Parse(ParseError::UnexpectedStatus(503)).status(), 503);
        assert_eq!(
            ApiError::Parse(ParseError::MissingRequiredElement("root/device".into())).status(),
            200
        );
        assert_eq!(ApiError::ObjectNotFound("64$1".into()).status(), 200);
        assert_eq!(
            ApiError::Discovery(DiscoveryError::NetworkError("bind".into())).status(),
            0
        );
        assert_eq!(ApiError::invalid_url("nope", "relative URL without a base").status(), 0);
    }

    #[test]
    fn test_display() {
        let error = ApiError::Transport {
            status: 0,
            detail: "connection refused".into(),
        };
        assert_eq!(error.to_string(), "Transport error (status 0): connection refused");
        assert_eq!(
            ApiError::ObjectNotFound("7".into()).to_string(),
            "Object not found: 7"
        );
    }
}
