//! HTTP transport used to reach device descriptors and control URLs.
//!
//! The [`HttpTransport`] trait is the only seam the rest of the workspace
//! talks to, which lets tests substitute a scripted transport.

use std::fmt;
use std::time::Duration;

use crate::error::SoapError;

/// HTTP verb for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HttpMethod {
    type Err = SoapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("get") {
            Ok(HttpMethod::Get)
        } else if s.eq_ignore_ascii_case("post") {
            Ok(HttpMethod::Post)
        } else {
            Err(SoapError::Network(format!("unsupported HTTP method: {}", s)))
        }
    }
}

/// Raw response as delivered by the transport, whatever the status.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Issue a single HTTP request.
///
/// Implementations return `Ok` for every response that carried a status
/// line, including non-2xx ones, and `Err(SoapError::Network)` only when
/// no response was received at all.
pub trait HttpTransport: Send + Sync {
    fn request(
        &self,
        method: HttpMethod,
        url: &str,
        headers: &[(&str, &str)],
        body: Option<&str>,
    ) -> Result<HttpResponse, SoapError>;
}

/// Timeouts applied to the default transport.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Default: 5 seconds
    pub connect_timeout: Duration,
    /// Default: 10 seconds
    pub read_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(10),
        }
    }
}

/// [`HttpTransport`] backed by a blocking `ureq` agent.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::with_config(&TransportConfig::default())
    }

    pub fn with_config(config: &TransportConfig) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout_connect(config.connect_timeout)
                .timeout_read(config.read_timeout)
                .build(),
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport for UreqTransport {
    fn request(
        &self,
        method: HttpMethod,
        url: &str,
        headers: &[(&str, &str)],
        body: Option<&str>,
    ) -> Result<HttpResponse, SoapError> {
        let mut request = self.agent.request(method.as_str(), url);
        for (name, value) in headers {
            request = request.set(name, value);
        }

        let outcome = match body {
            Some(body) => request.send_string(body),
            None => request.call(),
        };

        let response = match outcome {
            Ok(response) => response,
            // ureq reports 4xx/5xx as errors; they still carry a response
            Err(ureq::Error::Status(_, response)) => response,
            Err(e) => return Err(SoapError::Network(e.to_string())),
        };

        let status = response.status();
        let body = response
            .into_string()
            .map_err(|e| SoapError::Network(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_from_str_is_case_insensitive() {
        assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("POST".parse::<HttpMethod>().unwrap(), HttpMethod::Post);
        assert!("PUT".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn test_non_200_is_returned_as_response() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .with_body("not here")
            .create();

        let transport = UreqTransport::new();
        let url = format!("{}/missing", server.url());
        let response = transport
            .request(HttpMethod::Get, &url, &[], None)
            .unwrap();

        mock.assert();
        assert_eq!(response.status, 404);
        assert_eq!(response.body, "not here");
    }

    #[test]
    fn test_unreachable_host_is_network_error() {
        let transport = UreqTransport::new();
        let result = transport.request(HttpMethod::Get, "http://127.0.0.1:1/", &[], None);

        match result {
            Err(SoapError::Network(_)) => {}
            other => panic!("Expected SoapError::Network, got {:?}", other),
        }
    }
}
