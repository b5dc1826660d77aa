//! Private SOAP client for UPnP ContentDirectory communication
//!
//! This crate builds `Browse` envelopes and moves them over HTTP. It knows
//! nothing about the shape of the responses; parsing lives in `dlna-parser`.

mod envelope;
mod error;
mod transport;

pub use envelope::{
    build_browse_envelope, service_urn, BrowseFlag, BrowseRequest, CONTENT_DIRECTORY_BROWSE,
};
pub use error::SoapError;
pub use transport::{HttpMethod, HttpResponse, HttpTransport, TransportConfig, UreqTransport};

use std::sync::Arc;

/// A minimal SOAP client for UPnP device communication
#[derive(Clone)]
pub struct SoapClient {
    transport: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for SoapClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoapClient").finish_non_exhaustive()
    }
}

impl SoapClient {
    /// Create a new SOAP client with default configuration
    pub fn new() -> Self {
        Self::with_transport(Arc::new(UreqTransport::new()))
    }

    pub fn with_config(config: &TransportConfig) -> Self {
        Self::with_transport(Arc::new(UreqTransport::with_config(config)))
    }

    /// Use a caller-supplied transport
    pub fn with_transport(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// Send a `Browse` request and return the raw response body.
    ///
    /// Only a 200 response is a success; any other status is reported as
    /// [`SoapError::Status`] with the response body as detail.
    pub fn browse(
        &self,
        method: HttpMethod,
        url: &str,
        request: &BrowseRequest,
    ) -> Result<HttpResponse, SoapError> {
        let body = build_browse_envelope(request);
        let soap_action = format!("\"{}\"", request.action);

        tracing::debug!(
            %method,
            url,
            object_id = %request.object_id,
            browse_flag = %request.browse_flag,
            "sending Browse request"
        );

        let response = self.transport.request(
            method,
            url,
            &[
                ("Content-Type", "text/xml; charset=\"utf-8\""),
                ("SOAPAction", &soap_action),
            ],
            Some(&body),
        )?;

        check_status(response)
    }

    /// Plain GET, used for device descriptors
    pub fn get(&self, url: &str) -> Result<HttpResponse, SoapError> {
        tracing::debug!(url, "fetching document");
        let response = self.transport.request(HttpMethod::Get, url, &[], None)?;
        check_status(response)
    }
}

impl Default for SoapClient {
    fn default() -> Self {
        Self::new()
    }
}

fn check_status(response: HttpResponse) -> Result<HttpResponse, SoapError> {
    if response.status == 200 {
        Ok(response)
    } else {
        Err(SoapError::Status {
            status: response.status,
            detail: response.body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingTransport {
        calls: Mutex<Vec<(HttpMethod, String, Vec<(String, String)>, Option<String>)>>,
        status: u16,
    }

    impl HttpTransport for RecordingTransport {
        fn request(
            &self,
            method: HttpMethod,
            url: &str,
            headers: &[(&str, &str)],
            body: Option<&str>,
        ) -> Result<HttpResponse, SoapError> {
            self.calls.lock().unwrap().push((
                method,
                url.to_string(),
                headers
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                body.map(str::to_string),
            ));
            Ok(HttpResponse {
                status: self.status,
                body: "<ok/>".to_string(),
            })
        }
    }

    #[test]
    fn test_soap_client_creation() {
        let _client = SoapClient::new();
        let _default_client = SoapClient::default();
    }

    #[test]
    fn test_browse_sets_soap_headers() {
        let transport = Arc::new(RecordingTransport {
            status: 200,
            ..Default::default()
        });
        let client = SoapClient::with_transport(transport.clone());

        let response = client
            .browse(
                HttpMethod::Post,
                "http://10.0.0.2:8200/ctl/ContentDir",
                &BrowseRequest::children("64"),
            )
            .unwrap();
        assert_eq!(response.body, "<ok/>");

        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (method, url, headers, body) = &calls[0];
        assert_eq!(*method, HttpMethod::Post);
        assert_eq!(url, "http://10.0.0.2:8200/ctl/ContentDir");
        assert!(headers.contains(&(
            "SOAPAction".to_string(),
            format!("\"{}\"", CONTENT_DIRECTORY_BROWSE)
        )));
        assert!(body.as_deref().unwrap().contains("<ObjectID>64</ObjectID>"));
    }

    #[test]
    fn test_non_200_becomes_status_error() {
        let transport = Arc::new(RecordingTransport {
            status: 500,
            ..Default::default()
        });
        let client = SoapClient::with_transport(transport);

        let err = client.get("http://10.0.0.2:8200/rootDesc.xml").unwrap_err();
        assert_eq!(err.status(), 500);
        match err {
            SoapError::Status { detail, .. } => assert_eq!(detail, "<ok/>"),
            other => panic!("Expected SoapError::Status, got {:?}", other),
        }
    }
}
