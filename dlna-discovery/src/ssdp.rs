//! SSDP (Simple Service Discovery Protocol) search sessions
//!
//! This module sends M-SEARCH requests to the UPnP multicast group and
//! decodes the unicast HTTP-over-UDP answers. [`DiscoveryTransport`] is the
//! seam the scanner drives; [`SsdpSession`] is the socket-backed
//! implementation.

use std::net::{SocketAddr, UdpSocket};
use std::time::{Duration, Instant};

use crate::error::{DiscoveryError, Result};

/// UPnP multicast group and port
pub const SSDP_MULTICAST_ADDR: &str = "239.255.255.250:1900";

/// SERVER token advertised by DLNA-compliant devices
pub const DLNA_COMPLIANCE_TOKEN: &str = "DLNADOC/1.50";

/// One SSDP search response
#[derive(Debug, Clone, PartialEq)]
pub struct SsdpResponse {
    /// Status code of the HTTP status line
    pub status: u16,
    pub location: Option<String>,
    pub search_target: Option<String>,
    pub usn: Option<String>,
    pub server: Option<String>,
    /// Address the datagram came from
    pub source: SocketAddr,
}

impl SsdpResponse {
    /// `true` when the SERVER header lists the DLNA compliance token
    pub fn is_dlna_compliant(&self) -> bool {
        self.server
            .as_deref()
            .is_some_and(|server| server.split_whitespace().any(|t| t == DLNA_COMPLIANCE_TOKEN))
    }
}

/// Multicast search capability consumed by the scanner.
///
/// `receive` blocks for at most `wait` and yields `Ok(None)` when nothing
/// usable arrived in that time. `stop` must be safe to call repeatedly.
pub trait DiscoveryTransport {
    fn search(&mut self, search_target: &str) -> Result<()>;
    fn receive(&mut self, wait: Duration) -> Result<Option<SsdpResponse>>;
    fn stop(&mut self);
}

/// UDP socket bound for one discovery window
#[derive(Debug)]
pub struct SsdpSession {
    socket: Option<UdpSocket>,
    buffer: [u8; 2048],
}

impl SsdpSession {
    /// Bind an ephemeral UDP socket for searching
    pub fn open() -> Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")
            .map_err(|e| DiscoveryError::NetworkError(format!("Failed to bind UDP socket: {}", e)))?;

        socket.set_multicast_loop_v4(true).map_err(|e| {
            DiscoveryError::NetworkError(format!("Failed to set multicast loop: {}", e))
        })?;

        Ok(Self {
            socket: Some(socket),
            buffer: [0; 2048],
        })
    }

    pub fn is_stopped(&self) -> bool {
        self.socket.is_none()
    }
}

impl DiscoveryTransport for SsdpSession {
    fn search(&mut self, search_target: &str) -> Result<()> {
        let socket = self
            .socket
            .as_ref()
            .ok_or_else(|| DiscoveryError::NetworkError("SSDP session already stopped".to_string()))?;

        let request = format!(
            "M-SEARCH * HTTP/1.1\r\n\
             HOST: {}\r\n\
             MAN: \"ssdp:discover\"\r\n\
             MX: 2\r\n\
             ST: {}\r\n\
             USER-AGENT: dlna-sdk/0.1 UPnP/1.0\r\n\
             \r\n",
            SSDP_MULTICAST_ADDR, search_target
        );

        socket
            .send_to(request.as_bytes(), SSDP_MULTICAST_ADDR)
            .map_err(|e| DiscoveryError::NetworkError(format!("Failed to send M-SEARCH: {}", e)))?;

        tracing::debug!(search_target, "sent M-SEARCH");
        Ok(())
    }

    fn receive(&mut self, wait: Duration) -> Result<Option<SsdpResponse>> {
        let deadline = Instant::now() + wait;

        loop {
            let Some(socket) = self.socket.as_ref() else {
                return Ok(None);
            };

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(None);
            }
            // a zero read timeout would mean "block forever"
            socket
                .set_read_timeout(Some(remaining.max(Duration::from_millis(1))))
                .map_err(|e| {
                    DiscoveryError::NetworkError(format!("Failed to set read timeout: {}", e))
                })?;

            match socket.recv_from(&mut self.buffer) {
                Ok((size, source)) => {
                    let parsed = std::str::from_utf8(&self.buffer[..size])
                        .ok()
                        .and_then(|text| parse_ssdp_response(text, source));
                    match parsed {
                        Some(response) => return Ok(Some(response)),
                        None => tracing::trace!(%source, "dropping malformed SSDP datagram"),
                    }
                }
                Err(e)
                    if e.kind() == std::io::ErrorKind::WouldBlock
                        || e.kind() == std::io::ErrorKind::TimedOut =>
                {
                    return Ok(None);
                }
                Err(e) => {
                    return Err(DiscoveryError::NetworkError(format!("Socket error: {}", e)));
                }
            }
        }
    }

    fn stop(&mut self) {
        if let Some(socket) = self.socket.take() {
            tracing::debug!("stopping SSDP session");
            drop(socket);
        }
    }
}

impl Drop for SsdpSession {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Parse an SSDP response from HTTP text
pub(crate) fn parse_ssdp_response(response: &str, source: SocketAddr) -> Option<SsdpResponse> {
    let mut lines = response.lines();
    let status = parse_status_line(lines.next()?)?;

    let mut location = None;
    let mut search_target = None;
    let mut usn = None;
    let mut server = None;

    for line in lines {
        let line = line.trim();

        if let Some(value) = extract_header_value(line, "LOCATION:") {
            location = Some(value);
        } else if let Some(value) = extract_header_value(line, "ST:") {
            search_target = Some(value);
        } else if let Some(value) = extract_header_value(line, "USN:") {
            usn = Some(value);
        } else if let Some(value) = extract_header_value(line, "SERVER:") {
            server = Some(value);
        }
    }

    Some(SsdpResponse {
        status,
        location,
        search_target,
        usn,
        server,
        source,
    })
}

/// `HTTP/1.1 200 OK` => `200`
fn parse_status_line(line: &str) -> Option<u16> {
    let mut parts = line.split_whitespace();
    if !parts.next()?.starts_with("HTTP/") {
        return None;
    }
    parts.next()?.parse().ok()
}

/// Extract header value from a line like "HEADER: value"
fn extract_header_value(line: &str, header: &str) -> Option<String> {
    if line.len() > header.len()
        && line.is_char_boundary(header.len())
        && line[..header.len()].eq_ignore_ascii_case(header)
    {
        Some(line[header.len()..].trim().to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> SocketAddr {
        "192.168.4.47:1900".parse().unwrap()
    }

    #[test]
    fn test_parse_ssdp_response_valid() {
        let response = "HTTP/1.1 200 OK\r\n\
            CACHE-CONTROL: max-age=1810\r\n\
            ST: urn:schemas-upnp-org:service:ContentDirectory:1\r\n\
            USN: uuid:4d696e69-444c-164e-9d41-b0b98a457ba0::urn:schemas-upnp-org:service:ContentDirectory:1\r\n\
            EXT:\r\n\
            SERVER: 4.4.190.x86_64.1 DLNADOC/1.50 UPnP/1.0 ReadyDLNA/1.2.1\r\n\
            LOCATION: http://192.168.4.47:8200/rootDesc.xml\r\n\
            CONTENT-LENGTH: 0\r\n\
            \r\n";

        let parsed = parse_ssdp_response(response, source()).unwrap();

        assert_eq!(parsed.status, 200);
        assert_eq!(parsed.location.as_deref(), Some("http://192.168.4.47:8200/rootDesc.xml"));
        assert_eq!(
            parsed.search_target.as_deref(),
            Some("urn:schemas-upnp-org:service:ContentDirectory:1")
        );
        assert_eq!(
            parsed.usn.as_deref(),
            Some("uuid:4d696e69-444c-164e-9d41-b0b98a457ba0::urn:schemas-upnp-org:service:ContentDirectory:1")
        );
        assert_eq!(parsed.source, source());
        assert!(parsed.is_dlna_compliant());
    }

    #[test]
    fn test_parse_ssdp_response_case_insensitive() {
        let response = "HTTP/1.1 200 OK\r\n\
            location: http://192.168.1.102:8200/rootDesc.xml\r\n\
            server: Linux DLNADOC/1.50 UPnP/1.0\r\n\
            \r\n";

        let parsed = parse_ssdp_response(response, source()).unwrap();

        assert_eq!(parsed.location.as_deref(), Some("http://192.168.1.102:8200/rootDesc.xml"));
        assert!(parsed.is_dlna_compliant());
    }

    #[test]
    fn test_parse_ssdp_response_status() {
        let response = "HTTP/1.1 404 Not Found\r\nLOCATION: http://h/d.xml\r\n\r\n";
        assert_eq!(parse_ssdp_response(response, source()).unwrap().status, 404);
    }

    #[test]
    fn test_parse_ssdp_response_empty() {
        assert!(parse_ssdp_response("", source()).is_none());
    }

    #[test]
    fn test_parse_ssdp_response_malformed() {
        let response = "This is not a valid SSDP response\r\n\
            Some random text\r\n";
        assert!(parse_ssdp_response(response, source()).is_none());
        assert!(parse_ssdp_response("HTTP/1.1 OK\r\n", source()).is_none());
    }

    #[test]
    fn test_notify_is_not_a_response() {
        let notify = "NOTIFY * HTTP/1.1\r\nHOST: 239.255.255.250:1900\r\nNTS: ssdp:alive\r\n\r\n";
        assert!(parse_ssdp_response(notify, source()).is_none());
    }

    #[test]
    fn test_compliance_token_must_match_exactly() {
        let mut response = parse_ssdp_response("HTTP/1.1 200 OK\r\n\r\n", source()).unwrap();
        assert!(!response.is_dlna_compliant());

        response.server = Some("Linux UPnP/1.0 DLNADOC/1.5 Foo".to_string());
        assert!(!response.is_dlna_compliant());

        response.server = Some("Linux UPnP/1.0 XDLNADOC/1.50".to_string());
        assert!(!response.is_dlna_compliant());

        response.server = Some("Linux UPnP/1.0 DLNADOC/1.50".to_string());
        assert!(response.is_dlna_compliant());
    }

    #[test]
    fn test_extract_header_value_case_insensitive() {
        assert_eq!(
            extract_header_value("location: http://example.com", "LOCATION:"),
            Some("http://example.com".to_string())
        );
        assert_eq!(
            extract_header_value("LoCaTiOn: http://example.com", "LOCATION:"),
            Some("http://example.com".to_string())
        );
    }

    #[test]
    fn test_extract_header_value_no_match() {
        assert_eq!(extract_header_value("OTHER: value", "LOCATION:"), None);
        assert_eq!(extract_header_value("LOCATIONS: value", "LOCATION:"), None);
        assert_eq!(extract_header_value("LOCATION:", "LOCATION:"), None);
        assert_eq!(extract_header_value("ÉÉÉÉÉ: value", "LOCATION:"), None);
    }

    #[test]
    fn test_session_stop_is_idempotent() {
        let mut session = SsdpSession::open().unwrap();
        assert!(!session.is_stopped());

        session.stop();
        session.stop();
        assert!(session.is_stopped());
        assert!(session.search("ssdp:all").is_err());
        assert_eq!(session.receive(Duration::from_millis(10)).unwrap(), None);
    }
}
