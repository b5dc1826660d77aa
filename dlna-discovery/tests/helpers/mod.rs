//! Scripted discovery transport shared by the integration tests

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::time::Duration;

use dlna_discovery::{DiscoveryTransport, Result, SsdpResponse};

/// One step of a scripted search window
pub enum Scripted {
    Response(SsdpResponse),
    /// Nothing arrives for this receive call
    Silence,
}

#[derive(Default)]
pub struct FakeTransport {
    script: VecDeque<Scripted>,
    pub searches: usize,
    pub stops: usize,
}

impl FakeTransport {
    pub fn new(script: Vec<Scripted>) -> Self {
        Self {
            script: script.into(),
            ..Default::default()
        }
    }
}

impl DiscoveryTransport for FakeTransport {
    fn search(&mut self, _search_target: &str) -> Result<()> {
        self.searches += 1;
        Ok(())
    }

    fn receive(&mut self, wait: Duration) -> Result<Option<SsdpResponse>> {
        match self.script.pop_front() {
            Some(Scripted::Response(response)) => Ok(Some(response)),
            Some(Scripted::Silence) | None => {
                std::thread::sleep(wait.min(Duration::from_millis(5)));
                Ok(None)
            }
        }
    }

    fn stop(&mut self) {
        self.stops += 1;
    }
}

pub fn media_server(location: &str, source: &str) -> Scripted {
    response(location, source, 200, "Linux/4.4 DLNADOC/1.50 UPnP/1.0 MiniDLNA/1.2.1")
}

pub fn response(location: &str, source: &str, status: u16, server: &str) -> Scripted {
    Scripted::Response(SsdpResponse {
        status,
        location: Some(location.to_string()),
        search_target: Some(dlna_discovery::CONTENT_DIRECTORY_SERVICE.to_string()),
        usn: Some(format!("uuid:{}::urn:schemas-upnp-org:service:ContentDirectory:1", source)),
        server: Some(server.to_string()),
        source: source.parse::<SocketAddr>().expect("valid socket address"),
    })
}
