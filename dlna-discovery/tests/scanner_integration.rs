//! Scans driven by a scripted transport

mod helpers;

use std::time::{Duration, Instant};

use dlna_discovery::{DiscoveryConfig, Scanner};
use helpers::{media_server, response, FakeTransport, Scripted};
use rstest::rstest;

fn scanner(timeout_ms: u64) -> Scanner {
    Scanner::new(DiscoveryConfig::with_timeout(Duration::from_millis(timeout_ms)))
}

#[test]
fn test_collects_every_compliant_server() {
    let mut transport = FakeTransport::new(vec![
        media_server("http://192.168.1.10:8200/rootDesc.xml", "192.168.1.10:1900"),
        Scripted::Silence,
        media_server("http://192.168.1.11:9000/desc.xml", "192.168.1.11:1900"),
    ]);

    let devices = scanner(50).run(&mut transport).unwrap();

    assert_eq!(devices.len(), 2);
    assert_eq!(
        devices["http://192.168.1.11:9000/desc.xml"].root_url,
        "http://192.168.1.11:1900"
    );
    assert_eq!(transport.stops, 1);
}

#[rstest]
#[case(200, "Linux UPnP/1.0 Sonos/70.3-35220 (ZPS1)")]
#[case(200, "DLNADOC/1.51 UPnP/1.0")]
#[case(200, "")]
#[case(404, "Linux DLNADOC/1.50 UPnP/1.0")]
fn test_rejected_responses(#[case] status: u16, #[case] server: &str) {
    let mut transport = FakeTransport::new(vec![response(
        "http://192.168.1.30:1400/xml/device_description.xml",
        "192.168.1.30:1900",
        status,
        server,
    )]);

    let devices = scanner(30).run(&mut transport).unwrap();

    assert!(devices.is_empty());
}

#[test]
fn test_duplicate_location_keeps_latest() {
    let mut transport = FakeTransport::new(vec![
        media_server("http://192.168.1.10:8200/rootDesc.xml", "192.168.1.10:1900"),
        media_server("http://192.168.1.10:8200/rootDesc.xml", "192.168.1.10:40000"),
    ]);

    let devices = scanner(30).run(&mut transport).unwrap();

    assert_eq!(devices.len(), 1);
    assert_eq!(devices["http://192.168.1.10:8200/rootDesc.xml"].port, 40000);
}

#[test]
fn test_window_is_honored() {
    let mut transport = FakeTransport::default();
    let started = Instant::now();

    scanner(60).run(&mut transport).unwrap();

    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(60), "returned after {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(2), "returned after {:?}", elapsed);
    assert_eq!(transport.searches, 1);
    assert_eq!(transport.stops, 1);
}
