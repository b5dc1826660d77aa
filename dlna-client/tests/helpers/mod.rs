//! Test helpers for mockito-backed client tests

use std::fs;
use std::path::PathBuf;

/// Load a fixture from the fixtures directory
pub fn load_fixture(filename: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/fixtures");
    path.push(filename);

    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", filename, e))
}

pub const BROWSE_ACTION: &str = "\"urn:schemas-upnp-org:service:ContentDirectory:1#Browse\"";
