//! Test helpers for fixture-based integration tests

use std::fs;
use std::path::PathBuf;

use dlna_discovery::Advertisement;

pub const CONTENT_DIRECTORY: &str = "urn:schemas-upnp-org:service:ContentDirectory:1";

/// A device description fixture served from a given location
#[derive(Debug, Clone)]
pub struct DescriptionFixture {
    pub name: String,
    pub xml_content: String,
}

impl DescriptionFixture {
    /// Load a fixture from the fixtures directory
    pub fn load(filename: &str) -> Self {
        let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        path.push("tests/fixtures");
        path.push(filename);

        let xml_content = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", filename, e));

        Self {
            name: filename.to_string(),
            xml_content,
        }
    }
}

/// Raw SSDP response advertising `st` with a description at `location`
pub fn ssdp_response(usn: &str, st: &str, location: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\n\
         CACHE-CONTROL: max-age=1800\r\n\
         EXT:\r\n\
         LOCATION: {}\r\n\
         SERVER: Linux/5.10 DLNADOC/1.50 UPnP/1.0 MiniDLNA/1.3.0\r\n\
         ST: {}\r\n\
         USN: {}::{}\r\n\r\n",
        location, st, usn, st
    )
}

/// Parsed advertisement for a ContentDirectory service at `location`
pub fn content_directory_advertisement(usn: &str, location: &str) -> Advertisement {
    Advertisement::parse(&ssdp_response(usn, CONTENT_DIRECTORY, location))
        .expect("helper response always has headers")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_fixture() {
        let fixture = DescriptionFixture::load("minidlna_media_server.xml");
        assert!(fixture.xml_content.contains("<?xml"));
        assert!(fixture.xml_content.contains("ContentDirectory"));
    }

    #[test]
    fn test_ssdp_response() {
        let response = ssdp_response("uuid:abc", CONTENT_DIRECTORY, "http://10.0.0.1:8200/rootDesc.xml");
        assert!(response.contains("HTTP/1.1 200 OK"));
        assert!(response.contains("LOCATION: http://10.0.0.1:8200/rootDesc.xml"));
        assert!(response.contains("USN: uuid:abc::urn:schemas-upnp-org:service:ContentDirectory:1"));
    }
}
