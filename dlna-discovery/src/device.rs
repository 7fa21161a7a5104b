//! Device description resolution.
//!
//! Fetches the description document an advertisement points at, finds the
//! requested service block and turns its control path into an absolute
//! endpoint URL.

use std::time::Duration;

use dlna_parser::{find_service, DeviceInfo};
use reqwest::Url;

use crate::error::{DiscoveryError, Result};
use crate::ssdp::Advertisement;
use crate::ServerDetail;

/// Turns an advertisement into the detail needed to talk to its service.
pub trait DescriptionResolver {
    fn resolve(&self, advertisement: &Advertisement, service_name: &str) -> Result<ServerDetail>;
}

/// Resolver fetching descriptions over HTTP.
#[derive(Debug, Clone)]
pub struct HttpResolver {
    client: reqwest::blocking::Client,
}

impl HttpResolver {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DiscoveryError::NetworkError(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Fetch the description document at `location`.
    pub fn fetch_description(&self, location: &str) -> Result<String> {
        let response = self
            .client
            .get(location)
            .send()
            .map_err(|e| DiscoveryError::NetworkError(format!("Failed to fetch device description: {}", e)))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(DiscoveryError::HttpStatus(status.as_u16()));
        }

        response
            .text()
            .map_err(|e| DiscoveryError::NetworkError(format!("Failed to read response body: {}", e)))
    }
}

impl DescriptionResolver for HttpResolver {
    fn resolve(&self, advertisement: &Advertisement, service_name: &str) -> Result<ServerDetail> {
        let location = advertisement
            .location()
            .ok_or_else(|| DiscoveryError::Unresolved("advertisement has no LOCATION".to_string()))?;

        let xml = self.fetch_description(location)?;
        detail_from_description(location, &xml, service_name, advertisement.st())
    }
}

/// Build a [`ServerDetail`] from a fetched description document.
///
/// `fallback_service_type` is used when the service block has no
/// `serviceType` of its own; callers pass the advertisement's `ST`.
pub fn detail_from_description(
    location: &str,
    xml: &str,
    service_name: &str,
    fallback_service_type: Option<&str>,
) -> Result<ServerDetail> {
    let entry = find_service(xml, service_name)?.ok_or_else(|| {
        DiscoveryError::Unresolved(format!("description has no {} service", service_name))
    })?;

    let service_type = entry
        .service_type
        .or_else(|| fallback_service_type.map(str::to_string))
        .ok_or_else(|| DiscoveryError::Unresolved("service type unknown".to_string()))?;

    let friendly_name = match DeviceInfo::from_xml(xml) {
        Ok(info) => info.friendly_name,
        Err(e) => {
            tracing::debug!(location, error = %e, "device fields not readable");
            None
        }
    };

    Ok(ServerDetail {
        control_url: control_endpoint(location, &entry.control_url)?,
        service_type,
        service_id: entry.service_id,
        event_sub_url: entry.event_sub_url,
        scpd_url: entry.scpd_url,
        friendly_name,
    })
}

/// Combine the scheme and host of `location` with a control path.
///
/// An absolute URL in `control_path` is returned as is; a relative one is
/// taken from the host root.
pub fn control_endpoint(location: &str, control_path: &str) -> Result<String> {
    let base = Url::parse(location)
        .map_err(|e| DiscoveryError::ParseError(format!("Invalid LOCATION {:?}: {}", location, e)))?;

    let path = control_path.trim();
    let joined = if path.starts_with('/') || Url::parse(path).is_ok() {
        base.join(path)
    } else {
        base.join(&format!("/{}", path))
    };

    joined
        .map(String::from)
        .map_err(|e| DiscoveryError::ParseError(format!("Invalid controlURL {:?}: {}", control_path, e)))
}
