//! UPnP media server discovery library
//!
//! This crate finds servers exposing a ContentDirectory service on the local
//! network using SSDP (Simple Service Discovery Protocol), then reads each
//! server's UPnP device description to learn its control endpoint.
//!
//! # Quick Start
//!
//! ```no_run
//! use dlna_discovery::search;
//!
//! for server in search()? {
//!     match server.detail() {
//!         Some(detail) => println!("{} -> {}", server.usn(), detail.control_url),
//!         None => println!("{} (unresolved)", server.usn()),
//!     }
//! }
//! # Ok::<(), dlna_discovery::DiscoveryError>(())
//! ```
//!
//! # Custom rounds
//!
//! ```no_run
//! use dlna_discovery::{Discovery, DiscoveryConfig};
//! use std::time::Duration;
//!
//! let config = DiscoveryConfig::default()
//!     .with_listen_window(Duration::from_secs(4))
//!     .with_concurrent_resolution(false);
//! let report = Discovery::new(config)?.search()?;
//! println!("{} servers from {} datagrams", report.servers.len(), report.datagrams);
//! # Ok::<(), dlna_discovery::DiscoveryError>(())
//! ```

mod config;
pub mod device;
mod discovery;
mod error;
pub mod ssdp;

pub use config::DiscoveryConfig;
pub use device::{DescriptionResolver, HttpResolver};
pub use discovery::{Discovery, DiscoveryOutcome, DiscoveryReport};
pub use error::{DiscoveryError, Result};
pub use ssdp::{Advertisement, SsdpTransport, UdpTransport};

use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

/// What is needed to send control requests to a server's service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerDetail {
    /// Absolute control endpoint, e.g. "http://192.168.1.20:8200/ctl/ContentDir"
    pub control_url: String,
    /// Full service type URN, used for the SOAP namespace and action header
    pub service_type: String,
    pub service_id: Option<String>,
    pub event_sub_url: Option<String>,
    pub scpd_url: Option<String>,
    /// Friendly name of the device, when its description carries one
    pub friendly_name: Option<String>,
}

/// A server seen during discovery.
///
/// Two descriptors are equal when they share a USN. The detail is filled in
/// at most once, by [`ServerDescriptor::resolve_with`].
#[derive(Debug, Clone)]
pub struct ServerDescriptor {
    advertisement: Advertisement,
    usn: String,
    detail: OnceLock<ServerDetail>,
}

impl ServerDescriptor {
    /// Wrap an advertisement. Advertisements without a USN are never
    /// accepted by discovery; here the USN falls back to an empty string.
    pub fn new(advertisement: Advertisement) -> Self {
        let usn = advertisement.usn().unwrap_or_default().to_string();
        Self { advertisement, usn, detail: OnceLock::new() }
    }

    /// Build an already resolved descriptor, e.g. for a server whose control
    /// endpoint is known in advance.
    pub fn resolved(advertisement: Advertisement, detail: ServerDetail) -> Self {
        let descriptor = Self::new(advertisement);
        let _ = descriptor.detail.set(detail);
        descriptor
    }

    pub fn usn(&self) -> &str {
        &self.usn
    }

    pub fn advertisement(&self) -> &Advertisement {
        &self.advertisement
    }

    pub fn location(&self) -> Option<&str> {
        self.advertisement.location()
    }

    pub fn detail(&self) -> Option<&ServerDetail> {
        self.detail.get()
    }

    pub fn is_resolved(&self) -> bool {
        self.detail.get().is_some()
    }

    /// Resolve through `resolver` unless already resolved.
    ///
    /// On failure the descriptor stays unresolved and can be retried.
    pub fn resolve_with<R: DescriptionResolver + ?Sized>(
        &self,
        resolver: &R,
        service_name: &str,
    ) -> Result<&ServerDetail> {
        if let Some(detail) = self.detail.get() {
            return Ok(detail);
        }

        let detail = resolver.resolve(&self.advertisement, service_name)?;
        tracing::debug!(usn = %self.usn, control_url = %detail.control_url, "server resolved");
        Ok(self.detail.get_or_init(|| detail))
    }
}

impl PartialEq for ServerDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.usn == other.usn
    }
}

impl Eq for ServerDescriptor {}

impl Hash for ServerDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.usn.hash(state);
    }
}

/// Discover ContentDirectory servers with the default configuration.
///
/// Blocks for at most the default ten second listen window plus description
/// fetches.
pub fn search() -> Result<Vec<ServerDescriptor>> {
    search_with_config(DiscoveryConfig::default())
}

/// Discover servers with a custom configuration.
pub fn search_with_config(config: DiscoveryConfig) -> Result<Vec<ServerDescriptor>> {
    Ok(Discovery::new(config)?.search()?.servers)
}
