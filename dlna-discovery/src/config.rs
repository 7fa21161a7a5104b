//! Discovery configuration

use std::net::SocketAddrV4;
use std::time::Duration;

use crate::error::{DiscoveryError, Result};
use crate::ssdp::SSDP_MULTICAST_ADDR;

/// Configuration for one discovery round
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Upper bound on how long responses are collected
    /// Default: 10 seconds
    pub listen_window: Duration,

    /// A receive that waits this long without a datagram ends the round
    /// Default: 1 second
    pub receive_timeout: Duration,

    /// `ST` header of the M-SEARCH request
    /// Default: "ssdp:all"
    pub search_target: String,

    /// Advertisements are kept only when their `ST` contains this
    /// Default: "ContentDirectory"
    pub service_filter: String,

    /// `MX` header: seconds servers may delay their answer
    /// Default: 1
    pub mx: u8,

    /// Timeout for each device description fetch
    /// Default: 5 seconds
    pub http_timeout: Duration,

    /// Resolve accepted servers in parallel
    /// Default: true
    pub resolve_concurrently: bool,

    /// Where the search datagram is sent
    /// Default: 239.255.255.250:1900
    pub multicast_addr: SocketAddrV4,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            listen_window: Duration::from_secs(10),
            receive_timeout: Duration::from_secs(1),
            search_target: "ssdp:all".to_string(),
            service_filter: "ContentDirectory".to_string(),
            mx: 1,
            http_timeout: Duration::from_secs(5),
            resolve_concurrently: true,
            multicast_addr: SSDP_MULTICAST_ADDR,
        }
    }
}

impl DiscoveryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Short round for interactive use
    pub fn quick() -> Self {
        Self {
            listen_window: Duration::from_secs(3),
            receive_timeout: Duration::from_millis(500),
            http_timeout: Duration::from_secs(2),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.listen_window.is_zero() {
            return Err(DiscoveryError::InvalidConfig(
                "Listen window must be greater than 0".to_string(),
            ));
        }

        if self.receive_timeout.is_zero() {
            return Err(DiscoveryError::InvalidConfig(
                "Receive timeout must be greater than 0".to_string(),
            ));
        }

        if self.search_target.trim().is_empty() {
            return Err(DiscoveryError::InvalidConfig(
                "Search target must not be empty".to_string(),
            ));
        }

        if !(1..=5).contains(&self.mx) {
            return Err(DiscoveryError::InvalidConfig(
                "MX must be between 1 and 5".to_string(),
            ));
        }

        Ok(())
    }

    pub fn with_listen_window(mut self, window: Duration) -> Self {
        self.listen_window = window;
        self
    }

    pub fn with_receive_timeout(mut self, timeout: Duration) -> Self {
        self.receive_timeout = timeout;
        self
    }

    pub fn with_search_target(mut self, target: impl Into<String>) -> Self {
        self.search_target = target.into();
        self
    }

    pub fn with_service_filter(mut self, filter: impl Into<String>) -> Self {
        self.service_filter = filter.into();
        self
    }

    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    pub fn with_concurrent_resolution(mut self, enabled: bool) -> Self {
        self.resolve_concurrently = enabled;
        self
    }
}
