//! Core discovery loop.
//!
//! One round:
//! 1. sends a single M-SEARCH datagram
//! 2. collects responses until the listen window closes or a receive times
//!    out with nothing new
//! 3. keeps the first advertisement per USN whose `ST` names the wanted
//!    service
//! 4. resolves each kept server's description, possibly in parallel

use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::config::DiscoveryConfig;
use crate::device::{DescriptionResolver, HttpResolver};
use crate::error::Result;
use crate::ssdp::{search_request, Advertisement, SsdpTransport, UdpTransport};
use crate::ServerDescriptor;

const RECV_BUFFER_SIZE: usize = 4096;

/// Why the listen loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryOutcome {
    /// The configured listen window elapsed.
    WindowElapsed,
    /// A full receive timeout passed with no datagram.
    Idle,
}

/// Result of one discovery round.
#[derive(Debug, Clone)]
pub struct DiscoveryReport {
    /// Accepted servers in the order their first advertisement arrived.
    pub servers: Vec<ServerDescriptor>,
    pub outcome: DiscoveryOutcome,
    /// Datagrams received, including duplicates and filtered ones.
    pub datagrams: usize,
    pub elapsed: Duration,
}

/// Discovery engine for one kind of service.
///
/// # Examples
///
/// ```no_run
/// use dlna_discovery::{Discovery, DiscoveryConfig};
///
/// let discovery = Discovery::new(DiscoveryConfig::quick())?;
/// for server in discovery.search()?.servers {
///     println!("{} resolved={}", server.usn(), server.is_resolved());
/// }
/// # Ok::<(), dlna_discovery::DiscoveryError>(())
/// ```
pub struct Discovery<R = HttpResolver> {
    config: DiscoveryConfig,
    resolver: R,
}

impl Discovery<HttpResolver> {
    pub fn new(config: DiscoveryConfig) -> Result<Self> {
        config.validate()?;
        let resolver = HttpResolver::new(config.http_timeout)?;
        Ok(Self { config, resolver })
    }
}

impl<R: DescriptionResolver + Sync> Discovery<R> {
    pub fn with_resolver(config: DiscoveryConfig, resolver: R) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, resolver })
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Run one round over a fresh UDP socket. The socket is closed before
    /// this returns, whatever the outcome.
    pub fn search(&self) -> Result<DiscoveryReport> {
        let transport = UdpTransport::bind(self.config.multicast_addr)?;
        self.search_with(transport)
    }

    /// Run one round over `transport`, which is dropped before returning.
    pub fn search_with<T: SsdpTransport>(&self, mut transport: T) -> Result<DiscoveryReport> {
        let started = Instant::now();
        let listened = self.listen(&mut transport, started);
        drop(transport);
        let (advertisements, outcome, datagrams) = listened?;

        let servers = self.accept(advertisements);
        self.resolve_all(&servers);

        let report = DiscoveryReport { servers, outcome, datagrams, elapsed: started.elapsed() };
        tracing::info!(
            servers = report.servers.len(),
            datagrams = report.datagrams,
            outcome = ?report.outcome,
            "discovery round finished"
        );
        Ok(report)
    }

    fn listen<T: SsdpTransport>(
        &self,
        transport: &mut T,
        started: Instant,
    ) -> Result<(Vec<Advertisement>, DiscoveryOutcome, usize)> {
        let request = search_request(&self.config.search_target, self.config.mx);
        transport.send(request.as_bytes())?;
        tracing::debug!(search_target = %self.config.search_target, "M-SEARCH sent");

        let mut buffer = [0u8; RECV_BUFFER_SIZE];
        let mut advertisements = Vec::new();
        let mut datagrams = 0;

        let outcome = loop {
            let elapsed = started.elapsed();
            if elapsed >= self.config.listen_window {
                break DiscoveryOutcome::WindowElapsed;
            }
            let remaining = self.config.listen_window - elapsed;
            let wait = self.config.receive_timeout.min(remaining);

            let Some(size) = transport.recv(&mut buffer, wait)? else {
                break if wait < self.config.receive_timeout {
                    DiscoveryOutcome::WindowElapsed
                } else {
                    DiscoveryOutcome::Idle
                };
            };
            datagrams += 1;

            match std::str::from_utf8(&buffer[..size]) {
                Ok(text) => match Advertisement::parse(text) {
                    Some(advertisement) => advertisements.push(advertisement),
                    None => tracing::debug!(size, "datagram without headers skipped"),
                },
                Err(_) => tracing::debug!(size, "non UTF-8 datagram skipped"),
            }
        };

        Ok((advertisements, outcome, datagrams))
    }

    /// Keep the first advertisement per USN whose `ST` names the service.
    fn accept(&self, advertisements: Vec<Advertisement>) -> Vec<ServerDescriptor> {
        let mut seen = HashSet::new();
        let mut servers = Vec::new();

        for advertisement in advertisements {
            let Some(usn) = advertisement.usn() else {
                tracing::debug!("advertisement without USN skipped");
                continue;
            };
            if seen.contains(usn) {
                continue;
            }
            if !advertisement.st().map_or(false, |st| st.contains(&self.config.service_filter)) {
                continue;
            }

            tracing::info!(usn, location = ?advertisement.location(), "found {}", self.config.service_filter);
            seen.insert(usn.to_string());
            servers.push(ServerDescriptor::new(advertisement));
        }

        servers
    }

    fn resolve_all(&self, servers: &[ServerDescriptor]) {
        if self.config.resolve_concurrently && servers.len() > 1 {
            std::thread::scope(|scope| {
                for server in servers {
                    scope.spawn(move || self.resolve_one(server));
                }
            });
        } else {
            for server in servers {
                self.resolve_one(server);
            }
        }
    }

    fn resolve_one(&self, server: &ServerDescriptor) {
        if let Err(e) = server.resolve_with(&self.resolver, &self.config.service_filter) {
            tracing::warn!(usn = server.usn(), error = %e, "server left unresolved");
        }
    }
}
