//! SSDP (Simple Service Discovery Protocol) wire handling
//!
//! Builds the M-SEARCH datagram, turns response datagrams into
//! [`Advertisement`]s, and defines the [`SsdpTransport`] seam the discovery
//! loop reads from.

use std::io;
use std::net::{Ipv4Addr, SocketAddrV4, UdpSocket};
use std::time::Duration;

use crate::error::{DiscoveryError, Result};

/// The SSDP multicast group and port.
pub const SSDP_MULTICAST_ADDR: SocketAddrV4 = SocketAddrV4::new(Ipv4Addr::new(239, 255, 255, 250), 1900);

/// Build an M-SEARCH request for `search_target`.
pub fn search_request(search_target: &str, mx: u8) -> String {
    format!(
        "M-SEARCH * HTTP/1.1\r\n\
         HOST: {}\r\n\
         MAN: \"ssdp:discover\"\r\n\
         MX: {}\r\n\
         ST: {}\r\n\
         \r\n",
        SSDP_MULTICAST_ADDR, mx, search_target
    )
}

/// Header block of one SSDP response.
///
/// Header names keep the spelling the server used; lookups ignore case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advertisement {
    headers: Vec<(String, String)>,
}

impl Advertisement {
    /// Parse one response datagram. Returns `None` when no header line is
    /// present at all.
    pub fn parse(response: &str) -> Option<Self> {
        let headers: Vec<(String, String)> = response
            .lines()
            .filter_map(|line| {
                let (name, value) = line.split_once(':')?;
                let name = name.trim();
                if name.is_empty() || name.contains(' ') {
                    return None;
                }
                Some((name.to_string(), value.trim().to_string()))
            })
            .collect();

        if headers.is_empty() {
            None
        } else {
            Some(Self { headers })
        }
    }

    /// Value of header `name`, first occurrence, case-insensitive.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Unique Service Name, the de-duplication key.
    pub fn usn(&self) -> Option<&str> {
        self.get("USN")
    }

    /// Search target the response answers for.
    pub fn st(&self) -> Option<&str> {
        self.get("ST")
    }

    /// URL of the device description document.
    pub fn location(&self) -> Option<&str> {
        self.get("LOCATION")
    }

    pub fn server(&self) -> Option<&str> {
        self.get("SERVER")
    }

    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Datagram I/O used by the discovery loop.
pub trait SsdpTransport {
    /// Send the search request.
    fn send(&mut self, payload: &[u8]) -> Result<()>;

    /// Wait at most `timeout` for one datagram. `Ok(None)` means the wait ran
    /// out with nothing received.
    fn recv(&mut self, buf: &mut [u8], timeout: Duration) -> Result<Option<usize>>;
}

/// UDP socket bound to an ephemeral port, sending to the SSDP group.
pub struct UdpTransport {
    socket: UdpSocket,
    target: SocketAddrV4,
}

impl UdpTransport {
    pub fn bind(target: SocketAddrV4) -> Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")
            .map_err(|e| DiscoveryError::NetworkError(format!("Failed to bind UDP socket: {}", e)))?;

        socket
            .set_multicast_loop_v4(true)
            .map_err(|e| DiscoveryError::NetworkError(format!("Failed to set multicast loop: {}", e)))?;

        Ok(Self { socket, target })
    }
}

impl SsdpTransport for UdpTransport {
    fn send(&mut self, payload: &[u8]) -> Result<()> {
        self.socket
            .send_to(payload, self.target)
            .map_err(|e| DiscoveryError::NetworkError(format!("Failed to send M-SEARCH: {}", e)))?;
        Ok(())
    }

    fn recv(&mut self, buf: &mut [u8], timeout: Duration) -> Result<Option<usize>> {
        // A zero read timeout is rejected by the OS
        let timeout = timeout.max(Duration::from_millis(1));
        self.socket
            .set_read_timeout(Some(timeout))
            .map_err(|e| DiscoveryError::NetworkError(format!("Failed to set read timeout: {}", e)))?;

        match self.socket.recv_from(buf) {
            Ok((size, from)) => {
                tracing::trace!(%from, size, "SSDP datagram");
                Ok(Some(size))
            }
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => Ok(None),
            Err(e) => Err(DiscoveryError::NetworkError(format!("Socket error: {}", e))),
        }
    }
}
