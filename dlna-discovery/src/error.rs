//! Error types for the discovery system.

use std::fmt;

/// Error type for discovery and description resolution.
#[derive(Debug)]
pub enum DiscoveryError {
    /// Socket or HTTP transport failure
    NetworkError(String),
    /// The description server answered with a status other than 200
    HttpStatus(u16),
    /// Malformed description document or advertisement
    ParseError(String),
    /// The server cannot be browsed: no LOCATION, no matching service, or no
    /// control URL in its description
    Unresolved(String),
    /// A configuration value is out of range
    InvalidConfig(String),
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            DiscoveryError::HttpStatus(code) => write!(f, "Description fetch failed: HTTP {}", code),
            DiscoveryError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            DiscoveryError::Unresolved(msg) => write!(f, "Unresolved server: {}", msg),
            DiscoveryError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for DiscoveryError {}

impl From<dlna_parser::ParseError> for DiscoveryError {
    fn from(error: dlna_parser::ParseError) -> Self {
        match error {
            dlna_parser::ParseError::MissingRequiredElement(name) => {
                DiscoveryError::Unresolved(format!("description has no {}", name))
            }
            other => DiscoveryError::ParseError(other.to_string()),
        }
    }
}

/// Convenience Result type alias for discovery operations.
pub type Result<T> = std::result::Result<T, DiscoveryError>;
