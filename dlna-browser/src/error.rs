use dlna_discovery::DiscoveryError;
use dlna_parser::ParseError;
use soap_client::SoapError;
use thiserror::Error;

/// Errors raised while browsing a ContentDirectory service
///
/// A short listing is not an error: it is reported as a
/// [`Completeness`](crate::Completeness) value on the returned listing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrowseError {
    /// Network failure or an HTTP status other than 200
    ///
    /// Aborts only the request that raised it; no partial page is returned.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response was not a readable Browse response
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// The server has no known control endpoint
    #[error("Unresolved server: {0}")]
    Unresolved(String),

    /// A configuration value is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Type alias for results that can return a BrowseError
pub type Result<T> = std::result::Result<T, BrowseError>;

impl From<SoapError> for BrowseError {
    fn from(error: SoapError) -> Self {
        match error {
            SoapError::Network(msg) => BrowseError::Transport(msg),
            SoapError::HttpStatus(code) => BrowseError::Transport(format!("HTTP {}", code)),
            SoapError::InvalidRequest(msg) => BrowseError::Transport(format!("invalid request: {}", msg)),
        }
    }
}

impl From<DiscoveryError> for BrowseError {
    fn from(error: DiscoveryError) -> Self {
        match error {
            DiscoveryError::Unresolved(msg) => BrowseError::Unresolved(msg),
            DiscoveryError::InvalidConfig(msg) => BrowseError::InvalidConfig(msg),
            other => BrowseError::Transport(other.to_string()),
        }
    }
}
