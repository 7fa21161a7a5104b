//! Error types for the SOAP client

use thiserror::Error;

/// Errors that can occur during SOAP communication
#[derive(Debug, Error)]
pub enum SoapError {
    /// Connection, timeout or body read failure
    #[error("Network/HTTP error: {0}")]
    Network(String),

    /// The server answered with something other than 200 OK
    #[error("HTTP status {0}")]
    HttpStatus(u16),

    /// The request could not be built (bad URL and the like)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
