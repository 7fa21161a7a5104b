//! Private SOAP client for UPnP control requests
//!
//! This crate wraps a single pooled `ureq` agent. One [`SoapClient`] can be
//! cloned and shared between threads; every clone reuses the same connection
//! pool, so concurrent Browse calls against one server do not open a socket
//! each.

mod error;

pub use error::SoapError;

use std::time::Duration;

/// Build the SOAP envelope for `action` of `service_type` around `payload`.
pub fn envelope(service_type: &str, action: &str, payload: &str) -> String {
    format!(
        r#"<?xml version="1.0"?>
<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/" s:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/">
  <s:Body>
    <u:{action} xmlns:u="{service_type}">
      {payload}
    </u:{action}>
  </s:Body>
</s:Envelope>"#,
        action = action,
        service_type = service_type,
        payload = payload
    )
}

/// Value of the `SOAPACTION` header: the quoted `<serviceType>#<action>`.
pub fn soap_action(service_type: &str, action: &str) -> String {
    format!("\"{}#{}\"", service_type, action)
}

/// A minimal blocking SOAP client for UPnP control endpoints
#[derive(Debug, Clone)]
pub struct SoapClient {
    agent: ureq::Agent,
}

impl SoapClient {
    /// Create a new SOAP client with default timeouts (5 s connect, 10 s read)
    pub fn new() -> Self {
        Self::with_timeouts(Duration::from_secs(5), Duration::from_secs(10))
    }

    pub fn with_timeouts(connect: Duration, read: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout_connect(connect)
                .timeout_read(read)
                .build(),
        }
    }

    /// POST `action` to an absolute control URL and return the response body.
    ///
    /// Anything other than HTTP 200 is an error and no body is returned.
    pub fn call(
        &self,
        control_url: &str,
        service_type: &str,
        action: &str,
        payload: &str,
    ) -> Result<String, SoapError> {
        let body = envelope(service_type, action, payload);
        tracing::debug!(url = control_url, action, "sending SOAP request");

        let response = match self
            .agent
            .post(control_url)
            .set("Content-Type", "text/xml; charset=utf-8")
            .set("SOAPACTION", &soap_action(service_type, action))
            .send_string(&body)
        {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => return Err(SoapError::HttpStatus(code)),
            Err(err) => {
                return Err(match err.kind() {
                    ureq::ErrorKind::InvalidUrl | ureq::ErrorKind::UnknownScheme => {
                        SoapError::InvalidRequest(err.to_string())
                    }
                    _ => SoapError::Network(err.to_string()),
                })
            }
        };

        if response.status() != 200 {
            return Err(SoapError::HttpStatus(response.status()));
        }

        response.into_string().map_err(|e| SoapError::Network(e.to_string()))
    }
}

impl Default for SoapClient {
    fn default() -> Self {
        Self::new()
    }
}
