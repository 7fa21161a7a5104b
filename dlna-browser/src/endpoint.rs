use dlna_discovery::{ServerDescriptor, ServerDetail};

use crate::error::{BrowseError, Result};

/// Where Browse requests for one ContentDirectory service go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseEndpoint {
    /// Absolute control URL
    pub control_url: String,
    /// Service type URN used as the action namespace
    pub service_type: String,
}

impl BrowseEndpoint {
    pub fn new(control_url: impl Into<String>, service_type: impl Into<String>) -> Self {
        Self {
            control_url: control_url.into(),
            service_type: service_type.into(),
        }
    }

    /// Endpoint of a discovered server. Fails for servers whose description
    /// could not be resolved.
    pub fn from_descriptor(server: &ServerDescriptor) -> Result<Self> {
        server.detail().map(Self::from).ok_or_else(|| {
            BrowseError::Unresolved(format!("{} has no control endpoint", server.usn()))
        })
    }
}

impl From<&ServerDetail> for BrowseEndpoint {
    fn from(detail: &ServerDetail) -> Self {
        Self::new(detail.control_url.clone(), detail.service_type.clone())
    }
}

impl TryFrom<&ServerDescriptor> for BrowseEndpoint {
    type Error = BrowseError;

    fn try_from(server: &ServerDescriptor) -> Result<Self> {
        Self::from_descriptor(server)
    }
}
