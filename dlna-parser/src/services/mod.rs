//! Service-specific parsers

pub mod content_directory;
pub mod device_description;
