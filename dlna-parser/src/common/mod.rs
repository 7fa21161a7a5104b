//! Shared parsing utilities
//!
//! - [`xml_decode`]: namespace stripping and serde entry points
//! - [`schema`]: the field schema driving both DIDL item and device
//!   description extraction

pub mod xml_decode;
pub mod schema;

pub use schema::{extract_fields, extract_fields_lossy, FieldRule, FieldSource};
