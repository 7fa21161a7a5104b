//! # dlna-parser
//!
//! XML parsing for the two documents a ContentDirectory control point reads:
//! the UPnP device description served at an SSDP `LOCATION`, and the SOAP
//! `BrowseResponse` carrying escaped DIDL-Lite. Nothing in this crate performs
//! I/O.
//!
//! ## Usage
//!
//! ```rust
//! use dlna_parser::{parse_browse_response, ParseMode};
//!
//! let xml = r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body>
//!   <u:BrowseResponse xmlns:u="urn:schemas-upnp-org:service:ContentDirectory:1">
//!     <Result>&lt;DIDL-Lite&gt;&lt;item id="7" parentID="0"&gt;&lt;dc:title&gt;Song&lt;/dc:title&gt;&lt;/item&gt;&lt;/DIDL-Lite&gt;</Result>
//!     <NumberReturned>1</NumberReturned>
//!     <TotalMatches>1</TotalMatches>
//!   </u:BrowseResponse>
//! </s:Body></s:Envelope>"#;
//!
//! let page = parse_browse_response(xml, ParseMode::Structured).unwrap();
//! assert_eq!(page.returned, 1);
//! assert_eq!(page.items[0].title(), Some("Song"));
//! ```

pub mod error;
pub mod common;
pub mod services;

pub use error::{ParseError, ParseResult};

pub use common::{extract_fields, FieldRule, FieldSource};

pub use services::content_directory::{
    didl_fragments, parse_browse_response, parse_didl, parse_item, BrowsePage, ContentItem,
    ParseMode,
};
pub use services::device_description::{find_service, DeviceInfo, ServiceEntry};
