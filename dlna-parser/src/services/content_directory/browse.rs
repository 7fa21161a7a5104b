//! SOAP `BrowseResponse` parsing.
//!
//! The interesting elements sit several wrappers deep:
//!
//! ```xml
//! <s:Envelope>
//!   <s:Body>
//!     <u:BrowseResponse xmlns:u="urn:schemas-upnp-org:service:ContentDirectory:1">
//!       <Result>&lt;DIDL-Lite ...&gt;...&lt;/DIDL-Lite&gt;</Result>
//!       <NumberReturned>5</NumberReturned>
//!       <TotalMatches>12</TotalMatches>
//!       <UpdateID>3</UpdateID>
//!     </u:BrowseResponse>
//!   </s:Body>
//! </s:Envelope>
//! ```
//!
//! Rather than hard-coding the path, the document is walked depth-first and
//! the first `NumberReturned` / `TotalMatches` seen anywhere are taken as the
//! page counts. Once both are known, later `Result` elements are ignored.

use xmltree::Element;

use crate::common::schema::child_elements;
use crate::common::xml_decode::{local_name, parse_element};
use crate::error::{ParseError, ParseResult};
use crate::services::content_directory::didl::{parse_didl, ContentItem, ParseMode};

/// One page of a Browse call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowsePage {
    /// Records in the order the server returned them, containers first.
    pub items: Vec<ContentItem>,
    /// `NumberReturned` as reported by the server.
    pub returned: u32,
    /// `TotalMatches` as reported by the server.
    pub total: u32,
}

impl BrowsePage {
    /// The server's counts disagree with the records actually parsed.
    pub fn count_mismatch(&self) -> bool {
        self.items.len() != self.returned as usize
    }
}

/// Parse a complete SOAP Browse response document.
///
/// Namespace prefixes are stripped first, so a response using a prefix it
/// never declares is still read.
pub fn parse_browse_response(document: &str, mode: ParseMode) -> ParseResult<BrowsePage> {
    let root = parse_element(document)?;
    parse_browse_element(&root, mode)
}

/// Same as [`parse_browse_response`] for an already parsed tree.
pub fn parse_browse_element(root: &Element, mode: ParseMode) -> ParseResult<BrowsePage> {
    let mut visitor = BrowseVisitor::new(mode);
    visitor.visit(root)?;
    visitor.finish()
}

struct BrowseVisitor {
    mode: ParseMode,
    items: Vec<ContentItem>,
    returned: Option<u32>,
    total: Option<u32>,
}

impl BrowseVisitor {
    fn new(mode: ParseMode) -> Self {
        Self { mode, items: Vec::new(), returned: None, total: None }
    }

    fn counts_found(&self) -> bool {
        self.returned.is_some() && self.total.is_some()
    }

    fn visit(&mut self, element: &Element) -> ParseResult<()> {
        match local_name(&element.name) {
            "Result" if !self.counts_found() => {
                let didl = element.get_text().unwrap_or_default();
                let items = parse_didl(&didl, self.mode)?;
                tracing::trace!(count = items.len(), "parsed Result block");
                self.items.extend(items);
            }
            "NumberReturned" if self.returned.is_none() => {
                self.returned = Some(parse_count(element)?);
            }
            "TotalMatches" if self.total.is_none() => {
                self.total = Some(parse_count(element)?);
            }
            _ => {}
        }

        for child in child_elements(element) {
            self.visit(child)?;
        }
        Ok(())
    }

    fn finish(self) -> ParseResult<BrowsePage> {
        let returned = self
            .returned
            .ok_or_else(|| ParseError::MissingRequiredElement("NumberReturned".to_string()))?;
        let total = self
            .total
            .ok_or_else(|| ParseError::MissingRequiredElement("TotalMatches".to_string()))?;
        Ok(BrowsePage { items: self.items, returned, total })
    }
}

fn parse_count(element: &Element) -> ParseResult<u32> {
    let text = element.get_text().unwrap_or_default();
    text.trim().parse().map_err(|_| ParseError::InvalidNumber {
        element: element.name.clone(),
        value: text.into_owned(),
    })
}
