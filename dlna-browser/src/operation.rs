//! ContentDirectory actions
//!
//! An operation knows its SOAP action name, how to lay out its arguments
//! inside the envelope body and how to read the response document. The
//! envelope itself and the HTTP exchange belong to `soap_client`.

use dlna_parser::{parse_browse_response, BrowsePage, ParseMode};
use quick_xml::escape::escape;

use crate::error::Result;

/// A UPnP action invoked on a ContentDirectory service
pub trait ContentDirectoryOperation {
    type Request;
    type Response;

    /// The SOAP action name for this operation
    const ACTION: &'static str;

    /// XML arguments placed inside the action element
    fn build_payload(request: &Self::Request) -> String;

    /// Read the raw response document
    fn parse_response(xml: &str, mode: ParseMode) -> Result<Self::Response>;
}

/// `BrowseFlag` argument of the Browse action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrowseFlag {
    #[default]
    DirectChildren,
    Metadata,
}

impl BrowseFlag {
    pub fn as_str(self) -> &'static str {
        match self {
            BrowseFlag::DirectChildren => "BrowseDirectChildren",
            BrowseFlag::Metadata => "BrowseMetadata",
        }
    }
}

/// Arguments of one Browse request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseRequest {
    pub object_id: String,
    pub browse_flag: BrowseFlag,
    pub filter: String,
    pub starting_index: u32,
    /// 0 lets the server pick the page size
    pub requested_count: u32,
    pub sort_criteria: String,
}

impl BrowseRequest {
    /// Children of `object_id` starting at `starting_index`, every property,
    /// server-chosen page size, server order.
    pub fn children(object_id: impl Into<String>, starting_index: u32) -> Self {
        Self {
            object_id: object_id.into(),
            browse_flag: BrowseFlag::DirectChildren,
            filter: "*".to_string(),
            starting_index,
            requested_count: 0,
            sort_criteria: String::new(),
        }
    }
}

/// The `Browse` action
pub struct BrowseOperation;

impl ContentDirectoryOperation for BrowseOperation {
    type Request = BrowseRequest;
    type Response = BrowsePage;

    const ACTION: &'static str = "Browse";

    fn build_payload(request: &BrowseRequest) -> String {
        format!(
            "<ObjectID>{}</ObjectID>\
             <BrowseFlag>{}</BrowseFlag>\
             <Filter>{}</Filter>\
             <StartingIndex>{}</StartingIndex>\
             <RequestedCount>{}</RequestedCount>\
             <SortCriteria>{}</SortCriteria>",
            escape(&request.object_id),
            request.browse_flag.as_str(),
            escape(&request.filter),
            request.starting_index,
            request.requested_count,
            escape(&request.sort_criteria)
        )
    }

    fn parse_response(xml: &str, mode: ParseMode) -> Result<BrowsePage> {
        Ok(parse_browse_response(xml, mode)?)
    }
}
