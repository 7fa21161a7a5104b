//! ContentDirectory service parsing
//!
//! [`didl`] flattens DIDL-Lite containers and items into [`ContentItem`]s;
//! [`browse`] reads a whole SOAP Browse response into a [`BrowsePage`].

pub mod browse;
pub mod didl;

pub use browse::{parse_browse_element, parse_browse_response, BrowsePage};
pub use didl::{didl_fragments, parse_didl, parse_item, ContentItem, ParseMode, ITEM_SCHEMA};
