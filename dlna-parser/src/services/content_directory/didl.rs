//! DIDL-Lite item records.
//!
//! A browse result is a `DIDL-Lite` document holding `<container>` and
//! `<item>` elements. Each one is flattened into a [`ContentItem`]: a map of
//! the recognised attributes and child elements, with absent fields simply
//! missing from the map.
//!
//! ```xml
//! <DIDL-Lite xmlns:dc="http://purl.org/dc/elements/1.1/" ...>
//!   <container id="1$4" parentID="1" childCount="12">
//!     <dc:title>Albums</dc:title>
//!     <upnp:class>object.container.storageFolder</upnp:class>
//!   </container>
//!   <item id="1$4$0" parentID="1$4">
//!     <dc:title>Song</dc:title>
//!     <res protocolInfo="http-get:*:audio/mpeg:*" duration="0:03:58">http://host/a.mp3</res>
//!   </item>
//! </DIDL-Lite>
//! ```

use std::collections::BTreeMap;

use serde::Serialize;
use xmltree::Element;

use crate::common::schema::{child_elements, extract_fields, extract_fields_lossy, FieldRule};
use crate::common::xml_decode::parse_element;
use crate::error::{ParseError, ParseResult};

/// Fields recognised on a DIDL-Lite container or item.
pub const ITEM_SCHEMA: &[FieldRule] = &[
    FieldRule::attribute("id"),
    FieldRule::attribute("parentID"),
    FieldRule::attribute("childCount"),
    FieldRule::attribute("protocolInfo"),
    FieldRule::attribute("resolution"),
    FieldRule::attribute("duration"),
    FieldRule::attribute("size"),
    FieldRule::element("dc:title"),
    FieldRule::element("dc:date"),
    FieldRule::element("upnp:class"),
    FieldRule::element("upnp:album"),
    FieldRule::element("pv:extension"),
    FieldRule::element("pv:modificationTime"),
    FieldRule::element("pv:addedTime"),
    FieldRule::element("pv:lastUpdated"),
    FieldRule::element("res"),
];

/// How DIDL markup is turned into records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// Parse as XML; values keep their inner whitespace.
    #[default]
    Structured,
    /// Token matching on raw text. Values containing whitespace are dropped,
    /// which some downstream tooling relies on for byte-compatible output.
    Legacy,
}

/// One DIDL-Lite container or item as a flat attribute map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ContentItem {
    fields: BTreeMap<String, String>,
}

impl ContentItem {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn id(&self) -> Option<&str> {
        self.get("id")
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.get("parentID")
    }

    pub fn title(&self) -> Option<&str> {
        self.get("title")
    }

    pub fn class(&self) -> Option<&str> {
        self.get("class")
    }

    /// The resolvable media URL from the first `<res>` element.
    pub fn res(&self) -> Option<&str> {
        self.get("res")
    }

    /// Server-declared child count; `None` when absent or not a number.
    pub fn child_count(&self) -> Option<u32> {
        self.get("childCount").and_then(|v| v.parse().ok())
    }

    /// Containers are the browsable nodes of the tree.
    pub fn is_container(&self) -> bool {
        self.class().map_or(false, |class| class.contains("container"))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_fields(self) -> BTreeMap<String, String> {
        self.fields
    }
}

impl From<BTreeMap<String, String>> for ContentItem {
    fn from(fields: BTreeMap<String, String>) -> Self {
        Self { fields }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ContentItem {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Parse one `<container ...>` or `<item ...>` fragment.
///
/// The fragment may omit its closing tag, as happens when a result is split
/// on `</item>`. In [`ParseMode::Structured`] a fragment that still is not
/// well-formed XML is an error; [`ParseMode::Legacy`] never fails.
pub fn parse_item(fragment: &str, mode: ParseMode) -> ParseResult<ContentItem> {
    match mode {
        ParseMode::Legacy => Ok(extract_fields_lossy(fragment, ITEM_SCHEMA).into()),
        ParseMode::Structured => {
            let fragment = fragment.trim();
            let element = match parse_element(fragment) {
                Ok(element) => element,
                Err(first_error) => {
                    let closed = close_fragment(fragment).ok_or(first_error)?;
                    parse_element(&closed)?
                }
            };
            Ok(item_from_element(&element))
        }
    }
}

/// Parse the text of a `Result` element: every container, then every item.
pub fn parse_didl(didl: &str, mode: ParseMode) -> ParseResult<Vec<ContentItem>> {
    if didl.trim().is_empty() {
        return Ok(Vec::new());
    }

    match mode {
        ParseMode::Legacy => Ok(["container", "item"]
            .iter()
            .flat_map(|tag| didl_fragments(didl, tag))
            .map(|fragment| ContentItem::from(extract_fields_lossy(fragment, ITEM_SCHEMA)))
            .filter(|item| !item.is_empty())
            .collect()),
        ParseMode::Structured => {
            let root = parse_element(didl)?;
            if root.name != "DIDL-Lite" {
                return Err(ParseError::InvalidXmlStructure(format!(
                    "expected DIDL-Lite root, found <{}>",
                    root.name
                )));
            }
            let containers = child_elements(&root).filter(|e| e.name == "container");
            let items = child_elements(&root).filter(|e| e.name == "item");
            Ok(containers.chain(items).map(item_from_element).collect())
        }
    }
}

/// Balanced `<tag ...>…</tag>` spans of `text`, in document order.
///
/// Prefixes are not interpreted. An unterminated trailing span is ignored.
pub fn didl_fragments<'a>(text: &'a str, tag: &str) -> Vec<&'a str> {
    let open = format!("<{}", tag);
    let close = format!("</{}>", tag);
    let mut fragments = Vec::new();
    let mut offset = 0;

    while let Some(pos) = text[offset..].find(&open) {
        let start = offset + pos;
        let after_name = start + open.len();
        match text[after_name..].chars().next() {
            Some(ch) if ch == '>' || ch == '/' || ch.is_whitespace() => {}
            _ => {
                offset = after_name;
                continue;
            }
        }

        let Some(tag_end) = text[after_name..].find('>').map(|p| after_name + p) else {
            break;
        };
        if text[..tag_end].ends_with('/') {
            fragments.push(&text[start..=tag_end]);
            offset = tag_end + 1;
            continue;
        }

        let Some(end) = text[tag_end..].find(&close).map(|p| tag_end + p + close.len()) else {
            break;
        };
        fragments.push(&text[start..end]);
        offset = end;
    }

    fragments
}

fn item_from_element(element: &Element) -> ContentItem {
    extract_fields(element, ITEM_SCHEMA).into()
}

fn close_fragment(fragment: &str) -> Option<String> {
    let name: String = fragment
        .strip_prefix('<')?
        .chars()
        .take_while(|ch| !(ch.is_whitespace() || *ch == '>' || *ch == '/'))
        .collect();
    if name.is_empty() {
        return None;
    }
    Some(format!("{}</{}>", fragment, name))
}
