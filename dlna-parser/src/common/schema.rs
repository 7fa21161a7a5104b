//! Field schemas for flat record extraction.
//!
//! A schema is an ordered list of [`FieldRule`]s. The same schema can be run
//! against a parsed element tree ([`extract_fields`]) or, for compatibility
//! with servers that emit markup no XML parser accepts, against raw text with
//! the lossy token rules ([`extract_fields_lossy`]).

use std::collections::BTreeMap;

use xmltree::{Element, XMLNode};

use crate::common::xml_decode::{element_text, local_name};

/// Where a field's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    /// Attribute with this local name on the element or, failing that, on the
    /// first descendant carrying it (document order).
    Attribute(&'static str),
    /// Text of the first element (the element itself excluded) whose local name
    /// equals the local part of this possibly prefixed name.
    Element(&'static str),
    /// Text of the first direct child whose local name contains this pattern.
    LocalNameContains(&'static str),
}

/// One output key and the rule that fills it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub key: &'static str,
    pub source: FieldSource,
}

impl FieldRule {
    pub const fn attribute(name: &'static str) -> Self {
        Self { key: name, source: FieldSource::Attribute(name) }
    }

    /// Element rule keyed by the local name: `dc:title` is stored as `title`.
    pub const fn element(qualified: &'static str) -> Self {
        Self { key: const_local_name(qualified), source: FieldSource::Element(qualified) }
    }

    pub const fn child_containing(pattern: &'static str) -> Self {
        Self { key: pattern, source: FieldSource::LocalNameContains(pattern) }
    }
}

const fn const_local_name(name: &'static str) -> &'static str {
    let bytes = name.as_bytes();
    let mut i = bytes.len();
    while i > 0 {
        if bytes[i - 1] == b':' {
            let (_, tail) = bytes.split_at(i);
            return match std::str::from_utf8(tail) {
                Ok(tail) => tail,
                Err(_) => name,
            };
        }
        i -= 1;
    }
    name
}

/// Run `schema` against a parsed element. Rules that find nothing, or find an
/// empty value, contribute no key.
pub fn extract_fields(element: &Element, schema: &[FieldRule]) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    for rule in schema {
        let value = match rule.source {
            FieldSource::Attribute(name) => find_attribute(element, name),
            FieldSource::Element(qualified) => {
                find_descendant(element, local_name(qualified)).and_then(element_text)
            }
            FieldSource::LocalNameContains(pattern) => child_elements(element)
                .find(|child| child.name.contains(pattern))
                .and_then(element_text),
        };
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            fields.insert(rule.key.to_string(), value);
        }
    }
    fields
}

/// Run `schema` against raw markup using whitespace-free token rules.
///
/// A value containing whitespace is treated as absent, so it can never bleed
/// into a neighbouring field. Prefixes are matched literally.
pub fn extract_fields_lossy(text: &str, schema: &[FieldRule]) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    for rule in schema {
        let value = match rule.source {
            FieldSource::Attribute(name) => lossy_attribute(text, name),
            FieldSource::Element(qualified) | FieldSource::LocalNameContains(qualified) => {
                lossy_element(text, qualified)
            }
        };
        if let Some(value) = value {
            fields.insert(rule.key.to_string(), value.to_string());
        }
    }
    fields
}

pub(crate) fn child_elements(element: &Element) -> impl Iterator<Item = &Element> {
    element.children.iter().filter_map(|node| match node {
        XMLNode::Element(child) => Some(child),
        _ => None,
    })
}

fn find_attribute(element: &Element, name: &str) -> Option<String> {
    if let Some(value) = element
        .attributes
        .iter()
        .find(|(key, _)| local_name(key) == name)
        .map(|(_, value)| value.trim().to_string())
    {
        return Some(value);
    }
    child_elements(element).find_map(|child| find_attribute(child, name))
}

fn find_descendant<'a>(element: &'a Element, name: &str) -> Option<&'a Element> {
    for child in child_elements(element) {
        if child.name == name {
            return Some(child);
        }
        if let Some(found) = find_descendant(child, name) {
            return Some(found);
        }
    }
    None
}

fn is_token(value: &str) -> bool {
    !value.is_empty() && !value.chars().any(char::is_whitespace)
}

fn lossy_attribute<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!("{}=\"", name);
    let mut offset = 0;
    while let Some(pos) = text[offset..].find(&needle) {
        let start = offset + pos;
        let value_start = start + needle.len();
        offset = value_start;

        let preceded_by_space = text[..start].chars().next_back().map_or(false, char::is_whitespace);
        if !preceded_by_space {
            continue;
        }
        let Some(len) = text[value_start..].find('"') else {
            return None;
        };
        let value = &text[value_start..value_start + len];
        if is_token(value) {
            return Some(value);
        }
    }
    None
}

fn lossy_element<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    let open = format!("<{}", name);
    let close = format!("</{}>", name);
    let mut offset = 0;
    while let Some(pos) = text[offset..].find(&open) {
        let after_name = offset + pos + open.len();
        offset = after_name;

        match text[after_name..].chars().next() {
            Some('>') => {}
            Some(ch) if ch.is_whitespace() => {}
            _ => continue,
        }
        let content_start = after_name + text[after_name..].find('>')? + 1;
        let content_len = text[content_start..].find(&close)?;
        let value = &text[content_start..content_start + content_len];
        if is_token(value) {
            return Some(value);
        }
    }
    None
}
