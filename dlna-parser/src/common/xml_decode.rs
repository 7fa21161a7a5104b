//! XML decoding helpers.
//!
//! UPnP servers are inconsistent about namespace prefixes: the same DIDL
//! element shows up as `dc:title`, `ns0:title` or with an undeclared prefix
//! inside a fragment that was cut out of its `DIDL-Lite` root. Everything in
//! this crate therefore matches on local names, and text handed to a strict
//! XML parser goes through [`strip_namespaces`] first.

use std::iter::Peekable;
use std::str::Chars;

use serde::de::DeserializeOwned;
use xmltree::Element;

use crate::error::{ParseError, ParseResult};

/// Deserialize `xml` into `T` with quick-xml after stripping namespace prefixes.
pub fn parse<T: DeserializeOwned>(xml: &str) -> ParseResult<T> {
    let stripped = strip_namespaces(xml);
    quick_xml::de::from_str(&stripped)
        .map_err(|e| ParseError::XmlDeserializationFailed(e.to_string()))
}

/// Build an element tree from `xml` after stripping namespace prefixes.
pub fn parse_element(xml: &str) -> ParseResult<Element> {
    let stripped = strip_namespaces(xml);
    Element::parse(stripped.as_bytes()).map_err(|e| ParseError::InvalidXmlStructure(e.to_string()))
}

/// Local part of a possibly prefixed name: `dc:title` becomes `title`.
pub fn local_name(name: &str) -> &str {
    match name.rfind(':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

/// Trimmed text content of an element, `None` when empty.
pub fn element_text(element: &Element) -> Option<String> {
    element
        .get_text()
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Strip namespace prefixes from tag and attribute names and drop `xmlns`
/// declarations.
///
/// # Example
///
/// Input: `<e:propertyset><dc:title>Song</dc:title></e:propertyset>`
/// Output: `<propertyset><title>Song</title></propertyset>`
pub fn strip_namespaces(xml: &str) -> String {
    let mut result = String::with_capacity(xml.len());
    let mut chars = xml.chars().peekable();

    while let Some(c) = chars.next() {
        result.push(c);
        if c != '<' {
            continue;
        }
        let open = result.len() - 1;

        if let Some(slash) = chars.next_if_eq(&'/') {
            result.push(slash);
        }

        // Declarations, comments and processing instructions are copied verbatim
        if matches!(chars.peek(), Some('?') | Some('!')) {
            copy_until(&mut chars, &mut result, '>');
            if result[open..].starts_with("<![CDATA[") {
                while !result.ends_with("]]>") {
                    match chars.next() {
                        Some(ch) => result.push(ch),
                        None => break,
                    }
                }
            }
            continue;
        }

        let tag_name = take_name(&mut chars);
        result.push_str(local_name(&tag_name));

        loop {
            match chars.peek().copied() {
                None => break,
                Some('>') => {
                    result.push('>');
                    chars.next();
                    break;
                }
                Some(ch) if ch == '/' || ch.is_whitespace() => {
                    result.push(ch);
                    chars.next();
                }
                Some(_) => {
                    let attr_name = take_name(&mut chars);
                    if attr_name.is_empty() {
                        // Stray character such as a lone '=': keep it and move on
                        if let Some(ch) = chars.next() {
                            result.push(ch);
                        }
                        continue;
                    }
                    if attr_name.starts_with("xmlns") {
                        skip_attribute_value(&mut chars);
                    } else {
                        result.push_str(local_name(&attr_name));
                        copy_attribute_value(&mut chars, &mut result);
                    }
                }
            }
        }
    }

    result
}

fn take_name(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut name = String::new();
    while let Some(ch) = chars.next_if(|ch| !(ch.is_whitespace() || matches!(ch, '>' | '/' | '='))) {
        name.push(ch);
    }
    name
}

fn copy_until(chars: &mut Peekable<Chars<'_>>, out: &mut String, end: char) {
    for ch in chars.by_ref() {
        out.push(ch);
        if ch == end {
            break;
        }
    }
}

fn copy_attribute_value(chars: &mut Peekable<Chars<'_>>, out: &mut String) {
    while let Some(ch) = chars.next_if(|ch| *ch != '>' && *ch != '/') {
        out.push(ch);
        if ch == '"' || ch == '\'' {
            copy_until(chars, out, ch);
            return;
        }
    }
}

fn skip_attribute_value(chars: &mut Peekable<Chars<'_>>) {
    while chars.next_if(|ch| ch.is_whitespace() || *ch == '=').is_some() {}
    if let Some(quote) = chars.next_if(|ch| *ch == '"' || *ch == '\'') {
        for ch in chars.by_ref() {
            if ch == quote {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_namespaces_basic() {
        let input = r#"<e:propertyset><e:property>test</e:property></e:propertyset>"#;
        let expected = r#"<propertyset><property>test</property></propertyset>"#;
        assert_eq!(strip_namespaces(input), expected);
    }

    #[test]
    fn test_strip_namespaces_with_attributes() {
        let input = r#"<res dlna:profileID="JPEG_TN" size="12">u</res>"#;
        let expected = r#"<res profileID="JPEG_TN" size="12">u</res>"#;
        assert_eq!(strip_namespaces(input), expected);
    }

    #[test]
    fn test_strip_namespaces_drops_xmlns() {
        let input = r#"<DIDL-Lite xmlns="urn:didl" xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:title>A</dc:title></DIDL-Lite>"#;
        let expected = r#"<DIDL-Lite  ><title>A</title></DIDL-Lite>"#;
        assert_eq!(strip_namespaces(input), expected);
    }

    #[test]
    fn test_strip_namespaces_keeps_quoted_gt_and_colon() {
        let input = r#"<item id="a:b>c" parentID="0"/>"#;
        assert_eq!(strip_namespaces(input), input);
    }

    #[test]
    fn test_strip_namespaces_keeps_declaration() {
        let input = r#"<?xml version="1.0"?><s:Body/>"#;
        assert_eq!(strip_namespaces(input), r#"<?xml version="1.0"?><Body/>"#);
    }

    #[test]
    fn test_strip_namespaces_keeps_cdata() {
        let input = r#"<u:Result><![CDATA[<dc:title>a > b</dc:title>]]></u:Result>"#;
        let expected = r#"<Result><![CDATA[<dc:title>a > b</dc:title>]]></Result>"#;
        assert_eq!(strip_namespaces(input), expected);
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name("dc:title"), "title");
        assert_eq!(local_name("title"), "title");
        assert_eq!(local_name("a:b:c"), "c");
    }

    #[test]
    fn test_parse_element_with_undeclared_prefix() {
        let element = parse_element("<item><dc:title> Hello </dc:title></item>").unwrap();
        let title = element.get_child("title").unwrap();
        assert_eq!(element_text(title), Some("Hello".to_string()));
    }

    #[test]
    fn test_parse_with_serde() {
        #[derive(Debug, serde::Deserialize)]
        struct Root {
            title: String,
        }

        let root: Root = parse(r#"<r:root xmlns:r="urn:x"><r:title>T</r:title></r:root>"#).unwrap();
        assert_eq!(root.title, "T");
    }
}
