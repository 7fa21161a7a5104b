//! Integration tests for DIDL-Lite item parsing

use std::collections::BTreeMap;

use dlna_parser::{parse_item, ContentItem, ParseMode};
use proptest::prelude::*;
use rstest::rstest;

const ITEM_ATTRIBUTES: &[&str] = &["id", "parentID", "childCount"];
const RES_ATTRIBUTES: &[&str] = &["protocolInfo", "resolution", "duration", "size"];
const ELEMENTS: &[(&str, &str)] = &[
    ("dc:title", "title"),
    ("dc:date", "date"),
    ("upnp:class", "class"),
    ("upnp:album", "album"),
    ("pv:extension", "extension"),
    ("pv:modificationTime", "modificationTime"),
    ("pv:addedTime", "addedTime"),
    ("pv:lastUpdated", "lastUpdated"),
];

fn all_keys() -> Vec<&'static str> {
    ITEM_ATTRIBUTES
        .iter()
        .chain(RES_ATTRIBUTES)
        .copied()
        .chain(ELEMENTS.iter().map(|(_, key)| *key))
        .chain(std::iter::once("res"))
        .collect()
}

/// Render an `<item>` fragment carrying exactly `fields`.
fn render_item(fields: &BTreeMap<&str, String>) -> String {
    let mut out = String::from("<item");
    for name in ITEM_ATTRIBUTES {
        if let Some(value) = fields.get(name) {
            out.push_str(&format!(" {}=\"{}\"", name, value));
        }
    }
    out.push_str(" restricted=\"1\">");

    for (qualified, key) in ELEMENTS {
        if let Some(value) = fields.get(key) {
            out.push_str(&format!("<{q}>{v}</{q}>", q = qualified, v = value));
        }
    }

    let res_attrs: String = RES_ATTRIBUTES
        .iter()
        .filter_map(|name| fields.get(name).map(|v| format!(" {}=\"{}\"", name, v)))
        .collect();
    match fields.get("res") {
        Some(url) => out.push_str(&format!("<res{}>{}</res>", res_attrs, url)),
        None if !res_attrs.is_empty() => out.push_str(&format!("<res{}/>", res_attrs)),
        None => {}
    }

    out.push_str("</item>");
    out
}

fn subset_strategy() -> impl Strategy<Value = BTreeMap<&'static str, String>> {
    let keys = all_keys();
    let len = keys.len();
    (
        proptest::sample::subsequence(keys, 0..=len),
        proptest::collection::vec("[A-Za-z0-9_.:/$-]{1,16}", len),
    )
        .prop_map(|(keys, values)| keys.into_iter().zip(values).collect())
}

proptest! {
    #[test]
    fn prop_parse_item_returns_exactly_the_subset(fields in subset_strategy()) {
        let fragment = render_item(&fields);
        let item = parse_item(&fragment, ParseMode::Structured).unwrap();

        let parsed: BTreeMap<&str, String> =
            item.iter().map(|(k, v)| (k, v.to_string())).collect();
        prop_assert_eq!(parsed, fields.clone());
    }

    #[test]
    fn prop_parse_item_is_idempotent(fields in subset_strategy()) {
        let fragment = render_item(&fields);
        for mode in [ParseMode::Structured, ParseMode::Legacy] {
            let first = parse_item(&fragment, mode).unwrap();
            let second = parse_item(&fragment, mode).unwrap();
            prop_assert_eq!(first, second);
        }
    }

    #[test]
    fn prop_legacy_agrees_on_token_values(fields in subset_strategy()) {
        let fragment = render_item(&fields);
        let structured = parse_item(&fragment, ParseMode::Structured).unwrap();
        let legacy = parse_item(&fragment, ParseMode::Legacy).unwrap();
        prop_assert_eq!(structured, legacy);
    }
}

#[rstest]
#[case("http://192.168.1.20:8200/MediaItems/22.flac")]
#[case("http://[fe80::1]:9000/disk/music/O0$1$8I2.mp3")]
#[case("https://media.local/v/clip.mkv?profile=hd")]
fn test_res_is_a_valid_url(#[case] url: &str) {
    let fragment = format!(
        r#"<item id="1"><res protocolInfo="http-get:*:video/x-matroska:*">{}</res></item>"#,
        url
    );
    let item = parse_item(&fragment, ParseMode::Structured).unwrap();
    let res = item.res().expect("res extracted");
    assert!(url::Url::parse(res).is_ok(), "{} is not a URL", res);
}

#[test]
fn test_escaped_res_url_is_unescaped() {
    let fragment = r#"<item id="1"><res>http://h/stream?a=1&amp;b=2</res></item>"#;
    let item = parse_item(fragment, ParseMode::Structured).unwrap();
    assert_eq!(item.res(), Some("http://h/stream?a=1&b=2"));
}

#[test]
fn test_whitespace_values_fail_gracefully_in_legacy_mode() {
    let fragment = r#"<item id="9" parentID="4"><dc:title>Kind of Blue</dc:title><upnp:album>Kind of Blue</upnp:album><upnp:class>object.item.audioItem</upnp:class></item>"#;

    let legacy = parse_item(fragment, ParseMode::Legacy).unwrap();
    let expected: ContentItem = [("id", "9"), ("parentID", "4"), ("class", "object.item.audioItem")]
        .into_iter()
        .collect();
    assert_eq!(legacy, expected);

    let structured = parse_item(fragment, ParseMode::Structured).unwrap();
    assert_eq!(structured.title(), Some("Kind of Blue"));
    assert_eq!(structured.get("album"), Some("Kind of Blue"));
}
