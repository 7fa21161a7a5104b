//! Builders for SOAP Browse responses served by mock servers

#![allow(dead_code)]

use mockito::{Matcher, Mock, ServerGuard};
use quick_xml::escape::escape;

pub const SERVICE_TYPE: &str = "urn:schemas-upnp-org:service:ContentDirectory:1";
pub const CONTROL_PATH: &str = "/ctl/ContentDir";

/// `<container>` fragment
pub fn container(id: &str, parent_id: &str, title: &str, child_count: u32) -> String {
    format!(
        r#"<container id="{}" parentID="{}" childCount="{}" restricted="1"><dc:title>{}</dc:title><upnp:class>object.container.storageFolder</upnp:class></container>"#,
        id, parent_id, child_count, title
    )
}

/// `<item>` fragment for an audio track
pub fn item(id: &str, parent_id: &str, title: &str) -> String {
    format!(
        r#"<item id="{id}" parentID="{parent}" restricted="1"><dc:title>{title}</dc:title><upnp:class>object.item.audioItem.musicTrack</upnp:class><res protocolInfo="http-get:*:audio/mpeg:*" size="4194304" duration="0:03:12.000">http://192.168.1.20:8200/MediaItems/{id}.mp3</res></item>"#,
        id = id,
        parent = parent_id,
        title = title
    )
}

/// Items `first..first + count` of container `parent_id`
pub fn items(parent_id: &str, first: usize, count: usize) -> Vec<String> {
    (first..first + count)
        .map(|n| item(&format!("{}-{}", parent_id, n), parent_id, &format!("Track{}", n)))
        .collect()
}

/// Wrap fragments in a DIDL-Lite document
pub fn didl(fragments: &[String]) -> String {
    format!(
        r#"<DIDL-Lite xmlns="urn:schemas-upnp-org:metadata-1-0/DIDL-Lite/" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:upnp="urn:schemas-upnp-org:metadata-1-0/upnp/">{}</DIDL-Lite>"#,
        fragments.concat()
    )
}

/// A complete `BrowseResponse` envelope
pub fn browse_response(fragments: &[String], returned: u32, total: u32) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/" s:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/">
  <s:Body>
    <u:BrowseResponse xmlns:u="{}">
      <Result>{}</Result>
      <NumberReturned>{}</NumberReturned>
      <TotalMatches>{}</TotalMatches>
      <UpdateID>1</UpdateID>
    </u:BrowseResponse>
  </s:Body>
</s:Envelope>"#,
        SERVICE_TYPE,
        escape(&didl(fragments)),
        returned,
        total
    )
}

/// Mock answering Browse of `object_id` at `start_index`, expected once
pub fn mock_page(
    server: &mut ServerGuard,
    object_id: &str,
    start_index: u32,
    fragments: &[String],
    returned: u32,
    total: u32,
) -> Mock {
    server
        .mock("POST", CONTROL_PATH)
        .match_header("soapaction", format!("\"{}#Browse\"", SERVICE_TYPE).as_str())
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(format!("<ObjectID>{}</ObjectID>", object_id)),
            Matcher::Regex(format!("<StartingIndex>{}</StartingIndex>", start_index)),
            Matcher::Regex("<BrowseFlag>BrowseDirectChildren</BrowseFlag>".to_string()),
            Matcher::Regex("<RequestedCount>0</RequestedCount>".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "text/xml; charset=\"utf-8\"")
        .with_body(browse_response(fragments, returned, total))
        .expect(1)
        .create()
}
