use std::collections::BTreeMap;

use serde::Deserialize;
use xmltree::Element;

use crate::common::schema::{child_elements, extract_fields, FieldRule};
use crate::common::xml_decode::{self, element_text};
use crate::error::{ParseError, ParseResult};

/// Fields read from the matching `<service>` block. Matching is by substring
/// of the local name, so vendor spellings such as `X_controlURL` still hit.
pub const SERVICE_SCHEMA: &[FieldRule] = &[
    FieldRule::child_containing("controlURL"),
    FieldRule::child_containing("serviceType"),
    FieldRule::child_containing("serviceId"),
    FieldRule::child_containing("eventSubURL"),
    FieldRule::child_containing("SCPDURL"),
];

#[derive(Debug, Deserialize)]
struct Root {
    device: DeviceInfo,
}

/// Device-level identity from the description's `<device>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    #[serde(default)]
    pub device_type: Option<String>,
    #[serde(default)]
    pub friendly_name: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(rename = "UDN", default)]
    pub udn: Option<String>,
}

impl DeviceInfo {
    /// Parse the root `<device>` element of a description document.
    pub fn from_xml(xml: &str) -> ParseResult<Self> {
        let root: Root = xml_decode::parse(xml)?;
        Ok(root.device)
    }
}

/// The service block of a device description, as raw strings.
///
/// `control_url` is exactly what the document says; turning it into an
/// absolute URL needs the description's own location and is left to the
/// caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEntry {
    pub control_url: String,
    pub service_type: Option<String>,
    pub service_id: Option<String>,
    pub event_sub_url: Option<String>,
    pub scpd_url: Option<String>,
}

impl ServiceEntry {
    fn from_fields(mut fields: BTreeMap<String, String>) -> ParseResult<Self> {
        let control_url = fields
            .remove("controlURL")
            .ok_or_else(|| ParseError::MissingRequiredElement("controlURL".to_string()))?;
        Ok(Self {
            control_url,
            service_type: fields.remove("serviceType"),
            service_id: fields.remove("serviceId"),
            event_sub_url: fields.remove("eventSubURL"),
            scpd_url: fields.remove("SCPDURL"),
        })
    }
}

/// Find the service whose block mentions `service_name` and read its fields.
///
/// The tree is searched depth-first for the first element having a direct
/// child whose text contains `service_name`; that element's children are then
/// matched against [`SERVICE_SCHEMA`]. Returns `Ok(None)` when no block
/// mentions the service and `MissingRequiredElement` when the block has no
/// `controlURL`.
pub fn find_service(xml: &str, service_name: &str) -> ParseResult<Option<ServiceEntry>> {
    let root = xml_decode::parse_element(xml)?;
    match find_block(&root, service_name) {
        Some(block) => ServiceEntry::from_fields(extract_fields(block, SERVICE_SCHEMA)).map(Some),
        None => Ok(None),
    }
}

fn find_block<'a>(element: &'a Element, service_name: &str) -> Option<&'a Element> {
    for child in child_elements(element) {
        if let Some(found) = find_block(child, service_name) {
            return Some(found);
        }
    }
    let mentions = child_elements(element)
        .filter(|child| child_elements(child).next().is_none())
        .filter_map(element_text)
        .any(|text| text.contains(service_name));
    mentions.then_some(element)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEDIA_SERVER: &str = r#"<?xml version="1.0"?>
<root xmlns="urn:schemas-upnp-org:device-1-0" xmlns:dlna="urn:schemas-dlna-org:device-1-0">
  <specVersion><major>1</major><minor>0</minor></specVersion>
  <device>
    <deviceType>urn:schemas-upnp-org:device:MediaServer:1</deviceType>
    <friendlyName>NAS Media</friendlyName>
    <manufacturer>Acme</manufacturer>
    <modelName>Acme DMS</modelName>
    <UDN>uuid:4d696e69-444c-164e-9d41-b827eb000001</UDN>
    <dlna:X_DLNADOC>DMS-1.50</dlna:X_DLNADOC>
    <serviceList>
      <service>
        <serviceType>urn:schemas-upnp-org:service:ConnectionManager:1</serviceType>
        <serviceId>urn:upnp-org:serviceId:ConnectionManager</serviceId>
        <controlURL>/ctl/ConnectionMgr</controlURL>
        <eventSubURL>/evt/ConnectionMgr</eventSubURL>
        <SCPDURL>/ConnectionMgr.xml</SCPDURL>
      </service>
      <service>
        <serviceType>urn:schemas-upnp-org:service:ContentDirectory:1</serviceType>
        <serviceId>urn:upnp-org:serviceId:ContentDirectory</serviceId>
        <controlURL>/ctl/ContentDir</controlURL>
        <eventSubURL>/evt/ContentDir</eventSubURL>
        <SCPDURL>/ContentDir.xml</SCPDURL>
      </service>
    </serviceList>
  </device>
</root>"#;

    #[test]
    fn test_find_content_directory_service() {
        let entry = find_service(MEDIA_SERVER, "ContentDirectory").unwrap().unwrap();

        assert_eq!(entry.control_url, "/ctl/ContentDir");
        assert_eq!(entry.service_type.as_deref(), Some("urn:schemas-upnp-org:service:ContentDirectory:1"));
        assert_eq!(entry.service_id.as_deref(), Some("urn:upnp-org:serviceId:ContentDirectory"));
        assert_eq!(entry.event_sub_url.as_deref(), Some("/evt/ContentDir"));
        assert_eq!(entry.scpd_url.as_deref(), Some("/ContentDir.xml"));
    }

    #[test]
    fn test_service_absent() {
        assert_eq!(find_service(MEDIA_SERVER, "AVTransport").unwrap(), None);
    }

    #[test]
    fn test_service_without_control_url() {
        let xml = "<root><device><serviceList><service><serviceType>urn:x:ContentDirectory:1</serviceType></service></serviceList></device></root>";
        assert_eq!(
            find_service(xml, "ContentDirectory"),
            Err(ParseError::MissingRequiredElement("controlURL".to_string()))
        );
    }

    #[test]
    fn test_prefixed_service_elements() {
        let xml = r#"<u:root xmlns:u="urn:schemas-upnp-org:device-1-0"><u:device><u:serviceList><u:service><u:serviceType>urn:schemas-upnp-org:service:ContentDirectory:1</u:serviceType><u:controlURL>cd/control</u:controlURL></u:service></u:serviceList></u:device></u:root>"#;
        let entry = find_service(xml, "ContentDirectory").unwrap().unwrap();
        assert_eq!(entry.control_url, "cd/control");
        assert_eq!(entry.service_id, None);
    }

    #[test]
    fn test_device_info() {
        let info = DeviceInfo::from_xml(MEDIA_SERVER).unwrap();
        assert_eq!(info.friendly_name.as_deref(), Some("NAS Media"));
        assert_eq!(info.manufacturer.as_deref(), Some("Acme"));
        assert_eq!(info.model_name.as_deref(), Some("Acme DMS"));
        assert_eq!(info.udn.as_deref(), Some("uuid:4d696e69-444c-164e-9d41-b827eb000001"));
        assert_eq!(info.device_type.as_deref(), Some("urn:schemas-upnp-org:device:MediaServer:1"));
    }

    #[test]
    fn test_device_info_rejects_non_description() {
        assert!(DeviceInfo::from_xml("<invalid>not a device</invalid>").is_err());
    }
}
