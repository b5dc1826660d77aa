//! UPnP device description summaries.
//!
//! A descriptor lists a root device, optionally nested devices under
//! `deviceList`, and for each of them services and icons. The summary keeps
//! identity fields of the root device and merges services and icons of
//! every device.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::common::path::{find_sequence, find_text};
use crate::common::tree::{parse_document, XmlElement, XmlValue};
use crate::error::{ParseError, ParseResult};

/// One entry of a device's `serviceList`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceRecord {
    #[serde(rename = "serviceType")]
    pub service_type: String,
    #[serde(rename = "serviceId", skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(rename = "controlURL", skip_serializing_if = "Option::is_none")]
    pub control_url: Option<String>,
    #[serde(rename = "eventSubURL", skip_serializing_if = "Option::is_none")]
    pub event_sub_url: Option<String>,
    #[serde(rename = "SCPDURL", skip_serializing_if = "Option::is_none")]
    pub scpd_url: Option<String>,
}

impl ServiceRecord {
    fn from_service(service: &XmlValue) -> Option<Self> {
        Some(Self {
            service_type: find_text(service, "serviceType/0")?.to_string(),
            service_id: owned(find_text(service, "serviceId/0")),
            control_url: owned(find_text(service, "controlURL/0")),
            event_sub_url: owned(find_text(service, "eventSubURL/0")),
            scpd_url: owned(find_text(service, "SCPDURL/0")),
        })
    }
}

/// Summary of a media server descriptor
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaServerInfo {
    pub name: String,
    pub device_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    /// Services of every device, keyed by service type
    pub service_list: BTreeMap<String, ServiceRecord>,
    /// Icon declarations in document order, left in normalized form
    pub icons: Vec<XmlValue>,
}

impl MediaServerInfo {
    pub fn service(&self, service_type: &str) -> Option<&ServiceRecord> {
        self.service_list.get(service_type)
    }
}

/// Summarize a normalized device description document.
///
/// # Errors
///
/// Returns [`ParseError::MissingRequiredElement`] when the document has no
/// `root/device`, or when the first device lacks `friendlyName` or
/// `deviceType`.
pub fn summarize(document: &XmlElement) -> ParseResult<MediaServerInfo> {
    let devices = find_sequence(document, "root/0/device");
    let first = devices
        .first()
        .ok_or_else(|| ParseError::MissingRequiredElement("root/device".to_string()))?;

    let required = |path: &str| {
        find_text(first, path)
            .map(str::to_string)
            .ok_or_else(|| ParseError::MissingRequiredElement(format!("device/{}", path)))
    };

    let mut info = MediaServerInfo {
        name: required("friendlyName/0")?,
        device_type: required("deviceType/0")?,
        model_name: owned(find_text(first, "modelName/0")),
        model_description: owned(find_text(first, "modelDescription/0")),
        model_number: owned(find_text(first, "modelNumber/0")),
        manufacturer: owned(find_text(first, "manufacturer/0")),
        service_list: BTreeMap::new(),
        icons: Vec::new(),
    };

    for device in devices {
        collect_device(device, &mut info);
    }

    Ok(info)
}

/// Parse and summarize a device description in one step
pub fn summarize_xml(xml: &str) -> ParseResult<MediaServerInfo> {
    summarize(&parse_document(xml)?)
}

fn collect_device(device: &XmlValue, info: &mut MediaServerInfo) {
    for service_list in find_sequence(device, "serviceList") {
        for service in find_sequence(service_list, "service") {
            let Some(record) = ServiceRecord::from_service(service) else {
                tracing::debug!("skipping service entry without serviceType");
                continue;
            };
            if info.service_list.contains_key(&record.service_type) {
                tracing::warn!(
                    service_type = %record.service_type,
                    device = %info.name,
                    "duplicate service type in device description, keeping the later entry"
                );
            }
            info.service_list.insert(record.service_type.clone(), record);
        }
    }

    for icon_list in find_sequence(device, "iconList") {
        info.icons
            .extend(find_sequence(icon_list, "icon").iter().cloned());
    }

    for device_list in find_sequence(device, "deviceList") {
        for embedded in find_sequence(device_list, "device") {
            collect_device(embedded, info);
        }
    }
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}
