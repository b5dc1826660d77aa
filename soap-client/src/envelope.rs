//! SOAP envelope construction for the ContentDirectory `Browse` action.

use std::fmt;
use std::str::FromStr;

use quick_xml::escape::escape;

/// SOAP action of ContentDirectory:1 `Browse`
pub const CONTENT_DIRECTORY_BROWSE: &str = "urn:schemas-upnp-org:service:ContentDirectory:1#Browse";

/// Selects children listing versus single-object metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrowseFlag {
    #[default]
    DirectChildren,
    Metadata,
}

impl BrowseFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowseFlag::DirectChildren => "BrowseDirectChildren",
            BrowseFlag::Metadata => "BrowseMetadata",
        }
    }
}

impl fmt::Display for BrowseFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrowseFlag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BrowseDirectChildren" => Ok(BrowseFlag::DirectChildren),
            "BrowseMetadata" => Ok(BrowseFlag::Metadata),
            other => Err(format!("unknown browse flag: {}", other)),
        }
    }
}

/// Arguments of a single `Browse` call
#[derive(Debug, Clone, PartialEq)]
pub struct BrowseRequest {
    /// Full SOAP action, `<serviceTypeURN>#Browse`
    pub action: String,
    /// Object to browse, `"0"` is the root container
    pub object_id: String,
    pub browse_flag: BrowseFlag,
    pub starting_index: u32,
    /// `0` asks the server for everything it is willing to return
    pub requested_count: u32,
}

impl Default for BrowseRequest {
    fn default() -> Self {
        Self {
            action: CONTENT_DIRECTORY_BROWSE.to_string(),
            object_id: "0".to_string(),
            browse_flag: BrowseFlag::default(),
            starting_index: 0,
            requested_count: 0,
        }
    }
}

impl BrowseRequest {
    /// Children of `object_id`
    pub fn children(object_id: impl Into<String>) -> Self {
        Self {
            object_id: object_id.into(),
            ..Default::default()
        }
    }

    /// Metadata of `object_id` itself
    pub fn metadata(object_id: impl Into<String>) -> Self {
        Self {
            object_id: object_id.into(),
            browse_flag: BrowseFlag::Metadata,
            ..Default::default()
        }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    pub fn with_range(mut self, starting_index: u32, requested_count: u32) -> Self {
        self.starting_index = starting_index;
        self.requested_count = requested_count;
        self
    }

    /// Service type URN the action belongs to
    pub fn service_urn(&self) -> &str {
        service_urn(&self.action)
    }
}

/// Strip a trailing `#fragment` from a SOAP action.
///
/// `urn:schemas-upnp-org:service:ContentDirectory:1#Browse` becomes
/// `urn:schemas-upnp-org:service:ContentDirectory:1`.
pub fn service_urn(action: &str) -> &str {
    match action.rfind('#') {
        Some(pos) if pos + 1 < action.len() => &action[..pos],
        _ => action,
    }
}

/// Build the SOAP 1.1 body of a `Browse` request.
pub fn build_browse_envelope(request: &BrowseRequest) -> String {
    format!(
        r#"<?xml version="1.0"?>
<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/" s:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/">
  <s:Body>
    <u:Browse xmlns:u="{service_urn}">
      <ObjectID>{object_id}</ObjectID>
      <BrowseFlag>{browse_flag}</BrowseFlag>
      <Filter>*</Filter>
      <StartingIndex>{starting_index}</StartingIndex>
      <RequestedCount>{requested_count}</RequestedCount>
      <SortCriteria></SortCriteria>
    </u:Browse>
  </s:Body>
</s:Envelope>"#,
        service_urn = escape(request.service_urn()),
        object_id = escape(&request.object_id),
        browse_flag = request.browse_flag,
        starting_index = request.starting_index,
        requested_count = request.requested_count,
    )
}
