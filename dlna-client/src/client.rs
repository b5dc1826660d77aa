//! MediaServerClient - entry point for browsing media servers
//!
//! Every operation is a blocking call on the current thread. Multi-device
//! operations visit devices one after the other.

use std::collections::BTreeMap;
use std::sync::Arc;

use dlna_discovery::{DeviceDescriptor, DiscoveryConfig};
use dlna_parser::{
    flatten_item, index_by_id, parse_browse_response, summarize_xml, BrowseResult, ContentItem,
    DidlListing, MediaServerInfo, ParseError, XmlElement, CONTENT_DIRECTORY_SCHEMA,
};
use serde::Serialize;
use soap_client::{BrowseFlag, BrowseRequest, HttpMethod, HttpResponse, SoapClient};
use url::Url;

use crate::{ApiError, ClientConfig, Result};

/// Discovery step used by [`MediaServerClient::discover_devices`]
pub type DiscoverFn = dyn Fn(&DiscoveryConfig) -> dlna_discovery::Result<BTreeMap<String, DeviceDescriptor>>
    + Send
    + Sync;

/// A summarized device description plus where it was found
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    #[serde(flatten)]
    pub info: MediaServerInfo,
    pub desc_url: String,
    /// Set when the device was found by discovery
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_url: Option<String>,
    /// Absolute ContentDirectory control URL, when the service is published
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_directory_url: Option<String>,
}

/// Outcome of [`MediaServerClient::raw_request`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawResponse {
    /// The body held a `BrowseResponse` whose `Result` was resolved
    Listing(DidlListing),
    /// Any other 200 body, normalized
    Document { status: u16, document: XmlElement },
}

/// Client for UPnP ContentDirectory servers
///
/// # Example
///
/// ```rust,no_run
/// use dlna_client::MediaServerClient;
///
/// let client = MediaServerClient::new();
/// for (name, device) in client.fetch_device_info(None)? {
///     if let Some(control_url) = &device.content_directory_url {
///         let root = client.browse_content(control_url, "0", 0, 0)?;
///         println!("{}: {} entries", name, root.items.len());
///     }
/// }
/// # Ok::<(), dlna_client::ApiError>(())
/// ```
#[derive(Clone)]
pub struct MediaServerClient {
    soap_client: SoapClient,
    config: ClientConfig,
    discover: Arc<DiscoverFn>,
}

impl std::fmt::Debug for MediaServerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaServerClient")
            .field("soap_client", &self.soap_client)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for MediaServerClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaServerClient {
    /// Client with default configuration, discovering over SSDP
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Self {
        let soap_client = SoapClient::with_config(&config.transport);
        Self::with_soap_client(soap_client, config)
    }

    /// Use a caller-built SOAP client (custom transport, tests)
    pub fn with_soap_client(soap_client: SoapClient, config: ClientConfig) -> Self {
        Self {
            soap_client,
            config,
            discover: Arc::new(dlna_discovery::discover),
        }
    }

    /// Replace the discovery step
    pub fn with_discovery<F>(mut self, discover: F) -> Self
    where
        F: Fn(&DiscoveryConfig) -> dlna_discovery::Result<BTreeMap<String, DeviceDescriptor>>
            + Send
            + Sync
            + 'static,
    {
        self.discover = Arc::new(discover);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Run one discovery window, keyed by descriptor URL
    pub fn discover_devices(&self) -> Result<BTreeMap<String, DeviceDescriptor>> {
        let devices = (self.discover)(&self.config.discovery)?;
        tracing::debug!(devices = devices.len(), "discovery finished");
        Ok(devices)
    }

    /// Summarize device descriptions, keyed by friendly name.
    ///
    /// With `Some(url)` only that descriptor is fetched. With `None` a
    /// discovery window runs first and every device found is fetched in
    /// turn. The first failure aborts the whole call.
    pub fn fetch_device_info(&self, desc_url: Option<&str>) -> Result<BTreeMap<String, DeviceInfo>> {
        let targets: Vec<(String, Option<String>)> = match desc_url {
            Some(url) => vec![(url.to_string(), None)],
            None => self
                .discover_devices()?
                .into_values()
                .map(|device| (device.desc_url, Some(device.root_url)))
                .collect(),
        };

        let mut devices = BTreeMap::new();
        for (desc_url, root_url) in targets {
            let device = self.fetch_description(&desc_url, root_url)?;
            if devices.contains_key(&device.info.name) {
                tracing::warn!(
                    name = %device.info.name,
                    desc_url = %device.desc_url,
                    "two devices share a friendly name, keeping the later one"
                );
            }
            devices.insert(device.info.name.clone(), device);
        }

        Ok(devices)
    }

    /// Fetch and summarize a single device description
    pub fn fetch_description(&self, desc_url: &str, root_url: Option<String>) -> Result<DeviceInfo> {
        let base = Url::parse(desc_url).map_err(|e| ApiError::invalid_url(desc_url, e))?;
        let response = self.soap_client.get(base.as_str())?;
        let info = summarize_xml(&response.body)?;

        let content_directory_url = match info
            .service(CONTENT_DIRECTORY_SCHEMA)
            .and_then(|service| service.control_url.as_deref())
        {
            Some(control_url) => Some(resolve_control_url(&base, control_url)?),
            None => None,
        };

        tracing::debug!(name = %info.name, desc_url, "fetched device description");

        Ok(DeviceInfo {
            info,
            desc_url: desc_url.to_string(),
            root_url,
            content_directory_url,
        })
    }

    /// List the direct children of `object_id`
    pub fn browse_content(
        &self,
        control_url: &str,
        object_id: &str,
        starting_index: u32,
        requested_count: u32,
    ) -> Result<BrowseResult> {
        let request = BrowseRequest::children(object_id).with_range(starting_index, requested_count);
        let response = self.soap_client.browse(HttpMethod::Post, control_url, &request)?;
        let listing = listing_of(&response)?;

        Ok(BrowseResult::from_listing(&listing))
    }

    /// Metadata of one object, flattened
    pub fn fetch_metadata(&self, control_url: &str, object_id: &str) -> Result<ContentItem> {
        let request = BrowseRequest::metadata(object_id);
        let response = self.soap_client.browse(HttpMethod::Post, control_url, &request)?;
        let listing = listing_of(&response)?;

        index_by_id(&listing.document)
            .get(object_id)
            .map(|record| flatten_item(record))
            .ok_or_else(|| ApiError::ObjectNotFound(object_id.to_string()))
    }

    /// Send a `Browse` envelope with any method and keep the parsed result
    /// unflattened.
    pub fn raw_request(
        &self,
        method: HttpMethod,
        url: &str,
        object_id: &str,
        browse_flag: BrowseFlag,
        starting_index: u32,
        requested_count: u32,
    ) -> Result<RawResponse> {
        let request = BrowseRequest {
            object_id: object_id.to_string(),
            browse_flag,
            ..BrowseRequest::default()
        }
        .with_range(starting_index, requested_count);

        let response = self.soap_client.browse(method, url, &request)?;
        let envelope = parse_browse_response(response.status, &response.body)?;

        Ok(match envelope.listing {
            Some(listing) => RawResponse::Listing(listing),
            None => RawResponse::Document {
                status: envelope.status,
                document: envelope.document,
            },
        })
    }
}

fn listing_of(response: &HttpResponse) -> Result<DidlListing> {
    parse_browse_response(response.status, &response.body)?
        .listing
        .ok_or_else(|| {
            ApiError::Parse(ParseError::MissingRequiredElement(
                "BrowseResponse/Result".to_string(),
            ))
        })
}

/// Join the origin of the descriptor URL with a published control URL
fn resolve_control_url(desc_url: &Url, control_url: &str) -> Result<String> {
    desc_url
        .join("/")
        .and_then(|origin| origin.join(control_url))
        .map(String::from)
        .map_err(|e| ApiError::invalid_url(control_url, e))
}
