//! DIDL-Lite listings flattened into application records.
//!
//! DIDL-Lite format example:
//! ```xml
//! <DIDL-Lite xmlns:dc="http://purl.org/dc/elements/1.1/" ...>
//!   <container id="64" parentID="0" childCount="4">
//!     <dc:title>Browse Folders</dc:title>
//!     <upnp:class>object.container.storageFolder</upnp:class>
//!   </container>
//!   <item id="64$0" parentID="64">
//!     <dc:title>Song Title</dc:title>
//!     <dc:creator>Artist Name</dc:creator>
//!     <upnp:album>Album Name</upnp:album>
//!     <res size="4023744" duration="0:03:58">http://host/song.mp3</res>
//!   </item>
//! </DIDL-Lite>
//! ```

use std::collections::HashMap;

use serde::Serialize;

use crate::common::path::{find_sequence, find_text};
use crate::common::tree::{XmlElement, XmlValue};
use crate::services::content_directory::DidlListing;

const CONTAINERS: &str = "DIDL-Lite/0/container";
const ITEMS: &str = "DIDL-Lite/0/item";

/// Destination keys of a flattened record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Class,
    Title,
    Id,
    ParentId,
    Album,
    Artist,
    Genre,
    File,
    FileSize,
    FileDuration,
    Art,
    Icon,
    Description,
    LongDescription,
}

impl ItemField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemField::Class => "class",
            ItemField::Title => "title",
            ItemField::Id => "id",
            ItemField::ParentId => "parentID",
            ItemField::Album => "album",
            ItemField::Artist => "artist",
            ItemField::Genre => "genre",
            ItemField::File => "file",
            ItemField::FileSize => "file_size",
            ItemField::FileDuration => "file_duration",
            ItemField::Art => "art",
            ItemField::Icon => "icon",
            ItemField::Description => "description",
            ItemField::LongDescription => "long_description",
        }
    }
}

/// Source path → destination key, evaluated in order.
///
/// Later rows overwrite earlier rows writing the same key, so `upnp:album`
/// wins over `dc:album` and `upnp:artist` over `dc:creator`.
pub const FIELD_MAP: &[(&str, ItemField)] = &[
    ("upnp:class/0", ItemField::Class),
    ("dc:title/0", ItemField::Title),
    ("$/id", ItemField::Id),
    ("$/parentID", ItemField::ParentId),
    ("dc:album/0", ItemField::Album),
    ("upnp:album/0", ItemField::Album),
    ("dc:creator/0", ItemField::Artist),
    ("upnp:artist/0", ItemField::Artist),
    ("upnp:genre/0", ItemField::Genre),
    ("res/0/_", ItemField::File),
    ("res/0/$/size", ItemField::FileSize),
    ("res/0/$/duration", ItemField::FileDuration),
    ("upnp:albumArtURI/0/_", ItemField::Art),
    ("upnp:icon/0", ItemField::Icon),
    ("dc:description/0", ItemField::Description),
    ("dc:longDescription/0", ItemField::LongDescription),
];

/// One container or item of a listing.
///
/// Fields are present only when the source record carried them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ContentItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "parentID", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub art: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
}

impl ContentItem {
    pub fn get(&self, field: ItemField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    fn slot(&self, field: ItemField) -> &Option<String> {
        match field {
            ItemField::Class => &self.class,
            ItemField::Title => &self.title,
            ItemField::Id => &self.id,
            ItemField::ParentId => &self.parent_id,
            ItemField::Album => &self.album,
            ItemField::Artist => &self.artist,
            ItemField::Genre => &self.genre,
            ItemField::File => &self.file,
            ItemField::FileSize => &self.file_size,
            ItemField::FileDuration => &self.file_duration,
            ItemField::Art => &self.art,
            ItemField::Icon => &self.icon,
            ItemField::Description => &self.description,
            ItemField::LongDescription => &self.long_description,
        }
    }

    fn slot_mut(&mut self, field: ItemField) -> &mut Option<String> {
        match field {
            ItemField::Class => &mut self.class,
            ItemField::Title => &mut self.title,
            ItemField::Id => &mut self.id,
            ItemField::ParentId => &mut self.parent_id,
            ItemField::Album => &mut self.album,
            ItemField::Artist => &mut self.artist,
            ItemField::Genre => &mut self.genre,
            ItemField::File => &mut self.file,
            ItemField::FileSize => &mut self.file_size,
            ItemField::FileDuration => &mut self.file_duration,
            ItemField::Art => &mut self.art,
            ItemField::Icon => &mut self.icon,
            ItemField::Description => &mut self.description,
            ItemField::LongDescription => &mut self.long_description,
        }
    }

    /// `true` for records coming from a `<container>` element
    pub fn is_container(&self) -> bool {
        self.class
            .as_deref()
            .is_some_and(|class| class.starts_with("object.container"))
    }
}

/// Result of a `BrowseDirectChildren` call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrowseResult {
    pub items: Vec<ContentItem>,
    pub num_returned: Option<u32>,
    pub total_matches: Option<u32>,
    pub status: u16,
}

impl BrowseResult {
    pub fn from_listing(listing: &DidlListing) -> Self {
        Self {
            items: flatten_listing(&listing.document),
            num_returned: listing.num_returned,
            total_matches: listing.total_matches,
            status: listing.status,
        }
    }
}

/// Flatten one raw `<container>` or `<item>` record
pub fn flatten_item(record: &XmlValue) -> ContentItem {
    let mut item = ContentItem::default();
    for (path, field) in FIELD_MAP {
        if let Some(value) = find_text(record, path) {
            *item.slot_mut(*field) = Some(value.to_string());
        }
    }
    item
}

/// Raw containers followed by raw items, each group in document order
pub fn records(document: &XmlElement) -> impl Iterator<Item = &XmlValue> {
    find_sequence(document, CONTAINERS)
        .iter()
        .chain(find_sequence(document, ITEMS))
}

/// Flatten a parsed DIDL-Lite document: all containers, then all items
pub fn flatten_listing(document: &XmlElement) -> Vec<ContentItem> {
    records(document).map(flatten_item).collect()
}

/// Index raw records by their `id` attribute.
///
/// A repeated id is logged and the later record replaces the earlier one.
pub fn index_by_id(document: &XmlElement) -> HashMap<String, &XmlValue> {
    let mut index = HashMap::new();
    for record in records(document) {
        let Some(id) = find_text(record, "$/id") else {
            tracing::debug!("skipping DIDL-Lite record without id");
            continue;
        };
        if index.insert(id.to_string(), record).is_some() {
            tracing::warn!(id, "duplicate DIDL-Lite object id, keeping the later record");
        }
    }
    index
}
