//! ContentDirectory `Browse` responses.
//!
//! The `Result` field of a `BrowseResponse` is itself an escaped DIDL-Lite
//! document. Parsing therefore runs twice: once over the SOAP envelope and
//! once over the text of `Result`, whose parsed form replaces the string in
//! the returned envelope.

use serde::Serialize;

use crate::common::path::{find_path, find_text};
use crate::common::tree::{parse_document, XmlElement, XmlValue};
use crate::error::{ParseError, ParseResult};

/// Namespace a `BrowseResponse` must declare for its `Result` to be parsed
pub const CONTENT_DIRECTORY_SCHEMA: &str = "urn:schemas-upnp-org:service:ContentDirectory:1";

const BROWSE_RESPONSE: &str = "s:Envelope/0/s:Body/0/u:BrowseResponse/0";
const RESULT: &str = "s:Envelope/0/s:Body/0/u:BrowseResponse/0/Result/0";
const RESPONSE_NAMESPACE: &str = "s:Envelope/0/s:Body/0/u:BrowseResponse/0/$/xmlns:u";
const NUMBER_RETURNED: &str = "s:Envelope/0/s:Body/0/u:BrowseResponse/0/NumberReturned/0";
const TOTAL_MATCHES: &str = "s:Envelope/0/s:Body/0/u:BrowseResponse/0/TotalMatches/0";

/// Steps from the document down to the `Result` occurrence
const RESULT_STEPS: [&str; 4] = ["s:Envelope", "s:Body", "u:BrowseResponse", "Result"];

/// Parsed DIDL-Lite document together with the paging context of the
/// response it came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DidlListing {
    pub document: XmlElement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_returned: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_matches: Option<u32>,
    pub status: u16,
}

/// A parsed response body
#[derive(Debug, Clone, PartialEq)]
pub struct BrowseEnvelope {
    pub status: u16,
    /// Whole normalized body; `Result` already replaced by its parsed form
    /// when the schema was recognized
    pub document: XmlElement,
    /// Present only when the body held a resolved `BrowseResponse/Result`
    pub listing: Option<DidlListing>,
}

impl BrowseEnvelope {
    /// `true` when the body was a `BrowseResponse` at all
    pub fn is_browse_response(&self) -> bool {
        find_path(&self.document, BROWSE_RESPONSE).is_some()
    }
}

/// Parse the body of a `Browse` call.
///
/// Only a 200 response is parsed; any other status yields
/// [`ParseError::UnexpectedStatus`] without touching the body.
pub fn parse_browse_response(status: u16, body: &str) -> ParseResult<BrowseEnvelope> {
    if status != 200 {
        return Err(ParseError::UnexpectedStatus(status));
    }

    let document = resolve_result(parse_document(body)?)?;
    let listing = extract_listing(&document, status);

    Ok(BrowseEnvelope {
        status,
        document,
        listing,
    })
}

/// Replace the escaped `Result` text by its parsed DIDL-Lite document.
///
/// Returns the envelope unchanged when there is no textual `Result` or when
/// the response namespace is not [`CONTENT_DIRECTORY_SCHEMA`].
pub fn resolve_result(mut envelope: XmlElement) -> ParseResult<XmlElement> {
    let Some(raw) = result_text(&envelope) else {
        return Ok(envelope);
    };

    match find_text(&envelope, RESPONSE_NAMESPACE) {
        Some(CONTENT_DIRECTORY_SCHEMA) => {}
        namespace => {
            tracing::warn!(
                namespace = namespace.unwrap_or("<none>"),
                "unrecognized BrowseResponse namespace, leaving Result unparsed"
            );
            return Ok(envelope);
        }
    }

    let didl = parse_document(&raw)?;
    if let Some(slot) = result_slot(&mut envelope) {
        *slot = XmlValue::Element(didl);
    }
    Ok(envelope)
}

fn result_text(envelope: &XmlElement) -> Option<String> {
    match find_path(envelope, RESULT)? {
        crate::common::path::Node::Text(text) if !text.is_empty() => Some(text.to_string()),
        _ => None,
    }
}

fn result_slot(envelope: &mut XmlElement) -> Option<&mut XmlValue> {
    let (last, parents) = RESULT_STEPS.split_last()?;
    let mut element = envelope;
    for step in parents {
        element = element.children_mut(step)?.first_mut()?.as_element_mut()?;
    }
    element.children_mut(last)?.first_mut()
}

fn extract_listing(envelope: &XmlElement, status: u16) -> Option<DidlListing> {
    let document = find_path(envelope, RESULT)?.element()?.clone();

    Some(DidlListing {
        document,
        num_returned: parse_count(envelope, NUMBER_RETURNED),
        total_matches: parse_count(envelope, TOTAL_MATCHES),
        status,
    })
}

fn parse_count(envelope: &XmlElement, path: &str) -> Option<u32> {
    let raw = find_text(envelope, path)?;
    match raw.trim().parse() {
        Ok(count) => Some(count),
        Err(_) => {
            tracing::debug!(path, raw, "ignoring non-numeric paging field");
            None
        }
    }
}
