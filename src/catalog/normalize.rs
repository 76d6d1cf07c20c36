//! Body normalization: XML and JSON into [`ApiResponse`].
//!
//! ## XML flattening
//!
//! The XML tree is flattened into the shape a JSON body would decode to:
//! - the document root is unwrapped, its contents become the top-level value
//! - an element holding only text becomes a `String`; attributes on it are
//!   type hints (`type="integer"`) and are dropped
//! - an element with children, or with attributes and no text, becomes a
//!   `Map`; attributes and child elements share the same key space, stray
//!   text next to children goes under `#text`
//! - repeated child names collect into a `List` in document order
//! - an element with nothing at all becomes an **empty `List`**. Goodreads
//!   sends `<isbn></isbn>` for books without one, so derivation code has to
//!   treat a list where a scalar was expected as "missing".

use std::collections::BTreeMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::response::ApiResponse;
use super::transport::ResponseFormat;

/// Key used for text content of an element that also has attributes or children
pub const TEXT_KEY: &str = "#text";

/// Why a body could not be normalized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ParseError(String);

impl ParseError {
    fn from_display(err: impl std::fmt::Display) -> Self {
        Self(err.to_string())
    }
}

/// Normalize a body according to the format it was requested in
pub fn normalize(body: &str, format: ResponseFormat) -> Result<ApiResponse, ParseError> {
    match format {
        ResponseFormat::Json => from_json(body),
        ResponseFormat::Xml => from_xml(body),
    }
}

pub fn from_json(body: &str) -> Result<ApiResponse, ParseError> {
    serde_json::from_str::<serde_json::Value>(body)
        .map(ApiResponse::from)
        .map_err(ParseError::from_display)
}

/// Element under construction while walking the XML event stream
#[derive(Default)]
struct PendingElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<(String, ApiResponse)>,
    text: String,
}

impl PendingElement {
    fn open(start: &BytesStart<'_>) -> Result<Self, ParseError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(ParseError::from_display)?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(ParseError::from_display)?
                .into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            name,
            attributes,
            ..Default::default()
        })
    }

    /// Append a text fragment; fragments split by child elements keep a space between them
    fn push_text(&mut self, fragment: &str) {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            return;
        }
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(fragment);
    }

    fn into_value(self) -> ApiResponse {
        let text = self.text.trim();

        if self.children.is_empty() {
            if !text.is_empty() {
                return ApiResponse::String(text.to_string());
            }
            if self.attributes.is_empty() {
                return ApiResponse::List(Vec::new());
            }
        }

        let mut map = BTreeMap::new();
        for (key, value) in self.attributes {
            insert_child(&mut map, key, ApiResponse::String(value));
        }
        for (key, value) in self.children {
            insert_child(&mut map, key, value);
        }
        if !text.is_empty() {
            map.insert(TEXT_KEY.to_string(), ApiResponse::String(text.to_string()));
        }
        ApiResponse::Map(map)
    }
}

/// Insert a child, turning repeated names into a list
fn insert_child(map: &mut BTreeMap<String, ApiResponse>, key: String, value: ApiResponse) {
    use std::collections::btree_map::Entry;

    match map.entry(key) {
        Entry::Vacant(slot) => {
            slot.insert(value);
        }
        Entry::Occupied(mut slot) => {
            let existing = slot.get_mut();
            match existing {
                // Elements only ever decode to an empty list, so a longer one is a repeat
                ApiResponse::List(items) if items.len() > 1 => items.push(value),
                _ => {
                    let first = std::mem::replace(existing, ApiResponse::Null);
                    *existing = ApiResponse::List(vec![first, value]);
                }
            }
        }
    }
}

pub fn from_xml(body: &str) -> Result<ApiResponse, ParseError> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<PendingElement> = Vec::new();
    let mut root: Option<ApiResponse> = None;

    loop {
        match reader.read_event().map_err(ParseError::from_display)? {
            Event::Start(start) => stack.push(PendingElement::open(&start)?),
            Event::Empty(start) => {
                let element = PendingElement::open(&start)?;
                close_element(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                if let Some(element) = stack.pop() {
                    close_element(&mut stack, &mut root, element);
                }
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    let text = text.unescape().map_err(ParseError::from_display)?;
                    current.push_text(&text);
                }
            }
            Event::CData(cdata) => {
                if let Some(current) = stack.last_mut() {
                    current.push_text(&String::from_utf8_lossy(&cdata.into_inner()));
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctypes
            _ => {}
        }
    }

    if let Some(unclosed) = stack.last() {
        return Err(ParseError(format!(
            "document ended inside <{}>",
            unclosed.name
        )));
    }

    Ok(root.unwrap_or(ApiResponse::Null))
}

fn close_element(
    stack: &mut [PendingElement],
    root: &mut Option<ApiResponse>,
    element: PendingElement,
) {
    let name = element.name.clone();
    let value = element.into_value();
    match stack.last_mut() {
        Some(parent) => parent.children.push((name, value)),
        // The root element is unwrapped; only the first one counts
        None => {
            root.get_or_insert(value);
        }
    }
}
