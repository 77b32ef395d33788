//! Built-in entry variants and their constructors.

use roxmltree::Node;

use super::{Entry, EntryVariant};
use crate::config::{GD_NS, GEORSS_NS, GPHOTO_NS};
use crate::error::Result;
use crate::extension::ExtensionStore;
use crate::parser::ParseContext;
use crate::xml::{element_children, get_text, has_only_text, is_element_ns};

/// A `gd:when` element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventTime {
    /// Start as written: a date or a date-time.
    pub start: String,
    pub end: Option<String>,
    /// Attributes other than the start and end, and all child elements
    /// (reminders and the like).
    pub extensions: ExtensionStore,
}

impl EventTime {
    #[must_use]
    pub fn new(start: impl Into<String>, end: Option<&str>) -> Self {
        Self {
            start: start.into(),
            end: end.map(str::to_string),
            extensions: ExtensionStore::new(),
        }
    }

    fn from_node(node: Node<'_, '_>) -> Self {
        let mut time = Self::default();
        for attr in node.attributes() {
            match (attr.namespace(), attr.name()) {
                (None, "startTime") => time.start = attr.value().to_string(),
                (None, "endTime") => time.end = Some(attr.value().to_string()),
                _ => time.extensions.add_xml_attribute(&attr),
            }
        }
        for child in element_children(node) {
            time.extensions.add_node(child);
        }
        time
    }
}

/// A `gd:where` element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventPlace {
    pub value_string: Option<String>,
    /// Attributes other than `valueString` (`rel`, `label`) and child
    /// elements such as `gd:entryLink`.
    pub extensions: ExtensionStore,
}

impl EventPlace {
    #[must_use]
    pub fn new(value_string: impl Into<String>) -> Self {
        Self {
            value_string: Some(value_string.into()),
            extensions: ExtensionStore::new(),
        }
    }

    fn from_node(node: Node<'_, '_>) -> Self {
        let mut place = Self::default();
        for attr in node.attributes() {
            match (attr.namespace(), attr.name()) {
                (None, "valueString") => place.value_string = Some(attr.value().to_string()),
                _ => place.extensions.add_xml_attribute(&attr),
            }
        }
        for child in element_children(node) {
            place.extensions.add_node(child);
        }
        place
    }
}

/// Calendar event data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventDetails {
    pub times: Vec<EventTime>,
    pub places: Vec<EventPlace>,
}

impl EventDetails {
    fn from_node(node: Node<'_, '_>) -> Self {
        let mut details = Self::default();
        for child in element_children(node) {
            if is_element_ns(child, GD_NS, "when") {
                details.times.push(EventTime::from_node(child));
            } else if is_element_ns(child, GD_NS, "where") {
                details.places.push(EventPlace::from_node(child));
            }
        }
        details
    }

    fn claims(node: Node<'_, '_>) -> bool {
        is_element_ns(node, GD_NS, "when") || is_element_ns(node, GD_NS, "where")
    }
}

/// Geotag data from `georss:point`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LocationDetails {
    /// Latitude and longitude in degrees.
    pub point: Option<(f64, f64)>,
}

impl LocationDetails {
    #[must_use]
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            point: Some((latitude, longitude)),
        }
    }

    fn from_node(node: Node<'_, '_>) -> Self {
        let point = element_children(node)
            .find(|c| Self::claims(*c))
            .and_then(|c| parse_point(&get_text(c)));
        Self { point }
    }

    fn is_point(node: Node<'_, '_>) -> bool {
        is_element_ns(node, GEORSS_NS, "point")
            && has_only_text(node)
            && parse_point(&get_text(node)).is_some()
    }

    /// Only the first well-formed point is claimed; anything else stays an
    /// extension.
    fn claims(node: Node<'_, '_>) -> bool {
        Self::is_point(node) && !earlier_siblings(node).any(Self::is_point)
    }
}

/// Parse a `"lat lon"` pair of finite numbers.
fn parse_point(text: &str) -> Option<(f64, f64)> {
    let mut parts = text.split_whitespace();
    let latitude: f64 = parts.next()?.parse().ok()?;
    let longitude: f64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || !latitude.is_finite() || !longitude.is_finite() {
        return None;
    }
    Some((latitude, longitude))
}

fn earlier_siblings<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    std::iter::successors(node.prev_sibling_element(), |n| n.prev_sibling_element())
}

/// Photo data from the `gphoto` namespace.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PhotoDetails {
    pub photo_id: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl PhotoDetails {
    fn from_node(node: Node<'_, '_>) -> Self {
        let mut details = Self::default();
        for child in element_children(node).filter(|c| Self::claims(*c)) {
            let text = get_text(child);
            match child.tag_name().name() {
                "id" => details.photo_id = Some(text),
                "width" => details.width = text.trim().parse().ok(),
                "height" => details.height = text.trim().parse().ok(),
                _ => {}
            }
        }
        details
    }

    fn is_field(node: Node<'_, '_>) -> bool {
        if !has_only_text(node) {
            return false;
        }
        if is_element_ns(node, GPHOTO_NS, "id") {
            return true;
        }
        (is_element_ns(node, GPHOTO_NS, "width") || is_element_ns(node, GPHOTO_NS, "height"))
            && get_text(node).trim().parse::<u32>().is_ok()
    }

    /// The first usable `id`, `width` and `height` are claimed; repeats and
    /// unparseable sizes stay extensions.
    fn claims(node: Node<'_, '_>) -> bool {
        Self::is_field(node)
            && !earlier_siblings(node)
                .any(|s| Self::is_field(s) && s.tag_name().name() == node.tag_name().name())
    }
}

/// Constructor for event entries.
pub fn event_entry(node: Node<'_, '_>, context: &ParseContext) -> Result<Entry> {
    let mut entry = Entry::parse_common(node, context, EventDetails::claims);
    entry.variant = EntryVariant::Event(EventDetails::from_node(node));
    Ok(entry)
}

/// Constructor for geotagged entries.
pub fn location_entry(node: Node<'_, '_>, context: &ParseContext) -> Result<Entry> {
    let mut entry = Entry::parse_common(node, context, LocationDetails::claims);
    entry.variant = EntryVariant::Location(LocationDetails::from_node(node));
    Ok(entry)
}

/// Constructor for photo entries.
pub fn photo_entry(node: Node<'_, '_>, context: &ParseContext) -> Result<Entry> {
    let mut entry = Entry::parse_common(node, context, PhotoDetails::claims);
    entry.variant = EntryVariant::Photo(PhotoDetails::from_node(node));
    Ok(entry)
}
