//! End-to-end tests over realistic feed documents.
//!
//! Fixtures cover a GData calendar feed (OpenSearch 1.1), a feed mixing
//! photo, location and unregistered kinds written with the 1.0 namespaces,
//! and a feed full of content the typed model only partly covers.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;

use feedmodel::config::{rel, Dialect, EVENT_KIND, LOCATION_KIND, PHOTO_KIND};
use feedmodel::config::GD_NS;
use feedmodel::entry::{event_entry, EventPlace, EventTime, LocationDetails, PhotoDetails};
use feedmodel::writer::to_xml_string;
use feedmodel::{
    Category, Entry, EntryTypeRegistry, EntryVariant, Feed, FeedError, FeedParser, Link, Person,
    QName, TextConstruct, XmlElement, XmlNode,
};

/// Load fixture file content.
fn load_fixture(name: &str) -> Vec<u8> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read(&path).unwrap_or_else(|e| panic!("Failed to load {}: {}", path.display(), e))
}

fn parse_fixture(name: &str, service_version: Option<&str>) -> Feed {
    Feed::parse(&load_fixture(name), service_version)
        .unwrap_or_else(|e| panic!("Failed to parse {name}: {e}"))
}

fn roundtrip(feed: &Feed, service_version: Option<&str>) -> Feed {
    let xml = to_xml_string(feed).expect("Failed to write feed");
    Feed::parse(xml.as_bytes(), service_version).expect("Failed to reparse written feed")
}

#[test]
fn test_calendar_feed_fields() {
    let feed = parse_fixture("calendar.xml", Some("2.0"));

    assert_eq!(
        feed.identifier(),
        Some("http://www.google.com/calendar/feeds/team%40example.com/private/full")
    );
    assert_eq!(feed.title().map(|t| t.text.as_str()), Some("Team calendar"));
    assert_eq!(
        feed.subtitle().map(|t| t.text.as_str()),
        Some("Meetings and deadlines")
    );
    assert_eq!(feed.etag(), Some("W/\"CkYFQ3cyeCp7ImA9WxJVEU8.\""));
    assert_eq!(
        feed.generator().map(|g| g.name.as_str()),
        Some("Google Calendar")
    );
    assert_eq!(feed.authors()[0].email.as_deref(), Some("team@example.com"));
    assert!(feed.categories()[0].is_kind(EVENT_KIND));
}

#[test]
fn test_calendar_feed_links() {
    let feed = parse_fixture("calendar.xml", None);

    assert!(feed.can_post());
    assert_eq!(
        feed.next_link().map(|l| l.href.as_str()),
        Some("http://www.google.com/calendar/feeds/team/private/full?start-index=3&max-results=2")
    );
    assert_eq!(
        feed.batch_link().map(|l| l.href.as_str()),
        Some("http://www.google.com/calendar/feeds/team/private/full/batch")
    );
    assert_eq!(
        feed.alternate_link().and_then(|l| l.link_type.as_deref()),
        Some("text/html")
    );
    assert!(feed.feed_link().is_some());
    assert!(feed.self_link().is_some());
    assert!(feed.previous_link().is_none());
    assert!(feed.related_link().is_none());
}

#[test]
fn test_calendar_paging_and_extensions() {
    let feed = parse_fixture("calendar.xml", None);

    assert_eq!(feed.total_results(), Some(5));
    assert_eq!(feed.start_index(), Some(1));
    assert_eq!(feed.items_per_page(), Some(2));

    let timezone = QName::new("http://schemas.google.com/gCal/2005", "timezone");
    let element = feed.extensions().first_element(&timezone).unwrap();
    assert_eq!(element.attribute(None, "value"), Some("Europe/Amsterdam"));
    // Three paging counters plus two calendar elements
    assert_eq!(feed.extensions().len(), 5);
}

#[test]
fn test_calendar_event_entries() {
    let feed = parse_fixture("calendar.xml", None);
    assert_eq!(feed.entries().len(), 2);
    assert_eq!(feed.entries_with_category_kind(EVENT_KIND).len(), 2);

    let review = feed
        .entry_for_identifier("http://www.google.com/calendar/feeds/team/private/full/evt1")
        .unwrap();
    let EntryVariant::Event(details) = &review.variant else {
        panic!("expected event, got {:?}", review.variant);
    };
    assert_eq!(
        details.times,
        vec![EventTime::new(
            "2024-05-03T14:00:00.000+02:00",
            Some("2024-05-03T15:00:00.000+02:00")
        )]
    );
    assert_eq!(details.places, vec![EventPlace::new("Room 4")]);
    assert_eq!(review.etag.as_deref(), Some("\"FkkOQgZGeip7ImA6WhVR\""));
    assert_eq!(review.owner(), Some(feed.id()));

    // eventStatus and sequence are not modelled
    let names: Vec<String> = review.extensions.elements().map(|e| e.name.local.clone()).collect();
    assert_eq!(names, vec!["eventStatus", "sequence"]);
}

#[test]
fn test_calendar_roundtrip() {
    let feed = parse_fixture("calendar.xml", None);
    let reparsed = roundtrip(&feed, None);

    assert_eq!(feed.diff(&reparsed), Vec::<&str>::new());
    assert_eq!(reparsed, feed);
    // Excluded from equality but still written
    assert_eq!(reparsed.etag(), feed.etag());
    assert_eq!(reparsed.generator(), feed.generator());
    assert_eq!(reparsed.entries()[0].etag, feed.entries()[0].etag);
}

#[test]
fn test_mixed_feed_variants() {
    let feed = parse_fixture("mixed_v1.xml", Some("1.0"));
    assert_eq!(feed.dialect(), Dialect::V1);

    let variants: Vec<&str> = feed.entries().iter().map(|e| e.variant.name()).collect();
    assert_eq!(variants, vec!["photo", "location", "generic"]);

    assert_eq!(
        feed.entries()[0].variant,
        EntryVariant::Photo(PhotoDetails {
            photo_id: Some("5081".to_string()),
            width: Some(1600),
            height: Some(1200),
        })
    );
    // The photo constructor does not interpret the geotag
    assert_eq!(feed.entries()[0].extensions.len(), 1);
    assert_eq!(
        feed.entries()[1].variant,
        EntryVariant::Location(LocationDetails::at(52.379, 4.9))
    );
    assert_eq!(feed.entries()[2].kind_term(), Some("urn:example:widget"));
    assert_eq!(feed.entries_with_category_kind(PHOTO_KIND).len(), 1);
    assert_eq!(feed.entries_with_category_kind(LOCATION_KIND).len(), 1);
}

#[test]
fn test_mixed_feed_preserves_uninterpreted_content() {
    let feed = parse_fixture("mixed_v1.xml", None);

    // The unparseable date stays an extension instead of failing the parse
    assert!(feed.updated().is_none());
    assert!(feed
        .extensions()
        .contains(&QName::new("http://www.w3.org/2005/Atom", "updated")));
    assert_eq!(feed.total_results(), Some(3));
    assert!(feed.publish_control().is_some_and(|c| c.draft));

    let source = feed
        .extensions()
        .attributes()
        .find(|(name, _)| name.local == "source")
        .map(|(_, value)| value);
    assert_eq!(source, Some("import"));
}

#[test]
fn test_mixed_feed_roundtrip_in_both_dialects() {
    let v1 = parse_fixture("mixed_v1.xml", Some("1.0"));
    assert_eq!(roundtrip(&v1, Some("1.0")), v1);

    let v2 = parse_fixture("mixed_v1.xml", Some("2.0"));
    let reparsed = roundtrip(&v2, Some("2.0"));
    assert_eq!(reparsed, v2);
    assert_eq!(reparsed.total_results(), Some(3));
}

#[test]
fn test_edit_then_roundtrip() {
    let mut feed = parse_fixture("calendar.xml", None);

    let next = feed.next_link().cloned().unwrap();
    assert!(feed.remove_link(&next));
    feed.set_total_results(Some(6));
    feed.add_category(Category::new("urn:example:tags", "team"));
    feed.add_entry(
        Entry::new()
            .with_identifier("urn:example:new")
            .with_title("Planning"),
    )
    .unwrap();
    feed.update_entry(2, |entry| {
        entry.extensions.add_element(
            XmlElement::new(QName::new("urn:example:ext", "priority"))
                .with_prefix("x")
                .with_text("high"),
        );
    })
    .unwrap();

    let reparsed = roundtrip(&feed, None);
    assert_eq!(reparsed, feed);
    assert!(reparsed.next_link().is_none());
    assert_eq!(reparsed.total_results(), Some(6));
    assert_eq!(reparsed.entries().len(), 3);
}

#[test]
fn test_entries_move_between_parsed_feeds() {
    let source = parse_fixture("calendar.xml", None);
    let mut target = parse_fixture("mixed_v1.xml", None);
    let before = target.entries().len();

    let owned = source.entries()[0].clone();
    let err = target.add_entry(owned).unwrap_err();
    assert!(matches!(err, FeedError::EntryOwnership { .. }));
    assert_eq!(target.entries().len(), before);

    target.add_entry_with_entry(&source.entries()[0]);
    assert_eq!(target.entries().len(), before + 1);
    assert_eq!(target.entries()[before], source.entries()[0]);
    assert_eq!(target.entries()[before].owner(), Some(target.id()));
    assert_eq!(source.entries()[0].owner(), Some(source.id()));
}

#[test]
fn test_custom_registry_overrides_kind() {
    let mut registry = EntryTypeRegistry::with_builtin_kinds();
    registry.register("urn:example:widget", event_entry);

    let parser = FeedParser::new(&registry);
    let feed = parser.parse(&load_fixture("mixed_v1.xml"), None).unwrap();
    assert_eq!(feed.entries()[2].variant.name(), "event");

    // The shared default registry is untouched
    let feed = FeedParser::default()
        .parse(&load_fixture("mixed_v1.xml"), None)
        .unwrap();
    assert_eq!(feed.entries()[2].variant.name(), "generic");
}

#[test]
fn test_malformed_document_reports_position() {
    let mut bytes = load_fixture("calendar.xml");
    bytes.truncate(bytes.len() / 2);

    let err = Feed::parse(&bytes, None).unwrap_err();
    assert!(matches!(err, FeedError::XmlParse(_)));
    assert!(err.to_string().contains(':'));
}

#[test]
fn test_parsing_on_many_threads() {
    let bytes = load_fixture("calendar.xml");
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| Feed::parse(&bytes, None).map(|f| f.entries().len())))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), 2);
        }
    });
}

#[test]
fn test_programmatic_feed_roundtrip() {
    let mut feed = Feed::new();
    feed.set_identifier(Some("urn:example:built".to_string()));
    feed.set_title_text("Built in code");
    feed.add_link(Link::new(rel::SELF, "http://example.com/feed"));
    feed.extensions_mut()
        .add_attribute(QName::new("urn:example:ext", "origin"), "api");
    feed.extensions_mut().add_element(
        XmlElement::new(QName::new("urn:example:ext", "meta"))
            .with_attribute(QName::local("k"), "v")
            .with_child(XmlElement::new(QName::local("inner")).with_text("1")),
    );

    let mut place = Entry::with_variant(EntryVariant::Location(LocationDetails::at(-33.5, 151.25)));
    place.categories.push(Category::kind(LOCATION_KIND));
    feed.add_entry(place).unwrap();

    assert_eq!(roundtrip(&feed, None), feed);
}

#[test]
fn test_programmatic_text_is_kept_verbatim() {
    let mut feed = Feed::new();
    feed.set_identifier(Some(" urn:x ".to_string()));
    feed.set_title(Some(TextConstruct::plain("  padded title ")));
    let mut author = Person::new("Ann");
    author.uri = Some(String::new());
    feed.add_author(author);

    let reparsed = roundtrip(&feed, None);
    assert_eq!(feed.diff(&reparsed), Vec::<&str>::new());
    assert_eq!(reparsed.identifier(), Some(" urn:x "));
}

#[test]
fn test_lossless_fixture_roundtrip() {
    let feed = parse_fixture("lossless.xml", None);
    let reparsed = roundtrip(&feed, None);

    assert_eq!(feed.diff(&reparsed), Vec::<&str>::new());
    assert_eq!(reparsed.entries(), feed.entries());
    assert_eq!(feed.clone(), feed);

    // Prefixes picked on the first pass are stable on the second
    assert_eq!(roundtrip(&reparsed, None), feed);
}

#[test]
fn test_lossless_fixture_text_and_repeats() {
    let feed = parse_fixture("lossless.xml", None);

    assert_eq!(feed.identifier(), Some(" urn:example:lossless "));
    assert_eq!(feed.title().map(|t| t.text.as_str()), Some("  padded title "));
    let second = feed
        .extensions()
        .first_element(&QName::new("http://www.w3.org/2005/Atom", "title"))
        .unwrap();
    assert_eq!(second.text(), "second title");

    let note = feed
        .extensions()
        .first_element(&QName::new("urn:example:ext", "note"))
        .unwrap();
    assert_eq!(note.children, vec![XmlNode::Text("ab".to_string())]);

    let plain = feed.extensions().first_element(&QName::local("note")).unwrap();
    assert_eq!(plain.attribute(None, "kind"), Some("plain"));
    assert_eq!(plain.child_elements().next().map(|e| &e.name), Some(&QName::local("inner")));
}

#[test]
fn test_lossless_fixture_leaf_extensions() {
    let feed = parse_fixture("lossless.xml", None);

    let link = feed.self_link().unwrap();
    assert!(link.extensions.contains(&QName::new(GD_NS, "etag")));
    assert!(link.extensions.contains(&QName::new("urn:example:ext", "weight")));
    let enclosure = &feed.links()[1];
    assert_eq!(enclosure.length, None);
    assert!(enclosure.extensions.contains(&QName::local("length")));

    let author = &feed.authors()[0];
    assert_eq!(author.uri.as_deref(), Some(""));
    assert!(author.extensions.contains(&QName::new("urn:example:ext", "role")));
    assert!(feed.categories()[0]
        .extensions
        .contains(&QName::new("urn:example:ext", "extra")));

    let control = feed.publish_control().unwrap();
    assert!(control.draft);
    assert!(control.extensions.contains(&QName::new("urn:example:ext", "schedule")));

    let xml = to_xml_string(&feed).unwrap();
    assert!(xml.contains(r#"gd:etag="W/1""#));
    assert!(xml.contains(r#"length="large""#));
}

#[test]
fn test_lossless_fixture_entries() {
    let feed = parse_fixture("lossless.xml", None);
    let [event, place, photo] = feed.entries() else {
        panic!("expected three entries, got {}", feed.entries().len());
    };

    let content = event.content.as_ref().unwrap();
    assert_eq!(content.text, "Hi there");
    assert!(matches!(&content.markup[..], [XmlNode::Element(div)] if div.name.local == "div"));
    assert_eq!(event.title.as_ref().map(|t| t.text.as_str()), Some("Planning"));
    let EntryVariant::Event(details) = &event.variant else {
        panic!("expected event, got {:?}", event.variant);
    };
    assert!(details.times[0].extensions.contains(&QName::new(GD_NS, "reminder")));
    assert!(details.places[0].extensions.contains(&QName::new(GD_NS, "entryLink")));

    // Neither the NaN point nor the second point is interpreted
    assert_eq!(place.variant, EntryVariant::Location(LocationDetails::at(1.5, 2.5)));
    let points: Vec<String> = place.extensions.elements().map(XmlElement::text).collect();
    assert_eq!(points, vec!["NaN NaN", "3.5 4.5"]);

    assert_eq!(
        photo.variant,
        EntryVariant::Photo(PhotoDetails {
            photo_id: None,
            width: Some(640),
            height: None,
        })
    );
    assert_eq!(photo.extensions.elements().count(), 2);

    let xml = to_xml_string(&feed).unwrap();
    assert!(xml.contains(r#"<gd:reminder minutes="10"/>"#));
    assert!(xml.contains(":b>there</"));
}

#[test]
fn test_update_entry_cannot_smuggle_foreign_entry() {
    let source = parse_fixture("calendar.xml", None);
    let mut target = parse_fixture("mixed_v1.xml", None);

    let foreign = source.entries()[0].clone();
    target.update_entry(0, |entry| *entry = foreign).unwrap();
    assert_eq!(target.entries()[0].owner(), Some(target.id()));
}
