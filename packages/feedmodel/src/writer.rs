//! Serialization of a [`Feed`] back to Atom XML.
//!
//! The feed is first lowered to an [`XmlElement`] tree, then written with
//! quick-xml. Prefixes stored on extension elements are reused when they
//! are free in the current scope; otherwise a fresh `nsN` prefix is
//! declared on the element that needs it.

use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::config::{Dialect, ATOM_NS, BATCH_NS, GD_NS, GEORSS_NS, GPHOTO_NS, XML_NS};
use crate::entry::{Entry, EntryVariant};
use crate::error::{FeedError, Result};
use crate::extension::ExtensionStore;
use crate::feed::Feed;
use crate::types::{BatchOperation, Category, Generator, Link, Person, PublishControl, TextConstruct};
use crate::xml::{QName, XmlElement, XmlNode};

/// Write a feed as an XML document.
///
/// # Errors
/// Returns an error if writing to `out` fails.
pub fn to_xml<W: Write>(feed: &Feed, out: W) -> Result<()> {
    let root = feed_element(feed);
    let mut writer = DocumentWriter::new(out);
    writer.write_document(&root, &root_namespaces(feed.dialect()))
}

/// Write a feed as an XML string.
///
/// # Examples
/// ```
/// use feedmodel::{writer, Feed};
///
/// let mut feed = Feed::new();
/// feed.set_identifier(Some("urn:example".to_string()));
/// let xml = writer::to_xml_string(&feed).unwrap();
/// assert!(xml.contains("<id>urn:example</id>"));
/// ```
pub fn to_xml_string(feed: &Feed) -> Result<String> {
    let mut buffer = Vec::new();
    to_xml(feed, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| FeedError::Encoding(e.utf8_error()))
}

/// Prefixes declared on the feed element.
fn root_namespaces(dialect: Dialect) -> Vec<(Option<&'static str>, &'static str)> {
    vec![
        (None, ATOM_NS),
        (Some("gd"), GD_NS),
        (Some("openSearch"), dialect.opensearch_ns()),
        (Some("app"), dialect.app_ns()),
        (Some("batch"), BATCH_NS),
        (Some("georss"), GEORSS_NS),
        (Some("gphoto"), GPHOTO_NS),
    ]
}

// Lowering typed values to elements

fn atom(local: &str) -> XmlElement {
    XmlElement::new(QName::new(ATOM_NS, local))
}

fn text_child(element: XmlElement, text: &str) -> XmlElement {
    if text.is_empty() {
        element
    } else {
        element.with_text(text)
    }
}

fn with_optional(element: XmlElement, local: &str, value: Option<&str>) -> XmlElement {
    match value {
        Some(value) => element.with_attribute(QName::local(local), value),
        None => element,
    }
}

fn text_element(local: &str, text: &TextConstruct) -> XmlElement {
    let mut element = with_optional(atom(local), "type", text.text_type.as_deref());
    if let Some(lang) = &text.lang {
        element = element.with_attribute(QName::new(XML_NS, "lang"), lang);
    }
    if text.markup.is_empty() {
        text_child(element, &text.text)
    } else {
        element.children.extend(text.markup.iter().cloned());
        element
    }
}

fn simple_element(local: &str, text: &str) -> XmlElement {
    text_child(atom(local), text)
}

fn link_element(link: &Link) -> XmlElement {
    let mut element = with_optional(atom("link"), "rel", link.rel.as_deref())
        .with_attribute(QName::local("href"), &link.href);
    element = with_optional(element, "type", link.link_type.as_deref());
    element = with_optional(element, "title", link.title.as_deref());
    element = with_optional(element, "hreflang", link.hreflang.as_deref());
    if let Some(length) = link.length {
        element = element.with_attribute(QName::local("length"), length.to_string());
    }
    with_extensions(element, &link.extensions)
}

fn person_element(local: &str, person: &Person) -> XmlElement {
    let mut element = atom(local).with_child(simple_element("name", &person.name));
    if let Some(uri) = &person.uri {
        element = element.with_child(simple_element("uri", uri));
    }
    if let Some(email) = &person.email {
        element = element.with_child(simple_element("email", email));
    }
    with_extensions(element, &person.extensions)
}

fn category_element(category: &Category) -> XmlElement {
    let element = with_optional(atom("category"), "scheme", category.scheme.as_deref())
        .with_attribute(QName::local("term"), &category.term);
    let element = with_optional(element, "label", category.label.as_deref());
    with_extensions(element, &category.extensions)
}

fn generator_element(generator: &Generator) -> XmlElement {
    let element = with_optional(atom("generator"), "version", generator.version.as_deref());
    let element = with_optional(element, "uri", generator.uri.as_deref());
    text_child(element, &generator.name)
}

fn control_element(control: &PublishControl, dialect: Dialect) -> XmlElement {
    let mut element = XmlElement::new(QName::new(dialect.app_ns(), "control")).with_prefix("app");
    if control.draft {
        element = element.with_child(
            XmlElement::new(QName::new(dialect.app_ns(), "draft"))
                .with_prefix("app")
                .with_text("yes"),
        );
    }
    with_extensions(element, &control.extensions)
}

fn batch_element(operation: &BatchOperation) -> XmlElement {
    XmlElement::new(QName::new(BATCH_NS, "operation"))
        .with_prefix("batch")
        .with_attribute(QName::local("type"), &operation.operation)
}

fn etag_attribute(element: XmlElement, etag: Option<&str>) -> XmlElement {
    match etag {
        Some(etag) => element.with_attribute(QName::new(GD_NS, "etag"), etag),
        None => element,
    }
}

/// Copy extension attributes onto `element` and append extension elements.
fn with_extensions(mut element: XmlElement, extensions: &ExtensionStore) -> XmlElement {
    for (name, value) in extensions.attributes() {
        element = element.with_attribute(name.clone(), value);
    }
    for extension in extensions.elements() {
        element = element.with_child(extension.clone());
    }
    element
}

fn push_all<'a, T: 'a>(
    mut element: XmlElement,
    items: impl IntoIterator<Item = &'a T>,
    lower: impl Fn(&T) -> XmlElement,
) -> XmlElement {
    for item in items {
        element = element.with_child(lower(item));
    }
    element
}

fn variant_elements(variant: &EntryVariant) -> Vec<XmlElement> {
    match variant {
        EntryVariant::Generic => Vec::new(),
        EntryVariant::Event(details) => {
            let times = details.times.iter().map(|time| {
                let element = XmlElement::new(QName::new(GD_NS, "when")).with_prefix("gd");
                let start = Some(time.start.as_str()).filter(|s| !s.is_empty());
                let element = with_optional(element, "startTime", start);
                let element = with_optional(element, "endTime", time.end.as_deref());
                with_extensions(element, &time.extensions)
            });
            let places = details.places.iter().map(|place| {
                let element = XmlElement::new(QName::new(GD_NS, "where")).with_prefix("gd");
                let element = with_optional(element, "valueString", place.value_string.as_deref());
                with_extensions(element, &place.extensions)
            });
            times.chain(places).collect()
        }
        EntryVariant::Location(details) => details
            .point
            .map(|(latitude, longitude)| {
                XmlElement::new(QName::new(GEORSS_NS, "point"))
                    .with_prefix("georss")
                    .with_text(format!("{latitude} {longitude}"))
            })
            .into_iter()
            .collect(),
        EntryVariant::Photo(details) => {
            let photo = |local: &str, text: String| {
                XmlElement::new(QName::new(GPHOTO_NS, local))
                    .with_prefix("gphoto")
                    .with_text(text)
            };
            let mut elements = Vec::new();
            if let Some(id) = &details.photo_id {
                elements.push(photo("id", id.clone()));
            }
            if let Some(width) = details.width {
                elements.push(photo("width", width.to_string()));
            }
            if let Some(height) = details.height {
                elements.push(photo("height", height.to_string()));
            }
            elements
        }
    }
}

/// Lower an entry to its `atom:entry` element.
#[must_use]
pub fn entry_element(entry: &Entry) -> XmlElement {
    let mut element = etag_attribute(atom("entry"), entry.etag.as_deref());

    if let Some(identifier) = &entry.identifier {
        element = element.with_child(simple_element("id", identifier));
    }
    if let Some(title) = &entry.title {
        element = element.with_child(text_element("title", title));
    }
    if let Some(summary) = &entry.summary {
        element = element.with_child(text_element("summary", summary));
    }
    if let Some(content) = &entry.content {
        element = element.with_child(text_element("content", content));
    }
    if let Some(published) = entry.published {
        element = element.with_child(simple_element("published", &published.to_rfc3339()));
    }
    if let Some(updated) = entry.updated {
        element = element.with_child(simple_element("updated", &updated.to_rfc3339()));
    }
    element = push_all(element, &entry.links, link_element);
    element = push_all(element, &entry.authors, |p| person_element("author", p));
    element = push_all(element, &entry.contributors, |p| person_element("contributor", p));
    element = push_all(element, &entry.categories, category_element);
    if let Some(operation) = &entry.batch_operation {
        element = element.with_child(batch_element(operation));
    }
    for child in variant_elements(&entry.variant) {
        element = element.with_child(child);
    }

    with_extensions(element, &entry.extensions)
}

/// Lower a feed to its `atom:feed` element, entries included.
#[must_use]
pub fn feed_element(feed: &Feed) -> XmlElement {
    let mut element = etag_attribute(atom("feed"), feed.etag());

    if let Some(identifier) = feed.identifier() {
        element = element.with_child(simple_element("id", identifier));
    }
    if let Some(title) = feed.title() {
        element = element.with_child(text_element("title", title));
    }
    if let Some(subtitle) = feed.subtitle() {
        element = element.with_child(text_element("subtitle", subtitle));
    }
    if let Some(rights) = feed.rights() {
        element = element.with_child(text_element("rights", rights));
    }
    if let Some(updated) = feed.updated() {
        element = element.with_child(simple_element("updated", &updated.to_rfc3339()));
    }
    if let Some(icon) = feed.icon() {
        element = element.with_child(simple_element("icon", icon));
    }
    if let Some(logo) = feed.logo() {
        element = element.with_child(simple_element("logo", logo));
    }
    if let Some(generator) = feed.generator() {
        element = element.with_child(generator_element(generator));
    }
    element = push_all(element, feed.links(), link_element);
    element = push_all(element, feed.authors(), |p| person_element("author", p));
    element = push_all(element, feed.contributors(), |p| person_element("contributor", p));
    element = push_all(element, feed.categories(), category_element);
    if let Some(control) = feed.publish_control() {
        element = element.with_child(control_element(control, feed.dialect()));
    }
    if let Some(operation) = feed.batch_operation() {
        element = element.with_child(batch_element(operation));
    }

    element = with_extensions(element, feed.extensions());
    push_all(element, feed.entries(), entry_element)
}

// Namespace-aware element writer

struct Binding {
    prefix: Option<String>,
    namespace: String,
}

/// Stack of in-scope namespace declarations.
#[derive(Default)]
struct NamespaceScopes {
    bindings: Vec<Binding>,
    frames: Vec<usize>,
}

impl NamespaceScopes {
    fn push(&mut self) {
        self.frames.push(self.bindings.len());
    }

    fn pop(&mut self) {
        if let Some(len) = self.frames.pop() {
            self.bindings.truncate(len);
        }
    }

    fn bind(&mut self, prefix: Option<&str>, namespace: &str) {
        self.bindings.push(Binding {
            prefix: prefix.map(str::to_string),
            namespace: namespace.to_string(),
        });
    }

    /// Namespace currently bound to `prefix` (`None` is the default namespace).
    fn namespace_of(&self, prefix: Option<&str>) -> Option<&str> {
        self.bindings
            .iter()
            .rev()
            .find(|b| b.prefix.as_deref() == prefix)
            .map(|b| b.namespace.as_str())
    }

    /// A prefix currently bound to `namespace` and not shadowed.
    fn prefix_of(&self, namespace: &str, allow_default: bool) -> Option<Option<String>> {
        self.bindings
            .iter()
            .rev()
            .filter(|b| b.namespace == namespace)
            .filter(|b| allow_default || b.prefix.is_some())
            .find(|b| self.namespace_of(b.prefix.as_deref()) == Some(namespace))
            .map(|b| b.prefix.clone())
    }
}

struct DocumentWriter<W: Write> {
    writer: Writer<W>,
    scopes: NamespaceScopes,
    generated: usize,
}

fn qualified(prefix: Option<&str>, local: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}:{local}"),
        None => local.to_string(),
    }
}

fn declaration_key(prefix: Option<&str>) -> String {
    match prefix {
        Some(prefix) => format!("xmlns:{prefix}"),
        None => "xmlns".to_string(),
    }
}

impl<W: Write> DocumentWriter<W> {
    fn new(out: W) -> Self {
        Self {
            writer: Writer::new(out),
            scopes: NamespaceScopes::default(),
            generated: 0,
        }
    }

    fn write_document(
        &mut self,
        root: &XmlElement,
        predeclared: &[(Option<&str>, &str)],
    ) -> Result<()> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        self.write_element(root, predeclared)
    }

    /// Pick a prefix for `namespace`, declaring it in the current frame.
    fn declare(
        &mut self,
        namespace: &str,
        hint: Option<&str>,
        declarations: &mut Vec<(String, String)>,
    ) -> String {
        let usable = |p: &&str| {
            !p.is_empty() && !p.to_ascii_lowercase().starts_with("xml")
        };
        let prefix = match hint.filter(usable) {
            Some(hint) if self.scopes.namespace_of(Some(hint)).is_none() => hint.to_string(),
            _ => loop {
                let candidate = format!("ns{}", self.generated);
                self.generated += 1;
                if self.scopes.namespace_of(Some(candidate.as_str())).is_none() {
                    break candidate;
                }
            },
        };
        self.scopes.bind(Some(prefix.as_str()), namespace);
        declarations.push((declaration_key(Some(prefix.as_str())), namespace.to_string()));
        prefix
    }

    fn element_name(
        &mut self,
        name: &QName,
        hint: Option<&str>,
        declarations: &mut Vec<(String, String)>,
    ) -> String {
        match name.namespace.as_deref() {
            None => {
                // Un-namespaced elements must not inherit the Atom default
                if self.scopes.namespace_of(None).is_some_and(|ns| !ns.is_empty()) {
                    self.scopes.bind(None, "");
                    declarations.push((declaration_key(None), String::new()));
                }
                name.local.clone()
            }
            Some(namespace) => match self.scopes.prefix_of(namespace, true) {
                Some(prefix) => qualified(prefix.as_deref(), &name.local),
                None => {
                    let prefix = self.declare(namespace, hint, declarations);
                    qualified(Some(prefix.as_str()), &name.local)
                }
            },
        }
    }

    fn attribute_name(
        &mut self,
        name: &QName,
        hint: Option<&str>,
        declarations: &mut Vec<(String, String)>,
    ) -> String {
        match name.namespace.as_deref() {
            None => name.local.clone(),
            Some(XML_NS) => qualified(Some("xml"), &name.local),
            Some(namespace) => match self.scopes.prefix_of(namespace, false) {
                Some(prefix) => qualified(prefix.as_deref(), &name.local),
                None => {
                    let prefix = self.declare(namespace, hint, declarations);
                    qualified(Some(prefix.as_str()), &name.local)
                }
            },
        }
    }

    fn write_element(
        &mut self,
        element: &XmlElement,
        predeclared: &[(Option<&str>, &str)],
    ) -> Result<()> {
        self.scopes.push();

        let mut declarations = Vec::new();
        for (prefix, namespace) in predeclared {
            self.scopes.bind(*prefix, namespace);
            declarations.push((declaration_key(*prefix), (*namespace).to_string()));
        }

        let name = self.element_name(&element.name, element.prefix.as_deref(), &mut declarations);
        let mut attributes = Vec::with_capacity(element.attributes.len());
        for attribute in &element.attributes {
            let key = self.attribute_name(
                &attribute.name,
                attribute.prefix.as_deref(),
                &mut declarations,
            );
            attributes.push((key, attribute.value.as_str()));
        }

        let mut start = BytesStart::new(name.as_str());
        for (key, namespace) in &declarations {
            start.push_attribute((key.as_str(), namespace.as_str()));
        }
        for (key, value) in &attributes {
            start.push_attribute((key.as_str(), *value));
        }

        if element.children.is_empty() {
            self.writer.write_event(Event::Empty(start))?;
        } else {
            self.writer.write_event(Event::Start(start))?;
            for child in &element.children {
                match child {
                    XmlNode::Element(child) => self.write_element(child, &[])?,
                    XmlNode::Text(text) => {
                        self.writer.write_event(Event::Text(BytesText::new(text)))?;
                    }
                }
            }
            self.writer
                .write_event(Event::End(BytesEnd::new(name.as_str())))?;
        }

        self.scopes.pop();
        Ok(())
    }
}
