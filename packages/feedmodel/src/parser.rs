//! Feed parser that walks an Atom document into a [`Feed`].

use roxmltree::{Document, Node};

use crate::config::{dialect_for, is_app_ns, is_opensearch_ns, Dialect, ATOM_NS, BATCH_NS, GD_NS};
use crate::entry::{default_registry, EntrySelection, EntryTypeRegistry};
use crate::error::{FeedError, Result};
use crate::feed::Feed;
use crate::types::{BatchOperation, Category, Generator, Link, Person, PublishControl, TextConstruct};
use crate::xml::{element_children, get_namespace, get_tag_name, get_text, parse_date, XmlElement};

/// State shared with entry constructors while a document is parsed.
#[derive(Debug, Clone, Copy)]
pub struct ParseContext {
    /// Dialect selected by the caller's service version.
    pub dialect: Dialect,
}

impl ParseContext {
    #[must_use]
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }
}

/// Parser turning feed documents into [`Feed`] values.
///
/// Holds a borrowed registry, so many parsers on many threads can share
/// one registry.
#[derive(Debug, Clone, Copy)]
pub struct FeedParser<'r> {
    registry: &'r EntryTypeRegistry,
    entry_selection: EntrySelection,
}

impl Default for FeedParser<'static> {
    fn default() -> Self {
        Self::new(default_registry())
    }
}

impl<'r> FeedParser<'r> {
    /// Create a parser using the given registry for entry kinds.
    #[must_use]
    pub fn new(registry: &'r EntryTypeRegistry) -> Self {
        Self {
            registry,
            entry_selection: EntrySelection::UseRegistry,
        }
    }

    /// Fix the entry constructor instead of resolving kinds.
    #[must_use]
    pub fn with_entry_selection(mut self, selection: EntrySelection) -> Self {
        self.entry_selection = selection;
        self
    }

    /// Get a reference to the underlying registry.
    #[must_use]
    pub fn registry(&self) -> &'r EntryTypeRegistry {
        self.registry
    }

    /// Parse feed bytes.
    ///
    /// # Arguments
    /// * `bytes` - UTF-8 encoded XML document
    /// * `service_version` - Optional version hint selecting the namespace dialect
    ///
    /// # Errors
    /// Returns an error for invalid versions, non-UTF-8 input, malformed XML
    /// or a root element other than `atom:feed`. No partial feed is returned.
    pub fn parse(&self, bytes: &[u8], service_version: Option<&str>) -> Result<Feed> {
        let dialect = dialect_for(service_version)?;
        let text = std::str::from_utf8(bytes)?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let doc = Document::parse(text)?;
        self.parse_document(&doc, dialect)
    }

    /// Parse an already built document tree.
    pub fn parse_document(&self, doc: &Document<'_>, dialect: Dialect) -> Result<Feed> {
        let root = doc.root_element();
        if get_namespace(root) != Some(ATOM_NS) || get_tag_name(root) != "feed" {
            return Err(FeedError::UnexpectedRoot {
                found: get_tag_name(root).to_string(),
                namespace: get_namespace(root).map(str::to_string),
            });
        }

        let context = ParseContext::new(dialect);
        let mut feed = Feed::new();
        feed.set_dialect(dialect);
        feed.set_entry_selection(self.entry_selection);

        for attr in root.attributes() {
            match (attr.namespace(), attr.name()) {
                (Some(GD_NS), "etag") => feed.set_etag(Some(attr.value().to_string())),
                _ => feed.extensions_mut().add_xml_attribute(&attr),
            }
        }

        for child in element_children(root) {
            self.parse_child(&mut feed, child, &context)?;
        }

        tracing::debug!(
            id = feed.identifier().unwrap_or_default(),
            entries = feed.entries().len(),
            extensions = feed.extensions().len(),
            "Parsed feed"
        );

        Ok(feed)
    }

    /// Route one child of the feed element to a typed field or the
    /// extension store.
    ///
    /// Single-valued fields take the first occurrence; repeats are kept in
    /// the extension store.
    fn parse_child(&self, feed: &mut Feed, child: Node<'_, '_>, context: &ParseContext) -> Result<()> {
        let name = get_tag_name(child);

        match get_namespace(child) {
            Some(ATOM_NS) => match name {
                "id" if feed.identifier().is_none() => feed.set_identifier(Some(get_text(child))),
                "title" if feed.title().is_none() => {
                    feed.set_title(Some(TextConstruct::from_node(child)));
                }
                "subtitle" if feed.subtitle().is_none() => {
                    feed.set_subtitle(Some(TextConstruct::from_node(child)));
                }
                "rights" if feed.rights().is_none() => {
                    feed.set_rights(Some(TextConstruct::from_node(child)));
                }
                "icon" if feed.icon().is_none() => feed.set_icon(Some(get_text(child))),
                "logo" if feed.logo().is_none() => feed.set_logo(Some(get_text(child))),
                "link" => feed.add_link(Link::from_node(child)),
                "author" => feed.add_author(Person::from_node(child)),
                "contributor" => feed.add_contributor(Person::from_node(child)),
                "category" => feed.add_category(Category::from_node(child)),
                "generator" if feed.generator().is_none() => {
                    feed.set_generator(Some(Generator::from_node(child)));
                }
                "updated" if feed.updated().is_none() => match parse_date(&get_text(child)) {
                    Some(date) => feed.set_updated(Some(date)),
                    None => {
                        tracing::warn!(text = %get_text(child), "Unparseable feed updated date, keeping as extension");
                        feed.extensions_mut().add_element(XmlElement::from_node(child));
                    }
                },
                "entry" => {
                    let entry = self.registry.build(child, self.entry_selection, context)?;
                    feed.push_parsed_entry(entry);
                }
                _ => feed.extensions_mut().add_element(XmlElement::from_node(child)),
            },
            // Paging counters are typed accessors over the extension store
            Some(ns) if is_opensearch_ns(ns) => {
                feed.extensions_mut().add_element(XmlElement::from_node(child));
            }
            Some(ns) if is_app_ns(ns) && name == "control" && feed.publish_control().is_none() => {
                feed.set_publish_control(Some(PublishControl::from_node(child)));
            }
            Some(BATCH_NS) if name == "operation" && feed.batch_operation().is_none() => {
                feed.set_batch_operation(Some(BatchOperation::from_node(child)));
            }
            _ => feed.extensions_mut().add_element(XmlElement::from_node(child)),
        }

        Ok(())
    }
}
