//! Feed entries and their kind-specific variants.
//!
//! An entry's concrete variant is chosen once, when the entry element is
//! parsed, by the [`EntryTypeRegistry`]. Entries remember which feed owns
//! them only through an opaque [`FeedId`] token.

mod registry;
mod variants;

use chrono::{DateTime, FixedOffset};
use roxmltree::Node;

use crate::config::{ATOM_NS, BATCH_NS, GD_NS, KIND_SCHEME};
use crate::error::Result;
use crate::extension::ExtensionStore;
use crate::feed::FeedId;
use crate::links::LinkIndex;
use crate::parser::ParseContext;
use crate::types::{BatchOperation, Category, Link, Person, TextConstruct};
use crate::xml::{element_children, get_namespace, get_tag_name, get_text, parse_date};

pub use registry::{default_registry, EntryConstructor, EntrySelection, EntryTypeRegistry};
pub use variants::{
    event_entry, location_entry, photo_entry, EventDetails, EventPlace, EventTime, LocationDetails,
    PhotoDetails,
};

/// Kind-specific part of an entry.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EntryVariant {
    /// No kind-specific data. Used for unregistered or missing kinds.
    #[default]
    Generic,
    Event(EventDetails),
    Location(LocationDetails),
    Photo(PhotoDetails),
}

impl EntryVariant {
    /// Short name of the variant.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Event(_) => "event",
            Self::Location(_) => "location",
            Self::Photo(_) => "photo",
        }
    }
}

/// One entry of a feed.
#[derive(Debug, Clone, Default)]
pub struct Entry {
    pub identifier: Option<String>,
    pub title: Option<TextConstruct>,
    pub summary: Option<TextConstruct>,
    pub content: Option<TextConstruct>,
    pub published: Option<DateTime<FixedOffset>>,
    pub updated: Option<DateTime<FixedOffset>>,
    pub links: Vec<Link>,
    pub authors: Vec<Person>,
    pub contributors: Vec<Person>,
    pub categories: Vec<Category>,

    /// `gd:etag` of the entry. Not part of equality.
    pub etag: Option<String>,

    pub batch_operation: Option<BatchOperation>,
    pub extensions: ExtensionStore,
    pub variant: EntryVariant,

    owner: Option<FeedId>,
}

/// Equality covers document content only: the owner token and etag are
/// ignored.
impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier
            && self.title == other.title
            && self.summary == other.summary
            && self.content == other.content
            && self.published == other.published
            && self.updated == other.updated
            && self.links == other.links
            && self.authors == other.authors
            && self.contributors == other.contributors
            && self.categories == other.categories
            && self.batch_operation == other.batch_operation
            && self.extensions == other.extensions
            && self.variant == other.variant
    }
}

impl Entry {
    /// Create an empty generic entry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty entry of the given variant.
    #[must_use]
    pub fn with_variant(variant: EntryVariant) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(TextConstruct::plain(title));
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.categories.push(category);
        self
    }

    /// Feed currently owning this entry, if any.
    #[must_use]
    pub fn owner(&self) -> Option<FeedId> {
        self.owner
    }

    #[must_use]
    pub fn is_owned(&self) -> bool {
        self.owner.is_some()
    }

    pub(crate) fn set_owner(&mut self, owner: Option<FeedId>) {
        self.owner = owner;
    }

    /// Deep copy with no owner, suitable for attaching to another feed.
    #[must_use]
    pub fn detached_copy(&self) -> Self {
        let mut copy = self.clone();
        copy.owner = None;
        copy
    }

    /// Term of the first kind-scheme category, if any.
    #[must_use]
    pub fn kind_term(&self) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.scheme.as_deref() == Some(KIND_SCHEME))
            .map(|c| c.term.as_str())
    }

    /// Whether the entry carries a kind category with this term.
    #[must_use]
    pub fn has_kind(&self, term: &str) -> bool {
        self.categories.iter().any(|c| c.is_kind(term))
    }

    /// Relation lookups over this entry's links.
    #[must_use]
    pub fn link_index(&self) -> LinkIndex<'_> {
        LinkIndex::new(&self.links)
    }

    /// Parse the common Atom entry fields.
    ///
    /// Children for which `claimed` returns true are skipped so a variant
    /// constructor can interpret them without duplicating them in the
    /// extension store. Single-valued fields take the first occurrence and
    /// repeats become extensions.
    pub(crate) fn parse_common(
        node: Node<'_, '_>,
        _context: &ParseContext,
        claimed: fn(Node<'_, '_>) -> bool,
    ) -> Self {
        let mut entry = Entry::new();

        for attr in node.attributes() {
            match (attr.namespace(), attr.name()) {
                (Some(GD_NS), "etag") => entry.etag = Some(attr.value().to_string()),
                _ => entry.extensions.add_xml_attribute(&attr),
            }
        }

        for child in element_children(node) {
            if claimed(child) {
                continue;
            }

            let handled = match (get_namespace(child), get_tag_name(child)) {
                (Some(ATOM_NS), "id") if entry.identifier.is_none() => {
                    entry.identifier = Some(get_text(child));
                    true
                }
                (Some(ATOM_NS), "title") if entry.title.is_none() => {
                    entry.title = Some(TextConstruct::from_node(child));
                    true
                }
                (Some(ATOM_NS), "summary") if entry.summary.is_none() => {
                    entry.summary = Some(TextConstruct::from_node(child));
                    true
                }
                // Out-of-line content has no text construct form
                (Some(ATOM_NS), "content")
                    if entry.content.is_none() && child.attribute("src").is_none() =>
                {
                    entry.content = Some(TextConstruct::from_node(child));
                    true
                }
                (Some(ATOM_NS), "published") if entry.published.is_none() => match parse_date(&get_text(child)) {
                    Some(date) => {
                        entry.published = Some(date);
                        true
                    }
                    None => {
                        tracing::warn!(element = "published", "Unparseable entry date, keeping as extension");
                        false
                    }
                },
                (Some(ATOM_NS), "updated") if entry.updated.is_none() => match parse_date(&get_text(child)) {
                    Some(date) => {
                        entry.updated = Some(date);
                        true
                    }
                    None => {
                        tracing::warn!(element = "updated", "Unparseable entry date, keeping as extension");
                        false
                    }
                },
                (Some(ATOM_NS), "link") => {
                    entry.links.push(Link::from_node(child));
                    true
                }
                (Some(ATOM_NS), "author") => {
                    entry.authors.push(Person::from_node(child));
                    true
                }
                (Some(ATOM_NS), "contributor") => {
                    entry.contributors.push(Person::from_node(child));
                    true
                }
                (Some(ATOM_NS), "category") => {
                    entry.categories.push(Category::from_node(child));
                    true
                }
                (Some(BATCH_NS), "operation") if entry.batch_operation.is_none() => {
                    entry.batch_operation = Some(BatchOperation::from_node(child));
                    true
                }
                _ => false,
            };

            if !handled {
                entry.extensions.add_node(child);
            }
        }

        entry
    }
}

/// Default constructor: common fields only, [`EntryVariant::Generic`].
pub fn generic_entry(node: Node<'_, '_>, context: &ParseContext) -> Result<Entry> {
    Ok(Entry::parse_common(node, context, |_| false))
}

/// Kind terms of an entry element's kind-scheme categories, in order.
pub fn kind_terms<'a>(node: Node<'a, '_>) -> Vec<&'a str> {
    element_children(node)
        .filter(|c| get_namespace(*c) == Some(ATOM_NS) && get_tag_name(*c) == "category")
        .filter(|c| c.attribute("scheme") == Some(KIND_SCHEME))
        .filter_map(|c| c.attribute("term"))
        .collect()
}
