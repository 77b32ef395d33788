//! Leaf value types shared by feeds and entries.
//!
//! These mirror the Atom constructs (text, link, person, category,
//! generator) and the GData batch and publishing-control elements.

use roxmltree::Node;
use serde::Serialize;

use crate::config::{is_app_ns, ATOM_NS, XML_NS};
use crate::extension::ExtensionStore;
use crate::xml::{get_attribute, get_namespace, get_tag_name, get_text, has_only_text, XmlNode};

/// An Atom text construct: value plus optional type and language.
///
/// For `xhtml` and XML media types the child markup is kept in `markup`
/// and `text` holds its flattened text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TextConstruct {
    pub text: String,

    /// `text`, `html`, `xhtml` or a media type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,

    /// Inline markup. Written instead of `text` when non-empty.
    #[serde(skip)]
    pub markup: Vec<XmlNode>,
}

/// Whether a text construct type carries XML children.
fn is_markup_type(text_type: Option<&str>) -> bool {
    match text_type {
        Some("xhtml") => true,
        Some(media) => media.ends_with("/xml") || media.ends_with("+xml"),
        None => false,
    }
}

impl TextConstruct {
    /// Plain text with no type or language.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Inline markup of the given type, e.g. an XHTML `div`.
    #[must_use]
    pub fn markup(text_type: impl Into<String>, markup: Vec<XmlNode>) -> Self {
        Self {
            text: XmlNode::deep_text(&markup),
            text_type: Some(text_type.into()),
            lang: None,
            markup,
        }
    }

    #[must_use]
    pub fn with_type(mut self, text_type: impl Into<String>) -> Self {
        self.text_type = Some(text_type.into());
        self
    }

    #[must_use]
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    pub fn from_node(node: Node<'_, '_>) -> Self {
        let text_type = get_attribute(node, "type");
        let lang = node.attribute((XML_NS, "lang")).map(str::to_string);

        let has_elements = node.children().any(|c| c.is_element());
        if has_elements && is_markup_type(text_type.as_deref()) {
            let markup = XmlNode::capture_children(node);
            let mut construct = Self::markup(text_type.unwrap_or_default(), markup);
            construct.lang = lang;
            return construct;
        }

        Self {
            text: get_text(node),
            text_type,
            lang,
            markup: Vec::new(),
        }
    }
}

/// An Atom link.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Link {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rel: Option<String>,

    pub href: String,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub link_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hreflang: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,

    /// Foreign attributes (such as `gd:etag`) and child elements.
    #[serde(skip)]
    pub extensions: ExtensionStore,
}

impl Link {
    /// Create a link with a relation and target.
    #[must_use]
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: Some(rel.into()),
            href: href.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_type(mut self, link_type: impl Into<String>) -> Self {
        self.link_type = Some(link_type.into());
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Whether this link has the given relation.
    #[must_use]
    pub fn has_rel(&self, rel: &str) -> bool {
        self.rel.as_deref() == Some(rel)
    }

    pub fn from_node(node: Node<'_, '_>) -> Self {
        let mut link = Self::default();
        for attr in node.attributes() {
            let value = attr.value().to_string();
            match (attr.namespace(), attr.name()) {
                (None, "rel") => link.rel = Some(value),
                (None, "href") => link.href = value,
                (None, "type") => link.link_type = Some(value),
                (None, "title") => link.title = Some(value),
                (None, "hreflang") => link.hreflang = Some(value),
                (None, "length") => match value.trim().parse() {
                    Ok(length) => link.length = Some(length),
                    Err(_) => {
                        tracing::warn!(length = %value, "Non-numeric link length, keeping as extension");
                        link.extensions.add_xml_attribute(&attr);
                    }
                },
                _ => link.extensions.add_xml_attribute(&attr),
            }
        }
        for child in node.children().filter(|c| c.is_element()) {
            link.extensions.add_node(child);
        }
        link
    }
}

/// An Atom person construct (author or contributor).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Person {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip)]
    pub extensions: ExtensionStore,
}

impl Person {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Parse an author or contributor. Only the first `name`, `uri` and
    /// `email` are typed; repeats and foreign children are extensions.
    pub fn from_node(node: Node<'_, '_>) -> Self {
        let mut person = Self::default();
        let mut seen_name = false;
        for attr in node.attributes() {
            person.extensions.add_xml_attribute(&attr);
        }
        for child in node.children().filter(|c| c.is_element()) {
            let atom = get_namespace(child) == Some(ATOM_NS);
            match get_tag_name(child) {
                "name" if atom && !seen_name => {
                    person.name = get_text(child);
                    seen_name = true;
                }
                "uri" if atom && person.uri.is_none() => person.uri = Some(get_text(child)),
                "email" if atom && person.email.is_none() => person.email = Some(get_text(child)),
                _ => person.extensions.add_node(child),
            }
        }
        person
    }
}

/// An Atom category.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Category {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,

    pub term: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(skip)]
    pub extensions: ExtensionStore,
}

impl Category {
    #[must_use]
    pub fn new(scheme: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            scheme: Some(scheme.into()),
            term: term.into(),
            ..Self::default()
        }
    }

    /// A category in the kind scheme.
    #[must_use]
    pub fn kind(term: impl Into<String>) -> Self {
        Self::new(crate::config::KIND_SCHEME, term)
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Whether this category is in the kind scheme with the given term.
    #[must_use]
    pub fn is_kind(&self, term: &str) -> bool {
        self.scheme.as_deref() == Some(crate::config::KIND_SCHEME) && self.term == term
    }

    pub fn from_node(node: Node<'_, '_>) -> Self {
        let mut category = Self::default();
        for attr in node.attributes() {
            let value = attr.value().to_string();
            match (attr.namespace(), attr.name()) {
                (None, "scheme") => category.scheme = Some(value),
                (None, "term") => category.term = value,
                (None, "label") => category.label = Some(value),
                _ => category.extensions.add_xml_attribute(&attr),
            }
        }
        for child in node.children().filter(|c| c.is_element()) {
            category.extensions.add_node(child);
        }
        category
    }
}

/// The agent that generated a feed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Generator {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl Generator {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            uri: None,
        }
    }

    pub fn from_node(node: Node<'_, '_>) -> Self {
        Self {
            name: get_text(node),
            version: get_attribute(node, "version"),
            uri: get_attribute(node, "uri"),
        }
    }
}

/// A `batch:operation` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchOperation {
    /// `insert`, `update`, `delete` or `query`.
    pub operation: String,
}

impl BatchOperation {
    #[must_use]
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
        }
    }

    pub fn from_node(node: Node<'_, '_>) -> Self {
        Self {
            operation: get_attribute(node, "type").unwrap_or_default(),
        }
    }
}

/// An `app:control` element.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PublishControl {
    pub draft: bool,

    /// Attributes and children other than the first `app:draft`.
    #[serde(skip)]
    pub extensions: ExtensionStore,
}

impl PublishControl {
    #[must_use]
    pub fn draft() -> Self {
        Self {
            draft: true,
            ..Self::default()
        }
    }

    /// Parse from an `app:control` element in either app namespace.
    ///
    /// A `draft` value other than `yes` or `no` is kept as an extension.
    pub fn from_node(node: Node<'_, '_>) -> Self {
        let mut control = Self::default();
        let mut seen_draft = false;
        for attr in node.attributes() {
            control.extensions.add_xml_attribute(&attr);
        }
        for child in node.children().filter(|c| c.is_element()) {
            let is_draft = !seen_draft
                && get_tag_name(child) == "draft"
                && get_namespace(child).is_some_and(is_app_ns)
                && has_only_text(child);
            let text = get_text(child);
            match text.trim() {
                "yes" if is_draft => control.draft = true,
                "no" if is_draft => control.draft = false,
                _ => {
                    control.extensions.add_node(child);
                    continue;
                }
            }
            seen_draft = true;
        }
        control
    }
}
