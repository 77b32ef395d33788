//! Ordered storage for XML content that has no typed field.
//!
//! Values are keyed by expanded name. Repeated keys accumulate in insertion
//! order and are never overwritten, so serialization can reproduce the
//! original content.

use roxmltree::{Attribute, Node};

use crate::xml::{QName, XmlElement};

/// A stored extension value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionValue {
    /// A child element and its subtree.
    Element(XmlElement),
    /// An attribute value on the extensible element itself.
    Attribute(String),
}

impl ExtensionValue {
    /// Borrow the element, if this is one.
    #[must_use]
    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            Self::Element(e) => Some(e),
            Self::Attribute(_) => None,
        }
    }

    /// Borrow the attribute value, if this is one.
    #[must_use]
    pub fn as_attribute(&self) -> Option<&str> {
        match self {
            Self::Attribute(v) => Some(v),
            Self::Element(_) => None,
        }
    }
}

/// Ordered, repeatable bag of extension values.
#[derive(Debug, Clone, Default)]
pub struct ExtensionStore {
    items: Vec<(QName, ExtensionValue)>,
}

impl ExtensionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value under a key.
    pub fn add(&mut self, name: QName, value: ExtensionValue) {
        self.items.push((name, value));
    }

    /// Append an element, keyed by its own name.
    pub fn add_element(&mut self, element: XmlElement) {
        let name = element.name.clone();
        self.items.push((name, ExtensionValue::Element(element)));
    }

    /// Append an attribute value.
    pub fn add_attribute(&mut self, name: QName, value: impl Into<String>) {
        self.items
            .push((name, ExtensionValue::Attribute(value.into())));
    }

    /// Store an attribute read from a document.
    pub fn add_xml_attribute(&mut self, attr: &Attribute<'_, '_>) {
        self.add_attribute(QName::of_attribute(attr), attr.value());
    }

    /// Store a child element read from a document, subtree included.
    pub fn add_node(&mut self, node: Node<'_, '_>) {
        self.add_element(XmlElement::from_node(node));
    }

    /// All values stored under a key, in insertion order.
    pub fn values<'a>(&'a self, name: &'a QName) -> impl Iterator<Item = &'a ExtensionValue> + 'a {
        self.items
            .iter()
            .filter(move |(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// First value stored under a key.
    #[must_use]
    pub fn first<'a>(&'a self, name: &QName) -> Option<&'a ExtensionValue> {
        self.items
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// First element stored under a key.
    #[must_use]
    pub fn first_element<'a>(&'a self, name: &QName) -> Option<&'a XmlElement> {
        self.items
            .iter()
            .filter(|(key, _)| key == name)
            .find_map(|(_, value)| value.as_element())
    }

    /// Whether any value is stored under a key.
    #[must_use]
    pub fn contains(&self, name: &QName) -> bool {
        self.items.iter().any(|(key, _)| key == name)
    }

    /// Remove every value stored under a key. Returns how many were removed.
    pub fn remove_key(&mut self, name: &QName) -> usize {
        let before = self.items.len();
        self.items.retain(|(key, _)| key != name);
        before - self.items.len()
    }

    /// Remove the first value under a key that equals `value`.
    ///
    /// Returns `true` if a value was removed.
    pub fn remove_value(&mut self, name: &QName, value: &ExtensionValue) -> bool {
        match self
            .items
            .iter()
            .position(|(key, v)| key == name && v == value)
        {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Iterate over all entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&QName, &ExtensionValue)> {
        self.items.iter().map(|(k, v)| (k, v))
    }

    /// Iterate over stored elements in insertion order.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.items.iter().filter_map(|(_, v)| v.as_element())
    }

    /// Iterate over stored attributes in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = (&QName, &str)> {
        self.items
            .iter()
            .filter_map(|(k, v)| v.as_attribute().map(|a| (k, a)))
    }

    /// Number of stored values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Two stores are equal when they hold the same elements in the same order
/// and the same attributes in the same order. Interleaving between elements
/// and attributes is not significant: XML writes attributes on the start tag.
impl PartialEq for ExtensionStore {
    fn eq(&self, other: &Self) -> bool {
        self.elements().eq(other.elements()) && self.attributes().eq(other.attributes())
    }
}

impl Eq for ExtensionStore {}
