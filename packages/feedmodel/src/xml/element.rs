//! Owned XML element tree used to carry content the model does not interpret.
//!
//! Namespace prefixes are kept only as a hint for serialization; two
//! elements are equal when their expanded names, attributes and children
//! match, whatever prefixes were used to spell them.

use std::fmt;

use roxmltree::{Attribute, Node};

/// Expanded XML name: local name plus optional namespace URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QName {
    pub local: String,
    pub namespace: Option<String>,
}

impl QName {
    /// Create a name in a namespace.
    #[must_use]
    pub fn new(namespace: &str, local: &str) -> Self {
        Self {
            local: local.to_string(),
            namespace: Some(namespace.to_string()),
        }
    }

    /// Create a name with no namespace.
    #[must_use]
    pub fn local(local: &str) -> Self {
        Self {
            local: local.to_string(),
            namespace: None,
        }
    }

    /// Name of an element node.
    ///
    /// An element reset to no namespace with `xmlns=""` has no namespace.
    #[must_use]
    pub fn of_element(node: Node<'_, '_>) -> Self {
        let tag = node.tag_name();
        Self::from_parts(tag.namespace(), tag.name())
    }

    /// Name of an attribute.
    #[must_use]
    pub fn of_attribute(attr: &Attribute<'_, '_>) -> Self {
        Self::from_parts(attr.namespace(), attr.name())
    }

    fn from_parts(namespace: Option<&str>, local: &str) -> Self {
        Self {
            local: local.to_string(),
            namespace: namespace.filter(|ns| !ns.is_empty()).map(str::to_string),
        }
    }

    /// Check whether this name has the given namespace and local part.
    #[must_use]
    pub fn is(&self, namespace: Option<&str>, local: &str) -> bool {
        self.local == local && self.namespace.as_deref() == namespace
    }
}

/// Clark notation: `{namespace}local`.
impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{ns}}}{}", self.local),
            None => f.write_str(&self.local),
        }
    }
}

/// An attribute on an [`XmlElement`].
#[derive(Debug, Clone)]
pub struct XmlAttribute {
    pub name: QName,
    pub prefix: Option<String>,
    pub value: String,
}

impl PartialEq for XmlAttribute {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.value == other.value
    }
}

impl Eq for XmlAttribute {}

/// A child of an [`XmlElement`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

impl XmlNode {
    /// Capture the children of a node.
    ///
    /// Comments and processing instructions are dropped. Text on either
    /// side of them becomes a single text node.
    #[must_use]
    pub fn capture_children(node: Node<'_, '_>) -> Vec<Self> {
        let mut children: Vec<Self> = Vec::new();
        for child in node.children() {
            if child.is_element() {
                children.push(Self::Element(XmlElement::from_node(child)));
            } else if child.is_text() {
                let text = child.text().unwrap_or_default();
                match children.last_mut() {
                    Some(Self::Text(previous)) => previous.push_str(text),
                    _ => children.push(Self::Text(text.to_string())),
                }
            }
        }
        children
    }

    /// Concatenated text of these nodes and all their descendants.
    #[must_use]
    pub fn deep_text(nodes: &[Self]) -> String {
        let mut out = String::new();
        for node in nodes {
            match node {
                Self::Text(t) => out.push_str(t),
                Self::Element(e) => out.push_str(&Self::deep_text(&e.children)),
            }
        }
        out
    }
}

/// An owned XML element with its attributes and children.
#[derive(Debug, Clone)]
pub struct XmlElement {
    pub name: QName,
    pub prefix: Option<String>,
    pub attributes: Vec<XmlAttribute>,
    pub children: Vec<XmlNode>,
}

impl PartialEq for XmlElement {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.attributes == other.attributes
            && self.children == other.children
    }
}

impl Eq for XmlElement {}

impl XmlElement {
    /// Create an empty element.
    #[must_use]
    pub fn new(name: QName) -> Self {
        Self {
            name,
            prefix: None,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set the preferred prefix used when writing this element.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Add an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: QName, value: impl Into<String>) -> Self {
        self.attributes.push(XmlAttribute {
            name,
            prefix: None,
            value: value.into(),
        });
        self
    }

    /// Add a text child, joining it to a directly preceding text child.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        match self.children.last_mut() {
            Some(XmlNode::Text(previous)) => previous.push_str(&text),
            _ => self.children.push(XmlNode::Text(text)),
        }
        self
    }

    /// Add an element child.
    #[must_use]
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    /// Capture an element node and its whole subtree.
    ///
    /// Text is kept verbatim, including whitespace between children.
    /// Comments and processing instructions are dropped.
    ///
    /// # Examples
    /// ```
    /// use feedmodel::{QName, XmlElement};
    ///
    /// let doc = roxmltree::Document::parse(r#"<a xmlns="urn:x"><b xmlns="">t</b></a>"#).unwrap();
    /// let a = XmlElement::from_node(doc.root_element());
    /// let b = a.child_elements().next().unwrap();
    /// assert_eq!(b.name, QName::local("b"));
    /// ```
    #[must_use]
    pub fn from_node(node: Node<'_, '_>) -> Self {
        let name = QName::of_element(node);
        let prefix = name
            .namespace
            .as_deref()
            .and_then(|ns| node.lookup_prefix(ns))
            .map(str::to_string);

        let attributes = node
            .attributes()
            .map(|attr| {
                let name = QName::of_attribute(&attr);
                let prefix = name
                    .namespace
                    .as_deref()
                    .and_then(|ns| node.lookup_prefix(ns))
                    .map(str::to_string);
                XmlAttribute {
                    name,
                    prefix,
                    value: attr.value().to_string(),
                }
            })
            .collect();

        let children = XmlNode::capture_children(node);

        Self {
            name,
            prefix,
            attributes,
            children,
        }
    }

    /// Concatenated direct text children.
    #[must_use]
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|c| match c {
                XmlNode::Text(t) => Some(t.as_str()),
                XmlNode::Element(_) => None,
            })
            .collect()
    }

    /// Look up an attribute value by expanded name.
    #[must_use]
    pub fn attribute(&self, namespace: Option<&str>, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.is(namespace, local))
            .map(|a| a.value.as_str())
    }

    /// Iterate over element children.
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|c| match c {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    #[test]
    fn test_qname_display() {
        assert_eq!(QName::new("urn:x", "a").to_string(), "{urn:x}a");
        assert_eq!(QName::local("a").to_string(), "a");
    }

    #[test]
    fn test_from_node_captures_subtree() {
        let xml = r#"<x:rating xmlns:x="urn:x" x:scale="5" plain="y">4<x:note>good</x:note>!</x:rating>"#;
        let doc = Document::parse(xml).unwrap();
        let element = XmlElement::from_node(doc.root_element());

        assert_eq!(element.name, QName::new("urn:x", "rating"));
        assert_eq!(element.prefix.as_deref(), Some("x"));
        assert_eq!(element.attribute(Some("urn:x"), "scale"), Some("5"));
        assert_eq!(element.attribute(None, "plain"), Some("y"));
        assert_eq!(element.text(), "4!");
        assert_eq!(element.child_elements().count(), 1);
    }

    #[test]
    fn test_equality_ignores_prefix() {
        let a = XmlElement::new(QName::new("urn:x", "a")).with_prefix("p");
        let b = XmlElement::new(QName::new("urn:x", "a")).with_prefix("q");
        assert_eq!(a, b);

        let c = XmlElement::new(QName::new("urn:y", "a")).with_prefix("p");
        assert_ne!(a, c);
    }

    #[test]
    fn test_empty_default_namespace_means_no_namespace() {
        let xml = r#"<a xmlns="urn:x"><b xmlns="" c="1"><d/></b></a>"#;
        let doc = Document::parse(xml).unwrap();
        let a = XmlElement::from_node(doc.root_element());
        let b = a.child_elements().next().unwrap();

        assert_eq!(b.name, QName::local("b"));
        assert_eq!(b.attributes[0].name, QName::local("c"));
        assert_eq!(b.child_elements().next().unwrap().name, QName::local("d"));
    }

    #[test]
    fn test_text_around_comment_is_merged() {
        let xml = r#"<x:note xmlns:x="urn:x">a<!--c-->b<?pi x?>c<x:i/>d</x:note>"#;
        let doc = Document::parse(xml).unwrap();
        let element = XmlElement::from_node(doc.root_element());

        assert_eq!(
            element.children,
            vec![
                XmlNode::Text("abc".to_string()),
                XmlNode::Element(XmlElement::new(QName::new("urn:x", "i"))),
                XmlNode::Text("d".to_string()),
            ]
        );
    }

    #[test]
    fn test_deep_text() {
        let doc = Document::parse("<p>Hi <b>there</b>!</p>").unwrap();
        let nodes = XmlNode::capture_children(doc.root_element());
        assert_eq!(XmlNode::deep_text(&nodes), "Hi there!");
    }

    #[test]
    fn test_comments_are_dropped() {
        let doc = Document::parse("<a><!-- note -->text</a>").unwrap();
        let element = XmlElement::from_node(doc.root_element());
        assert_eq!(element.children, vec![XmlNode::Text("text".to_string())]);
    }
}
