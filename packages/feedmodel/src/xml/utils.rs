//! XML utility functions for navigating and extracting data from DOM trees.

use chrono::{DateTime, FixedOffset};
use roxmltree::Node;

/// Get the tag name without namespace prefix.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use feedmodel::xml::get_tag_name;
///
/// let xml = r#"<a:feed xmlns:a="http://www.w3.org/2005/Atom"/>"#;
/// let doc = Document::parse(xml).unwrap();
/// assert_eq!(get_tag_name(doc.root_element()), "feed");
/// ```
pub fn get_tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Get the namespace URI of an element, if any.
///
/// `xmlns=""` puts an element in no namespace, so an empty URI is `None`.
pub fn get_namespace<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.tag_name().namespace().filter(|ns| !ns.is_empty())
}

/// Check if a node is an element with the given namespace and local name.
pub fn is_element_ns(node: Node<'_, '_>, ns: &str, name: &str) -> bool {
    node.is_element() && get_tag_name(node) == name && get_namespace(node) == Some(ns)
}

/// Find the first child element with the given namespace and local name.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use feedmodel::xml::find_child_ns;
///
/// let xml = r#"<root xmlns:x="urn:x"><x:a/><a/></root>"#;
/// let doc = Document::parse(xml).unwrap();
/// let root = doc.root_element();
///
/// assert!(find_child_ns(root, "urn:x", "a").is_some());
/// assert!(find_child_ns(root, "urn:y", "a").is_none());
/// ```
pub fn find_child_ns<'a, 'input>(
    node: Node<'a, 'input>,
    ns: &str,
    name: &str,
) -> Option<Node<'a, 'input>> {
    node.children().find(|child| is_element_ns(*child, ns, name))
}

/// Find all child elements with the given namespace and local name.
pub fn find_children_ns<'a, 'input>(
    node: Node<'a, 'input>,
    ns: &'a str,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |child| is_element_ns(*child, ns, name))
}

/// Get all element children of a node.
pub fn element_children<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|child| child.is_element())
}

/// Whether an element has no attributes and no element children.
pub fn has_only_text(node: Node<'_, '_>) -> bool {
    node.attributes().next().is_none() && !node.children().any(|c| c.is_element())
}

/// Get the text content of a node, verbatim.
///
/// Concatenates every descendant text node, so markup inside the element
/// does not truncate the result. Callers that interpret the value (dates,
/// numbers, flags) trim it themselves.
pub fn get_text(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

/// Get the text of a child element, if the child is present.
///
/// An empty child yields `Some("")`.
pub fn child_text(node: Node<'_, '_>, ns: &str, name: &str) -> Option<String> {
    find_child_ns(node, ns, name).map(get_text)
}

/// Get an un-namespaced attribute value as an owned string.
pub fn get_attribute(node: Node<'_, '_>, name: &str) -> Option<String> {
    node.attribute(name).map(str::to_string)
}

/// Parse an RFC 3339 timestamp as used by Atom date constructs.
///
/// # Examples
/// ```
/// use feedmodel::xml::parse_date;
///
/// assert!(parse_date("2024-01-02T03:04:05Z").is_some());
/// assert!(parse_date(" 2024-01-02T03:04:05.250+02:00 ").is_some());
/// assert!(parse_date("yesterday").is_none());
/// ```
pub fn parse_date(text: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(text.trim()).ok()
}
