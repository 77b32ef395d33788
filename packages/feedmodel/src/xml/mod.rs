//! XML helpers: tree navigation over roxmltree nodes and an owned element
//! tree for unmodelled content.

mod element;
mod utils;

pub use element::{QName, XmlAttribute, XmlElement, XmlNode};
pub use utils::{
    child_text, element_children, find_child_ns, find_children_ns, get_attribute,
    get_namespace, get_tag_name, get_text, has_only_text, is_element_ns, parse_date,
};
