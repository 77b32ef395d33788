//! Feedmodel - Typed object model for GData-style Atom feeds.
//!
//! This crate parses Atom feed documents into a [`Feed`] of [`Entry`]
//! values, lets callers query and edit them, and writes them back to XML.
//! Elements the model does not interpret are kept in an
//! [`ExtensionStore`] so they survive a round trip.
//!
//! # Example
//!
//! ```
//! use feedmodel::{config::rel, Feed, Link};
//!
//! let xml = br#"<feed xmlns="http://www.w3.org/2005/Atom">
//!   <link rel="next" href="http://example.com/page2"/>
//! </feed>"#;
//!
//! let mut feed = Feed::parse(xml, Some("2.0")).unwrap();
//! assert_eq!(feed.next_link().map(|l| l.href.as_str()), Some("http://example.com/page2"));
//!
//! feed.add_link(Link::new(rel::POST, "http://example.com/post"));
//! assert!(feed.can_post());
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Namespaces, relation constants and service-version dialects
//! - [`error`]: Error types and Result alias
//! - [`xml`]: XML utilities and the owned element tree
//! - [`types`]: Atom leaf values (text, link, person, category, ...)
//! - [`extension`]: Store for uninterpreted elements and attributes
//! - [`links`]: Relation lookups over link lists
//! - [`entry`]: Entries, their variants and the entry type registry
//! - [`feed`]: The feed object and its entry-ownership rules
//! - [`parser`]: Document to feed conversion
//! - [`writer`]: Feed to document conversion
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod entry;
pub mod error;
pub mod extension;
pub mod feed;
pub mod links;
pub mod parser;
pub mod types;
pub mod writer;
pub mod xml;

// Re-export commonly used items
pub use config::Dialect;
pub use entry::{
    default_registry, Entry, EntryConstructor, EntrySelection, EntryTypeRegistry, EntryVariant,
};
pub use error::{FeedError, Result};
pub use extension::{ExtensionStore, ExtensionValue};
pub use feed::{Feed, FeedId};
pub use links::LinkIndex;
pub use parser::{FeedParser, ParseContext};
pub use types::{BatchOperation, Category, Generator, Link, Person, PublishControl, TextConstruct};
pub use xml::{QName, XmlElement, XmlNode};
