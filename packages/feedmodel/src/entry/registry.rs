//! Entry type registry mapping kind terms to entry constructors.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use roxmltree::Node;

use super::variants::{event_entry, location_entry, photo_entry};
use super::{generic_entry, kind_terms, Entry};
use crate::config::{EVENT_KIND, LOCATION_KIND, PHOTO_KIND};
use crate::error::Result;
use crate::parser::ParseContext;

/// Function building an entry from an `atom:entry` element.
pub type EntryConstructor = fn(Node<'_, '_>, &ParseContext) -> Result<Entry>;

/// How a feed chooses the constructor for its entries.
#[derive(Clone, Copy, Default)]
pub enum EntrySelection {
    /// Every entry is built with this constructor, whatever its kind.
    Fixed(EntryConstructor),
    /// Look up each entry's kind category in the registry.
    #[default]
    UseRegistry,
}

impl fmt::Debug for EntrySelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(_) => f.write_str("Fixed(..)"),
            Self::UseRegistry => f.write_str("UseRegistry"),
        }
    }
}

/// Registry mapping kind terms to entry constructors.
///
/// Lookups take `&self`, so a registry shared between threads by reference
/// needs no locking. Registration takes `&mut self`.
pub struct EntryTypeRegistry {
    constructors: HashMap<String, EntryConstructor>,
    fallback: EntryConstructor,
}

impl EntryTypeRegistry {
    /// Create an empty registry that builds generic entries.
    #[must_use]
    pub fn new() -> Self {
        Self {
            constructors: HashMap::new(),
            fallback: generic_entry,
        }
    }

    /// Create a registry with the built-in event, location and photo kinds.
    #[must_use]
    pub fn with_builtin_kinds() -> Self {
        let mut registry = Self::new();
        registry.register(EVENT_KIND, event_entry);
        registry.register(LOCATION_KIND, location_entry);
        registry.register(PHOTO_KIND, photo_entry);
        registry
    }

    /// Register a constructor for a kind term.
    ///
    /// Returns the constructor previously registered for the term, if any.
    pub fn register(
        &mut self,
        term: impl Into<String>,
        constructor: EntryConstructor,
    ) -> Option<EntryConstructor> {
        self.constructors.insert(term.into(), constructor)
    }

    /// Replace the constructor used when no kind matches.
    pub fn set_fallback(&mut self, constructor: EntryConstructor) {
        self.fallback = constructor;
    }

    /// Get the constructor registered for a kind term.
    #[must_use]
    pub fn constructor_for(&self, term: &str) -> Option<EntryConstructor> {
        self.constructors.get(term).copied()
    }

    /// Check if a constructor is registered for a kind term.
    #[must_use]
    pub fn is_registered(&self, term: &str) -> bool {
        self.constructors.contains_key(term)
    }

    /// All registered kind terms, sorted.
    #[must_use]
    pub fn registered_kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    /// Choose the constructor for an entry element.
    ///
    /// A fixed selection wins. Otherwise the entry's kind categories are
    /// tried in document order and the first registered term is used.
    /// Entries with no registered kind get the fallback constructor.
    #[must_use]
    pub fn resolve(&self, node: Node<'_, '_>, selection: EntrySelection) -> EntryConstructor {
        if let EntrySelection::Fixed(constructor) = selection {
            return constructor;
        }

        let mut seen_kind = None;
        for term in kind_terms(node) {
            if let Some(constructor) = self.constructor_for(term) {
                return constructor;
            }
            seen_kind.get_or_insert(term);
        }

        if let Some(term) = seen_kind {
            tracing::debug!(kind = %term, "Unregistered entry kind, using fallback constructor");
        }
        self.fallback
    }

    /// Build an entry from an element using [`resolve`](Self::resolve).
    pub fn build(
        &self,
        node: Node<'_, '_>,
        selection: EntrySelection,
        context: &ParseContext,
    ) -> Result<Entry> {
        (self.resolve(node, selection))(node, context)
    }
}

impl Default for EntryTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EntryTypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryTypeRegistry")
            .field("kinds", &self.registered_kinds())
            .finish_non_exhaustive()
    }
}

/// Process-wide registry with the built-in kinds.
///
/// Initialised on first use and never mutated afterwards. Code that needs
/// extra kinds builds its own registry and passes it to
/// [`FeedParser`](crate::FeedParser).
static DEFAULT_REGISTRY: LazyLock<EntryTypeRegistry> =
    LazyLock::new(EntryTypeRegistry::with_builtin_kinds);

/// The shared default registry.
#[must_use]
pub fn default_registry() -> &'static EntryTypeRegistry {
    &DEFAULT_REGISTRY
}
