//! The typed feed object and its accessor/mutator contract.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, FixedOffset};

use crate::config::{Dialect, OPENSEARCH_V1_NS, OPENSEARCH_V2_NS};
use crate::entry::{Entry, EntrySelection};
use crate::error::{FeedError, Result};
use crate::extension::ExtensionStore;
use crate::links::LinkIndex;
use crate::parser::FeedParser;
use crate::types::{BatchOperation, Category, Generator, Link, Person, PublishControl, TextConstruct};
use crate::xml::{QName, XmlElement};

/// Opaque token identifying a feed for entry-ownership checks.
///
/// Entries store this token instead of a reference to their feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeedId(u64);

impl FeedId {
    pub(crate) fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A parsed or programmatically built feed.
///
/// Equality and [`diff`](Feed::diff) compare document content only. The
/// generator, the etag, the feed token, the entry selection and the
/// dialect never take part.
#[derive(Debug)]
pub struct Feed {
    id: FeedId,
    identifier: Option<String>,
    title: Option<TextConstruct>,
    subtitle: Option<TextConstruct>,
    rights: Option<TextConstruct>,
    icon: Option<String>,
    logo: Option<String>,
    generator: Option<Generator>,
    etag: Option<String>,
    updated: Option<DateTime<FixedOffset>>,
    links: Vec<Link>,
    authors: Vec<Person>,
    contributors: Vec<Person>,
    categories: Vec<Category>,
    entries: Vec<Entry>,
    publish_control: Option<PublishControl>,
    batch_operation: Option<BatchOperation>,
    extensions: ExtensionStore,
    entry_selection: EntrySelection,
    dialect: Dialect,
}

impl Default for Feed {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloning yields an independent feed: it gets a fresh token and owns
/// its copies of the entries.
impl Clone for Feed {
    fn clone(&self) -> Self {
        let id = FeedId::next();
        let entries = self
            .entries
            .iter()
            .map(|entry| {
                let mut copy = entry.detached_copy();
                copy.set_owner(Some(id));
                copy
            })
            .collect();

        Self {
            id,
            identifier: self.identifier.clone(),
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            rights: self.rights.clone(),
            icon: self.icon.clone(),
            logo: self.logo.clone(),
            generator: self.generator.clone(),
            etag: self.etag.clone(),
            updated: self.updated,
            links: self.links.clone(),
            authors: self.authors.clone(),
            contributors: self.contributors.clone(),
            categories: self.categories.clone(),
            entries,
            publish_control: self.publish_control.clone(),
            batch_operation: self.batch_operation.clone(),
            extensions: self.extensions.clone(),
            entry_selection: self.entry_selection,
            dialect: self.dialect,
        }
    }
}

impl PartialEq for Feed {
    fn eq(&self, other: &Self) -> bool {
        self.diff(other).is_empty()
    }
}

/// Name of an OpenSearch paging element in either namespace.
fn opensearch_names(local: &str) -> [QName; 2] {
    [QName::new(OPENSEARCH_V2_NS, local), QName::new(OPENSEARCH_V1_NS, local)]
}

impl Feed {
    /// Create an empty feed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: FeedId::next(),
            identifier: None,
            title: None,
            subtitle: None,
            rights: None,
            icon: None,
            logo: None,
            generator: None,
            etag: None,
            updated: None,
            links: Vec::new(),
            authors: Vec::new(),
            contributors: Vec::new(),
            categories: Vec::new(),
            entries: Vec::new(),
            publish_control: None,
            batch_operation: None,
            extensions: ExtensionStore::new(),
            entry_selection: EntrySelection::UseRegistry,
            dialect: Dialect::default(),
        }
    }

    /// Parse feed bytes with the default registry.
    ///
    /// # Examples
    /// ```
    /// use feedmodel::Feed;
    ///
    /// let xml = br#"<feed xmlns="http://www.w3.org/2005/Atom">
    ///   <id>urn:example</id>
    ///   <entry><id>urn:example:1</id></entry>
    /// </feed>"#;
    /// let feed = Feed::parse(xml, None).unwrap();
    /// assert_eq!(feed.identifier(), Some("urn:example"));
    /// assert!(feed.entry_for_identifier("urn:example:1").is_some());
    /// ```
    pub fn parse(bytes: &[u8], service_version: Option<&str>) -> Result<Self> {
        FeedParser::default().parse(bytes, service_version)
    }

    /// Token used for entry-ownership checks.
    #[must_use]
    pub fn id(&self) -> FeedId {
        self.id
    }

    /// How this feed picks constructors for its entries.
    #[must_use]
    pub fn entry_variant(&self) -> EntrySelection {
        self.entry_selection
    }

    pub fn set_entry_selection(&mut self, selection: EntrySelection) {
        self.entry_selection = selection;
    }

    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn set_dialect(&mut self, dialect: Dialect) {
        self.dialect = dialect;
    }

    // Scalar fields

    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    pub fn set_identifier(&mut self, identifier: Option<String>) {
        self.identifier = identifier;
    }

    #[must_use]
    pub fn title(&self) -> Option<&TextConstruct> {
        self.title.as_ref()
    }

    pub fn set_title(&mut self, title: Option<TextConstruct>) {
        self.title = title;
    }

    pub fn set_title_text(&mut self, text: impl Into<String>) {
        self.title = Some(TextConstruct::plain(text));
    }

    #[must_use]
    pub fn subtitle(&self) -> Option<&TextConstruct> {
        self.subtitle.as_ref()
    }

    pub fn set_subtitle(&mut self, subtitle: Option<TextConstruct>) {
        self.subtitle = subtitle;
    }

    pub fn set_subtitle_text(&mut self, text: impl Into<String>) {
        self.subtitle = Some(TextConstruct::plain(text));
    }

    #[must_use]
    pub fn rights(&self) -> Option<&TextConstruct> {
        self.rights.as_ref()
    }

    pub fn set_rights(&mut self, rights: Option<TextConstruct>) {
        self.rights = rights;
    }

    pub fn set_rights_text(&mut self, text: impl Into<String>) {
        self.rights = Some(TextConstruct::plain(text));
    }

    #[must_use]
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn set_icon(&mut self, icon: Option<String>) {
        self.icon = icon;
    }

    #[must_use]
    pub fn logo(&self) -> Option<&str> {
        self.logo.as_deref()
    }

    pub fn set_logo(&mut self, logo: Option<String>) {
        self.logo = logo;
    }

    #[must_use]
    pub fn generator(&self) -> Option<&Generator> {
        self.generator.as_ref()
    }

    pub fn set_generator(&mut self, generator: Option<Generator>) {
        self.generator = generator;
    }

    #[must_use]
    pub fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }

    pub fn set_etag(&mut self, etag: Option<String>) {
        self.etag = etag;
    }

    #[must_use]
    pub fn updated(&self) -> Option<DateTime<FixedOffset>> {
        self.updated
    }

    pub fn set_updated(&mut self, updated: Option<DateTime<FixedOffset>>) {
        self.updated = updated;
    }

    #[must_use]
    pub fn publish_control(&self) -> Option<&PublishControl> {
        self.publish_control.as_ref()
    }

    pub fn set_publish_control(&mut self, control: Option<PublishControl>) {
        self.publish_control = control;
    }

    #[must_use]
    pub fn batch_operation(&self) -> Option<&BatchOperation> {
        self.batch_operation.as_ref()
    }

    pub fn set_batch_operation(&mut self, operation: Option<BatchOperation>) {
        self.batch_operation = operation;
    }

    // Collections

    #[must_use]
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn set_links(&mut self, links: Vec<Link>) {
        self.links = links;
    }

    pub fn add_link(&mut self, link: Link) {
        self.links.push(link);
    }

    /// Remove the first link equal to `link`. Returns `true` if one was removed.
    pub fn remove_link(&mut self, link: &Link) -> bool {
        remove_first(&mut self.links, link)
    }

    #[must_use]
    pub fn authors(&self) -> &[Person] {
        &self.authors
    }

    pub fn set_authors(&mut self, authors: Vec<Person>) {
        self.authors = authors;
    }

    pub fn add_author(&mut self, author: Person) {
        self.authors.push(author);
    }

    #[must_use]
    pub fn contributors(&self) -> &[Person] {
        &self.contributors
    }

    pub fn set_contributors(&mut self, contributors: Vec<Person>) {
        self.contributors = contributors;
    }

    pub fn add_contributor(&mut self, contributor: Person) {
        self.contributors.push(contributor);
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn set_categories(&mut self, categories: Vec<Category>) {
        self.categories = categories;
    }

    /// Append a category. Duplicates are kept.
    pub fn add_category(&mut self, category: Category) {
        self.categories.push(category);
    }

    /// Remove the first category equal to `category`. Later duplicates stay.
    pub fn remove_category(&mut self, category: &Category) -> bool {
        remove_first(&mut self.categories, category)
    }

    #[must_use]
    pub fn extensions(&self) -> &ExtensionStore {
        &self.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut ExtensionStore {
        &mut self.extensions
    }

    // Paging counters, stored as OpenSearch extension elements

    #[must_use]
    pub fn total_results(&self) -> Option<u64> {
        self.opensearch_value("totalResults")
    }

    pub fn set_total_results(&mut self, value: Option<u64>) {
        self.set_opensearch_value("totalResults", value);
    }

    #[must_use]
    pub fn start_index(&self) -> Option<u64> {
        self.opensearch_value("startIndex")
    }

    pub fn set_start_index(&mut self, value: Option<u64>) {
        self.set_opensearch_value("startIndex", value);
    }

    #[must_use]
    pub fn items_per_page(&self) -> Option<u64> {
        self.opensearch_value("itemsPerPage")
    }

    pub fn set_items_per_page(&mut self, value: Option<u64>) {
        self.set_opensearch_value("itemsPerPage", value);
    }

    fn opensearch_value(&self, local: &str) -> Option<u64> {
        opensearch_names(local)
            .iter()
            .find_map(|name| self.extensions.first_element(name))
            .and_then(|element| element.text().trim().parse().ok())
    }

    /// Replace the counter in both namespaces, writing the dialect's one.
    fn set_opensearch_value(&mut self, local: &str, value: Option<u64>) {
        for name in &opensearch_names(local) {
            self.extensions.remove_key(name);
        }
        if let Some(value) = value {
            let element = XmlElement::new(QName::new(self.dialect.opensearch_ns(), local))
                .with_prefix("openSearch")
                .with_text(value.to_string());
            self.extensions.add_element(element);
        }
    }

    // Links

    /// Relation lookups over the current links.
    #[must_use]
    pub fn link_index(&self) -> LinkIndex<'_> {
        LinkIndex::new(&self.links)
    }

    /// Whether the feed accepts new entries (has a post link).
    #[must_use]
    pub fn can_post(&self) -> bool {
        self.post_link().is_some()
    }

    #[must_use]
    pub fn feed_link(&self) -> Option<&Link> {
        self.link_index().feed_link()
    }

    #[must_use]
    pub fn alternate_link(&self) -> Option<&Link> {
        self.link_index().alternate_link()
    }

    #[must_use]
    pub fn related_link(&self) -> Option<&Link> {
        self.link_index().related_link()
    }

    #[must_use]
    pub fn post_link(&self) -> Option<&Link> {
        self.link_index().post_link()
    }

    #[must_use]
    pub fn batch_link(&self) -> Option<&Link> {
        self.link_index().batch_link()
    }

    #[must_use]
    pub fn self_link(&self) -> Option<&Link> {
        self.link_index().self_link()
    }

    #[must_use]
    pub fn next_link(&self) -> Option<&Link> {
        self.link_index().next_link()
    }

    #[must_use]
    pub fn previous_link(&self) -> Option<&Link> {
        self.link_index().previous_link()
    }

    // Entries

    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Edit the entry at `index` in place.
    ///
    /// The entry stays owned by this feed afterwards, even if `edit`
    /// replaced it wholesale. Returns `None` if `index` is out of range.
    pub fn update_entry<R>(
        &mut self,
        index: usize,
        edit: impl FnOnce(&mut Entry) -> R,
    ) -> Option<R> {
        let id = self.id;
        let entry = self.entries.get_mut(index)?;
        let result = edit(entry);
        entry.set_owner(Some(id));
        Some(result)
    }

    /// First entry whose identifier equals `identifier`.
    #[must_use]
    pub fn entry_for_identifier(&self, identifier: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|entry| entry.identifier.as_deref() == Some(identifier))
    }

    /// Entries carrying a kind category with `term`, in feed order.
    #[must_use]
    pub fn entries_with_category_kind(&self, term: &str) -> Vec<&Entry> {
        self.entries.iter().filter(|entry| entry.has_kind(term)).collect()
    }

    /// Replace all entries, taking ownership of them.
    ///
    /// # Errors
    /// Returns [`FeedError::EntryOwnership`] without changing the feed if
    /// any entry is owned by a different feed.
    pub fn set_entries(&mut self, entries: Vec<Entry>) -> Result<()> {
        for entry in &entries {
            self.check_attachable(entry)?;
        }
        for old in &mut self.entries {
            old.set_owner(None);
        }
        self.entries = entries;
        let id = self.id;
        for entry in &mut self.entries {
            entry.set_owner(Some(id));
        }
        Ok(())
    }

    /// Append an entry, taking ownership of it.
    ///
    /// # Errors
    /// Returns [`FeedError::EntryOwnership`] without changing the feed if
    /// the entry is owned by a different feed.
    pub fn add_entry(&mut self, mut entry: Entry) -> Result<()> {
        self.check_attachable(&entry)?;
        entry.set_owner(Some(self.id));
        self.entries.push(entry);
        Ok(())
    }

    /// Replace all entries with deep copies of `entries`.
    pub fn set_entries_with_entries(&mut self, entries: &[Entry]) {
        let id = self.id;
        self.entries = entries
            .iter()
            .map(|entry| {
                let mut copy = entry.detached_copy();
                copy.set_owner(Some(id));
                copy
            })
            .collect();
    }

    /// Append a deep copy of `entry`.
    pub fn add_entry_with_entry(&mut self, entry: &Entry) {
        let mut copy = entry.detached_copy();
        copy.set_owner(Some(self.id));
        self.entries.push(copy);
    }

    /// Detach and return the entry at `index`.
    pub fn remove_entry(&mut self, index: usize) -> Option<Entry> {
        if index >= self.entries.len() {
            return None;
        }
        let mut entry = self.entries.remove(index);
        entry.set_owner(None);
        Some(entry)
    }

    /// Detach and return all entries.
    pub fn take_entries(&mut self) -> Vec<Entry> {
        let mut entries = std::mem::take(&mut self.entries);
        for entry in &mut entries {
            entry.set_owner(None);
        }
        entries
    }

    /// Attach an entry built by the parser.
    pub(crate) fn push_parsed_entry(&mut self, mut entry: Entry) {
        entry.set_owner(Some(self.id));
        self.entries.push(entry);
    }

    fn check_attachable(&self, entry: &Entry) -> Result<()> {
        match entry.owner() {
            Some(owner) if owner != self.id => {
                let entry_id = entry.identifier.clone().unwrap_or_default();
                tracing::error!(
                    entry = %entry_id,
                    owner = %owner,
                    target = %self.id,
                    "Refusing to attach an entry owned by another feed"
                );
                Err(FeedError::EntryOwnership {
                    entry_id,
                    owner,
                    target: self.id,
                })
            }
            _ => Ok(()),
        }
    }

    // Comparison

    /// Names of the fields whose content differs from `other`.
    ///
    /// Generator and etag are never reported.
    #[must_use]
    pub fn diff(&self, other: &Self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        let mut check = |name: &'static str, same: bool| {
            if !same {
                fields.push(name);
            }
        };

        check("identifier", self.identifier == other.identifier);
        check("title", self.title == other.title);
        check("subtitle", self.subtitle == other.subtitle);
        check("rights", self.rights == other.rights);
        check("icon", self.icon == other.icon);
        check("logo", self.logo == other.logo);
        check("updated", self.updated == other.updated);
        check("links", self.links == other.links);
        check("authors", self.authors == other.authors);
        check("contributors", self.contributors == other.contributors);
        check("categories", self.categories == other.categories);
        check("entries", self.entries == other.entries);
        check("publish_control", self.publish_control == other.publish_control);
        check("batch_operation", self.batch_operation == other.batch_operation);
        check("extensions", self.extensions == other.extensions);

        fields
    }
}

fn remove_first<T: PartialEq>(items: &mut Vec<T>, item: &T) -> bool {
    match items.iter().position(|candidate| candidate == item) {
        Some(index) => {
            items.remove(index);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{rel, OPENSEARCH_V1_NS};
    use pretty_assertions::assert_eq;

    fn entry(id: &str) -> Entry {
        Entry::new().with_identifier(id)
    }

    #[test]
    fn test_next_link_returns_first_match() {
        let mut feed = Feed::new();
        feed.set_links(vec![
            Link::new(rel::NEXT, "A"),
            Link::new(rel::SELF, "B"),
            Link::new(rel::NEXT, "C"),
        ]);

        assert_eq!(feed.next_link().map(|l| l.href.as_str()), Some("A"));
        assert_eq!(feed.self_link().map(|l| l.href.as_str()), Some("B"));
        assert!(feed.previous_link().is_none());
    }

    #[test]
    fn test_link_lookups_follow_mutation() {
        let mut feed = Feed::new();
        assert!(!feed.can_post());

        feed.add_link(Link::new(rel::POST, "http://example.com/post"));
        assert!(feed.can_post());

        let post = Link::new(rel::POST, "http://example.com/post");
        assert!(feed.remove_link(&post));
        assert!(!feed.can_post());
    }

    #[test]
    fn test_entry_for_identifier() {
        let mut feed = Feed::new();
        feed.set_entries(vec![
            entry("a").with_title("first"),
            entry("b"),
            entry("a").with_title("second"),
        ])
        .unwrap();

        let found = feed.entry_for_identifier("a").unwrap();
        assert_eq!(found.title.as_ref().map(|t| t.text.as_str()), Some("first"));
        assert!(feed.entry_for_identifier("z").is_none());
    }

    #[test]
    fn test_entries_with_category_kind() {
        let mut feed = Feed::new();
        feed.set_entries(vec![
            entry("1").with_category(Category::kind("video")),
            entry("2").with_category(Category::kind("photo")),
            entry("3").with_category(Category::kind("video")),
            entry("4").with_category(Category::new("other", "video")),
        ])
        .unwrap();

        let ids: Vec<&str> = feed
            .entries_with_category_kind("video")
            .iter()
            .filter_map(|e| e.identifier.as_deref())
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_attach_owned_entry_fails_and_leaves_feed_unchanged() {
        let mut x = Feed::new();
        x.add_entry(entry("shared")).unwrap();
        let owned = x.entries()[0].clone();

        let mut y = Feed::new();
        y.add_entry(entry("existing")).unwrap();

        let err = y.add_entry(owned.clone()).unwrap_err();
        assert!(matches!(err, FeedError::EntryOwnership { .. }));
        assert_eq!(y.entries().len(), 1);

        let err = y.set_entries(vec![entry("fresh"), owned]).unwrap_err();
        assert!(matches!(err, FeedError::EntryOwnership { .. }));
        assert_eq!(y.entries().len(), 1);
        assert_eq!(y.entries()[0].identifier.as_deref(), Some("existing"));
    }

    #[test]
    fn test_attach_copy_is_isolated_from_original() {
        let mut x = Feed::new();
        x.add_entry(entry("shared").with_title("before")).unwrap();
        let mut original = x.entries()[0].clone();

        let mut y = Feed::new();
        y.add_entry_with_entry(&original);
        assert_eq!(y.entries()[0].owner(), Some(y.id()));

        original.title = Some(TextConstruct::plain("after"));
        assert_eq!(
            y.entries()[0].title.as_ref().map(|t| t.text.as_str()),
            Some("before")
        );

        y.set_entries_with_entries(&[original.clone(), original]);
        assert_eq!(y.entries().len(), 2);
        assert!(y.entries().iter().all(|e| e.owner() == Some(y.id())));
    }

    #[test]
    fn test_detached_entries_can_move_between_feeds() {
        let mut x = Feed::new();
        x.add_entry(entry("moving")).unwrap();
        let moved = x.remove_entry(0).unwrap();
        assert!(!moved.is_owned());
        assert!(x.remove_entry(0).is_none());

        let mut y = Feed::new();
        y.add_entry(moved).unwrap();
        assert_eq!(y.entries()[0].owner(), Some(y.id()));

        let taken = y.take_entries();
        assert!(y.entries().is_empty());
        assert!(taken.iter().all(|e| !e.is_owned()));
    }

    #[test]
    fn test_reattaching_own_entries_is_allowed() {
        let mut feed = Feed::new();
        feed.add_entry(entry("a")).unwrap();
        let same = feed.entries()[0].clone();
        assert!(feed.add_entry(same).is_ok());
        assert_eq!(feed.entries().len(), 2);
    }

    #[test]
    fn test_update_entry_keeps_ownership() {
        let mut x = Feed::new();
        x.add_entry(Entry::new().with_identifier("x1")).unwrap();
        let mut y = Feed::new();
        y.add_entry(Entry::new().with_identifier("y1")).unwrap();

        let foreign = x.entries()[0].clone();
        y.update_entry(0, |entry| *entry = foreign).unwrap();
        assert_eq!(y.entries()[0].identifier.as_deref(), Some("x1"));
        assert_eq!(y.entries()[0].owner(), Some(y.id()));

        // The replaced entry now belongs to y, so x cannot take it back
        let err = x.add_entry(y.entries()[0].clone()).unwrap_err();
        assert!(matches!(err, FeedError::EntryOwnership { .. }));
        assert_eq!(x.entries().len(), 1);

        assert_eq!(y.update_entry(5, |_| ()), None);
        assert_eq!(y.update_entry(0, |entry| entry.identifier.take()), Some(Some("x1".to_string())));
    }

    #[test]
    fn test_categories_keep_duplicates() {
        let mut feed = Feed::new();
        let category = Category::new("s", "t");
        feed.add_category(category.clone());
        feed.add_category(category.clone());
        assert_eq!(feed.categories().len(), 2);

        assert!(feed.remove_category(&category));
        assert_eq!(feed.categories(), &[category.clone()]);
        assert!(feed.remove_category(&category));
        assert!(!feed.remove_category(&category));
    }

    #[test]
    fn test_paging_counters_live_in_extension_store() {
        let mut feed = Feed::new();
        feed.set_total_results(Some(42));
        feed.set_items_per_page(Some(10));

        assert_eq!(feed.total_results(), Some(42));
        assert_eq!(feed.items_per_page(), Some(10));
        assert_eq!(feed.start_index(), None);
        assert_eq!(feed.extensions().len(), 2);

        feed.set_total_results(Some(43));
        assert_eq!(feed.total_results(), Some(43));
        assert_eq!(feed.extensions().len(), 2);

        feed.set_total_results(None);
        assert_eq!(feed.total_results(), None);
        assert_eq!(feed.extensions().len(), 1);
    }

    #[test]
    fn test_paging_counters_follow_dialect() {
        let mut feed = Feed::new();
        feed.set_dialect(Dialect::V1);
        feed.set_start_index(Some(1));

        let name = QName::new(OPENSEARCH_V1_NS, "startIndex");
        assert!(feed.extensions().contains(&name));
        assert_eq!(feed.start_index(), Some(1));
    }

    #[test]
    fn test_equality_excludes_generator_and_etag() {
        let mut a = Feed::new();
        a.set_title_text("Same");
        let mut b = a.clone();

        a.set_generator(Some(Generator::new("one")));
        a.set_etag(Some("W/\"1\"".to_string()));
        b.set_generator(Some(Generator::new("two")));
        assert_eq!(a, b);
        assert!(a.diff(&b).is_empty());

        b.set_subtitle_text("Different");
        b.set_logo(Some("logo.png".to_string()));
        assert_eq!(a.diff(&b), vec!["subtitle", "logo"]);
    }

    #[test]
    fn test_clone_gets_own_identity() {
        let mut feed = Feed::new();
        feed.add_entry(entry("a")).unwrap();
        let copy = feed.clone();

        assert_ne!(copy.id(), feed.id());
        assert_eq!(copy.entries()[0].owner(), Some(copy.id()));
        assert_eq!(copy, feed);
    }

    #[test]
    fn test_feed_id_display() {
        let id = FeedId(7);
        assert_eq!(id.to_string(), "#7");
    }
}
