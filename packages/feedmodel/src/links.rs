//! Relation lookups over a link collection.

use crate::config::rel;
use crate::types::Link;

/// Read-only view answering "first link with relation X" queries.
///
/// Holds only a borrow of the link slice; every query walks it again, so
/// the view can never disagree with the collection it was made from.
#[derive(Debug, Clone, Copy)]
pub struct LinkIndex<'a> {
    links: &'a [Link],
}

impl<'a> LinkIndex<'a> {
    #[must_use]
    pub fn new(links: &'a [Link]) -> Self {
        Self { links }
    }

    /// First link in document order with the given relation.
    ///
    /// # Examples
    /// ```
    /// use feedmodel::{Link, LinkIndex};
    ///
    /// let links = vec![
    ///     Link::new("next", "A"),
    ///     Link::new("self", "B"),
    ///     Link::new("next", "C"),
    /// ];
    /// let index = LinkIndex::new(&links);
    /// assert_eq!(index.first_with_rel("next").map(|l| l.href.as_str()), Some("A"));
    /// ```
    #[must_use]
    pub fn first_with_rel(&self, rel: &str) -> Option<&'a Link> {
        self.links.iter().find(|link| link.has_rel(rel))
    }

    /// All links with the given relation, in document order.
    pub fn all_with_rel(&self, rel: &'a str) -> impl Iterator<Item = &'a Link> + 'a {
        self.links.iter().filter(move |link| link.has_rel(rel))
    }

    #[must_use]
    pub fn feed_link(&self) -> Option<&'a Link> {
        self.first_with_rel(rel::FEED)
    }

    #[must_use]
    pub fn alternate_link(&self) -> Option<&'a Link> {
        self.first_with_rel(rel::ALTERNATE)
    }

    #[must_use]
    pub fn related_link(&self) -> Option<&'a Link> {
        self.first_with_rel(rel::RELATED)
    }

    #[must_use]
    pub fn post_link(&self) -> Option<&'a Link> {
        self.first_with_rel(rel::POST)
    }

    #[must_use]
    pub fn batch_link(&self) -> Option<&'a Link> {
        self.first_with_rel(rel::BATCH)
    }

    #[must_use]
    pub fn self_link(&self) -> Option<&'a Link> {
        self.first_with_rel(rel::SELF)
    }

    #[must_use]
    pub fn next_link(&self) -> Option<&'a Link> {
        self.first_with_rel(rel::NEXT)
    }

    #[must_use]
    pub fn previous_link(&self) -> Option<&'a Link> {
        self.first_with_rel(rel::PREVIOUS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Link> {
        vec![
            Link::new(rel::NEXT, "A"),
            Link::new(rel::SELF, "B"),
            Link::new(rel::NEXT, "C"),
            Link::new(rel::POST, "D"),
        ]
    }

    #[test]
    fn test_first_match_in_document_order() {
        let links = sample();
        let index = LinkIndex::new(&links);

        assert_eq!(index.next_link().map(|l| l.href.as_str()), Some("A"));
        assert_eq!(index.self_link().map(|l| l.href.as_str()), Some("B"));
        assert_eq!(index.post_link().map(|l| l.href.as_str()), Some("D"));
    }

    #[test]
    fn test_missing_relations_are_absent() {
        let links = sample();
        let index = LinkIndex::new(&links);

        assert!(index.previous_link().is_none());
        assert!(index.alternate_link().is_none());
        assert!(index.related_link().is_none());
        assert!(index.batch_link().is_none());
        assert!(index.feed_link().is_none());
    }

    #[test]
    fn test_all_with_rel() {
        let links = sample();
        let index = LinkIndex::new(&links);
        let hrefs: Vec<&str> = index.all_with_rel(rel::NEXT).map(|l| l.href.as_str()).collect();
        assert_eq!(hrefs, vec!["A", "C"]);
    }

    #[test]
    fn test_link_without_rel_never_matches() {
        let links = vec![Link {
            href: "X".to_string(),
            ..Link::default()
        }];
        assert!(LinkIndex::new(&links).alternate_link().is_none());
    }
}
