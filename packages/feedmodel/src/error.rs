//! Error types for the feed model.
//!
//! A single `FeedError` covers parsing, ownership checks on entry
//! collections, and serialization.

use thiserror::Error;

use crate::feed::FeedId;

/// Main error type for the feedmodel library.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Input bytes are not valid UTF-8.
    #[error("Feed document is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// XML parsing failed. The roxmltree error carries the text position.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// The document root is not an Atom feed element.
    #[error("Expected <feed> in the Atom namespace as document root, found <{found}>{}", .namespace.as_ref().map(|ns| format!(" in {ns}")).unwrap_or_default())]
    UnexpectedRoot {
        found: String,
        namespace: Option<String>,
    },

    /// Invalid service version string.
    #[error("Invalid service version: '{0}'. Expected MAJOR or MAJOR.MINOR (e.g., 2.0)")]
    InvalidServiceVersion(String),

    /// An entry owned by one feed was attached to another without copying.
    #[error("Entry '{entry_id}' is already owned by feed {owner}; cannot attach it to feed {target} without copying")]
    EntryOwnership {
        entry_id: String,
        owner: FeedId,
        target: FeedId,
    },

    /// IO error while writing XML.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// XML serialization failed.
    #[error("XML serialization failed: {0}")]
    XmlWrite(#[from] quick_xml::Error),

    /// JSON serialization of a summary failed.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for feedmodel operations.
pub type Result<T> = std::result::Result<T, FeedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FeedError::InvalidServiceVersion("two".to_string());
        assert!(err.to_string().contains("two"));
        assert!(err.to_string().contains("MAJOR.MINOR"));
    }

    #[test]
    fn test_unexpected_root_with_namespace() {
        let err = FeedError::UnexpectedRoot {
            found: "rss".to_string(),
            namespace: Some("urn:x".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Expected <feed> in the Atom namespace as document root, found <rss> in urn:x"
        );
    }

    #[test]
    fn test_unexpected_root_without_namespace() {
        let err = FeedError::UnexpectedRoot {
            found: "rss".to_string(),
            namespace: None,
        };
        assert_eq!(
            err.to_string(),
            "Expected <feed> in the Atom namespace as document root, found <rss>"
        );
    }

    #[test]
    fn test_xml_parse_error_carries_position() {
        let err = roxmltree::Document::parse("<feed><title></feed>").unwrap_err();
        let feed_err = FeedError::from(err);
        assert!(matches!(feed_err, FeedError::XmlParse(_)));
        assert!(feed_err.to_string().contains("1:"));
    }
}
