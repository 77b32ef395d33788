//! Namespace, relation and scheme constants, plus service version handling.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{FeedError, Result};

/// Atom syndication namespace.
pub const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

/// GData common namespace (`gd:etag`, `gd:when`, `gd:where`).
pub const GD_NS: &str = "http://schemas.google.com/g/2005";

/// OpenSearch namespace used by service version 1.
pub const OPENSEARCH_V1_NS: &str = "http://a9.com/-/spec/opensearchrss/1.0/";

/// OpenSearch namespace used by service version 2 and later.
pub const OPENSEARCH_V2_NS: &str = "http://a9.com/-/spec/opensearch/1.1/";

/// Atom publishing protocol draft namespace used by service version 1.
pub const APP_V1_NS: &str = "http://purl.org/atom/app#";

/// Atom publishing protocol namespace used by service version 2 and later.
pub const APP_V2_NS: &str = "http://www.w3.org/2007/app";

/// Batch processing namespace.
pub const BATCH_NS: &str = "http://schemas.google.com/gdata/batch";

/// GeoRSS namespace.
pub const GEORSS_NS: &str = "http://www.georss.org/georss";

/// Picasa photo namespace.
pub const GPHOTO_NS: &str = "http://schemas.google.com/photos/2007";

/// The XML namespace (`xml:lang`).
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Category scheme whose term names an entry's kind.
pub const KIND_SCHEME: &str = "http://schemas.google.com/g/2005#kind";

/// Kind term for calendar events.
pub const EVENT_KIND: &str = "http://schemas.google.com/g/2005#event";

/// Kind term for geotagged entries.
pub const LOCATION_KIND: &str = "http://schemas.google.com/g/2005#location";

/// Kind term for photos.
pub const PHOTO_KIND: &str = "http://schemas.google.com/photos/2007#photo";

/// Canonical link relations.
pub mod rel {
    /// The feed an entry or service document points to.
    pub const FEED: &str = "http://schemas.google.com/g/2005#feed";
    /// Alternate representation.
    pub const ALTERNATE: &str = "alternate";
    /// Related resource.
    pub const RELATED: &str = "related";
    /// URI to post new entries to.
    pub const POST: &str = "http://schemas.google.com/g/2005#post";
    /// URI for batch requests.
    pub const BATCH: &str = "http://schemas.google.com/g/2005#batch";
    /// The feed itself.
    pub const SELF: &str = "self";
    /// Next page of results.
    pub const NEXT: &str = "next";
    /// Previous page of results.
    pub const PREVIOUS: &str = "previous";
}

/// Service version pattern: MAJOR or MAJOR.MINOR.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static SERVICE_VERSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)(?:\.(\d+))?$").expect("valid regex"));

/// Namespace dialect selected by the service version.
///
/// Parsing accepts either dialect; the dialect only decides what gets written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// OpenSearch RSS 1.0 and the 2005 app draft.
    V1,
    /// OpenSearch 1.1 and AtomPub 2007.
    #[default]
    V2,
}

impl Dialect {
    /// Namespace for `totalResults`, `startIndex` and `itemsPerPage`.
    #[must_use]
    pub fn opensearch_ns(&self) -> &'static str {
        match self {
            Self::V1 => OPENSEARCH_V1_NS,
            Self::V2 => OPENSEARCH_V2_NS,
        }
    }

    /// Namespace for `app:control`.
    #[must_use]
    pub fn app_ns(&self) -> &'static str {
        match self {
            Self::V1 => APP_V1_NS,
            Self::V2 => APP_V2_NS,
        }
    }
}

/// A validated service version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceVersion {
    pub major: u32,
    pub minor: u32,
}

impl ServiceVersion {
    /// Parse a service version string.
    ///
    /// # Examples
    /// ```
    /// use feedmodel::config::{Dialect, ServiceVersion};
    ///
    /// let version = ServiceVersion::parse("2.1").unwrap();
    /// assert_eq!(version.major, 2);
    /// assert_eq!(version.dialect(), Dialect::V2);
    /// assert!(ServiceVersion::parse("v2").is_err());
    /// ```
    pub fn parse(version: &str) -> Result<Self> {
        let invalid = || FeedError::InvalidServiceVersion(version.to_string());
        let caps = SERVICE_VERSION_PATTERN
            .captures(version.trim())
            .ok_or_else(invalid)?;

        let major = caps[1].parse().map_err(|_| invalid())?;
        let minor = match caps.get(2) {
            Some(m) => m.as_str().parse().map_err(|_| invalid())?,
            None => 0,
        };

        Ok(Self { major, minor })
    }

    /// Namespace dialect for this version.
    #[must_use]
    pub fn dialect(&self) -> Dialect {
        if self.major >= 2 {
            Dialect::V2
        } else {
            Dialect::V1
        }
    }
}

/// Resolve an optional service version hint into a dialect.
///
/// No hint means the current dialect.
pub fn dialect_for(service_version: Option<&str>) -> Result<Dialect> {
    match service_version {
        Some(v) => Ok(ServiceVersion::parse(v)?.dialect()),
        None => Ok(Dialect::default()),
    }
}

/// Whether a namespace is one of the OpenSearch namespaces.
#[must_use]
pub fn is_opensearch_ns(ns: &str) -> bool {
    ns == OPENSEARCH_V1_NS || ns == OPENSEARCH_V2_NS
}

/// Whether a namespace is one of the AtomPub namespaces.
#[must_use]
pub fn is_app_ns(ns: &str) -> bool {
    ns == APP_V1_NS || ns == APP_V2_NS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_service_version_valid() {
        assert_eq!(
            ServiceVersion::parse("1.0").unwrap(),
            ServiceVersion { major: 1, minor: 0 }
        );
        assert_eq!(
            ServiceVersion::parse("2").unwrap(),
            ServiceVersion { major: 2, minor: 0 }
        );
        assert_eq!(
            ServiceVersion::parse(" 3.14 ").unwrap(),
            ServiceVersion { major: 3, minor: 14 }
        );
    }

    #[test]
    fn test_parse_service_version_invalid() {
        assert!(ServiceVersion::parse("").is_err());
        assert!(ServiceVersion::parse("v2").is_err());
        assert!(ServiceVersion::parse("2.").is_err());
        assert!(ServiceVersion::parse("1.2.3").is_err());
        assert!(ServiceVersion::parse("99999999999").is_err()); // Overflows u32
    }

    #[test]
    fn test_dialect_selection() {
        assert_eq!(dialect_for(None).unwrap(), Dialect::V2);
        assert_eq!(dialect_for(Some("1.0")).unwrap(), Dialect::V1);
        assert_eq!(dialect_for(Some("2.0")).unwrap(), Dialect::V2);
        assert_eq!(dialect_for(Some("3")).unwrap(), Dialect::V2);
        assert!(dialect_for(Some("latest")).is_err());
    }

    #[test]
    fn test_dialect_namespaces() {
        assert_eq!(Dialect::V1.opensearch_ns(), OPENSEARCH_V1_NS);
        assert_eq!(Dialect::V2.opensearch_ns(), OPENSEARCH_V2_NS);
        assert_eq!(Dialect::V1.app_ns(), APP_V1_NS);
        assert_eq!(Dialect::V2.app_ns(), APP_V2_NS);
        assert!(is_opensearch_ns(OPENSEARCH_V1_NS));
        assert!(!is_opensearch_ns(ATOM_NS));
        assert!(is_app_ns(APP_V2_NS));
    }
}
