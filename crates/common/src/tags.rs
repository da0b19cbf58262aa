//! Tag normalization and matching
//!
//! Tags are declared on a suite as one comma-separated string and requested
//! by the client the same way. Both sides go through [`normalize`] before
//! comparison.

/// Split a comma-separated tag string into trimmed, lowercased tags.
///
/// `None` stands for a missing or non-string value and yields no tags;
/// callers treat an empty result as [`TagSet::All`].
pub fn normalize(tag_string: Option<&str>) -> Vec<String> {
    match tag_string {
        Some(s) => s.split(',').map(|tag| tag.trim().to_lowercase()).collect(),
        None => Vec::new(),
    }
}

/// Tags requested by a client
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TagSet {
    /// Matches every suite
    #[default]
    All,
    Tags(Vec<String>),
}

impl TagSet {
    /// Build the requested set from the raw `tags` query value.
    pub fn from_query(raw: Option<&str>) -> Self {
        let tags = match raw {
            Some(s) if !s.is_empty() => normalize(Some(s)),
            _ => Vec::new(),
        };
        if tags.is_empty() {
            TagSet::All
        } else {
            TagSet::Tags(tags)
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, TagSet::All)
    }

    /// AND semantics: every requested tag must be carried by the suite.
    /// Extra suite tags are irrelevant.
    pub fn matches(&self, suite_tags: &[String]) -> bool {
        match self {
            TagSet::All => true,
            TagSet::Tags(requested) => requested.iter().all(|tag| suite_tags.contains(tag)),
        }
    }
}

/// Free-function form of [`TagSet::matches`].
pub fn matches(requested: &TagSet, suite_tags: &[String]) -> bool {
    requested.matches(suite_tags)
}
