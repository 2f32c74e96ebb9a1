use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct RepositoryRecord {
    pub id: u64,
    pub full_name: String,
    #[serde(default)]
    pub stargazers_count: Option<u64>,
}

impl RepositoryRecord {
    pub fn new(id: u64, full_name: impl Into<String>) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            stargazers_count: None,
        }
    }

    pub fn with_stars(mut self, stars: u64) -> Self {
        self.stargazers_count = Some(stars);
        self
    }
}

/// Where a merged entry came from.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum RepoOrigin {
    /// Supplied by the caller's static list of repositories the user owns.
    Known,
    /// Returned by the search provider and not already known.
    Searched,
}

impl RepoOrigin {
    pub fn section_title(&self) -> &'static str {
        match self {
            RepoOrigin::Known => "Your Repos",
            RepoOrigin::Searched => "Public Repos",
        }
    }
}

impl fmt::Display for RepoOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.section_title())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MergedEntry<'a> {
    pub record: &'a RepositoryRecord,
    pub origin: RepoOrigin,
}

impl<'a> MergedEntry<'a> {
    pub fn known(record: &'a RepositoryRecord) -> Self {
        Self {
            record,
            origin: RepoOrigin::Known,
        }
    }

    pub fn searched(record: &'a RepositoryRecord) -> Self {
        Self {
            record,
            origin: RepoOrigin::Searched,
        }
    }

    /// Selection key; the record id as text.
    pub fn key(&self) -> String {
        self.record.id.to_string()
    }

    pub fn label(&self) -> String {
        match self.origin {
            RepoOrigin::Known => self.record.full_name.clone(),
            RepoOrigin::Searched => format!(
                "{} ({}⭐)",
                self.record.full_name,
                self.record.stargazers_count.unwrap_or(0)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_deserializes_without_stars() {
        let value = json!({ "id": 7, "full_name": "octo/cat" });
        let record: RepositoryRecord = serde_json::from_value(value).unwrap();
        assert_eq!(record, RepositoryRecord::new(7, "octo/cat"));
    }

    #[test]
    fn searched_label_shows_popularity() {
        let starred = RepositoryRecord::new(1, "octo/cat").with_stars(42);
        let unstarred = RepositoryRecord::new(2, "octo/dog");
        assert_eq!(MergedEntry::searched(&starred).label(), "octo/cat (42⭐)");
        assert_eq!(MergedEntry::searched(&unstarred).label(), "octo/dog (0⭐)");
        assert_eq!(MergedEntry::known(&starred).label(), "octo/cat");
    }

    #[test]
    fn key_is_id_text() {
        let record = RepositoryRecord::new(1234, "octo/cat");
        assert_eq!(MergedEntry::known(&record).key(), "1234");
    }
}
