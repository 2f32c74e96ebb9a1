use picker_core::model::RepositoryRecord;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub(crate) total_count: u64,
    #[serde(default)]
    pub(crate) incomplete_results: bool,
    pub(crate) items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchItem {
    pub(crate) id: u64,
    pub(crate) full_name: String,
    pub(crate) stargazers_count: Option<u64>,
}

impl SearchItem {
    pub(crate) fn into_record(self) -> RepositoryRecord {
        RepositoryRecord {
            id: self.id,
            full_name: self.full_name,
            stargazers_count: self.stargazers_count,
        }
    }
}
