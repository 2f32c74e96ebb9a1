use crate::github_models::{SearchItem, SearchResponse};
use crate::http::{RetryPolicy, send_with_retry};
use anyhow::Context;
use picker_core::config::PickerConfig;
use picker_core::model::RepositoryRecord;
use picker_core::query::SearchKey;
use picker_core::search::{ProviderFuture, SearchProvider};
use reqwest::{Client, Url};
use tracing::{debug, info};

const USER_AGENT: &str = "repo-picker";
const DEFAULT_PER_PAGE: u32 = 30;

/// Repository search against the GitHub REST API.
pub struct GitHubSearchProvider {
    client: Client,
    host: String,
    token: Option<String>,
    per_page: u32,
    retry: RetryPolicy,
}

impl GitHubSearchProvider {
    pub fn new(host: impl Into<String>, token: Option<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("build http client")?;
        Ok(Self {
            client,
            host: host.into().trim_end_matches('/').to_string(),
            token: token.filter(|token| !token.trim().is_empty()),
            per_page: DEFAULT_PER_PAGE,
            retry: RetryPolicy::default(),
        })
    }

    pub fn from_config(config: &PickerConfig) -> anyhow::Result<Self> {
        Self::new(config.api_host.clone(), config.token.clone())
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.clamp(1, 100);
        self
    }

    async fn search_repositories(&self, key: &SearchKey) -> anyhow::Result<Vec<RepositoryRecord>> {
        let url = search_url(&self.host, key, self.per_page)?;
        debug!(url = %url, "calling GitHub search");
        let mut builder = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        let response = send_with_retry(self.retry, || builder.try_clone().context("clone request"))
            .await
            .context("call GitHub search repositories")?;
        let payload: SearchResponse = response
            .json()
            .await
            .context("decode search response")?;
        info!(
            key = %key,
            total = payload.total_count,
            returned = payload.items.len(),
            incomplete = payload.incomplete_results,
            "GitHub search completed"
        );
        Ok(payload
            .items
            .into_iter()
            .map(SearchItem::into_record)
            .collect())
    }
}

impl SearchProvider for GitHubSearchProvider {
    fn name(&self) -> &'static str {
        "github"
    }

    fn search<'a>(&'a self, key: &'a SearchKey) -> ProviderFuture<'a, Vec<RepositoryRecord>> {
        Box::pin(self.search_repositories(key))
    }
}

pub(crate) fn search_url(host: &str, key: &SearchKey, per_page: u32) -> anyhow::Result<Url> {
    let per_page = per_page.to_string();
    Url::parse_with_params(
        &format!("{}/search/repositories", host.trim_end_matches('/')),
        &[("q", key.as_str()), ("per_page", per_page.as_str())],
    )
    .with_context(|| format!("build search url for host {host}"))
}
