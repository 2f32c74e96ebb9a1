use crate::model::RepositoryRecord;
use crate::query::SearchKey;
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, warn};

pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = anyhow::Result<T>> + 'a>>;

pub trait SearchProvider {
    fn name(&self) -> &'static str;
    fn search<'a>(&'a self, key: &'a SearchKey) -> ProviderFuture<'a, Vec<RepositoryRecord>>;
}

/// Identifies one issued search request. Only the ticket of the most recently
/// issued request can update the session.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SearchTicket {
    generation: u64,
    key: SearchKey,
}

impl SearchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn key(&self) -> &SearchKey {
        &self.key
    }
}

#[derive(Debug)]
pub struct SearchCompletion {
    pub ticket: SearchTicket,
    pub outcome: anyhow::Result<Vec<RepositoryRecord>>,
}

pub async fn fetch<P>(provider: &P, ticket: SearchTicket) -> SearchCompletion
where
    P: SearchProvider + ?Sized,
{
    debug!(
        provider = provider.name(),
        key = %ticket.key,
        generation = ticket.generation,
        "searching repositories"
    );
    let outcome = provider.search(&ticket.key).await;
    SearchCompletion { ticket, outcome }
}

/// Last-request-wins holder for the currently displayed search results.
#[derive(Debug, Default)]
pub struct SearchSession {
    generation: u64,
    latest_key: Option<SearchKey>,
    results: Vec<RepositoryRecord>,
    results_key: Option<SearchKey>,
    torn_down: bool,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a request for a settled key.
    ///
    /// Returns `None` when no fetch is needed: the key repeats the latest
    /// request, the key is empty (results are cleared in place), or the
    /// session has been torn down. Any request still in flight is superseded
    /// whenever the key changes.
    pub fn begin(&mut self, key: SearchKey) -> Option<SearchTicket> {
        if self.torn_down {
            return None;
        }
        if self.latest_key.as_ref() == Some(&key) {
            debug!(key = %key, "search key unchanged; skipping fetch");
            return None;
        }
        self.generation += 1;
        self.latest_key = Some(key.clone());
        if key.is_empty() {
            self.results.clear();
            self.results_key = Some(key);
            return None;
        }
        Some(SearchTicket {
            generation: self.generation,
            key,
        })
    }

    /// Applies a finished request. Returns false when the result was
    /// discarded because a newer request superseded it or the session ended.
    pub fn complete(&mut self, completion: SearchCompletion) -> bool {
        let SearchCompletion { ticket, outcome } = completion;
        if self.torn_down || ticket.generation != self.generation {
            debug!(
                key = %ticket.key,
                generation = ticket.generation,
                latest = self.generation,
                "discarding stale search response"
            );
            return false;
        }
        match outcome {
            Ok(records) => {
                debug!(key = %ticket.key, count = records.len(), "search results applied");
                self.results = records;
            }
            Err(err) => {
                warn!(key = %ticket.key, error = %err, "repository search failed");
                self.results.clear();
                // Forget the key so settling on it again retries the fetch.
                self.latest_key = None;
            }
        }
        self.results_key = Some(ticket.key);
        true
    }

    pub fn results(&self) -> &[RepositoryRecord] {
        &self.results
    }

    /// Key the current results belong to.
    pub fn results_key(&self) -> Option<&SearchKey> {
        self.results_key.as_ref()
    }

    pub fn latest_key(&self) -> Option<&SearchKey> {
        self.latest_key.as_ref()
    }

    pub fn teardown(&mut self) {
        self.torn_down = true;
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}
