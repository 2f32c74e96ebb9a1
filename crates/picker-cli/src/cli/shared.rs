use super::*;

pub(super) const TOKEN_ENV: &str = "GITHUB_TOKEN";
pub(super) const EMPTY_CONTENT: &str = "No results found.";

pub(super) fn build_provider(config: &PickerConfig) -> anyhow::Result<GitHubSearchProvider> {
    let token = config
        .token
        .clone()
        .or_else(|| std::env::var(TOKEN_ENV).ok());
    debug!(
        host = %config.api_host,
        authenticated = token.is_some(),
        "building GitHub search provider"
    );
    GitHubSearchProvider::new(config.api_host.clone(), token)
}

/// Known repositories come from `--repos` when given, else from the config.
pub(super) fn known_repositories(
    config: &PickerConfig,
    repos: Option<&Path>,
) -> anyhow::Result<Vec<RepositoryRecord>> {
    match repos {
        Some(path) => load_repositories(path),
        None => Ok(config.repositories.clone()),
    }
}

pub(super) fn render_entries(entries: &[MergedEntry<'_>], install: Option<&str>) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(link) = install {
        lines.push(format!("  [install] Add more repositories... {link}"));
    }
    let mut section = None;
    for entry in entries {
        if section != Some(entry.origin) {
            section = Some(entry.origin);
            lines.push(format!("{}:", entry.origin));
        }
        lines.push(format!("  [{}] {}", entry.key(), entry.label()));
    }
    if entries.is_empty() {
        lines.push(EMPTY_CONTENT.to_string());
    }
    lines
}
