pub mod github;
mod github_models;
pub mod http;

pub use github::GitHubSearchProvider;
