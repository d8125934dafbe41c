use crate::models::Repository;
use serde::Deserialize;

// GitHub API response structures
#[derive(Debug, Deserialize)]
pub struct GitHubSearchResponse {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    #[serde(default)]
    pub items: Vec<GitHubRepoItem>,
}

#[derive(Debug, Deserialize)]
pub struct GitHubRepoItem {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub html_url: Option<String>,
    pub description: Option<String>,
    pub stargazers_count: Option<u32>,
    pub forks_count: Option<u32>,
    pub watchers_count: Option<u32>,
}

impl GitHubRepoItem {
    /// Convert into a domain repository. Items without an id or a usable
    /// name or html_url yield `None`; null counts read as zero.
    pub fn into_repository(self) -> Option<Repository> {
        let id = self.id?;
        let name = self.name.filter(|n| !n.trim().is_empty())?;
        let url = self.html_url.filter(|u| !u.trim().is_empty())?;

        Repository::new(
            id,
            name,
            self.description.unwrap_or_default(),
            url,
            self.stargazers_count.unwrap_or(0),
            self.forks_count.unwrap_or(0),
            self.watchers_count.unwrap_or(0),
        )
        .ok()
    }
}

/// Convert a batch of items, silently dropping the unusable ones.
pub fn into_repositories(items: Vec<GitHubRepoItem>) -> Vec<Repository> {
    items
        .into_iter()
        .filter_map(GitHubRepoItem::into_repository)
        .collect()
}
