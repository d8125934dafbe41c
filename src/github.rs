use crate::error::{GitHubSearchError, Result};
use crate::models::Repository;
use crate::types::{into_repositories, GitHubRepoItem, GitHubSearchResponse};
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Where repositories come from. Implemented by [`GitHubClient`] and by
/// test doubles.
#[async_trait]
pub trait RepositorySource: Send + Sync {
    /// Search public repositories matching `query`.
    async fn search(&self, query: &str) -> Result<Vec<Repository>>;

    /// Public repositories owned by `username`. `None` when upstream
    /// answered with an empty (null) listing.
    async fn list_user_repositories(&self, username: &str) -> Result<Option<Vec<Repository>>>;
}

#[derive(Debug, Clone)]
pub struct GitHubClientConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub user_agent: String,
    pub timeout: Duration,
    /// Extra attempts after a 5xx or a timeout/connect failure.
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for GitHubClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            token: None,
            user_agent: format!("GitHub Search Server/{}", env!("CARGO_PKG_VERSION")),
            timeout: Duration::from_secs(30),
            max_retries: 2,
            retry_delay: Duration::from_secs(1),
        }
    }
}

pub struct GitHubClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
    max_retries: u32,
    retry_delay: Duration,
}

impl GitHubClient {
    pub fn new(config: GitHubClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            GitHubSearchError::Validation(format!("Invalid GitHub API URL {}: {}", config.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(GitHubSearchError::Validation(format!(
                "GitHub API URL cannot be used as a base: {}",
                config.base_url
            )));
        }

        let client = Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .build()?;

        Ok(GitHubClient {
            client,
            base_url,
            token: config.token,
            max_retries: config.max_retries,
            retry_delay: config.retry_delay,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                GitHubSearchError::Validation(format!(
                    "GitHub API URL cannot be used as a base: {}",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn make_request(&self, url: &Url) -> Result<Response> {
        let mut retries = 0;

        loop {
            debug!(%url, attempt = retries + 1, "GitHub request");

            let mut request = self
                .client
                .get(url.clone())
                .header("Accept", "application/vnd.github.v3+json");
            if let Some(token) = &self.token {
                request = request.header("Authorization", format!("token {}", token));
            }

            match request.send().await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) if response.status().is_server_error() && retries < self.max_retries => {
                    warn!(
                        "Server error ({}) from GitHub. Retrying in {:?}...",
                        response.status(),
                        self.retry_delay
                    );
                }
                Ok(response) => {
                    let status = response.status();
                    let error_text = response.text().await.unwrap_or_default();
                    return Err(GitHubSearchError::Upstream {
                        status: status.as_u16(),
                        message: error_text,
                    });
                }
                Err(e) if (e.is_timeout() || e.is_connect()) && retries < self.max_retries => {
                    warn!("Request to GitHub failed ({}). Retrying in {:?}...", e, self.retry_delay);
                }
                Err(e) => return Err(e.into()),
            }

            sleep(self.retry_delay).await;
            retries += 1;
        }
    }
}

#[async_trait]
impl RepositorySource for GitHubClient {
    async fn search(&self, query: &str) -> Result<Vec<Repository>> {
        if query.trim().is_empty() {
            return Err(GitHubSearchError::Validation("Query must not be empty".to_string()));
        }

        let mut url = self.endpoint(&["search", "repositories"])?;
        url.query_pairs_mut().append_pair("q", query);

        let body = self.make_request(&url).await?.text().await?;
        let result: GitHubSearchResponse = serde_json::from_str(&body)?;

        debug!(
            total_count = result.total_count,
            incomplete = result.incomplete_results,
            "GitHub search for {:?} returned {} items",
            query,
            result.items.len()
        );

        Ok(into_repositories(result.items))
    }

    async fn list_user_repositories(&self, username: &str) -> Result<Option<Vec<Repository>>> {
        if username.trim().is_empty() {
            return Err(GitHubSearchError::Validation("Username must not be empty".to_string()));
        }

        let url = self.endpoint(&["users", username, "repos"])?;

        let body = self.make_request(&url).await?.text().await?;
        let items: Option<Vec<GitHubRepoItem>> = serde_json::from_str(&body)?;

        Ok(items.map(into_repositories))
    }
}
