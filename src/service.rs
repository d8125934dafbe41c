use crate::error::{GitHubSearchError, Result};
use crate::favorites::FavoritesStore;
use crate::github::RepositorySource;
use crate::models::Repository;
use crate::relevance;
use std::sync::Arc;

/// Orchestrates upstream lookups, relevance ranking and favorites.
#[derive(Clone)]
pub struct RepositoryService {
    source: Arc<dyn RepositorySource>,
    favorites: FavoritesStore,
}

impl RepositoryService {
    pub fn new(source: Arc<dyn RepositorySource>, favorites: FavoritesStore) -> Self {
        Self { source, favorites }
    }

    /// Search GitHub and return the hits ranked by relevance.
    pub async fn search(&self, query: &str) -> Result<Vec<Repository>> {
        if query.trim().is_empty() {
            return Err(GitHubSearchError::Validation("Query must not be empty".to_string()));
        }

        let repos = self.source.search(query).await?;
        Ok(relevance::rank(&repos))
    }

    /// A user's public repositories ranked by relevance. An absent listing
    /// is treated as empty.
    pub async fn list_user_repositories(&self, username: &str) -> Result<Vec<Repository>> {
        if username.trim().is_empty() {
            return Err(GitHubSearchError::Validation("Username must not be empty".to_string()));
        }

        let repos = self
            .source
            .list_user_repositories(username)
            .await?
            .unwrap_or_default();
        Ok(relevance::rank(&repos))
    }

    pub async fn add_favorite(&self, repo: Repository) -> Result<()> {
        self.favorites.add(repo).await
    }

    /// Removing an id that is not a favorite is not an error.
    pub async fn remove_favorite(&self, id: i64) -> Result<()> {
        self.favorites.remove(id).await.map(|_| ())
    }

    pub async fn list_favorites(&self) -> Result<Vec<Repository>> {
        self.favorites.list().await
    }

    pub async fn favorites_count(&self) -> Result<usize> {
        self.favorites.len().await
    }
}
