#![allow(dead_code)]

use async_trait::async_trait;
use github_search_server::error::{GitHubSearchError, Result};
use github_search_server::favorites::FavoritesStore;
use github_search_server::github::RepositorySource;
use github_search_server::models::Repository;
use github_search_server::service::RepositoryService;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// What the fake upstream answers with
#[derive(Clone)]
pub enum FakeResponse {
    Repos(Vec<Repository>),
    Absent,
    Status(u16, &'static str),
}

impl FakeResponse {
    fn to_result(&self) -> Result<Option<Vec<Repository>>> {
        match self {
            FakeResponse::Repos(repos) => Ok(Some(repos.clone())),
            FakeResponse::Absent => Ok(None),
            FakeResponse::Status(status, message) => Err(GitHubSearchError::Upstream {
                status: *status,
                message: message.to_string(),
            }),
        }
    }
}

/// In-process stand-in for the GitHub client
pub struct FakeSource {
    response: FakeResponse,
    pub calls: AtomicUsize,
}

impl FakeSource {
    pub fn new(response: FakeResponse) -> Arc<Self> {
        Arc::new(Self {
            response,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RepositorySource for FakeSource {
    async fn search(&self, _query: &str) -> Result<Vec<Repository>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.to_result()?.unwrap_or_default())
    }

    async fn list_user_repositories(&self, _username: &str) -> Result<Option<Vec<Repository>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.to_result()
    }
}

pub fn repo(id: i64, stars: u32, forks: u32, watchers: u32) -> Repository {
    Repository::new(
        id,
        format!("repo-{}", id),
        format!("description {}", id),
        format!("https://github.com/owner/repo-{}", id),
        stars,
        forks,
        watchers,
    )
    .expect("valid repository")
}

pub fn ids(repos: &[Repository]) -> Vec<i64> {
    repos.iter().map(Repository::id).collect()
}

pub struct TestContext {
    pub source: Arc<FakeSource>,
    pub favorites: FavoritesStore,
    pub service: RepositoryService,
    handle: JoinHandle<()>,
}

impl TestContext {
    pub async fn new(response: FakeResponse) -> anyhow::Result<Self> {
        let source = FakeSource::new(response);
        let (favorites, handle) = FavoritesStore::spawn()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to spawn favorites store: {}", e))?;
        let service = RepositoryService::new(source.clone(), favorites.clone());

        Ok(TestContext {
            source,
            favorites,
            service,
            handle,
        })
    }

    pub async fn shutdown(self) {
        self.favorites.stop();
        let _ = self.handle.await;
    }
}
