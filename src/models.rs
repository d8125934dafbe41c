use crate::error::{GitHubSearchError, Result};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A public GitHub repository.
///
/// Identity is the GitHub id: two values with the same id compare equal
/// even when their metrics differ.
#[derive(Debug, Clone)]
pub struct Repository {
    id: i64,
    name: String,
    description: String,
    url: String,
    stars: u32,
    forks: u32,
    watchers: u32,
}

impl Repository {
    /// Build a repository, rejecting a blank name or url.
    pub fn new(
        id: i64,
        name: impl Into<String>,
        description: impl Into<String>,
        url: impl Into<String>,
        stars: u32,
        forks: u32,
        watchers: u32,
    ) -> Result<Self> {
        let name = name.into();
        let url = url.into();

        if name.trim().is_empty() {
            return Err(GitHubSearchError::Validation(
                "Repository name must not be empty".to_string(),
            ));
        }
        if url.trim().is_empty() {
            return Err(GitHubSearchError::Validation(
                "Repository url must not be empty".to_string(),
            ));
        }

        Ok(Repository {
            id,
            name,
            description: description.into(),
            url,
            stars,
            forks,
            watchers,
        })
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn stars(&self) -> u32 {
        self.stars
    }

    pub fn forks(&self) -> u32 {
        self.forks
    }

    pub fn watchers(&self) -> u32 {
        self.watchers
    }

    /// Replace the mutable metrics in place. Id, name and url are untouched.
    pub fn update_metrics(
        &mut self,
        description: impl Into<String>,
        stars: u32,
        forks: u32,
        watchers: u32,
    ) {
        self.description = description.into();
        self.stars = stars;
        self.forks = forks;
        self.watchers = watchers;
    }
}

impl PartialEq for Repository {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Repository {}

impl Hash for Repository {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Repository: {} (Id: {}), Stars: {}, Forks: {}, Watchers: {}",
            self.name, self.id, self.stars, self.forks, self.watchers
        )
    }
}
