use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitHubSearchError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Repository {0} is already a favorite")]
    DuplicateFavorite(i64),

    #[error("GitHub API error ({status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Malformed upstream response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("Favorites store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl GitHubSearchError {
    /// True for every failure that originated with the GitHub API call.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            GitHubSearchError::Upstream { .. }
                | GitHubSearchError::Network(_)
                | GitHubSearchError::MalformedResponse(_)
        )
    }

    /// True for failures caused by the caller's input rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            GitHubSearchError::Validation(_) | GitHubSearchError::DuplicateFavorite(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, GitHubSearchError>;
