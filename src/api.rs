use crate::error::GitHubSearchError;
use crate::health;
use crate::models::Repository;
use crate::relevance;
use crate::service::RepositoryService;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use url::Url;

/// Shared state for every handler
#[derive(Clone)]
pub struct AppState {
    pub service: RepositoryService,
    pub start_time: Instant,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(service: RepositoryService) -> Self {
        Self {
            service,
            start_time: Instant::now(),
            started_at: Utc::now(),
        }
    }
}

/// Response for successful mutations
#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

/// Response for errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Repository as returned to clients
#[derive(Debug, Serialize, Deserialize)]
pub struct RepositoryResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub html_url: String,
    pub stars: u32,
    pub forks: u32,
    pub watchers: u32,
    pub relevance: u64,
}

impl From<&Repository> for RepositoryResponse {
    fn from(repo: &Repository) -> Self {
        Self {
            id: repo.id(),
            name: repo.name().to_string(),
            description: repo.description().to_string(),
            html_url: repo.url().to_string(),
            stars: repo.stars(),
            forks: repo.forks(),
            watchers: repo.watchers(),
            relevance: relevance::score(repo),
        }
    }
}

/// Body of a "mark as favorite" request
#[derive(Debug, Deserialize)]
pub struct RepositoryRequest {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub html_url: String,
    #[serde(default)]
    pub stars: u32,
    #[serde(default)]
    pub forks: u32,
    #[serde(default)]
    pub watchers: u32,
}

const NAME_MIN_LEN: usize = 3;
const NAME_MAX_LEN: usize = 100;

impl RepositoryRequest {
    pub fn into_repository(self) -> Result<Repository, GitHubSearchError> {
        let name_len = self.name.trim().chars().count();
        if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&name_len) {
            return Err(GitHubSearchError::Validation(format!(
                "name must be between {} and {} characters",
                NAME_MIN_LEN, NAME_MAX_LEN
            )));
        }

        match Url::parse(&self.html_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => {
                return Err(GitHubSearchError::Validation(format!(
                    "html_url is not a valid http(s) URL: {}",
                    self.html_url
                )))
            }
        }

        Repository::new(
            self.id,
            self.name,
            self.description,
            self.html_url,
            self.stars,
            self.forks,
            self.watchers,
        )
    }
}

/// Query parameters for repository search
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub name: Option<String>,
}

impl IntoResponse for GitHubSearchError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            warn!("Rejected request: {}", self);
            StatusCode::BAD_REQUEST
        } else {
            error!("Request failed: {}", self);
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let message = if self.is_client_error() {
            self.to_string()
        } else {
            "Internal server error".to_string()
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

fn to_responses(repos: &[Repository]) -> Vec<RepositoryResponse> {
    repos.iter().map(RepositoryResponse::from).collect()
}

/// Create the full application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/repos", get(search_repos))
        .route("/api/users/:username/repos", get(list_user_repos))
        .route("/api/favorites", get(list_favorites).post(add_favorite))
        .route("/api/favorites/:repo_id", delete(remove_favorite))
        .merge(health::create_health_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Search public repositories by name, ranked by relevance
async fn search_repos(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<RepositoryResponse>>, GitHubSearchError> {
    let Query(params) =
        params.map_err(|rejection| GitHubSearchError::Validation(rejection.body_text()))?;
    let query = params.name.unwrap_or_default();
    let repos = state.service.search(&query).await?;

    info!("Search for {:?} returned {} repositories", query, repos.len());
    Ok(Json(to_responses(&repos)))
}

/// List a user's public repositories, ranked by relevance
async fn list_user_repos(
    State(state): State<AppState>,
    username: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<RepositoryResponse>>, GitHubSearchError> {
    let Path(username) =
        username.map_err(|rejection| GitHubSearchError::Validation(rejection.body_text()))?;
    let repos = state.service.list_user_repositories(&username).await?;

    info!("Found {} repositories for user {}", repos.len(), username);
    Ok(Json(to_responses(&repos)))
}

/// List current favorites
async fn list_favorites(
    State(state): State<AppState>,
) -> Result<Json<Vec<RepositoryResponse>>, GitHubSearchError> {
    let favorites = state.service.list_favorites().await?;
    Ok(Json(to_responses(&favorites)))
}

/// Mark a repository as favorite
async fn add_favorite(
    State(state): State<AppState>,
    payload: Result<Json<RepositoryRequest>, JsonRejection>,
) -> Result<impl IntoResponse, GitHubSearchError> {
    let Json(request) =
        payload.map_err(|rejection| GitHubSearchError::Validation(rejection.body_text()))?;
    let repo = request.into_repository()?;
    let (id, name) = (repo.id(), repo.name().to_string());

    state.service.add_favorite(repo).await?;

    info!("Repository {} (ID: {}) added to favorites", name, id);
    Ok((
        StatusCode::OK,
        Json(SuccessResponse {
            success: true,
            message: format!("Repository {} added to favorites", id),
        }),
    ))
}

/// Remove a repository from favorites
async fn remove_favorite(
    State(state): State<AppState>,
    repo_id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, GitHubSearchError> {
    let Path(repo_id) =
        repo_id.map_err(|rejection| GitHubSearchError::Validation(rejection.body_text()))?;
    state.service.remove_favorite(repo_id).await?;

    info!("Repository {} removed from favorites", repo_id);
    Ok((
        StatusCode::OK,
        Json(SuccessResponse {
            success: true,
            message: format!("Repository {} removed from favorites", repo_id),
        }),
    ))
}
