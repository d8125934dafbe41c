use crate::github::{GitHubClientConfig, DEFAULT_API_BASE_URL};
use clap::Parser;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "github-search-server")]
#[command(about = "GitHub Search Server - Searches GitHub repositories, ranks them by relevance and keeps favorites")]
#[command(version)]
pub struct Cli {
    /// Address the HTTP server binds to
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind_addr: String,

    /// Base URL of the GitHub REST API
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_BASE_URL)]
    pub github_api_url: String,

    /// Optional GitHub token, sent as `Authorization: token <t>`
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// GitHub request timeout in seconds
    #[arg(long, env = "GITHUB_REQUEST_TIMEOUT", default_value_t = 30)]
    pub request_timeout: u64,

    /// Retries after a GitHub server error or timeout
    #[arg(long, env = "GITHUB_MAX_RETRIES", default_value_t = 2)]
    pub max_retries: u32,

    /// Default log filter when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    pub fn github_client_config(&self) -> GitHubClientConfig {
        GitHubClientConfig {
            base_url: self.github_api_url.clone(),
            token: self.github_token.clone(),
            timeout: Duration::from_secs(self.request_timeout),
            max_retries: self.max_retries,
            ..Default::default()
        }
    }
}
