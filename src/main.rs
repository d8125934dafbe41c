use clap::Parser;
use colored::*;
use github_search_server::api::{create_router, AppState};
use github_search_server::cli::Cli;
use github_search_server::favorites::FavoritesStore;
use github_search_server::github::GitHubClient;
use github_search_server::service::RepositoryService;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    println!("{}", "GitHub Search Server".bold().green());
    println!("{}\n", "=".repeat(50).dimmed());

    let client = GitHubClient::new(cli.github_client_config())?;
    if cli.github_token.is_none() {
        println!("{}", "No GITHUB_TOKEN set, using unauthenticated GitHub API".yellow());
    }

    let (favorites, favorites_handle) = FavoritesStore::spawn()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to start favorites store: {}", e))?;

    let service = RepositoryService::new(Arc::new(client), favorites.clone());
    let app = create_router(AppState::new(service));

    let listener = tokio::net::TcpListener::bind(&cli.bind_addr).await?;
    info!("GitHub API: {}", cli.github_api_url);
    println!("✅ Listening on http://{}", cli.bind_addr);
    println!("\nPress Ctrl+C to stop the server\n");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            println!("\n🛑 Shutting down server...");
        })
        .await?;

    favorites.stop();
    favorites_handle.await?;

    println!("✅ Server stopped");
    Ok(())
}
