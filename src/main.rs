mod app;
mod config;
mod error;
mod github;
mod util;
mod view;

use crate::app::App;
use crate::config::app_config::Config;
use crate::github::client::GithubClient;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::load().map_err(|e| anyhow::anyhow!("{}", snafu::Report::from_error(e)))?;

    if config.github_token.is_none() {
        warn!("GITHUB_TOKEN is not set, using unauthenticated GitHub API access");
    } else {
        info!("Using GitHub token from configuration");
    }

    // One client for the lifetime of the process, shared by every request.
    let github = GithubClient::from_config(&config)?;
    let router = github::web::router(App::new(github));

    let address = config.address();
    info!("Listening on {address}");

    let listener = tokio::net::TcpListener::bind(address).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
