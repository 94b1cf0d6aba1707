use std::sync::Arc;

use folio_bff::{
    build_app,
    config::Config,
    github::GitHubClient,
    logging,
    netlify::NetlifyProbe,
    store::{MemoryStore, RedisStore, SiteStore},
    AppState, ProxySettings,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    logging::init_logging();

    let config = Config::from_env()?;

    let store: Arc<dyn SiteStore> = match config.redis_url.as_deref() {
        Some(redis_url) => Arc::new(RedisStore::connect(redis_url).await?),
        None => {
            warn!("REDIS_URL not set, records are kept in memory and lost on restart");
            Arc::new(MemoryStore::new())
        }
    };
    let github = Arc::new(GitHubClient::new(&config)?);
    let probe = Arc::new(NetlifyProbe::new(&config)?);

    let bind_socket = config.bind_socket()?;
    let state = AppState::new(ProxySettings::from(&config), github, probe, store);
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(bind_socket).await?;

    info!(
        bind_addr = %config.bind_addr,
        bind_port = config.bind_port,
        repo_owner = %config.repo_owner,
        base_repo = %config.base_repo_name,
        persistent_store = config.redis_url.is_some(),
        "server starting"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
