use std::sync::Arc;

use axum::{
    http::{header, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

pub mod config;
pub mod domain;
pub mod errors;
pub mod github;
pub mod http;
pub mod logging;
pub mod netlify;
pub mod store;

use config::Config;
use github::GitHubApi;
use netlify::DomainProbe;
use store::SiteStore;

/// Values the handlers need from the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxySettings {
    pub repo_owner: String,
    pub base_repo_name: String,
    pub gist_raw_host: String,
    pub data_file_path: String,
}

impl From<&Config> for ProxySettings {
    fn from(config: &Config) -> Self {
        Self {
            repo_owner: config.repo_owner.clone(),
            base_repo_name: config.base_repo_name.clone(),
            gist_raw_host: config.gist_raw_host.clone(),
            data_file_path: config.data_file_path.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<ProxySettings>,
    pub github: Arc<dyn GitHubApi>,
    pub probe: Arc<dyn DomainProbe>,
    pub store: Arc<dyn SiteStore>,
}

impl AppState {
    pub fn new(
        settings: ProxySettings,
        github: Arc<dyn GitHubApi>,
        probe: Arc<dyn DomainProbe>,
        store: Arc<dyn SiteStore>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            github,
            probe,
            store,
        }
    }
}

/// Any origin may call the API with the four standard methods.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

pub fn build_app(state: AppState) -> Router {
    use crate::http::handlers;

    Router::new()
        .route("/health", get(handlers::health))
        .route("/create-gist", post(handlers::create_gist))
        .route("/update-gist-url", post(handlers::update_gist_url))
        .route("/capture-deployed-url", post(handlers::capture_deployed_url))
        .route("/get-deployed-url", get(handlers::get_deployed_url))
        .route("/check-domain/{subdomain}", get(handlers::check_domain))
        .route("/store-subdomain", post(handlers::store_subdomain))
        .route("/get-subdomain", get(handlers::get_subdomain))
        .route("/store-hosted-site", post(handlers::store_hosted_site))
        .route("/get-user-sites/{user_id}", get(handlers::get_user_sites))
        .route("/toggle-like", post(handlers::toggle_like))
        .route("/get-likes/{site_name}", get(handlers::get_likes))
        .layer(cors_layer())
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}
