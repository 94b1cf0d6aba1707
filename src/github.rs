//! GitHub REST client: gist creation and repository file reads/writes

use async_trait::async_trait;
use reqwest::{header, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, instrument};

use crate::{config::Config, errors::AppError};

const GITHUB_FAILURE: &str = "GitHub request failed";

/// A repository file as returned by the contents API. `content` is base64.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepoFile {
    pub content: String,
    pub sha: String,
}

/// Body of a contents API write. `sha` must be the revision that was read,
/// otherwise GitHub rejects the write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileUpdate {
    pub message: String,
    pub content: String,
    pub sha: String,
}

#[derive(Debug, Deserialize)]
struct GistCreated {
    id: String,
}

#[derive(Debug, Deserialize)]
struct GitHubErrorBody {
    message: String,
}

#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// Creates a public gist holding a single file and returns its id.
    async fn create_gist(&self, filename: &str, content: &str) -> Result<String, AppError>;

    async fn get_file(&self, repo: &str, path: &str) -> Result<RepoFile, AppError>;

    async fn put_file(&self, repo: &str, path: &str, update: &FileUpdate) -> Result<(), AppError>;
}

#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    owner: String,
    token: String,
}

impl GitHubClient {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_url: config.github_api_url.clone(),
            owner: config.repo_owner.clone(),
            token: config.github_token.clone(),
        })
    }

    fn contents_url(&self, repo: &str, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_url,
            self.owner,
            repo,
            path.trim_start_matches('/')
        )
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header(header::AUTHORIZATION, format!("token {}", self.token))
            .header(header::ACCEPT, "application/vnd.github+json")
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, AppError> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|err| AppError::upstream(GITHUB_FAILURE, err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(AppError::upstream(GITHUB_FAILURE, failure_detail(status, &body)))
    }
}

fn failure_detail(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<GitHubErrorBody>(body) {
        Ok(parsed) => format!("GitHub responded with {status}: {}", parsed.message),
        Err(_) if body.trim().is_empty() => format!("GitHub responded with {status}"),
        Err(_) => format!("GitHub responded with {status}: {}", body.trim()),
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    #[instrument(skip(self, content), fields(content_len = content.len()))]
    async fn create_gist(&self, filename: &str, content: &str) -> Result<String, AppError> {
        let body = json!({
            "files": { filename: { "content": content } },
            "public": true,
        });

        let response = self
            .send(self.http.post(format!("{}/gists", self.api_url)).json(&body))
            .await?;
        let created: GistCreated = response
            .json()
            .await
            .map_err(|err| AppError::upstream(GITHUB_FAILURE, err.to_string()))?;

        debug!(gist_id = %created.id, "gist created");
        Ok(created.id)
    }

    #[instrument(skip(self))]
    async fn get_file(&self, repo: &str, path: &str) -> Result<RepoFile, AppError> {
        let response = self
            .send(self.http.get(self.contents_url(repo, path)))
            .await?;

        response
            .json()
            .await
            .map_err(|err| AppError::upstream(GITHUB_FAILURE, err.to_string()))
    }

    #[instrument(skip(self, update), fields(sha = %update.sha))]
    async fn put_file(&self, repo: &str, path: &str, update: &FileUpdate) -> Result<(), AppError> {
        self.send(self.http.put(self.contents_url(repo, path)).json(update))
            .await?;
        Ok(())
    }
}
