//! Axum handlers for the portfolio backend routes
//!
//! Every handler validates its required fields before touching GitHub, the
//! domain probe or the document store, so a `400` never costs an outbound call.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::domain::{
    gist::{
        decode_file_content, encode_file_content, gist_raw_url, replace_data_url, GIST_FILENAME,
    },
    likes::{normalize_site_name, LikeStatus},
    sites::{HostedSiteRecord, SiteEntry, UserProfile},
    utils::{dns_label, lenient_string, parse_body, present, require, scope_for},
};
use crate::github::FileUpdate;
use crate::store::Slot;
use crate::{errors::AppError, AppState};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateGistRequest {
    pub content: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGistResponse {
    pub gist_id: String,
    pub gist_raw_url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGistUrlRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub gist_raw_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub subdomain: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub repo_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub user_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployedUrlRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub deployed_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployedUrlResponse {
    pub deployed_url: String,
}

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub available: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubdomainRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub subdomain: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubdomainStoredResponse {
    pub message: &'static str,
    pub subdomain: String,
}

#[derive(Debug, Serialize)]
pub struct SubdomainResponse {
    pub subdomain: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostedSiteRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub user_email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub user_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub subdomain: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub gist_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub site_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HostedSiteStoredResponse {
    pub message: &'static str,
    pub data: HostedSiteRecord,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSitesResponse {
    pub sites: Vec<SiteEntry>,
    pub user_data: UserProfile,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleLikeRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub site_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ToggleLikeResponse {
    pub message: &'static str,
    #[serde(flatten)]
    pub status: LikeStatus,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Gist content is sent as a string; any other JSON value is stored as its
/// pretty-printed text.
fn gist_content(content: Option<Value>) -> Result<String, AppError> {
    let text = match content {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text),
        Some(other) => Some(
            serde_json::to_string_pretty(&other)
                .map_err(|err| AppError::internal(err.to_string()))?,
        ),
    };

    match text {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(AppError::bad_request("Content is required")),
    }
}

pub async fn create_gist(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreateGistResponse>), AppError> {
    let request: CreateGistRequest = parse_body(&body);
    let content = gist_content(request.content)?;
    let settings = &state.settings;

    let gist_id = state
        .github
        .create_gist(GIST_FILENAME, &content)
        .await
        .map_err(|err| err.in_context("Failed to create gist"))?;
    let gist_raw_url = gist_raw_url(
        &settings.gist_raw_host,
        &settings.repo_owner,
        &gist_id,
        GIST_FILENAME,
    );

    info!(gist_id = %gist_id, "gist created");
    Ok((
        StatusCode::CREATED,
        Json(CreateGistResponse {
            gist_id,
            gist_raw_url,
        }),
    ))
}

pub async fn update_gist_url(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<MessageResponse>, AppError> {
    const FAILURE: &str = "Failed to update gist URL in repository";

    let request: UpdateGistUrlRequest = parse_body(&body);
    let (Some(gist_raw_url), Some(subdomain)) = (
        present(request.gist_raw_url.as_deref()),
        present(request.subdomain.as_deref()),
    ) else {
        return Err(AppError::bad_request("Gist URL and subdomain are required"));
    };

    let settings = &state.settings;
    let repo = present(request.repo_name.as_deref()).unwrap_or(&settings.base_repo_name);
    let path = settings.data_file_path.as_str();
    info!(repo, subdomain, gist_raw_url, "updating data URL");

    let file = state
        .github
        .get_file(repo, path)
        .await
        .map_err(|err| err.in_context(FAILURE))?;
    let source = decode_file_content(&file.content).map_err(|err| err.in_context(FAILURE))?;

    let rewrite = replace_data_url(&source, gist_raw_url);
    if !rewrite.replaced {
        warn!(repo, path, "no DATA_URL assignment found, committing file unchanged");
    }

    let file_name = path.rsplit('/').next().unwrap_or(path);
    let update = FileUpdate {
        message: format!("Updated Gist URL in {file_name}"),
        content: encode_file_content(&rewrite.content),
        sha: file.sha,
    };
    state
        .github
        .put_file(repo, path, &update)
        .await
        .map_err(|err| err.in_context(FAILURE))?;

    state
        .store
        .set_slot(
            Slot::Subdomain,
            &scope_for(request.user_id.as_deref()),
            subdomain,
        )
        .await
        .map_err(|err| err.in_context(FAILURE))?;

    Ok(Json(MessageResponse {
        message: "Gist URL and subdomain updated successfully",
    }))
}

pub async fn capture_deployed_url(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<MessageResponse>, AppError> {
    let request: DeployedUrlRequest = parse_body(&body);
    let deployed_url = require(request.deployed_url.as_deref(), "Deployed URL is required")?;

    state
        .store
        .set_slot(
            Slot::DeployedUrl,
            &scope_for(request.user_id.as_deref()),
            deployed_url,
        )
        .await
        .map_err(|err| err.in_context("Failed to capture deployed URL"))?;

    Ok(Json(MessageResponse {
        message: "Deployed URL captured successfully",
    }))
}

pub async fn get_deployed_url(
    State(state): State<AppState>,
    Query(query): Query<ScopeQuery>,
) -> Result<Json<DeployedUrlResponse>, AppError> {
    let deployed_url = state
        .store
        .get_slot(Slot::DeployedUrl, &scope_for(query.user_id.as_deref()))
        .await
        .map_err(|err| err.in_context("Failed to read deployed URL"))?
        .ok_or_else(|| AppError::not_found("No deployed URL available"))?;

    Ok(Json(DeployedUrlResponse { deployed_url }))
}

pub async fn check_domain(
    State(state): State<AppState>,
    Path(subdomain): Path<String>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let subdomain = dns_label(&subdomain)?;
    let availability = state.probe.probe(&subdomain).await?;

    Ok(Json(AvailabilityResponse {
        available: availability.is_available(),
    }))
}

pub async fn store_subdomain(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SubdomainStoredResponse>, AppError> {
    let request: SubdomainRequest = parse_body(&body);
    let subdomain = require(request.subdomain.as_deref(), "Subdomain is required")?;

    state
        .store
        .set_slot(
            Slot::Subdomain,
            &scope_for(request.user_id.as_deref()),
            subdomain,
        )
        .await
        .map_err(|err| err.in_context("Failed to store subdomain"))?;

    Ok(Json(SubdomainStoredResponse {
        message: "Subdomain stored successfully",
        subdomain: subdomain.to_string(),
    }))
}

pub async fn get_subdomain(
    State(state): State<AppState>,
    Query(query): Query<ScopeQuery>,
) -> Result<Json<SubdomainResponse>, AppError> {
    let subdomain = state
        .store
        .get_slot(Slot::Subdomain, &scope_for(query.user_id.as_deref()))
        .await
        .map_err(|err| err.in_context("Failed to read subdomain"))?
        .ok_or_else(|| AppError::not_found("No subdomain stored"))?;

    Ok(Json(SubdomainResponse { subdomain }))
}

pub async fn store_hosted_site(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<HostedSiteStoredResponse>, AppError> {
    let request: HostedSiteRequest = parse_body(&body);
    let user_id = require(request.user_id.as_deref(), "userId is required")?;
    let user_email = require(request.user_email.as_deref(), "userEmail is required")?;
    let user_name = require(request.user_name.as_deref(), "userName is required")?;
    let subdomain = require(request.subdomain.as_deref(), "subdomain is required")?;
    let gist_url = require(request.gist_url.as_deref(), "gistUrl is required")?;
    let site_name = require(request.site_name.as_deref(), "siteName is required")?;

    let profile = UserProfile {
        user_id: user_id.to_string(),
        user_email: user_email.to_string(),
        user_name: user_name.to_string(),
    };
    let entry = SiteEntry {
        site_name: site_name.to_string(),
        subdomain: subdomain.to_string(),
        gist_url: gist_url.to_string(),
        created_at: Utc::now(),
    };

    let record = state
        .store
        .add_hosted_site(profile, entry)
        .await
        .map_err(|err| err.in_context("Failed to store hosted site"))?;

    info!(user_id, site_name, sites = record.sites.len(), "hosted site stored");
    Ok(Json(HostedSiteStoredResponse {
        message: "Site stored successfully",
        data: record,
    }))
}

pub async fn get_user_sites(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserSitesResponse>, AppError> {
    let not_found = || AppError::not_found("No sites found for this user");
    let user_id = present(Some(user_id.as_str())).ok_or_else(not_found)?;

    let record = state
        .store
        .hosted_sites(user_id)
        .await
        .map_err(|err| err.in_context("Failed to fetch user sites"))?
        .ok_or_else(not_found)?;

    Ok(Json(UserSitesResponse {
        sites: record.sites,
        user_data: record.profile,
    }))
}

pub async fn toggle_like(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ToggleLikeResponse>, AppError> {
    let request: ToggleLikeRequest = parse_body(&body);
    let (Some(site_name), Some(user_id)) = (
        present(request.site_name.as_deref()),
        present(request.user_id.as_deref()),
    ) else {
        return Err(AppError::bad_request("Site name and user ID are required"));
    };

    let status = state
        .store
        .toggle_like(normalize_site_name(site_name), user_id)
        .await
        .map_err(|err| err.in_context("Failed to toggle like"))?;

    let message = if status.is_liked {
        "Site liked successfully"
    } else {
        "Site unliked successfully"
    };
    Ok(Json(ToggleLikeResponse { message, status }))
}

pub async fn get_likes(
    State(state): State<AppState>,
    Path(site_name): Path<String>,
    Query(query): Query<ScopeQuery>,
) -> Result<Json<LikeStatus>, AppError> {
    let status = state
        .store
        .like_status(
            normalize_site_name(&site_name),
            present(query.user_id.as_deref()),
        )
        .await
        .map_err(|err| err.in_context("Failed to fetch likes"))?;

    Ok(Json(status))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::gist_content;

    #[test]
    fn string_content_is_used_verbatim() {
        assert_eq!(
            gist_content(Some(json!("{\"name\":\"Ada\"}"))).expect("content"),
            "{\"name\":\"Ada\"}"
        );
    }

    #[test]
    fn object_content_is_serialized() {
        let content = gist_content(Some(json!({"name": "Ada"}))).expect("content");
        let parsed: serde_json::Value = serde_json::from_str(&content).expect("json text");
        assert_eq!(parsed["name"], "Ada");
    }

    #[test]
    fn null_or_blank_content_is_rejected() {
        assert!(gist_content(None).is_err());
        assert!(gist_content(Some(serde_json::Value::Null)).is_err());
        assert!(gist_content(Some(json!("  "))).is_err());
    }
}
