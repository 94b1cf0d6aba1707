//! Subdomain availability probe against `<subdomain>.netlify.app`

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::instrument;

use crate::{config::Config, errors::AppError};

const PROBE_FAILURE: &str = "Error checking domain availability";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    Taken,
}

impl Availability {
    pub fn is_available(self) -> bool {
        matches!(self, Self::Available)
    }
}

#[async_trait]
pub trait DomainProbe: Send + Sync {
    async fn probe(&self, subdomain: &str) -> Result<Availability, AppError>;
}

#[derive(Debug, Clone)]
pub struct NetlifyProbe {
    http: reqwest::Client,
    app_domain: String,
}

impl NetlifyProbe {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            app_domain: config.netlify_app_domain.clone(),
        })
    }

    fn site_url(&self, subdomain: &str) -> String {
        format!("https://{}.{}", subdomain, self.app_domain)
    }
}

/// A live site means the name is taken, a 404 means it is free. Any other
/// status says nothing about availability.
pub fn classify(status: StatusCode) -> Result<Availability, AppError> {
    if status.is_success() {
        return Ok(Availability::Taken);
    }
    if status == StatusCode::NOT_FOUND {
        return Ok(Availability::Available);
    }

    Err(AppError::upstream(
        PROBE_FAILURE,
        format!("probe responded with {status}"),
    ))
}

#[async_trait]
impl DomainProbe for NetlifyProbe {
    #[instrument(skip(self))]
    async fn probe(&self, subdomain: &str) -> Result<Availability, AppError> {
        let response = self
            .http
            .get(self.site_url(subdomain))
            .send()
            .await
            .map_err(|err| AppError::upstream(PROBE_FAILURE, err.to_string()))?;

        classify(response.status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_means_taken() {
        assert_eq!(classify(StatusCode::OK).expect("classified"), Availability::Taken);
        assert_eq!(
            classify(StatusCode::NO_CONTENT).expect("classified"),
            Availability::Taken
        );
    }

    #[test]
    fn not_found_means_available() {
        let availability = classify(StatusCode::NOT_FOUND).expect("classified");
        assert!(availability.is_available());
    }

    #[test]
    fn other_statuses_are_errors() {
        for status in [
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::FORBIDDEN,
            StatusCode::BAD_GATEWAY,
        ] {
            let err = classify(status).expect_err("not classifiable");
            assert!(matches!(err, AppError::Upstream { .. }));
        }
    }

    #[test]
    fn builds_site_url() {
        let probe = NetlifyProbe {
            http: reqwest::Client::new(),
            app_domain: "netlify.app".to_string(),
        };
        assert_eq!(probe.site_url("my-folio"), "https://my-folio.netlify.app");
    }
}
