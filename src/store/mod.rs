//! Document store for hosted-site records, like records and scoped slots
//!
//! [`SiteStore`] is implemented by an in-memory map (development and tests)
//! and by Redis. Every mutating operation is a single atomic step on the
//! backend, so concurrent requests for the same key cannot create duplicate
//! records or let a like count drift from its set of likers.

use std::fmt;

use async_trait::async_trait;

use crate::domain::{
    likes::LikeStatus,
    sites::{HostedSiteRecord, SiteEntry, UserProfile},
};
use crate::errors::AppError;

pub mod memory;
pub mod redis_store;

pub use memory::MemoryStore;
pub use redis_store::RedisStore;

/// Single-value slots that used to be process-wide globals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Subdomain,
    DeployedUrl,
}

impl Slot {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Subdomain => "subdomain",
            Self::DeployedUrl => "deployed_url",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[async_trait]
pub trait SiteStore: Send + Sync {
    /// Creates the user's record on first use and appends `entry`. Returns the
    /// record as stored after the append.
    async fn add_hosted_site(
        &self,
        profile: UserProfile,
        entry: SiteEntry,
    ) -> Result<HostedSiteRecord, AppError>;

    async fn hosted_sites(&self, user_id: &str) -> Result<Option<HostedSiteRecord>, AppError>;

    /// Adds `user_id` to the site's likers, or removes it if already there.
    async fn toggle_like(&self, site_name: &str, user_id: &str) -> Result<LikeStatus, AppError>;

    async fn like_status(
        &self,
        site_name: &str,
        user_id: Option<&str>,
    ) -> Result<LikeStatus, AppError>;

    async fn set_slot(&self, slot: Slot, scope: &str, value: &str) -> Result<(), AppError>;

    async fn get_slot(&self, slot: Slot, scope: &str) -> Result<Option<String>, AppError>;
}

pub(crate) fn store_error(err: impl fmt::Display) -> AppError {
    AppError::upstream("Document store request failed", err.to_string())
}
