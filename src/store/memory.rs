use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{SiteStore, Slot};
use crate::domain::{
    likes::{LikeRecord, LikeStatus},
    sites::{HostedSiteRecord, SiteEntry, UserProfile},
};
use crate::errors::AppError;

/// Process-local store. Each operation holds the lock of the map it touches
/// for its whole duration.
#[derive(Debug, Default)]
pub struct MemoryStore {
    hosted_sites: RwLock<HashMap<String, HostedSiteRecord>>,
    likes: RwLock<HashMap<String, LikeRecord>>,
    slots: RwLock<HashMap<(Slot, String), String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SiteStore for MemoryStore {
    async fn add_hosted_site(
        &self,
        profile: UserProfile,
        entry: SiteEntry,
    ) -> Result<HostedSiteRecord, AppError> {
        let mut records = self.hosted_sites.write().await;
        let record = records
            .entry(profile.user_id.clone())
            .or_insert_with(|| HostedSiteRecord::new(profile));
        record.push(entry);
        Ok(record.clone())
    }

    async fn hosted_sites(&self, user_id: &str) -> Result<Option<HostedSiteRecord>, AppError> {
        Ok(self.hosted_sites.read().await.get(user_id).cloned())
    }

    async fn toggle_like(&self, site_name: &str, user_id: &str) -> Result<LikeStatus, AppError> {
        let mut likes = self.likes.write().await;
        Ok(likes
            .entry(site_name.to_string())
            .or_default()
            .toggle(user_id))
    }

    async fn like_status(
        &self,
        site_name: &str,
        user_id: Option<&str>,
    ) -> Result<LikeStatus, AppError> {
        Ok(self
            .likes
            .read()
            .await
            .get(site_name)
            .map_or(LikeStatus::NONE, |record| record.status_for(user_id)))
    }

    async fn set_slot(&self, slot: Slot, scope: &str, value: &str) -> Result<(), AppError> {
        self.slots
            .write()
            .await
            .insert((slot, scope.to_string()), value.to_string());
        Ok(())
    }

    async fn get_slot(&self, slot: Slot, scope: &str) -> Result<Option<String>, AppError> {
        Ok(self
            .slots
            .read()
            .await
            .get(&(slot, scope.to_string()))
            .cloned())
    }
}
