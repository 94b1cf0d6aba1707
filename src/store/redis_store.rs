//! Redis backend
//!
//! | Key | Type | Content |
//! |-----|------|---------|
//! | `hosted_site:{userId}` | hash | `userId`, `userEmail`, `userName` |
//! | `hosted_site:{userId}:sites` | list | JSON [`SiteEntry`] values, oldest first |
//! | `likes:{siteName}` | set | ids of the users liking the site |
//! | `slot:{slot}:{scope}` | string | last value written to the slot |

use std::collections::HashMap;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use redis::{aio::ConnectionManager, AsyncCommands, Script};
use tracing::instrument;

use super::{store_error, SiteStore, Slot};
use crate::domain::{
    likes::LikeStatus,
    sites::{HostedSiteRecord, SiteEntry, UserProfile},
};
use crate::errors::AppError;

/// Returns `{is_liked, like_count}` after flipping membership of ARGV[1].
static TOGGLE_LIKE: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r"
        local is_liked = 0
        if redis.call('SREM', KEYS[1], ARGV[1]) == 0 then
            redis.call('SADD', KEYS[1], ARGV[1])
            is_liked = 1
        end
        return {is_liked, redis.call('SCARD', KEYS[1])}
        ",
    )
});

pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    pub async fn connect(redis_url: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }

    fn profile_key(user_id: &str) -> String {
        format!("hosted_site:{user_id}")
    }

    fn sites_key(user_id: &str) -> String {
        format!("hosted_site:{user_id}:sites")
    }

    fn likes_key(site_name: &str) -> String {
        format!("likes:{site_name}")
    }

    fn slot_key(slot: Slot, scope: &str) -> String {
        format!("slot:{slot}:{scope}")
    }
}

fn decode_record(
    mut fields: HashMap<String, String>,
    raw_sites: Vec<String>,
) -> Result<Option<HostedSiteRecord>, AppError> {
    let Some(user_id) = fields.remove("userId") else {
        return Ok(None);
    };

    let sites = raw_sites
        .iter()
        .map(|raw| serde_json::from_str::<SiteEntry>(raw))
        .collect::<Result<Vec<_>, _>>()
        .map_err(store_error)?;

    Ok(Some(HostedSiteRecord {
        profile: UserProfile {
            user_id,
            user_email: fields.remove("userEmail").unwrap_or_default(),
            user_name: fields.remove("userName").unwrap_or_default(),
        },
        sites,
    }))
}

#[async_trait]
impl SiteStore for RedisStore {
    #[instrument(skip_all, fields(user_id = %profile.user_id))]
    async fn add_hosted_site(
        &self,
        profile: UserProfile,
        entry: SiteEntry,
    ) -> Result<HostedSiteRecord, AppError> {
        let profile_key = Self::profile_key(&profile.user_id);
        let sites_key = Self::sites_key(&profile.user_id);
        let entry_json = serde_json::to_string(&entry).map_err(store_error)?;

        let mut conn = self.conn.clone();
        let (fields, raw_sites): (HashMap<String, String>, Vec<String>) = redis::pipe()
            .atomic()
            .hset_nx(&profile_key, "userId", &profile.user_id)
            .ignore()
            .hset_nx(&profile_key, "userEmail", &profile.user_email)
            .ignore()
            .hset_nx(&profile_key, "userName", &profile.user_name)
            .ignore()
            .rpush(&sites_key, entry_json)
            .ignore()
            .hgetall(&profile_key)
            .lrange(&sites_key, 0, -1)
            .query_async(&mut conn)
            .await
            .map_err(store_error)?;

        decode_record(fields, raw_sites)?
            .ok_or_else(|| AppError::internal("hosted site record missing after write"))
    }

    #[instrument(skip(self))]
    async fn hosted_sites(&self, user_id: &str) -> Result<Option<HostedSiteRecord>, AppError> {
        let mut conn = self.conn.clone();
        let (fields, raw_sites): (HashMap<String, String>, Vec<String>) = redis::pipe()
            .atomic()
            .hgetall(Self::profile_key(user_id))
            .lrange(Self::sites_key(user_id), 0, -1)
            .query_async(&mut conn)
            .await
            .map_err(store_error)?;

        decode_record(fields, raw_sites)
    }

    #[instrument(skip(self))]
    async fn toggle_like(&self, site_name: &str, user_id: &str) -> Result<LikeStatus, AppError> {
        let mut conn = self.conn.clone();
        let (is_liked, like_count): (i64, u64) = TOGGLE_LIKE
            .key(Self::likes_key(site_name))
            .arg(user_id)
            .invoke_async(&mut conn)
            .await
            .map_err(store_error)?;

        Ok(LikeStatus {
            like_count,
            is_liked: is_liked == 1,
        })
    }

    #[instrument(skip(self))]
    async fn like_status(
        &self,
        site_name: &str,
        user_id: Option<&str>,
    ) -> Result<LikeStatus, AppError> {
        let key = Self::likes_key(site_name);
        let mut conn = self.conn.clone();

        let Some(user_id) = user_id else {
            let like_count: u64 = conn.scard(&key).await.map_err(store_error)?;
            return Ok(LikeStatus {
                like_count,
                is_liked: false,
            });
        };

        let (like_count, is_liked): (u64, bool) = redis::pipe()
            .atomic()
            .scard(&key)
            .sismember(&key, user_id)
            .query_async(&mut conn)
            .await
            .map_err(store_error)?;

        Ok(LikeStatus {
            like_count,
            is_liked,
        })
    }

    async fn set_slot(&self, slot: Slot, scope: &str, value: &str) -> Result<(), AppError> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .set(Self::slot_key(slot, scope), value)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn get_slot(&self, slot: Slot, scope: &str) -> Result<Option<String>, AppError> {
        let mut conn = self.conn.clone();
        conn.get(Self::slot_key(slot, scope))
            .await
            .map_err(store_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_follow_layout() {
        assert_eq!(RedisStore::profile_key("u1"), "hosted_site:u1");
        assert_eq!(RedisStore::sites_key("u1"), "hosted_site:u1:sites");
        assert_eq!(RedisStore::likes_key("my site"), "likes:my site");
        assert_eq!(
            RedisStore::slot_key(Slot::DeployedUrl, "global"),
            "slot:deployed_url:global"
        );
    }

    #[test]
    fn empty_hash_decodes_to_none() {
        let decoded = decode_record(HashMap::new(), Vec::new()).expect("decodes");
        assert!(decoded.is_none());
    }

    #[test]
    fn decodes_profile_and_sites() {
        let fields = HashMap::from([
            ("userId".to_string(), "u1".to_string()),
            ("userEmail".to_string(), "ada@example.com".to_string()),
            ("userName".to_string(), "Ada".to_string()),
        ]);
        let raw_sites = vec![
            r#"{"siteName":"alpha","subdomain":"alpha","gistUrl":"g1","createdAt":"2026-01-01T00:00:00Z"}"#
                .to_string(),
        ];

        let record = decode_record(fields, raw_sites)
            .expect("decodes")
            .expect("record present");
        assert_eq!(record.profile.user_email, "ada@example.com");
        assert_eq!(record.sites[0].site_name, "alpha");
    }

    #[test]
    fn corrupt_site_entry_is_a_store_error() {
        let fields = HashMap::from([("userId".to_string(), "u1".to_string())]);
        let err = decode_record(fields, vec!["{".to_string()]).expect_err("corrupt entry");
        assert!(matches!(err, AppError::Upstream { .. }));
    }
}
