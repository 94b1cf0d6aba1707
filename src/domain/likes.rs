//! Per-site like records

use std::collections::BTreeSet;

use serde::Serialize;

/// Users who currently like a site. The count is always the size of the set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LikeRecord {
    liked_by: BTreeSet<String>,
}

/// After a toggle, `is_liked` is true when the call added a like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeStatus {
    pub like_count: u64,
    pub is_liked: bool,
}

impl LikeStatus {
    pub const NONE: Self = Self {
        like_count: 0,
        is_liked: false,
    };
}

impl LikeRecord {
    pub fn toggle(&mut self, user_id: &str) -> LikeStatus {
        let is_liked = if self.liked_by.remove(user_id) {
            false
        } else {
            self.liked_by.insert(user_id.to_string());
            true
        };

        LikeStatus {
            like_count: self.like_count(),
            is_liked,
        }
    }

    pub fn like_count(&self) -> u64 {
        self.liked_by.len() as u64
    }

    pub fn status_for(&self, user_id: Option<&str>) -> LikeStatus {
        LikeStatus {
            like_count: self.like_count(),
            is_liked: user_id.is_some_and(|id| self.liked_by.contains(id)),
        }
    }
}

/// Site names are compared after trimming surrounding whitespace.
pub fn normalize_site_name(site_name: &str) -> &str {
    site_name.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_toggle_likes_second_unlikes() {
        let mut record = LikeRecord::default();

        let liked = record.toggle("u1");
        assert_eq!(
            liked,
            LikeStatus {
                like_count: 1,
                is_liked: true
            }
        );

        let unliked = record.toggle("u1");
        assert_eq!(
            unliked,
            LikeStatus {
                like_count: 0,
                is_liked: false
            }
        );
        assert_eq!(record, LikeRecord::default());
    }

    #[test]
    fn count_tracks_distinct_likers() {
        let mut record = LikeRecord::default();
        for user in ["u1", "u2", "u3", "u2"] {
            record.toggle(user);
        }

        assert_eq!(record.like_count(), 2);
        assert!(record.status_for(Some("u1")).is_liked);
        assert!(!record.status_for(Some("u2")).is_liked);
        assert!(record.status_for(Some("u3")).is_liked);
    }

    #[test]
    fn status_without_user_is_not_liked() {
        let mut record = LikeRecord::default();
        record.toggle("u1");

        assert_eq!(
            record.status_for(None),
            LikeStatus {
                like_count: 1,
                is_liked: false
            }
        );
    }

    #[test]
    fn trims_site_names() {
        assert_eq!(normalize_site_name("  my site \n"), "my site");
    }
}
