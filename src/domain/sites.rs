//! Hosted-site records: one per user, holding the sites they published

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
    pub user_email: String,
    pub user_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteEntry {
    pub site_name: String,
    pub subdomain: String,
    pub gist_url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostedSiteRecord {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub sites: Vec<SiteEntry>,
}

impl HostedSiteRecord {
    pub fn new(profile: UserProfile) -> Self {
        Self {
            profile,
            sites: Vec::new(),
        }
    }

    /// Appends a site. The profile captured when the record was created is
    /// kept as is.
    pub fn push(&mut self, entry: SiteEntry) {
        self.sites.push(entry);
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn entry(site_name: &str) -> SiteEntry {
        SiteEntry {
            site_name: site_name.to_string(),
            subdomain: format!("{site_name}-folio"),
            gist_url: format!("https://gist.githubusercontent.com/o/{site_name}/raw/data.json"),
            created_at: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
        }
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let mut record = HostedSiteRecord::new(UserProfile {
            user_id: "u1".to_string(),
            user_email: "ada@example.com".to_string(),
            user_name: "Ada".to_string(),
        });
        record.push(entry("alpha"));

        assert_eq!(
            serde_json::to_value(&record).expect("serializes"),
            json!({
                "userId": "u1",
                "userEmail": "ada@example.com",
                "userName": "Ada",
                "sites": [{
                    "siteName": "alpha",
                    "subdomain": "alpha-folio",
                    "gistUrl": "https://gist.githubusercontent.com/o/alpha/raw/data.json",
                    "createdAt": "2026-01-02T03:04:05Z"
                }]
            })
        );
    }

    #[test]
    fn push_keeps_insertion_order() {
        let mut record = HostedSiteRecord::new(UserProfile {
            user_id: "u1".to_string(),
            user_email: "ada@example.com".to_string(),
            user_name: "Ada".to_string(),
        });
        record.push(entry("alpha"));
        record.push(entry("beta"));

        let names: Vec<&str> = record.sites.iter().map(|s| s.site_name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "beta"]);
    }
}
