use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Marketplace user profile. The id is issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile fields written by an upsert, keyed by `id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub image_url: String,
}

impl User {
    /// True when the stored profile already carries exactly these fields
    pub fn matches(&self, profile: &UserProfile) -> bool {
        self.email == profile.email && self.name == profile.name && self.image_url == profile.image_url
    }
}
