use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{default_true, document};

pub const DEFAULT_ROLE: &str = "USER";

/// Account record. `password` holds a bcrypt hash and never leaves the server,
/// responses go through [`UserView`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "default_true")]
    pub account_non_expired: bool,
    #[serde(default = "default_true")]
    pub account_non_locked: bool,
    #[serde(default = "default_true")]
    pub credentials_non_expired: bool,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

document!(User, "users");

fn default_role() -> String {
    DEFAULT_ROLE.to_string()
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: None,
            username: username.into(),
            email: None,
            password: None,
            role: default_role(),
            created_at: Utc::now(),
            account_non_expired: true,
            account_non_locked: true,
            credentials_non_expired: true,
            enabled: true,
        }
    }

    /// Whether the account may authenticate at all.
    pub fn is_active(&self) -> bool {
        self.enabled
            && self.account_non_expired
            && self.account_non_locked
            && self.credentials_non_expired
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: Option<String>,
    pub username: String,
    pub email: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub account_non_expired: bool,
    pub account_non_locked: bool,
    pub credentials_non_expired: bool,
    pub enabled: bool,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
            account_non_expired: user.account_non_expired,
            account_non_locked: user.account_non_locked,
            credentials_non_expired: user.credentials_non_expired,
            enabled: user.enabled,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default)]
    pub fitness_goals: Option<String>,
    #[serde(default = "default_true")]
    pub profile_visibility: bool,
}

document!(UserProfile, "userProfiles");

impl UserProfile {
    pub fn apply_update(&mut self, update: UserProfile) {
        self.image = update.image;
        self.biography = update.biography;
        self.fitness_goals = update.fitness_goals;
        self.profile_visibility = update.profile_visibility;
    }
}
