use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{document, merge_unique, nullable_list};

/// Saved resource. `resource_id` is a post id or an external URL, told apart
/// by `resource_type` ("post", "external", ...).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub resource_id: Option<String>,
    #[serde(default)]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

document!(Bookmark, "bookmarks");

impl Bookmark {
    pub fn apply_update(&mut self, update: Bookmark) {
        self.title = update.title;
        self.note = update.note;
        self.tags = update.tags;
    }

    pub fn matches(&self, user_id: &str, resource_id: &str) -> bool {
        self.user_id.as_deref() == Some(user_id) && self.resource_id.as_deref() == Some(resource_id)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags
            .as_ref()
            .is_some_and(|tags| tags.iter().any(|t| t == tag))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// "like", "comment", "group_invite", ...
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub source_id: Option<String>,
    #[serde(default)]
    pub source_type: Option<String>,
    #[serde(default)]
    pub action_user_id: Option<String>,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

document!(Notification, "notifications");

/// Friend list of one user, at most one document per `user_id`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserConnection {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub friend_ids: Vec<String>,
}

document!(UserConnection, "userConnections");

impl UserConnection {
    pub fn add_friends(&mut self, friend_ids: &[String]) {
        merge_unique(&mut self.friend_ids, friend_ids);
    }

    pub fn remove_friend(&mut self, friend_id: &str) {
        self.friend_ids.retain(|id| id != friend_id);
    }

    /// Collapses duplicates a client may have sent in a fresh document.
    pub fn dedup_friends(&mut self) {
        let incoming = std::mem::take(&mut self.friend_ids);
        self.add_friends(&incoming);
    }
}
