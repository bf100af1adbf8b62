use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{default_true, document, nullable_list, push_unique};

/// Cooking group. The creator is always a member and an admin.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub creator_id: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub rules: Option<Vec<String>>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub member_ids: Vec<String>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub admin_ids: Vec<String>,
    #[serde(default = "default_true", alias = "public")]
    pub is_public: bool,
}

document!(Group, "groups");

impl Group {
    pub fn retain_creator(&mut self) {
        self.retain_creator_as_member();
        self.retain_creator_as_admin();
    }

    pub fn retain_creator_as_member(&mut self) {
        if let Some(creator) = self.creator_id.as_deref() {
            push_unique(&mut self.member_ids, creator);
        }
    }

    pub fn retain_creator_as_admin(&mut self) {
        if let Some(creator) = self.creator_id.as_deref() {
            push_unique(&mut self.admin_ids, creator);
        }
    }

    /// Descriptive fields only, membership and the creator are untouched.
    pub fn apply_update(&mut self, update: Group) {
        self.name = update.name;
        self.description = update.description;
        self.image_url = update.image_url;
        self.tags = update.tags;
        self.rules = update.rules;
        self.is_public = update.is_public;
    }

    pub fn has_member(&self, user_id: &str) -> bool {
        self.member_ids.iter().any(|member| member == user_id)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupPost {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub media_type: Option<String>,
}

document!(GroupPost, "groupPosts");

impl GroupPost {
    pub fn apply_update(&mut self, update: GroupPost) {
        self.content = update.content;
        self.media_url = update.media_url;
        self.media_type = update.media_type;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(json: &str) -> Group {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn creator_joins_both_lists_once() {
        let mut group = group(r#"{"creatorId":"c","memberIds":["m","c"]}"#);

        group.retain_creator();

        assert_eq!(group.member_ids, ["m", "c"]);
        assert_eq!(group.admin_ids, ["c"]);
    }

    #[test]
    fn public_flag_defaults_and_aliases() {
        assert!(group("{}").is_public);
        assert!(!group(r#"{"public":false}"#).is_public);
        assert!(!group(r#"{"isPublic":false}"#).is_public);
    }

    #[test]
    fn update_leaves_membership_alone() {
        let mut existing = group(r#"{"creatorId":"c","memberIds":["c","m"],"adminIds":["c"]}"#);

        existing.apply_update(group(r#"{"name":"Bakers","memberIds":[]}"#));

        assert_eq!(existing.name.as_deref(), Some("Bakers"));
        assert_eq!(existing.member_ids, ["c", "m"]);
    }
}
