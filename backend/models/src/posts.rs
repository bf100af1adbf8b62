use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{document, nullable_list};

/// Recipe post. `media_link`/`media_type` are the single-attachment fields older
/// clients still send, kept in step with the first entry of the lists.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content_description: Option<String>,
    #[serde(default)]
    pub ingredients: Option<Vec<String>>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub cooking_time: Option<String>,
    #[serde(default)]
    pub difficulty_level: Option<String>,
    #[serde(default)]
    pub cuisine_type: Option<String>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub media_links: Vec<String>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub media_types: Vec<String>,
    #[serde(default)]
    pub media_link: Option<String>,
    #[serde(default)]
    pub media_type: Option<String>,
}

document!(Post, "posts");

impl Post {
    /// Folds a legacy single attachment into the media lists.
    pub fn normalize_media(&mut self) {
        let Some(link) = self.media_link.as_deref().filter(|link| !link.is_empty()) else {
            return;
        };

        if !self.media_links.iter().any(|existing| existing == link) {
            self.media_links.push(link.to_string());
            self.media_types
                .push(self.media_type.clone().unwrap_or_default());
        }
    }

    /// Copies every field present in `update`. Media is replaced only by a
    /// non-empty list, which also resets the legacy fields to its first entry.
    pub fn apply_update(&mut self, update: Post) {
        if update.title.is_some() {
            self.title = update.title;
        }
        if update.content_description.is_some() {
            self.content_description = update.content_description;
        }
        if update.ingredients.is_some() {
            self.ingredients = update.ingredients;
        }
        if update.instructions.is_some() {
            self.instructions = update.instructions;
        }
        if update.cooking_time.is_some() {
            self.cooking_time = update.cooking_time;
        }
        if update.difficulty_level.is_some() {
            self.difficulty_level = update.difficulty_level;
        }
        if update.cuisine_type.is_some() {
            self.cuisine_type = update.cuisine_type;
        }

        if !update.media_links.is_empty() {
            self.media_link = update.media_links.first().cloned();
            self.media_type = Some(update.media_types.first().cloned().unwrap_or_default());
            self.media_links = update.media_links;
            self.media_types = update.media_types;
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id.as_deref() == Some(user_id)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub post_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub comment_text: Option<String>,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

document!(Comment, "comments");

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub post_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

document!(Like, "likes");

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub post_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub media_type: Option<String>,
}

document!(Media, "media");

#[cfg(test)]
mod tests {
    use super::*;

    fn post(json: &str) -> Post {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn null_media_lists_read_as_empty() {
        let post = post(r#"{"userId":"u1","mediaLinks":null,"mediaTypes":null}"#);

        assert!(post.media_links.is_empty());
        assert!(post.media_types.is_empty());
    }

    #[test]
    fn legacy_media_is_folded_in() {
        let mut post = post(r#"{"mediaLink":"/a.png","mediaType":"image"}"#);

        post.normalize_media();

        assert_eq!(post.media_links, ["/a.png"]);
        assert_eq!(post.media_types, ["image"]);
    }

    #[test]
    fn legacy_media_already_listed_is_not_repeated() {
        let mut post = post(
            r#"{"mediaLinks":["/a.png"],"mediaTypes":["image"],"mediaLink":"/a.png","mediaType":"image"}"#,
        );

        post.normalize_media();

        assert_eq!(post.media_links.len(), 1);
    }

    #[test]
    fn legacy_media_without_type_gets_empty_type() {
        let mut post = post(r#"{"mediaLink":"/clip.mp4"}"#);

        post.normalize_media();

        assert_eq!(post.media_types, [""]);
    }

    #[test]
    fn empty_legacy_link_is_ignored() {
        let mut post = post(r#"{"mediaLink":""}"#);

        post.normalize_media();

        assert!(post.media_links.is_empty());
    }

    #[test]
    fn update_keeps_fields_not_sent() {
        let mut existing = post(r#"{"userId":"u1","title":"Soup","cuisineType":"Thai"}"#);

        existing.apply_update(post(r#"{"title":"Green curry"}"#));

        assert_eq!(existing.title.as_deref(), Some("Green curry"));
        assert_eq!(existing.cuisine_type.as_deref(), Some("Thai"));
    }

    #[test]
    fn update_with_media_resets_legacy_fields() {
        let mut existing = post(r#"{"mediaLinks":["/old.png"],"mediaTypes":["image"]}"#);

        existing.apply_update(post(
            r#"{"mediaLinks":["/new.mp4","/new.png"],"mediaTypes":["video","image"]}"#,
        ));

        assert_eq!(existing.media_links, ["/new.mp4", "/new.png"]);
        assert_eq!(existing.media_link.as_deref(), Some("/new.mp4"));
        assert_eq!(existing.media_type.as_deref(), Some("video"));
    }

    #[test]
    fn update_with_empty_media_leaves_media_alone() {
        let mut existing = post(r#"{"mediaLinks":["/old.png"],"mediaTypes":["image"]}"#);

        existing.apply_update(post(r#"{"mediaLinks":[]}"#));

        assert_eq!(existing.media_links, ["/old.png"]);
    }
}
