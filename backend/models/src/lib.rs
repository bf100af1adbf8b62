//! # Documents
//!
//! Everything the backend persists, one struct per collection.
//!
//! ## Schema
//! - Each type maps to one collection in the document store (see [`Document::COLLECTION`])
//! - Field names are camelCase on the wire and in storage
//! - `id` is absent until the first save, the store assigns it
//! - Ids are uuid v7 in simple form, so sorting by id sorts by creation time
//!
//! ## Lists
//! Lists the service maintains itself (post media, group members/admins, friend ids)
//! accept `null` and read it as empty. Lists that are plain user content stay `Option`
//! so an update can tell "not sent" apart from "cleared".
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use uuid::Uuid;

pub mod groups;
pub mod plans;
pub mod posts;
pub mod social;
pub mod users;

pub use groups::{Group, GroupPost};
pub use plans::{MealPlan, SkillShare, StatusUpdate};
pub use posts::{Comment, Like, Media, Post};
pub use social::{Bookmark, Notification, UserConnection};
pub use users::{User, UserProfile, UserView};

/// A record that lives in a named collection and carries its own id.
pub trait Document: Serialize + DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: &'static str;

    fn id(&self) -> Option<&str>;

    fn set_id(&mut self, id: String);
}

macro_rules! document {
    ($ty:ty, $collection:literal) => {
        impl $crate::Document for $ty {
            const COLLECTION: &'static str = $collection;

            fn id(&self) -> Option<&str> {
                self.id.as_deref()
            }

            fn set_id(&mut self, id: String) {
                self.id = Some(id);
            }
        }
    };
}

pub(crate) use document;

pub fn new_id() -> String {
    Uuid::now_v7().simple().to_string()
}

/// Appends `id` unless the list already holds it.
pub fn push_unique(list: &mut Vec<String>, id: &str) {
    if !list.iter().any(|existing| existing == id) {
        list.push(id.to_string());
    }
}

/// Appends every id of `incoming` not yet in `list`, keeping first-seen order.
pub fn merge_unique(list: &mut Vec<String>, incoming: &[String]) {
    for id in incoming {
        push_unique(list, id);
    }
}

pub(crate) fn nullable_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn default_true() -> bool {
    true
}
