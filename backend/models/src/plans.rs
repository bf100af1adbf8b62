use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlan {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default, alias = "name")]
    pub plan_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub goal: Option<String>,
    #[serde(default)]
    pub routines: Option<String>,
    #[serde(default)]
    pub meals: Option<Vec<String>>,
    #[serde(default)]
    pub ingredients: Option<Vec<String>>,
    #[serde(default)]
    pub instructions: Option<Vec<String>>,
}

document!(MealPlan, "mealPlans");

impl MealPlan {
    pub fn apply_update(&mut self, update: MealPlan) {
        self.user_id = update.user_id;
        self.routines = update.routines;
        self.plan_name = update.plan_name;
        self.description = update.description;
        self.goal = update.goal;
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillShare {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub meal_details: Option<String>,
    #[serde(default)]
    pub dietary_preferences: Option<String>,
    #[serde(default)]
    pub media_urls: Option<Vec<String>>,
    #[serde(default)]
    pub media_types: Option<Vec<String>>,
    #[serde(default)]
    pub ingredients: Option<String>,
}

document!(SkillShare, "skillShares");

/// Story/status update.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub exercise_type: Option<String>,
    #[serde(default)]
    pub time_duration: i32,
    #[serde(default)]
    pub intensity: Option<String>,
}

document!(StatusUpdate, "statusUpdates");

impl StatusUpdate {
    pub fn apply_update(&mut self, update: StatusUpdate) {
        self.title = update.title;
        self.image = update.image;
        self.description = update.description;
    }
}
