use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

pub const DEFAULT_LANGUAGE: &str = "en";

/// Read-only snapshot of a learner, handed to the generation layer per request.
///
/// Maps are `BTreeMap` so that serializing a snapshot is stable regardless of
/// insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub job_preferences: BTreeMap<String, Value>,
    /// course identifier → progress value
    #[serde(default)]
    pub progress: BTreeMap<String, Value>,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

impl UserProfile {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            language: default_language(),
            skills: Vec::new(),
            job_preferences: BTreeMap::new(),
            progress: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct UserProfileRow {
    pub id: Uuid,
    pub language: Option<String>,
    pub skills: Vec<String>,
    pub job_preferences: Json<BTreeMap<String, Value>>,
    pub progress: Json<BTreeMap<String, Value>>,
}

impl From<UserProfileRow> for UserProfile {
    fn from(row: UserProfileRow) -> Self {
        Self {
            id: row.id,
            language: row
                .language
                .filter(|l| !l.trim().is_empty())
                .unwrap_or_else(default_language),
            skills: row.skills,
            job_preferences: row.job_preferences.0,
            progress: row.progress.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_language_defaults_to_english() {
        let json = json!({ "id": Uuid::new_v4() });
        let profile: UserProfile = serde_json::from_value(json).unwrap();
        assert_eq!(profile.language, "en");
        assert!(profile.skills.is_empty());
        assert!(profile.progress.is_empty());
    }

    #[test]
    fn test_row_with_blank_language_falls_back_to_default() {
        let row = UserProfileRow {
            id: Uuid::new_v4(),
            language: Some("  ".to_string()),
            skills: vec!["data_entry".to_string()],
            job_preferences: Json(BTreeMap::from([("remote".to_string(), json!(true))])),
            progress: Json(BTreeMap::new()),
        };

        let profile = UserProfile::from(row);
        assert_eq!(profile.language, "en");
        assert_eq!(profile.skills, vec!["data_entry"]);
        assert_eq!(profile.job_preferences["remote"], json!(true));
    }
}
