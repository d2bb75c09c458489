//! Request and result types shared by every generation use case.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::models::profile::UserProfile;

/// The closed set of generation use cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UseCaseKind {
    LearningPath,
    Translation,
    JobMatch,
    Feedback,
}

impl UseCaseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UseCaseKind::LearningPath => "learning_path",
            UseCaseKind::Translation => "translation",
            UseCaseKind::JobMatch => "job_match",
            UseCaseKind::Feedback => "feedback",
        }
    }
}

impl fmt::Display for UseCaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single generation request, built per call and consumed once.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationRequest {
    LearningPath {
        language: String,
        skills: Vec<String>,
    },
    Translation {
        content: String,
        target_lang: String,
    },
    JobMatch {
        skills: Vec<String>,
        preferences: BTreeMap<String, Value>,
    },
    Feedback {
        language: String,
        course_id: String,
        progress: Value,
    },
}

impl GenerationRequest {
    pub fn kind(&self) -> UseCaseKind {
        match self {
            GenerationRequest::LearningPath { .. } => UseCaseKind::LearningPath,
            GenerationRequest::Translation { .. } => UseCaseKind::Translation,
            GenerationRequest::JobMatch { .. } => UseCaseKind::JobMatch,
            GenerationRequest::Feedback { .. } => UseCaseKind::Feedback,
        }
    }

    pub fn learning_path(profile: &UserProfile) -> Self {
        GenerationRequest::LearningPath {
            language: profile.language.clone(),
            skills: profile.skills.clone(),
        }
    }

    pub fn job_match(profile: &UserProfile) -> Self {
        GenerationRequest::JobMatch {
            skills: profile.skills.clone(),
            preferences: profile.job_preferences.clone(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Results
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseEntry {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Ordered courses plus the milestones that mark progress through them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningPath {
    pub courses: Vec<CourseEntry>,
    pub milestones: Vec<Milestone>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMatch {
    pub job_id: i64,
    /// 0 – 100, kept as the provider wrote it (`82` stays `82`).
    pub match_percentage: Number,
}

/// A validated generation result. Never constructed from unchecked provider text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum GenerationResult {
    LearningPath(LearningPath),
    Translation(String),
    JobMatch(Vec<JobMatch>),
    Feedback(String),
}

impl GenerationResult {
    pub fn kind(&self) -> UseCaseKind {
        match self {
            GenerationResult::LearningPath(_) => UseCaseKind::LearningPath,
            GenerationResult::Translation(_) => UseCaseKind::Translation,
            GenerationResult::JobMatch(_) => UseCaseKind::JobMatch,
            GenerationResult::Feedback(_) => UseCaseKind::Feedback,
        }
    }

    pub fn into_learning_path(self) -> Option<LearningPath> {
        match self {
            GenerationResult::LearningPath(path) => Some(path),
            _ => None,
        }
    }

    pub fn into_translation(self) -> Option<String> {
        match self {
            GenerationResult::Translation(text) => Some(text),
            _ => None,
        }
    }

    pub fn into_job_matches(self) -> Option<Vec<JobMatch>> {
        match self {
            GenerationResult::JobMatch(matches) => Some(matches),
            _ => None,
        }
    }

    pub fn into_feedback(self) -> Option<String> {
        match self {
            GenerationResult::Feedback(text) => Some(text),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn test_request_kind_matches_variant() {
        let request = GenerationRequest::Translation {
            content: "Hello".to_string(),
            target_lang: "es".to_string(),
        };
        assert_eq!(request.kind(), UseCaseKind::Translation);
        assert_eq!(request.kind().to_string(), "translation");
    }

    #[test]
    fn test_requests_from_profile_snapshot() {
        let mut profile = UserProfile::new(Uuid::new_v4());
        profile.language = "sw".to_string();
        profile.skills = vec!["basic_computing".to_string()];
        profile
            .job_preferences
            .insert("remote".to_string(), json!(true));

        assert_eq!(
            GenerationRequest::learning_path(&profile),
            GenerationRequest::LearningPath {
                language: "sw".to_string(),
                skills: vec!["basic_computing".to_string()],
            }
        );
        match GenerationRequest::job_match(&profile) {
            GenerationRequest::JobMatch { preferences, .. } => {
                assert_eq!(preferences["remote"], json!(true));
            }
            other => panic!("unexpected request {other:?}"),
        }
    }

    #[test]
    fn test_result_accessors_reject_other_kinds() {
        let result = GenerationResult::Feedback("Keep going".to_string());
        assert_eq!(result.kind(), UseCaseKind::Feedback);
        assert!(result.clone().into_job_matches().is_none());
        assert_eq!(result.into_feedback().as_deref(), Some("Keep going"));
    }

    #[test]
    fn test_course_entry_optional_fields_default() {
        let course: CourseEntry = serde_json::from_value(json!({"title": "Typing basics"})).unwrap();
        assert!(course.skill.is_none());
        assert!(course.description.is_none());
    }
}
