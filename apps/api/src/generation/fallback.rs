//! Fallback Policy — fixed, safe defaults returned when the provider fails or
//! its answer does not validate.
//!
//! Pure and total: no I/O, no randomness, and every default satisfies its own
//! use case schema.

use crate::generation::request::{
    GenerationRequest, GenerationResult, JobMatch, LearningPath, Milestone, UseCaseKind,
};

pub const GETTING_STARTED_TITLE: &str = "Getting started";
pub const GETTING_STARTED_DESCRIPTION: &str =
    "Review your current skills and pick one short course to begin with.";
pub const ENCOURAGEMENT: &str = "Great work on your progress so far! \
    Keep a steady routine, revisit anything that felt difficult, \
    and take the next lesson when you are ready.";
pub const UNTRANSLATED_PLACEHOLDER: &str = "Translation unavailable.";

pub fn default_learning_path() -> LearningPath {
    LearningPath {
        courses: Vec::new(),
        milestones: vec![Milestone {
            title: GETTING_STARTED_TITLE.to_string(),
            description: Some(GETTING_STARTED_DESCRIPTION.to_string()),
        }],
    }
}

pub fn default_job_matches() -> Vec<JobMatch> {
    Vec::new()
}

pub fn default_feedback() -> String {
    ENCOURAGEMENT.to_string()
}

/// Fallback for a request. Translation falls back to the untranslated
/// content; every other use case has a content-independent default.
pub fn fallback(request: &GenerationRequest) -> GenerationResult {
    match request {
        GenerationRequest::Translation { content, .. } if !content.trim().is_empty() => {
            GenerationResult::Translation(content.clone())
        }
        other => fallback_for_kind(other.kind()),
    }
}

/// Content-independent fallback by use case. Without source text, Translation
/// degrades to a fixed notice so the result is never blank.
pub fn fallback_for_kind(kind: UseCaseKind) -> GenerationResult {
    match kind {
        UseCaseKind::LearningPath => GenerationResult::LearningPath(default_learning_path()),
        UseCaseKind::JobMatch => GenerationResult::JobMatch(default_job_matches()),
        UseCaseKind::Feedback => GenerationResult::Feedback(default_feedback()),
        UseCaseKind::Translation => {
            GenerationResult::Translation(UNTRANSLATED_PLACEHOLDER.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::schema::{validate, Schema};
    use crate::llm_client::RawText;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn all_requests() -> Vec<GenerationRequest> {
        vec![
            GenerationRequest::LearningPath {
                language: "en".to_string(),
                skills: vec!["data_entry".to_string()],
            },
            GenerationRequest::Translation {
                content: "Hello".to_string(),
                target_lang: "es".to_string(),
            },
            GenerationRequest::JobMatch {
                skills: vec![],
                preferences: BTreeMap::new(),
            },
            GenerationRequest::Feedback {
                language: "en".to_string(),
                course_id: "1".to_string(),
                progress: json!(10),
            },
        ]
    }

    /// Re-encodes a result the way a provider would have sent it.
    fn as_raw(result: &GenerationResult) -> RawText {
        match result {
            GenerationResult::LearningPath(path) => {
                RawText::new(serde_json::to_string(path).unwrap())
            }
            GenerationResult::JobMatch(matches) => {
                RawText::new(serde_json::to_string(matches).unwrap())
            }
            GenerationResult::Translation(text) | GenerationResult::Feedback(text) => {
                RawText::new(text.clone())
            }
        }
    }

    #[test]
    fn test_fallback_is_deterministic() {
        for request in all_requests() {
            assert_eq!(fallback(&request), fallback(&request));
        }
    }

    #[test]
    fn test_fallback_kind_matches_request() {
        for request in all_requests() {
            assert_eq!(fallback(&request).kind(), request.kind());
        }
    }

    #[test]
    fn test_blank_translation_content_uses_notice() {
        let request = GenerationRequest::Translation {
            content: "  ".to_string(),
            target_lang: "es".to_string(),
        };
        assert_eq!(
            fallback(&request),
            GenerationResult::Translation(UNTRANSLATED_PLACEHOLDER.to_string())
        );
    }

    #[test]
    fn test_every_fallback_satisfies_its_schema() {
        for request in all_requests() {
            let result = fallback(&request);
            let schema = Schema::for_kind(request.kind());
            assert_eq!(validate(&as_raw(&result), schema).unwrap(), result);
        }
    }

    #[test]
    fn test_learning_path_fallback_has_single_getting_started_milestone() {
        let path = default_learning_path();
        assert!(path.courses.is_empty());
        assert_eq!(path.milestones.len(), 1);
        assert_eq!(path.milestones[0].title, GETTING_STARTED_TITLE);
    }

    #[test]
    fn test_translation_fallback_returns_original_content() {
        let request = GenerationRequest::Translation {
            content: "Hello".to_string(),
            target_lang: "es".to_string(),
        };
        assert_eq!(
            fallback(&request),
            GenerationResult::Translation("Hello".to_string())
        );
    }

    #[test]
    fn test_job_match_fallback_is_empty() {
        assert_eq!(
            fallback_for_kind(UseCaseKind::JobMatch),
            GenerationResult::JobMatch(vec![])
        );
    }
}
