//! Response Orchestrator — the one place a generation request flows through.
//!
//! Flow per request: build prompt → call provider (once, bounded by a timeout)
//! → validate against the use case schema → validated result, or the fallback.
//!
//! The orchestrated operations are total: provider failures and invalid
//! answers both degrade to the use case's fallback and are reported through
//! `Outcome`, never as an error. No state is shared between requests, so one
//! orchestrator can serve any number of concurrent callers.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::generation::fallback::{
    default_feedback, default_job_matches, default_learning_path, fallback,
};
use crate::generation::prompt_builder;
use crate::generation::request::{GenerationRequest, GenerationResult, JobMatch, LearningPath};
use crate::generation::schema::{validate, Schema, ValidationError};
use crate::llm_client::{GenerativeProvider, ProviderError, RawText};
use crate::models::profile::UserProfile;

/// Why a request ended on the fallback path.
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackReason {
    Provider(ProviderError),
    Validation(ValidationError),
}

impl FallbackReason {
    pub fn kind(&self) -> &'static str {
        match self {
            FallbackReason::Provider(e) => e.kind(),
            FallbackReason::Validation(e) => e.kind(),
        }
    }
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FallbackReason::Provider(e) => write!(f, "{e}"),
            FallbackReason::Validation(e) => write!(f, "{e}"),
        }
    }
}

/// Which path produced a result.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Validated,
    Fallback(FallbackReason),
}

/// A schema-valid value plus the path that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Generated<T> {
    pub value: T,
    pub outcome: Outcome,
}

impl<T> Generated<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self.outcome, Outcome::Fallback(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Generated<U> {
        Generated {
            value: f(self.value),
            outcome: self.outcome,
        }
    }
}

#[derive(Clone)]
pub struct ResponseOrchestrator {
    provider: Arc<dyn GenerativeProvider>,
    provider_timeout: Duration,
}

impl ResponseOrchestrator {
    pub fn new(provider: Arc<dyn GenerativeProvider>, provider_timeout: Duration) -> Self {
        Self {
            provider,
            provider_timeout,
        }
    }

    /// Runs one request through build → send → validate, falling back on any failure.
    pub async fn run(&self, request: GenerationRequest) -> Generated<GenerationResult> {
        let use_case = request.kind();

        let prompt = prompt_builder::build(&request);
        debug!(%use_case, stage = "built", prompt_chars = prompt.as_str().len());

        let attempt = self
            .send(&prompt)
            .await
            .map_err(FallbackReason::Provider)
            .and_then(|raw| {
                debug!(%use_case, stage = "sent", response_chars = raw.as_str().len());
                validate(&raw, Schema::for_kind(use_case)).map_err(FallbackReason::Validation)
            });

        match attempt {
            Ok(value) => {
                debug_assert_eq!(value.kind(), use_case);
                info!(%use_case, path = "validated", "Generation validated");
                Generated {
                    value,
                    outcome: Outcome::Validated,
                }
            }
            Err(reason) => {
                warn!(
                    %use_case,
                    path = "fallback",
                    reason = reason.kind(),
                    "Generation fell back: {reason}"
                );
                Generated {
                    value: fallback(&request),
                    outcome: Outcome::Fallback(reason),
                }
            }
        }
    }

    /// At most one provider call, bounded by the configured timeout.
    async fn send(&self, prompt: &prompt_builder::PromptText) -> Result<RawText, ProviderError> {
        match tokio::time::timeout(self.provider_timeout, self.provider.complete(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(self.provider_timeout)),
        }
    }

    // ────────────────────────────────────────────────────────────────────────
    // Caller-facing operations
    // ────────────────────────────────────────────────────────────────────────

    pub async fn generate_learning_path(&self, profile: &UserProfile) -> Generated<LearningPath> {
        self.run(GenerationRequest::learning_path(profile))
            .await
            .map(|result| {
                result
                    .into_learning_path()
                    .unwrap_or_else(default_learning_path)
            })
    }

    pub async fn translate_content(&self, content: &str, target_lang: &str) -> Generated<String> {
        let request = GenerationRequest::Translation {
            content: content.to_string(),
            target_lang: target_lang.to_string(),
        };
        self.run(request)
            .await
            .map(|result| result.into_translation().unwrap_or_else(|| content.to_string()))
    }

    pub async fn match_jobs(
        &self,
        skills: &[String],
        preferences: &BTreeMap<String, Value>,
    ) -> Generated<Vec<JobMatch>> {
        let request = GenerationRequest::JobMatch {
            skills: skills.to_vec(),
            preferences: preferences.clone(),
        };
        self.run(request)
            .await
            .map(|result| result.into_job_matches().unwrap_or_else(default_job_matches))
    }

    pub async fn synthesize_feedback(
        &self,
        language: &str,
        course_id: &str,
        progress: &Value,
    ) -> Generated<String> {
        let request = GenerationRequest::Feedback {
            language: language.to_string(),
            course_id: course_id.to_string(),
            progress: progress.clone(),
        };
        self.run(request)
            .await
            .map(|result| result.into_feedback().unwrap_or_else(default_feedback))
    }
}
