//! Prompt Builder — renders a `GenerationRequest` into provider-ready text.
//!
//! Pure and deterministic: structured payload fields are serialized as
//! canonical JSON (skills de-duplicated in first-seen order, map keys sorted)
//! so identical requests always produce byte-identical prompts.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::generation::prompts::{
    FEEDBACK_PROMPT_TEMPLATE, JOB_MATCH_PROMPT_TEMPLATE, LEARNING_PATH_PROMPT_TEMPLATE,
    TRANSLATION_PROMPT_TEMPLATE,
};
use crate::generation::request::GenerationRequest;
use crate::llm_client::prompts::{JSON_ONLY_INSTRUCTION, PLAIN_TEXT_INSTRUCTION, REMOTE_WORK_FOCUS};

/// Static skill tracks offered to the provider as anchors for learning paths.
pub const SKILL_GRAPH: &[(&str, &[&str])] = &[
    ("digital_literacy", &["basic_computing", "internet_skills"]),
    ("advanced_skills", &["graphic_design", "data_entry"]),
];

/// Rendered instruction text for the provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PromptText(String);

impl PromptText {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PromptText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn build(request: &GenerationRequest) -> PromptText {
    let text = match request {
        GenerationRequest::LearningPath { language, skills } => render(
            LEARNING_PATH_PROMPT_TEMPLATE,
            &[
                ("language", language.as_str()),
                ("skills_json", skills_json(skills).as_str()),
                ("skill_graph_json", skill_graph_json().as_str()),
                ("remote_focus", REMOTE_WORK_FOCUS),
                ("json_only", JSON_ONLY_INSTRUCTION),
            ],
        ),
        GenerationRequest::Translation {
            content,
            target_lang,
        } => render(
            TRANSLATION_PROMPT_TEMPLATE,
            &[
                ("target_lang", target_lang.as_str()),
                ("content", content.as_str()),
                ("plain_text", PLAIN_TEXT_INSTRUCTION),
            ],
        ),
        GenerationRequest::JobMatch {
            skills,
            preferences,
        } => render(
            JOB_MATCH_PROMPT_TEMPLATE,
            &[
                ("skills_json", skills_json(skills).as_str()),
                ("preferences_json", map_json(preferences).as_str()),
                ("remote_focus", REMOTE_WORK_FOCUS),
                ("json_only", JSON_ONLY_INSTRUCTION),
            ],
        ),
        GenerationRequest::Feedback {
            language,
            course_id,
            progress,
        } => render(
            FEEDBACK_PROMPT_TEMPLATE,
            &[
                ("language", language.as_str()),
                ("course_id", course_id.as_str()),
                ("progress_json", progress.to_string().as_str()),
                ("plain_text", PLAIN_TEXT_INSTRUCTION),
            ],
        ),
    };

    PromptText(text)
}

/// Skills as a JSON array, duplicates dropped, first occurrence wins.
fn skills_json(skills: &[String]) -> String {
    let mut seen = Vec::with_capacity(skills.len());
    for skill in skills {
        if !seen.contains(&skill.as_str()) {
            seen.push(skill.as_str());
        }
    }
    Value::Array(seen.into_iter().map(|s| Value::String(s.to_string())).collect()).to_string()
}

fn map_json(map: &BTreeMap<String, Value>) -> String {
    Value::Object(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()).to_string()
}

fn skill_graph_json() -> String {
    Value::Object(
        SKILL_GRAPH
            .iter()
            .map(|(track, skills)| {
                (
                    track.to_string(),
                    Value::Array(skills.iter().map(|s| Value::String(s.to_string())).collect()),
                )
            })
            .collect(),
    )
    .to_string()
}

/// Single-pass `{name}` substitution. Substituted values are never rescanned,
/// so payload text that happens to contain a placeholder is embedded verbatim.
fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let hit = vars
            .iter()
            .find(|(key, _)| tail.starts_with(key) && tail[key.len()..].starts_with('}'));

        match hit {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn job_request(preferences: BTreeMap<String, Value>) -> GenerationRequest {
        GenerationRequest::JobMatch {
            skills: vec!["data_entry".to_string()],
            preferences,
        }
    }

    #[test]
    fn test_identical_requests_render_identical_prompts() {
        let request = GenerationRequest::LearningPath {
            language: "en".to_string(),
            skills: vec!["basic_computing".to_string(), "internet_skills".to_string()],
        };
        assert_eq!(build(&request), build(&request.clone()));
    }

    #[test]
    fn test_preferences_render_in_key_order() {
        let mut a = BTreeMap::new();
        a.insert("remote".to_string(), json!(true));
        a.insert("hours".to_string(), json!("part_time"));

        let mut b = BTreeMap::new();
        b.insert("hours".to_string(), json!("part_time"));
        b.insert("remote".to_string(), json!(true));

        let prompt = build(&job_request(a));
        assert_eq!(prompt, build(&job_request(b)));
        assert!(prompt
            .as_str()
            .contains(r#"{"hours":"part_time","remote":true}"#));
    }

    #[test]
    fn test_duplicate_skills_collapse() {
        let request = GenerationRequest::LearningPath {
            language: "en".to_string(),
            skills: vec![
                "data_entry".to_string(),
                "graphic_design".to_string(),
                "data_entry".to_string(),
            ],
        };
        let prompt = build(&request);
        assert!(prompt
            .as_str()
            .contains(r#"["data_entry","graphic_design"]"#));
    }

    #[test]
    fn test_learning_path_prompt_names_structure_and_tracks() {
        let request = GenerationRequest::LearningPath {
            language: "fr".to_string(),
            skills: vec![],
        };
        let prompt = build(&request);
        let text = prompt.as_str();
        assert!(text.contains("fr-speaking learner"));
        assert!(text.contains("courses and milestones"));
        assert!(text.contains(r#""digital_literacy":["basic_computing","internet_skills"]"#));
        assert!(text.contains(JSON_ONLY_INSTRUCTION));
    }

    #[test]
    fn test_translation_embeds_content_verbatim() {
        let content = "Click {json_only} then press \"Save\"\nline two";
        let request = GenerationRequest::Translation {
            content: content.to_string(),
            target_lang: "es".to_string(),
        };
        let prompt = build(&request);
        assert!(prompt.as_str().contains("to es."));
        assert!(prompt.as_str().ends_with(content));
    }

    #[test]
    fn test_feedback_embeds_progress_value() {
        let request = GenerationRequest::Feedback {
            language: "sw".to_string(),
            course_id: "course-3".to_string(),
            progress: json!(45),
        };
        let prompt = build(&request);
        assert!(prompt.as_str().contains("feedback in sw"));
        assert!(prompt.as_str().contains("COURSE: course-3"));
        assert!(prompt.as_str().contains("PROGRESS: 45"));
    }

    #[test]
    fn test_render_leaves_unknown_braces_alone() {
        let out = render("{a} {\"b\": 1} {c", &[("a", "x")]);
        assert_eq!(out, "x {\"b\": 1} {c");
    }
}
