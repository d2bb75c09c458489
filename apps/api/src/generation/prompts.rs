// Prompt templates for the four generation use cases.
// Cross-cutting fragments live in llm_client::prompts.

/// Learning path prompt template.
/// Replace: {language}, {skills_json}, {skill_graph_json}, {remote_focus}, {json_only}
pub const LEARNING_PATH_PROMPT_TEMPLATE: &str = r#"Create a personalized learning path for a {language}-speaking learner.

CURRENT SKILLS:
{skills_json}

KNOWN SKILL TRACKS (track → skills it covers):
{skill_graph_json}

{remote_focus}

Structure the answer in JSON format with courses and milestones. Return a JSON OBJECT with this EXACT schema:
{
  "courses": [
    {"title": "Internet skills for remote work", "skill": "internet_skills", "description": "optional"}
  ],
  "milestones": [
    {"title": "Complete your first online application", "description": "optional"}
  ]
}

RULES:
1. Order courses from first to last; build on the learner's current skills
2. Every course and milestone MUST have a non-empty `title`
3. Write titles and descriptions in the learner's language ({language})

{json_only}"#;

/// Translation prompt template.
/// Replace: {target_lang}, {content}, {plain_text}
pub const TRANSLATION_PROMPT_TEMPLATE: &str = r#"Translate this learning content to {target_lang}.
Preserve meaning, formatting, and any technical terms a learner would search for.

{plain_text}

CONTENT:
{content}"#;

/// Job matching prompt template.
/// Replace: {skills_json}, {preferences_json}, {remote_focus}, {json_only}
pub const JOB_MATCH_PROMPT_TEMPLATE: &str = r#"Match jobs for a learner with the following profile.

SKILLS:
{skills_json}

JOB PREFERENCES:
{preferences_json}

{remote_focus} Consider remote opportunities.

Return a JSON ARRAY with job IDs and match percentages:
[
  {"job_id": 7, "match_percentage": 82}
]

RULES:
1. `job_id` is an integer
2. `match_percentage` is a number from 0 to 100
3. Order from best to worst match; return [] when nothing fits

{json_only}"#;

/// Progress feedback prompt template.
/// Replace: {language}, {course_id}, {progress_json}, {plain_text}
pub const FEEDBACK_PROMPT_TEMPLATE: &str = r#"Provide constructive feedback in {language} for this progress update.

COURSE: {course_id}
PROGRESS: {progress_json}

Focus on encouragement and practical next steps. Keep it to a short paragraph.

{plain_text}"#;
