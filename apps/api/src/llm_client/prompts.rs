// Shared prompt fragments.
// Each use case defines its own templates in generation/prompts.rs.
// This file contains cross-cutting instructions reused across them.

/// Appended to every prompt whose answer must be machine-readable.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every prompt whose answer is free text shown to the learner.
pub const PLAIN_TEXT_INSTRUCTION: &str = "\
    Respond with the text only. \
    Do NOT wrap it in quotes, JSON, or markdown.";

/// Focus shared by the learning-path and job-match prompts.
pub const REMOTE_WORK_FOCUS: &str = "\
    The learner is building skills for remote work. \
    Prefer skills and opportunities that can be practised and performed remotely.";
