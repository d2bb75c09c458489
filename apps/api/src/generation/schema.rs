//! Response contracts — the expected shape of each use case's provider answer,
//! and the validator that enforces them.
//!
//! Validation is purely structural: it never calls the provider again and
//! never retries. Only text that passes both the parse and the shape check is
//! turned into a `GenerationResult`.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::generation::request::{GenerationResult, UseCaseKind};
use crate::llm_client::RawText;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Schema mismatch at `{field}`: expected {expected}")]
    SchemaMismatch {
        field: String,
        expected: &'static str,
    },
}

impl ValidationError {
    /// Short, stable label used in log records.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::Malformed(_) => "malformed",
            ValidationError::SchemaMismatch { .. } => "schema_mismatch",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Schema description
// ────────────────────────────────────────────────────────────────────────────

/// Structural type of a value in a response.
#[derive(Debug)]
pub enum Shape {
    /// Any string.
    Text,
    /// String with at least one non-whitespace character.
    NonEmptyString,
    /// JSON number with no fractional part.
    Integer,
    /// JSON number in `[0, 100]`.
    Percentage,
    /// Object with (at least) the listed fields. Extra fields are ignored.
    Object(&'static [Field]),
    ArrayOf(&'static Shape),
    /// Field that may be absent or `null`; otherwise must match the inner shape.
    Optional(&'static Shape),
}

#[derive(Debug)]
pub struct Field {
    pub name: &'static str,
    pub shape: Shape,
}

/// The contract for one use case. Defined once, never mutated.
#[derive(Debug)]
pub struct Schema {
    pub kind: UseCaseKind,
    pub root: Shape,
}

const COURSE_ENTRY: Shape = Shape::Object(&[
    Field {
        name: "title",
        shape: Shape::NonEmptyString,
    },
    Field {
        name: "skill",
        shape: Shape::Optional(&Shape::Text),
    },
    Field {
        name: "description",
        shape: Shape::Optional(&Shape::Text),
    },
]);

const MILESTONE_ENTRY: Shape = Shape::Object(&[
    Field {
        name: "title",
        shape: Shape::NonEmptyString,
    },
    Field {
        name: "description",
        shape: Shape::Optional(&Shape::Text),
    },
]);

const JOB_MATCH_ENTRY: Shape = Shape::Object(&[
    Field {
        name: "job_id",
        shape: Shape::Integer,
    },
    Field {
        name: "match_percentage",
        shape: Shape::Percentage,
    },
]);

pub static LEARNING_PATH_SCHEMA: Schema = Schema {
    kind: UseCaseKind::LearningPath,
    root: Shape::Object(&[
        Field {
            name: "courses",
            shape: Shape::ArrayOf(&COURSE_ENTRY),
        },
        Field {
            name: "milestones",
            shape: Shape::ArrayOf(&MILESTONE_ENTRY),
        },
    ]),
};

pub static TRANSLATION_SCHEMA: Schema = Schema {
    kind: UseCaseKind::Translation,
    root: Shape::NonEmptyString,
};

pub static JOB_MATCH_SCHEMA: Schema = Schema {
    kind: UseCaseKind::JobMatch,
    root: Shape::ArrayOf(&JOB_MATCH_ENTRY),
};

pub static FEEDBACK_SCHEMA: Schema = Schema {
    kind: UseCaseKind::Feedback,
    root: Shape::NonEmptyString,
};

impl Schema {
    pub fn for_kind(kind: UseCaseKind) -> &'static Schema {
        match kind {
            UseCaseKind::LearningPath => &LEARNING_PATH_SCHEMA,
            UseCaseKind::Translation => &TRANSLATION_SCHEMA,
            UseCaseKind::JobMatch => &JOB_MATCH_SCHEMA,
            UseCaseKind::Feedback => &FEEDBACK_SCHEMA,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Validation
// ────────────────────────────────────────────────────────────────────────────

pub fn validate(raw: &RawText, schema: &Schema) -> Result<GenerationResult, ValidationError> {
    match schema.kind {
        UseCaseKind::LearningPath => {
            decode_structured(raw, schema).map(GenerationResult::LearningPath)
        }
        UseCaseKind::JobMatch => decode_structured(raw, schema).map(GenerationResult::JobMatch),
        UseCaseKind::Translation => decode_text(raw, schema).map(GenerationResult::Translation),
        UseCaseKind::Feedback => decode_text(raw, schema).map(GenerationResult::Feedback),
    }
}

/// Parses JSON out of the raw text, checks it against the schema, then decodes it.
fn decode_structured<T: DeserializeOwned>(
    raw: &RawText,
    schema: &Schema,
) -> Result<T, ValidationError> {
    let value = parse_json(raw.as_str())?;
    check(&value, &schema.root, "")?;

    serde_json::from_value(value).map_err(|e| ValidationError::SchemaMismatch {
        field: format!("response ({e})"),
        expected: "a value matching the use case schema",
    })
}

/// Plain-text answers. A bare JSON string literal is unwrapped to its content.
fn decode_text(raw: &RawText, schema: &Schema) -> Result<String, ValidationError> {
    let trimmed = raw.as_str().trim();
    let text = match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::String(inner)) => inner.trim().to_string(),
        _ => trimmed.to_string(),
    };

    check(&Value::String(text.clone()), &schema.root, "text")?;
    Ok(text)
}

/// Parses the response as JSON, repairing the usual wrapping models add:
/// markdown code fences and prose around a single JSON value.
fn parse_json(raw: &str) -> Result<Value, ValidationError> {
    let text = strip_json_fences(raw);

    match serde_json::from_str::<Value>(text) {
        Ok(value) => Ok(value),
        Err(first_error) => extract_embedded_json(text)
            .and_then(|inner| serde_json::from_str::<Value>(inner).ok())
            .ok_or_else(|| ValidationError::Malformed(first_error.to_string())),
    }
}

/// The span from the first `{`/`[` to the last matching closer, if any.
fn extract_embedded_json(text: &str) -> Option<&str> {
    let start = text.find(&['{', '['][..])?;
    let closer = if text[start..].starts_with('{') { '}' } else { ']' };
    let end = text.rfind(closer)?;
    (end > start).then(|| &text[start..=end])
}

/// Strips ```json ... ``` or ``` ... ``` code fences from provider output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

fn check(value: &Value, shape: &Shape, path: &str) -> Result<(), ValidationError> {
    let mismatch = |expected: &'static str| ValidationError::SchemaMismatch {
        field: if path.is_empty() {
            "response".to_string()
        } else {
            path.to_string()
        },
        expected,
    };

    match shape {
        Shape::Text => match value {
            Value::String(_) => Ok(()),
            _ => Err(mismatch("string")),
        },
        Shape::NonEmptyString => match value.as_str() {
            Some(s) if !s.trim().is_empty() => Ok(()),
            _ => Err(mismatch("non-empty string")),
        },
        Shape::Integer => match value {
            Value::Number(n) if n.is_i64() => Ok(()),
            _ => Err(mismatch("integer")),
        },
        Shape::Percentage => match value.as_f64() {
            Some(p) if (0.0..=100.0).contains(&p) => Ok(()),
            _ => Err(mismatch("number between 0 and 100")),
        },
        Shape::Object(fields) => {
            let object = value.as_object().ok_or_else(|| mismatch("object"))?;
            for field in fields.iter() {
                let field_path = if path.is_empty() {
                    field.name.to_string()
                } else {
                    format!("{path}.{}", field.name)
                };
                match object.get(field.name) {
                    Some(inner) => check(inner, &field.shape, &field_path)?,
                    None if matches!(field.shape, Shape::Optional(_)) => {}
                    None => {
                        return Err(ValidationError::SchemaMismatch {
                            field: field_path,
                            expected: "required field",
                        })
                    }
                }
            }
            Ok(())
        }
        Shape::ArrayOf(item) => {
            let items = value.as_array().ok_or_else(|| mismatch("array"))?;
            for (i, inner) in items.iter().enumerate() {
                check(inner, item, &format!("{path}[{i}]"))?;
            }
            Ok(())
        }
        Shape::Optional(inner) => match value {
            Value::Null => Ok(()),
            _ => check(value, inner, path),
        },
    }
}
