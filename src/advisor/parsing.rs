use serde::Deserialize;

use super::types::{AdviseError, CommandSuggestion, TargetOs};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SuggestionPayload {
    command: String,
    explanation: String,
    known_command: bool,
    os: TargetOs,
}

/// Find the first complete JSON object in the model output.
///
/// Tolerates code fences and stray prose around the object; the model is
/// instructed not to produce them, but treated as untrusted anyway.
pub(crate) fn extract_json_object(input: &str) -> Option<String> {
    let trimmed = input.trim();
    let start = trimmed.find('{')?;

    let mut depth = 0;
    let mut end = None;
    for (idx, ch) in trimmed[start..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    end = Some(start + idx);
                    break;
                }
            }
            _ => {}
        }
    }

    let end = end?;
    Some(trimmed[start..=end].to_string())
}

/// Total validation from raw model text to a structurally valid suggestion.
///
/// Structural checks only: all four fields present with the right types and
/// `os` one of the three literals. A payload where `known_command` is false
/// but `command` is non-empty breaks the model's contract, yet is still
/// returned unchanged rather than rejected.
pub(crate) fn parse_suggestion(raw: &str) -> Result<CommandSuggestion, AdviseError> {
    let fragment =
        extract_json_object(raw).ok_or_else(|| AdviseError::Malformed(preview(raw)))?;

    let value: serde_json::Value = serde_json::from_str(&fragment)
        .map_err(|err| AdviseError::Malformed(format!("{err} in {}", preview(raw))))?;

    let payload: SuggestionPayload = serde_json::from_value(value)
        .map_err(|err| AdviseError::SchemaViolation(err.to_string()))?;

    Ok(CommandSuggestion {
        command: payload.command,
        explanation: payload.explanation,
        known_command: payload.known_command,
        os: payload.os,
    })
}

fn preview(raw: &str) -> String {
    const MAX_CHARS: usize = 120;

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "(empty response)".to_string();
    }

    let mut preview: String = trimmed.chars().take(MAX_CHARS).collect();
    if trimmed.chars().count() > MAX_CHARS {
        preview.push('…');
    }
    preview
}
