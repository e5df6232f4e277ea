mod parsing;
mod prompt;
mod types;

pub use types::{AdviseError, CommandSuggestion, TargetOs};

use crate::gemini::{Content, GeminiClient, GenerateContentRequest, GenerationConfig};

/// Ask the model for a single shell command answering `query`.
///
/// Issues exactly one generateContent request, then validates the reply
/// structurally. Semantic correctness of the suggested command is delegated
/// entirely to the model; the only guarantee here is that the returned value
/// matches the four-field contract.
pub async fn advise(
    client: &GeminiClient,
    query: &str,
    target: TargetOs,
    model: &str,
    max_tokens: u32,
) -> Result<CommandSuggestion, AdviseError> {
    let request = GenerateContentRequest {
        contents: vec![Content::user(query.trim())],
        system_instruction: Some(Content::system(prompt::system_prompt(target))),
        generation_config: Some(GenerationConfig {
            temperature: Some(0.2),
            max_output_tokens: Some(max_tokens),
            response_mime_type: Some("application/json".to_string()),
        }),
    };

    let response = client
        .generate_content(model, request)
        .await
        .map_err(AdviseError::Network)?;

    let text = response
        .text()
        .ok_or_else(|| AdviseError::Malformed("model returned no candidates".to_string()))?;

    parsing::parse_suggestion(&text)
}
