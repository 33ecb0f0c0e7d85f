//! Normalization of `generateContent` responses into [`GenerationResult`].
//!
//! Selection policy is **first wins**: the first inline-data part becomes
//! the image, the first text part becomes the text, and any later part of an
//! already-filled kind is ignored. Only the first candidate is considered.
//! When neither kind is present (including safety-blocked candidates with no
//! content) the text is set to [`NO_CONTENT_MESSAGE`].

use super::types::{GenerateContentResponse, Part};
use crate::ai::encoder::to_png_data_url;
use crate::models::GenerationResult;

pub const NO_CONTENT_MESSAGE: &str =
    "No content was generated. The request may have been blocked by safety filters.";

/// A response part reduced to the shapes the normalizer cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponsePart {
    Text(String),
    Binary { mime_type: String, data: String },
    Unsupported,
}

impl From<Part> for ResponsePart {
    fn from(part: Part) -> Self {
        match part {
            Part::Text { text } => Self::Text(text),
            Part::InlineData { inline_data } => Self::Binary {
                mime_type: inline_data.mime_type,
                data: inline_data.data,
            },
            Part::Other(_) => Self::Unsupported,
        }
    }
}

/// Parts of the first candidate, in response order.
pub fn response_parts(response: GenerateContentResponse) -> Vec<ResponsePart> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
    {
        tracing::warn!("Gemini blocked the prompt: {}", reason);
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Vec::new();
    };

    match candidate.content {
        Some(content) => content.parts.into_iter().map(ResponsePart::from).collect(),
        None => {
            tracing::warn!(
                "Gemini candidate had no content (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            );
            Vec::new()
        }
    }
}

/// Fold parts into a result using the first-wins policy.
pub fn normalize<I>(parts: I) -> GenerationResult
where
    I: IntoIterator<Item = ResponsePart>,
{
    let mut result = GenerationResult::default();

    for part in parts {
        match part {
            ResponsePart::Binary { mime_type, data } => {
                if result.image.is_none() {
                    tracing::debug!("Using {} image part, framed as PNG", mime_type);
                    result.image = Some(to_png_data_url(&data));
                } else {
                    tracing::debug!("Ignoring additional {} image part", mime_type);
                }
            }
            ResponsePart::Text(text) => {
                if result.text.is_none() {
                    result.text = Some(text);
                } else {
                    tracing::debug!("Ignoring additional text part ({} chars)", text.len());
                }
            }
            ResponsePart::Unsupported => {
                tracing::debug!("Ignoring unsupported response part");
            }
        }
    }

    if result.image.is_none() && result.text.is_none() {
        result.text = Some(NO_CONTENT_MESSAGE.to_string());
    }

    result
}

/// First text part of the first candidate, if any.
pub fn first_text(response: GenerateContentResponse) -> Option<String> {
    response_parts(response).into_iter().find_map(|p| match p {
        ResponsePart::Text(text) => Some(text),
        ResponsePart::Binary { .. } | ResponsePart::Unsupported => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn binary(data: &str, mime: &str) -> ResponsePart {
        ResponsePart::Binary {
            mime_type: mime.to_string(),
            data: data.to_string(),
        }
    }

    #[test]
    fn test_text_only() {
        let result = normalize(vec![ResponsePart::Text("a caption".to_string())]);
        assert_eq!(
            result,
            GenerationResult {
                image: None,
                text: Some("a caption".to_string()),
            }
        );
    }

    #[test]
    fn test_binary_only_is_framed_as_png() {
        let result = normalize(vec![binary("QUJD", "image/jpeg")]);
        assert_eq!(
            result,
            GenerationResult {
                image: Some("data:image/png;base64,QUJD".to_string()),
                text: None,
            }
        );
    }

    #[test]
    fn test_neither_uses_fallback_message() {
        let result = normalize(vec![ResponsePart::Unsupported]);
        assert_eq!(result.image, None);
        assert_eq!(result.text.as_deref(), Some(NO_CONTENT_MESSAGE));
        assert!(NO_CONTENT_MESSAGE.starts_with("No content was generated"));
    }

    #[test]
    fn test_first_of_each_kind_wins() {
        let result = normalize(vec![
            ResponsePart::Text("first".to_string()),
            binary("AAAA", "image/png"),
            ResponsePart::Text("second".to_string()),
            binary("BBBB", "image/png"),
        ]);
        assert_eq!(result.image.as_deref(), Some("data:image/png;base64,AAAA"));
        assert_eq!(result.text.as_deref(), Some("first"));
    }

    #[test]
    fn test_response_parts_uses_first_candidate_only() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                { "content": { "parts": [{ "text": "one" }] } },
                { "content": { "parts": [{ "text": "two" }] } }
            ]
        }))
        .unwrap();
        assert_eq!(
            response_parts(response),
            vec![ResponsePart::Text("one".to_string())]
        );
    }

    #[test]
    fn test_blocked_candidate_normalizes_to_fallback() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "finishReason": "SAFETY" }],
            "promptFeedback": { "blockReason": "SAFETY" }
        }))
        .unwrap();
        let result = normalize(response_parts(response));
        assert_eq!(result.text.as_deref(), Some(NO_CONTENT_MESSAGE));
    }

    #[test]
    fn test_first_text_skips_images() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [
                { "inlineData": { "mimeType": "image/png", "data": "AAAA" } },
                { "text": "{\"ideas\":[]}" }
            ] } }]
        }))
        .unwrap();
        assert_eq!(first_text(response).as_deref(), Some("{\"ideas\":[]}"));
        assert_eq!(first_text(GenerateContentResponse::default()), None);
    }
}
