//! Response normalization for the Gemini `generateContent` API.

use crate::request::InlineData;
use gemini_image_mcp_common::error::Error;
use serde::{Deserialize, Serialize};

/// Gemini API response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Response candidates
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Feedback about the prompt, present when it was blocked
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

/// Gemini response candidate.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<ResponseContent>,
    pub finish_reason: Option<String>,
}

/// Gemini response content.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

/// Gemini response part.
///
/// A part may carry text, inline data, or both keys absent. Parts flagged as
/// `thought` hold reasoning traces and are never surfaced.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub thought: bool,
    #[serde(default, alias = "inline_data")]
    pub inline_data: Option<InlineData>,
}

/// Feedback about the prompt.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

/// The stable result shape of a successful generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl NormalizedResult {
    /// True when the model produced neither an image nor text.
    pub fn is_empty(&self) -> bool {
        self.image_data.is_none() && self.text.is_none()
    }
}

/// Reduce a response to at most one image and the joined visible text.
///
/// Only the first candidate is read. Fails with [`Error::NoCandidates`] when
/// the response has no candidate at all, carrying the prompt's block reason.
pub fn normalize(response: GenerateContentResponse) -> Result<NormalizedResult, Error> {
    let GenerateContentResponse {
        candidates,
        prompt_feedback,
    } = response;

    let candidate = candidates
        .into_iter()
        .next()
        .ok_or_else(|| Error::NoCandidates {
            block_reason: prompt_feedback.and_then(|f| f.block_reason),
        })?;

    let mut result = NormalizedResult::default();
    let mut texts = Vec::new();

    let parts = candidate.content.map(|c| c.parts).unwrap_or_default();
    for part in parts {
        if part.thought {
            continue;
        }
        if let Some(text) = part.text {
            texts.push(text);
        }
        if let Some(inline) = part.inline_data {
            if result.image_data.is_none() {
                result.image_data = Some(inline.data);
                result.mime_type = Some(inline.mime_type);
            }
        }
    }

    if !texts.is_empty() {
        result.text = Some(texts.join("\n"));
    }
    Ok(result)
}
