use serde::{Deserialize, Serialize};

/// Body posted to the generation proxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl GenerateRequest {
    /// A single user turn with an optional system instruction.
    pub fn single_turn(system_prompt: &str, user_content: &str, model: Option<&str>) -> Self {
        let system_instruction =
            (!system_prompt.is_empty()).then(|| Content::new(None, system_prompt));
        Self {
            contents: vec![Content::new(Some("user"), user_content)],
            system_instruction,
            model: model.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    fn new(role: Option<&str>, text: &str) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part {
                text: Some(text.to_string()),
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub error: Option<ApiError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
    #[serde(default)]
    pub safety_ratings: Vec<SafetyRating>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SafetyRating {
    pub category: String,
    pub probability: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub message: Option<String>,
}

impl GenerateResponse {
    /// A response carrying one candidate with a single text part.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            candidates: vec![Candidate {
                content: Some(Content {
                    role: Some("model".into()),
                    parts: vec![Part {
                        text: Some(text.into()),
                    }],
                }),
                finish_reason: Some("STOP".into()),
                safety_ratings: Vec::new(),
            }],
            error: None,
        }
    }

    /// Text of the first part of the first candidate, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }

    /// Suffix describing why no usable completion came back:
    /// `" (Reason: X) - Safety: CAT (PROB), ..."`, each half only when present.
    pub fn blocked_detail(&self) -> String {
        let Some(candidate) = self.candidates.first() else {
            return String::new();
        };
        let mut detail = String::new();
        if let Some(reason) = &candidate.finish_reason {
            detail.push_str(&format!(" (Reason: {reason})"));
        }
        if !candidate.safety_ratings.is_empty() {
            let ratings: Vec<String> = candidate
                .safety_ratings
                .iter()
                .map(|r| format!("{} ({})", r.category, r.probability))
                .collect();
            detail.push_str(&format!(" - Safety: {}", ratings.join(", ")));
        }
        detail
    }
}
