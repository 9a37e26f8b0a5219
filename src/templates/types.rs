use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One rated category on the student form (0-10).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingField {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
}

impl RatingField {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            input_type: None,
        }
    }

    /// Build a field whose id is derived from its label.
    pub fn from_label(label: impl Into<String>) -> Self {
        let label = label.into();
        Self::new(rating_field_id(&label), label)
    }
}

/// An assessment schema: what gets rated, which traits and improvement areas
/// the teacher can pick from, and which report languages are offered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub is_locked: bool,
    pub rating_fields: Vec<RatingField>,
    #[serde(default)]
    pub character_options: Vec<String>,
    #[serde(default)]
    pub areas_to_improve: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub custom_instruction: String,
    #[serde(default)]
    pub created_date: i64,
}

impl Template {
    /// Schema problems that prevent saving; empty when the template is valid.
    pub fn validation_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.id.trim().is_empty() {
            errors.push("Missing template ID".to_string());
        }
        if self.name.trim().is_empty() {
            errors.push("Template name is required".to_string());
        }
        if self.rating_fields.is_empty() {
            errors.push("At least one rating field is required".to_string());
        }

        let mut seen = HashSet::new();
        for (index, field) in self.rating_fields.iter().enumerate() {
            if field.id.trim().is_empty() {
                errors.push(format!("Rating field {} missing ID", index + 1));
            } else if !seen.insert(field.id.as_str()) {
                errors.push(format!("Duplicate rating field ID: {}", field.id));
            }
            if field.label.trim().is_empty() {
                errors.push(format!("Rating field {} missing label", index + 1));
            }
        }

        if self.languages.is_empty() {
            errors.push("At least one language is required".to_string());
        }

        errors
    }

    pub fn is_valid(&self) -> bool {
        self.validation_errors().is_empty()
    }

    pub fn custom_instruction(&self) -> Option<&str> {
        let trimmed = self.custom_instruction.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// Summary counts for the template picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateStats {
    pub total_templates: usize,
    pub custom_templates: usize,
    pub locked_templates: usize,
    pub active_template: String,
}

/// Lowercase the label and collapse every run of non `[a-z0-9]` into `-`.
pub fn rating_field_id(label: &str) -> String {
    let mut id = String::with_capacity(label.len());
    let mut in_gap = false;
    for c in label.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            id.push(c);
            in_gap = false;
        } else if !in_gap {
            id.push('-');
            in_gap = true;
        }
    }
    id
}
