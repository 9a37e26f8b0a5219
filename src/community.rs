//! Rows exchanged with the shared community templates table.
//!
//! Authentication is optional: a template shared without a signed-in
//! identity is stored with no author.

use crate::error::TemplateError;
use crate::templates::{Template, TemplateRegistry};
use serde::{Deserialize, Serialize};

pub const UNTITLED: &str = "Untitled template";

/// The signed-in user, when there is one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Row inserted when a teacher shares a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharePayload {
    pub name: String,
    pub description: String,
    /// The template as a JSON string.
    pub content: String,
    pub user_id: Option<String>,
}

impl SharePayload {
    pub fn from_template(
        template: &Template,
        author: Option<&Identity>,
    ) -> Result<Self, serde_json::Error> {
        let name = template.name.trim();
        Ok(Self {
            name: if name.is_empty() {
                UNTITLED.to_string()
            } else {
                name.to_string()
            },
            description: template.description.clone(),
            content: serde_json::to_string(template)?,
            user_id: author.map(|identity| identity.id.clone()),
        })
    }
}

/// Row read back from the community table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommunityEntry {
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl CommunityEntry {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNTITLED)
    }

    /// Parsed template content; `None` when missing or malformed.
    pub fn template(&self) -> Option<Template> {
        serde_json::from_str(self.content.as_deref()?).ok()
    }

    /// Add the shared template to `registry` under a fresh local id.
    pub fn install(&self, registry: &mut TemplateRegistry) -> Result<Template, TemplateError> {
        let content = self
            .content
            .as_deref()
            .ok_or_else(|| TemplateError::Import("shared template has no content".into()))?;
        registry.import(content)
    }
}
