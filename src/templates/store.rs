use super::types::Template;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Everything the registry persists: the template list and the active id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTemplates {
    #[serde(default)]
    pub templates: Vec<Template>,
    #[serde(default)]
    pub active_id: Option<String>,
}

/// Keyed persistence behind the template registry.
pub trait TemplateStore: Send {
    fn load(&self) -> Result<StoredTemplates>;
    fn persist(&mut self, data: &StoredTemplates) -> Result<()>;
}

/// Process-local store, used by tests and by callers that never persist.
#[derive(Debug, Default)]
pub struct MemoryTemplateStore {
    data: StoredTemplates,
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: StoredTemplates) -> Self {
        Self { data }
    }
}

impl TemplateStore for MemoryTemplateStore {
    fn load(&self) -> Result<StoredTemplates> {
        Ok(self.data.clone())
    }

    fn persist(&mut self, data: &StoredTemplates) -> Result<()> {
        self.data = data.clone();
        Ok(())
    }
}

/// `templates.json` in the data directory.
#[derive(Debug)]
pub struct JsonFileTemplateStore {
    path: PathBuf,
}

impl JsonFileTemplateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TemplateStore for JsonFileTemplateStore {
    fn load(&self) -> Result<StoredTemplates> {
        if !self.path.exists() {
            return Ok(StoredTemplates::default());
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        if contents.trim().is_empty() {
            return Ok(StoredTemplates::default());
        }
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", self.path.display()))
    }

    fn persist(&mut self, data: &StoredTemplates) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create template directory")?;
        }
        let json = serde_json::to_string_pretty(data).context("Failed to serialize templates")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }
}
