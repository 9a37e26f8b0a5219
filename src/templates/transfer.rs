//! Single-template JSON export/import for sharing between installs.

use super::registry::TemplateRegistry;
use super::types::Template;
use crate::error::TemplateError;
use serde_json::Value;

impl TemplateRegistry {
    /// Pretty JSON for an unlocked template. Locked (seeded) templates are
    /// never exported.
    pub fn export(&self, id: &str) -> Option<String> {
        let Some(template) = self.get(id) else {
            tracing::error!(template_id = id, "Template not found");
            return None;
        };
        if template.is_locked {
            tracing::warn!(
                template = template.name.as_str(),
                "Export blocked for locked template"
            );
            return None;
        }
        serde_json::to_string_pretty(template)
            .inspect_err(|e| tracing::error!("Failed to serialize template: {e}"))
            .ok()
    }

    /// Parse an exported template, re-key it so it cannot collide with an
    /// existing id, and save it.
    pub fn import(&mut self, json: &str) -> Result<Template, TemplateError> {
        let raw: Value = serde_json::from_str(json)
            .map_err(|e| TemplateError::Import(format!("Failed to parse template file: {e}")))?;

        let has = |key: &str| raw.get(key).is_some_and(|v| !v.is_null());
        if !has("id") || !has("name") || !has("ratingFields") {
            return Err(TemplateError::Import("Invalid template file".to_string()));
        }

        let mut template: Template = serde_json::from_value(raw)
            .map_err(|e| TemplateError::Import(format!("Invalid template file: {e}")))?;

        template.id = self.fresh_id("imported");
        template.is_default = false;
        template.is_locked = false;
        template.created_date = self.now();

        self.try_save(template.clone())?;
        tracing::info!(template = template.name.as_str(), "Template imported");
        Ok(template)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::TemplateError;
    use crate::templates::defaults::DEFAULT_TEMPLATE_ID;
    use crate::templates::store::MemoryTemplateStore;
    use crate::templates::TemplateRegistry;

    fn clock() -> i64 {
        42
    }

    fn registry() -> TemplateRegistry {
        TemplateRegistry::open_with_clock(Box::new(MemoryTemplateStore::new()), clock).unwrap()
    }

    #[test]
    fn locked_templates_are_not_exported() {
        let registry = registry();
        assert!(registry.export(DEFAULT_TEMPLATE_ID).is_none());
        assert!(registry.export("missing").is_none());
    }

    #[test]
    fn export_then_import_rekeys_the_copy() {
        let mut registry = registry();
        let copy = registry.duplicate(DEFAULT_TEMPLATE_ID).unwrap();
        let json = registry.export(&copy.id).unwrap();

        let imported = registry.import(&json).unwrap();

        assert_eq!(imported.id, "imported-42");
        assert_eq!(imported.name, copy.name);
        assert_eq!(imported.rating_fields, copy.rating_fields);
        assert!(!imported.is_locked);
        assert!(registry.get("imported-42").is_some());
    }

    #[test]
    fn importing_a_locked_export_unlocks_it() {
        let mut registry = registry();
        let mut locked = registry.get(DEFAULT_TEMPLATE_ID).cloned().unwrap();
        locked.is_locked = true;
        let json = serde_json::to_string(&locked).unwrap();

        let imported = registry.import(&json).unwrap();
        assert!(!imported.is_locked);
        assert!(!imported.is_default);
        assert!(registry.get(DEFAULT_TEMPLATE_ID).unwrap().is_locked);
    }

    #[test]
    fn import_requires_core_fields() {
        let mut registry = registry();
        let err = registry.import(r#"{"id":"x","name":"No fields"}"#).unwrap_err();
        assert_eq!(err, TemplateError::Import("Invalid template file".into()));
    }

    #[test]
    fn import_rejects_garbage() {
        let mut registry = registry();
        assert!(matches!(
            registry.import("not json"),
            Err(TemplateError::Import(_))
        ));
    }

    #[test]
    fn import_still_validates_schema() {
        let mut registry = registry();
        let json = r#"{"id":"x","name":"No langs","ratingFields":[{"id":"a","label":"A"}]}"#;
        assert!(matches!(
            registry.import(json),
            Err(TemplateError::Invalid(_))
        ));
    }
}
