use super::defaults::{DEFAULT_TEMPLATE_ID, default_template, seeded_templates};
use super::store::{StoredTemplates, TemplateStore};
use super::types::{Template, TemplateStats};
use crate::error::TemplateError;
use anyhow::Result;

/// Change notifications fanned out synchronously to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateEvent {
    ActiveChanged(Template),
    TemplatesUpdated,
}

pub trait TemplateObserver: Send {
    fn on_template_event(&self, event: &TemplateEvent);
}

impl<F> TemplateObserver for F
where
    F: Fn(&TemplateEvent) + Send,
{
    fn on_template_event(&self, event: &TemplateEvent) {
        self(event);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

/// Owns the template list and the active-template pointer.
///
/// Every mutation is staged on a copy, persisted, and only then committed,
/// so a failed write leaves the registry exactly as it was.
pub struct TemplateRegistry {
    store: Box<dyn TemplateStore>,
    state: StoredTemplates,
    observers: Vec<(SubscriptionId, Box<dyn TemplateObserver>)>,
    next_subscription: u64,
    clock: fn() -> i64,
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

impl TemplateRegistry {
    /// Load from `store` and seed any missing locked templates.
    pub fn open(store: Box<dyn TemplateStore>) -> Result<Self> {
        Self::open_with_clock(store, now_millis)
    }

    pub fn open_with_clock(store: Box<dyn TemplateStore>, clock: fn() -> i64) -> Result<Self> {
        let state = store.load()?;
        let mut registry = Self {
            store,
            state,
            observers: Vec::new(),
            next_subscription: 0,
            clock,
        };
        registry.initialize()?;
        Ok(registry)
    }

    /// Seed all locked templates into an empty store, or append the ones
    /// missing from a populated store. User templates are left alone.
    pub fn initialize(&mut self) -> Result<()> {
        let now = (self.clock)();
        let mut next = self.state.clone();

        if next.templates.is_empty() {
            next.templates = seeded_templates(now);
            next.active_id = Some(DEFAULT_TEMPLATE_ID.to_string());
            tracing::info!("Templates initialized with pre-made templates");
        } else {
            for seeded in seeded_templates(now) {
                if !next.templates.iter().any(|t| t.id == seeded.id) {
                    tracing::info!(template = seeded.name.as_str(), "Added missing template");
                    next.templates.push(seeded);
                }
            }
        }

        if next != self.state {
            self.store.persist(&next)?;
            self.state = next;
        }
        Ok(())
    }

    pub fn subscribe(&mut self, observer: Box<dyn TemplateObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, observer));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    fn notify(&self, event: &TemplateEvent) {
        for (_, observer) in &self.observers {
            observer.on_template_event(event);
        }
    }

    fn commit(&mut self, next: StoredTemplates) -> Result<(), TemplateError> {
        self.store
            .persist(&next)
            .map_err(|e| TemplateError::Store(format!("{e:#}")))?;
        self.state = next;
        Ok(())
    }

    pub fn list(&self) -> &[Template] {
        &self.state.templates
    }

    pub fn get(&self, id: &str) -> Option<&Template> {
        self.state.templates.iter().find(|t| t.id == id)
    }

    pub fn active_id(&self) -> Option<&str> {
        self.state.active_id.as_deref()
    }

    /// The active template. A missing or dangling pointer is reset to the
    /// locked default as a side effect.
    pub fn get_active(&mut self) -> Template {
        if let Some(template) = self.active_id().and_then(|id| self.get(id)) {
            return template.clone();
        }

        tracing::warn!(
            active_id = self.active_id().unwrap_or(""),
            "Active template not found, reverting to default"
        );

        let mut next = self.state.clone();
        let existing = next
            .templates
            .iter()
            .find(|t| t.id == DEFAULT_TEMPLATE_ID)
            .cloned();
        let fallback = match existing {
            Some(existing) => existing,
            None => {
                let seeded = default_template((self.clock)());
                next.templates.insert(0, seeded.clone());
                seeded
            }
        };
        next.active_id = Some(fallback.id.clone());

        match self.commit(next) {
            Ok(()) => self.notify(&TemplateEvent::ActiveChanged(fallback.clone())),
            Err(e) => tracing::warn!("Could not persist active template reset: {e}"),
        }
        fallback
    }

    pub fn try_set_active(&mut self, id: &str) -> Result<(), TemplateError> {
        let template = self
            .get(id)
            .cloned()
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))?;

        let mut next = self.state.clone();
        next.active_id = Some(template.id.clone());
        self.commit(next)?;

        tracing::info!(template = template.name.as_str(), "Active template set");
        self.notify(&TemplateEvent::ActiveChanged(template));
        Ok(())
    }

    pub fn set_active(&mut self, id: &str) -> bool {
        self.try_set_active(id)
            .inspect_err(|e| tracing::error!("{e}"))
            .is_ok()
    }

    /// Insert a new template or replace an unlocked one with the same id.
    pub fn try_save(&mut self, template: Template) -> Result<(), TemplateError> {
        let errors = template.validation_errors();
        if !errors.is_empty() {
            return Err(TemplateError::Invalid(errors));
        }

        let mut next = self.state.clone();
        match next.templates.iter_mut().find(|t| t.id == template.id) {
            Some(existing) if existing.is_locked => {
                return Err(TemplateError::Locked(template.id));
            }
            Some(existing) => {
                tracing::info!(template = template.name.as_str(), "Template updated");
                *existing = template;
            }
            None => {
                tracing::info!(template = template.name.as_str(), "New template saved");
                next.templates.push(template);
            }
        }

        self.commit(next)?;
        self.notify(&TemplateEvent::TemplatesUpdated);
        Ok(())
    }

    pub fn save(&mut self, template: Template) -> bool {
        self.try_save(template)
            .inspect_err(|e| tracing::error!("{e}"))
            .is_ok()
    }

    /// Copy `id` under a fresh id with the locking flags cleared.
    pub fn try_duplicate(&mut self, id: &str) -> Result<Template, TemplateError> {
        let original = self
            .get(id)
            .cloned()
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))?;

        let copy = Template {
            id: self.fresh_id("template"),
            name: format!("{} (Copy)", original.name),
            is_default: false,
            is_locked: false,
            created_date: (self.clock)(),
            ..original
        };

        self.try_save(copy.clone())?;
        tracing::info!(template = copy.name.as_str(), "Template duplicated");
        Ok(copy)
    }

    pub fn duplicate(&mut self, id: &str) -> Option<Template> {
        self.try_duplicate(id)
            .inspect_err(|e| tracing::error!("{e}"))
            .ok()
    }

    pub fn try_delete(&mut self, id: &str) -> Result<(), TemplateError> {
        let template = self
            .get(id)
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))?;
        if template.is_locked {
            return Err(TemplateError::Locked(id.to_string()));
        }
        let name = template.name.clone();

        let mut next = self.state.clone();
        next.templates.retain(|t| t.id != id);
        let was_active = next.active_id.as_deref() == Some(id);
        if was_active {
            next.active_id = Some(DEFAULT_TEMPLATE_ID.to_string());
        }

        self.commit(next)?;
        tracing::info!(template = name.as_str(), "Template deleted");

        if was_active && let Some(fallback) = self.get(DEFAULT_TEMPLATE_ID).cloned() {
            self.notify(&TemplateEvent::ActiveChanged(fallback));
        }
        self.notify(&TemplateEvent::TemplatesUpdated);
        Ok(())
    }

    pub fn delete(&mut self, id: &str) -> bool {
        self.try_delete(id)
            .inspect_err(|e| tracing::error!("{e}"))
            .is_ok()
    }

    /// Keep only the default template and make it active.
    pub fn reset_to_defaults(&mut self) -> Result<(), TemplateError> {
        let active_moved = self.state.active_id.as_deref() != Some(DEFAULT_TEMPLATE_ID);
        let default = default_template((self.clock)());
        let next = StoredTemplates {
            templates: vec![default.clone()],
            active_id: Some(DEFAULT_TEMPLATE_ID.to_string()),
        };
        self.commit(next)?;
        tracing::info!("Templates reset to defaults");

        if active_moved {
            self.notify(&TemplateEvent::ActiveChanged(default));
        }
        self.notify(&TemplateEvent::TemplatesUpdated);
        Ok(())
    }

    pub fn stats(&mut self) -> TemplateStats {
        let active = self.get_active();
        let templates = self.list();
        TemplateStats {
            total_templates: templates.len(),
            custom_templates: templates.iter().filter(|t| !t.is_default).count(),
            locked_templates: templates.iter().filter(|t| t.is_locked).count(),
            active_template: active.name,
        }
    }

    /// `<prefix>-<millis>`, suffixed until it does not collide.
    pub(crate) fn fresh_id(&self, prefix: &str) -> String {
        let base = format!("{prefix}-{}", (self.clock)());
        if self.get(&base).is_none() {
            return base;
        }
        (1..)
            .map(|n| format!("{base}-{n}"))
            .find(|candidate| self.get(candidate).is_none())
            .unwrap_or(base)
    }

    pub(crate) fn now(&self) -> i64 {
        (self.clock)()
    }
}
