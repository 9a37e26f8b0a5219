//! The application context: one registry, one engine and the two editable
//! artifacts with their histories.

mod artifact;

pub use artifact::Artifact;

use crate::error::{ReportError, SessionError};
use crate::form::{FormState, serialize};
use crate::history::ArtifactKind;
use crate::prompt::{PromptComposer, PromptKind};
use crate::providers::RequestEngine;
use crate::templates::{Template, TemplateEvent, TemplateRegistry};
use std::sync::{Mutex, MutexGuard, PoisonError};

impl From<ArtifactKind> for PromptKind {
    fn from(kind: ArtifactKind) -> Self {
        match kind {
            ArtifactKind::Report => Self::Report,
            ArtifactKind::Strategies => Self::Strategies,
        }
    }
}

/// Owns all mutable report-writing state.
///
/// Each artifact sits behind its own async mutex. Requests take it with
/// `try_lock`, so a second request for an artifact that is already waiting
/// on the upstream fails with [`SessionError::EditInProgress`] instead of
/// interleaving. The two artifacts never lock each other.
pub struct ReportSession {
    registry: Mutex<TemplateRegistry>,
    composer: PromptComposer,
    engine: RequestEngine,
    report: tokio::sync::Mutex<Artifact>,
    strategies: tokio::sync::Mutex<Artifact>,
    chat_target: Mutex<Option<ArtifactKind>>,
}

impl ReportSession {
    pub fn new(mut registry: TemplateRegistry, engine: RequestEngine) -> Result<Self, ReportError> {
        registry.subscribe(Box::new(|event: &TemplateEvent| match event {
            TemplateEvent::ActiveChanged(template) => {
                tracing::info!(template_id = template.id.as_str(), "Active template changed");
            }
            TemplateEvent::TemplatesUpdated => tracing::debug!("Template list updated"),
        }));

        Ok(Self {
            registry: Mutex::new(registry),
            composer: PromptComposer::new()?,
            engine,
            report: tokio::sync::Mutex::new(Artifact::default()),
            strategies: tokio::sync::Mutex::new(Artifact::default()),
            chat_target: Mutex::new(None),
        })
    }

    /// Lock the template registry.
    pub fn registry(&self) -> MutexGuard<'_, TemplateRegistry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn engine(&self) -> &RequestEngine {
        &self.engine
    }

    pub fn active_template(&self) -> Template {
        self.registry().get_active()
    }

    fn slot(&self, kind: ArtifactKind) -> &tokio::sync::Mutex<Artifact> {
        match kind {
            ArtifactKind::Report => &self.report,
            ArtifactKind::Strategies => &self.strategies,
        }
    }

    fn claim(
        &self,
        kind: ArtifactKind,
    ) -> Result<tokio::sync::MutexGuard<'_, Artifact>, SessionError> {
        self.slot(kind)
            .try_lock()
            .map_err(|_| SessionError::EditInProgress(kind.label()))
    }

    fn target_guard(&self) -> MutexGuard<'_, Option<ArtifactKind>> {
        self.chat_target
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn chat_target(&self) -> Option<ArtifactKind> {
        *self.target_guard()
    }

    pub fn set_chat_target(&self, kind: ArtifactKind) {
        *self.target_guard() = Some(kind);
    }

    /// Generate a fresh report or strategy list from `form`.
    ///
    /// Either way the artifact gets a new baseline: the completion on
    /// success, an `"Error: ..."` placeholder on failure. Only a success
    /// moves the chat target.
    pub async fn generate(&self, kind: ArtifactKind, form: &FormState) -> Result<String, ReportError> {
        if !form.has_student_name() {
            return Err(SessionError::MissingStudentName.into());
        }
        let mut artifact = self.claim(kind)?;

        let template = self.active_template();
        let snapshot = serialize(&template, form);
        let prompt =
            self.composer
                .compose(kind.into(), &template, &form.settings, &snapshot)?;

        tracing::info!(
            artifact = kind.label(),
            template_id = template.id.as_str(),
            "Generating"
        );
        let result = self.engine.complete(&prompt).await;
        artifact.history.reset();
        match result {
            Ok(text) => {
                artifact.text.clone_from(&text);
                self.set_chat_target(kind);
                Ok(text)
            }
            Err(e) => {
                tracing::warn!(artifact = kind.label(), "Generation failed: {e}");
                artifact.text = format!("Error: {e}");
                Err(e.into())
            }
        }
    }

    /// Apply a chat instruction to the current chat target.
    ///
    /// The pre-edit text is checkpointed before the request goes out and the
    /// checkpoint stays even if the request fails; the buffer only changes
    /// on success.
    pub async fn chat_edit(&self, instruction: &str) -> Result<String, ReportError> {
        let instruction = instruction.trim();
        if instruction.is_empty() {
            return Err(SessionError::EmptyInstruction.into());
        }
        let kind = self.chat_target().ok_or(SessionError::NoChatTarget)?;
        let mut artifact = self.claim(kind)?;

        let prompt = self.composer.compose_edit(&artifact.text, instruction)?;
        let pre_edit = artifact.text.clone();
        artifact.history.checkpoint(pre_edit);

        self.engine.send(&prompt, &mut artifact.text).await?;
        Ok(artifact.text.clone())
    }

    /// Step `kind` back one edit. `Ok(None)` when there is nothing to undo.
    pub fn undo(&self, kind: ArtifactKind) -> Result<Option<String>, SessionError> {
        let mut artifact = self.claim(kind)?;
        Ok(artifact.undo())
    }

    pub fn redo(&self, kind: ArtifactKind) -> Result<Option<String>, SessionError> {
        let mut artifact = self.claim(kind)?;
        Ok(artifact.redo())
    }

    /// False while a request for `kind` is in flight.
    pub fn can_undo(&self, kind: ArtifactKind) -> bool {
        self.slot(kind)
            .try_lock()
            .is_ok_and(|artifact| artifact.history.can_undo())
    }

    pub fn can_redo(&self, kind: ArtifactKind) -> bool {
        self.slot(kind)
            .try_lock()
            .is_ok_and(|artifact| artifact.history.can_redo())
    }

    /// Current buffer of `kind`, waiting for any in-flight request.
    pub async fn text(&self, kind: ArtifactKind) -> String {
        self.slot(kind).lock().await.text.clone()
    }

    /// Clear the student part of `form`, both artifacts and the chat target.
    /// Report settings are kept.
    pub fn clear_form(&self, form: &mut FormState) -> Result<(), SessionError> {
        let mut report = self.claim(ArtifactKind::Report)?;
        let mut strategies = self.claim(ArtifactKind::Strategies)?;
        report.clear();
        strategies.clear();
        *self.target_guard() = None;
        form.clear_student();
        Ok(())
    }
}
