use super::engine::TeraEngine;
use super::system::{CHAT_EDIT_SYSTEM_PROMPT, REPORT_SYSTEM_PROMPT, STRATEGIES_SYSTEM_PROMPT};
use crate::error::PromptError;
use crate::form::{OutputLength, ReportSettings};
use crate::templates::Template;
use serde::Serialize;
use tera::Context;

/// Which request is being composed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Report,
    Strategies,
    ChatEdit,
}

impl PromptKind {
    pub fn system_prompt(self) -> &'static str {
        match self {
            Self::Report => REPORT_SYSTEM_PROMPT,
            Self::Strategies => STRATEGIES_SYSTEM_PROMPT,
            Self::ChatEdit => CHAT_EDIT_SYSTEM_PROMPT,
        }
    }
}

/// A fully assembled request: the system instruction and the single user turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComposedPrompt {
    pub system_prompt: String,
    pub user_content: String,
}

const PREAMBLE_TEMPLATE: &str = "\
Write in {{ language }}. Use a {{ register }} register with a {{ tone }} tone. {{ length_directive }}";

const SYSTEM_TEMPLATE: &str = "\
{{ base }}{% if custom_instruction %}

Template Custom Instruction:
{{ custom_instruction }}{% endif %}";

const EDIT_TEMPLATE: &str = "\
ORIGINAL TEXT:
{{ original }}

EDIT INSTRUCTION:
{{ instruction }}";

const PREAMBLE_NAME: &str = "preamble";
const SYSTEM_NAME: &str = "system";
const EDIT_NAME: &str = "chat_edit";

fn length_directive(kind: PromptKind, length: OutputLength) -> &'static str {
    match (kind, length) {
        (PromptKind::Strategies, _) => "Provide 2-4 short strategies.",
        (_, OutputLength::Short) => "Keep it to one short paragraph.",
        (_, OutputLength::Medium) => "Write two short paragraphs.",
        (_, OutputLength::Long) => "Write three short paragraphs.",
    }
}

fn render_error(e: &anyhow::Error) -> PromptError {
    PromptError::Render(format!("{e:#}"))
}

/// Combines the fixed system prompts with style directives and the student
/// data summary.
pub struct PromptComposer {
    engine: TeraEngine,
}

impl PromptComposer {
    pub fn new() -> Result<Self, PromptError> {
        let mut engine = TeraEngine::new();
        for (name, body) in [
            (PREAMBLE_NAME, PREAMBLE_TEMPLATE),
            (SYSTEM_NAME, SYSTEM_TEMPLATE),
            (EDIT_NAME, EDIT_TEMPLATE),
        ] {
            engine
                .add_template(name, body)
                .map_err(|e| render_error(&e))?;
        }
        Ok(Self { engine })
    }

    /// Compose a report or strategies request. `snapshot` is the serialized
    /// student data summary.
    pub fn compose(
        &self,
        kind: PromptKind,
        template: &Template,
        settings: &ReportSettings,
        snapshot: &str,
    ) -> Result<ComposedPrompt, PromptError> {
        if kind == PromptKind::ChatEdit {
            return Err(PromptError::Render(
                "chat edits are composed with compose_edit".to_string(),
            ));
        }

        let mut system_ctx = Context::new();
        system_ctx.insert("base", kind.system_prompt());
        system_ctx.insert(
            "custom_instruction",
            template.custom_instruction().unwrap_or_default(),
        );
        let system_prompt = self
            .engine
            .render(SYSTEM_NAME, &system_ctx)
            .map_err(|e| render_error(&e))?;

        let mut preamble_ctx = Context::new();
        preamble_ctx.insert("language", &settings.language);
        preamble_ctx.insert("register", &settings.register);
        preamble_ctx.insert("tone", &settings.tone.to_string());
        preamble_ctx.insert(
            "length_directive",
            length_directive(kind, settings.output_length),
        );
        let preamble = self
            .engine
            .render(PREAMBLE_NAME, &preamble_ctx)
            .map_err(|e| render_error(&e))?;

        Ok(ComposedPrompt {
            system_prompt,
            user_content: format!("{preamble}\n\n{snapshot}"),
        })
    }

    /// Compose a chat edit of `original` following `instruction`.
    pub fn compose_edit(
        &self,
        original: &str,
        instruction: &str,
    ) -> Result<ComposedPrompt, PromptError> {
        let mut ctx = Context::new();
        ctx.insert("original", original);
        ctx.insert("instruction", instruction);
        let user_content = self
            .engine
            .render(EDIT_NAME, &ctx)
            .map_err(|e| render_error(&e))?;

        Ok(ComposedPrompt {
            system_prompt: CHAT_EDIT_SYSTEM_PROMPT.to_string(),
            user_content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::Tone;
    use crate::templates::defaults::default_template;

    fn composer() -> PromptComposer {
        PromptComposer::new().unwrap()
    }

    fn settings() -> ReportSettings {
        ReportSettings {
            language: "Spanish".into(),
            register: "Informal".into(),
            tone: Tone::EmpatheticSupportive,
            output_length: OutputLength::Long,
            ..ReportSettings::default()
        }
    }

    #[test]
    fn report_prompt_has_preamble_then_snapshot() {
        let prompt = composer()
            .compose(
                PromptKind::Report,
                &default_template(0),
                &settings(),
                "Student Name: Ana",
            )
            .unwrap();

        assert_eq!(prompt.system_prompt, REPORT_SYSTEM_PROMPT);
        assert_eq!(
            prompt.user_content,
            "Write in Spanish. Use a Informal register with a EmpatheticSupportive tone. \
             Write three short paragraphs.\n\nStudent Name: Ana"
        );
    }

    #[test]
    fn strategies_prompt_uses_strategy_length_directive() {
        let prompt = composer()
            .compose(
                PromptKind::Strategies,
                &default_template(0),
                &settings(),
                "data",
            )
            .unwrap();
        assert_eq!(prompt.system_prompt, STRATEGIES_SYSTEM_PROMPT);
        assert!(prompt.user_content.contains("Provide 2-4 short strategies."));
    }

    #[test]
    fn custom_instruction_is_appended_verbatim() {
        let mut template = default_template(0);
        template.custom_instruction = "Refer to the class as <Group 4B> & friends.".into();
        let prompt = composer()
            .compose(PromptKind::Report, &template, &settings(), "data")
            .unwrap();
        assert_eq!(
            prompt.system_prompt,
            format!(
                "{REPORT_SYSTEM_PROMPT}\n\nTemplate Custom Instruction:\nRefer to the class as <Group 4B> & friends."
            )
        );
    }

    #[test]
    fn chat_edit_wraps_buffer_and_instruction() {
        let prompt = composer()
            .compose_edit("Ana works hard.", "make it warmer")
            .unwrap();
        assert_eq!(prompt.system_prompt, CHAT_EDIT_SYSTEM_PROMPT);
        assert_eq!(
            prompt.user_content,
            "ORIGINAL TEXT:\nAna works hard.\n\nEDIT INSTRUCTION:\nmake it warmer"
        );
    }

    #[test]
    fn compose_rejects_chat_edit_kind() {
        assert!(
            composer()
                .compose(
                    PromptKind::ChatEdit,
                    &default_template(0),
                    &settings(),
                    "data"
                )
                .is_err()
        );
    }
}
