use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `reportwriter`.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide what to show the teacher; internal code continues to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum ReportError {
    // ── Templates ───────────────────────────────────────────────────────
    #[error("template: {0}")]
    Template(#[from] TemplateError),

    // ── Upstream engine ─────────────────────────────────────────────────
    #[error("engine: {0}")]
    Engine(#[from] EngineError),

    // ── Session ─────────────────────────────────────────────────────────
    #[error("session: {0}")]
    Session(#[from] SessionError),

    // ── Prompt rendering ────────────────────────────────────────────────
    #[error("prompt: {0}")]
    Prompt(#[from] PromptError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Template errors ─────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template {0} not found")]
    NotFound(String),

    #[error("template {0} is locked; duplicate it before editing")]
    Locked(String),

    #[error("invalid template: {}", .0.join("; "))]
    Invalid(Vec<String>),

    #[error("import failed: {0}")]
    Import(String),

    #[error("store: {0}")]
    Store(String),
}

// ─── Engine errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("API rate limit exceeded (429)")]
    RateLimited,

    #[error("API Error {status}: {message}")]
    Status { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("could not decode API response: {0}")]
    Decode(String),

    #[error("No content in API response or content blocked.{detail}")]
    Blocked { detail: String },

    #[error("failed to get a usable response after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        last: Box<EngineError>,
    },
}

impl EngineError {
    /// Transient failures are retried; a blocked completion is final.
    pub fn is_transient(&self) -> bool {
        !matches!(self, Self::Blocked { .. } | Self::RetriesExhausted { .. })
    }
}

// ─── Session errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("a request for the {0} is already in flight")]
    EditInProgress(&'static str),

    #[error("no generated text is selected for editing")]
    NoChatTarget,

    #[error("Student's name is required.")]
    MissingStudentName,

    #[error("edit instruction is empty")]
    EmptyInstruction,
}

// ─── Prompt errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("render failed: {0}")]
    Render(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocked_error_embeds_detail() {
        let err = EngineError::Blocked {
            detail: " (Reason: SAFETY)".into(),
        };
        assert_eq!(
            err.to_string(),
            "No content in API response or content blocked. (Reason: SAFETY)"
        );
        assert!(!err.is_transient());
    }

    #[test]
    fn status_error_formats_like_api_error() {
        let err = EngineError::Status {
            status: 500,
            message: "Unknown error".into(),
        };
        assert_eq!(err.to_string(), "API Error 500: Unknown error");
        assert!(err.is_transient());
    }

    #[test]
    fn invalid_template_joins_reasons() {
        let err = TemplateError::Invalid(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "invalid template: a; b");
    }

    #[test]
    fn subsystem_errors_convert_into_top_level() {
        let err: ReportError = SessionError::NoChatTarget.into();
        assert!(err.to_string().starts_with("session: "));
    }
}
