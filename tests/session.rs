use reportwriter::error::{EngineError, ReportError, SessionError};
use reportwriter::form::FormState;
use reportwriter::history::ArtifactKind;
use reportwriter::providers::{
    GenerateRequest, GenerateResponse, GenerateTransport, RequestEngine, RetryPolicy,
};
use reportwriter::session::ReportSession;
use reportwriter::templates::{MemoryTemplateStore, TemplateRegistry};
use reportwriter::usage::{MemoryUsageStore, UsageCounter, UsageTracker};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

type Reply = Result<GenerateResponse, EngineError>;

/// Replies from a script; an exhausted script answers "unused".
#[derive(Default)]
struct Scripted {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<GenerateRequest>>,
    gate: Option<Arc<Notify>>,
}

impl Scripted {
    fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        })
    }

    fn gated(replies: Vec<Reply>, gate: Arc<Notify>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            gate: Some(gate),
            ..Self::default()
        })
    }

    fn last_user_content(&self) -> String {
        let requests = self.requests.lock().unwrap();
        requests
            .last()
            .and_then(|r| r.contents[0].parts[0].text.clone())
            .unwrap_or_default()
    }
}

impl GenerateTransport for Scripted {
    fn generate<'a>(
        &'a self,
        request: &'a GenerateRequest,
    ) -> Pin<Box<dyn Future<Output = Reply> + Send + 'a>> {
        Box::pin(async move {
            self.requests.lock().unwrap().push(request.clone());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(GenerateResponse::with_text("unused")))
        })
    }
}

fn text(s: &str) -> Reply {
    Ok(GenerateResponse::with_text(s))
}

fn session_with(transport: Arc<Scripted>) -> (ReportSession, Arc<UsageTracker>) {
    let usage = Arc::new(UsageTracker::new(UsageCounter::new(Box::new(
        MemoryUsageStore::new(),
    ))));
    let engine = RequestEngine::new(transport)
        .with_policy(RetryPolicy::new(1, 0))
        .with_usage(usage.clone());
    let registry = TemplateRegistry::open(Box::new(MemoryTemplateStore::new())).unwrap();
    (ReportSession::new(registry, engine).unwrap(), usage)
}

fn form() -> FormState {
    let mut form = FormState::default();
    form.student.name = "Ana".into();
    form
}

#[tokio::test]
async fn undo_and_redo_walk_the_edit_chain() {
    let transport = Scripted::new(vec![text("S0"), text("S1"), text("S2"), text("S3")]);
    let (session, usage) = session_with(transport);
    let kind = ArtifactKind::Report;

    session.generate(kind, &form()).await.unwrap();
    for instruction in ["warmer", "shorter", "mention reading"] {
        session.chat_edit(instruction).await.unwrap();
    }
    assert_eq!(session.text(kind).await, "S3");
    assert_eq!(usage.local_count(), 4);

    let mut undone = Vec::new();
    while let Some(t) = session.undo(kind).unwrap() {
        undone.push(t);
    }
    assert_eq!(undone, vec!["S2", "S1", "S0"]);
    assert_eq!(session.undo(kind).unwrap(), None);
    assert_eq!(session.text(kind).await, "S0");

    let mut redone = Vec::new();
    while let Some(t) = session.redo(kind).unwrap() {
        redone.push(t);
    }
    assert_eq!(redone, vec!["S1", "S2", "S3"]);
}

#[tokio::test]
async fn new_edit_after_undo_clears_redo() {
    let transport = Scripted::new(vec![text("S0"), text("S1"), text("S2"), text("S3"), text("S4")]);
    let (session, _) = session_with(transport);
    let kind = ArtifactKind::Report;

    session.generate(kind, &form()).await.unwrap();
    for instruction in ["a", "b", "c"] {
        session.chat_edit(instruction).await.unwrap();
    }
    session.undo(kind).unwrap();
    session.undo(kind).unwrap();
    assert_eq!(session.text(kind).await, "S1");

    session.chat_edit("d").await.unwrap();

    assert_eq!(session.text(kind).await, "S4");
    assert!(!session.can_redo(kind));
    assert_eq!(session.redo(kind).unwrap(), None);
}

#[tokio::test]
async fn histories_are_independent_per_artifact() {
    let transport = Scripted::new(vec![text("R0"), text("R1"), text("T0")]);
    let (session, _) = session_with(transport);

    session.generate(ArtifactKind::Report, &form()).await.unwrap();
    session.chat_edit("edit report").await.unwrap();
    session.generate(ArtifactKind::Strategies, &form()).await.unwrap();

    assert_eq!(session.chat_target(), Some(ArtifactKind::Strategies));
    assert!(session.can_undo(ArtifactKind::Report));
    assert!(!session.can_undo(ArtifactKind::Strategies));
    assert_eq!(session.undo(ArtifactKind::Strategies).unwrap(), None);
    assert_eq!(
        session.undo(ArtifactKind::Report).unwrap().as_deref(),
        Some("R0")
    );
}

#[tokio::test]
async fn chat_edit_sends_buffer_and_instruction() {
    let transport = Scripted::new(vec![text("Ana reads well."), text("Ana reads very well.")]);
    let (session, _) = session_with(transport.clone());

    session.generate(ArtifactKind::Report, &form()).await.unwrap();
    session.chat_edit("  stronger praise ").await.unwrap();

    assert_eq!(
        transport.last_user_content(),
        "ORIGINAL TEXT:\nAna reads well.\n\nEDIT INSTRUCTION:\nstronger praise"
    );
}

#[tokio::test]
async fn failed_generation_writes_error_placeholder() {
    let transport = Scripted::new(vec![
        text("first"),
        text("edited"),
        Err(EngineError::Status {
            status: 500,
            message: "Unknown error".into(),
        }),
    ]);
    let (session, usage) = session_with(transport);
    let kind = ArtifactKind::Report;

    session.generate(kind, &form()).await.unwrap();
    session.chat_edit("tweak").await.unwrap();
    let err = session.generate(kind, &form()).await.unwrap_err();

    assert!(matches!(err, ReportError::Engine(_)));
    let buffer = session.text(kind).await;
    assert!(buffer.starts_with("Error: "), "{buffer}");
    assert!(buffer.contains("API Error 500: Unknown error"));
    assert!(!session.can_undo(kind));
    assert_eq!(usage.local_count(), 2);
}

#[tokio::test]
async fn failed_chat_edit_keeps_buffer_and_checkpoint() {
    let transport = Scripted::new(vec![
        text("draft"),
        Err(EngineError::Transport("offline".into())),
    ]);
    let (session, _) = session_with(transport);
    let kind = ArtifactKind::Report;

    session.generate(kind, &form()).await.unwrap();
    assert!(session.chat_edit("polish").await.is_err());

    assert_eq!(session.text(kind).await, "draft");
    assert!(session.can_undo(kind));
    assert_eq!(session.undo(kind).unwrap().as_deref(), Some("draft"));
}

#[tokio::test]
async fn overlapping_requests_on_one_artifact_are_rejected() {
    let gate = Arc::new(Notify::new());
    let transport = Scripted::gated(vec![text("slow report"), text("strategies")], gate.clone());
    let (session, _) = session_with(transport);
    let session = Arc::new(session);

    let first = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.generate(ArtifactKind::Report, &form()).await })
    };
    // let the first request reach the transport
    while !is_busy(&session) {
        tokio::task::yield_now().await;
    }

    let err = session
        .generate(ArtifactKind::Report, &form())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ReportError::Session(SessionError::EditInProgress("report"))
    ));

    gate.notify_one();
    assert_eq!(first.await.unwrap().unwrap(), "slow report");
}

fn is_busy(session: &ReportSession) -> bool {
    matches!(
        session.undo(ArtifactKind::Report),
        Err(SessionError::EditInProgress(_))
    )
}

#[tokio::test]
async fn clear_form_resets_everything_but_settings() {
    let transport = Scripted::new(vec![text("R0"), text("R1")]);
    let (session, _) = session_with(transport);
    let mut form = form();
    form.settings.language = "French".into();

    session.generate(ArtifactKind::Report, &form).await.unwrap();
    session.chat_edit("shorter").await.unwrap();
    session.clear_form(&mut form).unwrap();

    assert_eq!(session.text(ArtifactKind::Report).await, "");
    assert!(!session.can_undo(ArtifactKind::Report));
    assert_eq!(session.chat_target(), None);
    assert_eq!(form.settings.language, "French");
    assert!(form.student.name.is_empty());
}
