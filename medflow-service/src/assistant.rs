use chat_flow::{
    ChatMessage, FlowError, FlowRunner, Latency, MessageLog, Result, SessionStorage,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{AnalysisResult, PatientRecord, QuickReply, Reply, RichContent};
use crate::query::AssistantQuery;
use crate::workflow::create_flow_runner;

pub const WELCOME_TEXT: &str =
    "Hello! I'm MedFlow Assistant. I can help with patient records or analyze uploaded documents.";

/// One chat window: its message log and the document currently in scope.
#[derive(Debug)]
pub struct ChatSession {
    pub id: String,
    pub messages: MessageLog<Reply>,
    pub document: Option<Arc<AnalysisResult>>,
}

impl ChatSession {
    pub fn new(id: String) -> Self {
        let mut messages = MessageLog::new();
        messages.append_bot(WELCOME_TEXT);
        Self {
            id,
            messages,
            document: None,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id.clone(),
            document_context: self.document.is_some(),
            document_patient: self
                .document
                .as_ref()
                .map(|document| document.metadata.patient_name.clone()),
            messages: self.messages.messages().to_vec(),
        }
    }
}

/// Sessions are shared handles so appends from concurrent requests serialize on the lock.
pub type SessionHandle = Arc<Mutex<ChatSession>>;

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    /// Whether an analysis result is in scope for this session
    pub document_context: bool,
    pub document_patient: Option<String>,
    pub messages: Vec<ChatMessage<Reply>>,
}

/// A user turn and the bot turn produced for it
#[derive(Debug, Clone, Serialize)]
pub struct ChatExchange {
    pub session_id: String,
    pub route: String,
    pub user: ChatMessage<Reply>,
    pub reply: ChatMessage<Reply>,
}

/// Prompts offered when a processed document is announced
pub fn document_suggestions() -> Vec<QuickReply> {
    vec![
        QuickReply::new("Summary", "Summarize this report"),
        QuickReply::new("Critical Flags", "What are the risks?"),
        QuickReply::new("Plan", "Treatment plan"),
    ]
}

#[derive(Clone)]
pub struct Assistant {
    patients: Arc<Vec<PatientRecord>>,
    sessions: Arc<dyn SessionStorage<SessionHandle>>,
    runner: FlowRunner<AssistantQuery, Reply>,
}

impl Assistant {
    pub fn new(
        patients: Vec<PatientRecord>,
        sessions: Arc<dyn SessionStorage<SessionHandle>>,
        latency: Arc<dyn Latency>,
    ) -> Result<Self> {
        Ok(Self {
            patients: Arc::new(patients),
            sessions,
            runner: create_flow_runner(latency)?,
        })
    }

    pub fn patients(&self) -> &[PatientRecord] {
        &self.patients
    }

    pub async fn create_session(&self) -> Result<SessionSnapshot> {
        let session_id = Uuid::new_v4().to_string();
        let session = ChatSession::new(session_id.clone());
        let snapshot = session.snapshot();

        self.sessions
            .save(session_id.clone(), Arc::new(Mutex::new(session)))
            .await?;
        info!(session_id = %session_id, "Chat session created");

        Ok(snapshot)
    }

    pub async fn session(&self, session_id: &str) -> Result<SessionSnapshot> {
        let handle = self.load(session_id).await?;
        let session = handle.lock().await;
        Ok(session.snapshot())
    }

    pub async fn session_ids(&self) -> Result<Vec<String>> {
        self.sessions.ids().await
    }

    /// Drop a session and its message log.
    pub async fn close_session(&self, session_id: &str) -> Result<()> {
        self.load(session_id).await?;
        self.sessions.delete(session_id).await?;
        info!(session_id = %session_id, "Chat session closed");
        Ok(())
    }

    /// Append the user's text, wait out the response latency, then append the routed reply.
    ///
    /// The reply is computed against the document that was in scope when the text was sent.
    pub async fn send_message(&self, session_id: &str, text: &str) -> Result<ChatExchange> {
        if text.trim().is_empty() {
            return Err(FlowError::InvalidInput(
                "Message content cannot be empty".to_string(),
            ));
        }

        let handle = self.load(session_id).await?;
        let (user, document) = {
            let mut session = handle.lock().await;
            let user = session.messages.append_user(text.to_string()).clone();
            (user, session.document.clone())
        };

        let query = AssistantQuery::new(text, self.patients.clone(), document);
        let routed = self.runner.run(&query).await;

        info!(
            session_id = %session_id,
            route = %routed.task_id,
            "Query routed"
        );

        let reply = {
            let mut session = handle.lock().await;
            session.messages.append_bot(routed.output).clone()
        };

        Ok(ChatExchange {
            session_id: session_id.to_string(),
            route: routed.task_id,
            user,
            reply,
        })
    }

    /// Make `result` the session's document context and announce it in the log.
    pub async fn attach_analysis(
        &self,
        session_id: &str,
        result: AnalysisResult,
    ) -> Result<ChatMessage<Reply>> {
        let handle = self.load(session_id).await?;
        let mut session = handle.lock().await;

        if let Some(previous) = &session.document {
            warn!(
                session_id = %session_id,
                previous = %previous.metadata.patient_name,
                "Replacing active document"
            );
        }

        let notice = RichContent::DocumentProcessed {
            patient_name: result.metadata.patient_name.clone(),
            suggestions: document_suggestions(),
        };
        info!(
            session_id = %session_id,
            patient = %result.metadata.patient_name,
            "Document analysis attached"
        );

        session.document = Some(Arc::new(result));
        Ok(session.messages.append_notice(notice).clone())
    }

    async fn load(&self, session_id: &str) -> Result<SessionHandle> {
        self.sessions
            .get(session_id)
            .await?
            .ok_or_else(|| FlowError::SessionNotFound(session_id.to_string()))
    }
}
