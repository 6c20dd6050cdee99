use axum::{
    Router,
    extract::{Path, Query, State},
    http::{HeaderValue, Request, StatusCode},
    middleware::{Next, from_fn},
    response::Json,
    routing::{get, post},
};
use chat_flow::{ChatMessage, FixedLatency, FlowError, InMemorySessionStorage, Latency};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{Instrument, error, info};
use uuid::Uuid;

use crate::{
    assistant::{Assistant, ChatExchange, SessionHandle, SessionSnapshot},
    billing::{BillingError, InvoiceDraft, InvoiceLedger, InvoiceRecord, LedgerSummary},
    config::ServiceConfig,
    models::{AnalysisResult, InvoiceSearchParams, PatientRecord, Reply, SendMessageRequest},
    sample_data,
};

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<Value>)>;
type ApiError = (StatusCode, Json<Value>);

fn bad_request_error(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn not_found_error(message: &str, id: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": message,
            "session_id": id
        })),
    )
}

fn internal_error(message: &str, details: &str) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": message,
            "details": details
        })),
    )
}

fn flow_error(e: FlowError, session_id: &str) -> ApiError {
    match e {
        FlowError::SessionNotFound(_) => not_found_error("Session not found", session_id),
        FlowError::InvalidInput(message) => bad_request_error(&message),
        other => {
            error!(session_id = %session_id, error = %other, "Chat request failed");
            internal_error("Chat request failed", &other.to_string())
        }
    }
}

fn billing_error(e: BillingError) -> ApiError {
    bad_request_error(&e.to_string())
}

#[derive(Clone)]
pub struct AppState {
    pub assistant: Assistant,
    pub ledger: Arc<InvoiceLedger>,
}

impl AppState {
    /// Demo state: sample roster and seed invoices
    pub fn with_latency(latency: Arc<dyn Latency>) -> Result<Self, FlowError> {
        let sessions = Arc::new(InMemorySessionStorage::<SessionHandle>::new());
        Ok(Self {
            assistant: Assistant::new(sample_data::patients(), sessions, latency)?,
            ledger: Arc::new(InvoiceLedger::with_invoices(sample_data::invoices())),
        })
    }
}

pub fn create_app(config: &ServiceConfig) -> Result<Router, FlowError> {
    let latency = Arc::new(FixedLatency(config.response_delay));
    let app_state = AppState::with_latency(latency)?;
    Ok(build_router(app_state))
}

/// Middleware to add correlation ID to all requests
async fn correlation_id_middleware(
    mut request: Request<axum::body::Body>,
    next: Next,
) -> axum::response::Response {
    let correlation_id = Uuid::new_v4().to_string();

    if let Ok(value) = HeaderValue::from_str(&correlation_id) {
        request.headers_mut().insert("x-correlation-id", value);
    }

    let span = tracing::info_span!("http_request", correlation_id = %correlation_id);
    next.run(request).instrument(span).await
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/patients", get(list_patients))
        .route("/chat/sessions", get(list_sessions).post(create_session))
        .route(
            "/chat/sessions/{session_id}",
            get(get_session).delete(close_session),
        )
        .route("/chat/sessions/{session_id}/messages", post(send_message))
        .route("/chat/sessions/{session_id}/analysis", post(attach_analysis))
        .route("/billing/invoices", get(list_invoices).post(create_invoice))
        .route("/billing/summary", get(billing_summary))
        .layer(from_fn(correlation_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "MedFlow Desk",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Billing ledger and canned chat assistant for the MedFlow demo dashboard",
        "endpoints": {
            "GET /patients": "Demo patient roster",
            "GET /chat/sessions": "Ids of open chat sessions",
            "POST /chat/sessions": "Open a chat session",
            "GET /chat/sessions/{session_id}": "Session status and message log",
            "DELETE /chat/sessions/{session_id}": "Close a chat session",
            "POST /chat/sessions/{session_id}/messages": "Ask the assistant",
            "POST /chat/sessions/{session_id}/analysis": "Attach a document analysis result",
            "GET /billing/invoices": "List invoices, optional ?q= filter",
            "POST /billing/invoices": "Create an invoice",
            "GET /billing/summary": "Totals per invoice status",
            "GET /health": "Health check"
        }
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn list_patients(State(state): State<AppState>) -> Json<Vec<PatientRecord>> {
    Json(state.assistant.patients().to_vec())
}

async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionSnapshot>), ApiError> {
    match state.assistant.create_session().await {
        Ok(snapshot) => Ok((StatusCode::CREATED, Json(snapshot))),
        Err(e) => {
            error!("Failed to create chat session: {}", e);
            Err(internal_error("Failed to create chat session", &e.to_string()))
        }
    }
}

async fn list_sessions(State(state): State<AppState>) -> ApiResult<Value> {
    match state.assistant.session_ids().await {
        Ok(ids) => Ok(Json(json!({ "sessions": ids }))),
        Err(e) => {
            error!("Failed to list chat sessions: {}", e);
            Err(internal_error("Failed to list chat sessions", &e.to_string()))
        }
    }
}

async fn close_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .assistant
        .close_session(&session_id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(|e| flow_error(e, &session_id))
}

async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<SessionSnapshot> {
    info!(session_id = %session_id, "Getting chat session");

    state
        .assistant
        .session(&session_id)
        .await
        .map(Json)
        .map_err(|e| flow_error(e, &session_id))
}

async fn send_message(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<SendMessageRequest>,
) -> ApiResult<ChatExchange> {
    info!(
        session_id = %session_id,
        content_length = %request.content.len(),
        "Processing chat message"
    );

    state
        .assistant
        .send_message(&session_id, &request.content)
        .await
        .map(Json)
        .map_err(|e| flow_error(e, &session_id))
}

async fn attach_analysis(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(result): Json<AnalysisResult>,
) -> ApiResult<ChatMessage<Reply>> {
    info!(
        session_id = %session_id,
        patient = %result.metadata.patient_name,
        "Attaching document analysis"
    );

    state
        .assistant
        .attach_analysis(&session_id, result)
        .await
        .map(Json)
        .map_err(|e| flow_error(e, &session_id))
}

async fn list_invoices(
    State(state): State<AppState>,
    Query(params): Query<InvoiceSearchParams>,
) -> Json<Vec<InvoiceRecord>> {
    match params.q {
        Some(filter) => Json(state.ledger.search(&filter).await),
        None => Json(state.ledger.list().await),
    }
}

async fn create_invoice(
    State(state): State<AppState>,
    Json(draft): Json<InvoiceDraft>,
) -> Result<(StatusCode, Json<InvoiceRecord>), ApiError> {
    state
        .ledger
        .create(draft)
        .await
        .map(|invoice| (StatusCode::CREATED, Json(invoice)))
        .map_err(billing_error)
}

async fn billing_summary(State(state): State<AppState>) -> Json<LedgerSummary> {
    Json(state.ledger.summary().await)
}
