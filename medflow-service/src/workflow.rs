use crate::models::{AnalysisResult, PatientRecord, Reply};
use crate::query::AssistantQuery;
use crate::tasks::*;
use chat_flow::{FlowRunner, Latency, Result, Router, RouterBuilder};
use std::sync::{Arc, LazyLock};
use tracing::debug;

/// Routes in priority order: a named patient, then the active document, then a greeting,
/// then the fallback.
pub fn build_assistant_router() -> Result<Router<AssistantQuery, Reply>> {
    let patient_record_task = Arc::new(PatientRecordTask);
    let document_task = Arc::new(DocumentTask);
    let greeting_task = Arc::new(GreetingTask);
    let fallback_task = Arc::new(FallbackTask);

    RouterBuilder::<AssistantQuery, Reply>::new("assistant_router")
        .add_conditional_route(patient_record_task, |query: &AssistantQuery| {
            query.patient_override().is_some()
        })
        .add_conditional_route(document_task, |query: &AssistantQuery| {
            query.concerns_document()
        })
        .add_conditional_route(greeting_task, |query: &AssistantQuery| {
            query.contains_any(GREETING_KEYWORDS)
        })
        .add_route(fallback_task)
        .build()
}

static ASSISTANT_ROUTER: LazyLock<Router<AssistantQuery, Reply>> = LazyLock::new(|| {
    build_assistant_router().expect("assistant router ends in an unconditional route")
});

/// Answer a chat query from the roster and the optional active document.
///
/// Pure: neither input is modified and no state is kept between calls.
pub fn route(query: &str, patients: &[PatientRecord], document: Option<&AnalysisResult>) -> Reply {
    let query = AssistantQuery::new(
        query,
        Arc::new(patients.to_vec()),
        document.cloned().map(Arc::new),
    );
    ASSISTANT_ROUTER.dispatch(&query).output
}

pub fn create_flow_runner(latency: Arc<dyn Latency>) -> Result<FlowRunner<AssistantQuery, Reply>> {
    let router = Arc::new(build_assistant_router()?);
    debug!(router = %router.id, routes = ?router.task_ids(), "Assistant router built");
    Ok(FlowRunner::new(router, latency))
}
