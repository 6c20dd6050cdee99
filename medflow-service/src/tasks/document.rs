use chat_flow::Task;
use tracing::info;

use super::fallback::FALLBACK_TEXT;
use crate::models::{AnalysisResult, Reply, RichContent};
use crate::query::AssistantQuery;

pub const NO_FINDINGS_TEXT: &str = "✅ No critical alerts or flags found in this report. The patient appears stable based on the extracted data.";

type DocumentTemplate = fn(&AnalysisResult) -> Reply;

/// Topic keywords in priority order; the document summary answers anything else.
const DOCUMENT_TOPICS: &[(&[&str], DocumentTemplate)] = &[
    (
        &["risk", "alert", "flag", "critical"],
        findings_reply as DocumentTemplate,
    ),
    (
        &["med", "drug", "treat", "plan"],
        treatment_reply as DocumentTemplate,
    ),
    (
        &["diagnosis", "condition", "problem"],
        diagnosis_reply as DocumentTemplate,
    ),
];

/// Answers from the active document analysis result.
pub struct DocumentTask;

impl Task<AssistantQuery, Reply> for DocumentTask {
    fn id(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn run(&self, input: &AssistantQuery) -> Reply {
        let Some(document) = input.document.as_deref() else {
            return Reply::text(FALLBACK_TEXT);
        };

        info!(
            task_id = %self.id(),
            patient = %document.metadata.patient_name,
            "Answering from document analysis"
        );

        DOCUMENT_TOPICS
            .iter()
            .find(|(keywords, _)| input.contains_any(keywords))
            .map(|(_, template)| template(document))
            .unwrap_or_else(|| summary_reply(document))
    }
}

fn findings_reply(document: &AnalysisResult) -> Reply {
    if document.alert_flags.is_empty() && document.increased_markers.is_empty() {
        return Reply::text(NO_FINDINGS_TEXT);
    }

    RichContent::CriticalFindings {
        alert_flags: document.alert_flags.clone(),
        increased_markers: document.increased_markers.clone(),
    }
    .into()
}

fn treatment_reply(document: &AnalysisResult) -> Reply {
    RichContent::TreatmentPlan {
        patient_name: document.metadata.patient_name.clone(),
        medications: document.recommended_meds.clone(),
        follow_up: document.follow_up_plan.clone(),
    }
    .into()
}

fn diagnosis_reply(document: &AnalysisResult) -> Reply {
    RichContent::Diagnosis {
        diagnosis: document.diagnosis.clone(),
        summary: document.summary.clone(),
    }
    .into()
}

fn summary_reply(document: &AnalysisResult) -> Reply {
    RichContent::DocumentSummary {
        patient_name: document.metadata.patient_name.clone(),
        summary: document.summary.clone(),
        age: document.metadata.age.clone(),
        doctor_name: document.metadata.doctor_name.clone(),
    }
    .into()
}
