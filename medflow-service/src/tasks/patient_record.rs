use chat_flow::Task;
use tracing::info;

use super::fallback::FALLBACK_TEXT;
use crate::models::{PatientRecord, Reply, RichContent, Severity};
use crate::query::AssistantQuery;

type PatientTemplate = fn(&PatientRecord) -> Reply;

/// Topic keywords in priority order; the summary card answers anything else.
const PATIENT_TOPICS: &[(&[&str], PatientTemplate)] = &[
    (&["medicine", "medication", "drug"], medication_reply as PatientTemplate),
    (&["routine", "plan", "action"], care_routine_reply as PatientTemplate),
];

/// Answers from the roster entry of a patient named in the query.
pub struct PatientRecordTask;

impl Task<AssistantQuery, Reply> for PatientRecordTask {
    fn id(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn run(&self, input: &AssistantQuery) -> Reply {
        let Some(patient) = input.named_patient() else {
            return Reply::text(FALLBACK_TEXT);
        };

        info!(
            task_id = %self.id(),
            patient = %patient.name,
            "Answering from patient record"
        );

        PATIENT_TOPICS
            .iter()
            .find(|(keywords, _)| input.contains_any(keywords))
            .map(|(_, template)| template(patient))
            .unwrap_or_else(|| summary_reply(patient))
    }
}

/// Demo drug list per department.
pub fn mock_medications(department: &str) -> &'static [&'static str] {
    match department {
        "Cardiology" => &[
            "Aspirin 81mg",
            "Atorvastatin",
            "Metoprolol",
            "Nitroglycerin PRN",
        ],
        "Neurology" => &[
            "TPA (if eligible)",
            "Anti-platelet therapy",
            "Neuro-protective agents",
        ],
        "Orthopedics" => &[
            "Acetaminophen",
            "Ibuprofen",
            "Calcium + Vit D",
            "Bisphosphonates",
        ],
        "General" => &["Paracetamol", "IV Fluids", "Broad-spectrum antibiotics"],
        _ => &["Standard care meds", "Vitamins"],
    }
}

fn medication_reply(patient: &PatientRecord) -> Reply {
    RichContent::MedicationList {
        patient_name: patient.name.clone(),
        medications: mock_medications(&patient.suggested_department)
            .iter()
            .map(|med| med.to_string())
            .collect(),
    }
    .into()
}

fn care_routine_reply(patient: &PatientRecord) -> Reply {
    let interval = match patient.severity {
        Severity::Emergency => "15 mins",
        _ => "4 hours",
    };

    RichContent::CareRoutine {
        severity: patient.severity.clone(),
        steps: vec![
            format!("Monitor vitals every {}.", interval),
            format!("Review {} labs.", patient.suggested_department),
            "Ensure patient is comfortable and hydrated.".to_string(),
        ],
    }
    .into()
}

fn summary_reply(patient: &PatientRecord) -> Reply {
    RichContent::PatientSummary {
        patient_name: patient.name.clone(),
        severity: patient.severity.clone(),
        department: patient.suggested_department.clone(),
        summary: patient.ai_summary.clone(),
    }
    .into()
}
