use std::sync::Arc;

use crate::models::{AnalysisResult, PatientRecord, first_word};

/// Words that pull a query into the active document's context
pub const DOCUMENT_KEYWORDS: &[&str] = &[
    "report",
    "document",
    "summary",
    "risk",
    "plan",
    "med",
    "diagnosis",
    "symptom",
    "advice",
    "avoid",
];

/// First names this short are too likely to appear inside unrelated words.
const MIN_FIRST_NAME_CHARS: usize = 3;

/// Input to the assistant router: the lower-cased query plus read-only context.
#[derive(Debug, Clone)]
pub struct AssistantQuery {
    text: String,
    pub patients: Arc<Vec<PatientRecord>>,
    pub document: Option<Arc<AnalysisResult>>,
}

impl AssistantQuery {
    pub fn new(
        raw: &str,
        patients: Arc<Vec<PatientRecord>>,
        document: Option<Arc<AnalysisResult>>,
    ) -> Self {
        Self {
            text: raw.to_lowercase(),
            patients,
            document,
        }
    }

    /// The lower-cased query text
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.text.contains(keyword)
    }

    pub fn contains_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|keyword| self.text.contains(keyword))
    }

    /// First roster patient mentioned by full name, or by a first name of at least
    /// three characters.
    pub fn named_patient(&self) -> Option<&PatientRecord> {
        self.patients.iter().find(|patient| {
            let name = patient.name.to_lowercase();
            if name.is_empty() {
                return false;
            }
            let first = first_word(&name);
            self.text.contains(&name)
                || (first.chars().count() >= MIN_FIRST_NAME_CHARS && self.text.contains(first))
        })
    }

    /// A named patient who is not the subject of the active document.
    ///
    /// Naming someone else takes priority over the loaded document.
    pub fn patient_override(&self) -> Option<&PatientRecord> {
        let patient = self.named_patient()?;
        match &self.document {
            Some(document) => {
                let subject = document.metadata.patient_name.to_lowercase();
                (!subject.contains(&patient.name.to_lowercase())).then_some(patient)
            }
            None => Some(patient),
        }
    }

    /// Whether the query concerns the active document, if there is one
    pub fn concerns_document(&self) -> bool {
        let Some(document) = &self.document else {
            return false;
        };
        if self.contains_any(DOCUMENT_KEYWORDS) {
            return true;
        }
        let subject = document.metadata.patient_name.to_lowercase();
        let first = first_word(&subject);
        !first.is_empty() && self.text.contains(first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample_data;

    fn query(text: &str, document: Option<AnalysisResult>) -> AssistantQuery {
        AssistantQuery::new(
            text,
            Arc::new(sample_data::patients()),
            document.map(Arc::new),
        )
    }

    #[test]
    fn test_query_is_lower_cased() {
        let q = query("How Is ROBERT?", None);
        assert_eq!(q.text(), "how is robert?");
        assert!(q.contains("robert"));
    }

    #[test]
    fn test_named_patient_by_full_and_first_name() {
        let by_full = query("tell me about robert fox", None);
        assert_eq!(by_full.named_patient().unwrap().name, "Robert Fox");

        let by_first = query("how is anjali doing", None);
        assert_eq!(by_first.named_patient().unwrap().name, "Anjali Sharma");

        assert!(query("how is everyone", None).named_patient().is_none());
    }

    #[test]
    fn test_short_first_names_need_full_name() {
        let patients = Arc::new(vec![PatientRecord {
            name: "Al Grant".to_string(),
            severity: crate::models::Severity::Routine,
            suggested_department: "General".to_string(),
            ai_summary: "Mild fever".to_string(),
        }]);

        let short = AssistantQuery::new("any alerts?", patients.clone(), None);
        assert!(short.named_patient().is_none());

        let full = AssistantQuery::new("how is al grant", patients, None);
        assert!(full.named_patient().is_some());
    }

    #[test]
    fn test_three_letter_first_name_matches_alone() {
        let patients = Arc::new(vec![PatientRecord {
            name: "Raj Patel".to_string(),
            severity: crate::models::Severity::Urgent,
            suggested_department: "Cardiology".to_string(),
            ai_summary: "Palpitations".to_string(),
        }]);

        let q = AssistantQuery::new("how is raj", patients, None);
        assert_eq!(q.named_patient().unwrap().name, "Raj Patel");
    }

    #[test]
    fn test_override_skips_document_subject() {
        let document = sample_data::analysis_result();
        let subject = query("how is meera iyer", Some(document.clone()));
        assert!(subject.named_patient().is_some());
        assert!(subject.patient_override().is_none());

        let other = query("how is robert", Some(document));
        assert_eq!(other.patient_override().unwrap().name, "Robert Fox");
    }

    #[test]
    fn test_concerns_document() {
        assert!(!query("summary please", None).concerns_document());

        let document = sample_data::analysis_result();
        assert!(query("summary please", Some(document.clone())).concerns_document());
        assert!(query("what about meera", Some(document.clone())).concerns_document());
        assert!(!query("good morning", Some(document)).concerns_document());
    }
}
