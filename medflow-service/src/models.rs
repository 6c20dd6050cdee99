use serde::{Deserialize, Serialize};
use std::fmt;

/// Triage level. Labels outside the known three are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Routine,
    Urgent,
    Emergency,
    #[serde(untagged)]
    Other(String),
}

impl Severity {
    pub fn as_str(&self) -> &str {
        match self {
            Severity::Routine => "routine",
            Severity::Urgent => "urgent",
            Severity::Emergency => "emergency",
            Severity::Other(label) => label,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A roster entry summarizing triage severity, department and AI summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    pub name: String,
    pub severity: Severity,
    pub suggested_department: String,
    pub ai_summary: String,
}

impl PatientRecord {
    /// First whitespace-separated word of the name
    pub fn first_name(&self) -> &str {
        first_word(&self.name)
    }
}

pub(crate) fn first_word(name: &str) -> &str {
    name.split(' ').next().unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetadata {
    pub patient_name: String,
    pub age: String,
    pub doctor_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    pub name: String,
    pub dosage: String,
}

/// Structured extraction produced from one uploaded medical report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub metadata: AnalysisMetadata,
    pub summary: String,
    pub diagnosis: String,
    #[serde(default)]
    pub alert_flags: Vec<String>,
    #[serde(default)]
    pub increased_markers: Vec<String>,
    #[serde(default)]
    pub recommended_meds: Vec<Medication>,
    pub follow_up_plan: String,
}

/// Content of a bot turn: plain text, or a structured block for the client to lay out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "body", rename_all = "snake_case")]
pub enum Reply {
    Text(String),
    Rich(RichContent),
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Reply::Text(text.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Reply::Text(text) => Some(text),
            Reply::Rich(_) => None,
        }
    }

    pub fn as_rich(&self) -> Option<&RichContent> {
        match self {
            Reply::Text(_) => None,
            Reply::Rich(rich) => Some(rich),
        }
    }
}

impl From<String> for Reply {
    fn from(text: String) -> Self {
        Reply::Text(text)
    }
}

impl From<&str> for Reply {
    fn from(text: &str) -> Self {
        Reply::Text(text.to_string())
    }
}

impl From<RichContent> for Reply {
    fn from(rich: RichContent) -> Self {
        Reply::Rich(rich)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RichContent {
    /// Default roster answer: summary text plus severity and department badges
    PatientSummary {
        patient_name: String,
        severity: Severity,
        department: String,
        summary: String,
    },
    MedicationList {
        patient_name: String,
        medications: Vec<String>,
    },
    CareRoutine {
        severity: Severity,
        steps: Vec<String>,
    },
    CriticalFindings {
        alert_flags: Vec<String>,
        increased_markers: Vec<String>,
    },
    TreatmentPlan {
        patient_name: String,
        medications: Vec<Medication>,
        follow_up: String,
    },
    Diagnosis {
        diagnosis: String,
        summary: String,
    },
    DocumentSummary {
        patient_name: String,
        summary: String,
        age: String,
        doctor_name: String,
    },
    /// Posted when a new analysis result becomes the session's document context
    DocumentProcessed {
        patient_name: String,
        suggestions: Vec<QuickReply>,
    },
}

/// A suggested prompt the client can offer as a one-tap reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickReply {
    pub label: String,
    pub prompt: String,
}

impl QuickReply {
    pub fn new(label: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            prompt: prompt.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InvoiceSearchParams {
    pub q: Option<String>,
}
