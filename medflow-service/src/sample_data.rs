//! Fictional demo data for the roster, the document panel and the billing ledger.
//!
//! Nothing here refers to real people.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::billing::{InvoiceRecord, InvoiceStatus};
use crate::models::{AnalysisMetadata, AnalysisResult, Medication, PatientRecord, Severity};

fn patient(name: &str, severity: Severity, department: &str, summary: &str) -> PatientRecord {
    PatientRecord {
        name: name.to_string(),
        severity,
        suggested_department: department.to_string(),
        ai_summary: summary.to_string(),
    }
}

pub fn patients() -> Vec<PatientRecord> {
    vec![
        patient(
            "Robert Fox",
            Severity::Emergency,
            "Cardiology",
            "Crushing chest pain radiating to the left arm for 40 minutes, diaphoretic. ECG shows ST elevation in the anterior leads; suspected acute MI.",
        ),
        patient(
            "Anjali Sharma",
            Severity::Urgent,
            "Neurology",
            "Sudden left-sided weakness and slurred speech, onset under 3 hours ago. Needs stroke protocol imaging.",
        ),
        patient(
            "Rajesh Kumar",
            Severity::Routine,
            "Orthopedics",
            "Fall from standing height with right wrist pain and swelling. Neurovascularly intact; X-ray requested.",
        ),
        patient(
            "Priya Patel",
            Severity::Routine,
            "General",
            "Three days of low-grade fever and sore throat. Vitals stable, tolerating fluids.",
        ),
        patient(
            "Arjun Singh",
            Severity::Urgent,
            "Pulmonology",
            "Worsening shortness of breath with known asthma; SpO2 91% on room air after two nebulizer doses.",
        ),
        patient(
            "Meera Iyer",
            Severity::Urgent,
            "General",
            "Fatigue and dizziness for two weeks; lab report uploaded for review.",
        ),
    ]
}

/// An analysis result as the document-processing collaborator would post it
pub fn analysis_result() -> AnalysisResult {
    AnalysisResult {
        metadata: AnalysisMetadata {
            patient_name: "Meera Iyer".to_string(),
            age: "47".to_string(),
            doctor_name: "Dr. Kavita Rao".to_string(),
        },
        summary: "Complete blood count shows microcytic anemia with low ferritin. Renal and liver panels are within normal limits.".to_string(),
        diagnosis: "Iron deficiency anemia".to_string(),
        alert_flags: vec!["Hemoglobin 8.9 g/dL (low)".to_string()],
        increased_markers: vec!["RDW".to_string(), "Platelets".to_string()],
        recommended_meds: vec![
            Medication {
                name: "Ferrous sulfate".to_string(),
                dosage: "325 mg once daily".to_string(),
            },
            Medication {
                name: "Vitamin C".to_string(),
                dosage: "500 mg with iron dose".to_string(),
            },
        ],
        follow_up_plan: "Repeat CBC and ferritin in 4 weeks.".to_string(),
    }
}

fn invoice(
    id: &str,
    patient_name: &str,
    service: &str,
    date: NaiveDate,
    amount: Decimal,
    status: InvoiceStatus,
) -> InvoiceRecord {
    InvoiceRecord {
        id: id.to_string(),
        patient_name: patient_name.to_string(),
        service: service.to_string(),
        date: crate::billing::format_invoice_date(date),
        amount,
        status,
        notes: None,
    }
}

/// Seed ledger, newest first
pub fn invoices() -> Vec<InvoiceRecord> {
    let oct_24 = NaiveDate::from_ymd_opt(2024, 10, 24).unwrap_or_default();
    let oct_23 = NaiveDate::from_ymd_opt(2024, 10, 23).unwrap_or_default();

    vec![
        invoice(
            "#INV-2024-001",
            "Rajesh Kumar",
            "ER Consultation",
            oct_24,
            Decimal::new(45000, 2),
            InvoiceStatus::Paid,
        ),
        invoice(
            "#INV-2024-002",
            "Anjali Sharma",
            "MRI Scan (Brain)",
            oct_24,
            Decimal::new(120000, 2),
            InvoiceStatus::Pending,
        ),
        invoice(
            "#INV-2024-003",
            "Priya Patel",
            "Blood Panel",
            oct_23,
            Decimal::new(12000, 2),
            InvoiceStatus::Paid,
        ),
        invoice(
            "#INV-2024-004",
            "Arjun Singh",
            "X-Ray (Wrist)",
            oct_23,
            Decimal::new(21000, 2),
            InvoiceStatus::Overdue,
        ),
    ]
}
