use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};

#[derive(Error, Debug, PartialEq)]
pub enum BillingError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Invalid amount '{0}': expected a non-negative number")]
    InvalidAmount(String),

    #[error("Amount '{0}' exceeds the {max} limit", max = max_invoice_amount())]
    AmountTooLarge(String),

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
}

pub type Result<T> = std::result::Result<T, BillingError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceStatus {
    Paid,
    Pending,
    Overdue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRecord {
    pub id: String,
    pub patient_name: String,
    pub service: String,
    /// Display date, e.g. "Oct 24, 2024"
    pub date: String,
    /// Always carries two decimal places
    pub amount: Decimal,
    pub status: InvoiceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Raw form input for a new invoice
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDraft {
    #[serde(default)]
    pub patient_name: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub amount: String,
    /// YYYY-MM-DD; today when absent
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusTotal {
    pub count: usize,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary {
    pub paid: StatusTotal,
    pub pending: StatusTotal,
    pub overdue: StatusTotal,
}

/// Largest amount a single invoice may carry
pub fn max_invoice_amount() -> Decimal {
    Decimal::new(100_000_000_000_000, 2)
}

pub fn format_invoice_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Parse a form amount into a non-negative two-place decimal.
pub fn parse_amount(raw: &str) -> Result<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(BillingError::MissingField("amount"));
    }

    let amount =
        Decimal::from_str(trimmed).map_err(|_| BillingError::InvalidAmount(raw.to_string()))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(BillingError::InvalidAmount(raw.to_string()));
    }

    let mut amount = amount.round_dp(2);
    if amount > max_invoice_amount() {
        return Err(BillingError::AmountTooLarge(raw.to_string()));
    }

    amount.rescale(2);
    if amount.scale() != 2 {
        return Err(BillingError::InvalidAmount(raw.to_string()));
    }
    amount.set_sign_positive(true);
    Ok(amount)
}

fn parse_date(raw: Option<&str>) -> Result<NaiveDate> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map_err(|_| BillingError::InvalidDate(value.to_string())),
        None => Ok(Utc::now().date_naive()),
    }
}

fn required(value: &str, field: &'static str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(BillingError::MissingField(field));
    }
    Ok(value.to_string())
}

struct LedgerState {
    invoices: Vec<InvoiceRecord>,
    next_sequence: u32,
}

/// In-memory invoice list, newest first.
pub struct InvoiceLedger {
    state: RwLock<LedgerState>,
}

impl InvoiceLedger {
    pub fn new() -> Self {
        Self::with_invoices(Vec::new())
    }

    /// Start from existing records, given newest first.
    pub fn with_invoices(invoices: Vec<InvoiceRecord>) -> Self {
        let next_sequence = invoices
            .iter()
            .filter_map(|invoice| sequence_of(&invoice.id))
            .max()
            .unwrap_or(0)
            + 1;

        Self {
            state: RwLock::new(LedgerState {
                invoices,
                next_sequence,
            }),
        }
    }

    /// Validate `draft`, then prepend it as a pending invoice.
    pub async fn create(&self, draft: InvoiceDraft) -> Result<InvoiceRecord> {
        let (patient_name, service, amount, date) = validate(&draft)
            .inspect_err(|e| warn!(error = %e, "Rejected invoice draft"))?;

        let mut state = self.state.write().await;
        let invoice = InvoiceRecord {
            id: format!("#INV-{}-{:03}", date.year(), state.next_sequence),
            patient_name,
            service,
            date: format_invoice_date(date),
            amount,
            status: InvoiceStatus::Pending,
            notes: draft
                .notes
                .map(|notes| notes.trim().to_string())
                .filter(|notes| !notes.is_empty()),
        };
        state.next_sequence += 1;
        state.invoices.insert(0, invoice.clone());

        info!(
            invoice_id = %invoice.id,
            amount = %invoice.amount,
            "Invoice created"
        );
        Ok(invoice)
    }

    pub async fn list(&self) -> Vec<InvoiceRecord> {
        self.state.read().await.invoices.clone()
    }

    /// Case-insensitive match on invoice id or patient name; a blank filter returns everything.
    pub async fn search(&self, filter: &str) -> Vec<InvoiceRecord> {
        let needle = filter.trim().to_lowercase();
        let state = self.state.read().await;
        if needle.is_empty() {
            return state.invoices.clone();
        }

        state
            .invoices
            .iter()
            .filter(|invoice| {
                invoice.id.to_lowercase().contains(&needle)
                    || invoice.patient_name.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    pub async fn summary(&self) -> LedgerSummary {
        let state = self.state.read().await;
        let mut summary = LedgerSummary::default();
        for invoice in &state.invoices {
            let total = match invoice.status {
                InvoiceStatus::Paid => &mut summary.paid,
                InvoiceStatus::Pending => &mut summary.pending,
                InvoiceStatus::Overdue => &mut summary.overdue,
            };
            total.count += 1;
            total.amount = total
                .amount
                .checked_add(invoice.amount)
                .unwrap_or_else(|| {
                    warn!(invoice_id = %invoice.id, "Status total overflowed, saturating");
                    Decimal::MAX
                });
        }
        summary
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.invoices.len()
    }
}

impl Default for InvoiceLedger {
    fn default() -> Self {
        Self::new()
    }
}

fn validate(draft: &InvoiceDraft) -> Result<(String, String, Decimal, NaiveDate)> {
    let patient_name = required(&draft.patient_name, "patient name")?;
    let service = required(&draft.service, "service")?;
    let amount = parse_amount(&draft.amount)?;
    let date = parse_date(draft.date.as_deref())?;
    Ok((patient_name, service, amount, date))
}

/// Trailing sequence number of an id like "#INV-2024-004"
fn sequence_of(id: &str) -> Option<u32> {
    id.rsplit('-').next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample_data;

    fn draft(name: &str, service: &str, amount: &str) -> InvoiceDraft {
        InvoiceDraft {
            patient_name: name.to_string(),
            service: service.to_string(),
            amount: amount.to_string(),
            date: Some("2024-10-25".to_string()),
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_create_formats_amount_and_sets_pending() {
        let ledger = InvoiceLedger::new();
        let invoice = ledger
            .create(draft("Robert Fox", "ECG", "450"))
            .await
            .unwrap();

        assert_eq!(invoice.amount.to_string(), "450.00");
        assert_eq!(invoice.status, InvoiceStatus::Pending);
        assert_eq!(invoice.date, "Oct 25, 2024");
        assert_eq!(invoice.id, "#INV-2024-001");
    }

    #[tokio::test]
    async fn test_create_prepends_and_continues_sequence() {
        let ledger = InvoiceLedger::with_invoices(sample_data::invoices());
        let invoice = ledger
            .create(draft("Meera Iyer", "CBC Panel", "85.5"))
            .await
            .unwrap();

        assert_eq!(invoice.id, "#INV-2024-005");
        assert_eq!(invoice.amount.to_string(), "85.50");

        let invoices = ledger.list().await;
        assert_eq!(invoices.len(), 5);
        assert_eq!(invoices[0].id, "#INV-2024-005");
        assert_eq!(invoices[1].id, "#INV-2024-001");
    }

    #[tokio::test]
    async fn test_validation_errors() {
        let ledger = InvoiceLedger::new();

        assert_eq!(
            ledger.create(draft("  ", "ECG", "10")).await,
            Err(BillingError::MissingField("patient name"))
        );
        assert_eq!(
            ledger.create(draft("Robert Fox", "", "10")).await,
            Err(BillingError::MissingField("service"))
        );
        assert_eq!(
            ledger.create(draft("Robert Fox", "ECG", "")).await,
            Err(BillingError::MissingField("amount"))
        );
        assert_eq!(
            ledger.create(draft("Robert Fox", "ECG", "abc")).await,
            Err(BillingError::InvalidAmount("abc".to_string()))
        );
        assert_eq!(
            ledger.create(draft("Robert Fox", "ECG", "-5")).await,
            Err(BillingError::InvalidAmount("-5".to_string()))
        );

        let mut bad_date = draft("Robert Fox", "ECG", "10");
        bad_date.date = Some("25/10/2024".to_string());
        assert_eq!(
            ledger.create(bad_date).await,
            Err(BillingError::InvalidDate("25/10/2024".to_string()))
        );

        assert_eq!(ledger.len().await, 0);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("0").unwrap().to_string(), "0.00");
        assert_eq!(parse_amount("-0").unwrap().to_string(), "0.00");
        assert_eq!(parse_amount(" 1200 ").unwrap().to_string(), "1200.00");
        assert_eq!(parse_amount("19.999").unwrap().to_string(), "20.00");
        assert!(parse_amount("1,200").is_err());
    }

    #[test]
    fn test_parse_amount_ceiling() {
        assert_eq!(
            parse_amount("1000000000000").unwrap().to_string(),
            "1000000000000.00"
        );
        assert_eq!(
            parse_amount("1000000000000.01"),
            Err(BillingError::AmountTooLarge("1000000000000.01".to_string()))
        );
        assert_eq!(
            parse_amount("79228162514264337593543950335"),
            Err(BillingError::AmountTooLarge(
                "79228162514264337593543950335".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_huge_amounts_never_reach_ledger() {
        let ledger = InvoiceLedger::new();
        for _ in 0..2 {
            let result = ledger
                .create(draft("Robert Fox", "ECG", "50000000000000000000000000000"))
                .await;
            assert!(matches!(result, Err(BillingError::AmountTooLarge(_))));
        }

        assert_eq!(ledger.len().await, 0);
        assert_eq!(ledger.summary().await, LedgerSummary::default());
    }

    #[tokio::test]
    async fn test_summary_saturates_instead_of_overflowing() {
        let huge = |id: &str| InvoiceRecord {
            id: id.to_string(),
            patient_name: "Robert Fox".to_string(),
            service: "ECG".to_string(),
            date: "Oct 25, 2024".to_string(),
            amount: Decimal::MAX,
            status: InvoiceStatus::Pending,
            notes: None,
        };
        let ledger = InvoiceLedger::with_invoices(vec![huge("#INV-2024-002"), huge("#INV-2024-001")]);

        let summary = ledger.summary().await;
        assert_eq!(summary.pending.count, 2);
        assert_eq!(summary.pending.amount, Decimal::MAX);
    }

    #[tokio::test]
    async fn test_missing_date_defaults_to_today() {
        let ledger = InvoiceLedger::new();
        let mut undated = draft("Robert Fox", "ECG", "10");
        undated.date = None;
        undated.notes = Some("  follow-up visit ".to_string());

        let invoice = ledger.create(undated).await.unwrap();
        assert_eq!(invoice.date, format_invoice_date(Utc::now().date_naive()));
        assert_eq!(invoice.notes.as_deref(), Some("follow-up visit"));
    }

    #[tokio::test]
    async fn test_search_by_id_or_patient() {
        let ledger = InvoiceLedger::with_invoices(sample_data::invoices());

        let by_name = ledger.search("anjali").await;
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].service, "MRI Scan (Brain)");

        let by_id = ledger.search("inv-2024-00").await;
        assert_eq!(by_id.len(), 4);

        assert_eq!(ledger.search("  ").await.len(), 4);
        assert!(ledger.search("nobody").await.is_empty());
    }

    #[tokio::test]
    async fn test_summary_totals() {
        let ledger = InvoiceLedger::with_invoices(sample_data::invoices());
        let summary = ledger.summary().await;

        assert_eq!(summary.paid.count, 2);
        assert_eq!(summary.paid.amount, Decimal::new(57000, 2));
        assert_eq!(summary.pending.count, 1);
        assert_eq!(summary.pending.amount, Decimal::new(120000, 2));
        assert_eq!(summary.overdue.count, 1);
        assert_eq!(summary.overdue.amount, Decimal::new(21000, 2));
    }

    #[test]
    fn test_seed_invoices_serialize_two_places() {
        let value = serde_json::to_value(&sample_data::invoices()[1]).unwrap();
        assert_eq!(value["amount"], "1200.00");
        assert_eq!(value["status"], "Pending");
        assert_eq!(value["patientName"], "Anjali Sharma");
        assert!(value.get("notes").is_none());
    }
}
