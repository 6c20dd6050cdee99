pub mod assistant;
pub mod billing;
pub mod config;
pub mod models;
pub mod query;
pub mod sample_data;
pub mod service;
pub mod tasks;
pub mod workflow;

pub use assistant::{Assistant, ChatExchange, SessionSnapshot};
pub use billing::{BillingError, InvoiceDraft, InvoiceLedger, InvoiceRecord, InvoiceStatus};
pub use config::{ConfigError, LogFormat, ServiceConfig};
pub use models::{AnalysisResult, PatientRecord, Reply, RichContent, Severity};
pub use service::{AppState, build_router, create_app};
pub use workflow::route;
