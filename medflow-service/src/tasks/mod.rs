pub mod document;
pub mod fallback;
pub mod patient_record;

pub use document::{DocumentTask, NO_FINDINGS_TEXT};
pub use fallback::{FALLBACK_TEXT, FallbackTask, GREETING_KEYWORDS, GREETING_TEXT, GreetingTask};
pub use patient_record::{PatientRecordTask, mock_medications};
