use chat_flow::Task;

use crate::models::Reply;
use crate::query::AssistantQuery;

pub const GREETING_TEXT: &str = "Hello! I can help you summarize patient records. Try asking 'How is Robert?' or upload a document and ask 'What does the report say?'.";

pub const FALLBACK_TEXT: &str = "I couldn't find a specific patient context for that query. Please mention a patient's name or upload a document.";

/// Words that trigger the greeting. Plain substring matches, so "hi" also fires inside
/// longer words.
pub const GREETING_KEYWORDS: &[&str] = &["hello", "hi"];

pub struct GreetingTask;

impl Task<AssistantQuery, Reply> for GreetingTask {
    fn id(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn run(&self, _input: &AssistantQuery) -> Reply {
        Reply::text(GREETING_TEXT)
    }
}

/// Answer when no patient, document or greeting matched
pub struct FallbackTask;

impl Task<AssistantQuery, Reply> for FallbackTask {
    fn id(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn run(&self, _input: &AssistantQuery) -> Reply {
        Reply::text(FALLBACK_TEXT)
    }
}
