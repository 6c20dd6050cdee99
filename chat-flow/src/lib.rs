pub mod error;
pub mod message;
pub mod router;
pub mod runner;
pub mod storage;
pub mod task;

// Re-export commonly used types
pub use error::{FlowError, Result};
pub use message::{ChatMessage, MessageLog, Sender};
pub use router::{Route, RouteCondition, Routed, Router, RouterBuilder};
pub use runner::{FixedLatency, FlowRunner, Latency, NoLatency};
pub use storage::{InMemorySessionStorage, SessionStorage};
pub use task::{FnTask, Task};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct ShoutTask;

    impl Task<String, String> for ShoutTask {
        fn id(&self) -> &str {
            "shout"
        }

        fn run(&self, input: &String) -> String {
            input.to_uppercase()
        }
    }

    #[tokio::test]
    async fn test_runner_feeds_message_log() {
        let router = RouterBuilder::<String, String>::new("test_router")
            .add_conditional_route(Arc::new(ShoutTask), |input: &String| input.ends_with('!'))
            .add_route(Arc::new(FnTask::new("quiet", |input: &String| input.clone())))
            .build()
            .unwrap();
        let runner = FlowRunner::new(Arc::new(router), Arc::new(NoLatency));

        let mut log: MessageLog<String> = MessageLog::new();
        for text in ["hello!", "hello"] {
            log.append_user(text);
            let routed = runner.run(&text.to_string()).await;
            log.append_bot(routed.output);
        }

        let contents: Vec<&str> = log.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["hello!", "HELLO!", "hello", "hello"]);
    }

    #[tokio::test]
    async fn test_storage_holds_logs() {
        let storage: InMemorySessionStorage<MessageLog<String>> = InMemorySessionStorage::new();

        let mut log = MessageLog::new();
        log.append_bot("welcome");
        storage.save("session1".to_string(), log).await.unwrap();

        let retrieved = storage.get("session1").await.unwrap().unwrap();
        assert_eq!(retrieved.len(), 1);
        assert_eq!(retrieved.messages()[0].sender, Sender::Bot);
    }
}
