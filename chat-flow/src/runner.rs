//! FlowRunner – wraps a [`Router`] with a simulated response latency.
//!
//! Canned assistants answer instantly, which reads oddly in a chat window. The runner waits on a
//! [`Latency`] before dispatching so the delay lives in one injectable place:
//!
//! ```rust,ignore
//! // Production: a fixed "thinking" pause
//! let runner = FlowRunner::new(router, Arc::new(FixedLatency::from_millis(600)));
//!
//! // Tests: answer immediately
//! let runner = FlowRunner::new(router, Arc::new(NoLatency));
//! let routed = runner.run(&input).await;
//! ```
//!
//! The delay has no effect on which route is taken.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::router::{Routed, Router};

/// Source of the artificial delay applied before a reply is produced
#[async_trait]
pub trait Latency: Send + Sync {
    async fn wait(&self);
}

/// Sleeps for a fixed duration on the tokio timer
#[derive(Debug, Clone, Copy)]
pub struct FixedLatency(pub Duration);

impl FixedLatency {
    pub fn from_millis(millis: u64) -> Self {
        Self(Duration::from_millis(millis))
    }
}

#[async_trait]
impl Latency for FixedLatency {
    async fn wait(&self) {
        if !self.0.is_zero() {
            tokio::time::sleep(self.0).await;
        }
    }
}

/// Returns immediately
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLatency;

#[async_trait]
impl Latency for NoLatency {
    async fn wait(&self) {}
}

/// High-level helper that applies the latency and then dispatches exactly once.
pub struct FlowRunner<I, O> {
    router: Arc<Router<I, O>>,
    latency: Arc<dyn Latency>,
}

impl<I, O> Clone for FlowRunner<I, O> {
    fn clone(&self) -> Self {
        Self {
            router: self.router.clone(),
            latency: self.latency.clone(),
        }
    }
}

impl<I, O> FlowRunner<I, O> {
    pub fn new(router: Arc<Router<I, O>>, latency: Arc<dyn Latency>) -> Self {
        Self { router, latency }
    }

    pub fn router(&self) -> &Router<I, O> {
        &self.router
    }

    /// Wait out the latency, then route the input.
    pub async fn run(&self, input: &I) -> Routed<O> {
        self.latency.wait().await;
        self.router.dispatch(input)
    }
}
