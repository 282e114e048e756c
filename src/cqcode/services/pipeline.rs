//! Concurrent per-message resolution.

use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::cqcode::domain::{IncomingMessage, ResolvedMessage};

use super::TagResolver;

/// Errors reported when draining a [`MessagePipeline`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PipelineError {
    /// The receiver was dropped before a result could be delivered.
    #[error("resolved-message receiver was dropped")]
    OutputClosed,

    /// A resolution task panicked.
    #[error("resolution task failed: {0}")]
    TaskFailed(String),
}

/// Resolves each submitted message on its own task.
///
/// Results are delivered on the receiver returned by
/// [`MessagePipeline::new`] in completion order, which is not necessarily
/// submission order. The channel is unbounded, so a finished task never waits
/// on the receiver and [`MessagePipeline::drain`] completes whether or not
/// anyone reads concurrently. Dropping the pipeline, or calling
/// [`MessagePipeline::shutdown`], aborts in-flight work and discards its
/// partial output.
pub struct MessagePipeline<C>
where
    C: Clock + Send + Sync + 'static,
{
    resolver: TagResolver,
    clock: Arc<C>,
    output: mpsc::UnboundedSender<ResolvedMessage>,
    tasks: JoinSet<Result<(), PipelineError>>,
}

impl<C> MessagePipeline<C>
where
    C: Clock + Send + Sync + 'static,
{
    /// Creates a pipeline and the receiver its results arrive on.
    #[must_use]
    pub fn new(
        resolver: TagResolver,
        clock: Arc<C>,
    ) -> (Self, mpsc::UnboundedReceiver<ResolvedMessage>) {
        let (output, receiver) = mpsc::unbounded_channel();
        let pipeline = Self {
            resolver,
            clock,
            output,
            tasks: JoinSet::new(),
        };
        (pipeline, receiver)
    }

    /// Starts resolving `message` on a new task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn submit(&mut self, message: IncomingMessage) {
        let resolver = self.resolver.clone();
        let clock = Arc::clone(&self.clock);
        let output = self.output.clone();
        self.tasks.spawn(async move {
            let resolved = resolver.resolve_message(&message, clock.as_ref()).await;
            output
                .send(resolved)
                .map_err(|_| PipelineError::OutputClosed)
        });
    }

    /// Number of submitted messages not yet finished.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Waits for every submitted message and returns how many were
    /// delivered.
    ///
    /// Delivered results stay queued on the receiver, which yields `None`
    /// once they are consumed.
    ///
    /// # Errors
    ///
    /// Returns the first [`PipelineError`] encountered once all tasks have
    /// finished.
    pub async fn drain(mut self) -> Result<usize, PipelineError> {
        let mut delivered = 0;
        let mut first_error = None;
        while let Some(joined) = self.tasks.join_next().await {
            let outcome = joined
                .map_err(|error| PipelineError::TaskFailed(error.to_string()))
                .and_then(|delivery| delivery);
            match outcome {
                Ok(()) => delivered += 1,
                Err(error) => {
                    tracing::warn!(%error, "message resolution was not delivered");
                    if first_error.is_none() {
                        first_error = Some(error);
                    }
                }
            }
        }
        first_error.map_or(Ok(delivered), Err)
    }

    /// Aborts all in-flight resolutions and waits for them to stop.
    pub async fn shutdown(mut self) {
        self.tasks.shutdown().await;
    }
}
