//! Sequential research execution against one chat session
//!
//! The upstream keeps conversation state per session, so topics are queried
//! one at a time. Each call is raced against a per-task timer and the run's
//! cancellation token; whichever settles first decides the topic's result.
//! A losing call future is dropped, which aborts the client side of the
//! request only. The server may still finish it and its answer is ignored.
//!
//! Failures never abort the catalog: every topic ends up in the returned
//! [`WeightedResearchSet`], with an error-weighted placeholder when it did
//! not answer.

use std::sync::Arc;
use std::time::Duration;

use agent_chat_sdk::{ChatClient, ChatError, Session};
use sow_workflow_sdk::{NullSink, ProgressEvent, ProgressSink};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::research::catalog::ResearchCatalog;
use crate::research::types::{ResearchResult, ResearchTask, Topic, WeightedResearchSet};

/// Characters of an answer shown in `TopicCompleted` events
pub const PREVIEW_CHARS: usize = 150;

const FAILURE_PREFIX: &str = "Research incomplete due to: ";

/// Delays and timeouts applied around each research call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResearchTiming {
    /// Wait before each call
    pub stagger: Duration,
    /// Per-call race timer
    pub task_timeout: Duration,
    /// Wait after the session reset that follows each call
    pub settle: Duration,
}

impl Default for ResearchTiming {
    fn default() -> Self {
        Self {
            stagger: Duration::from_millis(2000),
            task_timeout: Duration::from_millis(45000),
            settle: Duration::from_millis(1500),
        }
    }
}

/// Why a topic produced no answer
#[derive(Debug, Error)]
pub enum ResearchFailure {
    #[error("{0} search timed out")]
    TimedOut(Topic),

    #[error("{0}")]
    Chat(#[from] ChatError),

    #[error("research cancelled")]
    Cancelled,
}

impl ResearchFailure {
    /// Placeholder entry recorded for this failure
    pub fn to_result(&self) -> ResearchResult {
        match self {
            ResearchFailure::TimedOut(_) => ResearchResult::failure(self.to_string()),
            _ => ResearchResult::failure(format!("{}{}", FAILURE_PREFIX, self)),
        }
    }
}

/// Runs research catalogs against one session
#[derive(Clone)]
pub struct ResearchOrchestrator {
    client: Arc<dyn ChatClient>,
    session: Session,
    timing: ResearchTiming,
    sink: Arc<dyn ProgressSink>,
    cancel: CancellationToken,
}

impl ResearchOrchestrator {
    pub fn new(client: Arc<dyn ChatClient>, session: Session) -> Self {
        Self {
            client,
            session,
            timing: ResearchTiming::default(),
            sink: Arc::new(NullSink),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_timing(mut self, timing: ResearchTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn timing(&self) -> ResearchTiming {
        self.timing
    }

    /// Execute every task of `catalog` in order
    ///
    /// Returns exactly one entry per catalog topic, in catalog order.
    pub async fn run(
        &self,
        catalog: &ResearchCatalog,
        subject: &str,
        context: &str,
    ) -> WeightedResearchSet {
        let phase = catalog.phase();
        let total = catalog.len();
        let mut results = WeightedResearchSet::new();

        info!(phase, catalog = catalog.name(), subject, total, "Starting research phase");
        self.sink.emit(&ProgressEvent::PhaseStarted {
            phase,
            name: catalog.name().to_string(),
            total_topics: total,
        });

        for (index, task) in catalog.tasks().iter().enumerate() {
            let topic = task.topic;

            if self.cancel.is_cancelled() {
                self.record_failure(phase, topic, ResearchFailure::Cancelled, &mut results);
                continue;
            }

            self.sink.emit(&ProgressEvent::TopicStarted {
                phase,
                topic: topic.to_string(),
                label: topic.label(),
                ordinal: index + 1,
                total,
            });

            match self.attempt(task, subject, context).await {
                Ok(answer) => {
                    debug!(%topic, chars = answer.len(), "Research topic answered");
                    self.sink.emit(&ProgressEvent::TopicCompleted {
                        phase,
                        topic: topic.to_string(),
                        preview: preview(&answer),
                    });
                    results.insert(topic, ResearchResult::success(answer, task.weight));
                }
                Err(failure) => {
                    let cancelled = matches!(failure, ResearchFailure::Cancelled);
                    self.record_failure(phase, topic, failure, &mut results);
                    if cancelled {
                        continue;
                    }
                }
            }

            self.reset_session().await;
        }

        info!(
            phase,
            succeeded = results.succeeded(),
            failed = results.failed(),
            "Research phase complete"
        );
        self.sink.emit(&ProgressEvent::PhaseCompleted {
            phase,
            name: catalog.name().to_string(),
            succeeded: results.succeeded(),
            failed: results.failed(),
        });

        results
    }

    /// Stagger, then race the call against the timer and cancellation
    async fn attempt(
        &self,
        task: &ResearchTask,
        subject: &str,
        context: &str,
    ) -> Result<String, ResearchFailure> {
        if !self.pause(self.timing.stagger).await {
            return Err(ResearchFailure::Cancelled);
        }

        let prompt = task.render(subject, context);
        debug!(topic = %task.topic, session = %self.session, "Sending research prompt");

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(ResearchFailure::Cancelled),
            answer = self.client.chat(&self.session, &prompt) => answer.map_err(ResearchFailure::from),
            _ = tokio::time::sleep(self.timing.task_timeout) => Err(ResearchFailure::TimedOut(task.topic)),
        }
    }

    fn record_failure(
        &self,
        phase: usize,
        topic: Topic,
        failure: ResearchFailure,
        results: &mut WeightedResearchSet,
    ) {
        warn!(%topic, error = %failure, "Research topic failed");
        self.sink.emit(&ProgressEvent::TopicFailed {
            phase,
            topic: topic.to_string(),
            error: failure.to_string(),
        });
        results.insert(topic, failure.to_result());
    }

    /// Best-effort `/exit` followed by the settle delay
    async fn reset_session(&self) {
        let reset = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return,
            reset = tokio::time::timeout(self.timing.task_timeout, self.client.reset(&self.session)) => reset,
        };

        match reset {
            Ok(Ok(())) => {}
            Ok(Err(e)) => debug!(session = %self.session, error = %e, "Session reset failed"),
            Err(_) => debug!(session = %self.session, "Session reset timed out"),
        }

        self.pause(self.timing.settle).await;
    }

    /// Sleep unless cancelled first; returns false on cancellation
    async fn pause(&self, duration: Duration) -> bool {
        if duration.is_zero() {
            return !self.cancel.is_cancelled();
        }
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => false,
            _ = tokio::time::sleep(duration) => true,
        }
    }
}

/// Run one catalog with explicit collaborators
#[allow(clippy::too_many_arguments)]
pub async fn run_research(
    client: Arc<dyn ChatClient>,
    session: &Session,
    catalog: &ResearchCatalog,
    subject: &str,
    context: &str,
    sink: Arc<dyn ProgressSink>,
    cancel: CancellationToken,
    timing: ResearchTiming,
) -> WeightedResearchSet {
    ResearchOrchestrator::new(client, session.clone())
        .with_timing(timing)
        .with_sink(sink)
        .with_cancellation(cancel)
        .run(catalog, subject, context)
        .await
}

fn preview(answer: &str) -> String {
    answer.chars().take(PREVIEW_CHARS).collect()
}
