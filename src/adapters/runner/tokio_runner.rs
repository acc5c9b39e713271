//! Tokio-based background job runner.
//!
//! A single worker task drains an unbounded channel and executes each
//! job through the [`JobHandler`], retrying transient failures up to a
//! small fixed budget. Non-retriable errors short-circuit immediately.
//! Enqueueing is synchronous and fails only when the worker is gone, at
//! which point callers run the operation inline instead.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::ports::{BackgroundJob, EnqueueError, JobError, JobHandler, JobQueue};

/// Retries after the first attempt.
const MAX_RETRIES: u32 = 2;

/// Base delay between attempts; doubled per retry.
const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

/// Handle for submitting jobs to the worker task.
pub struct TokioJobRunner {
    tx: mpsc::UnboundedSender<BackgroundJob>,
}

impl TokioJobRunner {
    /// Spawns the worker task and returns the submission handle.
    pub fn start(handler: Arc<dyn JobHandler>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(worker_loop(rx, handler));
        Self { tx }
    }
}

impl JobQueue for TokioJobRunner {
    fn enqueue(&self, job: BackgroundJob) -> Result<(), EnqueueError> {
        self.tx
            .send(job)
            .map_err(|e| EnqueueError(e.to_string()))
    }
}

async fn worker_loop(
    mut rx: mpsc::UnboundedReceiver<BackgroundJob>,
    handler: Arc<dyn JobHandler>,
) {
    while let Some(job) = rx.recv().await {
        run_with_retries(handler.as_ref(), job).await;
    }
}

async fn run_with_retries(handler: &dyn JobHandler, job: BackgroundJob) {
    let name = job.name();
    let mut attempt = 0;
    loop {
        match handler.run(job.clone()).await {
            Ok(()) => {
                tracing::debug!(job = name, attempt, "background job completed");
                return;
            }
            Err(JobError::NonRetriable(message)) => {
                tracing::warn!(job = name, %message, "background job abandoned");
                return;
            }
            Err(JobError::Retriable(message)) if attempt < MAX_RETRIES => {
                attempt += 1;
                let delay = RETRY_BASE_DELAY * 2u32.pow(attempt - 1);
                tracing::warn!(job = name, attempt, %message, "background job retrying");
                tokio::time::sleep(delay).await;
            }
            Err(JobError::Retriable(message)) => {
                tracing::error!(job = name, %message, "background job failed after retries");
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::TicketId;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::sync::Notify;

    struct CountingHandler {
        attempts: AtomicU32,
        failures_before_success: u32,
        non_retriable: bool,
        done: Notify,
    }

    impl CountingHandler {
        fn new(failures_before_success: u32, non_retriable: bool) -> Arc<Self> {
            Arc::new(Self {
                attempts: AtomicU32::new(0),
                failures_before_success,
                non_retriable,
                done: Notify::new(),
            })
        }
    }

    #[async_trait]
    impl JobHandler for CountingHandler {
        async fn run(&self, _job: BackgroundJob) -> Result<(), JobError> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
            if self.non_retriable {
                self.done.notify_one();
                return Err(JobError::non_retriable("gone"));
            }
            if attempt < self.failures_before_success {
                return Err(JobError::retriable("transient"));
            }
            self.done.notify_one();
            Ok(())
        }
    }

    fn job() -> BackgroundJob {
        BackgroundJob::TicketCreated {
            ticket_id: TicketId::new(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn retries_transient_failures_until_success() {
        let handler = CountingHandler::new(2, false);
        let runner = TokioJobRunner::start(handler.clone());

        runner.enqueue(job()).unwrap();
        handler.done.notified().await;

        assert_eq!(handler.attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn non_retriable_errors_stop_immediately() {
        let handler = CountingHandler::new(0, true);
        let runner = TokioJobRunner::start(handler.clone());

        runner.enqueue(job()).unwrap();
        handler.done.notified().await;
        // Give the worker a beat to (incorrectly) retry if it were going to.
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(handler.attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_budget_is_bounded() {
        struct AlwaysFailing {
            attempts: AtomicU32,
        }

        #[async_trait]
        impl JobHandler for AlwaysFailing {
            async fn run(&self, _job: BackgroundJob) -> Result<(), JobError> {
                self.attempts.fetch_add(1, Ordering::SeqCst);
                Err(JobError::retriable("still broken"))
            }
        }

        let handler = Arc::new(AlwaysFailing {
            attempts: AtomicU32::new(0),
        });
        let runner = TokioJobRunner::start(handler.clone());
        runner.enqueue(job()).unwrap();

        // Paused time auto-advances through the sleeps.
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(handler.attempts.load(Ordering::SeqCst), 1 + MAX_RETRIES);
    }
}
