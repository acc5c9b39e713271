//! In-memory implementation of JobQueue.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::ports::{BackgroundJob, EnqueueError, JobQueue};

/// In-memory job queue that records enqueued jobs for assertions and can
/// be switched into a failing state to exercise the inline fallback.
#[derive(Default)]
pub struct InMemoryJobQueue {
    jobs: Mutex<Vec<BackgroundJob>>,
    unavailable: AtomicBool,
}

impl InMemoryJobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent enqueue fail.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Jobs enqueued so far.
    pub fn enqueued(&self) -> Vec<BackgroundJob> {
        self.jobs.lock().unwrap().clone()
    }

    pub fn job_count(&self) -> usize {
        self.jobs.lock().unwrap().len()
    }
}

impl JobQueue for InMemoryJobQueue {
    fn enqueue(&self, job: BackgroundJob) -> Result<(), EnqueueError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(EnqueueError("runner offline".to_string()));
        }
        self.jobs.lock().unwrap().push(job);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::TicketId;

    #[test]
    fn records_enqueued_jobs() {
        let queue = InMemoryJobQueue::new();
        queue
            .enqueue(BackgroundJob::TicketCreated {
                ticket_id: TicketId::new(),
            })
            .unwrap();
        assert_eq!(queue.job_count(), 1);
    }

    #[test]
    fn fails_when_unavailable() {
        let queue = InMemoryJobQueue::new();
        queue.set_unavailable(true);
        let result = queue.enqueue(BackgroundJob::PasswordResetRequested {
            email: "a@b.test".to_string(),
        });
        assert!(result.is_err());
        assert_eq!(queue.job_count(), 0);
    }
}
