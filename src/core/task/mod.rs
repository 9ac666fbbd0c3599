//! Background task module
//!
//! Fire-and-forget execution of work off the UI thread.

/// A unit of background work
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Executes jobs off the interactive thread.
///
/// Callers never observe a return value; results go back through whatever
/// channel the job captured.
pub trait TaskRunner: Send + Sync {
    fn run(&self, job: Job);
}

/// Runs jobs on the tokio blocking pool
pub struct TokioTaskRunner {
    handle: tokio::runtime::Handle,
}

impl TokioTaskRunner {
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self { handle }
    }

    /// Use the runtime the caller is running in.
    ///
    /// Panics outside of a tokio runtime, like `Handle::current`.
    pub fn current() -> Self {
        Self::new(tokio::runtime::Handle::current())
    }
}

impl TaskRunner for TokioTaskRunner {
    fn run(&self, job: Job) {
        // Detached: the join handle is not needed
        let _ = self.handle.spawn_blocking(job);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{Job, TaskRunner};
    use std::sync::Mutex;

    /// Runs each job immediately on the calling thread
    pub struct InlineRunner;

    impl TaskRunner for InlineRunner {
        fn run(&self, job: Job) {
            job();
        }
    }

    /// Queues jobs until the test runs them
    #[derive(Default)]
    pub struct DeferredRunner {
        jobs: Mutex<Vec<Job>>,
    }

    impl DeferredRunner {
        pub fn pending(&self) -> usize {
            self.jobs.lock().unwrap().len()
        }

        pub fn run_all(&self) {
            let jobs: Vec<Job> = std::mem::take(&mut *self.jobs.lock().unwrap());
            for job in jobs {
                job();
            }
        }
    }

    impl TaskRunner for DeferredRunner {
        fn run(&self, job: Job) {
            self.jobs.lock().unwrap().push(job);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn test_tokio_runner_runs_off_thread() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let runner = TokioTaskRunner::new(rt.handle().clone());
        let caller = std::thread::current().id();

        let (tx, rx) = mpsc::channel();
        runner.run(Box::new(move || {
            let _ = tx.send(std::thread::current().id());
        }));

        let worker = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_ne!(worker, caller);
    }
}
