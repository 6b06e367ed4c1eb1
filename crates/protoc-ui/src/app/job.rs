//! Running one generation at a time off the UI thread.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::app::runner::CommandRunner;
use crate::domain::errors::DomainError;
use crate::domain::model::{CommandInvocation, ExecutionResult};

/// A generation running on a worker thread.
#[derive(Debug)]
pub struct GenerationJob {
    invocation: CommandInvocation,
    receiver: Receiver<ExecutionResult>,
    started_at: Instant,
}

/// Progress of a [`GenerationJob`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobPoll {
    Pending,
    Finished(ExecutionResult),
}

impl GenerationJob {
    pub fn spawn(runner: Arc<dyn CommandRunner>, invocation: CommandInvocation) -> Result<Self> {
        let (sender, receiver) = mpsc::channel();
        let worker_invocation = invocation.clone();
        thread::Builder::new()
            .name("protoc-job".into())
            .spawn(move || {
                let result = runner.run(&worker_invocation);
                // The receiver is gone only if the UI has already shut down.
                let _ = sender.send(result);
            })
            .context("failed to start generation worker")?;

        Ok(Self {
            invocation,
            receiver,
            started_at: Instant::now(),
        })
    }

    pub fn invocation(&self) -> &CommandInvocation {
        &self.invocation
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Check for completion without blocking.
    pub fn poll(&self) -> JobPoll {
        match self.receiver.try_recv() {
            Ok(result) => JobPoll::Finished(result),
            Err(TryRecvError::Empty) => JobPoll::Pending,
            Err(TryRecvError::Disconnected) => JobPoll::Finished(worker_lost()),
        }
    }
}

fn worker_lost() -> ExecutionResult {
    ExecutionResult::failed("generation worker exited without a result")
}

/// Holds at most one in-flight [`GenerationJob`].
#[derive(Debug, Default)]
pub struct JobSlot {
    current: Option<GenerationJob>,
}

impl JobSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&GenerationJob> {
        self.current.as_ref()
    }

    /// Start a job unless one is already in flight.
    pub fn submit(
        &mut self,
        runner: Arc<dyn CommandRunner>,
        invocation: CommandInvocation,
    ) -> Result<()> {
        if self.current.is_some() {
            return Err(DomainError::GenerationInProgress.into());
        }
        self.current = Some(GenerationJob::spawn(runner, invocation)?);
        Ok(())
    }

    /// Take the result of the in-flight job once it has finished, freeing the slot.
    pub fn poll(&mut self) -> Option<ExecutionResult> {
        let job = self.current.as_ref()?;
        match job.poll() {
            JobPoll::Pending => None,
            JobPoll::Finished(result) => {
                if let Some(job) = self.current.take() {
                    tracing::debug!(elapsed = ?job.elapsed(), "generation finished");
                }
                Some(result)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;
    use std::sync::mpsc::Sender;

    /// Blocks each run until the test releases it.
    struct GatedRunner {
        gate: Mutex<Receiver<()>>,
    }

    impl GatedRunner {
        fn new() -> (Arc<Self>, Sender<()>) {
            let (tx, rx) = mpsc::channel();
            (
                Arc::new(Self {
                    gate: Mutex::new(rx),
                }),
                tx,
            )
        }
    }

    impl CommandRunner for GatedRunner {
        fn run(&self, invocation: &CommandInvocation) -> ExecutionResult {
            if let Ok(gate) = self.gate.lock() {
                let _ = gate.recv();
            }
            ExecutionResult {
                exit_error: None,
                stdout: invocation.to_string(),
                stderr: String::new(),
            }
        }
    }

    fn invocation() -> CommandInvocation {
        CommandInvocation::new("protoc", vec!["/a/x.proto".into()])
    }

    fn wait_for(slot: &mut JobSlot) -> ExecutionResult {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(result) = slot.poll() {
                return result;
            }
            assert!(Instant::now() < deadline, "job did not finish");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn rejects_second_submission_while_running() {
        let (runner, release) = GatedRunner::new();
        let mut slot = JobSlot::new();

        slot.submit(runner.clone(), invocation()).unwrap();
        assert!(slot.is_running());
        assert_eq!(slot.poll(), None);

        let err = slot.submit(runner.clone(), invocation()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DomainError>(),
            Some(&DomainError::GenerationInProgress)
        );

        release.send(()).unwrap();
        let result = wait_for(&mut slot);
        assert_eq!(result.stdout, "protoc /a/x.proto");
        assert!(!slot.is_running());

        slot.submit(runner, invocation()).unwrap();
        release.send(()).unwrap();
        assert!(wait_for(&mut slot).is_success());
    }

    fn finish(job: &GenerationJob) -> ExecutionResult {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let JobPoll::Finished(result) = job.poll() {
                return result;
            }
            assert!(Instant::now() < deadline, "job did not finish");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn job_stays_pending_until_the_runner_returns() {
        let (runner, release) = GatedRunner::new();
        let job = GenerationJob::spawn(runner, invocation()).unwrap();
        assert_eq!(job.invocation(), &invocation());
        assert_eq!(job.poll(), JobPoll::Pending);
        release.send(()).unwrap();
        assert!(finish(&job).is_success());
    }

    #[test]
    fn panicking_worker_reports_failure() {
        struct Panics;
        impl CommandRunner for Panics {
            fn run(&self, _: &CommandInvocation) -> ExecutionResult {
                panic!("boom");
            }
        }

        let job = GenerationJob::spawn(Arc::new(Panics), invocation()).unwrap();
        let result = finish(&job);
        assert_eq!(
            result.exit_error.as_deref(),
            Some("generation worker exited without a result")
        );
    }
}
