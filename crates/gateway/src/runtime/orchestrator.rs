//! Run Orchestrator: start a run and poll it to a terminal status.
//!
//! The loop is a plain `sleep` + `retrieve` cycle on the request's own
//! task, so waiting never blocks other requests. Dropping the future (for
//! instance when the client disconnects) abandons the loop; the remote run
//! keeps going on its own.

use std::time::Duration;

use la_assistants::{AssistantsApi, CreateRunRequest, Run, RunPhase, RunStatus};
use la_domain::config::RunsConfig;
use la_domain::error::{Error, Result};
use la_domain::trace::TraceEvent;
use tokio::time::Instant;

/// Bounds for the poll loop.
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_polls: u32,
    pub timeout: Duration,
}

impl From<&RunsConfig> for PollPolicy {
    fn from(cfg: &RunsConfig) -> Self {
        Self {
            interval: cfg.poll_interval(),
            max_polls: cfg.max_polls,
            timeout: cfg.timeout(),
        }
    }
}

/// A run that reached `completed`.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub run_id: String,
    pub status: RunStatus,
    /// Status re-fetches performed after the run was created.
    pub polls: u32,
    pub elapsed: Duration,
}

/// Start a run of `assistant_id` on `thread_id` and wait for it to finish.
///
/// Returns `Error::RunFailed` (carrying the terminal status) for every
/// terminal status other than `completed`, and `Error::RunTimeout` when
/// either bound in `policy` is exceeded first. Nothing is retried.
pub async fn run_to_completion(
    api: &dyn AssistantsApi,
    thread_id: &str,
    assistant_id: &str,
    policy: PollPolicy,
) -> Result<RunOutcome> {
    let started = Instant::now();
    let mut run = api
        .create_run(
            thread_id,
            CreateRunRequest {
                assistant_id: assistant_id.to_owned(),
            },
        )
        .await?;
    tracing::debug!(run_id = %run.id, status = %run.status, "run started");

    let mut polls: u32 = 0;
    loop {
        match run.status.phase() {
            RunPhase::Succeeded => {
                let elapsed = started.elapsed();
                finished(&run, polls, elapsed);
                return Ok(RunOutcome {
                    run_id: run.id,
                    status: run.status,
                    polls,
                    elapsed,
                });
            }
            RunPhase::Failed => {
                finished(&run, polls, started.elapsed());
                if let Some(err) = &run.last_error {
                    tracing::warn!(
                        run_id = %run.id,
                        status = %run.status,
                        code = err.code.as_deref().unwrap_or(""),
                        message = err.message.as_deref().unwrap_or(""),
                        "run failed"
                    );
                }
                return Err(Error::RunFailed {
                    run_id: run.id,
                    status: run.status.as_str().to_owned(),
                });
            }
            RunPhase::Pending => {}
        }

        if polls >= policy.max_polls || started.elapsed() >= policy.timeout {
            tracing::warn!(
                run_id = %run.id,
                status = %run.status,
                polls,
                "run still pending, giving up"
            );
            finished(&run, polls, started.elapsed());
            return Err(Error::RunTimeout {
                run_id: run.id,
                polls,
            });
        }

        tokio::time::sleep(policy.interval).await;
        run = api.retrieve_run(thread_id, &run.id).await?;
        polls += 1;

        TraceEvent::RunPolled {
            run_id: run.id.clone(),
            status: run.status.as_str().into(),
            poll: polls,
        }
        .emit();
    }
}

fn finished(run: &Run, polls: u32, elapsed: Duration) {
    TraceEvent::RunFinished {
        run_id: run.id.clone(),
        status: run.status.as_str().into(),
        polls,
        duration_ms: elapsed.as_millis() as u64,
    }
    .emit();
}
