//! Narrator: speaks one line through an external speech executable.
//!
//! Each line runs as its own child process with the line text as the final
//! argument. The process is bounded by a per-task deadline and can be killed
//! from another context through [`Narrator::cancel`].

use crate::document::Document;
use std::io;
use std::process::{ExitStatus, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::process::{Child, Command};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Hard limit on how long one line may take to narrate.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// How a single narration ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Index was out of range; nothing ran.
    Skipped,
    /// Process exited on its own (any exit status).
    Completed,
    /// Deadline expired and the process was killed.
    TimedOut,
    /// [`Narrator::cancel`] killed the process (or it never started).
    Cancelled,
    /// Process could not be started.
    Failed,
}

impl Outcome {
    pub fn did_run(self) -> bool {
        !matches!(self, Outcome::Skipped)
    }
}

struct ActiveTask {
    id: u64,
    cancel: CancellationToken,
}

/// Runs the configured speech program, one line at a time.
pub struct Narrator {
    program: String,
    args: Vec<String>,
    timeout: Duration,
    active: Mutex<Option<ActiveTask>>,
    next_id: AtomicU64,
}

impl Narrator {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            active: Mutex::new(None),
            next_id: AtomicU64::new(0),
        }
    }

    /// Arguments placed before the line text (e.g. `-v Samantha`).
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Narrate `document`'s line at `index` and wait for the process to finish.
    pub async fn speak(&self, document: &Document, index: usize) -> Outcome {
        match self.prepare(document, index) {
            Some(task) => task.run().await,
            None => Outcome::Skipped,
        }
    }

    /// Register a task for `index` without starting it. `None` when out of range.
    ///
    /// The task is reachable by [`Narrator::cancel`] from this point on, so a
    /// cancel issued between `prepare` and `run` stops it before it spawns.
    pub fn prepare(&self, document: &Document, index: usize) -> Option<NarrationTask<'_>> {
        let Some(text) = document.line(index) else {
            debug!(index, len = document.len(), "narration index out of range");
            return None;
        };
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let cancel = CancellationToken::new();
        let previous = self.lock_active().replace(ActiveTask {
            id,
            cancel: cancel.clone(),
        });
        if let Some(previous) = previous {
            warn!(previous = previous.id, "narration still registered; cancelling it");
            previous.cancel.cancel();
        }
        Some(NarrationTask {
            narrator: self,
            id,
            line_index: index,
            text: text.to_string(),
            cancel,
        })
    }

    /// Kill the running narration, if any. No-op when idle.
    pub fn cancel(&self) {
        if let Some(active) = self.lock_active().as_ref() {
            debug!(task = active.id, "cancelling narration");
            active.cancel.cancel();
        }
    }

    /// Whether a narration task is currently registered.
    pub fn is_active(&self) -> bool {
        self.lock_active().is_some()
    }

    fn release(&self, id: u64) {
        let mut active = self.lock_active();
        if active.as_ref().is_some_and(|a| a.id == id) {
            *active = None;
        }
    }

    fn lock_active(&self) -> MutexGuard<'_, Option<ActiveTask>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

enum Exit {
    Exited(io::Result<ExitStatus>),
    Deadline,
    Cancelled,
}

/// One line's narration, registered with the [`Narrator`] that created it.
pub struct NarrationTask<'a> {
    narrator: &'a Narrator,
    id: u64,
    line_index: usize,
    text: String,
    cancel: CancellationToken,
}

impl NarrationTask<'_> {
    pub fn line_index(&self) -> usize {
        self.line_index
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Spawn the process and wait for exit, deadline or cancellation.
    /// The child has been reaped by the time this returns.
    pub async fn run(self) -> Outcome {
        let outcome = self.supervise().await;
        self.narrator.release(self.id);
        debug!(index = self.line_index, ?outcome, "narration finished");
        outcome
    }

    async fn supervise(&self) -> Outcome {
        if self.cancel.is_cancelled() {
            return Outcome::Cancelled;
        }
        let deadline = Instant::now() + self.narrator.timeout;

        let mut cmd = Command::new(&self.narrator.program);
        cmd.args(&self.narrator.args)
            .arg(&self.text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!(program = %self.narrator.program, error = %e, "failed to start narrator");
                return Outcome::Failed;
            }
        };

        let exit = tokio::select! {
            status = child.wait() => Exit::Exited(status),
            () = tokio::time::sleep_until(deadline) => Exit::Deadline,
            () = self.cancel.cancelled() => Exit::Cancelled,
        };

        match exit {
            Exit::Exited(Ok(status)) => {
                if !status.success() {
                    debug!(index = self.line_index, %status, "narrator exited unsuccessfully");
                }
                Outcome::Completed
            }
            Exit::Exited(Err(e)) => {
                warn!(index = self.line_index, error = %e, "waiting on narrator failed");
                Outcome::Failed
            }
            Exit::Deadline => {
                debug!(index = self.line_index, timeout = ?self.narrator.timeout, "narration timed out");
                terminate(&mut child).await;
                Outcome::TimedOut
            }
            Exit::Cancelled => {
                terminate(&mut child).await;
                Outcome::Cancelled
            }
        }
    }
}

/// Kill and reap. A child that already exited is not an error.
async fn terminate(child: &mut Child) {
    if let Err(e) = child.kill().await {
        debug!(error = %e, "narrator already gone");
    }
}
