//! Playback controller: owns the cursor and mode, and drives the
//! tick -> narrate -> advance loop.
//!
//! One controller task runs for the whole session. Pausing parks it on a
//! watch channel; resuming wakes the same task, so two loops never overlap.
//! Control requests go through a [`PlaybackHandle`], which takes the same
//! mutex the loop uses for `cursor` and `mode`.

use crate::config::{Pacing, PlaybackConfig};
use crate::narrator::{Narrator, Outcome};
use crate::presenter::{Command, Presenter, StateChange, StopReason};
use crate::session::Session;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

/// Playback mode. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Playing,
    Paused,
    Stopped,
}

#[derive(Debug)]
struct PlaybackState {
    cursor: usize,
    mode: Mode,
    /// Set by the pause that was let through; cleared by the next resume.
    pause_latched: bool,
    /// Set by the resume (or autoplay start) that was let through; cleared by the next pause.
    resume_latched: bool,
    stop_reason: Option<StopReason>,
}

struct Shared {
    state: Mutex<PlaybackState>,
    wake: watch::Sender<u64>,
    narrator: Arc<Narrator>,
    presenter: Arc<dyn Presenter>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, PlaybackState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self) {
        self.wake.send_modify(|generation| *generation = generation.wrapping_add(1));
    }
}

/// Runs the playback loop. Build with [`Controller::new`], then `run` or `spawn` it.
pub struct Controller {
    shared: Arc<Shared>,
    session: Arc<Session>,
    tick: Duration,
    pacing: Pacing,
}

/// Cloneable control surface for pause, resume and quit.
#[derive(Clone)]
pub struct PlaybackHandle {
    shared: Arc<Shared>,
}

impl Controller {
    pub fn new(
        session: Arc<Session>,
        narrator: Arc<Narrator>,
        presenter: Arc<dyn Presenter>,
        config: &PlaybackConfig,
    ) -> (Self, PlaybackHandle) {
        let (mode, pause_latched, resume_latched) = if config.autoplay {
            (Mode::Playing, false, true)
        } else {
            (Mode::Paused, true, false)
        };
        let (wake, _) = watch::channel(0);
        let shared = Arc::new(Shared {
            state: Mutex::new(PlaybackState {
                cursor: 0,
                mode,
                pause_latched,
                resume_latched,
                stop_reason: None,
            }),
            wake,
            narrator,
            presenter,
        });
        let controller = Self {
            shared: Arc::clone(&shared),
            session,
            tick: config.tick(),
            pacing: config.pacing,
        };
        (controller, PlaybackHandle { shared })
    }

    /// Run the loop on its own task.
    pub fn spawn(self) -> JoinHandle<StopReason> {
        tokio::spawn(self.run())
    }

    /// Read the document until it ends or the user quits.
    pub async fn run(self) -> StopReason {
        let shared = Arc::clone(&self.shared);
        let document = &self.session.document;
        let mut wake = shared.wake.subscribe();
        let mut last: Option<(usize, Duration)> = None;

        loop {
            wake.borrow_and_update();
            let mode = shared.lock().mode;
            match mode {
                Mode::Stopped => break,
                Mode::Paused => {
                    if wake.changed().await.is_err() {
                        break;
                    }
                    continue;
                }
                Mode::Playing => {}
            }

            let delay = self.delay_after(last);
            tokio::select! {
                () = tokio::time::sleep(delay) => {}
                changed = wake.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
            }

            let (index, task) = {
                let mut st = shared.lock();
                if st.mode != Mode::Playing {
                    continue;
                }
                let index = st.cursor;
                if index >= document.len() {
                    st.mode = Mode::Stopped;
                    st.stop_reason.get_or_insert(StopReason::Finished);
                    shared.narrator.cancel();
                    break;
                }
                let task = shared.narrator.prepare(document, index);
                // Under the lock, so a pause is reported either before or after this line.
                if let Some(task) = &task {
                    let text = task.text();
                    shared
                        .presenter
                        .on_advance(index, text, text.trim().is_empty());
                }
                (index, task)
            };

            let started = Instant::now();
            let outcome = match task {
                Some(task) => task.run().await,
                None => Outcome::Skipped,
            };

            let mut st = shared.lock();
            if outcome == Outcome::Cancelled {
                debug!(index, mode = ?st.mode, "narration interrupted; line stays current");
                last = None;
            } else {
                st.cursor = index + 1;
                last = Some((index, started.elapsed()));
            }
        }

        let reason = shared.lock().stop_reason.unwrap_or(StopReason::Finished);
        info!(?reason, "playback stopped");
        shared.presenter.on_stopped(reason);
        reason
    }

    fn delay_after(&self, last: Option<(usize, Duration)>) -> Duration {
        match (self.pacing, last) {
            (Pacing::Words, Some((index, spent))) => self
                .session
                .document
                .spoken_duration(index)
                .map_or(self.tick, |d| d.saturating_sub(spent).max(self.tick)),
            _ => self.tick,
        }
    }
}

impl PlaybackHandle {
    /// Pause playback. Returns false when the request was ignored
    /// (already paused since the last resume, or stopped).
    pub fn pause(&self) -> bool {
        let mut st = self.shared.lock();
        if st.pause_latched || st.mode == Mode::Stopped {
            return false;
        }
        st.pause_latched = true;
        st.resume_latched = false;
        st.mode = Mode::Paused;
        debug!(cursor = st.cursor, "pause");
        self.shared.presenter.on_state_change(StateChange::Paused);
        self.shared.narrator.cancel();
        self.shared.notify();
        true
    }

    /// Resume from the current cursor. Returns false when ignored.
    pub fn resume(&self) -> bool {
        let mut st = self.shared.lock();
        if st.resume_latched || st.mode == Mode::Stopped {
            return false;
        }
        st.resume_latched = true;
        st.pause_latched = false;
        st.mode = Mode::Playing;
        debug!(cursor = st.cursor, "resume");
        self.shared.presenter.on_state_change(StateChange::Resumed);
        self.shared.notify();
        true
    }

    /// Stop playback for good. Repeated calls are no-ops.
    pub fn quit(&self) {
        let mut st = self.shared.lock();
        if st.mode == Mode::Stopped {
            return;
        }
        st.mode = Mode::Stopped;
        st.stop_reason = Some(StopReason::Quit);
        debug!(cursor = st.cursor, "quit");
        self.shared.narrator.cancel();
        self.shared.notify();
    }

    /// Apply a user command. `OpenLink` does not touch playback and returns false.
    pub fn apply(&self, command: Command) -> bool {
        match command {
            Command::Pause => self.pause(),
            Command::Resume => self.resume(),
            Command::Quit => {
                self.quit();
                true
            }
            Command::OpenLink => false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.shared.lock().mode
    }

    pub fn cursor(&self) -> usize {
        self.shared.lock().cursor
    }

    pub fn is_stopped(&self) -> bool {
        self.mode() == Mode::Stopped
    }
}
