//! Seams to the outside: what the controller reports, and what the user can ask for.

/// Pause/resume notification sent to the presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    Paused,
    Resumed,
}

/// Why playback ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every line was read.
    Finished,
    /// The user quit.
    Quit,
}

/// Discrete user intents delivered by a command source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Pause,
    Resume,
    Quit,
    OpenLink,
}

/// Receives playback notifications. Implementations must return quickly;
/// the controller calls them inline and never retries. `on_advance` and
/// `on_state_change` run while playback state is locked, so they must not
/// call back into a `PlaybackHandle`.
pub trait Presenter: Send + Sync {
    fn on_advance(&self, index: usize, text: &str, is_blank: bool);

    fn on_state_change(&self, change: StateChange);

    fn on_stopped(&self, _reason: StopReason) {}
}
