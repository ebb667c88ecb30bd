//! Keyboard command source.

use crate::link;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use essays_core::{Command, PlaybackHandle};
use std::time::Duration;
use tracing::debug;

/// How often the key loop re-checks whether playback has stopped.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub fn command_for(key: &KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
        KeyCode::Char('p') => Some(Command::Pause),
        KeyCode::Char('r') => Some(Command::Resume),
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char('o') => Some(Command::OpenLink),
        _ => None,
    }
}

/// Read keys and forward them to playback until it stops. Blocks.
pub fn run(handle: &PlaybackHandle, link_url: Option<&str>) -> anyhow::Result<()> {
    while !handle.is_stopped() {
        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        let Some(command) = command_for(&key) else {
            continue;
        };
        debug!(?command, "key command");
        match command {
            Command::OpenLink => match link_url {
                Some(url) => link::open(url),
                None => debug!("essay has no link"),
            },
            other => {
                if !handle.apply(other) {
                    debug!(?other, "command ignored");
                }
            }
        }
    }
    Ok(())
}
