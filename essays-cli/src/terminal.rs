//! Terminal presenter: a header (menu, title, state) over the lines read so far.

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use essays_core::{Presenter, StateChange, StopReason};
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::warn;

const BANNER: &str = "Welcome to Awesome Startup Essays!!";
const MENU: &str = "Menu: q quit. p pause. r resume. o open link.";
/// Rows above the body: banner, menu, status, rule.
const HEADER_ROWS: u16 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Reading,
    Paused,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyLine {
    pub index: usize,
    pub text: String,
    /// Display number; blank lines are not numbered.
    pub number: Option<usize>,
}

impl BodyLine {
    pub fn render(&self) -> String {
        match self.number {
            Some(n) => format!("{} {}", n, self.text),
            None => String::new(),
        }
    }
}

/// What is on screen, independent of how it is drawn.
#[derive(Debug)]
pub struct Screen {
    title: String,
    status: Status,
    rows: Vec<BodyLine>,
    capacity: usize,
    blanks: Vec<usize>,
}

impl Screen {
    pub fn new(title: impl Into<String>, capacity: usize) -> Self {
        Self {
            title: title.into(),
            status: Status::Reading,
            rows: Vec::new(),
            capacity: capacity.max(1),
            blanks: Vec::new(),
        }
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
    }

    pub fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Show line `index`. A line shown again after a pause replaces its
    /// earlier entry and everything after it. A full body starts over.
    pub fn push(&mut self, index: usize, text: &str, is_blank: bool) {
        if let Some(pos) = self.rows.iter().position(|r| r.index >= index) {
            self.rows.truncate(pos);
        }
        self.blanks.retain(|&b| b < index);
        let number = if is_blank {
            self.blanks.push(index);
            None
        } else {
            Some(index + 1 - self.blanks.len())
        };
        if self.rows.len() >= self.capacity {
            self.rows.clear();
        }
        self.rows.push(BodyLine {
            index,
            text: text.to_string(),
            number,
        });
    }

    pub fn rows(&self) -> &[BodyLine] {
        &self.rows
    }

    pub fn status_line(&self) -> String {
        match self.status {
            Status::Reading => format!("Reading: {}", self.title),
            Status::Paused => format!("[Paused]: {}", self.title),
            Status::Finished => format!("Finished: {}", self.title),
        }
    }
}

fn clip(s: &str, width: usize) -> String {
    s.chars().take(width).collect()
}

/// Draws a [`Screen`] with crossterm on every playback notification.
pub struct TerminalPresenter {
    screen: Mutex<Screen>,
}

impl TerminalPresenter {
    pub fn new(title: &str) -> Self {
        let presenter = Self {
            screen: Mutex::new(Screen::new(title, body_capacity())),
        };
        presenter.redraw(&presenter.lock());
        presenter
    }

    fn lock(&self) -> MutexGuard<'_, Screen> {
        self.screen.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn redraw(&self, screen: &Screen) {
        if let Err(e) = draw(screen) {
            warn!(error = %e, "failed to draw screen");
        }
    }
}

fn body_capacity() -> usize {
    let rows = terminal::size().map(|(_, rows)| rows).unwrap_or(24);
    usize::from(rows.saturating_sub(HEADER_ROWS + 1))
}

fn draw(screen: &Screen) -> io::Result<()> {
    let width = usize::from(terminal::size().map(|(cols, _)| cols).unwrap_or(80));
    let mut out = io::stdout().lock();
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    queue!(
        out,
        SetForegroundColor(Color::Cyan),
        Print(clip(BANNER, width)),
        MoveTo(0, 1),
        SetForegroundColor(Color::Yellow),
        Print(clip(MENU, width)),
        MoveTo(0, 2),
    )?;
    let status_color = match screen.status() {
        Status::Paused => Color::Red,
        Status::Reading | Status::Finished => Color::White,
    };
    queue!(
        out,
        SetForegroundColor(status_color),
        Print(clip(&screen.status_line(), width)),
        MoveTo(0, 3),
        SetForegroundColor(Color::DarkGrey),
        Print("─".repeat(width)),
        ResetColor,
    )?;

    let last = screen.rows().len().saturating_sub(1);
    for (i, row) in screen.rows().iter().enumerate() {
        let y = HEADER_ROWS.saturating_add(u16::try_from(i).unwrap_or(u16::MAX));
        queue!(out, MoveTo(0, y))?;
        if i == last {
            queue!(out, SetForegroundColor(Color::White), SetAttribute(Attribute::Bold))?;
        } else {
            queue!(out, SetForegroundColor(Color::Yellow))?;
        }
        queue!(
            out,
            Print(clip(&row.render(), width)),
            SetAttribute(Attribute::Reset),
            ResetColor
        )?;
    }
    out.flush()
}

impl Presenter for TerminalPresenter {
    fn on_advance(&self, index: usize, text: &str, is_blank: bool) {
        let mut screen = self.lock();
        screen.set_capacity(body_capacity());
        screen.push(index, text, is_blank);
        self.redraw(&screen);
    }

    fn on_state_change(&self, change: StateChange) {
        let mut screen = self.lock();
        screen.set_status(match change {
            StateChange::Paused => Status::Paused,
            StateChange::Resumed => Status::Reading,
        });
        self.redraw(&screen);
    }

    fn on_stopped(&self, reason: StopReason) {
        if reason == StopReason::Finished {
            let mut screen = self.lock();
            screen.set_status(Status::Finished);
            self.redraw(&screen);
        }
    }
}

/// Raw mode + alternate screen for as long as this is alive.
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen, Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(screen: &Screen) -> Vec<String> {
        screen.rows().iter().map(BodyLine::render).collect()
    }

    #[test]
    fn blank_lines_are_not_numbered() {
        let mut s = Screen::new("essay.txt", 10);
        s.push(0, "hello world", false);
        s.push(1, "", true);
        s.push(2, "bye", false);
        assert_eq!(rendered(&s), vec!["1 hello world", "", "2 bye"]);
    }

    #[test]
    fn full_body_starts_over() {
        let mut s = Screen::new("t", 2);
        s.push(0, "a", false);
        s.push(1, "b", false);
        s.push(2, "c", false);
        assert_eq!(rendered(&s), vec!["3 c"]);
    }

    #[test]
    fn replayed_line_replaces_its_entry() {
        let mut s = Screen::new("t", 10);
        s.push(0, "a", false);
        s.push(1, "", true);
        s.push(2, "b", false);
        s.push(2, "b", false);
        assert_eq!(rendered(&s), vec!["1 a", "", "2 b"]);
        s.push(1, "", true);
        assert_eq!(rendered(&s), vec!["1 a", ""]);
        s.push(2, "b", false);
        assert_eq!(rendered(&s), vec!["1 a", "", "2 b"]);
    }

    #[test]
    fn status_line_follows_state() {
        let mut s = Screen::new("How to Start a Startup", 5);
        assert_eq!(s.status_line(), "Reading: How to Start a Startup");
        s.set_status(Status::Paused);
        assert_eq!(s.status_line(), "[Paused]: How to Start a Startup");
        s.set_status(Status::Finished);
        assert!(s.status_line().starts_with("Finished"));
    }

    #[test]
    fn zero_capacity_still_shows_current_line() {
        let mut s = Screen::new("t", 0);
        s.push(0, "a", false);
        s.push(1, "b", false);
        assert_eq!(rendered(&s), vec!["2 b"]);
    }

    #[test]
    fn clip_respects_char_boundaries() {
        assert_eq!(clip("héllo", 2), "hé");
        assert_eq!(clip("ab", 10), "ab");
    }
}
