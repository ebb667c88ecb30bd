//! Document model: the immutable, ordered lines of one essay.

use std::time::Duration;

/// Time budget per spoken word, used for word-count pacing.
pub const SECONDS_PER_WORD: u64 = 1;

/// Lines of an essay, fixed after [`Document::load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    lines: Vec<String>,
}

impl Document {
    /// Split raw input on `\n`. Empty input yields a single empty line.
    pub fn load(bytes: &[u8]) -> Self {
        let text = String::from_utf8_lossy(bytes);
        let lines = text
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
            .collect();
        Self { lines }
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        if lines.is_empty() {
            return Self { lines: vec![String::new()] };
        }
        Self { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Always false for a loaded document; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of single-space separated tokens. An empty line counts as one.
    pub fn word_count(line: &str) -> usize {
        line.split(' ').count()
    }

    /// How long the line at `index` takes to say at [`SECONDS_PER_WORD`].
    pub fn spoken_duration(&self, index: usize) -> Option<Duration> {
        let line = self.line(index)?;
        let words = Self::word_count(line) as u64;
        Some(Duration::from_secs(words * SECONDS_PER_WORD))
    }
}
