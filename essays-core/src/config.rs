//! Reader config file (essays.toml): narration command and playback pacing.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[cfg(target_os = "macos")]
const DEFAULT_COMMAND: &str = "say";
#[cfg(not(target_os = "macos"))]
const DEFAULT_COMMAND: &str = "espeak";

/// Full reader config. Every section and key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReaderConfig {
    #[serde(default)]
    pub narration: NarrationConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NarrationConfig {
    #[serde(default = "default_command")]
    pub command: String,
    /// Passed before the line text.
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            args: Vec::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl NarrationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// What drives the wait between lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Pacing {
    /// Wait one tick before every line.
    #[default]
    Fixed,
    /// Wait out the previous line's word-count duration, at least one tick.
    Words,
}

impl Pacing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pacing::Fixed => "fixed",
            Pacing::Words => "words",
        }
    }
}

impl std::str::FromStr for Pacing {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "fixed" => Ok(Pacing::Fixed),
            "words" => Ok(Pacing::Words),
            other => anyhow::bail!("unknown pacing {:?} (expected \"fixed\" or \"words\")", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlaybackConfig {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default)]
    pub pacing: Pacing,
    #[serde(default = "default_true")]
    pub autoplay: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            pacing: Pacing::default(),
            autoplay: true,
        }
    }
}

impl PlaybackConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

fn default_command() -> String {
    DEFAULT_COMMAND.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_tick_ms() -> u64 {
    100
}

fn default_true() -> bool {
    true
}

impl ReaderConfig {
    /// Load from TOML string.
    pub fn from_toml(s: &str) -> anyhow::Result<Self> {
        let c: ReaderConfig = toml::from_str(s)?;
        c.validate()?;
        Ok(c)
    }

    /// Load from file path.
    pub fn load_path(path: &std::path::Path) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("read config {:?}: {}", path, e))?;
        Self::from_toml(&s)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.narration.command.trim().is_empty() {
            anyhow::bail!("narration.command must not be empty");
        }
        if self.narration.timeout_secs == 0 {
            anyhow::bail!("narration.timeout_secs must be greater than zero");
        }
        if self.playback.tick_ms == 0 {
            anyhow::bail!("playback.tick_ms must be greater than zero");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let c = ReaderConfig::from_toml("").unwrap();
        assert_eq!(c, ReaderConfig::default());
        assert_eq!(c.narration.command, DEFAULT_COMMAND);
        assert_eq!(c.narration.timeout(), Duration::from_secs(10));
        assert_eq!(c.playback.tick(), Duration::from_millis(100));
        assert_eq!(c.playback.pacing, Pacing::Fixed);
        assert!(c.playback.autoplay);
    }

    #[test]
    fn from_toml_full() {
        let s = r#"
[narration]
command = "espeak-ng"
args = ["-s", "160"]
timeout_secs = 4

[playback]
tick_ms = 250
pacing = "words"
autoplay = false
"#;
        let c = ReaderConfig::from_toml(s).unwrap();
        assert_eq!(c.narration.command, "espeak-ng");
        assert_eq!(c.narration.args, &["-s", "160"]);
        assert_eq!(c.narration.timeout_secs, 4);
        assert_eq!(c.playback.tick_ms, 250);
        assert_eq!(c.playback.pacing, Pacing::Words);
        assert!(!c.playback.autoplay);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let c = ReaderConfig::from_toml("[playback]\ntick_ms = 50\n").unwrap();
        assert_eq!(c.playback.tick_ms, 50);
        assert!(c.playback.autoplay);
        assert_eq!(c.narration, NarrationConfig::default());
    }

    #[test]
    fn from_toml_invalid_fails() {
        assert!(ReaderConfig::from_toml("invalid = [").is_err());
        assert!(ReaderConfig::from_toml("[playback]\npacing = \"sometimes\"").is_err());
        assert!(ReaderConfig::from_toml("[narration]\ntimeout_secs = 0").is_err());
        assert!(ReaderConfig::from_toml("[playback]\ntick_ms = 0").is_err());
        assert!(ReaderConfig::from_toml("[narration]\ncommand = \" \"").is_err());
    }

    #[test]
    fn pacing_from_str() {
        assert_eq!("fixed".parse::<Pacing>().unwrap(), Pacing::Fixed);
        assert_eq!("words".parse::<Pacing>().unwrap(), Pacing::Words);
        assert!("Words".parse::<Pacing>().is_err());
        assert_eq!(Pacing::Words.as_str(), "words");
    }

    #[test]
    fn load_path_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ReaderConfig::load_path(&dir.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().contains("nope.toml"));
    }
}
