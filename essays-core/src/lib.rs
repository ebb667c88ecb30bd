//! Awesome Essays core: document model, narrator, playback controller, catalog and config.

pub mod catalog;
pub mod config;
pub mod controller;
pub mod document;
pub mod error;
pub mod narrator;
pub mod presenter;
pub mod session;

pub use catalog::{Author, Catalog, EssayRecord};
pub use config::{NarrationConfig, Pacing, PlaybackConfig, ReaderConfig};
pub use controller::{Controller, Mode, PlaybackHandle};
pub use document::Document;
pub use error::CatalogError;
pub use narrator::{NarrationTask, Narrator, Outcome, DEFAULT_TIMEOUT};
pub use presenter::{Command, Presenter, StateChange, StopReason};
pub use session::{EssayMeta, Session};
