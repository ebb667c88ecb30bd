//! Open an essay's link with the platform's default URL handler.

use std::io;
use tracing::{debug, warn};

/// Fire and forget; playback is unaffected either way.
pub fn open(url: &str) {
    launch(url, |u| open::that_detached(u));
}

fn launch(url: &str, opener: impl FnOnce(&str) -> io::Result<()>) -> bool {
    match opener(url) {
        Ok(()) => {
            debug!(url, "opening link");
            true
        }
        Err(e) => {
            warn!(url, error = %e, "failed to open link");
            false
        }
    }
}
