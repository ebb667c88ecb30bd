//! Awesome Essays CLI: read an essay aloud, one line at a time, in the terminal.

mod args;
mod keys;
mod link;
mod source;
mod terminal;

use anyhow::{Context, Result};
use args::Cli;
use clap::Parser;
use essays_core::{Controller, Narrator, PlaybackHandle, ReaderConfig, StopReason};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use terminal::{TerminalGuard, TerminalPresenter};
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

/// Picked up from the working directory when `--config` is not given.
const DEFAULT_CONFIG: &str = "essays.toml";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;

    let config = load_config(&cli)?;
    let session = Arc::new(source::load_session(&cli)?);
    let narrator = Arc::new(
        Narrator::new(config.narration.command.clone())
            .with_args(config.narration.args.clone())
            .with_timeout(config.narration.timeout()),
    );
    tracing::info!(
        title = %session.essay.title,
        lines = session.document.len(),
        command = narrator.program(),
        pacing = config.playback.pacing.as_str(),
        "starting playback"
    );

    let guard = TerminalGuard::enter().context("set up terminal")?;
    let presenter = Arc::new(TerminalPresenter::new(&session.essay.title));
    let (controller, handle) =
        Controller::new(Arc::clone(&session), narrator, presenter, &config.playback);
    let playback = controller.spawn();

    let keys = tokio::task::spawn_blocking({
        let handle = handle.clone();
        let link = session.essay.link.clone();
        move || {
            let res = keys::run(&handle, link.as_deref());
            if res.is_err() {
                handle.quit();
            }
            res
        }
    });

    let joined = join_tasks(playback, keys, &handle).await;
    drop(guard);
    let reason = joined?;

    if reason == StopReason::Finished {
        eprintln!("Finished reading {}", session.essay.title);
    }
    Ok(())
}

/// Wait for playback, then for the key thread. If playback dies the key
/// thread is stopped through `handle` so it does not poll forever.
async fn join_tasks(
    playback: JoinHandle<StopReason>,
    keys: JoinHandle<Result<()>>,
    handle: &PlaybackHandle,
) -> Result<StopReason> {
    let reason = match playback.await {
        Ok(reason) => reason,
        Err(e) => {
            handle.quit();
            let _ = keys.await;
            return Err(e).context("playback task failed");
        }
    };
    keys.await
        .context("keyboard task failed")?
        .context("read keyboard")?;
    Ok(reason)
}

fn init_tracing(cli: &Cli) -> Result<()> {
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match &cli.log_file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("create log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        // The terminal belongs to the reader while playing.
        None => builder.with_writer(std::io::sink).init(),
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<ReaderConfig> {
    let path: Option<PathBuf> = match &cli.config {
        Some(p) => Some(p.clone()),
        None => Some(PathBuf::from(DEFAULT_CONFIG)).filter(|p| p.exists()),
    };
    let mut config = match path {
        Some(p) => ReaderConfig::load_path(&p)
            .with_context(|| format!("load config {}", p.display()))?,
        None => ReaderConfig::default(),
    };
    cli.apply_overrides(&mut config);
    config.validate()?;
    Ok(config)
}
