//! CueCard preview - plays a script headlessly and logs the reading cursor

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cuecard_engine::playback::{WordStyle, highlight_progress, word_styles};
use cuecard_engine::{
    DetachedFrameSink, DetachedMode, DetachedPlatform, ExitReason, FrameDescriptor, FrameSink,
    PlaybackPhase, SessionEvent, TeleprompterSession, TeleprompterSettings, TokioScheduler,
};

#[derive(Parser)]
#[command(name = "cuecard-preview")]
#[command(version)]
#[command(about = "Play a teleprompter script headlessly and log the reading cursor")]
struct Args {
    /// Script file with optional [time mm:ss] and [note ...] markers
    #[arg(value_name = "SCRIPT")]
    script: PathBuf,
    /// Settings JSON file (missing fields use defaults)
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,
    /// Reading pace in words per minute
    #[arg(long)]
    wpm: Option<u32>,
    /// Countdown length in seconds
    #[arg(long)]
    countdown: Option<u32>,
    /// Seconds to run before stopping
    #[arg(long, default_value_t = 15)]
    duration: u64,
    /// Mirror playback into a logging detached renderer
    #[arg(long)]
    detached: bool,
}

/// Detached renderer that logs a summary of every second of frames
struct LogFrames {
    frames: u64,
    frames_per_log: u64,
}

impl FrameSink for LogFrames {
    fn submit_frame(&mut self, frame: &FrameDescriptor) {
        self.frames += 1;
        if (self.frames - 1) % self.frames_per_log != 0 {
            return;
        }
        tracing::info!(
            "[pip] segment {:?} offset {:.1}px speed {:.1}px/s remaining {:?}",
            frame.segment_index,
            frame.scroll_offset,
            frame.scroll_speed,
            frame.remaining_seconds
        );
    }

    fn teardown(&mut self) {
        tracing::info!("[pip] closed after {} frames", self.frames);
    }
}

struct LogPlatform {
    frames_per_log: u64,
}

impl DetachedPlatform for LogPlatform {
    fn is_supported(&self) -> bool {
        true
    }

    fn open_sink(&self) -> Result<DetachedFrameSink> {
        Ok(DetachedFrameSink::PixelDriven(Box::new(LogFrames {
            frames: 0,
            frames_per_log: self.frames_per_log,
        })))
    }
}

fn load_settings(args: &Args) -> Result<TeleprompterSettings> {
    let mut settings = match &args.settings {
        Some(path) => TeleprompterSettings::load(path)?,
        None => TeleprompterSettings::default(),
    };
    if let Some(wpm) = args.wpm {
        settings.words_per_minute = wpm;
    }
    if let Some(countdown) = args.countdown {
        settings.countdown_seconds = countdown;
    }
    Ok(settings)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let settings = load_settings(&args)?;
    let script = std::fs::read_to_string(&args.script)
        .with_context(|| format!("Failed to read script {}", args.script.display()))?;
    let frames_per_log = (1000 / settings.tick_interval_ms).max(1);

    let scheduler = Arc::new(TokioScheduler::current()?);
    let session = TeleprompterSession::new(scheduler);
    let mut events = session.subscribe();
    let words_per_minute = settings.words_per_minute;
    session.configure(&script, settings)?;

    if args.detached {
        match session.enter_detached_mode(&LogPlatform { frames_per_log }) {
            DetachedMode::Entered => tracing::info!("Detached preview attached"),
            mode => tracing::warn!("Detached preview unavailable: {:?}", mode),
        }
    }

    let content = session.content();
    session.play();

    let deadline = tokio::time::sleep(Duration::from_secs(args.duration));
    tokio::pin!(deadline);
    let mut last_word = None;

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
            event = events.recv() => match event {
                Some(SessionEvent::StateChanged(state)) => match state.phase() {
                    PlaybackPhase::CountingDown => {
                        tracing::info!("Starting in {}...", state.countdown_value);
                    }
                    PlaybackPhase::Idle | PlaybackPhase::Paused => {}
                    PlaybackPhase::Playing => {
                        let index = state.current_word_index as usize;
                        if last_word == Some(index) {
                            continue;
                        }
                        last_word = Some(index);
                        let progress = highlight_progress(
                            state.elapsed_time_seconds,
                            words_per_minute,
                            state.is_playing,
                        );
                        let styles = word_styles(&content.words, progress);
                        let word = content.words.get(index);
                        if let (Some(word), Some(style)) = (word, styles.get(index)) {
                            let shade = match style {
                                WordStyle::Accent => "note".to_string(),
                                WordStyle::Faded(alpha) => format!("{:.2}", alpha),
                            };
                            tracing::info!(
                                "{:>7.2}s  #{:<4} {} [{}]",
                                state.elapsed_time_seconds,
                                index,
                                word.text,
                                shade
                            );
                        }
                    }
                },
                Some(event) => tracing::info!("{:?}", event),
                None => break,
            }
        }
    }

    if let Some(state) = session.exit_detached_mode(ExitReason::Requested) {
        tracing::info!(
            "Primary view resumes at {:.2}s (word {})",
            state.elapsed_time_seconds,
            state.current_word_index
        );
    }
    session.stop();
    Ok(())
}
