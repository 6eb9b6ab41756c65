//! CueCard engine - script timing and synchronized playback for a teleprompter
//!
//! - `script`: annotated script parsing (`[time mm:ss]`, `[note ...]`)
//! - `settings`: session settings
//! - `playback`: clock, countdown, word progress, scroll speed, schedulers
//! - `sync`: state fan-out to subscribers and detached (PiP) renderers
//! - `session`: `TeleprompterSession`, the object hosts drive

pub mod playback;
pub mod script;
pub mod session;
pub mod settings;
pub mod sync;

pub use playback::{ManualScheduler, PlaybackPhase, PlaybackState, Scheduler, TokioScheduler};
pub use script::{TeleprompterContent, build_content};
pub use session::TeleprompterSession;
pub use settings::TeleprompterSettings;
pub use sync::{
    DetachedFrameSink, DetachedMode, DetachedPlatform, ExitReason, FrameDescriptor, FrameSink,
    SessionEvent, StateSink, SurfaceEvent,
};
