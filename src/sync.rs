//! Sync module - fan-out of playback state to renderers
//!
//! - `events`: session and surface event types and channels
//! - `synchronizer`: authoritative published state, subscribers, latest-value reader
//! - `detached`: detached (PiP) sinks, platform capability and frame descriptors

pub mod detached;
pub mod events;
mod synchronizer;

pub use detached::{
    DetachedFrameSink, DetachedMode, DetachedPlatform, DetachedRenderer, FrameDescriptor,
    FrameSink, NoDetachedPlatform, StateSink,
};
pub use events::{
    ExitReason, SessionEvent, SessionEventReceiver, SessionEventSender, SurfaceEvent,
    session_event_channel,
};
pub use synchronizer::{StateReader, StateSynchronizer};
