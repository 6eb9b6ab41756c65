//! Session event types
//!
//! - `SessionEvent` - published by the session to every subscriber
//! - `SurfaceEvent` - raised by the detached surface, fed back into the session
//!
//! ## Architecture
//! ```text
//! Session --[SessionEvent]--> subscribers (primary view, bridges, logs)
//! Session <--[SurfaceEvent]-- detached surface (PiP controls, lifecycle)
//! ```

use crate::playback::PlaybackState;

/// Why detached mode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The host asked to return to the primary view
    Requested,
    /// The user closed the detached surface
    SurfaceClosed,
    /// The session was stopped
    SessionStopped,
}

/// Events published by a session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// New script content was loaded
    Configured {
        word_count: usize,
        segment_count: usize,
        total_duration_seconds: Option<u32>,
    },
    /// A new state snapshot was published
    StateChanged(PlaybackState),
    /// A detached renderer was attached and cold-started
    DetachedModeEntered,
    /// The detached renderer was removed; `state` is the hand-back snapshot
    DetachedModeExited {
        reason: ExitReason,
        state: PlaybackState,
    },
}

/// Events raised by the detached surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// Surface (re)became visible and wants the current state
    Ready,
    /// Surface was closed by the user
    Closed,
    /// Play/pause control on the surface
    PlayPauseRequested,
    /// Restart control on the surface
    RestartRequested,
}

/// Sender for session events
pub type SessionEventSender = tokio::sync::mpsc::UnboundedSender<SessionEvent>;

/// Receiver for session events
pub type SessionEventReceiver = tokio::sync::mpsc::UnboundedReceiver<SessionEvent>;

/// Create a new session event channel
pub fn session_event_channel() -> (SessionEventSender, SessionEventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}
