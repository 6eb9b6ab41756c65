//! Playback state synchronizer
//!
//! Holds the authoritative published `PlaybackState` and fans every publish
//! out to:
//! - subscribers (`SessionEvent` channels), pruned once their receiver is gone
//! - the latest-value slot read by `StateReader`
//! - the detached renderer, when one is attached
//!
//! Renderers only ever see copies; nothing downstream can write back.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::playback::PlaybackState;
use crate::script::TeleprompterContent;

use super::detached::{DetachedRenderer, FrameDescriptor};
use super::events::{
    ExitReason, SessionEvent, SessionEventReceiver, SessionEventSender, session_event_channel,
};

#[derive(Debug, Clone, Copy, Default)]
struct Published {
    state: PlaybackState,
    version: u64,
}

/// Non-blocking latest-value reader
///
/// For render loops that pump at their own frame rate. Reads never wait on
/// the session and may observe the same snapshot repeatedly.
#[derive(Clone)]
pub struct StateReader {
    inner: Arc<RwLock<Published>>,
}

impl std::fmt::Debug for StateReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("StateReader")
            .field("state", &inner.state)
            .field("version", &inner.version)
            .finish()
    }
}

impl StateReader {
    /// Latest published state
    pub fn get(&self) -> PlaybackState {
        self.inner.read().state
    }

    /// Number of publishes so far
    pub fn version(&self) -> u64 {
        self.inner.read().version
    }

    /// Latest state, only if something was published after `version`
    pub fn changed_since(&self, version: u64) -> Option<(PlaybackState, u64)> {
        let inner = self.inner.read();
        (inner.version > version).then_some((inner.state, inner.version))
    }
}

#[derive(Default)]
pub struct StateSynchronizer {
    latest: Arc<RwLock<Published>>,
    subscribers: Vec<SessionEventSender>,
    detached: Option<DetachedRenderer>,
}

impl std::fmt::Debug for StateSynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateSynchronizer")
            .field("latest", &self.latest.read().state)
            .field("subscribers", &self.subscribers.len())
            .field("detached", &self.detached)
            .finish()
    }
}

impl StateSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reader(&self) -> StateReader {
        StateReader {
            inner: self.latest.clone(),
        }
    }

    /// Last published state
    pub fn latest(&self) -> PlaybackState {
        self.latest.read().state
    }

    pub fn subscribe(&mut self) -> SessionEventReceiver {
        let (tx, rx) = session_event_channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Send an event to every live subscriber, dropping closed ones
    pub fn broadcast(&mut self, event: SessionEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Replace the published state and fan it out
    ///
    /// `frame` is only evaluated when a pixel-driven renderer is attached.
    pub fn publish(&mut self, state: PlaybackState, frame: impl FnOnce() -> FrameDescriptor) {
        {
            let mut latest = self.latest.write();
            latest.state = state;
            latest.version += 1;
        }

        if let Some(renderer) = self.detached.as_mut() {
            renderer.push(&state, frame);
        }

        self.broadcast(SessionEvent::StateChanged(state));
    }

    pub fn is_detached(&self) -> bool {
        self.detached.is_some()
    }

    pub fn detached_mut(&mut self) -> Option<&mut DetachedRenderer> {
        self.detached.as_mut()
    }

    /// Attach a renderer and cold-start it with the latest state
    pub fn attach(
        &mut self,
        mut renderer: DetachedRenderer,
        content: &Arc<TeleprompterContent>,
        frame: &FrameDescriptor,
    ) {
        let state = self.latest();
        renderer.cold_start(content, &state, frame);
        self.detached = Some(renderer);
        tracing::info!("Detached renderer attached");
        self.broadcast(SessionEvent::DetachedModeEntered);
    }

    /// Tear down the renderer and hand the last published state back
    ///
    /// Returns `None` when no renderer was attached.
    pub fn detach(&mut self, reason: ExitReason) -> Option<PlaybackState> {
        let renderer = self.detached.take()?;
        let pushed = renderer.frames_pushed();
        renderer.teardown();

        let state = self.latest();
        tracing::info!(
            "Detached renderer removed ({:?}) after {} pushes",
            reason,
            pushed
        );
        self.broadcast(SessionEvent::DetachedModeExited { reason, state });
        Some(state)
    }

    /// Drop every subscriber so their receivers end
    pub fn close_subscribers(&mut self) {
        self.subscribers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::SegmentTimeline;
    use crate::script::build_content;
    use crate::settings::TeleprompterSettings;
    use crate::sync::detached::{DetachedFrameSink, StateSink};
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Seen {
        cold_starts: Vec<PlaybackState>,
        pushes: Vec<PlaybackState>,
        torn_down: bool,
    }

    struct RecordingState(Arc<Mutex<Seen>>);

    impl StateSink for RecordingState {
        fn on_cold_start(&mut self, _content: &Arc<TeleprompterContent>, state: &PlaybackState) {
            self.0.lock().cold_starts.push(*state);
        }

        fn push_state(&mut self, state: &PlaybackState) {
            self.0.lock().pushes.push(*state);
        }

        fn teardown(&mut self) {
            self.0.lock().torn_down = true;
        }
    }

    fn playing(elapsed: f64) -> PlaybackState {
        PlaybackState {
            elapsed_time_seconds: elapsed,
            is_playing: true,
            ..Default::default()
        }
    }

    fn frame(state: &PlaybackState) -> FrameDescriptor {
        FrameDescriptor::compose(
            state,
            &TeleprompterSettings::default(),
            &SegmentTimeline::default(),
        )
    }

    #[test]
    fn test_publish_reaches_subscribers_and_reader() {
        let mut sync = StateSynchronizer::new();
        let mut rx = sync.subscribe();
        let reader = sync.reader();
        assert_eq!(reader.version(), 0);

        let state = playing(1.0);
        sync.publish(state, || frame(&state));

        assert_eq!(rx.try_recv().unwrap(), SessionEvent::StateChanged(state));
        assert_eq!(reader.get(), state);
        assert_eq!(reader.changed_since(0), Some((state, 1)));
        assert_eq!(reader.changed_since(1), None);
    }

    #[test]
    fn test_closed_subscribers_pruned() {
        let mut sync = StateSynchronizer::new();
        let rx = sync.subscribe();
        let _kept = sync.subscribe();
        drop(rx);

        sync.publish(PlaybackState::default(), || frame(&PlaybackState::default()));
        assert_eq!(sync.subscriber_count(), 1);
    }

    #[test]
    fn test_cold_start_and_hand_back() {
        let seen = Arc::new(Mutex::new(Seen::default()));
        let content = Arc::new(build_content("one two"));
        let mut sync = StateSynchronizer::new();
        let mut rx = sync.subscribe();

        let before = playing(2.0);
        sync.publish(before, || frame(&before));

        let renderer = DetachedRenderer::new(DetachedFrameSink::StateDriven(Box::new(
            RecordingState(seen.clone()),
        )));
        sync.attach(renderer, &content, &frame(&before));
        assert!(sync.is_detached());
        assert_eq!(seen.lock().cold_starts, vec![before]);

        let after = playing(3.0);
        sync.publish(after, || frame(&after));
        assert_eq!(seen.lock().pushes, vec![after]);

        assert_eq!(sync.detach(ExitReason::Requested), Some(after));
        assert!(seen.lock().torn_down);
        assert_eq!(sync.detach(ExitReason::Requested), None);

        let events: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
        assert_eq!(
            events,
            vec![
                SessionEvent::StateChanged(before),
                SessionEvent::DetachedModeEntered,
                SessionEvent::StateChanged(after),
                SessionEvent::DetachedModeExited {
                    reason: ExitReason::Requested,
                    state: after,
                },
            ]
        );
    }

    #[test]
    fn test_frame_not_built_for_state_sinks() {
        let seen = Arc::new(Mutex::new(Seen::default()));
        let content = Arc::new(build_content("one"));
        let mut sync = StateSynchronizer::new();
        let initial = PlaybackState::default();
        sync.attach(
            DetachedRenderer::new(DetachedFrameSink::StateDriven(Box::new(RecordingState(seen)))),
            &content,
            &frame(&initial),
        );

        sync.publish(playing(1.0), || panic!("frame requested for a state-driven sink"));
    }

    #[test]
    fn test_close_subscribers_ends_streams() {
        let mut sync = StateSynchronizer::new();
        let mut rx = sync.subscribe();
        sync.close_subscribers();
        assert!(matches!(
            rx.try_recv(),
            Err(tokio::sync::mpsc::error::TryRecvError::Disconnected)
        ));
    }
}
