//! Teleprompter session
//!
//! `TeleprompterSession` is the one object a host creates per teleprompter:
//! it owns the playback engine, the state synchronizer and a scheduler
//! handle. It is a cheap `Clone` handle; all clones drive the same session.
//!
//! ## Timers
//! At most one timer runs at a time: the once-per-second countdown timer or
//! the playback tick timer. Every tick carries the id it was scheduled under
//! and is dropped unless that id is still the active one, so ticks delivered
//! late after a pause, restart or stop change nothing.

use std::sync::{Arc, Weak};
use std::time::Duration;

use anyhow::{Result, bail};
use parking_lot::Mutex;

use crate::playback::{
    PlaybackEngine, PlaybackState, Scheduler, TickCallback, TimerEffect, TimerId, Transition,
};
use crate::script::{TeleprompterContent, build_content};
use crate::settings::TeleprompterSettings;
use crate::sync::{
    DetachedMode, DetachedPlatform, DetachedRenderer, ExitReason, FrameDescriptor, SessionEvent,
    SessionEventReceiver, StateReader, StateSynchronizer, SurfaceEvent,
};

/// Countdown timer period
const COUNTDOWN_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerKind {
    Countdown,
    Clock,
}

#[derive(Debug, Clone, Copy)]
struct ActiveTimer {
    id: TimerId,
    kind: TimerKind,
}

#[derive(Debug)]
struct SessionCore {
    engine: PlaybackEngine,
    sync: StateSynchronizer,
    timer: Option<ActiveTimer>,
    stopped: bool,
}

impl SessionCore {
    fn frame(&self) -> FrameDescriptor {
        FrameDescriptor::compose(
            &self.engine.snapshot(),
            self.engine.settings(),
            self.engine.timeline(),
        )
    }

    fn publish(&mut self) {
        let state = self.engine.snapshot();
        let engine = &self.engine;
        self.sync.publish(state, || {
            FrameDescriptor::compose(&state, engine.settings(), engine.timeline())
        });
    }

    /// Measure segments with a pixel-driven renderer, if one is attached
    fn remeasure(&mut self) {
        let content = self.engine.content().clone();
        let font_size = self.engine.settings().font_size;
        let heights = self
            .sync
            .detached_mut()
            .and_then(|renderer| renderer.measure(&content.segments.segments, font_size));
        if let Some(heights) = heights {
            self.engine.set_segment_heights(&heights);
        }
    }
}

struct SessionInner {
    core: Mutex<SessionCore>,
    scheduler: Arc<dyn Scheduler>,
}

impl SessionInner {
    fn cancel_timer(&self, core: &mut SessionCore) {
        if let Some(timer) = core.timer.take() {
            self.scheduler.cancel(timer.id);
        }
    }

    fn start_timer(self: &Arc<Self>, core: &mut SessionCore, kind: TimerKind) {
        self.cancel_timer(core);

        let interval = match kind {
            TimerKind::Countdown => COUNTDOWN_INTERVAL,
            TimerKind::Clock => core.engine.settings().tick_interval(),
        };
        let weak: Weak<SessionInner> = Arc::downgrade(self);
        let callback: TickCallback = Arc::new(move |id| {
            if let Some(inner) = weak.upgrade() {
                inner.on_tick(id);
            }
        });

        let id = self.scheduler.schedule_repeating(interval, callback);
        core.timer = Some(ActiveTimer { id, kind });
    }

    /// Apply a transition's timer effect, then publish if needed
    fn apply(self: &Arc<Self>, core: &mut SessionCore, transition: Transition) {
        match transition.timer {
            TimerEffect::Keep => {}
            TimerEffect::Stop => self.cancel_timer(core),
            TimerEffect::StartCountdown => self.start_timer(core, TimerKind::Countdown),
            TimerEffect::StartClock => self.start_timer(core, TimerKind::Clock),
        }

        if transition.publish {
            core.publish();
        }
    }

    fn on_tick(self: &Arc<Self>, id: TimerId) {
        let mut core = self.core.lock();
        let Some(active) = core.timer.filter(|timer| timer.id == id) else {
            return;
        };
        if core.stopped {
            return;
        }

        let transition = match active.kind {
            TimerKind::Countdown => core.engine.tick_countdown(),
            TimerKind::Clock => core.engine.tick_clock(),
        };
        self.apply(&mut core, transition);
    }

    /// Run a control action against the engine
    fn control(self: &Arc<Self>, action: impl FnOnce(&mut PlaybackEngine) -> Transition) {
        let mut core = self.core.lock();
        if core.stopped {
            tracing::debug!("Ignoring control action on a stopped session");
            return;
        }
        let transition = action(&mut core.engine);
        self.apply(&mut core, transition);
    }
}

impl Drop for SessionInner {
    fn drop(&mut self) {
        if let Some(timer) = self.core.get_mut().timer.take() {
            self.scheduler.cancel(timer.id);
        }
    }
}

/// Handle to one teleprompter session
#[derive(Clone)]
pub struct TeleprompterSession {
    inner: Arc<SessionInner>,
}

impl std::fmt::Debug for TeleprompterSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeleprompterSession")
            .field("core", &*self.inner.core.lock())
            .finish()
    }
}

impl TeleprompterSession {
    /// Create an idle session with an empty script and default settings
    pub fn new(scheduler: Arc<dyn Scheduler>) -> Self {
        let engine = PlaybackEngine::new(
            Arc::new(TeleprompterContent::default()),
            TeleprompterSettings::default(),
        );
        Self {
            inner: Arc::new(SessionInner {
                core: Mutex::new(SessionCore {
                    engine,
                    sync: StateSynchronizer::new(),
                    timer: None,
                    stopped: false,
                }),
                scheduler,
            }),
        }
    }

    // ============ Setup ============

    /// Load a script and settings, resetting playback to the start
    ///
    /// An attached detached renderer is cold-started again with the new
    /// content.
    pub fn configure(&self, script: &str, settings: TeleprompterSettings) -> Result<()> {
        settings.validate()?;

        let mut core = self.inner.core.lock();
        if core.stopped {
            bail!("Cannot configure a stopped session");
        }

        let content = Arc::new(build_content(script));
        self.inner.cancel_timer(&mut core);
        core.engine = PlaybackEngine::new(content.clone(), settings);
        core.remeasure();

        tracing::info!(
            "Session configured: {} words, {} segments, {} wpm",
            content.word_count(),
            content.segments.len(),
            core.engine.settings().words_per_minute
        );
        core.sync.broadcast(SessionEvent::Configured {
            word_count: content.word_count(),
            segment_count: content.segments.len(),
            total_duration_seconds: content.segments.total_duration_seconds,
        });
        core.publish();

        if core.sync.is_detached() {
            let state = core.engine.snapshot();
            let frame = core.frame();
            if let Some(renderer) = core.sync.detached_mut() {
                renderer.cold_start(&content, &state, &frame);
            }
        }

        Ok(())
    }

    // ============ Playback Control ============

    pub fn play(&self) {
        self.inner.control(PlaybackEngine::play);
    }

    pub fn pause(&self) {
        self.inner.control(PlaybackEngine::pause);
    }

    pub fn toggle_play_pause(&self) {
        self.inner.control(PlaybackEngine::toggle_play_pause);
    }

    pub fn restart(&self) {
        self.inner.control(PlaybackEngine::restart);
    }

    /// Jump ahead by ten seconds worth of words
    pub fn seek_forward(&self) {
        self.inner.control(PlaybackEngine::seek_forward);
    }

    /// Jump back by ten seconds worth of words
    pub fn seek_backward(&self) {
        self.inner.control(PlaybackEngine::seek_backward);
    }

    /// Cancel all timers and tear down the detached renderer
    ///
    /// The session ignores every later control action. Subscriber channels
    /// close after the final events. Calling `stop` again does nothing.
    pub fn stop(&self) {
        let mut core = self.inner.core.lock();
        if core.stopped {
            return;
        }

        self.inner.cancel_timer(&mut core);
        let transition = core.engine.pause();
        if transition.publish {
            core.publish();
        }
        core.sync.detach(ExitReason::SessionStopped);
        core.sync.close_subscribers();
        core.stopped = true;
        tracing::info!("Session stopped");
    }

    // ============ State ============

    /// Receive every event published from now on
    pub fn subscribe(&self) -> SessionEventReceiver {
        self.inner.core.lock().sync.subscribe()
    }

    /// Latest-value reader for render loops
    pub fn state_reader(&self) -> StateReader {
        self.inner.core.lock().sync.reader()
    }

    /// Current playback state
    pub fn state(&self) -> PlaybackState {
        self.inner.core.lock().engine.snapshot()
    }

    pub fn content(&self) -> Arc<TeleprompterContent> {
        self.inner.core.lock().engine.content().clone()
    }

    pub fn settings(&self) -> TeleprompterSettings {
        self.inner.core.lock().engine.settings().clone()
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.core.lock().stopped
    }

    /// Frame descriptor for the current state
    pub fn detached_frame(&self) -> FrameDescriptor {
        self.inner.core.lock().frame()
    }

    // ============ Detached Mode ============

    pub fn is_detached(&self) -> bool {
        self.inner.core.lock().sync.is_detached()
    }

    /// Open a detached surface and cold-start it with the latest state
    ///
    /// Platforms that cannot show a surface, or fail to open one, yield
    /// `DetachedMode::Unsupported` and the primary view stays in charge.
    pub fn enter_detached_mode(&self, platform: &dyn DetachedPlatform) -> DetachedMode {
        let mut core = self.inner.core.lock();
        if core.stopped {
            return DetachedMode::Unsupported;
        }
        if core.sync.is_detached() {
            return DetachedMode::AlreadyActive;
        }
        if !platform.is_supported() {
            tracing::info!("Detached mode not supported on this platform");
            return DetachedMode::Unsupported;
        }

        let sink = match platform.open_sink() {
            Ok(sink) => sink,
            Err(e) => {
                tracing::warn!("Failed to open detached surface: {:#}", e);
                return DetachedMode::Unsupported;
            }
        };
        tracing::debug!("Opened detached sink: {:?}", sink);

        let content = core.engine.content().clone();
        let mut renderer = DetachedRenderer::new(sink);
        let font_size = core.engine.settings().font_size;
        if let Some(heights) = renderer.measure(&content.segments.segments, font_size) {
            core.engine.set_segment_heights(&heights);
        }

        let frame = core.frame();
        core.sync.attach(renderer, &content, &frame);

        DetachedMode::Entered
    }

    /// Leave detached mode, returning the state the primary view resumes from
    ///
    /// Returns `None` when detached mode was not active.
    pub fn exit_detached_mode(&self, reason: ExitReason) -> Option<PlaybackState> {
        self.inner.core.lock().sync.detach(reason)
    }

    /// Feed an event raised by the detached surface
    pub fn handle_surface_event(&self, event: SurfaceEvent) {
        tracing::debug!("Surface event: {:?}", event);
        match event {
            SurfaceEvent::Ready => {
                let mut core = self.inner.core.lock();
                let content = core.engine.content().clone();
                let state = core.engine.snapshot();
                let frame = core.frame();
                if let Some(renderer) = core.sync.detached_mut() {
                    renderer.cold_start(&content, &state, &frame);
                }
            }
            SurfaceEvent::Closed => {
                self.exit_detached_mode(ExitReason::SurfaceClosed);
            }
            SurfaceEvent::PlayPauseRequested => self.toggle_play_pause(),
            SurfaceEvent::RestartRequested => self.restart(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::ManualScheduler;
    use crate::script::Segment;
    use crate::settings::MAX_WORDS_PER_MINUTE;
    use crate::sync::{DetachedFrameSink, FrameSink, NoDetachedPlatform, StateSink};

    fn session(
        script: &str,
        wpm: u32,
        countdown: u32,
    ) -> (TeleprompterSession, Arc<ManualScheduler>) {
        let scheduler = Arc::new(ManualScheduler::new());
        let session = TeleprompterSession::new(scheduler.clone());
        let settings = TeleprompterSettings {
            words_per_minute: wpm,
            countdown_seconds: countdown,
            tick_interval_ms: 100,
            ..Default::default()
        };
        session.configure(script, settings).unwrap();
        (session, scheduler)
    }

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
    }

    fn drain(rx: &mut SessionEventReceiver) -> Vec<SessionEvent> {
        std::iter::from_fn(|| rx.try_recv().ok()).collect()
    }

    fn states(events: &[SessionEvent]) -> Vec<PlaybackState> {
        events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::StateChanged(state) => Some(*state),
                _ => None,
            })
            .collect()
    }

    #[derive(Default)]
    struct Seen {
        cold_starts: usize,
        states: Vec<PlaybackState>,
        frames: Vec<FrameDescriptor>,
        torn_down: usize,
    }

    struct StateSurface(Arc<Mutex<Seen>>);

    impl StateSink for StateSurface {
        fn on_cold_start(&mut self, _content: &Arc<TeleprompterContent>, state: &PlaybackState) {
            let mut seen = self.0.lock();
            seen.cold_starts += 1;
            seen.states.push(*state);
        }

        fn push_state(&mut self, state: &PlaybackState) {
            self.0.lock().states.push(*state);
        }

        fn teardown(&mut self) {
            self.0.lock().torn_down += 1;
        }
    }

    struct PixelSurface(Arc<Mutex<Seen>>);

    impl FrameSink for PixelSurface {
        fn measure_segment(&mut self, _segment: &Segment, _font_size: u32) -> Option<f32> {
            Some(100.0)
        }

        fn submit_frame(&mut self, frame: &FrameDescriptor) {
            self.0.lock().frames.push(frame.clone());
        }

        fn teardown(&mut self) {
            self.0.lock().torn_down += 1;
        }
    }

    enum Surface {
        State,
        Pixel,
        Broken,
    }

    struct TestPlatform {
        surface: Surface,
        seen: Arc<Mutex<Seen>>,
    }

    impl TestPlatform {
        fn new(surface: Surface) -> Self {
            Self {
                surface,
                seen: Arc::new(Mutex::new(Seen::default())),
            }
        }
    }

    impl DetachedPlatform for TestPlatform {
        fn is_supported(&self) -> bool {
            true
        }

        fn open_sink(&self) -> Result<DetachedFrameSink> {
            match self.surface {
                Surface::State => Ok(DetachedFrameSink::StateDriven(Box::new(StateSurface(
                    self.seen.clone(),
                )))),
                Surface::Pixel => Ok(DetachedFrameSink::PixelDriven(Box::new(PixelSurface(
                    self.seen.clone(),
                )))),
                Surface::Broken => bail!("surface refused to open"),
            }
        }
    }

    #[test]
    fn test_configure_publishes_initial_state() {
        let scheduler = Arc::new(ManualScheduler::new());
        let session = TeleprompterSession::new(scheduler);
        let mut rx = session.subscribe();

        session
            .configure("[time 00:30]Intro words", TeleprompterSettings::default())
            .unwrap();

        let events = drain(&mut rx);
        assert_eq!(
            events[0],
            SessionEvent::Configured {
                word_count: 2,
                segment_count: 1,
                total_duration_seconds: Some(30),
            }
        );
        assert_eq!(states(&events), vec![PlaybackState::default()]);
    }

    #[test]
    fn test_configure_rejects_zero_pace() {
        let scheduler = Arc::new(ManualScheduler::new());
        let session = TeleprompterSession::new(scheduler);
        let settings = TeleprompterSettings {
            words_per_minute: 0,
            ..Default::default()
        };
        assert!(session.configure("hello", settings).is_err());
    }

    #[test]
    fn test_three_second_countdown() {
        let (session, scheduler) = session(&words(10), 150, 3);
        let mut rx = session.subscribe();

        session.play();
        let state = session.state();
        assert!(state.is_counting_down);
        assert_eq!(state.countdown_value, 3);

        scheduler.advance(Duration::from_secs(1));
        assert_eq!(session.state().countdown_value, 2);
        scheduler.advance(Duration::from_secs(1));
        assert_eq!(session.state().countdown_value, 1);
        scheduler.advance(Duration::from_secs(1));

        let state = session.state();
        assert!(state.is_playing);
        assert!(!state.is_counting_down);
        assert_eq!(state.countdown_value, 0);
        assert_eq!(state.elapsed_time_seconds, 0.0);

        let published = states(&drain(&mut rx));
        let countdowns: Vec<u32> = published.iter().map(|s| s.countdown_value).collect();
        assert_eq!(countdowns, vec![3, 2, 1, 0]);
        assert!(published.iter().all(|s| !(s.is_playing && s.is_counting_down)));

        // Only the clock timer is left
        assert_eq!(scheduler.active_timers(), 1);
    }

    #[test]
    fn test_ticks_advance_cursor() {
        // 120 wpm = 2 words per second, 100ms ticks
        let (session, scheduler) = session(&words(50), 120, 0);
        session.play();
        scheduler.advance(Duration::from_secs(5));

        let state = session.state();
        assert!((state.elapsed_time_seconds - 5.0).abs() < 1e-9);
        assert_eq!(state.current_word_index, 10);
    }

    #[test]
    fn test_pause_stops_ticks() {
        let (session, scheduler) = session(&words(50), 120, 0);
        session.play();
        scheduler.advance(Duration::from_secs(2));
        session.pause();
        let paused = session.state();

        scheduler.advance(Duration::from_secs(5));
        assert_eq!(session.state(), paused);
        assert_eq!(scheduler.active_timers(), 0);

        // Resuming continues without a countdown and without catch-up
        session.play();
        scheduler.advance(Duration::from_secs(1));
        let resumed = session.state();
        assert!((resumed.elapsed_time_seconds - (paused.elapsed_time_seconds + 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_pause_during_countdown_resets_to_idle() {
        let (session, scheduler) = session(&words(5), 150, 3);
        session.play();
        scheduler.advance(Duration::from_secs(1));
        session.pause();

        assert_eq!(session.state(), PlaybackState::default());
        scheduler.advance(Duration::from_secs(10));
        assert_eq!(session.state(), PlaybackState::default());

        session.play();
        assert_eq!(session.state().countdown_value, 3);
    }

    #[test]
    fn test_seek_bounds() {
        let (session, _scheduler) = session(&words(30), 120, 0);

        session.seek_backward();
        assert_eq!(session.state().current_word_index, 0);

        session.seek_forward();
        assert_eq!(session.state().current_word_index, 20);
        session.seek_forward();
        assert_eq!(session.state().current_word_index, 29);
        session.seek_backward();
        assert_eq!(session.state().current_word_index, 9);
        assert_eq!(session.state().elapsed_time_seconds, 4.5);
    }

    #[test]
    fn test_seek_at_fastest_pace() {
        let (session, _scheduler) = session(&words(30), MAX_WORDS_PER_MINUTE, 0);
        session.seek_forward();
        assert_eq!(session.state().current_word_index, 29);
        session.seek_backward();
        assert_eq!(session.state().current_word_index, 0);

        let too_fast = TeleprompterSettings {
            words_per_minute: 500_000_000,
            ..Default::default()
        };
        assert!(session.configure("one two", too_fast).is_err());
        assert_eq!(session.content().word_count(), 30);
    }

    #[test]
    fn test_noop_seek_does_not_publish() {
        let (session, _scheduler) = session(&words(3), 120, 0);
        let mut rx = session.subscribe();
        session.seek_backward();
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_restart_during_playback() {
        let (session, scheduler) = session(&words(30), 120, 0);
        session.play();
        scheduler.advance(Duration::from_secs(3));
        session.restart();

        assert_eq!(session.state(), PlaybackState::default());
        assert_eq!(scheduler.active_timers(), 0);
        scheduler.advance(Duration::from_secs(3));
        assert_eq!(session.state(), PlaybackState::default());
    }

    #[test]
    fn test_reader_tracks_publishes() {
        let (session, scheduler) = session(&words(30), 120, 0);
        let reader = session.state_reader();
        let version = reader.version();

        session.play();
        scheduler.advance(Duration::from_millis(500));
        let (state, _) = reader.changed_since(version).unwrap();
        assert_eq!(state, session.state());
    }

    #[test]
    fn test_zero_word_session_plays() {
        let (session, scheduler) = session("", 150, 0);
        session.play();
        scheduler.advance(Duration::from_secs(2));
        assert_eq!(session.state().current_word_index, 0);
        assert!(session.state().is_playing);
    }

    #[test]
    fn test_state_driven_cold_start_and_hand_back() {
        let (session, scheduler) = session(&words(30), 120, 0);
        session.play();
        scheduler.advance(Duration::from_secs(1));
        let before = session.state();

        let platform = TestPlatform::new(Surface::State);
        assert_eq!(session.enter_detached_mode(&platform), DetachedMode::Entered);
        assert_eq!(session.enter_detached_mode(&platform), DetachedMode::AlreadyActive);
        {
            let seen = platform.seen.lock();
            assert_eq!(seen.cold_starts, 1);
            assert_eq!(seen.states, vec![before]);
        }

        scheduler.advance(Duration::from_secs(1));
        let last = session.state();
        assert_eq!(platform.seen.lock().states.last(), Some(&last));

        session.pause();
        let handed_back = session.exit_detached_mode(ExitReason::Requested).unwrap();
        assert_eq!(handed_back, session.state());
        assert_eq!(platform.seen.lock().torn_down, 1);
        assert!(session.exit_detached_mode(ExitReason::Requested).is_none());
    }

    #[test]
    fn test_pixel_driven_frames_use_measured_heights() {
        // Two 10s segments, measured at 100px each
        let script = "[time 00:10]alpha beta\n[time 00:10]gamma delta";
        let (session, scheduler) = session(script, 120, 0);
        let platform = TestPlatform::new(Surface::Pixel);
        assert_eq!(session.enter_detached_mode(&platform), DetachedMode::Entered);

        session.play();
        scheduler.advance(Duration::from_secs(15));

        let frame = platform.seen.lock().frames.last().cloned().unwrap();
        assert_eq!(frame.segment_index, Some(1));
        assert_eq!(frame.scroll_speed, 10.0);
        assert!((frame.scroll_offset - 150.0).abs() < 1e-2);
        assert_eq!(session.detached_frame(), frame);
    }

    #[test]
    fn test_surface_events() {
        let (session, scheduler) = session(&words(30), 120, 0);
        let platform = TestPlatform::new(Surface::State);
        session.enter_detached_mode(&platform);

        session.handle_surface_event(SurfaceEvent::PlayPauseRequested);
        assert!(session.state().is_playing);
        scheduler.advance(Duration::from_secs(1));

        session.handle_surface_event(SurfaceEvent::Ready);
        assert_eq!(platform.seen.lock().cold_starts, 2);

        session.handle_surface_event(SurfaceEvent::RestartRequested);
        assert_eq!(session.state(), PlaybackState::default());

        let mut rx = session.subscribe();
        session.handle_surface_event(SurfaceEvent::Closed);
        assert!(!session.is_detached());
        assert_eq!(
            drain(&mut rx),
            vec![SessionEvent::DetachedModeExited {
                reason: ExitReason::SurfaceClosed,
                state: PlaybackState::default(),
            }]
        );
    }

    #[test]
    fn test_unsupported_platforms() {
        let (session, _scheduler) = session("hello", 150, 0);
        assert_eq!(
            session.enter_detached_mode(&NoDetachedPlatform),
            DetachedMode::Unsupported
        );

        let broken = TestPlatform::new(Surface::Broken);
        assert_eq!(session.enter_detached_mode(&broken), DetachedMode::Unsupported);
        assert!(!session.is_detached());
    }

    #[test]
    fn test_stop_is_idempotent() {
        let (session, scheduler) = session(&words(30), 120, 0);
        let platform = TestPlatform::new(Surface::State);
        session.enter_detached_mode(&platform);
        let mut rx = session.subscribe();

        session.play();
        scheduler.advance(Duration::from_secs(1));
        session.stop();
        session.stop();

        assert!(session.is_stopped());
        assert!(!session.state().is_playing);
        assert_eq!(scheduler.active_timers(), 0);
        assert_eq!(platform.seen.lock().torn_down, 1);

        // Later actions and late ticks change nothing
        let stopped = session.state();
        session.play();
        scheduler.advance(Duration::from_secs(5));
        assert_eq!(session.state(), stopped);
        assert!(session.configure("again", TeleprompterSettings::default()).is_err());

        let events = drain(&mut rx);
        assert!(matches!(
            events.last(),
            Some(SessionEvent::DetachedModeExited {
                reason: ExitReason::SessionStopped,
                ..
            })
        ));
        assert!(matches!(
            rx.try_recv(),
            Err(tokio::sync::mpsc::error::TryRecvError::Disconnected)
        ));
    }

    #[test]
    fn test_dropping_session_cancels_timer() {
        let (session, scheduler) = session(&words(10), 120, 0);
        session.play();
        assert_eq!(scheduler.active_timers(), 1);
        drop(session);
        assert_eq!(scheduler.active_timers(), 0);
    }

    #[test]
    fn test_reconfigure_cold_starts_surface() {
        let (session, scheduler) = session(&words(10), 120, 0);
        let platform = TestPlatform::new(Surface::State);
        session.enter_detached_mode(&platform);
        session.play();
        scheduler.advance(Duration::from_secs(1));

        session
            .configure("new script", TeleprompterSettings::default())
            .unwrap();
        assert_eq!(session.state(), PlaybackState::default());
        assert_eq!(scheduler.active_timers(), 0);
        assert_eq!(platform.seen.lock().cold_starts, 2);
        assert_eq!(session.content().word_count(), 2);
    }
}
