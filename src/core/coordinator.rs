//! Session lifecycle: from a finished countdown to a stored record.
//!
//! The coordinator owns the timer and shares the store; neither knows about
//! the other. When the countdown reaches zero the coordinator holds a pending
//! completion until the surrounding application either supplies mood and
//! notes ([`SessionCoordinator::complete`]) or walks away
//! ([`SessionCoordinator::abandon`]). Nothing is stored implicitly.

use crate::core::catalog::{BACKGROUND_IMAGE, BACKGROUND_MUSIC, SESSION_TYPES};
use crate::core::health::{MindfulnessSink, NoHealthSink};
use crate::core::notify::Subscription;
use crate::core::record::{SessionFields, SessionRecord};
use crate::core::timer::{Tick, TimerEngine, TimerPhase};
use crate::error::{Error, Result};
use crate::storage::SessionStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

/// Raised once when the countdown finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionEvent {
    /// Length of the finished session, in seconds.
    pub duration: u32,
    /// When the countdown first started.
    pub started_at: DateTime<Utc>,
}

/// What the user reports after a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionInput {
    /// Mood before, 1 to 5.
    pub mood_before: u8,
    /// Mood after, 1 to 5.
    pub mood_after: u8,
    /// Optional notes.
    pub notes: Option<String>,
    /// Optional title; blank uses the store default.
    pub title: Option<String>,
}

impl CompletionInput {
    /// Input with moods only.
    #[must_use]
    pub fn new(mood_before: u8, mood_after: u8) -> Self {
        Self {
            mood_before,
            mood_after,
            notes: None,
            title: None,
        }
    }

    /// Attach notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Session context copied onto every record the coordinator creates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ambience {
    /// Practice style key.
    pub session_type: String,
    /// Ambient sound key.
    pub background_music: String,
    /// Backdrop key.
    pub background_image: String,
}

impl Default for Ambience {
    fn default() -> Self {
        Self {
            session_type: SESSION_TYPES.default_key().to_string(),
            background_music: BACKGROUND_MUSIC.default_key().to_string(),
            background_image: BACKGROUND_IMAGE.default_key().to_string(),
        }
    }
}

/// Connects one timer to the session store.
#[derive(Debug)]
pub struct SessionCoordinator {
    store: Arc<SessionStore>,
    timer: TimerEngine,
    ambience: Ambience,
    health: Box<dyn MindfulnessSink>,
    pending: Option<CompletionEvent>,
}

impl SessionCoordinator {
    /// Create a coordinator driving `timer` and recording into `store`.
    #[must_use]
    pub fn new(store: Arc<SessionStore>, timer: TimerEngine) -> Self {
        Self {
            store,
            timer,
            ambience: Ambience::default(),
            health: Box::new(NoHealthSink),
            pending: None,
        }
    }

    /// Set the session context stamped on new records.
    #[must_use]
    pub fn with_ambience(mut self, ambience: Ambience) -> Self {
        self.ambience = ambience;
        self
    }

    /// Forward finished sessions to a health platform.
    #[must_use]
    pub fn with_health_sink(mut self, sink: impl MindfulnessSink + 'static) -> Self {
        self.health = Box::new(sink);
        self
    }

    /// The driven timer.
    #[must_use]
    pub fn timer(&self) -> &TimerEngine {
        &self.timer
    }

    /// The shared store.
    #[must_use]
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Start or resume the countdown.
    pub fn start(&mut self) -> TimerPhase {
        self.timer.start()
    }

    /// Pause the countdown.
    pub fn pause(&mut self) -> TimerPhase {
        self.timer.pause()
    }

    /// Reset the countdown, dropping any unanswered completion.
    pub fn reset(&mut self, duration: Option<u32>) -> TimerPhase {
        self.abandon();
        self.timer.reset(duration)
    }

    /// Advance the timer; returns the completion event on the finishing tick.
    pub fn tick(&mut self) -> Option<CompletionEvent> {
        match self.timer.tick() {
            Tick::Finished => {
                let event = CompletionEvent {
                    duration: self.timer.total_seconds(),
                    started_at: self
                        .timer
                        .started_at()
                        .unwrap_or_else(|| self.store.clock().now()),
                };
                info!(duration = event.duration, "session finished, awaiting reflection");
                self.pending = Some(event);
                Some(event)
            }
            Tick::Counting { .. } | Tick::Ignored => None,
        }
    }

    /// The completion waiting for user input, if any.
    #[must_use]
    pub fn pending(&self) -> Option<&CompletionEvent> {
        self.pending.as_ref()
    }

    /// Store the finished session with the user's reflection.
    ///
    /// On a validation or persistence error the completion stays pending so
    /// the caller can retry.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidState` when no session has finished, or any
    /// error from [`SessionStore::create_started_at`].
    pub fn complete(&mut self, input: CompletionInput) -> Result<SessionRecord> {
        let event = self
            .pending
            .ok_or_else(|| Error::InvalidState("no finished session to record".to_string()))?;

        let fields = SessionFields {
            title: input.title.unwrap_or_default(),
            duration: event.duration,
            session_type: self.ambience.session_type.clone(),
            background_music: self.ambience.background_music.clone(),
            background_image: self.ambience.background_image.clone(),
            mood_before: input.mood_before,
            mood_after: input.mood_after,
            notes: input.notes,
        };

        let record = self.store.create_started_at(fields, event.started_at)?;
        self.pending = None;
        self.export_to_health(&record);
        Ok(record)
    }

    /// Drop the pending completion without storing anything.
    ///
    /// Returns `true` if there was one.
    pub fn abandon(&mut self) -> bool {
        let had = self.pending.take().is_some();
        if had {
            info!("finished session abandoned without a record");
        }
        had
    }

    /// Listen for store-changed signals.
    pub fn subscribe(&self) -> Subscription {
        self.store.subscribe()
    }

    fn export_to_health(&self, record: &SessionRecord) {
        if !self.health.is_available() {
            return;
        }
        if let Err(e) = self.health.record_session(record) {
            warn!(id = %record.id, error = %e, "health export failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use crate::core::timer::{CountdownMode, DurationBounds};
    use crate::storage::MemoryBackend;
    use chrono::{Duration, TimeZone};
    use std::io;
    use std::sync::Mutex;
    use uuid::Uuid;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 8, 1, 7, 0, 0).unwrap()
    }

    fn setup(mode: CountdownMode, secs: u32) -> (SessionCoordinator, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(start()));
        let store = Arc::new(SessionStore::open(MemoryBackend::new(), clock.clone()).unwrap());
        let timer = TimerEngine::new(clock.clone(), mode, DurationBounds::DEFAULT, secs);
        (SessionCoordinator::new(store, timer), clock)
    }

    fn run_to_finish(coord: &mut SessionCoordinator, clock: &ManualClock) -> Option<CompletionEvent> {
        coord.start();
        let mut event = None;
        for _ in 0..coord.timer().total_seconds() {
            clock.advance_secs(1);
            if let Some(e) = coord.tick() {
                assert!(event.is_none(), "completion raised twice");
                event = Some(e);
            }
        }
        event
    }

    #[derive(Debug, Default, Clone)]
    struct RecordingSink {
        seen: Arc<Mutex<Vec<Uuid>>>,
        fail: bool,
    }

    impl MindfulnessSink for RecordingSink {
        fn is_available(&self) -> bool {
            true
        }

        fn record_session(&self, record: &SessionRecord) -> Result<()> {
            self.seen.lock().unwrap().push(record.id);
            if self.fail {
                Err(Error::Persistence(io::Error::other("not authorized")))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn finish_raises_event_with_total_duration() {
        let (mut coord, clock) = setup(CountdownMode::WallClock, 120);
        let event = run_to_finish(&mut coord, &clock).expect("no completion event");

        assert_eq!(event.duration, 120);
        assert_eq!(event.started_at, start());
        assert_eq!(coord.pending(), Some(&event));
        assert!(coord.store().is_empty());
    }

    #[test]
    fn complete_creates_record() {
        let (mut coord, clock) = setup(CountdownMode::Decrement, 60);
        let sub = coord.subscribe();
        run_to_finish(&mut coord, &clock).unwrap();

        let record = coord
            .complete(CompletionInput::new(2, 4).with_notes("quiet mind"))
            .unwrap();

        assert_eq!(record.fields.duration, 60);
        assert_eq!(record.fields.mood_before, 2);
        assert_eq!(record.fields.mood_after, 4);
        assert_eq!(record.fields.notes.as_deref(), Some("quiet mind"));
        assert_eq!(record.fields.title, "Meditation");
        assert_eq!(record.start_time, start());
        assert_eq!(record.created_at, start() + Duration::seconds(60));

        assert!(coord.pending().is_none());
        assert_eq!(coord.store().list(), vec![record]);
        assert_eq!(sub.drain(), 1);
    }

    #[test]
    fn abandon_stores_nothing() {
        let (mut coord, clock) = setup(CountdownMode::Decrement, 60);
        run_to_finish(&mut coord, &clock).unwrap();

        assert!(coord.abandon());
        assert!(!coord.abandon());
        assert!(coord.store().is_empty());

        let err = coord.complete(CompletionInput::new(3, 3)).unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
    }

    #[test]
    fn complete_before_finish_is_invalid() {
        let (mut coord, _clock) = setup(CountdownMode::Decrement, 60);
        coord.start();
        coord.tick();

        let err = coord.complete(CompletionInput::new(3, 3)).unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
        assert!(coord.store().is_empty());
    }

    #[test]
    fn invalid_mood_keeps_completion_pending() {
        let (mut coord, clock) = setup(CountdownMode::Decrement, 60);
        run_to_finish(&mut coord, &clock).unwrap();

        let err = coord.complete(CompletionInput::new(0, 3)).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(coord.pending().is_some());

        coord.complete(CompletionInput::new(1, 3)).unwrap();
        assert_eq!(coord.store().len(), 1);
    }

    #[test]
    fn reset_drops_pending_completion() {
        let (mut coord, clock) = setup(CountdownMode::Decrement, 60);
        run_to_finish(&mut coord, &clock).unwrap();

        assert_eq!(coord.reset(Some(300)), TimerPhase::Idle);
        assert!(coord.pending().is_none());
        assert_eq!(coord.timer().total_seconds(), 300);
        assert!(coord.store().is_empty());
    }

    #[test]
    fn paused_session_never_completes() {
        let (mut coord, clock) = setup(CountdownMode::WallClock, 60);
        coord.start();
        clock.advance_secs(30);
        coord.tick();
        coord.pause();

        clock.advance_secs(600);
        assert!(coord.tick().is_none());
        assert!(coord.pending().is_none());
    }

    #[test]
    fn ambience_is_stamped_on_records() {
        let (coord, clock) = setup(CountdownMode::Decrement, 60);
        let mut coord = coord.with_ambience(Ambience {
            session_type: "body-scan".to_string(),
            background_music: "ocean".to_string(),
            background_image: "sunset".to_string(),
        });
        run_to_finish(&mut coord, &clock).unwrap();

        let record = coord.complete(CompletionInput::new(3, 4)).unwrap();
        assert_eq!(record.fields.session_type, "body-scan");
        assert_eq!(record.fields.background_music, "ocean");
        assert_eq!(record.fields.background_image, "sunset");
    }

    #[test]
    fn health_sink_receives_completed_sessions() {
        let sink = RecordingSink::default();
        let (coord, clock) = setup(CountdownMode::Decrement, 60);
        let mut coord = coord.with_health_sink(sink.clone());
        run_to_finish(&mut coord, &clock).unwrap();

        let record = coord.complete(CompletionInput::new(3, 4)).unwrap();
        assert_eq!(*sink.seen.lock().unwrap(), vec![record.id]);
    }

    #[test]
    fn health_sink_failure_does_not_fail_completion() {
        let sink = RecordingSink {
            fail: true,
            ..RecordingSink::default()
        };
        let (coord, clock) = setup(CountdownMode::Decrement, 60);
        let mut coord = coord.with_health_sink(sink.clone());
        run_to_finish(&mut coord, &clock).unwrap();

        assert!(coord.complete(CompletionInput::new(3, 4)).is_ok());
        assert_eq!(coord.store().len(), 1);
        assert_eq!(sink.seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn second_session_after_reset() {
        let (mut coord, clock) = setup(CountdownMode::Decrement, 60);
        run_to_finish(&mut coord, &clock).unwrap();
        coord.complete(CompletionInput::new(2, 3)).unwrap();

        coord.reset(None);
        clock.advance_secs(3600);
        let event = run_to_finish(&mut coord, &clock).unwrap();
        assert_eq!(event.started_at, start() + Duration::seconds(3660));

        coord.complete(CompletionInput::new(3, 4)).unwrap();
        assert_eq!(coord.store().statistics().total_sessions, 2);
    }
}
