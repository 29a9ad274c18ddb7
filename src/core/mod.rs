//! Core types: records, timer, statistics and the session lifecycle.

pub mod catalog;
pub mod clock;
pub mod coordinator;
pub mod health;
pub mod notify;
pub mod record;
pub mod stats;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use coordinator::{Ambience, CompletionEvent, CompletionInput, SessionCoordinator};
pub use health::{MindfulnessSink, NoHealthSink};
pub use notify::{ChangeNotifier, StoreChanged, Subscription, SubscriptionId};
pub use record::{MOOD_RANGE, SessionFields, SessionRecord};
pub use stats::Statistics;
pub use timer::{CountdownMode, DurationBounds, Tick, TimerEngine, TimerPhase, TimerSnapshot};
