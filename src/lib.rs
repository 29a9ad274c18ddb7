//! hush - bit-sized meditation timer.
//!
//! Counts down a short sitting, asks how you felt before and after, and
//! keeps a local journal of sessions with progress toward a daily goal.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod settings;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
pub use settings::{Settings, SettingsFile};
pub use storage::SessionStore;
