//! Fixed option sets offered by the UI.
//!
//! Records and settings store the raw key so values added by a newer build
//! survive a round trip through an older one; unknown keys render with the
//! set's fallback label.

/// Title used when a session is recorded without one.
pub const DEFAULT_TITLE: &str = "Meditation";

/// A small, ordered mapping from stable key to display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionSet {
    entries: &'static [(&'static str, &'static str)],
    fallback: &'static str,
}

impl OptionSet {
    /// Build a set. The first entry is the default.
    #[must_use]
    pub const fn new(entries: &'static [(&'static str, &'static str)], fallback: &'static str) -> Self {
        Self { entries, fallback }
    }

    /// Display label for `key`, or the fallback label if the key is unknown.
    #[must_use]
    pub fn label(&self, key: &str) -> &'static str {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map_or(self.fallback, |(_, label)| label)
    }

    /// Whether `key` is one of the known options.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| *k == key)
    }

    /// Known keys, in display order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    /// Known `(key, label)` pairs, in display order.
    #[must_use]
    pub fn entries(&self) -> &'static [(&'static str, &'static str)] {
        self.entries
    }

    /// Key selected when nothing else was chosen.
    #[must_use]
    pub fn default_key(&self) -> &'static str {
        self.entries.first().map_or("", |(k, _)| k)
    }

    /// Label shown for unknown keys.
    #[must_use]
    pub fn fallback_label(&self) -> &'static str {
        self.fallback
    }
}

/// Ambient sounds.
pub const BACKGROUND_MUSIC: OptionSet = OptionSet::new(
    &[
        ("rain", "Rain"),
        ("forest", "Forest"),
        ("ocean", "Ocean waves"),
        ("silence", "Silence"),
    ],
    "Unknown sound",
);

/// Backdrop scenes.
pub const BACKGROUND_IMAGE: OptionSet = OptionSet::new(
    &[
        ("forest", "Forest"),
        ("mountain", "Mountains"),
        ("ocean", "Ocean"),
        ("sunset", "Sunset"),
        ("minimal", "Minimal"),
    ],
    "Unknown scene",
);

/// Practice styles. Records accept any string; these are the ones offered.
pub const SESSION_TYPES: OptionSet = OptionSet::new(
    &[
        ("breathing", "Breathing"),
        ("mindfulness", "Mindfulness"),
        ("body-scan", "Body scan"),
    ],
    "Other",
);
