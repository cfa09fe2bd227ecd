//! Persistence adapter: round-trips application state through a [`KeyValueStore`].
//!
//! Two keys are used:
//! - `todos`: a JSON array of task records, timestamps as ISO-8601 text.
//! - `theme`: the active theme name.
//!
//! Reads never fail the caller. A missing key yields the empty state; a
//! stored value that does not parse is logged and treated as missing.

use crate::error::Result;
use crate::storage::MemoryKeyValueStore;
use crate::tasks::{Task, TaskStore};
use crate::traits::KeyValueStore;

/// Key holding the serialized task collection.
pub const TODOS_KEY: &str = "todos";

/// Key holding the active theme name.
pub const THEME_KEY: &str = "theme";

/// Serde adapters for timestamps stored as RFC 3339 text with milliseconds.
pub mod dates {
    use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Render a timestamp as `2024-05-01T09:30:00.123Z`.
    #[must_use]
    pub fn format(at: &DateTime<Utc>) -> String {
        at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Parse an RFC 3339 timestamp, or a bare `YYYY-MM-DD` date as UTC midnight.
    ///
    /// # Errors
    ///
    /// Returns the RFC 3339 parse error if neither form matches.
    pub fn parse(text: &str) -> std::result::Result<DateTime<Utc>, chrono::ParseError> {
        let text = text.trim();
        DateTime::parse_from_rfc3339(text).map(|at| at.with_timezone(&Utc)).or_else(|err| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
                .ok_or(err)
        })
    }

    /// Serialize with [`format`].
    #[allow(clippy::missing_errors_doc)]
    pub fn serialize<S: Serializer>(
        at: &DateTime<Utc>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(at))
    }

    /// Deserialize with [`parse`].
    #[allow(clippy::missing_errors_doc)]
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<DateTime<Utc>, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse(&text).map_err(serde::de::Error::custom)
    }

    /// The same encoding for optional timestamps; `None` stays absent.
    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        /// Serialize `Some` as text and `None` as null.
        ///
        /// `Task` pairs this with `skip_serializing_if = "Option::is_none"`,
        /// so stored records omit an absent date instead of writing null.
        #[allow(clippy::missing_errors_doc, clippy::ref_option)]
        pub fn serialize<S: Serializer>(
            at: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> std::result::Result<S::Ok, S::Error> {
            match at {
                Some(at) => serializer.serialize_str(&super::format(at)),
                None => serializer.serialize_none(),
            }
        }

        /// Deserialize null or text.
        #[allow(clippy::missing_errors_doc)]
        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> std::result::Result<Option<DateTime<Utc>>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|text| super::parse(&text))
                .transpose()
                .map_err(serde::de::Error::custom)
        }
    }
}

/// Reads and writes application state under fixed keys.
///
/// Task writes are driven by [`Persistence::sync`], which compares the
/// store's revision with the last one written. Several mutations between two
/// syncs coalesce into one write of the final state.
#[derive(Debug)]
pub struct Persistence {
    backend: Box<dyn KeyValueStore>,
    synced_revision: Option<u64>,
}

impl Persistence {
    /// Wrap a key-value backend.
    #[must_use]
    pub fn new(backend: Box<dyn KeyValueStore>) -> Self {
        Self { backend, synced_revision: None }
    }

    /// A persistence layer that forgets everything when dropped.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryKeyValueStore::new()))
    }

    /// The underlying backend.
    #[must_use]
    pub fn backend(&self) -> &dyn KeyValueStore {
        self.backend.as_ref()
    }

    /// Serialize and write the full task collection.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the backend write fails.
    pub fn save_tasks(&self, tasks: &[Task]) -> Result<()> {
        let json = serde_json::to_string(tasks)?;
        self.backend.set(TODOS_KEY, &json)?;
        tracing::debug!(count = tasks.len(), bytes = json.len(), "saved tasks");
        Ok(())
    }

    /// Read the stored task collection.
    ///
    /// Absent, unreadable or malformed state yields an empty collection.
    #[must_use]
    pub fn load_tasks(&self) -> Vec<Task> {
        let raw = match self.backend.get(TODOS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored tasks, starting empty");
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<Task>>(&raw) {
            Ok(tasks) => {
                tracing::debug!(count = tasks.len(), "loaded tasks");
                tasks
            }
            Err(e) => {
                tracing::warn!(error = %e, "stored tasks are corrupt, starting empty");
                Vec::new()
            }
        }
    }

    /// Write the store's collection if it changed since the last sync.
    ///
    /// Returns whether a write happened.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails; the revision is then left
    /// unsynced so the next call retries.
    pub fn sync(&mut self, store: &TaskStore) -> Result<bool> {
        let revision = store.revision();
        if self.synced_revision == Some(revision) {
            return Ok(false);
        }
        self.save_tasks(store.tasks())?;
        self.synced_revision = Some(revision);
        Ok(true)
    }

    /// Record that `revision` already matches what is stored.
    pub fn mark_synced(&mut self, revision: u64) {
        self.synced_revision = Some(revision);
    }

    /// Read the stored theme name, if any.
    #[must_use]
    pub fn load_theme(&self) -> Option<String> {
        self.backend.get(THEME_KEY).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not read stored theme");
            None
        })
    }

    /// Write the theme name.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails.
    pub fn save_theme(&self, theme: &str) -> Result<()> {
        self.backend.set(THEME_KEY, theme)
    }
}
