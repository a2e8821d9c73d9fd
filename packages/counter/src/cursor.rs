//! Persisted import cursor.
//!
//! The cursor is the last day a source finished importing. The importer
//! reads it at the start of a run and writes it once at the end, so a
//! failed run leaves it untouched.

use chrono::NaiveDate;
use city_data_counter_models::CounterSource;

use crate::TelraamError;

/// Key-value storage for per-source import cursors.
pub trait ImportCursorStore {
    /// Returns the cursor for `source`, or `None` if it was never set.
    ///
    /// # Errors
    ///
    /// Returns [`TelraamError::Cursor`] if the store cannot be read.
    fn get_cursor(&self, source: CounterSource) -> Result<Option<NaiveDate>, TelraamError>;

    /// Creates or replaces the cursor for `source`.
    ///
    /// # Errors
    ///
    /// Returns [`TelraamError::Cursor`] if the store cannot be written.
    fn set_cursor(&self, source: CounterSource, day: NaiveDate) -> Result<(), TelraamError>;

    /// Removes the cursor for `source`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`TelraamError::Cursor`] if the store cannot be written.
    fn clear_cursor(&self, source: CounterSource) -> Result<(), TelraamError>;
}

#[cfg(test)]
pub(crate) mod memory {
    use std::{collections::BTreeMap, sync::Mutex};

    use super::*;

    /// In-memory store used by importer tests.
    #[derive(Debug, Default)]
    pub struct MemoryCursorStore {
        cursors: Mutex<BTreeMap<CounterSource, NaiveDate>>,
    }

    impl MemoryCursorStore {
        pub fn with(source: CounterSource, day: NaiveDate) -> Self {
            let store = Self::default();
            store.cursors.lock().unwrap().insert(source, day);
            store
        }
    }

    impl ImportCursorStore for MemoryCursorStore {
        fn get_cursor(&self, source: CounterSource) -> Result<Option<NaiveDate>, TelraamError> {
            Ok(self.cursors.lock().unwrap().get(&source).copied())
        }

        fn set_cursor(&self, source: CounterSource, day: NaiveDate) -> Result<(), TelraamError> {
            self.cursors.lock().unwrap().insert(source, day);
            Ok(())
        }

        fn clear_cursor(&self, source: CounterSource) -> Result<(), TelraamError> {
            self.cursors.lock().unwrap().remove(&source);
            Ok(())
        }
    }
}
