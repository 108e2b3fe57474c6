//! Application state for the labor engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDate};

use crate::config::ConfigLoader;
use crate::store::{CalculationStore, InMemoryStore};

/// Shared application state.
///
/// Holds the read-only statutory configuration and the saved-calculation
/// store. Both are reference counted so the state is cheap to clone per request.
/// Request defaults read the server clock unless a date is pinned with
/// [`AppState::with_today`].
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    store: Arc<dyn CalculationStore>,
    today: Option<NaiveDate>,
}

impl AppState {
    /// Creates a new application state backed by an in-memory store.
    pub fn new(config: ConfigLoader) -> Self {
        Self::with_store(config, Arc::new(InMemoryStore::new()))
    }

    /// Creates a new application state with the given store.
    pub fn with_store(config: ConfigLoader, store: Arc<dyn CalculationStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
            today: None,
        }
    }

    /// Pins the date used for request defaults instead of the server clock.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the saved-calculation store.
    pub fn store(&self) -> &dyn CalculationStore {
        self.store.as_ref()
    }

    /// The pinned date, or today in server local time. Used when a request
    /// omits a date.
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// The year of [`AppState::today`].
    pub fn current_year(&self) -> i32 {
        self.today().year()
    }
}
