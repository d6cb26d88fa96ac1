//! Application state for the take-home pay API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::{ConfigLoader, RuleSet};

/// Shared application state.
///
/// Holds the rule set loaded at startup. It is read-only, so handlers share
/// it without locking.
#[derive(Clone)]
pub struct AppState {
    /// The loaded rule set.
    config: Arc<ConfigLoader>,
}

impl AppState {
    /// Creates a new application state with the given configuration loader.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns the rule set used for every calculation.
    pub fn rules(&self) -> &RuleSet {
        self.config.rules()
    }
}
