//! Driven port for browser-style navigation.

use std::sync::{Mutex, PoisonError};

/// Performs navigations on behalf of domain controllers.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    /// Navigate to `target`, replacing the current history entry so the
    /// page that triggered the navigation cannot be returned to.
    fn replace(&self, target: &str);
}

/// Navigator that records every requested target instead of navigating.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    targets: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    /// Targets passed to [`Navigator::replace`], oldest first.
    pub fn targets(&self) -> Vec<String> {
        self.targets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for RecordingNavigator {
    fn replace(&self, target: &str) {
        self.targets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(target.to_owned());
    }
}
