//! Card application state
//!
//! A [`CardApplication`] is created by the slot table when a status report
//! introduces an application and is updated in place for as long as its slot
//! stays populated. Consumers hold it through an `Arc`, so a handle taken
//! before an update observes the new state afterwards.

use parking_lot::RwLock;
use tracing::debug;

use crate::types::{AppFamily, AppState, AppType, ApplicationStatus, PinState};

/// A single application resident on a card
#[derive(Debug)]
pub struct CardApplication {
    /// Slot index of the application on its card
    index: usize,
    /// Latest reported status, `None` once disposed
    status: RwLock<Option<ApplicationStatus>>,
}

impl CardApplication {
    /// Create an application bound to a status record
    pub(crate) fn new(index: usize, status: &ApplicationStatus) -> Self {
        debug!(index, app_type = %status.app_type, state = %status.app_state, "Creating application");
        Self {
            index,
            status: RwLock::new(Some(status.clone())),
        }
    }

    /// Replace the reported status, ignored once disposed
    pub(crate) fn update(&self, status: &ApplicationStatus) {
        let mut guard = self.status.write();
        match guard.as_mut() {
            Some(current) => {
                if current.app_state != status.app_state {
                    debug!(
                        index = self.index,
                        from = %current.app_state,
                        to = %status.app_state,
                        "Application state changed"
                    );
                }
                current.clone_from(status);
            }
            None => debug!(index = self.index, "Ignoring update of disposed application"),
        }
    }

    /// Release the application, idempotent
    pub(crate) fn dispose(&self) {
        if self.status.write().take().is_some() {
            debug!(index = self.index, "Disposing application");
        }
    }

    /// Slot index of this application
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Whether this application has been released
    pub fn is_disposed(&self) -> bool {
        self.status.read().is_none()
    }

    /// Application type, [`AppType::Unknown`] once disposed
    pub fn app_type(&self) -> AppType {
        self.read(|s| s.app_type).unwrap_or_default()
    }

    /// Application state, [`AppState::Unknown`] once disposed
    pub fn state(&self) -> AppState {
        self.read(|s| s.app_state).unwrap_or_default()
    }

    /// Technology family served by this application
    pub fn family(&self) -> Option<AppFamily> {
        self.app_type().family()
    }

    /// Application identifier
    pub fn aid(&self) -> Option<String> {
        self.read(|s| s.aid.clone()).flatten()
    }

    /// Application label
    pub fn label(&self) -> Option<String> {
        self.read(|s| s.label.clone()).flatten()
    }

    /// PIN1 state, [`PinState::Unknown`] once disposed
    pub fn pin1_state(&self) -> PinState {
        self.read(|s| s.pin1).unwrap_or_default()
    }

    /// PIN2 state, [`PinState::Unknown`] once disposed
    pub fn pin2_state(&self) -> PinState {
        self.read(|s| s.pin2).unwrap_or_default()
    }

    /// Whether the application is ready for use
    pub fn is_ready(&self) -> bool {
        self.state() == AppState::Ready
    }

    /// Snapshot of the current status record
    pub fn status(&self) -> Option<ApplicationStatus> {
        self.status.read().clone()
    }

    fn read<T>(&self, f: impl FnOnce(&ApplicationStatus) -> T) -> Option<T> {
        self.status.read().as_ref().map(f)
    }
}
