//! Configuration options for card tracking

use std::time::Duration;

use crate::types::CARD_MAX_APPS;

/// Configuration options for a [`UiccCard`](crate::UiccCard)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiccConfig {
    /// Slot (subscription) the card sits in
    pub slot_id: usize,

    /// Number of application slots tracked per card
    pub max_apps: usize,

    /// How often the swap monitor wakes to check whether it should stop
    pub swap_poll_interval: Duration,
}

impl Default for UiccConfig {
    fn default() -> Self {
        Self {
            slot_id: 0,
            max_apps: CARD_MAX_APPS,
            swap_poll_interval: Duration::from_millis(250),
        }
    }
}

impl UiccConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the slot id
    pub const fn with_slot_id(mut self, slot_id: usize) -> Self {
        self.slot_id = slot_id;
        self
    }

    /// Set the number of application slots
    pub const fn with_max_apps(mut self, max_apps: usize) -> Self {
        self.max_apps = max_apps;
        self
    }

    /// Set the swap monitor poll interval
    pub const fn with_swap_poll_interval(mut self, interval: Duration) -> Self {
        self.swap_poll_interval = interval;
        self
    }
}
