//! Configuration options for the telephony manager

use nexum_uicc_core::UiccConfig;

/// Number of phones on a dual standby device
pub const MAX_PHONE_COUNT_DS: usize = 2;

/// Configuration options for a [`TelephonyManager`](crate::TelephonyManager)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerConfig {
    /// Whether more than one subscription is active
    pub multi_sim_enabled: bool,

    /// Number of phones when multi-SIM is enabled
    pub phone_count: usize,

    /// Template for per-slot card configuration, the slot id is filled in per card
    pub card: UiccConfig,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            multi_sim_enabled: false,
            phone_count: MAX_PHONE_COUNT_DS,
            card: UiccConfig::default(),
        }
    }
}

impl ManagerConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable multi-SIM
    pub const fn with_multi_sim(mut self, enabled: bool) -> Self {
        self.multi_sim_enabled = enabled;
        self
    }

    /// Set the phone count used when multi-SIM is enabled
    pub const fn with_phone_count(mut self, phone_count: usize) -> Self {
        self.phone_count = phone_count;
        self
    }

    /// Set the card configuration template
    pub fn with_card_config(mut self, card: UiccConfig) -> Self {
        self.card = card;
        self
    }

    /// Number of phones actually managed
    pub const fn effective_phone_count(&self) -> usize {
        if self.multi_sim_enabled {
            self.phone_count
        } else {
            1
        }
    }
}
