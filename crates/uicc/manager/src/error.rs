//! Error types for the telephony manager

/// Result type for manager operations
pub type Result<T> = core::result::Result<T, Error>;

/// Error type for manager operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Slot outside the configured phone count
    #[error("Slot {slot} out of range (phone count {phone_count})")]
    InvalidSlot {
        /// Requested slot
        slot: usize,
        /// Configured phone count
        phone_count: usize,
    },

    /// Card level errors
    #[error(transparent)]
    Card(#[from] nexum_uicc_core::Error),
}

/// Failure reported by a subscriber information service
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// The service is not registered or not running
    #[error("Subscriber service unavailable")]
    Unavailable,

    /// The service failed while handling the call
    #[error("Subscriber service call failed: {0}")]
    Remote(String),
}
