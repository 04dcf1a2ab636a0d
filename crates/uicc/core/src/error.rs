//! Error types for card tracking

/// Result type for card operations
pub type Result<T> = core::result::Result<T, Error>;

/// Error type for card operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The card was disposed and no longer accepts status reports
    #[error("Card in slot {slot} updated after it was disposed")]
    Destroyed {
        /// Slot of the disposed card
        slot: usize,
    },
}
