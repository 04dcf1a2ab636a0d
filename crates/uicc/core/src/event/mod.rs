//! Card events and their delivery
//!
//! Absent notifications reach registrants synchronously through a
//! [`RegistrantList`](crate::RegistrantList). Hot-swap edges cross to a
//! separate thread through a single-slot [`mailbox`] consumed by a
//! [`SwapMonitor`].

pub mod mailbox;
pub use mailbox::*;

pub mod monitor;
pub use monitor::*;

use derive_more::Display;

/// Hot-swap edge detected on a card
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwapEvent {
    /// The card went from absent to present
    #[display("card added")]
    Added,
    /// The card went from present to absent
    #[display("card removed")]
    Removed,
}

impl SwapEvent {
    /// Whether this is an insertion
    pub const fn is_added(self) -> bool {
        matches!(self, Self::Added)
    }
}

/// Notification sent to absent registrants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardAbsent {
    /// Slot of the card that is absent
    pub slot: usize,
}

/// Trait for the collaborator that asks the user to restart after a swap
pub trait SwapPrompt: Send {
    /// Show the restart prompt for a swap event
    fn show_swap_prompt(&mut self, event: SwapEvent);
}

impl<F> SwapPrompt for F
where
    F: FnMut(SwapEvent) + Send,
{
    fn show_swap_prompt(&mut self, event: SwapEvent) {
        self(event)
    }
}
