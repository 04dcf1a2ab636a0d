//! Card and card-application lifecycle tracking for UICC (SIM) cards
//!
//! The radio layer reports card status asynchronously. This crate turns those
//! reports into a stable model of the card in each slot and of the
//! applications resident on it (3GPP, 3GPP2, IMS):
//!
//! - [`UiccCard`] reconciles each [`CardStatus`] against its current state,
//!   keeps the toolkit service in step with slot 0, notifies absent
//!   registrants and posts hot-swap edges.
//! - [`ApplicationSlotTable`] does the positional create/update/dispose diff.
//! - [`RegistrantList`] fans notifications out to registered handlers.
//! - [`swap_mailbox`] and [`SwapMonitor`] hand hot-swap edges to a thread that
//!   prompts the user to restart.
//!
//! # Examples
//!
//! ```
//! use nexum_uicc_core::{
//!     AppFamily, AppState, AppType, ApplicationStatus, CardAbsent, CardStatus, SwapEvent,
//!     UiccCard, swap_mailbox,
//! };
//!
//! let (swap_tx, swap_rx) = swap_mailbox();
//! let mut card = UiccCard::builder()
//!     .with_swap_sender(swap_tx)
//!     .build(&CardStatus::present(vec![ApplicationStatus::new(
//!         AppType::Usim,
//!         AppState::Ready,
//!     )]));
//!
//! let usim = card.application(AppFamily::ThreeGpp).cloned();
//! assert!(usim.is_some());
//!
//! card.register_for_absent(|event: CardAbsent| println!("slot {} is empty", event.slot));
//! card.update(&CardStatus::absent()).unwrap();
//!
//! assert_eq!(swap_rx.try_recv(), Some(SwapEvent::Removed));
//! assert!(card.application(AppFamily::ThreeGpp).is_none());
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

mod application;
mod card;
mod config;
mod error;
pub mod event;
pub mod registrant;
mod slots;
pub mod toolkit;
mod types;

pub use application::CardApplication;
pub use card::{UiccCard, UiccCardBuilder};
pub use config::UiccConfig;
pub use error::{Error, Result};
pub use event::{
    CardAbsent, SwapEvent, SwapMonitor, SwapPrompt, SwapReceiver, SwapSender, swap_mailbox,
};
pub use registrant::{EventHandler, RegistrantId, RegistrantList};
pub use slots::ApplicationSlotTable;
pub use toolkit::{NoopToolkit, ToolkitBinding, ToolkitFactory, ToolkitService};
pub use types::{
    AppFamily, AppState, AppType, ApplicationStatus, CARD_MAX_APPS, CardState, CardStatus,
    PinState,
};

/// Prelude module containing commonly used traits and types
pub mod prelude {
    pub use crate::{
        AppFamily, AppState, AppType, ApplicationStatus, CardAbsent, CardApplication, CardState,
        CardStatus, EventHandler, PinState, SwapEvent, SwapPrompt, ToolkitFactory,
        ToolkitService, UiccCard, UiccConfig,
    };
}
