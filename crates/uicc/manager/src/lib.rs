//! Multi-SIM telephony manager
//!
//! [`TelephonyManager`] owns one [`UiccCard`](nexum_uicc_core::UiccCard) per
//! slot, derives the [`SimState`] of each slot and forwards per-subscription
//! queries to a [`SubscriberInfo`] service. Single-SIM devices use the same
//! manager with multi-SIM disabled.
//!
//! # Examples
//!
//! ```
//! use nexum_uicc_core::{AppState, AppType, ApplicationStatus, CardStatus, swap_mailbox};
//! use nexum_uicc_manager::{ManagerConfig, SimState, TelephonyManager};
//!
//! let (swap_tx, _swap_rx) = swap_mailbox();
//! let mut manager = TelephonyManager::new(ManagerConfig::new().with_multi_sim(true), swap_tx);
//!
//! manager.on_card_status(0, &CardStatus::absent()).unwrap();
//! manager
//!     .on_card_status(
//!         1,
//!         &CardStatus::present(vec![ApplicationStatus::new(AppType::Usim, AppState::Pin)]),
//!     )
//!     .unwrap();
//!
//! assert_eq!(manager.sim_state(1), SimState::PinRequired);
//! assert_eq!(manager.preferred_subscription(), 1);
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

mod config;
mod error;
mod manager;
mod sim_state;
mod subscriber;

pub use config::{MAX_PHONE_COUNT_DS, ManagerConfig};
pub use error::{Error, Result, ServiceError};
pub use manager::TelephonyManager;
pub use sim_state::SimState;
pub use subscriber::{LteOnCdmaMode, NetworkType, SubscriberInfo};
