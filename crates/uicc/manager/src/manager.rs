//! Telephony manager owning one card per slot

use std::sync::Arc;

use nexum_uicc_core::{
    CardStatus, NoopToolkit, SwapSender, ToolkitFactory, UiccCard, UiccConfig,
};
use tracing::{debug, info, instrument, warn};

use crate::config::ManagerConfig;
use crate::error::{Error, Result, ServiceError};
use crate::sim_state::SimState;
use crate::subscriber::{LteOnCdmaMode, NetworkType, SubscriberInfo};

/// Owns the card of every slot and answers per-subscription queries
///
/// With multi-SIM disabled the manager has a single slot and every
/// per-subscription query is answered for slot 0, whatever subscription the
/// caller names.
pub struct TelephonyManager {
    config: ManagerConfig,
    cards: Vec<Option<UiccCard>>,
    toolkit: Arc<dyn ToolkitFactory>,
    swap: SwapSender,
    subscriber: Option<Arc<dyn SubscriberInfo>>,
}

impl TelephonyManager {
    /// Create a manager whose cards post hot-swap edges to `swap`
    ///
    /// Each card gets its own fork of the sender, so disposing one card
    /// leaves the others connected.
    pub fn new(config: ManagerConfig, swap: SwapSender) -> Self {
        let phone_count = config.effective_phone_count();
        info!(
            multi_sim = config.multi_sim_enabled,
            phone_count, "Creating telephony manager"
        );
        Self {
            cards: (0..phone_count).map(|_| None).collect(),
            config,
            toolkit: Arc::new(NoopToolkit),
            swap,
            subscriber: None,
        }
    }

    /// Set the factory used to start toolkit services on new cards
    pub fn with_toolkit(mut self, toolkit: Arc<dyn ToolkitFactory>) -> Self {
        self.toolkit = toolkit;
        self
    }

    /// Set the subscriber information service
    pub fn with_subscriber_info(mut self, subscriber: Arc<dyn SubscriberInfo>) -> Self {
        self.subscriber = Some(subscriber);
        self
    }

    /// Manager configuration
    pub const fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Whether more than one subscription is active
    pub const fn is_multi_sim_enabled(&self) -> bool {
        self.config.multi_sim_enabled
    }

    /// Number of managed slots
    pub fn phone_count(&self) -> usize {
        self.cards.len()
    }

    /// Feed a status report for `slot`, creating the card on first report
    #[instrument(level = "debug", skip(self, status), fields(state = %status.card_state))]
    pub fn on_card_status(&mut self, slot: usize, status: &CardStatus) -> Result<()> {
        let phone_count = self.cards.len();
        let entry = self
            .cards
            .get_mut(slot)
            .ok_or(Error::InvalidSlot { slot, phone_count })?;

        if let Some(card) = entry.as_mut() {
            card.update(status)?;
            return Ok(());
        }

        let config = UiccConfig {
            slot_id: slot,
            ..self.config.card.clone()
        };
        *entry = Some(UiccCard::new(
            config,
            Arc::clone(&self.toolkit),
            self.swap.fork(),
            status,
        ));
        Ok(())
    }

    /// Dispose the card in `slot`
    ///
    /// The next report for the slot creates a fresh card. Returns whether a
    /// card was present.
    pub fn dispose_card(&mut self, slot: usize) -> Result<bool> {
        let phone_count = self.cards.len();
        let entry = self
            .cards
            .get_mut(slot)
            .ok_or(Error::InvalidSlot { slot, phone_count })?;
        let Some(mut card) = entry.take() else {
            debug!(slot, "No card to dispose");
            return Ok(false);
        };
        card.dispose();
        info!(slot, "Disposed card");
        Ok(true)
    }

    /// Dispose every card
    pub fn dispose_all(&mut self) {
        for (slot, entry) in self.cards.iter_mut().enumerate() {
            if let Some(mut card) = entry.take() {
                card.dispose();
                debug!(slot, "Disposed card");
            }
        }
    }

    /// Card in `slot`, if one has been reported
    pub fn card(&self, slot: usize) -> Option<&UiccCard> {
        self.cards.get(slot).and_then(Option::as_ref)
    }

    /// Mutable card in `slot`, if one has been reported
    pub fn card_mut(&mut self, slot: usize) -> Option<&mut UiccCard> {
        self.cards.get_mut(slot).and_then(Option::as_mut)
    }

    /// Iterate over the reported cards
    pub fn cards(&self) -> impl Iterator<Item = &UiccCard> {
        self.cards.iter().flatten()
    }

    /// SIM state of the slot serving `subscription`
    pub fn sim_state(&self, subscription: usize) -> SimState {
        SimState::from_card(self.card(self.route(subscription)))
    }

    /// Whether a card is inserted in the slot serving `subscription`
    pub fn has_icc_card(&self, subscription: usize) -> bool {
        self.card(self.route(subscription))
            .is_some_and(|card| !card.is_destroyed() && !card.card_state().is_absent())
    }

    /// First slot holding a card, slot 0 when none does
    pub fn preferred_subscription(&self) -> usize {
        (0..self.phone_count())
            .find(|&slot| self.sim_state(slot) != SimState::Absent)
            .unwrap_or(0)
    }

    /// Subscription used when the caller names none
    ///
    /// Without multi-SIM this is always 0. Otherwise the subscriber service
    /// decides, falling back to 0 when it fails or names a slot out of range.
    pub fn default_subscription(&self) -> usize {
        if !self.is_multi_sim_enabled() {
            return 0;
        }
        match self.query("default_subscription", |info| info.default_subscription()) {
            Some(subscription) if subscription < self.phone_count() => subscription,
            Some(subscription) => {
                warn!(subscription, "Default subscription out of range");
                0
            }
            None => 0,
        }
    }

    /// Device identifier of the phone serving `subscription`
    pub fn device_id(&self, subscription: usize) -> Option<String> {
        let subscription = self.route(subscription);
        self.query("device_id", |info| info.device_id(subscription))
            .flatten()
    }

    /// Card serial number of the card serving `subscription`
    pub fn sim_serial_number(&self, subscription: usize) -> Option<String> {
        let subscription = self.route(subscription);
        self.query("sim_serial_number", |info| {
            info.icc_serial_number(subscription)
        })
        .flatten()
    }

    /// Subscriber identity of `subscription`
    pub fn subscriber_id(&self, subscription: usize) -> Option<String> {
        let subscription = self.route(subscription);
        self.query("subscriber_id", |info| info.subscriber_id(subscription))
            .flatten()
    }

    /// Network type of `subscription`
    pub fn network_type(&self, subscription: usize) -> NetworkType {
        let subscription = self.route(subscription);
        self.query("network_type", |info| info.network_type(subscription))
            .unwrap_or_default()
    }

    /// LTE on CDMA mode of `subscription`
    pub fn lte_on_cdma_mode(&self, subscription: usize) -> LteOnCdmaMode {
        let subscription = self.route(subscription);
        self.query("lte_on_cdma_mode", |info| info.lte_on_cdma_mode(subscription))
            .unwrap_or_default()
    }

    /// Slot answering queries for `subscription`
    fn route(&self, subscription: usize) -> usize {
        if self.is_multi_sim_enabled() {
            subscription
        } else {
            0
        }
    }

    fn query<T>(
        &self,
        operation: &'static str,
        call: impl FnOnce(&dyn SubscriberInfo) -> std::result::Result<T, ServiceError>,
    ) -> Option<T> {
        let result = match &self.subscriber {
            Some(info) => call(info.as_ref()),
            None => Err(ServiceError::Unavailable),
        };
        match result {
            Ok(value) => Some(value),
            Err(ServiceError::Unavailable) => {
                debug!(operation, "Subscriber service unavailable");
                None
            }
            Err(err) => {
                warn!(operation, %err, "Subscriber query failed");
                None
            }
        }
    }
}

impl std::fmt::Debug for TelephonyManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelephonyManager")
            .field("config", &self.config)
            .field("cards", &self.cards)
            .field("subscriber", &self.subscriber.is_some())
            .finish()
    }
}

impl Drop for TelephonyManager {
    fn drop(&mut self) {
        self.dispose_all();
    }
}
