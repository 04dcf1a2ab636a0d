//! UICC card lifecycle tracking
//!
//! [`UiccCard`] reconciles the status reports of one card slot into a stable
//! set of [`CardApplication`]s. Every report may create, update or dispose
//! applications, restart or stop the toolkit service, notify absent
//! registrants and post a hot-swap edge to the swap mailbox.
//!
//! A card is driven through `&mut self` from a single owner. The swap mailbox
//! is the only state shared with another thread.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::application::CardApplication;
use crate::config::UiccConfig;
use crate::error::{Error, Result};
use crate::event::{CardAbsent, SwapEvent, SwapSender, swap_mailbox};
use crate::registrant::{EventHandler, RegistrantId, RegistrantList};
use crate::slots::ApplicationSlotTable;
use crate::toolkit::{NoopToolkit, ToolkitBinding, ToolkitFactory, ToolkitService};
use crate::types::{AppFamily, AppType, CardState, CardStatus, PinState};

/// Builder for [`UiccCard`]
#[derive(Default)]
pub struct UiccCardBuilder {
    config: UiccConfig,
    toolkit: Option<Arc<dyn ToolkitFactory>>,
    swap: Option<SwapSender>,
}

impl UiccCardBuilder {
    /// Create a builder with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration
    pub fn with_config(mut self, config: UiccConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the factory used to start the toolkit service
    pub fn with_toolkit(mut self, toolkit: Arc<dyn ToolkitFactory>) -> Self {
        self.toolkit = Some(toolkit);
        self
    }

    /// Set the mailbox that receives hot-swap edges
    ///
    /// Disposing the card closes this sender and every clone of it. Cards
    /// sharing one mailbox should each get a [`SwapSender::fork`].
    pub fn with_swap_sender(mut self, swap: SwapSender) -> Self {
        self.swap = Some(swap);
        self
    }

    /// Create the card from its first status report
    pub fn build(self, status: &CardStatus) -> UiccCard {
        let swap = self.swap.unwrap_or_else(|| swap_mailbox().0);
        let toolkit = self.toolkit.unwrap_or_else(|| Arc::new(NoopToolkit));
        UiccCard::new(self.config, toolkit, swap, status)
    }
}

impl std::fmt::Debug for UiccCardBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiccCardBuilder")
            .field("config", &self.config)
            .field("toolkit", &self.toolkit.is_some())
            .field("swap", &self.swap)
            .finish()
    }
}

/// A card in one slot and the applications it carries
pub struct UiccCard {
    /// Card configuration
    config: UiccConfig,
    /// Physical card state from the latest report
    card_state: CardState,
    /// Universal PIN state from the latest report
    universal_pin_state: PinState,
    /// Subscription application index per family, negative for none
    gsm_umts_subscription_app_index: i32,
    cdma_subscription_app_index: i32,
    ims_subscription_app_index: i32,
    /// Application slots, `None` once disposed
    applications: Option<ApplicationSlotTable>,
    /// Factory for the toolkit service
    toolkit_factory: Arc<dyn ToolkitFactory>,
    /// Toolkit service bound to slot 0
    toolkit: Option<Box<dyn ToolkitService>>,
    /// Registrants notified when the card becomes absent
    absent_registrants: RegistrantList<CardAbsent>,
    /// Mailbox for hot-swap edges
    swap: SwapSender,
    /// Set once the card has been disposed
    destroyed: bool,
}

impl UiccCard {
    /// Create a builder
    pub fn builder() -> UiccCardBuilder {
        UiccCardBuilder::new()
    }

    /// Create a card from its first status report
    pub fn new(
        config: UiccConfig,
        toolkit_factory: Arc<dyn ToolkitFactory>,
        swap: SwapSender,
        status: &CardStatus,
    ) -> Self {
        info!(slot = config.slot_id, state = %status.card_state, "Creating card");
        let mut card = Self {
            applications: Some(ApplicationSlotTable::new(config.max_apps)),
            config,
            card_state: status.card_state,
            universal_pin_state: status.universal_pin_state,
            gsm_umts_subscription_app_index: -1,
            cdma_subscription_app_index: -1,
            ims_subscription_app_index: -1,
            toolkit_factory,
            toolkit: None,
            absent_registrants: RegistrantList::new(),
            swap,
            destroyed: false,
        };
        card.apply(status);
        card
    }

    /// Apply a new status report
    ///
    /// A disposed card logs an error, keeps its state and returns
    /// [`Error::Destroyed`].
    pub fn update(&mut self, status: &CardStatus) -> Result<()> {
        if self.destroyed {
            error!(slot = self.config.slot_id, "Card updated after it was disposed");
            return Err(Error::Destroyed {
                slot: self.config.slot_id,
            });
        }

        let old_state = self.card_state;
        self.apply(status);

        match (old_state.is_absent(), self.card_state.is_absent()) {
            (false, true) => {
                info!(slot = self.config.slot_id, "Card removed");
                self.absent_registrants.notify(CardAbsent {
                    slot: self.config.slot_id,
                });
                self.swap.post(SwapEvent::Removed);
            }
            (true, false) => {
                info!(slot = self.config.slot_id, state = %self.card_state, "Card added");
                self.swap.post(SwapEvent::Added);
            }
            _ => {}
        }

        Ok(())
    }

    /// Overwrite card level state, reconcile slots and settle the toolkit
    fn apply(&mut self, status: &CardStatus) {
        self.card_state = status.card_state;
        self.universal_pin_state = status.universal_pin_state;
        self.gsm_umts_subscription_app_index = status.gsm_umts_subscription_app_index;
        self.cdma_subscription_app_index = status.cdma_subscription_app_index;
        self.ims_subscription_app_index = status.ims_subscription_app_index;

        let Some(applications) = self.applications.as_mut() else {
            return;
        };

        debug!(
            slot = self.config.slot_id,
            count = status.applications.len(),
            "Reconciling applications"
        );
        applications.reconcile(&status.applications);

        match applications.get(0) {
            Some(primary) => {
                let binding = ToolkitBinding {
                    slot: self.config.slot_id,
                    application: Arc::clone(primary),
                };
                match self.toolkit.as_mut() {
                    Some(toolkit) => toolkit.reinitialize(&binding),
                    None => {
                        debug!(slot = self.config.slot_id, "Starting toolkit service");
                        self.toolkit = Some(self.toolkit_factory.start(&binding));
                    }
                }
            }
            None => {
                if let Some(mut toolkit) = self.toolkit.take() {
                    debug!(slot = self.config.slot_id, "Stopping toolkit service");
                    toolkit.dispose();
                }
            }
        }
    }

    /// Release the card, its toolkit service and its applications
    ///
    /// Further updates are rejected. Calling this more than once is harmless.
    pub fn dispose(&mut self) {
        if self.destroyed {
            return;
        }
        info!(slot = self.config.slot_id, "Disposing card");
        self.destroyed = true;

        if let Some(mut toolkit) = self.toolkit.take() {
            toolkit.dispose();
        }
        if let Some(mut applications) = self.applications.take() {
            applications.dispose_all();
        }
        self.absent_registrants.clear();
        self.swap.close();
    }

    /// Register for notification when the card becomes absent
    ///
    /// When the card is already absent the handler is notified before this
    /// returns.
    pub fn register_for_absent<H>(&mut self, handler: H) -> RegistrantId
    where
        H: EventHandler<CardAbsent> + 'static,
    {
        let id = self.absent_registrants.add(handler);
        if self.card_state.is_absent() {
            self.absent_registrants.notify_one(
                id,
                CardAbsent {
                    slot: self.config.slot_id,
                },
            );
        }
        id
    }

    /// Remove an absent registrant, does nothing if it is not registered
    pub fn unregister_for_absent(&mut self, id: RegistrantId) {
        self.absent_registrants.remove(id);
    }

    /// Subscription application of a technology family
    pub fn application(&self, family: AppFamily) -> Option<&Arc<CardApplication>> {
        let index = match family {
            AppFamily::ThreeGpp => self.gsm_umts_subscription_app_index,
            AppFamily::ThreeGpp2 => self.cdma_subscription_app_index,
            AppFamily::Ims => self.ims_subscription_app_index,
        };
        usize::try_from(index)
            .ok()
            .and_then(|index| self.application_at(index))
    }

    /// Application at a slot index
    pub fn application_at(&self, index: usize) -> Option<&Arc<CardApplication>> {
        self.applications.as_ref()?.get(index)
    }

    /// Whether an application of the given type is on the card
    pub fn is_application_present(&self, app_type: AppType) -> bool {
        self.applications
            .as_ref()
            .is_some_and(|apps| apps.find_type(app_type).is_some())
    }

    /// Number of populated application slots
    pub fn application_count(&self) -> usize {
        self.applications
            .as_ref()
            .map_or(0, ApplicationSlotTable::occupied)
    }

    /// Iterate over populated application slots
    pub fn applications(&self) -> impl Iterator<Item = &Arc<CardApplication>> {
        self.applications.iter().flat_map(ApplicationSlotTable::iter)
    }

    /// Physical card state
    pub const fn card_state(&self) -> CardState {
        self.card_state
    }

    /// Universal PIN state
    pub const fn universal_pin_state(&self) -> PinState {
        self.universal_pin_state
    }

    /// Slot the card sits in
    pub const fn slot_id(&self) -> usize {
        self.config.slot_id
    }

    /// Whether the card has been disposed
    pub const fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Whether a toolkit service is running
    pub const fn toolkit_active(&self) -> bool {
        self.toolkit.is_some()
    }

    /// Number of absent registrants
    pub fn absent_registrant_count(&self) -> usize {
        self.absent_registrants.len()
    }
}

impl std::fmt::Debug for UiccCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiccCard")
            .field("slot", &self.config.slot_id)
            .field("card_state", &self.card_state)
            .field("universal_pin_state", &self.universal_pin_state)
            .field("applications", &self.application_count())
            .field("toolkit", &self.toolkit.is_some())
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

impl Drop for UiccCard {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AppState, ApplicationStatus};
    use parking_lot::Mutex;

    #[derive(Debug, Default)]
    struct ToolkitLog {
        started: usize,
        reinitialized: usize,
        disposed: usize,
        bound_index: Option<usize>,
    }

    struct RecordingToolkit(Arc<Mutex<ToolkitLog>>);

    impl ToolkitService for RecordingToolkit {
        fn reinitialize(&mut self, binding: &ToolkitBinding) {
            let mut log = self.0.lock();
            log.reinitialized += 1;
            log.bound_index = Some(binding.application.index());
        }

        fn dispose(&mut self) {
            self.0.lock().disposed += 1;
        }
    }

    fn recording_card(status: &CardStatus) -> (UiccCard, Arc<Mutex<ToolkitLog>>) {
        let log = Arc::new(Mutex::new(ToolkitLog::default()));
        let factory_log = Arc::clone(&log);
        let factory = move |binding: &ToolkitBinding| -> Box<dyn ToolkitService> {
            let mut entry = factory_log.lock();
            entry.started += 1;
            entry.bound_index = Some(binding.application.index());
            Box::new(RecordingToolkit(Arc::clone(&factory_log)))
        };
        let card = UiccCard::builder()
            .with_toolkit(Arc::new(factory))
            .build(status);
        (card, log)
    }

    fn usim() -> ApplicationStatus {
        ApplicationStatus::new(AppType::Usim, AppState::Ready)
    }

    #[test]
    fn test_toolkit_follows_slot_zero() {
        let (mut card, log) = recording_card(&CardStatus::present(vec![usim()]));
        assert!(card.toolkit_active());
        assert_eq!(log.lock().started, 1);

        card.update(&CardStatus::present(vec![usim()])).unwrap();
        assert_eq!(log.lock().started, 1);
        assert_eq!(log.lock().reinitialized, 1);

        card.update(&CardStatus::absent()).unwrap();
        assert!(!card.toolkit_active());
        assert_eq!(log.lock().disposed, 1);

        card.update(&CardStatus::present(vec![usim()])).unwrap();
        assert_eq!(log.lock().started, 2);
        assert_eq!(log.lock().bound_index, Some(0));
    }

    #[test]
    fn test_no_toolkit_without_applications() {
        let (card, log) = recording_card(&CardStatus::absent());
        assert!(!card.toolkit_active());
        assert_eq!(log.lock().started, 0);
    }

    #[test]
    fn test_dispose_cascades() {
        let (mut card, log) = recording_card(&CardStatus::present(vec![usim(), usim()]));
        let app = Arc::clone(card.application_at(1).unwrap());

        card.dispose();
        card.dispose();

        assert!(card.is_destroyed());
        assert_eq!(log.lock().disposed, 1);
        assert!(app.is_disposed());
        assert!(card.application_at(0).is_none());
        assert!(card.application(AppFamily::ThreeGpp).is_none());
        assert!(!card.is_application_present(AppType::Usim));
        assert_eq!(card.application_count(), 0);
    }

    #[test]
    fn test_update_after_dispose_is_rejected() {
        let (mut card, _log) = recording_card(&CardStatus::present(vec![usim()]));
        card.dispose();

        let result = card.update(&CardStatus::absent());
        assert_eq!(result, Err(Error::Destroyed { slot: 0 }));
        assert_eq!(card.card_state(), CardState::Present);
        assert_eq!(card.application_count(), 0);
    }

    #[test]
    fn test_family_index_out_of_range() {
        let mut status = CardStatus::present(vec![usim()]);
        status.gsm_umts_subscription_app_index = 12;
        status.cdma_subscription_app_index = -1;
        status.ims_subscription_app_index = 1;
        let card = UiccCard::builder().build(&status);

        assert!(card.application(AppFamily::ThreeGpp).is_none());
        assert!(card.application(AppFamily::ThreeGpp2).is_none());
        assert!(card.application(AppFamily::Ims).is_none());
        assert!(card.application_at(usize::MAX).is_none());
    }

    #[test]
    fn test_unregister_unknown_is_noop() {
        let mut card = UiccCard::builder().build(&CardStatus::present(vec![usim()]));
        let id = card.register_for_absent(|_: CardAbsent| {});
        card.unregister_for_absent(id);
        card.unregister_for_absent(id);
        assert_eq!(card.absent_registrant_count(), 0);
    }
}
