//! SIM state of a slot as seen by telephony clients

use derive_more::Display;
use nexum_uicc_core::{AppFamily, AppState, CardState, PinState, UiccCard};

/// Overall SIM state of a slot
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimState {
    /// Not reported yet, or still initialising
    #[display("UNKNOWN")]
    Unknown,
    /// No card in the slot
    #[display("ABSENT")]
    Absent,
    /// Waiting for PIN
    #[display("PIN_REQUIRED")]
    PinRequired,
    /// Waiting for PUK
    #[display("PUK_REQUIRED")]
    PukRequired,
    /// Network personalisation lock in effect
    #[display("NETWORK_LOCKED")]
    NetworkLocked,
    /// Ready for use
    #[display("READY")]
    Ready,
    /// PIN and PUK permanently blocked
    #[display("PERM_DISABLED")]
    PermDisabled,
    /// The modem could not talk to the card
    #[display("CARD_IO_ERROR")]
    CardIoError,
    /// Access to the card is restricted
    #[display("CARD_RESTRICTED")]
    CardRestricted,
}

impl SimState {
    /// Derive the state of a slot from its card
    ///
    /// The subscription application is the 3GPP one, falling back to 3GPP2.
    pub fn from_card(card: Option<&UiccCard>) -> Self {
        let Some(card) = card.filter(|card| !card.is_destroyed()) else {
            return Self::Unknown;
        };

        match card.card_state() {
            CardState::Absent => return Self::Absent,
            CardState::Error => return Self::CardIoError,
            CardState::Restricted => return Self::CardRestricted,
            CardState::Present => {}
        }

        if card.universal_pin_state() == PinState::EnabledPermBlocked {
            return Self::PermDisabled;
        }

        let Some(app) = card
            .application(AppFamily::ThreeGpp)
            .or_else(|| card.application(AppFamily::ThreeGpp2))
        else {
            return Self::Unknown;
        };

        if app.pin1_state() == PinState::EnabledPermBlocked {
            return Self::PermDisabled;
        }

        match app.state() {
            AppState::Pin => Self::PinRequired,
            AppState::Puk => Self::PukRequired,
            AppState::SubscriptionPerso => Self::NetworkLocked,
            AppState::Ready => Self::Ready,
            AppState::Unknown | AppState::Detected => Self::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexum_uicc_core::{AppType, ApplicationStatus, CardStatus};

    fn card(status: CardStatus) -> UiccCard {
        UiccCard::builder().build(&status)
    }

    fn with_app(app_type: AppType, state: AppState) -> CardStatus {
        CardStatus::present(vec![ApplicationStatus::new(app_type, state)])
    }

    #[test]
    fn test_card_level_states() {
        assert_eq!(SimState::from_card(None), SimState::Unknown);
        assert_eq!(
            SimState::from_card(Some(&card(CardStatus::absent()))),
            SimState::Absent
        );

        let mut status = CardStatus::absent();
        status.card_state = CardState::Error;
        assert_eq!(SimState::from_card(Some(&card(status))), SimState::CardIoError);
    }

    #[test]
    fn test_restricted_card_ignores_applications() {
        let mut status = with_app(AppType::Usim, AppState::Ready);
        status.card_state = CardState::Restricted;
        assert_eq!(
            SimState::from_card(Some(&card(status))),
            SimState::CardRestricted
        );
    }

    #[test]
    fn test_application_states() {
        let cases = [
            (AppState::Pin, SimState::PinRequired),
            (AppState::Puk, SimState::PukRequired),
            (AppState::SubscriptionPerso, SimState::NetworkLocked),
            (AppState::Ready, SimState::Ready),
            (AppState::Detected, SimState::Unknown),
        ];

        for (app_state, expected) in cases {
            let card = card(with_app(AppType::Usim, app_state));
            assert_eq!(SimState::from_card(Some(&card)), expected, "{app_state}");
        }
    }

    #[test]
    fn test_falls_back_to_3gpp2() {
        let card = card(with_app(AppType::Csim, AppState::Puk));
        assert_eq!(SimState::from_card(Some(&card)), SimState::PukRequired);
    }

    #[test]
    fn test_perm_blocked() {
        let status = with_app(AppType::Usim, AppState::Puk)
            .with_universal_pin(PinState::EnabledPermBlocked);
        assert_eq!(SimState::from_card(Some(&card(status))), SimState::PermDisabled);
    }

    #[test]
    fn test_disposed_card_is_unknown() {
        let mut card = card(with_app(AppType::Usim, AppState::Ready));
        card.dispose();
        assert_eq!(SimState::from_card(Some(&card)), SimState::Unknown);
    }
}
