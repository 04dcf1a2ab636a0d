//! Card status types reported by the radio layer
//!
//! These mirror the values a modem reports in a card status response. The
//! engine never computes them; it only stores and compares them.

use derive_more::Display;

/// Maximum number of applications a card status report can describe
pub const CARD_MAX_APPS: usize = 8;

/// Physical state of the card in its slot
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CardState {
    /// No card in the slot
    #[display("absent")]
    Absent,
    /// A card is inserted and answering
    #[display("present")]
    Present,
    /// A card is inserted but the modem failed to talk to it
    #[display("error")]
    Error,
    /// A card is inserted but access to it is restricted
    #[display("restricted")]
    Restricted,
}

impl CardState {
    /// Whether the card is absent from the slot
    pub const fn is_absent(self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Whether the application list of a report in this state carries meaning
    pub const fn has_applications(self) -> bool {
        !matches!(self, Self::Absent | Self::Error)
    }
}

/// PIN state, either the universal PIN of the card or a per-application PIN
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PinState {
    /// State not reported
    #[default]
    #[display("unknown")]
    Unknown,
    /// PIN enabled, not yet verified
    #[display("enabled, not verified")]
    EnabledNotVerified,
    /// PIN enabled and verified
    #[display("enabled, verified")]
    EnabledVerified,
    /// PIN disabled
    #[display("disabled")]
    Disabled,
    /// PIN blocked, PUK required
    #[display("blocked")]
    EnabledBlocked,
    /// PIN and PUK blocked
    #[display("permanently blocked")]
    EnabledPermBlocked,
}

/// Technology family used to pick the subscription application of a card
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AppFamily {
    /// GSM/UMTS family
    #[display("3GPP")]
    #[cfg_attr(feature = "serde", serde(rename = "3gpp"))]
    ThreeGpp,
    /// CDMA family
    #[display("3GPP2")]
    #[cfg_attr(feature = "serde", serde(rename = "3gpp2"))]
    ThreeGpp2,
    /// IMS family
    #[display("IMS")]
    #[cfg_attr(feature = "serde", serde(rename = "ims"))]
    Ims,
}

/// Type of a card application
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AppType {
    /// Unknown or disposed application
    #[default]
    #[display("unknown")]
    Unknown,
    /// GSM SIM
    #[display("SIM")]
    Sim,
    /// UMTS USIM
    #[display("USIM")]
    Usim,
    /// CDMA RUIM
    #[display("RUIM")]
    Ruim,
    /// CDMA CSIM
    #[display("CSIM")]
    Csim,
    /// IMS ISIM
    #[display("ISIM")]
    Isim,
}

impl AppType {
    /// The technology family this application type serves
    pub const fn family(self) -> Option<AppFamily> {
        match self {
            Self::Sim | Self::Usim => Some(AppFamily::ThreeGpp),
            Self::Ruim | Self::Csim => Some(AppFamily::ThreeGpp2),
            Self::Isim => Some(AppFamily::Ims),
            Self::Unknown => None,
        }
    }
}

/// Lifecycle state of a card application as reported by the modem
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AppState {
    /// Unknown or disposed application
    #[default]
    #[display("unknown")]
    Unknown,
    /// Detected, not yet initialised
    #[display("detected")]
    Detected,
    /// Waiting for PIN
    #[display("pin")]
    Pin,
    /// Waiting for PUK
    #[display("puk")]
    Puk,
    /// Personalisation (network lock) in effect
    #[display("subscription perso")]
    SubscriptionPerso,
    /// Ready for use
    #[display("ready")]
    Ready,
}

/// Status of a single application inside a card status report
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ApplicationStatus {
    /// Application type
    pub app_type: AppType,
    /// Application state
    pub app_state: AppState,
    /// Application identifier, hex encoded
    pub aid: Option<String>,
    /// Human readable application label
    pub label: Option<String>,
    /// PIN1 state
    pub pin1: PinState,
    /// PIN2 state
    pub pin2: PinState,
}

impl ApplicationStatus {
    /// Create a status record with the given type and state
    pub fn new(app_type: AppType, app_state: AppState) -> Self {
        Self {
            app_type,
            app_state,
            ..Default::default()
        }
    }

    /// Set the application identifier
    pub fn with_aid(mut self, aid: impl Into<String>) -> Self {
        self.aid = Some(aid.into());
        self
    }

    /// Set the application label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the PIN1 state
    pub const fn with_pin1(mut self, pin1: PinState) -> Self {
        self.pin1 = pin1;
        self
    }
}

/// Card status snapshot delivered by the radio layer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardStatus {
    /// Card state
    pub card_state: CardState,
    /// Universal PIN state
    #[cfg_attr(feature = "serde", serde(default))]
    pub universal_pin_state: PinState,
    /// Index of the GSM/UMTS subscription application, negative for none
    #[cfg_attr(feature = "serde", serde(default = "no_app_index"))]
    pub gsm_umts_subscription_app_index: i32,
    /// Index of the CDMA subscription application, negative for none
    #[cfg_attr(feature = "serde", serde(default = "no_app_index"))]
    pub cdma_subscription_app_index: i32,
    /// Index of the IMS subscription application, negative for none
    #[cfg_attr(feature = "serde", serde(default = "no_app_index"))]
    pub ims_subscription_app_index: i32,
    /// Applications on the card, ordered by slot
    #[cfg_attr(feature = "serde", serde(default))]
    pub applications: Vec<ApplicationStatus>,
}

#[cfg(feature = "serde")]
const fn no_app_index() -> i32 {
    -1
}

impl CardStatus {
    /// Report for an empty slot
    pub const fn absent() -> Self {
        Self {
            card_state: CardState::Absent,
            universal_pin_state: PinState::Unknown,
            gsm_umts_subscription_app_index: -1,
            cdma_subscription_app_index: -1,
            ims_subscription_app_index: -1,
            applications: Vec::new(),
        }
    }

    /// Report for a present card carrying the given applications
    ///
    /// The subscription indices are derived from the first application of
    /// each family.
    pub fn present(applications: Vec<ApplicationStatus>) -> Self {
        let index_of = |family| {
            applications
                .iter()
                .position(|app| app.app_type.family() == Some(family))
                .map_or(-1, |i| i as i32)
        };

        Self {
            card_state: CardState::Present,
            universal_pin_state: PinState::Unknown,
            gsm_umts_subscription_app_index: index_of(AppFamily::ThreeGpp),
            cdma_subscription_app_index: index_of(AppFamily::ThreeGpp2),
            ims_subscription_app_index: index_of(AppFamily::Ims),
            applications,
        }
    }

    /// Set the universal PIN state
    pub const fn with_universal_pin(mut self, state: PinState) -> Self {
        self.universal_pin_state = state;
        self
    }

    /// Subscription application index reported for a family
    pub const fn subscription_app_index(&self, family: AppFamily) -> i32 {
        match family {
            AppFamily::ThreeGpp => self.gsm_umts_subscription_app_index,
            AppFamily::ThreeGpp2 => self.cdma_subscription_app_index,
            AppFamily::Ims => self.ims_subscription_app_index,
        }
    }
}
