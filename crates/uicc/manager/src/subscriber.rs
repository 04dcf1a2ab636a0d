//! Subscriber information served by the radio stack
//!
//! The manager only forwards these queries. Failures never reach callers:
//! each query has a neutral default that is returned instead.

use derive_more::Display;

use crate::ServiceError;

/// Radio access technology of the current data connection
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NetworkType {
    /// Not known
    #[default]
    #[display("unknown")]
    Unknown,
    /// GPRS
    #[display("GPRS")]
    Gprs,
    /// EDGE
    #[display("EDGE")]
    Edge,
    /// UMTS
    #[display("UMTS")]
    Umts,
    /// HSPA
    #[display("HSPA")]
    Hspa,
    /// CDMA IS-95
    #[display("CDMA")]
    Cdma,
    /// CDMA2000 1xRTT
    #[display("1xRTT")]
    OneXRtt,
    /// EV-DO
    #[display("EVDO")]
    Evdo,
    /// eHRPD
    #[display("eHRPD")]
    Ehrpd,
    /// LTE
    #[display("LTE")]
    Lte,
}

/// Whether the device runs LTE on a CDMA network
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LteOnCdmaMode {
    /// Not known
    #[default]
    #[display("unknown")]
    Unknown,
    /// LTE on CDMA is off
    #[display("false")]
    False,
    /// LTE on CDMA is on
    #[display("true")]
    True,
}

/// Per-subscription queries answered by the radio stack
///
/// Implementations are shared between threads. Every call may fail, for
/// example when the backing service restarted.
pub trait SubscriberInfo: Send + Sync {
    /// Device identifier (IMEI or MEID) of the phone serving `subscription`
    fn device_id(&self, subscription: usize) -> Result<Option<String>, ServiceError>;

    /// Serial number (ICCID) of the card serving `subscription`
    fn icc_serial_number(&self, subscription: usize) -> Result<Option<String>, ServiceError>;

    /// Subscriber identity (IMSI) of `subscription`
    fn subscriber_id(&self, subscription: usize) -> Result<Option<String>, ServiceError>;

    /// Network type of `subscription`
    fn network_type(&self, subscription: usize) -> Result<NetworkType, ServiceError>;

    /// LTE on CDMA mode of `subscription`
    fn lte_on_cdma_mode(&self, subscription: usize) -> Result<LteOnCdmaMode, ServiceError>;

    /// Subscription used when the caller names none
    fn default_subscription(&self) -> Result<usize, ServiceError>;
}
