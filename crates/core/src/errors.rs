use chrono::NaiveTime;
use thiserror::Error;

use crate::domain::service::ServiceId;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("guest count must be at least 1")]
    GuestCountBelowMinimum,
    #[error("party of {requested} exceeds the largest configured tier of {largest} guests")]
    GuestCountExceedsTiers { requested: u32, largest: u32 },
    #[error("service has no guest pricing tiers configured")]
    NoGuestPricingTiers,
    #[error("departure {departure} must be after arrival {arrival}")]
    InvalidDuration { arrival: NaiveTime, departure: NaiveTime },
    #[error("booking references unknown service `{0}`")]
    UnknownService(ServiceId),
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

impl DomainError {
    /// True when the error is fixable by the guest editing their selection,
    /// as opposed to a configuration problem on the venue side.
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            Self::GuestCountBelowMinimum
                | Self::GuestCountExceedsTiers { .. }
                | Self::InvalidDuration { .. }
        )
    }
}
