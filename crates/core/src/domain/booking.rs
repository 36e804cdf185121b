use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::service::ServiceId;
use crate::errors::DomainError;

/// One service-table selection within a booking: the party size and the
/// arrival/departure wall-clock times for a single date. Transient value
/// object, recomputed from UI state on every change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingLine {
    pub service_id: ServiceId,
    pub guest_count: u32,
    pub date: NaiveDate,
    pub arrival: NaiveTime,
    pub departure: NaiveTime,
}

impl BookingLine {
    pub fn duration_minutes(&self) -> i64 {
        (self.departure - self.arrival).num_minutes()
    }

    /// Duration in hours as an exact decimal (e.g. 90 minutes -> 1.5).
    pub fn duration_hours(&self) -> Decimal {
        Decimal::from(self.duration_minutes()) / Decimal::from(60)
    }

    pub fn has_valid_duration(&self) -> bool {
        self.duration_minutes() > 0
    }

    /// Rejects selections the UI must already prevent: a party below one
    /// guest or a departure at/before arrival.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.guest_count == 0 {
            return Err(DomainError::GuestCountBelowMinimum);
        }
        if !self.has_valid_duration() {
            return Err(DomainError::InvalidDuration {
                arrival: self.arrival,
                departure: self.departure,
            });
        }
        Ok(())
    }
}
