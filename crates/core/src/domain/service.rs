use std::fmt;

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceId(pub String);

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hourly rate that applies to parties larger than the previous tier and up
/// to `max_guests` inclusive. A service owns these sorted ascending by
/// `max_guests`, strictly increasing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestPricingRule {
    pub max_guests: u32,
    pub price: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDiscountTier {
    pub min_guests: u32,
    pub discount_percent: Decimal,
}

/// "Book at least `threshold_hours`, get `free_hours` of them free."
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeHourRule {
    pub threshold_hours: u32,
    pub free_hours: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeslotWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub discount_percent: Decimal,
}

impl TimeslotWindow {
    /// Inclusive start, exclusive end.
    pub fn contains(&self, arrival: NaiveTime) -> bool {
        self.start <= arrival && arrival < self.end
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountConfig {
    pub overall_discount_percent: Decimal,
    pub free_hours: Option<FreeHourRule>,
    /// Largest qualifying `min_guests` wins; tiers never stack with each other.
    pub group_tiers: Vec<GroupDiscountTier>,
    /// Declaration order defines precedence when windows overlap.
    pub timeslot_windows: Vec<TimeslotWindow>,
}

impl DiscountConfig {
    pub fn is_empty(&self) -> bool {
        self.overall_discount_percent == Decimal::ZERO
            && self.free_hours.is_none()
            && self.group_tiers.is_empty()
            && self.timeslot_windows.is_empty()
    }
}

/// How a service charges for a table-hour. The mode is part of the service
/// configuration; the engine only ever consumes the resolved rate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServicePricing {
    PerGuestTier { rules: Vec<GuestPricingRule> },
    PerTable { hourly_rate: Decimal },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub id: ServiceId,
    pub name: String,
    pub pricing: ServicePricing,
    pub discounts: DiscountConfig,
}
