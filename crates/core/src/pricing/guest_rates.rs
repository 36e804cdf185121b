use rust_decimal::Decimal;

use crate::domain::service::GuestPricingRule;
use crate::errors::DomainError;

/// Resolves the hourly rate for a party size against a tiered table sorted
/// ascending by `max_guests`: the first tier that still fits the party wins.
pub fn resolve_rate(rules: &[GuestPricingRule], guest_count: u32) -> Result<Decimal, DomainError> {
    if guest_count == 0 {
        return Err(DomainError::GuestCountBelowMinimum);
    }
    if rules.is_empty() {
        return Err(DomainError::NoGuestPricingTiers);
    }

    rules
        .iter()
        .find(|rule| guest_count <= rule.max_guests)
        .map(|rule| rule.price)
        .ok_or(DomainError::GuestCountExceedsTiers {
            requested: guest_count,
            largest: max_guest_count(rules),
        })
}

pub fn is_valid_guest_count(rules: &[GuestPricingRule], guest_count: u32) -> bool {
    guest_count >= 1 && rules.iter().any(|rule| guest_count <= rule.max_guests)
}

/// Largest bookable party size, 0 when no tiers are configured (the service
/// is then priced per table instead).
pub fn max_guest_count(rules: &[GuestPricingRule]) -> u32 {
    rules.iter().map(|rule| rule.max_guests).max().unwrap_or(0)
}
