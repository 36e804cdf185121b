pub mod discounts;
pub mod guest_rates;
pub mod totals;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::booking::BookingLine;
use crate::domain::service::{ServiceConfig, ServiceId, ServicePricing};
use crate::errors::DomainError;

use self::discounts::{DeterministicDiscountEngine, DiscountEngine, PricingResult};
use self::totals::{aggregate_results, BookingTotal};

/// Hourly rate a line pays under the service's pricing mode. Guest-tier
/// services resolve through the tier table; per-table services charge a
/// flat rate for any party the venue admits.
pub fn base_rate_for(pricing: &ServicePricing, guest_count: u32) -> Result<Decimal, DomainError> {
    match pricing {
        ServicePricing::PerGuestTier { rules } => guest_rates::resolve_rate(rules, guest_count),
        ServicePricing::PerTable { hourly_rate } => {
            if guest_count == 0 {
                return Err(DomainError::GuestCountBelowMinimum);
            }
            Ok(*hourly_rate)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotedLine {
    pub service_id: ServiceId,
    pub service_name: String,
    pub result: PricingResult,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingQuote {
    pub lines: Vec<QuotedLine>,
    pub totals: BookingTotal,
}

/// Prices whole bookings: resolves each line's base rate from its service's
/// pricing mode, runs the discount engine, and aggregates totals.
pub struct BookingPricer<E> {
    discount_engine: E,
}

impl<E> BookingPricer<E> {
    pub fn new(discount_engine: E) -> Self {
        Self { discount_engine }
    }
}

impl Default for BookingPricer<DeterministicDiscountEngine> {
    fn default() -> Self {
        Self::new(DeterministicDiscountEngine)
    }
}

impl<E> BookingPricer<E>
where
    E: DiscountEngine,
{
    /// Prices one line against its service. Selection errors (bad guest
    /// count, inverted times) surface here, before the discount engine.
    pub fn quote_line(
        &self,
        service: &ServiceConfig,
        line: &BookingLine,
    ) -> Result<PricingResult, DomainError> {
        if service.id != line.service_id {
            return Err(DomainError::InvariantViolation(format!(
                "line for service `{}` priced against service `{}`",
                line.service_id, service.id
            )));
        }
        line.validate()?;

        let base_rate = base_rate_for(&service.pricing, line.guest_count)?;
        Ok(self.discount_engine.evaluate(&service.discounts, line, base_rate))
    }

    /// Prices a multi-service, multi-table booking. Fails on the first line
    /// that cannot be priced; a partial quote must never reach checkout.
    pub fn quote_booking(
        &self,
        services: &[ServiceConfig],
        lines: &[BookingLine],
    ) -> Result<BookingQuote, DomainError> {
        let mut quoted = Vec::with_capacity(lines.len());
        let mut results = Vec::with_capacity(lines.len());

        for line in lines {
            let service = services
                .iter()
                .find(|candidate| candidate.id == line.service_id)
                .ok_or_else(|| DomainError::UnknownService(line.service_id.clone()))?;
            let result = self.quote_line(service, line)?;
            results.push(result.clone());
            quoted.push(QuotedLine {
                service_id: service.id.clone(),
                service_name: service.name.clone(),
                result,
            });
        }

        Ok(BookingQuote { lines: quoted, totals: aggregate_results(&results) })
    }
}
