use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::domain::booking::BookingLine;
use crate::domain::service::DiscountConfig;
use crate::pricing::discounts::{evaluate_line, PricingResult};

/// One line ready for aggregation: the selection, the discount rules of its
/// service, and the base rate already resolved from the service's pricing
/// mode (per guest tier or per table).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineInput {
    pub line: BookingLine,
    pub config: DiscountConfig,
    pub base_rate: Decimal,
}

/// Booking-level totals across every line. `discounted_total` is the
/// authoritative amount for both display and payment capture.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingTotal {
    pub original_total: Decimal,
    pub discounted_total: Decimal,
    pub total_savings: Decimal,
}

impl BookingTotal {
    /// The one rounding point in the system. Display code and the payment
    /// collaborator must both consume this value; rounding anywhere else
    /// risks a charge that differs from what the guest saw.
    pub fn charge_total(&self, decimals: u32) -> Decimal {
        self.discounted_total.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero)
    }
}

/// Evaluates every line through the discount engine and sums the results.
pub fn aggregate(inputs: &[LineInput]) -> BookingTotal {
    let results: Vec<PricingResult> = inputs
        .iter()
        .map(|input| evaluate_line(&input.config, &input.line, input.base_rate))
        .collect();
    aggregate_results(&results)
}

/// Sums per-line results that were already computed, e.g. for a live total
/// under individually rendered line previews.
pub fn aggregate_results(results: &[PricingResult]) -> BookingTotal {
    let mut total = BookingTotal::default();
    for result in results {
        total.original_total += result.original_price;
        total.discounted_total += result.final_price;
        total.total_savings += result.savings;
    }
    total
}
