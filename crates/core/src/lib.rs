pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod pricing;

pub use catalog::{
    parse_service_record, parse_service_records, parse_time_of_day, CatalogError, CatalogWarning,
    ParsedService,
};
pub use domain::booking::BookingLine;
pub use domain::service::{
    DiscountConfig, FreeHourRule, GroupDiscountTier, GuestPricingRule, ServiceConfig, ServiceId,
    ServicePricing, TimeslotWindow,
};
pub use errors::DomainError;
pub use pricing::discounts::{
    evaluate_line, AppliedDiscount, DeterministicDiscountEngine, DiscountEngine, DiscountKind,
    PricingResult,
};
pub use pricing::guest_rates::{is_valid_guest_count, max_guest_count, resolve_rate};
pub use pricing::totals::{aggregate, aggregate_results, BookingTotal, LineInput};
pub use pricing::{base_rate_for, BookingPricer, BookingQuote, QuotedLine};
