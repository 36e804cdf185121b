//! Storage boundary for service configuration.
//!
//! Venue services arrive as JSON rows (`guest_pricing_rules`,
//! `overall_discount_percent`, `free_hour_discounts`, `group_discounts`,
//! `timeslot_discounts`, `price_per_hour`) written by partner tooling, so
//! the shape cannot be trusted. Everything is parsed and validated here,
//! once, into `ServiceConfig`; the engine never sees raw JSON. A malformed
//! individual rule is skipped with a coded warning rather than failing the
//! record, so one bad rule cannot make a venue unbookable.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::service::{
    DiscountConfig, FreeHourRule, GroupDiscountTier, GuestPricingRule, ServiceConfig, ServiceId,
    ServicePricing, TimeslotWindow,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogWarning {
    pub code: String,
    pub field: String,
    pub message: String,
}

impl CatalogWarning {
    fn new(code: &str, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { code: code.to_owned(), field: field.into(), message: message.into() }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("service record is not a JSON object")]
    NotAnObject,
    #[error("service record is missing required field `{0}`")]
    MissingField(&'static str),
    #[error("service `{0}` has neither guest pricing tiers nor a per-table rate")]
    MissingPricing(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedService {
    pub service: ServiceConfig,
    pub warnings: Vec<CatalogWarning>,
}

/// Parses one `venue_services` row. Returns an error only when the record
/// is unusable as a whole (no id, no pricing of either mode); every
/// rule-level problem degrades to a warning and the rule is dropped.
pub fn parse_service_record(raw: &Value) -> Result<ParsedService, CatalogError> {
    let record = raw.as_object().ok_or(CatalogError::NotAnObject)?;
    let mut warnings = Vec::new();

    let id = match record.get("id").and_then(string_value) {
        Some(id) if !id.is_empty() => id,
        _ => return Err(CatalogError::MissingField("id")),
    };
    let name = match record.get("name").and_then(string_value) {
        Some(name) if !name.is_empty() => name,
        _ => {
            warnings.push(CatalogWarning::new(
                "MISSING_SERVICE_NAME",
                "name",
                format!("service `{id}` has no display name, falling back to its id"),
            ));
            id.clone()
        }
    };

    let rules = parse_guest_rules(record.get("guest_pricing_rules"), &mut warnings);
    let pricing = if !rules.is_empty() {
        ServicePricing::PerGuestTier { rules }
    } else {
        match record.get("price_per_hour") {
            Some(value) if !value.is_null() => match decimal_value(value) {
                Some(rate) if rate >= Decimal::ZERO => ServicePricing::PerTable { hourly_rate: rate },
                Some(_) => {
                    warnings.push(CatalogWarning::new(
                        "NEGATIVE_TABLE_RATE",
                        "price_per_hour",
                        "per-table hourly rate is negative",
                    ));
                    return Err(CatalogError::MissingPricing(id));
                }
                None => {
                    warnings.push(CatalogWarning::new(
                        "NON_NUMERIC_TABLE_RATE",
                        "price_per_hour",
                        "per-table hourly rate is not a number",
                    ));
                    return Err(CatalogError::MissingPricing(id));
                }
            },
            _ => return Err(CatalogError::MissingPricing(id)),
        }
    };

    let discounts = DiscountConfig {
        overall_discount_percent: parse_overall_percent(
            record.get("overall_discount_percent"),
            &mut warnings,
        ),
        free_hours: parse_free_hours(record.get("free_hour_discounts"), &mut warnings),
        group_tiers: parse_group_tiers(record.get("group_discounts"), &mut warnings),
        timeslot_windows: parse_timeslot_windows(record.get("timeslot_discounts"), &mut warnings),
    };

    Ok(ParsedService {
        service: ServiceConfig { id: ServiceId(id), name, pricing, discounts },
        warnings,
    })
}

/// Parses an exported array of rows. A row that fails entirely becomes a
/// warning instead of an error so one bad row cannot block the catalog.
pub fn parse_service_records(raw: &Value) -> (Vec<ServiceConfig>, Vec<CatalogWarning>) {
    let mut services = Vec::new();
    let mut warnings = Vec::new();

    let Some(rows) = raw.as_array() else {
        warnings.push(CatalogWarning::new(
            "NOT_AN_ARRAY",
            "$",
            "expected a JSON array of service records",
        ));
        return (services, warnings);
    };

    for (index, row) in rows.iter().enumerate() {
        match parse_service_record(row) {
            Ok(parsed) => {
                warnings.extend(parsed.warnings.into_iter().map(|warning| CatalogWarning {
                    field: format!("[{index}].{}", warning.field),
                    ..warning
                }));
                services.push(parsed.service);
            }
            Err(error) => warnings.push(CatalogWarning::new(
                "UNUSABLE_SERVICE_RECORD",
                format!("[{index}]"),
                error.to_string(),
            )),
        }
    }

    (services, warnings)
}

/// Accepts the wall-clock formats seen in stored rows: `HH:MM` and
/// `HH:MM:SS`.
pub fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .ok()
}

fn parse_guest_rules(raw: Option<&Value>, warnings: &mut Vec<CatalogWarning>) -> Vec<GuestPricingRule> {
    let field = "guest_pricing_rules";
    let Some(value) = raw.filter(|value| !value.is_null()) else {
        return Vec::new();
    };
    let Some(entries) = value.as_array() else {
        warnings.push(CatalogWarning::new(
            "INVALID_GUEST_PRICING_RULES",
            field,
            "expected an array of {max_guests, price} tiers",
        ));
        return Vec::new();
    };

    let mut rules = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        let max_guests = entry.get("max_guests").and_then(u32_value);
        let price = entry.get("price").and_then(decimal_value);
        match (max_guests, price) {
            (Some(max_guests), Some(price)) if max_guests >= 1 && price >= Decimal::ZERO => {
                rules.push(GuestPricingRule { max_guests, price });
            }
            _ => warnings.push(CatalogWarning::new(
                "MALFORMED_GUEST_TIER",
                format!("{field}[{index}]"),
                "tier needs max_guests >= 1 and a non-negative price",
            )),
        }
    }

    rules.sort_by_key(|rule| rule.max_guests);
    let mut previous_max = 0u32;
    rules.retain(|rule| {
        if rule.max_guests == previous_max {
            warnings.push(CatalogWarning::new(
                "DUPLICATE_GUEST_TIER",
                field,
                format!("more than one tier ends at {} guests, keeping the first", rule.max_guests),
            ));
            false
        } else {
            previous_max = rule.max_guests;
            true
        }
    });

    rules
}

fn parse_overall_percent(raw: Option<&Value>, warnings: &mut Vec<CatalogWarning>) -> Decimal {
    let field = "overall_discount_percent";
    let Some(value) = raw.filter(|value| !value.is_null()) else {
        return Decimal::ZERO;
    };
    match decimal_value(value) {
        Some(percent) if in_percent_range(percent) => percent,
        Some(percent) => {
            warnings.push(CatalogWarning::new(
                "PERCENT_OUT_OF_RANGE",
                field,
                format!("{percent} is outside 0..=100, treating as no discount"),
            ));
            Decimal::ZERO
        }
        None => {
            warnings.push(CatalogWarning::new(
                "NON_NUMERIC_PERCENT",
                field,
                "discount percent is not a number, treating as no discount",
            ));
            Decimal::ZERO
        }
    }
}

fn parse_free_hours(raw: Option<&Value>, warnings: &mut Vec<CatalogWarning>) -> Option<FreeHourRule> {
    let field = "free_hour_discounts";
    let value = raw.filter(|value| !value.is_null())?;

    // Stored either as a single object or as a one-element array.
    let entry = match value {
        Value::Array(entries) => {
            if entries.len() > 1 {
                warnings.push(CatalogWarning::new(
                    "EXTRA_FREE_HOUR_RULES",
                    field,
                    "only one free-hour rule is supported, keeping the first",
                ));
            }
            entries.first()?
        }
        other => other,
    };

    let threshold_hours = entry.get("threshold_hours").and_then(u32_value);
    let free_hours = entry.get("free_hours").and_then(u32_value);
    match (threshold_hours, free_hours) {
        (Some(threshold_hours), Some(free_hours)) if threshold_hours >= 1 && free_hours >= 1 => {
            Some(FreeHourRule { threshold_hours, free_hours })
        }
        _ => {
            warnings.push(CatalogWarning::new(
                "MALFORMED_FREE_HOUR_RULE",
                field,
                "rule needs threshold_hours >= 1 and free_hours >= 1, skipping",
            ));
            None
        }
    }
}

fn parse_group_tiers(
    raw: Option<&Value>,
    warnings: &mut Vec<CatalogWarning>,
) -> Vec<GroupDiscountTier> {
    let field = "group_discounts";
    let Some(value) = raw.filter(|value| !value.is_null()) else {
        return Vec::new();
    };
    let Some(entries) = value.as_array() else {
        warnings.push(CatalogWarning::new(
            "INVALID_GROUP_DISCOUNTS",
            field,
            "expected an array of {min_guests, discount_percent} tiers",
        ));
        return Vec::new();
    };

    let mut tiers = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        let min_guests = entry.get("min_guests").and_then(u32_value);
        let percent = entry.get("discount_percent").and_then(decimal_value);
        match (min_guests, percent) {
            (Some(min_guests), Some(percent)) if min_guests >= 1 && in_percent_range(percent) => {
                tiers.push(GroupDiscountTier { min_guests, discount_percent: percent });
            }
            _ => warnings.push(CatalogWarning::new(
                "MALFORMED_GROUP_TIER",
                format!("{field}[{index}]"),
                "tier needs min_guests >= 1 and a percent in 0..=100",
            )),
        }
    }

    tiers.sort_by_key(|tier| tier.min_guests);
    let mut previous_min = 0u32;
    tiers.retain(|tier| {
        if tier.min_guests == previous_min {
            warnings.push(CatalogWarning::new(
                "DUPLICATE_GROUP_TIER",
                field,
                format!("more than one tier starts at {} guests, keeping the first", tier.min_guests),
            ));
            false
        } else {
            previous_min = tier.min_guests;
            true
        }
    });

    tiers
}

fn parse_timeslot_windows(
    raw: Option<&Value>,
    warnings: &mut Vec<CatalogWarning>,
) -> Vec<TimeslotWindow> {
    let field = "timeslot_discounts";
    let Some(value) = raw.filter(|value| !value.is_null()) else {
        return Vec::new();
    };
    let Some(entries) = value.as_array() else {
        warnings.push(CatalogWarning::new(
            "INVALID_TIMESLOT_DISCOUNTS",
            field,
            "expected an array of {start, end, discount_percent} windows",
        ));
        return Vec::new();
    };

    let mut windows = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        let start = entry.get("start").and_then(Value::as_str).and_then(parse_time_of_day);
        let end = entry.get("end").and_then(Value::as_str).and_then(parse_time_of_day);
        let percent = entry.get("discount_percent").and_then(decimal_value);

        let (Some(start), Some(end), Some(percent)) = (start, end, percent) else {
            warnings.push(CatalogWarning::new(
                "MALFORMED_TIMESLOT_WINDOW",
                format!("{field}[{index}]"),
                "window needs HH:MM start/end and a numeric percent",
            ));
            continue;
        };
        if !in_percent_range(percent) {
            warnings.push(CatalogWarning::new(
                "PERCENT_OUT_OF_RANGE",
                format!("{field}[{index}]"),
                format!("{percent} is outside 0..=100, skipping window"),
            ));
            continue;
        }
        if start >= end {
            warnings.push(CatalogWarning::new(
                "WINDOW_START_NOT_BEFORE_END",
                format!("{field}[{index}]"),
                "window start must be before its end, skipping",
            ));
            continue;
        }

        // Declaration order is kept: it defines precedence between windows.
        windows.push(TimeslotWindow { start, end, discount_percent: percent });
    }

    for (first_index, first_window) in windows.iter().enumerate() {
        for (second_index, second_window) in windows.iter().enumerate().skip(first_index + 1) {
            if first_window.start < second_window.end && second_window.start < first_window.end {
                warnings.push(CatalogWarning::new(
                    "OVERLAPPING_TIMESLOT_WINDOWS",
                    format!("{field}[{first_index}], {field}[{second_index}]"),
                    "windows overlap; the first declared window wins for arrivals in both",
                ));
            }
        }
    }

    windows
}

fn string_value(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.trim().to_owned()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn decimal_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(number) => number.to_string().parse().ok(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn u32_value(value: &Value) -> Option<u32> {
    match value {
        Value::Number(number) => number.as_u64().and_then(|wide| u32::try_from(wide).ok()),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn in_percent_range(percent: Decimal) -> bool {
    percent >= Decimal::ZERO && percent <= Decimal::ONE_HUNDRED
}
